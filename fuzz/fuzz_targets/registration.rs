#![no_main]

use ioc_registry::{DiError, Lifetime, Registry, RegistrationMode, Resolver};
use libfuzzer_sys::fuzz_target;
use std::collections::HashSet;

// Each pair of bytes is one registration: an opcode and a name seed.
fuzz_target!(|data: &[u8]| {
    let mut registry = Registry::new();
    let mut names = HashSet::new();
    let mut types = HashSet::new();

    for chunk in data.chunks_exact(2) {
        let (op, seed) = (chunk[0] % 5, chunk[1]);
        let name = if seed % 17 == 0 { String::new() } else { format!("item_{}", seed % 32) };

        let (type_name, result) = match op {
            0 => ("u8", registry.register_value(seed, RegistrationMode::Safe).map(|_| ())),
            1 => ("u16", registry.register_type::<u16>(Lifetime::Scoped, RegistrationMode::Safe).map(|_| ())),
            2 => ("u32", registry.register_transient::<u32>(RegistrationMode::Safe).map(|_| ())),
            3 => ("Box", registry.register_value(Box::new(seed), RegistrationMode::Safe).map(|_| ())),
            _ => {
                let result = registry.register_by_name(name.clone(), seed, RegistrationMode::Safe);
                match result {
                    Ok(_) => assert!(names.insert(name)),
                    Err(DiError::InvalidRegistration { .. }) => assert!(name.is_empty()),
                    Err(DiError::DuplicateKey(_)) => assert!(names.contains(&name)),
                    Err(other) => panic!("unexpected error: {}", other),
                }
                continue;
            }
        };

        match result {
            Ok(()) => {
                assert_ne!(type_name, "Box");
                let fresh = types.insert(type_name);
                assert!(fresh);
            }
            Err(DiError::InvalidRegistration { .. }) => assert_eq!(type_name, "Box"),
            Err(DiError::DuplicateKey(_)) => assert!(types.contains(type_name)),
            Err(other) => panic!("unexpected error: {}", other),
        }
    }

    assert_eq!(registry.len(), names.len() + types.len());

    for name in &names {
        assert!(registry.get_named::<u8>(name).is_ok());
    }
    if types.contains("u16") {
        assert!(matches!(registry.get::<u16>(), Err(DiError::ScopeRequired(_))));
    }
});
