#![no_main]

use ioc_registry::{Injectable, Lifetime, Registry, RegistrationMode, Resolver};
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

#[derive(Default, Injectable)]
struct Leaf;

#[derive(Default, Injectable)]
struct Branch {
    #[inject]
    leaf: Option<Arc<Leaf>>,
}

#[derive(Default, Injectable)]
struct Root {
    #[inject]
    branch: Option<Arc<Branch>>,
    #[inject("label")]
    label: Option<Arc<String>>,
}

fn lifetime(byte: u8) -> Lifetime {
    match byte % 3 {
        0 => Lifetime::Singleton,
        1 => Lifetime::Scoped,
        _ => Lifetime::Transient,
    }
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }

    let lifetimes = [lifetime(data[0]), lifetime(data[1]), lifetime(data[2])];
    let mut registry = Registry::new();
    registry
        .register_type::<Leaf>(lifetimes[0], RegistrationMode::Safe)
        .unwrap()
        .register_type::<Branch>(lifetimes[1], RegistrationMode::Safe)
        .unwrap()
        .register_type::<Root>(lifetimes[2], RegistrationMode::Safe)
        .unwrap()
        .register_by_name("label", "root".to_string(), RegistrationMode::Safe)
        .unwrap();
    let registry = Arc::new(registry);

    let scopes: Vec<Registry> = (0..data[3] % 4 + 1).map(|_| registry.fork().unwrap()).collect();

    for &op in &data[4..] {
        let scope = &scopes[op as usize % scopes.len()];
        let first = scope.get_required::<Root>();
        let second = scope.get_required::<Root>();

        assert_eq!(Arc::ptr_eq(&first, &second), lifetimes[2] != Lifetime::Transient);
        assert_eq!(first.label.as_deref().map(String::as_str), Some("root"));

        // A freshly built chain picks up this scope's cached leaf
        let leaf = first.branch.as_ref().and_then(|b| b.leaf.as_ref()).unwrap();
        let fresh_chain = lifetimes[1] == Lifetime::Transient && lifetimes[2] == Lifetime::Transient;
        if fresh_chain && lifetimes[0] != Lifetime::Transient {
            assert!(Arc::ptr_eq(leaf, &scope.get_required::<Leaf>()));
        }

        if lifetimes[2] == Lifetime::Scoped {
            assert!(registry.get::<Root>().is_err());
        }
    }
});
