use ioc_registry::{DiError, Injectable, Key, Lifetime, Registry, RegistrationMode, Resolver, TypeKey};
use std::sync::Arc;

#[derive(Default, Injectable)]
struct Mailer;

#[test]
fn test_duplicate_type_safe_mode() {
    let mut registry = Registry::new();
    registry.register_singleton::<Mailer>(RegistrationMode::Safe).unwrap();

    for lifetime in [Lifetime::Singleton, Lifetime::Scoped, Lifetime::Transient] {
        match registry.register_type::<Mailer>(lifetime, RegistrationMode::Safe) {
            Err(DiError::DuplicateKey(Key::Type(key))) => assert_eq!(key, TypeKey::of::<Mailer>()),
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }

    assert!(matches!(
        registry.register_value(Mailer, RegistrationMode::Safe),
        Err(DiError::DuplicateKey(_))
    ));
    assert!(matches!(
        registry.register_factory::<Mailer, _>(Lifetime::Transient, |_| Some(Mailer), RegistrationMode::Safe),
        Err(DiError::DuplicateKey(_))
    ));

    // The original registration is untouched
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.descriptors()[0].lifetime, Lifetime::Singleton);
}

#[test]
#[should_panic(expected = "Item already registered")]
fn test_duplicate_type_fail_fast_mode() {
    let mut registry = Registry::new();
    registry.register_singleton::<Mailer>(RegistrationMode::FailFast).unwrap();
    let _ = registry.register_transient::<Mailer>(RegistrationMode::FailFast);
}

#[test]
fn test_duplicate_name_safe_mode() {
    let mut registry = Registry::new();
    registry
        .register_by_name("smtp_host", "localhost".to_string(), RegistrationMode::Safe)
        .unwrap();

    // Same name with another type is still a collision
    match registry.register_by_name("smtp_host", 25u16, RegistrationMode::Safe) {
        Err(DiError::DuplicateKey(Key::Named(name))) => assert_eq!(name, "smtp_host"),
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
    assert_eq!(registry.get_named_required::<String>("smtp_host").as_str(), "localhost");
}

#[test]
#[should_panic(expected = "name 'smtp_host'")]
fn test_duplicate_name_fail_fast_mode() {
    let mut registry = Registry::new();
    registry
        .register_by_name("smtp_host", "localhost".to_string(), RegistrationMode::FailFast)
        .unwrap();
    let _ = registry.register_by_name("smtp_host", "other".to_string(), RegistrationMode::FailFast);
}

#[test]
fn test_mode_is_per_call() {
    let mut registry = Registry::new();
    registry.register_value(1u8, RegistrationMode::FailFast).unwrap();

    // A Safe call after FailFast calls still returns the error
    assert!(registry.register_value(2u8, RegistrationMode::Safe).is_err());
    assert_eq!(RegistrationMode::default(), RegistrationMode::Safe);
}

#[test]
fn test_named_and_unnamed_coexist() {
    let mut registry = Registry::new();
    registry
        .register_value(80u16, RegistrationMode::Safe)
        .unwrap()
        .register_by_name("admin_port", 8080u16, RegistrationMode::Safe)
        .unwrap()
        .register_by_name("metrics_port", 9090u16, RegistrationMode::Safe)
        .unwrap();

    assert_eq!(*registry.get_required::<u16>(), 80);
    assert_eq!(*registry.get_named_required::<u16>("admin_port"), 8080);
    assert_eq!(*registry.get_named_required::<u16>("metrics_port"), 9090);
    assert_eq!(registry.len(), 3);
}

#[test]
fn test_pointer_keys_rejected() {
    let mut registry = Registry::new();

    assert!(matches!(
        registry.register_value(Box::new(Mailer), RegistrationMode::Safe),
        Err(DiError::InvalidRegistration { .. })
    ));
    assert!(matches!(
        registry.register_value(Arc::new(Mailer), RegistrationMode::Safe),
        Err(DiError::InvalidRegistration { .. })
    ));
    assert!(matches!(
        registry.register_value("static str", RegistrationMode::Safe),
        Err(DiError::InvalidRegistration { .. })
    ));
    assert!(matches!(
        registry.register_by_name("boxed", Box::new(1u8), RegistrationMode::Safe),
        Err(DiError::InvalidRegistration { .. })
    ));
    assert!(matches!(
        registry.declare(TypeKey::of::<Arc<Mailer>>(), Lifetime::Singleton, RegistrationMode::Safe),
        Err(DiError::InvalidRegistration { .. })
    ));

    assert!(registry.is_empty());
}

#[test]
fn test_pointer_check_precedes_duplicate_check() {
    let mut registry = Registry::new();
    registry
        .register_by_name("shared", 1u8, RegistrationMode::Safe)
        .unwrap();

    assert!(matches!(
        registry.register_by_name("shared", Arc::new(2u8), RegistrationMode::Safe),
        Err(DiError::InvalidRegistration { .. })
    ));
}

#[derive(Debug, PartialEq)]
struct SmtpConfig {
    port: u16,
}

#[test]
fn test_shared_value_registered_by_name_keeps_identity() {
    let config = Arc::new(SmtpConfig { port: 587 });

    let mut registry = Registry::new();
    registry
        .register_arc_by_name("smtp", Arc::clone(&config), RegistrationMode::Safe)
        .unwrap();
    let registry = Arc::new(registry);

    let from_root = registry.get_named_required::<SmtpConfig>("smtp");
    assert!(Arc::ptr_eq(&config, &from_root));
    assert!(Arc::ptr_eq(&config, &registry.fork().unwrap().get_named_required::<SmtpConfig>("smtp")));

    let info = &registry.descriptors()[0];
    assert!(info.type_name.ends_with("SmtpConfig"));
    assert_eq!(info.name.as_deref(), Some("smtp"));
    assert!(info.cached);
}

#[test]
fn test_shared_value_by_name_follows_name_rules() {
    let mut registry = Registry::new();
    registry
        .register_arc_by_name("smtp", Arc::new(SmtpConfig { port: 25 }), RegistrationMode::Safe)
        .unwrap();

    assert!(matches!(
        registry.register_arc_by_name("smtp", Arc::new(1u8), RegistrationMode::Safe),
        Err(DiError::DuplicateKey(Key::Named(_)))
    ));
    assert!(matches!(
        registry.register_arc_by_name("", Arc::new(1u8), RegistrationMode::Safe),
        Err(DiError::InvalidRegistration { .. })
    ));
    assert!(matches!(
        registry.get_named::<u8>("smtp"),
        Err(DiError::WrongType { .. })
    ));
    assert_eq!(registry.get_named_required::<SmtpConfig>("smtp").port, 25);
}

#[test]
#[should_panic(expected = "Invalid registration")]
fn test_pointer_keys_fail_fast() {
    let mut registry = Registry::new();
    let _ = registry.register_value(Arc::new(Mailer), RegistrationMode::FailFast);
}

#[test]
fn test_chained_registration() {
    let mut registry = Registry::new();
    registry
        .register_singleton::<Mailer>(RegistrationMode::Safe)
        .and_then(|r| r.register_value(3u32, RegistrationMode::Safe))
        .and_then(|r| r.register_by_name("sender", "noreply".to_string(), RegistrationMode::Safe))
        .unwrap();

    assert_eq!(registry.len(), 3);
}
