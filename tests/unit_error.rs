/// Unit tests for DiError and DiResult types

use ioc_registry::{key_of_type, DiError, DiResult, Key};
use std::error::Error;

#[test]
fn test_error_display_not_found() {
    let error = DiError::NotFound(key_of_type::<u32>());
    let display_str = format!("{}", error);
    assert_eq!(display_str, "Item not found: type 'u32'");

    let error = DiError::NotFound(Key::Named("db_url".to_string()));
    assert_eq!(error.to_string(), "Item not found: name 'db_url'");
}

#[test]
fn test_error_display_duplicate() {
    let error = DiError::DuplicateKey(Key::Named("cfg".to_string()));
    assert_eq!(error.to_string(), "Item already registered: name 'cfg'");
}

#[test]
fn test_error_display_circular() {
    let path = vec!["ServiceA".to_string(), "ServiceB".to_string(), "ServiceA".to_string()];
    let error = DiError::Circular(path);
    let display_str = format!("{}", error);
    assert_eq!(display_str, "Circular dependency: ServiceA -> ServiceB -> ServiceA");
}

#[test]
fn test_error_display_depth_exceeded() {
    let error = DiError::DepthExceeded(100);
    assert_eq!(error.to_string(), "Max depth 100 exceeded");
}

#[test]
fn test_error_display_scope_errors() {
    assert_eq!(
        DiError::ScopeRequired(key_of_type::<u8>()).to_string(),
        "Cannot resolve scoped item type 'u8' outside a scope"
    );
    assert_eq!(
        DiError::AlreadyScoped.to_string(),
        "Cannot create a scope from a scoped registry"
    );
}

#[test]
fn test_error_display_injection_errors() {
    let error = DiError::InvalidInjectionTarget {
        field: "db".to_string(),
        field_type: "u32",
    };
    let display_str = error.to_string();
    assert!(display_str.contains("'db'"));
    assert!(display_str.contains("u32"));
    assert!(display_str.contains("Option<Arc<_>>"));

    let error = DiError::TypeMismatch {
        field: "port".to_string(),
        target: "name 'port'".to_string(),
    };
    assert_eq!(
        error.to_string(),
        "Field 'port' does not match the type of item name 'port'"
    );
}

#[test]
fn test_error_display_registration_errors() {
    let error = DiError::InvalidRegistration {
        item: "alloc::boxed::Box<u8>".to_string(),
        reason: "pointer, reference and smart-pointer types cannot be registered",
    };
    assert!(error.to_string().starts_with("Invalid registration of alloc::boxed::Box<u8>: "));

    let error = DiError::UnknownType(key_of_type::<u8>());
    assert_eq!(error.to_string(), "Cannot create instance of type 'u8': unknown type");
}

#[test]
fn test_error_display_lookup_errors() {
    let error = DiError::WrongType {
        item: Key::Named("port".to_string()),
        requested: "u32",
    };
    assert_eq!(error.to_string(), "Item name 'port' is not a u32");

    let error = DiError::NilInstance(key_of_type::<u8>());
    assert_eq!(error.to_string(), "Item type 'u8' resolved to no instance");
}

#[test]
fn test_error_is_std_error() {
    let error = DiError::AlreadyScoped;
    let as_error: &dyn Error = &error;
    assert!(as_error.source().is_none());
}

#[test]
fn test_error_clone_and_debug() {
    let error = DiError::Circular(vec!["A".to_string(), "A".to_string()]);
    let cloned = error.clone();
    assert_eq!(format!("{:?}", error), format!("{:?}", cloned));
}

#[test]
fn test_diresult_err() {
    let result: DiResult<String> = Err(DiError::DepthExceeded(3));
    assert!(matches!(result, Err(DiError::DepthExceeded(3))));
}
