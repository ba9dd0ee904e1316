/// Configuration loading tests
///
/// Environment variables are process-global, so every test touching them
/// runs serially.

use ioc_registry::config::{ENV_LOG_RESOLUTIONS, ENV_MAX_DEPTH};
use ioc_registry::{ConfigError, DiError, Injectable, Registry, RegistryConfig, RegistrationMode, Resolver};
use serial_test::serial;
use std::env;
use std::sync::Arc;

fn clear_env() {
    env::remove_var(ENV_MAX_DEPTH);
    env::remove_var(ENV_LOG_RESOLUTIONS);
}

#[test]
#[serial]
fn test_defaults_without_environment() {
    clear_env();

    let config = RegistryConfig::from_env().unwrap();
    assert_eq!(config, RegistryConfig::default());
    assert_eq!(config.max_depth, 1024);
    assert!(!config.log_resolutions);
}

#[test]
#[serial]
fn test_environment_overrides() {
    clear_env();
    env::set_var(ENV_MAX_DEPTH, "16");
    env::set_var(ENV_LOG_RESOLUTIONS, "yes");

    let config = RegistryConfig::from_env().unwrap();
    clear_env();

    assert_eq!(config.max_depth, 16);
    assert!(config.log_resolutions);
}

#[test]
#[serial]
fn test_invalid_environment_values() {
    clear_env();
    env::set_var(ENV_MAX_DEPTH, "deep");
    let err = RegistryConfig::from_env().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { key, .. } if key == ENV_MAX_DEPTH));

    clear_env();
    env::set_var(ENV_LOG_RESOLUTIONS, "sometimes");
    let err = RegistryConfig::from_env().unwrap_err();
    assert!(err.to_string().contains("sometimes"));

    clear_env();
    env::set_var(ENV_MAX_DEPTH, "0");
    assert!(matches!(RegistryConfig::from_env(), Err(ConfigError::ZeroDepth)));

    clear_env();
}

#[derive(Default, Injectable)]
struct Outer {
    #[inject]
    inner: Option<Arc<Inner>>,
}

#[derive(Default, Injectable)]
struct Inner;

#[test]
#[serial]
fn test_environment_depth_reaches_resolution() {
    clear_env();
    env::set_var(ENV_MAX_DEPTH, "1");
    let config = RegistryConfig::from_env().unwrap();
    clear_env();

    let mut registry = Registry::with_config(config);
    registry
        .register_transient::<Outer>(RegistrationMode::Safe)
        .unwrap()
        .register_transient::<Inner>(RegistrationMode::Safe)
        .unwrap();

    assert!(registry.get::<Inner>().is_ok());
    assert!(matches!(registry.get::<Outer>(), Err(DiError::DepthExceeded(1))));
}

#[test]
fn test_forks_inherit_configuration() {
    let config = RegistryConfig {
        max_depth: 8,
        log_resolutions: true,
    };
    let registry = Arc::new(Registry::with_config(config.clone()));
    let scope = registry.fork().unwrap();

    assert_eq!(scope.config(), &config);
}

#[cfg(feature = "config")]
#[test]
fn test_json_configuration() {
    let config = RegistryConfig::from_json(r#"{ "max_depth": 32, "log_resolutions": true }"#).unwrap();
    assert_eq!(config.max_depth, 32);
    assert!(config.log_resolutions);

    let partial = RegistryConfig::from_json("{}").unwrap();
    assert_eq!(partial, RegistryConfig::default());

    assert!(matches!(
        RegistryConfig::from_json(r#"{ "max_depth": 0 }"#),
        Err(ConfigError::ZeroDepth)
    ));
    assert!(matches!(RegistryConfig::from_json("not json"), Err(ConfigError::Json(_))));
}

#[cfg(feature = "config")]
#[test]
fn test_lifetime_serde_names() {
    use ioc_registry::Lifetime;

    assert_eq!(serde_json::to_string(&Lifetime::Scoped).unwrap(), "\"scoped\"");
    let parsed: Lifetime = serde_json::from_str("\"transient\"").unwrap();
    assert_eq!(parsed, Lifetime::Transient);
}
