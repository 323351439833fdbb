//! Category A: option registry and naming (F001-F008).

use std::collections::HashSet;

use hostbench_config::{
    ConfigError, ENV_VAR_NAME_PREFIX, HarnessConfig, OptionKind, OptionMetadata, OptionRegistry,
    SHARED_DATA_PER_PROCESS_OPTION_NAME, SHARED_DATA_PER_REQUEST_OPTION_NAME,
    env_var_name_for_option, option_name_for_env_var,
};
use proptest::prelude::*;

/// F001: every registered option maps to a distinct env var.
#[test]
fn f001_env_var_names_distinct() {
    let registry = OptionRegistry::build().unwrap();
    let vars: HashSet<String> = registry.names().map(env_var_name_for_option).collect();
    assert_eq!(vars.len(), registry.len());
}

/// F002: the naming convention is a pure function of the option name.
#[test]
fn f002_env_var_names_stable() {
    let first = OptionRegistry::build().unwrap();
    let second = OptionRegistry::build().unwrap();
    for name in first.names() {
        assert_eq!(
            first.env_var_name(name).unwrap(),
            second.env_var_name(name).unwrap()
        );
        assert_eq!(
            first.env_var_name(name).unwrap(),
            env_var_name_for_option(name)
        );
    }
}

/// F003: the payload options use the well-known variable names.
#[test]
fn f003_payload_env_var_names() {
    assert_eq!(
        env_var_name_for_option(SHARED_DATA_PER_PROCESS_OPTION_NAME),
        "ELASTIC_APM_PHP_TESTS_SHARED_DATA_PER_PROCESS"
    );
    assert_eq!(
        env_var_name_for_option(SHARED_DATA_PER_REQUEST_OPTION_NAME),
        "ELASTIC_APM_PHP_TESTS_SHARED_DATA_PER_REQUEST"
    );
}

/// F004: building the registry twice yields identical contents.
#[test]
fn f004_registry_build_idempotent() {
    let first: Vec<_> = OptionRegistry::build().unwrap().names().collect();
    let second: Vec<_> = OptionRegistry::build().unwrap().names().collect();
    assert_eq!(first, second);
    assert!(first.contains(&SHARED_DATA_PER_PROCESS_OPTION_NAME));
    assert!(first.contains(&SHARED_DATA_PER_REQUEST_OPTION_NAME));
}

/// F005: a duplicate option name is rejected, not silently replaced.
#[test]
fn f005_duplicate_option_rejected() {
    let err = OptionRegistry::from_entries([
        OptionMetadata::new("dup", OptionKind::NullableString),
        OptionMetadata::new("dup", OptionKind::Bool { default: true }),
    ])
    .unwrap_err();
    assert!(matches!(err, ConfigError::Configuration(_)));
}

/// F006: an unknown option name is a configuration error.
#[test]
fn f006_unknown_option_lookup() {
    let registry = OptionRegistry::build().unwrap();
    assert!(registry.get("no_such_option").is_none());
    assert!(matches!(
        registry.lookup("no_such_option"),
        Err(ConfigError::Configuration(_))
    ));
}

/// F007: a malformed payload is a deserialization error naming its option.
#[test]
fn f007_malformed_payload_rejected() {
    let registry = OptionRegistry::build().unwrap();
    let err = HarnessConfig::from_lookup(&registry, |var| {
        (var == env_var_name_for_option(SHARED_DATA_PER_PROCESS_OPTION_NAME))
            .then(|| "{not valid json".to_string())
    })
    .unwrap_err();

    match err {
        ConfigError::Deserialization { option, raw, .. } => {
            assert_eq!(option, SHARED_DATA_PER_PROCESS_OPTION_NAME);
            assert_eq!(raw, "{not valid json");
        }
        other => panic!("expected deserialization error, got {other:?}"),
    }
}

proptest! {
    /// F008: naming round-trips and never collides for valid option names.
    #[test]
    fn f008_naming_injective(a in "[a-z][a-z0-9_]{0,24}", b in "[a-z][a-z0-9_]{0,24}") {
        let var_a = env_var_name_for_option(&a);
        prop_assert!(var_a.starts_with(ENV_VAR_NAME_PREFIX));
        prop_assert_eq!(option_name_for_env_var(&var_a), Some(a.clone()));
        if a != b {
            prop_assert_ne!(var_a, env_var_name_for_option(&b));
        }
    }
}
