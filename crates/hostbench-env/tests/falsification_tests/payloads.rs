//! Category B: shared data payloads (F009-F014).

use std::collections::HashMap;

use hostbench_config::{
    AppCodeHostKind, ConfigError, HarnessConfig, OptionRegistry, OptionValue,
    SHARED_DATA_PER_PROCESS_OPTION_NAME, SharedDataPerProcess, SharedDataPerRequest,
    env_var_name_for_option,
};
use proptest::prelude::*;
use serde_json::json;
use uuid::Uuid;

/// F009: a payload survives transfer through the env-var channel.
#[test]
fn f009_payloads_survive_env_transfer() {
    let registry = OptionRegistry::build().unwrap();
    let per_process = SharedDataPerProcess::new(Uuid::new_v4(), 4242, AppCodeHostKind::CliScript)
        .with_extension("resourcesCleanerPort", json!(8126));
    let per_request = SharedDataPerRequest::new("Tests\\AppCode", "spanCreation")
        .with_arg("depth", json!(3))
        .expecting_throw();

    let env: HashMap<String, String> = [
        (
            env_var_name_for_option(SHARED_DATA_PER_PROCESS_OPTION_NAME),
            per_process.to_json().unwrap(),
        ),
        (
            registry.env_var_name("shared_data_per_request").unwrap(),
            per_request.to_json().unwrap(),
        ),
    ]
    .into_iter()
    .collect();

    let config = HarnessConfig::from_lookup(&registry, |var| env.get(var).cloned()).unwrap();
    assert_eq!(config.shared_data_per_process, Some(per_process));
    assert_eq!(config.shared_data_per_request, Some(per_request));
}

/// F010: absent payloads decode to nothing instead of failing.
#[test]
fn f010_absent_payloads_are_null() {
    let registry = OptionRegistry::build().unwrap();
    let meta = registry.lookup(SHARED_DATA_PER_PROCESS_OPTION_NAME).unwrap();
    assert_eq!(meta.default_value(), OptionValue::Null);
    assert_eq!(meta.parse_or_default(None).unwrap(), OptionValue::Null);
}

/// F011: valid JSON that is not an object is still rejected.
#[test]
fn f011_non_object_payload_rejected() {
    for raw in ["[]", "42", "\"text\"", "null"] {
        let err = SharedDataPerRequest::from_json(raw).unwrap_err();
        assert!(
            matches!(err, ConfigError::Deserialization { .. }),
            "{raw} decoded: {err:?}"
        );
    }
}

/// F012: unknown payload fields are rejected.
#[test]
fn f012_unknown_field_rejected() {
    let raw = r#"{"runId":"00000000-0000-0000-0000-000000000000","rootProcessId":1,"appCodeHostKind":"cli_script","surprise":true}"#;
    assert!(SharedDataPerProcess::from_json(raw).is_err());
}

/// F013: the per-request payload uses camelCase field names on the wire.
#[test]
fn f013_wire_field_names() {
    let json = SharedDataPerRequest::new("AppCode", "run").to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["appCodeClass"], "AppCode");
    assert_eq!(value["appCodeMethod"], "run");
    assert_eq!(value["isAppCodeExpectedToThrow"], false);
}

proptest! {
    /// F014: any per-request payload round-trips exactly.
    #[test]
    fn f014_per_request_roundtrip(
        class in "[A-Za-z\\\\]{1,32}",
        method in "[a-zA-Z_]{1,16}",
        arg in proptest::option::of(("[a-z]{1,8}", any::<i64>())),
        ratio in proptest::option::of(any::<f64>().prop_filter("finite", |f| f.is_finite())),
        throws in any::<bool>(),
    ) {
        let mut payload = SharedDataPerRequest::new(class, method);
        if let Some((key, value)) = arg {
            payload = payload.with_arg(key, json!(value));
        }
        if let Some(ratio) = ratio {
            payload = payload.with_arg("ratio", json!(ratio));
        }
        if throws {
            payload = payload.expecting_throw();
        }
        let decoded = SharedDataPerRequest::from_json(&payload.to_json().unwrap()).unwrap();
        prop_assert_eq!(decoded, payload);
    }
}
