use bizhub_domain::config::{ApiConfig, LoggingConfig, RequirementConfig, ServerConfig};
use serde_json::json;

#[test]
fn config_defaults_are_sane() {
    let server = ServerConfig::default();
    assert_eq!(server.port, 4680);
    assert!(server.ssl.is_none());
    assert!(!server.trusted_identity_headers);

    let logging = LoggingConfig::default();
    assert_eq!(logging.level, "info");
    assert!(logging.console);
    assert!(logging.directory.is_none());

    let cfg = ApiConfig::default();
    assert!(cfg.entitlements.catalog_path.is_none());
    assert!(cfg.entitlements.requirements.is_empty());
}

#[test]
fn api_config_deserializes_requirements() {
    let raw = json!({
        "server": { "address": "::", "port": 8080 },
        "entitlements": {
            "catalog_path": "/etc/bizhub/catalog.json",
            "requirements": [
                { "group": "crm", "requires": ["CRM.CONTACTS"] },
                { "group": "crm", "operation": "segments.export", "requires": ["CRM.EXPORT"] }
            ]
        }
    });

    let cfg: ApiConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.server.port, 8080);
    assert_eq!(cfg.logging.level, "info");
    assert_eq!(
        cfg.entitlements.requirements[1],
        RequirementConfig {
            group: "crm".to_owned(),
            operation: Some("segments.export".to_owned()),
            requires: vec!["CRM.EXPORT".to_owned()],
        }
    );
}

#[test]
fn requirement_rejects_unknown_fields() {
    let raw = json!({ "group": "crm", "require": ["CRM.CONTACTS"] });
    assert!(serde_json::from_value::<RequirementConfig>(raw).is_err());
}

#[test]
fn config_clones_share_until_mutated() {
    let base = ApiConfig::default();
    let mut changed = base.clone();
    changed.server.port = 9000;

    assert_eq!(base.server.port, 4680);
    assert_eq!(changed.server.port, 9000);
}
