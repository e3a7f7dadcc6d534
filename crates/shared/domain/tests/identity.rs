use bizhub_domain::identity::{ActorId, Role, TenantId};
use std::str::FromStr;

#[test]
fn roles_parse_and_classify() {
    assert_eq!(Role::from_str("Admin"), Ok(Role::Admin));
    assert_eq!(Role::from_str("owner"), Ok(Role::Owner));
    assert!(Role::from_str("root").is_err());

    assert!(Role::Owner.is_elevated());
    assert!(Role::Admin.is_elevated());
    assert!(!Role::Manager.is_elevated());
    assert!(!Role::Member.is_elevated());
}

#[test]
fn ids_serialize_transparently() {
    let tenant = TenantId::from("acme");
    assert_eq!(serde_json::to_string(&tenant).unwrap(), "\"acme\"");
    assert_eq!(ActorId::new("u-1").as_str(), "u-1");
    assert_eq!(tenant.to_string(), "acme");
}
