use bizhub_domain::identity::{ActorId, TenantId};
use bizhub_domain::submodule::{ModuleCode, SubmoduleCode};
use bizhub_entitlements::*;
use chrono::Utc;
use std::sync::{Arc, Barrier};

fn code(raw: &str) -> SubmoduleCode {
    SubmoduleCode::from(raw)
}

fn crm(raw: &str, category: Category) -> CatalogEntry {
    CatalogEntry::new(raw, ModuleCode::Crm, raw, category)
}

fn catalog() -> Catalog {
    Catalog::builder()
        .entry(crm("CRM.CORE", Category::Included).default_enabled())
        .entry(crm("CRM.SEGMENTS", Category::Included))
        .entry(crm("CRM.EXPORT", Category::Addon).requires(["CRM.SEGMENTS"]))
        .entry(crm("CRM.MAILCHIMP", Category::Addon).requires(["CRM.EXPORT"]).conflicts(["CRM.SENDGRID"]))
        .entry(crm("CRM.SENDGRID", Category::Addon).conflicts(["CRM.MAILCHIMP"]))
        .entry(crm("CRM.LEGACY", Category::Included).inactive())
        .build()
        .unwrap()
}

struct Fixture {
    service: EntitlementService,
    store: Arc<MemoryStore>,
    tenant: TenantId,
    actor: ActorId,
}

fn fixture() -> Fixture {
    let store = Arc::new(MemoryStore::new());
    let service = EntitlementService::new(Arc::new(catalog()), store.clone());
    Fixture { service, store, tenant: TenantId::from("acme"), actor: ActorId::from("u-admin") }
}

impl Fixture {
    fn enable(&self, raw: &str) -> Result<EntitlementRecord, EntitlementError> {
        self.service.enable(&self.tenant, &code(raw), &self.actor)
    }

    fn disable(&self, raw: &str) -> Result<bool, EntitlementError> {
        self.service.disable(&self.tenant, &code(raw))
    }

    fn is_enabled(&self, raw: &str) -> bool {
        self.service.is_enabled(&self.tenant, &code(raw)).unwrap()
    }

    fn batch(&self, codes: &[&str]) -> BatchOutcome {
        let codes: Vec<_> = codes.iter().copied().map(code).collect();
        self.service.batch_enable(&self.tenant, &codes, &self.actor)
    }
}

fn validation_reason(err: EntitlementError) -> ValidationFailure {
    match err {
        EntitlementError::Validation { reason, .. } => reason,
        other => panic!("expected a validation error, got {other:?}"),
    }
}

#[test]
fn dependency_must_be_enabled_first() {
    let f = fixture();

    let reason = validation_reason(f.enable("CRM.EXPORT").unwrap_err());
    assert_eq!(reason, ValidationFailure::MissingDependencies { missing: vec![code("CRM.SEGMENTS")] });
    assert!(!f.is_enabled("CRM.EXPORT"));

    f.enable("CRM.SEGMENTS").unwrap();
    f.enable("CRM.EXPORT").unwrap();
    assert!(f.is_enabled("CRM.SEGMENTS"));
    assert!(f.is_enabled("CRM.EXPORT"));
}

#[test]
fn batch_dependent_before_requirement_fails() {
    let f = fixture();

    let outcome = f.batch(&["CRM.EXPORT", "CRM.SEGMENTS"]);

    assert_eq!(outcome.enabled, [code("CRM.SEGMENTS")]);
    assert!(outcome.skipped.is_empty());
    assert_eq!(outcome.errors, ["CRM.EXPORT: Missing required submodules: CRM.SEGMENTS"]);
}

#[test]
fn batch_requirement_before_dependent_succeeds() {
    let f = fixture();

    let outcome = f.batch(&["CRM.SEGMENTS", "CRM.EXPORT"]);

    assert_eq!(outcome.enabled, [code("CRM.SEGMENTS"), code("CRM.EXPORT")]);
    assert!(outcome.skipped.is_empty());
    assert!(outcome.errors.is_empty());
}

#[test]
fn batch_skips_unknown_codes() {
    let f = fixture();

    let outcome = f.batch(&["GHOST.CODE"]);

    assert_eq!(outcome, BatchOutcome { skipped: vec![code("GHOST.CODE")], ..BatchOutcome::default() });
}

#[test]
fn batch_keeps_going_after_failures() {
    let f = fixture();

    let outcome = f.batch(&["CRM.LEGACY", "GHOST.CODE", "CRM.SEGMENTS", "CRM.SEGMENTS"]);

    assert_eq!(outcome.enabled, [code("CRM.SEGMENTS"), code("CRM.SEGMENTS")]);
    assert_eq!(outcome.skipped, [code("GHOST.CODE")]);
    assert_eq!(outcome.errors.len(), 1);
    assert!(outcome.errors[0].starts_with("CRM.LEGACY: "), "{:?}", outcome.errors);
}

#[test]
fn default_enabled_is_protected_in_any_state() {
    let f = fixture();

    assert_eq!(validation_reason(f.disable("CRM.CORE").unwrap_err()), ValidationFailure::Protected);

    f.service.initialize_defaults(&f.tenant, &f.actor).unwrap();
    f.enable("CRM.SEGMENTS").unwrap();
    assert_eq!(validation_reason(f.disable("CRM.CORE").unwrap_err()), ValidationFailure::Protected);
    assert!(f.is_enabled("CRM.CORE"));
}

#[test]
fn conflicts_are_rejected_with_the_conflicting_codes() {
    let f = fixture();
    f.enable("CRM.SENDGRID").unwrap();
    f.enable("CRM.SEGMENTS").unwrap();
    f.enable("CRM.EXPORT").unwrap();

    let reason = validation_reason(f.enable("CRM.MAILCHIMP").unwrap_err());
    assert_eq!(reason, ValidationFailure::Conflicts { conflicts: vec![code("CRM.SENDGRID")] });

    f.disable("CRM.SENDGRID").unwrap();
    f.enable("CRM.MAILCHIMP").unwrap();
}

#[test]
fn disable_is_blocked_only_by_enabled_dependents() {
    let f = fixture();
    f.enable("CRM.SEGMENTS").unwrap();
    f.enable("CRM.EXPORT").unwrap();

    let reason = validation_reason(f.disable("CRM.SEGMENTS").unwrap_err());
    assert_eq!(reason, ValidationFailure::HasDependents { dependents: vec![code("CRM.EXPORT")] });

    assert!(f.disable("CRM.EXPORT").unwrap());
    assert!(f.disable("CRM.SEGMENTS").unwrap());
}

#[test]
fn is_enabled_follows_enable_and_disable() {
    let f = fixture();

    assert!(!f.is_enabled("CRM.SEGMENTS"));
    f.enable("CRM.SEGMENTS").unwrap();
    assert!(f.is_enabled("CRM.SEGMENTS"));
    f.disable("CRM.SEGMENTS").unwrap();
    assert!(!f.is_enabled("CRM.SEGMENTS"));
    f.enable("CRM.SEGMENTS").unwrap();
    assert!(f.is_enabled("CRM.SEGMENTS"));
}

#[test]
fn inactive_and_unknown_codes_cannot_be_enabled() {
    let f = fixture();

    assert_eq!(validation_reason(f.enable("CRM.LEGACY").unwrap_err()), ValidationFailure::Inactive);
    assert!(matches!(f.enable("CRM.NOPE"), Err(EntitlementError::NotFound { .. })));
    assert!(matches!(f.disable("CRM.NOPE"), Err(EntitlementError::NotFound { .. })));
}

#[test]
fn disabled_record_keeps_last_actor() {
    let f = fixture();
    let first = f.enable("CRM.SEGMENTS").unwrap();
    f.disable("CRM.SEGMENTS").unwrap();

    let record = f.store.find(&f.tenant, &code("CRM.SEGMENTS")).unwrap().unwrap();
    assert!(!record.is_enabled);
    assert!(record.enabled_at.is_none());
    assert_eq!(record.enabled_by, Some(f.actor.clone()));

    let again = f.service.enable(&f.tenant, &code("CRM.SEGMENTS"), &"u-other".into()).unwrap();
    assert!(again.enabled_at >= first.enabled_at);
    assert_eq!(again.enabled_by, Some(ActorId::from("u-other")));
}

#[test]
fn re_enable_refreshes_timestamp() {
    let f = fixture();
    let first = f.enable("CRM.SEGMENTS").unwrap();
    let second = f.enable("CRM.SEGMENTS").unwrap();

    assert!(second.enabled_at >= first.enabled_at);
    assert_eq!(f.store.records(&f.tenant).unwrap().len(), 1);
}

#[test]
fn initialize_defaults_is_idempotent() {
    let f = fixture();

    assert_eq!(f.service.initialize_defaults(&f.tenant, &f.actor).unwrap(), [code("CRM.CORE")]);
    assert!(f.is_enabled("CRM.CORE"));

    assert!(f.service.initialize_defaults(&f.tenant, &f.actor).unwrap().is_empty());
    assert_eq!(f.store.records(&f.tenant).unwrap().len(), 1);
}

#[test]
fn details_drop_codes_missing_from_the_catalog() {
    let f = fixture();
    f.enable("CRM.SEGMENTS").unwrap();
    f.store
        .upsert(EntitlementRecord::enabled(
            f.tenant.clone(),
            ModuleCode::Crm,
            code("CRM.RETIRED"),
            f.actor.clone(),
            Utc::now(),
        ))
        .unwrap();

    let details = f.service.enabled_with_details(&f.tenant).unwrap();

    assert_eq!(details.len(), 1);
    assert_eq!(details[0].entry.code, code("CRM.SEGMENTS"));
    assert_eq!(details[0].enabled_by, Some(f.actor.clone()));
    assert_eq!(f.service.enabled_codes(&f.tenant).unwrap().len(), 2);
}

#[test]
fn tenants_do_not_share_entitlements() {
    let f = fixture();
    f.enable("CRM.SEGMENTS").unwrap();

    let other = TenantId::from("globex");
    assert!(!f.service.is_enabled(&other, &code("CRM.SEGMENTS")).unwrap());
    assert!(matches!(
        f.service.enable(&other, &code("CRM.EXPORT"), &f.actor),
        Err(EntitlementError::Validation { .. })
    ));
}

#[test]
fn concurrent_conflicting_enables_admit_only_one() {
    let f = fixture();

    for round in 0..50 {
        let tenant = TenantId::from(format!("race-{round}"));
        f.service.enable(&tenant, &code("CRM.SEGMENTS"), &f.actor).unwrap();
        f.service.enable(&tenant, &code("CRM.EXPORT"), &f.actor).unwrap();

        let barrier = Barrier::new(2);
        let results: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = ["CRM.MAILCHIMP", "CRM.SENDGRID"]
                .into_iter()
                .map(|raw| {
                    let (service, tenant, actor, barrier) = (&f.service, &tenant, &f.actor, &barrier);
                    scope.spawn(move || {
                        barrier.wait();
                        service.enable(tenant, &code(raw), actor).is_ok()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(results.iter().filter(|ok| **ok).count(), 1, "{results:?}");
    }
}
