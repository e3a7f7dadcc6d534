use bizhub_domain::identity::{ActorId, TenantId};
use bizhub_entitlements::*;
use proptest::prelude::*;
use std::sync::Arc;

#[derive(Debug, Clone)]
enum Op {
    Enable(usize),
    Disable(usize),
    Initialize,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => any::<usize>().prop_map(Op::Enable),
        3 => any::<usize>().prop_map(Op::Disable),
        1 => Just(Op::Initialize),
    ]
}

/// Every enabled code has its requirements enabled and none of its conflicts.
fn assert_consistent(
    catalog: &Catalog,
    service: &EntitlementService,
    tenant: &TenantId,
) -> Result<(), TestCaseError> {
    let enabled = service.enabled_codes(tenant).unwrap();
    for code in &enabled {
        let entry = catalog.get(code.as_str()).unwrap();
        prop_assert!(entry.required_submodules.is_subset(&enabled), "{code} lacks requirements");
        prop_assert!(entry.conflicts_with.is_disjoint(&enabled), "{code} conflicts");
    }
    Ok(())
}

proptest! {
    #[test]
    fn random_changes_keep_the_enabled_set_consistent(ops in proptest::collection::vec(op(), 0..64)) {
        let catalog = Arc::new(Catalog::standard().unwrap());
        let service = EntitlementService::new(catalog.clone(), Arc::new(MemoryStore::new()));
        let tenant = TenantId::from("prop");
        let actor = ActorId::from("u-prop");
        let codes: Vec<_> = catalog.all().iter().map(|e| e.code.clone()).collect();

        for op in ops {
            match op {
                Op::Enable(i) => {
                    let code = &codes[i % codes.len()];
                    if service.enable(&tenant, code, &actor).is_ok() {
                        prop_assert!(service.is_enabled(&tenant, code).unwrap());
                    }
                },
                Op::Disable(i) => {
                    let code = &codes[i % codes.len()];
                    let entry = catalog.get(code.as_str()).unwrap();
                    let was_enabled = service.is_enabled(&tenant, code).unwrap();
                    let has_enabled_dependent = catalog
                        .dependents_of(code.as_str())
                        .any(|d| service.is_enabled(&tenant, &d.code).unwrap());

                    let result = service.disable(&tenant, code);
                    if entry.default_enabled {
                        let protected = matches!(
                            result,
                            Err(EntitlementError::Validation { reason: ValidationFailure::Protected, .. })
                        );
                        prop_assert!(protected);
                    } else {
                        prop_assert_eq!(result.is_err(), has_enabled_dependent);
                        prop_assert!(!service.is_enabled(&tenant, code).unwrap() || has_enabled_dependent);
                        if !has_enabled_dependent {
                            prop_assert_eq!(result.unwrap(), was_enabled);
                        }
                    }
                },
                Op::Initialize => {
                    service.initialize_defaults(&tenant, &actor).unwrap();
                    for entry in catalog.defaults() {
                        prop_assert!(service.is_enabled(&tenant, &entry.code).unwrap());
                    }
                },
            }
            assert_consistent(&catalog, &service, &tenant)?;
        }
    }
}
