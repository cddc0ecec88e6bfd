//! Identity allocation and release across mocks and threads

use mockwork_core::prelude::*;
use mockwork_core::MockIdentity;
use mockwork_test_utils::isolated_registry;
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

#[test]
fn test_identities_are_sequential_per_type() {
    let registry = isolated_registry();
    let build = |name: &str| {
        MockBuilder::new(name)
            .registry(Arc::clone(&registry))
            .build()
            .unwrap()
    };

    let a1 = build("Foo::Bar");
    let a2 = build("Foo::Bar");
    let b1 = build("Other");

    assert_eq!(a1.identity().to_string(), "Foo_Bar#1");
    assert_eq!(a2.identity().to_string(), "Foo_Bar#2");
    assert_eq!(b1.identity().to_string(), "Other#1");
    assert_eq!(registry.live_count(), 3);
}

#[test]
fn test_identity_isa_distinguishes_instances() {
    let registry = isolated_registry();
    let first = MockBuilder::new("Foo").registry(Arc::clone(&registry)).build().unwrap();
    let second = MockBuilder::new("Foo").registry(registry).build().unwrap();

    let first_id: Value = first.identity().to_string().into();
    assert_eq!(first.call("isa", &[first_id.clone()]).unwrap(), Value::Bool(true));
    assert_eq!(second.call("isa", &[first_id]).unwrap(), Value::Bool(false));
}

#[test]
fn test_drop_releases_exactly_once() {
    let registry = isolated_registry();
    let mock = MockBuilder::new("Foo").registry(Arc::clone(&registry)).build().unwrap();
    let identity = mock.identity().clone();

    assert!(mock.dispose());
    assert!(!registry.is_live(&identity));
    drop(mock);

    // a double release through the registry is harmless too
    assert!(!registry.release(&identity));
    assert_eq!(registry.release_str(&identity.to_string()), Ok(false));
}

#[test]
fn test_live_identities_never_reused() {
    let registry = isolated_registry();
    let mut seen = HashSet::new();

    for round in 0..5 {
        let mocks: Vec<Mock> = (0..10)
            .map(|_| MockBuilder::new("Foo").registry(Arc::clone(&registry)).build().unwrap())
            .collect();
        for mock in &mocks {
            assert!(seen.insert(mock.identity().clone()), "reused in round {round}");
        }
    }
    assert_eq!(registry.allocated("Foo"), 50);
    assert_eq!(registry.live_count(), 0);
}

#[test]
fn test_concurrent_allocation_is_unique() {
    let registry = isolated_registry();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                (0..250)
                    .map(|_| registry.allocate("Shared::Type"))
                    .collect::<Vec<MockIdentity>>()
            })
        })
        .collect();

    let mut all = HashSet::new();
    for handle in handles {
        for identity in handle.join().unwrap() {
            assert!(all.insert(identity));
        }
    }
    assert_eq!(all.len(), 2000);
    assert_eq!(registry.allocated("Shared::Type"), 2000);
}

#[test]
fn test_global_registry_is_shared() {
    let a = MockBuilder::new("Global::Probe").build().unwrap();
    let b = MockBuilder::new("Global::Probe").build().unwrap();

    assert!(Arc::ptr_eq(a.registry(), &MockRegistry::global()));
    assert!(b.identity().serial() > a.identity().serial());
}
