//! Integration tests for generation without repeats

mod common;

use std::collections::HashSet;

use anydata::{Any, AnyConfig, AnyError, IntSpec, UniquePool};

#[test]
fn test_unique_values_never_repeat() {
    common::init_tracing();

    let mut any = Any::new();
    let mut pool = UniquePool::new();
    let mut unique = any.unique(&mut pool);

    let mut ints = HashSet::new();
    let mut strings = HashSet::new();
    for _ in 0..5_000 {
        assert!(ints.insert(unique.int().unwrap()));
        assert!(strings.insert(unique.string().unwrap()));
    }
    let emails: HashSet<String> = (0..500)
        .map(|_| unique.email().unwrap().to_string())
        .collect();
    assert_eq!(emails.len(), 500);
}

#[test]
fn test_small_domains_are_rejected() {
    let mut any = Any::new();
    let mut pool = UniquePool::new();
    let mut unique = any.unique(&mut pool);

    let err = unique.int_with(&IntSpec::digits(3)).unwrap_err();
    assert!(matches!(err, AnyError::InvalidArgument { .. }));
    assert!(unique.int_with(&IntSpec::range(0, 9_999)).is_err());
    assert!(unique.int_with(&IntSpec::range(0, 10_000)).is_ok());
}

#[test]
fn test_exhausted_range_reports_retries() {
    let mut any = Any::seeded(21)
        .with_config(AnyConfig::default().retry_limit(200))
        .unwrap();
    let mut pool = UniquePool::new();
    let mut unique = any.unique(&mut pool);

    let spec = IntSpec::range(0, 10_000);
    let mut result = Ok(0);
    for _ in 0..10_001 {
        result = unique.int_with(&spec);
        if result.is_err() {
            break;
        }
    }
    match result {
        Err(AnyError::ExhaustedRetries { attempts, .. }) => assert_eq!(attempts, 200),
        other => panic!("expected exhaustion, got {other:?}"),
    }
}

#[test]
fn test_pool_reset_allows_reuse() {
    let mut pool = UniquePool::new();

    let first = {
        let mut any = Any::seeded(9);
        any.unique(&mut pool).long().unwrap()
    };
    assert_eq!(pool.len_of::<i64>(), 1);

    // same seed replays the same draw, which the pool now rejects
    let second = {
        let mut any = Any::seeded(9);
        any.unique(&mut pool).long().unwrap()
    };
    assert_ne!(first, second);

    pool.reset();
    assert!(pool.is_empty());
    let third = {
        let mut any = Any::seeded(9);
        any.unique(&mut pool).long().unwrap()
    };
    assert_eq!(first, third);
}

#[test]
fn test_pools_are_independent() {
    let mut left = UniquePool::new();
    let mut right = UniquePool::new();

    let a = Any::seeded(3).unique(&mut left).guid().unwrap();
    let b = Any::seeded(3).unique(&mut right).guid().unwrap();
    assert_eq!(a, b);
}
