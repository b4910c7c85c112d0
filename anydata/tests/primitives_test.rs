//! Integration tests for the terminal value generators

mod common;

use anydata::{Any, AnyConfig, AnyError, CharSet, DateTimeSpec, IntSpec, StringSpec, TimeSpanSpec};
use chrono::{Datelike, Local, TimeDelta};

#[test]
fn test_prefixed_string_of_exact_length() {
    common::init_tracing();

    let mut any = Any::new();
    let name = any
        .string_with(&StringSpec::prefixed("Name").length(101))
        .unwrap();
    assert!(name.starts_with("Name"));
    assert_eq!(name.chars().count(), 101);
    assert!(name.chars().all(|c| c.is_ascii_alphanumeric()));
}

#[test]
fn test_prefix_longer_than_length_is_rejected() {
    let mut any = Any::new();
    let err = any
        .string_with(&StringSpec::prefixed("Customer").length(3))
        .unwrap_err();
    assert!(matches!(err, AnyError::InvalidArgument { .. }));
}

#[test]
fn test_signed_three_digit_ints() {
    let mut any = Any::new();
    let spec = IntSpec::digits(3).only_positive(false);
    let mut saw_negative = false;
    for _ in 0..2_000 {
        let value = any.int_with(&spec).unwrap();
        assert!((-998..999).contains(&value), "{value} out of range");
        saw_negative |= value < 0;
    }
    assert!(saw_negative);
}

#[test]
fn test_ranges_and_zero() {
    let mut any = Any::seeded(11);
    for _ in 0..500 {
        let value = any.int_with(&IntSpec::range(-3, 3).allow_zero(false)).unwrap();
        assert!((-3..3).contains(&value));
        assert_ne!(value, 0);
    }
    assert!(any.int_with(&IntSpec::range(5, 5)).is_err());
    assert!(any.int_with(&IntSpec::digits(11)).is_err());
}

#[test]
fn test_exclude_defaults() {
    let mut any = Any::seeded(12)
        .with_config(AnyConfig::default().exclude_defaults(true))
        .unwrap();
    for _ in 0..500 {
        assert_ne!(any.int_with(&IntSpec::digits(1)).unwrap(), 0);
        assert_ne!(any.byte(), 0);
        assert!(!any.time_span_with(&TimeSpanSpec::new().seconds(1)).unwrap().is_zero());
    }
}

#[test]
fn test_dates_follow_the_local_clock() {
    let mut any = Any::new();
    for _ in 0..200 {
        let before = Local::now().naive_local();
        let future = any.date_time().unwrap();
        assert!(future > before - TimeDelta::seconds(1));
        assert_eq!(future.and_utc().timestamp_subsec_nanos(), 0);

        let past = any.date_time_with(&DateTimeSpec::past()).unwrap();
        assert!(past < Local::now().naive_local());
        assert!(past.year() >= 1900);
    }
}

#[test]
fn test_time_span_bounds() {
    let mut any = Any::new();
    let spec = TimeSpanSpec::new().hours(2).minutes(30);
    for _ in 0..500 {
        let span = any.time_span_with(&spec).unwrap();
        assert!(span <= TimeDelta::hours(2) + TimeDelta::minutes(30));
        assert!(span >= TimeDelta::zero());
    }

    let unbounded = any.time_span().unwrap();
    assert!(unbounded < TimeDelta::days(10));

    assert!(any.time_span_with(&TimeSpanSpec::new().hours(24)).is_err());
    assert!(any.time_span_with(&TimeSpanSpec::new().days(0).hours(0)).is_err());
}

#[test]
fn test_text_shapes() {
    let mut any = Any::new();

    let email = any.email_address();
    assert!(email.to_string().ends_with(".any"));
    assert_eq!(email.to_string(), format!("{}@{}", email.local(), email.domain()));

    let uri = any.uri_with("ftp").unwrap();
    assert_eq!(uri.scheme(), "ftp");
    assert!(uri.to_string().starts_with("ftp://"));
    assert!(any.uri_with("not a scheme").is_err());

    let ascii = any
        .string_with(&StringSpec::prefixed("").length(64).charset(CharSet::Ascii))
        .unwrap();
    assert!(ascii.chars().all(|c| (33..=126).contains(&(c as u32))));

    let encoded = any.base64_string(&StringSpec::default()).unwrap();
    assert!(encoded.len() % 4 == 0);
}
