//! The [`Anonymous`] trait and its implementations for terminal types.
//!
//! Composite types get their implementation from `#[derive(Anonymous)]`;
//! collections live in [`collections`](crate::collections).

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::classify::TypeKind;
use crate::context::{Context, Request};
use crate::error::{AnyError, Result};
use crate::generator::Any;
use crate::primitives::{EmailAddress, IntSpec, StringSpec, Uri};

/// Types that can be generated anonymously
pub trait Anonymous: Sized + 'static {
    /// Generation category of the type
    fn kind() -> TypeKind;

    /// Produce a value for one member, or `None` to leave the member at its
    /// default (depth exhausted, collection not expandable, child failure)
    fn generate(cx: &mut Context<'_>, request: &Request) -> Result<Option<Self>>;

    /// Produce a value unconditionally; used for roots and collection elements
    fn instantiate(cx: &mut Context<'_>, request: &Request) -> Result<Self> {
        Self::generate(cx, request)?
            .ok_or_else(|| AnyError::unsupported::<Self>("no value could be generated"))
    }
}

/// Field-less enums whose variants can be listed in declaration order
pub trait Enumeration: Sized {
    fn variants() -> Vec<Self>;
}

/// Text for a string member, shaped by the member's name
fn member_string(cx: &mut Context<'_>, member: &str) -> Result<String> {
    let lower = member.to_lowercase();
    if lower.contains("email") || lower.contains("mailaddress") {
        return cx.draw(|any: &mut Any| Ok(format!("{}_{}", lower, any.email_address())));
    }
    if lower.contains("url") || lower.contains("website") {
        return cx.draw(|any: &mut Any| Ok(any.url()));
    }
    let spec = StringSpec::prefixed(member)
        .length(StringSpec::default().length + member.chars().count())
        .charset(cx.config().charset);
    cx.draw(|any: &mut Any| any.string_with(&spec))
}

// Wide values are routed through the context so an attached pool sees them.
macro_rules! impl_tracked_anonymous {
    ($($t:ty => $kind:ident, |$any:ident| $draw:expr;)*) => {
        $(
            impl Anonymous for $t {
                fn kind() -> TypeKind {
                    TypeKind::$kind
                }

                fn generate(cx: &mut Context<'_>, _request: &Request) -> Result<Option<Self>> {
                    cx.draw(|$any: &mut Any| -> Result<$t> { $draw }).map(Some)
                }
            }
        )*
    };
}

impl_tracked_anonymous! {
    i16 => Value, |any| Ok(any.short());
    u16 => Value, |any| Ok(any.ushort());
    u32 => Value, |any| Ok(any.uint());
    i64 => Value, |any| Ok(any.long());
    u64 => Value, |any| Ok(any.ulong());
    isize => Value, |any| Ok(any.long() as isize);
    usize => Value, |any| Ok(any.ulong() as usize);
    f32 => Value, |any| Ok(any.float());
    f64 => Value, |any| Ok(any.double());
    Decimal => Value, |any| Ok(any.decimal());
    Uuid => Value, |any| Ok(any.guid());
    NaiveDateTime => Value, |any| any.date_time();
    DateTime<Utc> => Value, |any| Ok(any.date_time()?.and_utc());
    TimeDelta => Value, |any| any.time_span();
    Uri => Reference, |any| Ok(any.uri());
    EmailAddress => Reference, |any| Ok(any.email_address());
}

impl Anonymous for i32 {
    fn kind() -> TypeKind {
        TypeKind::Value
    }

    fn generate(cx: &mut Context<'_>, _request: &Request) -> Result<Option<Self>> {
        // unique pools need the wider domain
        let digits = if cx.is_unique() { 5 } else { 3 };
        let spec = IntSpec::digits(digits).allow_zero(false);
        cx.draw(|any: &mut Any| any.int_with(&spec)).map(Some)
    }
}

impl Anonymous for String {
    fn kind() -> TypeKind {
        TypeKind::Reference
    }

    fn generate(cx: &mut Context<'_>, request: &Request) -> Result<Option<Self>> {
        member_string(cx, request.member).map(Some)
    }
}

impl Anonymous for bool {
    fn kind() -> TypeKind {
        TypeKind::Value
    }

    fn generate(cx: &mut Context<'_>, _request: &Request) -> Result<Option<Self>> {
        Ok(Some(cx.any().bool()))
    }
}

impl Anonymous for u8 {
    fn kind() -> TypeKind {
        TypeKind::Value
    }

    fn generate(cx: &mut Context<'_>, _request: &Request) -> Result<Option<Self>> {
        Ok(Some(cx.any().byte()))
    }
}

impl Anonymous for i8 {
    fn kind() -> TypeKind {
        TypeKind::Value
    }

    fn generate(cx: &mut Context<'_>, _request: &Request) -> Result<Option<Self>> {
        Ok(Some(cx.any().sbyte()))
    }
}

impl Anonymous for char {
    fn kind() -> TypeKind {
        TypeKind::Value
    }

    fn generate(cx: &mut Context<'_>, _request: &Request) -> Result<Option<Self>> {
        let charset = cx.config().charset;
        Ok(Some(cx.any().char_in(charset)))
    }
}

impl<T: Anonymous> Anonymous for Option<T> {
    fn kind() -> TypeKind {
        T::kind()
    }

    fn generate(cx: &mut Context<'_>, request: &Request) -> Result<Option<Self>> {
        Ok(T::generate(cx, request)?.map(Some))
    }

    fn instantiate(cx: &mut Context<'_>, request: &Request) -> Result<Self> {
        T::generate(cx, request)
    }
}

impl<T: Anonymous> Anonymous for Box<T> {
    fn kind() -> TypeKind {
        T::kind()
    }

    fn generate(cx: &mut Context<'_>, request: &Request) -> Result<Option<Self>> {
        Ok(T::generate(cx, request)?.map(Box::new))
    }

    fn instantiate(cx: &mut Context<'_>, request: &Request) -> Result<Self> {
        T::instantiate(cx, request).map(Box::new)
    }
}

/// Shared `generate` body for field-less enums
pub fn generate_enum<E: Enumeration>(cx: &mut Context<'_>) -> Result<Option<E>> {
    cx.any().pick_enum::<E>().map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Fill;
    use crate::unique::UniquePool;

    fn member<T: Anonymous>(any: &mut Any, name: &'static str) -> Option<T> {
        let request = Request::root(0, Fill::Deep).member(name);
        T::generate(&mut Context::new(any), &request).unwrap()
    }

    #[test]
    fn test_kinds() {
        assert_eq!(i32::kind(), TypeKind::Value);
        assert_eq!(String::kind(), TypeKind::Reference);
        assert_eq!(Option::<Uri>::kind(), TypeKind::Reference);
        assert_eq!(Box::<f64>::kind(), TypeKind::Value);
    }

    #[test]
    fn test_contextual_strings() {
        let mut any = Any::seeded(1);

        let name: String = member(&mut any, "name").unwrap();
        assert!(name.starts_with("name"));
        assert_eq!(name.chars().count(), 15 + 4);

        let email: String = member(&mut any, "contact_email").unwrap();
        assert!(email.starts_with("contact_email_"));
        assert!(email.ends_with(".any"));
        assert!(email.contains('@'));

        let website: String = member(&mut any, "Website").unwrap();
        assert!(website.starts_with("http://"));
    }

    #[test]
    fn test_member_ints_are_small_and_non_zero() {
        let mut any = Any::seeded(2);
        for _ in 0..1_000 {
            let value: i32 = member(&mut any, "count").unwrap();
            assert!((1..999).contains(&value));
        }
    }

    #[test]
    fn test_option_wraps_inner_value() {
        let mut any = Any::seeded(3);
        let value: Option<Option<i64>> = member(&mut any, "total");
        assert!(matches!(value, Some(Some(_))));
    }

    #[test]
    fn test_tracked_members_feed_the_pool() {
        let mut any = Any::seeded(4);
        let mut pool = UniquePool::new();
        {
            let mut cx = Context::new(&mut any).with_unique(&mut pool);
            let request = Request::root(0, Fill::Deep).member("id");
            for _ in 0..100 {
                i32::generate(&mut cx, &request).unwrap();
                bool::generate(&mut cx, &request).unwrap();
            }
        }
        assert_eq!(pool.len_of::<i32>(), 100);
    }
}
