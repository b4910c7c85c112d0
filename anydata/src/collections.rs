//! [`Anonymous`] implementations for sequences and maps.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::hash::Hash;

use tracing::warn;

use crate::anonymous::Anonymous;
use crate::classify::TypeKind;
use crate::context::{Context, Fill, Request};
use crate::error::Result;

/// Number of children to create, or `None` when the collection stays empty
fn child_count<T: Anonymous>(cx: &Context<'_>, request: &Request) -> Option<usize> {
    if request.depth == 0 || !T::kind().is_expandable_element(request.fill) {
        return None;
    }
    Some(match request.fill {
        Fill::Shallow => 1,
        _ => cx.config().nested_collection_len,
    })
}

fn unexpanded<C: Default>(cx: &Context<'_>) -> Option<C> {
    if cx.config().null_collections {
        None
    } else {
        Some(C::default())
    }
}

/// Build the children; a recoverable failure empties the whole collection
fn children<C, I, F>(cx: &mut Context<'_>, request: &Request, count: usize, mut child: F) -> Result<Option<C>>
where
    C: Default + Extend<I>,
    F: FnMut(&mut Context<'_>, &Request) -> Result<I>,
{
    let scope = request.descend();
    let mut collection = C::default();
    for _ in 0..count {
        match child(&mut *cx, &scope) {
            Ok(item) => collection.extend(Some(item)),
            Err(e) if e.is_recoverable() => {
                warn!(member = request.member, error = %e, "child build failed, leaving collection empty");
                return Ok(Some(C::default()));
            }
            Err(e) => return Err(e),
        }
    }
    Ok(Some(collection))
}

fn sequence<T, C>(cx: &mut Context<'_>, request: &Request) -> Result<Option<C>>
where
    T: Anonymous,
    C: Default + Extend<T>,
{
    match child_count::<T>(cx, request) {
        Some(count) => children(cx, request, count, T::instantiate),
        None => Ok(unexpanded(cx)),
    }
}

/// Maps get exactly one pair when expanded
fn map<K, V, C>(cx: &mut Context<'_>, request: &Request) -> Result<Option<C>>
where
    K: Anonymous,
    V: Anonymous,
    C: Default + Extend<(K, V)>,
{
    if K::kind().is_collection() || child_count::<V>(cx, request).is_none() {
        return Ok(unexpanded(cx));
    }
    children(cx, request, 1, |cx, request| {
        Ok((K::instantiate(cx, request)?, V::instantiate(cx, request)?))
    })
}

impl<T: Anonymous> Anonymous for Vec<T> {
    fn kind() -> TypeKind {
        TypeKind::List
    }

    fn generate(cx: &mut Context<'_>, request: &Request) -> Result<Option<Self>> {
        sequence::<T, Self>(cx, request)
    }
}

impl<T: Anonymous> Anonymous for VecDeque<T> {
    fn kind() -> TypeKind {
        TypeKind::List
    }

    fn generate(cx: &mut Context<'_>, request: &Request) -> Result<Option<Self>> {
        sequence::<T, Self>(cx, request)
    }
}

impl<T: Anonymous> Anonymous for Box<[T]> {
    fn kind() -> TypeKind {
        TypeKind::Array
    }

    fn generate(cx: &mut Context<'_>, request: &Request) -> Result<Option<Self>> {
        Ok(sequence::<T, Vec<T>>(cx, request)?.map(Vec::into_boxed_slice))
    }
}

impl<K, V> Anonymous for HashMap<K, V>
where
    K: Anonymous + Eq + Hash,
    V: Anonymous,
{
    fn kind() -> TypeKind {
        TypeKind::Dictionary
    }

    fn generate(cx: &mut Context<'_>, request: &Request) -> Result<Option<Self>> {
        map::<K, V, Self>(cx, request)
    }
}

impl<K, V> Anonymous for BTreeMap<K, V>
where
    K: Anonymous + Ord,
    V: Anonymous,
{
    fn kind() -> TypeKind {
        TypeKind::Dictionary
    }

    fn generate(cx: &mut Context<'_>, request: &Request) -> Result<Option<Self>> {
        map::<K, V, Self>(cx, request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnyConfig;
    use crate::generator::Any;

    fn generate<T: Anonymous>(any: &mut Any, depth: usize, fill: Fill) -> Option<T> {
        let request = Request::root(depth, fill).member("items");
        T::generate(&mut Context::new(any), &request).unwrap()
    }

    #[test]
    fn test_deep_builds_skip_value_elements() {
        let mut any = Any::seeded(1);
        let numbers: Vec<i32> = generate(&mut any, 3, Fill::Deep).unwrap();
        assert!(numbers.is_empty());

        let names: Vec<String> = generate(&mut any, 1, Fill::Deep).unwrap();
        assert_eq!(names.len(), 5);
    }

    #[test]
    fn test_depth_zero_is_empty_or_none() {
        let mut any = Any::seeded(2);
        let names: Vec<String> = generate(&mut any, 0, Fill::Deep).unwrap();
        assert!(names.is_empty());

        let mut any = Any::seeded(2)
            .with_config(AnyConfig::default().null_collections(true))
            .unwrap();
        assert!(generate::<Vec<String>>(&mut any, 0, Fill::Deep).is_none());
    }

    #[test]
    fn test_shallow_fill_gets_one_element() {
        let mut any = Any::seeded(3);
        let numbers: VecDeque<u64> = generate(&mut any, 1, Fill::Shallow).unwrap();
        assert_eq!(numbers.len(), 1);

        let array: Box<[char]> = generate(&mut any, 1, Fill::Shallow).unwrap();
        assert_eq!(array.len(), 1);

        let map: HashMap<String, i64> = generate(&mut any, 1, Fill::Shallow).unwrap();
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_nested_collections_are_not_expanded() {
        let mut any = Any::seeded(4);
        let nested: Vec<Vec<String>> = generate(&mut any, 3, Fill::Shallow).unwrap();
        assert!(nested.is_empty());

        let map: BTreeMap<String, Vec<String>> = generate(&mut any, 3, Fill::Deep).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn test_collection_length_follows_config() {
        let mut any = Any::seeded(5)
            .with_config(AnyConfig::default().nested_collection_len(2))
            .unwrap();
        let names: Vec<String> = generate(&mut any, 1, Fill::Deep).unwrap();
        assert_eq!(names.len(), 2);
    }
}
