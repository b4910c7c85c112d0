//! Type classification driving how members are filled.

use crate::context::Fill;

/// Generation category of a type, as reported by [`Anonymous::kind`](crate::Anonymous::kind).
///
/// `Option<T>` and `Box<T>` report the kind of `T`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// Numbers, booleans, chars, ids, dates and spans
    Value,
    /// Heap-backed terminals such as strings, URIs and email addresses
    Reference,
    /// Field-less enums, picked uniformly by declaration order
    Enum,
    /// Growable sequences (`Vec`, `VecDeque`)
    List,
    /// Fixed sequences (`Box<[T]>`)
    Array,
    /// Key/value maps
    Dictionary,
    /// Types with members of their own, built through a descriptor table
    Composite,
}

impl TypeKind {
    /// Terminal kinds are generated directly, never expanded
    pub fn is_terminal(self) -> bool {
        matches!(self, TypeKind::Value | TypeKind::Reference | TypeKind::Enum)
    }

    pub fn is_collection(self) -> bool {
        matches!(
            self,
            TypeKind::List | TypeKind::Array | TypeKind::Dictionary
        )
    }

    /// Whether a collection of this element kind gets elements.
    ///
    /// Deep builds only expand reference and composite elements; a shallow
    /// fill expands every non-collection element. Nested collections are
    /// never expanded.
    pub fn is_expandable_element(self, fill: Fill) -> bool {
        match fill {
            Fill::Deep => matches!(self, TypeKind::Reference | TypeKind::Composite),
            Fill::Shallow => !self.is_collection(),
            Fill::Bare => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_kinds() {
        assert!(TypeKind::Value.is_terminal());
        assert!(TypeKind::Reference.is_terminal());
        assert!(TypeKind::Enum.is_terminal());
        assert!(!TypeKind::Composite.is_terminal());
        assert!(!TypeKind::List.is_terminal());
    }

    #[test]
    fn test_deep_expansion_skips_values_and_collections() {
        assert!(TypeKind::Composite.is_expandable_element(Fill::Deep));
        assert!(TypeKind::Reference.is_expandable_element(Fill::Deep));
        assert!(!TypeKind::Value.is_expandable_element(Fill::Deep));
        assert!(!TypeKind::Enum.is_expandable_element(Fill::Deep));
        assert!(!TypeKind::List.is_expandable_element(Fill::Deep));
    }

    #[test]
    fn test_shallow_expansion_takes_any_single_level() {
        assert!(TypeKind::Value.is_expandable_element(Fill::Shallow));
        assert!(TypeKind::Enum.is_expandable_element(Fill::Shallow));
        assert!(TypeKind::Composite.is_expandable_element(Fill::Shallow));
        assert!(!TypeKind::Dictionary.is_expandable_element(Fill::Shallow));
        assert!(!TypeKind::Composite.is_expandable_element(Fill::Bare));
    }
}
