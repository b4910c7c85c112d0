//! Derive macros for the anydata anonymous data library
//!
//! This crate provides the `Anonymous` derive, which emits the member
//! descriptor table the anydata builder walks instead of runtime reflection.

use proc_macro::TokenStream;

mod derive;

/// Derive macro implementing `anydata::Anonymous`
///
/// # Structs
///
/// Structs with named fields get a `Composite` descriptor table listing every
/// field, and are built by constructing `Default::default()` and then filling
/// each field.
///
/// ```rust,ignore
/// use anydata::Anonymous;
///
/// #[derive(Debug, Default, Anonymous)]
/// pub struct Order {
///     pub id: i64,
///     pub reference: String,
///     pub customer: Option<Customer>,
///     pub lines: Vec<OrderLine>,
/// }
/// ```
///
/// # Field-less enums
///
/// Enums whose variants carry no data implement `Enumeration` and are picked
/// uniformly by declaration order.
///
/// ```rust,ignore
/// #[derive(Debug, Anonymous)]
/// pub enum Status {
///     Draft,
///     Submitted,
///     Cancelled = -1,
/// }
/// ```
///
/// # Supported Attributes
///
/// - `#[anydata(skip)]` on a field: never generated, left at its default
/// - `#[anydata(with = "path::to::fn")]` on a field: generated by
///   `fn(&mut anydata::Any) -> anydata::Result<FieldType>`; an error fails
///   the enclosing build (nested builds leave the member unset)
/// - `#[anydata(immutable)]` on a struct: fields are produced while
///   constructing the value instead of assigned afterwards; the struct does
///   not need `Default`, but its fields do. Private fields stay at their
///   default unless `fill_private_members` is set
#[proc_macro_derive(Anonymous, attributes(anydata))]
pub fn derive_anonymous(input: TokenStream) -> TokenStream {
    derive::derive_anonymous_impl(input)
}
