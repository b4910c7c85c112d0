//! Composite types: member descriptor tables and the depth-bounded walk
//! that fills them.
//!
//! `#[derive(Anonymous)]` emits a [`Composite`] implementation listing every
//! named field as a [`Member`]. [`build`] constructs a value and fills its
//! members; [`expand`] is the member path, which stops once the hierarchy
//! depth reaches zero. Depth is the only thing that ends recursion through
//! self-referential types.

use tracing::{debug, warn};

use crate::anonymous::Anonymous;
use crate::classify::TypeKind;
use crate::context::{Context, Fill, Request};
use crate::error::Result;

/// Fills one member of `T` in place
pub type FillFn<T> = fn(&mut T, &mut Context<'_>, &Request) -> Result<()>;

/// Descriptor of one member of a composite type
pub struct Member<T> {
    pub name: &'static str,
    /// Declared `pub`
    pub public: bool,
    /// Filled after construction; false for constructor-filled members
    pub settable: bool,
    pub kind: fn() -> TypeKind,
    pub fill: FillFn<T>,
}

impl<T> Clone for Member<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Member<T> {}

impl<T> std::fmt::Debug for Member<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Member")
            .field("name", &self.name)
            .field("public", &self.public)
            .field("settable", &self.settable)
            .field("kind", &(self.kind)())
            .finish()
    }
}

/// Types with a member descriptor table
pub trait Composite: Sized + 'static {
    fn type_name() -> &'static str;

    fn members() -> Vec<Member<Self>>;

    /// Create the instance members are filled into
    fn construct(cx: &mut Context<'_>, request: &Request) -> Result<Self>;
}

/// Construct `T` and fill every settable, visible, non-excluded member
pub fn build<T: Composite>(cx: &mut Context<'_>, request: &Request) -> Result<T> {
    let resolved;
    let request = match request.exclusions {
        Some(_) => request,
        None => {
            resolved = request.clone().with_exclusions(cx.resolve_exclusions::<T>()?);
            &resolved
        }
    };

    debug!(
        type_name = T::type_name(),
        depth = request.depth,
        fill = ?request.fill,
        "building composite"
    );

    let mut value = T::construct(cx, request)?;
    if request.fill == Fill::Bare {
        return Ok(value);
    }

    let fill_private = cx.config().fill_private_members;
    for member in T::members() {
        if !member.settable || !(member.public || fill_private) {
            continue;
        }
        if request.fill == Fill::Deep && request.excludes(member.name) {
            continue;
        }
        (member.fill)(&mut value, cx, &request.member(member.name))?;
    }
    Ok(value)
}

/// Member path of a composite: one level down, or `None` once depth is spent.
///
/// Recoverable child failures leave the member unset.
pub fn expand<T: Composite>(cx: &mut Context<'_>, request: &Request) -> Result<Option<T>> {
    if request.depth == 0 {
        return Ok(None);
    }
    match build::<T>(cx, &request.descend()) {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_recoverable() => {
            warn!(
                type_name = T::type_name(),
                member = request.member,
                error = %e,
                "child build failed, leaving member unset"
            );
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Whether a constructor-filled member gets a generated value rather than its default
pub fn constructs(cx: &Context<'_>, request: &Request, name: &str, public: bool) -> bool {
    request.fill != Fill::Bare
        && (public || cx.config().fill_private_members)
        && !(request.fill == Fill::Deep && request.excludes(name))
}

/// Value for a constructor-filled member of an immutable composite
pub fn construct_field<F: Anonymous + Default>(
    cx: &mut Context<'_>,
    request: &Request,
    name: &'static str,
    public: bool,
) -> Result<F> {
    if !constructs(cx, request, name, public) {
        return Ok(F::default());
    }
    Ok(F::generate(cx, &request.member(name))?.unwrap_or_default())
}

/// Write `value` into `slot` when a generator produced one
pub fn assign<F>(slot: &mut F, value: Option<F>) {
    if let Some(value) = value {
        *slot = value;
    }
}
