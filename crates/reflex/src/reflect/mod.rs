// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The [`Reflect`] trait and its implementations for standard types.

mod collections;
mod pointers;
mod primitives;
mod strings;
mod tuples;

use crate::node::TypeShape;
use crate::operations::TypeOperations;

/// A type the registry can describe.
///
/// `shape` and `operations` run once, when the type's node is first
/// resolved. Implementations for user records are normally generated with
/// `#[derive(Reflect)]`; members are then described through a
/// [`Factory`](crate::Factory).
///
/// ```rust
/// use reflex::{Reflect, TypeOperations, TypeShape};
///
/// #[derive(Clone, Default)]
/// struct Meters(f64);
///
/// impl Reflect for Meters {
///     fn shape() -> TypeShape {
///         TypeShape::class("Meters")
///     }
///
///     fn operations() -> TypeOperations {
///         TypeOperations::builder::<Self>().cloneable().defaulted().build()
///     }
/// }
///
/// assert_eq!(&*reflex::resolve::<Meters>().name(), "Meters");
/// ```
pub trait Reflect: 'static {
    fn shape() -> TypeShape;

    fn operations() -> TypeOperations;
}
