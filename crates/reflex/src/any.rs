// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type-erased value handle.
//!
//! An [`Any`] carries an access mode, an erased payload pointer, the payload's
//! operations table and its type node. The mode decides ownership:
//!
//! | Access     | Payload                  | Mutation | Dropped by `Any` |
//! |------------|--------------------------|----------|------------------|
//! | `Null`     | none                     | -        | -                |
//! | `ConstRef` | borrowed `&'a T`         | refused  | no               |
//! | `Ref`      | borrowed `&'a mut T`     | allowed  | no               |
//! | `Copy`     | owned `Box<T>`           | allowed  | yes              |
//!
//! # Example
//!
//! ```rust
//! use reflex::Any;
//!
//! let mut height = 1.5f32;
//! let mut value = Any::make_ref(&mut height);
//! value.deep_set(&Any::new(2i32)).expect("mutable");
//! drop(value);
//! assert_eq!(height, 2.0);
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::mem::{self, ManuallyDrop};
use std::ptr;

use crate::error::BadAnyAccess;
use crate::info::TypeInfo;
use crate::node::TypeNode;
use crate::operations::{TypeOperations, NULL_OPERATIONS};
use crate::registry::resolve;
use crate::Reflect;

/// Ownership/access mode of an [`Any`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Access {
    #[default]
    Null,
    ConstRef,
    Ref,
    Copy,
}

/// Type-erased value: owned, borrowed mutably, or borrowed immutably.
pub struct Any<'a> {
    access: Access,
    payload: *mut u8,
    operations: &'static TypeOperations,
    node: Option<&'static TypeNode>,
    _marker: PhantomData<&'a mut ()>,
}

impl Any<'static> {
    /// Take ownership of `value`.
    pub fn new<T: Reflect>(value: T) -> Self {
        let node = resolve::<T>();
        let mut value = ManuallyDrop::new(value);
        // SAFETY: the source is forgotten after the bitwise move.
        let payload =
            unsafe { (node.operations().steal_construct)((&mut *value as *mut T).cast()) };
        // SAFETY: steal_construct boxes a T.
        unsafe { Self::from_raw_parts(Access::Copy, payload, node) }
    }

    /// Construct the owned value in place.
    pub fn emplace<T: Reflect>(construct: impl FnOnce() -> T) -> Self {
        let node = resolve::<T>();
        let payload = Box::into_raw(Box::new(construct())).cast();
        // SAFETY: payload is a boxed T.
        unsafe { Self::from_raw_parts(Access::Copy, payload, node) }
    }

    /// Owned copy of `value`, made through its copy constructor exactly once.
    /// Null (and logged) when `T` isn't copyable.
    pub fn make_copy<T: Reflect>(value: &T) -> Self {
        let node = resolve::<T>();
        let Some(copy) = node.operations().copy_construct else {
            log::warn!("[Any] make_copy: {} is not copyable", node.name());
            return Self::null();
        };
        // SAFETY: the table belongs to T.
        let payload = unsafe { copy((value as *const T).cast()) };
        if payload.is_null() {
            log::warn!("[Any] make_copy: copy of {} failed", node.name());
            return Self::null();
        }
        // SAFETY: copy constructors box a T.
        unsafe { Self::from_raw_parts(Access::Copy, payload, node) }
    }
}

impl<'a> Any<'a> {
    /// Handle holding nothing.
    pub fn null() -> Self {
        Self {
            access: Access::Null,
            payload: ptr::null_mut(),
            operations: &NULL_OPERATIONS,
            node: None,
            _marker: PhantomData,
        }
    }

    /// Mutable view of `value`.
    pub fn make_ref<T: Reflect>(value: &'a mut T) -> Self {
        // SAFETY: the borrow lives for 'a.
        unsafe { Self::from_raw_parts(Access::Ref, (value as *mut T).cast(), resolve::<T>()) }
    }

    /// Read-only view of `value`.
    pub fn make_constref<T: Reflect>(value: &'a T) -> Self {
        // SAFETY: the borrow lives for 'a and is never written through.
        unsafe {
            Self::from_raw_parts(
                Access::ConstRef,
                (value as *const T).cast_mut().cast(),
                resolve::<T>(),
            )
        }
    }

    /// # Safety
    ///
    /// `payload` must point at a live value of `node`'s type that stays valid
    /// for `'a` with the permissions `access` implies. Copy-mode payloads must
    /// come from `Box::into_raw` of that type.
    pub(crate) unsafe fn from_raw_parts(
        access: Access,
        payload: *mut u8,
        node: &'static TypeNode,
    ) -> Self {
        if payload.is_null() {
            return Self::null();
        }
        Self {
            access,
            payload,
            operations: node.operations(),
            node: Some(node),
            _marker: PhantomData,
        }
    }

    pub fn access(&self) -> Access {
        self.access
    }

    pub fn has_value(&self) -> bool {
        self.access != Access::Null
    }

    pub fn is_null(&self) -> bool {
        self.access == Access::Null
    }

    pub fn is_ref(&self) -> bool {
        self.access == Access::Ref
    }

    pub fn is_constref(&self) -> bool {
        self.access == Access::ConstRef
    }

    pub fn is_copy(&self) -> bool {
        self.access == Access::Copy
    }

    pub fn type_node(&self) -> Option<&'static TypeNode> {
        self.node
    }

    pub fn type_info(&self) -> TypeInfo {
        TypeInfo::from(self.node)
    }

    pub fn operations(&self) -> &'static TypeOperations {
        self.operations
    }

    pub(crate) fn payload(&self) -> *const u8 {
        self.payload
    }

    /// Writable payload; refused for const references.
    pub(crate) fn payload_mut(&mut self) -> Result<*mut u8, BadAnyAccess> {
        if self.access == Access::ConstRef {
            return Err(BadAnyAccess);
        }
        Ok(self.payload)
    }

    /// Exact type identity check.
    pub fn can_cast<T: Reflect>(&self) -> bool {
        self.node.is_some_and(|node| ptr::eq(node, resolve::<T>()))
    }

    /// # Safety
    ///
    /// The payload must be a `T` and the handle non-null.
    pub unsafe fn cast<T>(&self) -> &T {
        unsafe { &*self.payload.cast::<T>() }
    }

    /// # Safety
    ///
    /// The payload must be a `T`, the handle non-null and not a const reference.
    pub unsafe fn cast_mut<T>(&mut self) -> &mut T {
        unsafe { &mut *self.payload.cast::<T>() }
    }

    /// Mutable access to the payload if it is exactly a `T`.
    ///
    /// Returns `Err(BadAnyAccess)` for const references and `Ok(None)` on
    /// type mismatch.
    pub fn try_cast<T: Reflect>(&mut self) -> Result<Option<&mut T>, BadAnyAccess> {
        if self.access == Access::ConstRef {
            return Err(BadAnyAccess);
        }
        if !self.can_cast::<T>() {
            return Ok(None);
        }
        // SAFETY: identity checked; access is Ref or Copy.
        Ok(Some(unsafe { &mut *self.payload.cast::<T>() }))
    }

    /// Shared access to the payload if it is exactly a `T`.
    pub fn try_cast_const<T: Reflect>(&self) -> Option<&T> {
        if !self.can_cast::<T>() {
            return None;
        }
        // SAFETY: identity checked.
        Some(unsafe { &*self.payload.cast::<T>() })
    }

    /// Value of a signed integral payload.
    pub fn try_cast_integral(&self) -> Option<i64> {
        let numeric = self.operations.numeric?;
        if !(numeric.kind.is_integral() && numeric.kind.is_signed()) {
            return None;
        }
        // SAFETY: the table belongs to the payload's type.
        Some(unsafe { (numeric.get)(self.payload) }.as_i64())
    }

    /// Value of an unsigned integral payload.
    pub fn try_cast_uintegral(&self) -> Option<u64> {
        let numeric = self.operations.numeric?;
        if !(numeric.kind.is_integral() && !numeric.kind.is_signed()) {
            return None;
        }
        // SAFETY: the table belongs to the payload's type.
        Some(unsafe { (numeric.get)(self.payload) }.as_u64())
    }

    /// Value of a floating-point payload.
    pub fn try_cast_floating_point(&self) -> Option<f64> {
        let numeric = self.operations.numeric?;
        if !numeric.kind.is_floating_point() {
            return None;
        }
        // SAFETY: the table belongs to the payload's type.
        Some(unsafe { (numeric.get)(self.payload) }.as_f64())
    }

    /// Owned deep copy; null when the type isn't copyable.
    pub fn copy(&self) -> Any<'static> {
        let Some(node) = self.node else {
            return Any::null();
        };
        let Some(copy) = self.operations.copy_construct else {
            log::warn!("[Any] copy: {} is not copyable", node.name());
            return Any::null();
        };
        // SAFETY: the table belongs to the payload's type.
        let payload = unsafe { copy(self.payload) };
        if payload.is_null() {
            log::warn!("[Any] copy: an element of {} is not copyable", node.name());
        }
        // SAFETY: copy constructors box the payload's type.
        unsafe { Any::from_raw_parts(Access::Copy, payload, node) }
    }

    /// Read-only view of the payload.
    pub fn constref(&self) -> Any<'_> {
        match self.node {
            // SAFETY: reborrowed for the lifetime of &self.
            Some(node) => unsafe { Any::from_raw_parts(Access::ConstRef, self.payload, node) },
            None => Any::null(),
        }
    }

    /// Mutable view of the payload; refused for const references.
    pub fn mut_ref(&mut self) -> Result<Any<'_>, BadAnyAccess> {
        let payload = self.payload_mut()?;
        Ok(match self.node {
            // SAFETY: reborrowed for the lifetime of &mut self.
            Some(node) => unsafe { Any::from_raw_parts(Access::Ref, payload, node) },
            None => Any::null(),
        })
    }

    /// Move the handle out, leaving this one null.
    pub fn steal(&mut self) -> Any<'a> {
        mem::take(self)
    }

    /// Drop the payload (if owned) and become null.
    pub fn reset(&mut self) {
        *self = Any::null();
    }

    /// Detach from any borrow: owned handles keep their payload, views are copied.
    pub fn into_owned(self) -> Any<'static> {
        if self.access != Access::Copy {
            return self.copy();
        }
        // SAFETY: owned payloads don't borrow anything.
        unsafe { self.rebind() }
    }

    /// Re-tag the handle with another lifetime.
    ///
    /// # Safety
    ///
    /// A borrowed payload must stay valid (with the same permissions) for `'b`.
    pub(crate) unsafe fn rebind<'b>(self) -> Any<'b> {
        let this = ManuallyDrop::new(self);
        Any {
            access: this.access,
            payload: this.payload,
            operations: this.operations,
            node: this.node,
            _marker: PhantomData,
        }
    }

    /// Unwrap an owned `T`; hands the handle back on mismatch or when it is a view.
    pub fn into_value<T: Reflect>(self) -> Result<T, Self> {
        if self.access != Access::Copy || !self.can_cast::<T>() {
            return Err(self);
        }
        let this = ManuallyDrop::new(self);
        // SAFETY: Copy-mode payloads are boxed values of the node's type.
        Ok(*unsafe { Box::from_raw(this.payload.cast::<T>()) })
    }

    /// Assign `other`'s value into this payload.
    ///
    /// Numbers convert between numeric kinds; other types must match exactly.
    /// Returns `Ok(false)` when nothing was assigned.
    pub fn deep_set(&mut self, other: &Any<'_>) -> Result<bool, BadAnyAccess> {
        let payload = self.payload_mut()?;
        let (Some(dst), Some(src)) = (self.node, other.node) else {
            return Ok(false);
        };
        if let (Some(to), Some(from)) = (self.operations.numeric, other.operations.numeric) {
            // SAFETY: both tables belong to their payloads.
            unsafe { (to.set)(payload, (from.get)(other.payload)) };
            return Ok(true);
        }
        if !ptr::eq(dst, src) {
            log::debug!("[Any] deep_set: can't assign {} to {}", src.name(), dst.name());
            return Ok(false);
        }
        match self.operations.copy_assign {
            // SAFETY: same type on both sides.
            Some(assign) => Ok(unsafe { assign(payload, other.payload) }),
            None => {
                log::warn!("[Any] deep_set: {} is not copy-assignable", dst.name());
                Ok(false)
            }
        }
    }

    /// Copy-assign from a value of exactly the same type.
    pub fn copy_assign(&mut self, other: &Any<'_>) -> Result<bool, BadAnyAccess> {
        let payload = self.payload_mut()?;
        if !self.same_type(other) {
            return Ok(false);
        }
        match self.operations.copy_assign {
            // SAFETY: same type on both sides.
            Some(assign) => Ok(unsafe { assign(payload, other.payload) }),
            None => Ok(false),
        }
    }

    /// Exchange values with `other` (same type, both mutable).
    pub fn steal_assign(&mut self, other: &mut Any<'_>) -> Result<bool, BadAnyAccess> {
        let payload = self.payload_mut()?;
        let source = other.payload_mut()?;
        if !self.same_type(other) {
            return Ok(false);
        }
        // SAFETY: same type on both sides, both writable.
        unsafe { (self.operations.steal_assign)(payload, source) };
        Ok(true)
    }

    fn same_type(&self, other: &Any<'_>) -> bool {
        matches!((self.node, other.node), (Some(a), Some(b)) if ptr::eq(a, b))
    }

    /// Number of elements of a container payload, 0 otherwise.
    pub fn size(&self) -> usize {
        match self.operations.container {
            // SAFETY: the table belongs to the payload's type.
            Some(container) => unsafe { (container.size)(self.payload) },
            None => 0,
        }
    }

    /// Element type of a container or optional payload.
    pub fn elem_type(&self) -> TypeInfo {
        TypeInfo::from(self.node.and_then(TypeNode::elem_type))
    }

    /// Append a copy of `elem`. False (and logged) for const references,
    /// fixed-size containers and non-containers.
    pub fn push_back(&mut self, elem: &Any<'_>) -> bool {
        let Some(container) = self.operations.container else {
            log::warn!("[Any] push_back: {} is not a container", self.type_info().name());
            return false;
        };
        let Ok(payload) = self.payload_mut() else {
            log::warn!("[Any] push_back: container is a const reference");
            return false;
        };
        // SAFETY: the table belongs to the payload's type.
        let pushed = unsafe { (container.push_back)(payload, elem) };
        if !pushed {
            log::debug!("[Any] push_back refused by {}", self.type_info().name());
        }
        pushed
    }

    /// Visit an owned copy of every element.
    pub fn travel_elements(&self, mut f: impl FnMut(&mut Any<'static>)) {
        let Some(container) = self.operations.container else {
            log::warn!("[Any] travel_elements: {} is not a container", self.type_info().name());
            return;
        };
        // SAFETY: the table belongs to the payload's type.
        unsafe {
            (container.travel)(self.payload, &mut |elem| {
                let mut copy = elem.copy();
                f(&mut copy);
            });
        }
    }

    /// Visit a read-only view of every element.
    pub fn travel_elements_const(&self, mut f: impl FnMut(&Any<'_>)) {
        let Some(container) = self.operations.container else {
            log::warn!("[Any] travel_elements: {} is not a container", self.type_info().name());
            return;
        };
        // SAFETY: the table belongs to the payload's type.
        unsafe { (container.travel)(self.payload, &mut |elem| f(elem)) };
    }

    /// Visit every element in place. Elements are mutable views unless this
    /// handle is a const reference or the container can't lend mutable
    /// elements (sets, maps), in which case they are read-only views.
    pub fn travel_elements_by_ref(&mut self, mut f: impl FnMut(&mut Any<'_>)) {
        let Some(container) = self.operations.container else {
            log::warn!("[Any] travel_elements: {} is not a container", self.type_info().name());
            return;
        };
        if self.access != Access::ConstRef {
            // SAFETY: the table belongs to the payload's type; the payload is writable.
            let visited = unsafe { (container.travel_mut)(self.payload, &mut |elem| f(elem)) };
            if visited {
                return;
            }
        }
        // SAFETY: the table belongs to the payload's type.
        unsafe {
            (container.travel)(self.payload, &mut |elem| {
                let mut view = elem.constref();
                f(&mut view);
            });
        }
    }
}

impl Default for Any<'_> {
    fn default() -> Self {
        Self::null()
    }
}

impl Clone for Any<'_> {
    /// Const references share the payload; owned values and mutable views are
    /// deep-copied.
    fn clone(&self) -> Self {
        match self.access {
            Access::Null => Self::null(),
            Access::ConstRef => Self {
                access: Access::ConstRef,
                payload: self.payload,
                operations: self.operations,
                node: self.node,
                _marker: PhantomData,
            },
            Access::Ref | Access::Copy => self.copy(),
        }
    }
}

impl Drop for Any<'_> {
    fn drop(&mut self) {
        if self.access == Access::Copy && !self.payload.is_null() {
            // SAFETY: Copy-mode payloads are owned boxes of the node's type.
            unsafe { (self.operations.destroy)(self.payload) };
        }
    }
}

impl fmt::Debug for Any<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Any")
            .field("access", &self.access)
            .field("type", &self.node.map(|n| n.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests;
