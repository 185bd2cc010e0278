// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Handles over registered constructors, functions and variables.
//!
//! Descriptors are `Copy` views over leaked member nodes. Arguments are
//! passed as a slice of [`Any`]; methods take their receiver first.

use std::fmt;
use std::slice;

use crate::any::Any;
use crate::error::{BadAnyAccess, ReflError, Result};
use crate::info::TypeInfo;
use crate::node::{CtorNode, FunctionNode, Receiver, VariableNode};
use crate::Reflect;

/// A registered constructor.
#[derive(Clone, Copy)]
pub struct CtorDescriptor {
    node: &'static CtorNode,
}

impl CtorDescriptor {
    pub(crate) fn new(node: &'static CtorNode) -> Self {
        Self { node }
    }

    /// Type being constructed.
    pub fn parent(&self) -> TypeInfo {
        TypeInfo::from(self.node.parent)
    }

    pub fn params(&self) -> Vec<TypeInfo> {
        self.node.params.iter().copied().map(TypeInfo::from).collect()
    }

    pub fn arity(&self) -> usize {
        self.node.params.len()
    }

    /// Build a new owned instance.
    pub fn invoke(&self, args: &mut [Any<'_>]) -> Result<Any<'static>> {
        (self.node.invoke)(args).map(Any::into_owned)
    }
}

impl fmt::Debug for CtorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.node, f)
    }
}

/// A registered function or method.
#[derive(Clone, Copy)]
pub struct FunctionDescriptor {
    node: &'static FunctionNode,
}

impl FunctionDescriptor {
    pub(crate) fn new(node: &'static FunctionNode) -> Self {
        Self { node }
    }

    pub fn name(&self) -> &'static str {
        &self.node.name
    }

    /// Type the function was registered on.
    pub fn parent(&self) -> TypeInfo {
        TypeInfo::from(self.node.parent)
    }

    /// Return type; the referent for functions returning a reference.
    pub fn return_type(&self) -> TypeInfo {
        TypeInfo::from(self.node.ret)
    }

    /// Parameter types, receiver excluded.
    pub fn params(&self) -> Vec<TypeInfo> {
        self.node.params.iter().copied().map(TypeInfo::from).collect()
    }

    /// Node of the function's own type (`Function` or `MemberFunction`).
    pub fn signature(&self) -> TypeInfo {
        TypeInfo::from(self.node.signature)
    }

    pub fn receiver(&self) -> Receiver {
        self.node.receiver
    }

    /// Method taking `&self`.
    pub fn is_const(&self) -> bool {
        self.node.receiver == Receiver::Shared
    }

    pub fn is_member(&self) -> bool {
        self.node.receiver != Receiver::Static
    }

    pub fn is_static(&self) -> bool {
        self.node.receiver == Receiver::Static
    }

    pub fn returns_ref(&self) -> bool {
        self.node.returns_ref
    }

    /// Argument count expected by [`invoke`](Self::invoke), receiver included.
    pub fn arity(&self) -> usize {
        self.node.params.len() + usize::from(self.is_member())
    }

    /// Call and return an owned result. Reference results are copied.
    pub fn invoke(&self, args: &mut [Any<'_>]) -> Result<Any<'static>> {
        (self.node.invoke)(args).map(Any::into_owned)
    }

    /// Call a reference-returning function and return the reference itself,
    /// borrowed from the arguments.
    pub fn invoke_by_ref<'s>(&self, args: &'s mut [Any<'_>]) -> Result<Any<'s>> {
        if !self.node.returns_ref {
            log::error!(
                "[FunctionDescriptor] {}::{} returns by value, can't invoke by reference",
                self.node.parent.name(),
                self.node.name
            );
            return Err(ReflError::NotAReference(self.node.name.clone()));
        }
        (self.node.invoke)(args)
    }

    /// Call and unwrap the result as an `R`.
    pub fn call<R: Reflect>(&self, args: &mut [Any<'_>]) -> Result<R> {
        self.invoke(args)?.into_value::<R>().map_err(|got| ReflError::TypeMismatch {
            expected: crate::registry::resolve::<R>().name().to_string(),
            got: got.type_info().name().to_string(),
        })
    }
}

impl fmt::Debug for FunctionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.node, f)
    }
}

/// A registered field or static variable.
#[derive(Clone, Copy)]
pub struct VariableDescriptor {
    node: &'static VariableNode,
}

impl VariableDescriptor {
    pub(crate) fn new(node: &'static VariableNode) -> Self {
        Self { node }
    }

    pub fn name(&self) -> &'static str {
        &self.node.name
    }

    pub fn parent(&self) -> TypeInfo {
        TypeInfo::from(self.node.parent)
    }

    /// Type of the variable's value.
    pub fn var_type(&self) -> TypeInfo {
        TypeInfo::from(self.node.ty)
    }

    /// `MemberObject` node of the field.
    pub fn signature(&self) -> TypeInfo {
        TypeInfo::from(self.node.signature)
    }

    pub fn is_static(&self) -> bool {
        self.node.is_static
    }

    pub fn is_member(&self) -> bool {
        !self.node.is_static
    }

    pub fn is_readonly(&self) -> bool {
        self.node.readonly
    }

    /// Reference to the field of `owner`: mutable unless the owner is a
    /// const reference or the variable is read-only.
    pub fn invoke<'o>(&self, owner: &'o mut Any<'_>) -> Result<Any<'o>> {
        if self.node.is_static {
            return self.invoke_static();
        }
        (self.node.access)(slice::from_mut(owner))
    }

    /// Const reference to the field of `owner`.
    pub fn invoke_const<'o>(&self, owner: &'o Any<'_>) -> Result<Any<'o>> {
        if self.node.is_static {
            return self.invoke_static();
        }
        let mut args = [owner.constref()];
        let field = (self.node.access)(&mut args)?;
        // SAFETY: accessors given a const receiver lend views into the
        // owner's payload, which outlives 'o.
        Ok(unsafe { field.rebind() })
    }

    /// Const reference to a static variable.
    pub fn invoke_static(&self) -> Result<Any<'static>> {
        if !self.node.is_static {
            return Err(ReflError::ArityMismatch {
                expected: 1,
                got: 0,
            });
        }
        let mut none: [Any<'static>; 0] = [];
        let value = (self.node.access)(&mut none)?;
        // SAFETY: static variables lend `&'static` references.
        Ok(unsafe { value.rebind() })
    }

    /// Owned copy of the field's value.
    pub fn get_value(&self, owner: &Any<'_>) -> Result<Any<'static>> {
        Ok(self.invoke_const(owner)?.into_owned())
    }

    /// Assign `value` into the field (numeric kinds convert).
    pub fn set_value(&self, owner: &mut Any<'_>, value: &Any<'_>) -> Result<bool> {
        if self.node.readonly {
            log::warn!(
                "[VariableDescriptor] {}::{} is read-only",
                self.node.parent.name(),
                self.node.name
            );
            return Err(BadAnyAccess.into());
        }
        let mut field = self.invoke(owner)?;
        Ok(field.deep_set(value)?)
    }
}

impl fmt::Debug for VariableDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.node, f)
    }
}

/// Call `func` with `args` and return an owned result.
pub fn invoke_by_any(func: &FunctionDescriptor, args: &mut [Any<'_>]) -> Result<Any<'static>> {
    func.invoke(args)
}

/// Call a reference-returning `func`, returning the reference.
pub fn invoke_by_any_ref<'s>(
    func: &FunctionDescriptor,
    args: &'s mut [Any<'_>],
) -> Result<Any<'s>> {
    func.invoke_by_ref(args)
}
