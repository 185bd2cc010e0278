// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use std::sync::Arc;

use super::holds;
use crate::any::Any;
use crate::descriptor::{CtorDescriptor, FunctionDescriptor, VariableDescriptor};
use crate::error::BadAnyAccess;
use crate::node::TypeNode;
use crate::property::Property;

/// Accessor for class types: user records plus the standard library
/// classes (strings, collections, optionals).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassType {
    node: &'static TypeNode,
}

impl ClassType {
    pub(crate) fn new(node: &'static TypeNode) -> Self {
        Self { node }
    }

    pub fn name(&self) -> Arc<str> {
        self.node.name()
    }

    pub fn node(&self) -> &'static TypeNode {
        self.node
    }

    /// Variables in registration order.
    pub fn vars(&self) -> Vec<VariableDescriptor> {
        self.node.vars().into_iter().map(VariableDescriptor::new).collect()
    }

    /// Functions in registration order.
    pub fn funcs(&self) -> Vec<FunctionDescriptor> {
        self.node.funcs().into_iter().map(FunctionDescriptor::new).collect()
    }

    /// Constructors in registration order.
    pub fn ctors(&self) -> Vec<CtorDescriptor> {
        self.node.ctors().into_iter().map(CtorDescriptor::new).collect()
    }

    pub fn var(&self, name: &str) -> Option<VariableDescriptor> {
        self.node.find_var(name).map(VariableDescriptor::new)
    }

    pub fn func(&self, name: &str) -> Option<FunctionDescriptor> {
        self.node.find_func(name).map(FunctionDescriptor::new)
    }

    /// Member (non-static) variables as properties, in registration order.
    pub fn properties(&self) -> Vec<Property> {
        self.node
            .vars()
            .into_iter()
            .filter(|var| !var.is_static)
            .map(|var| Property::new(VariableDescriptor::new(var)))
            .collect()
    }

    pub fn property(&self, name: &str) -> Option<Property> {
        self.var(name)
            .filter(VariableDescriptor::is_member)
            .map(Property::new)
    }

    pub fn is_default_constructible(&self) -> bool {
        self.node.is_default_constructible()
    }

    /// Default instance, or null when there is no way to build one.
    pub fn default_construct(&self) -> Any<'static> {
        self.node.default_construct()
    }

    /// Copy-assign `src` into `dst`; nothing happens when either isn't this type.
    pub fn set_value(&self, dst: &mut Any<'_>, src: &Any<'_>) -> Result<bool, BadAnyAccess> {
        dst.payload_mut()?;
        if !holds(self.node, dst, "set_value") || !holds(self.node, src, "set_value") {
            return Ok(false);
        }
        dst.copy_assign(src)
    }

    /// Swap the values of `dst` and `src`; nothing happens when either isn't this type.
    pub fn steal_value(&self, dst: &mut Any<'_>, src: &mut Any<'_>) -> Result<bool, BadAnyAccess> {
        dst.payload_mut()?;
        if !holds(self.node, dst, "steal_value") || !holds(self.node, src, "steal_value") {
            return Ok(false);
        }
        dst.steal_assign(src)
    }
}
