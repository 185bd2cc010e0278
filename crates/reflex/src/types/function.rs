// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use std::sync::Arc;

use crate::node::TypeNode;

/// Type of a free or associated function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionType {
    node: &'static TypeNode,
}

impl FunctionType {
    pub(crate) fn new(node: &'static TypeNode) -> Self {
        Self { node }
    }

    /// Signature text, e.g. `fn(i32, String) -> bool`.
    pub fn name(&self) -> Arc<str> {
        self.node.name()
    }
}

/// Type of a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberFunctionType {
    node: &'static TypeNode,
}

impl MemberFunctionType {
    pub(crate) fn new(node: &'static TypeNode) -> Self {
        Self { node }
    }

    pub fn name(&self) -> Arc<str> {
        self.node.name()
    }

    /// Receiver is `&self`.
    pub fn is_const(&self) -> bool {
        self.node.is_const_member()
    }
}

/// Type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberObjectType {
    node: &'static TypeNode,
}

impl MemberObjectType {
    pub(crate) fn new(node: &'static TypeNode) -> Self {
        Self { node }
    }

    pub fn name(&self) -> Arc<str> {
        self.node.name()
    }
}
