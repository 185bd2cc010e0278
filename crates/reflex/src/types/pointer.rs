// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use std::sync::Arc;

use crate::info::TypeInfo;
use crate::node::{TypeNode, ValueKind};

/// Raw pointer or `'static` reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerType {
    node: &'static TypeNode,
}

impl PointerType {
    pub(crate) fn new(node: &'static TypeNode) -> Self {
        Self { node }
    }

    pub fn name(&self) -> Arc<str> {
        self.node.name()
    }

    fn layer_nodes(&self) -> impl Iterator<Item = &'static TypeNode> {
        std::iter::successors(Some(self.node), |node| node.pointee())
            .take_while(|node| node.value_kind() == ValueKind::Pointer)
    }

    /// Number of pointer/reference layers (`*const *mut T` has two).
    pub fn layers(&self) -> usize {
        self.layer_nodes().count()
    }

    /// Shared reference (`&'static T`).
    pub fn is_const(&self) -> bool {
        self.node.qualifiers().is_const
    }

    /// Whether the pointee is read-only through this layer.
    pub fn is_point_type_const(&self) -> bool {
        self.node.is_pointee_const()
    }

    /// Pointee constness of every layer, outermost first.
    pub fn constness(&self) -> Vec<bool> {
        self.layer_nodes().map(TypeNode::is_pointee_const).collect()
    }

    pub fn is_reference(&self) -> bool {
        self.node.qualifiers().is_reference
    }

    pub fn is_pointer(&self) -> bool {
        self.node.qualifiers().is_pointer
    }

    pub fn pointee(&self) -> TypeInfo {
        TypeInfo::from(self.node.pointee())
    }

    /// Type under every layer.
    pub fn raw_type(&self) -> TypeInfo {
        TypeInfo::from(self.node.raw_type())
    }
}
