// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::holds;
use crate::any::{Access, Any};
use crate::error::BadAnyAccess;
use crate::info::TypeInfo;
use crate::node::TypeNode;
use crate::operations::OptionalOperations;

/// `Option<T>` accessor.
#[derive(Debug, Clone, Copy)]
pub struct OptionalType {
    node: &'static TypeNode,
    ops: OptionalOperations,
}

impl PartialEq for OptionalType {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.node, other.node)
    }
}

impl OptionalType {
    pub(crate) fn new(node: &'static TypeNode) -> Option<Self> {
        let ops = *node.operations().optional()?;
        Some(Self { node, ops })
    }

    pub fn elem_type(&self) -> TypeInfo {
        TypeInfo::from(self.node.elem_type())
    }

    pub fn has_value(&self, value: &Any<'_>) -> bool {
        // SAFETY: the value holds this node's type.
        holds(self.node, value, "has_value") && unsafe { (self.ops.has_value)(value.payload()) }
    }

    /// Mutable view of the contained value; null when empty.
    pub fn get_value<'v>(&self, value: &'v mut Any<'_>) -> Result<Any<'v>, BadAnyAccess> {
        let payload = value.payload_mut()?;
        let (true, Some(elem)) = (holds(self.node, value, "get_value"), self.node.elem_type()) else {
            return Ok(Any::null());
        };
        // SAFETY: the value holds this node's type and is writable for 'v.
        Ok(unsafe { Any::from_raw_parts(Access::Ref, (self.ops.get_mut)(payload), elem) })
    }

    /// Read-only view of the contained value; null when empty.
    pub fn get_value_const<'v>(&self, value: &'v Any<'_>) -> Any<'v> {
        let (true, Some(elem)) = (holds(self.node, value, "get_value_const"), self.node.elem_type())
        else {
            return Any::null();
        };
        // SAFETY: the value holds this node's type and is borrowed for 'v.
        unsafe { Any::from_raw_parts(Access::ConstRef, (self.ops.get)(value.payload()).cast_mut(), elem) }
    }

    /// Store a copy of `elem`.
    pub fn set_value(&self, value: &mut Any<'_>, elem: &Any<'_>) -> Result<bool, BadAnyAccess> {
        let payload = value.payload_mut()?;
        if !holds(self.node, value, "set_value") {
            return Ok(false);
        }
        // SAFETY: the value holds this node's type and is writable.
        Ok(unsafe { (self.ops.set)(payload, elem) })
    }

    /// Store a default-constructed element.
    pub fn emplace_default(&self, value: &mut Any<'_>) -> Result<bool, BadAnyAccess> {
        let elem = match self.node.elem_type() {
            Some(elem) => elem.default_construct(),
            None => Any::null(),
        };
        if elem.is_null() {
            log::warn!("[{}] emplace_default: element has no default", self.node.name());
            return Ok(false);
        }
        self.set_value(value, &elem)
    }

    pub fn reset(&self, value: &mut Any<'_>) -> Result<bool, BadAnyAccess> {
        let payload = value.payload_mut()?;
        if !holds(self.node, value, "reset") {
            return Ok(false);
        }
        // SAFETY: the value holds this node's type and is writable.
        unsafe { (self.ops.reset)(payload) };
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use crate::{typeinfo, Any};

    #[test]
    fn test_optional_lifecycle() {
        let optional = typeinfo::<Option<i32>>().as_optional().expect("optional");
        assert_eq!(optional.elem_type(), typeinfo::<i32>());

        let mut slot: Option<i32> = None;
        let mut any = Any::make_ref(&mut slot);
        assert!(!optional.has_value(&any));
        assert!(optional.get_value_const(&any).is_null());
        assert!(optional.set_value(&mut any, &Any::new(3i32)).expect("mutable"));
        assert_eq!(optional.get_value_const(&any).try_cast_const::<i32>(), Some(&3));
        assert!(optional.reset(&mut any).expect("mutable"));
        assert!(optional.emplace_default(&mut any).expect("mutable"));
        drop(any);
        assert_eq!(slot, Some(0));
    }
}
