// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use std::sync::Arc;

use super::holds;
use crate::any::{Access, Any};
use crate::error::BadAnyAccess;
use crate::info::TypeInfo;
use crate::node::{ContainerKind, TypeNode};
use crate::operations::{Addressing, ArrayKind, ContainerOperations};

/// Sequence accessor: fixed-size arrays, `Vec`, `VecDeque`, `LinkedList`
/// and user sequences. Fixed-size arrays refuse every size-changing call.
#[derive(Debug, Clone, Copy)]
pub struct ArrayType {
    node: &'static TypeNode,
    ops: ContainerOperations,
}

impl PartialEq for ArrayType {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.node, other.node)
    }
}

impl ArrayType {
    pub(crate) fn new(node: &'static TypeNode) -> Option<Self> {
        let ops = *node.operations().container()?;
        Some(Self { node, ops })
    }

    pub fn name(&self) -> Arc<str> {
        self.node.name()
    }

    pub fn elem_type(&self) -> TypeInfo {
        TypeInfo::from(self.node.elem_type())
    }

    pub fn array_type(&self) -> ArrayKind {
        self.ops.array_kind()
    }

    pub fn addressing_type(&self) -> Addressing {
        self.ops.addressing()
    }

    pub fn container_kind(&self) -> ContainerKind {
        self.ops.kind()
    }

    /// Length of a fixed-size array type.
    pub fn static_len(&self) -> Option<usize> {
        self.node.array_len()
    }

    pub fn size(&self, value: &Any<'_>) -> usize {
        if !holds(self.node, value, "size") {
            return 0;
        }
        // SAFETY: the value holds this node's type.
        unsafe { (self.ops.size)(value.payload()) }
    }

    pub fn capacity(&self, value: &Any<'_>) -> usize {
        if !holds(self.node, value, "capacity") {
            return 0;
        }
        // SAFETY: the value holds this node's type.
        unsafe { (self.ops.capacity)(value.payload()) }
    }

    fn elem_node(&self) -> Option<&'static TypeNode> {
        self.node.elem_type()
    }

    /// Mutable view of element `index`; null when out of range.
    pub fn get<'v>(&self, value: &'v mut Any<'_>, index: usize) -> Result<Any<'v>, BadAnyAccess> {
        let payload = value.payload_mut()?;
        let (true, Some(elem)) = (holds(self.node, value, "get"), self.elem_node()) else {
            return Ok(Any::null());
        };
        // SAFETY: the value holds this node's type and is writable for 'v.
        Ok(unsafe { Any::from_raw_parts(Access::Ref, (self.ops.get_mut)(payload, index), elem) })
    }

    /// Read-only view of element `index`; null when out of range.
    pub fn get_const<'v>(&self, value: &'v Any<'_>, index: usize) -> Any<'v> {
        let (true, Some(elem)) = (holds(self.node, value, "get_const"), self.elem_node()) else {
            return Any::null();
        };
        // SAFETY: the value holds this node's type and is borrowed for 'v.
        unsafe {
            Any::from_raw_parts(
                Access::ConstRef,
                (self.ops.get)(value.payload(), index).cast_mut(),
                elem,
            )
        }
    }

    /// Mutable view of the last element; null when empty.
    pub fn back<'v>(&self, value: &'v mut Any<'_>) -> Result<Any<'v>, BadAnyAccess> {
        match self.size(value).checked_sub(1) {
            Some(last) => self.get(value, last),
            None => Ok(Any::null()),
        }
    }

    pub fn back_const<'v>(&self, value: &'v Any<'_>) -> Any<'v> {
        match self.size(value).checked_sub(1) {
            Some(last) => self.get_const(value, last),
            None => Any::null(),
        }
    }

    /// Writable payload for a size-changing operation.
    fn resizable(&self, value: &mut Any<'_>, op: &str) -> Option<*mut u8> {
        if self.ops.array_kind() == ArrayKind::Static {
            log::warn!("[{}] {}: fixed-size array can't change size", self.node.name(), op);
            return None;
        }
        if !holds(self.node, value, op) {
            return None;
        }
        match value.payload_mut() {
            Ok(payload) => Some(payload),
            Err(_) => {
                log::warn!("[{}] {}: array is a const reference", self.node.name(), op);
                None
            }
        }
    }

    pub fn push_back(&self, value: &mut Any<'_>, elem: &Any<'_>) -> bool {
        let Some(payload) = self.resizable(value, "push_back") else {
            return false;
        };
        // SAFETY: payload holds this node's type and is writable.
        unsafe { (self.ops.push_back)(payload, elem) }
    }

    pub fn pop_back(&self, value: &mut Any<'_>) -> bool {
        let Some(payload) = self.resizable(value, "pop_back") else {
            return false;
        };
        // SAFETY: as above.
        unsafe { (self.ops.pop_back)(payload) }
    }

    /// Resize, default-constructing new elements.
    pub fn resize(&self, value: &mut Any<'_>, len: usize) -> bool {
        let Some(payload) = self.resizable(value, "resize") else {
            return false;
        };
        // SAFETY: as above.
        unsafe { (self.ops.resize)(payload, len) }
    }

    pub fn insert(&self, value: &mut Any<'_>, index: usize, elem: &Any<'_>) -> bool {
        let Some(payload) = self.resizable(value, "insert") else {
            return false;
        };
        // SAFETY: as above.
        unsafe { (self.ops.insert)(payload, index, elem) }
    }

    pub fn clear(&self, value: &mut Any<'_>) -> bool {
        let Some(payload) = self.resizable(value, "clear") else {
            return false;
        };
        // SAFETY: as above.
        unsafe { (self.ops.clear)(payload) }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::LinkedList;

    use crate::{typeinfo, Addressing, Any, ArrayKind};

    #[test]
    fn test_vec_operations() {
        let array = typeinfo::<Vec<i32>>().as_array().expect("array");
        assert_eq!(array.array_type(), ArrayKind::Dynamic);
        assert_eq!(array.addressing_type(), Addressing::Random);

        let mut values = vec![1i32, 2];
        let mut any = Any::make_ref(&mut values);
        assert!(array.push_back(&mut any, &Any::new(3i32)));
        assert!(array.insert(&mut any, 0, &Any::new(0i32)));
        assert_eq!(array.size(&any), 4);
        assert_eq!(array.back_const(&any).try_cast_const::<i32>(), Some(&3));
        {
            let mut first = array.get(&mut any, 0).expect("mutable");
            *first.try_cast::<i32>().expect("mutable").expect("i32") = 10;
        }
        assert!(array.get_const(&any, 9).is_null());
        assert!(array.resize(&mut any, 6));
        assert!(array.pop_back(&mut any));
        drop(any);
        assert_eq!(values, [10, 1, 2, 3, 0]);
    }

    #[test]
    fn test_static_array_refuses_resizing() {
        let array = typeinfo::<[u8; 3]>().as_array().expect("array");
        assert_eq!(array.array_type(), ArrayKind::Static);
        assert_eq!(array.static_len(), Some(3));

        let mut bytes = [1u8, 2, 3];
        let mut any = Any::make_ref(&mut bytes);
        assert_eq!(array.capacity(&any), 3);
        assert!(!array.push_back(&mut any, &Any::new(4u8)));
        assert!(!array.pop_back(&mut any));
        assert!(!array.resize(&mut any, 1));
        assert!(!array.insert(&mut any, 0, &Any::new(4u8)));
        assert!(!array.clear(&mut any));
        assert_eq!(array.size(&any), 3);
        assert_eq!(array.capacity(&any), 3);
        drop(any);
        assert_eq!(bytes, [1, 2, 3]);
    }

    #[test]
    fn test_const_array_refuses_mutation() {
        let array = typeinfo::<Vec<u8>>().as_array().expect("array");
        let values = vec![1u8];
        let mut any = Any::make_constref(&values);
        assert!(!array.push_back(&mut any, &Any::new(2u8)));
        assert!(array.get(&mut any, 0).is_err());
        assert_eq!(array.get_const(&any, 0).try_cast_const::<u8>(), Some(&1));
    }

    #[test]
    fn test_linked_list_is_forward() {
        let array = typeinfo::<LinkedList<i32>>().as_array().expect("array");
        assert_eq!(array.addressing_type(), Addressing::Forward);
        let mut list = LinkedList::from([1i32, 3]);
        let mut any = Any::make_ref(&mut list);
        assert!(array.insert(&mut any, 1, &Any::new(2i32)));
        drop(any);
        assert_eq!(list.into_iter().collect::<Vec<_>>(), [1, 2, 3]);
    }
}
