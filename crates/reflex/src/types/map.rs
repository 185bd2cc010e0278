// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::holds;
use crate::any::Any;
use crate::error::BadAnyAccess;
use crate::info::TypeInfo;
use crate::node::{TypeNode, ValueKind};
use crate::operations::{ContainerOperations, EntryOperations};

/// Associative container accessor (`HashMap`, `BTreeMap`).
#[derive(Clone, Copy)]
pub struct MapType {
    node: &'static TypeNode,
    ops: ContainerOperations,
    entries: EntryOperations,
}

impl MapType {
    pub(crate) fn new(node: &'static TypeNode) -> Option<Self> {
        if node.value_kind() != ValueKind::Map {
            return None;
        }
        let ops = *node.operations().container()?;
        let entries = ops.entries?;
        Some(Self { node, ops, entries })
    }

    pub fn key_type(&self) -> TypeInfo {
        TypeInfo::from(self.node.key_type())
    }

    pub fn mapped_type(&self) -> TypeInfo {
        TypeInfo::from(self.node.mapped_type())
    }

    /// `(key, value)` tuple type yielded by element traversal.
    pub fn entry_type(&self) -> TypeInfo {
        TypeInfo::from(self.node.elem_type())
    }

    pub fn size(&self, value: &Any<'_>) -> usize {
        if !holds(self.node, value, "size") {
            return 0;
        }
        // SAFETY: the value holds this node's type.
        unsafe { (self.ops.size)(value.payload()) }
    }

    /// Visit read-only views of every key and value.
    pub fn for_each(&self, value: &Any<'_>, mut f: impl FnMut(&Any<'_>, &Any<'_>)) {
        if !holds(self.node, value, "for_each") {
            return;
        }
        // SAFETY: the value holds this node's type.
        unsafe { (self.entries.for_each)(value.payload(), &mut |k, v| f(k, v)) }
    }

    /// Visit every key with a mutable view of its value.
    pub fn for_each_mut(
        &self,
        value: &mut Any<'_>,
        mut f: impl FnMut(&Any<'_>, &mut Any<'_>),
    ) -> Result<(), BadAnyAccess> {
        let payload = value.payload_mut()?;
        if !holds(self.node, value, "for_each_mut") {
            return Ok(());
        }
        // SAFETY: the value holds this node's type and is writable.
        unsafe { (self.entries.for_each_mut)(payload, &mut |k, v| f(k, v)) };
        Ok(())
    }

    /// Insert or replace; `Ok(false)` when key or value has the wrong type.
    pub fn insert(&self, value: &mut Any<'_>, key: &Any<'_>, mapped: &Any<'_>) -> Result<bool, BadAnyAccess> {
        let payload = value.payload_mut()?;
        if !holds(self.node, value, "insert") {
            return Ok(false);
        }
        // SAFETY: the value holds this node's type and is writable.
        Ok(unsafe { (self.entries.insert)(payload, key, mapped) })
    }

    pub fn clear(&self, value: &mut Any<'_>) -> Result<bool, BadAnyAccess> {
        let payload = value.payload_mut()?;
        if !holds(self.node, value, "clear") {
            return Ok(false);
        }
        // SAFETY: the value holds this node's type and is writable.
        Ok(unsafe { (self.ops.clear)(payload) })
    }
}

impl std::fmt::Debug for MapType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapType").field("node", &self.node).finish()
    }
}

/// Set accessor (`HashSet`, `BTreeSet`).
#[derive(Debug, Clone, Copy)]
pub struct SetType {
    node: &'static TypeNode,
    ops: ContainerOperations,
}

impl SetType {
    pub(crate) fn new(node: &'static TypeNode) -> Option<Self> {
        let ops = *node.operations().container()?;
        Some(Self { node, ops })
    }

    pub fn elem_type(&self) -> TypeInfo {
        TypeInfo::from(self.node.elem_type())
    }

    pub fn size(&self, value: &Any<'_>) -> usize {
        if !holds(self.node, value, "size") {
            return 0;
        }
        // SAFETY: the value holds this node's type.
        unsafe { (self.ops.size)(value.payload()) }
    }

    /// Visit read-only views of every element.
    pub fn for_each(&self, value: &Any<'_>, mut f: impl FnMut(&Any<'_>)) {
        if !holds(self.node, value, "for_each") {
            return;
        }
        // SAFETY: the value holds this node's type.
        unsafe { (self.ops.travel)(value.payload(), &mut |elem| f(elem)) }
    }

    /// Insert a copy of `elem`; `Ok(false)` when it was already present or
    /// has the wrong type.
    pub fn insert(&self, value: &mut Any<'_>, elem: &Any<'_>) -> Result<bool, BadAnyAccess> {
        let payload = value.payload_mut()?;
        if !holds(self.node, value, "insert") {
            return Ok(false);
        }
        // SAFETY: the value holds this node's type and is writable.
        Ok(unsafe { (self.ops.push_back)(payload, elem) })
    }

    pub fn clear(&self, value: &mut Any<'_>) -> Result<bool, BadAnyAccess> {
        let payload = value.payload_mut()?;
        if !holds(self.node, value, "clear") {
            return Ok(false);
        }
        // SAFETY: the value holds this node's type and is writable.
        Ok(unsafe { (self.ops.clear)(payload) })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use crate::{typeinfo, Any};

    #[test]
    fn test_map_insert_and_iterate() {
        let map = typeinfo::<BTreeMap<String, i32>>().as_map().expect("map");
        assert_eq!(map.key_type(), typeinfo::<String>());
        assert_eq!(map.mapped_type(), typeinfo::<i32>());

        let mut values: BTreeMap<String, i32> = BTreeMap::new();
        let mut any = Any::make_ref(&mut values);
        assert!(map
            .insert(&mut any, &Any::new(String::from("a")), &Any::new(1i32))
            .expect("mutable"));
        assert!(!map.insert(&mut any, &Any::new(1u8), &Any::new(1i32)).expect("mutable"));
        map.for_each_mut(&mut any, |_, v| {
            *v.try_cast::<i32>().expect("mutable").expect("i32") += 1;
        })
        .expect("mutable");

        let mut seen = Vec::new();
        map.for_each(&any, |k, v| {
            seen.push((
                k.try_cast_const::<String>().cloned(),
                v.try_cast_const::<i32>().copied(),
            ));
        });
        assert_eq!(seen, [(Some(String::from("a")), Some(2))]);
        assert_eq!(map.size(&any), 1);
    }

    #[test]
    fn test_set_insert() {
        let set = typeinfo::<BTreeSet<u8>>().as_set().expect("set");
        let mut values: BTreeSet<u8> = BTreeSet::new();
        let mut any = Any::make_ref(&mut values);
        assert!(set.insert(&mut any, &Any::new(4u8)).expect("mutable"));
        assert!(!set.insert(&mut any, &Any::new(4u8)).expect("mutable"));
        let mut sum = 0;
        set.for_each(&any, |e| sum += e.try_cast_const::<u8>().copied().unwrap_or(0));
        assert_eq!(sum, 4);
        assert!(set.clear(&mut any).expect("mutable"));
        assert_eq!(set.size(&any), 0);
    }
}
