// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Standard collections and `Option`.
//!
//! Element copies and defaults go through the element's own table, so a
//! `Vec<T>` is reflectable (and copyable at runtime) whenever `T` is,
//! without a `Clone` bound.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, LinkedList, VecDeque};
use std::hash::Hash;

use crate::node::{ContainerKind, TypeShape};
use crate::operations::{
    clone_erased, default_erased, Addressing, ArrayKind, ErasedClone, ErasedDefault, Mapping,
    OptionLike, Sequence, SetLike, TypeOperations,
};
use crate::registry::resolve;
use crate::Reflect;

impl<E: Reflect> Sequence for Vec<E> {
    type Item = E;

    const KIND: ContainerKind = ContainerKind::Vector;
    const ARRAY: ArrayKind = ArrayKind::Dynamic;
    const ADDRESSING: Addressing = Addressing::Random;

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn capacity(&self) -> usize {
        Vec::capacity(self)
    }

    fn get(&self, index: usize) -> Option<&E> {
        self.as_slice().get(index)
    }

    fn get_mut(&mut self, index: usize) -> Option<&mut E> {
        self.as_mut_slice().get_mut(index)
    }

    fn for_each(&self, f: &mut dyn FnMut(&E)) {
        self.iter().for_each(f);
    }

    fn for_each_mut(&mut self, f: &mut dyn FnMut(&mut E)) {
        self.iter_mut().for_each(f);
    }

    fn push(&mut self, item: E) -> bool {
        Vec::push(self, item);
        true
    }

    fn pop(&mut self) -> bool {
        Vec::pop(self).is_some()
    }

    fn insert(&mut self, index: usize, item: E) -> bool {
        if index > Vec::len(self) {
            return false;
        }
        Vec::insert(self, index, item);
        true
    }

    fn resize_with(&mut self, len: usize, fill: &mut dyn FnMut() -> Option<E>) -> bool {
        let current = Vec::len(self);
        if len <= current {
            self.truncate(len);
            return true;
        }
        let extra: Option<Vec<E>> = (current..len).map(|_| fill()).collect();
        match extra {
            Some(extra) => {
                self.extend(extra);
                true
            }
            None => false,
        }
    }

    fn clear(&mut self) -> bool {
        Vec::clear(self);
        true
    }
}

impl<E: Reflect> ErasedClone for Vec<E> {
    fn clone_erased(&self) -> Option<Self> {
        self.iter().map(clone_erased).collect()
    }
}

impl<E: Reflect> Reflect for Vec<E> {
    fn shape() -> TypeShape {
        let elem = resolve::<E>();
        TypeShape::sequence(format!("Vec<{}>", elem.name()), ContainerKind::Vector, elem)
    }

    fn operations() -> TypeOperations {
        TypeOperations::builder::<Self>()
            .erased_clone()
            .defaulted()
            .sequence()
            .build()
    }
}

impl<E: Reflect> Sequence for VecDeque<E> {
    type Item = E;

    const KIND: ContainerKind = ContainerKind::Custom;
    const ARRAY: ArrayKind = ArrayKind::Dynamic;
    const ADDRESSING: Addressing = Addressing::Random;

    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    fn capacity(&self) -> usize {
        VecDeque::capacity(self)
    }

    fn get(&self, index: usize) -> Option<&E> {
        VecDeque::get(self, index)
    }

    fn get_mut(&mut self, index: usize) -> Option<&mut E> {
        VecDeque::get_mut(self, index)
    }

    fn for_each(&self, f: &mut dyn FnMut(&E)) {
        self.iter().for_each(f);
    }

    fn for_each_mut(&mut self, f: &mut dyn FnMut(&mut E)) {
        self.iter_mut().for_each(f);
    }

    fn push(&mut self, item: E) -> bool {
        self.push_back(item);
        true
    }

    fn pop(&mut self) -> bool {
        self.pop_back().is_some()
    }

    fn insert(&mut self, index: usize, item: E) -> bool {
        if index > VecDeque::len(self) {
            return false;
        }
        VecDeque::insert(self, index, item);
        true
    }

    fn resize_with(&mut self, len: usize, fill: &mut dyn FnMut() -> Option<E>) -> bool {
        let current = VecDeque::len(self);
        if len <= current {
            self.truncate(len);
            return true;
        }
        let extra: Option<Vec<E>> = (current..len).map(|_| fill()).collect();
        match extra {
            Some(extra) => {
                self.extend(extra);
                true
            }
            None => false,
        }
    }

    fn clear(&mut self) -> bool {
        VecDeque::clear(self);
        true
    }
}

impl<E: Reflect> ErasedClone for VecDeque<E> {
    fn clone_erased(&self) -> Option<Self> {
        self.iter().map(clone_erased).collect()
    }
}

impl<E: Reflect> Reflect for VecDeque<E> {
    fn shape() -> TypeShape {
        let elem = resolve::<E>();
        TypeShape::sequence(format!("VecDeque<{}>", elem.name()), ContainerKind::Custom, elem)
    }

    fn operations() -> TypeOperations {
        TypeOperations::builder::<Self>()
            .erased_clone()
            .defaulted()
            .sequence()
            .build()
    }
}

impl<E: Reflect> Sequence for LinkedList<E> {
    type Item = E;

    const KIND: ContainerKind = ContainerKind::Custom;
    const ARRAY: ArrayKind = ArrayKind::Dynamic;
    const ADDRESSING: Addressing = Addressing::Forward;

    fn len(&self) -> usize {
        LinkedList::len(self)
    }

    fn get(&self, index: usize) -> Option<&E> {
        self.iter().nth(index)
    }

    fn get_mut(&mut self, index: usize) -> Option<&mut E> {
        self.iter_mut().nth(index)
    }

    fn for_each(&self, f: &mut dyn FnMut(&E)) {
        self.iter().for_each(f);
    }

    fn for_each_mut(&mut self, f: &mut dyn FnMut(&mut E)) {
        self.iter_mut().for_each(f);
    }

    fn push(&mut self, item: E) -> bool {
        self.push_back(item);
        true
    }

    fn pop(&mut self) -> bool {
        self.pop_back().is_some()
    }

    fn insert(&mut self, index: usize, item: E) -> bool {
        if index > LinkedList::len(self) {
            return false;
        }
        let mut tail = self.split_off(index);
        self.push_back(item);
        self.append(&mut tail);
        true
    }

    fn resize_with(&mut self, len: usize, fill: &mut dyn FnMut() -> Option<E>) -> bool {
        let current = LinkedList::len(self);
        if len <= current {
            drop(self.split_off(len));
            return true;
        }
        let extra: Option<LinkedList<E>> = (current..len).map(|_| fill()).collect();
        match extra {
            Some(mut extra) => {
                self.append(&mut extra);
                true
            }
            None => false,
        }
    }

    fn clear(&mut self) -> bool {
        LinkedList::clear(self);
        true
    }
}

impl<E: Reflect> ErasedClone for LinkedList<E> {
    fn clone_erased(&self) -> Option<Self> {
        self.iter().map(clone_erased).collect()
    }
}

impl<E: Reflect> Reflect for LinkedList<E> {
    fn shape() -> TypeShape {
        let elem = resolve::<E>();
        TypeShape::sequence(format!("LinkedList<{}>", elem.name()), ContainerKind::Custom, elem)
    }

    fn operations() -> TypeOperations {
        TypeOperations::builder::<Self>()
            .erased_clone()
            .defaulted()
            .sequence()
            .build()
    }
}

impl<E: Reflect, const N: usize> Sequence for [E; N] {
    type Item = E;

    const KIND: ContainerKind = ContainerKind::Array;
    const ARRAY: ArrayKind = ArrayKind::Static;
    const ADDRESSING: Addressing = Addressing::Random;

    fn len(&self) -> usize {
        N
    }

    fn get(&self, index: usize) -> Option<&E> {
        self.as_slice().get(index)
    }

    fn get_mut(&mut self, index: usize) -> Option<&mut E> {
        self.as_mut_slice().get_mut(index)
    }

    fn for_each(&self, f: &mut dyn FnMut(&E)) {
        self.iter().for_each(f);
    }

    fn for_each_mut(&mut self, f: &mut dyn FnMut(&mut E)) {
        self.iter_mut().for_each(f);
    }
}

impl<E: Reflect, const N: usize> ErasedClone for [E; N] {
    fn clone_erased(&self) -> Option<Self> {
        let items: Vec<E> = self.iter().map(clone_erased).collect::<Option<_>>()?;
        items.try_into().ok()
    }
}

impl<E: Reflect, const N: usize> ErasedDefault for [E; N] {
    fn default_erased() -> Option<Self> {
        let items: Vec<E> = (0..N).map(|_| default_erased::<E>()).collect::<Option<_>>()?;
        items.try_into().ok()
    }
}

impl<E: Reflect, const N: usize> Reflect for [E; N] {
    fn shape() -> TypeShape {
        let elem = resolve::<E>();
        TypeShape::array(format!("[{}; {}]", elem.name(), N), elem, N)
    }

    fn operations() -> TypeOperations {
        TypeOperations::builder::<Self>()
            .erased_clone()
            .erased_default()
            .sequence()
            .build()
    }
}

impl<E: Reflect> OptionLike for Option<E> {
    type Item = E;

    fn get(&self) -> Option<&E> {
        self.as_ref()
    }

    fn get_mut(&mut self) -> Option<&mut E> {
        self.as_mut()
    }

    fn set(&mut self, item: E) {
        *self = Some(item);
    }

    fn reset(&mut self) {
        *self = None;
    }
}

impl<E: Reflect> ErasedClone for Option<E> {
    fn clone_erased(&self) -> Option<Self> {
        match self {
            Some(item) => clone_erased(item).map(Some),
            None => Some(None),
        }
    }
}

impl<E: Reflect> Reflect for Option<E> {
    fn shape() -> TypeShape {
        let elem = resolve::<E>();
        TypeShape::optional(format!("Option<{}>", elem.name()), elem)
    }

    fn operations() -> TypeOperations {
        TypeOperations::builder::<Self>()
            .erased_clone()
            .defaulted()
            .optional()
            .build()
    }
}

macro_rules! reflect_map {
    ($map:ident, $label:literal, $($bound:path),+) => {
        impl<K, V> Mapping for $map<K, V>
        where
            K: Reflect $(+ $bound)+,
            V: Reflect,
        {
            type Key = K;
            type Value = V;

            fn len(&self) -> usize {
                $map::len(self)
            }

            fn for_each_entry(&self, f: &mut dyn FnMut(&K, &V)) {
                for (key, value) in self {
                    f(key, value);
                }
            }

            fn for_each_entry_mut(&mut self, f: &mut dyn FnMut(&K, &mut V)) {
                for (key, value) in self.iter_mut() {
                    f(key, value);
                }
            }

            fn insert(&mut self, key: K, value: V) -> bool {
                $map::insert(self, key, value).is_none()
            }

            fn clear(&mut self) {
                $map::clear(self);
            }
        }

        impl<K, V> ErasedClone for $map<K, V>
        where
            K: Reflect $(+ $bound)+,
            V: Reflect,
        {
            fn clone_erased(&self) -> Option<Self> {
                self.iter()
                    .map(|(key, value)| Some((clone_erased(key)?, clone_erased(value)?)))
                    .collect()
            }
        }

        impl<K, V> Reflect for $map<K, V>
        where
            K: Reflect $(+ $bound)+,
            V: Reflect,
        {
            fn shape() -> TypeShape {
                let key = resolve::<K>();
                let value = resolve::<V>();
                TypeShape::map(
                    format!(concat!($label, "<{}, {}>"), key.name(), value.name()),
                    key,
                    value,
                    resolve::<(K, V)>(),
                )
            }

            fn operations() -> TypeOperations {
                TypeOperations::builder::<Self>()
                    .erased_clone()
                    .defaulted()
                    .mapping()
                    .build()
            }
        }
    };
}

reflect_map!(HashMap, "HashMap", Eq, Hash);
reflect_map!(BTreeMap, "BTreeMap", Ord);

macro_rules! reflect_set {
    ($set:ident, $label:literal, $($bound:path),+) => {
        impl<E> SetLike for $set<E>
        where
            E: Reflect $(+ $bound)+,
        {
            type Item = E;

            fn len(&self) -> usize {
                $set::len(self)
            }

            fn for_each(&self, f: &mut dyn FnMut(&E)) {
                self.iter().for_each(f);
            }

            fn insert(&mut self, item: E) -> bool {
                $set::insert(self, item)
            }

            fn clear(&mut self) {
                $set::clear(self);
            }
        }

        impl<E> ErasedClone for $set<E>
        where
            E: Reflect $(+ $bound)+,
        {
            fn clone_erased(&self) -> Option<Self> {
                self.iter().map(clone_erased).collect()
            }
        }

        impl<E> Reflect for $set<E>
        where
            E: Reflect $(+ $bound)+,
        {
            fn shape() -> TypeShape {
                let elem = resolve::<E>();
                TypeShape::set(format!(concat!($label, "<{}>"), elem.name()), elem)
            }

            fn operations() -> TypeOperations {
                TypeOperations::builder::<Self>()
                    .erased_clone()
                    .defaulted()
                    .set()
                    .build()
            }
        }
    };
}

reflect_set!(HashSet, "HashSet", Eq, Hash);
reflect_set!(BTreeSet, "BTreeSet", Ord);
