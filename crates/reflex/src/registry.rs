// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Process-wide type registry.
//!
//! # Architecture
//!
//! ```text
//! Registry (static global, OnceLock)
//! +-- nodes: RwLock<HashMap<TypeId, &'static TypeNode>>
//! +-- order: RwLock<Vec<&'static TypeNode>>     (resolution order)
//! +-- registrars: Mutex<HashSet<TypeId>>          (Register impls already run)
//! ```
//!
//! Nodes are built outside the lock and inserted under the write lock; the
//! first inserted node wins, so concurrent first use still yields one node
//! per type. Registration (factories) should complete before values are
//! used; [`Registry::init`] gives a single deterministic entry point.

use std::any::TypeId;
use std::collections::{HashMap, HashSet};
use std::sync::{Once, OnceLock};

use parking_lot::{Mutex, RwLock};

use crate::factory::{EnumFactory, Factory};
use crate::info::TypeInfo;
use crate::node::TypeNode;
use crate::operations::TypeOperations;
use crate::Reflect;

/// A type that knows how to describe itself to a [`Registry`].
///
/// Usually generated by `#[derive(Reflect)]`.
pub trait Register: Reflect {
    fn register(registry: &Registry);
}

/// Registry of type nodes.
pub struct Registry {
    nodes: RwLock<HashMap<TypeId, &'static TypeNode>>,
    order: RwLock<Vec<&'static TypeNode>>,
    registrars: Mutex<HashSet<TypeId>>,
    init: Once,
}

static GLOBAL: OnceLock<Registry> = OnceLock::new();

impl Registry {
    fn new() -> Self {
        Self {
            nodes: RwLock::new(HashMap::new()),
            order: RwLock::new(Vec::new()),
            registrars: Mutex::new(HashSet::new()),
            init: Once::new(),
        }
    }

    /// The process-wide registry.
    pub fn global() -> &'static Registry {
        GLOBAL.get_or_init(Registry::new)
    }

    /// Run `register` once for the process and return the registry.
    ///
    /// Later calls skip `register` and just return the registry.
    pub fn init(register: impl FnOnce(&Registry)) -> &'static Registry {
        let registry = Self::global();
        registry.init.call_once(|| {
            log::debug!("[Registry] running initial registration");
            register(registry);
        });
        registry
    }

    /// Node for `T`, created on first use.
    pub fn resolve<T: Reflect>(&self) -> &'static TypeNode {
        let id = TypeId::of::<T>();
        if let Some(node) = self.nodes.read().get(&id) {
            return *node;
        }

        // Shapes resolve their element types, so build without holding the lock.
        let shape = T::shape();
        let mut operations = T::operations();
        if operations.type_id() != id {
            log::error!(
                "[Registry] operations of {} were built for {}, falling back to move-only",
                std::any::type_name::<T>(),
                operations.type_name()
            );
            operations = TypeOperations::builder::<T>().build();
        }

        let mut nodes = self.nodes.write();
        if let Some(node) = nodes.get(&id) {
            return *node;
        }
        let operations: &'static TypeOperations = Box::leak(Box::new(operations));
        let node: &'static TypeNode = Box::leak(Box::new(TypeNode::new(
            id,
            std::any::type_name::<T>(),
            shape,
            operations,
        )));
        nodes.insert(id, node);
        self.order.write().push(node);
        log::debug!("[Registry] resolved {}", node.rust_name());
        node
    }

    pub fn find(&self, id: TypeId) -> Option<&'static TypeNode> {
        self.nodes.read().get(&id).copied()
    }

    /// Registered type whose display name is `name`.
    pub fn find_by_name(&self, name: &str) -> Option<&'static TypeNode> {
        self.order
            .read()
            .iter()
            .copied()
            .find(|node| node.is_registered() && &*node.name() == name)
    }

    /// Every resolved node, in resolution order.
    pub fn types(&self) -> Vec<&'static TypeNode> {
        self.order.read().clone()
    }

    /// Nodes described by a factory.
    pub fn registered_types(&self) -> Vec<&'static TypeNode> {
        self.order
            .read()
            .iter()
            .copied()
            .filter(|node| node.is_registered())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.order.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.read().is_empty()
    }

    /// Start describing `T` under `name`.
    pub fn factory<T: Reflect>(&self, name: &str) -> Factory<T> {
        Factory::new(self.resolve::<T>(), name)
    }

    /// Start describing the enum `T` under `name`.
    pub fn enum_factory<T>(&self, name: &str) -> EnumFactory<T>
    where
        T: Reflect + Clone + PartialEq + Send + Sync,
    {
        EnumFactory::new(self.resolve::<T>(), name)
    }

    /// Run `T`'s registration unless it already ran.
    pub fn register<T: Register>(&self) -> &Self {
        if !self.registrars.lock().insert(TypeId::of::<T>()) {
            log::warn!(
                "[Registry] {} already registered, skipping",
                std::any::type_name::<T>()
            );
            return self;
        }
        T::register(self);
        self
    }

    /// Run every registration function in order.
    pub fn register_all(&self, registrars: &[fn(&Registry)]) -> &Self {
        for register in registrars {
            register(self);
        }
        self
    }
}

/// Node for `T` in the global registry.
pub fn resolve<T: Reflect>() -> &'static TypeNode {
    Registry::global().resolve::<T>()
}

/// [`TypeInfo`] view of `T`.
pub fn typeinfo<T: Reflect>() -> TypeInfo {
    TypeInfo::from(resolve::<T>())
}

/// Start describing `T` in the global registry.
pub fn factory<T: Reflect>(name: &str) -> Factory<T> {
    Registry::global().factory::<T>(name)
}

/// Start describing the enum `T` in the global registry.
pub fn enum_factory<T>(name: &str) -> EnumFactory<T>
where
    T: Reflect + Clone + PartialEq + Send + Sync,
{
    Registry::global().enum_factory::<T>(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TypeShape;

    struct Wrong;

    impl Reflect for Wrong {
        fn shape() -> TypeShape {
            TypeShape::class("Wrong")
        }

        fn operations() -> TypeOperations {
            TypeOperations::builder::<u64>().cloneable().build()
        }
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let a = resolve::<u32>();
        let b = Registry::global().resolve::<u32>();
        assert!(std::ptr::eq(a, b));
        assert!(Registry::global().find(TypeId::of::<u32>()).is_some());
        assert!(!Registry::global().is_empty());
    }

    #[test]
    fn test_mismatched_operations_fall_back() {
        let node = resolve::<Wrong>();
        assert_eq!(node.operations().type_id(), TypeId::of::<Wrong>());
        assert!(!node.operations().is_copyable());
    }

    #[test]
    fn test_concurrent_resolution_yields_one_node() {
        struct Racy;
        impl Reflect for Racy {
            fn shape() -> TypeShape {
                TypeShape::class("Racy")
            }
            fn operations() -> TypeOperations {
                TypeOperations::builder::<Racy>().build()
            }
        }

        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(|| resolve::<Racy>() as *const TypeNode as usize))
            .collect();
        let addrs: HashSet<usize> = handles
            .into_iter()
            .map(|h| h.join().expect("thread"))
            .collect();
        assert_eq!(addrs.len(), 1);
    }
}
