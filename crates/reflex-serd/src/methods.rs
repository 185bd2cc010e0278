// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-type serialization overrides.
//!
//! A registered pair replaces the generic traversal for its type, wherever
//! the type appears (top level, property, container element).

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use reflex::{Any, Reflect};

use crate::error::{Result, SerdError};

type SerializeFn = dyn Fn(&Any<'_>) -> Result<toml::Value> + Send + Sync;
type DeserializeFn = dyn Fn(&mut Any<'_>, &toml::Value) -> Result<()> + Send + Sync;

pub(crate) struct Methods {
    pub(crate) serialize: Box<SerializeFn>,
    pub(crate) deserialize: Box<DeserializeFn>,
}

/// Registry of custom serialize/deserialize functions keyed by type.
pub struct SerdMethods {
    methods: RwLock<HashMap<TypeId, Arc<Methods>>>,
}

static GLOBAL: OnceLock<SerdMethods> = OnceLock::new();

impl SerdMethods {
    fn new() -> Self {
        Self {
            methods: RwLock::new(HashMap::new()),
        }
    }

    pub fn global() -> &'static SerdMethods {
        GLOBAL.get_or_init(SerdMethods::new)
    }

    /// Install `serialize`/`deserialize` for `T`, replacing any earlier pair.
    pub fn register<T, S, D>(&self, serialize: S, deserialize: D) -> &Self
    where
        T: Reflect,
        S: Fn(&T) -> Result<toml::Value> + Send + Sync + 'static,
        D: Fn(&mut T, &toml::Value) -> Result<()> + Send + Sync + 'static,
    {
        let type_name = std::any::type_name::<T>();
        let methods = Methods {
            serialize: Box::new(move |value| {
                let typed = value
                    .try_cast_const::<T>()
                    .ok_or_else(|| SerdError::unsupported("custom serialize", type_name))?;
                serialize(typed)
            }),
            deserialize: Box::new(move |value, node| {
                let typed = value
                    .try_cast::<T>()?
                    .ok_or_else(|| SerdError::unsupported("custom deserialize", type_name))?;
                deserialize(typed, node)
            }),
        };
        if self
            .methods
            .write()
            .insert(TypeId::of::<T>(), Arc::new(methods))
            .is_some()
        {
            log::debug!("[SerdMethods] replaced methods of {}", type_name);
        }
        self
    }

    /// Drop the pair registered for `T`.
    pub fn unregister<T: Reflect>(&self) -> bool {
        self.methods.write().remove(&TypeId::of::<T>()).is_some()
    }

    pub fn contains<T: Reflect>(&self) -> bool {
        self.methods.read().contains_key(&TypeId::of::<T>())
    }

    pub(crate) fn find(&self, id: TypeId) -> Option<Arc<Methods>> {
        self.methods.read().get(&id).cloned()
    }
}
