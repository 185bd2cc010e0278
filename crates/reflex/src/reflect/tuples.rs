// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Pairs; map entries are described as `(key, value)` tuples.

use crate::node::TypeShape;
use crate::operations::{clone_erased, default_erased, ErasedClone, ErasedDefault, TypeOperations};
use crate::registry::resolve;
use crate::Reflect;

impl<A: Reflect, B: Reflect> ErasedClone for (A, B) {
    fn clone_erased(&self) -> Option<Self> {
        Some((clone_erased(&self.0)?, clone_erased(&self.1)?))
    }
}

impl<A: Reflect, B: Reflect> ErasedDefault for (A, B) {
    fn default_erased() -> Option<Self> {
        Some((default_erased::<A>()?, default_erased::<B>()?))
    }
}

impl<A: Reflect, B: Reflect> Reflect for (A, B) {
    fn shape() -> TypeShape {
        TypeShape::class(format!(
            "({}, {})",
            resolve::<A>().name(),
            resolve::<B>().name()
        ))
    }

    fn operations() -> TypeOperations {
        TypeOperations::builder::<Self>()
            .erased_clone()
            .erased_default()
            .build()
    }
}
