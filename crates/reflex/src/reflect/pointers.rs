// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Raw pointers and `'static` references.
//!
//! Pointer values are reflected as opaque handles: their nodes record the
//! pointee and its constness, the payload is never dereferenced.

use crate::node::TypeShape;
use crate::operations::TypeOperations;
use crate::registry::resolve;
use crate::Reflect;

impl<T: Reflect> Reflect for *const T {
    fn shape() -> TypeShape {
        let pointee = resolve::<T>();
        TypeShape::pointer(format!("*const {}", pointee.name()), pointee, true)
    }

    fn operations() -> TypeOperations {
        TypeOperations::builder::<Self>().cloneable().build()
    }
}

impl<T: Reflect> Reflect for *mut T {
    fn shape() -> TypeShape {
        let pointee = resolve::<T>();
        TypeShape::pointer(format!("*mut {}", pointee.name()), pointee, false)
    }

    fn operations() -> TypeOperations {
        TypeOperations::builder::<Self>().cloneable().build()
    }
}

impl<T: Reflect> Reflect for &'static T {
    fn shape() -> TypeShape {
        let pointee = resolve::<T>();
        TypeShape::reference(format!("&{}", pointee.name()), pointee, false)
    }

    fn operations() -> TypeOperations {
        TypeOperations::builder::<Self>().cloneable().build()
    }
}

impl<T: Reflect> Reflect for &'static mut T {
    fn shape() -> TypeShape {
        let pointee = resolve::<T>();
        TypeShape::reference(format!("&mut {}", pointee.name()), pointee, true)
    }

    fn operations() -> TypeOperations {
        TypeOperations::builder::<Self>().build()
    }
}
