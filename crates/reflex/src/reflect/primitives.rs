// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use crate::node::{StringKind, TypeShape};
use crate::operations::TypeOperations;
use crate::Reflect;

macro_rules! reflect_integral {
    ($($t:ty => $signed:expr),* $(,)?) => {
        $(impl Reflect for $t {
            fn shape() -> TypeShape {
                TypeShape::integral(stringify!($t), $signed)
            }

            fn operations() -> TypeOperations {
                TypeOperations::builder::<$t>().cloneable().defaulted().numeric().build()
            }
        })*
    };
}

reflect_integral! {
    i8 => true,
    i16 => true,
    i32 => true,
    i64 => true,
    isize => true,
    u8 => false,
    u16 => false,
    u32 => false,
    u64 => false,
    usize => false,
}

macro_rules! reflect_floating {
    ($($t:ty),*) => {
        $(impl Reflect for $t {
            fn shape() -> TypeShape {
                TypeShape::floating_point(stringify!($t))
            }

            fn operations() -> TypeOperations {
                TypeOperations::builder::<$t>().cloneable().defaulted().numeric().build()
            }
        })*
    };
}

reflect_floating!(f32, f64);

impl Reflect for bool {
    fn shape() -> TypeShape {
        TypeShape::boolean("bool")
    }

    fn operations() -> TypeOperations {
        TypeOperations::builder::<bool>().cloneable().defaulted().build()
    }
}

impl Reflect for char {
    fn shape() -> TypeShape {
        TypeShape::string("char", StringKind::Char, None)
    }

    fn operations() -> TypeOperations {
        TypeOperations::builder::<char>().cloneable().defaulted().build()
    }
}

impl Reflect for () {
    fn shape() -> TypeShape {
        TypeShape::fundamental("()")
    }

    fn operations() -> TypeOperations {
        TypeOperations::builder::<()>().cloneable().defaulted().build()
    }
}
