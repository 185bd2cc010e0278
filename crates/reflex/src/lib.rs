// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # reflex - dynamic runtime reflection
//!
//! Describe types once, then inspect and manipulate values of those types
//! without knowing them statically: read and write fields by name, call
//! registered functions with type-erased arguments, walk containers, and
//! drive generic serializers (see the `reflex-serd` crate).
//!
//! ## Quick Start
//!
//! ```rust
//! use reflex::{typeinfo, Any, Reflect, Registry};
//!
//! #[derive(Clone, Default, Reflect)]
//! struct Person {
//!     name: String,
//!     height: f32,
//! }
//!
//! Registry::global().register::<Person>();
//!
//! let mut person = Person { name: "VisualGMQ".into(), height: 1.5 };
//! let class = typeinfo::<Person>().as_class().expect("registered class");
//! let mut owner = Any::make_ref(&mut person);
//! let height = class.var("height").expect("height");
//! height.set_value(&mut owner, &Any::new(2i32)).expect("writable");
//! drop(owner);
//! assert_eq!(person.height, 2.0);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------+
//! |  Factory / EnumFactory / #[derive(Reflect)]   (registration)  |
//! +---------------------------------------------------------------+
//! |  TypeInfo -> ClassType, Numeric, ArrayType, ... (accessors)   |
//! |  CtorDescriptor / FunctionDescriptor / VariableDescriptor     |
//! +---------------------------------------------------------------+
//! |  Any<'a>  (Null | ConstRef | Ref | Copy) over an erased payload |
//! +---------------------------------------------------------------+
//! |  Registry -> TypeNode (leaked, one per type) -> TypeOperations |
//! +---------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Registry`] | Process-wide map from Rust types to nodes |
//! | [`TypeNode`] | Everything known about one type |
//! | [`Any`] | Type-erased value with an explicit access mode |
//! | [`Factory`] | Builder registering constructors, functions and variables |
//! | [`TypeInfo`] | Entry point to the category accessors |

// Lets generated code name `::reflex` from inside this crate's own tests.
extern crate self as reflex;

mod any;
mod descriptor;
mod error;
mod factory;
mod info;
mod node;
mod operations;
mod property;
mod reflect;
mod registry;
mod signature;
pub mod types;

pub use any::{Access, Any};
pub use descriptor::{
    invoke_by_any, invoke_by_any_ref, CtorDescriptor, FunctionDescriptor, VariableDescriptor,
};
pub use error::{BadAnyAccess, ReflError, Result};
pub use factory::{
    Constructor, EnumFactory, Factory, Function, Method, MethodMut, RefMethod, RefMethodMut,
};
pub use info::TypeInfo;
pub use node::{
    ContainerKind, CtorNode, FunctionNode, FundamentalFlags, Qualifiers, Receiver, StringKind,
    TypeCategory, TypeNode, TypeShape, ValueKind, VariableNode,
};
pub use operations::{
    Addressing, ArrayKind, ContainerOperations, ErasedClone, ErasedDefault, Mapping, Number,
    NumericKind, NumericOperations, NumericValue, OperationsBuilder, OptionLike,
    OptionalOperations, Sequence, SetLike, TypeOperations,
};
pub use property::{ClassVisitor, Property, PropertyKind};
pub use reflect::Reflect;
pub use registry::{enum_factory, factory, resolve, typeinfo, Register, Registry};
pub use signature::{ArgList, FieldSignature, FunctionSignature, MethodSignature};
pub use types::{
    ArrayType, Boolean, ClassType, EnumType, FunctionType, FundamentalType, MapType,
    MemberFunctionType, MemberObjectType, Numeric, OptionalType, PointerType, SetType, StringType,
};

#[cfg(feature = "derive")]
pub use reflex_derive::Reflect;
