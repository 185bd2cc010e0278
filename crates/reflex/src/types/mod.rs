// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Category accessors returned by the `TypeInfo::as_*` views.
//!
//! Every accessor checks that an [`Any`](crate::Any) it is handed really
//! holds its type before touching the payload; mismatches are logged and
//! reported as "nothing done".

mod array;
mod class;
mod enumeration;
mod function;
mod fundamental;
mod map;
mod optional;
mod pointer;
mod string;

pub use array::ArrayType;
pub use class::ClassType;
pub use enumeration::EnumType;
pub use function::{FunctionType, MemberFunctionType, MemberObjectType};
pub use fundamental::{Boolean, FundamentalType, Numeric};
pub use map::{MapType, SetType};
pub use optional::OptionalType;
pub use pointer::PointerType;
pub use string::StringType;

use crate::any::Any;
use crate::node::TypeNode;

/// Whether `value` holds exactly the type of `node`; logs when it doesn't.
pub(crate) fn holds(node: &'static TypeNode, value: &Any<'_>, op: &str) -> bool {
    match value.type_node() {
        Some(held) if std::ptr::eq(held, node) => true,
        held => {
            log::warn!(
                "[{}] {}: value is {}, not {}",
                node.name(),
                op,
                held.map_or_else(|| "null".into(), |n| n.name()),
                node.name()
            );
            false
        }
    }
}
