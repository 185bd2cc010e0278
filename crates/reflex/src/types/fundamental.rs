// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use std::sync::Arc;

use super::holds;
use crate::any::Any;
use crate::error::BadAnyAccess;
use crate::node::{FundamentalFlags, TypeNode};
use crate::operations::{Number, NumericKind, NumericOperations};

/// Fundamental type: numbers, `bool`, `char` and `()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FundamentalType {
    node: &'static TypeNode,
}

impl FundamentalType {
    pub(crate) fn new(node: &'static TypeNode) -> Self {
        Self { node }
    }

    pub fn name(&self) -> Arc<str> {
        self.node.name()
    }

    pub fn flags(&self) -> FundamentalFlags {
        self.node.flags()
    }

    pub fn is_integral(&self) -> bool {
        self.node.flags().is_integral
    }

    pub fn is_floating_point(&self) -> bool {
        self.node.flags().is_floating_point
    }

    pub fn is_signed(&self) -> bool {
        self.node.flags().is_signed
    }

    pub fn is_boolean(&self) -> bool {
        self.node.flags().is_boolean
    }
}

/// Numeric type accessor.
///
/// [`get_value`](Self::get_value) carries every number as an `f64` and is
/// lossy for 64-bit integers above 2^53; [`get_number`](Self::get_number)
/// is exact.
#[derive(Debug, Clone, Copy)]
pub struct Numeric {
    node: &'static TypeNode,
    ops: NumericOperations,
}

impl PartialEq for Numeric {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.node, other.node)
    }
}

impl Numeric {
    pub(crate) fn new(node: &'static TypeNode) -> Option<Self> {
        let ops = *node.operations().numeric()?;
        Some(Self { node, ops })
    }

    pub fn name(&self) -> Arc<str> {
        self.node.name()
    }

    pub fn numeric_kind(&self) -> NumericKind {
        self.ops.kind()
    }

    pub fn is_integral(&self) -> bool {
        self.ops.kind().is_integral()
    }

    pub fn is_floating_point(&self) -> bool {
        self.ops.kind().is_floating_point()
    }

    pub fn is_signed(&self) -> bool {
        self.ops.kind().is_signed()
    }

    /// Exact value of `value`, `None` if it isn't this type.
    pub fn get_number(&self, value: &Any<'_>) -> Option<Number> {
        if !holds(self.node, value, "get_number") {
            return None;
        }
        // SAFETY: the value holds this node's type.
        Some(unsafe { (self.ops.get)(value.payload()) })
    }

    /// Value as a double; 0.0 if `value` isn't this type.
    pub fn get_value(&self, value: &Any<'_>) -> f64 {
        self.get_number(value).map_or(0.0, Number::as_f64)
    }

    /// Store `number` (converted with `as` semantics). `Ok(false)` if
    /// `value` isn't this type.
    pub fn set_value(&self, value: &mut Any<'_>, number: impl Into<Number>) -> Result<bool, BadAnyAccess> {
        let payload = value.payload_mut()?;
        if !holds(self.node, value, "set_value") {
            return Ok(false);
        }
        // SAFETY: the value holds this node's type and is writable.
        unsafe { (self.ops.set)(payload, number.into()) };
        Ok(true)
    }

    /// Zero of this type.
    pub fn default_construct(&self) -> Any<'static> {
        self.node.default_construct()
    }
}

/// `bool` accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boolean {
    node: &'static TypeNode,
}

impl Boolean {
    pub(crate) fn new(node: &'static TypeNode) -> Self {
        Self { node }
    }

    pub fn get_value(&self, value: &Any<'_>) -> Option<bool> {
        value.try_cast_const::<bool>().copied()
    }

    pub fn set_value(&self, value: &mut Any<'_>, flag: bool) -> Result<bool, BadAnyAccess> {
        match value.try_cast::<bool>()? {
            Some(slot) => {
                *slot = flag;
                Ok(true)
            }
            None => {
                log::warn!("[{}] set_value: value is {}", self.node.name(), value.type_info());
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{typeinfo, Any, Number, NumericKind};

    #[test]
    fn test_numeric_get_and_set() {
        let numeric = typeinfo::<i64>().as_numeric().expect("numeric");
        assert_eq!(numeric.numeric_kind(), NumericKind::I64);

        let mut n = i64::MAX;
        let mut any = Any::make_ref(&mut n);
        assert_eq!(numeric.get_number(&any), Some(Number::Signed(i64::MAX)));
        assert!(numeric.set_value(&mut any, 7u8).expect("mutable"));
        assert_eq!(numeric.get_value(&any), 7.0);
        drop(any);
        assert_eq!(n, 7);
    }

    #[test]
    fn test_numeric_rejects_other_types() {
        let numeric = typeinfo::<u16>().as_numeric().expect("numeric");
        let mut other = Any::new(3i32);
        assert_eq!(numeric.get_number(&other), None);
        assert!(!numeric.set_value(&mut other, 1u16).expect("mutable"));

        let fixed = 1u16;
        let mut view = Any::make_constref(&fixed);
        assert!(numeric.set_value(&mut view, 2u16).is_err());
    }

    #[test]
    fn test_boolean() {
        let boolean = typeinfo::<bool>().as_boolean().expect("bool");
        let mut flag = Any::new(false);
        assert!(boolean.set_value(&mut flag, true).expect("mutable"));
        assert_eq!(boolean.get_value(&flag), Some(true));
        assert!(typeinfo::<bool>().as_numeric().is_none());
    }
}
