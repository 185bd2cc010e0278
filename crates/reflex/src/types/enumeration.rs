// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use std::sync::Arc;

use super::holds;
use crate::any::Any;
use crate::error::BadAnyAccess;
use crate::node::TypeNode;

/// Enum accessor. Items are only known once an enum factory has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumType {
    node: &'static TypeNode,
}

impl EnumType {
    pub(crate) fn new(node: &'static TypeNode) -> Self {
        Self { node }
    }

    pub fn name(&self) -> Arc<str> {
        self.node.name()
    }

    /// `(name, value)` pairs in registration order.
    pub fn items(&self) -> Vec<(String, i64)> {
        match self.node.enum_info() {
            Some(info) => info
                .items
                .read()
                .iter()
                .map(|item| (item.name.clone(), item.value))
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn name_of(&self, value: i64) -> Option<String> {
        let info = self.node.enum_info()?;
        let items = info.items.read();
        items.iter().find(|item| item.value == value).map(|item| item.name.clone())
    }

    pub fn value_of(&self, name: &str) -> Option<i64> {
        let info = self.node.enum_info()?;
        let items = info.items.read();
        items.iter().find(|item| item.name == name).map(|item| item.value)
    }

    /// Integer value of the enumerator held by `value`.
    pub fn get_value(&self, value: &Any<'_>) -> Option<i64> {
        if !holds(self.node, value, "get_value") {
            return None;
        }
        let info = self.node.enum_info()?;
        (info.read)(info, value)
    }

    /// Name of the enumerator held by `value`.
    pub fn get_name(&self, value: &Any<'_>) -> Option<String> {
        self.get_value(value).and_then(|v| self.name_of(v))
    }

    /// Switch `value` to the enumerator registered with `raw`.
    pub fn set_value(&self, value: &mut Any<'_>, raw: i64) -> Result<bool, BadAnyAccess> {
        value.payload_mut()?;
        if !holds(self.node, value, "set_value") {
            return Ok(false);
        }
        let Some(info) = self.node.enum_info() else {
            log::warn!("[{}] set_value: enum has no registered items", self.node.name());
            return Ok(false);
        };
        Ok((info.write)(info, value, raw))
    }
}
