// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Reflected value -> TOML.

use reflex::{Any, Number, TypeInfo, ValueKind};
use toml::{Table, Value};

use crate::config::{EnumMode, NumberMode, SerdConfig};
use crate::error::{Result, SerdError};
use crate::methods::SerdMethods;

pub(crate) struct Writer<'c> {
    config: &'c SerdConfig,
    methods: &'static SerdMethods,
}

impl<'c> Writer<'c> {
    pub(crate) fn new(config: &'c SerdConfig) -> Self {
        Self {
            config,
            methods: SerdMethods::global(),
        }
    }

    /// TOML form of `value`; `None` when there is nothing to write (empty
    /// optional, pointer, unknown kind).
    pub(crate) fn write(&self, value: &Any<'_>, depth: usize) -> Result<Option<Value>> {
        if depth > self.config.max_depth {
            return Err(SerdError::TooDeep(self.config.max_depth));
        }
        let Some(node) = value.type_node() else {
            return Err(SerdError::Null);
        };
        if let Some(methods) = self.methods.find(node.type_id()) {
            return (methods.serialize)(value).map(Some);
        }

        let info = value.type_info();
        match info.value_kind() {
            ValueKind::Boolean => {
                let flag = info
                    .as_boolean()
                    .and_then(|b| b.get_value(value))
                    .ok_or_else(|| SerdError::unsupported("read boolean", &*info.name()))?;
                Ok(Some(Value::Boolean(flag)))
            }
            ValueKind::Numeric => self.write_number(&info, value).map(Some),
            ValueKind::String => {
                let text = info
                    .as_string()
                    .and_then(|s| s.get_str(value))
                    .ok_or_else(|| SerdError::unsupported("read string", &*info.name()))?;
                Ok(Some(Value::String(text.into_owned())))
            }
            ValueKind::Enum => self.write_enum(&info, value).map(Some),
            ValueKind::Class => self.write_class(&info, value, depth).map(Some),
            ValueKind::Array => self.write_array(&info, value, depth).map(Some),
            ValueKind::Optional => {
                let Some(optional) = info.as_optional() else {
                    return Err(SerdError::unsupported("read optional", &*info.name()));
                };
                if !optional.has_value(value) {
                    return Ok(None);
                }
                self.write(&optional.get_value_const(value), depth + 1)
            }
            ValueKind::Map => self.write_map(&info, value, depth).map(Some),
            ValueKind::Set => self.write_set(&info, value, depth).map(Some),
            ValueKind::Pointer => {
                log::warn!("[Serd] {}: pointers can't be serialized, skipping", info.name());
                Ok(None)
            }
            ValueKind::None => {
                log::warn!("[Serd] {}: unknown value kind, skipping", info.name());
                Ok(None)
            }
        }
    }

    fn write_number(&self, info: &TypeInfo, value: &Any<'_>) -> Result<Value> {
        let number = info
            .as_numeric()
            .and_then(|n| n.get_number(value))
            .ok_or_else(|| SerdError::unsupported("read number", &*info.name()))?;
        if self.config.number_mode == NumberMode::Double {
            return Ok(Value::Float(number.as_f64()));
        }
        match number {
            Number::Signed(v) => Ok(Value::Integer(v)),
            Number::Unsigned(v) => i64::try_from(v)
                .map(Value::Integer)
                .map_err(|_| SerdError::OutOfRange {
                    type_name: info.name().to_string(),
                    value: v,
                }),
            Number::Float(v) => Ok(Value::Float(v)),
        }
    }

    fn write_enum(&self, info: &TypeInfo, value: &Any<'_>) -> Result<Value> {
        let enumeration = info
            .as_enum()
            .ok_or_else(|| SerdError::unsupported("read enum", &*info.name()))?;
        let unknown = || SerdError::UnknownItem {
            type_name: info.name().to_string(),
            item: "<unregistered>".into(),
        };
        match self.config.enum_mode {
            EnumMode::Value => enumeration.get_value(value).map(Value::Integer).ok_or_else(unknown),
            EnumMode::Name => enumeration.get_name(value).map(Value::String).ok_or_else(unknown),
        }
    }

    fn write_class(&self, info: &TypeInfo, value: &Any<'_>, depth: usize) -> Result<Value> {
        let class = info
            .as_class()
            .ok_or_else(|| SerdError::unsupported("read class", &*info.name()))?;
        let mut table = Table::new();
        for property in class.properties() {
            let field = property.call_const(value)?;
            if let Some(written) = self.write(&field, depth + 1)? {
                table.insert(property.name().to_owned(), written);
            }
        }
        Ok(Value::Table(table))
    }

    /// Container element. TOML has no null, so an empty element is an error.
    fn element(&self, elem: &Any<'_>, depth: usize) -> Result<Value> {
        self.write(elem, depth)?.ok_or_else(|| {
            SerdError::unsupported("write an empty container element", &*elem.type_info().name())
        })
    }

    fn write_array(&self, info: &TypeInfo, value: &Any<'_>, depth: usize) -> Result<Value> {
        let array = info
            .as_array()
            .ok_or_else(|| SerdError::unsupported("read array", &*info.name()))?;
        let mut items = Vec::with_capacity(array.size(value));
        for index in 0..array.size(value) {
            let elem = array.get_const(value, index);
            items.push(self.element(&elem, depth + 1)?);
        }
        Ok(Value::Array(items))
    }

    fn write_map(&self, info: &TypeInfo, value: &Any<'_>, depth: usize) -> Result<Value> {
        let map = info
            .as_map()
            .ok_or_else(|| SerdError::unsupported("read map", &*info.name()))?;
        let mut table = Table::new();
        let mut failure = None;
        map.for_each(value, |key, mapped| {
            if failure.is_some() {
                return;
            }
            let entry = map_key(key).and_then(|k| Ok((k, self.element(mapped, depth + 1)?)));
            match entry {
                Ok((key, written)) => {
                    table.insert(key, written);
                }
                Err(err) => failure = Some(err),
            }
        });
        match failure {
            Some(err) => Err(err),
            None => Ok(Value::Table(table)),
        }
    }

    fn write_set(&self, info: &TypeInfo, value: &Any<'_>, depth: usize) -> Result<Value> {
        let set = info
            .as_set()
            .ok_or_else(|| SerdError::unsupported("read set", &*info.name()))?;
        let mut items = Vec::with_capacity(set.size(value));
        let mut failure = None;
        set.for_each(value, |elem| {
            if failure.is_some() {
                return;
            }
            match self.element(elem, depth + 1) {
                Ok(written) => items.push(written),
                Err(err) => failure = Some(err),
            }
        });
        match failure {
            Some(err) => Err(err),
            None => Ok(Value::Array(items)),
        }
    }
}

/// Table key for a map key: strings as-is, numbers and booleans in their
/// display form, enumerators by name.
fn map_key(key: &Any<'_>) -> Result<String> {
    let info = key.type_info();
    let text = match info.value_kind() {
        ValueKind::String => info
            .as_string()
            .and_then(|s| s.get_str(key))
            .map(|s| s.into_owned()),
        ValueKind::Numeric => info.as_numeric().and_then(|n| n.get_number(key)).map(|n| match n {
            Number::Signed(v) => v.to_string(),
            Number::Unsigned(v) => v.to_string(),
            Number::Float(v) => v.to_string(),
        }),
        ValueKind::Boolean => info
            .as_boolean()
            .and_then(|b| b.get_value(key))
            .map(|b| b.to_string()),
        ValueKind::Enum => info.as_enum().and_then(|e| e.get_name(key)),
        _ => None,
    };
    text.ok_or_else(|| SerdError::unsupported("use as a table key", &*info.name()))
}
