// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! TOML -> reflected value.

use reflex::{
    Any, ArrayKind, BadAnyAccess, ClassType, Number, Property, TypeInfo, TypeNode, ValueKind,
};
use toml::{Table, Value};

use crate::config::{MissingFieldPolicy, SerdConfig};
use crate::error::{Result, SerdError};
use crate::methods::SerdMethods;

pub(crate) struct Reader<'c> {
    config: &'c SerdConfig,
    methods: &'static SerdMethods,
}

/// Turn an accessor's `false` into an error.
fn ensure(done: bool, op: &'static str, info: &TypeInfo) -> Result<()> {
    if done {
        Ok(())
    } else {
        Err(SerdError::unsupported(op, &*info.name()))
    }
}

fn fresh(node: Option<&'static TypeNode>, info: &TypeInfo) -> Result<Any<'static>> {
    let value = node.map_or_else(Any::null, TypeNode::default_construct);
    if value.is_null() {
        return Err(SerdError::unsupported("default construct", &*info.name()));
    }
    Ok(value)
}

impl<'c> Reader<'c> {
    pub(crate) fn new(config: &'c SerdConfig) -> Self {
        Self {
            config,
            methods: SerdMethods::global(),
        }
    }

    /// Overwrite `target` with the content of `node`.
    pub(crate) fn read(&self, target: &mut Any<'_>, node: &Value, depth: usize) -> Result<()> {
        if depth > self.config.max_depth {
            return Err(SerdError::TooDeep(self.config.max_depth));
        }
        let Some(type_node) = target.type_node() else {
            return Err(SerdError::Null);
        };
        if target.is_constref() {
            return Err(BadAnyAccess.into());
        }
        if let Some(methods) = self.methods.find(type_node.type_id()) {
            return (methods.deserialize)(target, node);
        }

        let info = target.type_info();
        match info.value_kind() {
            ValueKind::Boolean => {
                let Value::Boolean(flag) = node else {
                    return Err(SerdError::mismatch(&*info.name(), "boolean", node));
                };
                let done = match info.as_boolean() {
                    Some(boolean) => boolean.set_value(target, *flag)?,
                    None => false,
                };
                ensure(done, "write boolean", &info)
            }
            ValueKind::Numeric => {
                let number = match node {
                    Value::Integer(v) => Number::Signed(*v),
                    Value::Float(v) => Number::Float(*v),
                    _ => return Err(SerdError::mismatch(&*info.name(), "number", node)),
                };
                let done = match info.as_numeric() {
                    Some(numeric) => numeric.set_value(target, number)?,
                    None => false,
                };
                ensure(done, "write number", &info)
            }
            ValueKind::String => {
                let Value::String(text) = node else {
                    return Err(SerdError::mismatch(&*info.name(), "string", node));
                };
                let done = match info.as_string() {
                    Some(string) if string.is_view() => {
                        log::warn!("[Serd] {}: borrowed text can't be deserialized, skipping", info.name());
                        return Ok(());
                    }
                    Some(string) => string.set_value(target, text)?,
                    None => false,
                };
                ensure(done, "write string", &info)
            }
            ValueKind::Enum => self.read_enum(&info, target, node),
            ValueKind::Class => {
                let Value::Table(table) = node else {
                    return Err(SerdError::mismatch(&*info.name(), "table", node));
                };
                let class = info
                    .as_class()
                    .ok_or_else(|| SerdError::unsupported("write class", &*info.name()))?;
                self.read_class(class, target, table, depth)
            }
            ValueKind::Array => self.read_array(&info, target, node, depth),
            ValueKind::Optional => {
                let optional = info
                    .as_optional()
                    .ok_or_else(|| SerdError::unsupported("write optional", &*info.name()))?;
                if !optional.has_value(target) {
                    let done = optional.emplace_default(target)?;
                    ensure(done, "emplace optional", &info)?;
                }
                let mut inner = optional.get_value(target)?;
                self.read(&mut inner, node, depth + 1)
            }
            ValueKind::Map => self.read_map(&info, target, node, depth),
            ValueKind::Set => self.read_set(&info, target, node, depth),
            ValueKind::Pointer => {
                log::warn!("[Serd] {}: pointers can't be deserialized, skipping", info.name());
                Ok(())
            }
            ValueKind::None => {
                log::warn!("[Serd] {}: unknown value kind, skipping", info.name());
                Ok(())
            }
        }
    }

    fn read_enum(&self, info: &TypeInfo, target: &mut Any<'_>, node: &Value) -> Result<()> {
        let enumeration = info
            .as_enum()
            .ok_or_else(|| SerdError::unsupported("write enum", &*info.name()))?;
        let unknown = |item: String| SerdError::UnknownItem {
            type_name: info.name().to_string(),
            item,
        };
        let raw = match node {
            Value::Integer(v) => *v,
            Value::String(name) => enumeration
                .value_of(name)
                .ok_or_else(|| unknown(name.clone()))?,
            _ => return Err(SerdError::mismatch(&*info.name(), "integer or string", node)),
        };
        if enumeration.set_value(target, raw)? {
            Ok(())
        } else {
            Err(unknown(raw.to_string()))
        }
    }

    pub(crate) fn read_class(
        &self,
        class: ClassType,
        target: &mut Any<'_>,
        table: &Table,
        depth: usize,
    ) -> Result<()> {
        for property in class.properties() {
            let Some(node) = table.get(property.name()) else {
                self.missing(&class, &property)?;
                continue;
            };
            if property.is_readonly() {
                log::debug!("[Serd] {}.{} is read-only, skipping", class.name(), property.name());
                continue;
            }
            let mut field = property.call(target)?;
            self.read(&mut field, node, depth + 1)?;
        }
        Ok(())
    }

    fn missing(&self, class: &ClassType, property: &Property) -> Result<()> {
        let field = property.name();
        match self.config.missing_field {
            MissingFieldPolicy::Ignore => {
                log::warn!(
                    "[Serd] {}: field '{}' missing, keeping current value",
                    class.name(),
                    field
                );
                Ok(())
            }
            MissingFieldPolicy::Error => Err(SerdError::MissingField {
                class: class.name().to_string(),
                field: field.to_owned(),
            }),
        }
    }

    fn read_array(&self, info: &TypeInfo, target: &mut Any<'_>, node: &Value, depth: usize) -> Result<()> {
        let Value::Array(items) = node else {
            return Err(SerdError::mismatch(&*info.name(), "array", node));
        };
        let array = info
            .as_array()
            .ok_or_else(|| SerdError::unsupported("write array", &*info.name()))?;

        let count = if array.array_type() == ArrayKind::Static {
            array.size(target).min(items.len())
        } else {
            ensure(array.clear(target), "clear", info)?;
            ensure(array.resize(target, items.len()), "resize", info)?;
            items.len()
        };
        for (index, item) in items.iter().enumerate().take(count) {
            let mut elem = array.get(target, index)?;
            self.read(&mut elem, item, depth + 1)?;
        }
        Ok(())
    }

    fn read_map(&self, info: &TypeInfo, target: &mut Any<'_>, node: &Value, depth: usize) -> Result<()> {
        let Value::Table(table) = node else {
            return Err(SerdError::mismatch(&*info.name(), "table", node));
        };
        let map = info
            .as_map()
            .ok_or_else(|| SerdError::unsupported("write map", &*info.name()))?;
        let key_info = map.key_type();
        let mapped_info = map.mapped_type();

        ensure(map.clear(target)?, "clear", info)?;
        for (text, item) in table {
            let key = key_from_str(&key_info, text)?;
            let mut mapped = fresh(mapped_info.node(), &mapped_info)?;
            self.read(&mut mapped, item, depth + 1)?;
            ensure(map.insert(target, &key, &mapped)?, "insert", info)?;
        }
        Ok(())
    }

    fn read_set(&self, info: &TypeInfo, target: &mut Any<'_>, node: &Value, depth: usize) -> Result<()> {
        let Value::Array(items) = node else {
            return Err(SerdError::mismatch(&*info.name(), "array", node));
        };
        let set = info
            .as_set()
            .ok_or_else(|| SerdError::unsupported("write set", &*info.name()))?;
        let elem_info = set.elem_type();

        ensure(set.clear(target)?, "clear", info)?;
        for item in items {
            let mut elem = fresh(elem_info.node(), &elem_info)?;
            self.read(&mut elem, item, depth + 1)?;
            if !set.insert(target, &elem)? {
                log::debug!("[Serd] {}: duplicate element dropped", info.name());
            }
        }
        Ok(())
    }
}

/// Map key parsed back from its table-key text.
fn key_from_str(info: &TypeInfo, text: &str) -> Result<Any<'static>> {
    let mut key = fresh(info.node(), info)?;
    let bad_key = || SerdError::UnknownItem {
        type_name: info.name().to_string(),
        item: text.to_owned(),
    };
    let done = match info.value_kind() {
        ValueKind::String => match info.as_string() {
            Some(string) => string.set_value(&mut key, text)?,
            None => false,
        },
        ValueKind::Numeric => {
            let Some(numeric) = info.as_numeric() else {
                return Err(SerdError::unsupported("use as a table key", &*info.name()));
            };
            let number = if numeric.is_floating_point() {
                text.parse().map(Number::Float).map_err(|_| bad_key())?
            } else if numeric.is_signed() {
                text.parse().map(Number::Signed).map_err(|_| bad_key())?
            } else {
                text.parse().map(Number::Unsigned).map_err(|_| bad_key())?
            };
            numeric.set_value(&mut key, number)?
        }
        ValueKind::Boolean => {
            let flag: bool = text.parse().map_err(|_| bad_key())?;
            match info.as_boolean() {
                Some(boolean) => boolean.set_value(&mut key, flag)?,
                None => false,
            }
        }
        ValueKind::Enum => {
            let Some(enumeration) = info.as_enum() else {
                return Err(SerdError::unsupported("use as a table key", &*info.name()));
            };
            let raw = enumeration.value_of(text).ok_or_else(bad_key)?;
            enumeration.set_value(&mut key, raw)?
        }
        _ => return Err(SerdError::unsupported("use as a table key", &*info.name())),
    };
    ensure(done, "write table key", info)?;
    Ok(key)
}
