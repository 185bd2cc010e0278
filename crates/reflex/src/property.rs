// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Class properties and a visitor over their value categories.

use std::fmt;

use crate::any::Any;
use crate::descriptor::VariableDescriptor;
use crate::error::Result;
use crate::info::TypeInfo;
use crate::node::ValueKind;
use crate::types::{
    ArrayType, Boolean, ClassType, EnumType, MapType, Numeric, OptionalType, PointerType, SetType,
    StringType,
};

/// Value category of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    Numeric,
    Boolean,
    String,
    Enum,
    Class,
    Pointer,
    Array,
    Optional,
    Map,
    Set,
    Unknown,
}

impl From<ValueKind> for PropertyKind {
    fn from(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Numeric => Self::Numeric,
            ValueKind::Boolean => Self::Boolean,
            ValueKind::String => Self::String,
            ValueKind::Enum => Self::Enum,
            ValueKind::Class => Self::Class,
            ValueKind::Pointer => Self::Pointer,
            ValueKind::Array => Self::Array,
            ValueKind::Optional => Self::Optional,
            ValueKind::Map => Self::Map,
            ValueKind::Set => Self::Set,
            ValueKind::None => Self::Unknown,
        }
    }
}

/// Callbacks for [`Property::visit`]. Every method defaults to doing nothing.
#[allow(unused_variables)]
pub trait ClassVisitor {
    fn visit_numeric(&mut self, property: &Property, numeric: Numeric) {}
    fn visit_boolean(&mut self, property: &Property, boolean: Boolean) {}
    fn visit_string(&mut self, property: &Property, string: StringType) {}
    fn visit_enum(&mut self, property: &Property, enumeration: EnumType) {}
    fn visit_class(&mut self, property: &Property, class: ClassType) {}
    fn visit_pointer(&mut self, property: &Property, pointer: PointerType) {}
    fn visit_array(&mut self, property: &Property, array: ArrayType) {}
    fn visit_optional(&mut self, property: &Property, optional: OptionalType) {}
    fn visit_map(&mut self, property: &Property, map: MapType) {}
    fn visit_set(&mut self, property: &Property, set: SetType) {}
    fn visit_unknown(&mut self, property: &Property) {}
}

/// A member variable tagged with its value category.
#[derive(Clone, Copy)]
pub struct Property {
    var: VariableDescriptor,
    kind: PropertyKind,
}

impl Property {
    pub(crate) fn new(var: VariableDescriptor) -> Self {
        Self {
            kind: PropertyKind::from(var.var_type().value_kind()),
            var,
        }
    }

    pub fn name(&self) -> &'static str {
        self.var.name()
    }

    pub fn kind(&self) -> PropertyKind {
        self.kind
    }

    pub fn var_type(&self) -> TypeInfo {
        self.var.var_type()
    }

    pub fn descriptor(&self) -> VariableDescriptor {
        self.var
    }

    pub fn is_readonly(&self) -> bool {
        self.var.is_readonly()
    }

    /// Reference to this property of `owner`.
    pub fn call<'o>(&self, owner: &'o mut Any<'_>) -> Result<Any<'o>> {
        self.var.invoke(owner)
    }

    /// Const reference to this property of `owner`.
    pub fn call_const<'o>(&self, owner: &'o Any<'_>) -> Result<Any<'o>> {
        self.var.invoke_const(owner)
    }

    /// Dispatch to the visitor method matching the property's category.
    pub fn visit(&self, visitor: &mut dyn ClassVisitor) {
        let info = self.var_type();
        match self.kind {
            PropertyKind::Numeric => match info.as_numeric() {
                Some(numeric) => visitor.visit_numeric(self, numeric),
                None => visitor.visit_unknown(self),
            },
            PropertyKind::Boolean => match info.as_boolean() {
                Some(boolean) => visitor.visit_boolean(self, boolean),
                None => visitor.visit_unknown(self),
            },
            PropertyKind::String => match info.as_string() {
                Some(string) => visitor.visit_string(self, string),
                None => visitor.visit_unknown(self),
            },
            PropertyKind::Enum => match info.as_enum() {
                Some(enumeration) => visitor.visit_enum(self, enumeration),
                None => visitor.visit_unknown(self),
            },
            PropertyKind::Class => match info.as_class() {
                Some(class) => visitor.visit_class(self, class),
                None => visitor.visit_unknown(self),
            },
            PropertyKind::Pointer => match info.as_pointer() {
                Some(pointer) => visitor.visit_pointer(self, pointer),
                None => visitor.visit_unknown(self),
            },
            PropertyKind::Array => match info.as_array() {
                Some(array) => visitor.visit_array(self, array),
                None => visitor.visit_unknown(self),
            },
            PropertyKind::Optional => match info.as_optional() {
                Some(optional) => visitor.visit_optional(self, optional),
                None => visitor.visit_unknown(self),
            },
            PropertyKind::Map => match info.as_map() {
                Some(map) => visitor.visit_map(self, map),
                None => visitor.visit_unknown(self),
            },
            PropertyKind::Set => match info.as_set() {
                Some(set) => visitor.visit_set(self, set),
                None => visitor.visit_unknown(self),
            },
            PropertyKind::Unknown => visitor.visit_unknown(self),
        }
    }
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name())
            .field("kind", &self.kind)
            .finish()
    }
}
