// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Nullable view over a type node, with category predicates and accessors.

use std::fmt;
use std::ptr;
use std::sync::Arc;

use crate::node::{ContainerKind, Qualifiers, StringKind, TypeCategory, TypeNode, ValueKind};
use crate::types::{
    ArrayType, Boolean, ClassType, EnumType, FunctionType, FundamentalType, MapType,
    MemberFunctionType, MemberObjectType, Numeric, OptionalType, PointerType, SetType, StringType,
};

/// Handle on a type node; `TypeInfo::default()` describes no type.
#[derive(Clone, Copy, Default)]
pub struct TypeInfo(Option<&'static TypeNode>);

impl From<&'static TypeNode> for TypeInfo {
    fn from(node: &'static TypeNode) -> Self {
        Self(Some(node))
    }
}

impl From<Option<&'static TypeNode>> for TypeInfo {
    fn from(node: Option<&'static TypeNode>) -> Self {
        Self(node)
    }
}

impl TypeInfo {
    pub fn is_valid(&self) -> bool {
        self.0.is_some()
    }

    pub fn node(&self) -> Option<&'static TypeNode> {
        self.0
    }

    /// Display name, `"null"` for an invalid handle.
    pub fn name(&self) -> Arc<str> {
        match self.0 {
            Some(node) => node.name(),
            None => Arc::from("null"),
        }
    }

    pub fn category(&self) -> Option<TypeCategory> {
        self.0.map(TypeNode::category)
    }

    pub fn value_kind(&self) -> ValueKind {
        self.0.map(TypeNode::value_kind).unwrap_or_default()
    }

    pub fn container_kind(&self) -> ContainerKind {
        self.0.map(TypeNode::container_kind).unwrap_or_default()
    }

    pub fn qualifiers(&self) -> Qualifiers {
        self.0.map(TypeNode::qualifiers).unwrap_or_default()
    }

    /// Type with references, pointers and arrays stripped.
    pub fn raw_type(&self) -> TypeInfo {
        Self(self.0.map(TypeNode::raw_type))
    }

    pub fn elem_type(&self) -> TypeInfo {
        Self(self.0.and_then(TypeNode::elem_type))
    }

    fn is(&self, category: TypeCategory) -> bool {
        self.category() == Some(category)
    }

    pub fn is_fundamental(&self) -> bool {
        self.is(TypeCategory::Fundamental)
    }

    pub fn is_compound(&self) -> bool {
        self.is(TypeCategory::Compound)
    }

    pub fn is_class(&self) -> bool {
        self.is(TypeCategory::Class)
    }

    pub fn is_enum(&self) -> bool {
        self.is(TypeCategory::Enum)
    }

    pub fn is_function(&self) -> bool {
        self.is(TypeCategory::Function)
    }

    pub fn is_member_function(&self) -> bool {
        self.is(TypeCategory::MemberFunction)
    }

    pub fn is_member_object(&self) -> bool {
        self.is(TypeCategory::MemberObject)
    }

    pub fn is_numeric(&self) -> bool {
        self.value_kind() == ValueKind::Numeric
    }

    pub fn is_integral(&self) -> bool {
        self.0.is_some_and(|node| node.flags().is_integral)
    }

    pub fn is_floating_point(&self) -> bool {
        self.0.is_some_and(|node| node.flags().is_floating_point)
    }

    pub fn is_signed(&self) -> bool {
        self.0.is_some_and(|node| node.flags().is_signed)
    }

    pub fn is_boolean(&self) -> bool {
        self.value_kind() == ValueKind::Boolean
    }

    pub fn is_string(&self) -> bool {
        self.value_kind() == ValueKind::String
    }

    pub fn is_pointer(&self) -> bool {
        self.qualifiers().is_pointer
    }

    pub fn is_reference(&self) -> bool {
        self.qualifiers().is_reference
    }

    /// Sequence of any kind, fixed-size or growable.
    pub fn is_array(&self) -> bool {
        self.value_kind() == ValueKind::Array
    }

    pub fn is_optional(&self) -> bool {
        self.value_kind() == ValueKind::Optional
    }

    pub fn is_map(&self) -> bool {
        self.value_kind() == ValueKind::Map
    }

    pub fn is_set(&self) -> bool {
        self.value_kind() == ValueKind::Set
    }

    pub fn is_const(&self) -> bool {
        self.qualifiers().is_const
    }

    pub fn is_default_constructible(&self) -> bool {
        self.0.is_some_and(TypeNode::is_default_constructible)
    }

    pub fn as_fundamental(&self) -> Option<FundamentalType> {
        self.0.filter(|_| self.is_fundamental()).map(FundamentalType::new)
    }

    pub fn as_function(&self) -> Option<FunctionType> {
        self.0.filter(|_| self.is_function()).map(FunctionType::new)
    }

    pub fn as_member_function(&self) -> Option<MemberFunctionType> {
        self.0.filter(|_| self.is_member_function()).map(MemberFunctionType::new)
    }

    pub fn as_member_object(&self) -> Option<MemberObjectType> {
        self.0.filter(|_| self.is_member_object()).map(MemberObjectType::new)
    }

    pub fn as_numeric(&self) -> Option<Numeric> {
        self.0.and_then(Numeric::new)
    }

    pub fn as_boolean(&self) -> Option<Boolean> {
        self.0.filter(|_| self.is_boolean()).map(Boolean::new)
    }

    pub fn as_string(&self) -> Option<StringType> {
        let node = self.0?;
        let kind: StringKind = node.string_kind()?;
        Some(StringType::new(node, kind))
    }

    pub fn as_enum(&self) -> Option<EnumType> {
        self.0.filter(|_| self.is_enum()).map(EnumType::new)
    }

    pub fn as_class(&self) -> Option<ClassType> {
        self.0.filter(|_| self.is_class()).map(ClassType::new)
    }

    pub fn as_pointer(&self) -> Option<PointerType> {
        self.0
            .filter(|_| self.value_kind() == ValueKind::Pointer)
            .map(PointerType::new)
    }

    pub fn as_array(&self) -> Option<ArrayType> {
        self.0.filter(|_| self.is_array()).and_then(ArrayType::new)
    }

    pub fn as_optional(&self) -> Option<OptionalType> {
        self.0.and_then(OptionalType::new)
    }

    pub fn as_map(&self) -> Option<MapType> {
        self.0.and_then(MapType::new)
    }

    pub fn as_set(&self) -> Option<SetType> {
        self.0.filter(|_| self.is_set()).and_then(SetType::new)
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        match (self.0, other.0) {
            (Some(a), Some(b)) => ptr::eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl Eq for TypeInfo {}

impl PartialEq<&'static TypeNode> for TypeInfo {
    fn eq(&self, other: &&'static TypeNode) -> bool {
        self.0.is_some_and(|node| ptr::eq(node, *other))
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(node) => fmt::Debug::fmt(node, f),
            None => f.write_str("TypeInfo(null)"),
        }
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typeinfo;

    #[test]
    fn test_null_info() {
        let info = TypeInfo::default();
        assert!(!info.is_valid());
        assert_eq!(&*info.name(), "null");
        assert!(info.as_class().is_none());
        assert_eq!(info.value_kind(), ValueKind::None);
    }

    #[test]
    fn test_predicates() {
        assert!(typeinfo::<i32>().is_numeric());
        assert!(typeinfo::<i32>().is_signed());
        assert!(!typeinfo::<u8>().is_signed());
        assert!(typeinfo::<f64>().is_floating_point());
        assert!(typeinfo::<bool>().is_boolean());
        assert!(typeinfo::<String>().is_string());
        assert!(typeinfo::<Vec<u8>>().is_array());
        assert!(typeinfo::<[u8; 4]>().is_compound());
        assert!(typeinfo::<Option<u8>>().is_optional());
        assert!(typeinfo::<*const u8>().is_pointer());
        assert!(typeinfo::<&'static u8>().is_reference());
    }

    #[test]
    fn test_raw_type_strips_layers() {
        assert_eq!(typeinfo::<*const *mut i32>().raw_type(), typeinfo::<i32>());
        assert_eq!(typeinfo::<[[u8; 2]; 3]>().raw_type(), typeinfo::<u8>());
        assert_eq!(typeinfo::<&'static f32>().raw_type(), typeinfo::<f32>());
    }
}
