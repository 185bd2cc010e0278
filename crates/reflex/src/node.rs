// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type-node graph.
//!
//! One [`TypeNode`] exists per distinct Rust type for the lifetime of the
//! process. Nodes are created lazily by the [`Registry`](crate::Registry),
//! leaked to `&'static`, and compared by address.
//!
//! ```text
//! TypeNode (leaked, one per TypeId)
//! +-- shape: TypeShape        (immutable after creation)
//! +-- operations: &TypeOperations
//! +-- name: RwLock<Arc<str>>  (replaced by the factory)
//! +-- ctors / funcs / vars: RwLock<Vec<&'static ...Node>>  (append-only)
//! +-- enum_info: OnceLock<EnumInfo>
//! ```

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;

use crate::any::Any;
use crate::error::Result;
use crate::operations::TypeOperations;

/// Top-level classification of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCategory {
    /// Reference, pointer or fixed-size array over another type.
    Compound,
    Fundamental,
    Class,
    Function,
    MemberFunction,
    MemberObject,
    Enum,
}

/// Container family of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContainerKind {
    #[default]
    NotContainer,
    /// Fixed-size `[T; N]`.
    Array,
    Vector,
    Map,
    Set,
    String,
    /// Any other sequence (`VecDeque`, `LinkedList`, user types).
    Custom,
}

/// Serialization-facing classification of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ValueKind {
    #[default]
    None,
    Boolean,
    Numeric,
    String,
    Enum,
    Class,
    Pointer,
    Array,
    Optional,
    Map,
    Set,
}

/// Flavour of a string-like type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringKind {
    /// `String`
    Owned,
    /// `&'static str`
    View,
    /// `char`
    Char,
}

/// Qualifier flags. Rust has no volatile types so `is_volatile` is always false.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Qualifiers {
    pub is_const: bool,
    pub is_volatile: bool,
    pub is_reference: bool,
    pub is_pointer: bool,
    pub is_array: bool,
    pub is_member_pointer: bool,
}

/// Fundamental-type flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FundamentalFlags {
    pub is_integral: bool,
    pub is_floating_point: bool,
    pub is_signed: bool,
    pub is_boolean: bool,
}

/// Static description a type contributes when its node is first created.
///
/// Produced by [`Reflect::shape`](crate::Reflect::shape); element, key and
/// pointee nodes are resolved eagerly so the graph is complete at creation.
#[derive(Debug, Clone)]
pub struct TypeShape {
    pub(crate) name: String,
    pub(crate) category: TypeCategory,
    pub(crate) value_kind: ValueKind,
    pub(crate) qualifiers: Qualifiers,
    pub(crate) flags: FundamentalFlags,
    pub(crate) container: ContainerKind,
    pub(crate) string_kind: Option<StringKind>,
    pub(crate) elem: Option<&'static TypeNode>,
    pub(crate) key: Option<&'static TypeNode>,
    pub(crate) value: Option<&'static TypeNode>,
    pub(crate) pointee: Option<&'static TypeNode>,
    pub(crate) pointee_const: bool,
    pub(crate) raw: Option<&'static TypeNode>,
    pub(crate) len: Option<usize>,
    pub(crate) const_member: bool,
}

impl TypeShape {
    fn base(name: impl Into<String>, category: TypeCategory, value_kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            category,
            value_kind,
            qualifiers: Qualifiers::default(),
            flags: FundamentalFlags::default(),
            container: ContainerKind::NotContainer,
            string_kind: None,
            elem: None,
            key: None,
            value: None,
            pointee: None,
            pointee_const: false,
            raw: None,
            len: None,
            const_member: false,
        }
    }

    /// Fundamental type without a value classification (e.g. `()`).
    pub fn fundamental(name: impl Into<String>) -> Self {
        Self::base(name, TypeCategory::Fundamental, ValueKind::None)
    }

    /// Integral numeric type.
    pub fn integral(name: impl Into<String>, signed: bool) -> Self {
        let mut shape = Self::base(name, TypeCategory::Fundamental, ValueKind::Numeric);
        shape.flags.is_integral = true;
        shape.flags.is_signed = signed;
        shape
    }

    /// Floating-point numeric type.
    pub fn floating_point(name: impl Into<String>) -> Self {
        let mut shape = Self::base(name, TypeCategory::Fundamental, ValueKind::Numeric);
        shape.flags.is_floating_point = true;
        shape.flags.is_signed = true;
        shape
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        let mut shape = Self::base(name, TypeCategory::Fundamental, ValueKind::Boolean);
        shape.flags.is_boolean = true;
        shape
    }

    /// User-defined record type.
    pub fn class(name: impl Into<String>) -> Self {
        Self::base(name, TypeCategory::Class, ValueKind::Class)
    }

    pub fn enumeration(name: impl Into<String>) -> Self {
        Self::base(name, TypeCategory::Enum, ValueKind::Enum)
    }

    /// String-like type. `elem` is the character node for owned strings and views.
    pub fn string(
        name: impl Into<String>,
        kind: StringKind,
        elem: Option<&'static TypeNode>,
    ) -> Self {
        let category = match kind {
            StringKind::Char => TypeCategory::Fundamental,
            StringKind::Owned | StringKind::View => TypeCategory::Class,
        };
        let mut shape = Self::base(name, category, ValueKind::String);
        shape.string_kind = Some(kind);
        if kind != StringKind::Char {
            shape.container = ContainerKind::String;
            shape.elem = elem;
        }
        shape
    }

    /// Growable or custom sequence over `elem`.
    pub fn sequence(name: impl Into<String>, kind: ContainerKind, elem: &'static TypeNode) -> Self {
        let mut shape = Self::base(name, TypeCategory::Class, ValueKind::Array);
        shape.container = kind;
        shape.elem = Some(elem);
        shape
    }

    /// Fixed-size array `[elem; len]`.
    pub fn array(name: impl Into<String>, elem: &'static TypeNode, len: usize) -> Self {
        let mut shape = Self::base(name, TypeCategory::Compound, ValueKind::Array);
        shape.container = ContainerKind::Array;
        shape.qualifiers.is_array = true;
        shape.elem = Some(elem);
        shape.raw = Some(elem.raw_type());
        shape.len = Some(len);
        shape
    }

    /// Associative container. `entry` is the `(key, value)` pair node.
    pub fn map(
        name: impl Into<String>,
        key: &'static TypeNode,
        value: &'static TypeNode,
        entry: &'static TypeNode,
    ) -> Self {
        let mut shape = Self::base(name, TypeCategory::Class, ValueKind::Map);
        shape.container = ContainerKind::Map;
        shape.elem = Some(entry);
        shape.key = Some(key);
        shape.value = Some(value);
        shape
    }

    pub fn set(name: impl Into<String>, elem: &'static TypeNode) -> Self {
        let mut shape = Self::base(name, TypeCategory::Class, ValueKind::Set);
        shape.container = ContainerKind::Set;
        shape.elem = Some(elem);
        shape
    }

    /// `Option<elem>`.
    pub fn optional(name: impl Into<String>, elem: &'static TypeNode) -> Self {
        let mut shape = Self::base(name, TypeCategory::Class, ValueKind::Optional);
        shape.elem = Some(elem);
        shape
    }

    /// Raw pointer (`*const T` when `pointee_const`, `*mut T` otherwise).
    pub fn pointer(name: impl Into<String>, pointee: &'static TypeNode, pointee_const: bool) -> Self {
        let mut shape = Self::base(name, TypeCategory::Compound, ValueKind::Pointer);
        shape.qualifiers.is_pointer = true;
        shape.pointee = Some(pointee);
        shape.pointee_const = pointee_const;
        shape.raw = Some(pointee.raw_type());
        shape
    }

    /// `&'static T` or `&'static mut T`.
    pub fn reference(name: impl Into<String>, pointee: &'static TypeNode, mutable: bool) -> Self {
        let mut shape = Self::base(name, TypeCategory::Compound, ValueKind::Pointer);
        shape.qualifiers.is_reference = true;
        shape.qualifiers.is_const = !mutable;
        shape.pointee = Some(pointee);
        shape.pointee_const = !mutable;
        shape.raw = Some(pointee.raw_type());
        shape
    }

    pub fn function(name: impl Into<String>) -> Self {
        Self::base(name, TypeCategory::Function, ValueKind::None)
    }

    /// Method signature; `is_const` marks a `&self` receiver.
    pub fn member_function(name: impl Into<String>, is_const: bool) -> Self {
        let mut shape = Self::base(name, TypeCategory::MemberFunction, ValueKind::None);
        shape.qualifiers.is_member_pointer = true;
        shape.const_member = is_const;
        shape
    }

    /// Field signature.
    pub fn member_object(name: impl Into<String>) -> Self {
        let mut shape = Self::base(name, TypeCategory::MemberObject, ValueKind::None);
        shape.qualifiers.is_member_pointer = true;
        shape
    }

    /// Replace the display name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Invocation thunk stored on constructor, function and variable nodes.
///
/// The result borrows from the argument slice so by-reference returns stay
/// tied to the receiver.
pub(crate) type Thunk = dyn for<'s, 'a> Fn(&'s mut [Any<'a>]) -> Result<Any<'s>> + Send + Sync;

pub(crate) fn thunk<F>(f: F) -> Box<Thunk>
where
    F: for<'s, 'a> Fn(&'s mut [Any<'a>]) -> Result<Any<'s>> + Send + Sync + 'static,
{
    Box::new(f)
}

/// Receiver form of a registered function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Receiver {
    /// Free/associated function.
    Static,
    /// `&self`
    Shared,
    /// `&mut self`
    Exclusive,
}

/// A registered constructor.
pub struct CtorNode {
    pub(crate) parent: &'static TypeNode,
    pub(crate) params: Vec<&'static TypeNode>,
    pub(crate) invoke: Box<Thunk>,
}

/// A registered function or method.
pub struct FunctionNode {
    pub(crate) parent: &'static TypeNode,
    pub(crate) name: String,
    pub(crate) signature: &'static TypeNode,
    pub(crate) ret: &'static TypeNode,
    pub(crate) params: Vec<&'static TypeNode>,
    pub(crate) receiver: Receiver,
    pub(crate) returns_ref: bool,
    pub(crate) invoke: Box<Thunk>,
}

/// A registered field or static variable.
pub struct VariableNode {
    pub(crate) parent: &'static TypeNode,
    pub(crate) name: String,
    pub(crate) ty: &'static TypeNode,
    pub(crate) signature: &'static TypeNode,
    pub(crate) is_static: bool,
    pub(crate) readonly: bool,
    pub(crate) access: Box<Thunk>,
}

/// One enumerator of a registered enum.
pub(crate) struct EnumItem {
    pub(crate) name: String,
    pub(crate) value: i64,
    pub(crate) variant: Box<dyn std::any::Any + Send + Sync>,
}

pub(crate) type EnumRead = for<'x> fn(&EnumInfo, &Any<'x>) -> Option<i64>;
pub(crate) type EnumWrite = for<'x> fn(&EnumInfo, &mut Any<'x>, i64) -> bool;

/// Enum metadata attached by [`EnumFactory`](crate::EnumFactory).
pub(crate) struct EnumInfo {
    pub(crate) items: RwLock<Vec<EnumItem>>,
    pub(crate) read: EnumRead,
    pub(crate) write: EnumWrite,
}

/// Process-lifetime description of one Rust type.
pub struct TypeNode {
    type_id: TypeId,
    rust_name: &'static str,
    name: RwLock<Arc<str>>,
    shape: TypeShape,
    operations: &'static TypeOperations,
    registered: AtomicBool,
    ctors: RwLock<Vec<&'static CtorNode>>,
    funcs: RwLock<Vec<&'static FunctionNode>>,
    vars: RwLock<Vec<&'static VariableNode>>,
    enum_info: OnceLock<EnumInfo>,
}

impl TypeNode {
    pub(crate) fn new(
        type_id: TypeId,
        rust_name: &'static str,
        shape: TypeShape,
        operations: &'static TypeOperations,
    ) -> Self {
        Self {
            type_id,
            rust_name,
            name: RwLock::new(Arc::from(shape.name.as_str())),
            shape,
            operations,
            registered: AtomicBool::new(false),
            ctors: RwLock::new(Vec::new()),
            funcs: RwLock::new(Vec::new()),
            vars: RwLock::new(Vec::new()),
            enum_info: OnceLock::new(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Compiler-provided type name (`std::any::type_name`).
    pub fn rust_name(&self) -> &'static str {
        self.rust_name
    }

    /// Display name; replaced by the factory on registration.
    pub fn name(&self) -> Arc<str> {
        Arc::clone(&self.name.read())
    }

    pub fn category(&self) -> TypeCategory {
        self.shape.category
    }

    pub fn value_kind(&self) -> ValueKind {
        self.shape.value_kind
    }

    pub fn qualifiers(&self) -> Qualifiers {
        self.shape.qualifiers
    }

    pub fn flags(&self) -> FundamentalFlags {
        self.shape.flags
    }

    pub fn container_kind(&self) -> ContainerKind {
        self.shape.container
    }

    pub fn string_kind(&self) -> Option<StringKind> {
        self.shape.string_kind
    }

    /// Element node of a container or optional.
    pub fn elem_type(&self) -> Option<&'static TypeNode> {
        self.shape.elem
    }

    pub fn key_type(&self) -> Option<&'static TypeNode> {
        self.shape.key
    }

    pub fn mapped_type(&self) -> Option<&'static TypeNode> {
        self.shape.value
    }

    pub fn pointee(&self) -> Option<&'static TypeNode> {
        self.shape.pointee
    }

    pub fn is_pointee_const(&self) -> bool {
        self.shape.pointee_const
    }

    /// Type with every reference, pointer and array layer removed.
    pub fn raw_type(&'static self) -> &'static TypeNode {
        self.shape.raw.unwrap_or(self)
    }

    pub fn array_len(&self) -> Option<usize> {
        self.shape.len
    }

    pub fn is_const_member(&self) -> bool {
        self.shape.const_member
    }

    pub fn operations(&self) -> &'static TypeOperations {
        self.operations
    }

    /// Whether a factory has described this type.
    pub fn is_registered(&self) -> bool {
        self.registered.load(Ordering::Acquire)
    }

    pub fn ctors(&self) -> Vec<&'static CtorNode> {
        self.ctors.read().clone()
    }

    pub fn funcs(&self) -> Vec<&'static FunctionNode> {
        self.funcs.read().clone()
    }

    pub fn vars(&self) -> Vec<&'static VariableNode> {
        self.vars.read().clone()
    }

    pub fn find_func(&self, name: &str) -> Option<&'static FunctionNode> {
        self.funcs.read().iter().copied().find(|f| f.name == name)
    }

    pub fn find_var(&self, name: &str) -> Option<&'static VariableNode> {
        self.vars.read().iter().copied().find(|v| v.name == name)
    }

    /// Whether an instance can be produced without arguments.
    pub fn is_default_constructible(&self) -> bool {
        self.operations.default_construct.is_some()
            || self.ctors.read().iter().any(|c| c.params.is_empty())
    }

    /// Build a default instance through the operations table or a zero-argument
    /// constructor. Returns a null [`Any`] when neither exists.
    pub fn default_construct(&'static self) -> Any<'static> {
        if let Some(construct) = self.operations.default_construct {
            // SAFETY: the table belongs to this node, so the payload has this type.
            return unsafe { Any::from_raw_parts(crate::Access::Copy, construct(), self) };
        }
        let ctor = self.ctors.read().iter().copied().find(|c| c.params.is_empty());
        match ctor {
            Some(ctor) => match (ctor.invoke)(&mut []) {
                Ok(value) => value.into_owned(),
                Err(err) => {
                    log::warn!("[TypeNode] default constructor of {} failed: {}", self.name(), err);
                    Any::null()
                }
            },
            None => {
                log::debug!("[TypeNode] {} is not default constructible", self.name());
                Any::null()
            }
        }
    }

    pub(crate) fn enum_info(&self) -> Option<&EnumInfo> {
        self.enum_info.get()
    }

    pub(crate) fn enum_info_or_init(&self, init: impl FnOnce() -> EnumInfo) -> &EnumInfo {
        self.enum_info.get_or_init(init)
    }

    pub(crate) fn set_name(&self, name: &str) {
        *self.name.write() = Arc::from(name);
    }

    /// Mark as described; returns whether it already was.
    pub(crate) fn mark_registered(&self) -> bool {
        self.registered.swap(true, Ordering::AcqRel)
    }

    /// Append a constructor unless one with the same parameter list exists.
    pub(crate) fn push_ctor(&self, ctor: CtorNode) -> bool {
        let mut ctors = self.ctors.write();
        let duplicate = ctors.iter().any(|c| {
            c.params.len() == ctor.params.len()
                && c.params.iter().zip(&ctor.params).all(|(a, b)| std::ptr::eq(*a, *b))
        });
        if duplicate {
            return false;
        }
        ctors.push(Box::leak(Box::new(ctor)));
        true
    }

    /// Append a function unless one with the same name exists.
    pub(crate) fn push_func(&self, func: FunctionNode) -> bool {
        let mut funcs = self.funcs.write();
        if funcs.iter().any(|f| f.name == func.name) {
            return false;
        }
        funcs.push(Box::leak(Box::new(func)));
        true
    }

    /// Append a variable unless one with the same name exists.
    pub(crate) fn push_var(&self, var: VariableNode) -> bool {
        let mut vars = self.vars.write();
        if vars.iter().any(|v| v.name == var.name) {
            return false;
        }
        vars.push(Box::leak(Box::new(var)));
        true
    }
}

impl PartialEq for TypeNode {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl Eq for TypeNode {}

impl Hash for TypeNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self as *const Self).hash(state);
    }
}

impl fmt::Debug for TypeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeNode")
            .field("name", &&*self.name())
            .field("category", &self.shape.category)
            .field("value_kind", &self.shape.value_kind)
            .finish()
    }
}

impl fmt::Display for TypeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl fmt::Debug for FunctionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionNode")
            .field("parent", &&*self.parent.name())
            .field("name", &self.name)
            .field("receiver", &self.receiver)
            .field("returns_ref", &self.returns_ref)
            .finish()
    }
}

impl fmt::Debug for VariableNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariableNode")
            .field("parent", &&*self.parent.name())
            .field("name", &self.name)
            .field("type", &&*self.ty.name())
            .finish()
    }
}

impl fmt::Debug for CtorNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CtorNode")
            .field("parent", &&*self.parent.name())
            .field("arity", &self.params.len())
            .finish()
    }
}
