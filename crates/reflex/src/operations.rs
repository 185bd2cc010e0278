// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-type operation tables.
//!
//! Every [`TypeNode`](crate::TypeNode) owns one [`TypeOperations`] built by
//! [`Reflect::operations`](crate::Reflect::operations). The table holds
//! monomorphized function pointers that act on an erased payload
//! (`*mut u8` pointing at a boxed or borrowed `T`). Capabilities a type does
//! not have are `None`; callers log and report failure instead.
//!
//! Container tables are generated from the [`Sequence`], [`Mapping`] and
//! [`SetLike`] traits so user containers plug in the same way as the
//! standard collections.

use std::any::TypeId;
use std::fmt;
use std::marker::PhantomData;
use std::ptr;

use crate::any::{Access, Any};
use crate::node::ContainerKind;
use crate::registry::resolve;
use crate::Reflect;

/// Erased destructor for a boxed payload.
pub(crate) type DestroyFn = unsafe fn(*mut u8);
/// Erased copy constructor; null when an element refused to copy.
pub(crate) type CopyConstructFn = unsafe fn(*const u8) -> *mut u8;
pub(crate) type StealConstructFn = unsafe fn(*mut u8) -> *mut u8;
pub(crate) type CopyAssignFn = unsafe fn(*mut u8, *const u8) -> bool;
pub(crate) type StealAssignFn = unsafe fn(*mut u8, *mut u8);
/// Erased default constructor; null when the type can't be defaulted.
pub(crate) type DefaultConstructFn = fn() -> *mut u8;

/// Function-pointer table for one type.
#[derive(Clone, Copy)]
pub struct TypeOperations {
    pub(crate) type_id: fn() -> TypeId,
    pub(crate) type_name: &'static str,
    pub(crate) destroy: DestroyFn,
    pub(crate) steal_construct: StealConstructFn,
    pub(crate) steal_assign: StealAssignFn,
    pub(crate) copy_construct: Option<CopyConstructFn>,
    pub(crate) copy_assign: Option<CopyAssignFn>,
    pub(crate) default_construct: Option<DefaultConstructFn>,
    pub(crate) numeric: Option<NumericOperations>,
    pub(crate) container: Option<ContainerOperations>,
    pub(crate) optional: Option<OptionalOperations>,
}

/// Table used by null [`Any`] values.
pub(crate) static NULL_OPERATIONS: TypeOperations = TypeOperations {
    type_id: TypeId::of::<()>,
    type_name: "null",
    destroy: noop_destroy,
    steal_construct: noop_steal_construct,
    steal_assign: noop_steal_assign,
    copy_construct: None,
    copy_assign: None,
    default_construct: None,
    numeric: None,
    container: None,
    optional: None,
};

unsafe fn noop_destroy(_: *mut u8) {}

unsafe fn noop_steal_construct(_: *mut u8) -> *mut u8 {
    ptr::null_mut()
}

unsafe fn noop_steal_assign(_: *mut u8, _: *mut u8) {}

impl TypeOperations {
    /// Start a table for `T` with move-only support.
    pub fn builder<T: 'static>() -> OperationsBuilder<T> {
        OperationsBuilder {
            ops: TypeOperations {
                type_id: TypeId::of::<T>,
                type_name: std::any::type_name::<T>(),
                destroy: destroy::<T>,
                steal_construct: steal_construct::<T>,
                steal_assign: steal_assign::<T>,
                copy_construct: None,
                copy_assign: None,
                default_construct: None,
                numeric: None,
                container: None,
                optional: None,
            },
            _marker: PhantomData,
        }
    }

    /// Identity of the type the table was built for.
    pub fn type_id(&self) -> TypeId {
        (self.type_id)()
    }

    /// Compiler-provided name of the described type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is_copyable(&self) -> bool {
        self.copy_construct.is_some()
    }

    pub fn is_default_constructible(&self) -> bool {
        self.default_construct.is_some()
    }

    pub fn numeric(&self) -> Option<&NumericOperations> {
        self.numeric.as_ref()
    }

    pub fn container(&self) -> Option<&ContainerOperations> {
        self.container.as_ref()
    }

    pub fn optional(&self) -> Option<&OptionalOperations> {
        self.optional.as_ref()
    }
}

impl fmt::Debug for TypeOperations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeOperations")
            .field("type_name", &self.type_name)
            .field("copy", &self.copy_construct.is_some())
            .field("default", &self.default_construct.is_some())
            .field("numeric", &self.numeric.map(|n| n.kind))
            .field("container", &self.container.map(|c| c.kind))
            .field("optional", &self.optional.is_some())
            .finish()
    }
}

/// Typed builder guaranteeing every entry of the table acts on `T`.
pub struct OperationsBuilder<T> {
    ops: TypeOperations,
    _marker: PhantomData<fn() -> T>,
}

impl<T: 'static> OperationsBuilder<T> {
    /// Copy support through `Clone`.
    pub fn cloneable(mut self) -> Self
    where
        T: Clone,
    {
        self.ops.copy_construct = Some(copy_construct::<T>);
        self.ops.copy_assign = Some(copy_assign::<T>);
        self
    }

    /// Copy support through the element tables (containers over reflected types).
    pub fn erased_clone(mut self) -> Self
    where
        T: ErasedClone,
    {
        self.ops.copy_construct = Some(erased_copy_construct::<T>);
        self.ops.copy_assign = Some(erased_copy_assign::<T>);
        self
    }

    pub fn defaulted(mut self) -> Self
    where
        T: Default,
    {
        self.ops.default_construct = Some(default_construct::<T>);
        self
    }

    /// Default construction through the element tables.
    pub fn erased_default(mut self) -> Self
    where
        T: ErasedDefault,
    {
        self.ops.default_construct = Some(erased_default_construct::<T>);
        self
    }

    pub fn numeric(mut self) -> Self
    where
        T: NumericValue,
    {
        self.ops.numeric = Some(NumericOperations::of::<T>());
        self
    }

    pub fn sequence(mut self) -> Self
    where
        T: Sequence,
    {
        self.ops.container = Some(ContainerOperations::sequence::<T>());
        self
    }

    pub fn mapping(mut self) -> Self
    where
        T: Mapping,
    {
        self.ops.container = Some(ContainerOperations::mapping::<T>());
        self
    }

    pub fn set(mut self) -> Self
    where
        T: SetLike,
    {
        self.ops.container = Some(ContainerOperations::set::<T>());
        self
    }

    /// Install a hand-written container table.
    ///
    /// # Safety
    ///
    /// Every entry of `container` must treat its payload as a `T`.
    pub unsafe fn container(mut self, container: ContainerOperations) -> Self {
        self.ops.container = Some(container);
        self
    }

    pub fn optional(mut self) -> Self
    where
        T: OptionLike,
    {
        self.ops.optional = Some(OptionalOperations::of::<T>());
        self
    }

    pub fn build(self) -> TypeOperations {
        self.ops
    }
}

unsafe fn destroy<T>(payload: *mut u8) {
    // SAFETY: Copy-mode payloads are always produced by Box::into_raw::<T>.
    drop(unsafe { Box::from_raw(payload.cast::<T>()) });
}

unsafe fn steal_construct<T>(payload: *mut u8) -> *mut u8 {
    // SAFETY: the caller forgets the source after the bitwise move.
    let value = unsafe { ptr::read(payload.cast::<T>()) };
    Box::into_raw(Box::new(value)).cast()
}

unsafe fn steal_assign<T>(dst: *mut u8, src: *mut u8) {
    // SAFETY: both point at live T values; ptr::swap tolerates overlap.
    unsafe { ptr::swap(dst.cast::<T>(), src.cast::<T>()) }
}

unsafe fn copy_construct<T: Clone>(payload: *const u8) -> *mut u8 {
    // SAFETY: payload points at a live T.
    let value = unsafe { &*payload.cast::<T>() };
    Box::into_raw(Box::new(value.clone())).cast()
}

unsafe fn copy_assign<T: Clone>(dst: *mut u8, src: *const u8) -> bool {
    if ptr::eq(dst.cast_const(), src) {
        return true;
    }
    // SAFETY: distinct live T values.
    unsafe { (*dst.cast::<T>()).clone_from(&*src.cast::<T>()) };
    true
}

fn default_construct<T: Default>() -> *mut u8 {
    Box::into_raw(Box::new(T::default())).cast()
}

unsafe fn erased_copy_construct<T: ErasedClone>(payload: *const u8) -> *mut u8 {
    // SAFETY: payload points at a live T.
    match unsafe { &*payload.cast::<T>() }.clone_erased() {
        Some(value) => Box::into_raw(Box::new(value)).cast(),
        None => ptr::null_mut(),
    }
}

unsafe fn erased_copy_assign<T: ErasedClone>(dst: *mut u8, src: *const u8) -> bool {
    if ptr::eq(dst.cast_const(), src) {
        return true;
    }
    // SAFETY: distinct live T values.
    match unsafe { &*src.cast::<T>() }.clone_erased() {
        Some(value) => {
            unsafe { *dst.cast::<T>() = value };
            true
        }
        None => false,
    }
}

fn erased_default_construct<T: ErasedDefault>() -> *mut u8 {
    match T::default_erased() {
        Some(value) => Box::into_raw(Box::new(value)).cast(),
        None => ptr::null_mut(),
    }
}

/// Clone through the type's own table, without a `Clone` bound.
pub(crate) fn clone_erased<T: Reflect>(value: &T) -> Option<T> {
    let copy = resolve::<T>().operations().copy_construct?;
    // SAFETY: the table was built for T.
    let raw = unsafe { copy((value as *const T).cast()) };
    if raw.is_null() {
        return None;
    }
    // SAFETY: copy constructors return Box::into_raw::<T>.
    Some(*unsafe { Box::from_raw(raw.cast::<T>()) })
}

/// Clone the referent of `value` out as a `T`.
pub(crate) fn extract<T: Reflect>(value: &Any<'_>) -> Option<T> {
    value.try_cast_const::<T>().and_then(clone_erased)
}

/// Default-construct a `T` through its node (table or zero-argument ctor).
pub(crate) fn default_erased<T: Reflect>() -> Option<T> {
    resolve::<T>().default_construct().into_value::<T>().ok()
}

/// Copy that may fail when an element type isn't copyable.
pub trait ErasedClone: Sized + 'static {
    fn clone_erased(&self) -> Option<Self>;
}

/// Default construction that may fail when an element type has no default.
pub trait ErasedDefault: Sized + 'static {
    fn default_erased() -> Option<Self>;
}

// ============================================================================
// Numbers
// ============================================================================

/// Concrete numeric representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericKind {
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
}

impl NumericKind {
    pub fn is_integral(self) -> bool {
        !self.is_floating_point()
    }

    pub fn is_floating_point(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    pub fn is_signed(self) -> bool {
        matches!(
            self,
            Self::I8 | Self::I16 | Self::I32 | Self::I64 | Self::Isize | Self::F32 | Self::F64
        )
    }
}

/// Exact carrier for a numeric value read from or written to a reflected number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Signed(i64),
    Unsigned(u64),
    Float(f64),
}

impl Number {
    /// Widen to `f64`. Integers above 2^53 lose precision.
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Signed(v) => v as f64,
            Self::Unsigned(v) => v as f64,
            Self::Float(v) => v,
        }
    }

    pub fn as_i64(self) -> i64 {
        match self {
            Self::Signed(v) => v,
            Self::Unsigned(v) => v as i64,
            Self::Float(v) => v as i64,
        }
    }

    pub fn as_u64(self) -> u64 {
        match self {
            Self::Signed(v) => v as u64,
            Self::Unsigned(v) => v,
            Self::Float(v) => v as u64,
        }
    }
}

macro_rules! number_from {
    ($variant:ident as $carrier:ty: $($t:ty),*) => {
        $(impl From<$t> for Number {
            fn from(v: $t) -> Self {
                Self::$variant(v as $carrier)
            }
        })*
    };
}

number_from!(Signed as i64: i8, i16, i32, i64, isize);
number_from!(Unsigned as u64: u8, u16, u32, u64, usize);
number_from!(Float as f64: f32, f64);

/// Primitive number usable through [`NumericOperations`].
pub trait NumericValue: Copy + 'static {
    const KIND: NumericKind;

    fn to_number(self) -> Number;

    /// Convert with `as` semantics (truncation and saturation as the language defines).
    fn from_number(n: Number) -> Self;
}

macro_rules! numeric_value {
    ($($t:ty => $kind:ident, $variant:ident as $carrier:ty;)*) => {
        $(impl NumericValue for $t {
            const KIND: NumericKind = NumericKind::$kind;

            fn to_number(self) -> Number {
                Number::$variant(self as $carrier)
            }

            fn from_number(n: Number) -> Self {
                match n {
                    Number::Signed(v) => v as $t,
                    Number::Unsigned(v) => v as $t,
                    Number::Float(v) => v as $t,
                }
            }
        })*
    };
}

numeric_value! {
    i8 => I8, Signed as i64;
    i16 => I16, Signed as i64;
    i32 => I32, Signed as i64;
    i64 => I64, Signed as i64;
    isize => Isize, Signed as i64;
    u8 => U8, Unsigned as u64;
    u16 => U16, Unsigned as u64;
    u32 => U32, Unsigned as u64;
    u64 => U64, Unsigned as u64;
    usize => Usize, Unsigned as u64;
    f32 => F32, Float as f64;
    f64 => F64, Float as f64;
}

/// Read/write access to a numeric payload.
#[derive(Clone, Copy)]
pub struct NumericOperations {
    pub(crate) kind: NumericKind,
    pub(crate) get: unsafe fn(*const u8) -> Number,
    pub(crate) set: unsafe fn(*mut u8, Number),
}

impl NumericOperations {
    pub fn of<T: NumericValue>() -> Self {
        Self {
            kind: T::KIND,
            get: numeric_get::<T>,
            set: numeric_set::<T>,
        }
    }

    pub fn kind(&self) -> NumericKind {
        self.kind
    }
}

impl fmt::Debug for NumericOperations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NumericOperations").field("kind", &self.kind).finish()
    }
}

unsafe fn numeric_get<T: NumericValue>(payload: *const u8) -> Number {
    // SAFETY: payload points at a live T.
    unsafe { *payload.cast::<T>() }.to_number()
}

unsafe fn numeric_set<T: NumericValue>(payload: *mut u8, n: Number) {
    // SAFETY: payload points at a live, writable T.
    unsafe { *payload.cast::<T>() = T::from_number(n) }
}

// ============================================================================
// Containers
// ============================================================================

/// Whether a container's length is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrayKind {
    Static,
    Dynamic,
}

/// Element addressing of a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Addressing {
    Random,
    Forward,
}

/// Ordered sequence of reflected elements.
///
/// Size-changing methods default to refusing, which is the right behaviour
/// for fixed-size containers.
pub trait Sequence: Sized + 'static {
    type Item: Reflect;

    const KIND: ContainerKind;
    const ARRAY: ArrayKind;
    const ADDRESSING: Addressing;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn capacity(&self) -> usize {
        self.len()
    }

    fn get(&self, index: usize) -> Option<&Self::Item>;

    fn get_mut(&mut self, index: usize) -> Option<&mut Self::Item>;

    fn for_each(&self, f: &mut dyn FnMut(&Self::Item));

    fn for_each_mut(&mut self, f: &mut dyn FnMut(&mut Self::Item));

    fn push(&mut self, _item: Self::Item) -> bool {
        false
    }

    fn pop(&mut self) -> bool {
        false
    }

    fn insert(&mut self, _index: usize, _item: Self::Item) -> bool {
        false
    }

    /// Resize, producing new elements with `fill`. Refuses (returns false)
    /// if `fill` can't produce one.
    fn resize_with(&mut self, _len: usize, _fill: &mut dyn FnMut() -> Option<Self::Item>) -> bool {
        false
    }

    fn clear(&mut self) -> bool {
        false
    }
}

/// Key/value container.
pub trait Mapping: Sized + 'static {
    type Key: Reflect;
    type Value: Reflect;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn for_each_entry(&self, f: &mut dyn FnMut(&Self::Key, &Self::Value));

    fn for_each_entry_mut(&mut self, f: &mut dyn FnMut(&Self::Key, &mut Self::Value));

    /// Insert or replace; returns whether the key was new.
    fn insert(&mut self, key: Self::Key, value: Self::Value) -> bool;

    fn clear(&mut self);
}

/// Unordered or ordered collection of unique elements.
pub trait SetLike: Sized + 'static {
    type Item: Reflect;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn for_each(&self, f: &mut dyn FnMut(&Self::Item));

    fn insert(&mut self, item: Self::Item) -> bool;

    fn clear(&mut self);
}

/// Erased entry access for maps.
#[derive(Clone, Copy)]
pub struct EntryOperations {
    pub(crate) for_each: unsafe fn(*const u8, &mut dyn FnMut(&Any<'_>, &Any<'_>)),
    pub(crate) for_each_mut: unsafe fn(*mut u8, &mut dyn FnMut(&Any<'_>, &mut Any<'_>)),
    pub(crate) insert: unsafe fn(*mut u8, &Any<'_>, &Any<'_>) -> bool,
}

/// Erased container access.
#[derive(Clone, Copy)]
pub struct ContainerOperations {
    pub(crate) kind: ContainerKind,
    pub(crate) array: ArrayKind,
    pub(crate) addressing: Addressing,
    pub(crate) size: unsafe fn(*const u8) -> usize,
    pub(crate) capacity: unsafe fn(*const u8) -> usize,
    pub(crate) get: unsafe fn(*const u8, usize) -> *const u8,
    pub(crate) get_mut: unsafe fn(*mut u8, usize) -> *mut u8,
    pub(crate) push_back: unsafe fn(*mut u8, &Any<'_>) -> bool,
    pub(crate) pop_back: unsafe fn(*mut u8) -> bool,
    pub(crate) insert: unsafe fn(*mut u8, usize, &Any<'_>) -> bool,
    pub(crate) resize: unsafe fn(*mut u8, usize) -> bool,
    pub(crate) clear: unsafe fn(*mut u8) -> bool,
    /// Visit every element; sequences and sets lend const references, maps
    /// lend owned `(key, value)` copies.
    pub(crate) travel: unsafe fn(*const u8, &mut dyn FnMut(&Any<'_>)),
    /// Visit every element mutably; false when the container can't lend
    /// mutable elements.
    pub(crate) travel_mut: unsafe fn(*mut u8, &mut dyn FnMut(&mut Any<'_>)) -> bool,
    pub(crate) entries: Option<EntryOperations>,
}

impl ContainerOperations {
    /// Table with every entry refusing; a base for hand-written tables.
    pub fn unsupported(kind: ContainerKind, array: ArrayKind, addressing: Addressing) -> Self {
        Self {
            kind,
            array,
            addressing,
            size: unsupported_size,
            capacity: unsupported_size,
            get: unsupported_get,
            get_mut: unsupported_get_mut,
            push_back: unsupported_push,
            pop_back: unsupported_op,
            insert: unsupported_insert,
            resize: unsupported_resize,
            clear: unsupported_op,
            travel: unsupported_travel,
            travel_mut: unsupported_travel_mut,
            entries: None,
        }
    }

    pub fn sequence<S: Sequence>() -> Self {
        Self {
            kind: S::KIND,
            array: S::ARRAY,
            addressing: S::ADDRESSING,
            size: seq_size::<S>,
            capacity: seq_capacity::<S>,
            get: seq_get::<S>,
            get_mut: seq_get_mut::<S>,
            push_back: seq_push::<S>,
            pop_back: seq_pop::<S>,
            insert: seq_insert::<S>,
            resize: seq_resize::<S>,
            clear: seq_clear::<S>,
            travel: seq_travel::<S>,
            travel_mut: seq_travel_mut::<S>,
            entries: None,
        }
    }

    pub fn mapping<M: Mapping>() -> Self {
        Self {
            size: map_size::<M>,
            capacity: map_size::<M>,
            push_back: map_push::<M>,
            clear: map_clear::<M>,
            travel: map_travel::<M>,
            entries: Some(EntryOperations {
                for_each: map_entries::<M>,
                for_each_mut: map_entries_mut::<M>,
                insert: map_insert::<M>,
            }),
            ..Self::unsupported(ContainerKind::Map, ArrayKind::Dynamic, Addressing::Forward)
        }
    }

    pub fn set<S: SetLike>() -> Self {
        Self {
            size: set_size::<S>,
            capacity: set_size::<S>,
            push_back: set_push::<S>,
            clear: set_clear::<S>,
            travel: set_travel::<S>,
            ..Self::unsupported(ContainerKind::Set, ArrayKind::Dynamic, Addressing::Forward)
        }
    }

    pub fn kind(&self) -> ContainerKind {
        self.kind
    }

    pub fn array_kind(&self) -> ArrayKind {
        self.array
    }

    pub fn addressing(&self) -> Addressing {
        self.addressing
    }
}

impl fmt::Debug for ContainerOperations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerOperations")
            .field("kind", &self.kind)
            .field("array", &self.array)
            .field("addressing", &self.addressing)
            .field("entries", &self.entries.is_some())
            .finish()
    }
}

unsafe fn unsupported_size(_: *const u8) -> usize {
    0
}

unsafe fn unsupported_get(_: *const u8, _: usize) -> *const u8 {
    ptr::null()
}

unsafe fn unsupported_get_mut(_: *mut u8, _: usize) -> *mut u8 {
    ptr::null_mut()
}

unsafe fn unsupported_push(_: *mut u8, _: &Any<'_>) -> bool {
    false
}

unsafe fn unsupported_op(_: *mut u8) -> bool {
    false
}

unsafe fn unsupported_insert(_: *mut u8, _: usize, _: &Any<'_>) -> bool {
    false
}

unsafe fn unsupported_resize(_: *mut u8, _: usize) -> bool {
    false
}

unsafe fn unsupported_travel(_: *const u8, _: &mut dyn FnMut(&Any<'_>)) {}

unsafe fn unsupported_travel_mut(_: *mut u8, _: &mut dyn FnMut(&mut Any<'_>)) -> bool {
    false
}

unsafe fn seq_size<S: Sequence>(payload: *const u8) -> usize {
    unsafe { &*payload.cast::<S>() }.len()
}

unsafe fn seq_capacity<S: Sequence>(payload: *const u8) -> usize {
    unsafe { &*payload.cast::<S>() }.capacity()
}

unsafe fn seq_get<S: Sequence>(payload: *const u8, index: usize) -> *const u8 {
    match unsafe { &*payload.cast::<S>() }.get(index) {
        Some(item) => (item as *const S::Item).cast(),
        None => ptr::null(),
    }
}

unsafe fn seq_get_mut<S: Sequence>(payload: *mut u8, index: usize) -> *mut u8 {
    match unsafe { &mut *payload.cast::<S>() }.get_mut(index) {
        Some(item) => (item as *mut S::Item).cast(),
        None => ptr::null_mut(),
    }
}

unsafe fn seq_push<S: Sequence>(payload: *mut u8, elem: &Any<'_>) -> bool {
    match extract::<S::Item>(elem) {
        Some(item) => unsafe { &mut *payload.cast::<S>() }.push(item),
        None => {
            log::warn!(
                "[ContainerOperations] push_back: element is not a copyable {}",
                std::any::type_name::<S::Item>()
            );
            false
        }
    }
}

unsafe fn seq_pop<S: Sequence>(payload: *mut u8) -> bool {
    unsafe { &mut *payload.cast::<S>() }.pop()
}

unsafe fn seq_insert<S: Sequence>(payload: *mut u8, index: usize, elem: &Any<'_>) -> bool {
    match extract::<S::Item>(elem) {
        Some(item) => unsafe { &mut *payload.cast::<S>() }.insert(index, item),
        None => false,
    }
}

unsafe fn seq_resize<S: Sequence>(payload: *mut u8, len: usize) -> bool {
    unsafe { &mut *payload.cast::<S>() }.resize_with(len, &mut default_erased::<S::Item>)
}

unsafe fn seq_clear<S: Sequence>(payload: *mut u8) -> bool {
    unsafe { &mut *payload.cast::<S>() }.clear()
}

unsafe fn seq_travel<S: Sequence>(payload: *const u8, f: &mut dyn FnMut(&Any<'_>)) {
    let node = resolve::<S::Item>();
    unsafe { &*payload.cast::<S>() }.for_each(&mut |item| {
        // SAFETY: the element outlives this callback and is only read.
        let elem = unsafe {
            Any::from_raw_parts(Access::ConstRef, (item as *const S::Item).cast_mut().cast(), node)
        };
        f(&elem);
    });
}

unsafe fn seq_travel_mut<S: Sequence>(payload: *mut u8, f: &mut dyn FnMut(&mut Any<'_>)) -> bool {
    let node = resolve::<S::Item>();
    unsafe { &mut *payload.cast::<S>() }.for_each_mut(&mut |item| {
        // SAFETY: the element is uniquely borrowed for this callback.
        let mut elem =
            unsafe { Any::from_raw_parts(Access::Ref, (item as *mut S::Item).cast(), node) };
        f(&mut elem);
    });
    true
}

unsafe fn map_size<M: Mapping>(payload: *const u8) -> usize {
    unsafe { &*payload.cast::<M>() }.len()
}

unsafe fn map_push<M: Mapping>(payload: *mut u8, entry: &Any<'_>) -> bool {
    match extract::<(M::Key, M::Value)>(entry) {
        Some((key, value)) => unsafe { &mut *payload.cast::<M>() }.insert(key, value),
        None => false,
    }
}

unsafe fn map_clear<M: Mapping>(payload: *mut u8) -> bool {
    unsafe { &mut *payload.cast::<M>() }.clear();
    true
}

unsafe fn map_travel<M: Mapping>(payload: *const u8, f: &mut dyn FnMut(&Any<'_>)) {
    unsafe { &*payload.cast::<M>() }.for_each_entry(&mut |key, value| {
        match (clone_erased(key), clone_erased(value)) {
            (Some(key), Some(value)) => f(&Any::new((key, value))),
            _ => log::debug!(
                "[ContainerOperations] map entry of {} is not copyable, skipped",
                std::any::type_name::<M>()
            ),
        }
    });
}

unsafe fn map_entries<M: Mapping>(payload: *const u8, f: &mut dyn FnMut(&Any<'_>, &Any<'_>)) {
    let key_node = resolve::<M::Key>();
    let value_node = resolve::<M::Value>();
    unsafe { &*payload.cast::<M>() }.for_each_entry(&mut |key, value| {
        // SAFETY: key and value outlive this callback and are only read.
        let (key, value) = unsafe {
            (
                Any::from_raw_parts(Access::ConstRef, (key as *const M::Key).cast_mut().cast(), key_node),
                Any::from_raw_parts(
                    Access::ConstRef,
                    (value as *const M::Value).cast_mut().cast(),
                    value_node,
                ),
            )
        };
        f(&key, &value);
    });
}

unsafe fn map_entries_mut<M: Mapping>(
    payload: *mut u8,
    f: &mut dyn FnMut(&Any<'_>, &mut Any<'_>),
) {
    let key_node = resolve::<M::Key>();
    let value_node = resolve::<M::Value>();
    unsafe { &mut *payload.cast::<M>() }.for_each_entry_mut(&mut |key, value| {
        // SAFETY: the key is only read; the value is uniquely borrowed.
        let (key, mut value) = unsafe {
            (
                Any::from_raw_parts(Access::ConstRef, (key as *const M::Key).cast_mut().cast(), key_node),
                Any::from_raw_parts(Access::Ref, (value as *mut M::Value).cast(), value_node),
            )
        };
        f(&key, &mut value);
    });
}

unsafe fn map_insert<M: Mapping>(payload: *mut u8, key: &Any<'_>, value: &Any<'_>) -> bool {
    match (extract::<M::Key>(key), extract::<M::Value>(value)) {
        (Some(key), Some(value)) => {
            unsafe { &mut *payload.cast::<M>() }.insert(key, value);
            true
        }
        _ => {
            log::warn!(
                "[ContainerOperations] insert: entry doesn't match {}",
                std::any::type_name::<M>()
            );
            false
        }
    }
}

unsafe fn set_size<S: SetLike>(payload: *const u8) -> usize {
    unsafe { &*payload.cast::<S>() }.len()
}

unsafe fn set_push<S: SetLike>(payload: *mut u8, elem: &Any<'_>) -> bool {
    match extract::<S::Item>(elem) {
        Some(item) => unsafe { &mut *payload.cast::<S>() }.insert(item),
        None => false,
    }
}

unsafe fn set_clear<S: SetLike>(payload: *mut u8) -> bool {
    unsafe { &mut *payload.cast::<S>() }.clear();
    true
}

unsafe fn set_travel<S: SetLike>(payload: *const u8, f: &mut dyn FnMut(&Any<'_>)) {
    let node = resolve::<S::Item>();
    unsafe { &*payload.cast::<S>() }.for_each(&mut |item| {
        // SAFETY: the element outlives this callback and is only read.
        let elem = unsafe {
            Any::from_raw_parts(Access::ConstRef, (item as *const S::Item).cast_mut().cast(), node)
        };
        f(&elem);
    });
}

// ============================================================================
// Optionals
// ============================================================================

/// A value that may be absent.
pub trait OptionLike: Sized + 'static {
    type Item: Reflect;

    fn get(&self) -> Option<&Self::Item>;

    fn get_mut(&mut self) -> Option<&mut Self::Item>;

    fn set(&mut self, item: Self::Item);

    fn reset(&mut self);
}

/// Erased access to an optional payload.
#[derive(Clone, Copy)]
pub struct OptionalOperations {
    pub(crate) has_value: unsafe fn(*const u8) -> bool,
    pub(crate) get: unsafe fn(*const u8) -> *const u8,
    pub(crate) get_mut: unsafe fn(*mut u8) -> *mut u8,
    pub(crate) set: unsafe fn(*mut u8, &Any<'_>) -> bool,
    pub(crate) reset: unsafe fn(*mut u8),
}

impl OptionalOperations {
    pub fn of<O: OptionLike>() -> Self {
        Self {
            has_value: opt_has_value::<O>,
            get: opt_get::<O>,
            get_mut: opt_get_mut::<O>,
            set: opt_set::<O>,
            reset: opt_reset::<O>,
        }
    }
}

impl fmt::Debug for OptionalOperations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OptionalOperations")
    }
}

unsafe fn opt_has_value<O: OptionLike>(payload: *const u8) -> bool {
    unsafe { &*payload.cast::<O>() }.get().is_some()
}

unsafe fn opt_get<O: OptionLike>(payload: *const u8) -> *const u8 {
    match unsafe { &*payload.cast::<O>() }.get() {
        Some(item) => (item as *const O::Item).cast(),
        None => ptr::null(),
    }
}

unsafe fn opt_get_mut<O: OptionLike>(payload: *mut u8) -> *mut u8 {
    match unsafe { &mut *payload.cast::<O>() }.get_mut() {
        Some(item) => (item as *mut O::Item).cast(),
        None => ptr::null_mut(),
    }
}

unsafe fn opt_set<O: OptionLike>(payload: *mut u8, value: &Any<'_>) -> bool {
    match extract::<O::Item>(value) {
        Some(item) => {
            unsafe { &mut *payload.cast::<O>() }.set(item);
            true
        }
        None => false,
    }
}

unsafe fn opt_reset<O: OptionLike>(payload: *mut u8) {
    unsafe { &mut *payload.cast::<O>() }.reset();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_conversions() {
        assert_eq!(Number::from(-3i8), Number::Signed(-3));
        assert_eq!(Number::from(7usize), Number::Unsigned(7));
        assert_eq!(Number::from(1.5f32), Number::Float(1.5));
        assert_eq!(Number::Float(2.9).as_i64(), 2);
        assert_eq!(Number::Signed(-1).as_f64(), -1.0);
    }

    #[test]
    fn test_numeric_value_truncates_like_as() {
        assert_eq!(u8::from_number(Number::Signed(300)), 300i64 as u8);
        assert_eq!(i32::from_number(Number::Float(234.9)), 234);
        assert_eq!(f32::from_number(Number::Unsigned(234)), 234.0);
    }

    #[test]
    fn test_numeric_kind_flags() {
        assert!(NumericKind::I16.is_signed());
        assert!(NumericKind::U64.is_integral());
        assert!(!NumericKind::U64.is_signed());
        assert!(NumericKind::F32.is_floating_point());
    }

    #[test]
    fn test_numeric_operations_roundtrip() {
        let ops = NumericOperations::of::<u16>();
        let mut value = 5u16;
        let payload: *mut u8 = (&mut value as *mut u16).cast();
        unsafe {
            assert_eq!((ops.get)(payload), Number::Unsigned(5));
            (ops.set)(payload, Number::Float(42.7));
        }
        assert_eq!(value, 42);
        assert_eq!(ops.kind(), NumericKind::U16);
    }
}
