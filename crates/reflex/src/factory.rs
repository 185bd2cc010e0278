// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Registration builders.
//!
//! A [`Factory`] names a type and attaches constructors, functions and
//! variables to its node. Callables of arity 0 to 4 are accepted through the
//! [`Constructor`], [`Method`], [`MethodMut`], [`RefMethod`],
//! [`RefMethodMut`] and [`Function`] traits, which are implemented for every
//! matching `Fn`.
//!
//! # Example
//!
//! ```rust
//! use reflex::{factory, typeinfo, Any, Reflect, TypeOperations, TypeShape};
//!
//! #[derive(Clone)]
//! struct Counter {
//!     hits: u32,
//! }
//!
//! impl Reflect for Counter {
//!     fn shape() -> TypeShape {
//!         TypeShape::class("Counter")
//!     }
//!     fn operations() -> TypeOperations {
//!         TypeOperations::builder::<Self>().cloneable().build()
//!     }
//! }
//!
//! factory::<Counter>("Counter")
//!     .ctor(|hits: u32| Counter { hits })
//!     .func("hits", |c: &Counter| c.hits)
//!     .var("hits_field", |c: &Counter| &c.hits, |c: &mut Counter| &mut c.hits);
//!
//! let class = typeinfo::<Counter>().as_class().expect("class");
//! let counter = class.ctors()[0].invoke(&mut [Any::new(3u32)]).expect("ctor");
//! let hits = class.func("hits").expect("hits").invoke(&mut [counter.constref()]).expect("call");
//! assert_eq!(hits.try_cast_const::<u32>(), Some(&3));
//! ```

use std::marker::PhantomData;

use parking_lot::RwLock;

use crate::any::Any;
use crate::error::{ReflError, Result};
use crate::node::{
    thunk, CtorNode, EnumInfo, EnumItem, FunctionNode, Receiver, Thunk, TypeNode, VariableNode,
};
use crate::operations::extract;
use crate::registry::resolve;
use crate::signature::{ArgList, FieldSignature, FunctionSignature, MethodSignature};
use crate::Reflect;

fn check_arity(args: &[Any<'_>], expected: usize) -> Result<()> {
    if args.len() != expected {
        return Err(ReflError::ArityMismatch {
            expected,
            got: args.len(),
        });
    }
    Ok(())
}

fn mismatch<T: Reflect>(index: usize, got: &Any<'_>) -> ReflError {
    ReflError::ArgumentMismatch {
        index,
        expected: resolve::<T>().name().to_string(),
        got: got.type_info().name().to_string(),
    }
}

/// Owned copy of argument `index`.
fn arg<A: Reflect>(args: &[Any<'_>], index: usize) -> Result<A> {
    let value = &args[index];
    if !value.can_cast::<A>() {
        return Err(mismatch::<A>(index, value));
    }
    extract::<A>(value).ok_or_else(|| ReflError::unsupported("copy argument", &*value.type_info().name()))
}

fn receiver_const<'r, T: Reflect>(recv: &'r Any<'_>) -> Result<&'r T> {
    recv.try_cast_const::<T>().ok_or_else(|| mismatch::<T>(0, recv))
}

fn receiver_mut<'r, T: Reflect>(recv: &'r mut Any<'_>) -> Result<&'r mut T> {
    if !recv.can_cast::<T>() {
        return Err(mismatch::<T>(0, recv));
    }
    recv.try_cast::<T>()?.ok_or(ReflError::Null)
}

/// Callable usable as a constructor of `T`.
pub trait Constructor<T, Args>: Send + Sync + 'static {
    fn params() -> Vec<&'static TypeNode>;
    fn into_thunk(self) -> Box<Thunk>;
}

/// `Fn(&T, Args..) -> R`
pub trait Method<T, Args, R>: Send + Sync + 'static {
    fn into_thunk(self) -> Box<Thunk>;
}

/// `Fn(&mut T, Args..) -> R`
pub trait MethodMut<T, Args, R>: Send + Sync + 'static {
    fn into_thunk(self) -> Box<Thunk>;
}

/// `Fn(&T, Args..) -> &R`
pub trait RefMethod<T, Args, R>: Send + Sync + 'static {
    fn into_thunk(self) -> Box<Thunk>;
}

/// `Fn(&mut T, Args..) -> &mut R`
pub trait RefMethodMut<T, Args, R>: Send + Sync + 'static {
    fn into_thunk(self) -> Box<Thunk>;
}

/// `Fn(Args..) -> R`
pub trait Function<Args, R>: Send + Sync + 'static {
    fn into_thunk(self) -> Box<Thunk>;
}

macro_rules! impl_callables {
    ($arity:expr; $($A:ident $a:ident $idx:expr),*) => {
        impl<T, F, $($A),*> Constructor<T, ($($A,)*)> for F
        where
            T: Reflect,
            F: Fn($($A),*) -> T + Send + Sync + 'static,
            $($A: Reflect,)*
        {
            fn params() -> Vec<&'static TypeNode> {
                <($($A,)*) as ArgList>::nodes()
            }

            fn into_thunk(self) -> Box<Thunk> {
                thunk(move |args| {
                    check_arity(args, $arity)?;
                    $(let $a = arg::<$A>(args, $idx)?;)*
                    Ok(Any::new((self)($($a),*)))
                })
            }
        }

        impl<F, R, $($A),*> Function<($($A,)*), R> for F
        where
            R: Reflect,
            F: Fn($($A),*) -> R + Send + Sync + 'static,
            $($A: Reflect,)*
        {
            fn into_thunk(self) -> Box<Thunk> {
                thunk(move |args| {
                    check_arity(args, $arity)?;
                    $(let $a = arg::<$A>(args, $idx)?;)*
                    Ok(Any::new((self)($($a),*)))
                })
            }
        }

        impl<T, F, R, $($A),*> Method<T, ($($A,)*), R> for F
        where
            T: Reflect,
            R: Reflect,
            F: Fn(&T, $($A),*) -> R + Send + Sync + 'static,
            $($A: Reflect,)*
        {
            fn into_thunk(self) -> Box<Thunk> {
                thunk(move |args| {
                    check_arity(args, $arity + 1)?;
                    $(let $a = arg::<$A>(args, $idx + 1)?;)*
                    let recv = receiver_const::<T>(&args[0])?;
                    Ok(Any::new((self)(recv, $($a),*)))
                })
            }
        }

        impl<T, F, R, $($A),*> MethodMut<T, ($($A,)*), R> for F
        where
            T: Reflect,
            R: Reflect,
            F: Fn(&mut T, $($A),*) -> R + Send + Sync + 'static,
            $($A: Reflect,)*
        {
            fn into_thunk(self) -> Box<Thunk> {
                thunk(move |args| {
                    check_arity(args, $arity + 1)?;
                    $(let $a = arg::<$A>(args, $idx + 1)?;)*
                    let recv = receiver_mut::<T>(&mut args[0])?;
                    Ok(Any::new((self)(recv, $($a),*)))
                })
            }
        }

        impl<T, F, R, $($A),*> RefMethod<T, ($($A,)*), R> for F
        where
            T: Reflect,
            R: Reflect,
            F: Fn(&T, $($A),*) -> &R + Send + Sync + 'static,
            $($A: Reflect,)*
        {
            fn into_thunk(self) -> Box<Thunk> {
                thunk(move |args| {
                    check_arity(args, $arity + 1)?;
                    $(let $a = arg::<$A>(args, $idx + 1)?;)*
                    let args = &*args;
                    let recv = receiver_const::<T>(&args[0])?;
                    Ok(Any::make_constref((self)(recv, $($a),*)))
                })
            }
        }

        impl<T, F, R, $($A),*> RefMethodMut<T, ($($A,)*), R> for F
        where
            T: Reflect,
            R: Reflect,
            F: Fn(&mut T, $($A),*) -> &mut R + Send + Sync + 'static,
            $($A: Reflect,)*
        {
            fn into_thunk(self) -> Box<Thunk> {
                thunk(move |args| {
                    check_arity(args, $arity + 1)?;
                    $(let $a = arg::<$A>(args, $idx + 1)?;)*
                    let recv = receiver_mut::<T>(&mut args[0])?;
                    Ok(Any::make_ref((self)(recv, $($a),*)))
                })
            }
        }
    };
}

impl_callables!(0;);
impl_callables!(1; A0 a0 0);
impl_callables!(2; A0 a0 0, A1 a1 1);
impl_callables!(3; A0 a0 0, A1 a1 1, A2 a2 2);
impl_callables!(4; A0 a0 0, A1 a1 1, A2 a2 2, A3 a3 3);

/// Marks `node` as described under `name`; a repeated description keeps the
/// first name.
fn claim(node: &'static TypeNode, name: &str) {
    if node.mark_registered() {
        log::warn!(
            "[Factory] {} registered twice (as '{}'), keeping '{}'",
            node.rust_name(),
            name,
            node.name()
        );
    } else {
        node.set_name(name);
        log::debug!("[Factory] registered {} as '{}'", node.rust_name(), name);
    }
}

/// Builder describing the members of `T`.
pub struct Factory<T> {
    node: &'static TypeNode,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Reflect> Factory<T> {
    pub(crate) fn new(node: &'static TypeNode, name: &str) -> Self {
        claim(node, name);
        Self {
            node,
            _marker: PhantomData,
        }
    }

    pub fn node(&self) -> &'static TypeNode {
        self.node
    }

    /// Register a constructor.
    pub fn ctor<Args, F>(self, f: F) -> Self
    where
        F: Constructor<T, Args>,
    {
        let params = F::params();
        let arity = params.len();
        let pushed = self.node.push_ctor(CtorNode {
            parent: self.node,
            params,
            invoke: f.into_thunk(),
        });
        if !pushed {
            log::warn!(
                "[Factory] {} already has a constructor with {} parameter(s) of these types, skipping",
                self.node.name(),
                arity
            );
        }
        self
    }

    /// Register `T::default` as the zero-argument constructor.
    pub fn default_ctor(self) -> Self
    where
        T: Default,
    {
        self.ctor(T::default)
    }

    fn push_func(
        self,
        name: &str,
        signature: &'static TypeNode,
        ret: &'static TypeNode,
        params: Vec<&'static TypeNode>,
        receiver: Receiver,
        returns_ref: bool,
        invoke: Box<Thunk>,
    ) -> Self {
        let pushed = self.node.push_func(FunctionNode {
            parent: self.node,
            name: name.to_owned(),
            signature,
            ret,
            params,
            receiver,
            returns_ref,
            invoke,
        });
        if !pushed {
            log::warn!(
                "[Factory] {} already has a function '{}', skipping",
                self.node.name(),
                name
            );
        }
        self
    }

    /// Method taking `&T`, returning by value.
    pub fn func<Args, R, F>(self, name: &str, f: F) -> Self
    where
        Args: ArgList,
        R: Reflect,
        F: Method<T, Args, R>,
    {
        let signature = resolve::<MethodSignature<T, Args, R, false, false>>();
        self.push_func(name, signature, resolve::<R>(), Args::nodes(), Receiver::Shared, false, f.into_thunk())
    }

    /// Method taking `&mut T`, returning by value.
    pub fn func_mut<Args, R, F>(self, name: &str, f: F) -> Self
    where
        Args: ArgList,
        R: Reflect,
        F: MethodMut<T, Args, R>,
    {
        let signature = resolve::<MethodSignature<T, Args, R, true, false>>();
        self.push_func(name, signature, resolve::<R>(), Args::nodes(), Receiver::Exclusive, false, f.into_thunk())
    }

    /// Method taking `&T` and returning a reference into it.
    pub fn func_ref<Args, R, F>(self, name: &str, f: F) -> Self
    where
        Args: ArgList,
        R: Reflect,
        F: RefMethod<T, Args, R>,
    {
        let signature = resolve::<MethodSignature<T, Args, R, false, true>>();
        self.push_func(name, signature, resolve::<R>(), Args::nodes(), Receiver::Shared, true, f.into_thunk())
    }

    /// Method taking `&mut T` and returning a mutable reference into it.
    pub fn func_mut_ref<Args, R, F>(self, name: &str, f: F) -> Self
    where
        Args: ArgList,
        R: Reflect,
        F: RefMethodMut<T, Args, R>,
    {
        let signature = resolve::<MethodSignature<T, Args, R, true, true>>();
        self.push_func(name, signature, resolve::<R>(), Args::nodes(), Receiver::Exclusive, true, f.into_thunk())
    }

    /// Associated function without a receiver.
    pub fn static_func<Args, R, F>(self, name: &str, f: F) -> Self
    where
        Args: ArgList,
        R: Reflect,
        F: Function<Args, R>,
    {
        let signature = resolve::<FunctionSignature<Args, R>>();
        self.push_func(name, signature, resolve::<R>(), Args::nodes(), Receiver::Static, false, f.into_thunk())
    }

    fn push_var(self, name: &str, var: VariableNode) -> Self {
        if !self.node.push_var(var) {
            log::warn!(
                "[Factory] {} already has a variable '{}', skipping",
                self.node.name(),
                name
            );
        }
        self
    }

    /// Field with read and write access. The accessor yields a const
    /// reference when the owner is one, a mutable reference otherwise.
    pub fn var<V, G, M>(self, name: &str, get: G, get_mut: M) -> Self
    where
        V: Reflect,
        G: Fn(&T) -> &V + Send + Sync + 'static,
        M: Fn(&mut T) -> &mut V + Send + Sync + 'static,
    {
        let access = thunk(move |args| {
            check_arity(args, 1)?;
            let recv = &mut args[0];
            if recv.is_constref() {
                let owner = receiver_const::<T>(&*recv)?;
                return Ok(Any::make_constref(get(owner)));
            }
            let owner = receiver_mut::<T>(recv)?;
            Ok(Any::make_ref(get_mut(owner)))
        });
        let var = VariableNode {
            parent: self.node,
            name: name.to_owned(),
            ty: resolve::<V>(),
            signature: resolve::<FieldSignature<T, V>>(),
            is_static: false,
            readonly: false,
            access,
        };
        self.push_var(name, var)
    }

    /// Field that is only ever lent out as a const reference.
    pub fn readonly_var<V, G>(self, name: &str, get: G) -> Self
    where
        V: Reflect,
        G: Fn(&T) -> &V + Send + Sync + 'static,
    {
        let access = thunk(move |args| {
            check_arity(args, 1)?;
            let args = &*args;
            let owner = receiver_const::<T>(&args[0])?;
            Ok(Any::make_constref(get(owner)))
        });
        let var = VariableNode {
            parent: self.node,
            name: name.to_owned(),
            ty: resolve::<V>(),
            signature: resolve::<FieldSignature<T, V>>(),
            is_static: false,
            readonly: true,
            access,
        };
        self.push_var(name, var)
    }

    /// Static variable; always read-only.
    pub fn static_var<V>(self, name: &str, value: &'static V) -> Self
    where
        V: Reflect + Sync,
    {
        let access = thunk(move |args| {
            check_arity(args, 0)?;
            Ok(Any::make_constref(value))
        });
        let var = VariableNode {
            parent: self.node,
            name: name.to_owned(),
            ty: resolve::<V>(),
            signature: resolve::<FieldSignature<T, V>>(),
            is_static: true,
            readonly: true,
            access,
        };
        self.push_var(name, var)
    }
}

/// Builder describing the enumerators of `T`.
pub struct EnumFactory<T> {
    node: &'static TypeNode,
    _marker: PhantomData<fn() -> T>,
}

impl<T> EnumFactory<T>
where
    T: Reflect + Clone + PartialEq + Send + Sync,
{
    pub(crate) fn new(node: &'static TypeNode, name: &str) -> Self {
        claim(node, name);
        node.enum_info_or_init(|| EnumInfo {
            items: RwLock::new(Vec::new()),
            read: enum_read::<T>,
            write: enum_write::<T>,
        });
        Self {
            node,
            _marker: PhantomData,
        }
    }

    pub fn node(&self) -> &'static TypeNode {
        self.node
    }

    /// Add an enumerator. Items keep registration order.
    pub fn item(self, name: &str, variant: T, value: i64) -> Self {
        let Some(info) = self.node.enum_info() else {
            log::error!("[Factory] {} has no enum metadata", self.node.name());
            return self;
        };
        let mut items = info.items.write();
        if items.iter().any(|item| item.name == name) {
            log::warn!(
                "[Factory] enum {} already has an item '{}', skipping",
                self.node.name(),
                name
            );
        } else {
            items.push(EnumItem {
                name: name.to_owned(),
                value,
                variant: Box::new(variant),
            });
        }
        drop(items);
        self
    }
}

fn enum_read<T: Reflect + PartialEq>(info: &EnumInfo, value: &Any<'_>) -> Option<i64> {
    let current = value.try_cast_const::<T>()?;
    info.items
        .read()
        .iter()
        .find(|item| item.variant.downcast_ref::<T>() == Some(current))
        .map(|item| item.value)
}

fn enum_write<T: Reflect + Clone>(info: &EnumInfo, value: &mut Any<'_>, raw: i64) -> bool {
    let variant = info
        .items
        .read()
        .iter()
        .find(|item| item.value == raw)
        .and_then(|item| item.variant.downcast_ref::<T>())
        .cloned();
    let Some(variant) = variant else {
        log::debug!("[Factory] no enumerator with value {}", raw);
        return false;
    };
    match value.try_cast::<T>() {
        Ok(Some(slot)) => {
            *slot = variant;
            true
        }
        _ => false,
    }
}
