// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Marker types giving functions, methods and fields their own type nodes.
//!
//! These are never instantiated; they exist so a registered member can
//! report its signature as a `Function`, `MemberFunction` or `MemberObject`
//! node.

use std::marker::PhantomData;

use crate::node::{TypeNode, TypeShape};
use crate::operations::TypeOperations;
use crate::registry::resolve;
use crate::Reflect;

/// Parameter list of a registered callable.
pub trait ArgList: 'static {
    fn nodes() -> Vec<&'static TypeNode>;
}

macro_rules! arg_list {
    ($($arg:ident),*) => {
        impl<$($arg: Reflect),*> ArgList for ($($arg,)*) {
            fn nodes() -> Vec<&'static TypeNode> {
                vec![$(resolve::<$arg>()),*]
            }
        }
    };
}

arg_list!();
arg_list!(A0);
arg_list!(A0, A1);
arg_list!(A0, A1, A2);
arg_list!(A0, A1, A2, A3);

fn join(nodes: &[&'static TypeNode]) -> String {
    nodes
        .iter()
        .map(|node| node.name().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Free or associated function `fn(Args) -> R`.
pub struct FunctionSignature<Args, R>(PhantomData<fn() -> (Args, R)>);

impl<Args: ArgList, R: Reflect> Reflect for FunctionSignature<Args, R> {
    fn shape() -> TypeShape {
        TypeShape::function(format!(
            "fn({}) -> {}",
            join(&Args::nodes()),
            resolve::<R>().name()
        ))
    }

    fn operations() -> TypeOperations {
        TypeOperations::builder::<Self>().build()
    }
}

/// Method on `T`; `MUTABLE` selects `&mut self`, `BY_REF` a borrowed return.
pub struct MethodSignature<T, Args, R, const MUTABLE: bool, const BY_REF: bool>(
    PhantomData<fn() -> (T, Args, R)>,
);

impl<T, Args, R, const MUTABLE: bool, const BY_REF: bool> Reflect
    for MethodSignature<T, Args, R, MUTABLE, BY_REF>
where
    T: Reflect,
    Args: ArgList,
    R: Reflect,
{
    fn shape() -> TypeShape {
        let receiver = if MUTABLE { "&mut " } else { "&" };
        let ret = match (BY_REF, MUTABLE) {
            (false, _) => "",
            (true, false) => "&",
            (true, true) => "&mut ",
        };
        let params = Args::nodes();
        let sep = if params.is_empty() { "" } else { ", " };
        TypeShape::member_function(
            format!(
                "fn({}{}{}{}) -> {}{}",
                receiver,
                resolve::<T>().name(),
                sep,
                join(&params),
                ret,
                resolve::<R>().name()
            ),
            !MUTABLE,
        )
    }

    fn operations() -> TypeOperations {
        TypeOperations::builder::<Self>().build()
    }
}

/// Field of type `V` on `T`.
pub struct FieldSignature<T, V>(PhantomData<fn() -> (T, V)>);

impl<T: Reflect, V: Reflect> Reflect for FieldSignature<T, V> {
    fn shape() -> TypeShape {
        TypeShape::member_object(format!(
            "{}::{}",
            resolve::<T>().name(),
            resolve::<V>().name()
        ))
    }

    fn operations() -> TypeOperations {
        TypeOperations::builder::<Self>().build()
    }
}
