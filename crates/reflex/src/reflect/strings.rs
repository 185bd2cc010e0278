// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! `String` and `&'static str`.
//!
//! Characters aren't individually addressable in UTF-8, so string tables
//! lend owned `char` copies when traversed and refuse `get`.

use crate::any::Any;
use crate::node::{ContainerKind, StringKind, TypeShape};
use crate::operations::{Addressing, ArrayKind, ContainerOperations, TypeOperations};
use crate::registry::resolve;
use crate::Reflect;

impl Reflect for String {
    fn shape() -> TypeShape {
        TypeShape::string("String", StringKind::Owned, Some(resolve::<char>()))
    }

    fn operations() -> TypeOperations {
        let container = ContainerOperations {
            size: string_len,
            capacity: string_capacity,
            push_back: string_push,
            pop_back: string_pop,
            insert: string_insert,
            resize: string_resize,
            clear: string_clear,
            travel: string_travel,
            ..ContainerOperations::unsupported(ContainerKind::String, ArrayKind::Dynamic, Addressing::Forward)
        };
        let builder = TypeOperations::builder::<String>().cloneable().defaulted();
        // SAFETY: every entry above treats its payload as a String.
        unsafe { builder.container(container) }.build()
    }
}

impl Reflect for &'static str {
    fn shape() -> TypeShape {
        TypeShape::string("&str", StringKind::View, Some(resolve::<char>()))
    }

    fn operations() -> TypeOperations {
        let container = ContainerOperations {
            size: str_len,
            capacity: str_len,
            travel: str_travel,
            ..ContainerOperations::unsupported(ContainerKind::String, ArrayKind::Static, Addressing::Forward)
        };
        let builder = TypeOperations::builder::<&'static str>().cloneable().defaulted();
        // SAFETY: every entry above treats its payload as a &'static str.
        unsafe { builder.container(container) }.build()
    }
}

unsafe fn string<'p>(payload: *const u8) -> &'p String {
    unsafe { &*payload.cast::<String>() }
}

unsafe fn string_mut<'p>(payload: *mut u8) -> &'p mut String {
    unsafe { &mut *payload.cast::<String>() }
}

unsafe fn string_len(payload: *const u8) -> usize {
    unsafe { string(payload) }.chars().count()
}

unsafe fn string_capacity(payload: *const u8) -> usize {
    unsafe { string(payload) }.capacity()
}

/// Accepts a `char` or a whole string to append.
unsafe fn string_push(payload: *mut u8, elem: &Any<'_>) -> bool {
    let target = unsafe { string_mut(payload) };
    if let Some(c) = elem.try_cast_const::<char>() {
        target.push(*c);
    } else if let Some(s) = elem.try_cast_const::<String>() {
        target.push_str(s);
    } else if let Some(s) = elem.try_cast_const::<&'static str>() {
        target.push_str(s);
    } else {
        return false;
    }
    true
}

unsafe fn string_pop(payload: *mut u8) -> bool {
    unsafe { string_mut(payload) }.pop().is_some()
}

unsafe fn string_insert(payload: *mut u8, index: usize, elem: &Any<'_>) -> bool {
    let target = unsafe { string_mut(payload) };
    let Some(c) = elem.try_cast_const::<char>() else {
        return false;
    };
    let byte = if index == target.chars().count() {
        target.len()
    } else {
        match target.char_indices().nth(index) {
            Some((byte, _)) => byte,
            None => return false,
        }
    };
    target.insert(byte, *c);
    true
}

/// Truncates at a character boundary or pads with NUL.
unsafe fn string_resize(payload: *mut u8, len: usize) -> bool {
    let target = unsafe { string_mut(payload) };
    let count = target.chars().count();
    if len < count {
        if let Some((byte, _)) = target.char_indices().nth(len) {
            target.truncate(byte);
        }
    } else {
        target.extend(std::iter::repeat('\0').take(len - count));
    }
    true
}

unsafe fn string_clear(payload: *mut u8) -> bool {
    unsafe { string_mut(payload) }.clear();
    true
}

unsafe fn string_travel(payload: *const u8, f: &mut dyn FnMut(&Any<'_>)) {
    for c in unsafe { string(payload) }.chars() {
        f(&Any::new(c));
    }
}

unsafe fn str_len(payload: *const u8) -> usize {
    unsafe { *payload.cast::<&'static str>() }.chars().count()
}

unsafe fn str_travel(payload: *const u8, f: &mut dyn FnMut(&Any<'_>)) {
    for c in unsafe { *payload.cast::<&'static str>() }.chars() {
        f(&Any::new(c));
    }
}
