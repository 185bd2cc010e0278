// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::*;
use crate::{typeinfo, TypeShape};

/// Counts its clones through a shared counter; drops release the `Arc`.
#[derive(Debug)]
struct Counted {
    clones: Arc<AtomicUsize>,
    value: u32,
}

impl Counted {
    fn new(value: u32) -> (Self, Arc<AtomicUsize>) {
        let clones = Arc::new(AtomicUsize::new(0));
        (
            Self {
                clones: Arc::clone(&clones),
                value,
            },
            clones,
        )
    }
}

impl Clone for Counted {
    fn clone(&self) -> Self {
        self.clones.fetch_add(1, Ordering::SeqCst);
        Self {
            clones: Arc::clone(&self.clones),
            value: self.value,
        }
    }
}

impl Reflect for Counted {
    fn shape() -> TypeShape {
        TypeShape::class("Counted")
    }

    fn operations() -> TypeOperations {
        TypeOperations::builder::<Self>().cloneable().build()
    }
}

struct MoveOnly;

impl Reflect for MoveOnly {
    fn shape() -> TypeShape {
        TypeShape::class("MoveOnly")
    }

    fn operations() -> TypeOperations {
        TypeOperations::builder::<Self>().build()
    }
}

// ============================================================================
// Construction and ownership
// ============================================================================

#[test]
fn test_new_moves_without_copying() {
    let (counted, clones) = Counted::new(1);
    let any = Any::new(counted);
    assert!(any.is_copy());
    assert_eq!(clones.load(Ordering::SeqCst), 0);
    assert_eq!(any.try_cast_const::<Counted>().map(|c| c.value), Some(1));
}

#[test]
fn test_make_copy_copies_once() {
    let (counted, clones) = Counted::new(2);
    let any = Any::make_copy(&counted);
    assert!(any.is_copy());
    assert_eq!(clones.load(Ordering::SeqCst), 1);
}

#[test]
fn test_emplace_constructs_in_place() {
    let any = Any::emplace(|| String::from("in place"));
    assert_eq!(any.try_cast_const::<String>().map(String::as_str), Some("in place"));
}

#[test]
fn test_copy_mode_drops_payload() {
    let (counted, clones) = Counted::new(3);
    let mut any = Any::new(counted);
    assert_eq!(Arc::strong_count(&clones), 2);
    any.reset();
    assert!(any.is_null());
    assert_eq!(Arc::strong_count(&clones), 1);
}

#[test]
fn test_views_do_not_drop() {
    let (counted, clones) = Counted::new(4);
    {
        let _view = Any::make_constref(&counted);
    }
    assert_eq!(Arc::strong_count(&clones), 2);
    drop(counted);
    assert_eq!(Arc::strong_count(&clones), 1);
}

#[test]
fn test_clone_semantics() {
    let (mut counted, clones) = Counted::new(5);

    let view = Any::make_constref(&counted);
    let shared = view.clone();
    assert!(shared.is_constref());
    assert_eq!(shared.payload(), view.payload());
    assert_eq!(clones.load(Ordering::SeqCst), 0);
    drop((view, shared));

    let by_ref = Any::make_ref(&mut counted);
    let copied = by_ref.clone();
    assert!(copied.is_copy());
    assert_ne!(copied.payload(), by_ref.payload());
    assert_eq!(clones.load(Ordering::SeqCst), 1);

    let again = copied.clone();
    assert!(again.is_copy());
    assert_eq!(clones.load(Ordering::SeqCst), 2);
}

#[test]
fn test_move_only_copy_is_null() {
    let any = Any::new(MoveOnly);
    assert!(any.copy().is_null());
    assert!(Any::make_copy(&MoveOnly).is_null());
    assert!(!any.operations().is_copyable());
}

#[test]
fn test_steal_leaves_null() {
    let mut source = Any::new(7u64);
    let stolen = source.steal();
    assert!(source.is_null());
    assert_eq!(stolen.try_cast_const::<u64>(), Some(&7));
}

#[test]
fn test_into_value() {
    let any = Any::new(String::from("owned"));
    assert_eq!(any.into_value::<String>().expect("owned string"), "owned");

    let any = Any::new(1u8);
    let any = any.into_value::<i8>().expect_err("wrong type");
    assert!(any.can_cast::<u8>());

    let text = String::from("borrowed");
    assert!(Any::make_constref(&text).into_value::<String>().is_err());
}

// ============================================================================
// Access rules
// ============================================================================

#[test]
fn test_identity_cast() {
    let mut any = Any::new(1i32);
    assert!(any.can_cast::<i32>());
    assert!(!any.can_cast::<u32>());
    assert_eq!(any.try_cast::<u32>(), Ok(None));
    assert_eq!(any.try_cast::<i32>(), Ok(Some(&mut 1)));
    assert_eq!(any.type_info(), typeinfo::<i32>());
}

#[test]
fn test_constref_refuses_mutation() {
    let mut values = vec![1u8, 2];
    let mut view = Any::make_constref(&values);
    assert_eq!(view.try_cast::<Vec<u8>>(), Err(BadAnyAccess));
    assert!(view.try_cast_const::<Vec<u8>>().is_some());
    assert!(view.mut_ref().is_err());
    assert_eq!(view.deep_set(&Any::new(vec![3u8])), Err(BadAnyAccess));
    assert!(!view.push_back(&Any::new(3u8)));
    drop(view);
    values.push(3);
    assert_eq!(values, [1, 2, 3]);
}

#[test]
fn test_numeric_casts() {
    assert_eq!(Any::new(-3i16).try_cast_integral(), Some(-3));
    assert_eq!(Any::new(-3i16).try_cast_uintegral(), None);
    assert_eq!(Any::new(9u32).try_cast_uintegral(), Some(9));
    assert_eq!(Any::new(0.5f32).try_cast_floating_point(), Some(0.5));
    assert_eq!(Any::new(true).try_cast_integral(), None);
}

// ============================================================================
// Assignment
// ============================================================================

#[test]
fn test_deep_set_converts_numbers() {
    let mut height = 0.0f64;
    {
        let mut target = Any::make_ref(&mut height);
        assert_eq!(target.deep_set(&Any::new(234i32)), Ok(true));
    }
    assert_eq!(height, 234.0);

    let mut byte = 0u8;
    {
        let mut target = Any::make_ref(&mut byte);
        assert_eq!(target.deep_set(&Any::new(12.9f32)), Ok(true));
    }
    assert_eq!(byte, 12);
}

#[test]
fn test_deep_set_requires_same_type() {
    let mut name = String::from("a");
    let mut target = Any::make_ref(&mut name);
    assert_eq!(target.deep_set(&Any::new(3u8)), Ok(false));
    assert_eq!(target.deep_set(&Any::new(String::from("b"))), Ok(true));
    drop(target);
    assert_eq!(name, "b");
}

#[test]
fn test_copy_and_steal_assign() {
    let (left, clones) = Counted::new(1);
    let (right, _) = Counted::new(2);
    let mut a = Any::new(left);
    let mut b = Any::new(right);

    assert_eq!(a.copy_assign(&b), Ok(true));
    assert_eq!(a.try_cast_const::<Counted>().map(|c| c.value), Some(2));
    assert_eq!(clones.load(Ordering::SeqCst), 0);

    let mut c = Any::new(Counted::new(9).0);
    assert_eq!(b.steal_assign(&mut c), Ok(true));
    assert_eq!(b.try_cast_const::<Counted>().map(|c| c.value), Some(9));
    assert_eq!(c.try_cast_const::<Counted>().map(|c| c.value), Some(2));

    let mut other = Any::new(1u8);
    assert_eq!(a.steal_assign(&mut other), Ok(false));
}

// ============================================================================
// Containers
// ============================================================================

#[test]
fn test_travel_elements_sum() {
    let values = vec![1i32, 2, 3, 4];
    let any = Any::make_constref(&values);
    assert_eq!(any.size(), 4);
    assert_eq!(any.elem_type(), typeinfo::<i32>());

    let mut sum = 0;
    any.travel_elements_const(|elem| sum += elem.try_cast_const::<i32>().copied().unwrap_or(0));
    assert_eq!(sum, 10);

    let mut copies = 0;
    any.travel_elements(|elem| {
        assert!(elem.is_copy());
        copies += 1;
    });
    assert_eq!(copies, 4);
}

#[test]
fn test_travel_by_ref_follows_container_access() {
    let mut values = vec![1i32, 2, 3];
    {
        let mut any = Any::make_ref(&mut values);
        any.travel_elements_by_ref(|elem| {
            assert!(elem.is_ref());
            if let Ok(Some(v)) = elem.try_cast::<i32>() {
                *v *= 10;
            }
        });
    }
    assert_eq!(values, [10, 20, 30]);

    let mut view = Any::make_constref(&values);
    view.travel_elements_by_ref(|elem| assert!(elem.is_constref()));
}

#[test]
fn test_push_back() {
    let mut values: Vec<String> = Vec::new();
    {
        let mut any = Any::make_ref(&mut values);
        assert!(any.push_back(&Any::new(String::from("x"))));
        assert!(!any.push_back(&Any::new(1u8)));
    }
    assert_eq!(values, ["x"]);

    let mut fixed = [0u8; 2];
    let mut any = Any::make_ref(&mut fixed);
    assert!(!any.push_back(&Any::new(1u8)));
    assert_eq!(any.size(), 2);

    assert!(!Any::new(5u8).push_back(&Any::new(1u8)));
}

#[test]
fn test_null_any() {
    let any = Any::default();
    assert!(any.is_null());
    assert!(!any.has_value());
    assert!(any.type_node().is_none());
    assert!(any.copy().is_null());
    assert!(any.clone().is_null());
    assert_eq!(any.size(), 0);
}
