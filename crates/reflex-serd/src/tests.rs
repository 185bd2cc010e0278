// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use std::collections::{BTreeMap, BTreeSet};

use reflex::{Any, Reflect, Registry};
use toml::{Table, Value};

use super::*;

#[derive(Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(default)]
enum Mood {
    #[default]
    Calm,
    Angry = 7,
}

#[derive(Debug, Clone, Default, PartialEq, Reflect)]
#[reflect(default)]
struct Inventory {
    slots: Vec<u16>,
    counts: BTreeMap<String, i32>,
    tags: BTreeSet<u8>,
    mood: Mood,
    by_mood: BTreeMap<Mood, u8>,
}

impl PartialOrd for Mood {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Mood {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (*self as i64).cmp(&(*other as i64))
    }
}

impl Eq for Mood {}

#[derive(Debug, Clone, PartialEq, Reflect)]
struct Linked {
    id: u32,
    next: *const u32,
}

#[derive(Debug, Clone, Default, PartialEq, Reflect)]
struct Strict {
    a: i32,
    b: i32,
}

#[derive(Debug, Clone, PartialEq, Reflect)]
struct Labelled {
    label: &'static str,
    count: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Reflect)]
#[reflect(default)]
struct Slots {
    slots: Vec<Option<i32>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Rgb(u8, u8, u8);

impl Reflect for Rgb {
    fn shape() -> reflex::TypeShape {
        reflex::TypeShape::class("Rgb")
    }

    fn operations() -> reflex::TypeOperations {
        reflex::TypeOperations::builder::<Self>().cloneable().defaulted().build()
    }
}

fn setup() {
    let _ = env_logger::builder().is_test(true).try_init();
    Registry::init(|registry| {
        registry
            .register::<Mood>()
            .register::<Inventory>()
            .register::<Linked>()
            .register::<Strict>()
            .register::<Labelled>()
            .register::<Slots>();
    });
}

fn sample() -> Inventory {
    Inventory {
        slots: vec![3, 1, 4],
        counts: BTreeMap::from([(String::from("arrows"), 12), (String::from("gold"), -3)]),
        tags: BTreeSet::from([2, 9]),
        mood: Mood::Angry,
        by_mood: BTreeMap::from([(Mood::Calm, 1), (Mood::Angry, 2)]),
    }
}

#[test]
fn test_scalars_to_value() {
    setup();
    assert_eq!(to_value(&Any::new(true)).expect("bool"), Some(Value::Boolean(true)));
    assert_eq!(to_value(&Any::new(-5i8)).expect("i8"), Some(Value::Integer(-5)));
    assert_eq!(to_value(&Any::new(1.5f32)).expect("f32"), Some(Value::Float(1.5)));
    assert_eq!(
        to_value(&Any::new(String::from("hi"))).expect("string"),
        Some(Value::String("hi".into()))
    );
    assert_eq!(to_value(&Any::new(None::<u8>)).expect("none"), None);
}

#[test]
fn test_unsigned_out_of_range() {
    let err = to_value(&Any::new(u64::MAX)).expect_err("too large");
    assert!(matches!(err, SerdError::OutOfRange { value: u64::MAX, .. }));

    let serd = Serd::new(SerdConfig::default().with_number_mode(NumberMode::Double));
    assert_eq!(
        serd.to_value(&Any::new(7u64)).expect("double"),
        Some(Value::Float(7.0))
    );
}

#[test]
fn test_null_is_rejected() {
    assert!(matches!(to_value(&Any::null()), Err(SerdError::Null)));
}

#[test]
fn test_inventory_round_trip() {
    setup();
    let original = sample();
    let mut table = Table::new();
    serialize(&mut table, &Any::make_constref(&original), "inventory").expect("serialize");

    let inventory = table["inventory"].as_table().expect("table");
    assert_eq!(inventory["mood"], Value::Integer(7));
    assert_eq!(inventory["counts"]["gold"], Value::Integer(-3));
    assert_eq!(inventory["by_mood"]["Angry"], Value::Integer(2));

    let mut restored = Inventory {
        slots: vec![9; 10],
        ..Inventory::default()
    };
    deserialize_named(&mut Any::make_ref(&mut restored), &table, "inventory").expect("deserialize");
    assert_eq!(restored, original);
}

#[test]
fn test_enum_by_name() {
    setup();
    let serd = Serd::new(SerdConfig::default().with_enum_mode(EnumMode::Name));
    assert_eq!(
        serd.to_value(&Any::new(Mood::Angry)).expect("enum"),
        Some(Value::String("Angry".into()))
    );

    let mut mood = Mood::Calm;
    deserialize(&mut Any::make_ref(&mut mood), &Value::String("Angry".into())).expect("by name");
    assert_eq!(mood, Mood::Angry);
    deserialize(&mut Any::make_ref(&mut mood), &Value::Integer(0)).expect("by value");
    assert_eq!(mood, Mood::Calm);

    let err = deserialize(&mut Any::make_ref(&mut mood), &Value::Integer(3)).expect_err("unknown");
    assert!(matches!(err, SerdError::UnknownItem { .. }));
}

#[test]
fn test_pointer_fields_are_skipped() {
    setup();
    let target = 5u32;
    let linked = Linked {
        id: 1,
        next: &target,
    };
    let value = to_value(&Any::make_constref(&linked))
        .expect("serialize")
        .expect("table");
    let table = value.as_table().expect("table");
    assert_eq!(table.len(), 1);
    assert_eq!(table["id"], Value::Integer(1));
}

#[test]
fn test_missing_field_policy() {
    setup();
    let document: Table = toml::from_str("[strict]\na = 4\n").expect("parse");

    let mut strict = Strict { a: 0, b: 9 };
    deserialize_named(&mut Any::make_ref(&mut strict), &document, "strict").expect("lenient");
    assert_eq!(strict, Strict { a: 4, b: 9 });

    let serd = Serd::new(SerdConfig::default().with_missing_field(MissingFieldPolicy::Error));
    let err = serd
        .deserialize_named(&mut Any::make_ref(&mut strict), &document, "strict")
        .expect_err("strict");
    assert!(matches!(err, SerdError::MissingField { ref field, .. } if field == "b"));

    let err = serd
        .deserialize_named(&mut Any::make_ref(&mut strict), &document, "absent")
        .expect_err("no entry");
    assert!(matches!(err, SerdError::MissingField { .. }));
}

#[test]
fn test_kind_mismatch() {
    setup();
    let mut flag = false;
    let err = deserialize(&mut Any::make_ref(&mut flag), &Value::Integer(1)).expect_err("mismatch");
    assert!(matches!(
        err,
        SerdError::Mismatch {
            expected: "boolean",
            found: "integer",
            ..
        }
    ));
}

#[test]
fn test_const_target_is_rejected() {
    let number = 3i32;
    let err = deserialize(&mut Any::make_constref(&number), &Value::Integer(1)).expect_err("const");
    assert!(matches!(err, SerdError::Access(_)));
}

#[test]
fn test_custom_methods_take_precedence() {
    SerdMethods::global().register::<Rgb, _, _>(
        |rgb| Ok(Value::String(format!("#{:02x}{:02x}{:02x}", rgb.0, rgb.1, rgb.2))),
        |rgb, node| {
            let text = node
                .as_str()
                .ok_or_else(|| SerdError::mismatch("Rgb", "string", node))?;
            let channel = |i: usize| {
                u8::from_str_radix(text.get(i..i + 2).unwrap_or(""), 16)
                    .map_err(|_| SerdError::unsupported("parse color", text))
            };
            *rgb = Rgb(channel(1)?, channel(3)?, channel(5)?);
            Ok(())
        },
    );
    assert!(SerdMethods::global().contains::<Rgb>());

    let colors = vec![Rgb(255, 0, 16)];
    let value = to_value(&Any::make_constref(&colors)).expect("serialize");
    assert_eq!(value, Some(Value::Array(vec![Value::String("#ff0010".into())])));

    let mut restored: Vec<Rgb> = Vec::new();
    deserialize(&mut Any::make_ref(&mut restored), &value.expect("array")).expect("deserialize");
    assert_eq!(restored, colors);
}

#[test]
fn test_depth_limit() {
    let serd = Serd::new(SerdConfig {
        max_depth: 1,
        ..SerdConfig::default()
    });
    let nested = vec![vec![1u8]];
    let err = serd.to_value(&Any::make_constref(&nested)).expect_err("too deep");
    assert!(matches!(err, SerdError::TooDeep(1)));
}

#[test]
fn test_empty_element_in_sequence_is_rejected() {
    setup();
    let holes = Slots {
        slots: vec![Some(1), None, Some(3)],
    };
    let err = to_value(&Any::make_constref(&holes)).expect_err("hole in array");
    assert!(matches!(err, SerdError::Unsupported { .. }));

    let full = Slots {
        slots: vec![Some(1), Some(3)],
    };
    let text = to_string(&Any::make_constref(&full), "slots").expect("serialize");
    let mut restored = Slots::default();
    from_str(&mut Any::make_ref(&mut restored), &text, "slots").expect("deserialize");
    assert_eq!(restored, full);

    let tags = BTreeSet::from([None, Some(2u8)]);
    let err = to_value(&Any::make_constref(&tags)).expect_err("hole in set");
    assert!(matches!(err, SerdError::Unsupported { .. }));

    let counts = BTreeMap::from([(String::from("a"), None::<u8>)]);
    let err = to_value(&Any::make_constref(&counts)).expect_err("hole in map");
    assert!(matches!(err, SerdError::Unsupported { .. }));
}

#[test]
fn test_borrowed_text_is_written_but_not_read() {
    setup();
    let original = Labelled {
        label: "fixed",
        count: 2,
    };
    let text = to_string(&Any::make_constref(&original), "labelled").expect("serialize");
    assert!(text.contains("label = \"fixed\""));

    let mut restored = Labelled {
        label: "kept",
        count: 0,
    };
    let document = text.replace("fixed", "other");
    from_str(&mut Any::make_ref(&mut restored), &document, "labelled").expect("deserialize");
    assert_eq!(restored.label, "kept");
    assert_eq!(restored.count, 2);
}
