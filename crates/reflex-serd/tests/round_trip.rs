// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Document round trips through the global registry.

use std::io::Write;

use reflex::{typeinfo, Any, Reflect, Registry};
use reflex_serd::{EnumMode, Serd, SerdConfig};
use toml::Table;

#[derive(Debug, Clone, Default, PartialEq, Reflect)]
#[reflect(default)]
struct Person {
    name: String,
    height: f32,
    male: bool,
    ids: [i32; 5],
    opt: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
enum Role {
    Guest = 1,
    Admin = 2,
}

#[derive(Debug, Clone, PartialEq, Reflect)]
#[reflect(name = "Team")]
struct Team {
    leader: Person,
    members: Vec<Person>,
    role: Role,
    #[reflect(rename = "motto")]
    slogan: Option<String>,
    #[reflect(skip)]
    scratch: u64,
}

fn setup() {
    let _ = env_logger::builder().is_test(true).try_init();
    Registry::init(|registry| {
        registry
            .register::<Person>()
            .register::<Role>()
            .register::<Team>();
    });
}

fn visual_gmq() -> Person {
    Person {
        name: "VisualGMQ".into(),
        height: 123.0,
        male: true,
        ids: [1, 2, 3, 4, 5],
        opt: Some(3),
    }
}

#[test]
fn test_person_round_trip() {
    setup();
    let original = visual_gmq();
    let value = Any::new(original.clone());

    let mut table = Table::new();
    reflex_serd::serialize(&mut table, &value, "Person").expect("serialize");

    let mut restored = Any::new(Person::default());
    reflex_serd::deserialize_named(&mut restored, &table, "Person").expect("deserialize");
    assert_eq!(restored.try_cast_const::<Person>(), Some(&original));
}

#[test]
fn test_empty_optional_is_omitted() {
    setup();
    let original = Person {
        opt: None,
        ..visual_gmq()
    };
    let text = reflex_serd::to_string(&Any::make_constref(&original), "p").expect("serialize");
    assert!(!text.contains("opt"));

    let mut restored = Person::default();
    reflex_serd::from_str(&mut Any::make_ref(&mut restored), &text, "p").expect("deserialize");
    assert_eq!(restored, original);
}

#[test]
fn test_missing_keys_keep_existing_values() {
    setup();
    let mut person = Person {
        opt: Some(5),
        ..visual_gmq()
    };
    reflex_serd::from_str(&mut Any::make_ref(&mut person), "[p]\nname = \"x\"\n", "p")
        .expect("deserialize");
    assert_eq!(person.name, "x");
    assert_eq!(person.opt, Some(5));
    assert_eq!(person.ids, [1, 2, 3, 4, 5]);
    assert!(person.male);
}

#[test]
fn test_static_array_fills_in_place() {
    setup();
    let mut person = visual_gmq();
    let text = "[p]\nids = [9, 8]\n";
    reflex_serd::from_str(&mut Any::make_ref(&mut person), text, "p").expect("deserialize");
    assert_eq!(person.ids, [9, 8, 3, 4, 5]);
    assert_eq!(person.name, "VisualGMQ");
}

#[test]
fn test_nested_round_trip_through_text() {
    setup();
    let team = Team {
        leader: visual_gmq(),
        members: vec![
            Person {
                name: "a".into(),
                ..Person::default()
            },
            Person {
                name: "b".into(),
                opt: Some(-1),
                ..Person::default()
            },
        ],
        role: Role::Admin,
        slogan: Some("ship it".into()),
        scratch: 99,
    };

    let serd = Serd::new(SerdConfig::default().with_enum_mode(EnumMode::Name));
    let text = serd.to_string(&Any::make_constref(&team), "team").expect("serialize");
    assert!(text.contains("role = \"Admin\""));
    assert!(text.contains("motto"));
    assert!(!text.contains("scratch"));

    let mut restored = Team {
        leader: Person::default(),
        members: Vec::new(),
        role: Role::Guest,
        slogan: None,
        scratch: 0,
    };
    serd.from_str(&mut Any::make_ref(&mut restored), &text, "team")
        .expect("deserialize");
    assert_eq!(restored, Team { scratch: 0, ..team });
}

#[test]
fn test_derived_metadata() {
    setup();
    let class = typeinfo::<Team>().as_class().expect("class");
    assert_eq!(&*class.name(), "Team");
    let names: Vec<_> = class.vars().iter().map(|v| v.name()).collect();
    assert_eq!(names, ["leader", "members", "role", "motto"]);

    let role = typeinfo::<Role>().as_enum().expect("enum");
    assert_eq!(role.items(), [("Guest".to_owned(), 1), ("Admin".to_owned(), 2)]);
}

#[test]
fn test_config_file_drives_output() {
    setup();
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    writeln!(file, "number_mode = \"double\"").expect("write");
    let serd = Serd::new(SerdConfig::from_file(file.path()).expect("config"));

    let text = serd
        .to_string(&Any::make_constref(&visual_gmq()), "p")
        .expect("serialize");
    let table: Table = toml::from_str(&text).expect("parse");
    assert_eq!(table["p"]["ids"][0], toml::Value::Float(1.0));

    let mut restored = Person::default();
    serd.from_str(&mut Any::make_ref(&mut restored), &text, "p")
        .expect("deserialize");
    assert_eq!(restored, visual_gmq());
}
