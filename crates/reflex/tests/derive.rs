// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::float_cmp)] // Test assertions with constants

//! `#[derive(Reflect)]` output seen through the registry.

use std::collections::HashMap;

use reflex::{
    typeinfo, Any, ArrayType, Boolean, ClassVisitor, EnumType, MapType, Numeric, OptionalType,
    PointerType, Property, PropertyKind, Reflect, Registry, StringType, TypeCategory,
};

#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(name = "Shape")]
enum Kind {
    Circle = 3,
    Square = 4,
    #[reflect(rename = "Tri")]
    Triangle = 5,
}

#[derive(Debug, Clone, Default, PartialEq, Reflect)]
#[reflect(default)]
struct Point {
    x: f64,
    y: f64,
}

#[derive(Debug, Clone, PartialEq, Reflect)]
#[reflect(name = "Widget")]
struct Widget {
    #[reflect(readonly)]
    id: u32,
    label: String,
    visible: bool,
    kind: Kind,
    origin: Point,
    path: Vec<Point>,
    note: Option<String>,
    lookup: HashMap<String, u8>,
    parent: *const Widget,
    #[reflect(skip)]
    cache: std::cell::Cell<u32>,
}

#[derive(Reflect)]
#[reflect(opaque)]
struct Handle {
    fd: i32,
}

fn setup() {
    let _ = env_logger::builder().is_test(true).try_init();
    Registry::init(|registry| {
        registry
            .register::<Kind>()
            .register::<Point>()
            .register::<Widget>()
            .register::<Handle>();
    });
}

fn widget() -> Widget {
    Widget {
        id: 17,
        label: "ok".into(),
        visible: true,
        kind: Kind::Square,
        origin: Point { x: 1.0, y: 2.0 },
        path: vec![Point::default(); 3],
        note: None,
        lookup: HashMap::new(),
        parent: std::ptr::null(),
        cache: std::cell::Cell::new(0),
    }
}

#[derive(Default)]
struct Census {
    seen: Vec<(&'static str, PropertyKind)>,
}

impl ClassVisitor for Census {
    fn visit_numeric(&mut self, property: &Property, _: Numeric) {
        self.seen.push((property.name(), property.kind()));
    }
    fn visit_boolean(&mut self, property: &Property, _: Boolean) {
        self.seen.push((property.name(), property.kind()));
    }
    fn visit_string(&mut self, property: &Property, _: StringType) {
        self.seen.push((property.name(), property.kind()));
    }
    fn visit_enum(&mut self, property: &Property, _: EnumType) {
        self.seen.push((property.name(), property.kind()));
    }
    fn visit_class(&mut self, property: &Property, _: reflex::ClassType) {
        self.seen.push((property.name(), property.kind()));
    }
    fn visit_pointer(&mut self, property: &Property, _: PointerType) {
        self.seen.push((property.name(), property.kind()));
    }
    fn visit_array(&mut self, property: &Property, _: ArrayType) {
        self.seen.push((property.name(), property.kind()));
    }
    fn visit_optional(&mut self, property: &Property, _: OptionalType) {
        self.seen.push((property.name(), property.kind()));
    }
    fn visit_map(&mut self, property: &Property, _: MapType) {
        self.seen.push((property.name(), property.kind()));
    }
}

#[test]
fn test_properties_are_visited_by_kind() {
    setup();
    let class = typeinfo::<Widget>().as_class().expect("class");
    let mut census = Census::default();
    for property in class.properties() {
        property.visit(&mut census);
    }
    assert_eq!(
        census.seen,
        [
            ("id", PropertyKind::Numeric),
            ("label", PropertyKind::String),
            ("visible", PropertyKind::Boolean),
            ("kind", PropertyKind::Enum),
            ("origin", PropertyKind::Class),
            ("path", PropertyKind::Array),
            ("note", PropertyKind::Optional),
            ("lookup", PropertyKind::Map),
            ("parent", PropertyKind::Pointer),
        ]
    );
}

#[test]
fn test_readonly_field() {
    setup();
    let class = typeinfo::<Widget>().as_class().expect("class");
    let id = class.property("id").expect("id");
    assert!(id.is_readonly());

    let mut value = widget();
    let mut owner = Any::make_ref(&mut value);
    let field = id.call(&mut owner).expect("field");
    assert!(field.is_constref());
    drop(field);
    assert!(id.descriptor().set_value(&mut owner, &Any::new(1u32)).is_err());

    let label = class.property("label").expect("label");
    let mut field = label.call(&mut owner).expect("field");
    let string = field.type_info().as_string().expect("string");
    assert!(string.set_value(&mut field, "renamed").expect("mutable"));
    drop(field);
    drop(owner);
    assert_eq!(value.label, "renamed");
    assert_eq!(value.id, 17);
}

#[test]
fn test_nested_class_access() {
    setup();
    let class = typeinfo::<Widget>().as_class().expect("class");
    let point = typeinfo::<Point>().as_class().expect("class");
    assert!(point.is_default_constructible());

    let mut value = widget();
    {
        let mut owner = Any::make_ref(&mut value);
        let mut origin = class.property("origin").expect("origin").call(&mut owner).expect("field");
        let y = point.var("y").expect("y");
        assert!(y.set_value(&mut origin, &Any::new(-4i16)).expect("write"));
    }
    assert_eq!(value.origin, Point { x: 1.0, y: -4.0 });
}

#[test]
fn test_enum_metadata() {
    setup();
    let info = typeinfo::<Kind>();
    assert_eq!(info.category(), Some(TypeCategory::Enum));
    assert_eq!(&*info.name(), "Shape");

    let kind = info.as_enum().expect("enum");
    assert_eq!(kind.value_of("Tri"), Some(5));
    assert_eq!(kind.name_of(3).as_deref(), Some("Circle"));

    let mut value = Kind::Circle;
    let mut any = Any::make_ref(&mut value);
    assert_eq!(kind.get_name(&any).as_deref(), Some("Circle"));
    assert!(kind.set_value(&mut any, 5).expect("mutable"));
    assert!(!kind.set_value(&mut any, 42).expect("mutable"));
    drop(any);
    assert_eq!(value, Kind::Triangle);
}

#[test]
fn test_opaque_type_has_no_copy() {
    setup();
    let handle = Any::new(Handle { fd: 3 });
    assert!(handle.copy().is_null());
    assert!(!handle.operations().is_copyable());
    assert_eq!(handle.try_cast_const::<Handle>().map(|h| h.fd), Some(3));
}

#[test]
fn test_default_construct_through_info() {
    setup();
    let point = typeinfo::<Point>().as_class().expect("class");
    let value = point.default_construct();
    assert_eq!(value.try_cast_const::<Point>(), Some(&Point::default()));
    assert!(!typeinfo::<Widget>().is_default_constructible());
}
