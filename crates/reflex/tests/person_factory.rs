// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::float_cmp)] // Test assertions with constants

//! Factory-described class used through descriptors only.

use reflex::{
    factory, invoke_by_any, invoke_by_any_ref, typeinfo, Any, ReflError, Reflect, Registry,
    TypeOperations, TypeShape,
};

#[derive(Debug, Clone, PartialEq)]
struct Person {
    name: String,
    height: f32,
    children: Vec<Person>,
}

impl Reflect for Person {
    fn shape() -> TypeShape {
        TypeShape::class("Person")
    }

    fn operations() -> TypeOperations {
        TypeOperations::builder::<Self>().cloneable().build()
    }
}

impl Person {
    fn new(name: String, height: f32) -> Self {
        Self {
            name,
            height,
            children: Vec::new(),
        }
    }

    fn get_name(&self) -> &String {
        &self.name
    }

    fn access_child(&mut self, idx: usize) -> &mut Person {
        &mut self.children[idx]
    }
}

static SPECIES: &str = "human";

fn setup() {
    let _ = env_logger::builder().is_test(true).try_init();
    Registry::init(|_| {
        factory::<Person>("Person")
            .ctor(Person::new)
            .func_ref("GetName", Person::get_name)
            .func("GetHeight", |p: &Person| p.height)
            .func_mut_ref("AccessChild", Person::access_child)
            .func("ChildSize", |p: &Person| p.children.len())
            .static_func("Adult", |height: f32| height > 150.0)
            .var("name", |p: &Person| &p.name, |p: &mut Person| &mut p.name)
            .var("height", |p: &Person| &p.height, |p: &mut Person| &mut p.height)
            .var(
                "children",
                |p: &Person| &p.children,
                |p: &mut Person| &mut p.children,
            )
            .static_var("species", &SPECIES);
    });
}

fn visual_gmq() -> Person {
    Person::new("VisualGMQ".into(), 123.0)
}

#[test]
fn test_type_is_described() {
    setup();
    let info = typeinfo::<Person>();
    assert!(info.is_class());
    assert_eq!(&*info.name(), "Person");
    assert!(Registry::global().find_by_name("Person").is_some());

    let class = info.as_class().expect("class");
    let funcs: Vec<_> = class.funcs().iter().map(|f| f.name()).collect();
    assert_eq!(funcs, ["GetName", "GetHeight", "AccessChild", "ChildSize", "Adult"]);
    let vars: Vec<_> = class.vars().iter().map(|v| v.name()).collect();
    assert_eq!(vars, ["name", "height", "children", "species"]);
}

#[test]
fn test_constructor() {
    setup();
    let class = typeinfo::<Person>().as_class().expect("class");
    let ctors = class.ctors();
    let ctor = &ctors[0];
    assert_eq!(ctor.arity(), 2);
    assert_eq!(ctor.params(), [typeinfo::<String>(), typeinfo::<f32>()]);

    let person = ctor
        .invoke(&mut [Any::new(String::from("XiaoMing")), Any::new(12.0f32)])
        .expect("construct");
    assert!(person.is_copy());
    assert_eq!(person.try_cast_const::<Person>(), Some(&Person::new("XiaoMing".into(), 12.0)));
}

#[test]
fn test_member_functions() {
    setup();
    let class = typeinfo::<Person>().as_class().expect("class");
    let mut person = visual_gmq();

    let get_name = class.func("GetName").expect("GetName");
    assert!(get_name.is_const());
    assert!(get_name.is_member());
    assert!(get_name.returns_ref());
    {
        let mut args = [Any::make_constref(&person)];
        let name = invoke_by_any_ref(&get_name, &mut args).expect("call");
        assert!(name.is_constref());
        assert_eq!(name.try_cast_const::<String>().map(String::as_str), Some("VisualGMQ"));
    }

    let get_height = class.func("GetHeight").expect("GetHeight");
    assert_eq!(get_height.return_type(), typeinfo::<f32>());
    let height: f32 = get_height.call(&mut [Any::make_constref(&person)]).expect("call");
    assert_eq!(height, 123.0);
    let err = get_height
        .invoke_by_ref(&mut [Any::make_constref(&person)])
        .expect_err("by value");
    assert!(matches!(err, ReflError::NotAReference(_)));

    person.children.push(Person::new("XiaoMing".into(), 12.0));
    let child_size = class.func("ChildSize").expect("ChildSize");
    let size: usize = child_size.call(&mut [Any::make_constref(&person)]).expect("call");
    assert_eq!(size, 1);

    let access_child = class.func("AccessChild").expect("AccessChild");
    assert!(!access_child.is_const());
    {
        let mut args = [Any::make_ref(&mut person), Any::new(0usize)];
        let mut child = access_child.invoke_by_ref(&mut args).expect("call");
        assert!(child.is_ref());
        child.try_cast::<Person>().expect("mutable").expect("person").height = 13.0;
    }
    assert_eq!(person.children[0].height, 13.0);

    let copied = invoke_by_any(&access_child, &mut [Any::make_ref(&mut person), Any::new(0usize)])
        .expect("call");
    assert!(copied.is_copy());
    assert_eq!(copied.try_cast_const::<Person>().map(|p| p.name.as_str()), Some("XiaoMing"));
}

#[test]
fn test_static_members() {
    setup();
    let class = typeinfo::<Person>().as_class().expect("class");
    let adult = class.func("Adult").expect("Adult");
    assert!(adult.is_static());
    assert!(!adult.is_member());
    let verdict: bool = adult.call(&mut [Any::new(180.0f32)]).expect("call");
    assert!(verdict);

    let species = class.var("species").expect("species");
    assert!(species.is_static());
    assert!(species.is_readonly());
    let value = species.invoke_static().expect("static");
    assert_eq!(value.try_cast_const::<&'static str>(), Some(&"human"));
}

#[test]
fn test_member_variables() {
    setup();
    let class = typeinfo::<Person>().as_class().expect("class");
    let mut person = visual_gmq();

    {
        let owner = Any::make_constref(&person);
        let name = class.var("name").expect("name");
        let field = name.invoke_const(&owner).expect("field");
        assert!(field.is_constref());
        assert_eq!(field.try_cast_const::<String>().map(String::as_str), Some("VisualGMQ"));

        let children = class.var("children").expect("children");
        let list = children.get_value(&owner).expect("copy");
        assert_eq!(list.try_cast_const::<Vec<Person>>().map(Vec::len), Some(0));
    }

    let height = class.var("height").expect("height");
    let mut owner = Any::make_ref(&mut person);
    assert!(height.set_value(&mut owner, &Any::new(234i32)).expect("numeric write"));
    drop(owner);
    assert_eq!(person.height, 234.0);
}

#[test]
fn test_const_owner_refuses_writes() {
    setup();
    let class = typeinfo::<Person>().as_class().expect("class");
    let person = visual_gmq();
    let mut owner = Any::make_constref(&person);

    let height = class.var("height").expect("height");
    let mut field = height.invoke(&mut owner).expect("field");
    assert!(field.is_constref());
    assert!(field.try_cast::<f32>().is_err());
    drop(field);

    let err = height
        .set_value(&mut owner, &Any::new(1.0f32))
        .expect_err("const owner");
    assert!(matches!(err, ReflError::BadAccess(_)));

    let access_child = class.func("AccessChild").expect("AccessChild");
    let err = access_child
        .invoke(&mut [owner.constref(), Any::new(0usize)])
        .expect_err("const receiver");
    assert!(matches!(err, ReflError::BadAccess(_)));
}
