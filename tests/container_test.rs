//! 容器的集成测试

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use autowire::container::{ArgumentTypeMap, IntoInvokable, Invokable};
use autowire::{
    args, Assembly, Construct, Container, ContainerError, FieldSet, Injectable, Lifetime, TypeKey,
    Value,
};
use futures_util::future;

#[derive(Clone, Debug, Default, PartialEq)]
struct DemoParam {
    id: String,
}

impl Injectable for DemoParam {
    fn assembly() -> Assembly<Self> {
        Assembly::fields(FieldSet::new().plain::<String>("id"))
    }
}

/// 字段带注入指令的聚合
#[derive(Clone, Debug, Default, PartialEq)]
struct DemoStruct {
    param: DemoParam,
    config: String,
}

impl Injectable for DemoStruct {
    fn assembly() -> Assembly<Self> {
        Assembly::fields(
            FieldSet::<Self>::new()
                .inject("param", |s| &mut s.param)
                .inject_key("config", "config", |s| &mut s.config),
        )
    }
}

/// 自装配类型：整体取自容器中的 "struct"
#[derive(Clone, Debug, Default)]
struct DemoStruct2 {
    inner: DemoStruct,
}

impl Construct for DemoStruct2 {
    fn construct(&mut self, container: &Container) -> autowire::Result<()> {
        self.inner = container
            .get_as::<DemoStruct>("struct", Vec::new())?
            .unwrap_or_default();
        Ok(())
    }
}

impl Injectable for DemoStruct2 {
    fn assembly() -> Assembly<Self> {
        Assembly::custom()
    }
}

#[derive(Clone, Debug, PartialEq)]
struct AliasParam(DemoParam);

impl Injectable for AliasParam {}

#[derive(Clone, Debug, Default, PartialEq)]
struct DemoDependent {
    id: String,
}

impl Injectable for DemoDependent {
    fn assembly() -> Assembly<Self> {
        Assembly::fields(FieldSet::new().plain::<String>("id"))
    }
}

#[derive(Clone, Debug, Default)]
struct DemoController {
    dep: DemoDependent,
}

impl Injectable for DemoController {
    fn assembly() -> Assembly<Self> {
        Assembly::fields(FieldSet::<Self>::new().inject("dep", |c| &mut c.dep))
    }
}

#[test]
fn test_argument_type_map() {
    let mut arguments = ArgumentTypeMap::new(args![String::from("啦啦啦"), DemoParam { id: "111".into() }]);
    let text = arguments.pull(&TypeKey::of::<String>()).unwrap();
    assert_eq!(text.get::<String>().as_deref(), Some("啦啦啦"));

    let mut empty = ArgumentTypeMap::new(args![]);
    assert!(empty.pull(&TypeKey::of::<String>()).is_none());
}

#[test]
fn test_base_container() {
    let container = Container::new();

    container.instance("a", String::from("a"));
    assert!(container.has_bound("a"));
    assert_eq!(container.get_as::<String>("a", args![]).unwrap().as_deref(), Some("a"));

    container.alias("a", "A");
    assert!(container.has_bound("A"));
    assert_eq!(container.get_as::<String>("A", args![]).unwrap().as_deref(), Some("a"));

    container
        .bind("DemoParam", || DemoParam { id: "测试一下".into() })
        .unwrap();
    let param = container
        .get_as::<DemoParam>(TypeKey::of::<DemoParam>(), args![])
        .unwrap()
        .unwrap();
    assert_eq!(param.id, "测试一下");

    let results = container.call(|param: DemoParam| param.id, args![]).unwrap();
    assert_eq!(results[0].get::<String>().as_deref(), Some("测试一下"));
}

#[test]
fn test_supplied_argument_before_registry() {
    let container = Container::new();
    container
        .bind("DemoParam", || DemoParam { id: "没有外部参数的话，从容器中获取".into() })
        .unwrap();
    let id = |param: DemoParam| param.id;

    let results = container
        .call(id, args![DemoParam { id: "优先使用外部参数".into() }])
        .unwrap();
    assert_eq!(results[0].get::<String>().as_deref(), Some("优先使用外部参数"));

    let results = container.call(id, args![]).unwrap();
    assert_eq!(
        results[0].get::<String>().as_deref(),
        Some("没有外部参数的话，从容器中获取")
    );
}

#[test]
fn test_call_round_trip() {
    let container = Container::new();
    let results = container
        .call(
            |a: DemoParam, b: u32| format!("{}-{}", a.id, b),
            args![DemoParam { id: "a".into() }, 7_u32],
        )
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].get::<String>().as_deref(), Some("a-7"));

    let results = container.call(|_: DemoParam| {}, args![]).unwrap();
    assert!(results.is_empty());
}

#[test]
fn test_inject_fields_with_directives() {
    let container = Container::new();
    container.instance("config", String::from("通过容器设置的配置"));
    container
        .bind("DemoParam", || DemoParam { id: "没有外部参数的话，从容器中获取".into() })
        .unwrap();

    let mut demo = DemoStruct::default();
    container.inject_fields(&mut demo, args![]).unwrap();

    assert_eq!(demo.config, "通过容器设置的配置");
    assert_eq!(demo.param.id, "没有外部参数的话，从容器中获取");
}

#[test]
fn test_alias_type_conversion() {
    let container = Container::new();
    container.singleton("param", || DemoParam { id: "a".into() }).unwrap();
    container.convert::<DemoParam, AliasParam, _>(AliasParam);

    let param = container.get("param", args![]).unwrap().unwrap();
    let results = container.call(|param: AliasParam| param.0.id, args![param]).unwrap();
    assert_eq!(results[0].get::<String>().as_deref(), Some("a"));
}

#[test]
fn test_self_assembling_type() {
    let container = Container::new();
    container
        .singleton("struct", || DemoStruct {
            param: DemoParam { id: "id".into() },
            config: "config".into(),
        })
        .unwrap();

    let mut struct2 = DemoStruct2::default();
    container.inject_fields(&mut struct2, args![]).unwrap();
    assert_eq!(struct2.inner.config, "config");

    let results = container
        .call(
            |struct2: DemoStruct2| struct2.inner.param.id,
            args![],
        )
        .unwrap();
    assert_eq!(results[0].get::<String>().as_deref(), Some("id"));

    // 自装配类型不会消费外部参数，外部参数留给 DemoStruct
    let results = container
        .call(
            |struct2: DemoStruct2, struct1: DemoStruct| (struct2.inner, struct1),
            args![DemoStruct {
                param: DemoParam { id: "custom".into() },
                config: "config22".into(),
            }],
        )
        .unwrap();
    let (struct2, struct1) = results[0].get::<(DemoStruct, DemoStruct)>().unwrap();
    assert_eq!(struct2.config, "config");
    assert_eq!(struct2.param.id, "id");
    assert_eq!(struct1.config, "config22");
    assert_eq!(struct1.param.id, "custom");
}

#[test]
fn test_controller_injection() {
    let container = Container::new();
    container
        .singleton("DemoDependent", || DemoDependent { id: "id ddd".into() })
        .unwrap();

    let mut controller = DemoController::default();
    container.inject_fields(&mut controller, args![]).unwrap();

    let dep = controller.dep.clone();
    let results = container.call(move || dep.id.clone(), args![]).unwrap();
    assert_eq!(results[0].get::<String>().as_deref(), Some("id ddd"));
}

#[test]
fn test_missing_dependency_is_zero_valued() {
    let container = Container::new();
    let mut controller = DemoController {
        dep: DemoDependent { id: "stale".into() },
    };
    container.inject_fields(&mut controller, args![]).unwrap();
    assert_eq!(controller.dep, DemoDependent::default());
}

#[test]
fn test_container_as_parameter() {
    let container = Container::new();
    container.instance("name", String::from("app"));

    let results = container
        .call(|inner: Container| inner.has_bound("name"), args![])
        .unwrap();
    assert_eq!(results[0].get::<bool>(), Some(true));
}

#[test]
fn test_container_requested_twice_in_one_call() {
    let container = Container::new();
    let results = container
        .call(|first: Container, second: Container| first.ptr_eq(&second), args![])
        .unwrap();
    assert_eq!(results[0].get::<bool>(), Some(true));
}

#[test]
fn test_container_shared_with_bound_factory() {
    let container = Container::new();
    container
        .bind("DemoDependent", |inner: Container| DemoDependent {
            id: format!("bound:{}", inner.has_bound("DemoDependent")),
        })
        .unwrap();

    let results = container
        .call(
            |outer: Container, dependent: DemoDependent| (outer.has_bound("DemoDependent"), dependent.id),
            args![],
        )
        .unwrap();
    assert_eq!(
        results[0].get::<(bool, String)>(),
        Some((true, "bound:true".to_string()))
    );

    // 字段注入触发的工厂同样能拿到容器
    let mut controller = DemoController::default();
    container.inject_fields(&mut controller, args![]).unwrap();
    assert_eq!(controller.dep.id, "bound:true");
}

#[test]
fn test_opaque_parameter_without_value() {
    let container = Container::new();
    let err = container.call(|name: String| name, args![]).unwrap_err();
    assert!(matches!(err, ContainerError::NotInjectable { .. }));
}

#[test]
fn test_prebuilt_descriptor() {
    let container = Container::new();
    container
        .singleton("DemoDependent", || DemoDependent { id: "id ddd".into() })
        .unwrap();

    let descriptor: Arc<dyn Invokable> = (|dependent: DemoDependent| dependent.id).into_invokable();
    assert_eq!(descriptor.parameters().len(), 1);
    assert_eq!(descriptor.returns(), [TypeKey::of::<String>()]);

    for _ in 0..3 {
        let results = container.call(Arc::clone(&descriptor), args![]).unwrap();
        assert_eq!(results[0].get::<String>().as_deref(), Some("id ddd"));
    }
}

#[test]
fn test_instance_survives_unrelated_registrations() {
    let container = Container::new();
    container.instance("k", Value::new(DemoParam { id: "pinned".into() }));
    let first = container.get("k", args![]).unwrap().unwrap();

    container.bind("other", || 1_u8).unwrap();
    container.singleton("another", || 2_u8).unwrap();
    container.alias("other", "o");

    let again = container.get("k", args![]).unwrap().unwrap();
    assert!(first.ptr_eq(&again));
    assert_eq!(container.lifetime_of("k"), Some(Lifetime::Instance));
    assert_eq!(container.lifetime_of("another"), Some(Lifetime::Singleton));
    assert_eq!(container.lifetime_of("o"), Some(Lifetime::Transient));
}

#[test]
fn test_flush_clears_registrations() {
    let container = Container::new();
    container.instance("a", String::from("a"));
    container.bind("b", || 1_u8).unwrap();
    container.singleton("c", || 2_u8).unwrap();
    container.alias("a", "A");

    container.flush();

    for key in ["a", "A", "b", "c"] {
        assert!(!container.has_bound(key));
        assert!(container.get(key, args![]).unwrap().is_none());
    }
}

#[tokio::test]
async fn test_concurrent_singleton_materializes_once() {
    let container = Container::new();
    let creation_count = Arc::new(AtomicUsize::new(0));
    let count_clone = Arc::clone(&creation_count);
    container
        .singleton("S", move || {
            count_clone.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(std::time::Duration::from_millis(5));
            DemoDependent { id: "x".into() }
        })
        .unwrap();

    let mut handles = vec![];
    for _ in 0..50 {
        let container_clone = container.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            container_clone.get("S", args![]).unwrap().unwrap()
        }));
    }

    let values: Vec<Value> = future::join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    assert_eq!(creation_count.load(Ordering::SeqCst), 1);
    assert!(values.iter().all(|value| value.ptr_eq(&values[0])));
    assert_eq!(container.stats().singleton_materializations, 1);
}
