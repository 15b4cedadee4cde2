//! 容器调用的性能基准测试

use std::sync::Arc;

use autowire::container::{IntoInvokable, Invokable};
use autowire::{args, Assembly, Container, FieldSet, Injectable};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

#[derive(Clone, Default)]
struct DemoDependent {
    id: String,
}

impl Injectable for DemoDependent {
    fn assembly() -> Assembly<Self> {
        Assembly::fields(FieldSet::new().plain::<String>("id"))
    }
}

#[derive(Clone, Default)]
struct Controller {
    dep: DemoDependent,
}

impl Injectable for Controller {
    fn assembly() -> Assembly<Self> {
        Assembly::fields(FieldSet::<Self>::new().inject("dep", |c| &mut c.dep))
    }
}

fn singleton_container() -> Container {
    let container = Container::new();
    container
        .singleton("DemoDependent", || DemoDependent { id: "id ddd".into() })
        .unwrap();
    container
}

/// 基准测试：每次调用都重新包装闭包
fn bench_call(c: &mut Criterion) {
    let container = singleton_container();
    c.bench_function("call", |b| {
        b.iter(|| {
            let results = container.call(|dependent: DemoDependent| dependent.id.len(), args![]);
            black_box(results.unwrap());
        })
    });
}

/// 基准测试：复用预先构建的描述符
fn bench_static_call(c: &mut Criterion) {
    let container = singleton_container();
    let descriptor: Arc<dyn Invokable> = (|dependent: DemoDependent| dependent.id.len()).into_invokable();
    c.bench_function("static_call", |b| {
        b.iter(|| black_box(container.call(Arc::clone(&descriptor), args![]).unwrap()))
    });
}

/// 基准测试：不同数量外部参数下的解析
fn bench_supplied_arguments(c: &mut Criterion) {
    let container = Container::new();
    let mut group = c.benchmark_group("supplied_arguments");

    for count in [2_usize, 8, 32].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            b.iter(|| {
                let supplied: Vec<_> = (0..count as u64).map(autowire::Value::new).collect();
                black_box(container.call(|x: u64, y: u64| x + y, supplied).unwrap())
            })
        });
    }
    group.finish();
}

/// 基准测试：字段注入与自动构造
fn bench_inject_fields(c: &mut Criterion) {
    let registered = singleton_container();
    let empty = Container::new();

    c.bench_function("inject_fields_registered", |b| {
        b.iter(|| {
            let mut controller = Controller::default();
            registered.inject_fields(&mut controller, args![]).unwrap();
            black_box(controller)
        })
    });
    c.bench_function("make_auto_constructed", |b| {
        b.iter(|| black_box(empty.make::<Controller>(args![]).unwrap()))
    });
}

criterion_group!(
    benches,
    bench_call,
    bench_static_call,
    bench_supplied_arguments,
    bench_inject_fields
);
criterion_main!(benches);
