//! 运行时依赖解析容器
//!
//! 三类注册：
//! - 实例：直接保存的值，原样返回
//! - 单例：工厂首次成功执行后结果缓存为实例，之后不再执行
//! - 绑定：每次解析都执行一次工厂
//!
//! 任意函数都可以通过 [`Container::call`] 调用，参数按
//! 外部同类型参数 → 外部可转换参数 → 注册表 → 自动构造 的顺序解析。

pub mod arguments;
pub mod component;
mod depth;
mod injector;
pub mod invokable;
mod pipeline;
pub mod registry;
mod stats;

use std::sync::Arc;

pub use arguments::ArgumentTypeMap;
pub use component::{Assembly, Construct, Directive, Field, FieldSet, Injectable};
pub use invokable::{Described, FnInvokable, IntoInvokable, Invokable, Parameter};
pub use registry::Lifetime;
pub use stats::ContainerStats;

use crate::config::ContainerConfig;
use crate::errors::{ContainerError, Result};
use crate::types::{Conversions, TypeKey, Value};
use registry::Registry;
use stats::InnerStats;

struct Inner {
    registry: Registry,
    conversions: Conversions,
    config: ContainerConfig,
    stats: InnerStats,
}

/// 依赖解析容器
///
/// 克隆得到的是同一个容器的句柄，可以在线程间共享。
#[derive(Clone)]
pub struct Container {
    inner: Arc<Inner>,
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("registrations", &self.inner.registry.len())
            .field("config", &self.inner.config)
            .finish()
    }
}

impl Container {
    /// 创建新的容器实例
    pub fn new() -> Self {
        Self::with_config(ContainerConfig::default())
    }

    pub fn with_config(config: ContainerConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                registry: Registry::default(),
                conversions: Conversions::new(),
                config,
                stats: InnerStats::default(),
            }),
        }
    }

    /// 两个句柄是否指向同一个容器
    pub fn ptr_eq(&self, other: &Container) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.inner.config
    }

    pub fn conversions(&self) -> &Conversions {
        &self.inner.conversions
    }

    /// 注册瞬态绑定，同时把返回类型登记为该键的别名
    pub fn bind<Args, F>(&self, key: impl Into<TypeKey>, factory: F) -> Result<()>
    where
        F: IntoInvokable<Args>,
    {
        let key = key.into();
        let factory = Self::instance_provider(&key, factory)?;
        let canonical = self.inner.registry.resolve_key(&key);
        let returns = factory.returns()[0].clone();
        self.inner.registry.insert_binding(canonical.clone(), factory);
        self.alias_return_type(canonical, returns);
        Ok(())
    }

    /// 注册单例工厂，同时把返回类型登记为该键的别名
    pub fn singleton<Args, F>(&self, key: impl Into<TypeKey>, factory: F) -> Result<()>
    where
        F: IntoInvokable<Args>,
    {
        let key = key.into();
        let factory = Self::instance_provider(&key, factory)?;
        let canonical = self.inner.registry.resolve_key(&key);
        let returns = factory.returns()[0].clone();
        self.inner.registry.insert_singleton(canonical.clone(), factory);
        self.alias_return_type(canonical, returns);
        Ok(())
    }

    /// 直接保存实例，不经过任何工厂
    pub fn instance(&self, key: impl Into<TypeKey>, value: impl crate::types::IntoValue) {
        let key = self.inner.registry.resolve_key(&key.into());
        tracing::trace!(key = %key, "Instance registered");
        self.inner.registry.insert_instance(key, value.into_value());
    }

    /// 登记 `alias -> key`，同名别名后写覆盖
    pub fn alias(&self, key: impl Into<TypeKey>, alias: impl Into<TypeKey>) {
        self.inner.registry.alias(key.into(), alias.into());
    }

    /// 别名归一化后的规范键
    pub fn resolve_key(&self, name: impl Into<TypeKey>) -> TypeKey {
        self.inner.registry.resolve_key(&name.into())
    }

    pub fn has_bound(&self, key: impl Into<TypeKey>) -> bool {
        self.lifetime_of(key).is_some()
    }

    /// 当前响应该键的存储
    pub fn lifetime_of(&self, key: impl Into<TypeKey>) -> Option<Lifetime> {
        let key = self.inner.registry.resolve_key(&key.into());
        self.inner.registry.lifetime(&key)
    }

    /// 登记 `From -> To` 的类型转换
    pub fn convert<From, To, F>(&self, convert: F)
    where
        From: Clone + Send + Sync + 'static,
        To: Send + Sync + 'static,
        F: Fn(From) -> To + Send + Sync + 'static,
    {
        self.inner.conversions.register(convert);
    }

    /// 按键取值；找不到时返回 `Ok(None)`
    pub fn get(&self, key: impl Into<TypeKey>, args: Vec<Value>) -> Result<Option<Value>> {
        let mut arguments = self.arguments(args);
        self.get_with_arguments(&key.into(), &mut arguments)
    }

    /// 按键取值并转换成 `T`
    pub fn get_as<T: Injectable>(&self, key: impl Into<TypeKey>, args: Vec<Value>) -> Result<Option<T>> {
        let key = key.into();
        let Some(value) = self.get(&key, args)? else {
            return Ok(None);
        };
        let target = T::type_key();
        self.inner
            .conversions
            .convert(&value, &target)
            .and_then(|converted| converted.get::<T>())
            .map(Some)
            .ok_or_else(|| ContainerError::ResolvedTypeMismatch {
                key: key.to_string(),
                expected: std::any::type_name::<T>().to_string(),
                actual: value.type_name().to_string(),
            })
    }

    /// 调用任意函数，参数由容器解析
    pub fn call<Args, F>(&self, func: F, args: Vec<Value>) -> Result<Vec<Value>>
    where
        F: IntoInvokable<Args>,
    {
        let invokable = func.into_invokable();
        let mut arguments = self.arguments(args);
        self.call_with_arguments(invokable.as_ref(), &mut arguments)
    }

    /// 经过完整解析管线得到一个 `T`
    pub fn make<T: Injectable>(&self, args: Vec<Value>) -> Result<T> {
        let mut arguments = self.arguments(args);
        let value = self.resolve_parameter(&Parameter::of::<T>(), &mut arguments)?;
        value.get::<T>().ok_or_else(|| ContainerError::ResolvedTypeMismatch {
            key: T::type_key().to_string(),
            expected: std::any::type_name::<T>().to_string(),
            actual: value.type_name().to_string(),
        })
    }

    /// 向已有对象注入带指令的字段
    pub fn inject_fields<T: Injectable>(&self, target: &mut T, args: Vec<Value>) -> Result<()> {
        let mut arguments = self.arguments(args);
        self.inject_with_arguments(target, &mut arguments)
    }

    /// 清空实例、单例、绑定和别名；转换规则保留
    pub fn flush(&self) {
        self.inner.registry.flush();
        tracing::debug!("Container flushed");
    }

    /// 获取容器统计信息
    pub fn stats(&self) -> ContainerStats {
        self.inner.stats.snapshot()
    }

    /// 为一次顶层调用构建参数池，容器本身作为隐式的最后一个参数
    pub fn arguments(&self, args: Vec<Value>) -> ArgumentTypeMap {
        ArgumentTypeMap::with_container(args, self)
    }

    fn instance_provider<Args, F>(key: &TypeKey, factory: F) -> Result<Arc<dyn Invokable>>
    where
        F: IntoInvokable<Args>,
    {
        let factory = factory.into_invokable();
        if factory.returns().len() != 1 {
            return Err(ContainerError::Registration {
                key: key.to_string(),
                returns: factory.returns().len(),
            });
        }
        Ok(factory)
    }

    fn alias_return_type(&self, canonical: TypeKey, returns: TypeKey) {
        tracing::trace!(key = %canonical, returns = %returns, "Factory registered");
        if canonical != returns {
            self.inner.registry.alias(canonical, returns);
        }
    }
}
