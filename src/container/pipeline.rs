//! 参数解析管线
//!
//! 每个参数依次尝试：
//! 1. 外部参数中类型完全相同的（取出即消费）
//! 2. 外部参数中可转换的
//! 3. 容器中按类型键注册的，嵌套调用共享同一个参数池
//! 4. 零值构造后递归注入字段
//!
//! 第 4 步总会给出结果或错误，因此管线不会返回空。

use std::sync::Arc;

use super::arguments::ArgumentTypeMap;
use super::depth::DepthGuard;
use super::invokable::{Invokable, Parameter};
use super::registry::SingletonEntry;
use super::stats::InnerStats;
use super::Container;
use crate::errors::{ContainerError, Result};
use crate::types::{TypeKey, Value};

/// 命中的解析策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    Supplied,
    Convertible,
    Registry,
    AutoConstruct,
}

impl Container {
    /// 使用现成的参数池按键取值
    pub fn get_with_arguments(
        &self,
        key: &TypeKey,
        arguments: &mut ArgumentTypeMap,
    ) -> Result<Option<Value>> {
        let registry = &self.inner.registry;
        let key = registry.resolve_key(key);

        if let Some(instance) = registry.instance(&key) {
            return Ok(Some(instance));
        }
        if let Some(entry) = registry.singleton(&key) {
            return self.materialize(&key, &entry, arguments).map(Some);
        }
        if let Some(factory) = registry.binding(&key) {
            InnerStats::bump(&self.inner.stats.binding_invocations);
            return self.invoke_factory(&key, factory.as_ref(), arguments).map(Some);
        }
        Ok(None)
    }

    /// 使用现成的参数池调用描述符
    pub fn call_with_arguments(
        &self,
        invokable: &dyn Invokable,
        arguments: &mut ArgumentTypeMap,
    ) -> Result<Vec<Value>> {
        let mut values = Vec::with_capacity(invokable.parameters().len());
        for parameter in invokable.parameters() {
            values.push(self.resolve_parameter(parameter, arguments)?);
        }
        invokable.invoke(values)
    }

    /// 按固定顺序解析单个参数
    pub(crate) fn resolve_parameter(
        &self,
        parameter: &Parameter,
        arguments: &mut ArgumentTypeMap,
    ) -> Result<Value> {
        let stats = &self.inner.stats;
        InnerStats::bump(&stats.resolutions);

        let key = parameter.key();
        let (value, strategy) = if let Some(value) = arguments.pull(key) {
            (value, Strategy::Supplied)
        } else if let Some(value) = arguments.find_convertible(key, &self.inner.conversions) {
            (value, Strategy::Convertible)
        } else if let Some(value) = self.get_with_arguments(key, arguments)? {
            (value, Strategy::Registry)
        } else {
            (parameter.construct(self, arguments)?, Strategy::AutoConstruct)
        };

        match strategy {
            Strategy::Supplied | Strategy::Convertible => InnerStats::bump(&stats.supplied_hits),
            Strategy::Registry => InnerStats::bump(&stats.registry_hits),
            Strategy::AutoConstruct => InnerStats::bump(&stats.auto_constructions),
        }
        if self.inner.config.trace_resolution {
            tracing::debug!(parameter = parameter.type_name(), ?strategy, "Parameter resolved");
        }

        Ok(value)
    }

    /// 单例物化：闸门内再查一次实例，保证工厂最多执行一次
    fn materialize(
        &self,
        key: &TypeKey,
        entry: &Arc<SingletonEntry>,
        arguments: &mut ArgumentTypeMap,
    ) -> Result<Value> {
        let _gate = entry.gate.lock();
        if let Some(instance) = self.inner.registry.instance(key) {
            return Ok(instance);
        }

        let value = self.invoke_factory(key, entry.factory.as_ref(), arguments)?;
        // 自引用的工厂可能在重入时已经物化，先物化的结果保留
        if let Some(instance) = self.inner.registry.instance(key) {
            return Ok(instance);
        }
        self.inner.registry.insert_instance(key.clone(), value.clone());
        InnerStats::bump(&self.inner.stats.singleton_materializations);
        tracing::debug!(key = %key, "Singleton materialized");
        Ok(value)
    }

    fn invoke_factory(
        &self,
        key: &TypeKey,
        factory: &dyn Invokable,
        arguments: &mut ArgumentTypeMap,
    ) -> Result<Value> {
        let _depth = DepthGuard::enter(self.inner.config.max_depth, key.as_str())?;
        self.call_with_arguments(factory, arguments)?
            .into_iter()
            .next()
            .ok_or_else(|| ContainerError::Registration {
                key: key.to_string(),
                returns: 0,
            })
    }
}
