//! 注册表：实例、单例工厂、瞬态绑定三个存储，加一张别名表

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::ReentrantMutex;

use super::invokable::Invokable;
use crate::types::{TypeKey, Value};

/// 当前由哪个存储响应某个键
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifetime {
    /// 直接保存的实例，原样返回
    Instance,
    /// 首次解析后缓存为实例
    Singleton,
    /// 每次解析都调用工厂
    Transient,
}

/// 单例工厂及其物化闸门
pub(crate) struct SingletonEntry {
    pub(crate) factory: Arc<dyn Invokable>,
    /// 保证同一单例的工厂最多执行一次；可重入以便自引用的工厂撞上深度限制而不是死锁
    pub(crate) gate: ReentrantMutex<()>,
}

#[derive(Default)]
pub(crate) struct Registry {
    instances: DashMap<TypeKey, Value>,
    singletons: DashMap<TypeKey, Arc<SingletonEntry>>,
    bindings: DashMap<TypeKey, Arc<dyn Invokable>>,
    aliases: DashMap<TypeKey, TypeKey>,
}

impl Registry {
    /// 别名归一化；没有别名时原样返回
    pub(crate) fn resolve_key(&self, name: &TypeKey) -> TypeKey {
        self.aliases
            .get(name)
            .map(|canonical| canonical.value().clone())
            .unwrap_or_else(|| name.clone())
    }

    pub(crate) fn alias(&self, key: TypeKey, alias: TypeKey) {
        self.aliases.insert(alias, key);
    }

    pub(crate) fn insert_instance(&self, key: TypeKey, value: Value) {
        self.instances.insert(key, value);
    }

    pub(crate) fn insert_singleton(&self, key: TypeKey, factory: Arc<dyn Invokable>) {
        self.singletons.insert(
            key,
            Arc::new(SingletonEntry {
                factory,
                gate: ReentrantMutex::new(()),
            }),
        );
    }

    pub(crate) fn insert_binding(&self, key: TypeKey, factory: Arc<dyn Invokable>) {
        self.bindings.insert(key, factory);
    }

    // 以下查找都把值克隆出来后立即释放分片锁，工厂执行期间不持有任何 guard

    pub(crate) fn instance(&self, key: &TypeKey) -> Option<Value> {
        self.instances.get(key).map(|entry| entry.value().clone())
    }

    pub(crate) fn singleton(&self, key: &TypeKey) -> Option<Arc<SingletonEntry>> {
        self.singletons.get(key).map(|entry| Arc::clone(entry.value()))
    }

    pub(crate) fn binding(&self, key: &TypeKey) -> Option<Arc<dyn Invokable>> {
        self.bindings.get(key).map(|entry| Arc::clone(entry.value()))
    }

    /// 按 实例 > 单例 > 绑定 的优先级判断，键需已归一化
    pub(crate) fn lifetime(&self, key: &TypeKey) -> Option<Lifetime> {
        if self.instances.contains_key(key) {
            Some(Lifetime::Instance)
        } else if self.singletons.contains_key(key) {
            Some(Lifetime::Singleton)
        } else if self.bindings.contains_key(key) {
            Some(Lifetime::Transient)
        } else {
            None
        }
    }

    pub(crate) fn flush(&self) {
        self.instances.clear();
        self.singletons.clear();
        self.bindings.clear();
        self.aliases.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.instances.len() + self.singletons.len() + self.bindings.len()
    }
}
