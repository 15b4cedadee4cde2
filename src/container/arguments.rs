//! 按类型分组的外部参数池
//!
//! 每次顶层调用或注入时构建一次，按类型键分桶；同一类型先传入的先被消费。
//! 容器本身放在单独的槽位里，可以被任意多个参数取用，不会被消费。

use std::collections::VecDeque;

use super::Container;
use crate::types::{Conversions, TypeKey, Value};

#[derive(Debug, Default)]
pub struct ArgumentTypeMap {
    buckets: Vec<(TypeKey, VecDeque<Value>)>,
    container: Option<Value>,
}

impl ArgumentTypeMap {
    pub fn new(arguments: Vec<Value>) -> Self {
        let mut map = Self::default();
        for argument in arguments {
            map.push(argument);
        }
        map
    }

    /// 构建参数池，并把容器本身作为隐式的最后一个参数
    pub fn with_container(arguments: Vec<Value>, container: &Container) -> Self {
        let mut map = Self::new(arguments);
        map.container = Some(Value::new(container.clone()));
        map
    }

    pub fn push(&mut self, value: Value) {
        match self.buckets.iter_mut().find(|(key, _)| key == value.key()) {
            Some((_, bucket)) => bucket.push_back(value),
            None => {
                let key = value.key().clone();
                self.buckets.push((key, VecDeque::from([value])));
            }
        }
    }

    /// 取出并移除该类型最早传入的参数；隐式的容器只复制不移除
    pub fn pull(&mut self, key: &TypeKey) -> Option<Value> {
        let supplied = self
            .buckets
            .iter_mut()
            .find(|(bucket_key, _)| bucket_key == key)
            .and_then(|(_, bucket)| bucket.pop_front());
        supplied.or_else(|| self.implicit_container(key))
    }

    fn implicit_container(&self, key: &TypeKey) -> Option<Value> {
        self.container
            .as_ref()
            .filter(|container| container.key() == key)
            .cloned()
    }

    /// 找到第一个可以转换成目标类型的参数
    ///
    /// 桶的类型与目标不同时返回转换后的值，否则原样返回；不会移除参数。
    pub fn find_convertible(&self, target: &TypeKey, conversions: &Conversions) -> Option<Value> {
        for (key, bucket) in &self.buckets {
            for argument in bucket {
                if !conversions.convertible(key, target) {
                    continue;
                }
                if key != target {
                    return conversions.convert(argument, target);
                }
                return Some(argument.clone());
            }
        }
        let container = self.container.as_ref()?;
        if container.key() == target {
            return Some(container.clone());
        }
        conversions.convert(container, target)
    }

    /// 剩余的外部参数数量，不含隐式的容器
    pub fn len(&self) -> usize {
        self.buckets.iter().map(|(_, bucket)| bucket.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
