//! 类型可转换关系
//!
//! 同一类型总是可以互相赋值；其余的 `From -> To` 转换边需要显式登记，
//! 例如新类型别名或者把具体实现包装成接口句柄。

use std::sync::Arc;

use dashmap::DashMap;

use super::{TypeKey, Value};

type Converter = Arc<dyn Fn(&Value) -> Option<Value> + Send + Sync>;

/// 已登记的转换规则表
#[derive(Default)]
pub struct Conversions {
    rules: DashMap<(TypeKey, TypeKey), Converter>,
}

impl Conversions {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记 `From -> To` 的转换
    pub fn register<From, To, F>(&self, convert: F)
    where
        From: Clone + Send + Sync + 'static,
        To: Send + Sync + 'static,
        F: Fn(From) -> To + Send + Sync + 'static,
    {
        let converter: Converter =
            Arc::new(move |value: &Value| value.get::<From>().map(|v| Value::new(convert(v))));
        self.rules
            .insert((TypeKey::of::<From>(), TypeKey::of::<To>()), converter);
        tracing::trace!(
            from = std::any::type_name::<From>(),
            to = std::any::type_name::<To>(),
            "Conversion registered"
        );
    }

    pub fn convertible(&self, from: &TypeKey, to: &TypeKey) -> bool {
        from == to || self.rules.contains_key(&(from.clone(), to.clone()))
    }

    /// 把值转换成目标类型；同类型原样返回
    pub fn convert(&self, value: &Value, to: &TypeKey) -> Option<Value> {
        if value.key() == to {
            return Some(value.clone());
        }
        let converter = self
            .rules
            .get(&(value.key().clone(), to.clone()))
            .map(|rule| Arc::clone(rule.value()))?;
        converter(value)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
