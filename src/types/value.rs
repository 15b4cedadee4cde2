//! 类型擦除的值
//!
//! 容器里流转的所有实例、工厂结果和外部参数都以 [`Value`] 表示。

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use super::TypeKey;
use crate::container::Injectable;

/// 共享的类型擦除值，记住自身的运行时类型键
#[derive(Clone)]
pub struct Value {
    key: TypeKey,
    type_name: &'static str,
    inner: Arc<dyn Any + Send + Sync>,
}

impl Value {
    pub fn new<T: Send + Sync + 'static>(value: T) -> Self {
        Self {
            key: TypeKey::of::<T>(),
            type_name: std::any::type_name::<T>(),
            inner: Arc::new(value),
        }
    }

    /// 值的运行时类型键
    pub fn key(&self) -> &TypeKey {
        &self.key
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is<T: 'static>(&self) -> bool {
        self.inner.is::<T>()
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// 取出一份 `T` 的拷贝；类型不符时返回 `None`
    pub fn get<T: Clone + 'static>(&self) -> Option<T> {
        self.downcast_ref::<T>().cloned()
    }

    /// 两个句柄是否指向同一份存储
    pub fn ptr_eq(&self, other: &Value) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Value").field("type", &self.type_name).finish()
    }
}

/// 可以作为位置参数交给容器的值
pub trait IntoValue {
    fn into_value(self) -> Value;
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl<T: Injectable> IntoValue for T {
    fn into_value(self) -> Value {
        Value::new(self)
    }
}

/// 构造位置参数列表
///
/// ```ignore
/// container.call(|p: Param| p.id, args![Param { id: "given".into() }])?;
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Value>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::types::IntoValue::into_value($arg)),+]
    };
}
