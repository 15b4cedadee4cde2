//! 可调用描述符
//!
//! 把任意函数或闭包包装成统一的 [`Invokable`]：有序的参数类型、返回类型，
//! 以及按位置传参的调用入口。

use std::any::TypeId;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use super::arguments::ArgumentTypeMap;
use super::component::Injectable;
use super::Container;
use crate::errors::{ContainerError, Result};
use crate::types::{TypeKey, Value};

/// 参数的自动构造入口
pub type ConstructFn = fn(&Container, &mut ArgumentTypeMap) -> Result<Value>;

/// 单个待解析参数
#[derive(Clone)]
pub struct Parameter {
    key: TypeKey,
    type_name: &'static str,
    construct: ConstructFn,
}

fn construct_value<T: Injectable>(
    container: &Container,
    arguments: &mut ArgumentTypeMap,
) -> Result<Value> {
    container.auto_construct::<T>(arguments).map(Value::new)
}

impl Parameter {
    pub fn of<T: Injectable>() -> Self {
        Self {
            key: T::type_key(),
            type_name: std::any::type_name::<T>(),
            construct: construct_value::<T>,
        }
    }

    pub fn key(&self) -> &TypeKey {
        &self.key
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub(crate) fn construct(&self, container: &Container, arguments: &mut ArgumentTypeMap) -> Result<Value> {
        (self.construct)(container, arguments)
    }
}

impl fmt::Debug for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Parameter").field(&self.type_name).finish()
    }
}

/// 统一的可调用接口
pub trait Invokable: Send + Sync {
    /// 有序的参数描述
    fn parameters(&self) -> &[Parameter];

    /// 返回值类型
    fn returns(&self) -> &[TypeKey];

    /// 按位置传参执行
    fn invoke(&self, arguments: Vec<Value>) -> Result<Vec<Value>>;
}

/// 可以转换为 [`Invokable`] 的值
///
/// `Args` 只用于区分不同参数个数的实现。
pub trait IntoInvokable<Args> {
    fn into_invokable(self) -> Arc<dyn Invokable>;
}

/// 已经包装好的描述符原样透传
pub struct Described;

impl IntoInvokable<Described> for Arc<dyn Invokable> {
    fn into_invokable(self) -> Arc<dyn Invokable> {
        self
    }
}

/// 包装普通函数/闭包的描述符
pub struct FnInvokable<F, Args, Ret> {
    func: F,
    parameters: Vec<Parameter>,
    returns: Vec<TypeKey>,
    _marker: PhantomData<fn(Args) -> Ret>,
}

impl<F, Args, Ret: 'static> FnInvokable<F, Args, Ret> {
    fn new(func: F, parameters: Vec<Parameter>) -> Self {
        Self {
            func,
            parameters,
            returns: return_keys::<Ret>(),
            _marker: PhantomData,
        }
    }
}

/// `()` 没有返回值，其余类型恰好一个
fn return_keys<Ret: 'static>() -> Vec<TypeKey> {
    if TypeId::of::<Ret>() == TypeId::of::<()>() {
        Vec::new()
    } else {
        vec![TypeKey::of::<Ret>()]
    }
}

fn into_results<Ret: Send + Sync + 'static>(ret: Ret) -> Vec<Value> {
    if TypeId::of::<Ret>() == TypeId::of::<()>() {
        Vec::new()
    } else {
        vec![Value::new(ret)]
    }
}

fn take_argument<A: Injectable>(index: usize, value: Option<Value>) -> Result<A> {
    let value = value.ok_or_else(|| ContainerError::ArgumentMismatch {
        index,
        expected: std::any::type_name::<A>().to_string(),
        actual: "nothing".to_string(),
    })?;
    value.get::<A>().ok_or_else(|| ContainerError::ArgumentMismatch {
        index,
        expected: std::any::type_name::<A>().to_string(),
        actual: value.type_name().to_string(),
    })
}

macro_rules! impl_invokable {
    ($($arg:ident: $ty:ident),*) => {
        impl<Func, Ret, $($ty,)*> IntoInvokable<($($ty,)*)> for Func
        where
            Func: Fn($($ty),*) -> Ret + Send + Sync + 'static,
            Ret: Send + Sync + 'static,
            $($ty: Injectable,)*
        {
            fn into_invokable(self) -> Arc<dyn Invokable> {
                Arc::new(FnInvokable::<Func, ($($ty,)*), Ret>::new(
                    self,
                    vec![$(Parameter::of::<$ty>()),*],
                ))
            }
        }

        impl<Func, Ret, $($ty,)*> Invokable for FnInvokable<Func, ($($ty,)*), Ret>
        where
            Func: Fn($($ty),*) -> Ret + Send + Sync + 'static,
            Ret: Send + Sync + 'static,
            $($ty: Injectable,)*
        {
            fn parameters(&self) -> &[Parameter] {
                &self.parameters
            }

            fn returns(&self) -> &[TypeKey] {
                &self.returns
            }

            #[allow(unused_mut, unused_variables, unused_assignments)]
            fn invoke(&self, arguments: Vec<Value>) -> Result<Vec<Value>> {
                if arguments.len() != self.parameters.len() {
                    return Err(ContainerError::ArityMismatch {
                        expected: self.parameters.len(),
                        actual: arguments.len(),
                    });
                }
                let mut arguments = arguments.into_iter();
                let mut index = 0;
                $(
                    let $arg = take_argument::<$ty>(index, arguments.next())?;
                    index += 1;
                )*
                Ok(into_results((self.func)($($arg),*)))
            }
        }
    };
}

impl_invokable!();
impl_invokable!(a1: A1);
impl_invokable!(a1: A1, a2: A2);
impl_invokable!(a1: A1, a2: A2, a3: A3);
impl_invokable!(a1: A1, a2: A2, a3: A3, a4: A4);
impl_invokable!(a1: A1, a2: A2, a3: A3, a4: A4, a5: A5);
impl_invokable!(a1: A1, a2: A2, a3: A3, a4: A4, a5: A5, a6: A6);
impl_invokable!(a1: A1, a2: A2, a3: A3, a4: A4, a5: A5, a6: A6, a7: A7);
impl_invokable!(a1: A1, a2: A2, a3: A3, a4: A4, a5: A5, a6: A6, a7: A7, a8: A8);
