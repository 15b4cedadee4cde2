//! 结构元数据与自装配
//!
//! 能被容器解析、注入或自动构造的类型都实现 [`Injectable`]。
//! 默认是不透明值：只能作为实例或参数传递，不能被自动构造；
//! 聚合类型通过 [`Assembly::fields`] 声明字段，或者通过 [`Construct`] 接管自己的装配。

use std::fmt;
use std::sync::Arc;

use super::arguments::ArgumentTypeMap;
use super::invokable::Parameter;
use super::Container;
use crate::errors::Result;
use crate::types::{TypeKey, Value};

/// 类型的装配方式
pub enum Assembly<T> {
    /// 不是聚合类型
    Opaque,
    /// 零值构造后逐字段注入
    Fields { zero: fn() -> T, fields: FieldSet<T> },
    /// 自装配：零值构造后交给类型自己的逻辑
    Custom {
        zero: fn() -> T,
        construct: fn(&mut T, &Container) -> Result<()>,
    },
    /// 一层所有权间接（`Arc<T>`），构造内部值后再包装
    Indirect(fn(&Container, &mut ArgumentTypeMap) -> Result<T>),
}

impl<T: Default> Assembly<T> {
    pub fn fields(fields: FieldSet<T>) -> Self {
        Assembly::Fields {
            zero: T::default,
            fields,
        }
    }
}

impl<T: Default + Construct> Assembly<T> {
    pub fn custom() -> Self {
        Assembly::Custom {
            zero: T::default,
            construct: T::construct,
        }
    }
}

/// 可被容器处理的类型
pub trait Injectable: Clone + Send + Sync + 'static {
    fn type_key() -> TypeKey {
        TypeKey::of::<Self>()
    }

    fn assembly() -> Assembly<Self> {
        Assembly::Opaque
    }
}

/// 自装配能力：实现者完全接管字段注入
pub trait Construct {
    fn construct(&mut self, container: &Container) -> Result<()>;
}

/// 字段上的注入指令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// 按声明类型解析
    Inject,
    /// 先按给定键从注册表取值，取不到再按声明类型解析
    Key(TypeKey),
}

type Assign<T> = Box<dyn Fn(&mut T, &Value) -> bool + Send + Sync>;

pub(crate) struct Injection<T> {
    pub(crate) directive: Directive,
    pub(crate) parameter: Parameter,
    pub(crate) assign: Assign<T>,
}

/// 单个字段的元数据
pub struct Field<T> {
    name: &'static str,
    key: TypeKey,
    type_name: &'static str,
    pub(crate) injection: Option<Injection<T>>,
}

impl<T> Field<T> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn key(&self) -> &TypeKey {
        &self.key
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn directive(&self) -> Option<&Directive> {
        self.injection.as_ref().map(|injection| &injection.directive)
    }
}

impl<T> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("type", &self.type_name)
            .field("directive", &self.directive())
            .finish()
    }
}

/// 按声明顺序排列的字段集合
pub struct FieldSet<T> {
    fields: Vec<Field<T>>,
}

impl<T: 'static> Default for FieldSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> FieldSet<T> {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// 按声明类型注入的字段
    pub fn inject<F, A>(self, name: &'static str, accessor: A) -> Self
    where
        F: Injectable,
        A: Fn(&mut T) -> &mut F + Send + Sync + 'static,
    {
        self.with_directive(name, Directive::Inject, accessor)
    }

    /// 优先按注册键注入的字段
    pub fn inject_key<F, A>(self, name: &'static str, key: impl Into<TypeKey>, accessor: A) -> Self
    where
        F: Injectable,
        A: Fn(&mut T) -> &mut F + Send + Sync + 'static,
    {
        self.with_directive(name, Directive::Key(key.into()), accessor)
    }

    /// 没有注入指令的字段，注入时保持原值
    pub fn plain<F: 'static>(mut self, name: &'static str) -> Self {
        self.fields.push(Field {
            name,
            key: TypeKey::of::<F>(),
            type_name: std::any::type_name::<F>(),
            injection: None,
        });
        self
    }

    fn with_directive<F, A>(mut self, name: &'static str, directive: Directive, accessor: A) -> Self
    where
        F: Injectable,
        A: Fn(&mut T) -> &mut F + Send + Sync + 'static,
    {
        let assign: Assign<T> = Box::new(move |target: &mut T, value: &Value| {
            match value.get::<F>() {
                Some(value) => {
                    *accessor(target) = value;
                    true
                }
                None => false,
            }
        });
        self.fields.push(Field {
            name,
            key: F::type_key(),
            type_name: std::any::type_name::<F>(),
            injection: Some(Injection {
                directive,
                parameter: Parameter::of::<F>(),
                assign,
            }),
        });
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field<T>> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn construct_indirect<T: Injectable>(
    container: &Container,
    arguments: &mut ArgumentTypeMap,
) -> Result<Arc<T>> {
    container.auto_construct::<T>(arguments).map(Arc::new)
}

impl<T: Injectable> Injectable for Arc<T> {
    fn assembly() -> Assembly<Self> {
        Assembly::Indirect(construct_indirect::<T>)
    }
}

impl<T: Clone + Send + Sync + 'static> Injectable for Vec<T> {}

impl Injectable for Container {}

macro_rules! opaque_injectable {
    ($($ty:ty),* $(,)?) => {
        $(impl Injectable for $ty {})*
    };
}

opaque_injectable!(
    String, bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);
