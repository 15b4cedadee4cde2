//! 字段注入与自动构造

use super::arguments::ArgumentTypeMap;
use super::component::{Assembly, Directive, Field, FieldSet, Injectable};
use super::depth::DepthGuard;
use super::Container;
use crate::errors::{ContainerError, Result};
use crate::types::Value;

impl Container {
    /// 零值构造 `T`，再按装配方式填充
    pub(crate) fn auto_construct<T: Injectable>(&self, arguments: &mut ArgumentTypeMap) -> Result<T> {
        let type_name = std::any::type_name::<T>();
        let _depth = DepthGuard::enter(self.inner.config.max_depth, type_name)?;

        match T::assembly() {
            Assembly::Opaque => Err(ContainerError::NotInjectable {
                type_name: type_name.to_string(),
            }),
            Assembly::Fields { zero, fields } => {
                let mut target = zero();
                self.inject_field_set(&mut target, &fields, arguments)?;
                tracing::trace!(type_name, "Aggregate constructed");
                Ok(target)
            }
            Assembly::Custom { zero, construct } => {
                let mut target = zero();
                construct(&mut target, self)?;
                Ok(target)
            }
            Assembly::Indirect(construct) => construct(self, arguments),
        }
    }

    /// 使用现成的参数池向已有对象注入字段
    ///
    /// 自装配类型交给自己的逻辑；没有指令的字段保持原值。
    pub fn inject_with_arguments<T: Injectable>(
        &self,
        target: &mut T,
        arguments: &mut ArgumentTypeMap,
    ) -> Result<()> {
        match T::assembly() {
            Assembly::Fields { fields, .. } => self.inject_field_set(target, &fields, arguments),
            Assembly::Custom { construct, .. } => construct(target, self),
            Assembly::Opaque | Assembly::Indirect(_) => Err(ContainerError::NotInjectable {
                type_name: std::any::type_name::<T>().to_string(),
            }),
        }
    }

    fn inject_field_set<T: 'static>(
        &self,
        target: &mut T,
        fields: &FieldSet<T>,
        arguments: &mut ArgumentTypeMap,
    ) -> Result<()> {
        for field in fields.iter() {
            let Some(injection) = field.injection.as_ref() else {
                continue;
            };

            let keyed = match &injection.directive {
                Directive::Key(key) => {
                    let mut fresh = ArgumentTypeMap::with_container(Vec::new(), self);
                    self.get_with_arguments(key, &mut fresh)?
                }
                Directive::Inject => None,
            };
            let value = match keyed {
                Some(value) => value,
                None => self.resolve_parameter(&injection.parameter, arguments)?,
            };

            let value = self.assignable(field, value)?;
            if !(injection.assign)(target, &value) {
                return Err(mismatch(field, &value));
            }
        }
        Ok(())
    }

    fn assignable<T>(&self, field: &Field<T>, value: Value) -> Result<Value> {
        if value.key() == field.key() {
            return Ok(value);
        }
        self.inner
            .conversions
            .convert(&value, field.key())
            .ok_or_else(|| mismatch(field, &value))
    }
}

fn mismatch<T>(field: &Field<T>, value: &Value) -> ContainerError {
    ContainerError::FieldTypeMismatch {
        field: field.name().to_string(),
        declared: field.type_name().to_string(),
        resolved: value.type_name().to_string(),
    }
}
