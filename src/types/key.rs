use std::borrow::{Borrow, Cow};
use std::fmt;

/// 注册表与参数池共用的键
///
/// 类型键由 `std::any::type_name` 推导，同一进程内对同一类型稳定；
/// 任意字符串（例如 `"config"`）同样可以作为注册键或别名使用。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey(Cow<'static, str>);

impl TypeKey {
    /// 获取类型 `T` 的类型键
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self(Cow::Borrowed(std::any::type_name::<T>()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for TypeKey {
    fn from(key: &'static str) -> Self {
        Self(Cow::Borrowed(key))
    }
}

impl From<String> for TypeKey {
    fn from(key: String) -> Self {
        Self(Cow::Owned(key))
    }
}

impl From<&String> for TypeKey {
    fn from(key: &String) -> Self {
        Self(Cow::Owned(key.clone()))
    }
}

impl From<&TypeKey> for TypeKey {
    fn from(key: &TypeKey) -> Self {
        key.clone()
    }
}

impl Borrow<str> for TypeKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TypeKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
