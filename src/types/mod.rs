//! 类型键、类型擦除值与可转换关系

pub mod conversion;
pub mod key;
pub mod value;

pub use conversion::Conversions;
pub use key::TypeKey;
pub use value::{IntoValue, Value};
