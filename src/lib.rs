//! 运行时依赖解析容器
//!
//! 注册实例、单例和绑定，按类型为任意函数解析参数，并向结构体字段注入依赖。

pub mod config;
pub mod container;
pub mod errors;
pub mod logging;
pub mod types;

// Re-export commonly used items for convenience
pub use config::ContainerConfig;
pub use container::{Assembly, Construct, Container, FieldSet, Injectable, Lifetime};
pub use errors::{ConfigError, ContainerError, Result};
pub use types::{IntoValue, TypeKey, Value};
