use thiserror::Error;

/// 容器操作的统一错误类型
///
/// 解析结果为空不是错误；只有配置不当或调用方式错误才会走到这里。
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("Factory registered under '{key}' must return exactly one value, found {returns}")]
    Registration { key: String, returns: usize },

    #[error("Type '{type_name}' is not an injectable aggregate")]
    NotInjectable { type_name: String },

    #[error(
        "Cannot inject field '{field}': declared type is '{declared}', resolved value is '{resolved}'"
    )]
    FieldTypeMismatch {
        field: String,
        declared: String,
        resolved: String,
    },

    #[error("Argument {index} expected '{expected}', got '{actual}'")]
    ArgumentMismatch {
        index: usize,
        expected: String,
        actual: String,
    },

    #[error("Value resolved for '{key}' is '{actual}', expected '{expected}'")]
    ResolvedTypeMismatch {
        key: String,
        expected: String,
        actual: String,
    },

    #[error("Invokable expects {expected} arguments, got {actual}")]
    ArityMismatch { expected: usize, actual: usize },

    #[error("Resolution of '{type_name}' exceeded the nesting limit of {limit}")]
    DepthExceeded { type_name: String, limit: usize },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read file '{0}': {1}")]
    FileRead(String, #[source] std::io::Error),
    #[cfg(feature = "config-file")]
    #[error("Failed to parse TOML from '{0}': {1}")]
    TomlParse(String, #[source] toml::de::Error),
    #[error("Invalid value '{value}' for '{field}'")]
    InvalidValue { field: String, value: String },
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, ContainerError>;
