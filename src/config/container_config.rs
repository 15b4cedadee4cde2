use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::ConfigError;

/// 环境变量：嵌套解析的最大深度
pub const ENV_MAX_DEPTH: &str = "AUTOWIRE_MAX_DEPTH";
/// 环境变量：是否在 debug 级别记录每次参数解析
pub const ENV_TRACE_RESOLUTION: &str = "AUTOWIRE_TRACE_RESOLUTION";

/// 默认最大嵌套深度
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// 容器配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerConfig {
    /// 工厂调用与自动构造的最大嵌套层数，超过后报错而不是耗尽栈
    pub max_depth: usize,
    /// 在 debug 级别记录每个参数由哪一种策略解析
    pub trace_resolution: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            trace_resolution: false,
        }
    }
}

/// 配置文件中的部分配置，缺省字段使用默认值
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartialContainerConfig {
    pub max_depth: Option<usize>,
    pub trace_resolution: Option<bool>,
}

impl ContainerConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_trace_resolution(mut self, enabled: bool) -> Self {
        self.trace_resolution = enabled;
        self
    }

    /// 合并文件配置与环境变量，环境变量优先
    pub fn from_partial_and_env(
        partial: Option<PartialContainerConfig>,
        env_map: HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let partial = partial.unwrap_or_default();
        let mut config = Self::default();

        if let Some(max_depth) = partial.max_depth {
            config.max_depth = max_depth;
        }
        if let Some(trace) = partial.trace_resolution {
            config.trace_resolution = trace;
        }

        if let Some(raw) = env_map.get(ENV_MAX_DEPTH) {
            config.max_depth = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                field: ENV_MAX_DEPTH.to_string(),
                value: raw.clone(),
            })?;
        }
        if let Some(raw) = env_map.get(ENV_TRACE_RESOLUTION) {
            config.trace_resolution = parse_flag(raw).ok_or_else(|| ConfigError::InvalidValue {
                field: ENV_TRACE_RESOLUTION.to_string(),
                value: raw.clone(),
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_depth".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
