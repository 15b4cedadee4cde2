use std::sync::atomic::{AtomicU64, Ordering};

/// 内部容器统计信息（原子计数器）
#[derive(Default)]
pub(crate) struct InnerStats {
    pub(crate) resolutions: AtomicU64,
    pub(crate) supplied_hits: AtomicU64,
    pub(crate) registry_hits: AtomicU64,
    pub(crate) auto_constructions: AtomicU64,
    pub(crate) singleton_materializations: AtomicU64,
    pub(crate) binding_invocations: AtomicU64,
}

impl InnerStats {
    pub(crate) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> ContainerStats {
        ContainerStats {
            resolutions: self.resolutions.load(Ordering::Relaxed),
            supplied_hits: self.supplied_hits.load(Ordering::Relaxed),
            registry_hits: self.registry_hits.load(Ordering::Relaxed),
            auto_constructions: self.auto_constructions.load(Ordering::Relaxed),
            singleton_materializations: self.singleton_materializations.load(Ordering::Relaxed),
            binding_invocations: self.binding_invocations.load(Ordering::Relaxed),
        }
    }
}

/// 容器统计信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerStats {
    /// 经过解析管线的参数/字段总数
    pub resolutions: u64,
    /// 由外部参数（同类型或可转换）满足的次数
    pub supplied_hits: u64,
    /// 由注册表满足的次数
    pub registry_hits: u64,
    /// 落到自动构造的次数
    pub auto_constructions: u64,
    /// 单例工厂实际执行次数
    pub singleton_materializations: u64,
    /// 瞬态绑定工厂执行次数
    pub binding_invocations: u64,
}

impl ContainerStats {
    /// 注册表命中率（小数形式）
    pub fn registry_hit_rate(&self) -> f64 {
        if self.resolutions == 0 {
            0.0
        } else {
            self.registry_hits as f64 / self.resolutions as f64
        }
    }

    /// 获取性能指标摘要
    pub fn summary(&self) -> String {
        format!(
            "Container: {} resolutions ({} supplied, {} registry, {} constructed), {} singleton materializations, {} binding invocations",
            self.resolutions,
            self.supplied_hits,
            self.registry_hits,
            self.auto_constructions,
            self.singleton_materializations,
            self.binding_invocations
        )
    }
}
