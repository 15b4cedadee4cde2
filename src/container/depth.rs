//! 嵌套解析深度
//!
//! 解析在单个线程上同步完成，深度按线程计数；自装配类型拿到的是新的参数池，
//! 因此深度不能记在参数池里。

use std::cell::Cell;

use crate::errors::{ContainerError, Result};

thread_local! {
    static DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// 进入一层嵌套解析，drop 时退出
pub(crate) struct DepthGuard(());

impl DepthGuard {
    pub(crate) fn enter(limit: usize, type_name: &str) -> Result<Self> {
        DEPTH.with(|depth| {
            let current = depth.get();
            if current >= limit {
                return Err(ContainerError::DepthExceeded {
                    type_name: type_name.to_string(),
                    limit,
                });
            }
            depth.set(current + 1);
            Ok(DepthGuard(()))
        })
    }

    #[cfg(test)]
    pub(crate) fn current() -> usize {
        DEPTH.with(Cell::get)
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}
