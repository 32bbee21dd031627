//! 新标签页检测
//!
//! 在"会打开新标签页"的动作之前立即拍下句柄快照，动作之后与快照做差集。
//! 门户里可能残留上一次尝试留下的标签页，只数新出现的那一个。

use std::collections::HashSet;
use std::time::Duration;

use anyhow::{bail, Result};
use tokio::time::sleep;
use tracing::debug;

use crate::infrastructure::{wait_until, BrowserDriver, Wait};

/// 动作之前的标签页句柄快照
///
/// `await_new_tab` 会消耗快照，下一次等待必须重新拍。
#[derive(Debug, Clone)]
pub struct TabSnapshot {
    before: HashSet<String>,
}

impl TabSnapshot {
    pub async fn take<D: BrowserDriver + ?Sized>(driver: &D) -> Result<Self> {
        let before: HashSet<String> = driver.window_handles().await?.into_iter().collect();
        debug!("标签页快照: {} 个", before.len());
        Ok(Self { before })
    }

    pub fn contains(&self, handle: &str) -> bool {
        self.before.contains(handle)
    }

    /// 快照之后新出现的句柄，按驱动返回的顺序
    pub fn new_handles(&self, now: &[String]) -> Vec<String> {
        now.iter()
            .filter(|h| !self.before.contains(h.as_str()))
            .cloned()
            .collect()
    }

    /// 等待恰好一个新标签页出现并返回它的句柄
    ///
    /// 第一次看到新标签页后再等 `grace` 复查一次，期间又出现的标签页也算在内；
    /// 同时出现多个新标签页视为错误，不去猜哪一个才是目标。
    pub async fn await_new_tab<D: BrowserDriver + ?Sized>(
        self,
        driver: &D,
        what: &str,
        wait: Wait,
        grace: Duration,
    ) -> Result<String> {
        let snapshot = &self;
        wait_until(what, wait, move || async move {
            let now = driver.window_handles().await?;
            Ok::<_, anyhow::Error>((!snapshot.new_handles(&now).is_empty()).then_some(()))
        })
        .await?;

        sleep(grace).await;
        let mut fresh = self.new_handles(&driver.window_handles().await?);
        match fresh.len() {
            1 => Ok(fresh.remove(0)),
            0 => bail!("{}: 新标签页出现后又关闭了", what),
            n => bail!("{}: 预期出现 1 个新标签页，实际出现 {} 个: {:?}", what, n, fresh),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(handles: &[&str]) -> TabSnapshot {
        TabSnapshot {
            before: handles.iter().map(|h| h.to_string()).collect(),
        }
    }

    #[test]
    fn test_new_handles_ignores_stale_tabs() {
        let snap = snapshot(&["painel", "velha"]);
        let now: Vec<String> = ["painel", "velha", "autos"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        assert_eq!(snap.new_handles(&now), vec!["autos"]);
    }

    #[test]
    fn test_new_handles_empty_when_tab_closed() {
        let snap = snapshot(&["painel", "velha"]);
        let now = vec!["painel".to_string()];
        assert!(snap.new_handles(&now).is_empty());
    }
}
