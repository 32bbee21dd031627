//! 统一的轮询等待原语

use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use tokio::time::{sleep, Instant};
use tracing::trace;

use crate::error::WaitError;
use crate::infrastructure::driver::{BrowserDriver, ElementState};

/// 一次等待的上限和轮询间隔
#[derive(Debug, Clone, Copy)]
pub struct Wait {
    pub timeout: Duration,
    pub poll: Duration,
}

impl Wait {
    pub fn new(timeout: Duration, poll: Duration) -> Self {
        Self { timeout, poll }
    }
}

/// 反复调用 `check` 直到它返回 `Some`，或超过 `wait.timeout`
///
/// `check` 返回错误视为"还没好"（页面可能正在跳转），最后一次错误会带进超时错误里。
/// 至少会调用一次 `check`。
pub async fn wait_until<T, F, Fut>(what: &str, wait: Wait, mut check: F) -> Result<T, WaitError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>>>,
{
    let deadline = Instant::now() + wait.timeout;
    let mut last_error = None;

    loop {
        match check().await {
            Ok(Some(value)) => return Ok(value),
            Ok(None) => {}
            Err(e) => {
                trace!("等待 {} 时出错: {:#}", what, e);
                last_error = Some(format!("{:#}", e));
            }
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(WaitError::Timeout {
                what: what.to_string(),
                timeout: wait.timeout,
                last_error,
            });
        }
        sleep(wait.poll.min(deadline - now)).await;
    }
}

/// 等待元素至少达到 `wanted` 状态
pub async fn wait_for_element<D: BrowserDriver + ?Sized>(
    driver: &D,
    xpath: &str,
    wanted: ElementState,
    wait: Wait,
) -> Result<(), WaitError> {
    wait_until(&format!("元素{} {}", wanted, xpath), wait, move || async move {
        let state = driver.element_state(xpath).await?;
        Ok::<_, anyhow::Error>(state.satisfies(wanted).then_some(()))
    })
    .await
}

/// 等待当前 URL 包含 `needle`，返回满足条件时的 URL
pub async fn wait_for_url<D: BrowserDriver + ?Sized>(
    driver: &D,
    needle: &str,
    wait: Wait,
) -> Result<String, WaitError> {
    wait_until(&format!("URL 包含 {}", needle), wait, move || async move {
        let url = driver.current_url().await?;
        Ok::<_, anyhow::Error>(url.contains(needle).then_some(url))
    })
    .await
}
