//! 基于 chromiumoxide 的 BrowserDriver 实现

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::{Browser, Page};
use tracing::debug;

use crate::infrastructure::driver::{BrowserDriver, ElementState};
use crate::infrastructure::JsExecutor;

/// 判断元素状态的脚本，返回 missing / present / visible / clickable
const ELEMENT_STATE_JS: &str = r#"
    if (!el) return 'missing';
    const style = window.getComputedStyle(el);
    const rect = el.getBoundingClientRect();
    const visible = style.visibility !== 'hidden' && style.display !== 'none'
        && (rect.width > 0 || rect.height > 0);
    if (!visible) return 'present';
    if (el.disabled) return 'visible';
    return 'clickable';
"#;

/// Chrome / Edge 会话
///
/// 持有 Browser 和当前操作的标签页。Browser 被 drop 时不会关闭浏览器，
/// 因为浏览器进程不是由 chromiumoxide 启动的。
pub struct ChromeDriver {
    browser: Browser,
    executor: JsExecutor,
}

impl ChromeDriver {
    pub fn new(browser: Browser, page: Page) -> Self {
        Self {
            browser,
            executor: JsExecutor::new(page),
        }
    }

    fn page(&self) -> &Page {
        self.executor.page()
    }

    async fn find_page(&self, handle: &str) -> Result<Option<Page>> {
        let pages = self.browser.pages().await?;
        Ok(pages
            .into_iter()
            .find(|p| p.target_id().inner().as_str() == handle))
    }

    async fn require_element(&self, xpath: &str) -> Result<chromiumoxide::Element> {
        self.page()
            .find_xpath(xpath)
            .await
            .with_context(|| format!("找不到元素: {}", xpath))
    }

    /// 执行返回 bool 的脚本，`false` 表示元素不存在
    async fn run_on_element(&self, xpath: &str, action: &str) -> Result<()> {
        let body = format!("if (!el) return false; {} return true;", action);
        let found: bool = self.executor.eval_on_xpath(xpath, &body).await?;
        if !found {
            bail!("找不到元素: {}", xpath);
        }
        Ok(())
    }
}

#[async_trait(?Send)]
impl BrowserDriver for ChromeDriver {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        debug!("导航到: {}", url);
        self.page()
            .goto(url)
            .await
            .with_context(|| format!("导航到 {} 失败", url))?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.page().url().await?.unwrap_or_default())
    }

    async fn window_handles(&self) -> Result<Vec<String>> {
        let pages = self.browser.pages().await?;
        Ok(pages
            .iter()
            .map(|p| p.target_id().inner().clone())
            .collect())
    }

    async fn current_window(&self) -> Result<String> {
        Ok(self.page().target_id().inner().clone())
    }

    async fn switch_to_window(&mut self, handle: &str) -> Result<()> {
        let page = self
            .find_page(handle)
            .await?
            .ok_or_else(|| anyhow!("标签页 {} 已不存在", handle))?;
        self.executor = JsExecutor::new(page);
        debug!("驱动切换到标签页: {}", handle);
        Ok(())
    }

    async fn bring_to_front(&self) -> Result<()> {
        self.page().bring_to_front().await?;
        Ok(())
    }

    async fn element_state(&self, xpath: &str) -> Result<ElementState> {
        let state: String = self.executor.eval_on_xpath(xpath, ELEMENT_STATE_JS).await?;
        Ok(match state.as_str() {
            "present" => ElementState::Present,
            "visible" => ElementState::Visible,
            "clickable" => ElementState::Clickable,
            _ => ElementState::Missing,
        })
    }

    async fn attribute(&self, xpath: &str, name: &str) -> Result<Option<String>> {
        let body = format!(
            "if (!el) return null; return el.getAttribute({});",
            serde_json::to_string(name)?
        );
        self.executor.eval_on_xpath(xpath, &body).await
    }

    async fn js_click(&self, xpath: &str) -> Result<()> {
        self.run_on_element(xpath, "el.click();").await
    }

    async fn click(&self, xpath: &str) -> Result<()> {
        self.require_element(xpath).await?.click().await?;
        Ok(())
    }

    async fn type_text(&self, xpath: &str, text: &str) -> Result<()> {
        let element = self.require_element(xpath).await?;
        element.click().await?;
        element.type_str(text).await?;
        Ok(())
    }

    async fn set_value_and_dispatch(&self, xpath: &str, value: &str, event: &str) -> Result<()> {
        let action = format!(
            "el.value = {}; el.dispatchEvent(new Event({}, {{ bubbles: true }}));",
            serde_json::to_string(value)?,
            serde_json::to_string(event)?
        );
        self.run_on_element(xpath, &action).await
    }

    async fn scroll_into_view(&self, xpath: &str) -> Result<()> {
        self.run_on_element(xpath, "el.scrollIntoView(true);").await
    }

    async fn screenshot_png(&self) -> Result<Vec<u8>> {
        let bytes = self
            .page()
            .screenshot(
                ScreenshotParams::builder()
                    .format(CaptureScreenshotFormat::Png)
                    .full_page(true)
                    .build(),
            )
            .await?;
        Ok(bytes)
    }

    async fn page_source(&self) -> Result<String> {
        Ok(self.page().content().await?)
    }
}
