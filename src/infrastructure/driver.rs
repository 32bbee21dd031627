//! 浏览器自动化能力 - 基础设施层
//!
//! 登录流程和案件流程只依赖这个 trait，不直接接触 chromiumoxide。

use std::fmt;

use anyhow::Result;
use async_trait::async_trait;

/// 元素在页面上的状态，按"越来越可用"的顺序排列
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ElementState {
    /// 不存在
    Missing,
    /// 存在于 DOM 中
    Present,
    /// 可见
    Visible,
    /// 可见且可点击（未禁用）
    Clickable,
}

impl ElementState {
    /// 当前状态是否满足 `wanted`
    pub fn satisfies(self, wanted: ElementState) -> bool {
        self >= wanted
    }
}

impl fmt::Display for ElementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementState::Missing => "不存在",
            ElementState::Present => "存在",
            ElementState::Visible => "可见",
            ElementState::Clickable => "可点击",
        };
        f.write_str(name)
    }
}

/// 浏览器自动化能力
///
/// - 窗口句柄是不透明字符串，一个句柄对应一个标签页
/// - `switch_to_window` 只切换驱动的操作目标，不改变用户看到的标签页
/// - 元素统一用 XPath 定位
#[async_trait(?Send)]
pub trait BrowserDriver {
    /// 在当前标签页中打开 URL
    async fn navigate(&mut self, url: &str) -> Result<()>;

    async fn current_url(&self) -> Result<String>;

    /// 当前所有标签页的句柄
    async fn window_handles(&self) -> Result<Vec<String>>;

    /// 驱动当前操作的标签页句柄
    async fn current_window(&self) -> Result<String>;

    async fn switch_to_window(&mut self, handle: &str) -> Result<()>;

    /// 把当前标签页切到前台显示给用户
    async fn bring_to_front(&self) -> Result<()>;

    async fn element_state(&self, xpath: &str) -> Result<ElementState>;

    async fn attribute(&self, xpath: &str, name: &str) -> Result<Option<String>>;

    /// 通过脚本触发点击（不受遮挡影响）
    async fn js_click(&self, xpath: &str) -> Result<()>;

    /// 原生鼠标点击
    async fn click(&self, xpath: &str) -> Result<()>;

    /// 原生键盘输入
    async fn type_text(&self, xpath: &str, text: &str) -> Result<()>;

    /// 直接设置输入框的 value 并派发一个冒泡事件
    async fn set_value_and_dispatch(&self, xpath: &str, value: &str, event: &str) -> Result<()>;

    async fn scroll_into_view(&self, xpath: &str) -> Result<()>;

    /// 当前标签页的 PNG 截图
    async fn screenshot_png(&self) -> Result<Vec<u8>>;

    /// 当前标签页的完整 HTML
    async fn page_source(&self) -> Result<String>;
}
