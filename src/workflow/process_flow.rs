//! 单个案件处理流程 - 流程层
//!
//! 核心职责：定义"一个案件"从门户首页到 PDF 查看器的完整流程
//!
//! 流程顺序：
//! 1. 格式化编号 → 等待首页稳定 → 展开菜单（可选）
//! 2. 快速访问输入编号 → 点击"打开案件"建议 → 切到案件标签页
//! 3. 打开下载菜单 → 点击 Download → 切到 PDF 查看器标签页
//!
//! 不论成功失败，结束时驱动都会回到门户面板标签页；
//! PDF 查看器标签页留在前台供人工查看。

use anyhow::Result;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::config::Timeouts;
use crate::error::FlowError;
use crate::infrastructure::{
    wait_for_element, wait_for_url, BrowserDriver, ElementState, Wait,
};
use crate::models::format_for_search;
use crate::models::portal::panel as sel;
use crate::services::DebugArtifacts;
use crate::workflow::process_ctx::ProcessCtx;
use crate::workflow::step::{tolerate, FlowStep, OptionalStep};
use crate::workflow::tab_watch::TabSnapshot;

/// 输入框需要收到的事件，门户脚本只响应 input 事件
const QUICK_SEARCH_EVENT: &str = "input";

/// 案件处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessResult {
    /// PDF 查看器已打开
    Opened {
        /// 查看器标签页句柄
        viewer: String,
    },
    /// 在某一步失败
    Failed { step: FlowStep },
}

impl ProcessResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ProcessResult::Opened { .. })
    }
}

/// 案件处理流程
///
/// - 编排单个案件的全部页面交互
/// - 不持有浏览器，驱动由编排层借给它
/// - 不写完成日志，是否记为完成由编排层决定
pub struct ProcessFlow {
    timeouts: Timeouts,
    artifacts: DebugArtifacts,
}

impl ProcessFlow {
    pub fn new(timeouts: Timeouts, artifacts: DebugArtifacts) -> Self {
        Self {
            timeouts,
            artifacts,
        }
    }

    pub async fn run<D: BrowserDriver>(&self, driver: &mut D, ctx: &ProcessCtx) -> ProcessResult {
        info!("{} 🔎 尝试通过快速访问打开 PDF...", ctx);

        let formatted = format_for_search(&ctx.process_number);
        if formatted.trim().is_empty() {
            error!("{} ❌ 无法为快速访问格式化编号", ctx);
            return ProcessResult::Failed {
                step: FlowStep::Format,
            };
        }

        let panel = match driver.current_window().await {
            Ok(handle) => handle,
            Err(e) => {
                let err = FlowError::new(FlowStep::LocatePanel, e);
                return self.fail(&*driver, ctx, err).await;
            }
        };

        let result = match self.open_viewer(driver, ctx, &formatted).await {
            Ok(viewer) => {
                info!("{} ✅ PDF 页面已打开，等待人工操作", ctx);
                ProcessResult::Opened { viewer }
            }
            Err(e) => self.fail(&*driver, ctx, e).await,
        };

        self.restore_focus(driver, &panel, ctx).await;
        result
    }

    /// 记录失败并保存截图
    async fn fail<D: BrowserDriver>(
        &self,
        driver: &D,
        ctx: &ProcessCtx,
        err: FlowError,
    ) -> ProcessResult {
        error!("{} ❌ 打开 PDF 失败: {}", ctx, err);
        let stem = format!("debug_pje_acesso_rapido_erro_{}", ctx.process_number);
        self.artifacts.capture(driver, &stem, false).await;
        ProcessResult::Failed { step: err.step }
    }

    async fn open_viewer<D: BrowserDriver>(
        &self,
        driver: &mut D,
        ctx: &ProcessCtx,
        formatted: &str,
    ) -> Result<String, FlowError> {
        let t = &self.timeouts;

        info!("{} ⏳ 等待首页稳定 ({:?})...", ctx, t.home_settle);
        sleep(t.home_settle).await;

        let menu = self.expand_menu(&*driver, ctx).await;
        tolerate(OptionalStep::ExpandMenu, menu);

        self.quick_search(&*driver, ctx, formatted)
            .await
            .map_err(|e| FlowError::new(FlowStep::QuickSearch, e))?;

        let before_case = self
            .open_suggestion(&*driver, ctx)
            .await
            .map_err(|e| FlowError::new(FlowStep::OpenSuggestion, e))?;

        self.switch_to_case_tab(driver, ctx, before_case)
            .await
            .map_err(|e| FlowError::new(FlowStep::AwaitCaseTab, e))?;

        let before_viewer = self
            .open_download_menu(&*driver, ctx)
            .await
            .map_err(|e| FlowError::new(FlowStep::OpenDownloadMenu, e))?;

        self.switch_to_viewer_tab(driver, ctx, before_viewer)
            .await
            .map_err(|e| FlowError::new(FlowStep::AwaitViewerTab, e))
    }

    async fn expand_menu<D: BrowserDriver>(&self, driver: &D, ctx: &ProcessCtx) -> Result<()> {
        let t = &self.timeouts;
        debug!("{} 查找 'Abrir menu' 按钮...", ctx);
        let wait = self.wait(t.menu);
        wait_for_element(driver, sel::MENU_TOGGLE, ElementState::Clickable, wait).await?;
        driver.js_click(sel::MENU_TOGGLE).await?;
        wait_for_element(driver, sel::NAV_CONTAINER, ElementState::Visible, wait).await?;
        info!("{} ✓ 菜单已展开", ctx);
        sleep(t.menu_settle).await;
        Ok(())
    }

    async fn quick_search<D: BrowserDriver>(
        &self,
        driver: &D,
        ctx: &ProcessCtx,
        formatted: &str,
    ) -> Result<()> {
        let t = &self.timeouts;
        let wait = self.wait(t.quick_search_input);
        wait_for_element(driver, sel::QUICK_SEARCH_INPUT, ElementState::Visible, wait).await?;
        driver
            .set_value_and_dispatch(sel::QUICK_SEARCH_INPUT, formatted, QUICK_SEARCH_EVENT)
            .await?;
        info!("{} ✓ 已在快速访问中输入 '{}'", ctx, formatted);
        sleep(t.search_settle).await;
        Ok(())
    }

    /// 点击建议链接，返回点击前拍下的标签页快照
    async fn open_suggestion<D: BrowserDriver>(
        &self,
        driver: &D,
        ctx: &ProcessCtx,
    ) -> Result<TabSnapshot> {
        let wait = self.wait(self.timeouts.suggestion);
        wait_for_element(driver, sel::OPEN_PROCESS_SUGGESTION, ElementState::Clickable, wait)
            .await?;
        info!("{} ✓ 找到 '打开案件' 建议，点击...", ctx);
        let snapshot = TabSnapshot::take(driver).await?;
        driver.js_click(sel::OPEN_PROCESS_SUGGESTION).await?;
        Ok(snapshot)
    }

    async fn switch_to_case_tab<D: BrowserDriver>(
        &self,
        driver: &mut D,
        ctx: &ProcessCtx,
        snapshot: TabSnapshot,
    ) -> Result<()> {
        let t = &self.timeouts;
        let case_tab = snapshot
            .await_new_tab(&*driver, "案件详情标签页", self.wait(t.case_tab), t.new_tab_grace)
            .await?;
        driver.switch_to_window(&case_tab).await?;
        let url = driver.current_url().await.unwrap_or_default();
        info!("{} ✓ 已切到案件标签页: {}", ctx, url);

        wait_for_url(&*driver, sel::CASE_DETAIL_URL_MARKER, self.wait(t.case_url)).await?;
        info!("{} ✓ 案件详情页已加载", ctx);
        Ok(())
    }

    /// 打开下载菜单并点击 Download，返回点击 Download 前拍下的快照
    async fn open_download_menu<D: BrowserDriver>(
        &self,
        driver: &D,
        ctx: &ProcessCtx,
    ) -> Result<TabSnapshot> {
        let t = &self.timeouts;
        let wait = self.wait(t.download_trigger);
        wait_for_element(driver, sel::DOWNLOAD_TRIGGER, ElementState::Clickable, wait).await?;
        driver.js_click(sel::DOWNLOAD_TRIGGER).await?;
        info!("{} ✓ 已打开下载菜单", ctx);
        sleep(t.download_menu_settle).await;

        let wait = self.wait(t.download_button);
        wait_for_element(driver, sel::DOWNLOAD_BUTTON, ElementState::Clickable, wait).await?;
        let snapshot = TabSnapshot::take(driver).await?;
        driver.js_click(sel::DOWNLOAD_BUTTON).await?;
        info!("{} ✓ 已点击 'Download'，等待 PDF 查看器...", ctx);
        Ok(snapshot)
    }

    async fn switch_to_viewer_tab<D: BrowserDriver>(
        &self,
        driver: &mut D,
        ctx: &ProcessCtx,
        snapshot: TabSnapshot,
    ) -> Result<String> {
        let t = &self.timeouts;
        let viewer = snapshot
            .await_new_tab(&*driver, "PDF 查看器标签页", self.wait(t.viewer_tab), t.new_tab_grace)
            .await?;
        driver.switch_to_window(&viewer).await?;
        if let Err(e) = driver.bring_to_front().await {
            warn!("{} ⚠️ 无法把 PDF 查看器切到前台: {:#}", ctx, e);
        }
        let url = driver.current_url().await.unwrap_or_default();
        info!("{} ✓ PDF 查看器: {}", ctx, url);

        sleep(t.viewer_settle).await;
        Ok(viewer)
    }

    /// 把驱动切回门户面板标签页（如果它还在）
    async fn restore_focus<D: BrowserDriver>(
        &self,
        driver: &mut D,
        panel: &str,
        ctx: &ProcessCtx,
    ) {
        let handles = match driver.window_handles().await {
            Ok(handles) => handles,
            Err(e) => {
                warn!("{} ⚠️ 无法读取标签页列表: {:#}", ctx, e);
                return;
            }
        };
        if !handles.iter().any(|h| h == panel) {
            warn!("{} ⚠️ 门户面板标签页已关闭", ctx);
            return;
        }

        let on_panel = matches!(driver.current_window().await, Ok(current) if current == panel);
        if !on_panel {
            if let Err(e) = driver.switch_to_window(panel).await {
                warn!("{} ⚠️ 切回门户面板失败: {:#}", ctx, e);
                return;
            }
        }
        debug!("{} 驱动已回到门户面板", ctx);
    }

    fn wait(&self, timeout: std::time::Duration) -> Wait {
        Wait::new(timeout, self.timeouts.poll_interval)
    }
}
