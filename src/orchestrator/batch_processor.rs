//! 批量案件处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量案件的处理和资源管理。
//!
//! ## 核心功能
//!
//! 1. **加载待办**：读取表格和已完成日志，得到保持表格顺序的待处理列表
//! 2. **资源管理**：整个运行期间只打开一个浏览器会话，并且从不关闭它
//! 3. **登录**：只登录一次，失败则整个运行中止
//! 4. **逐个处理**：严格串行，每个案件前回到门户首页，案件之间固定停顿
//! 5. **记录完成**：只有 PDF 查看器确认打开后才写入日志
//! 6. **全局统计**：汇总所有案件的处理结果

use std::future::Future;
use std::path::Path;

use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::browser;
use crate::config::{Config, Timeouts};
use crate::error::{AppError, AppResult, ConfigError, FileError};
use crate::infrastructure::BrowserDriver;
use crate::models::load_process_numbers;
use crate::services::{CompletionLog, DebugArtifacts, PortalLogin};
use crate::utils::logging;
use crate::workflow::{ProcessCtx, ProcessFlow};

/// 应用主结构
pub struct App {
    config: Config,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// 运行应用主逻辑
    ///
    /// 返回时浏览器保持打开，已打开的 PDF 标签页留给人工处理。
    pub async fn run(&self) -> AppResult<RunSummary> {
        self.run_with(|| browser::open_session(&self.config)).await
    }

    /// 用 `open_session` 提供的浏览器会话运行
    ///
    /// 只有在确实有待处理案件时才会调用 `open_session`。
    pub async fn run_with<D, F, Fut>(&self, open_session: F) -> AppResult<RunSummary>
    where
        D: BrowserDriver,
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<D>>,
    {
        let config = &self.config;
        logging::log_startup();

        let spreadsheet = config.spreadsheet_path();
        let planilha = load_process_numbers(&spreadsheet)?;
        if planilha.is_empty() {
            return Err(ConfigError::NoValidProcessNumbers {
                path: spreadsheet.display().to_string(),
            }
            .into());
        }

        let log = CompletionLog::load(config.completion_log_path())?;
        let pending = log.pending(&planilha);
        if pending.is_empty() {
            info!("✅ 表格中的所有案件都已处理过，程序结束");
            return Ok(RunSummary::default());
        }
        logging::log_pending_loaded(&pending);

        prepare_debug_folder(&config.debug_folder())?;
        let artifacts = DebugArtifacts::new(config.debug_folder());

        let driver = open_session().await?;
        let mut ctx = BatchContext::new(driver, pending, log);

        PortalLogin::new(config, artifacts.clone())
            .run(&mut ctx.driver)
            .await?;

        let processor = BatchProcessor::new(
            ProcessFlow::new(config.timeouts.clone(), artifacts),
            config.portal_home_url.clone(),
            config.timeouts.clone(),
        );
        let summary = processor.run(&mut ctx).await;

        logging::print_final_stats(&summary);
        Ok(summary)
    }
}

/// 一次批量运行的状态
///
/// 由编排层持有，驱动和日志按需借给流程层与服务层。
pub struct BatchContext<D> {
    /// 本次运行唯一的浏览器会话
    pub driver: D,
    /// 待处理的纯数字编号，保持表格顺序
    pub pending: Vec<String>,
    /// 已完成日志
    pub log: CompletionLog,
}

impl<D: BrowserDriver> BatchContext<D> {
    pub fn new(driver: D, pending: Vec<String>, log: CompletionLog) -> Self {
        Self {
            driver,
            pending,
            log,
        }
    }
}

/// 处理统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// 成功打开 PDF 查看器
    pub opened: usize,
    pub failed: usize,
    /// 同一次运行中已经完成过（表格里有重复行）
    pub skipped: usize,
    pub total: usize,
}

/// 串行处理待办列表
pub struct BatchProcessor {
    flow: ProcessFlow,
    home_url: String,
    timeouts: Timeouts,
}

impl BatchProcessor {
    pub fn new(flow: ProcessFlow, home_url: String, timeouts: Timeouts) -> Self {
        Self {
            flow,
            home_url,
            timeouts,
        }
    }

    pub async fn run<D: BrowserDriver>(&self, ctx: &mut BatchContext<D>) -> RunSummary {
        let BatchContext {
            driver,
            pending,
            log,
        } = ctx;

        let total = pending.len();
        let mut summary = RunSummary {
            total,
            ..Default::default()
        };

        for (i, number) in pending.iter().enumerate() {
            let pctx = ProcessCtx::new(number.as_str(), i + 1, total);
            logging::log_process_start(&pctx);

            if log.contains(number) {
                info!("{} 本次运行中已完成过，跳过", pctx);
                summary.skipped += 1;
                continue;
            }

            if i > 0 {
                self.reset_to_home(driver, &pctx).await;
            }

            let result = self.flow.run(driver, &pctx).await;
            if result.is_success() {
                summary.opened += 1;
                if let Err(e) = log.append(number) {
                    error!("{} ❌ PDF 已打开但写入完成日志失败: {}", pctx, e);
                }
            } else {
                summary.failed += 1;
                warn!("{} 未能打开 PDF 页面，下次运行会重试", pctx);
            }

            if i + 1 < total {
                let pause = self.timeouts.between_processes;
                info!("⏸️ 停顿 {:?} 后处理下一个案件...", pause);
                sleep(pause).await;
            }
        }

        summary
    }

    /// 回到门户首页，避免上一个案件留下的页面状态影响下一个
    async fn reset_to_home<D: BrowserDriver>(&self, driver: &mut D, pctx: &ProcessCtx) {
        info!("{} 🏠 回到门户首页: {}", pctx, self.home_url);
        match driver.navigate(&self.home_url).await {
            Ok(()) => sleep(self.timeouts.reset_pause).await,
            Err(e) => warn!("{} ⚠️ 回到门户首页失败: {:#}", pctx, e),
        }
    }
}

fn prepare_debug_folder(folder: &Path) -> AppResult<()> {
    if folder.exists() {
        info!("📂 调试目录: {}", folder.display());
        return Ok(());
    }
    std::fs::create_dir_all(folder).map_err(|source| {
        AppError::File(FileError::CreateDirFailed {
            path: folder.display().to_string(),
            source,
        })
    })?;
    info!("📂 已创建调试目录: {}", folder.display());
    Ok(())
}
