//! # PJe PDF Opener
//!
//! 根据表格中的案件编号，登录 PJe TRF3 门户，逐个通过"快速访问"打开案件，
//! 并把 PDF 查看器标签页留在浏览器里供人工查看。
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（浏览器标签页），只暴露能力
//! - `BrowserDriver` - 浏览器自动化能力，流程只依赖这个 trait
//! - `ChromeDriver` / `JsExecutor` - 基于 chromiumoxide 的实现
//! - `wait_until` - 统一的轮询等待原语
//! - `browser/` - 连接或启动本次运行唯一的浏览器
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `PortalLogin` - 门户单点登录
//! - `CompletionLog` - 已完成案件日志
//! - `DebugArtifacts` - 失败时保存截图和页面源码
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个案件"的完整处理流程
//! - `ProcessCtx` - 上下文封装（编号 + 序号）
//! - `ProcessFlow` - 快速访问 → 案件标签页 → 下载菜单 → PDF 查看器
//! - `TabSnapshot` - 新标签页检测（先快照，后差集）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 表格减去日志得到待办，登录一次后串行处理
//!
//! ## 模块结构

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use browser::open_session;
pub use config::{Config, Timeouts};
pub use error::{AppError, AppResult};
pub use infrastructure::{BrowserDriver, ChromeDriver, ElementState};
pub use models::CaseParts;
pub use orchestrator::{App, BatchContext, BatchProcessor, RunSummary};
pub use services::{CompletionLog, DebugArtifacts, PortalLogin};
pub use workflow::{ProcessCtx, ProcessFlow, ProcessResult};
