//! 日志工具模块
//!
//! 提供日志初始化和格式化输出的辅助函数

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::orchestrator::RunSummary;
use crate::workflow::ProcessCtx;

/// 初始化 tracing，默认 info 级别，可用 RUST_LOG 覆盖
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

fn now() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// 记录程序启动信息
pub fn log_startup() {
    info!("{}", "=".repeat(60));
    info!("🚀 PJe TRF3 PDF 打开工具启动（快速访问模式）");
    info!("开始时间: {}", now());
    info!("{}", "=".repeat(60));
}

/// 记录待处理列表
pub fn log_pending_loaded(pending: &[String]) {
    info!("✓ 找到 {} 个待处理的案件", pending.len());
    let preview: Vec<&str> = pending.iter().take(5).map(String::as_str).collect();
    info!("📋 前几个案件: {:?}", preview);
}

/// 记录单个案件开始
pub fn log_process_start(ctx: &ProcessCtx) {
    info!("\n{}", "─".repeat(60));
    info!(
        "▶️ 开始处理第 {}/{} 个案件: '{}'",
        ctx.index, ctx.total, ctx.process_number
    );
}

/// 打印最终统计信息
pub fn print_final_stats(summary: &RunSummary) {
    info!("\n{}", "=".repeat(60));
    info!("📊 表格中的案件都已尝试");
    info!("完成时间: {}", now());
    info!("{}", "=".repeat(60));
    info!("✅ 已打开: {}/{}", summary.opened, summary.total);
    info!("❌ 失败: {}", summary.failed);
    if summary.skipped > 0 {
        info!("⏭️ 跳过: {}", summary.skipped);
    }
    info!("{}", "=".repeat(60));
    info!("💡 浏览器会保持打开，PDF 标签页留给人工处理，可以直接关闭本窗口");
}
