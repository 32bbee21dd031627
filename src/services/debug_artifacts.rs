//! 失败现场保存 - 业务能力层
//!
//! 失败时把截图和页面源码写到调试目录，自身出错只记日志不向上抛

use std::path::PathBuf;

use tracing::{error, info};

use crate::infrastructure::BrowserDriver;

/// 调试现场写入器
#[derive(Debug, Clone)]
pub struct DebugArtifacts {
    folder: PathBuf,
}

impl DebugArtifacts {
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
        }
    }

    /// 保存截图，`include_html` 时同时保存页面源码
    ///
    /// 文件名为 `{stem}_{时间戳}.png/.html`，返回实际写成功的文件。
    pub async fn capture<D: BrowserDriver + ?Sized>(
        &self,
        driver: &D,
        stem: &str,
        include_html: bool,
    ) -> Vec<PathBuf> {
        let base = format!("{}_{}", stem, timestamp());
        let mut written = Vec::new();

        let png_path = self.folder.join(format!("{}.png", base));
        match driver.screenshot_png().await {
            Ok(bytes) => match tokio::fs::write(&png_path, bytes).await {
                Ok(()) => written.push(png_path),
                Err(e) => error!("保存截图失败 ({}): {}", png_path.display(), e),
            },
            Err(e) => error!("截图失败: {:#}", e),
        }

        if include_html {
            let html_path = self.folder.join(format!("{}.html", base));
            match driver.page_source().await {
                Ok(html) => match tokio::fs::write(&html_path, html).await {
                    Ok(()) => written.push(html_path),
                    Err(e) => error!("保存页面源码失败 ({}): {}", html_path.display(), e),
                },
                Err(e) => error!("读取页面源码失败: {:#}", e),
            }
        }

        if let Some(first) = written.first() {
            info!("🧾 调试现场已保存: {}", first.display());
        }
        written
    }
}

fn timestamp() -> String {
    chrono::Local::now().format("%Y%m%d%H%M%S").to_string()
}
