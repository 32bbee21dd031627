use anyhow::Result;
use pje_pdf_opener::utils::logging;
use pje_pdf_opener::{App, Config};
use tracing::error;

#[tokio::main]
async fn main() {
    // 初始化日志
    logging::init();

    // 任何错误都只打印，不关闭浏览器，已打开的标签页留给人工处理
    if let Err(e) = run().await {
        error!("❌ 程序异常结束: {:?}", e);
    }
}

async fn run() -> Result<()> {
    // 加载配置
    let config = Config::from_env()?;

    // 运行应用
    App::new(config).run().await?;

    Ok(())
}
