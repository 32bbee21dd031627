use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Duration;

use chromiumoxide::{Browser, Page};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, BrowserError};
use crate::infrastructure::{wait_until, ChromeDriver, Wait};

/// 自行启动浏览器后等待调试端口就绪的上限
const LAUNCH_READY_TIMEOUT: Duration = Duration::from_secs(20);

/// 打开本次运行唯一的浏览器会话
///
/// 优先连接已经在调试端口上运行的浏览器；连接不上时以分离进程方式启动一个
/// 有界面的浏览器再连接。两种情况下程序退出都不会关闭浏览器。
pub async fn open_session(config: &Config) -> AppResult<ChromeDriver> {
    let port = config.browser_debug_port;

    let (browser, page) = match connect_to_browser_and_page(port).await {
        Ok(pair) => {
            info!("✓ 已连接到正在运行的浏览器 (端口 {})", port);
            pair
        }
        Err(e) => {
            debug!("连接现有浏览器失败: {}", e);
            info!("🚀 未发现可用浏览器，正在启动新的浏览器...");
            launch_detached_browser(&config.browser_executable, port, &config.debug_folder())?;
            wait_for_debug_port(port).await?
        }
    };

    Ok(ChromeDriver::new(browser, page))
}

/// 连接到浏览器并获取一个页面
pub async fn connect_to_browser_and_page(port: u16) -> AppResult<(Browser, Page)> {
    let browser_url = format!("http://localhost:{}", port);
    debug!("正在连接到浏览器: {}", browser_url);

    let (browser, mut handler) = Browser::connect(&browser_url)
        .await
        .map_err(|e| AppError::browser_connection_failed(port, e))?;

    // 在后台处理浏览器事件
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 添加短暂延迟以等待浏览器状态同步
    sleep(Duration::from_millis(300)).await;

    let pages = browser
        .pages()
        .await
        .map_err(|e| AppError::browser_connection_failed(port, e))?;
    debug!("获取到 {} 个页面", pages.len());

    let page = match pages.into_iter().next() {
        Some(page) => page,
        None => browser.new_page("about:blank").await.map_err(|e| {
            error!("创建空白页面失败: {}", e);
            AppError::Browser(BrowserError::NoPage)
        })?,
    };

    Ok((browser, page))
}

/// 以分离进程启动浏览器并打开远程调试端口
fn launch_detached_browser(executable: &str, port: u16, profile_parent: &Path) -> AppResult<()> {
    let profile_dir = profile_parent.join("browser-profile");
    let args = vec![
        format!("--remote-debugging-port={}", port),
        format!("--user-data-dir={}", profile_dir.display()),
        "--no-sandbox".to_string(),
        "--disable-dev-shm-usage".to_string(),
        "--start-maximized".to_string(),
        "--disable-blink-features=AutomationControlled".to_string(),
        "--disable-popup-blocking".to_string(),
        "--disable-gpu".to_string(),
        "--no-first-run".to_string(),
        "--no-default-browser-check".to_string(),
        "about:blank".to_string(),
    ];
    debug!("启动参数: {:?}", args);

    // 不保留 Child，进程在程序退出后继续运行
    Command::new(executable)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|source| {
            AppError::Browser(BrowserError::LaunchFailed {
                executable: executable.to_string(),
                source,
            })
        })?;

    info!("✓ 浏览器进程已启动: {}", executable);
    Ok(())
}

async fn wait_for_debug_port(port: u16) -> AppResult<(Browser, Page)> {
    let wait = Wait::new(LAUNCH_READY_TIMEOUT, Duration::from_millis(500));
    wait_until("浏览器调试端口", wait, || async move {
        let pair = connect_to_browser_and_page(port).await?;
        Ok::<_, anyhow::Error>(Some(pair))
    })
    .await
    .map_err(|e| {
        warn!("⚠️ 调试端口一直不可用: {}", e);
        AppError::Browser(BrowserError::DebugPortUnavailable {
            port,
            waited: LAUNCH_READY_TIMEOUT,
        })
    })
}
