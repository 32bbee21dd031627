//! 门户登录 - 业务能力层
//!
//! 入口页 → (cookie 同意框) → 一审系统链接 → SSO → 填写账号密码 → 门户首页。
//! 单次尝试，不重试；失败时保存截图和页面源码。

use std::fmt;

use anyhow::Result;
use tokio::time::sleep;
use tracing::{error, info};

use crate::config::{Config, Timeouts};
use crate::error::{LoginError, WaitError};
use crate::infrastructure::{
    wait_for_element, wait_for_url, wait_until, BrowserDriver, ElementState, Wait,
};
use crate::models::portal::login as sel;
use crate::services::DebugArtifacts;
use crate::workflow::{tolerate, OptionalStep};

/// 门户账号
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// 门户登录流程
pub struct PortalLogin {
    entry_url: String,
    credentials: Credentials,
    timeouts: Timeouts,
    artifacts: DebugArtifacts,
}

impl PortalLogin {
    pub fn new(config: &Config, artifacts: DebugArtifacts) -> Self {
        Self {
            entry_url: config.portal_entry_url.clone(),
            credentials: Credentials {
                username: config.portal_user.clone(),
                password: config.portal_password.clone(),
            },
            timeouts: config.timeouts.clone(),
            artifacts,
        }
    }

    /// 执行登录
    ///
    /// 返回 `Ok` 时驱动停在门户首页。
    pub async fn run<D: BrowserDriver>(&self, driver: &mut D) -> Result<(), LoginError> {
        let outcome = self.steps(driver).await;
        let Err(e) = outcome else {
            return Ok(());
        };

        let url = driver.current_url().await.unwrap_or_default();
        error!("当前 URL: {}", url);
        let (err, tag) = match e.downcast::<WaitError>() {
            Ok(source) => {
                error!("❌ 登录超时: {}", source);
                (LoginError::Timeout { url, source }, "timeout")
            }
            Err(source) => {
                error!("❌ 登录时发生意外错误: {:#}", source);
                (LoginError::Unexpected { url, source }, "erro")
            }
        };

        self.artifacts
            .capture(&*driver, &format!("debug_pje_login_{}", tag), true)
            .await;
        Err(err)
    }

    async fn steps<D: BrowserDriver>(&self, driver: &mut D) -> Result<()> {
        let t = &self.timeouts;

        info!("🌐 打开门户入口页: {}", self.entry_url);
        driver.navigate(&self.entry_url).await?;
        sleep(t.entry_settle).await;

        let cookie = self.accept_cookies(&*driver).await;
        tolerate(OptionalStep::CookieConsent, cookie);

        info!("🔍 查找 'Sistema PJe - 1º Grau' 链接...");
        let wait = self.wait(t.sso_link);
        wait_for_element(&*driver, sel::FIRST_INSTANCE_LINK, ElementState::Present, wait).await?;
        match driver.attribute(sel::FIRST_INSTANCE_LINK, "href").await? {
            Some(href) if !href.trim().is_empty() => {
                info!("✓ 找到链接，直接导航: {}", href);
                driver.navigate(&href).await?;
            }
            _ => {
                error!("链接没有 href，改为脚本点击");
                driver.js_click(sel::FIRST_INSTANCE_LINK).await?;
            }
        }

        let sso_url = wait_for_url(&*driver, sel::SSO_DOMAIN, self.wait(t.sso_redirect)).await?;
        info!("✓ 已跳转到 SSO: {}", sso_url);
        sleep(t.sso_settle).await;

        let wait = self.wait(t.login_field);
        wait_for_element(&*driver, sel::USERNAME_INPUT, ElementState::Visible, wait).await?;
        driver.type_text(sel::USERNAME_INPUT, &self.credentials.username).await?;
        info!("✓ 已输入用户 '{}'", self.credentials.username);

        wait_for_element(&*driver, sel::PASSWORD_INPUT, ElementState::Visible, wait).await?;
        driver.type_text(sel::PASSWORD_INPUT, &self.credentials.password).await?;
        info!("✓ 已输入密码");

        let wait = self.wait(t.login_button);
        wait_for_element(&*driver, sel::SUBMIT_BUTTON, ElementState::Clickable, wait).await?;
        driver.scroll_into_view(sel::SUBMIT_BUTTON).await?;
        sleep(t.submit_settle).await;
        driver.click(sel::SUBMIT_BUTTON).await?;
        info!("✓ 已点击登录按钮，等待门户首页...");

        let home_wait = self.wait(t.home);
        let d = &*driver;
        let landing = wait_until("门户首页", home_wait, move || async move {
            let url = d.current_url().await?;
            if url.contains(sel::HOME_URL_MARKER) {
                return Ok(Some(url));
            }
            let state = d.element_state(sel::HOME_LANDMARK).await?;
            Ok::<_, anyhow::Error>(state.satisfies(ElementState::Present).then_some(url))
        })
        .await?;

        info!("✅ 登录成功! URL: {}", landing);
        Ok(())
    }

    async fn accept_cookies<D: BrowserDriver>(&self, driver: &D) -> Result<()> {
        let t = &self.timeouts;
        info!("🍪 查找 cookie 同意按钮...");
        let wait = self.wait(t.cookie_consent);
        wait_for_element(driver, sel::COOKIE_ACCEPT_BUTTON, ElementState::Clickable, wait).await?;
        driver.js_click(sel::COOKIE_ACCEPT_BUTTON).await?;
        info!("✓ 已接受 cookies");
        sleep(t.cookie_settle).await;
        Ok(())
    }

    fn wait(&self, timeout: std::time::Duration) -> Wait {
        Wait::new(timeout, self.timeouts.poll_interval)
    }
}
