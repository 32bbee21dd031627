use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Deserializer};

use crate::error::ConfigError;

/// 调试截图与页面源码存放的子目录
pub const DEBUG_FOLDER_NAME: &str = "ProcessosBaixadosPJE_TRF3";
/// 已完成案件日志文件名
pub const COMPLETION_LOG_NAME: &str = "pje_trf3_processos_baixados_log.txt";

/// 程序配置
#[derive(Clone)]
pub struct Config {
    /// 门户用户名 (CPF)
    pub portal_user: String,
    /// 门户密码
    pub portal_password: String,
    /// 工作目录，表格、日志和调试目录都在这里
    pub base_folder: PathBuf,
    /// 表格文件名
    pub spreadsheet_filename: String,
    /// 门户入口页
    pub portal_entry_url: String,
    /// 登录后的门户首页，每个案件开始前都会回到这里
    pub portal_home_url: String,
    /// 浏览器调试端口
    pub browser_debug_port: u16,
    /// 需要自行启动浏览器时使用的可执行文件
    pub browser_executable: String,
    /// 各步骤的超时和停顿
    pub timeouts: Timeouts,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("portal_user", &self.portal_user)
            .field("portal_password", &"***")
            .field("base_folder", &self.base_folder)
            .field("spreadsheet_filename", &self.spreadsheet_filename)
            .field("portal_entry_url", &self.portal_entry_url)
            .field("portal_home_url", &self.portal_home_url)
            .field("browser_debug_port", &self.browser_debug_port)
            .field("browser_executable", &self.browser_executable)
            .field("timeouts", &self.timeouts)
            .finish()
    }
}

impl Config {
    pub const DEFAULT_ENTRY_URL: &'static str = "https://www.trf3.jus.br/pje/acesso-ao-sistema";
    pub const DEFAULT_HOME_URL: &'static str = "https://pje1g.trf3.jus.br/pje/home.seam";
    pub const DEFAULT_DEBUG_PORT: u16 = 9222;

    /// 从 `.env` 和环境变量读取配置
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 用任意键值来源构造配置
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| {
            optional(key).ok_or_else(|| ConfigError::EnvVarNotFound {
                var_name: key.to_string(),
            })
        };

        let browser_debug_port = match optional("BROWSER_DEBUG_PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::EnvVarParseFailed {
                    var_name: "BROWSER_DEBUG_PORT".to_string(),
                    value: raw.clone(),
                    expected_type: "u16".to_string(),
                })?,
            None => Self::DEFAULT_DEBUG_PORT,
        };

        let timeouts = match optional("TIMEOUTS_FILE") {
            Some(path) => Timeouts::from_file(Path::new(&path))?,
            None => Timeouts::default(),
        };

        Ok(Self {
            portal_user: required("PJE_USER")?,
            portal_password: required("PJE_PASS")?,
            base_folder: PathBuf::from(required("APSDJ_FOLDER_PATH")?),
            spreadsheet_filename: required("PLANILHA_FILENAME")?,
            portal_entry_url: optional("PJE_ENTRY_URL")
                .unwrap_or_else(|| Self::DEFAULT_ENTRY_URL.to_string()),
            portal_home_url: optional("URL_PJE_TRF3_HOME")
                .unwrap_or_else(|| Self::DEFAULT_HOME_URL.to_string()),
            browser_debug_port,
            browser_executable: optional("BROWSER_EXECUTABLE")
                .unwrap_or_else(|| default_browser_executable().to_string()),
            timeouts,
        })
    }

    pub fn spreadsheet_path(&self) -> PathBuf {
        self.base_folder.join(&self.spreadsheet_filename)
    }

    pub fn debug_folder(&self) -> PathBuf {
        self.base_folder.join(DEBUG_FOLDER_NAME)
    }

    pub fn completion_log_path(&self) -> PathBuf {
        self.base_folder.join(COMPLETION_LOG_NAME)
    }
}

#[cfg(windows)]
fn default_browser_executable() -> &'static str {
    r"C:\Program Files\Google\Chrome\Application\chrome.exe"
}

#[cfg(target_os = "macos")]
fn default_browser_executable() -> &'static str {
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome"
}

#[cfg(not(any(windows, target_os = "macos")))]
fn default_browser_executable() -> &'static str {
    "google-chrome"
}

/// 各步骤的等待上限与固定停顿
///
/// 可选步骤的超时短，依赖网络跳转的步骤超时长。
/// TOML 中以秒为单位，缺省的键保留默认值。
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    // --- 等待上限 ---
    #[serde(deserialize_with = "secs")]
    pub cookie_consent: Duration,
    #[serde(deserialize_with = "secs")]
    pub menu: Duration,
    #[serde(deserialize_with = "secs")]
    pub sso_link: Duration,
    #[serde(deserialize_with = "secs")]
    pub sso_redirect: Duration,
    #[serde(deserialize_with = "secs")]
    pub login_field: Duration,
    #[serde(deserialize_with = "secs")]
    pub login_button: Duration,
    #[serde(deserialize_with = "secs")]
    pub home: Duration,
    #[serde(deserialize_with = "secs")]
    pub quick_search_input: Duration,
    #[serde(deserialize_with = "secs")]
    pub suggestion: Duration,
    #[serde(deserialize_with = "secs")]
    pub case_tab: Duration,
    #[serde(deserialize_with = "secs")]
    pub case_url: Duration,
    #[serde(deserialize_with = "secs")]
    pub download_trigger: Duration,
    #[serde(deserialize_with = "secs")]
    pub download_button: Duration,
    #[serde(deserialize_with = "secs")]
    pub viewer_tab: Duration,
    #[serde(deserialize_with = "secs")]
    pub poll_interval: Duration,
    /// 看到新标签页后复查标签页数量前的等待
    #[serde(deserialize_with = "secs")]
    pub new_tab_grace: Duration,

    // --- 固定停顿 ---
    #[serde(deserialize_with = "secs")]
    pub entry_settle: Duration,
    #[serde(deserialize_with = "secs")]
    pub cookie_settle: Duration,
    #[serde(deserialize_with = "secs")]
    pub sso_settle: Duration,
    #[serde(deserialize_with = "secs")]
    pub submit_settle: Duration,
    #[serde(deserialize_with = "secs")]
    pub home_settle: Duration,
    #[serde(deserialize_with = "secs")]
    pub menu_settle: Duration,
    #[serde(deserialize_with = "secs")]
    pub search_settle: Duration,
    #[serde(deserialize_with = "secs")]
    pub download_menu_settle: Duration,
    #[serde(deserialize_with = "secs")]
    pub viewer_settle: Duration,
    #[serde(deserialize_with = "secs")]
    pub reset_pause: Duration,
    #[serde(deserialize_with = "secs")]
    pub between_processes: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            cookie_consent: Duration::from_secs(10),
            menu: Duration::from_secs(10),
            sso_link: Duration::from_secs(20),
            sso_redirect: Duration::from_secs(30),
            login_field: Duration::from_secs(30),
            login_button: Duration::from_secs(20),
            home: Duration::from_secs(60),
            quick_search_input: Duration::from_secs(15),
            suggestion: Duration::from_secs(30),
            case_tab: Duration::from_secs(90),
            case_url: Duration::from_secs(45),
            download_trigger: Duration::from_secs(30),
            download_button: Duration::from_secs(20),
            viewer_tab: Duration::from_secs(90),
            poll_interval: Duration::from_millis(500),
            new_tab_grace: Duration::from_secs(1),

            entry_settle: Duration::from_secs(3),
            cookie_settle: Duration::from_secs(2),
            sso_settle: Duration::from_secs(2),
            submit_settle: Duration::from_millis(500),
            home_settle: Duration::from_secs(15),
            menu_settle: Duration::from_secs(2),
            search_settle: Duration::from_secs(7),
            download_menu_settle: Duration::from_millis(2500),
            viewer_settle: Duration::from_secs(15),
            reset_pause: Duration::from_secs(5),
            between_processes: Duration::from_secs(10),
        }
    }
}

impl Timeouts {
    /// 从 TOML 文件加载
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::InvalidTimeoutsFile {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        Self::from_toml_str(&content).map_err(|reason| ConfigError::InvalidTimeoutsFile {
            path: path.display().to_string(),
            reason,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// 所有等待上限取同一个值，所有停顿取同一个值（用于演练和测试）
    pub fn uniform(timeout: Duration, pause: Duration) -> Self {
        Self {
            cookie_consent: timeout,
            menu: timeout,
            sso_link: timeout,
            sso_redirect: timeout,
            login_field: timeout,
            login_button: timeout,
            home: timeout,
            quick_search_input: timeout,
            suggestion: timeout,
            case_tab: timeout,
            case_url: timeout,
            download_trigger: timeout,
            download_button: timeout,
            viewer_tab: timeout,
            poll_interval: pause.max(Duration::from_millis(1)),
            new_tab_grace: pause,

            entry_settle: pause,
            cookie_settle: pause,
            sso_settle: pause,
            submit_settle: pause,
            home_settle: pause,
            menu_settle: pause,
            search_settle: pause,
            download_menu_settle: pause,
            viewer_settle: pause,
            reset_pause: pause,
            between_processes: pause,
        }
    }
}

fn secs<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    let value = f64::deserialize(deserializer)?;
    Duration::try_from_secs_f64(value).map_err(serde::de::Error::custom)
}
