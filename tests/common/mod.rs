//! 测试用的假门户
//!
//! 用内存状态模拟标签页、元素和点击效果，记录驱动收到的每个动作。

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use pje_pdf_opener::models::portal::{login, panel};
use pje_pdf_opener::{BrowserDriver, ElementState, Timeouts};

pub const PANEL: &str = "painel";
pub const HOME_URL: &str = "https://pje1g.trf3.jus.br/pje/home.seam";
pub const CASE_URL: &str = "https://pje1g.trf3.jus.br/pje/Processo/ConsultaProcesso/Detalhe/listAutosDigitais.seam?id=1";
pub const VIEWER_URL: &str = "https://pje-downloads.trf3.jus.br/viewer/1";
pub const SSO_URL: &str = "https://sso.cloud.pje.jus.br/auth/realms/pje/login?client=pje1g.trf3.jus.br";

/// 驱动收到的动作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Navigate(String),
    Switch(String),
    Front(String),
    JsClick(String),
    Click(String),
    Type { xpath: String, text: String },
    SetValue { xpath: String, value: String, event: String },
    Scroll(String),
}

/// 点击后的效果
#[derive(Debug, Clone)]
pub enum Effect {
    /// 打开一个新标签页
    OpenTab(String),
    /// 当前标签页跳转
    Navigate(String),
    /// 再读取 `after_reads` 次标签页列表之后才出现的新标签页
    OpenTabLater { url: String, after_reads: usize },
}

#[derive(Debug, Default)]
pub struct State {
    pub handles: Vec<String>,
    pub current: String,
    pub urls: HashMap<String, String>,
    pub elements: HashMap<String, ElementState>,
    pub attributes: HashMap<(String, String), String>,
    pub effects: HashMap<String, Vec<Effect>>,
    pub actions: Vec<Action>,
    /// 快速访问能找到的编号（格式化后的形式）
    pub known_processes: HashSet<String>,
    pub last_quick_search: Option<String>,
    /// 为 true 时读取当前标签页句柄会失败
    pub lost_current_window: bool,
    delayed_tabs: Vec<(usize, String)>,
    next_tab: usize,
}

pub struct FakePortal {
    pub state: RefCell<State>,
}

impl FakePortal {
    /// 只有一个门户面板标签页的空白门户
    pub fn new() -> Self {
        let mut state = State::default();
        state.handles.push(PANEL.to_string());
        state.current = PANEL.to_string();
        state.urls.insert(PANEL.to_string(), HOME_URL.to_string());
        Self {
            state: RefCell::new(state),
        }
    }

    /// 首页、案件页和下载菜单都正常的门户
    pub fn happy_panel(known: &[&str]) -> Self {
        Self::new().with_panel(known)
    }

    /// 加上首页、案件页和下载菜单；`known` 是快速访问能找到的编号
    pub fn with_panel(self, known: &[&str]) -> Self {
        let portal = self
            .with_element(panel::MENU_TOGGLE, ElementState::Clickable)
            .with_element(panel::NAV_CONTAINER, ElementState::Visible)
            .with_element(panel::QUICK_SEARCH_INPUT, ElementState::Visible)
            .with_element(panel::DOWNLOAD_TRIGGER, ElementState::Clickable)
            .with_element(panel::DOWNLOAD_BUTTON, ElementState::Clickable)
            .on_js_click(panel::OPEN_PROCESS_SUGGESTION, Effect::OpenTab(CASE_URL.to_string()))
            .on_js_click(panel::DOWNLOAD_BUTTON, Effect::OpenTab(VIEWER_URL.to_string()));
        portal.state.borrow_mut().known_processes =
            known.iter().map(|k| k.to_string()).collect();
        portal
    }

    /// 入口页、SSO 和首页都正常的登录环境
    pub fn happy_login() -> Self {
        Self::new()
            .with_element(login::COOKIE_ACCEPT_BUTTON, ElementState::Clickable)
            .with_element(login::FIRST_INSTANCE_LINK, ElementState::Present)
            .with_attribute(login::FIRST_INSTANCE_LINK, "href", SSO_URL)
            .with_element(login::USERNAME_INPUT, ElementState::Visible)
            .with_element(login::PASSWORD_INPUT, ElementState::Visible)
            .with_element(login::SUBMIT_BUTTON, ElementState::Clickable)
            .on_click(login::SUBMIT_BUTTON, Effect::Navigate(HOME_URL.to_string()))
    }

    pub fn with_element(self, xpath: &str, state: ElementState) -> Self {
        self.state
            .borrow_mut()
            .elements
            .insert(xpath.to_string(), state);
        self
    }

    pub fn without_element(self, xpath: &str) -> Self {
        self.state.borrow_mut().elements.remove(xpath);
        self
    }

    pub fn with_attribute(self, xpath: &str, name: &str, value: &str) -> Self {
        self.state
            .borrow_mut()
            .attributes
            .insert((xpath.to_string(), name.to_string()), value.to_string());
        self
    }

    pub fn without_attribute(self, xpath: &str, name: &str) -> Self {
        self.state
            .borrow_mut()
            .attributes
            .remove(&(xpath.to_string(), name.to_string()));
        self
    }

    pub fn on_js_click(self, xpath: &str, effect: Effect) -> Self {
        self.add_effect(format!("js:{}", xpath), effect)
    }

    pub fn on_click(self, xpath: &str, effect: Effect) -> Self {
        self.add_effect(format!("native:{}", xpath), effect)
    }

    fn add_effect(self, key: String, effect: Effect) -> Self {
        self.state
            .borrow_mut()
            .effects
            .entry(key)
            .or_default()
            .push(effect);
        self
    }

    /// 模拟上一次尝试留下的标签页
    pub fn with_stale_tab(self, handle: &str, url: &str) -> Self {
        {
            let mut s = self.state.borrow_mut();
            s.handles.push(handle.to_string());
            s.urls.insert(handle.to_string(), url.to_string());
        }
        self
    }

    pub fn actions(&self) -> Vec<Action> {
        self.state.borrow().actions.clone()
    }

    pub fn current(&self) -> String {
        self.state.borrow().current.clone()
    }

    pub fn handles(&self) -> Vec<String> {
        self.state.borrow().handles.clone()
    }

    pub fn position(&self, action: &Action) -> Option<usize> {
        self.actions().iter().position(|a| a == action)
    }

    fn fire(&self, key: String) {
        let mut s = self.state.borrow_mut();
        let effects = s.effects.get(&key).cloned().unwrap_or_default();
        for effect in effects {
            match effect {
                Effect::OpenTab(url) => s.open_tab(url),
                Effect::Navigate(url) => {
                    let current = s.current.clone();
                    s.urls.insert(current, url);
                }
                Effect::OpenTabLater { url, after_reads } => {
                    s.delayed_tabs.push((after_reads, url));
                }
            }
        }
    }
}

impl State {
    fn open_tab(&mut self, url: String) {
        self.next_tab += 1;
        let handle = format!("tab-{}", self.next_tab);
        self.handles.push(handle.clone());
        self.urls.insert(handle, url);
    }

    /// 每读取一次标签页列表，延迟的标签页就近一步
    fn tick_delayed_tabs(&mut self) {
        let (due, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.delayed_tabs)
            .into_iter()
            .partition(|(reads, _)| *reads == 0);
        self.delayed_tabs = waiting
            .into_iter()
            .map(|(reads, url)| (reads - 1, url))
            .collect();
        for (_, url) in due {
            self.open_tab(url);
        }
    }
}

#[async_trait(?Send)]
impl BrowserDriver for FakePortal {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        let mut s = self.state.borrow_mut();
        s.actions.push(Action::Navigate(url.to_string()));
        let current = s.current.clone();
        s.urls.insert(current, url.to_string());
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        let s = self.state.borrow();
        Ok(s.urls.get(&s.current).cloned().unwrap_or_default())
    }

    async fn window_handles(&self) -> Result<Vec<String>> {
        let mut s = self.state.borrow_mut();
        s.tick_delayed_tabs();
        Ok(s.handles.clone())
    }

    async fn current_window(&self) -> Result<String> {
        let s = self.state.borrow();
        if s.lost_current_window {
            bail!("no such window");
        }
        Ok(s.current.clone())
    }

    async fn switch_to_window(&mut self, handle: &str) -> Result<()> {
        let mut s = self.state.borrow_mut();
        if !s.handles.iter().any(|h| h == handle) {
            bail!("标签页 {} 不存在", handle);
        }
        s.current = handle.to_string();
        s.actions.push(Action::Switch(handle.to_string()));
        Ok(())
    }

    async fn bring_to_front(&self) -> Result<()> {
        let mut s = self.state.borrow_mut();
        let current = s.current.clone();
        s.actions.push(Action::Front(current));
        Ok(())
    }

    async fn element_state(&self, xpath: &str) -> Result<ElementState> {
        let s = self.state.borrow();
        if xpath == panel::OPEN_PROCESS_SUGGESTION {
            let found = s
                .last_quick_search
                .as_ref()
                .is_some_and(|v| s.known_processes.contains(v));
            return Ok(if found {
                ElementState::Clickable
            } else {
                ElementState::Missing
            });
        }
        Ok(s.elements.get(xpath).copied().unwrap_or(ElementState::Missing))
    }

    async fn attribute(&self, xpath: &str, name: &str) -> Result<Option<String>> {
        let s = self.state.borrow();
        if !s.elements.contains_key(xpath) {
            return Err(anyhow!("找不到元素: {}", xpath));
        }
        Ok(s
            .attributes
            .get(&(xpath.to_string(), name.to_string()))
            .cloned())
    }

    async fn js_click(&self, xpath: &str) -> Result<()> {
        if self.element_state(xpath).await? == ElementState::Missing {
            bail!("找不到元素: {}", xpath);
        }
        self.state
            .borrow_mut()
            .actions
            .push(Action::JsClick(xpath.to_string()));
        self.fire(format!("js:{}", xpath));
        Ok(())
    }

    async fn click(&self, xpath: &str) -> Result<()> {
        if self.element_state(xpath).await? == ElementState::Missing {
            bail!("找不到元素: {}", xpath);
        }
        self.state
            .borrow_mut()
            .actions
            .push(Action::Click(xpath.to_string()));
        self.fire(format!("native:{}", xpath));
        Ok(())
    }

    async fn type_text(&self, xpath: &str, text: &str) -> Result<()> {
        self.state.borrow_mut().actions.push(Action::Type {
            xpath: xpath.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn set_value_and_dispatch(&self, xpath: &str, value: &str, event: &str) -> Result<()> {
        let mut s = self.state.borrow_mut();
        s.actions.push(Action::SetValue {
            xpath: xpath.to_string(),
            value: value.to_string(),
            event: event.to_string(),
        });
        if xpath == panel::QUICK_SEARCH_INPUT && event == "input" {
            s.last_quick_search = Some(value.to_string());
        }
        Ok(())
    }

    async fn scroll_into_view(&self, xpath: &str) -> Result<()> {
        self.state
            .borrow_mut()
            .actions
            .push(Action::Scroll(xpath.to_string()));
        Ok(())
    }

    async fn screenshot_png(&self) -> Result<Vec<u8>> {
        Ok(b"\x89PNG".to_vec())
    }

    async fn page_source(&self) -> Result<String> {
        Ok("<html><body>fake</body></html>".to_string())
    }
}

/// 测试用的短超时，所有停顿为零
pub fn fast_timeouts() -> Timeouts {
    Timeouts::uniform(Duration::from_millis(80), Duration::ZERO)
}

/// 调试目录中文件名以 `prefix` 开头的文件
pub fn artifacts_with_prefix(dir: &std::path::Path, prefix: &str) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .filter(|n| n.starts_with(prefix))
        .collect();
    names.sort();
    names
}

/// 工作目录指向 `base` 的配置，超时使用 [`fast_timeouts`]
pub fn test_config(base: &std::path::Path) -> pje_pdf_opener::Config {
    let base = base.display().to_string();
    let mut config = pje_pdf_opener::Config::from_lookup(|key| match key {
        "PJE_USER" => Some("12345678900".to_string()),
        "PJE_PASS" => Some("segredo".to_string()),
        "APSDJ_FOLDER_PATH" => Some(base.clone()),
        "PLANILHA_FILENAME" => Some("processos.xlsx".to_string()),
        _ => None,
    })
    .unwrap();
    config.timeouts = fast_timeouts();
    config
}
