use std::fmt::{self, Display};

use tracing::warn;

/// 单个案件流程中可能失败的步骤
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowStep {
    /// 把编号转成快速访问需要的格式
    Format,
    /// 记下门户面板标签页
    LocatePanel,
    /// 在快速访问输入框中填入编号
    QuickSearch,
    /// 点击"打开案件"建议
    OpenSuggestion,
    /// 等待案件详情标签页
    AwaitCaseTab,
    /// 打开下载菜单并点击 Download
    OpenDownloadMenu,
    /// 等待 PDF 查看器标签页
    AwaitViewerTab,
}

impl Display for FlowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FlowStep::Format => "格式化编号",
            FlowStep::LocatePanel => "定位门户面板",
            FlowStep::QuickSearch => "快速访问",
            FlowStep::OpenSuggestion => "打开案件建议",
            FlowStep::AwaitCaseTab => "等待案件标签页",
            FlowStep::OpenDownloadMenu => "打开下载菜单",
            FlowStep::AwaitViewerTab => "等待 PDF 查看器",
        };
        f.write_str(name)
    }
}

/// 失败后可以继续的交互，只有这两种
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionalStep {
    /// 登录入口页的 cookie 同意框
    CookieConsent,
    /// 门户首页的汉堡菜单
    ExpandMenu,
}

impl Display for OptionalStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OptionalStep::CookieConsent => "Cookie 同意框",
            OptionalStep::ExpandMenu => "展开菜单",
        };
        f.write_str(name)
    }
}

/// 可选交互的失败只记警告，流程继续
///
/// 返回交互是否完成。
pub fn tolerate<E: Display>(step: OptionalStep, result: Result<(), E>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            warn!("⚠️ {} 未完成，继续: {:#}", step, e);
            false
        }
    }
}
