//! PJe TRF3 门户的页面定位符与 URL 标记
//!
//! 门户改版时只需要改这里。

/// 登录相关
pub mod login {
    /// "接受全部 cookies" 按钮
    pub const COOKIE_ACCEPT_BUTTON: &str =
        "//button[@data-role='all' and .//span[contains(text(),'Aceitar todos os cookies')]]";
    /// 入口页上的"一审系统"链接
    pub const FIRST_INSTANCE_LINK: &str = "//a[contains(@href, 'pje1g.trf3.jus.br') and contains(normalize-space(), 'Sistema PJe - 1º Grau')]";
    /// 单点登录域名
    pub const SSO_DOMAIN: &str = "sso.cloud.pje.jus.br";
    pub const USERNAME_INPUT: &str = "//*[@id='username']";
    pub const PASSWORD_INPUT: &str = "//*[@id='password']";
    pub const SUBMIT_BUTTON: &str = "//*[@id='kc-login']";
    /// 登录成功后首页 URL 片段
    pub const HOME_URL_MARKER: &str = "home.seam";
    /// 首页上的导航容器，作为另一种登录成功标志
    pub const HOME_LANDMARK: &str = "//*[@id='menu']";
}

/// 快速访问与下载相关
pub mod panel {
    /// 汉堡菜单按钮
    pub const MENU_TOGGLE: &str = "//a[@title='Abrir menu' and contains(@class,'botao-menu')]";
    /// 主导航容器
    pub const NAV_CONTAINER: &str = "//nav[@id='menu']";
    /// 导航容器中的"快速访问"输入框
    pub const QUICK_SEARCH_INPUT: &str = "//nav[@id='menu']//input[@placeholder='Acesso rápido']";
    /// 快速访问结果里的"打开案件"建议
    pub const OPEN_PROCESS_SUGGESTION: &str =
        "//div[contains(@class,'resultado-busca')]//a[contains(@onclick, 'pesquisaRapida')]";
    /// 案件详情页 URL 片段
    pub const CASE_DETAIL_URL_MARKER: &str = "Detalhe/listAutosDigitais.seam";
    /// "下载案件卷宗" 按钮
    pub const DOWNLOAD_TRIGGER: &str = "//a[@title='Download autos do processo']";
    /// 下拉菜单中的 "Download" 按钮，点击后弹出 PDF 查看器标签页
    pub const DOWNLOAD_BUTTON: &str = "//div[contains(@class,'dropdown-menu')]//input[@value='Download']";
}
