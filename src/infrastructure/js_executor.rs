//! JS 执行器 - 基础设施层
//!
//! 持有当前的 page 资源，只暴露"执行 JS"的能力

use anyhow::Result;
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

/// JS 执行器
///
/// 职责：
/// - 持有当前标签页的 Page
/// - 暴露 eval() 能力
/// - 提供按 XPath 定位元素后执行脚本的辅助方法
/// - 不认识案件 / 门户流程
pub struct JsExecutor {
    page: Page,
}

impl JsExecutor {
    /// 创建新的 JS 执行器
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// 获取 page 的引用（用于其他操作）
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// 执行 JS 代码并返回 JSON 结果
    pub async fn eval(&self, js_code: impl Into<String>) -> Result<JsonValue> {
        let result = self.page.evaluate(js_code.into()).await?;
        let json_value = result.into_value()?;
        Ok(json_value)
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> Result<T> {
        let json_value = self.eval(js_code).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }

    /// 用 XPath 找到第一个元素，在函数体中以 `el` 引用它
    ///
    /// 元素不存在时函数体拿到 `null`，由调用方的脚本自行处理。
    pub async fn eval_on_xpath<T: DeserializeOwned>(&self, xpath: &str, body: &str) -> Result<T> {
        let js_code = format!(
            r#"
            (() => {{
                const el = document.evaluate({}, document, null,
                    XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue;
                {}
            }})()
            "#,
            serde_json::to_string(xpath)?,
            body
        );
        self.eval_as(js_code).await
    }
}
