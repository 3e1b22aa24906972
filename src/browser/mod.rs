//! 浏览器会话边界
//!
//! 流程代码只依赖 [`SessionDriver`]，不直接接触 chromiumoxide。

pub mod connection;
pub mod headless;
pub mod session;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::DriverResult;
use crate::infrastructure::js_string;

pub use connection::connect_to_browser_and_page;
pub use headless::{launch_browser, LaunchOptions};
pub use session::ChromeSession;

/// 等待条件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitCondition {
    /// 至少有一个匹配元素存在于 DOM
    Present,
    /// 第一个匹配元素可见
    Visible,
    /// 第一个匹配元素可见且未禁用
    Clickable,
}

impl WaitCondition {
    /// 生成检查条件的 JS 表达式，返回 bool
    pub fn probe_script(self, selector: &str) -> String {
        let selector = js_string(selector);
        match self {
            WaitCondition::Present => {
                format!("document.querySelectorAll({selector}).length > 0")
            }
            WaitCondition::Visible | WaitCondition::Clickable => {
                let require_enabled = self == WaitCondition::Clickable;
                format!(
                    r#"
                    (() => {{
                        const el = document.querySelector({selector});
                        if (!el) return false;
                        const style = window.getComputedStyle(el);
                        const rect = el.getBoundingClientRect();
                        const visible = style.visibility !== 'hidden'
                            && style.display !== 'none'
                            && (rect.width > 0 || rect.height > 0);
                        if (!visible) return false;
                        return {require_enabled} ? !el.disabled : true;
                    }})()
                    "#
                )
            }
        }
    }
}

/// 单个浏览器会话的能力
///
/// 所有等待都有上限；超时返回 [`crate::error::DriverError::Timeout`]。
#[async_trait]
pub trait SessionDriver: Send + Sync {
    /// 导航到指定 URL
    async fn navigate(&self, url: &str) -> DriverResult<()>;

    /// 等待 `selector` 满足 `condition`，最多 `timeout`
    async fn wait_for(
        &self,
        selector: &str,
        condition: WaitCondition,
        timeout: Duration,
    ) -> DriverResult<()>;

    /// 点击第一个匹配元素
    async fn click(&self, selector: &str) -> DriverResult<()>;

    /// 向第一个匹配元素输入文本
    async fn type_text(&self, selector: &str, text: &str) -> DriverResult<()>;

    /// 设置表单控件的值并派发 change 事件，让页面上的监听器重新计算
    async fn set_value_and_notify(&self, selector: &str, value: &str) -> DriverResult<()>;

    /// 返回所有匹配链接的 href
    async fn hrefs(&self, selector: &str) -> DriverResult<Vec<String>>;

    /// 释放会话；重复调用无副作用
    async fn close(&mut self) -> DriverResult<()>;
}
