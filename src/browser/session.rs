use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::Browser;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

use crate::browser::{SessionDriver, WaitCondition};
use crate::error::{DriverError, DriverResult};
use crate::infrastructure::{js_string, JsExecutor};

/// 轮询间隔
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// chromiumoxide 实现的浏览器会话
///
/// 启动的浏览器在 `close` 时整体退出；连接到的外部浏览器只关闭本会话的页面。
pub struct ChromeSession {
    browser: Browser,
    executor: JsExecutor,
    handler_task: JoinHandle<()>,
    owns_browser: bool,
    closed: bool,
}

impl ChromeSession {
    pub(crate) fn new(
        browser: Browser,
        executor: JsExecutor,
        handler_task: JoinHandle<()>,
        owns_browser: bool,
    ) -> Self {
        Self {
            browser,
            executor,
            handler_task,
            owns_browser,
            closed: false,
        }
    }

    fn ensure_open(&self) -> DriverResult<()> {
        if self.closed {
            Err(DriverError::Closed)
        } else {
            Ok(())
        }
    }

    async fn find(&self, selector: &str) -> DriverResult<chromiumoxide::Element> {
        self.executor
            .page()
            .find_element(selector)
            .await
            .map_err(|e| DriverError::ElementNotFound {
                selector: selector.to_string(),
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl SessionDriver for ChromeSession {
    async fn navigate(&self, url: &str) -> DriverResult<()> {
        self.ensure_open()?;
        debug!("导航到: {}", url);
        self.executor
            .page()
            .goto(url)
            .await
            .map_err(|e| DriverError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn wait_for(
        &self,
        selector: &str,
        condition: WaitCondition,
        limit: Duration,
    ) -> DriverResult<()> {
        self.ensure_open()?;
        let probe = condition.probe_script(selector);

        let polled = timeout(limit, async {
            loop {
                match self.executor.eval_as::<bool>(probe.as_str()).await {
                    Ok(true) => break,
                    Ok(false) => {}
                    // 页面跳转过程中执行上下文可能暂时不可用
                    Err(e) => debug!("检查 '{}' 失败，继续等待: {}", selector, e),
                }
                sleep(POLL_INTERVAL).await;
            }
        })
        .await;

        polled.map_err(|_| DriverError::timeout(selector, limit))
    }

    async fn click(&self, selector: &str) -> DriverResult<()> {
        self.ensure_open()?;
        self.find(selector).await?.click().await?;
        Ok(())
    }

    async fn type_text(&self, selector: &str, text: &str) -> DriverResult<()> {
        self.ensure_open()?;
        self.find(selector).await?.click().await?.type_str(text).await?;
        Ok(())
    }

    async fn set_value_and_notify(&self, selector: &str, value: &str) -> DriverResult<()> {
        self.ensure_open()?;
        let js_code = format!(
            r#"
            (() => {{
                const el = document.querySelector({selector});
                if (!el) return false;
                el.value = {value};
                el.dispatchEvent(new Event('change', {{ bubbles: true }}));
                return true;
            }})()
            "#,
            selector = js_string(selector),
            value = js_string(value),
        );

        let found: bool = self.executor.eval_as(js_code).await?;
        if found {
            Ok(())
        } else {
            Err(DriverError::ElementNotFound {
                selector: selector.to_string(),
                message: "设置取值时元素已不存在".to_string(),
            })
        }
    }

    async fn hrefs(&self, selector: &str) -> DriverResult<Vec<String>> {
        self.ensure_open()?;
        let js_code = format!(
            "Array.from(document.querySelectorAll({})).map(a => a.href).filter(h => !!h)",
            js_string(selector)
        );
        self.executor.eval_as(js_code).await
    }

    async fn close(&mut self) -> DriverResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let result = if self.owns_browser {
            info!("🛑 正在关闭浏览器...");
            match self.browser.close().await {
                Ok(_) => {
                    if let Err(e) = self.browser.wait().await {
                        warn!("等待浏览器进程退出失败: {}", e);
                    }
                    Ok(())
                }
                Err(e) => Err(DriverError::from(e)),
            }
        } else {
            info!("🛑 正在关闭会话页面...");
            self.executor
                .page()
                .clone()
                .close()
                .await
                .map_err(DriverError::from)
        };

        self.handler_task.abort();
        result
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        self.handler_task.abort();
    }
}
