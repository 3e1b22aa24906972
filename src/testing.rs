//! 测试用的脚本化浏览器会话
//!
//! 按 URL 预置页面内容，记录所有调用，方便断言调用顺序。

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::browser::{SessionDriver, WaitCondition};
use crate::error::{DriverError, DriverResult};
use crate::site::selectors;

/// 调用记录，可在会话和启动器之间共享
pub type EventLog = Arc<Mutex<Vec<String>>>;

/// 单个页面的内容
#[derive(Debug, Clone, Default)]
pub struct FakePage {
    present: HashSet<String>,
    links: HashMap<String, Vec<String>>,
    failing_clicks: HashSet<String>,
}

impl FakePage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, selector: &str) -> Self {
        self.present.insert(selector.to_string());
        self
    }

    pub fn with_links(mut self, selector: &str, hrefs: &[&str]) -> Self {
        self.present.insert(selector.to_string());
        self.links.insert(
            selector.to_string(),
            hrefs.iter().map(|h| h.to_string()).collect(),
        );
        self
    }

    pub fn failing_click(mut self, selector: &str) -> Self {
        self.failing_clicks.insert(selector.to_string());
        self
    }

    pub fn without(mut self, selector: &str) -> Self {
        self.present.remove(selector);
        self
    }

    /// 登录页
    pub fn login() -> Self {
        Self::new()
            .with(selectors::LOGIN_USERNAME)
            .with(selectors::LOGIN_PASSWORD)
            .with(selectors::LOGIN_BUTTON)
    }

    /// 可以正常修改的班级编辑页
    pub fn editable_class() -> Self {
        Self::new()
            .with(selectors::PAGE_BODY)
            .with(selectors::EXPAND_DETAILS)
            .with(selectors::TARGET_OPTION)
            .with(selectors::SUBMIT_BUTTON)
    }
}

#[derive(Default)]
struct State {
    current_url: String,
    closed: bool,
}

/// 脚本化会话
pub struct ScriptedDriver {
    pages: HashMap<String, FakePage>,
    failing_navigation: HashSet<String>,
    events: EventLog,
    state: Mutex<State>,
}

impl ScriptedDriver {
    pub fn new() -> Self {
        Self::with_log(EventLog::default())
    }

    pub fn with_log(events: EventLog) -> Self {
        Self {
            pages: HashMap::new(),
            failing_navigation: HashSet::new(),
            events,
            state: Mutex::new(State::default()),
        }
    }

    pub fn page(mut self, url: impl Into<String>, page: FakePage) -> Self {
        self.pages.insert(url.into(), page);
        self
    }

    pub fn failing_navigation(mut self, url: impl Into<String>) -> Self {
        self.failing_navigation.insert(url.into());
        self
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn record(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }

    fn current_page(&self) -> DriverResult<FakePage> {
        let state = self.state.lock().unwrap();
        if state.closed {
            return Err(DriverError::Closed);
        }
        Ok(self.pages.get(&state.current_url).cloned().unwrap_or_default())
    }

    fn require(&self, selector: &str) -> DriverResult<FakePage> {
        let page = self.current_page()?;
        if page.present.contains(selector) {
            Ok(page)
        } else {
            Err(DriverError::ElementNotFound {
                selector: selector.to_string(),
                message: "not on page".to_string(),
            })
        }
    }
}

#[async_trait]
impl SessionDriver for ScriptedDriver {
    async fn navigate(&self, url: &str) -> DriverResult<()> {
        self.record(format!("navigate:{url}"));
        if self.failing_navigation.contains(url) {
            return Err(DriverError::Navigation {
                url: url.to_string(),
                message: "net::ERR_CONNECTION_RESET".to_string(),
            });
        }
        self.state.lock().unwrap().current_url = url.to_string();
        Ok(())
    }

    async fn wait_for(
        &self,
        selector: &str,
        _condition: WaitCondition,
        timeout: Duration,
    ) -> DriverResult<()> {
        let page = self.current_page()?;
        if page.present.contains(selector) {
            Ok(())
        } else {
            Err(DriverError::timeout(selector, timeout))
        }
    }

    async fn click(&self, selector: &str) -> DriverResult<()> {
        let page = self.require(selector)?;
        if page.failing_clicks.contains(selector) {
            return Err(DriverError::Script("element click intercepted".to_string()));
        }
        self.record(format!("click:{selector}"));
        Ok(())
    }

    async fn type_text(&self, selector: &str, text: &str) -> DriverResult<()> {
        self.require(selector)?;
        self.record(format!("type:{selector}={text}"));
        Ok(())
    }

    async fn set_value_and_notify(&self, selector: &str, value: &str) -> DriverResult<()> {
        self.require(selector)?;
        self.record(format!("set:{selector}={value}"));
        Ok(())
    }

    async fn hrefs(&self, selector: &str) -> DriverResult<Vec<String>> {
        let page = self.current_page()?;
        Ok(page.links.get(selector).cloned().unwrap_or_default())
    }

    async fn close(&mut self) -> DriverResult<()> {
        let mut state = self.state.lock().unwrap();
        if !state.closed {
            state.closed = true;
            drop(state);
            self.record("close".to_string());
        }
        Ok(())
    }
}
