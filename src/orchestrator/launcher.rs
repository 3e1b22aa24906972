//! 浏览器会话的获取方式

use async_trait::async_trait;

use crate::browser::{self, ChromeSession, LaunchOptions, SessionDriver};
use crate::config::Config;
use crate::error::DriverResult;

/// 创建一次运行所用的浏览器会话
#[async_trait]
pub trait SessionLauncher: Send + Sync {
    type Session: SessionDriver;

    async fn launch(&self) -> DriverResult<Self::Session>;
}

/// 启动 Chrome，或连接到已开启调试端口的浏览器
pub struct ChromeLauncher {
    options: LaunchOptions,
    debug_port: Option<u16>,
}

impl ChromeLauncher {
    pub fn new(config: &Config) -> Self {
        Self {
            options: LaunchOptions::from(config),
            debug_port: config.browser_debug_port,
        }
    }
}

#[async_trait]
impl SessionLauncher for ChromeLauncher {
    type Session = ChromeSession;

    async fn launch(&self) -> DriverResult<ChromeSession> {
        match self.debug_port {
            Some(port) => browser::connect_to_browser_and_page(port).await,
            None => browser::launch_browser(&self.options).await,
        }
    }
}
