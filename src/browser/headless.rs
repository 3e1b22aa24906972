use std::path::PathBuf;

use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::browser::ChromeSession;
use crate::config::Config;
use crate::error::{DriverError, DriverResult};
use crate::infrastructure::JsExecutor;

/// 无头模式下的固定视口
const VIEWPORT: (u32, u32) = (1920, 1080);

/// 启动参数
#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    pub headless: bool,
    pub chrome_executable: Option<PathBuf>,
}

impl From<&Config> for LaunchOptions {
    fn from(config: &Config) -> Self {
        Self {
            headless: config.headless,
            chrome_executable: config.chrome_executable.clone(),
        }
    }
}

impl LaunchOptions {
    fn to_browser_config(&self) -> DriverResult<BrowserConfig> {
        let mut builder = BrowserConfig::builder();

        if self.headless {
            builder = builder
                .new_headless_mode()
                .window_size(VIEWPORT.0, VIEWPORT.1)
                .viewport(Viewport {
                    width: VIEWPORT.0,
                    height: VIEWPORT.1,
                    ..Viewport::default()
                })
                .args(vec![
                    "--no-sandbox",            // 容器环境下避免沙盒权限问题
                    "--disable-dev-shm-usage", // 防止共享内存不足
                ]);
        } else {
            builder = builder.with_head();
        }

        if let Some(path) = &self.chrome_executable {
            builder = builder.chrome_executable(path);
        }

        builder.build().map_err(|e| {
            error!("配置浏览器失败: {}", e);
            DriverError::Launch(e)
        })
    }
}

/// 启动新的浏览器并打开空白页
pub async fn launch_browser(options: &LaunchOptions) -> DriverResult<ChromeSession> {
    info!(
        "🚀 启动浏览器 ({})...",
        if options.headless { "无头模式" } else { "窗口模式" }
    );

    let config = options.to_browser_config()?;

    let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
        error!("启动浏览器失败: {}", e);
        DriverError::Launch(e.to_string())
    })?;
    debug!("浏览器启动成功");

    // 在后台处理浏览器事件
    let handler_task = tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 添加短暂延迟以等待浏览器状态同步
    sleep(tokio::time::Duration::from_millis(300)).await;

    let page = browser.new_page("about:blank").await.map_err(|e| {
        error!("创建页面失败: {}", e);
        DriverError::Launch(e.to_string())
    })?;

    info!("✅ 浏览器已就绪");
    Ok(ChromeSession::new(
        browser,
        JsExecutor::new(page),
        handler_task,
        true,
    ))
}
