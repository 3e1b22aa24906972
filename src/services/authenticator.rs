//! 登录服务 - 业务能力层

use std::time::Duration;

use tracing::info;

use crate::browser::{SessionDriver, WaitCondition};
use crate::error::DriverResult;
use crate::site::{selectors, Site};

/// 登录凭据
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// 登录服务
///
/// 只负责填写并提交登录表单，不检查登录是否成功。
/// 凭据错误时，后续页面上找不到预期元素，各条目按可恢复失败跳过。
pub struct Authenticator {
    site: Site,
}

impl Authenticator {
    pub fn new(site: Site) -> Self {
        Self { site }
    }

    /// 登录
    ///
    /// 用户名输入框在 `timeout` 内没有出现时返回超时错误，这是整个流程中唯一不恢复的失败。
    pub async fn login(
        &self,
        driver: &dyn SessionDriver,
        credentials: &Credentials,
        timeout: Duration,
    ) -> DriverResult<()> {
        info!("🔐 导航到登录页...");
        driver.navigate(&self.site.login_url()).await?;

        driver
            .wait_for(selectors::LOGIN_USERNAME, WaitCondition::Visible, timeout)
            .await?;
        driver
            .type_text(selectors::LOGIN_USERNAME, &credentials.username)
            .await?;
        info!("用户名已输入");

        driver
            .type_text(selectors::LOGIN_PASSWORD, &credentials.password)
            .await?;
        info!("密码已输入");

        driver.click(selectors::LOGIN_BUTTON).await?;
        info!("已提交登录");
        Ok(())
    }
}
