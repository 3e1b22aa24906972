//! 课程发现服务 - 业务能力层

use std::time::Duration;

use tracing::{info, warn};

use crate::browser::{SessionDriver, WaitCondition};
use crate::error::DriverResult;
use crate::models::CourseId;
use crate::site::{selectors, Site};

/// 课程发现服务
///
/// 从“我的课程”页面抓取课程链接，提取课程 ID。
pub struct CourseDiscovery {
    site: Site,
}

impl CourseDiscovery {
    pub fn new(site: Site) -> Self {
        Self { site }
    }

    /// 发现当前用户的课程
    ///
    /// 返回去重后的课程 ID，顺序与页面一致。等待超时视为没有课程，返回空列表；
    /// 导航等其他错误向上传递。
    pub async fn discover(
        &self,
        driver: &dyn SessionDriver,
        timeout: Duration,
    ) -> DriverResult<Vec<CourseId>> {
        info!("📚 导航到课程列表页...");
        driver.navigate(&self.site.courses_url()).await?;

        match driver
            .wait_for(selectors::COURSE_LINK, WaitCondition::Present, timeout)
            .await
        {
            Ok(()) => {}
            Err(e) if e.is_timeout() => {
                warn!("⚠️ 课程列表页上没有找到课程链接: {}", e);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        }

        let hrefs = driver.hrefs(selectors::COURSE_LINK).await?;
        info!("找到课程链接: {} 个", hrefs.len());

        let mut course_ids: Vec<CourseId> = Vec::new();
        for href in &hrefs {
            match self.site.course_id_from_url(href) {
                Some(id) if !course_ids.contains(&id) => course_ids.push(id),
                Some(_) => {}
                None => warn!("无法从链接中提取课程 ID: {}", href),
            }
        }

        info!("提取到课程 ID: {:?}", course_ids);
        Ok(course_ids)
    }
}
