//! 班级链接提取服务 - 业务能力层

use std::time::Duration;

use tracing::{info, warn};

use crate::browser::{SessionDriver, WaitCondition};
use crate::models::{ClassLink, CourseId};
use crate::site::{selectors, Site};

/// 班级链接提取服务
///
/// 打开课程的报名方式页，收集所有班级编辑链接。
pub struct ClassLinkExtractor {
    site: Site,
}

impl ClassLinkExtractor {
    pub fn new(site: Site) -> Self {
        Self { site }
    }

    /// 提取一个课程下的全部班级链接
    ///
    /// 任何失败都只影响本课程：记录警告并返回空列表。
    pub async fn extract(
        &self,
        driver: &dyn SessionDriver,
        course_id: &CourseId,
        timeout: Duration,
    ) -> Vec<ClassLink> {
        info!("[课程 {}] 导航到报名方式页...", course_id);
        if let Err(e) = driver
            .navigate(&self.site.enrol_instances_url(course_id))
            .await
        {
            warn!("[课程 {}] ⚠️ 打开报名方式页失败: {}", course_id, e);
            return Vec::new();
        }

        if let Err(e) = driver
            .wait_for(selectors::CLASS_EDIT_LINK, WaitCondition::Present, timeout)
            .await
        {
            warn!("[课程 {}] ⚠️ 没有找到班级链接: {}", course_id, e);
            return Vec::new();
        }

        match driver.hrefs(selectors::CLASS_EDIT_LINK).await {
            Ok(hrefs) => {
                info!("[课程 {}] 找到班级链接: {} 个", course_id, hrefs.len());
                hrefs.into_iter().map(ClassLink::new).collect()
            }
            Err(e) => {
                warn!("[课程 {}] ⚠️ 读取班级链接失败: {}", course_id, e);
                Vec::new()
            }
        }
    }
}
