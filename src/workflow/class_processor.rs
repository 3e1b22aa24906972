//! 班级处理流程 - 流程层
//!
//! 每个班级链接独立走一遍状态机：
//!
//! ```text
//! Pending → Loaded → DetailExpanded → OptionCleared → Submitted → Recorded
//! ```
//!
//! 任一步失败只终止当前链接，继续处理下一个。

use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::browser::{SessionDriver, WaitCondition};
use crate::error::{DriverError, DriverResult};
use crate::models::{ClassLink, CourseId};
use crate::site::{selectors, Site, DISABLED_OPTION_VALUE};

/// 单个班级的处理状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassState {
    Pending,
    Loaded,
    DetailExpanded,
    OptionCleared,
    Submitted,
    Recorded,
}

impl fmt::Display for ClassState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ClassState::Pending => "待处理",
            ClassState::Loaded => "页面已加载",
            ClassState::DetailExpanded => "已展开详细设置",
            ClassState::OptionCleared => "选项已设为禁用",
            ClassState::Submitted => "已提交",
            ClassState::Recorded => "已记录",
        };
        f.write_str(name)
    }
}

/// 单个链接的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassOutcome {
    /// 修改已提交，课程 ID 已记录
    Recorded(CourseId),
    /// 修改已提交，但无法从链接中提取课程 ID（不回滚）
    Unrecorded,
    /// 在 `state` 之后的一步失败，链接被跳过
    Skipped { state: ClassState },
}

/// 一批链接的处理汇总
#[derive(Debug, Default)]
pub struct ProcessSummary {
    /// 至少有一个班级成功记录的课程
    pub course_ids: HashSet<CourseId>,
    pub submitted: usize,
    pub skipped: usize,
}

/// 班级处理器
pub struct ClassProcessor {
    site: Site,
    settle_time: Duration,
}

impl ClassProcessor {
    /// `settle_time`：每次提交后等待服务器处理的时间
    pub fn new(site: Site, settle_time: Duration) -> Self {
        Self { site, settle_time }
    }

    /// 依次处理所有链接
    pub async fn process_all(
        &self,
        driver: &dyn SessionDriver,
        links: &[ClassLink],
        timeout: Duration,
    ) -> ProcessSummary {
        let mut summary = ProcessSummary::default();

        for (index, link) in links.iter().enumerate() {
            info!("[班级 {}/{}] 处理: {}", index + 1, links.len(), link);

            match self.process_one(driver, link, timeout).await {
                ClassOutcome::Recorded(course_id) => {
                    summary.submitted += 1;
                    summary.course_ids.insert(course_id);
                }
                ClassOutcome::Unrecorded => summary.submitted += 1,
                ClassOutcome::Skipped { .. } => summary.skipped += 1,
            }
        }

        summary
    }

    /// 让一个链接走完状态机
    pub async fn process_one(
        &self,
        driver: &dyn SessionDriver,
        link: &ClassLink,
        timeout: Duration,
    ) -> ClassOutcome {
        let mut state = ClassState::Pending;

        loop {
            let step = match state {
                ClassState::Pending => self.load(driver, link, timeout).await,
                ClassState::Loaded => self.expand_details(driver, timeout).await,
                ClassState::DetailExpanded => self.clear_option(driver, timeout).await,
                ClassState::OptionCleared => self.submit(driver, timeout).await,
                ClassState::Submitted | ClassState::Recorded => {
                    // 给服务器留出处理时间
                    sleep(self.settle_time).await;
                    return self.record(link);
                }
            };

            match step {
                Ok(next) => {
                    debug!("{} → {}", state, next);
                    state = next;
                }
                Err(e) => {
                    log_step_failure(state, link, &e);
                    return ClassOutcome::Skipped { state };
                }
            }
        }
    }

    async fn load(
        &self,
        driver: &dyn SessionDriver,
        link: &ClassLink,
        timeout: Duration,
    ) -> DriverResult<ClassState> {
        driver.navigate(link.as_str()).await?;
        driver
            .wait_for(selectors::PAGE_BODY, WaitCondition::Present, timeout)
            .await?;
        Ok(ClassState::Loaded)
    }

    async fn expand_details(
        &self,
        driver: &dyn SessionDriver,
        timeout: Duration,
    ) -> DriverResult<ClassState> {
        driver
            .wait_for(selectors::EXPAND_DETAILS, WaitCondition::Clickable, timeout)
            .await?;
        driver.click(selectors::EXPAND_DETAILS).await?;
        info!("已展开详细设置");
        Ok(ClassState::DetailExpanded)
    }

    async fn clear_option(
        &self,
        driver: &dyn SessionDriver,
        timeout: Duration,
    ) -> DriverResult<ClassState> {
        driver
            .wait_for(selectors::TARGET_OPTION, WaitCondition::Present, timeout)
            .await?;
        driver
            .set_value_and_notify(selectors::TARGET_OPTION, DISABLED_OPTION_VALUE)
            .await?;
        info!("选项已设为禁用");
        Ok(ClassState::OptionCleared)
    }

    async fn submit(
        &self,
        driver: &dyn SessionDriver,
        timeout: Duration,
    ) -> DriverResult<ClassState> {
        driver
            .wait_for(selectors::SUBMIT_BUTTON, WaitCondition::Clickable, timeout)
            .await?;
        driver.click(selectors::SUBMIT_BUTTON).await?;
        info!("✓ 修改已保存");
        Ok(ClassState::Submitted)
    }

    fn record(&self, link: &ClassLink) -> ClassOutcome {
        match self.site.course_id_from_url(link.as_str()) {
            Some(course_id) => {
                debug!("{} → {}: 课程 {}", ClassState::Submitted, ClassState::Recorded, course_id);
                ClassOutcome::Recorded(course_id)
            }
            None => {
                warn!("⚠️ 无法从链接中提取课程 ID: {}", link);
                ClassOutcome::Unrecorded
            }
        }
    }
}

/// 提交失败一律记 ERROR；其他步骤超时记 WARN，非超时错误记 ERROR
fn log_step_failure(state: ClassState, link: &ClassLink, e: &DriverError) {
    let step = match state {
        ClassState::Pending => "加载页面",
        ClassState::Loaded => "展开详细设置",
        ClassState::DetailExpanded => "设置下拉框",
        _ => "提交修改",
    };

    if state == ClassState::OptionCleared || !e.is_timeout() {
        error!("❌ {}失败，跳过 {}: {}", step, link, e);
    } else {
        warn!("⚠️ {}超时，跳过 {}: {}", step, link, e);
    }
}
