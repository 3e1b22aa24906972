//! 运行编排器 - 编排层
//!
//! ## 职责
//!
//! 1. **进度读取**：读取已处理的课程 ID
//! 2. **候选课程**：白名单优先，没有白名单时登录后从课程列表页发现
//! 3. **资源管理**：唯一持有浏览器会话，任何退出路径都只释放一次
//! 4. **向下委托**：班级链接提取、班级处理都交给下层
//! 5. **进度写入**：所有班级处理完成后最多写一次进度文件
//!
//! ## 顺序约束
//!
//! 创建会话 → 登录 → 课程发现。课程发现必须在登录之后。

use std::collections::HashSet;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::browser::SessionDriver;
use crate::config::Config;
use crate::models::{ClassLink, CourseId};
use crate::orchestrator::launcher::{ChromeLauncher, SessionLauncher};
use crate::services::{
    Authenticator, ClassLinkExtractor, CourseDiscovery, Credentials, ProgressStore,
};
use crate::site::Site;
use crate::utils::logging;
use crate::workflow::ClassProcessor;

/// 一次运行的统计
#[derive(Debug, Default, Clone)]
pub struct RunReport {
    /// 候选课程数量（白名单或发现结果）
    pub candidates: usize,
    /// 候选课程中已处理过的数量
    pub already_processed: usize,
    /// 本次实际处理的课程
    pub to_process: Vec<CourseId>,
    pub class_links: usize,
    pub submitted: usize,
    pub skipped: usize,
    /// 本次新记录的课程
    pub recorded: HashSet<CourseId>,
}

impl RunReport {
    /// 有待处理课程却一个班级链接都没找到，通常是登录没有成功
    pub fn found_no_class_links(&self) -> bool {
        self.class_links == 0 && !self.to_process.is_empty()
    }
}

/// 应用主结构
pub struct App<L: SessionLauncher = ChromeLauncher> {
    config: Config,
    launcher: L,
    progress: ProgressStore,
    authenticator: Authenticator,
    discovery: CourseDiscovery,
    extractor: ClassLinkExtractor,
    processor: ClassProcessor,
}

impl App<ChromeLauncher> {
    /// 使用真实浏览器初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        let launcher = ChromeLauncher::new(&config);
        Self::with_launcher(config, launcher)
    }
}

impl<L: SessionLauncher> App<L> {
    pub fn with_launcher(config: Config, launcher: L) -> Result<Self> {
        let site = Site::new(config.base_url.clone())
            .with_context(|| format!("无法构建站点配置: {}", config.base_url))?;

        Ok(Self {
            progress: ProgressStore::new(config.progress_file.clone()),
            authenticator: Authenticator::new(site.clone()),
            discovery: CourseDiscovery::new(site.clone()),
            extractor: ClassLinkExtractor::new(site.clone()),
            processor: ClassProcessor::new(site, config.settle_time),
            launcher,
            config,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<RunReport> {
        logging::log_startup(
            self.config.has_allow_list(),
            self.config.wait_time.as_secs(),
            &self.progress.path().display().to_string(),
        );

        let processed = self.progress.read_all()?;

        let mut report = RunReport::default();
        if self.config.has_allow_list() {
            let to_process = subtract(&self.config.course_ids, &processed, &mut report);
            info!("白名单课程 (过滤后): {:?}", to_process);
            if to_process.is_empty() {
                info!("✓ 白名单中的课程都已处理过，无需启动浏览器");
                return Ok(report);
            }
        }

        let mut session = self.launcher.launch().await.context("无法创建浏览器会话")?;

        let result = self.run_session(&session, &processed, report).await;

        // 无论成功与否都释放会话
        if let Err(e) = session.close().await {
            warn!("关闭浏览器会话失败: {}", e);
        }

        let report = result?;
        logging::print_final_stats(
            report.to_process.len(),
            report.submitted,
            report.skipped,
            report.recorded.len(),
        );
        Ok(report)
    }

    async fn run_session(
        &self,
        driver: &dyn SessionDriver,
        processed: &HashSet<CourseId>,
        mut report: RunReport,
    ) -> Result<RunReport> {
        let credentials = Credentials {
            username: self.config.username.clone(),
            password: self.config.password.clone(),
        };
        self.authenticator
            .login(driver, &credentials, self.config.wait_time)
            .await
            .context("登录页面未能加载")?;

        if !self.config.has_allow_list() {
            let discovered = self
                .discovery
                .discover(driver, self.config.wait_time)
                .await
                .context("课程发现失败")?;
            let to_process = subtract(&discovered, processed, &mut report);
            info!("本次需要处理的课程: {:?}", to_process);
        }

        // 收集所有班级链接
        let mut all_links: Vec<ClassLink> = Vec::new();
        for course_id in &report.to_process {
            let links = self
                .extractor
                .extract(driver, course_id, self.config.wait_time)
                .await;
            all_links.extend(links);
        }
        report.class_links = all_links.len();
        info!("📋 共找到 {} 个班级链接", all_links.len());

        if report.found_no_class_links() {
            // 登录结果不做校验，凭据错误时会表现为处处找不到元素
            warn!("⚠️ 所有课程都没有找到班级链接，请检查登录凭据是否正确");
        }

        let summary = self
            .processor
            .process_all(driver, &all_links, self.config.wait_time)
            .await;
        report.submitted = summary.submitted;
        report.skipped = summary.skipped;

        if summary.course_ids.is_empty() {
            info!("没有进行任何修改");
        } else {
            self.progress.append_new(&summary.course_ids)?;
            info!(
                "✅ 已记录 {} 个处理完成的课程到 {}",
                summary.course_ids.len(),
                self.progress.path().display()
            );
        }
        report.recorded = summary.course_ids;

        Ok(report)
    }
}

/// 候选课程减去已处理课程，保持候选顺序
fn subtract(
    candidates: &[CourseId],
    processed: &HashSet<CourseId>,
    report: &mut RunReport,
) -> Vec<CourseId> {
    let to_process: Vec<CourseId> = candidates
        .iter()
        .filter(|id| !processed.contains(*id))
        .cloned()
        .collect();

    report.candidates = candidates.len();
    report.already_processed = candidates.len() - to_process.len();
    report.to_process = to_process.clone();
    to_process
}
