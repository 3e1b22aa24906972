//! 目标站点约定
//!
//! 所有 URL 和选择器都集中在这里。站点结构变化时只需修改本模块，
//! 流程代码不受影响。

use regex::Regex;

use crate::models::CourseId;

/// 默认站点根地址
pub const DEFAULT_BASE_URL: &str = "https://lernplattform.mebis.bycs.de";

/// 表示“禁用”的下拉框取值
pub const DISABLED_OPTION_VALUE: &str = "0";

/// 页面选择器
pub mod selectors {
    /// 登录页：用户名输入框
    pub const LOGIN_USERNAME: &str = "#input-username";
    /// 登录页：密码输入框
    pub const LOGIN_PASSWORD: &str = "#input-password";
    /// 登录页：登录按钮
    pub const LOGIN_BUTTON: &str = "#button-do-log-in";

    /// 课程列表页：课程链接
    pub const COURSE_LINK: &str = "a[href*='course/view.php?id=']";

    /// 报名方式页：班级编辑链接
    pub const CLASS_EDIT_LINK: &str = "a[href*='enrol/editinstance.php?courseid=']";

    /// 班级编辑页
    pub const PAGE_BODY: &str = "body";
    pub const EXPAND_DETAILS: &str = "a#scrolltop";
    pub const TARGET_OPTION: &str = "#id_customint3";
    pub const SUBMIT_BUTTON: &str = "#id_submitbutton";
}

/// 站点地址与 ID 提取规则
#[derive(Debug, Clone)]
pub struct Site {
    base_url: String,
    course_id_pattern: Regex,
}

impl Site {
    pub fn new(base_url: impl Into<String>) -> Result<Self, regex::Error> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            base_url,
            course_id_pattern: Regex::new(r"id=(\d+)")?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn login_url(&self) -> String {
        format!("{}/login/index.php", self.base_url)
    }

    pub fn courses_url(&self) -> String {
        format!("{}/my/courses.php", self.base_url)
    }

    pub fn enrol_instances_url(&self, course_id: &CourseId) -> String {
        format!("{}/enrol/instances.php?id={}", self.base_url, course_id)
    }

    /// 从 URL 中提取课程 ID
    ///
    /// 课程链接和班级链接共用同一规则：取第一个 `id=<数字>`。
    /// 班级链接形如 `editinstance.php?courseid=12&id=34`，命中的是 `courseid`。
    pub fn course_id_from_url(&self, url: &str) -> Option<CourseId> {
        self.course_id_pattern
            .captures(url)
            .and_then(|caps| caps.get(1))
            .map(|m| CourseId::new(m.as_str()))
    }
}
