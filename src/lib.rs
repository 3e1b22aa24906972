//! # Mebis Enrol Disabler
//!
//! 批量关闭学习平台上各课程班级的一项报名设置，并记录已处理的课程，
//! 重复运行只处理新课程。
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Browser / Infrastructure）
//! - `browser/` - `SessionDriver` 能力边界与 chromiumoxide 实现
//! - `infrastructure/` - `JsExecutor`，唯一的 page owner
//! - `site` - 目标站点的 URL 和选择器
//!
//! ### ② 业务能力层（Services）
//! - `ProgressStore` - 已处理课程的追加式记录
//! - `Authenticator` - 登录
//! - `CourseDiscovery` - 从课程列表页发现课程
//! - `ClassLinkExtractor` - 收集课程下的班级链接
//!
//! ### ③ 流程层（Workflow）
//! - `ClassProcessor` - 单个班级的状态机
//!
//! ### ④ 编排层（Orchestration）
//! - `App` - 一次完整运行

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod site;
pub mod utils;
pub mod workflow;

#[cfg(test)]
pub(crate) mod testing;

// 重新导出常用类型
pub use browser::{SessionDriver, WaitCondition};
pub use config::Config;
pub use error::{ConfigError, DriverError, DriverResult, ProgressError};
pub use models::{ClassLink, CourseId};
pub use orchestrator::{App, RunReport};
