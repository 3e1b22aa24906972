//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `run_orchestrator` - 运行编排器
//! - 计算待处理课程（候选课程减去已处理课程）
//! - 持有并释放浏览器会话
//! - 登录、收集班级链接、处理班级、写入进度
//!
//! ### `launcher` - 会话获取
//! - 启动新浏览器或连接已有浏览器
//!
//! ## 层次关系
//!
//! ```text
//! run_orchestrator (处理 Vec<CourseId>)
//!     ↓
//! workflow::ClassProcessor (处理单个 ClassLink)
//!     ↓
//! services (能力层：login / discovery / class links / progress)
//!     ↓
//! browser (基础设施：SessionDriver)
//! ```

pub mod launcher;
pub mod run_orchestrator;

pub use launcher::{ChromeLauncher, SessionLauncher};
pub use run_orchestrator::{App, RunReport};
