/// 日志工具模块
///
/// 初始化全局日志，并提供运行开始/结束时的输出
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化全局日志（只在启动时调用一次，重复调用无效果）
///
/// 默认级别 info，可用 `RUST_LOG` 覆盖。
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
///
/// # 参数
/// - `has_allow_list`: 是否使用课程白名单
/// - `wait_secs`: 每次等待的上限（秒）
/// - `progress_file`: 进度文件路径
pub fn log_startup(has_allow_list: bool, wait_secs: u64, progress_file: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 批量禁用班级报名选项");
    info!(
        "📋 课程来源: {}",
        if has_allow_list { "配置白名单" } else { "课程列表页" }
    );
    info!("⏱️ 等待上限: {} 秒", wait_secs);
    info!("📄 进度文件: {}", progress_file);
    info!("{}", "=".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `courses`: 本次处理的课程数
/// - `submitted`: 成功提交的班级数
/// - `skipped`: 跳过的班级数
/// - `recorded`: 新记录的课程数
pub fn print_final_stats(courses: usize, submitted: usize, skipped: usize, recorded: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("📚 课程: {}", courses);
    info!("✅ 班级提交成功: {}/{}", submitted, submitted + skipped);
    info!("❌ 班级跳过: {}", skipped);
    info!("📝 新记录课程: {}", recorded);
    info!("{}", "=".repeat(60));
}
