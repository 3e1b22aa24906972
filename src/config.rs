use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::models::CourseId;
use crate::site::DEFAULT_BASE_URL;

/// 默认配置文件
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";
/// 默认进度文件
pub const DEFAULT_PROGRESS_FILE: &str = "processed_course_ids.csv";
/// 提交后默认等待时间（毫秒）
const DEFAULT_SETTLE_MILLIS: u64 = 1000;

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    // --- 登录 ---
    pub username: String,
    pub password: String,
    // --- 运行模式 ---
    /// 每次浏览器等待的上限
    pub wait_time: Duration,
    /// 是否无头运行（固定 1920x1080 视口）
    pub headless: bool,
    /// 每次提交后的等待时间
    pub settle_time: Duration,
    /// 进度文件路径
    pub progress_file: PathBuf,
    /// 设置后连接已运行浏览器的调试端口，而不是启动新浏览器
    pub browser_debug_port: Option<u16>,
    pub chrome_executable: Option<PathBuf>,
    // --- 课程 ---
    /// 课程白名单，非空时跳过课程发现
    pub course_ids: Vec<CourseId>,
    // --- 站点 ---
    pub base_url: String,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    login: LoginSection,
    mode: ModeSection,
    #[serde(default)]
    courses: CoursesSection,
    #[serde(default)]
    site: SiteSection,
}

#[derive(Debug, Deserialize)]
struct LoginSection {
    username: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct ModeSection {
    waittime: u64,
    #[serde(default)]
    headless: Option<Flag>,
    settle_millis: Option<u64>,
    progress_file: Option<PathBuf>,
    debug_port: Option<u16>,
    chrome_executable: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct CoursesSection {
    course_ids: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SiteSection {
    base_url: Option<String>,
}

/// 布尔值既可以写成 TOML 布尔，也可以写成字符串
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Text(String),
}

impl Flag {
    fn as_bool(&self) -> bool {
        match self {
            Flag::Bool(b) => *b,
            Flag::Text(s) => parse_flag(s),
        }
    }
}

/// 只有 "true"（忽略大小写和空白）视为真
fn parse_flag(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

/// 解析逗号分隔的课程白名单，去掉空白项和重复项
pub fn parse_course_ids(raw: &str) -> Vec<CourseId> {
    let mut ids: Vec<CourseId> = Vec::new();
    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let id = CourseId::from(part);
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}

impl Config {
    /// 读取 `CONFIG_FILE`（默认 config.toml），再应用环境变量覆盖
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_with_overrides(&path, |key| std::env::var(key).ok())
    }

    /// 加载文件、应用覆盖项，最后校验合并后的结果
    pub fn load_with_overrides<F>(path: impl AsRef<Path>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::load(path)?;
        config.apply_overrides(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// 从 TOML 文件加载，不做校验
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content, &path.display().to_string())
    }

    /// 从 TOML 文本解析，`origin` 仅用于错误信息
    ///
    /// 环境变量还可能补全缺失的值，所以这里不校验。
    pub fn from_toml_str(content: &str, origin: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(content).map_err(|source| ConfigError::ParseFailed {
            path: origin.to_string(),
            source,
        })?;

        let config = Self {
            username: raw.login.username.trim().to_string(),
            password: raw.login.password,
            wait_time: Duration::from_secs(raw.mode.waittime),
            headless: raw.mode.headless.map(|f| f.as_bool()).unwrap_or(false),
            settle_time: Duration::from_millis(
                raw.mode.settle_millis.unwrap_or(DEFAULT_SETTLE_MILLIS),
            ),
            progress_file: raw
                .mode
                .progress_file
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PROGRESS_FILE)),
            browser_debug_port: raw.mode.debug_port,
            chrome_executable: raw.mode.chrome_executable,
            course_ids: raw
                .courses
                .course_ids
                .as_deref()
                .map(parse_course_ids)
                .unwrap_or_default(),
            base_url: raw
                .site
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        };
        Ok(config)
    }

    /// 应用 `MEBIS_*` 覆盖项
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(username) = lookup("MEBIS_USERNAME") {
            self.username = username.trim().to_string();
        }
        if let Some(password) = lookup("MEBIS_PASSWORD") {
            self.password = password;
        }
        if let Some(headless) = lookup("MEBIS_HEADLESS") {
            self.headless = parse_flag(&headless);
        }
        if let Some(value) = lookup("MEBIS_WAITTIME") {
            let secs: u64 = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::EnvVarParseFailed {
                    var_name: "MEBIS_WAITTIME".to_string(),
                    value: value.clone(),
                    expected_type: "u64".to_string(),
                })?;
            self.wait_time = Duration::from_secs(secs);
        }
        Ok(())
    }

    /// 检查必填项
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.username.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "login.username".to_string(),
                reason: "不能为空".to_string(),
            });
        }
        if self.wait_time.is_zero() {
            return Err(ConfigError::InvalidValue {
                key: "mode.waittime".to_string(),
                reason: "必须大于 0".to_string(),
            });
        }
        Ok(())
    }

    /// 是否配置了课程白名单
    pub fn has_allow_list(&self) -> bool {
        !self.course_ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const BLANK_USERNAME: &str = r#"
        [login]
        username = ""
        password = "p"
        [mode]
        waittime = 5
    "#;

    const FULL: &str = r#"
        [login]
        username = " teacher01 "
        password = "secret"

        [mode]
        waittime = 15
        headless = "True "
        settle_millis = 250
        progress_file = "state/done.csv"

        [courses]
        course_ids = "501, 502,,502 , "
    "#;

    #[test]
    fn test_parse_full_config() {
        let config = Config::from_toml_str(FULL, "test").unwrap();
        assert_eq!(config.username, "teacher01");
        assert_eq!(config.password, "secret");
        assert_eq!(config.wait_time, Duration::from_secs(15));
        assert!(config.headless);
        assert_eq!(config.settle_time, Duration::from_millis(250));
        assert_eq!(config.progress_file, PathBuf::from("state/done.csv"));
        assert_eq!(
            config.course_ids,
            vec![CourseId::from("501"), CourseId::from("502")]
        );
        assert!(config.has_allow_list());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_defaults_without_courses_section() {
        let config = Config::from_toml_str(
            r#"
            [login]
            username = "u"
            password = "p"
            [mode]
            waittime = 5
            headless = false
            "#,
            "test",
        )
        .unwrap();
        assert!(!config.headless);
        assert!(!config.has_allow_list());
        assert_eq!(config.progress_file, PathBuf::from(DEFAULT_PROGRESS_FILE));
        assert_eq!(config.settle_time, Duration::from_millis(DEFAULT_SETTLE_MILLIS));
        assert_eq!(config.browser_debug_port, None);
    }

    #[test]
    fn test_empty_course_list_means_discovery() {
        assert!(parse_course_ids(" , ,").is_empty());
    }

    #[test]
    fn test_headless_string_other_than_true_is_false() {
        assert!(!parse_flag("yes"));
        assert!(!parse_flag(""));
        assert!(parse_flag(" TRUE"));
    }

    #[test]
    fn test_zero_waittime_rejected() {
        let err = Config::from_toml_str(
            r#"
            [login]
            username = "u"
            password = "p"
            [mode]
            waittime = 0
            "#,
            "test",
        )
        .unwrap()
        .validate()
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_missing_login_section_is_parse_error() {
        let err = Config::from_toml_str("[mode]\nwaittime = 3\n", "test").unwrap_err();
        assert!(matches!(err, ConfigError::ParseFailed { .. }));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::from_toml_str(FULL, "test").unwrap();
        config
            .apply_overrides(|key| match key {
                "MEBIS_USERNAME" => Some("other".to_string()),
                "MEBIS_HEADLESS" => Some("false".to_string()),
                "MEBIS_WAITTIME" => Some("30".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.username, "other");
        assert_eq!(config.password, "secret");
        assert!(!config.headless);
        assert_eq!(config.wait_time, Duration::from_secs(30));
    }

    #[test]
    fn test_bad_waittime_override() {
        let mut config = Config::from_toml_str(FULL, "test").unwrap();
        let err = config
            .apply_overrides(|key| (key == "MEBIS_WAITTIME").then(|| "soon".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::EnvVarParseFailed { .. }));
    }

    #[test]
    fn test_blank_username_filled_by_override() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, BLANK_USERNAME).unwrap();

        let config = Config::load_with_overrides(&path, |key| {
            (key == "MEBIS_USERNAME").then(|| "alice".to_string())
        })
        .unwrap();
        assert_eq!(config.username, "alice");
    }

    #[test]
    fn test_blank_username_without_override_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, BLANK_USERNAME).unwrap();

        let err = Config::load_with_overrides(&path, |_| None).unwrap_err();
        match err {
            ConfigError::InvalidValue { key, .. } => assert_eq!(key, "login.username"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
