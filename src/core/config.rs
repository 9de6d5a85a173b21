//! # Configuration Module / 配置模块
//!
//! Defines the regression configuration loaded from `regression.toml` and the
//! loader that parses and validates it.
//!
//! 定义从 `regression.toml` 加载的回归配置，以及解析和校验它的加载器。

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::infra::{self, t};

/// The default location of the regression configuration.
/// 回归配置的默认位置。
pub const DEFAULT_CONFIG_PATH: &str = "./regression";

/// The file name looked up when the configuration path is a directory.
/// 当配置路径是目录时查找的文件名。
pub const CONFIG_FILE_NAME: &str = "regression.toml";

/// Selects which list of cases a campaign runs.
/// 选择回归活动运行哪一个用例列表。
///
/// Any string is accepted. Only the exact values `"part"` and `"all"` are
/// recognized; everything else is kept verbatim as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SimMode {
    /// Run `config.part_list`.
    Part,
    /// Run the whole `case.list` catalog.
    All,
    /// An unrecognized mode. Selects nothing.
    Other(String),
}

impl From<String> for SimMode {
    fn from(value: String) -> Self {
        match value.as_str() {
            "part" => SimMode::Part,
            "all" => SimMode::All,
            _ => SimMode::Other(value),
        }
    }
}

impl From<&str> for SimMode {
    fn from(value: &str) -> Self {
        SimMode::from(value.to_string())
    }
}

impl From<SimMode> for String {
    fn from(mode: SimMode) -> Self {
        mode.to_string()
    }
}

impl fmt::Display for SimMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimMode::Part => f.write_str("part"),
            SimMode::All => f.write_str("all"),
            SimMode::Other(raw) => f.write_str(raw),
        }
    }
}

/// The `[config]` section: what to run and how to run it.
/// `[config]` 部分：运行什么以及如何运行。
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimConfig {
    /// `"part"` or `"all"`.
    pub sim_mode: SimMode,
    /// Maximum number of cases dispatched at once. Defaults to half the CPUs plus one.
    /// 同时调度的最大用例数。默认为 CPU 数的一半加一。
    #[serde(default)]
    pub sim_num: Option<usize>,
    /// Cases to run in `part` mode, in order.
    /// `part` 模式下按顺序运行的用例。
    #[serde(default)]
    pub part_list: Vec<String>,
    /// Whether the campaign dispatches cases before analysis. Off by default.
    /// 回归活动是否在分析前调度用例。默认关闭。
    #[serde(default)]
    pub dispatch: bool,
    /// Command template used to run one case. `{case}` is replaced with the case name.
    /// 用于运行单个用例的命令模板。`{case}` 会被替换为用例名称。
    #[serde(default)]
    pub command: Option<String>,
    /// Working directory for dispatched commands.
    /// 调度命令的工作目录。
    #[serde(default)]
    pub work_dir: Option<PathBuf>,
    /// Optional per-case timeout in seconds.
    /// 可选的单个用例超时时间（秒）。
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// The `[case]` section: the full case catalog.
/// `[case]` 部分：完整的用例目录。
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CaseCatalog {
    #[serde(default)]
    pub list: Vec<String>,
}

/// The `[record]` section: where logs live and how to read them.
/// `[record]` 部分：日志位置以及如何解读日志。
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecordConfig {
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    /// Log file name template relative to `log_dir`; `{case}` is substituted.
    /// 相对于 `log_dir` 的日志文件名模板；会替换 `{case}`。
    #[serde(default = "default_log_file")]
    pub log_file: String,
    #[serde(default = "default_report_dir")]
    pub report_dir: PathBuf,
    /// Regexes that mark a log as passed.
    /// 标记日志为通过的正则表达式。
    #[serde(default = "default_pass_patterns")]
    pub pass_patterns: Vec<String>,
    /// Regexes that mark a log line as a failure. These win over pass patterns.
    /// 标记日志行为失败的正则表达式。优先于通过模式。
    #[serde(default = "default_fail_patterns")]
    pub fail_patterns: Vec<String>,
}

impl Default for RecordConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            log_file: default_log_file(),
            report_dir: default_report_dir(),
            pass_patterns: default_pass_patterns(),
            fail_patterns: default_fail_patterns(),
        }
    }
}

/// The complete regression configuration.
/// 完整的回归配置。
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegressionConfig {
    /// The language for the driver's output messages (e.g., "en", "zh-CN").
    /// 驱动输出消息的语言（例如 "en", "zh-CN"）。
    #[serde(default = "default_language")]
    pub language: String,
    pub config: SimConfig,
    #[serde(default)]
    pub case: CaseCatalog,
    #[serde(default)]
    pub record: RecordConfig,
    /// Directory that relative paths are resolved against. Set by the loader.
    /// 解析相对路径所依据的目录。由加载器设置。
    #[serde(skip)]
    pub base_dir: PathBuf,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("log")
}

fn default_log_file() -> String {
    "{case}.log".to_string()
}

fn default_report_dir() -> PathBuf {
    PathBuf::from("report")
}

fn default_pass_patterns() -> Vec<String> {
    vec!["TEST PASSED".to_string()]
}

fn default_fail_patterns() -> Vec<String> {
    vec![
        "UVM_ERROR".to_string(),
        "UVM_FATAL".to_string(),
        r"(?i)\berror\b".to_string(),
    ]
}

impl RegressionConfig {
    /// Resolves a configured path against the configuration's directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// The effective worker count: the configured `sim_num`, or half the CPUs
    /// plus one. Never below one.
    pub fn sim_num(&self) -> usize {
        self.config
            .sim_num
            .unwrap_or_else(|| num_cpus::get() / 2 + 1)
            .max(1)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.resolve(&self.record.log_dir)
    }

    pub fn report_dir(&self) -> PathBuf {
        self.resolve(&self.record.report_dir)
    }

    /// The log path analysis reads (and dispatch writes) for one case.
    /// 分析读取（以及调度写入）的单个用例日志路径。
    pub fn case_log_path(&self, case: &str) -> PathBuf {
        let file_name = self
            .record
            .log_file
            .replace("{case}", &infra::fs::sanitize_case_name(case));
        self.log_dir().join(file_name)
    }

    /// Where dispatch records the rendered command line for one case: the log
    /// path with `.cmd` appended.
    /// 调度记录单个用例渲染后命令行的位置：日志路径追加 `.cmd`。
    pub fn case_command_path(&self, case: &str) -> PathBuf {
        let mut path = self.case_log_path(case).into_os_string();
        path.push(".cmd");
        PathBuf::from(path)
    }

    pub fn work_dir(&self) -> PathBuf {
        match &self.config.work_dir {
            Some(dir) => self.resolve(dir),
            None => self.base_dir.clone(),
        }
    }

    /// Compiles the configured pass and fail patterns.
    /// 编译配置的通过和失败模式。
    pub fn compile_patterns(&self) -> Result<Patterns> {
        Ok(Patterns {
            pass: compile_all(&self.record.pass_patterns)?,
            fail: compile_all(&self.record.fail_patterns)?,
        })
    }
}

/// Compiled log patterns.
#[derive(Debug, Clone)]
pub struct Patterns {
    pub pass: Vec<Regex>,
    pub fail: Vec<Regex>,
}

fn compile_all(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| {
            Regex::new(p).with_context(|| t!("config.invalid_pattern", pattern = p).to_string())
        })
        .collect()
}

/// Parses a configuration from TOML text. Relative paths resolve against `base_dir`.
/// 从 TOML 文本解析配置。相对路径依据 `base_dir` 解析。
pub fn parse_config_str(content: &str, base_dir: &Path) -> Result<RegressionConfig> {
    let mut cfg: RegressionConfig =
        toml::from_str(content).with_context(|| t!("config.parse_failed").to_string())?;
    cfg.base_dir = base_dir.to_path_buf();
    cfg.compile_patterns()?;
    Ok(cfg)
}

/// Loads the regression configuration from a file, or from `regression.toml`
/// inside a directory.
///
/// 从文件加载回归配置，或从目录中的 `regression.toml` 加载。
///
/// # Errors / 错误
/// Fails when the file cannot be read, is not valid TOML, misses required
/// fields, or contains a pattern that is not a valid regex.
pub fn parse_config(path: &Path) -> Result<RegressionConfig> {
    let config_path = infra::fs::resolve_config_path(path)?;
    let content = fs::read_to_string(&config_path).with_context(|| {
        t!("config.read_failed", path = config_path.display()).to_string()
    })?;
    let base_dir = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    parse_config_str(&content, &base_dir)
        .with_context(|| t!("config.load_failed", path = config_path.display()).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_mode_is_exact_and_case_sensitive() {
        assert_eq!(SimMode::from("part"), SimMode::Part);
        assert_eq!(SimMode::from("all"), SimMode::All);
        assert_eq!(SimMode::from("ALL"), SimMode::Other("ALL".to_string()));
        assert_eq!(SimMode::from(" part"), SimMode::Other(" part".to_string()));
    }

    #[test]
    fn resolve_keeps_absolute_paths() {
        let cfg = parse_config_str(
            "[config]\nsim_mode = \"all\"\n",
            Path::new("/tmp/regression"),
        )
        .unwrap();
        assert_eq!(cfg.resolve(Path::new("log")), PathBuf::from("/tmp/regression/log"));
        assert_eq!(cfg.resolve(Path::new("/var/log")), PathBuf::from("/var/log"));
    }

    #[test]
    fn sim_num_is_at_least_one() {
        let cfg = parse_config_str(
            "[config]\nsim_mode = \"all\"\nsim_num = 0\n",
            Path::new("."),
        )
        .unwrap();
        assert_eq!(cfg.sim_num(), 1);
    }
}
