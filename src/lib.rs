//! # Regression Driver Library / 回归驱动库
//!
//! This library provides the core functionality for the regression driver,
//! a configuration-driven orchestrator for regression-test campaigns.
//!
//! 此库为回归驱动工具提供核心功能，
//! 这是一个配置驱动的回归测试活动编排器。
//!
//! ## Modules / 模块
//!
//! - `core` - Configuration, case selection, dispatch, log analysis and fault linking
//! - `infra` - Infrastructure services like command execution and file system operations
//! - `reporting` - Console, HTML and on-disk report output
//! - `cli` - Command-line interface and commands
//!
//! - `core` - 配置、用例选择、调度、日志分析和故障关联
//! - `infra` - 基础设施服务，如命令执行和文件系统操作
//! - `reporting` - 控制台、HTML 和磁盘报告输出
//! - `cli` - 命令行接口和命令

pub mod core;
pub mod infra;
pub mod reporting;
pub mod cli;

// Re-export commonly used items
pub use core::config;
pub use core::driver;
pub use core::models;

/// Initializes the application's internationalization (i18n) based on the system locale.
///
/// This function detects the user's system locale and sets the appropriate
/// language for the application's user interface. It attempts to match the full
/// locale (e.g., "zh-CN"), then just the language code (e.g., "en"), and
/// finally falls back to the default language ("en").
pub fn init() {
    let locale = sys_locale::get_locale().unwrap_or_else(|| "en".to_string());
    rust_i18n::set_locale(&resolve_locale(&locale));
}

/// Maps a requested locale onto one of the bundled locales.
/// 将请求的语言环境映射到内置的语言环境之一。
pub fn resolve_locale(requested: &str) -> String {
    let available_locales = rust_i18n::available_locales!();

    if available_locales.contains(&requested) {
        return requested.to_string();
    }
    requested
        .split(['-', '_'])
        .next()
        .and_then(|lang_code| {
            available_locales
                .iter()
                .find(|l| l.split('-').next() == Some(lang_code))
        })
        .map(|l| l.to_string())
        .unwrap_or_else(|| "en".to_string())
}

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");
