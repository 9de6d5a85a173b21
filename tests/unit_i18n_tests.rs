//! # I18n Unit Tests / I18n 单元测试
//!
//! Tests locale resolution and the localized strings the library exposes.
//!
//! 测试语言环境解析以及库中暴露的本地化字符串。

use regression_driver::models::{CaseStatus, RunRecord, RunStatus};
use regression_driver::resolve_locale;
use std::path::PathBuf;
use std::time::Duration;

#[cfg(test)]
mod locale_resolution_tests {
    use super::*;

    #[test]
    fn test_exact_locales_are_kept() {
        assert_eq!(resolve_locale("en"), "en");
        assert_eq!(resolve_locale("zh-CN"), "zh-CN");
    }

    #[test]
    fn test_language_prefix_matches() {
        assert_eq!(resolve_locale("en-US"), "en");
        assert_eq!(resolve_locale("en_GB"), "en");
        assert_eq!(resolve_locale("zh"), "zh-CN");
        assert_eq!(resolve_locale("zh_TW"), "zh-CN");
    }

    #[test]
    fn test_unknown_locales_fall_back_to_english() {
        assert_eq!(resolve_locale("fr-FR"), "en");
        assert_eq!(resolve_locale(""), "en");
        assert_eq!(resolve_locale("invalid-lang"), "en");
    }
}

#[cfg(test)]
mod translation_tests {
    use super::*;

    #[test]
    fn test_case_status_in_both_languages() {
        let statuses = [
            CaseStatus::Passed,
            CaseStatus::Failed,
            CaseStatus::Incomplete,
            CaseStatus::NotRun,
        ];
        for status in statuses {
            let en = status.get_status_str("en");
            let zh = status.get_status_str("zh-CN");
            assert!(!en.is_empty());
            assert!(!zh.is_empty());
            assert_ne!(en, zh, "{status:?} is not translated");
        }
        assert_eq!(CaseStatus::Failed.get_status_str("en"), "Failed");
    }

    #[test]
    fn test_interpolated_exit_code() {
        let record = RunRecord {
            case: "a".to_string(),
            status: RunStatus::Failed(Some(42)),
            duration: Duration::ZERO,
            log_path: PathBuf::from("a.log"),
        };
        assert!(record.get_status_str("en").contains("42"));
        assert!(record.get_status_str("zh-CN").contains("42"));
    }

    #[test]
    fn test_unknown_locale_uses_fallback_strings() {
        assert_eq!(CaseStatus::Passed.get_status_str("xx"), "Passed");
    }

    #[test]
    fn test_concurrent_lookups() {
        let handles: Vec<_> = (0..10)
            .map(|i| {
                std::thread::spawn(move || {
                    let locale = if i % 2 == 0 { "en" } else { "zh-CN" };
                    (locale, CaseStatus::Passed.get_status_str(locale))
                })
            })
            .collect();

        for handle in handles {
            let (locale, result) = handle.join().unwrap();
            let expected = if locale == "en" { "Passed" } else { "通过" };
            assert_eq!(result, expected);
        }
    }
}
