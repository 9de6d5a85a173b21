//! # Result Analysis Module / 结果分析模块
//!
//! Reads each selected case's log and classifies it against the configured
//! pass and fail patterns.
//!
//! 读取每个选中用例的日志，并依据配置的通过和失败模式对其分类。

use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::core::config::{Patterns, RegressionConfig};
use crate::core::models::{CaseOutcome, CaseStatus, ExecResult};
use crate::infra::t;

/// Analyzes the logs of every case in `test_list`, in order.
///
/// 按顺序分析 `test_list` 中每个用例的日志。
///
/// # Errors / 错误
/// Fails only when a pattern does not compile or a log exists but cannot be
/// read. A missing log is reported as `NotRun`.
pub fn res_analysis(cfg: &RegressionConfig, test_list: &[String]) -> Result<ExecResult> {
    let patterns = cfg.compile_patterns()?;
    let outcomes = test_list
        .iter()
        .map(|case| analyze_case(cfg, &patterns, case))
        .collect::<Result<Vec<_>>>()?;
    Ok(ExecResult::new(outcomes))
}

/// Analyzes a single case's log file.
pub fn analyze_case(cfg: &RegressionConfig, patterns: &Patterns, case: &str) -> Result<CaseOutcome> {
    let log_path = cfg.case_log_path(case);
    let bytes = match fs::read(&log_path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Ok(CaseOutcome {
                name: case.to_string(),
                status: CaseStatus::NotRun,
                log_path,
                error_count: 0,
                first_error: None,
            });
        }
        Err(e) => {
            return Err(e).with_context(|| {
                t!("analysis.read_log_failed", path = log_path.display()).to_string()
            });
        }
    };

    let content = String::from_utf8_lossy(&bytes);
    let scan = scan_log(&content, patterns);
    Ok(scan.into_outcome(case, &log_path))
}

/// What a single pass over a log found.
/// 单次扫描日志的发现。
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LogScan {
    pub error_count: usize,
    pub first_error: Option<String>,
    pub passed: bool,
}

impl LogScan {
    pub fn status(&self) -> CaseStatus {
        if self.error_count > 0 {
            CaseStatus::Failed
        } else if self.passed {
            CaseStatus::Passed
        } else {
            CaseStatus::Incomplete
        }
    }

    fn into_outcome(self, case: &str, log_path: &Path) -> CaseOutcome {
        CaseOutcome {
            name: case.to_string(),
            status: self.status(),
            log_path: log_path.to_path_buf(),
            error_count: self.error_count,
            first_error: self.first_error,
        }
    }
}

/// Scans log text line by line. Fail patterns are checked before pass patterns
/// so a line can never count as both.
///
/// 逐行扫描日志文本。先检查失败模式再检查通过模式，因此一行不会同时计为两者。
pub fn scan_log(content: &str, patterns: &Patterns) -> LogScan {
    let mut scan = LogScan::default();
    for line in content.lines() {
        if patterns.fail.iter().any(|re| re.is_match(line)) {
            scan.error_count += 1;
            if scan.first_error.is_none() {
                scan.first_error = Some(line.trim().to_string());
            }
        } else if !scan.passed && patterns.pass.iter().any(|re| re.is_match(line)) {
            scan.passed = true;
        }
    }
    scan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::parse_config_str;
    use std::path::Path;

    fn patterns() -> Patterns {
        parse_config_str("[config]\nsim_mode = \"all\"\n", Path::new("."))
            .unwrap()
            .compile_patterns()
            .unwrap()
    }

    #[test]
    fn failure_beats_pass_marker() {
        let log = "start\nUVM_ERROR @ 100ns: mismatch\nTEST PASSED\n";
        let scan = scan_log(log, &patterns());
        assert_eq!(scan.status(), CaseStatus::Failed);
        assert_eq!(scan.error_count, 1);
        assert_eq!(scan.first_error.as_deref(), Some("UVM_ERROR @ 100ns: mismatch"));
    }

    #[test]
    fn pass_marker_without_errors_passes() {
        let scan = scan_log("run\nTEST PASSED\n", &patterns());
        assert_eq!(scan.status(), CaseStatus::Passed);
    }

    #[test]
    fn no_marker_is_incomplete() {
        let scan = scan_log("run\nstill running\n", &patterns());
        assert_eq!(scan.status(), CaseStatus::Incomplete);
    }

    #[test]
    fn error_word_matches_case_insensitively() {
        let scan = scan_log("Error: timeout waiting for ack\n", &patterns());
        assert_eq!(scan.status(), CaseStatus::Failed);
        let scan = scan_log("errors_total=0\nTEST PASSED\n", &patterns());
        assert_eq!(scan.status(), CaseStatus::Passed);
    }
}
