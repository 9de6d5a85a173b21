//! # Data Models Module / 数据模型模块
//!
//! This module defines the data structures produced by a campaign: dispatch
//! records, per-case analysis outcomes, the aggregated execution result and
//! the fault-link report.
//!
//! 此模块定义了回归活动产生的数据结构：调度记录、单个用例的分析结果、
//! 汇总的执行结果以及故障关联报告。

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::infra::t;

/// How a dispatched case process ended.
/// 调度的用例进程如何结束。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    /// The command exited with status zero.
    Succeeded,
    /// The command exited with a non-zero status. `None` when killed by a signal.
    Failed(Option<i32>),
    /// The command exceeded `timeout_secs` and was killed.
    TimedOut,
    /// The campaign was interrupted before or while this case ran.
    Cancelled,
    /// The command could not be rendered or spawned.
    SpawnFailed(String),
}

/// The record of one dispatched case.
/// 单个已调度用例的记录。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub case: String,
    pub status: RunStatus,
    pub duration: Duration,
    pub log_path: PathBuf,
}

impl RunRecord {
    pub fn is_success(&self) -> bool {
        self.status == RunStatus::Succeeded
    }

    pub fn get_status_str(&self, locale: &str) -> String {
        match &self.status {
            RunStatus::Succeeded => t!("dispatch.status_succeeded", locale = locale).to_string(),
            RunStatus::Failed(Some(code)) => {
                t!("dispatch.status_exit_code", locale = locale, code = code).to_string()
            }
            RunStatus::Failed(None) => t!("dispatch.status_killed", locale = locale).to_string(),
            RunStatus::TimedOut => t!("dispatch.status_timeout", locale = locale).to_string(),
            RunStatus::Cancelled => t!("dispatch.status_cancelled", locale = locale).to_string(),
            RunStatus::SpawnFailed(_) => {
                t!("dispatch.status_spawn_failed", locale = locale).to_string()
            }
        }
    }
}

/// The verdict analysis reaches for one case's log.
/// 分析对单个用例日志得出的结论。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    /// A pass marker was found and no fail pattern matched.
    Passed,
    /// At least one fail pattern matched.
    Failed,
    /// The log exists but holds neither a failure nor a pass marker.
    Incomplete,
    /// No log was found for the case.
    NotRun,
}

impl CaseStatus {
    pub fn get_status_str(&self, locale: &str) -> String {
        match self {
            CaseStatus::Passed => t!("report.status_passed", locale = locale).to_string(),
            CaseStatus::Failed => t!("report.status_failed", locale = locale).to_string(),
            CaseStatus::Incomplete => t!("report.status_incomplete", locale = locale).to_string(),
            CaseStatus::NotRun => t!("report.status_not_run", locale = locale).to_string(),
        }
    }

    /// Gets the appropriate CSS class for the status.
    pub fn get_status_class(&self) -> &'static str {
        match self {
            CaseStatus::Passed => "status-Passed",
            CaseStatus::Failed => "status-Failed",
            CaseStatus::Incomplete => "status-Incomplete",
            CaseStatus::NotRun => "status-NotRun",
        }
    }
}

/// The analysis outcome for one case.
/// 单个用例的分析结果。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseOutcome {
    pub name: String,
    pub status: CaseStatus,
    pub log_path: PathBuf,
    /// Number of log lines that matched a fail pattern.
    /// 匹配失败模式的日志行数。
    pub error_count: usize,
    /// The first line that matched a fail pattern, trimmed.
    /// 第一条匹配失败模式的行（已去除首尾空白）。
    pub first_error: Option<String>,
}

impl CaseOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self.status, CaseStatus::Failed | CaseStatus::Incomplete)
    }
}

/// The aggregated result of analyzing a campaign's logs.
/// 分析回归活动日志后的汇总结果。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecResult {
    pub generated_at: DateTime<Local>,
    /// Outcomes in test-list order.
    /// 按测试列表顺序排列的结果。
    pub outcomes: Vec<CaseOutcome>,
}

impl ExecResult {
    pub fn new(outcomes: Vec<CaseOutcome>) -> Self {
        Self {
            generated_at: Local::now(),
            outcomes,
        }
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn count(&self, status: CaseStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }

    pub fn passed(&self) -> usize {
        self.count(CaseStatus::Passed)
    }

    pub fn failed(&self) -> usize {
        self.count(CaseStatus::Failed)
    }

    pub fn incomplete(&self) -> usize {
        self.count(CaseStatus::Incomplete)
    }

    pub fn not_run(&self) -> usize {
        self.count(CaseStatus::NotRun)
    }

    /// Percentage of cases that passed. `0.0` for an empty result.
    pub fn pass_rate(&self) -> f64 {
        if self.outcomes.is_empty() {
            0.0
        } else {
            self.passed() as f64 * 100.0 / self.total() as f64
        }
    }

    /// `true` when every selected case passed.
    /// 当所有选中的用例都通过时为 `true`。
    pub fn is_clean(&self) -> bool {
        self.outcomes.iter().all(|o| o.status == CaseStatus::Passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &CaseOutcome> {
        self.outcomes.iter().filter(|o| o.is_failure())
    }
}

impl fmt::Display for ExecResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "total={} passed={} failed={} incomplete={} not_run={} pass_rate={:.2}%",
            self.total(),
            self.passed(),
            self.failed(),
            self.incomplete(),
            self.not_run(),
            self.pass_rate()
        )
    }
}

/// A set of cases that failed with the same normalized signature.
/// 以相同规范化签名失败的一组用例。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultGroup {
    pub signature: String,
    /// One raw line that produced this signature.
    /// 产生此签名的一条原始日志行。
    pub sample: Option<String>,
    /// Cases in test-list order.
    pub cases: Vec<String>,
}

/// Failures linked to common faults.
/// 关联到共同故障的失败集合。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaultLinkReport {
    pub generated_at: DateTime<Local>,
    pub groups: Vec<FaultGroup>,
}

impl FaultLinkReport {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn linked_cases(&self) -> usize {
        self.groups.iter().map(|g| g.cases.len()).sum()
    }

    /// The group a case belongs to, if any.
    pub fn group_of(&self, case: &str) -> Option<&FaultGroup> {
        self.groups
            .iter()
            .find(|g| g.cases.iter().any(|c| c == case))
    }
}

impl fmt::Display for FaultLinkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# fault link report ({})", self.generated_at.format("%Y-%m-%d %H:%M:%S"))?;
        for (i, group) in self.groups.iter().enumerate() {
            writeln!(f)?;
            writeln!(f, "[{}] {} ({} cases)", i + 1, group.signature, group.cases.len())?;
            if let Some(sample) = &group.sample {
                writeln!(f, "    sample: {}", sample)?;
            }
            for case in &group.cases {
                writeln!(f, "    - {}", case)?;
            }
        }
        Ok(())
    }
}
