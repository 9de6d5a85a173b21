//! # Fault Link Module / 故障关联模块
//!
//! Groups failing cases by a normalized fault signature so that failures with
//! a common root cause are reported together.
//!
//! 按规范化的故障签名对失败用例分组，使具有共同根因的失败一起报告。

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashMap;

use crate::core::analysis::res_analysis;
use crate::core::config::RegressionConfig;
use crate::core::models::{CaseStatus, ExecResult, FaultGroup, FaultLinkReport};
use crate::reporting::artifacts;

/// Signature given to cases whose log has no pass marker and no failure.
pub const INCOMPLETE_SIGNATURE: &str = "<no terminal pass marker>";

/// Signature given to cases that have no log at all.
pub const MISSING_LOG_SIGNATURE: &str = "<log missing>";

const MAX_SIGNATURE_LEN: usize = 160;

static NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"0[xX][0-9a-fA-F]+|\d+").expect("valid number regex"));
static SPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Normalizes a failing log line into a signature.
///
/// Hex literals become `0x#`, digit runs become `#`, whitespace collapses,
/// and the result is cut to 160 characters.
///
/// 将失败的日志行规范化为签名。
pub fn normalize_signature(line: &str) -> String {
    let s = NUMBER_RE.replace_all(line.trim(), |caps: &Captures| {
        if caps[0].len() > 1 && caps[0][1..].starts_with(['x', 'X']) {
            "0x#"
        } else {
            "#"
        }
    });
    let s = SPACE_RE.replace_all(&s, " ");
    s.chars().take(MAX_SIGNATURE_LEN).collect()
}

/// Links the failures of an analysis result into fault groups.
///
/// Groups are ordered by size (largest first), then by signature. Cases inside
/// a group keep their test-list order.
///
/// 将分析结果中的失败关联为故障组。
/// 组按大小（从大到小）再按签名排序。组内用例保持测试列表顺序。
pub fn link_faults(result: &ExecResult) -> FaultLinkReport {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, FaultGroup> = HashMap::new();

    for outcome in &result.outcomes {
        let (signature, sample) = match outcome.status {
            CaseStatus::Passed => continue,
            CaseStatus::Failed => match &outcome.first_error {
                Some(line) => (normalize_signature(line), Some(line.clone())),
                None => (INCOMPLETE_SIGNATURE.to_string(), None),
            },
            CaseStatus::Incomplete => (INCOMPLETE_SIGNATURE.to_string(), None),
            CaseStatus::NotRun => (MISSING_LOG_SIGNATURE.to_string(), None),
        };

        let group = groups.entry(signature.clone()).or_insert_with(|| {
            order.push(signature.clone());
            FaultGroup {
                signature,
                sample,
                cases: Vec::new(),
            }
        });
        group.cases.push(outcome.name.clone());
    }

    let mut groups: Vec<FaultGroup> = order
        .into_iter()
        .filter_map(|sig| groups.remove(&sig))
        .collect();
    groups.sort_by(|a, b| {
        b.cases
            .len()
            .cmp(&a.cases.len())
            .then_with(|| a.signature.cmp(&b.signature))
    });

    FaultLinkReport {
        generated_at: result.generated_at,
        groups,
    }
}

/// Re-analyzes the logs for `test_list`, links the failures, and writes
/// `fault_link.txt` into the report directory.
///
/// 重新分析 `test_list` 的日志，关联失败，并将 `fault_link.txt` 写入报告目录。
pub fn only_fault_link(cfg: &RegressionConfig, test_list: &[String]) -> Result<FaultLinkReport> {
    let result = res_analysis(cfg, test_list)?;
    let report = link_faults(&result);
    artifacts::write_fault_link(cfg, &report)?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::CaseOutcome;
    use std::path::PathBuf;

    fn outcome(name: &str, status: CaseStatus, first_error: Option<&str>) -> CaseOutcome {
        CaseOutcome {
            name: name.to_string(),
            status,
            log_path: PathBuf::from(format!("{name}.log")),
            error_count: usize::from(first_error.is_some()),
            first_error: first_error.map(str::to_string),
        }
    }

    #[test]
    fn normalization_masks_numbers_and_addresses() {
        assert_eq!(
            normalize_signature("UVM_ERROR @ 1200ns: addr 0xDEADBEEF   read 17"),
            "UVM_ERROR @ #ns: addr 0x# read #"
        );
    }

    #[test]
    fn signature_is_truncated() {
        let long = "E".repeat(500);
        assert_eq!(normalize_signature(&long).len(), MAX_SIGNATURE_LEN);
    }

    #[test]
    fn failures_differing_in_numbers_share_a_group() {
        let result = ExecResult::new(vec![
            outcome("c1", CaseStatus::Failed, Some("UVM_ERROR @ 10ns: crc mismatch")),
            outcome("c2", CaseStatus::Passed, None),
            outcome("c3", CaseStatus::Failed, Some("UVM_ERROR @ 99ns: crc mismatch")),
            outcome("c4", CaseStatus::Incomplete, None),
            outcome("c5", CaseStatus::NotRun, None),
        ]);

        let report = link_faults(&result);

        assert_eq!(report.groups.len(), 3);
        assert_eq!(report.groups[0].signature, "UVM_ERROR @ #ns: crc mismatch");
        assert_eq!(report.groups[0].cases, vec!["c1", "c3"]);
        assert_eq!(
            report.groups[0].sample.as_deref(),
            Some("UVM_ERROR @ 10ns: crc mismatch")
        );
        assert_eq!(report.group_of("c4").unwrap().signature, INCOMPLETE_SIGNATURE);
        assert_eq!(report.group_of("c5").unwrap().signature, MISSING_LOG_SIGNATURE);
        assert!(report.group_of("c2").is_none());
        assert_eq!(report.linked_cases(), 4);
    }

    #[test]
    fn clean_result_links_nothing() {
        let result = ExecResult::new(vec![outcome("c1", CaseStatus::Passed, None)]);
        assert!(link_faults(&result).is_empty());
    }
}
