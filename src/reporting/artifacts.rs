//! # Report Artifacts Module / 报告产物模块
//!
//! Files written into the configured report directory.
//!
//! 写入配置的报告目录中的文件。

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::core::config::RegressionConfig;
use crate::core::models::{ExecResult, FaultLinkReport};
use crate::infra::{fs, t};

pub const SUMMARY_FILE_NAME: &str = "summary.json";
pub const FAULT_LINK_FILE_NAME: &str = "fault_link.txt";

/// Writes the analysis result as pretty JSON to `<report_dir>/summary.json`.
/// 将分析结果以格式化 JSON 写入 `<report_dir>/summary.json`。
pub fn write_summary(cfg: &RegressionConfig, result: &ExecResult) -> Result<PathBuf> {
    let path = cfg.report_dir().join(SUMMARY_FILE_NAME);
    let json = serde_json::to_string_pretty(result)
        .with_context(|| t!("report.serialize_failed").to_string())?;
    fs::write_file(&path, json)?;
    Ok(path)
}

/// Writes the fault-link report as text to `<report_dir>/fault_link.txt`.
/// 将故障关联报告以文本形式写入 `<report_dir>/fault_link.txt`。
pub fn write_fault_link(cfg: &RegressionConfig, report: &FaultLinkReport) -> Result<PathBuf> {
    let path = cfg.report_dir().join(FAULT_LINK_FILE_NAME);
    fs::write_file(&path, report.to_string())?;
    Ok(path)
}
