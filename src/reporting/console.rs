//! # Console Reporting Module / 控制台报告模块
//!
//! This module prints the campaign's progress and results to the console,
//! colored and localized.
//!
//! 此模块在控制台打印回归活动的进度和结果，带颜色并支持国际化。

use colored::*;

use crate::core::driver::CampaignReporter;
use crate::core::models::{CaseStatus, ExecResult, FaultLinkReport, RunRecord, RunStatus};
use crate::infra::t;

/// Prints each campaign phase to the console as it ends.
/// 在每个回归阶段结束时将其打印到控制台。
#[derive(Debug, Clone)]
pub struct ConsoleReporter {
    locale: String,
}

impl ConsoleReporter {
    pub fn new(locale: &str) -> Self {
        Self {
            locale: locale.to_string(),
        }
    }
}

impl CampaignReporter for ConsoleReporter {
    fn test_list_selected(&self, test_list: &[String]) {
        print_test_list(test_list, &self.locale);
    }

    fn dispatch_finished(&self, runs: &[RunRecord]) {
        print_dispatch_summary(runs, &self.locale);
    }

    fn analysis_finished(&self, result: &ExecResult) {
        print_exec_result(result, &self.locale);
    }

    fn fault_link_finished(&self, report: &FaultLinkReport) {
        print_fault_links(report, &self.locale);
    }
}

/// Prints the selected test list.
/// 打印选中的测试列表。
pub fn print_test_list(test_list: &[String], locale: &str) {
    println!(
        "{}",
        t!("run.selected_cases", locale = locale, count = test_list.len()).bold()
    );
    println!("{:?}", test_list);
}

/// Prints one line per dispatched case.
///
/// ```text
/// --- Dispatch Summary ---
///   - Succeeded        | uart_tx                                  |      12.30s
///   - Exit code 1      | uart_rx                                  |       4.02s
/// ```
pub fn print_dispatch_summary(runs: &[RunRecord], locale: &str) {
    println!("\n{}", t!("dispatch.summary_banner", locale = locale).bold());

    for run in runs {
        let status_str = run.get_status_str(locale);
        let status_colored = match run.status {
            RunStatus::Succeeded => status_str.green(),
            RunStatus::Cancelled => status_str.dimmed(),
            _ => status_str.red(),
        };
        println!(
            "  - {:<18} | {:<40} | {:>10.2?}",
            status_colored, run.case, run.duration
        );
    }
}

/// Prints the analysis result: a per-case table, then the totals line.
///
/// 打印分析结果：先是逐个用例的表格，然后是汇总行。
pub fn print_exec_result(result: &ExecResult, locale: &str) {
    println!("\n{}", t!("report.summary_banner", locale = locale).bold());

    for outcome in &result.outcomes {
        let status_str = outcome.status.get_status_str(locale);
        let status_colored = match outcome.status {
            CaseStatus::Passed => status_str.green(),
            CaseStatus::Failed => status_str.red(),
            CaseStatus::Incomplete => status_str.yellow(),
            CaseStatus::NotRun => status_str.dimmed(),
        };
        let errors = if outcome.error_count > 0 {
            t!("report.error_count", locale = locale, count = outcome.error_count).to_string()
        } else {
            String::new()
        };
        println!("  - {:<18} | {:<40} {}", status_colored, outcome.name, errors);
    }

    println!("{}", result);

    let totals = t!(
        "report.totals",
        locale = locale,
        total = result.total(),
        passed = result.passed(),
        failed = result.failed(),
        incomplete = result.incomplete(),
        not_run = result.not_run(),
        rate = format!("{:.2}", result.pass_rate())
    );
    if result.is_clean() {
        println!("{}", totals.green().bold());
    } else {
        println!("{}", totals.red().bold());
    }
}

/// Prints the fault groups, largest first, each with its cases.
///
/// 打印故障组（从大到小），以及每组包含的用例。
pub fn print_fault_links(report: &FaultLinkReport, locale: &str) {
    if report.is_empty() {
        println!("\n{}", t!("fault_link.none", locale = locale).green());
        return;
    }

    println!("\n{}", t!("fault_link.banner", locale = locale).red().bold());
    println!("{}", "-".repeat(80));

    for (i, group) in report.groups.iter().enumerate() {
        println!(
            "[{}/{}] {} ({})",
            i + 1,
            report.groups.len(),
            group.signature.yellow(),
            t!("fault_link.case_count", locale = locale, count = group.cases.len())
        );
        if let Some(sample) = &group.sample {
            println!("    {} {}", t!("fault_link.sample", locale = locale).dimmed(), sample);
        }
        for case in &group.cases {
            println!("    - {}", case.cyan());
        }
    }
    println!("{}", "-".repeat(80));
}
