//! # HTML Reporting Module / HTML 报告模块
//!
//! Renders the analysis result and fault groups into a single self-contained
//! HTML page.
//!
//! 将分析结果和故障组渲染为一个独立的 HTML 页面。

use anyhow::Result;
use maud::{html, Markup, PreEscaped, DOCTYPE};
use std::path::Path;

use crate::core::models::{ExecResult, FaultLinkReport};
use crate::infra::{fs, t};

/// Embedded CSS styles for HTML reports / HTML 报告的嵌入式 CSS 样式
const HTML_STYLE: &str = r#"
body { font-family: -apple-system, "Segoe UI", sans-serif; margin: 2em; color: #222; }
h1, h2 { font-weight: 600; }
.summary-container { display: flex; gap: 1.5em; margin: 1em 0 2em; }
.summary-item { display: flex; flex-direction: column; align-items: center; padding: 0.8em 1.4em; border: 1px solid #ddd; border-radius: 6px; }
.summary-item .count { font-size: 1.8em; font-weight: 700; }
.passed-text { color: #2e7d32; } .failed-text { color: #c62828; }
.incomplete-text { color: #ef6c00; } .not-run-text { color: #757575; }
table { border-collapse: collapse; width: 100%; margin-bottom: 2em; }
th, td { border-bottom: 1px solid #eee; padding: 0.4em 0.6em; text-align: left; vertical-align: top; }
.status-cell { display: inline-block; padding: 0.1em 0.6em; border-radius: 4px; color: #fff; }
.status-Passed { background: #2e7d32; } .status-Failed { background: #c62828; }
.status-Incomplete { background: #ef6c00; } .status-NotRun { background: #9e9e9e; }
code { font-size: 0.9em; }
"#;

/// Generates the HTML report and writes it to `output_path`.
///
/// 生成 HTML 报告并写入 `output_path`。
///
/// # Errors / 错误
/// Fails when the file (or its parent directory) cannot be written.
pub fn generate_html_report(
    result: &ExecResult,
    fault_report: &FaultLinkReport,
    output_path: &Path,
    locale: &str,
) -> Result<()> {
    let page = render_report(result, fault_report, locale);
    fs::write_file(output_path, page.into_string())
}

/// Renders the report page.
pub fn render_report(result: &ExecResult, fault_report: &FaultLinkReport, locale: &str) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { (t!("html_report.title", locale = locale)) }
                style { (PreEscaped(HTML_STYLE)) }
            }
            body {
                h1 { (t!("html_report.main_header", locale = locale)) }
                p { (result.generated_at.format("%Y-%m-%d %H:%M:%S").to_string()) }

                div class="summary-container" {
                    (summary_item(result.total(), "", &t!("html_report.summary.total", locale = locale)))
                    (summary_item(result.passed(), "passed-text", &t!("html_report.summary.passed", locale = locale)))
                    (summary_item(result.failed(), "failed-text", &t!("html_report.summary.failed", locale = locale)))
                    (summary_item(result.incomplete(), "incomplete-text", &t!("html_report.summary.incomplete", locale = locale)))
                    (summary_item(result.not_run(), "not-run-text", &t!("html_report.summary.not_run", locale = locale)))
                }

                table {
                    thead {
                        tr {
                            th { (t!("html_report.table.header.name", locale = locale)) }
                            th { (t!("html_report.table.header.status", locale = locale)) }
                            th { (t!("html_report.table.header.errors", locale = locale)) }
                            th { (t!("html_report.table.header.first_error", locale = locale)) }
                        }
                    }
                    tbody {
                        @for outcome in &result.outcomes {
                            tr {
                                td { (outcome.name) }
                                td {
                                    div class={ "status-cell " (outcome.status.get_status_class()) } {
                                        (outcome.status.get_status_str(locale))
                                    }
                                }
                                td { (outcome.error_count) }
                                td {
                                    @if let Some(line) = &outcome.first_error {
                                        code { (line) }
                                    }
                                }
                            }
                        }
                    }
                }

                h2 { (t!("html_report.fault_links", locale = locale)) }
                @if fault_report.is_empty() {
                    p { (t!("fault_link.none", locale = locale)) }
                } @else {
                    table {
                        thead {
                            tr {
                                th { (t!("html_report.table.header.signature", locale = locale)) }
                                th { (t!("html_report.table.header.cases", locale = locale)) }
                            }
                        }
                        tbody {
                            @for group in &fault_report.groups {
                                tr {
                                    td { code { (group.signature) } }
                                    td { (group.cases.join(", ")) }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn summary_item(count: usize, class: &str, label: &str) -> Markup {
    html! {
        div class="summary-item" {
            span class={ "count " (class) } { (count) }
            span class="label" { (label) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fault_link::link_faults;
    use crate::core::models::{CaseOutcome, CaseStatus};
    use std::path::PathBuf;

    #[test]
    fn report_escapes_log_lines() {
        let result = ExecResult::new(vec![CaseOutcome {
            name: "c1".to_string(),
            status: CaseStatus::Failed,
            log_path: PathBuf::from("c1.log"),
            error_count: 1,
            first_error: Some("Error: <bus> & stall".to_string()),
        }]);
        let page = render_report(&result, &link_faults(&result), "en").into_string();
        assert!(page.contains("Error: &lt;bus&gt; &amp; stall"));
        assert!(page.contains("status-Failed"));
    }
}
