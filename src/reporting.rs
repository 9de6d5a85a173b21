//! # Reporting Module / 报告模块
//!
//! This module handles the display and persistence of campaign results.
//! It prints colorful, localized summaries to the console, renders an HTML
//! report, and writes machine-readable artifacts into the report directory.
//!
//! 此模块处理回归结果的显示和持久化。
//! 它在控制台打印彩色的本地化摘要，渲染 HTML 报告，
//! 并将机器可读的产物写入报告目录。

pub mod artifacts;
pub mod console;
pub mod html;

// Re-export common reporting functions
pub use console::{ConsoleReporter, print_dispatch_summary, print_exec_result, print_fault_links, print_test_list};
pub use html::generate_html_report;
