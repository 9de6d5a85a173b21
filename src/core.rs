//! # Core Module / 核心模块
//!
//! This module contains the core functionality of the regression driver:
//! configuration, case selection, parallel dispatch, log analysis,
//! fault linking and the driver that ties them together.
//!
//! 此模块包含回归驱动的核心功能：
//! 配置、用例选择、并行调度、日志分析、故障关联以及串联它们的驱动器。

pub mod analysis;
pub mod config;
pub mod driver;
pub mod execution;
pub mod fault_link;
pub mod models;
pub mod selection;

// Re-exports
pub use config::RegressionConfig;
pub use driver::{run_campaign, CampaignBackend, CampaignReporter, RegressionBackend};
pub use models::ExecResult;
