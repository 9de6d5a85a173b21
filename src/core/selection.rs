//! # Case Selection Module / 用例选择模块
//!
//! Turns the configured `sim_mode` into the ordered list of cases a campaign
//! works on.
//!
//! 将配置的 `sim_mode` 转换为回归活动处理的有序用例列表。

use crate::core::config::{RegressionConfig, SimMode};

/// Selects the active test list.
///
/// `part` yields `config.part_list`, `all` yields `case.list`, both verbatim
/// and in order. Any other mode yields an empty list.
///
/// 选择当前的测试列表。
/// `part` 返回 `config.part_list`，`all` 返回 `case.list`，均原样保持顺序。
/// 其他任何模式都返回空列表。
pub fn select_test_list(cfg: &RegressionConfig) -> Vec<String> {
    match &cfg.config.sim_mode {
        SimMode::Part => cfg.config.part_list.clone(),
        SimMode::All => cfg.case.list.clone(),
        SimMode::Other(_) => Vec::new(),
    }
}

/// `true` when the configured mode is one the driver understands.
pub fn is_recognized_mode(cfg: &RegressionConfig) -> bool {
    !matches!(cfg.config.sim_mode, SimMode::Other(_))
}
