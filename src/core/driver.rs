//! # Campaign Driver Module / 回归活动驱动模块
//!
//! The driver loads nothing and prints nothing itself: it selects the test
//! list, hands the same configuration and list to each collaborator in turn,
//! and tells a reporter about each phase as soon as it ends.
//!
//! 驱动器本身不加载也不打印：它选择测试列表，
//! 依次将相同的配置和列表交给各个协作者，并在每个阶段结束时立即通知报告器。

use anyhow::Result;
use std::future::Future;
use tokio_util::sync::CancellationToken;

use crate::core::{
    analysis, execution, fault_link,
    config::RegressionConfig,
    models::{ExecResult, FaultLinkReport, RunRecord},
    selection,
};
use crate::reporting::artifacts;

/// The collaborators a campaign delegates to.
/// 回归活动所委托的协作者。
pub trait CampaignBackend {
    /// Runs the cases, at most `sim_num` at once.
    fn dispatch(
        &self,
        sim_num: usize,
        cfg: &RegressionConfig,
        test_list: &[String],
    ) -> impl Future<Output = Result<Vec<RunRecord>>>;

    /// Analyzes the results of the cases.
    fn analyze(&self, cfg: &RegressionConfig, test_list: &[String]) -> Result<ExecResult>;

    /// Links failures to common faults and reports them.
    fn fault_link(&self, cfg: &RegressionConfig, test_list: &[String]) -> Result<FaultLinkReport>;
}

/// The production backend: dispatches processes, reads logs, writes reports.
/// 生产环境后端：调度进程、读取日志、写入报告。
#[derive(Debug, Clone, Default)]
pub struct RegressionBackend {
    stop_token: CancellationToken,
}

impl RegressionBackend {
    pub fn new(stop_token: CancellationToken) -> Self {
        Self { stop_token }
    }
}

impl CampaignBackend for RegressionBackend {
    async fn dispatch(
        &self,
        sim_num: usize,
        cfg: &RegressionConfig,
        test_list: &[String],
    ) -> Result<Vec<RunRecord>> {
        execution::multi_task_run(sim_num, cfg, test_list, self.stop_token.clone()).await
    }

    fn analyze(&self, cfg: &RegressionConfig, test_list: &[String]) -> Result<ExecResult> {
        let result = analysis::res_analysis(cfg, test_list)?;
        artifacts::write_summary(cfg, &result)?;
        Ok(result)
    }

    fn fault_link(&self, cfg: &RegressionConfig, test_list: &[String]) -> Result<FaultLinkReport> {
        fault_link::only_fault_link(cfg, test_list)
    }
}

/// Receives each phase's result as soon as the phase ends.
/// 在每个阶段结束时立即接收该阶段的结果。
pub trait CampaignReporter {
    fn test_list_selected(&self, _test_list: &[String]) {}
    fn dispatch_finished(&self, _runs: &[RunRecord]) {}
    fn analysis_finished(&self, _result: &ExecResult) {}
    fn fault_link_finished(&self, _report: &FaultLinkReport) {}
}

/// A reporter that ignores every phase.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentReporter;

impl CampaignReporter for SilentReporter {}

/// Run-time switches that are not part of the configuration file.
/// 不属于配置文件的运行时开关。
#[derive(Debug, Clone, Default)]
pub struct DriverOptions {
    /// Dispatch even if `config.dispatch` is false.
    pub force_dispatch: bool,
    /// Replaces `config.sim_num`.
    pub sim_num: Option<usize>,
}

impl DriverOptions {
    pub fn dispatch_enabled(&self, cfg: &RegressionConfig) -> bool {
        self.force_dispatch || cfg.config.dispatch
    }

    /// The worker count dispatch runs with. Never below one.
    pub fn effective_sim_num(&self, cfg: &RegressionConfig) -> usize {
        self.sim_num.unwrap_or_else(|| cfg.sim_num()).max(1)
    }
}

/// What a campaign produced.
/// 回归活动的产出。
#[derive(Debug, Clone)]
pub struct CampaignOutcome {
    pub test_list: Vec<String>,
    /// `None` when dispatch was disabled.
    pub runs: Option<Vec<RunRecord>>,
    pub exec_result: ExecResult,
    pub fault_report: FaultLinkReport,
}

/// Runs a campaign: select, optionally dispatch, analyze, link faults.
///
/// Analysis and fault linking always receive the configuration and list used
/// for selection, in every mode, including an empty list. `reporter` hears
/// about each phase before the next one starts.
///
/// 运行回归活动：选择、可选调度、分析、故障关联。
/// 在任何模式下（包括空列表），分析和故障关联总是接收用于选择的配置和列表。
/// `reporter` 会在下一阶段开始前收到每个阶段的结果。
pub async fn run_campaign<B: CampaignBackend, R: CampaignReporter>(
    backend: &B,
    reporter: &R,
    cfg: &RegressionConfig,
    options: &DriverOptions,
) -> Result<CampaignOutcome> {
    let test_list = selection::select_test_list(cfg);
    reporter.test_list_selected(&test_list);

    let runs = if options.dispatch_enabled(cfg) {
        let runs = backend
            .dispatch(options.effective_sim_num(cfg), cfg, &test_list)
            .await?;
        reporter.dispatch_finished(&runs);
        Some(runs)
    } else {
        None
    };

    let exec_result = backend.analyze(cfg, &test_list)?;
    reporter.analysis_finished(&exec_result);

    let fault_report = backend.fault_link(cfg, &test_list)?;
    reporter.fault_link_finished(&fault_report);

    Ok(CampaignOutcome {
        test_list,
        runs,
        exec_result,
        fault_report,
    })
}
