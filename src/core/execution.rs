//! # Dispatch Module / 调度模块
//!
//! Runs the selected cases through the configured command template, at most
//! `sim_num` at a time, writing each case's combined output to the log file
//! that analysis later reads. The rendered command line goes to a `.cmd` file
//! next to the log so that it is never scanned as output.
//!
//! 通过配置的命令模板运行选中的用例，同时最多运行 `sim_num` 个，
//! 并将每个用例的合并输出写入分析阶段读取的日志文件。
//! 渲染后的命令行写入日志旁的 `.cmd` 文件，因此不会被当作输出扫描。

use anyhow::{anyhow, Result};
use colored::*;
use futures::{stream, StreamExt};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

use crate::{
    core::{
        config::RegressionConfig,
        models::{RunRecord, RunStatus},
    },
    infra::{command, fs, t},
};

/// Everything one case run needs, detached from the borrowed configuration.
/// 单个用例运行所需的全部信息，与借用的配置分离。
#[derive(Debug, Clone)]
struct CaseJob {
    case: String,
    template: String,
    work_dir: PathBuf,
    log_path: PathBuf,
    command_path: PathBuf,
    timeout: Option<Duration>,
}

/// Dispatches every case in `test_list`, at most `sim_num` concurrently.
///
/// Records come back in `test_list` order. Per-case problems are captured in
/// the record; only a missing command template is an error.
///
/// 调度 `test_list` 中的每个用例，最多同时运行 `sim_num` 个。
/// 记录按 `test_list` 顺序返回。单个用例的问题记录在结果中；
/// 只有缺少命令模板才会返回错误。
pub async fn multi_task_run(
    sim_num: usize,
    cfg: &RegressionConfig,
    test_list: &[String],
    stop_token: CancellationToken,
) -> Result<Vec<RunRecord>> {
    let template = cfg
        .config
        .command
        .clone()
        .ok_or_else(|| anyhow!(t!("dispatch.no_command").to_string()))?;

    let work_dir = cfg.work_dir();
    let timeout = cfg.config.timeout_secs.map(Duration::from_secs);

    let jobs: Vec<CaseJob> = test_list
        .iter()
        .map(|case| CaseJob {
            case: case.clone(),
            template: template.clone(),
            work_dir: work_dir.clone(),
            log_path: cfg.case_log_path(case),
            command_path: cfg.case_command_path(case),
            timeout,
        })
        .collect();

    let mut indexed: Vec<(usize, RunRecord)> = stream::iter(jobs.into_iter().enumerate().map(
        |(index, job)| {
            let stop_token = stop_token.clone();
            async move {
                let case = job.case.clone();
                let log_path = job.log_path.clone();
                let handle = tokio::spawn(run_case(job, stop_token));
                let record = handle.await.unwrap_or_else(|e| RunRecord {
                    case,
                    status: RunStatus::SpawnFailed(e.to_string()),
                    duration: Duration::ZERO,
                    log_path,
                });
                (index, record)
            }
        },
    ))
    .buffer_unordered(sim_num.max(1))
    .collect()
    .await;

    indexed.sort_by_key(|(index, _)| *index);
    Ok(indexed.into_iter().map(|(_, record)| record).collect())
}

/// Runs one case to completion, timeout, or cancellation.
async fn run_case(job: CaseJob, stop_token: CancellationToken) -> RunRecord {
    let start = Instant::now();

    if stop_token.is_cancelled() {
        return make_record(&job, RunStatus::Cancelled, start);
    }

    let rendered = match command::render_case_command(&job.template, &job.case) {
        Ok(rendered) => rendered,
        Err(e) => return make_record(&job, RunStatus::SpawnFailed(format!("{e:#}")), start),
    };

    if let Err(e) = fs::write_file(&job.command_path, format!("{}\n", rendered.display)) {
        eprintln!("{} {:#}", t!("dispatch.log_write_failed").red(), e);
    }

    println!("{}", t!("dispatch.running_case", name = &job.case).blue());

    let mut cmd = tokio::process::Command::new(&rendered.program);
    cmd.args(&rendered.args)
        .kill_on_drop(true)
        .current_dir(&job.work_dir);
    command::isolate_process_group(&mut cmd);

    let child = match command::spawn_and_capture(cmd) {
        Ok(child) => child,
        Err(e) => {
            write_log(&job, &[]);
            return make_record(&job, RunStatus::SpawnFailed(e.to_string()), start);
        }
    };
    let pid = child.id();
    let sink = child.output_sink();

    let outcome = tokio::select! {
        biased;
        _ = stop_token.cancelled() => None,
        res = with_timeout(job.timeout, child.wait()) => Some(res),
    };

    let (status, output) = match outcome {
        Some(Some((Ok(exit), output))) if exit.success() => (RunStatus::Succeeded, output),
        Some(Some((Ok(exit), output))) => (RunStatus::Failed(exit.code()), output),
        Some(Some((Err(e), output))) => (RunStatus::SpawnFailed(e.to_string()), output),
        interrupted => {
            // The leader is gone with the dropped future; its children are not.
            if let Some(pid) = pid {
                command::kill_process_group(pid);
            }
            let status = match interrupted {
                None => RunStatus::Cancelled,
                _ => RunStatus::TimedOut,
            };
            (status, sink.lock().await.clone())
        }
    };

    write_log(&job, &output);

    let record = make_record(&job, status, start);
    print_case_finished(&record);
    record
}

/// Writes the captured bytes as the case log, unchanged.
fn write_log(job: &CaseJob, output: &[u8]) {
    if let Err(e) = fs::write_file(&job.log_path, output) {
        eprintln!("{} {:#}", t!("dispatch.log_write_failed").red(), e);
    }
}

async fn with_timeout<F: std::future::Future>(
    timeout: Option<Duration>,
    fut: F,
) -> Option<F::Output> {
    match timeout {
        Some(limit) => tokio::time::timeout(limit, fut).await.ok(),
        None => Some(fut.await),
    }
}

fn make_record(job: &CaseJob, status: RunStatus, start: Instant) -> RunRecord {
    RunRecord {
        case: job.case.clone(),
        status,
        duration: start.elapsed(),
        log_path: job.log_path.clone(),
    }
}

fn print_case_finished(record: &RunRecord) {
    let secs = format!("{:.2}", record.duration.as_secs_f64());
    let line = match &record.status {
        RunStatus::Succeeded => {
            t!("dispatch.case_succeeded", name = &record.case, duration = secs).green()
        }
        RunStatus::TimedOut => t!("dispatch.case_timed_out", name = &record.case).red(),
        RunStatus::Cancelled => t!("dispatch.case_cancelled", name = &record.case).yellow(),
        _ => t!("dispatch.case_failed", name = &record.case, duration = secs).red(),
    };
    println!("{}", line);
}
