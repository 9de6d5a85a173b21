//! # Run Command Module / 运行命令模块
//!
//! This module implements the default command: load the regression
//! configuration, run the campaign, and report the outcome.
//!
//! 此模块实现默认命令：加载回归配置，运行回归活动，并报告结果。

use anyhow::{Context, Result};
use colored::*;
use tokio::signal;
use tokio_util::sync::CancellationToken;

use crate::{
    cli::RunArgs,
    core::{
        config::{self, RegressionConfig},
        driver::{run_campaign, DriverOptions, RegressionBackend},
        selection,
    },
    infra::t,
    reporting::{console::ConsoleReporter, html::generate_html_report},
};

/// Executes the run command with the provided arguments.
///
/// # Returns
/// `Ok(())` unless loading fails, a collaborator fails, or `--strict` was
/// given and some selected case did not pass.
pub async fn execute(args: RunArgs) -> Result<()> {
    let cfg = load_config(&args)?;
    let locale = match &args.lang {
        Some(lang) => crate::resolve_locale(lang),
        None => crate::resolve_locale(&cfg.language),
    };
    rust_i18n::set_locale(&locale);

    println!(
        "{}",
        t!("run.loaded_config", locale = &locale, path = cfg.base_dir.display())
    );
    println!(
        "{}",
        t!("run.sim_mode", locale = &locale, mode = &cfg.config.sim_mode).cyan()
    );
    if !selection::is_recognized_mode(&cfg) {
        println!(
            "{}",
            t!("run.unknown_sim_mode", locale = &locale, mode = &cfg.config.sim_mode).yellow()
        );
    }

    let options = DriverOptions {
        force_dispatch: args.exec,
        sim_num: args.jobs,
    };
    if options.dispatch_enabled(&cfg) {
        println!(
            "{}",
            t!(
                "run.dispatch_enabled",
                locale = &locale,
                sim_num = options.effective_sim_num(&cfg)
            )
            .bold()
        );
    } else {
        println!("{}", t!("run.dispatch_disabled", locale = &locale).dimmed());
    }

    let stop_token = setup_signal_handler(&locale);
    let backend = RegressionBackend::new(stop_token);
    let reporter = ConsoleReporter::new(&locale);

    let outcome = run_campaign(&backend, &reporter, &cfg, &options).await?;

    println!(
        "\n{}",
        t!("run.reports_written", locale = &locale, path = cfg.report_dir().display())
    );

    if let Some(report_path) = &args.html {
        println!(
            "{}",
            t!("run.generating_html", locale = &locale, path = report_path.display())
        );
        if let Err(e) =
            generate_html_report(&outcome.exec_result, &outcome.fault_report, report_path, &locale)
        {
            eprintln!("{} {:#}", t!("run.html_failed", locale = &locale).red(), e);
        }
    }

    if args.strict && !outcome.exec_result.is_clean() {
        anyhow::bail!(t!("run.strict_failed", locale = &locale).to_string());
    }
    Ok(())
}

fn load_config(args: &RunArgs) -> Result<RegressionConfig> {
    config::parse_config(&args.config).with_context(|| {
        t!("run.config_unavailable", path = args.config.display()).to_string()
    })
}

/// Sets up a Ctrl-C handler that cancels the returned token.
fn setup_signal_handler(locale: &str) -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();
    let locale = locale.to_string();

    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            println!("\n{}", t!("run.shutdown_signal", locale = &locale).yellow());
            token_clone.cancel();
        }
    });

    token
}
