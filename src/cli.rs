//! # CLI Module / 命令行模块
//!
//! Builds the command line, pre-parsing `--lang` so help text is localized,
//! and routes to the `run` (default) or `init` command.
//!
//! 构建命令行，预先解析 `--lang` 以便帮助文本本地化，
//! 并路由到 `run`（默认）或 `init` 命令。

pub mod commands;

use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::{env, path::PathBuf};

use crate::core::config::DEFAULT_CONFIG_PATH;
use crate::infra::t;

/// Arguments of the default `run` command.
/// 默认 `run` 命令的参数。
#[derive(Debug, Clone)]
pub struct RunArgs {
    pub config: PathBuf,
    pub exec: bool,
    pub jobs: Option<usize>,
    pub html: Option<PathBuf>,
    pub strict: bool,
    /// `--lang`, if given.
    pub lang: Option<String>,
}

/// Arguments of the `init` command.
#[derive(Debug, Clone)]
pub struct InitArgs {
    pub output: PathBuf,
    pub force: bool,
    pub non_interactive: bool,
}

/// A parsed invocation.
#[derive(Debug, Clone)]
pub enum CliCommand {
    Run(RunArgs),
    Init(InitArgs),
}

/// Pre-parses the command line arguments to find the language setting.
/// This allows i18n to be initialized before the full CLI is built.
/// It looks for a `--lang <VALUE>` or `--lang=<VALUE>` argument.
fn pre_parse_language<I: IntoIterator<Item = String>>(args: I) -> Option<String> {
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if arg == "--lang" {
            return args.next();
        }
        if let Some(value) = arg.strip_prefix("--lang=") {
            return Some(value.to_string());
        }
    }
    None
}

/// Builds the clap command with help text in `locale`.
pub fn build_cli(locale: &str) -> Command {
    Command::new("regression-driver")
        .version(env!("CARGO_PKG_VERSION"))
        .about(t!("cli.about", locale = locale).to_string())
        .args_conflicts_with_subcommands(true)
        .arg(
            Arg::new("lang")
                .long("lang")
                .help(t!("cli.lang", locale = locale).to_string())
                .value_name("LANGUAGE")
                .global(true)
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help(t!("cli.config", locale = locale).to_string())
                .value_name("CONFIG")
                .default_value(DEFAULT_CONFIG_PATH)
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("exec")
                .long("exec")
                .help(t!("cli.exec", locale = locale).to_string())
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("jobs")
                .short('j')
                .long("jobs")
                .help(t!("cli.jobs", locale = locale).to_string())
                .value_name("JOBS")
                .value_parser(clap::value_parser!(usize))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("html")
                .long("html")
                .help(t!("cli.html", locale = locale).to_string())
                .value_name("HTML")
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("strict")
                .long("strict")
                .help(t!("cli.strict", locale = locale).to_string())
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("init")
                .about(t!("cli.init_about", locale = locale).to_string())
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help(t!("cli.init_output", locale = locale).to_string())
                        .value_name("PATH")
                        .default_value("regression/regression.toml")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("force")
                        .long("force")
                        .help(t!("cli.init_force", locale = locale).to_string())
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("non-interactive")
                        .long("non-interactive")
                        .help(t!("cli.init_non_interactive", locale = locale).to_string())
                        .action(ArgAction::SetTrue),
                ),
        )
}

/// Turns clap matches into a `CliCommand`.
pub fn command_from_matches(matches: &ArgMatches) -> CliCommand {
    match matches.subcommand() {
        Some(("init", init)) => CliCommand::Init(InitArgs {
            output: init
                .get_one::<PathBuf>("output")
                .cloned()
                .unwrap_or_else(|| PathBuf::from("regression/regression.toml")),
            force: init.get_flag("force"),
            non_interactive: init.get_flag("non-interactive"),
        }),
        _ => CliCommand::Run(RunArgs {
            config: matches
                .get_one::<PathBuf>("config")
                .cloned()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH)),
            exec: matches.get_flag("exec"),
            jobs: matches.get_one::<usize>("jobs").copied(),
            html: matches.get_one::<PathBuf>("html").cloned(),
            strict: matches.get_flag("strict"),
            lang: matches.get_one::<String>("lang").cloned(),
        }),
    }
}

/// Picks the UI locale before clap runs: `--lang` if given, else the system locale.
fn initial_locale(args: &[String]) -> String {
    match pre_parse_language(args.iter().cloned()) {
        Some(lang) => crate::resolve_locale(&lang),
        None => {
            crate::init();
            rust_i18n::locale().to_string()
        }
    }
}

/// Parses an argument list (including the program name).
pub fn parse_from<I: IntoIterator<Item = String>>(args: I) -> Result<(CliCommand, String)> {
    let args: Vec<String> = args.into_iter().collect();
    let locale = initial_locale(&args);
    rust_i18n::set_locale(&locale);

    let matches = build_cli(&locale).try_get_matches_from(args)?;
    Ok((command_from_matches(&matches), locale))
}

/// Entry point used by `main`.
pub async fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let locale = initial_locale(&args);
    rust_i18n::set_locale(&locale);

    let matches = build_cli(&locale).get_matches_from(args);
    process_command(command_from_matches(&matches), &locale).await
}

/// Executes a parsed command.
pub async fn process_command(command: CliCommand, locale: &str) -> Result<()> {
    match command {
        CliCommand::Run(args) => commands::run::execute(args).await,
        CliCommand::Init(args) => commands::init::execute(args, locale),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        std::iter::once("regression-driver")
            .chain(args.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn pre_parse_finds_both_spellings() {
        assert_eq!(pre_parse_language(argv(&["--lang", "zh-CN"])), Some("zh-CN".into()));
        assert_eq!(pre_parse_language(argv(&["--lang=en"])), Some("en".into()));
        assert_eq!(pre_parse_language(argv(&["--exec"])), None);
    }

    #[test]
    fn defaults_to_run_with_fixed_config_path() {
        let (command, _) = parse_from(argv(&["--lang", "en"])).unwrap();
        match command {
            CliCommand::Run(args) => {
                assert_eq!(args.config, PathBuf::from("./regression"));
                assert!(!args.exec);
                assert!(!args.strict);
                assert_eq!(args.jobs, None);
            }
            other => panic!("expected run, got {other:?}"),
        }
    }

    #[test]
    fn parses_run_flags() {
        let (command, _) =
            parse_from(argv(&["-c", "cfg.toml", "--exec", "-j", "3", "--strict"])).unwrap();
        let CliCommand::Run(args) = command else {
            panic!("expected run");
        };
        assert_eq!(args.config, PathBuf::from("cfg.toml"));
        assert!(args.exec);
        assert!(args.strict);
        assert_eq!(args.jobs, Some(3));
    }

    #[test]
    fn parses_init() {
        let (command, _) = parse_from(argv(&["init", "--non-interactive", "-o", "x.toml"])).unwrap();
        let CliCommand::Init(args) = command else {
            panic!("expected init");
        };
        assert!(args.non_interactive);
        assert_eq!(args.output, PathBuf::from("x.toml"));
    }
}
