//! # Init Command Module / 初始化命令模块
//!
//! Writes a starter `regression.toml`, either from defaults or from answers
//! collected by a short interactive wizard.
//!
//! 写入一个初始的 `regression.toml`，可以使用默认值，
//! 也可以通过简短的交互式向导收集答案。

use anyhow::Result;
use colored::*;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};

use crate::{cli::InitArgs, infra::{fs, t}};

/// Answers that shape the generated configuration.
/// 决定生成配置内容的答案。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitAnswers {
    pub language: String,
    pub sim_mode: String,
    pub sim_num: usize,
    pub command: String,
    pub cases: Vec<String>,
    pub dispatch: bool,
}

impl Default for InitAnswers {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            sim_mode: "part".to_string(),
            sim_num: 4,
            command: "make sim TEST={case}".to_string(),
            cases: vec![
                "smoke_test".to_string(),
                "reg_access".to_string(),
                "irq_stress".to_string(),
            ],
            dispatch: false,
        }
    }
}

/// Renders the configuration file for `answers`.
/// 根据 `answers` 渲染配置文件。
pub fn render_config(answers: &InitAnswers) -> String {
    let quoted: Vec<String> = answers.cases.iter().map(|c| format!("{c:?}")).collect();
    let part: Vec<String> = quoted.iter().take(1).cloned().collect();
    format!(
        r#"# Regression configuration / 回归配置

# Language for console output / 控制台输出语言
language = {language:?}

[config]
# "part" runs part_list, "all" runs case.list / "part" 运行 part_list，"all" 运行 case.list
sim_mode = {sim_mode:?}
# Maximum concurrent cases / 最大并发用例数
sim_num = {sim_num}
part_list = [{part}]
# Run cases before analysis (same as --exec) / 分析前先运行用例（等同于 --exec）
dispatch = {dispatch}
# {{case}} is replaced with the case name / {{case}} 会被替换为用例名称
command = {command:?}
# timeout_secs = 3600

[case]
list = [{list}]

[record]
log_dir = "log"
log_file = "{{case}}.log"
report_dir = "report"
pass_patterns = ["TEST PASSED"]
fail_patterns = ["UVM_ERROR", "UVM_FATAL", '(?i)\berror\b']
"#,
        language = answers.language,
        sim_mode = answers.sim_mode,
        sim_num = answers.sim_num,
        part = part.join(", "),
        dispatch = answers.dispatch,
        command = answers.command,
        list = quoted.join(", "),
    )
}

/// Executes the init command.
pub fn execute(args: InitArgs, locale: &str) -> Result<()> {
    if args.output.exists() && !args.force {
        println!(
            "{}",
            t!("init.file_exists", locale = locale, path = args.output.display()).red()
        );
        println!("{}", t!("init.use_force", locale = locale).yellow());
        return Ok(());
    }

    let answers = if args.non_interactive {
        InitAnswers {
            language: locale.to_string(),
            ..InitAnswers::default()
        }
    } else {
        run_wizard(locale)?
    };

    fs::write_file(&args.output, render_config(&answers))?;

    println!(
        "{}",
        t!("init.success", locale = locale, path = args.output.display()).green()
    );
    println!("{}", t!("init.next_steps", locale = locale));
    Ok(())
}

fn run_wizard(locale: &str) -> Result<InitAnswers> {
    let theme = ColorfulTheme::default();
    let defaults = InitAnswers::default();

    println!("{}", t!("init.wizard_welcome", locale = locale).bold());

    let modes = ["part", "all"];
    let mode_index = Select::with_theme(&theme)
        .with_prompt(t!("init.prompt_sim_mode", locale = locale))
        .items(&modes[..])
        .default(0)
        .interact()?;

    let sim_num: usize = Input::with_theme(&theme)
        .with_prompt(t!("init.prompt_sim_num", locale = locale))
        .default(defaults.sim_num)
        .interact_text()?;

    let command: String = Input::with_theme(&theme)
        .with_prompt(t!("init.prompt_command", locale = locale))
        .default(defaults.command.clone())
        .interact_text()?;

    let cases: String = Input::with_theme(&theme)
        .with_prompt(t!("init.prompt_cases", locale = locale))
        .default(defaults.cases.join(","))
        .interact_text()?;

    let dispatch = Confirm::with_theme(&theme)
        .with_prompt(t!("init.prompt_dispatch", locale = locale))
        .default(false)
        .interact()?;

    Ok(InitAnswers {
        language: locale.to_string(),
        sim_mode: modes[mode_index].to_string(),
        sim_num,
        command,
        cases: cases
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(String::from)
            .collect(),
        dispatch,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{parse_config_str, SimMode};
    use crate::core::selection::select_test_list;
    use std::path::Path;

    #[test]
    fn default_config_parses() {
        let cfg = parse_config_str(&render_config(&InitAnswers::default()), Path::new(".")).unwrap();
        assert_eq!(cfg.config.sim_mode, SimMode::Part);
        assert_eq!(cfg.config.sim_num, Some(4));
        assert_eq!(cfg.config.command.as_deref(), Some("make sim TEST={case}"));
        assert_eq!(cfg.record.log_file, "{case}.log");
        assert_eq!(select_test_list(&cfg), vec!["smoke_test"]);
        assert_eq!(cfg.case.list.len(), 3);
    }

    #[test]
    fn all_mode_answers_select_every_case() {
        let answers = InitAnswers {
            sim_mode: "all".to_string(),
            cases: vec!["a".into(), "b".into()],
            ..InitAnswers::default()
        };
        let cfg = parse_config_str(&render_config(&answers), Path::new(".")).unwrap();
        assert_eq!(select_test_list(&cfg), vec!["a", "b"]);
    }
}
