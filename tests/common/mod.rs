// Shared test helpers for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

use regression_driver::config::{parse_config, RegressionConfig};

/// A throwaway regression directory: `regression.toml`, `log/`, `report/`.
pub struct RegressionDir {
    pub dir: TempDir,
}

impl RegressionDir {
    pub fn new(config: &str) -> Self {
        let dir = tempdir().expect("Failed to create temporary directory");
        fs::write(dir.path().join("regression.toml"), config).expect("Failed to write regression.toml");
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.root().join("regression.toml")
    }

    pub fn load(&self) -> RegressionConfig {
        parse_config(self.root()).expect("Failed to load test configuration")
    }

    pub fn write_log(&self, case: &str, content: &str) {
        let log_dir = self.root().join("log");
        fs::create_dir_all(&log_dir).expect("Failed to create log directory");
        fs::write(log_dir.join(format!("{case}.log")), content).expect("Failed to write log");
    }

    pub fn report_file(&self, name: &str) -> PathBuf {
        self.root().join("report").join(name)
    }
}

/// A config in `mode` over the catalog `a, b, c, d` with `part_list = ["c", "a"]`.
pub fn config_text(mode: &str, extra_config: &str) -> String {
    format!(
        r#"
language = "en"

[config]
sim_mode = "{mode}"
sim_num = 2
part_list = ["c", "a"]
{extra_config}

[case]
list = ["a", "b", "c", "d"]
"#
    )
}

pub const PASS_LOG: &str = "init\nrunning sequence\nTEST PASSED\n";
pub const FAIL_LOG_1: &str = "init\nUVM_ERROR @ 1200ns [SCB] data mismatch at 0x1F00\nTEST PASSED\n";
pub const FAIL_LOG_2: &str = "init\nUVM_ERROR @ 3400ns [SCB] data mismatch at 0x2A10\n";
pub const HUNG_LOG: &str = "init\nwaiting for interrupt\n";
