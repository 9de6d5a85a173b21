//! # File System Operations Module / 文件系统操作模块
//!
//! Path resolution and small write helpers shared by dispatch and reporting.
//!
//! 调度和报告共用的路径解析与写入辅助函数。

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::config::CONFIG_FILE_NAME;
use crate::infra::t;

/// Resolves the configuration path: a directory means `regression.toml` inside it.
///
/// 解析配置路径：若为目录，则使用其中的 `regression.toml`。
pub fn resolve_config_path(path: &Path) -> Result<PathBuf> {
    let candidate = if path.is_dir() {
        path.join(CONFIG_FILE_NAME)
    } else {
        path.to_path_buf()
    };
    fs::canonicalize(&candidate)
        .with_context(|| t!("config.not_found", path = candidate.display()).to_string())
}

/// Encodes a case name as a single file name.
///
/// Letters, digits, `-`, `_` and `.` are kept. Every other byte becomes `%XX`,
/// `%` included, so distinct case names never share a file. A name made only
/// of dots is fully encoded so it cannot step out of the log directory.
///
/// 将用例名称编码为单个文件名。
/// 保留字母、数字、`-`、`_` 和 `.`。其他字节（包括 `%`）都编码为 `%XX`，
/// 因此不同的用例名称不会共用同一个文件。
pub fn sanitize_case_name(case: &str) -> String {
    let only_dots = !case.is_empty() && case.chars().all(|c| c == '.');
    let mut out = String::with_capacity(case.len());
    for c in case.chars() {
        if !only_dots && (c.is_alphanumeric() || matches!(c, '-' | '_' | '.')) {
            out.push(c);
        } else {
            let mut buf = [0u8; 4];
            for byte in c.encode_utf8(&mut buf).bytes() {
                out.push_str(&format!("%{byte:02X}"));
            }
        }
    }
    out
}

/// Creates a directory and all of its parents.
pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .with_context(|| t!("fs.create_dir_failed", path = path.display()).to_string())
}

/// Writes `contents` to `path`, creating parent directories first.
/// 将 `contents` 写入 `path`，必要时先创建父目录。
pub fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }
    fs::write(path, contents)
        .with_context(|| t!("fs.write_failed", path = path.display()).to_string())
}
