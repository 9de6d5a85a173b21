//! # Command Execution Module / 命令执行模块
//!
//! Renders per-case command templates and spawns them with their output
//! captured.
//!
//! 渲染单个用例的命令模板，并在捕获输出的情况下派生进程。

use anyhow::{anyhow, Result};
use std::io::ErrorKind;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Child;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::infra::t;

/// A command template rendered for one case.
/// 为单个用例渲染的命令模板。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCommand {
    pub program: String,
    pub args: Vec<String>,
    /// The full command line after substitution and expansion, for logs.
    /// 替换和展开后的完整命令行，用于日志。
    pub display: String,
}

/// Renders a command template for `case`.
///
/// `{case}` is substituted first, then environment variables and `~` are
/// expanded, then the line is split into shell words. Variables that are not
/// set in the environment are left as written, so the spawned shell can
/// expand them itself.
///
/// 为 `case` 渲染命令模板。
/// 先替换 `{case}`，再展开环境变量和 `~`，最后按 shell 规则拆分。
/// 环境中未设置的变量保持原样，由被派生的 shell 自行展开。
pub fn render_case_command(template: &str, case: &str) -> Result<RenderedCommand> {
    let substituted = template.replace("{case}", case);
    let env_expanded =
        shellexpand::env_with_context_no_errors(&substituted, |name| std::env::var(name).ok());
    let expanded = shellexpand::tilde(&env_expanded).into_owned();

    let mut parts = shlex::split(&expanded)
        .ok_or_else(|| anyhow!(t!("command.parse_failed", command = &expanded).to_string()))?;

    if parts.is_empty() {
        return Err(anyhow!(t!("command.empty").to_string()));
    }

    let program = parts.remove(0);
    Ok(RenderedCommand {
        program,
        args: parts,
        display: expanded,
    })
}

/// Shared buffer the output readers append to.
pub type OutputSink = Arc<Mutex<Vec<u8>>>;

/// A running child whose stdout and stderr are being collected.
/// 一个正在运行、其 stdout 和 stderr 正被收集的子进程。
pub struct CapturedChild {
    child: Child,
    output: OutputSink,
    readers: [JoinHandle<()>; 2],
}

impl CapturedChild {
    /// The OS process id, while the child has not been reaped.
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// A handle on the output collected so far. Stays readable after the
    /// child is dropped.
    pub fn output_sink(&self) -> OutputSink {
        Arc::clone(&self.output)
    }

    /// Waits for the child to exit and for both streams to be drained.
    ///
    /// # Returns
    /// A tuple containing:
    /// - The `ExitStatus` of the process wrapped in an `io::Result`.
    /// - The combined stdout and stderr as raw bytes.
    ///
    /// 等待子进程退出并读完两个输出流。
    pub async fn wait(mut self) -> (std::io::Result<ExitStatus>, Vec<u8>) {
        let status = self.child.wait().await;

        // Drain both readers so no trailing output is lost.
        for reader in self.readers {
            let _ = reader.await;
        }

        let captured = self.output.lock().await.clone();
        (status, captured)
    }
}

/// Spawns a command, captures its stdout and stderr.
/// The output streams are read concurrently, byte for byte, and combined
/// line by line into a single buffer. Bytes that are not valid UTF-8 are kept
/// as they are.
///
/// 派生一个命令，捕获其 stdout 和 stderr。
/// 输出流被并发地按字节读取，并逐行合并到一个缓冲区中。非 UTF-8 字节保持原样。
pub fn spawn_and_capture(mut cmd: tokio::process::Command) -> std::io::Result<CapturedChild> {
    let mut child = cmd.stdout(Stdio::piped()).stderr(Stdio::piped()).spawn()?;

    let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
        return Err(std::io::Error::other(t!("command.capture_failed").to_string()));
    };

    let output: OutputSink = Arc::new(Mutex::new(Vec::new()));
    let readers = [
        tokio::spawn(pump(stdout, Arc::clone(&output))),
        tokio::spawn(pump(stderr, Arc::clone(&output))),
    ];

    Ok(CapturedChild {
        child,
        output,
        readers,
    })
}

/// Copies complete lines from `reader` into `sink` until end of stream.
async fn pump<R: AsyncRead + Unpin>(reader: R, sink: OutputSink) {
    let mut reader = BufReader::new(reader);
    let mut line = Vec::new();
    loop {
        line.clear();
        match reader.read_until(b'\n', &mut line).await {
            Ok(0) => break,
            Ok(_) => {
                if !line.ends_with(b"\n") {
                    line.push(b'\n');
                }
                sink.lock().await.extend_from_slice(&line);
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(_) => break,
        }
    }
}

/// Puts the command in a new process group so the whole tree can be killed.
pub fn isolate_process_group(cmd: &mut tokio::process::Command) {
    #[cfg(unix)]
    cmd.process_group(0);
    #[cfg(not(unix))]
    let _ = cmd;
}

/// Kills every process in the group led by `pid`.
///
/// The group outlives its leader, so this also reaches processes that a
/// shell or `make` started before it was killed.
///
/// 终止以 `pid` 为组长的进程组中的所有进程。
pub fn kill_process_group(pid: u32) {
    #[cfg(unix)]
    {
        use nix::sys::signal::{killpg, Signal};
        use nix::unistd::Pid;

        if let Ok(raw) = i32::try_from(pid) {
            // ESRCH means the group is already gone.
            let _ = killpg(Pid::from_raw(raw), Signal::SIGKILL);
        }
    }
    #[cfg(not(unix))]
    let _ = pid;
}
