//! Command execution handlers
//!
//! The command is validated through the guard, then run by the configured
//! shell with a bounded wait. Every outcome, including validation failures,
//! timeouts and spawn errors, is folded into a [`CommandResult`].

use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use mcp_common::{json_success, CallToolResult, McpResult};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};

use crate::guard::CommandGuard;
use crate::params::TerminalToolParams;
use crate::types::{CommandResult, Config, ExecError, FAILURE_EXIT_CODE};

// ============================================================================
// Helper Functions
// ============================================================================

/// Read a captured stream to the end; a missing handle reads as empty
async fn read_stream<R: AsyncRead + Unpin>(stream: Option<&mut R>) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(stream) = stream {
        stream.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

/// Map an exit status to the reported exit code
///
/// A process killed by a signal has no code; report the negated signal number.
fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }

    FAILURE_EXIT_CODE
}

/// SIGKILLs the command's process group unless released
///
/// Lives in `run` next to the child, so dropping the `execute` future (client
/// cancellation) kills background jobs too; `kill_on_drop` only reaches the
/// shell itself.
///
/// The pgid is the shell's pid captured at spawn. A group id cannot be reused
/// while any member is alive, and we only signal while the pipes are still
/// open (some member holds them) or the shell is unreaped. If the group has
/// emptied anyway, `killpg` fails with `ESRCH`, which is ignored.
struct ProcessGroup {
    pgid: Option<u32>,
}

impl ProcessGroup {
    fn new(pgid: Option<u32>) -> Self {
        Self { pgid }
    }

    fn kill(&mut self) {
        if let Some(pgid) = self.pgid.take() {
            #[cfg(unix)]
            {
                let _ = unsafe { libc::killpg(pgid as libc::pid_t, libc::SIGKILL) };
            }
            #[cfg(not(unix))]
            let _ = pgid;
        }
    }

    /// Natural completion: leave surviving detached jobs alone
    fn release(&mut self) {
        self.pgid = None;
    }
}

impl Drop for ProcessGroup {
    fn drop(&mut self) {
        self.kill();
    }
}

/// Kill the child and everything it started, then reap it
async fn terminate(child: &mut Child, group: &mut ProcessGroup) {
    group.kill();

    // kill() also waits, so the process is reaped before we return
    if let Err(e) = child.kill().await {
        tracing::debug!("Child already exited before kill: {}", e);
    }
}

/// Spawn `shell -c command` in a new process group with captured output
fn spawn_shell(shell: &str, command: &str) -> std::io::Result<Child> {
    let mut std_cmd = std::process::Command::new(shell);
    std_cmd.arg("-c").arg(command);

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        std_cmd.process_group(0);
    }

    let mut cmd = Command::from(std_cmd);
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    cmd.spawn()
}

/// Validate, spawn and wait for a command
async fn run(
    guard: &CommandGuard,
    config: &Config,
    command: &str,
    timeout: Option<i64>,
) -> Result<CommandResult, ExecError> {
    // 1. Validate command and timeout
    let timeout_secs = guard
        .validate(command, timeout)?
        .unwrap_or(config.timeouts.default_secs);

    tracing::debug!(command, timeout_secs, "Executing command");

    // 2. Spawn through the shell
    let mut child = spawn_shell(guard.shell(), command)?;
    let mut group = ProcessGroup::new(child.id());
    let mut stdout = child.stdout.take();
    let mut stderr = child.stderr.take();

    // 3. Drain both pipes while waiting, bounded by the timeout
    let outcome = tokio::time::timeout(Duration::from_secs(timeout_secs), async {
        tokio::try_join!(
            read_stream(stdout.as_mut()),
            read_stream(stderr.as_mut()),
            child.wait(),
        )
    })
    .await;

    match outcome {
        Ok(Ok((out, err, status))) => {
            group.release();
            Ok(CommandResult {
                stdout: String::from_utf8_lossy(&out).into_owned(),
                stderr: String::from_utf8_lossy(&err).into_owned(),
                exit_code: exit_code_of(status),
            })
        }
        Ok(Err(io_err)) => {
            terminate(&mut child, &mut group).await;
            Err(ExecError::Io(io_err))
        }
        Err(_elapsed) => {
            terminate(&mut child, &mut group).await;
            Err(ExecError::Timeout(timeout_secs))
        }
    }
}

// ============================================================================
// Public Operations
// ============================================================================

/// Execute a shell command and report its outcome
///
/// Never fails: errors are reported through `exit_code` and `stderr`.
pub async fn execute(
    guard: &CommandGuard,
    config: &Config,
    command: &str,
    timeout: Option<i64>,
) -> CommandResult {
    match run(guard, config, command, timeout).await {
        Ok(result) => {
            tracing::info!(exit_code = result.exit_code, "Command finished");
            result
        }
        Err(err) => {
            match &err {
                ExecError::EmptyCommand => tracing::debug!("Rejected empty command"),
                ExecError::CommandDenied { pattern } => {
                    tracing::warn!(command, pattern = pattern.as_str(), "Command blocked")
                }
                ExecError::InvalidTimeout { value, max } => {
                    tracing::debug!(value, max, "Rejected timeout out of range")
                }
                ExecError::Timeout(secs) => tracing::warn!(command, secs, "Command timed out"),
                ExecError::Io(e) => tracing::error!(command, "Failed to execute command: {}", e),
                ExecError::ConfigError(msg) => tracing::error!("Guard misconfigured: {}", msg),
            }
            err.into()
        }
    }
}

pub async fn terminal_tool(
    guard: &CommandGuard,
    config: &Config,
    params: TerminalToolParams,
) -> McpResult<CallToolResult> {
    let result = execute(guard, config, &params.command, params.timeout).await;
    json_success(&result)
}
