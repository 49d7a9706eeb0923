//! Process Invocation
//!
//! Spawns one external tool, feeds it stdin, drains stdout/stderr and reaps it
//! with `wait4` so the CPU time reported belongs to that child alone.
//!
//! The process-wide `RUSAGE_CHILDREN` aggregate is never consulted; CPU time is
//! read from the rusage of the reaped pid only.
//!
//! ## Deadline handling
//!
//! ```text
//! spawn ──► poll wait4(WNOHANG) ──► exited ──► Ok(ProcessOutput)
//!                 │
//!                 ▼ deadline
//!             SIGTERM ──► grace period ──► SIGKILL ──► Err(Timeout)
//! ```
//!
//! Tools run in their own process group and signals go to the whole group, so
//! helpers a wrapper script forks die with it. Pipe helper threads are not
//! joined past the deadline.

use crate::error::CodecError;
use std::ffi::OsStr;
use std::io::{self, Read, Write};
use std::mem::MaybeUninit;
use std::os::unix::process::CommandExt;
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

/// Grace period between SIGTERM and SIGKILL.
const TERMINATE_GRACE: Duration = Duration::from_millis(500);

/// Upper bound of the reap polling interval.
const MAX_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Number of stderr bytes kept for diagnostics.
const STDERR_TAIL: usize = 512;

/// Captured result of one finished tool invocation.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// Everything the tool wrote to stdout
    pub stdout: Vec<u8>,
    /// Everything the tool wrote to stderr
    pub stderr: Vec<u8>,
    /// User + system CPU time of the child process
    pub cpu_time: Duration,
}

/// Output of a codec call together with the CPU time it cost.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Compressed or decompressed bytes
    pub output: Vec<u8>,
    /// CPU time attributed to the codec process for this call
    pub cpu_time: Duration,
}

/// Runs external tools synchronously with a bounded wait.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    timeout: Duration,
}

impl ProcessRunner {
    /// Create a runner that kills tools exceeding `timeout`.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Run `program` with `args`, optionally piping `input` to its stdin.
    ///
    /// Blocks until the tool exits or the deadline expires. A non-zero exit
    /// status or a termination signal is reported as
    /// [`CodecError::ToolInvocation`] carrying the tail of the tool's stderr.
    pub fn run<I, S>(
        &self,
        program: &OsStr,
        args: I,
        input: Option<&[u8]>,
    ) -> Result<ProcessOutput, CodecError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let tool = program.to_string_lossy().into_owned();

        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .process_group(0);

        let mut child = command
            .spawn()
            .map_err(|e| CodecError::invocation(&tool, format!("failed to spawn: {}", e)))?;
        let pid = child.id() as libc::pid_t;
        let deadline = Instant::now() + self.timeout;

        // Feed and drain concurrently so full pipes cannot block the child
        let stdin = child.stdin.take();
        let payload = input.map(<[u8]>::to_vec);
        let fed = spawn_pipe_thread(move || match (stdin, payload) {
            (Some(mut pipe), Some(data)) => pipe.write_all(&data),
            _ => Ok(()),
        });
        let stdout = child.stdout.take();
        let stdout = spawn_pipe_thread(move || drain(stdout));
        let stderr = child.stderr.take();
        let stderr = spawn_pipe_thread(move || drain(stderr));

        let reaped = match wait_until(pid, deadline)? {
            Some(reaped) => reaped,
            None => {
                terminate_group(pid)?;
                return Err(self.timed_out(tool));
            }
        };

        // Helpers left behind by the tool may still hold the pipes open
        let (Some(stdout), Some(stderr), Some(fed)) = (
            collect(&stdout, deadline),
            collect(&stderr, deadline),
            collect(&fed, deadline),
        ) else {
            signal_group(pid, libc::SIGKILL);
            return Err(self.timed_out(tool));
        };

        let stderr = stderr?;
        if let Some(reason) = reaped.failure_reason(&stderr) {
            return Err(CodecError::invocation(tool, reason));
        }

        // A tool that exits successfully without reading all of its input
        // closes the pipe early; the exit status is authoritative.
        if let Err(e) = fed {
            if e.kind() != io::ErrorKind::BrokenPipe {
                return Err(CodecError::Io(e));
            }
        }

        Ok(ProcessOutput {
            stdout: stdout?,
            stderr,
            cpu_time: reaped.cpu_time(),
        })
    }

    fn timed_out(&self, tool: String) -> CodecError {
        tracing::warn!(tool = %tool, timeout = ?self.timeout, "tool killed after deadline");
        CodecError::Timeout {
            tool,
            after: self.timeout,
        }
    }
}

fn drain<R: Read>(pipe: Option<R>) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf)?;
    }
    Ok(buf)
}

/// Run a pipe helper on a detached thread. A helper that is still blocked
/// when the deadline passes is abandoned rather than joined.
fn spawn_pipe_thread<T, F>(work: F) -> mpsc::Receiver<io::Result<T>>
where
    T: Send + 'static,
    F: FnOnce() -> io::Result<T> + Send + 'static,
{
    let (tx, rx) = mpsc::sync_channel(1);
    thread::spawn(move || {
        let _ = tx.send(work());
    });
    rx
}

/// Result of a pipe helper, or `None` if it did not finish before `deadline`.
fn collect<T>(rx: &mpsc::Receiver<io::Result<T>>, deadline: Instant) -> Option<io::Result<T>> {
    let remaining = deadline.saturating_duration_since(Instant::now());
    match rx.recv_timeout(remaining) {
        Ok(result) => Some(result),
        Err(mpsc::RecvTimeoutError::Timeout) => None,
        Err(mpsc::RecvTimeoutError::Disconnected) => {
            Some(Err(io::Error::other("pipe helper thread panicked")))
        }
    }
}

/// Exit status and resource usage of a reaped child.
struct Reaped {
    status: libc::c_int,
    usage: libc::rusage,
}

impl Reaped {
    fn cpu_time(&self) -> Duration {
        timeval_to_duration(self.usage.ru_utime) + timeval_to_duration(self.usage.ru_stime)
    }

    /// `None` when the child exited with status 0.
    fn failure_reason(&self, stderr: &[u8]) -> Option<String> {
        let detail = stderr_tail(stderr);
        if libc::WIFEXITED(self.status) {
            match libc::WEXITSTATUS(self.status) {
                0 => None,
                code => Some(format!("exited with status {}{}", code, detail)),
            }
        } else if libc::WIFSIGNALED(self.status) {
            Some(format!(
                "terminated by signal {}{}",
                libc::WTERMSIG(self.status),
                detail
            ))
        } else {
            Some(format!("stopped with raw status {}{}", self.status, detail))
        }
    }
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }
    let start = text
        .char_indices()
        .rev()
        .nth(STDERR_TAIL.saturating_sub(1))
        .map(|(i, _)| i)
        .unwrap_or(0);
    format!(": {}", &text[start..])
}

fn timeval_to_duration(tv: libc::timeval) -> Duration {
    Duration::new(tv.tv_sec.max(0) as u64, (tv.tv_usec.max(0) as u32) * 1_000)
}

/// Reap `pid` if it has exited. `options` is passed through to `wait4`.
fn try_reap(pid: libc::pid_t, options: libc::c_int) -> io::Result<Option<Reaped>> {
    let mut status: libc::c_int = 0;
    let mut usage = MaybeUninit::<libc::rusage>::zeroed();

    loop {
        // SAFETY: `status` and `usage` are valid for writes for the duration of
        // the call; `usage` is zero-initialized so it is valid even if the
        // kernel leaves it untouched.
        let ret = unsafe { libc::wait4(pid, &mut status, options, usage.as_mut_ptr()) };

        if ret == pid {
            // SAFETY: zero-initialized and possibly filled in by wait4.
            let usage = unsafe { usage.assume_init() };
            return Ok(Some(Reaped { status, usage }));
        }
        if ret == 0 {
            return Ok(None);
        }

        let err = io::Error::last_os_error();
        if err.kind() != io::ErrorKind::Interrupted {
            return Err(err);
        }
    }
}

/// Poll for the child's exit until `deadline`. `None` means it is still running.
fn wait_until(pid: libc::pid_t, deadline: Instant) -> io::Result<Option<Reaped>> {
    let mut interval = Duration::from_micros(200);

    loop {
        if let Some(reaped) = try_reap(pid, libc::WNOHANG)? {
            return Ok(Some(reaped));
        }

        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Ok(None);
        }

        thread::sleep(interval.min(remaining));
        interval = (interval * 2).min(MAX_POLL_INTERVAL);
    }
}

/// Send `signal` to the tool's process group, which includes any helpers it
/// spawned. Delivery errors are ignored: the group may already be gone.
fn signal_group(pgid: libc::pid_t, signal: libc::c_int) {
    // SAFETY: plain syscall; a negative pid addresses the process group.
    let _ = unsafe { libc::kill(-pgid, signal) };
}

/// SIGTERM the group, wait out the grace period, then SIGKILL it and reap.
fn terminate_group(pid: libc::pid_t) -> io::Result<()> {
    signal_group(pid, libc::SIGTERM);

    let grace_deadline = Instant::now() + TERMINATE_GRACE;
    let mut reaped = false;
    while Instant::now() < grace_deadline {
        if try_reap(pid, libc::WNOHANG)?.is_some() {
            reaped = true;
            break;
        }
        thread::sleep(Duration::from_millis(10));
    }

    signal_group(pid, libc::SIGKILL);
    if !reaped {
        try_reap(pid, 0)?;
    }
    Ok(())
}
