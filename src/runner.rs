//! Runs companion invocations away from the UI thread.
//!
//! A run moves `Idle -> Running -> {Succeeded, ExecutableMissing, Failed}`.
//! [`ProcessRunner::dispatch`] reports `Running` before returning and posts the
//! terminal outcome on the channel once the child exits. There is no timeout
//! and no cancellation: a hung companion keeps its run in `Running`.

use std::io;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;

use log::{debug, error, info};

use crate::command::Invocation;

pub type RunId = u64;

/// Called after an event is posted so the UI loop wakes up.
pub type Waker = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Succeeded { stdout: String },
    ExecutableMissing { path: PathBuf },
    Failed { stderr: String, exit_code: Option<i32> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Succeeded,
    ExecutableMissing,
    Failed,
}

impl RunState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RunState::Succeeded | RunState::ExecutableMissing | RunState::Failed
        )
    }
}

impl From<&DownloadOutcome> for RunState {
    fn from(outcome: &DownloadOutcome) -> Self {
        match outcome {
            DownloadOutcome::Succeeded { .. } => RunState::Succeeded,
            DownloadOutcome::ExecutableMissing { .. } => RunState::ExecutableMissing,
            DownloadOutcome::Failed { .. } => RunState::Failed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    Started { id: RunId },
    Finished { id: RunId, outcome: DownloadOutcome },
}

/// Captured result of a child process that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    pub exit_code: Option<i32>,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

pub trait Spawner: Send + Sync {
    /// Runs the invocation to completion, capturing both streams in full.
    fn output(&self, invocation: &Invocation) -> io::Result<ProcessOutput>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemSpawner;

impl Spawner for SystemSpawner {
    fn output(&self, invocation: &Invocation) -> io::Result<ProcessOutput> {
        let output = Command::new(invocation.program())
            .args(invocation.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()?;

        Ok(ProcessOutput {
            exit_code: output.status.code(),
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[derive(Debug, Default)]
pub struct ProcessRunner<S = SystemSpawner> {
    spawner: S,
}

impl<S: Spawner> ProcessRunner<S> {
    pub fn new(spawner: S) -> Self {
        Self { spawner }
    }

    /// Blocks until the companion exits. Call from a background thread.
    pub fn run(&self, invocation: &Invocation) -> DownloadOutcome {
        let program = invocation.program();
        debug!(
            "Checking companion at {}: exists = {}",
            program.display(),
            program.exists()
        );

        if !program.exists() {
            error!("Companion executable not found at {}", program.display());
            return DownloadOutcome::ExecutableMissing {
                path: program.to_path_buf(),
            };
        }

        debug!("Running: {}", invocation.argv().join(" "));

        match self.spawner.output(invocation) {
            Ok(output) if output.success => {
                info!("Download completed: {}", output.stdout.trim_end());
                DownloadOutcome::Succeeded {
                    stdout: output.stdout,
                }
            }
            Ok(output) => {
                error!(
                    "Download failed with status {:?}: {}",
                    output.exit_code,
                    output.stderr.trim_end()
                );
                DownloadOutcome::Failed {
                    stderr: output.stderr,
                    exit_code: output.exit_code,
                }
            }
            Err(e) => {
                error!("Failed to start {}: {}", program.display(), e);
                DownloadOutcome::Failed {
                    stderr: e.to_string(),
                    exit_code: None,
                }
            }
        }
    }
}

impl<S: Spawner + 'static> ProcessRunner<S> {
    /// Posts `Started` immediately, then runs the invocation on its own thread
    /// and posts `Finished`. Each call gets an independent thread and buffers.
    pub fn dispatch(
        self: &Arc<Self>,
        id: RunId,
        invocation: Invocation,
        tx: Sender<RunEvent>,
        waker: Option<Waker>,
    ) -> thread::JoinHandle<()> {
        if let Err(e) = tx.send(RunEvent::Started { id }) {
            error!("Failed to report start of run {}: {}", id, e);
        }
        if let Some(wake) = &waker {
            wake();
        }

        let runner = Arc::clone(self);
        thread::spawn(move || {
            let outcome = runner.run(&invocation);
            if let Err(e) = tx.send(RunEvent::Finished { id, outcome }) {
                error!("Failed to send result of run {}: {}", id, e);
            }
            if let Some(wake) = &waker {
                wake();
            }
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::command::build;
    use crate::settings::Settings;
    use assert_matches::assert_matches;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;
    use tempfile::NamedTempFile;

    /// Counts spawns and answers with a canned result.
    pub(crate) struct FakeSpawner {
        pub spawns: AtomicUsize,
        pub reply: Box<dyn Fn(&Invocation) -> io::Result<ProcessOutput> + Send + Sync>,
    }

    impl FakeSpawner {
        pub fn replying(
            reply: impl Fn(&Invocation) -> io::Result<ProcessOutput> + Send + Sync + 'static,
        ) -> Self {
            Self {
                spawns: AtomicUsize::new(0),
                reply: Box::new(reply),
            }
        }

        pub fn ok(stdout: &str) -> Self {
            let stdout = stdout.to_string();
            Self::replying(move |_| {
                Ok(ProcessOutput {
                    exit_code: Some(0),
                    success: true,
                    stdout: stdout.clone(),
                    stderr: String::new(),
                })
            })
        }

        pub fn spawn_count(&self) -> usize {
            self.spawns.load(Ordering::SeqCst)
        }
    }

    impl Spawner for FakeSpawner {
        fn output(&self, invocation: &Invocation) -> io::Result<ProcessOutput> {
            self.spawns.fetch_add(1, Ordering::SeqCst);
            (self.reply)(invocation)
        }
    }

    fn invocation_for(program: &Path, url: &str) -> Invocation {
        build(&Settings::default(), url, program).unwrap()
    }

    #[test]
    fn missing_executable_is_reported_without_spawning() {
        let runner = ProcessRunner::new(FakeSpawner::ok("never"));
        let missing = PathBuf::from("/definitely/not/here/spotdl");

        let outcome = runner.run(&invocation_for(&missing, "https://x"));

        assert_eq!(outcome, DownloadOutcome::ExecutableMissing { path: missing });
        assert_eq!(runner.spawner.spawn_count(), 0);
    }

    #[test]
    fn zero_exit_is_success_with_stdout() {
        let companion = NamedTempFile::new().unwrap();
        let runner = ProcessRunner::new(FakeSpawner::ok("ok"));

        let outcome = runner.run(&invocation_for(companion.path(), "https://x"));

        assert_eq!(
            outcome,
            DownloadOutcome::Succeeded {
                stdout: "ok".to_string()
            }
        );
        assert_eq!(runner.spawner.spawn_count(), 1);
    }

    #[test]
    fn non_zero_exit_is_failure_with_stderr() {
        let companion = NamedTempFile::new().unwrap();
        let runner = ProcessRunner::new(FakeSpawner::replying(|_| {
            Ok(ProcessOutput {
                exit_code: Some(1),
                success: false,
                stdout: String::new(),
                stderr: "bad url".to_string(),
            })
        }));

        let outcome = runner.run(&invocation_for(companion.path(), "https://x"));

        assert_eq!(
            outcome,
            DownloadOutcome::Failed {
                stderr: "bad url".to_string(),
                exit_code: Some(1)
            }
        );
    }

    #[test]
    fn spawn_error_is_failure_without_exit_code() {
        let companion = NamedTempFile::new().unwrap();
        let runner = ProcessRunner::new(FakeSpawner::replying(|_| {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        }));

        let outcome = runner.run(&invocation_for(companion.path(), "https://x"));

        assert_matches!(
            outcome,
            DownloadOutcome::Failed { stderr, exit_code: None } if stderr.contains("denied")
        );
    }

    #[test]
    fn dispatch_reports_running_before_finishing() {
        let companion = NamedTempFile::new().unwrap();
        let runner = Arc::new(ProcessRunner::new(FakeSpawner::ok("done")));
        let (tx, rx) = mpsc::channel();

        let handle = runner.dispatch(7, invocation_for(companion.path(), "https://x"), tx, None);
        handle.join().unwrap();

        assert_eq!(rx.recv().unwrap(), RunEvent::Started { id: 7 });
        assert_eq!(
            rx.recv().unwrap(),
            RunEvent::Finished {
                id: 7,
                outcome: DownloadOutcome::Succeeded {
                    stdout: "done".to_string()
                }
            }
        );
    }

    #[test]
    fn dispatch_wakes_the_caller_for_each_event() {
        let companion = NamedTempFile::new().unwrap();
        let runner = Arc::new(ProcessRunner::new(FakeSpawner::ok("done")));
        let (tx, _rx) = mpsc::channel();
        let wakes = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&wakes);
        let waker: Waker = Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        runner
            .dispatch(1, invocation_for(companion.path(), "https://x"), tx, Some(waker))
            .join()
            .unwrap();

        assert_eq!(wakes.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn concurrent_runs_keep_their_own_output() {
        let companion = NamedTempFile::new().unwrap();
        let runner = Arc::new(ProcessRunner::new(FakeSpawner::replying(|inv| {
            let url = inv.args().last().cloned().unwrap_or_default();
            std::thread::sleep(std::time::Duration::from_millis(20));
            Ok(ProcessOutput {
                exit_code: Some(0),
                success: true,
                stdout: url,
                stderr: String::new(),
            })
        })));
        let (tx, rx) = mpsc::channel();

        let a = runner.dispatch(1, invocation_for(companion.path(), "https://a"), tx.clone(), None);
        let b = runner.dispatch(2, invocation_for(companion.path(), "https://b"), tx, None);
        a.join().unwrap();
        b.join().unwrap();

        let finished: Vec<_> = rx
            .try_iter()
            .filter_map(|event| match event {
                RunEvent::Finished { id, outcome } => Some((id, outcome)),
                RunEvent::Started { .. } => None,
            })
            .collect();
        assert_eq!(finished.len(), 2);
        for (id, outcome) in finished {
            let expected = if id == 1 { "https://a" } else { "https://b" };
            assert_eq!(
                outcome,
                DownloadOutcome::Succeeded {
                    stdout: expected.to_string()
                }
            );
        }
    }

    #[test]
    fn terminal_states() {
        assert!(!RunState::Idle.is_terminal());
        assert!(!RunState::Running.is_terminal());
        assert!(RunState::Succeeded.is_terminal());
        assert!(RunState::ExecutableMissing.is_terminal());
        assert!(RunState::Failed.is_terminal());
    }

    #[cfg(target_os = "linux")]
    mod system_binaries {
        use super::*;

        const ECHO: &str = "/bin/echo";
        const FALSE: &str = "/bin/false";

        #[test]
        fn real_process_receives_arguments_in_order() {
            let outcome =
                ProcessRunner::new(SystemSpawner).run(&invocation_for(Path::new(ECHO), " https://x "));

            assert_eq!(
                outcome,
                DownloadOutcome::Succeeded {
                    stdout: "--audio youtube-music --format mp3 --bitrate 320k --output ./downloads https://x\n"
                        .to_string()
                }
            );
        }

        #[test]
        fn real_process_failure_keeps_exit_code() {
            let outcome =
                ProcessRunner::new(SystemSpawner).run(&invocation_for(Path::new(FALSE), "https://x"));

            assert_eq!(
                outcome,
                DownloadOutcome::Failed {
                    stderr: String::new(),
                    exit_code: Some(1)
                }
            );
        }

        #[test]
        fn concurrent_real_processes_do_not_cross_talk() {
            let runner = Arc::new(ProcessRunner::new(SystemSpawner));
            let (tx, rx) = mpsc::channel();

            let a = runner.dispatch(1, invocation_for(Path::new(ECHO), "https://a"), tx.clone(), None);
            let b = runner.dispatch(2, invocation_for(Path::new(ECHO), "https://b"), tx, None);
            a.join().unwrap();
            b.join().unwrap();

            let mut outputs: Vec<_> = rx
                .try_iter()
                .filter_map(|event| match event {
                    RunEvent::Finished { id, outcome } => Some((id, outcome)),
                    RunEvent::Started { .. } => None,
                })
                .collect();
            outputs.sort_by_key(|(id, _)| *id);

            assert_eq!(outputs.len(), 2);
            assert_matches!(&outputs[0].1, DownloadOutcome::Succeeded { stdout } if stdout.ends_with("https://a\n"));
            assert_matches!(&outputs[1].1, DownloadOutcome::Succeeded { stdout } if stdout.ends_with("https://b\n"));
        }
    }

    #[cfg(unix)]
    mod stub_scripts {
        use super::*;
        use std::fs;
        use std::os::unix::fs::PermissionsExt;
        use std::time::Duration;
        use tempfile::TempDir;

        fn write_script(dir: &TempDir, body: &str) -> PathBuf {
            let path = dir.path().join("spotdl");
            fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        /// Exec can briefly fail with "Text file busy" while another test's
        /// fork still holds the script's write handle.
        fn run_script(script: &Path) -> DownloadOutcome {
            let runner = ProcessRunner::new(SystemSpawner);
            let mut outcome = runner.run(&invocation_for(script, "https://x"));
            for _ in 0..10 {
                match &outcome {
                    DownloadOutcome::Failed { exit_code: None, stderr } if stderr.contains("busy") => {
                        thread::sleep(Duration::from_millis(20));
                        outcome = runner.run(&invocation_for(script, "https://x"));
                    }
                    _ => break,
                }
            }
            outcome
        }

        #[test]
        fn script_failure_keeps_stderr_and_exit_code() {
            let dir = TempDir::new().unwrap();
            let script = write_script(&dir, "echo 'bad url' >&2; exit 1");

            assert_eq!(
                run_script(&script),
                DownloadOutcome::Failed {
                    stderr: "bad url\n".to_string(),
                    exit_code: Some(1)
                }
            );
        }

        #[test]
        fn script_output_is_returned_on_success() {
            let dir = TempDir::new().unwrap();
            let script = write_script(&dir, "echo \"Downloaded $9\"");

            assert_eq!(
                run_script(&script),
                DownloadOutcome::Succeeded {
                    stdout: "Downloaded https://x\n".to_string()
                }
            );
        }
    }
}
