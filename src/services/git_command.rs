use std::ffi::OsString;
use std::io::Read;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::ports::{Git, GitError};

/// Upper bound on a single git invocation.
pub const GIT_TIMEOUT: Duration = Duration::from_secs(2);

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Runs the `git` executable as a subprocess with a timeout.
#[derive(Debug, Clone)]
pub struct GitCommandAdapter {
    root: PathBuf,
    program: OsString,
    prefix_args: Vec<OsString>,
    timeout: Duration,
}

impl GitCommandAdapter {
    pub fn new(root: PathBuf) -> Self {
        Self { root, program: "git".into(), prefix_args: Vec::new(), timeout: GIT_TIMEOUT }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[cfg(test)]
    fn with_program(mut self, program: &str, prefix_args: &[&str]) -> Self {
        self.program = program.into();
        self.prefix_args = prefix_args.iter().map(OsString::from).collect();
        self
    }

    fn run(&self, args: &[&str]) -> Result<String, GitError> {
        let mut child = Command::new(&self.program)
            .args(&self.prefix_args)
            .args(args)
            .current_dir(&self.root)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // Both pipes are drained while the child runs so a full pipe buffer
        // cannot stall it past the deadline.
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if Instant::now() >= deadline {
                // The child may have exited between the checks; either way it is reaped.
                let _ = child.kill();
                let _ = child.wait();
                return Err(GitError::Timeout(self.timeout));
            }
            thread::sleep(POLL_INTERVAL);
        };

        let stdout = join_output(stdout);
        if !status.success() {
            let stderr = join_output(stderr);
            return Err(GitError::Failed {
                status: status.to_string(),
                stderr: if stderr.is_empty() { "Unknown error".to_string() } else { stderr },
            });
        }

        if stdout.is_empty() {
            return Err(GitError::EmptyOutput);
        }
        Ok(stdout)
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buffer = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buffer);
        }
        buffer
    })
}

fn join_output(reader: JoinHandle<Vec<u8>>) -> String {
    let buffer = reader.join().unwrap_or_default();
    String::from_utf8_lossy(&buffer).trim().to_string()
}

impl Git for GitCommandAdapter {
    fn get_current_branch(&self) -> Result<String, GitError> {
        self.run(&["rev-parse", "--abbrev-ref", "HEAD"])
    }
}
