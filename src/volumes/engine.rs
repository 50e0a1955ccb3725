// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Invocation of the external encryption tool.
//!
//! [`VeraCryptEngine`] is the only code in the service that spawns the
//! VeraCrypt binary. Every call is bounded by a timeout and the child is
//! killed when the call future is dropped, so a hung tool or a cancelled
//! request never leaves a process behind.
//!
//! The mount password is written to the child's stdin and never appears on
//! the command line.

use std::{
    ffi::OsString,
    fmt, io,
    path::{Path, PathBuf},
    process::{Output, Stdio},
    time::Duration,
};

use async_trait::async_trait;
use tokio::{io::AsyncWriteExt, process::Command};
use tracing::debug;

use super::{
    error::{EngineError, EngineResult},
    list::{parse_list_output, ListEntry},
};

/// Default bound for mount calls.
pub const DEFAULT_MOUNT_TIMEOUT: Duration = Duration::from_secs(10);
/// Default bound for dismount and list calls.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

const EXEC_BUSY_RETRY_ATTEMPTS: usize = 20;
const EXEC_BUSY_RETRY_DELAY: Duration = Duration::from_millis(10);

/// Everything the engine needs to mount one container.
#[derive(Clone)]
pub struct MountRequest {
    pub container_path: PathBuf,
    pub mount_path: PathBuf,
    pub password: String,
    pub readonly: bool,
}

impl fmt::Debug for MountRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MountRequest")
            .field("container_path", &self.container_path)
            .field("mount_path", &self.mount_path)
            .field("password", &"<redacted>")
            .field("readonly", &self.readonly)
            .finish()
    }
}

/// Abstraction over the encryption tool.
#[async_trait]
pub trait VolumeEngine: Send + Sync {
    /// Mount a container at an existing directory.
    async fn mount(&self, request: &MountRequest) -> EngineResult<()>;

    /// Dismount a container.
    async fn unmount(&self, container_path: &Path) -> EngineResult<()>;

    /// Query the live mount table.
    ///
    /// A non-zero exit from the tool means "nothing mounted" and yields an
    /// empty list. Output that cannot be parsed is an error.
    async fn list_mounted(&self) -> EngineResult<Vec<ListEntry>>;
}

/// VeraCrypt text-mode driver.
#[derive(Debug, Clone)]
pub struct VeraCryptEngine {
    binary: PathBuf,
    mount_timeout: Duration,
    command_timeout: Duration,
}

impl VeraCryptEngine {
    /// Constructs a driver with the default timeouts.
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            mount_timeout: DEFAULT_MOUNT_TIMEOUT,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    /// Overrides the mount and command timeouts.
    pub fn with_timeouts(mut self, mount_timeout: Duration, command_timeout: Duration) -> Self {
        self.mount_timeout = mount_timeout;
        self.command_timeout = command_timeout;
        self
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    async fn run(
        &self,
        operation: &'static str,
        args: Vec<OsString>,
        input: Option<&[u8]>,
        timeout: Duration,
    ) -> EngineResult<Output> {
        let mut command = Command::new(&self.binary);
        command
            .args(&args)
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = spawn_retrying(&mut command)
            .await
            .map_err(|source| EngineError::Spawn {
                binary: self.binary.display().to_string(),
                source,
            })?;

        let exchange = async move {
            if let (Some(input), Some(mut stdin)) = (input, child.stdin.take()) {
                match stdin.write_all(input).await {
                    // The tool may exit before reading, its exit status tells the story.
                    Err(error) if error.kind() == io::ErrorKind::BrokenPipe => {}
                    other => other?,
                }
            }
            child.wait_with_output().await
        };

        let output = tokio::time::timeout(timeout, exchange)
            .await
            .map_err(|_| EngineError::Timeout { operation, timeout })?
            .map_err(|source| EngineError::Io { operation, source })?;

        if !output.status.success() {
            debug!(
                operation,
                code = ?output.status.code(),
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "encryption tool reported failure"
            );
        }

        Ok(output)
    }
}

#[async_trait]
impl VolumeEngine for VeraCryptEngine {
    async fn mount(&self, request: &MountRequest) -> EngineResult<()> {
        let mut args: Vec<OsString> = vec![
            "--text".into(),
            "--non-interactive".into(),
            "--stdin".into(),
        ];
        if request.readonly {
            args.push("--mount-options=ro".into());
        }
        args.push(request.container_path.clone().into_os_string());
        args.push(request.mount_path.clone().into_os_string());

        let output = self
            .run(
                "mount",
                args,
                Some(request.password.as_bytes()),
                self.mount_timeout,
            )
            .await?;
        check_status("mount", &output)
    }

    async fn unmount(&self, container_path: &Path) -> EngineResult<()> {
        let args = vec![
            "--text".into(),
            "--dismount".into(),
            container_path.as_os_str().to_owned(),
        ];
        let output = self
            .run("dismount", args, None, self.command_timeout)
            .await?;
        check_status("dismount", &output)
    }

    async fn list_mounted(&self) -> EngineResult<Vec<ListEntry>> {
        let args = vec!["--text".into(), "--list".into()];
        let output = self.run("list", args, None, self.command_timeout).await?;
        if !output.status.success() {
            return Ok(Vec::new());
        }
        parse_list_output(&String::from_utf8_lossy(&output.stdout))
    }
}

fn check_status(operation: &'static str, output: &Output) -> EngineResult<()> {
    if output.status.success() {
        return Ok(());
    }
    Err(EngineError::Failed {
        operation,
        code: output.status.code(),
    })
}

async fn spawn_retrying(command: &mut Command) -> io::Result<tokio::process::Child> {
    let mut attempt = 0;
    loop {
        match command.spawn() {
            Err(error)
                if is_exec_busy_error(&error) && attempt + 1 < EXEC_BUSY_RETRY_ATTEMPTS =>
            {
                attempt += 1;
                tokio::time::sleep(EXEC_BUSY_RETRY_DELAY).await;
            }
            result => return result,
        }
    }
}

fn is_exec_busy_error(error: &io::Error) -> bool {
    error.kind() == io::ErrorKind::ExecutableFileBusy || error.raw_os_error() == Some(26)
}
