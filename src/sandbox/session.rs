//! Stateful per-task coordinator: opens a container, installs libraries,
//! stages code and stdin, runs the submission, collects its output, and
//! tears the container down — regardless of outcome.

use std::sync::Arc;

use crate::constants::container_paths;
use crate::error::{AppError, AppResult};
use crate::models::{ExecutionOutput, Submission};

use super::container::{ContainerClient, ImageRegistry};
use super::languages::LanguageAdapter;
use super::profiler::{parse_memory_log, parse_time_v, MEMORY_PROFILER_SCRIPT};

/// Whether an image created for a session is retained after the session
/// closes. Default is retain, to avoid repeated pulls.
const KEEP_TEMPLATE: bool = true;

pub struct SandboxSession {
    container: Arc<ContainerClient>,
    images: Arc<ImageRegistry>,
    adapter: LanguageAdapter,
    memory_limit_mb: u64,
    cpu_index: Option<usize>,
    container_id: Option<String>,
}

impl SandboxSession {
    pub fn new(
        container: Arc<ContainerClient>,
        images: Arc<ImageRegistry>,
        adapter: LanguageAdapter,
        memory_limit_mb: u64,
        cpu_index: Option<usize>,
    ) -> Self {
        Self {
            container,
            images,
            adapter,
            memory_limit_mb,
            cpu_index,
            container_id: None,
        }
    }

    /// Run `submission` to completion. Postcondition: the container is
    /// fully torn down, regardless of outcome.
    pub async fn execute(&mut self, submission: &Submission) -> AppResult<ExecutionOutput> {
        let result = self.run_inner(submission).await;
        self.close().await;
        result
    }

    /// Force the in-flight container down. Used by the worker loop when the
    /// overall timeout deadline has already elapsed and `execute`'s future
    /// was dropped mid-flight, which means `close` never ran. Kills then
    /// removes the container and releases the image, same as a normal
    /// `close`, so a timed-out run leaves nothing behind in `docker ps -a`.
    pub async fn kill(&mut self) {
        if let Some(id) = &self.container_id {
            let _ = self.container.kill(id).await;
        }
        self.close().await;
    }

    async fn run_inner(&mut self, submission: &Submission) -> AppResult<ExecutionOutput> {
        self.open(submission.run_profiling).await?;
        self.setup(&submission.libraries).await?;
        self.stage(&submission.code, submission.stdin.as_deref(), submission.run_profiling)
            .await?;
        self.run_and_collect(submission.stdin.is_some(), submission.run_profiling)
            .await
    }

    async fn open(&mut self, run_profiling: bool) -> AppResult<()> {
        self.container.ensure_image(&self.adapter.image).await?;
        self.images.acquire(&self.adapter.image).await;

        let id = self
            .container
            .create(&self.adapter.image, self.cpu_index, self.memory_limit_mb)
            .await?;
        self.container_id = Some(id.clone());

        if !run_profiling {
            // best-effort: some images already carry GNU time
            let _ = self.container.exec(&id, "apt-get install -y time", None).await;
        }

        Ok(())
    }

    async fn setup(&mut self, libraries: &[String]) -> AppResult<()> {
        let id = self.container_id()?;

        for cmd in &self.adapter.setup_commands {
            let result = self.container.exec(id, cmd, Some(&self.adapter.setup_workdir)).await?;
            if !result.succeeded() {
                return Err(AppError::RuntimeError(format!(
                    "setup command '{cmd}' failed: {}",
                    result.stderr
                )));
            }
        }

        if !libraries.is_empty() && !self.adapter.supports_library_install {
            return Err(AppError::Validation(format!(
                "library installation is not supported for language '{}'",
                self.adapter.language
            )));
        }

        for library in libraries {
            let cmd = self.adapter.install_command(library);
            let result = self.container.exec(id, &cmd, Some(&self.adapter.workdir)).await?;
            if !result.succeeded() {
                return Err(AppError::RuntimeError(format!(
                    "failed to install library '{library}': {}",
                    result.stderr
                )));
            }
        }

        Ok(())
    }

    async fn stage(&mut self, code: &str, stdin: Option<&str>, run_profiling: bool) -> AppResult<()> {
        let id = self.container_id()?;

        self.container
            .copy_in(id, &self.adapter.source_path, code.as_bytes())
            .await?;

        if let Some(stdin) = stdin {
            self.container
                .copy_in(id, container_paths::STDIN_FILE, stdin.as_bytes())
                .await?;
        }

        if run_profiling {
            self.container
                .copy_in(id, container_paths::PROFILER_SCRIPT, MEMORY_PROFILER_SCRIPT.as_bytes())
                .await?;
            self.container
                .exec(id, &format!("chmod +x {}", container_paths::PROFILER_SCRIPT), None)
                .await?;
        }

        Ok(())
    }

    /// Run the compile+run command sequence: unmeasured setup/compile steps
    /// joined with `&&`, followed by the final run command wrapped by the
    /// active profiler (and, if stdin was provided, by a redirection). Only
    /// the final command is measured — a failed compile step still
    /// short-circuits the `&&` chain before it ever runs.
    async fn run_and_collect(&mut self, has_stdin: bool, run_profiling: bool) -> AppResult<ExecutionOutput> {
        let id = self.container_id()?.to_string();
        let (prefix, last) = self.adapter.split_final_command();

        let measured = if run_profiling {
            format!("bash {} {}", container_paths::PROFILER_SCRIPT, last)
        } else {
            format!("/usr/bin/time -v {}", last)
        };

        let mut wrapped = if prefix.is_empty() {
            measured
        } else {
            format!("{} && {}", prefix.join(" && "), measured)
        };

        if has_stdin {
            wrapped = format!(
                "bash -c '{} < {}'",
                wrapped.replace('\'', "'\\''"),
                container_paths::STDIN_FILE
            );
        }

        let result = self.container.exec(&id, &wrapped, Some(&self.adapter.workdir)).await?;

        if run_profiling {
            let log_path = format!("{}/{}", self.adapter.workdir, container_paths::MEMORY_LOG);
            let raw_log = self.container.copy_out(&id, &log_path).await?.unwrap_or_default();
            Ok(ExecutionOutput {
                stdout: result.stdout,
                stderr: result.stderr,
                profile: Some(parse_memory_log(&raw_log)),
                time_v: None,
            })
        } else {
            Ok(ExecutionOutput {
                stdout: result.stdout,
                profile: None,
                time_v: Some(parse_time_v(&result.stderr)),
                stderr: result.stderr,
            })
        }
    }

    async fn close(&mut self) {
        if let Some(id) = self.container_id.take() {
            if let Err(e) = self.container.remove(&id).await {
                tracing::warn!(container_id = %id, error = %e, "failed to remove sandbox container");
            }
        }
        self.images.release(&self.adapter.image, &self.container, KEEP_TEMPLATE).await;
    }

    fn container_id(&self) -> AppResult<&str> {
        self.container_id
            .as_deref()
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("sandbox session has no open container")))
    }
}
