//! Narrow client interface to a Docker-API-compatible container runtime.
//!
//! File staging uses the same base64-via-`echo` idiom as the original
//! benchmark executor rather than bollard's tar-archive upload API: it keeps
//! the whole round trip inside the already-open `exec` channel instead of
//! pulling in a tar-writing dependency for a single use site.

use std::collections::HashMap;
use std::sync::Arc;

use bollard::{
    exec::{CreateExecOptions, StartExecResults},
    container::{KillContainerOptions, LogOutput},
    models::{ContainerCreateBody, HostConfig},
    query_parameters::{
        CreateContainerOptionsBuilder, CreateImageOptionsBuilder, RemoveContainerOptionsBuilder,
    },
    Docker,
};
use futures::StreamExt;
use tokio::sync::Mutex;

use crate::{constants::CONTAINER_PIDS_LIMIT, error::AppError, error::AppResult};

/// Outcome of a single `exec` invocation inside a container.
#[derive(Debug, Clone)]
pub struct ExecResult {
    pub exit_code: i64,
    pub stdout: String,
    pub stderr: String,
}

impl ExecResult {
    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }
}

/// Thin wrapper around a `bollard::Docker` handle.
///
/// Every container created through this client is expected to be paired
/// with a call to `remove` by its caller (see `SandboxSession::close`); the
/// client itself does not track outstanding containers.
pub struct ContainerClient {
    docker: Docker,
}

impl ContainerClient {
    pub fn new(docker: Docker) -> Self {
        Self { docker }
    }

    /// Pull `image` if it is not already present locally.
    pub async fn ensure_image(&self, image: &str) -> AppResult<()> {
        if self.docker.inspect_image(image).await.is_ok() {
            return Ok(());
        }

        let options = CreateImageOptionsBuilder::default().from_image(image).build();
        let mut stream = self.docker.create_image(Some(options), None, None);
        while let Some(progress) = stream.next().await {
            progress?;
        }
        Ok(())
    }

    /// Create and start a detached container with a memory ceiling equal to
    /// its swap ceiling (swappiness 0, OOM kill enabled) and pinned to one
    /// CPU via `cpuset_cpus`.
    pub async fn create(
        &self,
        image: &str,
        cpu_index: Option<usize>,
        memory_limit_mb: u64,
    ) -> AppResult<String> {
        let memory_bytes = (memory_limit_mb * 1024 * 1024) as i64;

        let host_config = HostConfig {
            memory: Some(memory_bytes),
            memory_swap: Some(memory_bytes),
            memory_swappiness: Some(0),
            oom_kill_disable: Some(false),
            cpuset_cpus: cpu_index.map(|idx| idx.to_string()),
            pids_limit: Some(CONTAINER_PIDS_LIMIT),
            ..Default::default()
        };

        let body = ContainerCreateBody {
            image: Some(image.to_string()),
            tty: Some(true),
            open_stdin: Some(true),
            host_config: Some(host_config),
            env: Some(vec!["LANG=C.UTF-8".to_string()]),
            ..Default::default()
        };

        let options = CreateContainerOptionsBuilder::default().build();
        let container = self.docker.create_container(Some(options), body).await?;

        self.docker
            .start_container(
                &container.id,
                None::<bollard::query_parameters::StartContainerOptions>,
            )
            .await?;

        Ok(container.id)
    }

    /// Run `cmd` via `/bin/sh -c`, optionally from `workdir`, demuxing stdout/stderr.
    pub async fn exec(
        &self,
        container_id: &str,
        cmd: &str,
        workdir: Option<&str>,
    ) -> AppResult<ExecResult> {
        let exec = self
            .docker
            .create_exec(
                container_id,
                CreateExecOptions {
                    cmd: Some(vec!["/bin/sh".to_string(), "-c".to_string(), cmd.to_string()]),
                    attach_stdout: Some(true),
                    attach_stderr: Some(true),
                    working_dir: workdir.map(|w| w.to_string()),
                    ..Default::default()
                },
            )
            .await?;

        let output = self.docker.start_exec(&exec.id, None).await?;

        let mut stdout = String::new();
        let mut stderr = String::new();

        if let StartExecResults::Attached { mut output, .. } = output {
            while let Some(msg) = output.next().await {
                match msg? {
                    LogOutput::StdOut { message } => {
                        stdout.push_str(&String::from_utf8_lossy(&message))
                    }
                    LogOutput::StdErr { message } => {
                        stderr.push_str(&String::from_utf8_lossy(&message))
                    }
                    _ => {}
                }
            }
        }

        let inspect = self.docker.inspect_exec(&exec.id).await?;

        Ok(ExecResult {
            exit_code: inspect.exit_code.unwrap_or(-1),
            stdout,
            stderr,
        })
    }

    /// Write `content` to `dst_path` inside the container, creating parent
    /// directories as needed.
    pub async fn copy_in(&self, container_id: &str, dst_path: &str, content: &[u8]) -> AppResult<()> {
        if let Some(parent) = std::path::Path::new(dst_path).parent() {
            let parent = parent.to_string_lossy();
            if !parent.is_empty() {
                self.exec(container_id, &format!("mkdir -p {parent}"), None).await?;
            }
        }

        let encoded = base64::Engine::encode(&base64::engine::general_purpose::STANDARD, content);
        let cmd = format!("echo '{encoded}' | base64 -d > {dst_path}");
        let result = self.exec(container_id, &cmd, None).await?;

        if !result.succeeded() {
            return Err(AppError::Docker(format!(
                "failed to stage file at {dst_path}: {}",
                result.stderr
            )));
        }
        Ok(())
    }

    /// Read `src_path` out of the container; `None` if it does not exist.
    pub async fn copy_out(&self, container_id: &str, src_path: &str) -> AppResult<Option<String>> {
        let result = self
            .exec(container_id, &format!("cat {src_path} 2>/dev/null"), None)
            .await?;

        if !result.succeeded() || result.stdout.is_empty() {
            Ok(None)
        } else {
            Ok(Some(result.stdout))
        }
    }

    /// Forcibly stop a container; cleanup failures here are logged by the
    /// caller, not propagated to the task result.
    pub async fn kill(&self, container_id: &str) -> AppResult<()> {
        self.docker
            .kill_container(container_id, None::<KillContainerOptions>)
            .await
            .ok();
        Ok(())
    }

    /// Forcibly remove a container.
    pub async fn remove(&self, container_id: &str) -> AppResult<()> {
        let options = RemoveContainerOptionsBuilder::default().force(true).build();
        self.docker.remove_container(container_id, Some(options)).await?;
        Ok(())
    }

    /// Remove `image` if nothing else references it. No-op unless
    /// `keep_template` is false.
    pub async fn remove_image(&self, image: &str) -> AppResult<()> {
        self.docker.remove_image(image, None, None).await?;
        Ok(())
    }
}

/// Synchronized reference count per image tag, so that "is anyone else
/// still using this image" is answered under a real lock rather than the
/// racy `containers.list()` snapshot the source relied on.
#[derive(Clone)]
pub struct ImageRegistry {
    counts: Arc<Mutex<HashMap<String, usize>>>,
}

impl ImageRegistry {
    pub fn new() -> Self {
        Self {
            counts: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn acquire(&self, image: &str) {
        let mut counts = self.counts.lock().await;
        *counts.entry(image.to_string()).or_insert(0) += 1;
    }

    /// Decrement the reference count for `image`; if it reaches zero and
    /// `keep_template` is false, remove the image via `client`.
    pub async fn release(&self, image: &str, client: &ContainerClient, keep_template: bool) {
        let reached_zero = {
            let mut counts = self.counts.lock().await;
            match counts.get_mut(image) {
                Some(count) if *count > 1 => {
                    *count -= 1;
                    false
                }
                Some(_) => {
                    counts.remove(image);
                    true
                }
                None => false,
            }
        };

        if reached_zero && !keep_template {
            if let Err(e) = client.remove_image(image).await {
                tracing::warn!(image, error = %e, "failed to remove unreferenced sandbox image");
            }
        }
    }
}

impl Default for ImageRegistry {
    fn default() -> Self {
        Self::new()
    }
}
