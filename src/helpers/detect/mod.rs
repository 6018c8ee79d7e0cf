use async_trait::async_trait;
use regex::Regex;
use tokio::process::Command;
use tracing::debug;

/// Source of the locally installed CUDA version, if any.
#[async_trait]
pub trait AccelDetector: Send + Sync {
    /// `X.Y` version of the local runtime, `None` when there is none.
    async fn detect(&self) -> Option<String>;
}

/// Asks `nvcc --version` for the installed toolkit release.
#[derive(Debug, Clone, Default)]
pub struct NvccDetector;

#[async_trait]
impl AccelDetector for NvccDetector {
    async fn detect(&self) -> Option<String> {
        debug!("detecting local CUDA version");
        let output = match Command::new("nvcc").arg("--version").output().await {
            Ok(output) if output.status.success() => output,
            Ok(output) => {
                debug!(status = %output.status, "nvcc exited unsuccessfully");
                return None;
            }
            Err(err) => {
                debug!(%err, "nvcc not available");
                return None;
            }
        };

        let version = parse_nvcc_release(&String::from_utf8_lossy(&output.stdout));
        debug!(?version, "local CUDA detection finished");
        version
    }
}

/// A detector that never finds anything.
#[derive(Debug, Clone, Default)]
pub struct NoDetector;

#[async_trait]
impl AccelDetector for NoDetector {
    async fn detect(&self) -> Option<String> {
        None
    }
}

/// Extract `X.Y` from nvcc's `..., release 12.6, V12.6.85` line.
pub fn parse_nvcc_release(output: &str) -> Option<String> {
    let re = Regex::new(r"release (\d+\.\d+)").ok()?;
    re.captures(output).map(|c| c[1].to_string())
}
