//! Wrapper around the local conversational CLI tool.

use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::debug;

/// Maximum input size passed to the tool (64 KiB). Prevents resource
/// exhaustion from oversized prompts.
const MAX_TOOL_INPUT_BYTES: usize = 64 * 1024;

/// Cap on relayed standard output (1 MiB). Output beyond the cap is
/// truncated at a character boundary.
const MAX_TOOL_OUTPUT_BYTES: usize = 1024 * 1024;

/// Cap on buffered standard error (64 KiB); only relayed on failure.
const MAX_TOOL_STDERR_BYTES: usize = 64 * 1024;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("input exceeds maximum size: {0} bytes (limit: {MAX_TOOL_INPUT_BYTES} bytes)")]
    InputTooLarge(usize),

    #[error("tool binary {0:?} not found")]
    NotFound(String),

    #[error("failed to run {0:?}: {1}")]
    Spawn(String, #[source] std::io::Error),

    #[error("tool timed out after {0} seconds")]
    Timeout(u64),

    #[error("tool exited with {status}: {stderr}")]
    Failed { status: i32, stderr: String },
}

/// Runs the conversational CLI as a one-shot subprocess.
#[derive(Debug, Clone)]
pub struct CliTool {
    binary: String,
    timeout: Duration,
}

impl CliTool {
    pub fn new(binary: impl Into<String>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }

    /// Invokes `<binary> -y -p <input>` and returns captured stdout.
    ///
    /// The subprocess is killed when it exceeds the configured timeout; a
    /// hung tool never holds the handler indefinitely.
    pub async fn run(&self, input: &str) -> Result<String, ToolError> {
        if input.len() > MAX_TOOL_INPUT_BYTES {
            return Err(ToolError::InputTooLarge(input.len()));
        }

        let mut command = Command::new(&self.binary);
        command
            .arg("-y")
            .arg("-p")
            .arg(input)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = command.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ToolError::NotFound(self.binary.clone())
            } else {
                ToolError::Spawn(self.binary.clone(), e)
            }
        })?;

        // Read both pipes concurrently with fixed caps so the buffered
        // output is bounded no matter how much the tool writes.
        let stdout_pipe = child.stdout.take();
        let stderr_pipe = child.stderr.take();
        let collect = async {
            let (stdout, stderr) = tokio::join!(
                read_capped(stdout_pipe, MAX_TOOL_OUTPUT_BYTES),
                read_capped(stderr_pipe, MAX_TOOL_STDERR_BYTES),
            );
            let status = child.wait().await?;
            Ok::<_, std::io::Error>((status, stdout?, stderr?))
        };

        let (status, stdout, stderr) = tokio::time::timeout(self.timeout, collect)
            .await
            .map_err(|_| ToolError::Timeout(self.timeout.as_secs()))?
            .map_err(|e| ToolError::Spawn(self.binary.clone(), e))?;

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr).trim().to_string();
            return Err(ToolError::Failed {
                status: status.code().unwrap_or(-1),
                stderr,
            });
        }

        let stdout = String::from_utf8_lossy(&stdout).into_owned();
        debug!(bytes = stdout.len(), "tool completed");
        Ok(truncate_at_char_boundary(stdout, MAX_TOOL_OUTPUT_BYTES))
    }
}

/// Reads `pipe` to EOF, keeping at most `cap` bytes. Bytes past the cap
/// are drained and discarded so the child never blocks on a full pipe.
async fn read_capped<R>(pipe: Option<R>, cap: usize) -> std::io::Result<Vec<u8>>
where
    R: tokio::io::AsyncRead + Unpin,
{
    let Some(pipe) = pipe else {
        return Ok(Vec::new());
    };
    let mut limited = pipe.take(cap as u64);
    let mut buf = Vec::new();
    limited.read_to_end(&mut buf).await?;
    tokio::io::copy(&mut limited.into_inner(), &mut tokio::io::sink()).await?;
    Ok(buf)
}

fn truncate_at_char_boundary(mut text: String, max: usize) -> String {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text.truncate(end);
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::os::unix::fs::PermissionsExt;

    fn fake_tool(script: &str, timeout: Duration) -> (tempfile::TempDir, CliTool) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake-tool");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "#!/bin/sh\n{script}").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        let tool = CliTool::new(path.to_str().unwrap(), timeout);
        (dir, tool)
    }

    #[tokio::test]
    async fn relays_stdout_on_success() {
        // $3 is the prompt text after "-y -p".
        let (_dir, tool) = fake_tool(r#"echo "answer: $3""#, Duration::from_secs(5));
        let output = tool.run("what time is it").await.unwrap();
        assert_eq!(output.trim(), "answer: what time is it");
    }

    #[tokio::test]
    async fn nonzero_exit_carries_stderr() {
        let (_dir, tool) = fake_tool(r#"echo "boom" >&2; exit 1"#, Duration::from_secs(5));
        let err = tool.run("hello").await.unwrap_err();
        match err {
            ToolError::Failed { status, stderr } => {
                assert_eq!(status, 1);
                assert_eq!(stderr, "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn missing_binary_is_distinguished() {
        let tool = CliTool::new("/nonexistent/voicelink-tool", Duration::from_secs(5));
        let err = tool.run("hello").await.unwrap_err();
        assert!(matches!(err, ToolError::NotFound(_)));
    }

    #[tokio::test]
    async fn hung_tool_times_out() {
        let (_dir, tool) = fake_tool("sleep 30", Duration::from_millis(200));
        let err = tool.run("hello").await.unwrap_err();
        assert!(matches!(err, ToolError::Timeout(_)));
    }

    #[tokio::test]
    async fn oversized_output_is_capped() {
        // Emits 2 MiB, twice the cap. The relayed body stays within the
        // cap and the run still completes because the excess is drained
        // rather than left to fill the pipe.
        let script = "head -c 2097152 /dev/zero | tr '\\0' 'a'";
        let (_dir, tool) = fake_tool(script, Duration::from_secs(10));
        let output = tool.run("hello").await.unwrap();
        assert_eq!(output.len(), MAX_TOOL_OUTPUT_BYTES);
        assert!(output.bytes().all(|b| b == b'a'));
    }

    #[tokio::test]
    async fn oversized_input_is_rejected_before_spawning() {
        let tool = CliTool::new("/nonexistent/voicelink-tool", Duration::from_secs(5));
        let input = "x".repeat(MAX_TOOL_INPUT_BYTES + 1);
        let err = tool.run(&input).await.unwrap_err();
        assert!(matches!(err, ToolError::InputTooLarge(_)));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let text = format!("{}é", "a".repeat(9));
        // 'é' is two bytes; cutting at 10 would split it.
        assert_eq!(truncate_at_char_boundary(text, 10), "a".repeat(9));
    }
}
