//! Vendor tool invocation
//!
//! One blocking subprocess per call; stdout and stderr are fully drained
//! and the handles released before this returns, whatever the exit status.

use std::path::Path;
use std::process::Command;

use crate::errors::ProbeError;
use tracing::trace;

/// Captured result of one tool invocation.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Run the vendor tool with the given arguments and capture its output.
///
/// A nonzero exit is not an error here: MegaCli and StorCli exit nonzero
/// when they cannot query a BBU, and that is per-adapter data for the
/// parser. Only failure to launch the process at all is fatal.
pub fn run_tool(tool: &Path, args: &[String]) -> Result<ToolOutput, ProbeError> {
    let out = Command::new(tool)
        .args(args)
        .output()
        .map_err(|source| ProbeError::Launch {
            tool: tool.display().to_string(),
            source,
        })?;

    let output = ToolOutput {
        stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
        // Killed by signal: no code; anything nonzero will do for the parser.
        exit_code: out.status.code().unwrap_or(-1),
    };

    if !output.success() {
        trace!(
            tool = %tool.display(),
            exit_code = output.exit_code,
            stdout = %output.stdout,
            stderr = %output.stderr,
            "tool exited nonzero"
        );
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_launch_failure_is_fatal() {
        let missing = PathBuf::from("/nonexistent/check-lsi-bbu-no-such-tool");
        let err = run_tool(&missing, &[]).unwrap_err();
        let text = err.to_string();
        assert!(text.contains("error executing"));
        assert!(text.contains("no-such-tool"));
    }

    #[test]
    fn test_nonzero_exit_is_data_not_error() {
        // `false` launches fine and exits 1.
        let out = run_tool(Path::new("/bin/false"), &[]).unwrap();
        assert!(!out.success());
        assert_ne!(out.exit_code, 0);
    }

    #[test]
    fn test_stdout_captured() {
        let out = run_tool(
            Path::new("/bin/echo"),
            &["Battery State: Optimal".to_string()],
        )
        .unwrap();
        assert!(out.success());
        assert!(out.stdout.contains("Battery State: Optimal"));
    }
}
