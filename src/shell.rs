//! Shell command execution.
//!
//! All execution is synchronous and runs to completion; there is no timeout
//! and no cancellation. Commands either run as one shell line (with shell
//! interpretation) or as an explicit argument vector (without).

use std::collections::HashMap;
use std::process::{Command, Stdio};

use crate::error::{Result, StencilError};

/// Result of executing a command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Captured standard output (empty unless capturing).
    pub stdout: String,

    /// Captured standard error (empty unless capturing).
    pub stderr: String,

    /// Whether the command exited with status 0.
    pub success: bool,
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Extra environment variables (merged over the process environment).
    pub env: HashMap<String, String>,

    /// Capture stdout/stderr instead of inheriting the parent's streams.
    pub capture: bool,
}

/// Run a single line through the platform shell.
pub fn run_shell(line: &str, options: &CommandOptions) -> Result<CommandResult> {
    let mut cmd = if cfg!(target_os = "windows") {
        let shell = std::env::var("COMSPEC").unwrap_or_else(|_| "cmd.exe".to_string());
        let mut cmd = Command::new(shell);
        cmd.arg("/C").arg(line);
        cmd
    } else {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(line);
        cmd
    };
    run(&mut cmd, line, options)
}

/// Run an explicit argument vector without shell interpretation.
///
/// The vector is guaranteed non-empty by recipe validation.
pub fn run_argv(argv: &[String], options: &CommandOptions) -> Result<CommandResult> {
    let cmd_display = argv.join(" ");
    let (program, args) = match argv.split_first() {
        Some(parts) => parts,
        None => {
            return Err(StencilError::SpawnFailed {
                command: cmd_display,
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "empty argument vector",
                ),
            })
        }
    };
    let mut cmd = Command::new(program);
    cmd.args(args);
    run(&mut cmd, &cmd_display, options)
}

fn run(cmd: &mut Command, cmd_display: &str, options: &CommandOptions) -> Result<CommandResult> {
    for (key, value) in &options.env {
        cmd.env(key, value);
    }

    if options.capture {
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
    } else {
        cmd.stdout(Stdio::inherit());
        cmd.stderr(Stdio::inherit());
    }

    tracing::debug!(command = cmd_display, capture = options.capture, "running command");

    let output = cmd.output().map_err(|source| StencilError::SpawnFailed {
        command: cmd_display.to_string(),
        source,
    })?;

    let stdout = if options.capture {
        String::from_utf8_lossy(&output.stdout).to_string()
    } else {
        String::new()
    };
    let stderr = if options.capture {
        String::from_utf8_lossy(&output.stderr).to_string()
    } else {
        String::new()
    };

    Ok(CommandResult {
        exit_code: output.status.code(),
        stdout,
        stderr,
        success: output.status.success(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capture() -> CommandOptions {
        CommandOptions {
            capture: true,
            ..Default::default()
        }
    }

    #[test]
    fn run_shell_captures_stdout() {
        let result = run_shell("echo hello", &capture()).unwrap();
        assert!(result.success);
        assert_eq!(result.exit_code, Some(0));
        assert!(result.stdout.contains("hello"));
    }

    #[test]
    fn run_shell_reports_failure() {
        let result = run_shell("exit 3", &capture()).unwrap();
        assert!(!result.success);
        assert_eq!(result.exit_code, Some(3));
    }

    #[test]
    fn run_shell_captures_stderr() {
        let cmd = if cfg!(target_os = "windows") {
            "echo oops 1>&2"
        } else {
            "echo oops >&2"
        };
        let result = run_shell(cmd, &capture()).unwrap();
        assert!(result.stderr.contains("oops"));
    }

    #[test]
    fn run_shell_sees_extra_env() {
        let mut options = capture();
        options
            .env
            .insert("STENCIL_TEST_VAR".to_string(), "marker".to_string());
        let cmd = if cfg!(target_os = "windows") {
            "echo %STENCIL_TEST_VAR%"
        } else {
            "echo $STENCIL_TEST_VAR"
        };
        let result = run_shell(cmd, &options).unwrap();
        assert!(result.stdout.contains("marker"));
    }

    #[test]
    fn run_argv_does_not_interpret_shell_syntax() {
        let result = run_argv(&["echo".to_string(), "$HOME".to_string()], &capture()).unwrap();
        assert!(result.success);
        assert!(result.stdout.contains("$HOME"));
    }

    #[test]
    fn run_argv_missing_program_is_spawn_error() {
        let err = run_argv(
            &["definitely-not-a-real-program-xyz".to_string()],
            &capture(),
        )
        .unwrap_err();
        assert!(matches!(err, StencilError::SpawnFailed { .. }));
    }
}
