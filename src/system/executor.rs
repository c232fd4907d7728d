// src/system/executor.rs

use std::collections::HashMap;
use std::process::{Command as StdCommand, Stdio};
use thiserror::Error;

/// Errors raised while running an external command.
#[derive(Error, Debug)]
pub enum ExecutionError {
    /// The process could not be spawned.
    #[error("Command '{0}' could not be executed: {1}")]
    CommandFailed(String, #[source] std::io::Error),
    /// The process ran and failed.
    #[error("Command '{command}' exited with a non-zero error code ({status}).")]
    NonZeroExitStatus {
        /// The command line that was run.
        command: String,
        /// The exit status.
        status: String,
    },
    /// Stdout was not UTF-8.
    #[error("Command '{command}' produced output that was not valid UTF-8")]
    InvalidUtf8Output {
        /// The command line that was run.
        command: String,
        /// The underlying error.
        #[source]
        source: std::string::FromUtf8Error,
    },
}

/// Renders a command line for messages, quoting arguments that need it.
pub fn display_command(program: &str, args: &[&str]) -> String {
    let parts = std::iter::once(program).chain(args.iter().copied());
    shlex::try_join(parts).unwrap_or_else(|_| {
        std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ")
    })
}

/// Executes a command and captures its standard output.
/// Stderr is passed through to the user's terminal.
///
/// The call blocks until the process exits. There is no timeout.
pub fn execute_and_capture_output(
    program: &str,
    args: &[&str],
    env_vars: &HashMap<String, String>,
) -> Result<String, ExecutionError> {
    let command_line = display_command(program, args);
    log::debug!("Running '{}'", command_line);

    let command_output = StdCommand::new(program)
        .args(args)
        .envs(env_vars)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .output()
        .map_err(|e| ExecutionError::CommandFailed(command_line.clone(), e))?;

    if !command_output.status.success() {
        return Err(ExecutionError::NonZeroExitStatus {
            command: command_line,
            status: command_output.status.to_string(),
        });
    }

    String::from_utf8(command_output.stdout).map_err(|e| ExecutionError::InvalidUtf8Output {
        command: command_line,
        source: e,
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_captures_stdout() {
        let out = execute_and_capture_output("echo", &["hello", "world"], &HashMap::new()).unwrap();
        assert_eq!(out.trim(), "hello world");
    }

    #[test]
    fn test_passes_environment() {
        let mut env = HashMap::new();
        env.insert("WAX_TEST_VALUE".to_string(), "from-env".to_string());
        let out = execute_and_capture_output("sh", &["-c", "echo $WAX_TEST_VALUE"], &env).unwrap();
        assert_eq!(out.trim(), "from-env");
    }

    #[test]
    fn test_non_zero_exit_is_an_error() {
        let err = execute_and_capture_output("sh", &["-c", "exit 3"], &HashMap::new()).unwrap_err();
        assert!(matches!(err, ExecutionError::NonZeroExitStatus { .. }));
    }

    #[test]
    fn test_missing_program_is_command_failed() {
        let err = execute_and_capture_output("wax-no-such-program", &[], &HashMap::new()).unwrap_err();
        assert!(matches!(err, ExecutionError::CommandFailed(..)));
    }

    #[test]
    fn test_display_command_quotes_arguments() {
        let line = display_command("plutil", &["-convert", "json", "/tmp/My Spec.xcspec"]);
        assert!(line.starts_with("plutil -convert json "));
        assert_eq!(shlex::split(&line).unwrap().last().unwrap(), "/tmp/My Spec.xcspec");
    }
}
