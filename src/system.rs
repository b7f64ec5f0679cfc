//! External processes: the print spooler, the OS viewer and the interactive
//! print confirmation.

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::Command;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to start `{command}`")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("`{command}` {}", describe_exit(.code))]
    Failed { command: String, code: Option<i32> },
}

impl CommandError {
    /// Exit code of the failed process, if it exited normally
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            CommandError::Failed { code, .. } => *code,
            CommandError::Spawn { .. } => None,
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exited with status {}", code),
        None => "was terminated by a signal".to_string(),
    }
}

/// Render a command line for messages
pub fn describe_command(command: &Command) -> String {
    std::iter::once(command.get_program())
        .chain(command.get_args())
        .map(|part| part.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Runs a prepared command to completion and checks its exit status.
pub trait CommandRunner {
    fn run(&mut self, command: &mut Command) -> Result<(), CommandError>;
}

/// Runs commands as real child processes, inheriting stdio.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&mut self, command: &mut Command) -> Result<(), CommandError> {
        let described = describe_command(command);
        tracing::info!(command = %described, "running");

        let status = command.status().map_err(|source| CommandError::Spawn {
            command: described.clone(),
            source,
        })?;

        if status.success() {
            Ok(())
        } else {
            Err(CommandError::Failed {
                command: described,
                code: status.code(),
            })
        }
    }
}

/// `lpr [-P printer] <file>`
pub fn print_command(path: &Path, printer: Option<&str>) -> Command {
    let mut command = Command::new("lpr");
    if let Some(printer) = printer {
        command.arg("-P").arg(printer);
    }
    command.arg(path);
    command
}

/// Open `path` with the desktop's default application
pub fn preview_command(path: &Path) -> Command {
    if cfg!(target_os = "macos") {
        let mut command = Command::new("open");
        command.arg(path);
        command
    } else if cfg!(target_os = "windows") {
        let mut command = Command::new("cmd");
        command.args(["/C", "start", ""]).arg(path);
        command
    } else {
        let mut command = Command::new("xdg-open");
        command.arg(path);
        command
    }
}

/// Ask a yes/no question; anything but `y` or `yes` is a no.
pub fn confirm<R: BufRead, W: Write>(prompt: &str, input: &mut R, output: &mut W) -> io::Result<bool> {
    write!(output, "{}", prompt)?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let answer = answer.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_print_command() {
        let command = print_command(Path::new("label.pdf"), None);
        assert_eq!(describe_command(&command), "lpr label.pdf");

        let command = print_command(Path::new("out/3.pdf"), Some("DYMO_LabelWriter_450"));
        assert_eq!(describe_command(&command), "lpr -P DYMO_LabelWriter_450 out/3.pdf");
    }

    #[test]
    fn test_preview_command_targets_file() {
        let command = preview_command(Path::new("label.pdf"));
        assert_eq!(command.get_args().last().unwrap(), "label.pdf");
    }

    #[test]
    fn test_confirm_yes() {
        let mut output = Vec::new();
        assert!(confirm("Print label? [y/N] ", &mut Cursor::new("Y\n"), &mut output).unwrap());
        assert_eq!(output, b"Print label? [y/N] ");
        assert!(confirm("?", &mut Cursor::new(" yes \n"), &mut Vec::new()).unwrap());
    }

    #[test]
    fn test_confirm_defaults_to_no() {
        assert!(!confirm("?", &mut Cursor::new("\n"), &mut Vec::new()).unwrap());
        assert!(!confirm("?", &mut Cursor::new("nope\n"), &mut Vec::new()).unwrap());
        assert!(!confirm("?", &mut Cursor::new(""), &mut Vec::new()).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_reports_exit_code() {
        let mut command = Command::new("sh");
        command.args(["-c", "exit 3"]);
        let err = SystemRunner.run(&mut command).unwrap_err();
        assert_eq!(err.exit_code(), Some(3));
        assert_eq!(err.to_string(), "`sh -c exit 3` exited with status 3");
    }

    #[test]
    fn test_spawn_failure() {
        let mut command = Command::new("definitely-not-a-real-program-qr-label");
        let err = SystemRunner.run(&mut command).unwrap_err();
        assert!(matches!(err, CommandError::Spawn { .. }));
        assert_eq!(err.exit_code(), None);
    }
}
