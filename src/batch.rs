//! Batch rendering: one `qr_label` invocation per table row.

use std::io;
use std::path::PathBuf;
use std::process::Command;

use crate::config::BatchRow;
use crate::system::{CommandError, CommandRunner};

pub const DEFAULT_URL_BASE: &str = "https://shop.justbuchanan.com/inventory";

#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// The `qr_label` executable
    pub label_bin: PathBuf,
    pub out_dir: PathBuf,
    pub icons_dir: PathBuf,
    pub size: String,
    /// Row URLs are `<url_base>/<row index>`
    pub url_base: String,
}

/// The `qr_label` binary installed next to the running executable
pub fn default_label_bin() -> io::Result<PathBuf> {
    let exe = std::env::current_exe()?;
    Ok(exe.with_file_name(format!("qr_label{}", std::env::consts::EXE_SUFFIX)))
}

/// Build the invocation that renders `row`
pub fn row_command(options: &BatchOptions, row: &BatchRow) -> Command {
    let output = options.out_dir.join(format!("{}.pdf", row.index));
    let url = format!("{}/{}", options.url_base.trim_end_matches('/'), row.index);

    let mut command = Command::new(&options.label_bin);
    command
        .arg(format!("--size={}", options.size))
        .arg(format!("--output={}", output.display()))
        .arg("--bbox");
    if let Some(icon) = &row.icon {
        let icon_path = options.icons_dir.join(format!("{}.png", icon));
        command.arg(format!("--icon={}", icon_path.display()));
    }
    // `--` keeps captions starting with a dash from being read as flags
    command.arg("--").arg(&row.text).arg(url);
    command
}

/// Render every row in order, stopping at the first failure.
///
/// Returns the number of labels rendered.
pub fn run_batch(
    rows: &[BatchRow],
    options: &BatchOptions,
    runner: &mut dyn CommandRunner,
) -> Result<usize, CommandError> {
    for row in rows {
        tracing::info!(row = row.index, text = %row.text, "rendering label");
        runner.run(&mut row_command(options, row))?;
    }
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_batch_rows;

    /// Records every invocation instead of spawning it
    #[derive(Default)]
    struct RecordingRunner {
        calls: Vec<Vec<String>>,
        fail_on_call: Option<usize>,
    }

    impl CommandRunner for RecordingRunner {
        fn run(&mut self, command: &mut Command) -> Result<(), CommandError> {
            let call: Vec<String> = command
                .get_args()
                .map(|arg| arg.to_string_lossy().into_owned())
                .collect();
            self.calls.push(call);
            if self.fail_on_call == Some(self.calls.len() - 1) {
                return Err(CommandError::Failed {
                    command: "qr_label".to_string(),
                    code: Some(1),
                });
            }
            Ok(())
        }
    }

    fn options() -> BatchOptions {
        BatchOptions {
            label_bin: PathBuf::from("qr_label"),
            out_dir: PathBuf::from("out"),
            icons_dir: PathBuf::from("icons"),
            size: "small".to_string(),
            url_base: DEFAULT_URL_BASE.to_string(),
        }
    }

    #[test]
    fn test_row_command() {
        let row = BatchRow {
            index: 4,
            text: "M3 screws".to_string(),
            icon: Some("screw".to_string()),
        };
        let command = row_command(&options(), &row);

        assert_eq!(command.get_program(), "qr_label");
        let args: Vec<_> = command.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(
            args,
            vec![
                "--size=small",
                "--output=out/4.pdf",
                "--bbox",
                "--icon=icons/screw.png",
                "--",
                "M3 screws",
                "https://shop.justbuchanan.com/inventory/4",
            ]
        );
    }

    #[test]
    fn test_row_without_icon() {
        let row = BatchRow {
            index: 0,
            text: "Misc".to_string(),
            icon: None,
        };
        let command = row_command(&options(), &row);
        assert!(!command.get_args().any(|a| a.to_string_lossy().starts_with("--icon")));
    }

    #[test]
    fn test_empty_row_is_skipped_but_counted() {
        let rows = parse_batch_rows("Resistors,resistor\n\nCapacitors,capacitor\n").unwrap();
        let mut runner = RecordingRunner::default();

        let rendered = run_batch(&rows, &options(), &mut runner).unwrap();

        assert_eq!(rendered, 2);
        assert_eq!(runner.calls.len(), 2);
        assert_eq!(runner.calls[0][1], "--output=out/0.pdf");
        assert_eq!(runner.calls[1][1], "--output=out/2.pdf");
        assert_eq!(runner.calls[1][6], "https://shop.justbuchanan.com/inventory/2");
    }

    #[test]
    fn test_failure_aborts_remaining_rows() {
        let rows = parse_batch_rows("a,x\nb,y\nc,z\n").unwrap();
        let mut runner = RecordingRunner {
            fail_on_call: Some(1),
            ..Default::default()
        };

        let err = run_batch(&rows, &options(), &mut runner).unwrap_err();

        assert_eq!(err.exit_code(), Some(1));
        assert_eq!(runner.calls.len(), 2);
    }
}
