use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;

use qr_label::batch::{default_label_bin, run_batch, BatchOptions, DEFAULT_URL_BASE};
use qr_label::config::load_batch_rows;
use qr_label::system::{CommandError, SystemRunner};

/// Render one label per row of a CSV table of (text, icon name).
#[derive(Parser, Debug)]
#[command(name = "qr_label_batch")]
#[command(about = "Render one label per row of a CSV table of (text, icon name).", long_about = None)]
struct Args {
    /// CSV table without a header row
    #[arg(long, default_value = "labels.csv")]
    csv: PathBuf,

    /// Directory receiving <row>.pdf files
    #[arg(long, default_value = "out")]
    out_dir: PathBuf,

    /// Directory holding <icon name>.png files
    #[arg(long, default_value = "icons")]
    icons_dir: PathBuf,

    /// Label size passed to qr_label
    #[arg(long, default_value = "small")]
    size: String,

    /// QR codes encode <url-base>/<row>
    #[arg(long, default_value = DEFAULT_URL_BASE)]
    url_base: String,

    /// qr_label executable (defaults to the one next to this binary)
    #[arg(long)]
    label_bin: Option<PathBuf>,
}

fn run(args: Args) -> Result<()> {
    let rows = load_batch_rows(&args.csv)?;
    println!("Found {} labels in {:?}", rows.len(), args.csv);

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("Failed to create output directory {:?}", args.out_dir))?;

    let label_bin = match args.label_bin {
        Some(path) => path,
        None => default_label_bin().context("Failed to locate the qr_label executable")?,
    };

    let options = BatchOptions {
        label_bin,
        out_dir: args.out_dir,
        icons_dir: args.icons_dir,
        size: args.size,
        url_base: args.url_base,
    };
    let rendered = run_batch(&rows, &options, &mut SystemRunner)?;
    println!("Rendered {} labels into {:?}", rendered, options.out_dir);

    Ok(())
}

fn main() {
    qr_label::init_logging();
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        for cause in e.chain().skip(1) {
            eprintln!("Caused by: {}", cause);
        }
        let code = e
            .downcast_ref::<CommandError>()
            .and_then(CommandError::exit_code)
            .filter(|&code| code != 0)
            .unwrap_or(1);
        std::process::exit(code);
    }
}
