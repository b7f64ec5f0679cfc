use anyhow::Result;
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use qr_label::config::{load_label_profile, resolve_font, LabelSize};
use qr_label::label::{render_to_file, RenderRequest};
use qr_label::system::{confirm, preview_command, print_command, CommandError, CommandRunner, SystemRunner};

/// Render a label for a DYMO label writer, optionally with a QR code and an icon.
#[derive(Parser, Debug)]
#[command(name = "qr_label")]
#[command(about = "Render a label for a DYMO label writer, optionally with a QR code and an icon.", long_about = None)]
struct Args {
    /// Text printed on the label
    text: String,

    /// Text to generate a QR code for
    #[arg(conflicts_with = "qr_flag")]
    qr: Option<String>,

    /// Text to generate a QR code for (same as the positional argument)
    #[arg(long = "qr", value_name = "TEXT")]
    qr_flag: Option<String>,

    /// Icon image placed next to the text
    #[arg(long)]
    icon: Option<PathBuf>,

    /// Print the label
    #[arg(long)]
    print: bool,

    /// Output PDF path
    #[arg(short, long, visible_alias = "out", default_value = "label.pdf")]
    output: PathBuf,

    /// Draw the outline of the label
    #[arg(long)]
    bbox: bool,

    /// Print without asking for confirmation
    #[arg(long)]
    noconfirm: bool,

    /// Open the label with the default viewer
    #[arg(long)]
    preview: bool,

    /// Label size: small or normal
    #[arg(long, default_value = "normal")]
    size: String,

    /// Font size in points (defaults depend on the label size)
    #[arg(long = "font_size", value_name = "PT")]
    font_size: Option<u32>,

    /// Standard PDF font name
    #[arg(long, default_value = "Helvetica")]
    font: String,

    /// JSON file overriding label dimensions and margins
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Printer passed to lpr with -P
    #[arg(long)]
    printer: Option<String>,
}

/// Resolve size, profile, and font into what gets rendered.
fn render_request(args: &Args) -> Result<RenderRequest> {
    let mut spec = LabelSize::from_name(&args.size)?.spec();
    if let Some(profile_path) = &args.profile {
        spec = load_label_profile(profile_path)?.apply(&spec);
    }
    let font = resolve_font(&args.font)?;
    let font_size = args.font_size.map_or(spec.default_font_size, f64::from);

    Ok(RenderRequest {
        spec,
        text: args.text.clone(),
        qr_text: args.qr.clone().or_else(|| args.qr_flag.clone()),
        icon: args.icon.clone(),
        font,
        font_size,
        draw_bbox: args.bbox,
    })
}

/// `--print` asks first unless `--noconfirm` is given.
fn should_print<R: BufRead, W: Write>(args: &Args, input: &mut R, output: &mut W) -> io::Result<bool> {
    if !args.print {
        return Ok(false);
    }
    if args.noconfirm {
        return Ok(true);
    }
    confirm("Print label? [y/N] ", input, output)
}

fn run(args: &Args) -> Result<()> {
    let request = render_request(args)?;
    render_to_file(&request, &args.output)?;
    println!("Saved {}", args.output.display());

    let mut runner = SystemRunner;

    if args.preview {
        runner.run(&mut preview_command(&args.output))?;
    }

    if should_print(args, &mut io::stdin().lock(), &mut io::stderr())? {
        println!("Printing label...");
        runner.run(&mut print_command(&args.output, args.printer.as_deref()))?;
        println!("Done");
    } else if args.print {
        tracing::warn!("printing cancelled");
    }

    Ok(())
}

fn main() {
    qr_label::init_logging();
    let args = Args::parse();

    if let Err(e) = run(&args) {
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
