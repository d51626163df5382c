use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "qrdecor", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one QR code and save it.
    Render(RenderArgs),
    /// Print the default style document as JSON.
    DefaultStyle,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Text or URL to encode.
    #[arg(long)]
    content: String,

    /// Style JSON document. Defaults are used when omitted.
    #[arg(long)]
    style: Option<PathBuf>,

    /// Output format: png, jpg (or jpeg) or svg.
    #[arg(long, default_value_t = qrdecor::ExportFormat::Png)]
    format: qrdecor::ExportFormat,

    /// Directory the file is written into (created if missing).
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Extra font directory (repeatable).
    #[arg(long = "font-dir")]
    font_dirs: Vec<PathBuf>,

    /// Skip loading installed system fonts.
    #[arg(long, default_value_t = false)]
    no_system_fonts: bool,

    /// Print one line per decoration layer to stderr.
    #[arg(long, default_value_t = false)]
    dump_layers: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::DefaultStyle => {
            println!("{}", qrdecor::StyleSpec::default().to_json_pretty()?);
            Ok(())
        }
    }
}

fn read_style(path: &Path) -> anyhow::Result<qrdecor::StyleSpec> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("read style '{}'", path.display()))?;
    let style = qrdecor::StyleSpec::from_json(&json)
        .with_context(|| format!("parse style '{}'", path.display()))?;
    Ok(style)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let style = match &args.style {
        Some(p) => read_style(p)?,
        None => qrdecor::StyleSpec::default(),
    };

    let mut opts = qrdecor::EngineOpts::default().with_system_fonts(!args.no_system_fonts);
    for dir in args.font_dirs {
        opts = opts.with_font_dir(dir);
    }
    let mut engine = qrdecor::QrEngine::new(opts);

    let artifact = engine.render(&args.content, &style)?;
    if args.dump_layers {
        for report in &artifact.layers {
            eprintln!("{:?}: {:?}", report.layer, report.outcome);
        }
    }

    let file = engine.export(&artifact, args.format)?;
    let path = file.save_to(&args.out_dir)?;
    println!("{}", path.display());
    Ok(())
}
