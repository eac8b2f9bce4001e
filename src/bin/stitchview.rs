use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use stitchview::{
    COLOR_PRESETS, DesignerSession, FileValidator, GeometryProfile, HandleRegistry,
    Panel, PngSnapshotPresenter, SessionConfig, ValidationLimits,
    assets::sanitize::sanitize_svg_bytes, input::upload::read_raw_file,
    view::presentation::PresentationPhase,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "stitchview", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite a garment texture and write it as a PNG.
    Preview(PreviewArgs),
    /// Run the upload validator on a file.
    Validate(ValidateArgs),
    /// Print the sanitized form of an SVG file.
    Sanitize(SanitizeArgs),
    /// Write the placeholder geometry profile as JSON.
    Profile(ProfileArgs),
    /// List the colour presets.
    Presets,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Base colour as hex (`#RRGGBB` or `RRGGBB`).
    #[arg(long, conflicts_with = "preset")]
    color: Option<String>,

    /// Base colour by preset label.
    #[arg(long)]
    preset: Option<String>,

    /// Artwork file (PNG, JPEG or SVG).
    #[arg(long)]
    design: Option<PathBuf>,

    /// Panel shown by the viewer.
    #[arg(long, default_value_t = Panel::Front)]
    view: Panel,

    /// Geometry profile JSON (defaults to the placeholder layout).
    #[arg(long)]
    profile: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    file: PathBuf,

    /// Override the file size limit, in bytes.
    #[arg(long)]
    max_bytes: Option<u64>,
}

#[derive(Parser, Debug)]
struct SanitizeArgs {
    file: PathBuf,
}

#[derive(Parser, Debug)]
struct ProfileArgs {
    /// Output JSON path (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Preview(args) => cmd_preview(args),
        Command::Validate(args) => cmd_validate(args),
        Command::Sanitize(args) => cmd_sanitize(args),
        Command::Profile(args) => cmd_profile(args),
        Command::Presets => cmd_presets(),
    }
}

fn load_profile(path: Option<&Path>) -> anyhow::Result<GeometryProfile> {
    match path {
        Some(p) => Ok(GeometryProfile::load(p)?),
        None => Ok(GeometryProfile::placeholder()),
    }
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let config = SessionConfig {
        profile: load_profile(args.profile.as_deref())?,
        limits: ValidationLimits::default(),
    };
    let mut session = DesignerSession::start(config, PngSnapshotPresenter::new(&args.out))?;

    if let Some(hex) = &args.color {
        if session.enter_color_text(hex).is_none() {
            anyhow::bail!(
                "{}",
                session
                    .color_input()
                    .error_message()
                    .unwrap_or("invalid colour")
            );
        }
    } else if let Some(label) = &args.preset {
        session.select_preset_by_label(label)?;
    }

    if let Some(design) = &args.design {
        session.upload_path(design)?;
    }
    session.set_view(args.view);

    let report = session.settle();
    if let PresentationPhase::Fallback { message } = session.view().phase() {
        anyhow::bail!("texture could not be presented: {message}");
    }
    tracing::debug!(?report, "preview settled");

    let fingerprint = session
        .buffer()
        .map(|b| b.fingerprint())
        .context("texture buffer missing after session start")?;
    println!("wrote {}", args.out.display());
    println!("fingerprint {fingerprint}");
    session.end();
    Ok(())
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let mut limits = ValidationLimits::default();
    if let Some(max) = args.max_bytes {
        limits.max_file_bytes = max;
    }
    let validator = FileValidator::new(limits);
    let registry = HandleRegistry::new();

    let file = read_raw_file(&args.file, &validator)?;
    let asset = validator.validate(&file, &registry)?;
    let (w, h) = asset.dimensions();
    println!(
        "{} {}x{} {}",
        asset.display_name(),
        w,
        h,
        asset.format().mime()
    );
    Ok(())
}

fn cmd_sanitize(args: SanitizeArgs) -> anyhow::Result<()> {
    let bytes = std::fs::read(&args.file)
        .with_context(|| format!("read svg '{}'", args.file.display()))?;
    let out = sanitize_svg_bytes(&bytes)
        .with_context(|| format!("sanitize svg '{}'", args.file.display()))?;
    tracing::info!(
        removed_elements = out.report.removed_elements,
        removed_attributes = out.report.removed_attributes,
        "svg sanitized"
    );
    println!("{}", out.markup);
    Ok(())
}

fn cmd_profile(args: ProfileArgs) -> anyhow::Result<()> {
    let json = GeometryProfile::placeholder().to_json_pretty()?;
    match args.out {
        Some(path) => {
            std::fs::write(&path, format!("{json}\n"))
                .with_context(|| format!("write profile '{}'", path.display()))?;
            println!("wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn cmd_presets() -> anyhow::Result<()> {
    for preset in COLOR_PRESETS {
        let tone = if preset.color.is_dark() { "dark" } else { "light" };
        println!("{:<6} {} {tone}", preset.label, preset.color);
    }
    Ok(())
}
