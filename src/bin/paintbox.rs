use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use paintbox::{CpuBackend, Effect, Image, Pipeline, Settings};

#[derive(Parser, Debug)]
#[command(name = "paintbox", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Stylize a PNG with one of the filter algorithms.
    Stylize(StylizeArgs),
    /// List the available effect names.
    Effects,
}

#[derive(Parser, Debug)]
struct StylizeArgs {
    /// Input image path.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Effect name (see `paintbox effects`).
    #[arg(long)]
    effect: String,

    /// Optional settings JSON (partial files are merged over defaults).
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Warm-up ticks before the captured frame (watercolor noise and
    /// temporal state settle over a few frames).
    #[arg(long, default_value_t = 1)]
    ticks: u32,

    /// Simulated seconds per tick.
    #[arg(long, default_value_t = 0.0333)]
    dt: f32,
}

const EFFECT_NAMES: &[(&str, Effect)] = &[
    ("sbr", Effect::Sbr),
    ("wcr", Effect::Wcr),
    ("bf", Effect::Bf),
    ("akf", Effect::Akf),
    ("snn", Effect::Snn),
    ("fxdog", Effect::FxDog),
    ("outline", Effect::Outline),
    ("mask", Effect::Mask),
    ("sobel", Effect::Sobel),
    ("sst", Effect::Sst),
    ("tfm", Effect::Tfm),
    ("lic", Effect::Lic),
    ("gblur", Effect::GBlur),
    ("posterize", Effect::Posterize),
    ("snoise", Effect::SNoise),
    ("fnoise", Effect::FNoise),
    ("vnoise", Effect::VNoise),
];

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Stylize(args) => cmd_stylize(args),
        Command::Effects => {
            for (name, _) in EFFECT_NAMES {
                println!("{name}");
            }
            Ok(())
        }
    }
}

fn parse_effect(name: &str) -> anyhow::Result<Effect> {
    let lower = name.to_ascii_lowercase();
    EFFECT_NAMES
        .iter()
        .find(|(n, _)| *n == lower)
        .map(|(_, e)| *e)
        .ok_or_else(|| anyhow::anyhow!("unknown effect '{name}' (try `paintbox effects`)"))
}

fn cmd_stylize(args: StylizeArgs) -> anyhow::Result<()> {
    let effect = parse_effect(&args.effect)?;

    let settings = match &args.settings {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("read settings '{}'", path.display()))?;
            serde_json::from_str::<Settings>(&text)
                .with_context(|| format!("parse settings '{}'", path.display()))?
        }
        None => Settings::default(),
    };

    let decoded = image::open(&args.in_path)
        .with_context(|| format!("open image '{}'", args.in_path.display()))?
        .to_rgba8();
    let (width, height) = decoded.dimensions();
    let data: Vec<f32> = decoded.as_raw().iter().map(|&b| b as f32 / 255.0).collect();
    let src = Image::from_raw(width, height, data)?;

    let mut pipeline = Pipeline::with_settings(settings)?;
    pipeline.select(Some(effect));

    let mut backend = CpuBackend::new();
    let mut dst = Image::new(width, height)?;
    for _ in 0..args.ticks.max(1) {
        pipeline.run_frame(&src, &mut dst, args.dt, &mut backend)?;
    }

    let bytes: Vec<u8> = dst
        .data()
        .iter()
        .map(|&v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
        .collect();

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        &args.out,
        &bytes,
        width,
        height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
