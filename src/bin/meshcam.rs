use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use meshcam::{
    FrameRgb, FrameSource, Palette, Params, PortraitPipeline, Preset, RasterSurface, RenderMode,
    SyntheticSource,
};

#[derive(Parser, Debug)]
#[command(name = "meshcam", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the portrait pipeline over an image sequence (or a synthetic
    /// source) and write one PNG per frame.
    Frames(FramesArgs),
    /// List built-in presets and palettes.
    Presets,
}

#[derive(Parser, Debug)]
struct FramesArgs {
    /// Directory of input frames (PNG/JPEG, processed in sorted order,
    /// cycled if shorter than --frames). Omit for a synthetic source.
    #[arg(long = "in")]
    in_dir: Option<PathBuf>,

    /// Output directory for rendered PNG frames.
    #[arg(long)]
    out: PathBuf,

    /// Number of frames to run.
    #[arg(long, default_value_t = 120)]
    frames: u64,

    /// Render mode.
    #[arg(long, value_enum, default_value_t = ModeChoice::Mesh)]
    mode: ModeChoice,

    /// Built-in preset name (smooth, expressive, unstable).
    #[arg(long)]
    preset: Option<String>,

    /// Parameter JSON file (overrides --preset).
    #[arg(long)]
    params: Option<PathBuf>,

    /// Built-in palette name.
    #[arg(long, default_value = "mono")]
    palette: String,

    /// Custom palette JSON file (overrides --palette).
    #[arg(long)]
    palette_file: Option<PathBuf>,

    /// Output surface width.
    #[arg(long, default_value_t = 960)]
    width: u32,

    /// Output surface height.
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Deterministic seed for stochastic thinning.
    #[arg(long, default_value_t = 1)]
    seed: u64,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeChoice {
    Mesh,
    Voronoi,
}

impl From<ModeChoice> for RenderMode {
    fn from(m: ModeChoice) -> Self {
        match m {
            ModeChoice::Mesh => RenderMode::Mesh,
            ModeChoice::Voronoi => RenderMode::Voronoi,
        }
    }
}

/// Polled frame source backed by a directory of decoded images.
struct ImageSequenceSource {
    frames: Vec<FrameRgb>,
    cursor: usize,
    current: FrameRgb,
}

impl ImageSequenceSource {
    fn open(dir: &Path) -> anyhow::Result<Self> {
        let mut paths: Vec<PathBuf> = fs::read_dir(dir)
            .with_context(|| format!("reading input directory {}", dir.display()))?
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| {
                matches!(
                    p.extension().and_then(|e| e.to_str()),
                    Some("png" | "jpg" | "jpeg")
                )
            })
            .collect();
        paths.sort();
        if paths.is_empty() {
            anyhow::bail!("no PNG/JPEG frames found in {}", dir.display());
        }

        let mut frames = Vec::with_capacity(paths.len());
        for path in &paths {
            let img = image::open(path)
                .with_context(|| format!("decoding {}", path.display()))?
                .to_rgb8();
            let (w, h) = img.dimensions();
            frames.push(FrameRgb::new(w, h, img.into_raw())?);
        }
        Ok(Self {
            frames,
            cursor: 0,
            current: FrameRgb::default(),
        })
    }
}

impl FrameSource for ImageSequenceSource {
    fn latest_frame(&mut self) -> Option<&FrameRgb> {
        self.current = self.frames[self.cursor % self.frames.len()].clone();
        self.cursor += 1;
        Some(&self.current)
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Frames(args) => cmd_frames(args),
        Command::Presets => cmd_presets(),
    }
}

fn cmd_presets() -> anyhow::Result<()> {
    println!("presets:");
    for p in Preset::ALL {
        println!("  {}", p.name());
    }
    println!("palettes:");
    for name in Palette::BUILTIN {
        println!("  {name}");
    }
    Ok(())
}

fn load_params(args: &FramesArgs) -> anyhow::Result<Params> {
    if let Some(path) = &args.params {
        let json = fs::read_to_string(path)
            .with_context(|| format!("reading params file {}", path.display()))?;
        let params: Params =
            serde_json::from_str(&json).with_context(|| "parsing params JSON")?;
        return Ok(params);
    }
    if let Some(name) = &args.preset {
        return Ok(Params::preset(Preset::from_name(name)?));
    }
    Ok(Params::default())
}

fn load_palette(args: &FramesArgs) -> anyhow::Result<Palette> {
    if let Some(path) = &args.palette_file {
        let json = fs::read_to_string(path)
            .with_context(|| format!("reading palette file {}", path.display()))?;
        let palette: Palette =
            serde_json::from_str(&json).with_context(|| "parsing palette JSON")?;
        return Ok(palette);
    }
    Ok(Palette::builtin(&args.palette)?)
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    let params = load_params(&args)?;
    let palette = load_palette(&args)?;

    let mut sequence;
    let mut synthetic;
    let source: &mut dyn FrameSource = match &args.in_dir {
        Some(dir) => {
            sequence = ImageSequenceSource::open(dir)?;
            &mut sequence
        }
        None => {
            synthetic = SyntheticSource::new(640, 480)?;
            &mut synthetic
        }
    };

    fs::create_dir_all(&args.out)
        .with_context(|| format!("creating output directory {}", args.out.display()))?;

    let mut pipeline = PortraitPipeline::new(params, palette, args.seed)?;
    pipeline.set_mode(args.mode.into());
    let mut surface = RasterSurface::new(args.width, args.height)?;

    for i in 0..args.frames {
        pipeline.advance(source, &mut surface)?;
        let out_path = args.out.join(format!("frame_{i:05}.png"));
        let img = image::RgbaImage::from_raw(args.width, args.height, surface.data().to_vec())
            .context("surface byte length mismatch (bug)")?;
        img.save(&out_path)
            .with_context(|| format!("writing {}", out_path.display()))?;
    }

    let stats = pipeline.stats();
    println!(
        "rendered {} frames ({} seeds, {} triangles, {} detections, {} rebuilds)",
        stats.frames, stats.seeds, stats.triangles, stats.detections, stats.rebuilds
    );
    Ok(())
}
