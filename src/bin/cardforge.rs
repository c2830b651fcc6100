use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};

use cardforge::{
    CaptureFlow, CaptureStatus, CardConfig, CardRequest, CpuRenderer, DirectorySink, Facing,
    IdentityFields, PickedFile, StillFrameCamera, StillImage,
};

#[derive(Parser, Debug)]
#[command(name = "cardforge", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render an identity card as a PNG.
    Render(RenderArgs),
    /// Take a photo with a still-frame camera, or upload one when the camera fails.
    Capture(CaptureArgs),
    /// Print the card layout as JSON.
    Layout(LayoutArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Name printed on the card.
    #[arg(long)]
    name: String,

    /// Birthday as YYYY-MM-DD. Empty or invalid values print the fallback id.
    #[arg(long, default_value = "")]
    birthday: String,

    /// Portrait photo.
    #[arg(long)]
    photo: Option<PathBuf>,

    /// Directory the card is saved into.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Rounded corners with a drop shadow.
    #[arg(long)]
    rounded: bool,

    /// Surface pixels per card unit.
    #[arg(long)]
    scale: Option<f64>,

    /// Config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Regular font file.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Bold font file.
    #[arg(long)]
    bold_font: Option<PathBuf>,

    /// Draw a silhouette when no photo is given.
    #[arg(long)]
    placeholder: bool,
}

#[derive(Parser, Debug)]
struct CaptureArgs {
    /// Frame served by the front camera.
    #[arg(long)]
    front: Option<PathBuf>,

    /// Frame served by the back camera.
    #[arg(long)]
    back: Option<PathBuf>,

    /// Camera to start with.
    #[arg(long, value_enum, default_value_t = FacingChoice::Front)]
    facing: FacingChoice,

    /// Image uploaded when the camera is unavailable.
    #[arg(long)]
    upload: Option<PathBuf>,

    /// Where the confirmed photo is written.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct LayoutArgs {
    /// Rounded drop-shadow variant.
    #[arg(long)]
    rounded: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FacingChoice {
    Front,
    Back,
}

impl From<FacingChoice> for Facing {
    fn from(choice: FacingChoice) -> Self {
        match choice {
            FacingChoice::Front => Facing::Front,
            FacingChoice::Back => Facing::Back,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Capture(args) => cmd_capture(args),
        Command::Layout(args) => cmd_layout(args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<CardConfig> {
    Ok(match path {
        Some(path) => CardConfig::load(path)?,
        None => {
            let mut cfg = CardConfig::default();
            cfg.apply_env();
            cfg
        }
    })
}

fn read_photo(path: &Path) -> anyhow::Result<StillImage> {
    let file = PickedFile::from_path(path)?;
    Ok(cardforge::capture::source::read_picked_file(&file)
        .with_context(|| format!("load photo '{}'", path.display()))?)
}

fn make_renderer(cfg: &CardConfig) -> anyhow::Result<CpuRenderer> {
    if cfg.fonts.regular.is_some() {
        return Ok(CpuRenderer::new(&cfg.fonts()?)?);
    }
    match cfg.fonts() {
        Ok(fonts) => Ok(CpuRenderer::new(&fonts)?),
        Err(err) => {
            warn!(error = %err, "no fonts available; card text will be skipped");
            Ok(CpuRenderer::headless())
        }
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(args.config.as_deref())?;
    cfg.rounded |= args.rounded;
    cfg.placeholder |= args.placeholder;
    if let Some(scale) = args.scale {
        cfg.export_scale = scale;
    }
    if let Some(font) = args.font {
        cfg.fonts.regular = Some(font);
    }
    if let Some(bold) = args.bold_font {
        cfg.fonts.bold = Some(bold);
    }

    let layout = cfg.layout()?;
    let fields = IdentityFields::new(args.name, args.birthday);
    let photo = args.photo.as_deref().map(read_photo).transpose()?;
    let mut renderer = make_renderer(&cfg)?;

    let request = CardRequest {
        text: cfg.text.clone(),
        options: cfg.render_options(),
        photo: photo.as_ref(),
    };
    let card = pollster::block_on(cardforge::render_card_with(
        &layout,
        &fields,
        &request,
        &mut renderer,
    ))?;

    let mut sink = DirectorySink::new(&args.out_dir);
    let exported = cardforge::export_download(&card, &mut sink)?;
    eprintln!("wrote {}", exported.location);
    Ok(())
}

fn cmd_capture(args: CaptureArgs) -> anyhow::Result<()> {
    let mut camera = StillFrameCamera::new();
    if let Some(front) = args.front {
        camera = camera.with_front(front);
    }
    if let Some(back) = args.back {
        camera = camera.with_back(back);
    }

    let mut flow = CaptureFlow::with_facing(camera, args.facing.into());
    let status = pollster::block_on(flow.start())?;

    let captured = status == CaptureStatus::Live && {
        match pollster::block_on(flow.capture()) {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "capture failed");
                false
            }
        }
    };

    if !captured {
        if let Some(message) = &flow.session().error_message {
            eprintln!("{message}");
        }
        let upload = args
            .upload
            .as_deref()
            .context("camera produced no photo and no --upload image was given")?;
        let file = PickedFile::from_path(upload)?;
        pollster::block_on(flow.upload_file(&file))?;
    }

    let confirmed = flow
        .confirm()?
        .context("photo was already confirmed")?;
    flow.leave();

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, confirmed.image.data())
        .with_context(|| format!("write photo '{}'", args.out.display()))?;
    info!(
        facing = %confirmed.facing,
        width = confirmed.image.width(),
        height = confirmed.image.height(),
        "photo confirmed"
    );
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_layout(args: LayoutArgs) -> anyhow::Result<()> {
    let layout = if args.rounded {
        cardforge::CardLayout::standard().rounded()
    } else {
        cardforge::CardLayout::standard().clone()
    };
    let json = serde_json::to_string_pretty(&layout).context("serialize layout")?;
    println!("{json}");
    Ok(())
}
