//! MemeMaker - headless host for the meme screen
//!
//! Drives the meme screen from the command line: the photo comes from a file,
//! captions from arguments and "sharing" writes the result to disk.

use anyhow::{bail, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use meme_maker::capture::FileAcquisition;
use meme_maker::config::{self, AppConfig};
use meme_maker::keyboard::KeyboardNotifications;
use meme_maker::screen::{ActionOutcome, MemeScreen, ScreenEvent};
use meme_maker::share::FileShare;
use meme_maker::storage::{self, MemeStore};
use meme_maker::{CaptionOverlayEngine, CaptionSlot, CaptionStyle};

/// MemeMaker - caption a photo and export the meme
#[derive(Parser, Debug)]
#[command(name = "meme-maker")]
#[command(about = "Overlay top and bottom captions on a photo")]
struct Args {
    /// Photo to caption
    #[arg(short, long, conflicts_with = "camera")]
    image: Option<PathBuf>,

    /// Take the photo from the camera instead of the library
    #[arg(long)]
    camera: bool,

    /// Top caption (defaults to "TOP")
    #[arg(short, long)]
    top: Option<String>,

    /// Bottom caption (defaults to "BOTTOM")
    #[arg(short, long)]
    bottom: Option<String>,

    /// Where to write the finished meme
    #[arg(short, long, default_value = "meme.png")]
    out: PathBuf,

    /// Configuration file (defaults to the platform config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Caption font file, overriding the configuration
    #[arg(long)]
    font: Option<PathBuf>,

    /// Don't keep a copy in the meme collection
    #[arg(long)]
    no_store: bool,

    /// List saved memes and exit
    #[arg(long)]
    list: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = load_or_create_config(args.config.as_deref());
    if let Some(font) = &args.font {
        config.style.font_path = Some(font.clone());
        if let Some(stem) = font.file_stem().and_then(|s| s.to_str()) {
            config.style.font_family = stem.to_string();
        }
    }

    if args.list {
        return list_memes(&config);
    }

    run_screen(&args, &config)
}

/// Load configuration from file or fall back to defaults
fn load_or_create_config(explicit: Option<&Path>) -> AppConfig {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => storage::get_config_dir().ok().map(|dir| dir.join("config.toml")),
    };

    if let Some(path) = path.filter(|p| p.exists()) {
        match config::load_config(&path) {
            Ok(config) => {
                info!("Loaded configuration from {:?}", path);
                return config;
            }
            Err(e) => tracing::warn!("Ignoring unreadable configuration {:?}: {}", path, e),
        }
    }
    info!("Using default configuration");
    AppConfig::default()
}

fn open_store(config: &AppConfig) -> Result<MemeStore> {
    let dir = match &config.export.store_dir {
        Some(dir) => dir.clone(),
        None => storage::get_memes_dir()?,
    };
    Ok(MemeStore::open(dir)?)
}

fn list_memes(config: &AppConfig) -> Result<()> {
    let store = open_store(config)?;
    let records = store.list()?;
    if records.is_empty() {
        println!("No saved memes in {:?}", store.dir());
        return Ok(());
    }

    println!("Saved memes in {:?}:", store.dir());
    for record in records {
        println!(
            "  {} {}x{} top={:?} bottom={:?}",
            record.id, record.width, record.height, record.top_caption, record.bottom_caption
        );
    }
    Ok(())
}

/// Play the user's actions against the meme screen
fn run_screen(args: &Args, config: &AppConfig) -> Result<()> {
    let mut picker = FileAcquisition::new(&config.capture);
    if let Some(image) = &args.image {
        picker.select_library_image(image);
    }

    let engine = CaptionOverlayEngine::new(CaptionStyle::from(&config.style));
    let mut screen = MemeScreen::new(engine, picker, FileShare::new(&args.out));
    if config.export.store_memes && !args.no_store {
        screen = screen.with_store(open_store(config)?);
    }

    let keyboard = KeyboardNotifications::new();
    screen.did_load();
    screen.will_appear(&keyboard);

    let mut events = vec![if args.camera {
        ScreenEvent::CameraPressed
    } else {
        ScreenEvent::AlbumPressed
    }];
    for (slot, text) in [(CaptionSlot::Top, &args.top), (CaptionSlot::Bottom, &args.bottom)] {
        if let Some(text) = text {
            events.push(ScreenEvent::BeginEditing(slot));
            events.push(ScreenEvent::ReturnPressed(slot, text.clone()));
        }
    }
    for event in events {
        screen.handle(event)?;
        screen.pump_keyboard_events();
    }

    if !screen.is_action_enabled() {
        screen.will_disappear();
        bail!("No usable photo was selected; pass --image or configure a camera image");
    }

    let outcome = screen.handle(ScreenEvent::ActionPressed);
    screen.will_disappear();

    match outcome? {
        Some(ActionOutcome::Shared { record: Some(record) }) => {
            println!("Wrote {:?} (saved as {})", args.out, record.id)
        }
        Some(ActionOutcome::Shared { record: None }) => println!("Wrote {:?}", args.out),
        Some(ActionOutcome::Cancelled) | None => println!("Nothing shared"),
    }

    Ok(())
}
