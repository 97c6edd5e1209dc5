//! Headless renderer: plays a WAV file through the visualizer engine with a
//! scripted player and writes PNG frames.

mod analyser;
mod backend;
mod player;
mod raster;

use anyhow::{bail, Context};
use backend::{ContextClock, SoftwareBackend};
use clap::Parser;
use player::{PlayerEvent, ScheduledEvent, SimulatedPlayer};
use raster::{parse_hex_color, RasterSurface};
use scope_core::{constants, Admission, ColorSpec, VisualizerConfig, VisualizerInstance};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "scope-native")]
#[command(version)]
#[command(about = "Render an audio file's spectrogram and oscilloscope to PNG frames", long_about = None)]
struct Args {
    /// WAV file to play
    input: PathBuf,

    #[arg(long, default_value_t = constants::DEFAULT_SEGMENT_COUNT)]
    segments: usize,

    #[arg(long, default_value_t = 480)]
    width: u32,

    #[arg(long, default_value_t = 120)]
    height: u32,

    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Frames to render [default: track length plus one second]
    #[arg(long)]
    frames: Option<u64>,

    /// Save every Nth frame
    #[arg(long, default_value_t = 1)]
    every: u64,

    #[arg(short, long, default_value = "frames")]
    out: PathBuf,

    /// Player position when rendering starts
    #[arg(long, default_value_t = 0.0)]
    start_secs: f64,

    /// Seek the player before a frame, as FRAME:SECS (repeatable)
    #[arg(long, value_parser = player::parse_seek)]
    seek: Vec<ScheduledEvent>,

    /// Pause the player before FRAME (repeatable)
    #[arg(long)]
    pause: Vec<u64>,

    /// Resume the player before FRAME (repeatable)
    #[arg(long)]
    resume: Vec<u64>,

    #[arg(long)]
    no_oscilloscope: bool,

    #[arg(long)]
    no_spectrograph: bool,

    #[arg(long, default_value = constants::SPECTROGRAPH_FALLBACK_COLOR)]
    spectrograph_color: String,

    #[arg(long, default_value = constants::OSCILLOSCOPE_FALLBACK_COLOR)]
    oscilloscope_color: String,

    #[arg(long, default_value = "#000000")]
    background: String,

    /// Admit files above the size limit
    #[arg(long)]
    bypass_size_limit: bool,

    /// Fetch attempts before giving up
    #[arg(long, default_value_t = constants::DEFAULT_MAX_ATTEMPTS)]
    max_attempts: u32,
}

/// Display form of a byte count, as a file list would show it.
fn display_size(bytes: u64) -> String {
    let b = bytes as f64;
    if b >= 1e9 {
        format!("{:.1} GB", b / 1e9)
    } else if b >= 1e6 {
        format!("{:.1} MB", b / 1e6)
    } else if b >= 1e3 {
        format!("{:.1} KB", b / 1e3)
    } else {
        format!("{} bytes", bytes)
    }
}

fn color(flag: &str, value: &str) -> anyhow::Result<image::Rgba<u8>> {
    parse_hex_color(value).with_context(|| format!("--{}: expected #RGB, #RRGGBB or #RRGGBBAA, got {:?}", flag, value))
}

fn schedule(args: &Args) -> Vec<ScheduledEvent> {
    let mut events: Vec<ScheduledEvent> = args
        .seek
        .iter()
        .copied()
        .chain(args.pause.iter().map(|&frame| ScheduledEvent {
            frame,
            event: PlayerEvent::Pause,
        }))
        .chain(args.resume.iter().map(|&frame| ScheduledEvent {
            frame,
            event: PlayerEvent::Resume,
        }))
        .collect();
    events.sort_by_key(|e| e.frame);
    events
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    if !(args.fps > 0.0 && args.fps.is_finite()) {
        bail!("--fps must be positive");
    }

    let mut config = VisualizerConfig {
        segment_count: args.segments,
        show_spectrograph: !args.no_spectrograph,
        show_oscilloscope: !args.no_oscilloscope,
        spectrograph_color: ColorSpec::Literal(args.spectrograph_color.clone()),
        oscilloscope_color: ColorSpec::Literal(args.oscilloscope_color.clone()),
        ..VisualizerConfig::default()
    };
    config.admission.bypass = args.bypass_size_limit;
    config.retry.max_attempts = args.max_attempts;

    let metadata = std::fs::metadata(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let declared = display_size(metadata.len());
    if let Admission::Rejected { size_bytes } = config.admission.admit(&declared) {
        bail!(
            "{} is {} ({} bytes), above the {} byte limit; pass --bypass-size-limit to render anyway",
            args.input.display(),
            declared,
            size_bytes,
            config.admission.limit_bytes
        );
    }

    // Duration only drives the scripted player; the engine decodes on its own.
    let duration = backend::decode_wav(&args.input)
        .map(|a| a.duration_secs())
        .with_context(|| format!("decoding {}", args.input.display()))?;
    let url = args.input.to_string_lossy().into_owned();
    let player = SimulatedPlayer::new(&url, duration, args.start_secs);

    let surface = RasterSurface::new(
        args.width,
        args.height,
        color("background", &args.background)?,
        color("spectrograph-color", &config.spectrograph_color.resolve(|_| None))?,
        color("oscilloscope-color", &config.oscilloscope_color.resolve(|_| None))?,
    );
    let clock = ContextClock::default();
    let backend = SoftwareBackend::new(config.fft_size(), clock.clone());
    let mut instance = VisualizerInstance::new(config, backend, surface, player.clone())
        .map_err(|e| anyhow::anyhow!("invalid options: {}", e))?;

    std::fs::create_dir_all(&args.out).with_context(|| format!("creating {}", args.out.display()))?;
    let frame_ms = 1000.0 / args.fps;
    let total = args
        .frames
        .unwrap_or(((duration - args.start_secs).max(0.0) * args.fps).ceil() as u64 + args.fps.ceil() as u64);
    let events = schedule(&args);
    let every = args.every.max(1);
    log::info!(
        "rendering {} frames of {:.1}s track at {} fps into {}",
        total,
        duration,
        args.fps,
        args.out.display()
    );

    let mut next_event = 0;
    let mut saved = 0u64;
    for frame in 0..total {
        while let Some(e) = events.get(next_event).filter(|e| e.frame == frame) {
            player.apply(e.event);
            next_event += 1;
        }
        if frame > 0 {
            player.advance(frame_ms / 1000.0);
        }
        let timestamp = frame as f64 * frame_ms;
        clock.set_secs(timestamp / 1000.0);
        if !instance.frame(timestamp) {
            break;
        }
        if frame % every == 0 {
            let path = args.out.join(format!("frame_{:05}.png", frame));
            instance.surface().save_png(&path)?;
            saved += 1;
        }
    }
    instance.destroy();
    log::info!(
        "saved {} frames, player at {:.2}s; acquisition {:?} after {} attempt(s)",
        saved,
        player.position(),
        instance.acquisition_phase(),
        instance.acquisition_attempts()
    );
    Ok(())
}
