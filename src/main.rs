use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};

use clap::{Parser, Subcommand};
use serde::Deserialize;
use slidecanvas::config::EngineConfig;
use slidecanvas::doc::{LayerKind, Slide};
use slidecanvas::engine::{Action, EngineCore};
use slidecanvas::error::ConfigError;
use slidecanvas::handles::HandleEvent;
use slidecanvas::input::{Key, PointerEvent, WheelEvent};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum ReplayError {
    #[error("failed to open {path}: {source}")]
    Open { path: String, source: io::Error },
    #[error("read failed: {0}")]
    Io(#[from] io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("trace line {line}: {source}")]
    Trace { line: usize, source: serde_json::Error },
    #[error("config: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Parser, Debug)]
#[command(name = "slidecanvas", about = "Slide canvas engine tools")]
struct Cli {
    /// JSON config file; `SLIDECANVAS_*` variables are used when absent.
    #[arg(long, env = "SLIDECANVAS_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Feed a recorded input trace through the engine and print every action.
    Replay {
        /// Slide JSON file.
        slide: String,
        /// JSON-lines trace file, or `-` for stdin.
        #[arg(default_value = "-")]
        trace: String,
        /// Fire all remaining timers after the last event.
        #[arg(long)]
        drain: bool,
    },
    /// Print the effective engine config.
    Config,
}

/// One line of an input trace.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum TraceEvent {
    Pointer(PointerEvent),
    Wheel(WheelEvent),
    Key { key: String },
    Handle { event: HandleEvent, time_ms: f64 },
    Tick { time_ms: f64 },
    Viewport { width: f64, height: f64 },
    Fit,
    ResetZoom,
    ShowGrid { on: bool },
    SnapToGrid { on: bool },
    AddLayer { kind: LayerKind },
}

fn main() {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(io::stderr).init();

    if let Err(error) = run(Cli::parse()) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), ReplayError> {
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Command::Replay { slide, trace, drain } => run_replay(config, &slide, &trace, drain),
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

fn load_config(path: Option<&str>) -> Result<EngineConfig, ReplayError> {
    let Some(path) = path else {
        return Ok(EngineConfig::from_env()?);
    };
    let text = std::fs::read_to_string(path).map_err(|source| ReplayError::Open { path: path.to_owned(), source })?;
    Ok(EngineConfig::from_json(&text)?)
}

fn run_replay(config: EngineConfig, slide_path: &str, trace_path: &str, drain: bool) -> Result<(), ReplayError> {
    let slide_text = std::fs::read_to_string(slide_path)
        .map_err(|source| ReplayError::Open { path: slide_path.to_owned(), source })?;
    let slide: Slide = serde_json::from_str(&slide_text)?;

    let mut core = EngineCore::with_config(config);
    core.load_slide(&slide);
    tracing::info!(slide = %slide.id, layers = slide.layers.len(), "replay started");

    let reader: Box<dyn BufRead> = if trace_path == "-" {
        Box::new(BufReader::new(io::stdin()))
    } else {
        let file = File::open(trace_path).map_err(|source| ReplayError::Open { path: trace_path.to_owned(), source })?;
        Box::new(BufReader::new(file))
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut emitted = 0_usize;
    let mut last_time = 0.0_f64;
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let event: TraceEvent =
            serde_json::from_str(trimmed).map_err(|source| ReplayError::Trace { line: index + 1, source })?;
        let (actions, time_ms) = apply(&mut core, event);
        if let Some(t) = time_ms {
            last_time = last_time.max(t);
        }
        emitted += print_actions(&mut out, &actions)?;
    }

    if drain {
        while let Some(deadline) = core.next_deadline() {
            last_time = last_time.max(deadline);
            let actions = core.tick(last_time);
            emitted += print_actions(&mut out, &actions)?;
        }
    }
    core.teardown();

    tracing::info!(emitted, zoom_percent = core.zoom_percent(), "replay finished");
    Ok(())
}

/// Route one trace event to the engine. Also returns the event's timestamp, if it has one.
fn apply(core: &mut EngineCore, event: TraceEvent) -> (Vec<Action>, Option<f64>) {
    match event {
        TraceEvent::Pointer(ev) => (core.on_pointer(&ev), Some(ev.time_ms)),
        TraceEvent::Wheel(ev) => (core.on_wheel(&ev), Some(ev.time_ms)),
        TraceEvent::Key { key } => (core.on_key_down(&Key(key)), None),
        TraceEvent::Handle { event, time_ms } => (core.on_handle_event(&event, time_ms), Some(time_ms)),
        TraceEvent::Tick { time_ms } => (core.tick(time_ms), Some(time_ms)),
        TraceEvent::Viewport { width, height } => {
            core.set_viewport(width, height);
            (Vec::new(), None)
        }
        TraceEvent::Fit => (core.fit_to_screen(), None),
        TraceEvent::ResetZoom => (core.reset_zoom(), None),
        TraceEvent::ShowGrid { on } => (core.set_show_grid(on), None),
        TraceEvent::SnapToGrid { on } => (core.set_snap_to_grid(on), None),
        TraceEvent::AddLayer { kind } => (core.add_layer(kind), None),
    }
}

fn print_actions(out: &mut impl Write, actions: &[Action]) -> Result<usize, ReplayError> {
    for action in actions {
        let rendered = serde_json::to_string(action)?;
        writeln!(out, "{rendered}")?;
    }
    Ok(actions.len())
}
