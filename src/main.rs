use anyhow::{Context, Result};
use clap::Parser;
use geofinder::console::HELP;
use geofinder::logging::init_tracing;
use geofinder::{
    CommitTarget, ConsoleSink, GeofinderConfig, NominatimClient, OpenWeatherMapClient,
    PresentationEvent, PromptCommand, SearchSession, SessionClients, SessionHandle, Viewport,
};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Search administrative regions and show their details and current weather
#[derive(Parser, Debug)]
#[command(name = "geofinder", version, about)]
struct Args {
    /// Configuration file (defaults to the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging for geofinder
    #[arg(short, long)]
    verbose: bool,

    /// Map viewport height in pixels, overriding the configured value
    #[arg(long, value_name = "PX")]
    viewport_height: Option<f64>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = GeofinderConfig::load_from_path(args.config.clone())
        .context("Failed to load configuration")?;
    init_tracing(&config.logging, args.verbose).context("Failed to initialize logging")?;

    let nominatim = Arc::new(
        NominatimClient::new(&config.geocoding).context("Failed to create geocoding client")?,
    );
    let weather = Arc::new(
        OpenWeatherMapClient::new(&config.weather, &config.geocoding.user_agent)
            .context("Failed to create weather client")?,
    );
    let clients = SessionClients {
        geo: nominatim.clone(),
        reverse: nominatim,
        weather,
    };

    let viewport_height = args
        .viewport_height
        .unwrap_or(config.view.viewport_height_px);
    let viewport = Viewport::new(viewport_height, config.view.initial_zoom);

    let (session, events) = SearchSession::new(clients, viewport);
    let handle = SessionHandle::spawn(session);
    info!("geofinder {} ready", geofinder::VERSION);

    run_prompt(handle, events).await
}

async fn run_prompt(
    handle: SessionHandle,
    mut events: mpsc::UnboundedReceiver<PresentationEvent>,
) -> Result<()> {
    let mut sink = ConsoleSink::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = std::io::stdout();

    writeln!(stdout, "{HELP}")?;
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read input")? else {
                    debug!("Input closed");
                    break;
                };
                if !dispatch(&handle, &sink, &line, &mut stdout)? {
                    break;
                }
            }
            Some(event) = events.recv() => {
                write!(stdout, "{}", sink.render(&event))?;
                stdout.flush()?;
            }
        }
    }

    // the session finishes its in-flight lookups once the last handle is gone
    drop(handle);
    while let Some(event) = events.recv().await {
        write!(stdout, "{}", sink.render(&event))?;
    }
    stdout.flush()?;

    Ok(())
}

/// Forward one prompt line to the session; `false` ends the prompt
fn dispatch(
    handle: &SessionHandle,
    sink: &ConsoleSink,
    line: &str,
    out: &mut impl Write,
) -> Result<bool> {
    match PromptCommand::parse(line) {
        PromptCommand::Type(text) => handle.on_typed(text),
        PromptCommand::Go(text) => handle.on_commit(CommitTarget::Query(text)),
        PromptCommand::Pick(number) => match sink.suggestion(number) {
            Some(candidate) => handle.on_commit(CommitTarget::Candidate(candidate.clone())),
            None => writeln!(out, "No suggestion {number}")?,
        },
        PromptCommand::Recent(number) => match sink.recent(number) {
            Some(entry) => handle.on_recall(entry.clone()),
            None => writeln!(out, "No recent entry {number}")?,
        },
        PromptCommand::Clear => handle.on_clear(),
        PromptCommand::Quit => return Ok(false),
        PromptCommand::Invalid(input) => writeln!(out, "Unknown command '{input}'. {HELP}")?,
    }
    Ok(true)
}
