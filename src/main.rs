use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info, warn};

use stagecraft::cli::Args;
use stagecraft::config::{self, Settings};
use stagecraft::core::load::{self, DocumentPayload, LoadOptions};
use stagecraft::{Snapshot, Store};

fn read(path: &Path, what: &str) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {} file: {}", what, path.display()))
}

fn print_summary(state: &Snapshot) {
    println!("revision:   {}", state.revision);
    if let Some(id) = &state.document.document_id {
        println!("document:   {}", id);
    }
    println!("assets:     {}", state.assets.len());
    println!("masters:    {}", state.masters.len());
    println!("chapters:   {}", state.chapter_count());
    for screen in &state.screens.preview_screens {
        println!(
            "device:     {} ({:?}, {:?}) - {} regions",
            screen.name,
            screen.kind,
            screen.orientation,
            screen.leaves().len()
        );
    }
    for timeline in state.timelines.iter() {
        let elements: usize = timeline.tracks.iter().map(|t| t.elements.len()).sum();
        println!(
            "timeline:   {} chapter={} tracks={} elements={} duration={:.1}s",
            timeline.id,
            timeline.chapter_id,
            timeline.tracks.len(),
            elements,
            timeline.duration()
        );
    }
}

fn main() -> Result<()> {
    // Parse command-line arguments first (needed for log setup)
    let args = Args::parse();

    // Create path configuration from CLI args and environment
    let path_config = config::PathConfig::from_env_and_cli(args.config_dir.clone());

    // Ensure directories exist
    if let Err(e) = config::ensure_dirs(&path_config) {
        eprintln!("Warning: Failed to create application directories: {}", e);
    }

    // Determine log level based on verbosity flags
    // 0 (default) = warn, 1 (-v) = info, 2 (-vv) = debug, 3+ (-vvv) = trace
    let log_level = match args.verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    // Initialize logger based on --log flag
    if let Some(log_path_opt) = &args.log_file {
        let log_path = log_path_opt
            .as_ref()
            .cloned()
            .unwrap_or_else(|| config::data_file(config::LOG_FILE, &path_config));

        let file = std::fs::File::create(&log_path)
            .with_context(|| format!("Failed to create log file: {}", log_path.display()))?;

        env_logger::Builder::new()
            .filter_level(log_level)
            .format_timestamp_millis()
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();

        info!("Logging to file: {} (level: {:?})", log_path.display(), log_level);
    } else {
        // Console logging with specified verbosity level (respects RUST_LOG if set)
        let default_level = match args.verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
            .format_timestamp_millis()
            .init();
    }

    info!("Stagecraft starting...");
    debug!("Command-line args: {:?}", args);

    let settings = Settings::load(&path_config)?;
    debug!("Settings: {:?}", settings);

    let doc = DocumentPayload::from_json(
        &read(&args.assets, "assets")?,
        &read(&args.layout, "layout")?,
        &read(&args.chapters, "chapters")?,
    )
    .context("Failed to parse document")?;

    let mut store = Store::new();
    let options = LoadOptions {
        prune_empty_tracks: settings.prune_empty_tracks_on_load,
    };
    if !load::load_document(&mut store, &doc, options)? {
        warn!("Document only partially loaded");
    }

    if let Some(path) = &args.actions {
        let actions = load::parse_actions(&read(path, "actions")?)
            .with_context(|| format!("Failed to parse actions: {}", path.display()))?;
        let total = actions.len();
        let mut applied = 0;
        for action in actions {
            if store.dispatch(action) {
                applied += 1;
            }
        }
        info!("Replayed {} actions, {} changed state", total, applied);
    }

    // Drain commits; nothing else observes this store
    let commits = store.poll();
    debug!("{} commits published", commits.len());

    let state = store.state();
    if settings.summary {
        print_summary(&state);
    }

    if let Some(out) = &args.dump {
        let json = if settings.pretty_json {
            serde_json::to_string_pretty(&*state)
        } else {
            serde_json::to_string(&*state)
        }
        .context("Failed to serialize snapshot")?;
        std::fs::write(out, json).with_context(|| format!("Failed to write snapshot: {}", out.display()))?;
        info!("Snapshot written to {}", out.display());
    }

    Ok(())
}
