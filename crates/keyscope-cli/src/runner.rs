// Command dispatch against a snapshot-backed engine

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use keyscope_bindings::{
    BuiltinMatcherProvider, ConfigLoader, EngineConfig, FilterFactory, HostSnapshot,
    KeybindingEngine, SearchOptions,
};

use crate::cli::{Cli, Commands};
use crate::report;

pub type SnapshotEngine = KeybindingEngine<Arc<HostSnapshot>, Arc<HostSnapshot>>;

/// Load configuration and snapshot, then build the engine
pub fn open_engine(snapshot: &Path, config: Option<&Path>) -> Result<SnapshotEngine> {
    let loader = match config {
        Some(path) => ConfigLoader::with_path(path),
        None => ConfigLoader::new(),
    };
    let config: EngineConfig = loader
        .load()
        .with_context(|| format!("loading config {}", loader.config_path().display()))?;

    let snapshot = Arc::new(
        HostSnapshot::from_file(snapshot)
            .with_context(|| format!("loading snapshot {}", snapshot.display()))?,
    );

    let engine = KeybindingEngine::new(Arc::clone(&snapshot), snapshot, config)?;
    Ok(engine)
}

/// Run one parsed command, writing its report to `out`
pub async fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<()> {
    let mut engine = open_engine(&cli.snapshot, cli.config.as_deref())?;

    match &cli.command {
        Commands::Check { binding } => {
            let candidate = engine.parse_candidate(binding)?;
            let conflicts = engine.find_conflicts(&candidate).await?;
            tracing::info!("{} conflict group(s) for {}", conflicts.len(), binding);
            write!(out, "{}", report::format_conflicts(&conflicts, engine.parser()))?;
        }
        Commands::Search {
            query,
            match_case,
            exact,
        } => {
            let commands = if *match_case || *exact {
                let defaults = engine.config().search;
                let options = SearchOptions {
                    match_case: *match_case || defaults.match_case,
                    fuzzy: defaults.fuzzy && !*exact,
                };
                let filter = FilterFactory::create(options, &BuiltinMatcherProvider);
                engine.search_with(filter.as_ref(), query).await?
            } else {
                engine.search(query).await?
            };
            write!(out, "{}", report::format_commands(&commands, engine.parser()))?;
        }
        Commands::Scopes => {
            let entries = engine.scope_display_list()?;
            write!(out, "{}", report::format_scope_list(&entries))?;
        }
        Commands::Plan { command, binding } => {
            let bindings = engine.plan_binding(command, binding).await?;
            for line in bindings {
                writeln!(out, "{}", line)?;
            }
        }
    }

    Ok(())
}
