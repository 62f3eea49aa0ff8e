use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use fight_odds::config::{Config, SourceKind};
use fight_odds::model::MatchupModel;
use fight_odds::report::MatchupReport;
use fight_odds::sources::{JsonFileProvider, RosterProvider, StatResolver, StatsProvider};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only the report
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::parse();
    config.validate()?;

    let model = MatchupModel::new(config.load_model_config().await?)?;
    info!("Model bias {:+.3}", model.config().bias);

    let mut providers: Vec<Arc<dyn StatsProvider>> = Vec::new();
    if matches!(config.source, SourceKind::Files | SourceKind::Both) {
        info!("Reading scraper dumps from {}", config.stats_dir.display());
        providers.push(Arc::new(JsonFileProvider::new(&config.stats_dir)));
    }
    if matches!(config.source, SourceKind::Roster | SourceKind::Both) {
        let mut roster = RosterProvider::with_builtin();
        if let Some(path) = &config.roster_overrides {
            roster.load_overrides(path).await?;
        }
        providers.push(Arc::new(roster));
    }
    info!("Configured {} stat provider(s)", providers.len());

    let resolver = StatResolver::new(providers, config.fallback_division());
    let (first, second) = tokio::try_join!(
        resolver.resolve(&config.first),
        resolver.resolve(&config.second)
    )?;

    let report = MatchupReport::build(
        &model,
        first,
        second,
        config.bootstrap_options(),
        config.rounds,
    )?;

    if config.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render_text());
    }
    Ok(())
}
