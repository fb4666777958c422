use anyhow::{Context, Result};
use clap::Parser;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use validator::Validate;

use synctv_collector::{
    cli::{Cli, Commands, ImportArgs, SearchArgs, SyncArgs, TerminalPrompter},
    collector::{CollectorClient, CollectorRegistry, ReqwestTransport},
    config::AppConfig,
    logging,
    manifest::LineFileParser,
    pipeline::{ImportPipeline, PipelineError, PipelineOutcome, Selector, SyncTarget, submit_items},
    sync::SyncTvClient,
};

const FALLBACK_CONFIG_FILE: &str = "config.toml";

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let _guard = match logging::init(&cli.log_level, cli.log_file.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("✗ {e:#}");
            return ExitCode::FAILURE;
        }
    };

    match run(cli).await {
        Ok(code) => exit_code(code),
        Err(e) => {
            error!("{:#}", e);
            eprintln!("✗ {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<i32> {
    let config_path = cli
        .config
        .or_else(AppConfig::default_path)
        .unwrap_or_else(|| PathBuf::from(FALLBACK_CONFIG_FILE));

    let config = AppConfig::load(&config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;
    info!("Configuration loaded from {}", config_path.display());

    match cli.command {
        Commands::Search(args) => search(config, &config_path, args).await,
        Commands::Import(args) => import(config, &config_path, args).await,
        Commands::Collectors => {
            let registry = CollectorRegistry::with_custom_file(&config.custom_collectors_file);
            TerminalPrompter::stdio().show_collectors(registry.iter())?;
            Ok(0)
        }
    }
}

async fn search(mut config: AppConfig, config_path: &Path, args: SearchArgs) -> Result<i32> {
    if let Some(collector) = args.collector {
        config.collector = collector;
    }
    if let Some(retries) = args.retries {
        config.retries = retries;
    }
    if args.insecure {
        config.accept_invalid_certs = true;
    }
    apply_sync_args(&mut config, &args.sync);
    finish_config(&config, config_path, args.sync.save_config)?;

    let registry = CollectorRegistry::with_custom_file(&config.custom_collectors_file);
    let collector = registry
        .get(&config.collector)
        .context("run `synctv-collector collectors` to list the available ids")?;
    info!("Using collector {} ({})", collector.name, collector.id);

    let mut prompter = TerminalPrompter::stdio().assume_yes(args.yes);

    let keyword = match args.keyword.filter(|k| !k.trim().is_empty()) {
        Some(keyword) => keyword,
        None => match prompter.ask_required("Search keyword") {
            Some(keyword) => keyword,
            None => return Ok(cancelled()),
        },
    };
    let Some(target) = resolve_target(&mut prompter, &mut config, &args.sync, args.yes) else {
        return Ok(cancelled());
    };

    let transport = ReqwestTransport::new(&config.transport_config())?;
    let client = CollectorClient::new(transport, collector.endpoint.clone())
        .with_max_retries(config.retries);
    let sync = SyncTvClient::new(config.synctv_url.as_str(), config.timeout())?;

    println!("Searching {} for {:?}...", collector.name, keyword);
    let mut pipeline = ImportPipeline::new(client, Arc::new(sync));
    match pipeline.run(&keyword, &target, &mut prompter).await {
        Ok(outcome) => {
            report_outcome(&outcome, &keyword);
            Ok(outcome.exit_code())
        }
        Err(e) => Ok(report_error(&e)),
    }
}

async fn import(mut config: AppConfig, config_path: &Path, args: ImportArgs) -> Result<i32> {
    apply_sync_args(&mut config, &args.sync);
    finish_config(&config, config_path, args.sync.save_config)?;

    let items = LineFileParser::parse_file(&args.file)
        .await
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    if items.is_empty() {
        println!("No entries found in {}", args.file.display());
        return Ok(PipelineOutcome::NoResults.exit_code());
    }
    info!("Read {} entries from {}", items.len(), args.file.display());

    let mut prompter = TerminalPrompter::stdio().assume_yes(args.yes);

    let items = if args.rename {
        match prompter.rename(items) {
            Some(items) => items,
            None => return Ok(cancelled()),
        }
    } else {
        items
    };

    let Some(target) = resolve_target(&mut prompter, &mut config, &args.sync, args.yes) else {
        return Ok(cancelled());
    };
    if !prompter.confirm(&items) {
        return Ok(cancelled());
    }

    let sync = SyncTvClient::new(config.synctv_url.as_str(), config.timeout())?;
    match submit_items(&sync, &target, &items).await {
        Ok(count) => {
            report_outcome(&PipelineOutcome::Imported { count }, "");
            Ok(0)
        }
        Err(e) => Ok(report_error(&PipelineError::Sync(e))),
    }
}

/// Copy connection flags over the loaded configuration
fn apply_sync_args(config: &mut AppConfig, args: &SyncArgs) {
    if let Some(url) = &args.synctv_url {
        config.synctv_url = url.clone();
    }
    if let Some(room_id) = &args.room_id {
        config.room_id = room_id.clone();
    }
    if let Some(username) = &args.username {
        config.username = username.clone();
    }
    if let Some(password) = &args.password {
        config.password = password.clone();
    }
    if let Some(token) = &args.token {
        config.token = Some(token.clone());
    }
}

fn finish_config(config: &AppConfig, path: &Path, save: bool) -> Result<()> {
    config.validate().context("invalid settings")?;
    if save {
        config
            .save(path)
            .with_context(|| format!("failed to save {}", path.display()))?;
        println!("Settings saved to {}", path.display());
    }
    Ok(())
}

/// Fill in the room id and credentials, asking for whatever is missing
fn resolve_target<R: BufRead, W: Write>(
    prompter: &mut TerminalPrompter<R, W>,
    config: &mut AppConfig,
    args: &SyncArgs,
    assume_yes: bool,
) -> Option<SyncTarget> {
    if config.room_id.trim().is_empty() {
        config.room_id = prompter.ask_required("SyncTV room id")?;
    }

    let explicit = args.username.is_some() || args.password.is_some();
    let has_token = !config.token.as_deref().is_none_or(str::is_empty);
    if !has_token && !explicit && !assume_yes {
        config.username = prompter.ask_with_default("Username", &config.username)?;
        config.password = prompter.ask_with_default("Password", &config.password)?;
    }

    Some(config.sync_target(args.clear))
}

fn report_outcome(outcome: &PipelineOutcome, keyword: &str) {
    match outcome {
        PipelineOutcome::Imported { count } => println!("✓ Imported {count} episodes"),
        PipelineOutcome::NoResults => println!("No results for {keyword:?}"),
        PipelineOutcome::NoPlayableAddress => eprintln!("✗ No playable address for this title"),
        PipelineOutcome::Cancelled => println!("Cancelled"),
    }
}

fn report_error(error: &PipelineError) -> i32 {
    error!("{}", error);
    eprintln!("✗ {error}");
    error.exit_code()
}

fn cancelled() -> i32 {
    report_outcome(&PipelineOutcome::Cancelled, "");
    PipelineOutcome::Cancelled.exit_code()
}

fn exit_code(code: i32) -> ExitCode {
    u8::try_from(code).map_or(ExitCode::FAILURE, ExitCode::from)
}
