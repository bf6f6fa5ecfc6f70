//! campusevents CLI entry point.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing::warn;

use campusevents_api::{EventsApi, InMemoryEventsApi};
use campusevents_core::{CommunityTab, OutputFormatter, TracingConfig, init_tracing};

use campusevents_client::actions::{Notice, Notifier};
use campusevents_client::cli::{Cli, Command, ConfigAction, ListArgs};
use campusevents_client::commands::{self, Context};
use campusevents_client::config::ClientConfig;
use campusevents_client::error::{ClientError, ClientResult};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let tracing_config = if cli.debug {
        TracingConfig::cli_debug()
    } else {
        TracingConfig::cli()
    };
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("warning: {}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ClientResult<()> {
    let config_path = cli.config.clone().unwrap_or_else(ClientConfig::default_path);
    let config = match cli.config {
        Some(ref path) => ClientConfig::load_from(path).map_err(ClientError::Config)?,
        None => ClientConfig::load().unwrap_or_else(|e| {
            warn!(error = %e, "ignoring unreadable config");
            ClientConfig::default()
        }),
    };

    let mut out = io::stdout();

    // Config commands work without an events backend.
    if let Some(Command::Config { ref action }) = cli.command {
        return match action {
            ConfigAction::Dump => commands::config::dump(&config, &config_path, &mut out),
            ConfigAction::Validate => commands::config::validate(&config, &mut out),
            ConfigAction::Path => commands::config::path(&config_path, &mut out),
        };
    }

    let api = events_api(&cli, &config)?;
    let mut options = config.format_options();
    if cli.max_title_length.is_some() {
        options.max_title_length = cli.max_title_length;
    }
    let notifier = Notifier::new(&config.notifications);
    let ctx = Context::new(api.as_ref(), chrono::Local::now().date_naive())
        .with_formatter(OutputFormatter::new(options))
        .with_format(cli.output_format())
        .with_notifier(notifier.clone());

    let result = dispatch(&ctx, &config, cli.command, &mut out).await;
    if let Err(ref e @ ClientError::Fetch(_)) = result {
        notifier.send_desktop(&Notice::from_error(e));
    }
    result
}

async fn dispatch(
    ctx: &Context<'_>,
    config: &ClientConfig,
    command: Option<Command>,
    out: &mut dyn io::Write,
) -> ClientResult<()> {
    match command.unwrap_or(Command::List(ListArgs::default())) {
        Command::List(args) => {
            let criteria = args.criteria(&config.filters);
            commands::events::list(ctx, criteria, args.limit, out).await
        }
        Command::Show { id } => commands::events::show(ctx, &id, out).await,
        Command::Featured => commands::events::featured(ctx, out).await,
        Command::Upcoming { all } => commands::events::upcoming(ctx, all, out).await,
        Command::Create(args) => commands::events::create(ctx, args.into(), out).await,
        Command::Join { id, no_calendar } => {
            let builder = config.calendar_builder();
            let calendar = (!no_calendar).then_some((&builder, config.calendar.open_in_browser));
            commands::events::join(ctx, &id, calendar, out).await
        }
        Command::CalendarLink { id, open } => {
            let builder = config.calendar_builder();
            commands::events::calendar_link(ctx, &id, &builder, open, out).await
        }
        Command::Communities { search, mine } => {
            let tab = if mine { CommunityTab::Mine } else { CommunityTab::All };
            let directory = config.community_directory();
            commands::communities::list(ctx, &directory, search.as_deref().unwrap_or(""), tab, out)
        }
        Command::Config { .. } => Ok(()),
    }
}

/// Picks the events backend: the sample catalog in demo mode, HTTP otherwise.
fn events_api(cli: &Cli, config: &ClientConfig) -> ClientResult<Box<dyn EventsApi>> {
    if cli.demo || config.api.demo {
        return Ok(Box::new(InMemoryEventsApi::with_samples()));
    }
    http_api(cli.api_url.as_deref(), config)
}

#[cfg(feature = "http")]
fn http_api(api_url: Option<&str>, config: &ClientConfig) -> ClientResult<Box<dyn EventsApi>> {
    let api_config = config.api_config(api_url)?;
    Ok(Box::new(campusevents_api::HttpEventsApi::new(api_config)?))
}

#[cfg(not(feature = "http"))]
fn http_api(_api_url: Option<&str>, _config: &ClientConfig) -> ClientResult<Box<dyn EventsApi>> {
    Err(ClientError::Config(
        "built without HTTP support, use --demo".to_string(),
    ))
}
