//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use campusevents_core::{FilterCriteria, NewEvent, OutputFormat};

use crate::config::FilterSettings;

/// campusevents - Campus events from the terminal
#[derive(Debug, Parser)]
#[command(name = "campusevents")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "CAMPUSEVENTS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Maximum title length (truncated with ellipsis)
    #[arg(long, global = true)]
    pub max_title_length: Option<usize>,

    /// Base URL of the events API
    #[arg(long, env = "CAMPUSEVENTS_API_URL")]
    pub api_url: Option<String>,

    /// Use the built-in sample catalog instead of the events API
    #[arg(long)]
    pub demo: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Returns the output format based on CLI flags.
    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Tty
        }
    }
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List events (the default command)
    List(ListArgs),

    /// Show one event in full
    Show {
        /// Event id
        id: String,
    },

    /// Show the featured event
    Featured,

    /// Show upcoming events grouped by day
    Upcoming {
        /// Include events dated before today
        #[arg(long)]
        all: bool,
    },

    /// Create an event
    Create(CreateArgs),

    /// Register for an event and add it to your calendar
    Join {
        /// Event id
        id: String,

        /// Do not build a calendar link after joining
        #[arg(long)]
        no_calendar: bool,
    },

    /// Print the calendar link for an event
    CalendarLink {
        /// Event id
        id: String,

        /// Open the link in the default browser
        #[arg(long)]
        open: bool,
    },

    /// Browse student communities
    Communities {
        /// Search community names and descriptions
        #[arg(long, short)]
        search: Option<String>,

        /// Only show communities you joined
        #[arg(long)]
        mine: bool,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Filter flags for `list`.
///
/// Unset flags fall back to the `[filters]` section of the configuration.
#[derive(Debug, Clone, Default, Args)]
pub struct ListArgs {
    /// Search titles, descriptions, organizers, categories and locations
    #[arg(long, short)]
    pub search: Option<String>,

    /// Date tab: all, today, week or month
    #[arg(long, short)]
    pub tab: Option<String>,

    /// Category name, or "all"
    #[arg(long, short = 'C')]
    pub category: Option<String>,

    /// Sort order: newest, oldest or popular
    #[arg(long)]
    pub sort: Option<String>,

    /// Maximum number of events to display
    #[arg(long)]
    pub limit: Option<usize>,
}

impl ListArgs {
    /// Filter criteria from the flags, with `defaults` for unset ones.
    pub fn criteria(&self, defaults: &FilterSettings) -> FilterCriteria {
        FilterCriteria::from_raw(
            self.search.as_deref().unwrap_or(""),
            self.tab.as_deref().unwrap_or(&defaults.tab),
            self.category.as_deref().unwrap_or(&defaults.category),
            self.sort.as_deref().unwrap_or(&defaults.sort),
        )
    }
}

/// Fields of a new event.
#[derive(Debug, Clone, Args)]
pub struct CreateArgs {
    /// Event title
    #[arg(long)]
    pub title: String,

    /// Event description
    #[arg(long)]
    pub description: String,

    /// Date, e.g. "April 22, 2025"
    #[arg(long)]
    pub date: String,

    /// Time, e.g. "2:00 PM - 5:00 PM"
    #[arg(long)]
    pub time: String,

    /// Venue
    #[arg(long)]
    pub location: String,

    /// Organizing club or department
    #[arg(long)]
    pub organizer: String,

    /// Category, e.g. Workshop
    #[arg(long)]
    pub category: String,

    /// Cover image URL
    #[arg(long)]
    pub image_url: Option<String>,
}

impl From<CreateArgs> for NewEvent {
    fn from(args: CreateArgs) -> Self {
        NewEvent {
            title: args.title,
            description: args.description,
            date: args.date,
            time: args.time,
            location: args.location,
            organizer: args.organizer,
            category: args.category,
            image_url: args.image_url.filter(|u| !u.trim().is_empty()),
        }
    }
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Validate configuration
    Validate,

    /// Show configuration file path
    Path,
}
