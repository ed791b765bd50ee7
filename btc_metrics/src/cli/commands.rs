use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use super::params::parse_date;

#[derive(Parser)]
#[command(author, version, about = "Bitcoin network metrics, one chart-ready table per view")]
pub struct Cli {
    /// Path to the dashboard config file (TOML); built-in defaults otherwise
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// `.env` file loaded before `DATABASE_URL` is read
    #[arg(long, default_value = ".env")]
    pub env_file: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone, Default)]
pub struct RangeArgs {
    /// First day, inclusive (YYYY-MM-DD); defaults to `[range].start`
    #[arg(long, value_parser = parse_date)]
    pub start: Option<NaiveDate>,

    /// Last day, inclusive (YYYY-MM-DD); defaults to `[range].end`
    #[arg(long, value_parser = parse_date)]
    pub end: Option<NaiveDate>,

    /// A whole calendar year instead of --start/--end
    #[arg(long, conflicts_with_all = ["start", "end"])]
    pub year: Option<i32>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Write the frame to this file (.feather, .arrow, .ipc or .csv) instead of printing it
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Latest value of every headline metric in the range
    Summary {
        #[command(flatten)]
        range: RangeArgs,
    },

    /// Target vs. observed hash rate, long format
    HashRate {
        #[command(flatten)]
        range: RangeArgs,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Target hash rate implied by difficulty
    Target {
        #[command(flatten)]
        range: RangeArgs,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Mined volume adjusted for the fee share
    Fees {
        #[command(flatten)]
        range: RangeArgs,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// USD earned per PH/s per day
    HashPrice {
        #[command(flatten)]
        range: RangeArgs,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Difficulty change over 14-row windows, in percent
    Growth {
        #[command(flatten)]
        range: RangeArgs,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// A single column for the interactive chart (e.g. hash_rate_ph, difficulty_th)
    Column {
        /// Column to show
        #[arg(long)]
        name: String,
        #[command(flatten)]
        range: RangeArgs,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// The data table with a column selection
    Table {
        /// Comma-separated columns; defaults to `[table].columns`
        #[arg(long, value_delimiter = ',')]
        columns: Option<Vec<String>>,
        #[command(flatten)]
        range: RangeArgs,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// List the columns `column` and `table` accept
    Columns,
}

impl Commands {
    pub fn range(&self) -> Option<&RangeArgs> {
        match self {
            Commands::Summary { range }
            | Commands::HashRate { range, .. }
            | Commands::Target { range, .. }
            | Commands::Fees { range, .. }
            | Commands::HashPrice { range, .. }
            | Commands::Growth { range, .. }
            | Commands::Column { range, .. }
            | Commands::Table { range, .. } => Some(range),
            Commands::Columns => None,
        }
    }

    pub fn output(&self) -> Option<&OutputArgs> {
        match self {
            Commands::HashRate { output, .. }
            | Commands::Target { output, .. }
            | Commands::Fees { output, .. }
            | Commands::HashPrice { output, .. }
            | Commands::Growth { output, .. }
            | Commands::Column { output, .. }
            | Commands::Table { output, .. } => Some(output),
            Commands::Summary { .. } | Commands::Columns => None,
        }
    }
}
