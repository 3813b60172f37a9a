use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use rollbook_core::SortOrder;

/// Rollbook — keep a roll of numbered, named and scored records in a flat
/// text file.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    /// Data file to read from and write back to. A missing file is treated
    /// as an empty roll.
    #[arg(
        long,
        short,
        global = true,
        default_value = "students.txt",
        env = "ROLLBOOK_FILE"
    )]
    pub file: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print every record.
    List {
        /// Order to print in. The file itself is not reordered.
        #[arg(long, value_enum)]
        sort: Option<SortArg>,

        /// Emit JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Print the record with the given roll number.
    Show { key: u32 },

    /// Add a new record.
    Add {
        #[arg(allow_negative_numbers = true)]
        key: i64,
        name: String,
        #[arg(allow_negative_numbers = true)]
        score: i64,
    },

    /// Change fields of an existing record. Omitted fields keep their value.
    Update {
        key: u32,

        /// New roll number.
        #[arg(long = "key", allow_negative_numbers = true)]
        new_key: Option<i64>,

        #[arg(long)]
        name: Option<String>,

        #[arg(long, allow_negative_numbers = true)]
        score: Option<i64>,
    },

    /// Delete the record with the given roll number.
    Remove { key: u32 },

    /// Print summary statistics.
    Stats {
        #[arg(long)]
        json: bool,
    },

    /// Reorder the records in the file.
    Sort {
        #[arg(value_enum)]
        order: SortArg,
    },

    /// Report lines of the file that would be skipped on load.
    ///
    /// Any command that changes the roll rewrites the whole file, and skipped
    /// lines are not written back. Run this first to see what would be lost.
    Check,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    ScoreAsc,
    ScoreDesc,
    Name,
}

impl From<SortArg> for SortOrder {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::ScoreAsc => Self::ScoreAscending,
            SortArg::ScoreDesc => Self::ScoreDescending,
            SortArg::Name => Self::NameAscending,
        }
    }
}
