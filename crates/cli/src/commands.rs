use clap::{Args, Subcommand};
use engine_core::export::DEFAULT_PREVIEW_LIMIT;
use engine_processing::{browse::DEFAULT_FILE_PREVIEW_LIMIT, loader::DEFAULT_BATCH_SIZE};
use std::path::PathBuf;

/// Connection flags shared by every command that talks to ClickHouse. Unset
/// flags fall back to the `CLICKHOUSE_*` environment variables.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnArgs {
    #[arg(long, help = "ClickHouse host name")]
    pub host: Option<String>,

    #[arg(long, help = "HTTP port (default 8123, or 8443 for https)")]
    pub port: Option<u16>,

    #[arg(long, help = "http or https")]
    pub protocol: Option<String>,

    #[arg(long, help = "Database to work in")]
    pub database: Option<String>,

    #[arg(long)]
    pub user: Option<String>,

    #[arg(long)]
    pub password: Option<String>,

    /// Bearer token; takes precedence over user and password
    #[arg(long)]
    pub jwt: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check that the warehouse answers `SELECT 1`
    Connect {
        #[command(flatten)]
        conn: ConnArgs,
    },
    /// List the tables of the database
    Tables {
        #[command(flatten)]
        conn: ConnArgs,
    },
    /// List the columns of a table
    Columns {
        #[command(flatten)]
        conn: ConnArgs,

        #[arg(long)]
        table: String,
    },
    /// Run a statement as written and print the rows it returns
    Query {
        #[command(flatten)]
        conn: ConnArgs,

        #[arg(long)]
        sql: String,
    },
    /// Show the first rows of a table
    Preview {
        #[command(flatten)]
        conn: ConnArgs,

        #[arg(long)]
        table: String,

        #[arg(long = "column", required = true, help = "Column to show; repeat for more")]
        columns: Vec<String>,

        #[arg(long, default_value_t = DEFAULT_PREVIEW_LIMIT)]
        limit: u64,
    },
    /// Export selected columns of a table to CSV
    Export {
        #[command(flatten)]
        conn: ConnArgs,

        #[arg(long)]
        table: String,

        #[arg(long = "column", required = true, help = "Column to export; repeat for more")]
        columns: Vec<String>,

        #[arg(long)]
        limit: Option<u64>,

        #[arg(long, help = "Output file; defaults to a new file in the export directory")]
        output: Option<PathBuf>,

        #[arg(long, default_value = ",")]
        delimiter: String,
    },
    /// Export the left join of several tables to CSV
    JoinExport {
        #[command(flatten)]
        conn: ConnArgs,

        #[arg(long = "table", required = true, help = "Table to join; the first one anchors the join")]
        tables: Vec<String>,

        #[arg(
            long = "condition",
            help = "Join condition for the next table, e.g. 'a.id = b.a_id'; an empty value skips that table"
        )]
        conditions: Vec<String>,

        #[arg(long = "column", required = true, help = "Column to export; repeat for more")]
        columns: Vec<String>,

        #[arg(long)]
        limit: Option<u64>,

        #[arg(long)]
        output: Option<PathBuf>,

        #[arg(long, default_value = ",")]
        delimiter: String,
    },
    /// List the header of a CSV file
    FileColumns {
        #[arg(long)]
        file: PathBuf,

        #[arg(long, default_value = ",")]
        delimiter: String,
    },
    /// Show the first rows of a CSV file
    FilePreview {
        #[arg(long)]
        file: PathBuf,

        #[arg(long, default_value = ",")]
        delimiter: String,

        #[arg(long, default_value_t = DEFAULT_FILE_PREVIEW_LIMIT)]
        limit: usize,
    },
    /// Load selected CSV columns into a table
    Import {
        #[command(flatten)]
        conn: ConnArgs,

        #[arg(long)]
        file: PathBuf,

        #[arg(long)]
        table: String,

        #[arg(long = "column", required = true, help = "CSV column to import; repeat for more")]
        columns: Vec<String>,

        #[arg(long, help = "Create the table from the inferred schema if it does not exist")]
        create_table: bool,

        #[arg(long, default_value = ",")]
        delimiter: String,

        #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
        batch_size: usize,
    },
    /// Copy a local file into the upload directory
    Upload {
        #[arg(long)]
        file: PathBuf,
    },
}
