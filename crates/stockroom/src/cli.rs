//! Clap derive structures for the `stockroom` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Compiled standalone by build.rs for man pages, so nothing here may
//! reference the core crates.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// stockroom -- inventory administration from the terminal
#[derive(Debug, Parser)]
#[command(
    name = "stockroom",
    version,
    about = "Manage products, suppliers, and stock movements from the command line",
    long_about = "Administer an inventory backend: products, suppliers, stock\n\
        movements, and reports. Every command opens a session with the\n\
        configured credentials, runs, and logs out again.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend profile to use
    #[arg(long, short = 'p', env = "STOCKROOM_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend URL (overrides profile)
    #[arg(long, short = 'S', env = "STOCKROOM_SERVER", global = true)]
    pub server: Option<String>,

    /// Login email (overrides profile)
    #[arg(long, short = 'e', env = "STOCKROOM_EMAIL", global = true)]
    pub email: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "STOCKROOM_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "STOCKROOM_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "STOCKROOM_TIMEOUT", default_value = "30", global = true)]
    pub timeout: u64,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Domain value enums ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RoleArg {
    Admin,
    Staff,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MovementArg {
    /// Stock received
    In,
    /// Stock issued
    Out,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the logged-in account
    Whoami,

    /// Register a new account; `--email` names it, the password is prompted
    Register(RegisterArgs),

    /// Register the demo admin and staff accounts
    SeedDemo,

    /// Inventory overview: totals, low stock, recent movements
    #[command(alias = "dash")]
    Dashboard,

    /// Manage products
    #[command(alias = "prod", alias = "p")]
    Products(ProductsArgs),

    /// Manage suppliers
    #[command(alias = "sup")]
    Suppliers(SuppliersArgs),

    /// Inventory movement logs and stock updates
    #[command(alias = "log")]
    Logs(LogsArgs),

    /// Valuation and movement reports (administrators only)
    Reports(ReportsArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared List Arguments ────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Case-insensitive substring filter
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Let the server do the search instead of filtering locally
    #[arg(long, requires = "search")]
    pub remote: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ACCOUNTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// Display name
    #[arg(long, required = true)]
    pub name: String,

    /// Account role
    #[arg(long, default_value = "staff")]
    pub role: RoleArg,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PRODUCTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ProductsArgs {
    #[command(subcommand)]
    pub command: ProductsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProductsCommand {
    /// List products
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        filter: SearchArgs,

        /// Only products at or below their reorder level
        #[arg(long)]
        low_stock: bool,
    },

    /// Show one product
    Get {
        /// Product ID
        id: i64,
    },

    /// Create a product
    Create(ProductFields),

    /// Update a product (only the given fields change)
    Update {
        /// Product ID
        id: i64,

        #[command(flatten)]
        fields: ProductFields,
    },

    /// Delete a product
    #[command(alias = "rm")]
    Delete {
        /// Product ID
        id: i64,
    },
}

#[derive(Debug, Args)]
pub struct ProductFields {
    /// Product name
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    /// Supplier ID
    #[arg(long, conflicts_with = "no_supplier")]
    pub supplier: Option<i64>,

    /// Clear the supplier
    #[arg(long)]
    pub no_supplier: bool,

    /// Units on hand
    #[arg(long)]
    pub quantity: Option<i32>,

    /// Unit price (decimal, e.g. 12.50)
    #[arg(long)]
    pub price: Option<String>,

    /// Warehouse location
    #[arg(long)]
    pub location: Option<String>,

    /// Low-stock threshold
    #[arg(long)]
    pub reorder_level: Option<i32>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SUPPLIERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SuppliersArgs {
    #[command(subcommand)]
    pub command: SuppliersCommand,
}

#[derive(Debug, Subcommand)]
pub enum SuppliersCommand {
    /// List suppliers
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        filter: SearchArgs,
    },

    /// Show one supplier
    Get {
        /// Supplier ID
        id: i64,
    },

    /// Create a supplier
    Create(SupplierFields),

    /// Update a supplier (only the given fields change)
    Update {
        /// Supplier ID
        id: i64,

        #[command(flatten)]
        fields: SupplierFields,
    },

    /// Delete a supplier
    #[command(alias = "rm")]
    Delete {
        /// Supplier ID
        id: i64,
    },
}

#[derive(Debug, Args)]
pub struct SupplierFields {
    /// Supplier name
    #[arg(long)]
    pub name: Option<String>,

    /// Contact person or phone
    #[arg(long)]
    pub contact: Option<String>,

    /// Supplier email
    #[arg(long = "supplier-email")]
    pub supplier_email: Option<String>,

    #[arg(long)]
    pub address: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  INVENTORY LOGS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LogsArgs {
    #[command(subcommand)]
    pub command: LogsCommand,
}

#[derive(Debug, Subcommand)]
pub enum LogsCommand {
    /// List stock movements, newest first
    #[command(alias = "ls")]
    List {
        /// Case-insensitive filter on product, type, and notes
        #[arg(long, short = 's')]
        search: Option<String>,
    },

    /// Record a stock movement and adjust the product's quantity
    Stock {
        /// Product ID
        product_id: i64,

        /// Direction of the movement
        #[arg(long = "type", short = 't', value_name = "TYPE")]
        movement: MovementArg,

        /// Units moved (positive)
        #[arg(long, short = 'n')]
        quantity: i32,

        /// Free-text note
        #[arg(long)]
        notes: Option<String>,
    },

    /// Append a log entry without changing the product's quantity
    Record {
        /// Product ID
        product_id: i64,

        /// Direction of the movement
        #[arg(long = "type", short = 't', value_name = "TYPE")]
        movement: MovementArg,

        /// Units moved (positive)
        #[arg(long, short = 'n')]
        quantity: i32,

        /// Free-text note
        #[arg(long)]
        notes: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  REPORTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ReportsArgs {
    #[command(subcommand)]
    pub command: ReportsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ReportsCommand {
    /// Stock valuation, turnover, fast and slow movers
    Show,

    /// Download the movement log as CSV
    Export {
        /// Write to this file instead of stdout
        #[arg(long, short = 'f')]
        file: Option<PathBuf>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Set a value on the active profile
    Set {
        /// Profile key (server, email, password_env, insecure, timeout, ca_cert)
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a password in the system keyring
    SetPassword {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
