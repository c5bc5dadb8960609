//! CLI configuration

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;

use tally::{
    cart::MergePolicy,
    display::{DEFAULT_DISPLAY_RATE, DisplayCurrency, DisplayError},
    items::NewLineItem,
};

/// Tally cart CLI configuration
#[derive(Debug, Parser)]
#[command(name = "tally", about = "Inspect and edit a persisted shopping cart", long_about = None)]
pub(crate) struct Config {
    /// Snapshot storage settings.
    #[command(flatten)]
    pub store: StoreConfig,

    /// Cart behaviour and presentation settings.
    #[command(flatten)]
    pub cart: CartConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Operation to run against the cart.
    #[command(subcommand)]
    pub command: Command,
}

impl Config {
    /// Load configuration from `.env`, the environment and CLI arguments.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub(crate) fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}

/// Snapshot storage settings.
#[derive(Debug, Args)]
pub(crate) struct StoreConfig {
    /// Directory holding cart snapshots
    #[arg(long, env = "TALLY_STORE_DIR", default_value = ".tally")]
    pub store_dir: PathBuf,

    /// Name of the cart within the store directory
    #[arg(long, env = "TALLY_CART_KEY", default_value = "cart")]
    pub cart_key: String,
}

/// How repeated adds treat the newer candidate.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum MergePolicyArg {
    /// Keep the first-seen name and price, only bump the quantity.
    KeepFirst,

    /// Overwrite name and price with the newest add.
    Refresh,
}

impl From<MergePolicyArg> for MergePolicy {
    fn from(value: MergePolicyArg) -> Self {
        match value {
            MergePolicyArg::KeepFirst => MergePolicy::KeepFirst,
            MergePolicyArg::Refresh => MergePolicy::Refresh,
        }
    }
}

/// Cart behaviour and presentation settings.
#[derive(Debug, Args)]
pub(crate) struct CartConfig {
    /// Merge policy for repeated adds (keep-first, refresh)
    #[arg(
        long,
        env = "TALLY_MERGE_POLICY",
        value_enum,
        default_value_t = MergePolicyArg::KeepFirst
    )]
    pub merge_policy: MergePolicyArg,

    /// ISO code of the currency totals are displayed in
    #[arg(long, env = "TALLY_DISPLAY_CURRENCY", default_value = "IDR")]
    pub display_currency: String,

    /// Multiplier from base prices to the display currency
    #[arg(long, env = "TALLY_DISPLAY_RATE", default_value_t = DEFAULT_DISPLAY_RATE)]
    pub display_rate: Decimal,
}

impl CartConfig {
    /// Resolve the configured display currency.
    pub(crate) fn display(&self) -> Result<DisplayCurrency, DisplayError> {
        DisplayCurrency::from_code(&self.display_currency, self.display_rate)
    }
}

/// Log output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub(crate) struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Cart operations.
#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Show the cart
    Show,

    /// Add one unit of a product variant
    Add(AddArgs),

    /// Remove a line
    Remove {
        /// Line id, `<product>-<variant>` or the bare product id
        id: String,
    },

    /// Set a line's quantity; zero or below removes it
    SetQuantity {
        /// Line id, `<product>-<variant>` or the bare product id
        id: String,

        /// New absolute quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },

    /// Empty the cart
    Clear,

    /// Complete checkout and empty the cart
    Checkout,
}

/// Arguments for adding a product variant.
#[derive(Debug, Args)]
pub(crate) struct AddArgs {
    /// Product id
    #[arg(long)]
    pub product: String,

    /// Display name
    #[arg(long)]
    pub name: String,

    /// Unit price in the base currency
    #[arg(long)]
    pub price: Decimal,

    /// Variant label, e.g. a size
    #[arg(long)]
    pub variant: Option<String>,

    /// Pre-discount reference price
    #[arg(long)]
    pub original_price: Option<Decimal>,

    /// Display category
    #[arg(long, default_value = "")]
    pub category: String,

    /// Image reference
    #[arg(long, default_value = "")]
    pub image: String,
}

impl From<AddArgs> for NewLineItem {
    fn from(args: AddArgs) -> Self {
        let mut item = NewLineItem::new(args.product, args.name, args.price)
            .with_category(args.category)
            .with_image(args.image);

        item.variant = args.variant;
        item.original_unit_price = args.original_price;

        item
    }
}
