//! Rich diagnostic error types for craft-ledger.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes, help text, and source chains so users know exactly what
//! went wrong in their dataset and how to fix it.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for craft-ledger.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain (error codes, help text) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum CraftError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Recipe(#[from] RecipeError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Metric(#[from] MetricError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Report(#[from] ReportError),
}

// ---------------------------------------------------------------------------
// Catalog errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum CatalogError {
    #[error("duplicate product: \"{name}\" appears more than once in the catalog")]
    #[diagnostic(
        code(craft::catalog::duplicate_key),
        help(
            "Product names are unique keys. Remove or rename the repeated \
             row for \"{name}\" in the products table."
        )
    )]
    DuplicateKey { name: String },

    #[error("invalid product row \"{name}\": {message}")]
    #[diagnostic(
        code(craft::catalog::invalid_row),
        help(
            "Every product needs a non-empty name and source, and a finite, \
             non-negative duration."
        )
    )]
    InvalidRow { name: String, message: String },

    #[error("product not found: \"{name}\"")]
    #[diagnostic(
        code(craft::catalog::unknown_product),
        help("Add a row for \"{name}\" to the products table, or check the spelling.")
    )]
    UnknownProduct { name: String },
}

// ---------------------------------------------------------------------------
// Recipe errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum RecipeError {
    #[error("recipe for \"{product}\" references unknown ingredient \"{ingredient}\"")]
    #[diagnostic(
        code(craft::recipe::unknown_ingredient),
        help(
            "Every ingredient must exist in the products table. \
             Add a product row for \"{ingredient}\" or fix the recipe row."
        )
    )]
    UnknownIngredient { product: String, ingredient: String },

    #[error("recipe for \"{product}\" uses {quantity} x \"{ingredient}\": quantity must be positive")]
    #[diagnostic(
        code(craft::recipe::invalid_quantity),
        help("Recipe quantities are whole units consumed per unit built; use a value >= 1.")
    )]
    InvalidQuantity {
        product: String,
        ingredient: String,
        quantity: i64,
    },

    #[error("cyclic recipe: {}", path.join(" -> "))]
    #[diagnostic(
        code(craft::recipe::cyclic),
        help(
            "A product cannot (transitively) be an ingredient of itself. \
             Break the cycle by removing one of the recipe rows along this path."
        )
    )]
    CyclicRecipe { path: Vec<String> },

    #[error("flattening \"{product}\" exceeded maximum depth of {max_depth}")]
    #[diagnostic(
        code(craft::recipe::depth_exceeded),
        help(
            "The recipe tree is deeper than the configured limit. \
             Raise `max_depth` in the analysis config, or remove it."
        )
    )]
    DepthExceeded { product: String, max_depth: usize },

    #[error("quantity overflow while expanding \"{ingredient}\" under \"{product}\"")]
    #[diagnostic(
        code(craft::recipe::quantity_overflow),
        help("The scaled quantity does not fit in 64 bits. Check the recipe quantities.")
    )]
    QuantityOverflow { product: String, ingredient: String },

    #[error("total quantity of \"{ingredient}\" overflows")]
    #[diagnostic(
        code(craft::recipe::total_overflow),
        help("The summed requirement does not fit in 64 bits. Check the recipe quantities and targets.")
    )]
    TotalOverflow { ingredient: String },
}

// ---------------------------------------------------------------------------
// Metric errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum MetricError {
    #[error("unknown target product: \"{name}\"")]
    #[diagnostic(
        code(craft::metric::unknown_target),
        help("Factory demand targets must be listed in the catalog or have a recipe.")
    )]
    UnknownTarget { name: String },

    #[error("price overflow while pricing the recipe of \"{product}\"")]
    #[diagnostic(
        code(craft::metric::price_overflow),
        help("The summed ingredient price does not fit in 64 bits. Check prices and quantities.")
    )]
    PriceOverflow { product: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Recipe(#[from] RecipeError),
}

// ---------------------------------------------------------------------------
// Dataset errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum DatasetError {
    #[error("failed to read dataset: {path}")]
    #[diagnostic(code(craft::dataset::io), help("Ensure the file exists and is readable."))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse dataset {path}: {message}")]
    #[diagnostic(
        code(craft::dataset::parse),
        help(
            "A dataset holds `products` rows (name, price, duration, source) \
             and `recipes` rows (product_name, ingredient, quantity)."
        )
    )]
    Parse { path: String, message: String },

    #[error("unsupported dataset format: \"{extension}\"")]
    #[diagnostic(
        code(craft::dataset::unsupported_format),
        help("Supported dataset formats are .toml and .json.")
    )]
    UnsupportedFormat { extension: String },

    #[error("failed to serialize dataset {path}: {message}")]
    #[diagnostic(
        code(craft::dataset::serialize),
        help("The dataset could not be encoded in the format implied by the file extension.")
    )]
    Serialize { path: String, message: String },
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config: {path}")]
    #[diagnostic(code(craft::config::read), help("Ensure the config file exists and is readable."))]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {message}")]
    #[diagnostic(
        code(craft::config::parse),
        help("Check the TOML syntax. Unknown keys are rejected.")
    )]
    Parse { path: String, message: String },

    #[error("failed to serialize config {path}: {message}")]
    #[diagnostic(code(craft::config::serialize), help("This is a bug; please report it."))]
    Serialize { path: String, message: String },

    #[error("failed to write config: {path}")]
    #[diagnostic(
        code(craft::config::write),
        help("Check that the parent directory is writable.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Report errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ReportError {
    #[error("failed to serialize report: {message}")]
    #[diagnostic(code(craft::report::serialize), help("This is a bug; please report it."))]
    Serialize { message: String },

    #[error("failed to write report: {path}")]
    #[diagnostic(
        code(craft::report::write),
        help("Check that the output directory exists and is writable.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias for functions returning craft-ledger results.
pub type CraftResult<T> = std::result::Result<T, CraftError>;
