// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # craft-ledger
//!
//! Analysis of a crafting economy: products built from recipes of other
//! products, and the economic metrics derived from that recipe graph.
//!
//! ## Architecture
//!
//! - **Catalog** (`catalog`): validated products keyed by name
//! - **Recipe graph** (`recipe`): petgraph arena of product → ingredient edges
//! - **Traversal** (`recipe::traverse`): quantity-propagating bill-of-materials flattening
//! - **Metrics** (`metrics`): added value, bottleneck, factory demand
//! - **Economy** (`economy`): facade owning one catalog and one graph
//!
//! ## Library usage
//!
//! ```no_run
//! use craft_ledger::dataset::Dataset;
//! use craft_ledger::economy::Economy;
//! use craft_ledger::metrics::MetricOptions;
//!
//! let dataset = Dataset::load(std::path::Path::new("economy.toml")).unwrap();
//! let economy = Economy::from_dataset(dataset, MetricOptions::default()).unwrap();
//! for row in economy.added_value().unwrap() {
//!     println!("{} earns {:.2} per unit of time", row.name, row.rate);
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod dataset;
pub mod economy;
pub mod error;
pub mod metrics;
pub mod recipe;
pub mod report;
