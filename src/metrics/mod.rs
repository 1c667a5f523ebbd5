//! Derived economic metrics over the recipe graph.
//!
//! Each metric flattens recipes (directly or transitively), joins the
//! ingredients back against the [`Catalog`](crate::catalog::Catalog), and
//! reduces them to a table of uniform rows:
//!
//! - [`added_value`]: the most profitable product per sourcing channel
//! - [`bottleneck`]: the sourcing channel dominating each product's build time
//! - [`factory`]: bulk raw material needed for a set of target products
//!
//! The source label named by [`MetricOptions::factory_source`] marks bulk raw
//! material. It is left out of profit and bottleneck accounting and is the
//! only thing counted by factory demand.

pub mod added_value;
pub mod bottleneck;
pub mod factory;

use crate::catalog::Source;
use crate::error::MetricError;
use crate::recipe::traverse::FlattenOptions;

pub use added_value::{AddedValueRow, added_value};
pub use bottleneck::{BottleneckRow, bottleneck};
pub use factory::{FactoryDemandRow, factory_demand};

/// Result type for metric computations.
pub type MetricResult<T> = std::result::Result<T, MetricError>;

/// Knobs shared by all metrics.
#[derive(Debug, Clone)]
pub struct MetricOptions {
    /// Source label for bulk raw material.
    pub factory_source: String,
    /// Limits for transitive flattening.
    pub flatten: FlattenOptions,
}

impl Default for MetricOptions {
    fn default() -> Self {
        Self {
            factory_source: Source::FACTORY.into(),
            flatten: FlattenOptions::default(),
        }
    }
}

impl MetricOptions {
    pub(crate) fn is_factory(&self, source: &Source) -> bool {
        source.is(&self.factory_source)
    }
}

/// Keep the entries whose score equals the maximum score. Ties are all kept.
pub(crate) fn retain_max<T>(items: Vec<T>, score: impl Fn(&T) -> f64) -> Vec<T> {
    let max = items
        .iter()
        .map(&score)
        .fold(f64::NEG_INFINITY, f64::max);
    items.into_iter().filter(|item| score(item) == max).collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::recipe::RecipeGraph;
    use crate::recipe::tests::{product, recipe};

    /// A small bakery / furniture economy used across metric tests.
    pub(crate) fn sample_economy() -> (Catalog, RecipeGraph) {
        let catalog = Catalog::load(vec![
            product("sugar", 1, 0.0, "factory"),
            product("eggs", 2, 0.0, "factory"),
            product("flour", 1, 0.0, "factory"),
            product("wood", 5, 0.0, "factory"),
            product("batter", 12, 1.0, "bakery"),
            product("donuts", 40, 2.0, "bakery"),
            product("bread", 20, 1.0, "bakery"),
            product("plank", 15, 3.0, "mill"),
            product("couch", 200, 10.0, "furniture"),
            product("chair", 90, 4.0, "furniture"),
        ])
        .unwrap();
        let graph = RecipeGraph::build(
            vec![
                recipe("batter", "eggs", 1),
                recipe("batter", "flour", 2),
                recipe("donuts", "sugar", 2),
                recipe("donuts", "batter", 3),
                recipe("bread", "flour", 3),
                recipe("plank", "wood", 2),
                recipe("couch", "plank", 4),
                recipe("couch", "batter", 1),
                recipe("chair", "plank", 2),
            ],
            &catalog,
        )
        .unwrap();
        (catalog, graph)
    }

    #[test]
    fn retain_max_keeps_ties() {
        let kept = retain_max(vec![("a", 1.0), ("b", 3.0), ("c", 3.0)], |x| x.1);
        assert_eq!(kept, vec![("b", 3.0), ("c", 3.0)]);
    }

    #[test]
    fn retain_max_of_empty_is_empty() {
        let kept: Vec<f64> = retain_max(vec![], |x| *x);
        assert!(kept.is_empty());
    }

    #[test]
    fn default_options_use_factory_label() {
        let options = MetricOptions::default();
        assert!(options.is_factory(&Source::new("factory")));
        assert!(!options.is_factory(&Source::new("bakery")));
    }
}
