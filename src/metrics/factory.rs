//! Factory demand: bulk raw material needed to build a set of target products.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::catalog::Catalog;
use crate::error::MetricError;
use crate::recipe::RecipeGraph;
use crate::recipe::traverse::{add_requirement, flatten_with};

use super::{MetricOptions, MetricResult};

/// Total units of one factory-sourced material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FactoryDemandRow {
    pub ingredient_name: String,
    pub quantity: u64,
}

/// Sum the factory-sourced ingredients of every target's full bill of materials.
///
/// Each target counts once per occurrence in `targets`. A target must be in the
/// catalog or have a recipe; a target without a recipe contributes nothing.
/// Rows are ordered by ingredient name.
pub fn factory_demand<S: AsRef<str>>(
    catalog: &Catalog,
    graph: &RecipeGraph,
    targets: &[S],
    options: &MetricOptions,
) -> MetricResult<Vec<FactoryDemandRow>> {
    let mut totals: BTreeMap<String, u64> = BTreeMap::new();

    for target in targets {
        let target: &str = target.as_ref();
        if !catalog.contains(target) && !graph.contains(target) {
            return Err(MetricError::UnknownTarget {
                name: target.to_owned(),
            });
        }
        for recipe in flatten_with(graph, target, 1, &options.flatten)? {
            let ingredient = catalog.require(&recipe.ingredient_name)?;
            if !options.is_factory(&ingredient.source) {
                continue;
            }
            add_requirement(&mut totals, recipe)?;
        }
    }

    tracing::debug!(
        targets = targets.len(),
        materials = totals.len(),
        "factory demand computed"
    );
    Ok(totals
        .into_iter()
        .map(|(ingredient_name, quantity)| FactoryDemandRow {
            ingredient_name,
            quantity,
        })
        .collect())
}
