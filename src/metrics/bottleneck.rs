//! Bottleneck: the sourcing channel that accounts for most of the processing
//! time inside a product's full ingredient tree.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::catalog::{Catalog, Source};
use crate::recipe::RecipeGraph;
use crate::recipe::traverse::flatten_with;

use super::{MetricOptions, MetricResult, retain_max};

/// The dominant source of one manufactured product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BottleneckRow {
    pub product_name: String,
    pub source: Source,
    /// Sum of `quantity * duration` over the product's ingredients from `source`.
    pub scaled_duration: f64,
    /// The product's own sale price, if it is in the catalog.
    pub sell_price: Option<i64>,
}

/// For each manufactured product, find the source(s) with the largest total
/// scaled duration over the transitive bill of materials.
///
/// Factory-sourced ingredients are ignored. A product whose ingredients are all
/// factory-sourced yields no row. Rows are ordered by product, then source.
pub fn bottleneck(
    catalog: &Catalog,
    graph: &RecipeGraph,
    options: &MetricOptions,
) -> MetricResult<Vec<BottleneckRow>> {
    let mut rows = Vec::new();

    for product_name in graph.manufactured() {
        let mut per_source: BTreeMap<Source, f64> = BTreeMap::new();
        for recipe in flatten_with(graph, product_name, 1, &options.flatten)? {
            let ingredient = catalog.require(&recipe.ingredient_name)?;
            if options.is_factory(&ingredient.source) {
                continue;
            }
            *per_source.entry(ingredient.source.clone()).or_default() +=
                recipe.quantity as f64 * ingredient.duration;
        }
        if per_source.is_empty() {
            continue;
        }

        let sell_price = catalog.get(product_name).map(|p| p.price);
        let candidates: Vec<(Source, f64)> = per_source.into_iter().collect();
        for (source, scaled_duration) in retain_max(candidates, |c| c.1) {
            tracing::debug!(product = product_name, %source, scaled_duration, "bottleneck");
            rows.push(BottleneckRow {
                product_name: product_name.to_owned(),
                source,
                scaled_duration,
                sell_price,
            });
        }
    }

    rows.sort_by(|a, b| {
        a.product_name
            .cmp(&b.product_name)
            .then_with(|| a.source.cmp(&b.source))
    });
    Ok(rows)
}
