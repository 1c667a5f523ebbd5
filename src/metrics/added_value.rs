//! Added value: which product earns the most per unit of production time,
//! per sourcing channel.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::catalog::{Catalog, Product, Source};
use crate::error::MetricError;
use crate::recipe::RecipeGraph;
use crate::recipe::traverse::flatten_direct;

use super::{MetricOptions, MetricResult, retain_max};

/// A winning product of its sourcing channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddedValueRow {
    pub name: String,
    pub price: i64,
    pub duration: f64,
    pub source: Source,
    /// Price of one unit's direct ingredients.
    pub ingredients_price: i64,
    pub profit: i64,
    /// Profit per unit of duration.
    pub rate: f64,
}

/// Pick, per source, the manufactured product(s) with the highest profit rate.
///
/// Ingredients are priced from the direct recipe only; an intermediate is
/// charged at its own catalog price, not re-expanded. Factory-sourced products
/// never appear. A zero duration yields an infinite rate, or NaN when the
/// profit is also zero; NaN never wins. Rows are ordered by source, then name.
pub fn added_value(
    catalog: &Catalog,
    graph: &RecipeGraph,
    options: &MetricOptions,
) -> MetricResult<Vec<AddedValueRow>> {
    let mut by_source: BTreeMap<Source, Vec<AddedValueRow>> = BTreeMap::new();

    for product in catalog.iter() {
        if options.is_factory(&product.source) {
            continue;
        }
        if !graph.has_recipe(&product.name) {
            tracing::debug!(product = %product.name, "no recipe, skipping added value");
            continue;
        }
        let row = price_product(catalog, graph, product)?;
        by_source.entry(row.source.clone()).or_default().push(row);
    }

    let mut winners = Vec::new();
    for (source, rows) in by_source {
        let mut best = retain_max(rows, |r| r.rate);
        best.sort_by(|a, b| a.name.cmp(&b.name));
        tracing::debug!(%source, winners = best.len(), "added value per source");
        winners.extend(best);
    }
    Ok(winners)
}

fn price_product(
    catalog: &Catalog,
    graph: &RecipeGraph,
    product: &Product,
) -> MetricResult<AddedValueRow> {
    let overflow = || MetricError::PriceOverflow {
        product: product.name.clone(),
    };

    let mut ingredients_price: i64 = 0;
    for recipe in flatten_direct(graph, &product.name, 1)? {
        let ingredient = catalog.require(&recipe.ingredient_name)?;
        let cost = i64::try_from(recipe.quantity)
            .ok()
            .and_then(|q| ingredient.price.checked_mul(q))
            .ok_or_else(overflow)?;
        ingredients_price = ingredients_price.checked_add(cost).ok_or_else(overflow)?;
    }
    let profit = product
        .price
        .checked_sub(ingredients_price)
        .ok_or_else(overflow)?;

    Ok(AddedValueRow {
        name: product.name.clone(),
        price: product.price,
        duration: product.duration,
        source: product.source.clone(),
        ingredients_price,
        profit,
        rate: profit as f64 / product.duration,
    })
}
