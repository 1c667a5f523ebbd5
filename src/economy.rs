//! Economy facade: top-level API for craft-ledger.
//!
//! An `Economy` owns one catalog and one recipe graph for its whole lifetime.
//! Callers build it once and pass it around; every query reuses the same
//! catalog instead of reloading it.

use std::collections::BTreeMap;

use crate::catalog::{Catalog, ProductRow};
use crate::dataset::Dataset;
use crate::error::{CatalogError, CraftResult, RecipeError};
use crate::metrics::{self, AddedValueRow, BottleneckRow, FactoryDemandRow, MetricOptions};
use crate::recipe::traverse::{flatten_with, total_requirements};
use crate::recipe::{Recipe, RecipeGraph, RecipeRow};

/// A loaded, validated crafting economy.
#[derive(Debug)]
pub struct Economy {
    catalog: Catalog,
    graph: RecipeGraph,
    options: MetricOptions,
}

impl Economy {
    /// Wrap an existing catalog and graph. Fails if the graph has a cycle.
    pub fn new(catalog: Catalog, graph: RecipeGraph, options: MetricOptions) -> CraftResult<Self> {
        if let Some(path) = graph.find_cycle() {
            return Err(RecipeError::CyclicRecipe { path }.into());
        }
        tracing::info!(
            products = catalog.len(),
            manufactured = graph.product_count(),
            factory_source = %options.factory_source,
            "economy ready"
        );
        Ok(Self {
            catalog,
            graph,
            options,
        })
    }

    /// Load the catalog, build the recipe graph, and validate it.
    pub fn from_rows(
        products: impl IntoIterator<Item = ProductRow>,
        recipes: impl IntoIterator<Item = RecipeRow>,
        options: MetricOptions,
    ) -> CraftResult<Self> {
        let catalog = Catalog::load(products)?;
        let graph = RecipeGraph::build(recipes, &catalog)?;
        Self::new(catalog, graph, options)
    }

    pub fn from_dataset(dataset: Dataset, options: MetricOptions) -> CraftResult<Self> {
        Self::from_rows(dataset.products, dataset.recipes, options)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn graph(&self) -> &RecipeGraph {
        &self.graph
    }

    pub fn options(&self) -> &MetricOptions {
        &self.options
    }

    /// Full bill of materials of one unit of `product`, in pre-order.
    pub fn flatten(&self, product: &str) -> CraftResult<Vec<Recipe>> {
        self.catalog_or_graph(product)?;
        Ok(flatten_with(&self.graph, product, 1, &self.options.flatten)?)
    }

    /// Bill of materials of one unit of `product`, summed per ingredient.
    pub fn requirements(&self, product: &str) -> CraftResult<BTreeMap<String, u64>> {
        Ok(total_requirements(&self.flatten(product)?)?)
    }

    pub fn added_value(&self) -> CraftResult<Vec<AddedValueRow>> {
        Ok(metrics::added_value(&self.catalog, &self.graph, &self.options)?)
    }

    pub fn bottleneck(&self) -> CraftResult<Vec<BottleneckRow>> {
        Ok(metrics::bottleneck(&self.catalog, &self.graph, &self.options)?)
    }

    pub fn factory_demand<S: AsRef<str>>(&self, targets: &[S]) -> CraftResult<Vec<FactoryDemandRow>> {
        Ok(metrics::factory_demand(
            &self.catalog,
            &self.graph,
            targets,
            &self.options,
        )?)
    }

    /// Summary statistics.
    pub fn info(&self) -> EconomyInfo {
        let factory_products = self
            .catalog
            .iter()
            .filter(|p| p.source.is(&self.options.factory_source))
            .count();
        EconomyInfo {
            product_count: self.catalog.len(),
            manufactured_count: self.graph.product_count(),
            recipe_edges: self.graph.edge_count(),
            factory_products,
            factory_source: self.options.factory_source.clone(),
        }
    }

    fn catalog_or_graph(&self, product: &str) -> CraftResult<()> {
        if self.catalog.contains(product) || self.graph.contains(product) {
            Ok(())
        } else {
            Err(CatalogError::UnknownProduct {
                name: product.into(),
            }
            .into())
        }
    }
}

/// Summary of a loaded economy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EconomyInfo {
    pub product_count: usize,
    pub manufactured_count: usize,
    pub recipe_edges: usize,
    pub factory_products: usize,
    pub factory_source: String,
}

impl std::fmt::Display for EconomyInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "craft-ledger economy")?;
        writeln!(f, "  products:      {}", self.product_count)?;
        writeln!(f, "  manufactured:  {}", self.manufactured_count)?;
        writeln!(f, "  recipe edges:  {}", self.recipe_edges)?;
        writeln!(
            f,
            "  raw ({}): {}",
            self.factory_source, self.factory_products
        )?;
        Ok(())
    }
}
