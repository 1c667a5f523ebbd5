//! Recipe graph: which products are built from which ingredients, and how many.
//!
//! Rows enter as [`RecipeRow`], are resolved against the [`Catalog`] into
//! [`RecipeEntry`] values, and are stored in a [`RecipeGraph`]:
//!
//! - **Arena**: a `petgraph` [`DiGraph`] with one node per product name and one
//!   edge per recipe row, weighted by quantity
//! - **Name index**: product name → [`NodeIndex`] for O(1) lookups
//!
//! Edge order per product follows row order, and repeated ingredients are kept
//! as separate edges.

pub mod traverse;

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, EdgeReference, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Product};
use crate::error::RecipeError;

/// Result type for recipe operations.
pub type RecipeResult<T> = std::result::Result<T, RecipeError>;

/// A recipes-table row as it arrives from a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeRow {
    pub product_name: String,
    pub ingredient: String,
    pub quantity: i64,
}

/// A recipe row with its ingredient resolved against the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeEntry {
    /// The product being built.
    pub product_name: String,
    pub ingredient: Product,
    /// Units of `ingredient` consumed per unit of `product_name`.
    pub quantity: u32,
}

impl RecipeEntry {
    pub fn from_row(row: RecipeRow, catalog: &Catalog) -> RecipeResult<Self> {
        let ingredient = catalog
            .get(&row.ingredient)
            .ok_or_else(|| RecipeError::UnknownIngredient {
                product: row.product_name.clone(),
                ingredient: row.ingredient.clone(),
            })?
            .clone();
        let quantity = u32::try_from(row.quantity)
            .ok()
            .filter(|&q| q > 0)
            .ok_or_else(|| RecipeError::InvalidQuantity {
                product: row.product_name.clone(),
                ingredient: row.ingredient.clone(),
                quantity: row.quantity,
            })?;
        Ok(Self {
            product_name: row.product_name,
            ingredient,
            quantity,
        })
    }
}

/// An edge of the recipe graph, or one element of a flattened bill of materials.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Recipe {
    pub ingredient_name: String,
    pub quantity: u64,
}

impl Recipe {
    pub fn new(ingredient_name: impl Into<String>, quantity: u64) -> Self {
        Self {
            ingredient_name: ingredient_name.into(),
            quantity,
        }
    }
}

/// Directed recipe graph: product → ingredients, weighted by quantity.
#[derive(Debug, Clone, Default)]
pub struct RecipeGraph {
    graph: DiGraph<String, u32>,
    node_index: HashMap<String, NodeIndex>,
    /// Products with at least one recipe edge, in first-appearance order.
    manufactured: Vec<NodeIndex>,
}

impl RecipeGraph {
    /// Build the graph from raw recipe rows.
    ///
    /// Every ingredient must be in the catalog and every quantity positive.
    pub fn build(
        rows: impl IntoIterator<Item = RecipeRow>,
        catalog: &Catalog,
    ) -> RecipeResult<Self> {
        let mut graph = Self::default();
        for row in rows {
            let entry = RecipeEntry::from_row(row, catalog)?;
            graph.insert(&entry);
        }
        tracing::info!(
            products = graph.manufactured.len(),
            edges = graph.edge_count(),
            "recipe graph built"
        );
        Ok(graph)
    }

    fn ensure_node(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.node_index.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(name.to_owned());
        self.node_index.insert(name.to_owned(), idx);
        idx
    }

    fn insert(&mut self, entry: &RecipeEntry) {
        let product = self.ensure_node(&entry.product_name);
        let ingredient = self.ensure_node(&entry.ingredient.name);
        if !self.has_edges(product) {
            self.manufactured.push(product);
        }
        self.graph.add_edge(product, ingredient, entry.quantity);
    }

    fn has_edges(&self, node: NodeIndex) -> bool {
        self.graph
            .edges_directed(node, Direction::Outgoing)
            .next()
            .is_some()
    }

    /// Outgoing edges of a node in insertion (row) order.
    ///
    /// petgraph hands out edge indices sequentially and walks adjacency lists
    /// newest-first, so sorting by edge index restores row order.
    pub(crate) fn edges_of(&self, node: NodeIndex) -> Vec<EdgeReference<'_, u32>> {
        let mut edges: Vec<_> = self
            .graph
            .edges_directed(node, Direction::Outgoing)
            .collect();
        edges.sort_by_key(|e| e.id());
        edges
    }

    pub(crate) fn node(&self, name: &str) -> Option<NodeIndex> {
        self.node_index.get(name).copied()
    }

    pub(crate) fn name(&self, node: NodeIndex) -> &str {
        &self.graph[node]
    }

    /// Direct recipe of a product, in row order. Empty for raw materials.
    pub fn recipes_of(&self, product: &str) -> Vec<Recipe> {
        let Some(node) = self.node(product) else {
            return vec![];
        };
        self.edges_of(node)
            .into_iter()
            .map(|e| Recipe::new(self.name(e.target()), u64::from(*e.weight())))
            .collect()
    }

    /// Whether the product is built from other products.
    pub fn has_recipe(&self, product: &str) -> bool {
        self.node(product).is_some_and(|n| self.has_edges(n))
    }

    /// Whether the product appears anywhere in the graph.
    pub fn contains(&self, product: &str) -> bool {
        self.node_index.contains_key(product)
    }

    /// Products that have a recipe, in first-appearance order.
    pub fn manufactured(&self) -> impl Iterator<Item = &str> {
        self.manufactured.iter().map(|&n| self.name(n))
    }

    /// Number of products that have a recipe.
    pub fn product_count(&self) -> usize {
        self.manufactured.len()
    }

    /// Number of recipe edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Find one cycle in the graph, if there is any.
    ///
    /// The returned path starts and ends with the same product.
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        for node in self.graph.node_indices() {
            if self.graph.find_edge(node, node).is_some() {
                let name = self.name(node).to_owned();
                return Some(vec![name.clone(), name]);
            }
        }
        let component = tarjan_scc(&self.graph)
            .into_iter()
            .find(|scc| scc.len() > 1)?;
        Some(self.cycle_within(&component))
    }

    /// Walk edges that stay inside a strongly connected component until a node repeats.
    fn cycle_within(&self, component: &[NodeIndex]) -> Vec<String> {
        let mut path = vec![component[0]];
        loop {
            let current = path[path.len() - 1];
            let next = self
                .edges_of(current)
                .into_iter()
                .map(|e| e.target())
                .find(|t| component.contains(t));
            let Some(next) = next else { break };
            if let Some(start) = path.iter().position(|&n| n == next) {
                let mut cycle: Vec<String> =
                    path[start..].iter().map(|&n| self.name(n).to_owned()).collect();
                cycle.push(self.name(next).to_owned());
                return cycle;
            }
            path.push(next);
        }
        path.iter().map(|&n| self.name(n).to_owned()).collect()
    }
}
