//! Quantity-propagating bill-of-materials traversal.
//!
//! Expands a product into every ingredient reachable through its recipe,
//! scaling quantities by the path taken. The walk is a depth-first pre-order
//! driven by an explicit stack, with the nodes of the current path tracked so
//! that a cyclic recipe fails instead of looping forever.

use std::collections::{BTreeMap, HashSet};

use petgraph::graph::{EdgeReference, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::error::RecipeError;

use super::{Recipe, RecipeGraph, RecipeResult};

/// Limits for a flatten.
#[derive(Debug, Clone, Default)]
pub struct FlattenOptions {
    /// Maximum nesting depth (direct ingredients are depth 1). `None` = unbounded,
    /// `Some(0)` rejects any product that has a recipe.
    pub max_depth: Option<usize>,
}

/// One product being expanded: its edges and how far through them we are.
struct Frame<'g> {
    node: NodeIndex,
    multiplier: u64,
    edges: Vec<EdgeReference<'g, u32>>,
    next: usize,
}

impl<'g> Frame<'g> {
    fn new(graph: &'g RecipeGraph, node: NodeIndex, multiplier: u64) -> Self {
        Self {
            node,
            multiplier,
            edges: graph.edges_of(node),
            next: 0,
        }
    }
}

/// Flatten a product's full bill of materials.
///
/// Emits one [`Recipe`] per edge reached, in pre-order, with quantities
/// multiplied along the path. Ingredients reached at several depths appear
/// several times; use [`total_requirements`] to sum them. A product without a
/// recipe flattens to an empty sequence.
pub fn flatten(graph: &RecipeGraph, root: &str, multiplier: u64) -> RecipeResult<Vec<Recipe>> {
    flatten_with(graph, root, multiplier, &FlattenOptions::default())
}

/// [`flatten`] with explicit limits.
pub fn flatten_with(
    graph: &RecipeGraph,
    root: &str,
    multiplier: u64,
    options: &FlattenOptions,
) -> RecipeResult<Vec<Recipe>> {
    let Some(root_node) = graph.node(root) else {
        return Ok(vec![]);
    };

    let mut flat = Vec::new();
    let mut on_path: HashSet<NodeIndex> = HashSet::from([root_node]);
    let mut stack = vec![Frame::new(graph, root_node, multiplier)];

    while let Some(frame) = stack.last_mut() {
        let Some(edge) = frame.edges.get(frame.next).copied() else {
            on_path.remove(&frame.node);
            stack.pop();
            continue;
        };
        frame.next += 1;
        let parent = frame.node;

        let ingredient = edge.target();
        let quantity = u64::from(*edge.weight())
            .checked_mul(frame.multiplier)
            .ok_or_else(|| RecipeError::QuantityOverflow {
                product: graph.name(parent).to_owned(),
                ingredient: graph.name(ingredient).to_owned(),
            })?;
        if let Some(max) = options.max_depth.filter(|&max| stack.len() > max) {
            return Err(RecipeError::DepthExceeded {
                product: root.to_owned(),
                max_depth: max,
            });
        }
        flat.push(Recipe::new(graph.name(ingredient), quantity));

        if !graph.has_edges(ingredient) {
            continue;
        }
        if on_path.contains(&ingredient) {
            let start = stack
                .iter()
                .position(|f| f.node == ingredient)
                .unwrap_or_default();
            let mut path: Vec<String> = stack[start..]
                .iter()
                .map(|f| graph.name(f.node).to_owned())
                .collect();
            path.push(graph.name(ingredient).to_owned());
            return Err(RecipeError::CyclicRecipe { path });
        }

        on_path.insert(ingredient);
        stack.push(Frame::new(graph, ingredient, quantity));
    }

    tracing::trace!(root, entries = flat.len(), "flattened bill of materials");
    Ok(flat)
}

/// Expand only the direct recipe of a product, scaled by `multiplier`.
pub fn flatten_direct(
    graph: &RecipeGraph,
    root: &str,
    multiplier: u64,
) -> RecipeResult<Vec<Recipe>> {
    graph
        .recipes_of(root)
        .into_iter()
        .map(|r| {
            let quantity =
                r.quantity
                    .checked_mul(multiplier)
                    .ok_or_else(|| RecipeError::QuantityOverflow {
                        product: root.to_owned(),
                        ingredient: r.ingredient_name.clone(),
                    })?;
            Ok(Recipe::new(r.ingredient_name, quantity))
        })
        .collect()
}

/// Sum a flattened sequence per ingredient.
pub fn total_requirements<'a>(
    recipes: impl IntoIterator<Item = &'a Recipe>,
) -> RecipeResult<BTreeMap<String, u64>> {
    let mut totals: BTreeMap<String, u64> = BTreeMap::new();
    for recipe in recipes {
        add_requirement(&mut totals, recipe.clone())?;
    }
    Ok(totals)
}

/// Add one entry to a per-ingredient total.
pub(crate) fn add_requirement(
    totals: &mut BTreeMap<String, u64>,
    recipe: Recipe,
) -> RecipeResult<()> {
    let total = totals
        .get(&recipe.ingredient_name)
        .copied()
        .unwrap_or_default()
        .checked_add(recipe.quantity)
        .ok_or_else(|| RecipeError::TotalOverflow {
            ingredient: recipe.ingredient_name.clone(),
        })?;
    totals.insert(recipe.ingredient_name, total);
    Ok(())
}
