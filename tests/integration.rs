//! End-to-end tests for craft-ledger.
//!
//! These tests exercise the full pipeline from dataset file through catalog,
//! recipe graph, traversal and all three metrics, using the bundled sample
//! economy in `data/sample.toml`.

use std::path::Path;

use craft_ledger::catalog::ProductRow;
use craft_ledger::config::AnalysisConfig;
use craft_ledger::dataset::Dataset;
use craft_ledger::economy::Economy;
use craft_ledger::error::{CraftError, MetricError, RecipeError};
use craft_ledger::metrics::MetricOptions;
use craft_ledger::recipe::{Recipe, RecipeRow};
use craft_ledger::report;

fn sample_path() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/data/sample.toml"))
}

fn sample_economy() -> Economy {
    let dataset = Dataset::load(sample_path()).unwrap();
    Economy::from_dataset(dataset, MetricOptions::default()).unwrap()
}

fn product(name: &str, price: i64, duration: f64, source: &str) -> ProductRow {
    ProductRow {
        name: name.into(),
        price,
        duration,
        source: source.into(),
    }
}

fn recipe(product_name: &str, ingredient: &str, quantity: i64) -> RecipeRow {
    RecipeRow {
        product_name: product_name.into(),
        ingredient: ingredient.into(),
        quantity,
    }
}

#[test]
fn sample_dataset_loads() {
    let economy = sample_economy();
    let info = economy.info();
    assert_eq!(info.product_count, 17);
    assert_eq!(info.manufactured_count, 9);
    assert_eq!(info.recipe_edges, 18);
    assert_eq!(info.factory_products, 8);
}

#[test]
fn flatten_lawn_mower_in_pre_order() {
    let economy = sample_economy();
    let flat = economy.flatten("lawn mower").unwrap();
    assert_eq!(
        flat,
        vec![
            Recipe::new("engine", 1),
            Recipe::new("steel", 3),
            Recipe::new("oil", 1),
            Recipe::new("plastic", 2),
            Recipe::new("blade", 2),
            Recipe::new("steel", 2),
            Recipe::new("plank", 1),
            Recipe::new("wood", 2),
            Recipe::new("plastic", 4),
        ]
    );
    assert_eq!(economy.flatten("lawn mower").unwrap(), flat);
}

#[test]
fn default_factory_targets() {
    let economy = sample_economy();
    let config = AnalysisConfig::default();
    let rows = economy.factory_demand(&config.factory_targets).unwrap();
    let pairs: Vec<_> = rows
        .iter()
        .map(|r| (r.ingredient_name.as_str(), r.quantity))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("eggs", 3),
            ("fabric", 6),
            ("flour", 6),
            ("oil", 1),
            ("plastic", 6),
            ("steel", 5),
            ("sugar", 2),
            ("wood", 10),
        ]
    );
}

#[test]
fn added_value_winners() {
    let economy = sample_economy();
    let rows = economy.added_value().unwrap();
    let winners: Vec<_> = rows
        .iter()
        .map(|r| (r.source.as_str(), r.name.as_str()))
        .collect();
    assert_eq!(
        winners,
        vec![
            ("bakery", "bread"),
            ("furniture", "chair"),
            ("hardware", "lawn mower"),
            ("mill", "plank"),
        ]
    );
    let mower = &rows[2];
    assert_eq!(mower.ingredients_price, 203);
    assert_eq!(mower.profit, 197);
    assert!(rows.iter().all(|r| !r.source.is_factory()));
}

#[test]
fn bottleneck_table() {
    let economy = sample_economy();
    let rows = economy.bottleneck().unwrap();
    let summary: Vec<_> = rows
        .iter()
        .map(|r| {
            (
                r.product_name.as_str(),
                r.source.as_str(),
                r.scaled_duration,
                r.sell_price,
            )
        })
        .collect();
    assert_eq!(
        summary,
        vec![
            ("chair", "mill", 6.0, Some(90)),
            ("couch", "mill", 12.0, Some(200)),
            ("donuts", "bakery", 3.0, Some(40)),
            ("lawn mower", "hardware", 10.0, Some(400)),
        ]
    );
}

#[test]
fn donuts_factory_demand_via_batter() {
    let economy = Economy::from_rows(
        vec![
            product("sugar", 1, 0.0, "factory"),
            product("eggs", 2, 0.0, "factory"),
            product("batter", 5, 1.0, "bakery"),
            product("donuts", 20, 1.0, "bakery"),
        ],
        vec![
            recipe("donuts", "sugar", 2),
            recipe("donuts", "batter", 3),
            recipe("batter", "eggs", 1),
        ],
        MetricOptions::default(),
    )
    .unwrap();
    let rows = economy.factory_demand(&["donuts"]).unwrap();
    let pairs: Vec<_> = rows
        .iter()
        .map(|r| (r.ingredient_name.as_str(), r.quantity))
        .collect();
    assert_eq!(pairs, vec![("eggs", 3), ("sugar", 2)]);
}

#[test]
fn bottleneck_keeps_every_tied_source() {
    let economy = Economy::from_rows(
        vec![
            product("gear", 4, 2.0, "smithy"),
            product("cloth", 2, 1.0, "weaver"),
            product("kite", 30, 1.0, "toys"),
        ],
        vec![recipe("kite", "gear", 1), recipe("kite", "cloth", 2)],
        MetricOptions::default(),
    )
    .unwrap();
    let rows = economy.bottleneck().unwrap();
    let sources: Vec<_> = rows.iter().map(|r| r.source.as_str()).collect();
    assert_eq!(sources, vec!["smithy", "weaver"]);
}

#[test]
fn cyclic_dataset_fails_with_diagnostic() {
    let err = Economy::from_rows(
        vec![product("egg", 1, 1.0, "farm"), product("hen", 1, 1.0, "farm")],
        vec![recipe("hen", "egg", 1), recipe("egg", "hen", 1)],
        MetricOptions::default(),
    )
    .unwrap_err();
    match err {
        CraftError::Recipe(RecipeError::CyclicRecipe { path }) => {
            assert_eq!(path.first(), path.last());
            assert_eq!(path.len(), 3);
        }
        other => panic!("expected cyclic recipe error, got {other:?}"),
    }
}

#[test]
fn unknown_ingredient_aborts_build() {
    let err = Economy::from_rows(
        vec![product("donuts", 20, 1.0, "bakery")],
        vec![recipe("donuts", "sprinkles", 1)],
        MetricOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        CraftError::Recipe(RecipeError::UnknownIngredient { .. })
    ));
}

#[test]
fn unknown_factory_target() {
    let economy = sample_economy();
    let err = economy.factory_demand(&["hovercraft"]).unwrap_err();
    assert!(matches!(
        err,
        CraftError::Metric(MetricError::UnknownTarget { .. })
    ));
}

#[test]
fn depth_limit_from_config() {
    let config: AnalysisConfig = toml::from_str("max_depth = 1").unwrap();
    let dataset = Dataset::load(sample_path()).unwrap();
    let economy = Economy::from_dataset(dataset, config.metric_options()).unwrap();
    assert!(matches!(
        economy.flatten("lawn mower"),
        Err(CraftError::Recipe(RecipeError::DepthExceeded { .. }))
    ));
    assert_eq!(economy.flatten("bread").unwrap().len(), 1);
}

#[test]
fn dataset_survives_json_round_trip() {
    let dir = tempfile::TempDir::new().unwrap();
    let dataset = Dataset::load(sample_path()).unwrap();
    let path = dir.path().join("sample.json");
    dataset.save(&path).unwrap();

    let reloaded = Dataset::load(&path).unwrap();
    assert_eq!(reloaded, dataset);

    let economy = Economy::from_dataset(reloaded, MetricOptions::default()).unwrap();
    assert_eq!(economy.catalog().to_rows(), dataset.products);
}

#[test]
fn bottleneck_report_written_as_json() {
    let dir = tempfile::TempDir::new().unwrap();
    let economy = sample_economy();
    let rows = economy.bottleneck().unwrap();
    let path = dir.path().join("bottleneck.json");
    report::write_json(&path, &rows).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value.as_array().unwrap().len(), rows.len());
    assert_eq!(value[0]["product_name"], "chair");
    assert_eq!(value[0]["sell_price"], 90);
}
