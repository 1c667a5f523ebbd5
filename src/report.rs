//! Rendering result tables as aligned text or JSON.

use std::path::Path;

use serde::Serialize;

use crate::error::ReportError;
use crate::metrics::{AddedValueRow, BottleneckRow, FactoryDemandRow};
use crate::recipe::Recipe;

/// Result type for report operations.
pub type ReportResult<T> = std::result::Result<T, ReportError>;

/// A record that can be printed as one line of a text table.
pub trait TableRow {
    fn headers() -> &'static [&'static str];
    fn cells(&self) -> Vec<String>;
}

impl TableRow for AddedValueRow {
    fn headers() -> &'static [&'static str] {
        &[
            "name",
            "price",
            "duration",
            "source",
            "ingredients_price",
            "profit",
            "rate",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.price.to_string(),
            self.duration.to_string(),
            self.source.to_string(),
            self.ingredients_price.to_string(),
            self.profit.to_string(),
            format!("{:.4}", self.rate),
        ]
    }
}

impl TableRow for BottleneckRow {
    fn headers() -> &'static [&'static str] {
        &["product_name", "source", "scaled_duration", "sell_price"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.product_name.clone(),
            self.source.to_string(),
            self.scaled_duration.to_string(),
            self.sell_price
                .map(|p| p.to_string())
                .unwrap_or_else(|| "-".into()),
        ]
    }
}

impl TableRow for FactoryDemandRow {
    fn headers() -> &'static [&'static str] {
        &["ingredient_name", "quantity"]
    }

    fn cells(&self) -> Vec<String> {
        vec![self.ingredient_name.clone(), self.quantity.to_string()]
    }
}

impl TableRow for Recipe {
    fn headers() -> &'static [&'static str] {
        &["ingredient_name", "quantity"]
    }

    fn cells(&self) -> Vec<String> {
        vec![self.ingredient_name.clone(), self.quantity.to_string()]
    }
}

/// Render rows as a left-aligned text table with a header line.
pub fn render_text<T: TableRow>(rows: &[T]) -> String {
    let headers = T::headers();
    let cells: Vec<Vec<String>> = rows.iter().map(T::cells).collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, headers.iter().copied(), &widths);
    for row in &cells {
        push_line(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

fn push_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line: Vec<String> = cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

/// Pretty JSON array of the rows.
pub fn to_json<T: Serialize>(rows: &[T]) -> ReportResult<String> {
    serde_json::to_string_pretty(rows).map_err(|e| ReportError::Serialize {
        message: e.to_string(),
    })
}

/// Write rows as pretty JSON to `path`.
pub fn write_json<T: Serialize>(path: &Path, rows: &[T]) -> ReportResult<()> {
    let json = to_json(rows)?;
    std::fs::write(path, json).map_err(|e| ReportError::Write {
        path: path.display().to_string(),
        source: e,
    })?;
    tracing::info!(path = %path.display(), rows = rows.len(), "report written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Source;

    fn demand() -> Vec<FactoryDemandRow> {
        vec![
            FactoryDemandRow {
                ingredient_name: "eggs".into(),
                quantity: 3,
            },
            FactoryDemandRow {
                ingredient_name: "sugar".into(),
                quantity: 12,
            },
        ]
    }

    #[test]
    fn text_table_is_aligned() {
        let text = render_text(&demand());
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "ingredient_name  quantity");
        assert_eq!(lines[1], "eggs             3");
        assert_eq!(lines[2], "sugar            12");
    }

    #[test]
    fn empty_table_has_only_header() {
        let text = render_text::<BottleneckRow>(&[]);
        assert_eq!(text, "product_name  source  scaled_duration  sell_price\n");
    }

    #[test]
    fn missing_sell_price_renders_dash() {
        let row = BottleneckRow {
            product_name: "kit".into(),
            source: Source::new("shop"),
            scaled_duration: 1.5,
            sell_price: None,
        };
        assert_eq!(row.cells(), vec!["kit", "shop", "1.5", "-"]);
    }

    #[test]
    fn json_uses_field_names() {
        let json = to_json(&demand()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[1]["ingredient_name"], "sugar");
        assert_eq!(value[1]["quantity"], 12);
    }

    #[test]
    fn source_serializes_as_plain_string() {
        let row = AddedValueRow {
            name: "bread".into(),
            price: 20,
            duration: 1.0,
            source: Source::new("bakery"),
            ingredients_price: 3,
            profit: 17,
            rate: 17.0,
        };
        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value["source"], "bakery");
    }

    #[test]
    fn write_json_creates_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("factory.json");
        write_json(&path, &demand()).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"sugar\""));
    }
}
