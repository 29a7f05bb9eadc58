//! List categories with product counts.

use anyhow::Result;
use serde::Serialize;
use storefront_commerce::catalog::category_counts;
use storefront_commerce::search::FilterSpec;
use storefront_data::CategorySource;

use crate::context::Context;

#[derive(Serialize)]
struct CategoryRow {
    name: String,
    label: String,
    count: usize,
}

/// Run the categories command.
pub async fn run(ctx: &Context) -> Result<()> {
    let source = CategorySource::new(&ctx.config.api.base_url)?;
    let filter = FilterSpec::new();
    let (categories, load) = tokio::join!(source.load(), ctx.load_catalog(&filter));
    let load = load?;
    let counts = category_counts(&load.products);

    let mut rows: Vec<CategoryRow> = categories
        .iter()
        .map(|c| CategoryRow {
            name: c.name.clone(),
            label: c.label().to_string(),
            count: counts
                .iter()
                .find(|n| n.category.eq_ignore_ascii_case(&c.name))
                .map_or(0, |n| n.count),
        })
        .collect();
    for count in &counts {
        if !rows.iter().any(|r| r.name.eq_ignore_ascii_case(&count.category)) {
            rows.push(CategoryRow {
                name: count.category.clone(),
                label: count.category.clone(),
                count: count.count,
            });
        }
    }

    if ctx.output.is_json() {
        ctx.output.json(&rows);
        return Ok(());
    }

    ctx.output.header("Categories");
    for row in &rows {
        ctx.output.table_row(&[&row.label, &row.count.to_string()], &[24, 6]);
    }
    Ok(())
}
