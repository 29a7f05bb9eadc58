//! Browse the catalog.

use anyhow::{anyhow, Result};
use serde_json::json;
use storefront_commerce::search::{query, FilterParams, FilterSpec, MAX_PAGES_TO_SHOW};

use super::CatalogArgs;
use crate::context::Context;
use crate::output::stock_badge;

/// Turn command-line flags into a validated filter.
pub(crate) fn filter_spec(args: &CatalogArgs, default_limit: usize) -> Result<FilterSpec> {
    let params = FilterParams {
        search: args.search.clone(),
        category: args.category.clone(),
        min_price: args.min_price.clone(),
        max_price: args.max_price.clone(),
        in_stock: args.in_stock.then(|| "true".to_string()),
        sort_by: args.sort.clone(),
        page: args.page.clone(),
        limit: Some(args.limit.clone().unwrap_or_else(|| default_limit.to_string())),
    };
    FilterSpec::try_from_params(&params).map_err(|errors| anyhow!("Invalid filter: {errors}"))
}

/// Run the catalog command.
pub async fn run(args: CatalogArgs, ctx: &Context) -> Result<()> {
    let spec = filter_spec(&args, ctx.config.catalog.page_size)?;
    ctx.output.debug(&format!("filter: {}", serde_json::to_string(&spec)?));

    let load = ctx.load_catalog(&spec).await?;
    let result = query(&load.products, &spec);
    let pagination = result.pagination();

    if !spec.search.trim().is_empty() {
        ctx.history()?.record(&spec.search)?;
    }

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "products": result.items,
            "pagination": pagination,
            "demo": load.is_demo(),
        }));
        return Ok(());
    }

    ctx.output.header(&format!("Catalog ({})", spec.sort_by.display_name()));
    if result.is_empty() {
        ctx.output.info("No products match these filters.");
        return Ok(());
    }

    let widths = [10, 32, 14, 10, 30];
    ctx.output.table_row(&["ID", "NAME", "CATEGORY", "PRICE", "STOCK"], &widths);
    for product in &result.items {
        let mut name = product.name.clone();
        if product.is_new {
            name.push_str(" (new)");
        }
        ctx.output.table_row(
            &[
                product.id.as_str(),
                &name,
                &product.category,
                &product.price.display(),
                &stock_badge(product.stock),
            ],
            &widths,
        );
    }

    ctx.output.info("");
    ctx.output.info(&format!(
        "Showing {}-{} of {} products, page {} of {}",
        pagination.start_item(),
        pagination.end_item(),
        pagination.total_items,
        pagination.page,
        pagination.total_pages
    ));
    let pages: Vec<String> = pagination
        .page_numbers(MAX_PAGES_TO_SHOW)
        .into_iter()
        .map(|n| if n == pagination.page { format!("[{n}]") } else { n.to_string() })
        .collect();
    if pages.len() > 1 {
        ctx.output.kv("Pages", &pages.join(" "));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_commerce::search::SortOption;
    use storefront_commerce::Money;

    #[test]
    fn test_filter_from_flags() {
        let args = CatalogArgs {
            search: Some("lamp".into()),
            min_price: Some("10".into()),
            max_price: Some("99.5".into()),
            in_stock: true,
            sort: Some("price_desc".into()),
            page: Some("2".into()),
            ..Default::default()
        };
        let spec = filter_spec(&args, 12).unwrap();
        assert_eq!(spec.search, "lamp");
        assert_eq!(spec.min_price, Some(Money::new(1000)));
        assert_eq!(spec.max_price, Some(Money::new(9950)));
        assert!(spec.in_stock);
        assert_eq!(spec.sort_by, SortOption::PriceDesc);
        assert_eq!(spec.page, 2);
        assert_eq!(spec.limit, 12);
    }

    #[test]
    fn test_invalid_flags_are_rejected() {
        let args = CatalogArgs {
            min_price: Some("cheap".into()),
            ..Default::default()
        };
        let err = filter_spec(&args, 12).unwrap_err();
        assert!(err.to_string().contains("minPrice"));
    }
}
