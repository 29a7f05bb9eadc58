use axum::{extract::State, Extension, Json};
use serde::Serialize;
use storefront_commerce::catalog::{category_counts, default_categories, Category};

use crate::middleware::RequestId;
use crate::state::AppState;

use super::{products::load_products, ApiError, ApiResponse};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CategoryItem {
    #[serde(flatten)]
    category: Category,
    product_count: usize,
}

/// The default categories followed by any other tag found on products,
/// each with its product count.
pub(super) async fn list_categories(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<CategoryItem>>>, ApiError> {
    let products = load_products(&state, &req_id.0)?;
    let counts = category_counts(&products);
    let count_of = |name: &str| {
        counts
            .iter()
            .find(|c| c.category.eq_ignore_ascii_case(name))
            .map_or(0, |c| c.count)
    };

    let mut categories = default_categories();
    let mut next_id = categories.iter().map(|c| c.id).max().unwrap_or(0) + 1;
    for count in &counts {
        let known = categories
            .iter()
            .any(|c| c.name.eq_ignore_ascii_case(&count.category));
        if !known {
            categories.push(Category::new(next_id, count.category.clone(), ""));
            next_id += 1;
        }
    }

    let data = categories
        .into_iter()
        .map(|category| CategoryItem {
            product_count: count_of(&category.name),
            category,
        })
        .collect();
    Ok(Json(ApiResponse::new(data, req_id.0)))
}
