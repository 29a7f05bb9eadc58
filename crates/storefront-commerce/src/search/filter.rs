//! Catalog filter specification and its raw-parameter form.

use crate::money::Money;
use crate::search::SortOption;
use crate::validation::ValidationErrors;
use serde::{Deserialize, Serialize};

/// Page size used when none (or a non-positive one) is given.
pub const DEFAULT_PAGE_SIZE: usize = 12;

/// Page sizes offered to shoppers.
pub const PAGE_SIZES: [usize; 4] = [12, 24, 48, 96];

/// Everything that drives one catalog query.
///
/// Empty `search`/`category` strings mean "no constraint".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSpec {
    pub search: String,
    pub category: String,
    pub min_price: Option<Money>,
    pub max_price: Option<Money>,
    pub in_stock: bool,
    pub sort_by: SortOption,
    /// 1-based page.
    pub page: usize,
    pub limit: usize,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: String::new(),
            min_price: None,
            max_price: None,
            in_stock: false,
            sort_by: SortOption::Newest,
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_price_range(mut self, min: Option<Money>, max: Option<Money>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    pub fn in_stock_only(mut self) -> Self {
        self.in_stock = true;
        self
    }

    pub fn with_sort(mut self, sort_by: SortOption) -> Self {
        self.sort_by = sort_by;
        self
    }

    /// Set pagination. `page` below 1 becomes 1, `limit` below 1 becomes the default.
    pub fn with_pagination(mut self, page: usize, limit: usize) -> Self {
        self.page = page.max(1);
        self.limit = if limit == 0 { DEFAULT_PAGE_SIZE } else { limit };
        self
    }

    /// The same filters pointed at another page.
    pub fn at_page(&self, page: usize) -> Self {
        let mut spec = self.clone();
        spec.page = page.max(1);
        spec
    }

    /// Page size actually used by the engine.
    pub fn effective_limit(&self) -> usize {
        if self.limit == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            self.limit
        }
    }

    /// Trimmed, lower-cased search term, `None` when blank.
    pub fn search_needle(&self) -> Option<String> {
        let trimmed = self.search.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
    }

    /// Build a spec from raw parameters, ignoring anything malformed.
    pub fn from_params(params: &FilterParams) -> Self {
        Self::parse(params, &mut ValidationErrors::new())
    }

    /// Build a spec from raw parameters, rejecting anything malformed.
    pub fn try_from_params(params: &FilterParams) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let spec = Self::parse(params, &mut errors);
        if let (Some(min), Some(max)) = (spec.min_price, spec.max_price) {
            if min > max {
                errors.add("maxPrice", "maxPrice must not be below minPrice");
            }
        }
        errors.into_result().map(|()| spec)
    }

    fn parse(params: &FilterParams, errors: &mut ValidationErrors) -> Self {
        let mut spec = Self::default();

        if let Some(search) = &params.search {
            spec.search = search.clone();
        }
        if let Some(category) = &params.category {
            spec.category = category.trim().to_string();
        }
        spec.min_price = parse_price(params.min_price.as_deref(), "minPrice", errors);
        spec.max_price = parse_price(params.max_price.as_deref(), "maxPrice", errors);

        if let Some(raw) = present(params.in_stock.as_deref()) {
            match parse_flag(raw) {
                Some(flag) => spec.in_stock = flag,
                None => errors.add("inStock", "inStock must be true or false"),
            }
        }

        if let Some(raw) = present(params.sort_by.as_deref()) {
            spec.sort_by = SortOption::parse(raw);
        }

        if let Some(raw) = present(params.page.as_deref()) {
            match raw.parse::<i64>() {
                Ok(page) if page >= 1 => spec.page = page as usize,
                Ok(_) => {
                    errors.add("page", "page must be at least 1");
                }
                Err(_) => errors.add("page", "page must be an integer"),
            }
        }

        if let Some(raw) = present(params.limit.as_deref()) {
            match raw.parse::<i64>() {
                Ok(limit) if limit >= 1 => spec.limit = limit as usize,
                Ok(_) => errors.add("limit", "limit must be at least 1"),
                Err(_) => errors.add("limit", "limit must be an integer"),
            }
        }

        spec
    }

    /// Query parameters understood by the external product API.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if !self.category.is_empty() {
            pairs.push(("category", self.category.clone()));
        }
        if let Some(term) = self.search_needle() {
            pairs.push(("q", term));
        }
        if let Some(min) = self.min_price {
            pairs.push(("price_gte", min.display_amount()));
        }
        if let Some(max) = self.max_price {
            pairs.push(("price_lte", max.display_amount()));
        }
        if self.in_stock {
            pairs.push(("inStock", "true".to_string()));
        }
        pairs.push(("sortBy", self.sort_by.as_str().to_string()));
        pairs.push(("page", self.page.max(1).to_string()));
        pairs.push(("limit", self.effective_limit().to_string()));
        pairs
    }
}

/// Catalog parameters as they arrive from a query string or form.
///
/// Accepts both naming schemes in use: `search`/`q`, `minPrice`/`price_gte`
/// and `maxPrice`/`price_lte`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterParams {
    #[serde(alias = "q")]
    pub search: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "minPrice", alias = "price_gte")]
    pub min_price: Option<String>,
    #[serde(rename = "maxPrice", alias = "price_lte")]
    pub max_price: Option<String>,
    #[serde(rename = "inStock")]
    pub in_stock: Option<String>,
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

fn present(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_price(raw: Option<&str>, field: &str, errors: &mut ValidationErrors) -> Option<Money> {
    let raw = present(raw)?;
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Some(Money::from_decimal(value)),
        Ok(_) => {
            errors.add(field, format!("{} must be a non-negative number", field));
            None
        }
        Err(_) => {
            errors.add(field, format!("{} must be a number", field));
            None
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
