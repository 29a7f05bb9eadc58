//! Ingestion adapter: raw product records to [`Product`].
//!
//! Product sources disagree on shape. The document store uses `_id`
//! (sometimes as `{"$oid": ..}`), an `inStock` flag and `createdAt`
//! timestamps; the external product API uses numeric `id`s, a `stock` count,
//! `rating: {rate, count}` and occasionally numbers encoded as strings. All of
//! that is absorbed here so the query engine only ever sees canonical
//! products.

use crate::cart::MAX_QUANTITY;
use crate::catalog::product::{clamp_rating, Product};
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::Money;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::{Map, Value};
use tracing::warn;

type Record = Map<String, Value>;

/// Normalize a single raw record.
pub fn normalize_record(raw: &Value) -> Result<Product, CommerceError> {
    let record = raw
        .as_object()
        .ok_or_else(|| invalid("record is not an object"))?;

    let id = read_id(record)?;
    let name = read_string(record, &["name", "title"])
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| invalid(format!("{}: missing name", id)))?;

    let price = read_number(record, &["price"])
        .ok_or_else(|| invalid(format!("{}: missing or non-numeric price", id)))?;
    if price < 0.0 {
        return Err(invalid(format!("{}: negative price {}", id, price)));
    }

    Ok(Product {
        name,
        description: read_string(record, &["description"]).unwrap_or_default(),
        price: Money::from_decimal(price),
        category: read_category(record),
        stock: read_stock(record),
        rating: read_rating(record),
        is_new: read_bool(record, &["isNew", "is_new"]).unwrap_or(false),
        created_at: read_timestamp(record),
        image: read_string(record, &["image", "imageUrl", "avatar", "Avatar"])
            .filter(|s| !s.is_empty()),
        brand: read_string(record, &["brand"]).filter(|s| !s.is_empty()),
        id,
    })
}

/// Normalize many records, skipping (and logging) the ones that don't fit.
pub fn normalize_records<'a, I>(records: I) -> Vec<Product>
where
    I: IntoIterator<Item = &'a Value>,
{
    records
        .into_iter()
        .filter_map(|raw| match normalize_record(raw) {
            Ok(product) => Some(product),
            Err(e) => {
                warn!(error = %e, "skipping product record");
                None
            }
        })
        .collect()
}

/// Normalize a whole response body: either a bare array or an object with
/// the array under `data` or `products`.
pub fn normalize_payload(payload: &Value) -> Result<Vec<Product>, CommerceError> {
    let records = match payload {
        Value::Array(items) => items,
        Value::Object(obj) => ["data", "products"]
            .iter()
            .find_map(|k| obj.get(*k).and_then(Value::as_array))
            .ok_or_else(|| invalid("response object has no product list"))?,
        _ => return Err(invalid("response is neither a list nor an object")),
    };
    Ok(normalize_records(records))
}

fn invalid(msg: impl Into<String>) -> CommerceError {
    CommerceError::InvalidProduct(msg.into())
}

fn first<'a>(record: &'a Record, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| record.get(*k))
        .find(|v| !v.is_null())
}

fn read_id(record: &Record) -> Result<ProductId, CommerceError> {
    let value = first(record, &["id", "_id"]).ok_or_else(|| invalid("missing id"))?;
    let id = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Object(obj) => obj
            .get("$oid")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| invalid("unsupported id object"))?,
        _ => return Err(invalid("unsupported id type")),
    };
    if id.trim().is_empty() {
        return Err(invalid("empty id"));
    }
    Ok(ProductId::new(id))
}

fn read_string(record: &Record, keys: &[&str]) -> Option<String> {
    first(record, keys).and_then(|v| match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

fn read_number(record: &Record, keys: &[&str]) -> Option<f64> {
    first(record, keys).and_then(value_as_f64)
}

fn read_bool(record: &Record, keys: &[&str]) -> Option<bool> {
    first(record, keys).and_then(|v| match v {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        Value::Number(n) => n.as_f64().map(|n| n != 0.0),
        _ => None,
    })
}

fn read_category(record: &Record) -> String {
    match first(record, &["category"]) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Object(obj)) => obj
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        _ => String::new(),
    }
}

/// An explicit count wins; a bare availability flag maps to the cart limit
/// (in stock) or zero.
fn read_stock(record: &Record) -> u32 {
    if let Some(stock) = read_number(record, &["stock", "countInStock"]) {
        return stock.max(0.0).min(f64::from(u32::MAX)).floor() as u32;
    }
    match read_bool(record, &["inStock", "in_stock"]) {
        Some(true) => MAX_QUANTITY,
        _ => 0,
    }
}

fn read_rating(record: &Record) -> Option<f64> {
    let value = first(record, &["rating"])?;
    let rating = match value {
        Value::Object(obj) => obj.get("rate").and_then(value_as_f64),
        other => value_as_f64(other),
    }?;
    Some(clamp_rating(rating))
}

fn read_timestamp(record: &Record) -> DateTime<Utc> {
    first(record, &["createdAt", "created_at"])
        .and_then(parse_timestamp)
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// RFC 3339, a bare `YYYY-MM-DD` date, or epoch milliseconds.
fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&Utc));
            }
            if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
            }
            s.parse::<i64>().ok().and_then(from_millis)
        }
        Value::Number(n) => n.as_i64().and_then(from_millis),
        Value::Object(obj) => obj.get("$date").and_then(parse_timestamp),
        _ => None,
    }
}

fn from_millis(ms: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms).single()
}
