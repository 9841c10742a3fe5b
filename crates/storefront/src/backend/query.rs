//! Row filters for the REST data API.
//!
//! Filters use the PostgREST query syntax: `column=eq.value`,
//! `order=column.desc`, `select=a,b`.

use std::fmt::Display;

/// A table plus the filters, ordering and projection for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    table: String,
    params: Vec<(String, String)>,
}

impl Query {
    #[must_use]
    pub fn table(name: impl Into<String>) -> Self {
        Self {
            table: name.into(),
            params: Vec::new(),
        }
    }

    /// Columns to return, e.g. `"id, name"`.
    #[must_use]
    pub fn select(mut self, columns: &str) -> Self {
        let columns: String = columns.chars().filter(|c| !c.is_whitespace()).collect();
        self.params.push(("select".to_string(), columns));
        self
    }

    /// `column = value`.
    #[must_use]
    pub fn eq(mut self, column: &str, value: impl Display) -> Self {
        self.params.push((column.to_string(), format!("eq.{value}")));
        self
    }

    /// Sort by `column`.
    #[must_use]
    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        let direction = if ascending { "asc" } else { "desc" };
        self.params
            .push(("order".to_string(), format!("{column}.{direction}")));
        self
    }

    #[must_use]
    pub fn limit(mut self, n: usize) -> Self {
        self.params.push(("limit".to_string(), n.to_string()));
        self
    }

    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table
    }

    #[must_use]
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }
}

/// Total row count from a `Content-Range` header such as `0-24/57` or `*/0`.
#[must_use]
pub fn parse_content_range_total(header: &str) -> Option<u64> {
    header.rsplit_once('/')?.1.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_params_in_order() {
        let q = Query::table("banners")
            .select("id, image_url, title, subtitle")
            .eq("is_active", true)
            .order("sort_order", true);

        assert_eq!(q.table_name(), "banners");
        assert_eq!(
            q.params(),
            [
                ("select".to_string(), "id,image_url,title,subtitle".to_string()),
                ("is_active".to_string(), "eq.true".to_string()),
                ("order".to_string(), "sort_order.asc".to_string()),
            ]
        );
    }

    #[test]
    fn test_order_desc_and_limit() {
        let q = Query::table("reviews").order("created_at", false).limit(10);
        assert_eq!(
            q.params(),
            [
                ("order".to_string(), "created_at.desc".to_string()),
                ("limit".to_string(), "10".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_content_range() {
        assert_eq!(parse_content_range_total("0-24/57"), Some(57));
        assert_eq!(parse_content_range_total("*/0"), Some(0));
        assert_eq!(parse_content_range_total("0-24/*"), None);
        assert_eq!(parse_content_range_total("garbage"), None);
    }
}
