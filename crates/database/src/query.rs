//! Builder for PostgREST read requests, producing the same query strings as
//! the supabase client does.

use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Ascending,
    Descending,
}

impl Order {
    fn suffix(self) -> &'static str {
        match self {
            Order::Ascending => "asc",
            Order::Descending => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    table: &'static str,
    select: Option<String>,
    filters: Vec<(String, String)>,
    order: Vec<String>,
    offset: Option<usize>,
    limit: Option<usize>,
    single: bool,
}

impl Query {
    pub fn from(table: &'static str) -> Self {
        Self {
            table,
            select: None,
            filters: vec![],
            order: vec![],
            offset: None,
            limit: None,
            single: false,
        }
    }

    /// Columns to return, including embedded tables such as
    /// `from_location:from_location_id(id, city)`. Whitespace is dropped.
    pub fn select(mut self, columns: &str) -> Self {
        self.select = Some(columns.chars().filter(|c| !c.is_whitespace()).collect());
        self
    }

    pub fn eq(mut self, column: &str, value: impl Display) -> Self {
        self.filters.push((column.to_owned(), format!("eq.{value}")));
        self
    }

    pub fn not_null(mut self, column: &str) -> Self {
        self.filters
            .push((column.to_owned(), "not.is.null".to_owned()));
        self
    }

    /// Appends a sort key. Earlier keys take precedence.
    pub fn order(mut self, column: &str, order: Order) -> Self {
        self.order.push(format!("{column}.{}", order.suffix()));
        self
    }

    /// Rows `from..=to`, zero based.
    pub fn range(mut self, from: usize, to: usize) -> Self {
        self.offset = Some(from);
        self.limit = Some(to.saturating_sub(from) + 1);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Expects exactly one row and returns it as an object instead of an
    /// array.
    pub fn single(mut self) -> Self {
        self.single = true;
        self
    }

    pub fn table(&self) -> &'static str {
        self.table
    }

    pub fn is_single(&self) -> bool {
        self.single
    }

    /// The query string parameters in the order they are sent.
    pub fn params(&self) -> Vec<(String, String)> {
        let mut params = vec![];
        if let Some(select) = &self.select {
            params.push(("select".to_owned(), select.clone()));
        }
        params.extend(self.filters.iter().cloned());
        if !self.order.is_empty() {
            params.push(("order".to_owned(), self.order.join(",")));
        }
        if let Some(offset) = self.offset {
            params.push(("offset".to_owned(), offset.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_owned(), limit.to_string()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(expected: &[(&str, &str)]) -> Vec<(String, String)> {
        expected
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn encodes_filters_order_and_range() {
        let query = Query::from("seo_location_connections")
            .select("id, template_url,\n updated_at")
            .eq("status", "active")
            .not_null("template_url")
            .order("template_url", Order::Ascending)
            .order("id", Order::Ascending)
            .range(2000, 2999);

        assert_eq!(
            query.params(),
            pairs(&[
                ("select", "id,template_url,updated_at"),
                ("status", "eq.active"),
                ("template_url", "not.is.null"),
                ("order", "template_url.asc,id.asc"),
                ("offset", "2000"),
                ("limit", "1000"),
            ])
        );
        assert!(!query.is_single());
    }

    #[test]
    fn limit_without_offset() {
        let query = Query::from("processed_flight_prices")
            .eq("origin", "TIA")
            .order("total_price", Order::Ascending)
            .limit(10);
        assert_eq!(
            query.params(),
            pairs(&[
                ("origin", "eq.TIA"),
                ("order", "total_price.asc"),
                ("limit", "10"),
            ])
        );
    }

    #[test]
    fn descending_order_and_single() {
        let query = Query::from("seo_page_templates")
            .order("created_at", Order::Descending)
            .single();
        assert_eq!(query.params(), pairs(&[("order", "created_at.desc")]));
        assert!(query.is_single());
        assert_eq!(query.table(), "seo_page_templates");
    }
}
