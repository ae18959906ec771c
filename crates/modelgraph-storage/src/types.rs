//! Data types exchanged across the store boundary.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A stored record: a JSON object shaped like its model.
pub type Record = Map<String, Value>;

/// Key under which every record carries its store-assigned local id.
pub const ID_KEY: &str = "_id";

/// Returns the local id of a record, if it has one.
///
/// Numeric ids are rendered as strings so callers only deal with one form.
#[must_use]
pub fn record_id(record: &Record) -> Option<String> {
    match record.get(ID_KEY)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Filter and paging options for list reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListQuery {
    /// Field equality filters, applied conjunctively.
    pub filters: IndexMap<String, Value>,
    /// Restricts the result to these local ids when set.
    pub ids: Option<Vec<String>>,
    /// Number of matching records to skip.
    pub offset: Option<usize>,
    /// Maximum number of records to return.
    pub limit: Option<usize>,
}

impl ListQuery {
    /// Creates an empty query matching every record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an equality filter.
    #[must_use]
    pub fn with_filter(mut self, field: impl Into<String>, value: Value) -> Self {
        self.filters.insert(field.into(), value);
        self
    }

    /// Restricts the query to a set of local ids.
    #[must_use]
    pub fn with_ids(mut self, ids: Vec<String>) -> Self {
        self.ids = Some(ids);
        self
    }

    /// Sets the offset.
    #[must_use]
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Sets the limit.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Returns `true` if the record satisfies the filters and id restriction.
    ///
    /// Offset and limit are not considered here.
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        if let Some(ids) = &self.ids {
            match record_id(record) {
                Some(id) if ids.contains(&id) => {}
                _ => return false,
            }
        }
        self.filters
            .iter()
            .all(|(field, expected)| record.get(field).is_some_and(|v| values_equal(v, expected)))
    }
}

/// Compares two JSON values, treating numbers by numeric value.
///
/// `28` and `28.0` are equal here even though `serde_json` keeps them apart.
#[must_use]
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => a == b,
        },
        _ => left == right,
    }
}

/// Relay pagination arguments with cursors already decoded to offsets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionArgs {
    /// Take at most this many records from the front of the window.
    pub first: Option<usize>,
    /// Take at most this many records from the back of the window.
    pub last: Option<usize>,
    /// Start strictly after this offset.
    pub after: Option<usize>,
    /// End strictly before this offset.
    pub before: Option<usize>,
}

impl ConnectionArgs {
    /// Computes the half-open `[start, end)` slice these arguments select
    /// out of `total` matching records.
    #[must_use]
    pub fn window(&self, total: usize) -> (usize, usize) {
        let mut start = self.after.map_or(0, |a| a.saturating_add(1)).min(total);
        let mut end = self.before.unwrap_or(total).min(total).max(start);

        if let Some(first) = self.first {
            end = end.min(start.saturating_add(first));
        }
        if let Some(last) = self.last {
            start = start.max(end.saturating_sub(last));
        }

        (start, end)
    }
}

/// One page of a connection read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Records in this page, in list order.
    pub records: Vec<Record>,
    /// Offset of the first record within the full match set.
    pub start: usize,
    /// Total number of records matching the query.
    pub total: usize,
}

impl Page {
    /// Returns `true` if records exist before this page.
    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.start > 0
    }

    /// Returns `true` if records exist after this page.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.start + self.records.len() < self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_record_id() {
        assert_eq!(record_id(&record(json!({"_id": "U1"}))), Some("U1".into()));
        assert_eq!(record_id(&record(json!({"_id": 7}))), Some("7".into()));
        assert_eq!(record_id(&record(json!({"name": "Foo"}))), None);
    }

    #[test]
    fn test_list_query_matches() {
        let foo = record(json!({"_id": "U1", "name": "Foo", "age": 28}));

        assert!(ListQuery::new().matches(&foo));
        assert!(ListQuery::new().with_filter("age", json!(28.0)).matches(&foo));
        assert!(!ListQuery::new().with_filter("age", json!(29)).matches(&foo));
        assert!(!ListQuery::new().with_filter("missing", json!(1)).matches(&foo));
        assert!(ListQuery::new().with_ids(vec!["U1".into()]).matches(&foo));
        assert!(!ListQuery::new().with_ids(vec!["U2".into()]).matches(&foo));
    }

    #[test]
    fn test_window_defaults_to_everything() {
        assert_eq!(ConnectionArgs::default().window(5), (0, 5));
        assert_eq!(ConnectionArgs::default().window(0), (0, 0));
    }

    #[test]
    fn test_window_first_after() {
        let args = ConnectionArgs {
            first: Some(2),
            after: Some(0),
            ..Default::default()
        };
        assert_eq!(args.window(5), (1, 3));
    }

    #[test]
    fn test_window_last_before() {
        let args = ConnectionArgs {
            last: Some(2),
            before: Some(4),
            ..Default::default()
        };
        assert_eq!(args.window(5), (2, 4));
    }

    #[test]
    fn test_window_clamps_out_of_range() {
        let args = ConnectionArgs {
            after: Some(10),
            first: Some(3),
            ..Default::default()
        };
        assert_eq!(args.window(5), (5, 5));

        let args = ConnectionArgs {
            after: Some(3),
            before: Some(1),
            ..Default::default()
        };
        assert_eq!(args.window(5), (4, 4));
    }

    #[test]
    fn test_page_flags() {
        let page = Page {
            records: vec![record(json!({"_id": "a"}))],
            start: 1,
            total: 3,
        };
        assert!(page.has_previous());
        assert!(page.has_next());
        assert!(!Page::default().has_next());
    }
}
