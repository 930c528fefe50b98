use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

mod fields;

/// Value of a named field, as seen by search, filters and sorting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FieldValue {
    fn search_text(&self) -> String {
        match self {
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Text(s) => s.to_lowercase(),
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) => s.trim().parse().ok(),
            FieldValue::Bool(_) => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            FieldValue::Bool(_) => 0,
            FieldValue::Number(_) => 1,
            FieldValue::Text(_) => 2,
        }
    }

    /// Natural ordering; values of different kinds order by kind.
    pub fn compare(&self, other: &FieldValue) -> Ordering {
        match (self, other) {
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a.cmp(b),
            (FieldValue::Number(a), FieldValue::Number(b)) => a.total_cmp(b),
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    /// Equality used by filters. Form inputs send numbers as text, so a
    /// numeric string equals the matching number.
    fn loosely_equals(&self, other: &FieldValue) -> bool {
        match (self, other) {
            (FieldValue::Text(a), FieldValue::Text(b)) => a == b,
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a == b,
            (FieldValue::Bool(a), FieldValue::Text(b)) | (FieldValue::Text(b), FieldValue::Bool(a)) => {
                b.eq_ignore_ascii_case(if *a { "true" } else { "false" })
            }
            _ => match (self.as_number(), other.as_number()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<u32> for FieldValue {
    fn from(n: u32) -> Self {
        FieldValue::Number(n as f64)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

/// Anything that can be shown in a searchable, sortable table.
pub trait Viewable {
    /// Fields searched when the view config names none.
    const SEARCH_FIELDS: &'static [&'static str];

    /// Looks up a field by its wire name. Unknown or unset fields are `None`.
    fn field(&self, name: &str) -> Option<FieldValue>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Test applied to one field value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum Predicate {
    Equals(FieldValue),
    NotEquals(FieldValue),
    /// Case-insensitive substring
    Contains(String),
    OneOf(Vec<FieldValue>),
    AtLeast(f64),
    AtMost(f64),
}

impl Predicate {
    /// Missing values fail every predicate except `not_equals`.
    pub fn matches(&self, value: Option<&FieldValue>) -> bool {
        let Some(value) = value else {
            return matches!(self, Predicate::NotEquals(_));
        };

        match self {
            Predicate::Equals(expected) => value.loosely_equals(expected),
            Predicate::NotEquals(expected) => !value.loosely_equals(expected),
            Predicate::Contains(needle) => value.search_text().contains(&needle.to_lowercase()),
            Predicate::OneOf(options) => options.iter().any(|o| value.loosely_equals(o)),
            Predicate::AtLeast(min) => value.as_number().is_some_and(|n| n >= *min),
            Predicate::AtMost(max) => value.as_number().is_some_and(|n| n <= *max),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub field: String,
    pub predicate: Predicate,
}

impl Filter {
    pub fn new(field: impl Into<String>, predicate: Predicate) -> Self {
        Self {
            field: field.into(),
            predicate,
        }
    }

    pub fn matches<T: Viewable>(&self, item: &T) -> bool {
        self.predicate.matches(item.field(&self.field).as_ref())
    }
}

/// Search, filter, sort and paging parameters of one table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub search_term: String,
    /// Empty means the type's default search fields
    pub search_fields: Vec<String>,
    pub filters: Vec<Filter>,
    pub sort_by: Option<String>,
    pub sort_order: SortOrder,
    /// 1-based
    pub page: usize,
    pub per_page: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            search_fields: Vec::new(),
            filters: Vec::new(),
            sort_by: None,
            sort_order: SortOrder::Asc,
            page: 1,
            per_page: 10,
        }
    }
}

impl ViewConfig {
    pub fn search(mut self, term: impl Into<String>, fields: &[&str]) -> Self {
        self.search_term = term.into();
        self.search_fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn sort(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort_by = Some(field.into());
        self.sort_order = order;
        self
    }

    pub fn page(mut self, page: usize, per_page: usize) -> Self {
        self.page = page;
        self.per_page = per_page;
        self
    }
}

/// One page of a derived view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Page actually returned after clamping
    pub page: usize,
    pub per_page: usize,
    /// Items left after search and filters, across all pages
    pub total_items: usize,
    pub total_pages: usize,
}

/// Runs search, filters, sort and pagination in that order.
///
/// Never fails: an out-of-range page is clamped to the nearest valid one and
/// a zero page size is treated as one.
pub fn apply_view<T: Viewable + Clone>(items: &[T], config: &ViewConfig) -> Page<T> {
    let needle = config.search_term.to_lowercase();
    let search_fields: Vec<&str> = if config.search_fields.is_empty() {
        T::SEARCH_FIELDS.to_vec()
    } else {
        config.search_fields.iter().map(String::as_str).collect()
    };

    let mut matched: Vec<&T> = items
        .iter()
        .filter(|item| matches_search(*item, &needle, &search_fields))
        .filter(|item| config.filters.iter().all(|f| f.matches(*item)))
        .collect();

    if let Some(sort_by) = &config.sort_by {
        // sort_by is stable, so ties keep their filtered order
        matched.sort_by(|a, b| {
            let ordering = compare_optional(a.field(sort_by), b.field(sort_by));
            match config.sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
    }

    paginate(&matched, config.page, config.per_page)
}

fn matches_search<T: Viewable>(item: &T, needle: &str, fields: &[&str]) -> bool {
    if needle.is_empty() {
        return true;
    }

    fields
        .iter()
        .filter_map(|name| item.field(name))
        .any(|value| value.search_text().contains(needle))
}

fn compare_optional(a: Option<FieldValue>, b: Option<FieldValue>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.compare(&b),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn paginate<T: Clone>(matched: &[&T], page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let total_items = matched.len();
    let total_pages = total_items.div_ceil(per_page).max(1);
    let page = page.clamp(1, total_pages);

    let start = (page - 1) * per_page;
    let end = (start + per_page).min(total_items);
    let items = matched[start..end].iter().map(|item| (*item).clone()).collect();

    Page {
        items,
        page,
        per_page,
        total_items,
        total_pages,
    }
}
