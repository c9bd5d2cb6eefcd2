//! Gist filters
//!
//! Scope filters pick which collection endpoint gets queried. Content filters
//! run afterwards against each gist's `files` entries: a gist is kept when at
//! least one of its files satisfies every content filter.

use crate::error::{GistError, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};
use regex::Regex;
use serde_json::{Map, Value};
use std::fmt;

/// Filter that selects the collection endpoint
#[derive(Debug, Clone, PartialEq)]
pub enum ScopeFilter {
    UserName(String),
    Starred(bool),
    Public(bool),
    Since(DateTime<Utc>),
}

impl ScopeFilter {
    /// Reserved configuration key for this filter
    pub fn key(&self) -> &'static str {
        match self {
            ScopeFilter::UserName(_) => "userName",
            ScopeFilter::Starred(_) => "starred",
            ScopeFilter::Public(_) => "public",
            ScopeFilter::Since(_) => "since",
        }
    }
}

/// File metadata fields that content filters can test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentField {
    Size,
    RawUrl,
    Filename,
    Type,
    Language,
    Truncated,
    Content,
}

impl ContentField {
    pub const ALL: [ContentField; 7] = [
        ContentField::Size,
        ContentField::RawUrl,
        ContentField::Filename,
        ContentField::Type,
        ContentField::Language,
        ContentField::Truncated,
        ContentField::Content,
    ];

    /// JSON key of the field inside a file object
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentField::Size => "size",
            ContentField::RawUrl => "raw_url",
            ContentField::Filename => "filename",
            ContentField::Type => "type",
            ContentField::Language => "language",
            ContentField::Truncated => "truncated",
            ContentField::Content => "content",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }
}

impl fmt::Display for ContentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compiled match value
#[derive(Debug, Clone)]
enum Pattern {
    Regex(Regex),
    /// Plain substring, for values the regex engine refuses
    Literal(String),
}

impl Pattern {
    fn compile(field: ContentField, raw: &str) -> Self {
        match Regex::new(raw) {
            Ok(re) => return Pattern::Regex(re),
            Err(err) => {
                tracing::debug!("filter {} value is not a regex ({}), matching literally", field, err);
            }
        }
        // The escaped form can still exceed the compiled size limit
        match Regex::new(&regex::escape(raw)) {
            Ok(re) => Pattern::Regex(re),
            Err(_) => Pattern::Literal(raw.to_string()),
        }
    }

    fn as_str(&self) -> &str {
        match self {
            Pattern::Regex(re) => re.as_str(),
            Pattern::Literal(s) => s,
        }
    }

    fn is_match(&self, text: &str) -> bool {
        match self {
            Pattern::Regex(re) => re.is_match(text),
            Pattern::Literal(s) => text.contains(s.as_str()),
        }
    }
}

/// Pattern test against one file field
#[derive(Debug, Clone)]
pub struct ContentFilter {
    pub field: ContentField,
    pattern: Pattern,
}

impl ContentFilter {
    /// Build a filter from a match value. The value is treated as a regular
    /// expression; one that does not compile is matched literally.
    pub fn new(field: ContentField, pattern: &str) -> Self {
        Self {
            field,
            pattern: Pattern::compile(field, pattern),
        }
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// True when the file carries this field and its text form matches
    pub fn matches_file(&self, file: &Value) -> bool {
        file.get(self.field.as_str())
            .map(|value| self.pattern.is_match(&text_form(value)))
            .unwrap_or(false)
    }
}

impl PartialEq for ContentFilter {
    fn eq(&self, other: &Self) -> bool {
        self.field == other.field && self.pattern.as_str() == other.pattern.as_str()
    }
}

/// Tagged filter entry
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Scope(ScopeFilter),
    Content(ContentFilter),
}

impl From<ScopeFilter> for Filter {
    fn from(filter: ScopeFilter) -> Self {
        Filter::Scope(filter)
    }
}

impl From<ContentFilter> for Filter {
    fn from(filter: ContentFilter) -> Self {
        Filter::Content(filter)
    }
}

/// Textual form of a JSON value. Structured values serialize to compact JSON.
pub fn text_form(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Truthiness of a scope value as the API users write it: `true`, `"true"`, `1`
fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty() && s != "false",
        Value::Number(n) => n.as_f64().map(|n| n != 0.0).unwrap_or(false),
        Value::Null => false,
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// RFC 3339 timestamp, or a bare `YYYY-MM-DD` date taken as midnight UTC
fn parse_since(value: &Value) -> Result<DateTime<Utc>> {
    let raw = text_form(value);
    if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
        .map_err(|err| GistError::Configuration(format!("invalid since timestamp {:?}: {}", raw, err)))
}

/// Format a `since` timestamp the way the API expects it
pub fn format_since(since: &DateTime<Utc>) -> String {
    since.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Ordered list of filters for one list operation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    filters: Vec<Filter>,
    /// Field names that were neither reserved nor filterable
    pub ignored: Vec<String>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter, builder style
    pub fn with(mut self, filter: impl Into<Filter>) -> Self {
        self.filters.push(filter.into());
        self
    }

    pub fn push(&mut self, filter: impl Into<Filter>) {
        self.filters.push(filter.into());
    }

    /// Parse the `[{field: value}, ...]` configuration surface.
    ///
    /// Reserved names (`userName`, `starred`, `public`, `since`) become scope
    /// filters, filterable file fields become content filters, anything else
    /// is warned about and dropped.
    pub fn from_pairs<I, K>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        let mut set = Self::new();

        for (key, value) in pairs {
            let key = key.as_ref();
            match key {
                "userName" => {
                    if truthy(&value) {
                        set.push(ScopeFilter::UserName(text_form(&value)));
                    }
                }
                "starred" => {
                    if truthy(&value) {
                        set.push(ScopeFilter::Starred(true));
                    }
                }
                "public" => {
                    if truthy(&value) {
                        set.push(ScopeFilter::Public(true));
                    }
                }
                "since" => {
                    if truthy(&value) {
                        set.push(ScopeFilter::Since(parse_since(&value)?));
                    }
                }
                other => match ContentField::parse(other) {
                    Some(field) => set.push(ContentFilter::new(field, &text_form(&value))),
                    None => {
                        tracing::warn!("Ignoring unknown filter field: {}", other);
                        set.ignored.push(other.to_string());
                    }
                },
            }
        }

        Ok(set)
    }

    /// Parse a JSON array of single-key objects
    pub fn from_json(value: &Value) -> Result<Self> {
        let entries = value
            .as_array()
            .ok_or_else(|| GistError::Configuration("filterBy must be an array".to_string()))?;

        let mut pairs = Vec::new();
        for entry in entries {
            let map: &Map<String, Value> = entry.as_object().ok_or_else(|| {
                GistError::Configuration(format!("filter entry must be an object, got {}", entry))
            })?;
            pairs.extend(map.iter().map(|(k, v)| (k.clone(), v.clone())));
        }

        Self::from_pairs(pairs)
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Filter> {
        self.filters.iter()
    }

    pub fn scope_filters(&self) -> impl Iterator<Item = &ScopeFilter> {
        self.filters.iter().filter_map(|f| match f {
            Filter::Scope(s) => Some(s),
            Filter::Content(_) => None,
        })
    }

    pub fn content_filters(&self) -> impl Iterator<Item = &ContentFilter> {
        self.filters.iter().filter_map(|f| match f {
            Filter::Content(c) => Some(c),
            Filter::Scope(_) => None,
        })
    }
}

/// True when some file of the gist satisfies every filter
fn record_matches(record: &Value, filters: &[&ContentFilter]) -> bool {
    let Some(files) = record.get("files").and_then(|f| f.as_object()) else {
        return false;
    };

    files
        .values()
        .any(|file| filters.iter().all(|filter| filter.matches_file(file)))
}

/// Keep the gists matching every content filter, preserving order.
/// Scope filters are ignored here; they were consumed when building the request.
pub fn filter_records(records: Vec<Value>, filters: &FilterSet) -> Vec<Value> {
    let content: Vec<&ContentFilter> = filters.content_filters().collect();
    if content.is_empty() {
        return records;
    }

    let before = records.len();
    let kept: Vec<Value> = records
        .into_iter()
        .filter(|record| record_matches(record, &content))
        .collect();

    tracing::debug!("content filters kept {} of {} gists", kept.len(), before);
    kept
}
