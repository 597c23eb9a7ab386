//! Query parameter rules shared by the read routes: `fields`, `limit`, `offset`.

use crate::validation::{ParamRule, QuerySchema};
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

pub const FIELDS_PARAM: &str = "fields";
pub const LIMIT_PARAM: &str = "limit";
pub const OFFSET_PARAM: &str = "offset";

pub const FIELDS_PATTERN: &str = r"^[a-zA-Z0-9_,]+$";
pub const DEFAULT_LIMIT: u64 = 10;
pub const MIN_LIMIT: u64 = 1;
pub const MAX_LIMIT: u64 = 1000;
pub const DEFAULT_OFFSET: u64 = 0;

fn fields_regex() -> Regex {
    static FIELDS: OnceLock<Regex> = OnceLock::new();
    FIELDS
        .get_or_init(|| Regex::new(FIELDS_PATTERN).expect("fields pattern compiles"))
        .clone()
}

/// `fields`: optional, `^[a-zA-Z0-9_,]+$`, defaults to the empty string.
pub fn fields_rule() -> ParamRule {
    ParamRule::Pattern {
        regex: fields_regex(),
        default: String::new(),
    }
}

/// `limit`: integer in 1..=1000, default 10.
pub fn limit_rule() -> ParamRule {
    ParamRule::Integer {
        min: MIN_LIMIT as i64,
        max: Some(MAX_LIMIT as i64),
        default: DEFAULT_LIMIT as i64,
    }
}

/// `offset`: integer >= 0, default 0.
pub fn offset_rule() -> ParamRule {
    ParamRule::Integer {
        min: 0,
        max: None,
        default: DEFAULT_OFFSET as i64,
    }
}

/// Query schema for routes that only accept a projection.
pub fn projection_query() -> QuerySchema {
    QuerySchema::new().with(FIELDS_PARAM, fields_rule())
}

/// Query schema for paginated scans.
pub fn pagination_query() -> QuerySchema {
    projection_query()
        .with(LIMIT_PARAM, limit_rule())
        .with(OFFSET_PARAM, offset_rule())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    pub limit: u64,
    pub offset: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination {
            limit: DEFAULT_LIMIT,
            offset: DEFAULT_OFFSET,
        }
    }
}

impl Pagination {
    /// Read `limit`/`offset` from an already validated query; missing or unparsable values fall back to defaults.
    pub fn from_query(query: &HashMap<String, String>) -> Self {
        let limit = query
            .get(LIMIT_PARAM)
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_LIMIT);
        let offset = query
            .get(OFFSET_PARAM)
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_OFFSET);
        Pagination { limit, offset }
    }
}

/// The raw `fields` value, or "" when absent.
pub fn fields_param(query: &HashMap<String, String>) -> &str {
    query.get(FIELDS_PARAM).map(String::as_str).unwrap_or("")
}
