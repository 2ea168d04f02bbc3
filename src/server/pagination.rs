use serde::Deserialize;

use super::{deserializers::deserialize_lenient_i64, error::ApiError};

pub const QUESTIONS_PER_PAGE: i64 = 10;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    #[serde(deserialize_with = "deserialize_lenient_i64")]
    pub page: Option<i64>,
}

/// A validated 1-based page of `QUESTIONS_PER_PAGE` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page(i64);

impl Page {
    pub fn new(page: i64) -> Result<Self, ApiError> {
        if page < 1 {
            return Err(ApiError::BadRequest(format!("page must be at least 1, got {page}")));
        }
        Ok(Page(page))
    }

    pub fn number(self) -> i64 {
        self.0
    }

    pub fn offset(self) -> i64 {
        (self.0 - 1).saturating_mul(QUESTIONS_PER_PAGE)
    }

    pub fn limit(self) -> i64 {
        QUESTIONS_PER_PAGE
    }
}

impl TryFrom<PageQuery> for Page {
    type Error = ApiError;

    fn try_from(query: PageQuery) -> Result<Self, Self::Error> {
        Page::new(query.page.unwrap_or(1))
    }
}
