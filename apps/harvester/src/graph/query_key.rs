//! Query Key Canonicalizer: builds `name(<json>)` keys for cached query results.
//!
//! Lookups inside `ROOT_QUERY` are exact string matches, so the parameter
//! structs below declare their fields in the order the page itself serializes
//! them. serde emits struct fields in declaration order and never drops `None`
//! unless told to, which is the contract the cache keys rely on.

use serde::Serialize;

use crate::graph::value::Value;

/// Renders a query key. Total over the param types in this module.
pub fn query_key<P: Serialize>(name: &str, params: &P) -> String {
    let json = serde_json::to_string(params).unwrap_or_default();
    format!("{name}({json})")
}

// ────────────────────────────────────────────────────────────────────────────
// employerReviews
// ────────────────────────────────────────────────────────────────────────────

pub const EMPLOYER_REVIEWS: &str = "employerReviews";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployerFilter {
    pub id: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationFilter {
    pub city_id: Option<i64>,
    pub country_id: Option<i64>,
    pub metro_id: Option<i64>,
    pub state_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageParams {
    pub num: u32,
    pub size: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployerReviewsParams {
    pub apply_default_criteria: bool,
    pub division: Option<String>,
    pub dynamic_profile_id: Value,
    pub employer: EmployerFilter,
    pub employment_statuses: Vec<String>,
    pub goc: Option<String>,
    pub highlight: Option<String>,
    pub job_title: Option<String>,
    pub language: String,
    pub location: LocationFilter,
    pub only_current_employees: bool,
    pub page: PageParams,
    pub preferred_tld_id: u32,
    pub sort: String,
    pub worldwide_filter: bool,
}

impl EmployerReviewsParams {
    /// The default, unfiltered review listing the reviews page caches on load.
    /// Ids are taken as the page stores them: a string id stays quoted.
    pub fn listing(
        employer_id: Value,
        profile_id: Value,
        page_num: u32,
        page_size: u32,
    ) -> Self {
        Self {
            apply_default_criteria: true,
            division: None,
            dynamic_profile_id: profile_id,
            employer: EmployerFilter { id: employer_id },
            employment_statuses: Vec::new(),
            goc: None,
            highlight: None,
            job_title: None,
            language: "eng".to_string(),
            location: LocationFilter::default(),
            only_current_employees: false,
            page: PageParams {
                num: page_num,
                size: page_size,
            },
            preferred_tld_id: 0,
            sort: "RELEVANCE".to_string(),
            worldwide_filter: false,
        }
    }

    pub fn key(&self) -> String {
        query_key(EMPLOYER_REVIEWS, self)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// jobTitlesByEmployer
// ────────────────────────────────────────────────────────────────────────────

pub const JOB_TITLES_BY_EMPLOYER: &str = "jobTitlesByEmployer";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobTitlesParams {
    pub employer_id: i64,
}

impl JobTitlesParams {
    pub fn key(&self) -> String {
        query_key(JOB_TITLES_BY_EMPLOYER, self)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// awardDetail
// ────────────────────────────────────────────────────────────────────────────

pub const AWARD_DETAIL: &str = "awardDetail";
const AWARD_NAME: &str = "Best Places to Work";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AwardDetailParams {
    pub award_name: String,
}

impl AwardDetailParams {
    /// `None` is the current edition. Both forms carry a trailing space,
    /// matching the name the award page caches under.
    pub fn best_places_to_work(year: Option<i32>) -> Self {
        let award_name = match year {
            Some(year) => format!("{AWARD_NAME} {year} "),
            None => format!("{AWARD_NAME} "),
        };
        Self { award_name }
    }

    pub fn key(&self) -> String {
        query_key(AWARD_DETAIL, self)
    }
}
