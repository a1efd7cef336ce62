//! Award Range Extractor: resolves a year to the snapshot key holding that
//! year's ranked items.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::graph::query_key::AwardDetailParams;
use crate::graph::resolver::{ResolvedExt, Resolver};
use crate::session::{NavigateOptions, PageState, Session};

/// First year the award was published.
pub const FIRST_AWARD_YEAR: i32 = 2009;

const KEY_DELIMITER: char = ':';

/// `range: None` means "no award data for this year"; it is not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AwardRangeDescriptor {
    pub range: Option<String>,
    pub year: Option<i32>,
}

impl AwardRangeDescriptor {
    fn empty(year: Option<i32>) -> Self {
        Self { range: None, year }
    }
}

/// Parses the requested year. Empty input means the current year.
pub fn parse_award_year(input: &str, current_year: i32) -> Result<i32, AppError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(current_year);
    }
    let year: i32 = input
        .parse()
        .map_err(|_| AppError::Validation(format!("Award year must be numeric, got '{input}'")))?;
    if !(FIRST_AWARD_YEAR..=current_year).contains(&year) {
        return Err(AppError::Validation(format!(
            "Award year must be between {FIRST_AWARD_YEAR} and {current_year}, got {year}"
        )));
    }
    Ok(year)
}

/// The listing page for `year`. The current edition lives at an unqualified
/// address; past editions carry the year.
pub fn award_address(base_url: &str, year: i32, current_year: i32) -> String {
    if year == current_year {
        format!("{base_url}/Award/Best-Places-to-Work-LST_KQ0,19.htm")
    } else {
        format!("{base_url}/Award/Best-Places-to-Work-{year}-LST_KQ0,24.htm")
    }
}

/// Cache key of the award detail query for `year`.
pub fn award_detail_key(year: i32, current_year: i32) -> String {
    let edition = (year != current_year).then_some(year);
    AwardDetailParams::best_places_to_work(edition).key()
}

/// Turns an award detail reference into its range key: drop the type prefix,
/// then replace the next delimiter with a hyphen.
/// `AwardDetail:2845:1` → `2845-1`.
pub fn range_key(reference: &str) -> Option<String> {
    let (_, rest) = reference.split_once(KEY_DELIMITER)?;
    Some(rest.replacen(KEY_DELIMITER, "-", 1))
}

/// Reads the range key for `year` out of an award page snapshot.
pub fn read_award_range(page: &PageState, year: i32, current_year: i32) -> Option<String> {
    let key = award_detail_key(year, current_year);
    let resolver = Resolver::new(&page.apollo_state);
    let reference = resolver.query_reference(&key).or_log("award detail")?;
    range_key(reference)
}

/// Validates `input`, visits the matching award page and extracts the range.
/// Returns the page the range was read from so items are resolved against
/// the same snapshot. Invalid years are rejected without navigating.
pub async fn fetch_award_range(
    session: &Session,
    base_url: &str,
    input: &str,
    current_year: i32,
    options: NavigateOptions,
) -> (AwardRangeDescriptor, Option<Arc<PageState>>) {
    let year = match parse_award_year(input, current_year) {
        Ok(year) => year,
        Err(e) => {
            warn!("{e}");
            return (AwardRangeDescriptor::empty(input.trim().parse().ok()), None);
        }
    };

    let address = award_address(base_url, year, current_year);
    let page = session.visit(&address, options).await;
    let range = read_award_range(&page, year, current_year);
    info!("Award range for {year}: {range:?}");

    let descriptor = AwardRangeDescriptor {
        range,
        year: Some(year),
    };
    (descriptor, Some(page))
}
