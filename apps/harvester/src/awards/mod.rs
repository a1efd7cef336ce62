// Best Places to Work rankings: year → award range → ranked items.

pub mod range;
pub mod ranked;

use chrono::{Datelike, Local};

use crate::config::Config;
use crate::session::{NavigateOptions, Session};

use self::range::fetch_award_range;
use self::ranked::{resolve_ranked_items, RankedItem};

/// Fetches the ranked employers for `year_input` (empty = current year).
/// `None` when the year is invalid or the page has no award data.
pub async fn fetch_award_rankings(
    session: &Session,
    config: &Config,
    year_input: &str,
) -> Option<Vec<RankedItem>> {
    award_rankings(
        session,
        &config.site_base_url,
        year_input,
        Local::now().year(),
        NavigateOptions::bounded(config.nav_timeout),
    )
    .await
}

/// Range and items are both read from the one snapshot the award visit
/// returned.
async fn award_rankings(
    session: &Session,
    base_url: &str,
    year_input: &str,
    current_year: i32,
    options: NavigateOptions,
) -> Option<Vec<RankedItem>> {
    let (descriptor, page) =
        fetch_award_range(session, base_url, year_input, current_year, options).await;
    resolve_ranked_items(page?, &descriptor).await
}
