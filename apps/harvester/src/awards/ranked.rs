//! Ranked-Item Resolver: two-hop resolution of an award range into flat
//! `RankedItem`s: item reference → ranked review → employer.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::awards::range::AwardRangeDescriptor;
use crate::graph::fanout::fan_out;
use crate::graph::resolver::{ResolvedExt, Resolver};
use crate::graph::value::{RecordExt, Value};
use crate::session::PageState;

/// Stands in for the employer name when the employer record is absent.
pub const EMPLOYER_NOT_FOUND: &str = "Employer not found";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedItem {
    pub year: i32,
    pub employer: String,
    pub review_id: Value,
    pub review_snippet: Option<String>,
    pub rank: Value,
    pub rating: Value,
}

/// An item reference from a range, stamped with the year it was listed for.
#[derive(Debug, Clone)]
struct StampedItem {
    item: Value,
    year: i32,
}

/// Reads the item references stored at `range`.
fn read_range_items(page: &PageState, range: &str, year: i32) -> Vec<StampedItem> {
    let resolver = Resolver::new(&page.apollo_state);
    let items = resolver
        .lookup(range)
        .and_then(|record| resolver.list_field(record, "items"));
    match items {
        Ok(items) => items
            .iter()
            .cloned()
            .map(|item| StampedItem { item, year })
            .collect(),
        Err(e) => {
            warn!("No items for award range '{range}': {e}");
            Vec::new()
        }
    }
}

/// Resolves one stamped item. Never fails: missing hops leave placeholder
/// or `None` fields.
pub fn resolve_ranked_item(resolver: &Resolver<'_>, item: &Value, year: i32) -> RankedItem {
    let Some(ranked) = resolver.follow(item).or_log("ranked item") else {
        return RankedItem {
            year,
            employer: EMPLOYER_NOT_FOUND.to_string(),
            review_id: Value::Null,
            review_snippet: None,
            rank: Value::Null,
            rating: Value::Null,
        };
    };

    let employer = resolver
        .follow_field(ranked, "employer")
        .or_log("ranked employer")
        .and_then(|employer| employer.str_field("shortName"))
        .unwrap_or(EMPLOYER_NOT_FOUND);

    RankedItem {
        year,
        employer: employer.to_string(),
        review_id: ranked.raw_field("id"),
        review_snippet: ranked.str_field("featuredReviewSnippet").map(str::to_string),
        rank: ranked.raw_field("listRank"),
        rating: ranked.raw_field("rating"),
    }
}

/// Resolves every item in the descriptor's range concurrently. Output keeps
/// the range's list order. `None` when the descriptor carries no range.
pub async fn resolve_ranked_items(
    page: Arc<PageState>,
    descriptor: &AwardRangeDescriptor,
) -> Option<Vec<RankedItem>> {
    let (Some(range), Some(year)) = (descriptor.range.as_deref(), descriptor.year) else {
        return None;
    };

    let items = read_range_items(&page, range, year);
    let resolved: Vec<RankedItem> = fan_out(items, move |stamped| {
        let page = Arc::clone(&page);
        async move {
            let resolver = Resolver::new(&page.apollo_state);
            resolve_ranked_item(&resolver, &stamped.item, stamped.year)
        }
    })
    .await
    .into_iter()
    .flatten()
    .collect();

    info!("Resolved {} ranked items for {year}", resolved.len());
    Some(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page() -> Arc<PageState> {
        Arc::new(
            PageState::from_json(json!({
                "apolloState": {
                    "900-26": {"items": [
                        {"__ref": "AwardListItem:1"},
                        {"__ref": "AwardListItem:2"},
                        {"__ref": "AwardListItem:3"}
                    ]},
                    "AwardListItem:1": {
                        "id": 1001,
                        "featuredReviewSnippet": "Great culture",
                        "listRank": 1,
                        "rating": 4.8,
                        "employer": {"__ref": "Employer:10"}
                    },
                    "AwardListItem:2": {
                        "id": 1002,
                        "featuredReviewSnippet": "Good pay",
                        "listRank": 2,
                        "rating": 4.7,
                        "employer": {"__ref": "Employer:404"}
                    },
                    "AwardListItem:3": {
                        "id": 1003,
                        "listRank": 3,
                        "employer": {"__ref": "Employer:10"}
                    },
                    "Employer:10": {"shortName": "Acme"}
                }
            }))
            .unwrap(),
        )
    }

    fn num(n: i64) -> Value {
        Value::Number(n.into())
    }

    fn descriptor(range: &str, year: i32) -> AwardRangeDescriptor {
        AwardRangeDescriptor {
            range: Some(range.to_string()),
            year: Some(year),
        }
    }

    #[tokio::test]
    async fn test_null_range_propagates_none() {
        let empty = AwardRangeDescriptor {
            range: None,
            year: Some(2020),
        };
        assert_eq!(resolve_ranked_items(page(), &empty).await, None);
    }

    #[tokio::test]
    async fn test_items_keep_list_order_and_year_stamp() {
        let items = resolve_ranked_items(page(), &descriptor("900-26", 2026))
            .await
            .unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(
            items.iter().map(|i| i.rank.clone()).collect::<Vec<_>>(),
            vec![num(1), num(2), num(3)]
        );
        assert!(items.iter().all(|i| i.year == 2026));
        assert_eq!(items[0].employer, "Acme");
        assert_eq!(items[0].review_id, num(1001));
        assert_eq!(items[0].review_snippet.as_deref(), Some("Great culture"));
        assert_eq!(items[2].review_snippet, None);
        assert!(items[2].rating.is_null());
    }

    #[tokio::test]
    async fn test_missing_employer_gets_placeholder_not_aborted_batch() {
        let items = resolve_ranked_items(page(), &descriptor("900-26", 2026))
            .await
            .unwrap();
        assert_eq!(items[0].employer, "Acme");
        assert_eq!(items[1].employer, EMPLOYER_NOT_FOUND);
        assert_eq!(items[1].review_id, num(1002));
        assert_eq!(items[1].rank, num(2));
    }

    #[tokio::test]
    async fn test_unknown_range_yields_empty_list() {
        let items = resolve_ranked_items(page(), &descriptor("1-1", 2020))
            .await
            .unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_dangling_item_reference_is_placeholder() {
        let page = page();
        let resolver = Resolver::new(&page.apollo_state);
        let item = Value::Reference("AwardListItem:99".to_string());
        let ranked = resolve_ranked_item(&resolver, &item, 2021);
        assert_eq!(ranked.year, 2021);
        assert_eq!(ranked.employer, EMPLOYER_NOT_FOUND);
        assert!(ranked.review_id.is_null());
    }

    #[test]
    fn test_ranked_item_serializes_with_camel_case_names() {
        let page = page();
        let resolver = Resolver::new(&page.apollo_state);
        let item = Value::Reference("AwardListItem:1".to_string());
        let json = serde_json::to_value(resolve_ranked_item(&resolver, &item, 2026)).unwrap();
        assert_eq!(
            json,
            json!({
                "year": 2026,
                "employer": "Acme",
                "reviewId": 1001,
                "reviewSnippet": "Great culture",
                "rank": 1,
                "rating": 4.8
            })
        );
    }
}
