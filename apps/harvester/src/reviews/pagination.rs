//! Pagination Aggregator: walks review pages in order and concatenates
//! their normalized reviews.
//!
//! Flow per page: visit `…_P{n}.htm` → read the cached `employerReviews`
//! result → normalize each review concurrently → append in original order.
//! Pages are strictly sequential because the session holds one page at a time.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::watch;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::graph::fanout::fan_out;
use crate::graph::query_key::EmployerReviewsParams;
use crate::graph::resolver::{Resolved, ResolvedExt, Resolver};
use crate::graph::value::{Record, RecordExt, Value};
use crate::reviews::normalizer::{normalize_review, NormalizedReview};
use crate::session::{NavigateOptions, PageState, Session, WaitCondition};

/// Inserts the `_P{n}` page suffix before the template's file extension:
/// `…/Acme-Reviews-E1.htm` → `…/Acme-Reviews-E1_P3.htm`.
pub fn create_review_url(template: &str, page: u32) -> String {
    match template.rfind('.') {
        Some(dot) => format!("{}_P{page}{}", &template[..dot], &template[dot..]),
        None => format!("{template}_P{page}"),
    }
}

/// Parses a caller-supplied page count. Must be a positive integer.
pub fn parse_page_count(input: &str) -> Result<u32, AppError> {
    let input = input.trim();
    match input.parse::<u32>() {
        Ok(0) => Err(AppError::Validation(
            "Page count must be at least 1".to_string(),
        )),
        Ok(count) => Ok(count),
        Err(_) => Err(AppError::Validation(format!(
            "Page count must be a positive whole number, got '{input}'"
        ))),
    }
}

/// Reads the raw reviews cached for `page_num` on the current page state.
/// Entries may be inline or references; unresolvable ones are dropped.
pub fn read_page_reviews(page: &PageState, page_num: u32, page_size: u32) -> Vec<Record> {
    let (employer_id, profile_id) = match page.initial_state.as_object() {
        Some(initial) => (initial.raw_field("employerId"), initial.raw_field("profileId")),
        None => (Value::Null, Value::Null),
    };
    let key = EmployerReviewsParams::listing(employer_id, profile_id, page_num, page_size).key();

    let resolver = Resolver::new(&page.apollo_state);
    let reviews = cached_reviews(&resolver, &key).or_log("review listing");
    reviews
        .map(|items| {
            resolver
                .follow_all(items)
                .into_iter()
                .flatten()
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}

fn cached_reviews<'a>(resolver: &Resolver<'a>, key: &str) -> Resolved<&'a [Value]> {
    let listing = resolver.follow(resolver.query(key)?)?;
    resolver.list_field(listing, "reviews")
}

/// Normalizes one page's reviews concurrently; output follows input order.
pub async fn normalize_page(
    page: Arc<PageState>,
    raw_reviews: Vec<Record>,
) -> Vec<NormalizedReview> {
    fan_out(raw_reviews, move |record| {
        let page = Arc::clone(&page);
        async move {
            let resolver = Resolver::new(&page.apollo_state);
            normalize_review(&resolver, &record)
        }
    })
    .await
    .into_iter()
    .flatten()
    .collect()
}

/// Fetches and normalizes pages `1..=page_count` of a review listing.
///
/// A page that fails to load contributes whatever the stale snapshot holds
/// for it (normally nothing). Setting `cancel` stops the run before the next
/// page; reviews gathered so far are returned.
pub async fn fetch_reviews(
    session: &Session,
    base_url: &str,
    page_count: u32,
    page_size: u32,
    cancel: &watch::Receiver<bool>,
) -> Vec<NormalizedReview> {
    let mut all_reviews = Vec::new();

    for page_num in 1..=page_count {
        if *cancel.borrow() {
            warn!("Review run cancelled before page {page_num}/{page_count}");
            break;
        }

        let started = Instant::now();
        let address = create_review_url(base_url, page_num);
        let page = session
            .visit(&address, NavigateOptions::unbounded(WaitCondition::DomContentLoaded))
            .await;

        let raw_reviews = read_page_reviews(&page, page_num, page_size);
        let normalized = normalize_page(page, raw_reviews).await;
        info!(
            "Page {page_num}/{page_count}: {} reviews in {}ms",
            normalized.len(),
            started.elapsed().as_millis()
        );
        all_reviews.extend(normalized);
    }

    all_reviews
}
