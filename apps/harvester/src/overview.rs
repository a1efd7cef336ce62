//! Employer overview: the profile card of a single employer page.

use serde::Serialize;
use tracing::info;

use crate::graph::resolver::{ResolvedExt, Resolver};
use crate::graph::value::{Record, RecordExt, Value};
use crate::session::{NavigateOptions, PageState, Session, WaitCondition};

/// Releases at this version keep the employer id under the parsed request
/// instead of at the top of the initial state.
const PARSED_REQUEST_APP_VERSION: &str = "2.4.13";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployerOverview {
    pub id: Value,
    pub short_name: Option<String>,
    pub reviews_url: Option<String>,
    pub website: Option<String>,
    #[serde(rename = "type")]
    pub employer_type: Option<String>,
    pub revenue: Option<String>,
    pub headquarters: Option<String>,
    pub size: Option<String>,
    pub stock: Option<String>,
    pub year_founded: Value,
    pub industry_name: Option<String>,
    pub description: Option<String>,
    pub mission: Option<String>,
    pub app_version: Option<String>,
}

/// The employer id the page was rendered for, as text.
pub fn employer_id(page: &PageState) -> Option<String> {
    let initial = page.initial_state.as_object()?;
    let id = if page.app_version.as_deref() == Some(PARSED_REQUEST_APP_VERSION) {
        initial.path(&["parsedRequest", "params", "employerId"])
    } else {
        initial.field("employerId")
    };
    id.and_then(Value::text)
}

fn owned(record: &Record, name: &str) -> Option<String> {
    record.str_field(name).map(str::to_string)
}

/// Reads the overview from an employer page snapshot. `None` when the page
/// carries no employer id or the employer record is absent.
pub fn read_overview(page: &PageState) -> Option<EmployerOverview> {
    let id = employer_id(page)?;
    let resolver = Resolver::new(&page.apollo_state);
    let employer = resolver
        .lookup(&format!("Employer:{id}"))
        .or_log("employer")?;

    let links = resolver.follow_field(employer, "links").or_log("employer links");
    let industry = resolver
        .follow_field(employer, "primaryIndustry")
        .or_log("primary industry");
    let overview = resolver
        .follow_field(employer, "overview")
        .or_log("employer overview");

    Some(EmployerOverview {
        id: employer.raw_field("id"),
        short_name: owned(employer, "shortName"),
        reviews_url: links.and_then(|l| owned(l, "reviewsUrl")),
        website: owned(employer, "website"),
        employer_type: owned(employer, "type"),
        revenue: owned(employer, "revenue"),
        headquarters: owned(employer, "headquarters"),
        size: owned(employer, "size"),
        stock: owned(employer, "stock"),
        year_founded: employer.raw_field("yearFounded"),
        industry_name: industry.and_then(|i| owned(i, "industryName")),
        description: overview.and_then(|o| owned(o, "description")),
        mission: overview.and_then(|o| owned(o, "mission")),
        app_version: page.app_version.clone(),
    })
}

/// Visits an employer overview page and reads its profile.
pub async fn fetch_overview(session: &Session, address: &str) -> Option<EmployerOverview> {
    let page = session
        .visit(address, NavigateOptions::unbounded(WaitCondition::Load))
        .await;
    let overview = read_overview(&page);
    info!(
        "Overview for {address}: {}",
        overview
            .as_ref()
            .and_then(|o| o.short_name.as_deref())
            .unwrap_or("<not found>")
    );
    overview
}
