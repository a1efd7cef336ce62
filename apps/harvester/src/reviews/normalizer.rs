//! Review Normalizer: turns one raw review record into a flat `NormalizedReview`.
//!
//! Job title and city are resolved through the snapshot; every lookup is
//! best-effort and degrades to `None` or a fixed fallback label.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::graph::query_key::JobTitlesParams;
use crate::graph::resolver::{ref_id, ResolveError, Resolved, ResolvedExt, Resolver};
use crate::graph::value::{Record, RecordExt, Value};

pub const JOB_TITLE_NOT_FOUND: &str = "Job Title not found";
pub const EMPLOYMENT_STATUS_NOT_FOUND: &str = "Employment status not found";
/// Rendered in place of a date when the timestamp cannot be parsed.
pub const INVALID_DATE: &str = "Invalid Date";

const DISPLAY_DATE_FORMAT: &str = "%b %-d, %Y";

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmploymentStatus {
    Regular,
    Intern,
    Contract,
    PartTime,
    Freelance,
}

impl EmploymentStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "REGULAR" => Some(Self::Regular),
            "INTERN" => Some(Self::Intern),
            "CONTRACT" => Some(Self::Contract),
            "PART_TIME" => Some(Self::PartTime),
            "FREELANCE" => Some(Self::Freelance),
            _ => None,
        }
    }

    fn role_label(self) -> &'static str {
        match self {
            Self::Regular => "Employee",
            Self::Intern => "Intern",
            Self::Contract => "Contractor",
            Self::PartTime => "Employee - Part-time",
            Self::Freelance => "Freelancer",
        }
    }
}

/// Flat, serialization-ready review.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedReview {
    pub review_id: Value,
    pub date: String,
    pub job_title: Option<String>,
    pub location: Option<String>,
    pub rating: Value,
    pub employee_situation: String,
    pub length_of_employment: Value,
    pub summary: Option<String>,
    pub pros: Option<String>,
    pub cons: Option<String>,
    pub advice_to_management: Option<String>,
}

/// Typed view over a raw review record.
#[derive(Debug, Clone, Copy)]
pub struct RawReview<'a> {
    record: &'a Record,
}

impl<'a> RawReview<'a> {
    pub fn new(record: &'a Record) -> Self {
        Self { record }
    }

    pub fn is_current_job(&self) -> bool {
        self.record.bool_field("isCurrentJob").unwrap_or(false)
    }

    pub fn employment_status(&self) -> Option<&'a str> {
        self.record.str_field("employmentStatus")
    }

    pub fn employer_id(&self) -> Option<&'a str> {
        self.record.reference("employer").and_then(ref_id)
    }

    pub fn job_title_id(&self) -> Option<&'a str> {
        self.record.reference("jobTitle").and_then(ref_id)
    }

    fn text(&self, field: &str) -> Option<String> {
        self.record.str_field(field).map(str::to_string)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Normalization
// ────────────────────────────────────────────────────────────────────────────

pub fn normalize_review(resolver: &Resolver<'_>, record: &Record) -> NormalizedReview {
    let review = RawReview::new(record);

    NormalizedReview {
        review_id: record.raw_field("reviewId"),
        date: format_review_date(record.str_field("reviewDateTime")),
        job_title: resolve_job_title(resolver, &review),
        location: resolve_location(resolver, record),
        rating: record.raw_field("ratingOverall"),
        employee_situation: employee_situation(
            review.is_current_job(),
            review.employment_status(),
        ),
        length_of_employment: record.raw_field("lengthOfEmployment"),
        summary: review.text("summary"),
        pros: review.text("pros"),
        cons: review.text("cons"),
        advice_to_management: review.text("advice"),
    }
}

/// `"Current Employee"`, `"Former Contractor"`, … Total over every input.
pub fn employee_situation(is_current: bool, status: Option<&str>) -> String {
    let tenure = if is_current { "Current" } else { "Former" };
    match status.and_then(EmploymentStatus::parse) {
        Some(status) => format!("{tenure} {}", status.role_label()),
        None => EMPLOYMENT_STATUS_NOT_FOUND.to_string(),
    }
}

/// Renders a review timestamp as `"Mon D, YYYY"`. Unparseable or absent
/// input yields `INVALID_DATE` rather than an error.
pub fn format_review_date(raw: Option<&str>) -> String {
    raw.and_then(parse_timestamp)
        .map(|date| date.format(DISPLAY_DATE_FORMAT).to_string())
        .unwrap_or_else(|| INVALID_DATE.to_string())
}

fn parse_timestamp(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
}

/// review → employer id → `jobTitlesByEmployer` → entry matching the
/// review's job-title id.
fn resolve_job_title(resolver: &Resolver<'_>, review: &RawReview<'_>) -> Option<String> {
    let employer_id = review.employer_id()?;
    let job_title_id = review.job_title_id()?;
    let titles = job_titles_for(resolver, employer_id).or_log("job titles")?;
    let title = titles
        .iter()
        .filter_map(|entry| resolver.follow(entry).ok())
        .find(|entry| {
            entry.field("jobTitleId").and_then(Value::text).as_deref() == Some(job_title_id)
        })
        .and_then(|entry| entry.str_field("jobTitle"))
        .unwrap_or(JOB_TITLE_NOT_FOUND);
    Some(title.to_string())
}

fn job_titles_for<'a>(resolver: &Resolver<'a>, employer_id: &str) -> Resolved<&'a [Value]> {
    let employer_id = employer_id
        .parse::<i64>()
        .map_err(|_| ResolveError::Shape {
            at: format!("employer id '{employer_id}'"),
            expected: "numeric id",
            found: "string",
        })?;
    let key = JobTitlesParams { employer_id }.key();
    let titles = resolver.query(&key)?;
    titles
        .as_list()
        .ok_or_else(|| ResolveError::Shape {
            at: key,
            expected: "list",
            found: titles.kind(),
        })
}

fn resolve_location(resolver: &Resolver<'_>, record: &Record) -> Option<String> {
    let city = resolver.follow_field(record, "location").or_log("location")?;
    city.str_field("name").map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::store::Snapshot;
    use serde_json::json;

    fn store() -> Snapshot {
        serde_json::from_value(json!({
            "ROOT_QUERY": {
                "jobTitlesByEmployer({\"employerId\":194})": [
                    {"jobTitleId": 11, "jobTitle": "Cashier"},
                    {"__ref": "JobTitle:12"}
                ],
                "jobTitlesByEmployer({\"employerId\":300})": {"unexpected": true}
            },
            "JobTitle:12": {"jobTitleId": "12", "jobTitle": "Team Lead"},
            "City:5": {"name": "Minneapolis"}
        }))
        .unwrap()
    }

    fn raw(json: serde_json::Value) -> Record {
        match Value::from(json) {
            Value::Object(record) => record,
            other => panic!("fixture must be an object, got {other:?}"),
        }
    }

    #[test]
    fn test_employee_situation_label_table() {
        let table = [
            ("REGULAR", "Employee"),
            ("INTERN", "Intern"),
            ("CONTRACT", "Contractor"),
            ("PART_TIME", "Employee - Part-time"),
            ("FREELANCE", "Freelancer"),
        ];
        for (status, label) in table {
            assert_eq!(employee_situation(true, Some(status)), format!("Current {label}"));
            assert_eq!(employee_situation(false, Some(status)), format!("Former {label}"));
        }
    }

    #[test]
    fn test_employee_situation_unknown_status() {
        assert_eq!(employee_situation(true, Some("VOLUNTEER")), EMPLOYMENT_STATUS_NOT_FOUND);
        assert_eq!(employee_situation(false, None), EMPLOYMENT_STATUS_NOT_FOUND);
        assert_eq!(employee_situation(true, Some("regular")), EMPLOYMENT_STATUS_NOT_FOUND);
    }

    #[test]
    fn test_current_contractor_example() {
        let store = store();
        let resolver = Resolver::new(&store);
        let review = raw(json!({"isCurrentJob": true, "employmentStatus": "CONTRACT"}));
        assert_eq!(
            normalize_review(&resolver, &review).employee_situation,
            "Current Contractor"
        );
    }

    #[test]
    fn test_format_review_date_variants() {
        assert_eq!(format_review_date(Some("2023-05-07T10:22:33.123")), "May 7, 2023");
        assert_eq!(format_review_date(Some("2021-12-25T08:00:00")), "Dec 25, 2021");
        assert_eq!(format_review_date(Some("2020-01-31T23:00:00Z")), "Jan 31, 2020");
        assert_eq!(format_review_date(Some("2019-02-03")), "Feb 3, 2019");
    }

    #[test]
    fn test_format_review_date_fails_closed() {
        assert_eq!(format_review_date(Some("yesterday")), INVALID_DATE);
        assert_eq!(format_review_date(Some("")), INVALID_DATE);
        assert_eq!(format_review_date(None), INVALID_DATE);
    }

    #[test]
    fn test_full_review_is_resolved() {
        let store = store();
        let resolver = Resolver::new(&store);
        let review = raw(json!({
            "reviewId": 81234,
            "reviewDateTime": "2024-03-09T14:05:00.000",
            "ratingOverall": 4,
            "isCurrentJob": false,
            "employmentStatus": "PART_TIME",
            "lengthOfEmployment": 2,
            "summary": "Fine place",
            "pros": "People",
            "cons": "Hours",
            "advice": "Listen more",
            "employer": {"__ref": "Employer:194"},
            "jobTitle": {"__ref": "JobTitle:12"},
            "location": {"__ref": "City:5"}
        }));
        let normalized = normalize_review(&resolver, &review);
        assert_eq!(
            normalized,
            NormalizedReview {
                review_id: Value::Number(81234.into()),
                date: "Mar 9, 2024".to_string(),
                job_title: Some("Team Lead".to_string()),
                location: Some("Minneapolis".to_string()),
                rating: Value::Number(4.into()),
                employee_situation: "Former Employee - Part-time".to_string(),
                length_of_employment: Value::Number(2.into()),
                summary: Some("Fine place".to_string()),
                pros: Some("People".to_string()),
                cons: Some("Hours".to_string()),
                advice_to_management: Some("Listen more".to_string()),
            }
        );
    }

    #[test]
    fn test_scalars_pass_through_with_their_page_type() {
        let store = store();
        let resolver = Resolver::new(&store);
        let review = raw(json!({
            "reviewId": "r-81234",
            "ratingOverall": 3.5,
            "lengthOfEmployment": "3 years"
        }));
        let json = serde_json::to_value(normalize_review(&resolver, &review)).unwrap();
        assert_eq!(json["reviewId"], "r-81234");
        assert_eq!(json["rating"], 3.5);
        assert_eq!(json["lengthOfEmployment"], "3 years");
        assert!(json["summary"].is_null());
    }

    #[test]
    fn test_job_title_matches_numeric_id_against_reference_id() {
        let store = store();
        let resolver = Resolver::new(&store);
        let review = raw(json!({
            "employer": {"__ref": "Employer:194"},
            "jobTitle": {"__ref": "JobTitle:11"}
        }));
        assert_eq!(
            normalize_review(&resolver, &review).job_title.as_deref(),
            Some("Cashier")
        );
    }

    #[test]
    fn test_job_title_fallbacks() {
        let store = store();
        let resolver = Resolver::new(&store);

        let unmatched = raw(json!({
            "employer": {"__ref": "Employer:194"},
            "jobTitle": {"__ref": "JobTitle:999"}
        }));
        assert_eq!(
            normalize_review(&resolver, &unmatched).job_title.as_deref(),
            Some(JOB_TITLE_NOT_FOUND)
        );

        let no_employer = raw(json!({"jobTitle": {"__ref": "JobTitle:11"}}));
        assert_eq!(normalize_review(&resolver, &no_employer).job_title, None);

        let no_job_title = raw(json!({"employer": {"__ref": "Employer:194"}}));
        assert_eq!(normalize_review(&resolver, &no_job_title).job_title, None);

        let uncached = raw(json!({
            "employer": {"__ref": "Employer:7"},
            "jobTitle": {"__ref": "JobTitle:11"}
        }));
        assert_eq!(normalize_review(&resolver, &uncached).job_title, None);

        let wrong_shape = raw(json!({
            "employer": {"__ref": "Employer:300"},
            "jobTitle": {"__ref": "JobTitle:11"}
        }));
        assert_eq!(normalize_review(&resolver, &wrong_shape).job_title, None);
    }

    #[test]
    fn test_missing_city_is_none() {
        let store = store();
        let resolver = Resolver::new(&store);
        let review = raw(json!({"location": {"__ref": "City:404"}}));
        assert_eq!(normalize_review(&resolver, &review).location, None);
        let review = raw(json!({"location": null}));
        assert_eq!(normalize_review(&resolver, &review).location, None);
    }

    #[test]
    fn test_empty_record_normalizes_without_panicking() {
        let store = Snapshot::default();
        let resolver = Resolver::new(&store);
        let normalized = normalize_review(&resolver, &Record::new());
        assert!(normalized.review_id.is_null());
        assert_eq!(normalized.date, INVALID_DATE);
        assert_eq!(normalized.employee_situation, EMPLOYMENT_STATUS_NOT_FOUND);
    }
}
