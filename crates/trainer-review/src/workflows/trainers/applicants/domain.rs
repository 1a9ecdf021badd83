use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::trainers::search::normalize;

/// Placeholder shown for any missing applicant field.
pub const MISSING_FIELD: &str = "—";

/// Identifier wrapper for applicant submissions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicantId(pub String);

impl fmt::Display for ApplicantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Review status tracked for every applicant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicantStatus {
    #[default]
    New,
    Shortlisted,
    Contacted,
    Rejected,
    Archived,
}

impl ApplicantStatus {
    pub const ALL: [ApplicantStatus; 5] = [
        ApplicantStatus::New,
        ApplicantStatus::Shortlisted,
        ApplicantStatus::Contacted,
        ApplicantStatus::Rejected,
        ApplicantStatus::Archived,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ApplicantStatus::New => "new",
            ApplicantStatus::Shortlisted => "shortlisted",
            ApplicantStatus::Contacted => "contacted",
            ApplicantStatus::Rejected => "rejected",
            ApplicantStatus::Archived => "archived",
        }
    }

    /// Case-insensitive lookup by label.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(value))
    }
}

impl fmt::Display for ApplicantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A trainer applicant as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantRecord {
    pub id: ApplicantId,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub years_experience: Option<u32>,
    #[serde(default)]
    pub cv_path: Option<String>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub status: Option<ApplicantStatus>,
}

impl ApplicantRecord {
    pub fn has_cv(&self) -> bool {
        present(&self.cv_path)
    }

    pub fn has_linkedin(&self) -> bool {
        present(&self.linkedin_url)
    }

    pub fn has_website(&self) -> bool {
        present(&self.website_url)
    }
}

/// Present means any non-empty value, whitespace included.
fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|value| !value.is_empty())
}

fn text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

fn or_missing(value: &Option<String>) -> String {
    match value.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => MISSING_FIELD.to_string(),
    }
}

/// Render a creation timestamp for tables and detail views.
pub fn format_display_date(created_at: &DateTime<Utc>) -> String {
    created_at.format("%Y-%m-%d %H:%M").to_string()
}

/// Fetched record plus the search fields derived from it.
///
/// Derived fields are computed once per fetch. Only `status` may change while
/// the row is cached; everything else is rebuilt on the next refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicantRow {
    record: ApplicantRecord,
    haystack: String,
    specialization_key: String,
    city_key: String,
    display_date: String,
    status: ApplicantStatus,
}

impl ApplicantRow {
    pub fn new(record: ApplicantRecord) -> Self {
        let experience = record
            .years_experience
            .map(|years| years.to_string())
            .unwrap_or_default();
        let haystack = normalize(
            &[
                text(&record.full_name),
                text(&record.phone),
                text(&record.email),
                text(&record.city),
                text(&record.specialization),
                text(&record.linkedin_url),
                text(&record.website_url),
                experience.as_str(),
            ]
            .join(" | "),
        );

        Self {
            haystack,
            specialization_key: normalize(text(&record.specialization)),
            city_key: normalize(text(&record.city)),
            display_date: format_display_date(&record.created_at),
            status: record.status.unwrap_or_default(),
            record,
        }
    }

    pub fn record(&self) -> &ApplicantRecord {
        &self.record
    }

    pub fn id(&self) -> &ApplicantId {
        &self.record.id
    }

    pub fn haystack(&self) -> &str {
        &self.haystack
    }

    pub fn specialization_key(&self) -> &str {
        &self.specialization_key
    }

    pub fn city_key(&self) -> &str {
        &self.city_key
    }

    pub fn display_date(&self) -> &str {
        &self.display_date
    }

    pub fn status(&self) -> ApplicantStatus {
        self.status
    }

    pub fn set_status(&mut self, status: ApplicantStatus) {
        self.status = status;
        self.record.status = Some(status);
    }

    pub fn summary_view(&self) -> ApplicantSummaryView {
        let record = &self.record;
        let contact = joined(&[&record.phone, &record.email], " | ");
        let specialization_city = joined(&[&record.specialization, &record.city], " — ");

        ApplicantSummaryView {
            id: record.id.clone(),
            date: self.display_date.clone(),
            name: or_missing(&record.full_name),
            contact,
            specialization_city,
            status: self.status.label(),
            has_cv: record.has_cv(),
            cv_path: record.cv_path.clone().filter(|path| !path.is_empty()),
        }
    }

    pub fn detail_view(&self) -> ApplicantDetailView {
        let record = &self.record;
        ApplicantDetailView {
            id: record.id.clone(),
            full_name: or_missing(&record.full_name),
            phone: or_missing(&record.phone),
            email: or_missing(&record.email),
            city: or_missing(&record.city),
            specialization: or_missing(&record.specialization),
            years_experience: record
                .years_experience
                .map(|years| years.to_string())
                .unwrap_or_else(|| MISSING_FIELD.to_string()),
            linkedin_url: or_missing(&record.linkedin_url),
            website_url: or_missing(&record.website_url),
            bio: or_missing(&record.bio),
            status: self.status.label(),
            date: self.display_date.clone(),
        }
    }
}

fn joined(parts: &[&Option<String>], separator: &str) -> String {
    let present: Vec<&str> = parts
        .iter()
        .filter_map(|part| part.as_deref())
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();

    if present.is_empty() {
        MISSING_FIELD.to_string()
    } else {
        present.join(separator)
    }
}

/// One line of the applicant table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicantSummaryView {
    pub id: ApplicantId,
    pub date: String,
    pub name: String,
    pub contact: String,
    pub specialization_city: String,
    pub status: &'static str,
    pub has_cv: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cv_path: Option<String>,
}

/// Everything known about an applicant, with placeholders for gaps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicantDetailView {
    pub id: ApplicantId,
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub city: String,
    pub specialization: String,
    pub years_experience: String,
    pub linkedin_url: String,
    pub website_url: String,
    pub bio: String,
    pub status: &'static str,
    pub date: String,
}

impl ApplicantDetailView {
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("Name: {}", self.full_name),
            format!("Phone: {}", self.phone),
            format!("Email: {}", self.email),
            format!("City: {}", self.city),
            format!("Specialization: {}", self.specialization),
            format!("Experience: {}", self.years_experience),
            format!("LinkedIn: {}", self.linkedin_url),
            format!("Website: {}", self.website_url),
            format!("Bio: {}", self.bio),
            format!("Status: {}", self.status),
            format!("Date: {}", self.date),
        ]
    }
}

/// Filtered table plus the result count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicantListView {
    pub count: usize,
    pub applicants: Vec<ApplicantSummaryView>,
}
