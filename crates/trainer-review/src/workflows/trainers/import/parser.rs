use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};
use std::io::Read;

use super::ApplicantImportError;
use crate::workflows::trainers::applicants::domain::{ApplicantId, ApplicantRecord, ApplicantStatus};

pub(crate) fn parse_records<R: Read>(
    reader: R,
) -> Result<Vec<ApplicantRecord>, ApplicantImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for row in csv_reader.deserialize::<ExportRow>() {
        records.push(row?.into_record()?);
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct ExportRow {
    id: String,
    created_at: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    full_name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    phone: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    email: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    city: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    specialization: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    years_experience: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    cv_path: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    status: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    linkedin_url: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    website_url: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    bio: Option<String>,
}

impl ExportRow {
    fn into_record(self) -> Result<ApplicantRecord, ApplicantImportError> {
        let created_at =
            parse_datetime(&self.created_at).ok_or_else(|| ApplicantImportError::InvalidTimestamp {
                id: self.id.clone(),
                value: self.created_at.clone(),
            })?;

        Ok(ApplicantRecord {
            id: ApplicantId(self.id),
            created_at,
            full_name: self.full_name,
            phone: self.phone,
            email: self.email,
            city: self.city,
            specialization: self.specialization,
            // Non-numeric experience stays absent rather than becoming zero.
            years_experience: self
                .years_experience
                .and_then(|value| value.parse::<u32>().ok()),
            cv_path: self.cv_path,
            linkedin_url: self.linkedin_url,
            website_url: self.website_url,
            bio: self.bio,
            status: self.status.as_deref().and_then(ApplicantStatus::parse),
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
