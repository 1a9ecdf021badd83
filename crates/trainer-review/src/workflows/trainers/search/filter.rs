use serde::Serialize;

use super::normalizer::normalize;
use super::query::{parse_search, SearchQuery};
use crate::workflows::trainers::applicants::domain::{
    ApplicantListView, ApplicantRow, ApplicantStatus,
};

/// Complete filter state. All active criteria are AND-combined.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApplicantFilter {
    pub search: SearchQuery,
    /// Substring match against the normalized specialization. Empty = no filter.
    pub specialization: String,
    /// Substring match against the normalized city. Empty = no filter.
    pub city: String,
    pub status: Option<ApplicantStatus>,
}

impl ApplicantFilter {
    /// Build a filter from the raw search box and plain field inputs.
    pub fn from_inputs(
        search_box: &str,
        specialization: &str,
        city: &str,
        status: Option<ApplicantStatus>,
    ) -> Self {
        Self {
            search: parse_search(search_box),
            specialization: specialization.to_string(),
            city: city.to_string(),
            status,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.search.is_empty()
            && self.specialization.trim().is_empty()
            && self.city.trim().is_empty()
            && self.status.is_none()
    }

    fn prepared(&self) -> PreparedFilter<'_> {
        PreparedFilter {
            filter: self,
            text: normalize(&self.search.free_text),
            specialization: normalize(&self.specialization),
            city: normalize(&self.city),
        }
    }
}

/// Filter inputs normalized once per pass instead of once per row.
struct PreparedFilter<'f> {
    filter: &'f ApplicantFilter,
    text: String,
    specialization: String,
    city: String,
}

impl PreparedFilter<'_> {
    fn matches(&self, row: &ApplicantRow) -> bool {
        let search = &self.filter.search;
        let record = row.record();

        if let Some(status) = self.filter.status {
            if row.status() != status {
                return false;
            }
        }

        if !self.specialization.is_empty()
            && !row.specialization_key().contains(&self.specialization)
        {
            return false;
        }
        if !self.city.is_empty() && !row.city_key().contains(&self.city) {
            return false;
        }
        if !self.text.is_empty() && !row.haystack().contains(&self.text) {
            return false;
        }

        if !search.has_cv.admits(record.has_cv())
            || !search.has_linkedin.admits(record.has_linkedin())
            || !search.has_website.admits(record.has_website())
        {
            return false;
        }

        // Records without experience never satisfy a bound.
        if let Some(min) = search.exp_min {
            match record.years_experience {
                Some(years) if years >= min => {}
                _ => return false,
            }
        }
        if let Some(max) = search.exp_max {
            match record.years_experience {
                Some(years) if years <= max => {}
                _ => return false,
            }
        }

        true
    }
}

/// Rows that passed the filter, in their original order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredApplicants<'a> {
    pub rows: Vec<&'a ApplicantRow>,
}

impl FilteredApplicants<'_> {
    pub fn count(&self) -> usize {
        self.rows.len()
    }

    pub fn list_view(&self) -> ApplicantListView {
        ApplicantListView {
            count: self.count(),
            applicants: self.rows.iter().map(|row| row.summary_view()).collect(),
        }
    }
}

/// Apply the filter to a snapshot of rows. Pure and order preserving.
pub fn apply_filters<'a>(
    rows: &'a [ApplicantRow],
    filter: &ApplicantFilter,
) -> FilteredApplicants<'a> {
    if filter.is_empty() {
        return FilteredApplicants {
            rows: rows.iter().collect(),
        };
    }

    let prepared = filter.prepared();
    FilteredApplicants {
        rows: rows.iter().filter(|row| prepared.matches(row)).collect(),
    }
}

/// Check a single row against every active criterion.
pub fn matches(row: &ApplicantRow, filter: &ApplicantFilter) -> bool {
    filter.prepared().matches(row)
}
