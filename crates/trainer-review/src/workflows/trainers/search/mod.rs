//! Search box interpretation and the local row filter.
//!
//! Both halves are pure: the parser turns a raw search string into a
//! [`SearchQuery`] and the filter evaluates an [`ApplicantFilter`] against an
//! already-fetched slice of rows.

pub mod filter;
mod normalizer;
pub mod query;

pub use filter::{apply_filters, matches, ApplicantFilter, FilteredApplicants};
pub use normalizer::normalize;
pub use query::{classify_token, parse_search, SearchQuery, SearchToken, TraitFlag, TraitKind};
