use chrono::{TimeZone, Utc};
use trainer_review::workflows::trainers::applicants::{
    ApplicantId, ApplicantRecord, ApplicantRow, ApplicantStatus,
};
use trainer_review::workflows::trainers::search::{
    apply_filters, classify_token, parse_search, ApplicantFilter, SearchToken, TraitFlag,
};

fn applicant(id: &str, cv_path: Option<&str>, years_experience: Option<u32>) -> ApplicantRow {
    ApplicantRow::new(ApplicantRecord {
        id: ApplicantId(id.to_string()),
        created_at: Utc
            .with_ymd_and_hms(2025, 7, 1, 10, 0, 0)
            .single()
            .expect("valid timestamp"),
        full_name: Some(format!("محمد {id}")),
        phone: None,
        email: None,
        city: Some("الرياض".to_string()),
        specialization: Some("Nutrition".to_string()),
        years_experience,
        cv_path: cv_path.map(str::to_string),
        linkedin_url: None,
        website_url: Some(format!("https://{id}.example.com")),
        bio: None,
        status: Some(ApplicantStatus::New),
    })
}

fn ids(rows: &[&ApplicantRow]) -> Vec<String> {
    rows.iter().map(|row| row.id().0.clone()).collect()
}

#[test]
fn search_box_example_from_operators() {
    let query = parse_search("cv:yes li:no exp:3-8 محمد");
    assert_eq!(query.free_text, "محمد");
    assert_eq!(query.has_cv, TraitFlag::Yes);
    assert_eq!(query.has_linkedin, TraitFlag::No);
    assert_eq!((query.exp_min, query.exp_max), (Some(3), Some(8)));
}

#[test]
fn bound_tokens_target_separate_fields() {
    let query = parse_search("exp>=5 exp<=10");
    assert_eq!((query.exp_min, query.exp_max), (Some(5), Some(10)));
}

#[test]
fn malformed_range_is_free_text() {
    assert_eq!(parse_search("exp:abc").free_text, "exp:abc");
    assert_eq!(classify_token("exp:abc"), SearchToken::FreeText("exp:abc"));
}

#[test]
fn cv_and_experience_pick_the_qualified_applicant() {
    let rows = vec![
        applicant("r1", Some("cvs/r1.pdf"), Some(6)),
        applicant("r2", None, Some(2)),
    ];
    let filter = ApplicantFilter::from_inputs("cv:yes exp>=5", "", "", None);
    assert_eq!(ids(&apply_filters(&rows, &filter).rows), vec!["r1"]);
}

#[test]
fn arabic_free_text_and_city_match() {
    let rows = vec![applicant("r1", None, Some(1)), applicant("r2", None, None)];
    let filter = ApplicantFilter::from_inputs("محمد web:yes", "nutri", "الرياض", None);
    assert_eq!(ids(&apply_filters(&rows, &filter).rows), vec!["r1", "r2"]);

    let no_site = ApplicantFilter::from_inputs("web:no", "", "", None);
    assert_eq!(apply_filters(&rows, &no_site).count(), 0);
}

#[test]
fn absent_experience_never_matches_bounds() {
    let rows = vec![applicant("none", Some("cvs/a.pdf"), None)];
    for raw in ["exp:0", "exp>=0", "exp<=100", "exp:0-100"] {
        let filter = ApplicantFilter::from_inputs(raw, "", "", None);
        assert_eq!(apply_filters(&rows, &filter).count(), 0, "{raw} should exclude");
    }
}

#[test]
fn unset_filter_is_identity_and_idempotent() {
    let rows = vec![
        applicant("c", None, None),
        applicant("a", Some("cvs/a.pdf"), Some(3)),
        applicant("b", None, Some(12)),
    ];
    let filter = ApplicantFilter::default();
    let first = ids(&apply_filters(&rows, &filter).rows);
    let second = ids(&apply_filters(&rows, &filter).rows);
    assert_eq!(first, vec!["c", "a", "b"]);
    assert_eq!(first, second);
}
