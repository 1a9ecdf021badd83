use crate::infra::parse_status;
use clap::Args;
use std::path::{Path, PathBuf};
use trainer_review::error::AppError;
use trainer_review::workflows::trainers::applicants::{
    ApplicantDetailView, ApplicantId, ApplicantListView, ApplicantRow, ApplicantStatus,
    ReviewServiceError,
};
use trainer_review::workflows::trainers::import::ApplicantCsvImporter;
use trainer_review::workflows::trainers::search::{apply_filters, ApplicantFilter};

#[derive(Args, Debug)]
pub(crate) struct SearchArgs {
    /// Applicant CSV export to search
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Search box text, e.g. "cv:yes li:no exp:3-8 riyadh"
    #[arg(long, short = 'q', default_value = "")]
    pub(crate) query: String,
    /// Specialization substring
    #[arg(long, default_value = "")]
    pub(crate) specialization: String,
    /// City substring
    #[arg(long, default_value = "")]
    pub(crate) city: String,
    /// Exact review status
    #[arg(long, value_parser = parse_status)]
    pub(crate) status: Option<ApplicantStatus>,
}

#[derive(Args, Debug)]
pub(crate) struct ShowArgs {
    /// Applicant CSV export to read
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Applicant identifier
    pub(crate) id: String,
}

pub(crate) fn run_search(args: SearchArgs) -> Result<(), AppError> {
    let rows = load_rows(&args.csv)?;
    let filter =
        ApplicantFilter::from_inputs(&args.query, &args.specialization, &args.city, args.status);
    let view = apply_filters(&rows, &filter).list_view();
    render_list(&view);
    Ok(())
}

pub(crate) fn run_show(args: ShowArgs) -> Result<(), AppError> {
    let rows = load_rows(&args.csv)?;
    let id = ApplicantId(args.id);
    let view = rows
        .iter()
        .find(|row| row.id() == &id)
        .map(ApplicantRow::detail_view)
        .ok_or(ReviewServiceError::NotCached(id))?;
    render_details(&view);
    Ok(())
}

fn load_rows(path: &Path) -> Result<Vec<ApplicantRow>, AppError> {
    let records = ApplicantCsvImporter::from_path(path)?;
    Ok(records.into_iter().map(ApplicantRow::new).collect())
}

fn render_list(view: &ApplicantListView) {
    if view.applicants.is_empty() {
        println!("No applicants match.");
    }

    for row in &view.applicants {
        let cv = if row.has_cv { "CV" } else { "no CV" };
        println!(
            "{} | {} | {} | {} | {} | {} | {}",
            row.date, row.id, row.name, row.contact, row.specialization_city, row.status, cv
        );
    }

    println!("\nResults: {}", view.count);
}

fn render_details(view: &ApplicantDetailView) {
    for line in view.lines() {
        println!("{line}");
    }
}
