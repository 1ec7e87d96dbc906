use std::sync::Arc;

use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use tracing::{info, warn};

use crate::analysis::analyze_file;
use crate::analysis::composer::AnalysisOutcome;
use crate::analysis::scratch::{is_pdf_filename, ScratchFile};
use crate::auth::safe_email_log;
use crate::auth::session::Session;
use crate::errors::AppError;
use crate::state::AppState;

/// Multipart field carrying the résumé.
pub const RESUME_FIELD: &str = "resume";

const MISSING_UPLOAD: &str = "Upload your resume!";
const ONLY_PDF: &str = "Only PDF allowed!";

struct Upload {
    file_name: String,
    bytes: Vec<u8>,
}

/// POST /analyze
///
/// The session is checked before the body is touched, so an anonymous caller always
/// gets 401 whatever it sent.
pub async fn handle_analyze(
    State(state): State<AppState>,
    session: Session,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalysisOutcome>, AppError> {
    let user = session.require_user()?;

    let mut multipart =
        multipart.map_err(|_| AppError::Validation(MISSING_UPLOAD.to_string()))?;
    let upload = read_resume_field(&mut multipart)
        .await?
        .ok_or_else(|| AppError::Validation(MISSING_UPLOAD.to_string()))?;

    if !is_pdf_filename(&upload.file_name) {
        return Err(AppError::Validation(ONLY_PDF.to_string()));
    }

    let scratch = ScratchFile::create(&state.config.upload_dir, &upload.file_name, &upload.bytes)?;
    let path = scratch.path().to_path_buf();
    let matcher = Arc::clone(&state.matcher);
    let result = tokio::task::spawn_blocking(move || analyze_file(&path, &matcher))
        .await
        .unwrap_or_else(|e| Err(AppError::InvalidDocument(format!("extraction aborted: {e}"))));

    if let Err(e) = scratch.close() {
        warn!(error = %e, "Failed to remove scratch file");
    }

    let outcome = result?;
    match &outcome {
        AnalysisOutcome::SkillsFound { skills, jobs } => info!(
            email = %safe_email_log(&user.email),
            skills = skills.len(),
            jobs = jobs.len(),
            "Resume analysed"
        ),
        AnalysisOutcome::NoSkillsFound { .. } => info!(
            email = %safe_email_log(&user.email),
            "Resume analysed, no known skills; suggesting courses"
        ),
    }
    Ok(Json(outcome))
}

/// Scans the form for the résumé file. Other fields, and a `resume` field that is not
/// a file part, are skipped.
async fn read_resume_field(multipart: &mut Multipart) -> Result<Option<Upload>, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        if field.name() != Some(RESUME_FIELD) {
            continue;
        }
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = field.bytes().await.map_err(upload_error)?;
        return Ok(Some(Upload {
            file_name,
            bytes: bytes.to_vec(),
        }));
    }
    Ok(None)
}


/// An over-limit body becomes `PayloadTooLarge`; any other malformed body counts as no upload.
fn upload_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge
    } else {
        warn!(error = %e.body_text(), "Unreadable multipart body");
        AppError::Validation(MISSING_UPLOAD.to_string())
    }
}
