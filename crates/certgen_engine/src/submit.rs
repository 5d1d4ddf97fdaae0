use std::path::Path;

use certgen_logging::{certgen_error, certgen_info};

use crate::{
    CertificateService, FailureKind, FilePart, GenerateForm, ResultDownloader, ServiceError,
    SubmissionOutcome, SubmissionRequest,
};

/// Reads the selected files into memory. Unselected files become empty parts.
pub async fn load_generate_form(request: SubmissionRequest) -> Result<GenerateForm, ServiceError> {
    Ok(GenerateForm {
        ms6_file: load_file_part(request.ms6_file.as_deref()).await?,
        bms_file: load_file_part(request.bms_file.as_deref()).await?,
        year: request.year,
        course_name: request.course_name,
        semester: request.semester,
    })
}

async fn load_file_part(path: Option<&Path>) -> Result<FilePart, ServiceError> {
    let Some(path) = path else {
        return Ok(FilePart::empty());
    };
    let bytes = tokio::fs::read(path).await.map_err(|err| {
        ServiceError::new(
            FailureKind::FileUnreadable,
            format!("{}: {}", path.display(), err),
        )
    })?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(FilePart { file_name, bytes })
}

/// Generate, save, then ask the backend to clean up.
///
/// A failure at any step fails the submission. A document saved before a
/// failed cleanup stays on disk.
pub async fn run_submission(
    service: &dyn CertificateService,
    downloader: &ResultDownloader,
    filename: &str,
    request: SubmissionRequest,
) -> Result<SubmissionOutcome, ServiceError> {
    let result = generate_and_save(service, downloader, filename, request).await;
    let (saved_to, bytes_written) = match result {
        Ok(saved) => saved,
        Err(err) => {
            certgen_error!("Error generating certificates: {}", err);
            return Err(err);
        }
    };

    if let Err(err) = service.delete_files().await {
        certgen_error!(
            "Error deleting files (document kept at {}): {}",
            saved_to.display(),
            err
        );
        return Err(err);
    }
    certgen_info!("Files deleted successfully");

    Ok(SubmissionOutcome {
        saved_to,
        bytes_written,
    })
}

async fn generate_and_save(
    service: &dyn CertificateService,
    downloader: &ResultDownloader,
    filename: &str,
    request: SubmissionRequest,
) -> Result<(std::path::PathBuf, u64), ServiceError> {
    certgen_info!(
        "Submitting ms6={:?} bms={:?} year={:?} course={:?} semester={:?}",
        request.ms6_file,
        request.bms_file,
        request.year,
        request.course_name,
        request.semester
    );
    let form = load_generate_form(request).await?;
    let body = service.generate(form).await?;
    let bytes_written = body.len() as u64;

    let downloader = downloader.clone();
    let filename = filename.to_string();
    let saved_to = tokio::task::spawn_blocking(move || downloader.save(&filename, &body))
        .await
        .map_err(|err| ServiceError::new(FailureKind::Persist, err.to_string()))?
        .map_err(|err| ServiceError::new(FailureKind::Persist, err.to_string()))?;

    certgen_info!("Saved {} bytes to {}", bytes_written, saved_to.display());
    Ok((saved_to, bytes_written))
}
