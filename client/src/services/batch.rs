//! Batch operations over many ids or files. Each item is sent on its own
//! request; a failure is recorded and the loop moves on.

use crate::api::ApiClient;
use crate::error::ClientError;
use shared::catalog::Resource;
use std::path::PathBuf;

/// Outcome of a batch: what went through, and what failed with the reason
/// shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport<T> {
    pub succeeded: Vec<T>,
    pub failed: Vec<(T, String)>,
}

impl<T> Default for BatchReport<T> {
    fn default() -> Self {
        Self {
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }
}

impl<T> BatchReport<T> {
    pub fn succeeded_count(&self) -> usize {
        self.succeeded.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty() && !self.succeeded.is_empty()
    }

    fn record(&mut self, item: T, outcome: Result<(), ClientError>) {
        match outcome {
            Ok(()) => self.succeeded.push(item),
            Err(e) => {
                let reason = e.user_message(&e.to_string());
                self.failed.push((item, reason));
            }
        }
    }
}

/// Uploads every file in `paths` to `{resource}/{id}/documents`.
pub async fn upload_documents(
    api: &ApiClient,
    resource: Resource,
    id: &str,
    paths: &[PathBuf],
) -> Result<BatchReport<PathBuf>, ClientError> {
    if !resource.accepts_documents() {
        return Err(ClientError::ValidationError(format!(
            "{} does not accept documents",
            resource
        )));
    }
    if paths.is_empty() {
        return Err(ClientError::ValidationError("no files selected".to_string()));
    }

    let mut report = BatchReport::default();
    for path in paths {
        let outcome = api.upload_document(resource, id, path).await;
        if let Err(e) = &outcome {
            tracing::warn!(resource = %resource, id, file = %path.display(), error = %e, "Upload failed");
        }
        report.record(path.clone(), outcome);
    }
    tracing::info!(
        resource = %resource,
        id,
        uploaded = report.succeeded_count(),
        failed = report.failed_count(),
        "Document batch finished"
    );
    Ok(report)
}

/// Deletes each id in turn.
pub async fn delete_many(
    api: &ApiClient,
    resource: Resource,
    ids: &[String],
) -> Result<BatchReport<String>, ClientError> {
    if ids.is_empty() {
        return Err(ClientError::ValidationError("no rows selected".to_string()));
    }

    let mut report = BatchReport::default();
    for id in ids {
        let outcome = api.delete(resource, id).await;
        if let Err(e) = &outcome {
            tracing::warn!(resource = %resource, id = %id, error = %e, "Delete failed");
        }
        report.record(id.clone(), outcome);
    }
    tracing::info!(
        resource = %resource,
        deleted = report.succeeded_count(),
        failed = report.failed_count(),
        "Delete batch finished"
    );
    Ok(report)
}
