//! Custom Axum extractors

use std::collections::HashMap;

use axum::extract::{FromRequest, FromRequestParts, Multipart, Path, Request};
use axum::http::request::Parts;

use super::error::ApiError;
use crate::models::ValidationError;
use crate::storage::IncomingFile;

/// Fields and files of a `multipart/form-data` submission.
///
/// Parts carrying a file name are collected as files, everything else as
/// text. When a name repeats, the first value wins.
#[derive(Debug, Default)]
pub struct FormSubmission {
    fields: HashMap<String, String>,
    files: HashMap<String, IncomingFile>,
}

impl FormSubmission {
    /// Value of a field that must be present. Empty strings count as present.
    pub fn require(&self, field: &'static str) -> Result<String, ValidationError> {
        self.fields
            .get(field)
            .cloned()
            .ok_or(ValidationError::Missing { field })
    }

    pub fn optional(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Remove and return an uploaded file part.
    pub fn take_file(&mut self, field: &str) -> Option<IncomingFile> {
        self.files.remove(field)
    }
}

impl<S> FromRequest<S> for FormSubmission
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadForm {
                status: e.status(),
                message: e.body_text(),
            })?;

        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(bad_part)? {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };

            match field.file_name().map(str::to_owned) {
                Some(file_name) => {
                    let content_type = field.content_type().map(str::to_owned);
                    let bytes = field.bytes().await.map_err(bad_part)?;
                    form.files.entry(name).or_insert(IncomingFile {
                        file_name,
                        content_type,
                        bytes,
                    });
                }
                None => {
                    let value = field.text().await.map_err(bad_part)?;
                    form.fields.entry(name).or_insert(value);
                }
            }
        }

        Ok(form)
    }
}

fn bad_part(e: axum::extract::multipart::MultipartError) -> ApiError {
    ApiError::BadForm {
        status: e.status(),
        message: e.body_text(),
    }
}

/// Extract and validate an integer record id from path
pub struct RecordId(pub i64);

impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Validation(ValidationError::Missing { field: "id" }))?;

        let id = id.parse::<i64>().map_err(|_| {
            ApiError::Validation(ValidationError::InvalidFormat {
                field: "id",
                reason: "must be an integer",
            })
        })?;

        Ok(Self(id))
    }
}
