//! Resolution of a `/predict` request body into the texts to classify.

use actix_multipart::{Field, Multipart};
use actix_web::dev::UrlEncoded;
use actix_web::error::UrlencodedError;
use actix_web::{HttpMessage, HttpRequest, web};
use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;

use crate::error::PredictError;
use crate::io_struct::TextForm;

pub const TEXT_COLUMN: &str = "text";

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content: Bytes,
}

/// The `text` and `file` fields of a `/predict` form. Other fields are ignored.
#[derive(Debug, Default)]
pub struct PredictForm {
    pub text: Option<String>,
    pub file: Option<UploadedFile>,
}

impl PredictForm {
    pub fn from_text(text: impl Into<String>) -> Self {
        PredictForm {
            text: Some(text.into()),
            file: None,
        }
    }

    pub fn from_file(filename: impl Into<String>, content: impl Into<Bytes>) -> Self {
        PredictForm {
            text: None,
            file: Some(UploadedFile {
                filename: filename.into(),
                content: content.into(),
            }),
        }
    }

    pub async fn from_multipart(
        mut payload: Multipart,
        max_upload_bytes: usize,
    ) -> Result<Self, PredictError> {
        let mut form = PredictForm::default();

        while let Some(item) = payload.next().await {
            let mut field = item.map_err(|e| PredictError::MalformedForm(e.to_string()))?;
            let (name, filename) = match field.content_disposition() {
                Some(cd) => (
                    cd.get_name().map(str::to_owned),
                    cd.get_filename().map(str::to_owned),
                ),
                None => (None, None),
            };

            // First occurrence of a field wins.
            match name.as_deref() {
                Some("file") if form.file.is_none() => {
                    let content = read_field(&mut field, max_upload_bytes).await?;
                    form.file = Some(UploadedFile {
                        filename: filename.unwrap_or_default(),
                        content,
                    });
                }
                Some("text") if form.text.is_none() => {
                    let content = read_field(&mut field, max_upload_bytes).await?;
                    form.text = Some(String::from_utf8_lossy(&content).into_owned());
                }
                _ => drain_field(&mut field).await?,
            }
        }

        Ok(form)
    }

    /// Texts to classify, in input order.
    ///
    /// An uploaded file with a filename takes priority over the `text` field.
    /// An empty result is returned as-is; the caller decides how to reject it.
    pub fn into_texts(self) -> Result<Vec<String>, PredictError> {
        if let Some(file) = self.file.filter(|f| !f.filename.is_empty()) {
            if !file.filename.ends_with(".csv") {
                return Err(PredictError::UnsupportedFileType);
            }
            return read_text_column(&file.content);
        }

        let text = self.text.unwrap_or_default();
        let text = text.trim();
        if text.is_empty() {
            Ok(Vec::new())
        } else {
            Ok(vec![text.to_string()])
        }
    }
}

/// Reads the request body as a form, by content type.
///
/// Bodies that are neither multipart nor url-encoded carry no form fields.
pub async fn read_form(
    req: &HttpRequest,
    payload: web::Payload,
    max_upload_bytes: usize,
) -> Result<PredictForm, PredictError> {
    let mut payload = payload.into_inner();
    match req.content_type() {
        "multipart/form-data" => {
            PredictForm::from_multipart(Multipart::new(req.headers(), payload), max_upload_bytes)
                .await
        }
        "application/x-www-form-urlencoded" => {
            let form = UrlEncoded::<TextForm>::new(req, &mut payload)
                .limit(max_upload_bytes)
                .await
                .map_err(|e| match e {
                    UrlencodedError::Overflow { .. } => PredictError::PayloadTooLarge {
                        limit: max_upload_bytes,
                    },
                    other => PredictError::MalformedForm(other.to_string()),
                })?;
            Ok(PredictForm {
                text: form.text,
                file: None,
            })
        }
        other => {
            log::debug!("Ignoring body with content type '{}'", other);
            Ok(PredictForm::default())
        }
    }
}

async fn read_field(field: &mut Field, limit: usize) -> Result<Bytes, PredictError> {
    let mut buf = BytesMut::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|e| PredictError::MalformedForm(e.to_string()))?;
        if buf.len() + chunk.len() > limit {
            return Err(PredictError::PayloadTooLarge { limit });
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf.freeze())
}

async fn drain_field(field: &mut Field) -> Result<(), PredictError> {
    while let Some(chunk) = field.next().await {
        chunk.map_err(|e| PredictError::MalformedForm(e.to_string()))?;
    }
    Ok(())
}

/// Values of the `text` column of a CSV document with a header row.
pub fn read_text_column(content: &[u8]) -> Result<Vec<String>, PredictError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(content);

    let headers = reader.headers()?;
    if headers.is_empty() {
        return Err(PredictError::EmptyCsv);
    }
    let column = headers
        .iter()
        .position(|header| header == TEXT_COLUMN)
        .ok_or(PredictError::MissingColumn)?;

    let mut texts = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        match record.get(column) {
            Some(cell) if !cell.is_empty() => texts.push(cell.to_string()),
            _ => return Err(PredictError::EmptyDocument { row: i + 1 }),
        }
    }
    Ok(texts)
}
