use axum::extract::{Multipart, multipart::MultipartError};
use inference::RawUpload;

/// Form field carrying the image.
pub const FILE_FIELD: &str = "file";

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Pull the first file part named [`FILE_FIELD`] out of a multipart body.
///
/// A `file` field without a `filename` parameter is a plain form value,
/// not a file part, and is skipped. `Ok(None)` means no file part was sent.
pub async fn read_upload(multipart: &mut Multipart) -> Result<Option<RawUpload>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let Some(filename) = field.file_name().map(str::to_owned) else {
            tracing::debug!("Ignoring `file` form field without a filename");
            continue;
        };

        let content_type = field
            .content_type()
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_owned();

        let bytes = field.bytes().await?;

        return Ok(Some(RawUpload {
            bytes: bytes.to_vec(),
            content_type,
            filename,
        }));
    }

    Ok(None)
}
