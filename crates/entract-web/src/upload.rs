use axum::extract::Multipart;

use entract_core::DocumentKind;

/// An uploaded file with its data and metadata.
pub struct UploadedFile {
    pub filename: String,
    pub data: Vec<u8>,
    pub kind: DocumentKind,
}

/// Parse a multipart form upload into the uploaded document.
///
/// The document arrives in the `file` field; its kind is derived from the
/// declared filename's extension. Unknown fields are ignored.
pub async fn parse_multipart(mut multipart: Multipart) -> Result<UploadedFile, String> {
    let mut file: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Failed to read form field: {}", e))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| format!("Failed to read file data: {}", e))?
                    .to_vec();
                let kind = DocumentKind::from_filename(&filename);

                file = Some(UploadedFile {
                    filename,
                    data,
                    kind,
                });
            }
            _ => {
                // Ignore unknown fields
                let _ = field.bytes().await;
            }
        }
    }

    file.ok_or_else(|| "No file uploaded".to_string())
}
