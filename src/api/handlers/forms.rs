use axum::extract::Multipart;
use std::collections::HashMap;
use crate::error::AppError;

pub struct UploadedImage {
    pub filename: String,
    pub bytes: Vec<u8>,
}

pub struct FormData {
    fields: HashMap<String, String>,
    pub image: Option<UploadedImage>,
}

impl FormData {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn require(&self, name: &str) -> Result<String, AppError> {
        self.fields
            .get(name)
            .cloned()
            .ok_or_else(|| AppError::Validation(format!("Missing required field: {name}")))
    }
}

/// Drains a multipart form into text fields plus at most one uploaded file
/// (the `image` part). Empty file parts are treated as absent, which is how
/// browsers submit an untouched file input.
pub async fn read_form(multipart: &mut Multipart) -> Result<FormData, AppError> {
    let mut fields = HashMap::new();
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::Validation("Malformed multipart form".to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "image" {
            let filename = field.file_name().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|_| AppError::Validation("Failed to read uploaded file".to_string()))?;
            if !bytes.is_empty() {
                image = Some(UploadedImage { filename, bytes: bytes.to_vec() });
            }
        } else {
            let value = field
                .text()
                .await
                .map_err(|_| AppError::Validation(format!("Invalid value for field: {name}")))?;
            fields.insert(name, value);
        }
    }

    Ok(FormData { fields, image })
}
