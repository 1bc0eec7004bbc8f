//! Multipart form reading, per-kind file policies and object key layout.

use crate::error::AppError;
use crate::model::{FarmerId, ProductId};
use axum::body::Bytes;
use axum::extract::Multipart;
use std::collections::HashMap;
use uuid::Uuid;

/// Per-file ceiling; the request body limit sits slightly above it.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

#[derive(Clone, Debug)]
pub struct UploadedFile {
    pub field_name: String,
    pub file_name: Option<String>,
    pub content_type: String,
    pub bytes: Bytes,
}

/// Text fields and files of one multipart request.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl MultipartForm {
    pub async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = MultipartForm::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?
        {
            let name = field.name().unwrap_or_default().to_string();
            if name.is_empty() {
                continue;
            }
            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let content_type = field
                        .content_type()
                        .unwrap_or("application/octet-stream")
                        .to_ascii_lowercase();
                    let bytes = field.bytes().await.map_err(|e| AppError::BadRequest(e.body_text()))?;
                    form.files.insert(
                        name.clone(),
                        UploadedFile {
                            field_name: name,
                            file_name: Some(file_name),
                            content_type,
                            bytes,
                        },
                    );
                }
                None => {
                    let text = field.text().await.map_err(|e| AppError::BadRequest(e.body_text()))?;
                    form.fields.insert(name, text);
                }
            }
        }
        Ok(form)
    }

    pub fn from_parts(fields: HashMap<String, String>, files: Vec<UploadedFile>) -> Self {
        MultipartForm {
            fields,
            files: files.into_iter().map(|f| (f.field_name.clone(), f)).collect(),
        }
    }

    /// Trimmed text value; blank counts as absent.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|s| s.trim()).filter(|s| !s.is_empty())
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }
}

/// Accepted content types (with the extension used in the object key) and size ceiling.
#[derive(Clone, Copy, Debug)]
pub struct FilePolicy {
    pub label: &'static str,
    pub allowed: &'static [(&'static str, &'static str)],
    pub max_bytes: usize,
}

const IMAGE_TYPES: &[(&str, &str)] = &[
    ("image/jpeg", "jpg"),
    ("image/jpg", "jpg"),
    ("image/png", "png"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
];

const CERTIFICATE_TYPES: &[(&str, &str)] = &[
    ("image/jpeg", "jpg"),
    ("image/jpg", "jpg"),
    ("image/png", "png"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
    ("application/pdf", "pdf"),
];

pub const IMAGE_POLICY: FilePolicy = FilePolicy {
    label: "image",
    allowed: IMAGE_TYPES,
    max_bytes: MAX_UPLOAD_BYTES,
};

pub const CERTIFICATE_POLICY: FilePolicy = FilePolicy {
    label: "certificate",
    allowed: CERTIFICATE_TYPES,
    max_bytes: MAX_UPLOAD_BYTES,
};

impl FilePolicy {
    /// Check the file and return the extension for its object key.
    pub fn check(&self, file: &UploadedFile) -> Result<&'static str, AppError> {
        if file.bytes.is_empty() {
            return Err(AppError::Validation(format!("{} file is empty", self.label)));
        }
        if file.bytes.len() > self.max_bytes {
            return Err(AppError::Validation(format!(
                "{} file must be at most {} MB",
                self.label,
                self.max_bytes / (1024 * 1024)
            )));
        }
        let content_type = file.content_type.split(';').next().unwrap_or("").trim();
        self.allowed
            .iter()
            .find(|(mime, _)| *mime == content_type)
            .map(|(_, ext)| *ext)
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "{} file type {} is not allowed",
                    self.label, file.content_type
                ))
            })
    }
}

/// Farm images and certificates: one folder per farmer, random object name.
pub fn farmer_object_key(farmer_id: FarmerId, ext: &str) -> String {
    format!("{}/{}.{}", farmer_id, Uuid::new_v4(), ext)
}

/// Product images: one object per product, replaced on re-upload.
pub fn product_object_key(product_id: ProductId, ext: &str) -> String {
    format!("{}.{}", product_id, ext)
}

/// Prefix matching every stored image of a product, whatever its extension.
pub fn product_key_prefix(product_id: ProductId) -> String {
    format!("{}.", product_id)
}

/// Product id encoded in a product image key, if any.
pub fn product_id_from_key(key: &str) -> Option<ProductId> {
    let stem = key.rsplit('/').next()?.split('.').next()?;
    stem.parse().ok()
}
