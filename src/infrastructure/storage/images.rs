use std::path::PathBuf;

use tokio::fs;
use uuid::Uuid;

use crate::{
    entities::upload::{ImageUpload, UploadedImage},
    errors::AppError,
    settings::AppConfig,
};

const ALLOWED_IMAGE_TYPES: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/gif",
    "image/webp",
    "image/avif",
];

pub const UPLOADS_ROUTE: &str = "/uploads";

/// Local-disk store for admin image uploads, served back under `/uploads`.
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
    public_base_url: String,
    max_bytes: usize,
}

impl ImageStore {
    pub fn new(config: &AppConfig) -> Self {
        ImageStore {
            dir: PathBuf::from(&config.upload_dir),
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
            max_bytes: config.upload_max_bytes,
        }
    }

    pub fn public_url(&self, file_name: &str) -> String {
        format!("{}{}/{}", self.public_base_url, UPLOADS_ROUTE, file_name)
    }

    /// Sniffs the content (the client-declared type is not trusted), then
    /// stores it under a fresh random name.
    pub async fn save(&self, upload: ImageUpload) -> Result<UploadedImage, AppError> {
        let ImageUpload { file, alt_text } = upload;

        if file.size == 0 {
            return Err(AppError::field("file", "File is empty"));
        }
        if file.size > self.max_bytes {
            return Err(AppError::PayloadTooLarge(format!(
                "Image exceeds the {} byte limit",
                self.max_bytes
            )));
        }

        let kind = infer::get_from_path(file.file.path())?
            .filter(|kind| ALLOWED_IMAGE_TYPES.contains(&kind.mime_type()))
            .ok_or_else(|| {
                AppError::UnsupportedMediaType("Only PNG, JPEG, GIF, WebP and AVIF images are accepted".into())
            })?;

        fs::create_dir_all(&self.dir).await?;
        let file_name = format!("{}.{}", Uuid::new_v4(), kind.extension());
        let destination = self.dir.join(&file_name);
        fs::copy(file.file.path(), &destination).await?;

        tracing::info!(
            file_name = %file_name,
            mime_type = kind.mime_type(),
            size = file.size,
            original_name = ?file.file_name,
            "Image uploaded"
        );

        let url = self.public_url(&file_name);
        Ok(UploadedImage {
            image_url: url.clone(),
            url,
            file_name,
            mime_type: kind.mime_type().to_string(),
            size: file.size as u64,
            alt_text: alt_text.map(|t| t.into_inner()).filter(|t| !t.trim().is_empty()),
        })
    }

    /// Reads a stored image. Names that could escape the upload directory
    /// are treated as missing.
    pub async fn open(&self, file_name: &str) -> Result<(Vec<u8>, &'static str), AppError> {
        if !is_safe_file_name(file_name) {
            return Err(AppError::NotFound("Image not found".into()));
        }

        let bytes = match fs::read(self.dir.join(file_name)).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AppError::NotFound("Image not found".into()));
            }
            Err(e) => return Err(e.into()),
        };

        let mime_type = infer::get(&bytes)
            .map(|kind| kind.mime_type())
            .unwrap_or("application/octet-stream");
        Ok((bytes, mime_type))
    }
}

fn is_safe_file_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_traversal_names() {
        assert!(is_safe_file_name("4f6c.png"));
        assert!(!is_safe_file_name("../secret"));
        assert!(!is_safe_file_name(".env"));
        assert!(!is_safe_file_name("a/b.png"));
        assert!(!is_safe_file_name(""));
    }

    #[test]
    fn public_url_uses_base() {
        let store = ImageStore::new(&AppConfig {
            public_base_url: "https://cdn.example.com/".into(),
            ..AppConfig::default()
        });
        assert_eq!(store.public_url("a.png"), "https://cdn.example.com/uploads/a.png");

        let relative = ImageStore::new(&AppConfig::default());
        assert_eq!(relative.public_url("a.png"), "/uploads/a.png");
    }

    #[actix_rt::test]
    async fn missing_file_is_not_found() {
        let store = ImageStore::new(&AppConfig {
            upload_dir: std::env::temp_dir().join("portfolio-missing").display().to_string(),
            ..AppConfig::default()
        });
        let err = store.open("nope.png").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
