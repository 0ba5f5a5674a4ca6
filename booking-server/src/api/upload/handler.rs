//! Image Upload Handler
//!
//! Accepts PNG, JPEG and WebP, downsizes to fit a square box and
//! re-encodes as JPEG. The result is returned as a data URL.

use std::io::Cursor;
use std::path::Path;

use axum::Json;
use axum::extract::{Extension, Multipart};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::DynamicImage;
use serde::Serialize;

use crate::utils::{AppError, AppResult, ErrorCode, multipart_error};
use crate::CurrentUser;

/// Maximum file size (5MB)
const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Supported image formats
const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Longest edge after processing
const MAX_DIMENSION: u32 = 512;

/// JPEG quality (85% keeps photos clean at a small size)
const JPEG_QUALITY: u8 = 85;

/// Upload response
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedImage {
    /// `data:image/jpeg;base64,...`
    pub data_url: String,
    /// Encoded JPEG size in bytes
    pub size: usize,
    /// Always `jpeg`
    pub format: String,
}

/// Read the `file` field of a multipart body, returning bytes and file name
pub async fn read_file_field(multipart: &mut Multipart) -> AppResult<(Vec<u8>, String)> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::new(ErrorCode::NoFilename))?;
        let data = field.bytes().await.map_err(multipart_error)?.to_vec();
        return Ok((data, filename));
    }
    Err(AppError::with_message(
        ErrorCode::NoFileProvided,
        "No 'file' field found. Field name must be 'file'",
    ))
}

/// Validate extension / size / MIME type
fn validate_image(data: &[u8], filename: &str) -> AppResult<String> {
    if data.is_empty() {
        return Err(AppError::new(ErrorCode::EmptyFile));
    }
    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::with_message(
            ErrorCode::FileTooLarge,
            format!(
                "File too large. Maximum size is {}MB",
                MAX_FILE_SIZE / 1024 / 1024
            ),
        ));
    }

    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    if !SUPPORTED_FORMATS.contains(&ext.as_str()) {
        return Err(AppError::with_message(
            ErrorCode::UnsupportedFileFormat,
            format!(
                "Unsupported file format '{}'. Supported: {}",
                ext,
                SUPPORTED_FORMATS.join(", ")
            ),
        ));
    }

    let mime = mime_guess::from_path(filename).first_or_octet_stream();
    if mime.type_() != mime_guess::mime::IMAGE {
        return Err(AppError::with_message(
            ErrorCode::UnsupportedFileFormat,
            format!("'{}' is not an image", mime),
        ));
    }

    Ok(ext)
}

fn downsize(img: DynamicImage) -> DynamicImage {
    if img.width() <= MAX_DIMENSION && img.height() <= MAX_DIMENSION {
        return img;
    }
    img.thumbnail(MAX_DIMENSION, MAX_DIMENSION)
}

fn encode_jpeg(img: &DynamicImage) -> AppResult<Vec<u8>> {
    let mut buffer = Vec::new();
    let encoder =
        image::codecs::jpeg::JpegEncoder::new_with_quality(Cursor::new(&mut buffer), JPEG_QUALITY);
    img.to_rgb8().write_with_encoder(encoder).map_err(|e| {
        AppError::with_message(
            ErrorCode::ImageProcessingFailed,
            format!("Failed to compress image: {}", e),
        )
    })?;
    Ok(buffer)
}

/// Validate, decode, downsize and re-encode an uploaded image
pub fn process_image(data: &[u8], filename: &str) -> AppResult<ProcessedImage> {
    let ext = validate_image(data, filename)?;

    let img = image::load_from_memory(data).map_err(|e| {
        AppError::with_message(
            ErrorCode::InvalidImageFile,
            format!("Invalid image file ({}): {}", ext, e),
        )
    })?;

    let jpeg = encode_jpeg(&downsize(img))?;

    Ok(ProcessedImage {
        data_url: format!("data:image/jpeg;base64,{}", STANDARD.encode(&jpeg)),
        size: jpeg.len(),
        format: "jpeg".to_string(),
    })
}

/// POST /api/upload - 上传图片，返回 data URL
pub async fn upload(
    Extension(current_user): Extension<CurrentUser>,
    mut multipart: Multipart,
) -> AppResult<Json<ProcessedImage>> {
    let (data, filename) = read_file_field(&mut multipart).await?;
    let original_size = data.len();

    // 解码 / 缩放是 CPU 密集型，放到阻塞线程池
    let processed = tokio::task::spawn_blocking(move || process_image(&data, &filename))
        .await
        .map_err(|e| AppError::internal(format!("Image task failed: {}", e)))??;

    tracing::info!(
        user_id = current_user.id,
        original_size,
        size = processed.size,
        "Image processed"
    );

    Ok(Json(processed))
}
