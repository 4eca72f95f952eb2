//! Upload validation: file type and size, checked before any storage write.

use crate::errors::AppError;

/// Formats the extraction pipeline knows how to turn into text.
pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "docx", "txt"];

pub fn validate_upload(file_name: &str, size: usize, max_bytes: usize) -> Result<(), AppError> {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .ok_or_else(|| AppError::Validation(format!("File {file_name} has no extension")))?;

    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(AppError::Validation(format!(
            "Unsupported file type .{extension}; allowed: pdf, docx, txt"
        )));
    }

    if size == 0 {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }

    if size > max_bytes {
        return Err(AppError::PayloadTooLarge(format!(
            "File is {size} bytes; maximum is {max_bytes}"
        )));
    }

    Ok(())
}
