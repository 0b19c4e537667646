use crate::error::{PostlensError, PostlensResult};
use postlens_models::{FileKind, SUPPORTED_EXTENSIONS};
use regex::Regex;
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;
use validator::{Validate, ValidationErrors};

/// Upload ceiling for a whole analyze request.
pub const MAX_FILE_SIZE: usize = 16 * 1024 * 1024;
pub const MAX_FILE_SIZE_MB: usize = MAX_FILE_SIZE / (1024 * 1024);

/// Stand-in name for uploads whose filename sanitizes to nothing.
const FALLBACK_FILENAME: &str = "upload";

pub fn validate_model<T: Validate>(model: &T) -> PostlensResult<()> {
    match model.validate() {
        Ok(()) => Ok(()),
        Err(errors) => Err(PostlensError::validation(format_validation_errors(&errors))),
    }
}

pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();

    for (field, field_errors) in errors.field_errors() {
        for error in field_errors {
            let message = match &error.message {
                Some(message) => message.to_string(),
                None => format!("Validation failed for field '{}': {}", field, error.code),
            };
            messages.push(message);
        }
    }

    messages.sort();
    messages.join(", ")
}

/// Whether the filename has an extension from the upload allow-list.
pub fn is_allowed_file(filename: &str) -> bool {
    FileKind::from_filename(filename).is_some()
}

pub fn supported_extensions() -> String {
    SUPPORTED_EXTENSIONS.join(", ")
}

/// Check the filename sent with the `file` field and classify it.
pub fn validate_upload_filename(filename: Option<&str>) -> PostlensResult<FileKind> {
    let filename = filename.unwrap_or_default();
    if filename.is_empty() {
        return Err(PostlensError::validation("No file selected"));
    }
    if !is_allowed_file(filename) {
        return Err(file_type_not_allowed());
    }

    FileKind::from_filename(filename).ok_or_else(file_type_not_allowed)
}

fn file_type_not_allowed() -> PostlensError {
    PostlensError::validation(format!(
        "File type not allowed. Supported: {}",
        supported_extensions()
    ))
}

pub fn validate_file_size(file_size: usize, max_size: usize) -> PostlensResult<()> {
    if file_size > max_size {
        return Err(PostlensError::PayloadTooLarge);
    }

    Ok(())
}

/// Reduce a client-supplied filename to a safe single path component.
///
/// Accented letters are decomposed to their ASCII base (`é` becomes `e`) and
/// any other non-ASCII character is dropped. Keeps ASCII letters, digits,
/// `.`, `_` and `-`, folds whitespace runs and path separators into `_`, and
/// strips leading or trailing dots and underscores so the result can never
/// climb out of the upload directory.
pub fn secure_filename(filename: &str) -> String {
    static UNSAFE_CHARS: OnceLock<Regex> = OnceLock::new();
    let unsafe_chars =
        UNSAFE_CHARS.get_or_init(|| Regex::new(r"[^A-Za-z0-9_.-]").expect("valid regex"));

    let ascii: String = filename.nfkd().filter(|c| c.is_ascii()).collect();
    let spaced = ascii.replace(['/', '\\'], " ");
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    let cleaned = unsafe_chars.replace_all(&joined, "");
    let trimmed = cleaned.trim_matches(|c: char| c == '.' || c == '_');

    if trimmed.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_is_allowed_file() {
        assert!(is_allowed_file("post.pdf"));
        assert!(is_allowed_file("post.JPG"));
        assert!(is_allowed_file("scan.tiff"));
        assert!(!is_allowed_file("notes.txt"));
        assert!(!is_allowed_file("pdf"));
        assert!(!is_allowed_file(""));
        assert!(!is_allowed_file("image.tif"));
    }

    #[test]
    fn test_validate_upload_filename_messages() {
        let missing = validate_upload_filename(None).unwrap_err();
        assert_eq!(missing.to_string(), "No file selected");

        let empty = validate_upload_filename(Some("")).unwrap_err();
        assert_eq!(empty.to_string(), "No file selected");

        let wrong_type = validate_upload_filename(Some("notes.txt")).unwrap_err();
        assert_eq!(
            wrong_type.to_string(),
            "File type not allowed. Supported: pdf, png, jpg, jpeg, gif, bmp, tiff"
        );
        assert_eq!(wrong_type.http_status_code(), 400);

        assert_eq!(
            validate_upload_filename(Some("flyer.png")).unwrap(),
            FileKind::Image
        );
    }

    #[test]
    fn test_validate_upload_filename_agrees_with_allow_list() {
        for name in ["post.pdf", "scan.TIFF", "notes.txt", "pdf", "archive.tar.gz", "image.tif"] {
            assert_eq!(
                validate_upload_filename(Some(name)).is_ok(),
                is_allowed_file(name),
                "{}",
                name
            );
        }
        assert_eq!(
            validate_upload_filename(Some("Launch.PDF")).unwrap(),
            FileKind::Pdf
        );
    }

    #[test]
    fn test_validate_file_size() {
        assert!(validate_file_size(MAX_FILE_SIZE, MAX_FILE_SIZE).is_ok());

        let err = validate_file_size(MAX_FILE_SIZE + 1, MAX_FILE_SIZE).unwrap_err();
        assert_eq!(err.http_status_code(), 413);
        assert_eq!(err.to_string(), "File too large. Maximum size is 16MB");
    }

    #[test]
    fn test_secure_filename() {
        assert_eq!(secure_filename("My Post Draft.pdf"), "My_Post_Draft.pdf");
        assert_eq!(secure_filename("../../etc/passwd"), "etc_passwd");
        assert_eq!(secure_filename("C:\\Users\\me\\flyer.png"), "C_Users_me_flyer.png");
        assert_eq!(secure_filename("résumé.pdf"), "resume.pdf");
        assert_eq!(secure_filename("Crème Brûlée Night.jpg"), "Creme_Brulee_Night.jpg");
        assert_eq!(secure_filename(".hidden.jpg"), "hidden.jpg");
        assert_eq!(secure_filename("日本.png"), "png");
        assert_eq!(secure_filename("..."), "upload");
    }

    proptest! {
        #[test]
        fn prop_secure_filename_is_single_component(name in any::<String>()) {
            let safe = secure_filename(&name);
            prop_assert!(!safe.is_empty());
            prop_assert!(!safe.contains('/'));
            prop_assert!(!safe.contains('\\'));
            prop_assert!(!safe.starts_with('.'));
            prop_assert!(safe.chars().all(|c| c.is_ascii_alphanumeric() || "_.-".contains(c)));
        }
    }
}
