//! Media URL handling.
//!
//! The remote API stores upload locations in whatever form the uploading
//! host produced: absolute URLs pointing at an old host, Windows-style
//! backslashed paths, or bare paths. Every image is served from the CDN, so
//! all of them are re-based onto the configured CDN base URL.

use url::Url;

/// Largest profile image accepted for upload (3 MiB).
pub const MAX_IMAGE_BYTES: usize = 3 * 1024 * 1024;

/// Errors for media uploads.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MediaError {
    /// The file exceeds [`MAX_IMAGE_BYTES`].
    #[error("Image size must be less than 3MB (got {size} bytes)")]
    TooLarge { size: usize },
    /// The uploaded file is not an image.
    #[error("File must be an image")]
    NotAnImage,
}

/// Check an uploaded image against the size limit and content type.
///
/// # Errors
///
/// Returns [`MediaError::TooLarge`] for files over 3 MiB and
/// [`MediaError::NotAnImage`] when a content type is given that is not `image/*`.
pub fn check_image(size: usize, content_type: Option<&str>) -> Result<(), MediaError> {
    if size > MAX_IMAGE_BYTES {
        return Err(MediaError::TooLarge { size });
    }
    if let Some(content_type) = content_type
        && !content_type.starts_with("image/")
    {
        return Err(MediaError::NotAnImage);
    }
    Ok(())
}

/// Re-base a stored media location onto the CDN.
///
/// - `None` or a blank string gives `None`.
/// - Backslashes become forward slashes.
/// - An absolute URL keeps only its path, joined onto `cdn_base`.
/// - Anything else has any `scheme:` and `//host` prefix removed, leading
///   slashes collapsed to one, and is appended to `cdn_base`.
#[must_use]
pub fn normalize_media_url(raw: Option<&str>, cdn_base: &Url) -> Option<String> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    let cleaned = raw.replace('\\', "/");

    if let Ok(parsed) = Url::parse(&cleaned)
        && !parsed.cannot_be_a_base()
        && let Ok(joined) = cdn_base.join(parsed.path())
    {
        return Some(joined.to_string());
    }

    let path = strip_origin(&cleaned).trim_start_matches('/');
    let base = cdn_base.as_str().trim_end_matches('/');
    Some(format!("{base}/{path}"))
}

/// Remove a leading `http:`/`https:` scheme and `//host` authority.
fn strip_origin(s: &str) -> &str {
    let lower = s.to_ascii_lowercase();
    let without_scheme = if lower.starts_with("https:") {
        s.get("https:".len()..).unwrap_or_default()
    } else if lower.starts_with("http:") {
        s.get("http:".len()..).unwrap_or_default()
    } else {
        s
    };

    match without_scheme.strip_prefix("//") {
        Some(authority_and_path) => authority_and_path
            .find('/')
            .and_then(|idx| authority_and_path.get(idx..))
            .unwrap_or_default(),
        None => without_scheme,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn cdn() -> Url {
        Url::parse("https://cdn.pusatoleholeh.id").unwrap()
    }

    #[test]
    fn test_absent_or_blank() {
        assert_eq!(normalize_media_url(None, &cdn()), None);
        assert_eq!(normalize_media_url(Some("  "), &cdn()), None);
    }

    #[test]
    fn test_absolute_url_rebased() {
        assert_eq!(
            normalize_media_url(
                Some("http://localhost:8000/uploads/product/cover.jpg"),
                &cdn()
            )
            .as_deref(),
            Some("https://cdn.pusatoleholeh.id/uploads/product/cover.jpg")
        );
    }

    #[test]
    fn test_absolute_url_with_backslashes() {
        assert_eq!(
            normalize_media_url(
                Some("http://api.example.com\\uploads\\shop\\logo.png"),
                &cdn()
            )
            .as_deref(),
            Some("https://cdn.pusatoleholeh.id/uploads/shop/logo.png")
        );
    }

    #[test]
    fn test_query_string_dropped() {
        assert_eq!(
            normalize_media_url(Some("https://old.host/a/b.jpg?v=2"), &cdn()).as_deref(),
            Some("https://cdn.pusatoleholeh.id/a/b.jpg")
        );
    }

    #[test]
    fn test_relative_paths() {
        assert_eq!(
            normalize_media_url(Some("/uploads/a.jpg"), &cdn()).as_deref(),
            Some("https://cdn.pusatoleholeh.id/uploads/a.jpg")
        );
        assert_eq!(
            normalize_media_url(Some("uploads\\a.jpg"), &cdn()).as_deref(),
            Some("https://cdn.pusatoleholeh.id/uploads/a.jpg")
        );
        assert_eq!(
            normalize_media_url(Some("///uploads/a.jpg"), &cdn()).as_deref(),
            Some("https://cdn.pusatoleholeh.id/uploads/a.jpg")
        );
    }

    #[test]
    fn test_protocol_relative() {
        assert_eq!(
            normalize_media_url(Some("//old.host/uploads/a.jpg"), &cdn()).as_deref(),
            Some("https://cdn.pusatoleholeh.id/uploads/a.jpg")
        );
    }

    #[test]
    fn test_cdn_base_trailing_slash() {
        let base = Url::parse("https://cdn.example.com/").unwrap();
        assert_eq!(
            normalize_media_url(Some("img/x.png"), &base).as_deref(),
            Some("https://cdn.example.com/img/x.png")
        );
    }

    #[test]
    fn test_check_image() {
        assert!(check_image(1024, Some("image/png")).is_ok());
        assert!(check_image(MAX_IMAGE_BYTES, None).is_ok());
        assert_eq!(
            check_image(MAX_IMAGE_BYTES + 1, Some("image/jpeg")),
            Err(MediaError::TooLarge {
                size: MAX_IMAGE_BYTES + 1
            })
        );
        assert_eq!(
            check_image(10, Some("application/pdf")),
            Err(MediaError::NotAnImage)
        );
    }
}
