//! TMDB image URL helpers.

use crate::network::DataQuality;

/// Base URL of the TMDB image CDN.
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/";

/// Poster width for a data-quality tier.
#[must_use]
pub const fn poster_size(quality: DataQuality) -> &'static str {
    match quality {
        DataQuality::High => "w500",
        DataQuality::Medium => "w342",
        DataQuality::Low => "w185",
    }
}

/// Builds a poster URL sized for the connection; `None` when there is no poster.
#[must_use]
pub fn poster_url(path: Option<&str>, quality: DataQuality) -> Option<String> {
    let path = path?.trim();
    if path.is_empty() {
        return None;
    }
    let path = path.strip_prefix('/').unwrap_or(path);
    Some(format!("{IMAGE_BASE_URL}{}/{path}", poster_size(quality)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poster_url_by_quality() {
        // Arrange
        let path = Some("/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg");

        // Act & Assert
        assert_eq!(
            poster_url(path, DataQuality::High).as_deref(),
            Some("https://image.tmdb.org/t/p/w500/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg")
        );
        assert_eq!(
            poster_url(path, DataQuality::Medium).as_deref(),
            Some("https://image.tmdb.org/t/p/w342/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg")
        );
        assert_eq!(
            poster_url(path, DataQuality::Low).as_deref(),
            Some("https://image.tmdb.org/t/p/w185/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg")
        );
    }

    #[test]
    fn test_poster_url_missing_path() {
        // Arrange & Act & Assert
        assert_eq!(poster_url(None, DataQuality::High), None);
        assert_eq!(poster_url(Some(""), DataQuality::High), None);
    }
}
