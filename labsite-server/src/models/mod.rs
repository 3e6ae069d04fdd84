//! Record types and form validation
//!
//! Stored records are immutable snapshots of a database row.
//! Missing form input returns ValidationError, not panic.

pub mod validation;
pub mod news;
pub mod member;

pub use validation::ValidationError;
pub use news::{parse_featured, NewNews, NewsItem};
pub use member::{Member, NewMember};

/// Turn a stored image path into the URL clients fetch it from.
///
/// Empty values stay empty; anything else gets a leading `/`.
pub fn public_image_url(image: &str) -> String {
    if image.is_empty() {
        String::new()
    } else {
        format!("/{}", image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_url_prefixing() {
        assert_eq!(public_image_url(""), "");
        assert_eq!(public_image_url("profile/jane.png"), "/profile/jane.png");
    }
}
