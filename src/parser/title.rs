use std::sync::LazyLock;

use regex::Regex;

/// Title shapes that name a single performer, tried in order.
static ARTIST_TITLE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // "The Beatles' 12 Greatest Hits", "Prince's 10 Best"
        r"(?i)^(.+?)['’]s?\s+\d+\s+(?:greatest hits|best|favorites)",
        // "Van Morrison – The Belfast Years"
        r"^(.+?)\s+[-–—]",
        // "Bowie Redux"
        r"(?i)^(.+?)\s+redux\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Performer implied by a show title, if the title has one of the known
/// single-artist shapes.
pub fn infer_single_artist(title: &str) -> Option<String> {
    ARTIST_TITLE_PATTERNS.iter().find_map(|re| {
        re.captures(title.trim())
            .map(|c| c[1].trim().to_string())
            .filter(|a| !a.is_empty())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greatest_hits_possessive() {
        assert_eq!(
            infer_single_artist("The Beatles' 12 Greatest Hits").as_deref(),
            Some("The Beatles")
        );
        assert_eq!(
            infer_single_artist("Prince's 10 best").as_deref(),
            Some("Prince")
        );
        assert_eq!(
            infer_single_artist("Dylan’s 20 Favorites").as_deref(),
            Some("Dylan")
        );
    }

    #[test]
    fn dash_theme() {
        assert_eq!(
            infer_single_artist("Van Morrison – The Belfast Years").as_deref(),
            Some("Van Morrison")
        );
        assert_eq!(
            infer_single_artist("Joni Mitchell - Blue at 50").as_deref(),
            Some("Joni Mitchell")
        );
    }

    #[test]
    fn redux() {
        assert_eq!(infer_single_artist("Bowie Redux").as_deref(), Some("Bowie"));
    }

    #[test]
    fn first_pattern_wins() {
        // matches both the greatest-hits and the dash shapes
        assert_eq!(
            infer_single_artist("Queen's 5 Best - Live").as_deref(),
            Some("Queen")
        );
    }

    #[test]
    fn plain_titles_infer_nothing() {
        assert_eq!(infer_single_artist("Prince Tribute"), None);
        assert_eq!(infer_single_artist("Best Albums of 2009"), None);
        assert_eq!(infer_single_artist("Reduxed Sounds"), None);
    }
}
