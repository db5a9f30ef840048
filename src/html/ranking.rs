use crate::config::ImageRankingConfig;
use log::debug;

/// Picks the image most likely to be the recipe's hero shot.
///
/// Returns an empty string when there are no candidates. Matching is on lowercase
/// substrings of the URL, using the token lists from [`ImageRankingConfig`].
pub fn select_best_image(candidates: &[String], config: &ImageRankingConfig) -> String {
    let Some(first) = candidates.first() else {
        return String::new();
    };

    // CDN thumbnail paths serving a known featured size win outright
    if let Some(featured) = candidates.iter().find(|url| is_featured(url, config)) {
        debug!("Selected featured image {}", featured);
        return featured.clone();
    }

    let mut fallback: Option<&String> = None;
    for url in candidates {
        let lower = url.to_lowercase();
        if contains_any(&lower, &config.large_tokens) {
            debug!("Selected large image {}", url);
            return url.clone();
        }
        if contains_any(&lower, &config.small_tokens) {
            continue;
        }
        fallback = Some(url);
    }

    fallback.unwrap_or(first).clone()
}

fn is_featured(url: &str, config: &ImageRankingConfig) -> bool {
    let lower = url.to_lowercase();
    contains_any(&lower, &config.thumbnail_paths)
        && contains_any(&lower, &config.featured_sizes)
        && !contains_any(&lower, &config.featured_exclusions)
}

fn contains_any(haystack: &str, tokens: &[String]) -> bool {
    tokens
        .iter()
        .any(|token| haystack.contains(token.to_lowercase().as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rank(urls: &[&str]) -> String {
        let candidates: Vec<String> = urls.iter().map(|url| url.to_string()).collect();
        select_best_image(&candidates, &ImageRankingConfig::default())
    }

    #[test]
    fn test_empty_candidates() {
        assert_eq!(rank(&[]), "");
    }

    #[test]
    fn test_featured_thumbnail_wins() {
        assert_eq!(
            rank(&[
                "https://cdn.example.com/photos/original-soup.jpg",
                "https://cdn.example.com/thmb/abc=/1500x0/soup.jpg",
                "https://cdn.example.com/thmb/abc=/750x0/soup.jpg",
            ]),
            "https://cdn.example.com/thmb/abc=/1500x0/soup.jpg"
        );
    }

    #[test]
    fn test_featured_exclusions() {
        // Author headshots on the thumbnail CDN are not featured images
        assert_eq!(
            rank(&[
                "https://cdn.example.com/thmb/x=/800x800/headshot.jpg",
                "https://cdn.example.com/img/soup-large.jpg",
                "https://cdn.example.com/thmb/y=/750x0/soup.jpg",
            ]),
            "https://cdn.example.com/thmb/y=/750x0/soup.jpg"
        );
    }

    #[test]
    fn test_large_token_beats_earlier_plain() {
        assert_eq!(
            rank(&[
                "https://x.com/soup.jpg",
                "https://x.com/soup-1200x800.jpg",
            ]),
            "https://x.com/soup-1200x800.jpg"
        );
    }

    #[test]
    fn test_small_token_skipped_before_large() {
        assert_eq!(
            rank(&["a/thumb-75x75.jpg", "a/photo-1200x.jpg"]),
            "a/photo-1200x.jpg"
        );
    }

    #[test]
    fn test_last_plain_candidate_when_nothing_large() {
        assert_eq!(
            rank(&[
                "https://x.com/step-1.jpg",
                "https://x.com/thumb-100x100.jpg",
                "https://x.com/step-2.jpg",
                "https://x.com/thumb-150x150.jpg",
            ]),
            "https://x.com/step-2.jpg"
        );
    }

    #[test]
    fn test_first_when_everything_is_small() {
        assert_eq!(
            rank(&[
                "https://x.com/a-75x75.jpg",
                "https://x.com/b-100x100.jpg",
            ]),
            "https://x.com/a-75x75.jpg"
        );
    }

    #[test]
    fn test_matching_ignores_case() {
        assert_eq!(
            rank(&["https://x.com/a.jpg", "https://x.com/SOUP-LARGE.JPG"]),
            "https://x.com/SOUP-LARGE.JPG"
        );
    }
}
