use log::debug;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use url::Url;

/// Attributes holding an image source, in order of preference.
const SOURCE_ATTRIBUTES: [&str; 5] = [
    "src",
    "data-src",
    "data-original-src",
    "data-lazy-src",
    "data-pin-media",
];

/// Whole-word keywords marking logos, icons and other non-content images.
static EXCLUDED_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:logo|icon|avatar|social|ad|advertisement)\b")
        .expect("Invalid excluded image regex")
});

static IMG: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img").expect("Invalid img selector"));

/// Collects absolute image URLs from every `img` element in document order.
///
/// The primary source of an element comes first, followed by every entry of its
/// `srcset`. Only the primary source goes through the keyword filter. Duplicates
/// are kept.
pub fn extract_image_candidates(document: &Html, base_url: &str) -> Vec<String> {
    let base = Url::parse(base_url).ok();
    let mut candidates = Vec::new();

    for img in document.select(&IMG) {
        if let Some(url) = primary_source(&img).and_then(|src| resolve_image_url(base.as_ref(), src)) {
            if is_excluded_image(&url) {
                debug!("Skipping non-content image {}", url);
            } else {
                candidates.push(url);
            }
        }

        if let Some(srcset) = img.value().attr("srcset") {
            candidates.extend(
                srcset_urls(srcset)
                    .into_iter()
                    .filter_map(|src| resolve_image_url(base.as_ref(), src)),
            );
        }
    }

    debug!("Found {} image candidates", candidates.len());
    candidates
}

/// First usable source attribute. Inline `data:` placeholders do not count.
fn primary_source<'a>(img: &ElementRef<'a>) -> Option<&'a str> {
    SOURCE_ATTRIBUTES
        .iter()
        .filter_map(|attr| img.value().attr(attr))
        .map(str::trim)
        .find(|src| !src.is_empty() && !src.starts_with("data:"))
}

/// Makes `src` absolute against the page URL. Absolute URLs are returned untouched.
pub fn resolve_image_url(base: Option<&Url>, src: &str) -> Option<String> {
    let src = src.trim();
    if src.is_empty() || src.starts_with("data:") {
        return None;
    }

    let lower = src.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return Some(src.to_string());
    }

    base?.join(src).ok().map(|url| url.to_string())
}

/// True when a logo/icon/avatar/social/ad keyword appears as a whole word.
pub fn is_excluded_image(url: &str) -> bool {
    EXCLUDED_IMAGE.is_match(url)
}

/// Splits `"url 1x, url 2x"` into its URLs. Commas inside a URL are kept.
fn srcset_urls(srcset: &str) -> Vec<&str> {
    let mut urls = Vec::new();
    let mut rest = srcset;

    loop {
        rest = rest.trim_start_matches(|c: char| c == ',' || c.is_whitespace());
        if rest.is_empty() {
            break;
        }

        let url_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let url = rest[..url_end].trim_end_matches(',');
        if !url.is_empty() {
            urls.push(url);
        }

        // An unspaced trailing comma already ended this candidate
        if rest[..url_end].ends_with(',') {
            rest = &rest[url_end..];
            continue;
        }

        // Skip the descriptor up to the next comma
        rest = &rest[url_end..];
        rest = match rest.find(',') {
            Some(comma) => &rest[comma + 1..],
            None => "",
        };
    }

    urls
}
