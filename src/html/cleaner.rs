use super::images::resolve_image_url;
use crate::config::CleanerConfig;
use log::debug;
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use url::Url;

pub const TRUNCATION_MARKER: &str = "\n\n[Content truncated for processing speed]";

/// Page chrome that never carries recipe content.
const BOILERPLATE_SELECTORS: &[&str] = &[
    "nav",
    "header",
    "footer",
    ".nav",
    ".navigation",
    ".header",
    ".footer",
    ".breadcrumb",
    ".breadcrumbs",
    ".pagination",
    ".pager",
    ".advertisement",
    ".ads",
    ".ad",
    ".social-share",
    ".share-buttons",
    ".comments-section",
    ".user-reviews-section",
    ".related-recipes",
    ".more-recipes",
    ".newsletter",
    ".popup",
    ".modal",
    "iframe",
    "svg",
    "defs",
    "symbol",
];

/// Navigation words that survive as standalone lines on most sites.
const BOILERPLATE_LINES: &[&str] = &["home", "recipes", "search", "login", "sign up", "subscribe"];

static NON_CONTENT: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("script, style, noscript").expect("Invalid non-content selector")
});

static BOILERPLATE: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    BOILERPLATE_SELECTORS
        .iter()
        .filter_map(|selector| Selector::parse(selector).ok())
        .collect()
});

static IMG: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img").expect("Invalid img selector"));

static BLANK_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n\s*\n").expect("Invalid blank line regex"));

/// Reduces page HTML to the text a model needs to find the recipe.
///
/// Boilerplate regions are dropped and the remaining text is flattened to one
/// line per text node. Image hints are listed first so the model can pick a
/// picture from URLs that really exist on the page. When cleaning removes too
/// much, the whole page text is used instead.
pub fn clean_html(html: &str, base_url: &str, config: &CleanerConfig) -> String {
    let base = Url::parse(base_url).ok();

    let mut document = Html::parse_document(html);
    strip_non_content(&mut document);
    for selector in BOILERPLATE.iter() {
        detach_matching(&mut document, selector);
    }

    let hints = image_hints(&document, base.as_ref());
    let body = join_lines(document_lines(&document).filter(|line| !is_boilerplate_line(line)));

    let mut text = if hints.is_empty() {
        body
    } else {
        format!("Images:\n{}\n\n{}", hints.join("\n"), body)
    };

    if text.chars().count() < config.min_chars {
        debug!(
            "Cleaned text too short ({} chars), falling back to full page text",
            text.chars().count()
        );
        let mut original = Html::parse_document(html);
        strip_non_content(&mut original);
        text = join_lines(document_lines(&original));
    }

    let text = BLANK_RUNS.replace_all(&text, "\n\n").into_owned();
    truncate(text, config.max_chars)
}

/// Removes `script`, `style`, `noscript` and HTML comments.
fn strip_non_content(document: &mut Html) {
    detach_matching(document, &NON_CONTENT);

    let comments: Vec<_> = document
        .tree
        .root()
        .descendants()
        .filter(|node| node.value().is_comment())
        .map(|node| node.id())
        .collect();
    for id in comments {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}

fn detach_matching(document: &mut Html, selector: &Selector) {
    let ids: Vec<_> = document.select(selector).map(|element| element.id()).collect();
    for id in ids {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}

fn image_hints(document: &Html, base: Option<&Url>) -> Vec<String> {
    document
        .select(&IMG)
        .filter_map(|img| {
            let src = img.value().attr("src")?;
            let src = resolve_image_url(base, src)?;
            match img.value().attr("alt").map(str::trim) {
                Some(alt) if !alt.is_empty() => Some(format!("Image: {} (alt: {})", src, alt)),
                _ => Some(format!("Image: {}", src)),
            }
        })
        .collect()
}

/// Trimmed text lines in document order, skipping anything of two characters or less.
fn document_lines<'a>(document: &'a Html) -> impl Iterator<Item = &'a str> + 'a {
    document
        .root_element()
        .text()
        .flat_map(str::lines)
        .map(str::trim)
        .filter(|line| line.chars().count() > 2)
}

fn is_boilerplate_line(line: &str) -> bool {
    let lower = line.to_lowercase();
    BOILERPLATE_LINES.contains(&lower.as_str())
}

fn join_lines<'a>(lines: impl Iterator<Item = &'a str>) -> String {
    lines.collect::<Vec<_>>().join("\n")
}

fn truncate(text: String, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{}", &text[..cut], TRUNCATION_MARKER),
        None => text,
    }
}
