//! Everything the importer reads out of page HTML before the model is involved.

mod cleaner;
mod images;
mod ranking;

pub use cleaner::{clean_html, TRUNCATION_MARKER};
pub use images::{extract_image_candidates, is_excluded_image, resolve_image_url};
pub use ranking::select_best_image;
