mod chrome;
mod request;

pub use chrome::ChromeFetcher;
pub use request::RequestFetcher;

use crate::error::ImportError;
use async_trait::async_trait;
use std::time::Duration;

/// Turns a URL into page HTML.
///
/// A renderer should stop waiting after `timeout` and hand back whatever it has;
/// only a page that produced nothing at all is an error.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    fn renderer_name(&self) -> &str;

    async fn render(&self, url: &str, timeout: Duration) -> Result<String, ImportError>;
}

/// Whole milliseconds in `duration`, saturating at `u64::MAX`.
pub(crate) fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
