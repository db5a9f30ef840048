//! Last-resort cook time extraction from page text.

use log::debug;
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// How the capture groups of a pattern combine into minutes.
#[derive(Debug, Clone, Copy)]
enum TimeKind {
    /// `(hours)(minutes)`
    HoursMinutes,
    /// `(minutes)`
    Minutes,
    /// `(hours)`
    Hours,
    /// `(prep minutes)(cook minutes)`
    PrepPlusCook,
    /// `(prep minutes)(cook hours)(cook minutes)`
    PrepPlusCookHours,
}

const HOURS: &str = r"(?:hrs?|hours?)";
const MINUTES: &str = r"(?:mins?|minutes?)";

/// Patterns from most to least specific. `\s*` after each label also spans a line break.
static PATTERNS: LazyLock<Vec<(Regex, TimeKind)>> = LazyLock::new(|| {
    let hm = format!(r"(\d+)\s*{HOURS}\s*(\d+)\s*{MINUTES}");
    let m = format!(r"(\d+)\s*{MINUTES}");
    let h = format!(r"(\d+)\s*{HOURS}\b");

    let patterns = [
        (format!(r"Total Time:\s*{hm}"), TimeKind::HoursMinutes),
        (format!(r"Total Time:\s*{m}"), TimeKind::Minutes),
        (format!(r"Total Time:\s*{h}"), TimeKind::Hours),
        (
            format!(r"Prep Time:\s*{m}\s*\+\s*Cook Time:\s*{hm}"),
            TimeKind::PrepPlusCookHours,
        ),
        (
            format!(r"Prep Time:\s*{m}\s*\+\s*Cook Time:\s*{m}"),
            TimeKind::PrepPlusCook,
        ),
        (format!(r"Cook Time:\s*{hm}"), TimeKind::HoursMinutes),
        (format!(r"Cook Time:\s*{m}"), TimeKind::Minutes),
        (format!(r"Cook Time:\s*{h}"), TimeKind::Hours),
        (format!(r"Time:\s*{hm}"), TimeKind::HoursMinutes),
        (format!(r"Time:\s*{m}"), TimeKind::Minutes),
        (format!(r"Duration:\s*{hm}"), TimeKind::HoursMinutes),
        (format!(r"Duration:\s*{m}"), TimeKind::Minutes),
        (format!(r"{hm}\s*Total"), TimeKind::HoursMinutes),
        (format!(r"{m}\s*Total"), TimeKind::Minutes),
        (format!(r"Total:\s*{hm}"), TimeKind::HoursMinutes),
        (format!(r"Total:\s*{m}"), TimeKind::Minutes),
    ];

    patterns
        .into_iter()
        .map(|(pattern, kind)| {
            let regex = Regex::new(&format!("(?i){}", pattern)).expect("Invalid cook time regex");
            (regex, kind)
        })
        .collect()
});

/// Finds a cook time in `text` and returns it as a whole number of minutes.
///
/// The first matching pattern wins. Returns `None` when no time phrase is found.
pub fn extract_cook_time(text: &str) -> Option<String> {
    PATTERNS.iter().find_map(|(regex, kind)| {
        let caps = regex.captures(text)?;
        let minutes = total_minutes(&caps, *kind)?;
        debug!("Cook time {} min from {:?} pattern", minutes, kind);
        Some(minutes.to_string())
    })
}

fn total_minutes(caps: &Captures, kind: TimeKind) -> Option<u32> {
    let group = |i: usize| -> Option<u32> { caps.get(i)?.as_str().parse().ok() };

    let minutes = match kind {
        TimeKind::HoursMinutes => group(1)?.checked_mul(60)?.checked_add(group(2)?)?,
        TimeKind::Minutes => group(1)?,
        TimeKind::Hours => group(1)?.checked_mul(60)?,
        TimeKind::PrepPlusCook => group(1)?.checked_add(group(2)?)?,
        TimeKind::PrepPlusCookHours => group(1)?
            .checked_add(group(2)?.checked_mul(60)?)?
            .checked_add(group(3)?)?,
    };

    Some(minutes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_time_hours_and_minutes() {
        assert_eq!(extract_cook_time("Total Time: 3 hrs 5 mins").as_deref(), Some("185"));
        assert_eq!(extract_cook_time("total time:\n1 hour 10 minutes").as_deref(), Some("70"));
    }

    #[test]
    fn test_total_time_minutes() {
        assert_eq!(
            extract_cook_time("Prep Time: 10 mins\nTotal Time: 45 mins").as_deref(),
            Some("45")
        );
    }

    #[test]
    fn test_hours_only() {
        assert_eq!(extract_cook_time("Total Time: 2 hours").as_deref(), Some("120"));
        assert_eq!(extract_cook_time("Cook Time: 1 hr").as_deref(), Some("60"));
    }

    #[test]
    fn test_prep_plus_cook() {
        assert_eq!(
            extract_cook_time("Prep Time: 15 mins + Cook Time: 20 mins").as_deref(),
            Some("35")
        );
        assert_eq!(
            extract_cook_time("Prep Time:\n15 mins + Cook Time:\n1 hr 5 mins").as_deref(),
            Some("80")
        );
    }

    #[test]
    fn test_cook_time_without_total() {
        assert_eq!(
            extract_cook_time("Prep Time: 15 mins\nCook Time: 25 mins").as_deref(),
            Some("25")
        );
    }

    #[test]
    fn test_generic_labels() {
        assert_eq!(extract_cook_time("Time: 40 minutes").as_deref(), Some("40"));
        assert_eq!(extract_cook_time("Duration: 1 hr 15 mins").as_deref(), Some("75"));
        assert_eq!(extract_cook_time("Ready in 50 mins total").as_deref(), Some("50"));
        assert_eq!(extract_cook_time("Total: 12 min").as_deref(), Some("12"));
    }

    #[test]
    fn test_no_time_phrase() {
        assert_eq!(extract_cook_time("Mix the flour with 2 eggs and bake."), None);
        assert_eq!(extract_cook_time(""), None);
    }
}
