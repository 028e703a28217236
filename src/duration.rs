use crate::model::Difficulty;
use once_cell::sync::Lazy;
use regex::Regex;

static ISO_DURATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"PT(?:(\d+)H)?(?:(\d+)M)?").unwrap());

/// Parse an ISO 8601 style duration ("PT15M", "PT1H30M") into whole minutes.
///
/// Missing hour or minute groups count as zero, and input without a
/// duration yields 0 rather than an error.
pub fn parse_duration(text: &str) -> u32 {
    let Some(captures) = ISO_DURATION_RE.captures(text) else {
        return 0;
    };

    let group = |index: usize| -> u32 {
        captures
            .get(index)
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .unwrap_or(0)
    };

    group(1).saturating_mul(60).saturating_add(group(2))
}

/// Classify difficulty from total minutes: Easy up to 20, Medium up to 45.
pub fn classify_difficulty(total_minutes: u32) -> Difficulty {
    Difficulty::from_total_minutes(total_minutes)
}
