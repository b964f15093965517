use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The four normalized JPEG buffers captured across one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionAssets {
    pub workspace_start: Vec<u8>,
    pub selfie_start: Vec<u8>,
    pub workspace_end: Vec<u8>,
    pub selfie_end: Vec<u8>,
}

/// Immutable finished-session record handed to the persistence and sync
/// collaborators. Built once at finalize time; the core keeps no reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub duration_secs: u64,
    pub assets: SessionAssets,
}

/// Formats elapsed seconds as `MM:SS.cc` for display.
pub fn format_elapsed(secs: f64) -> String {
    let whole = secs as u64;
    let minutes = whole / 60;
    let seconds = whole % 60;
    let centis = ((secs - whole as f64) * 100.0) as u64;
    format!("{minutes:02}:{seconds:02}.{centis:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_elapsed_zero() {
        assert_eq!(format_elapsed(0.0), "00:00.00");
    }

    #[test]
    fn test_format_elapsed_whole_seconds() {
        assert_eq!(format_elapsed(45.0), "00:45.00");
    }

    #[test]
    fn test_format_elapsed_minutes_and_centis() {
        assert_eq!(format_elapsed(90.5), "01:30.50");
        assert_eq!(format_elapsed(125.25), "02:05.25");
    }
}
