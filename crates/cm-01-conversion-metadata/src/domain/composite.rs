//! # Composite Key Codec
//!
//! Packs the CPC+ processed flag and the creation instant into the single
//! `CpcProcessed_CreateDate` attribute that keys the CPC+ secondary index,
//! and splits it back apart.
//!
//! ```text
//! "<true|false>#<ISO-8601 instant>"      e.g. "true#2017-12-08T18:32:54.846Z"
//! ```
//!
//! Sorting the encoded strings groups records by processed flag and then by
//! creation time, which is the range query the downstream batch runs.

use chrono::{DateTime, Datelike, SecondsFormat, Utc};

use crate::domain::errors::MetadataError;

/// Separator between the processed flag and the timestamp.
pub const COMPOSITE_DELIMITER: char = '#';

/// How to treat a composite that does not split into two fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodePolicy {
    /// Skip it and leave the source fields untouched.
    ///
    /// Items written by older producers may carry such values.
    #[default]
    Lenient,
    /// Reject it with [`MetadataError::IncompleteComposite`].
    Strict,
}

/// Format an instant the way the composite and `CreateDate` store it.
///
/// UTC with a `Z` suffix. The fraction of a second is dropped when zero and
/// otherwise printed as 3, 6 or 9 digits, whichever holds every non-zero digit.
pub fn format_instant(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Parse a strict ISO-8601 UTC instant (`YYYY-MM-DDTHH:MM:SS[.f+]Z`).
///
/// Years outside 0000..=9999 use the signed expanded form written by
/// [`format_instant`] (`+10000-01-01T00:00:00Z`). Offsets other than `Z`
/// are rejected.
pub fn parse_instant(value: &str) -> Result<DateTime<Utc>, MetadataError> {
    let malformed = || MetadataError::MalformedTimestamp {
        value: value.to_string(),
    };

    if !(value.ends_with('Z') || value.ends_with('z')) {
        return Err(malformed());
    }

    let (expanded_year, canonical) = match split_expanded_year(value) {
        Some((year, rest)) => (Some(year), format!("2000{rest}")),
        None if value.starts_with(['+', '-']) => return Err(malformed()),
        None => (None, value.to_string()),
    };

    if !matches!(canonical.as_bytes().get(10), Some(b'T' | b't')) {
        return Err(malformed());
    }

    let parsed = DateTime::parse_from_rfc3339(&canonical)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|_| malformed())?;

    // 2000 is a leap year, so 02-29 parses; with_year rejects it for others.
    match expanded_year {
        Some(year) => parsed.with_year(year).ok_or_else(malformed),
        None => Ok(parsed),
    }
}

/// Split `+YYYYY-...` / `-YYYY-...` into the signed year and the `-MM-DD...` rest.
fn split_expanded_year(value: &str) -> Option<(i32, &str)> {
    let negative = match value.as_bytes().first()? {
        b'+' => false,
        b'-' => true,
        _ => return None,
    };
    let unsigned = &value[1..];
    let digits_end = unsigned.find('-')?;
    let digits = &unsigned[..digits_end];
    if digits.len() < 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = digits.parse().ok()?;
    Some((if negative { -year } else { year }, &unsigned[digits_end..]))
}

/// Encode the processed flag and creation instant into one attribute value.
pub fn encode(processed: bool, created: &DateTime<Utc>) -> String {
    format!("{}{}{}", processed, COMPOSITE_DELIMITER, format_instant(created))
}

/// Decode a composite attribute value.
///
/// Trailing `#`s are dropped, then the value is split on the first `#`.
/// Returns `Ok(None)` under [`DecodePolicy::Lenient`] when no delimiter is
/// left (`""`, `"true"`, `"true#"`, `"##"`). Both fields are parsed before
/// anything is returned, so callers can assign them together.
pub fn decode(
    value: &str,
    policy: DecodePolicy,
) -> Result<Option<(bool, DateTime<Utc>)>, MetadataError> {
    let Some((flag, created)) = value
        .trim_end_matches(COMPOSITE_DELIMITER)
        .split_once(COMPOSITE_DELIMITER)
    else {
        return match policy {
            DecodePolicy::Lenient => Ok(None),
            DecodePolicy::Strict => Err(MetadataError::IncompleteComposite {
                value: value.to_string(),
            }),
        };
    };

    let processed = parse_flag(flag)?;
    let created = parse_instant(created)?;
    Ok(Some((processed, created)))
}

fn parse_flag(flag: &str) -> Result<bool, MetadataError> {
    match flag {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(MetadataError::MalformedProcessedFlag {
            value: other.to_string(),
        }),
    }
}
