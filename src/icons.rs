//! Weather code → icon key mapping
//!
//! wttr.in reports WWO weather codes (113 = sunny, 395 = snow with thunder, ...).
//! The UI only distinguishes a handful of icons, so codes are bucketed through
//! an ordered table. Lookups never fail: anything outside the table is `Sun`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Symbolic icon shown for the current condition
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum IconKey {
    Sun,
    CloudSun,
    Cloud,
    Wind,
    CloudRain,
    CloudSnow,
    CloudLightning,
}

/// Icon used when a code is unknown or unparseable
pub const FALLBACK_ICON: IconKey = IconKey::Sun;

/// Evaluated top to bottom, first match wins.
const ICON_TABLE: &[(&[i64], IconKey)] = &[
    (&[113], IconKey::Sun),
    (&[116], IconKey::CloudSun),
    (&[119, 122], IconKey::Cloud),
    (&[143, 248, 260], IconKey::Wind),
    (
        &[176, 293, 296, 302, 308, 353, 356, 359],
        IconKey::CloudRain,
    ),
    (
        &[
            179, 182, 185, 227, 230, 323, 326, 329, 332, 335, 338, 368, 371,
        ],
        IconKey::CloudSnow,
    ),
    (&[200, 386, 389, 392, 395], IconKey::CloudLightning),
];

impl IconKey {
    /// Map a provider weather code to its icon.
    pub fn from_code(code: i64) -> Self {
        ICON_TABLE
            .iter()
            .find(|(codes, _)| codes.contains(&code))
            .map(|&(_, icon)| icon)
            .unwrap_or(FALLBACK_ICON)
    }

    /// Map the provider's string-encoded code.
    ///
    /// Reads the leading integer (`" 116 "`, `"+395"`, `"200abc"` all parse);
    /// anything without one falls back to [`FALLBACK_ICON`].
    pub fn from_code_str(code: &str) -> Self {
        leading_integer(code)
            .map(Self::from_code)
            .unwrap_or(FALLBACK_ICON)
    }

    /// Stable identifier, matching the serde representation
    pub fn as_str(self) -> &'static str {
        match self {
            IconKey::Sun => "sun",
            IconKey::CloudSun => "cloud-sun",
            IconKey::Cloud => "cloud",
            IconKey::Wind => "wind",
            IconKey::CloudRain => "cloud-rain",
            IconKey::CloudSnow => "cloud-snow",
            IconKey::CloudLightning => "cloud-lightning",
        }
    }

    /// Emoji representation for when sprites don't fit
    pub fn emoji(self) -> &'static str {
        match self {
            IconKey::Sun => "\u{2600}\u{fe0f}",
            IconKey::CloudSun => "\u{26c5}",
            IconKey::Cloud => "\u{2601}\u{fe0f}",
            IconKey::Wind => "\u{1f32b}\u{fe0f}",
            IconKey::CloudRain => "\u{1f327}\u{fe0f}",
            IconKey::CloudSnow => "\u{1f328}\u{fe0f}",
            IconKey::CloudLightning => "\u{26c8}\u{fe0f}",
        }
    }
}

impl std::fmt::Display for IconKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn leading_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (sign, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    // Overlong digit runs are out of table anyway.
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}
