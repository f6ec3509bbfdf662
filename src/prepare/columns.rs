// src/prepare/columns.rs

//! Canonical column names and the export vocabularies mapped onto them.

pub const DATE: &str = "date";
pub const AD_ID: &str = "ad_id";
pub const IMPRESSIONS: &str = "impressions";
pub const ENGAGEMENTS: &str = "engagements";
pub const CLICKS: &str = "clicks";
pub const CONVERSIONS: &str = "conversions";

pub const TRIALS: &str = "trials";
pub const SUCCESSES: &str = "successes";
pub const OPTION_ID: &str = "option_id";
pub const DAYS_AGO: &str = "days_ago";

/// Columns that must exist once synonyms have been resolved.
pub const REQUIRED: [&str; 6] = [DATE, AD_ID, IMPRESSIONS, ENGAGEMENTS, CLICKS, CONVERSIONS];

/// Columns that are zero-filled and folded into `successes`.
pub const SIGNALS: [&str; 3] = [ENGAGEMENTS, CLICKS, CONVERSIONS];

/// Columns that are not part of an option's identity.
pub const NON_DESCRIPTIVE: [&str; 5] = [DATE, TRIALS, SUCCESSES, OPTION_ID, DAYS_AGO];

/// Facebook Ads export: "Reporting ends", "Post engagement", "Link clicks", "Purchases".
const FACEBOOK_SYNONYMS: [(&str, &str); 4] = [
    ("reporting_ends", DATE),
    ("post_engagement", ENGAGEMENTS),
    ("link_clicks", CLICKS),
    ("purchases", CONVERSIONS),
];

/// Google Ads export: "Day".
const GOOGLE_SYNONYMS: [(&str, &str); 1] = [("day", DATE)];

/// Facebook exports carry a start date that nothing downstream uses.
pub const DROPPED: [&str; 1] = ["reporting_starts"];

/// Lower-case and replace spaces with underscores: `"Link Clicks"` → `"link_clicks"`.
pub fn standardize_name(raw: &str) -> String {
    raw.to_lowercase().replace(' ', "_")
}

/// Map a standardized name to its canonical name. Unknown names pass through.
pub fn canonical_name(standardized: &str) -> &str {
    FACEBOOK_SYNONYMS
        .iter()
        .chain(GOOGLE_SYNONYMS.iter())
        .find(|(from, _)| *from == standardized)
        .map(|(_, to)| *to)
        .unwrap_or(standardized)
}
