//! Data structures for seriestui
//!
//! Wire shapes served by the tracker backend, organized by screen:
//! - **Show**: the full aggregate behind the show detail view
//! - **Releases**: recorded release history and indexer hits
//! - **Series list**: summaries for the list of tracked shows
//! - **Logs**: backend log records

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// =============================================================================
// Serde helpers
// =============================================================================

/// Ids are opaque to the client; the backend sends them as numbers today.
fn opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// Show Aggregate
// =============================================================================

/// A tracked series and everything the backend knows about it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Show {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
    #[serde(rename = "tvdb_data")]
    pub metadata: ShowMetadata,
    #[serde(rename = "sonarr_data")]
    pub coverage: SeasonCoverage,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub releases: Vec<ReleaseRecord>,
    /// Replaced wholesale by the backend on every search
    #[serde(rename = "prowlarr_data", default, deserialize_with = "null_as_empty")]
    pub search_results: Vec<IndexerHit>,
    #[serde(rename = "prowlarr_search", default)]
    pub last_search_term: Option<String>,
}

impl Show {
    /// Primary title from the catalog
    pub fn title(&self) -> &str {
        &self.metadata.title
    }

    /// Query the search box starts with: the backend's last term, else the title
    pub fn default_query(&self) -> &str {
        match self.last_search_term.as_deref() {
            Some(term) if !term.is_empty() => term,
            _ => &self.metadata.title,
        }
    }

    /// Find a search result by primary key
    pub fn hit(&self, primary_key: &str) -> Option<&IndexerHit> {
        self.search_results
            .iter()
            .find(|h| h.primary_key == primary_key)
    }
}

impl fmt::Display for Show {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.metadata)
    }
}

/// Catalog metadata (read-only for the client)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowMetadata {
    pub title: String,
    #[serde(default)]
    pub title_en: Option<String>,
    #[serde(default)]
    pub year: Option<u16>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub genres: Vec<String>,
}

impl fmt::Display for ShowMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.year {
            Some(year) => write!(f, "{} ({})", self.title, year),
            None => write!(f, "{}", self.title),
        }
    }
}

/// Season coverage as reported by the series manager
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonCoverage {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub seasons: Vec<Season>,
}

impl SeasonCoverage {
    /// Regular seasons only; season 0 holds specials
    pub fn numbered(&self) -> impl Iterator<Item = &Season> {
        self.seasons.iter().filter(|s| s.season_number >= 1)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Season {
    pub season_number: u32,
    #[serde(rename = "total_episodes_count", default)]
    pub episode_count: u32,
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Season {} ({} episodes)",
            self.season_number, self.episode_count
        )
    }
}

// =============================================================================
// Release Models
// =============================================================================

/// A release the backend has recorded for this show
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseRecord {
    pub name: String,
    pub updated_at: String,
    #[serde(rename = "search", default)]
    pub search_term: String,
    #[serde(default)]
    pub torrent_is_finished: bool,
}

impl ReleaseRecord {
    pub fn updated_at_display(&self) -> String {
        format_timestamp(&self.updated_at)
    }
}

/// A candidate release returned by the indexer search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexerHit {
    #[serde(rename = "pk")]
    pub primary_key: String,
    pub title: String,
    /// Age in days
    #[serde(default)]
    pub age: u32,
    #[serde(default)]
    pub grabs: u32,
    #[serde(default)]
    pub seeders: u32,
    #[serde(default)]
    pub leechers: u32,
    #[serde(default)]
    pub info_url: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub indexer: String,
}

impl IndexerHit {
    pub fn age_descriptor(&self) -> String {
        match self.age {
            0 => "today".to_string(),
            1 => "1 day".to_string(),
            n => format!("{} days", n),
        }
    }

    pub fn format_size(&self) -> String {
        format_size(self.size)
    }
}

impl fmt::Display for IndexerHit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] S:{} L:{} G:{}",
            self.title,
            self.format_size(),
            self.seeders,
            self.leechers,
            self.grabs
        )
    }
}

// =============================================================================
// Series List Models
// =============================================================================

/// Row of the series list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowSummary {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
    #[serde(rename = "tvdb_data")]
    pub metadata: SummaryMetadata,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub missing_seasons: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetadata {
    pub title: String,
    #[serde(default)]
    pub year: Option<u16>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl fmt::Display for ShowSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.metadata.year {
            Some(year) => write!(f, "{} ({})", self.metadata.title, year),
            None => write!(f, "{}", self.metadata.title),
        }
    }
}

// =============================================================================
// Log Models
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogPage {
    pub records: Vec<LogEntry>,
}

/// One backend log record, newest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    #[serde(default)]
    pub component: String,
    pub message: String,
}

impl LogEntry {
    pub fn time_display(&self) -> String {
        format_timestamp(&self.time)
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self.level.to_ascii_uppercase().as_str(),
            "ERROR" | "CRITICAL"
        )
    }

    pub fn is_warning(&self) -> bool {
        self.level.eq_ignore_ascii_case("WARNING")
    }
}

// =============================================================================
// Formatting
// =============================================================================

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render a backend timestamp as `YYYY-MM-DD HH:MM:SS`.
///
/// Accepts RFC 3339, the space-separated form with an offset, and naive
/// ISO timestamps. Anything else is returned unchanged.
pub fn format_timestamp(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format(DISPLAY_FORMAT).to_string();
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return dt.format(DISPLAY_FORMAT).to_string();
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return dt.format(DISPLAY_FORMAT).to_string();
        }
    }
    raw.to_string()
}

/// Human readable byte size
pub fn format_size(bytes: u64) -> String {
    match bytes {
        0 => "? GB".to_string(),
        b if b >= 1024 * 1024 * 1024 => {
            format!("{:.1} GB", b as f64 / (1024.0 * 1024.0 * 1024.0))
        }
        b if b >= 1024 * 1024 => format!("{:.0} MB", b as f64 / (1024.0 * 1024.0)),
        b => format!("{} KB", b / 1024),
    }
}

// =============================================================================
// Tests
// =============================================================================
