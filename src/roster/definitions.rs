// src/roster/definitions.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use unicode_normalization::UnicodeNormalization;

/// Completion rate held as hundredths of a percent, i.e. the two-decimal
/// percentage shown in a bucket header. `Rate(2000)` is `20.00%`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Rate(i64);

impl Rate {
    pub const ZERO: Rate = Rate(0);

    #[cfg(test)]
    pub const fn from_hundredths(hundredths: i64) -> Self {
        Rate(hundredths)
    }

    /// Rounds a fraction (`0.2` == 20%) to display precision.
    /// Returns `None` for NaN or infinite input.
    pub fn from_fraction(fraction: f64) -> Option<Self> {
        Self::from_percent(fraction * 100.0)
    }

    /// Rounds a percentage value (`20.0` == 20%) to display precision.
    pub fn from_percent(percent: f64) -> Option<Self> {
        let scaled = (percent * 100.0).round();
        if !scaled.is_finite() || scaled.abs() > i64::MAX as f64 {
            return None;
        }
        Some(Rate(scaled as i64))
    }

    pub fn as_fraction(self) -> f64 {
        self.0 as f64 / 10_000.0
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}%", sign, abs / 100, abs % 100)
    }
}

/// One column of the roster: every member currently at `rate`.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub rate: Rate,
    /// Member slots beneath the header row, top to bottom. `None` is an
    /// empty slot; compaction removes the interior ones.
    pub members: Vec<Option<String>>,
    pub width: Option<f32>,
}

impl Bucket {
    pub fn new(rate: Rate) -> Self {
        Bucket {
            rate,
            members: Vec::new(),
            width: None,
        }
    }

    pub fn with_members<I, S>(rate: Rate, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Bucket {
            rate,
            members: names.into_iter().map(|n| Some(n.into())).collect(),
            width: None,
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.members.iter().filter_map(|slot| slot.as_deref())
    }

    pub fn member_count(&self) -> usize {
        self.names().count()
    }

    /// True when no slot beneath the header holds a name.
    pub fn is_vacant(&self) -> bool {
        self.members.iter().all(Option::is_none)
    }
}

/// Address of a member slot: bucket (column) and row beneath the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRef {
    pub bucket: usize,
    pub row: usize,
}

/// In-memory roster. Bucket order is display order.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    /// Title text from the reserved header block, kept verbatim.
    pub title: String,
    /// Team-wide target parsed from the title.
    pub quota: f64,
    pub buckets: Vec<Bucket>,
}

/// Text fragments used to write and read bucket headers and the title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSet {
    #[serde(default = "default_rate_label_prefix")]
    pub rate_label_prefix: String,
    #[serde(default = "default_team_label")]
    pub team_label: String,
    #[serde(default = "default_individual_label")]
    pub individual_label: String,
}

pub fn default_rate_label_prefix() -> String {
    "个人达成率".to_string()
}

pub fn default_team_label() -> String {
    "团队目标：".to_string()
}

pub fn default_individual_label() -> String {
    " 个人目标：".to_string()
}

pub fn default_min_title_span() -> usize {
    20
}

impl Default for LabelSet {
    fn default() -> Self {
        LabelSet {
            rate_label_prefix: default_rate_label_prefix(),
            team_label: default_team_label(),
            individual_label: default_individual_label(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterMetadata {
    #[serde(flatten)]
    pub labels: LabelSet,
    /// Minimum number of columns the merged title block spans.
    #[serde(default = "default_min_title_span")]
    pub min_title_span: usize,
    /// Display width per grid column, in bucket order.
    #[serde(default)]
    pub column_widths: Vec<Option<f32>>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl RosterMetadata {
    pub fn new(labels: LabelSet, min_title_span: usize) -> Self {
        RosterMetadata {
            labels,
            min_title_span,
            column_widths: Vec::new(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }
}

/// Persisted form of a roster: metadata plus the literal cell grid
/// (rows of cells, empty string for an empty cell).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterDocument {
    pub metadata: RosterMetadata,
    pub grid: Vec<Vec<String>>,
}

/// Canonical form used for every stored and looked-up member name.
pub fn normalize_name(name: &str) -> String {
    name.trim().nfc().collect()
}
