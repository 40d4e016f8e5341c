pub mod io;

use crate::roster::definitions::{default_min_title_span, LabelSet};
use crate::roster::SortKey;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppSettings {
    /// Labels written into newly created rosters.
    #[serde(flatten)]
    pub labels: LabelSet,
    #[serde(default = "default_min_title_span")]
    pub min_title_span: usize,
    #[serde(default)]
    pub default_sort: SortKey,
    /// `tracing` filter directive, e.g. `"rate_roster=debug"`.
    #[serde(default)]
    pub log_filter: Option<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            labels: LabelSet::default(),
            min_title_span: default_min_title_span(),
            default_sort: SortKey::default(),
            log_filter: None,
        }
    }
}
