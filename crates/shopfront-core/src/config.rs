//! Controller tuning.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Sizes and intervals used by the list controllers.
///
/// Missing keys take their defaults when deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ControllerConfig {
    /// Items per page for paged lists.
    pub page_size: usize,
    /// Quiet period before a search term is committed, in milliseconds.
    pub search_debounce_ms: u64,
    /// Rows per page in a local view.
    pub local_page_size: usize,
    /// Maximum documents per live snapshot.
    pub live_limit: usize,
}

impl ControllerConfig {
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            page_size: 20,
            search_debounce_ms: 300,
            local_page_size: 10,
            live_limit: 100,
        }
    }
}
