use inventory_layout::{LayoutConfig, ZoomRange};
use serde::{Deserialize, Serialize};

/// Tunables for the inventory. Every field has a default, so partial
/// documents deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    /// Regex matched against node content to recognise the root.
    pub root_marker: String,
    /// Id tried when no content carries the marker.
    pub root_id: String,
    /// Nodes at this depth or deeper refuse to expand.
    pub max_depth: usize,
    /// Upper bound on reactive cycles per settle.
    pub max_sync_cycles: usize,
    /// Upper bound on expand-all passes.
    pub max_bulk_passes: usize,
    /// How long the host should wait before honouring a fit request, so the
    /// new shapes have been measured.
    pub fit_delay_ms: u64,
    pub zoom: ZoomRange,
    /// Bounds for the zoom picked after expand-all.
    pub expand_all_zoom: ZoomRange,
    pub layout: LayoutConfig,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            root_marker: r"(?i)^\s*(decision\s+inventory|\[root\])".to_string(),
            root_id: "root".to_string(),
            max_depth: 7,
            max_sync_cycles: 10_000,
            max_bulk_passes: 32,
            fit_delay_ms: 300,
            zoom: ZoomRange::default(),
            expand_all_zoom: ZoomRange {
                min: 0.15,
                max: 1.0,
            },
            layout: LayoutConfig::default(),
        }
    }
}
