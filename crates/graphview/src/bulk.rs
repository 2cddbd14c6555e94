use std::collections::HashSet;

use inventory_layout::expand_all_zoom;
use serde::Serialize;

use crate::cancellation::CancellationToken;
use crate::inventory::Inventory;

/// What a bulk operation got through before it stopped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BulkOutcome {
    pub passes: usize,
    /// Nodes added or removed.
    pub changed: usize,
    pub cancelled: bool,
    /// A settle failed; the visible graph is left as it was at that point.
    pub aborted: bool,
}

impl Inventory {
    /// Expands every collapsed node that has children, pass after pass, until
    /// a pass reveals nothing new.
    pub fn expand_all(&mut self, token: &CancellationToken) -> BulkOutcome {
        let saved = std::mem::take(&mut self.processed);
        let max_depth = self.config().max_depth;
        // Every pass reveals one more level, so the graph's depth bounds the
        // work; the extra pass expands nodes whose children are already shown.
        let depth = self.graph().max_depth(self.root_id());
        let max_passes = self.config().max_bulk_passes.min(depth + 1);
        let mut outcome = BulkOutcome::default();

        while outcome.passes < max_passes {
            if token.is_cancelled() {
                tracing::info!(passes = outcome.passes, "expand all cancelled");
                outcome.cancelled = true;
                break;
            }

            let candidates: Vec<String> = self
                .nodes()
                .iter()
                .filter(|n| !n.expanded && n.child_count > 0 && n.depth < max_depth)
                .map(|n| n.id.clone())
                .collect();
            if candidates.is_empty() {
                break;
            }

            let before = self.visible().len();
            for id in &candidates {
                if let Some(node) = self.visible_mut().node_mut(id) {
                    node.expanded = true;
                }
            }
            outcome.passes += 1;

            if let Err(err) = self.settle() {
                tracing::error!(error = %err, pass = outcome.passes, "expand all aborted");
                outcome.aborted = true;
                break;
            }

            let added = self.visible().len().saturating_sub(before);
            outcome.changed += added;
            tracing::debug!(pass = outcome.passes, added, "expand all pass");
            if added == 0 {
                break;
            }
        }

        let bulk = std::mem::replace(&mut self.processed, saved);
        self.processed.extend(bulk);

        let root = self.root_id().to_string();
        if self.visible().contains(&root) {
            let zoom = expand_all_zoom(self.visible().len(), self.config().expand_all_zoom);
            self.request_center(root, zoom);
        } else {
            self.request_fit(Vec::new(), None);
        }
        tracing::info!(
            passes = outcome.passes,
            added = outcome.changed,
            visible = self.visible().len(),
            "expanded all"
        );
        outcome
    }

    /// Folds everything back to the root and its direct children in one batch.
    pub fn collapse_all(&mut self, token: &CancellationToken) -> BulkOutcome {
        let mut outcome = BulkOutcome::default();
        if token.is_cancelled() {
            outcome.cancelled = true;
            return outcome;
        }

        let saved = std::mem::take(&mut self.processed);
        let root = self.root_id().to_string();
        let expanded: Vec<String> = self
            .nodes()
            .iter()
            .filter(|n| n.expanded && !n.is_root())
            .map(|n| n.id.clone())
            .collect();

        let roots: Vec<&str> = expanded.iter().map(String::as_str).collect();
        let doomed: HashSet<String> = self
            .visible()
            .descendants(&roots)
            .into_iter()
            .filter(|id| *id != root)
            .collect();
        outcome.passes = 1;
        outcome.changed = doomed.len();

        let visible = self.visible_mut();
        visible.remove_nodes(&doomed);
        for id in &expanded {
            if let Some(node) = visible.node_mut(id) {
                node.expanded = false;
            }
        }

        if let Err(err) = self.settle() {
            tracing::error!(error = %err, "collapse all left the graph unsettled");
            outcome.aborted = true;
        }
        self.processed = saved;

        self.request_fit(Vec::new(), None);
        tracing::info!(removed = outcome.changed, "collapsed all");
        outcome
    }
}
