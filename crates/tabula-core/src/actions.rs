//! The built-in safety action catalog.

use serde::{Deserialize, Serialize};

/// A safety action participants can broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalAction {
    /// Stable identifier, e.g. `x-card`.
    pub id: String,
    /// Display label, e.g. `X-Card`.
    pub label: String,
}

/// The default action set every session starts with.
pub fn default_actions() -> Vec<SignalAction> {
    [("x-card", "X-Card"), ("pause", "Pause"), ("rewind", "Rewind")]
        .into_iter()
        .map(|(id, label)| SignalAction {
            id: id.to_owned(),
            label: label.to_owned(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_is_stable() {
        let ids: Vec<_> = default_actions().into_iter().map(|a| a.id).collect();
        assert_eq!(ids, ["x-card", "pause", "rewind"]);
    }
}
