//! Session configuration and its total, defensive normalization.
//!
//! The config slot is replicated through the shared document, so anything —
//! `null`, a stale shape from an older client, garbage written by another
//! feature — can come back from a read. [`normalize_config`] therefore never
//! fails: recognized fields merge over defaults, everything else is ignored.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Session-wide overlay configuration, owned by the GM.
///
/// Mutated only through privilege-checked writes; read by every client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayConfig {
    /// Include actor identity in newly created log records.
    ///
    /// Creation-time only: flipping this never retroactively edits records
    /// already stored in the log.
    #[serde(rename = "showIdentity")]
    pub show_identity: bool,
    /// Keep the audit log visible only to the GM.
    #[serde(rename = "notifyGmPrivately")]
    pub notify_gm_privately: bool,
    /// Per-action overrides of the overlay artwork, `action id -> URL`.
    #[serde(rename = "customImages", default)]
    pub custom_images: BTreeMap<String, String>,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            show_identity: false,
            notify_gm_privately: true,
            custom_images: BTreeMap::new(),
        }
    }
}

impl OverlayConfig {
    /// Custom image URL for `action_id`, if the GM configured one.
    pub fn custom_image(&self, action_id: &str) -> Option<&str> {
        self.custom_images.get(action_id).map(String::as_str)
    }
}

/// Normalize a raw config slot into a usable [`OverlayConfig`].
///
/// Total over arbitrary JSON: a missing slot or a non-object yields full
/// defaults; an object contributes only its recognized, well-typed fields.
/// `notifyGmPrivately` defaults on — only an explicit `false` disables it.
pub fn normalize_config(raw: Option<&Value>) -> OverlayConfig {
    let Some(Value::Object(map)) = raw else {
        return OverlayConfig::default();
    };

    let show_identity = map
        .get("showIdentity")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let notify_gm_privately = map
        .get("notifyGmPrivately")
        .and_then(Value::as_bool)
        .unwrap_or(true);
    let custom_images = match map.get("customImages") {
        Some(Value::Object(images)) => images
            .iter()
            .filter_map(|(id, url)| Some((id.clone(), url.as_str()?.to_owned())))
            .collect(),
        _ => BTreeMap::new(),
    };

    OverlayConfig {
        show_identity,
        notify_gm_privately,
        custom_images,
    }
}
