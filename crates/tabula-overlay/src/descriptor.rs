//! Presentation request and its URL descriptor.
//!
//! The host opens the surface by URL; everything the surface needs to
//! render — action, label, optional custom artwork — rides in the query
//! string so the surface's separate context needs no other channel in.

use serde::{Deserialize, Serialize};
use tabula_core::{BroadcastNotice, OverlayConfig};

/// One queued overlay display, consumed by the coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayRequest {
    /// Stable action identifier.
    pub action_id: String,
    /// Display label.
    pub action_label: String,
    /// GM-configured artwork override, resolved at enqueue time.
    pub custom_image_url: Option<String>,
}

impl OverlayRequest {
    /// Build a request from a fan-out notice, resolving any per-action
    /// artwork override from the config current at receipt time.
    pub fn from_notice(notice: &BroadcastNotice, config: &OverlayConfig) -> Self {
        Self {
            action_id: notice.action_id.clone(),
            action_label: notice.action_label.clone(),
            custom_image_url: config
                .custom_image(&notice.action_id)
                .map(str::to_owned),
        }
    }

    /// Descriptor URL for the presentation surface, relative to the
    /// extension origin: `index.html?modal=card&actionId=..&actionLabel=..`
    /// plus `&image=..` when an override is set.
    pub fn descriptor_url(&self) -> String {
        let mut url = format!(
            "index.html?modal=card&actionId={}&actionLabel={}",
            encode_component(&self.action_id),
            encode_component(&self.action_label),
        );
        if let Some(image) = &self.custom_image_url {
            url.push_str("&image=");
            url.push_str(&encode_component(image));
        }
        url
    }
}

/// Minimal percent-encoding for query components: unreserved characters
/// pass through, everything else becomes `%XX` per byte.
fn encode_component(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_core::normalize_config;

    fn notice(action_id: &str, label: &str) -> BroadcastNotice {
        BroadcastNotice {
            action_id: action_id.into(),
            action_label: label.into(),
            signal_id: "ev_1".into(),
            sender_id: None,
        }
    }

    #[test]
    fn url_carries_action_and_label() {
        let request = OverlayRequest::from_notice(&notice("x-card", "X-Card"), &OverlayConfig::default());
        assert_eq!(
            request.descriptor_url(),
            "index.html?modal=card&actionId=x-card&actionLabel=X-Card"
        );
    }

    #[test]
    fn label_is_percent_encoded() {
        let request =
            OverlayRequest::from_notice(&notice("pause", "Pause & breathe"), &OverlayConfig::default());
        assert_eq!(
            request.descriptor_url(),
            "index.html?modal=card&actionId=pause&actionLabel=Pause%20%26%20breathe"
        );
    }

    #[test]
    fn custom_image_is_resolved_from_config() {
        let raw = serde_json::json!({
            "customImages": { "x-card": "https://cdn.example/custom x.png" }
        });
        let config = normalize_config(Some(&raw));
        let request = OverlayRequest::from_notice(&notice("x-card", "X-Card"), &config);
        assert_eq!(
            request.custom_image_url.as_deref(),
            Some("https://cdn.example/custom x.png")
        );
        assert!(request
            .descriptor_url()
            .ends_with("&image=https%3A%2F%2Fcdn.example%2Fcustom%20x.png"));
    }

    #[test]
    fn no_override_means_no_image_parameter() {
        let raw = serde_json::json!({ "customImages": { "pause": "/p.svg" } });
        let config = normalize_config(Some(&raw));
        let request = OverlayRequest::from_notice(&notice("x-card", "X-Card"), &config);
        assert_eq!(request.custom_image_url, None);
        assert!(!request.descriptor_url().contains("image="));
    }
}
