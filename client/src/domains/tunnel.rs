//! Tunnel token helpers

use base64::{engine::general_purpose, Engine as _};

/// Extract the tunnel ID from a connector token. The token is a base64
/// JSON document whose `t` field carries the tunnel ID.
pub fn extract_tunnel_id(token: &str) -> Option<String> {
    let decoded = general_purpose::STANDARD.decode(token).ok()?;
    let json: serde_json::Value = serde_json::from_slice(&decoded).ok()?;
    json["t"].as_str().map(|s| s.to_string())
}
