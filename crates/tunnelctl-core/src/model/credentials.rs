// ── Tunnel credentials ──
//
// The JSON written to `<tunnel-id>.json` and read back by `run`. Keys are
// PascalCase to stay compatible with existing credential files.

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Length of a freshly generated tunnel secret.
pub const TUNNEL_SECRET_LEN: usize = 32;

/// Secret shared between the connector and the control plane.
///
/// Serialized as standard base64. `Debug` never prints the bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct TunnelSecret(Vec<u8>);

impl TunnelSecret {
    /// Draw [`TUNNEL_SECRET_LEN`] bytes from the OS random number generator.
    pub fn generate() -> Self {
        let mut bytes = vec![0u8; TUNNEL_SECRET_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.0)
    }
}

impl fmt::Debug for TunnelSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TunnelSecret([REDACTED; {}])", self.0.len())
    }
}

impl Serialize for TunnelSecret {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base64())
    }
}

impl<'de> Deserialize<'de> for TunnelSecret {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map(Self)
            .map_err(serde::de::Error::custom)
    }
}

/// Secret and identity bundle needed to run a tunnel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(rename = "AccountTag")]
    pub account_tag: String,
    #[serde(rename = "TunnelSecret")]
    pub tunnel_secret: TunnelSecret,
    #[serde(rename = "TunnelID")]
    pub tunnel_id: Uuid,
    #[serde(rename = "TunnelName", default)]
    pub tunnel_name: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn generated_secret_is_32_random_bytes() {
        let a = TunnelSecret::generate();
        let b = TunnelSecret::generate();
        assert_eq!(a.as_bytes().len(), TUNNEL_SECRET_LEN);
        assert_ne!(a, b);
    }

    #[test]
    fn debug_redacts_secret() {
        let secret = TunnelSecret::from_bytes(b"hunter2".to_vec());
        assert_eq!(format!("{secret:?}"), "TunnelSecret([REDACTED; 7])");
    }

    #[test]
    fn credentials_use_pascal_case_keys() {
        let creds = Credentials {
            account_tag: "acct".into(),
            tunnel_secret: TunnelSecret::from_bytes(b"secret".to_vec()),
            tunnel_id: Uuid::nil(),
            tunnel_name: "web".into(),
        };
        let json = serde_json::to_value(&creds).unwrap();
        assert_eq!(json["AccountTag"], "acct");
        assert_eq!(json["TunnelSecret"], "c2VjcmV0");
        assert_eq!(json["TunnelID"], "00000000-0000-0000-0000-000000000000");

        let back: Credentials = serde_json::from_value(json).unwrap();
        assert_eq!(back, creds);
    }
}
