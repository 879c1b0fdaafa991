// ── Tunnel listing filter ──
//
// Predicates accumulate and combine by AND. Setters overwrite (last write
// wins); nothing is validated here.

use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

use crate::model::Tunnel;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    /// `Some(false)` hides soft-deleted tunnels; `None` shows everything.
    is_deleted: Option<bool>,
    name: Option<String>,
    existed_at: Option<DateTime<Utc>>,
    tunnel_id: Option<Uuid>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclude soft-deleted tunnels.
    pub fn no_deleted(&mut self) -> &mut Self {
        self.is_deleted = Some(false);
        self
    }

    /// Include soft-deleted tunnels.
    pub fn show_deleted(&mut self) -> &mut Self {
        self.is_deleted = None;
        self
    }

    pub fn by_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self
    }

    /// Only tunnels that existed (created, not yet deleted) at `at`.
    pub fn by_existed_at(&mut self, at: DateTime<Utc>) -> &mut Self {
        self.existed_at = Some(at);
        self
    }

    pub fn by_tunnel_id(&mut self, id: Uuid) -> &mut Self {
        self.tunnel_id = Some(id);
        self
    }

    /// Query parameters for the listing endpoint, in a stable order.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(deleted) = self.is_deleted {
            pairs.push(("is_deleted", deleted.to_string()));
        }
        if let Some(ref name) = self.name {
            pairs.push(("name", name.clone()));
        }
        if let Some(at) = self.existed_at {
            pairs.push(("existed_at", at.to_rfc3339_opts(SecondsFormat::Secs, true)));
        }
        if let Some(id) = self.tunnel_id {
            pairs.push(("uuid", id.to_string()));
        }
        pairs
    }

    /// Evaluate the filter locally. Every set predicate must hold.
    pub fn matches(&self, tunnel: &Tunnel) -> bool {
        let deleted_ok = self
            .is_deleted
            .is_none_or(|deleted| tunnel.is_deleted() == deleted);
        let name_ok = self.name.as_ref().is_none_or(|name| &tunnel.name == name);
        let existed_ok = self.existed_at.is_none_or(|at| {
            tunnel.created_at <= at && tunnel.deleted_at.is_none_or(|deleted| deleted > at)
        });
        let id_ok = self.tunnel_id.is_none_or(|id| tunnel.id == id);

        deleted_ok && name_ok && existed_ok && id_ok
    }
}
