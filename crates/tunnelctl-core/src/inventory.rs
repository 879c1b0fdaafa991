// ── Tunnel inventory ──
//
// Per-invocation command context: resolves tunnel references and drives
// create / list / info / delete / cleanup / route against a `TunnelStore`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::credentials::{CredentialsLocation, write_credentials};
use crate::error::CoreError;
use crate::filter::Filter;
use crate::model::{Credentials, Route, RouteResult, Tunnel, TunnelInfo, TunnelSecret};
use crate::store::TunnelStore;

/// A freshly created tunnel and where its credentials were written.
#[derive(Debug, Clone)]
pub struct CreatedTunnel {
    pub tunnel: Tunnel,
    pub credentials_path: PathBuf,
}

pub struct Inventory<S> {
    store: S,
}

impl<S: TunnelStore> Inventory<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // ── Reference resolution ─────────────────────────────────────────

    /// Resolve a UUID or a live tunnel's name to its ID.
    ///
    /// Anything that parses as a UUID is taken as-is without a lookup.
    /// Names are matched against non-deleted tunnels; the first match wins.
    pub async fn find_id(&self, input: &str) -> Result<Uuid, CoreError> {
        if let Ok(id) = Uuid::parse_str(input) {
            return Ok(id);
        }

        let mut filter = Filter::new();
        filter.no_deleted().by_name(input);
        let tunnels = self
            .store
            .list_tunnels(&filter)
            .await
            .map_err(|e| e.context(format!("failed to look up tunnel {input}")))?;

        tunnels
            .first()
            .map(|t| t.id)
            .ok_or_else(|| CoreError::TunnelNotFound {
                identifier: input.to_owned(),
            })
    }

    /// Resolve every reference, failing on the first that does not resolve.
    pub async fn find_ids(&self, inputs: &[String]) -> Result<Vec<Uuid>, CoreError> {
        let mut ids = Vec::with_capacity(inputs.len());
        for input in inputs {
            ids.push(self.find_id(input).await?);
        }
        Ok(ids)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub async fn list(&self, filter: &Filter) -> Result<Vec<Tunnel>, CoreError> {
        self.store.list_tunnels(filter).await
    }

    /// Fetch one tunnel by ID, deleted or not.
    pub async fn get_tunnel(&self, id: Uuid) -> Result<Tunnel, CoreError> {
        let mut filter = Filter::new();
        filter.by_tunnel_id(id);
        let mut tunnels = self.store.list_tunnels(&filter).await?;

        if tunnels.len() != 1 {
            return Err(CoreError::AmbiguousTunnel {
                id,
                found: tunnels.len(),
            });
        }
        tunnels
            .pop()
            .ok_or_else(|| CoreError::Internal("tunnel list emptied unexpectedly".into()))
    }

    /// The tunnel plus its active connectors, unsorted.
    pub async fn info(&self, id: Uuid) -> Result<TunnelInfo, CoreError> {
        let connectors = self
            .store
            .list_active_connectors(&id)
            .await
            .map_err(|e| e.context("failed to list active connectors"))?;
        let tunnel = self.get_tunnel(id).await?;

        Ok(TunnelInfo {
            id: tunnel.id,
            name: tunnel.name,
            created_at: tunnel.created_at,
            connectors,
        })
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Create a tunnel with a fresh secret and write its credentials.
    ///
    /// If the credentials cannot be written the tunnel is deleted again,
    /// since nothing could ever run it.
    pub async fn create(
        &self,
        name: &str,
        location: &CredentialsLocation,
    ) -> Result<CreatedTunnel, CoreError> {
        let secret = TunnelSecret::generate();
        let tunnel = self
            .store
            .create_tunnel(name, &secret)
            .await
            .map_err(|e| e.context("failed to create tunnel"))?;
        debug!(tunnel_id = %tunnel.id, "tunnel created");

        let credentials_path = location.path_for(&tunnel.id);
        let creds = Credentials {
            account_tag: self.store.account_tag().to_owned(),
            tunnel_secret: secret,
            tunnel_id: tunnel.id,
            tunnel_name: tunnel.name.clone(),
        };

        if let Err(write_err) = write_credentials(&credentials_path, &creds) {
            let mut message = format!(
                "Your tunnel '{}' was created with ID {}. However, tunnelctl couldn't write \
                 tunnel credentials to disk: {write_err}",
                tunnel.name, tunnel.id
            );
            match self.store.delete_tunnel(&tunnel.id).await {
                Ok(()) => message.push_str(". The tunnel has been deleted"),
                Err(delete_err) => message.push_str(&format!(
                    ". Deleting the tunnel also failed: {delete_err}. \
                     Please delete it manually with `tunnelctl delete {}`",
                    tunnel.id
                )),
            }
            return Err(CoreError::CredentialsNotWritten { message });
        }

        Ok(CreatedTunnel {
            tunnel,
            credentials_path,
        })
    }

    /// Delete each tunnel, then its local credentials file if present.
    ///
    /// With `force`, stale connections are removed first so tunnels that
    /// still show connections can be deleted.
    pub async fn delete(
        &self,
        ids: &[Uuid],
        force: bool,
        location: &CredentialsLocation,
    ) -> Result<(), CoreError> {
        for &id in ids {
            let tunnel = self.get_tunnel(id).await?;
            if tunnel.is_deleted() {
                return Err(CoreError::AlreadyDeleted { id });
            }

            if force {
                self.store
                    .cleanup_connections(&id, None)
                    .await
                    .map_err(|e| e.context(format!("failed to clean up connections of {id}")))?;
            }

            self.store
                .delete_tunnel(&id)
                .await
                .map_err(|e| e.context(format!("failed to delete tunnel {id}")))?;
            info!(tunnel_id = %id, "deleted tunnel");

            remove_credentials_file(&location.path_for(&id));
        }
        Ok(())
    }

    pub async fn cleanup(&self, ids: &[Uuid], connector_id: Option<Uuid>) -> Result<(), CoreError> {
        for id in ids {
            self.store
                .cleanup_connections(id, connector_id.as_ref())
                .await
                .map_err(|e| e.context(format!("failed to clean up connections of {id}")))?;
            info!(tunnel_id = %id, "cleaned up connections");
        }
        Ok(())
    }

    pub async fn route(&self, id: Uuid, route: &Route) -> Result<RouteResult, CoreError> {
        self.store
            .route_tunnel(&id, route)
            .await
            .map_err(|e| e.context("failed to route tunnel"))
    }
}

/// Best-effort removal; the remote delete already succeeded.
fn remove_credentials_file(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => debug!(path = %path.display(), "removed credentials file"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!(
            path = %path.display(),
            "tunnel deleted but its credentials file could not be removed: {e}"
        ),
    }
}
