// ── Tunnel store seam ──
//
// Everything the inventory needs from the control plane. `RemoteStore` is
// the HTTP-backed implementation; tests provide an in-memory one.

use std::future::Future;

use tracing::debug;
use uuid::Uuid;

use tunnelctl_api::TunnelClient;
use tunnelctl_api::types::{CreateTunnelRequest, RouteRequest};

use crate::convert::route_result;
use crate::error::CoreError;
use crate::filter::Filter;
use crate::model::{Connector, Route, RouteResult, Tunnel, TunnelSecret};

/// Remote tunnel inventory operations, scoped to one account.
pub trait TunnelStore: Send + Sync {
    /// Account the store operates on; written into credentials files.
    fn account_tag(&self) -> &str;

    fn list_tunnels(
        &self,
        filter: &Filter,
    ) -> impl Future<Output = Result<Vec<Tunnel>, CoreError>> + Send;

    fn list_active_connectors(
        &self,
        tunnel_id: &Uuid,
    ) -> impl Future<Output = Result<Vec<Connector>, CoreError>> + Send;

    fn create_tunnel(
        &self,
        name: &str,
        secret: &TunnelSecret,
    ) -> impl Future<Output = Result<Tunnel, CoreError>> + Send;

    fn delete_tunnel(&self, tunnel_id: &Uuid) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Remove stale connections, optionally only those of `connector_id`.
    fn cleanup_connections(
        &self,
        tunnel_id: &Uuid,
        connector_id: Option<&Uuid>,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn route_tunnel(
        &self,
        tunnel_id: &Uuid,
        route: &Route,
    ) -> impl Future<Output = Result<RouteResult, CoreError>> + Send;
}

/// [`TunnelStore`] backed by the control-plane REST API.
pub struct RemoteStore {
    client: TunnelClient,
}

impl RemoteStore {
    pub fn new(client: TunnelClient) -> Self {
        Self { client }
    }
}

impl TunnelStore for RemoteStore {
    fn account_tag(&self) -> &str {
        self.client.account_id()
    }

    async fn list_tunnels(&self, filter: &Filter) -> Result<Vec<Tunnel>, CoreError> {
        let params = filter.query_pairs();
        let tunnels = self.client.list_tunnels(&params).await?;
        debug!(count = tunnels.len(), "listed tunnels");
        Ok(tunnels.into_iter().map(Tunnel::from).collect())
    }

    async fn list_active_connectors(&self, tunnel_id: &Uuid) -> Result<Vec<Connector>, CoreError> {
        let clients = self.client.list_active_clients(tunnel_id).await?;
        Ok(clients.into_iter().map(Connector::from).collect())
    }

    async fn create_tunnel(&self, name: &str, secret: &TunnelSecret) -> Result<Tunnel, CoreError> {
        let request = CreateTunnelRequest {
            name: name.to_owned(),
            tunnel_secret: secret.to_base64(),
        };
        let tunnel = self.client.create_tunnel(&request).await?;
        Ok(tunnel.into())
    }

    async fn delete_tunnel(&self, tunnel_id: &Uuid) -> Result<(), CoreError> {
        Ok(self.client.delete_tunnel(tunnel_id).await?)
    }

    async fn cleanup_connections(
        &self,
        tunnel_id: &Uuid,
        connector_id: Option<&Uuid>,
    ) -> Result<(), CoreError> {
        Ok(self
            .client
            .cleanup_connections(tunnel_id, connector_id)
            .await?)
    }

    async fn route_tunnel(&self, tunnel_id: &Uuid, route: &Route) -> Result<RouteResult, CoreError> {
        let request = RouteRequest::from(route);
        let resp = self.client.route_tunnel(tunnel_id, &request).await?;
        route_result(route, &resp)
    }
}
