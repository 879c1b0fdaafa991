// tunnelctl-core: Tunnel inventory and route provisioning between tunnelctl-api and the CLI.

pub mod convert;
pub mod credentials;
pub mod error;
pub mod filter;
pub mod inventory;
pub mod model;
pub mod routing;
pub mod sort;
pub mod store;
pub mod validate;

// ── Primary re-exports ──────────────────────────────────────────────
pub use credentials::{CredentialsLocation, read_credentials, write_credentials};
pub use error::CoreError;
pub use filter::Filter;
pub use inventory::{CreatedTunnel, Inventory};
pub use routing::{RouteCommand, RouteType};
pub use sort::{ConnectorSortField, SortOutcome, TunnelSortField, sort_connectors, sort_tunnels};
pub use store::{RemoteStore, TunnelStore};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    Change, Connection, Connector, Credentials, Route, RouteResult, Tunnel, TunnelInfo,
    TunnelSecret, format_connections,
};
