// ── Domain model ──
//
// Records as the inventory sees them after conversion from wire types.
// Serialized field names are what `--output json|yaml` prints.

pub mod credentials;
pub mod route;
pub mod tunnel;

pub use credentials::{Credentials, TunnelSecret};
pub use route::{Change, Route, RouteResult};
pub use tunnel::{Connection, Connector, Tunnel, TunnelInfo, format_connections};
