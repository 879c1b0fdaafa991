// ── Routing directives ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A directive binding a hostname to a tunnel. The variant set is closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Route {
    /// CNAME `hostname` to the tunnel.
    Dns {
        hostname: String,
        overwrite_existing: bool,
    },
    /// Add the tunnel as an origin in `pool`, behind load balancer `hostname`.
    Lb { hostname: String, pool: String },
}

impl Route {
    pub fn hostname(&self) -> &str {
        match self {
            Self::Dns { hostname, .. } | Self::Lb { hostname, .. } => hostname,
        }
    }
}

/// What the control plane did to a routed resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Change {
    Unchanged,
    New,
    Updated,
}

/// Outcome of applying a [`Route`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RouteResult {
    Dns { hostname: String, cname: Change },
    Lb {
        load_balancer_name: String,
        pool_name: String,
        load_balancer: Change,
        pool: Change,
    },
}

impl RouteResult {
    /// Human-readable line logged after the route is applied.
    pub fn success_summary(&self) -> String {
        match self {
            Self::Dns { hostname, cname } => match cname {
                Change::New => format!("Added CNAME {hostname} which will route to this tunnel"),
                Change::Updated => format!("{hostname} updated to route to your tunnel"),
                Change::Unchanged => {
                    format!("{hostname} is already configured to route to your tunnel")
                }
            },
            Self::Lb {
                load_balancer_name: lb,
                pool_name: pool,
                load_balancer,
                pool: pool_change,
            } => lb_summary(lb, pool, *load_balancer, *pool_change),
        }
    }
}

fn lb_summary(lb: &str, pool: &str, lb_change: Change, pool_change: Change) -> String {
    match (lb_change, pool_change) {
        (Change::New, Change::New) => format!(
            "Created load balancer {lb} and added a new pool {pool} with this tunnel as an origin"
        ),
        (Change::New, Change::Updated) => format!(
            "Created load balancer {lb} with an existing pool {pool} which was updated to use this tunnel as an origin"
        ),
        (Change::New, Change::Unchanged) => format!(
            "Created load balancer {lb} with an existing pool {pool} which already has this tunnel as an origin"
        ),
        (Change::Updated, Change::New) => format!(
            "Added new pool {pool} with this tunnel as an origin to load balancer {lb}"
        ),
        (Change::Updated, Change::Updated) => format!(
            "Updated pool {pool} to use this tunnel as an origin and added it to load balancer {lb}"
        ),
        (Change::Updated, Change::Unchanged) => format!(
            "Added pool {pool}, which already has this tunnel as an origin, to load balancer {lb}"
        ),
        (Change::Unchanged, Change::Updated) => format!(
            "Added this tunnel as an origin in pool {pool} which is already used by load balancer {lb}"
        ),
        (Change::Unchanged, Change::Unchanged) => format!(
            "Load balancer {lb} already uses pool {pool} which has this tunnel as an origin"
        ),
        // An unchanged load balancer cannot gain a brand-new pool.
        (Change::Unchanged, Change::New) => format!(
            "Something went wrong: failed to modify load balancer {lb} with pool {pool}; please check traffic manager configuration in the dashboard"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dns_summary_mentions_hostname() {
        let result = RouteResult::Dns {
            hostname: "app.example.com".into(),
            cname: Change::New,
        };
        assert_eq!(
            result.success_summary(),
            "Added CNAME app.example.com which will route to this tunnel"
        );
    }

    #[test]
    fn lb_summary_varies_by_change_pair() {
        let summary = |lb, pool| {
            RouteResult::Lb {
                load_balancer_name: "lb.example.com".into(),
                pool_name: "east".into(),
                load_balancer: lb,
                pool,
            }
            .success_summary()
        };

        assert!(summary(Change::New, Change::New).starts_with("Created load balancer lb.example.com"));
        assert!(summary(Change::Updated, Change::New).starts_with("Added new pool east"));
        assert!(summary(Change::Unchanged, Change::New).starts_with("Something went wrong"));
    }

    #[test]
    fn change_parses_lowercase() {
        assert_eq!("updated".parse::<Change>().ok(), Some(Change::Updated));
        assert!("UPDATED?".parse::<Change>().is_err());
    }
}
