// ── Route builder ──
//
// Turns `route` positional arguments into a validated [`Route`]. The first
// argument is the route type, the second the tunnel reference.

use strum::{Display, EnumString};

use crate::error::CoreError;
use crate::model::Route;
use crate::validate::{validate_hostname, validate_name};

/// Route types `route` accepts as its first argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum RouteType {
    Dns,
    Lb,
}

impl RouteType {
    pub fn parse(token: &str) -> Result<Self, CoreError> {
        token
            .parse()
            .map_err(|_| CoreError::UnrecognizedRouteType {
                route_type: token.to_owned(),
            })
    }

    /// Number of positional arguments the route type takes, type included.
    pub fn arity(self) -> usize {
        match self {
            Self::Dns => 3,
            Self::Lb => 4,
        }
    }
}

fn check_arity(args: &[String], expected: usize) -> Result<(), CoreError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(CoreError::usage(format!(
            "Expected {expected} arguments, got {}",
            args.len()
        )))
    }
}

/// `dns TUNNEL HOSTNAME`
pub fn dns_route_from_args(args: &[String], overwrite_existing: bool) -> Result<Route, CoreError> {
    check_arity(args, RouteType::Dns.arity())?;

    let hostname = &args[2];
    if hostname.is_empty() {
        return Err(CoreError::usage("The third argument should be the hostname"));
    }
    if !validate_hostname(hostname, true) {
        return Err(CoreError::invalid("hostname", hostname));
    }

    Ok(Route::Dns {
        hostname: hostname.clone(),
        overwrite_existing,
    })
}

/// `lb TUNNEL LB-HOSTNAME POOL`
pub fn lb_route_from_args(args: &[String]) -> Result<Route, CoreError> {
    check_arity(args, RouteType::Lb.arity())?;

    let lb_name = &args[2];
    if lb_name.is_empty() {
        return Err(CoreError::usage("The third argument should be the load balancer name"));
    }
    if !validate_hostname(lb_name, true) {
        return Err(CoreError::invalid("load balancer name", lb_name));
    }
    let pool = &args[3];
    if pool.is_empty() {
        return Err(CoreError::usage("The fourth argument should be the pool name"));
    }
    if !validate_name(pool, false) {
        return Err(CoreError::invalid("pool name", pool));
    }

    Ok(Route::Lb {
        hostname: lb_name.clone(),
        pool: pool.clone(),
    })
}

/// A parsed `route` invocation: the unresolved tunnel reference and the
/// directive to apply to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteCommand {
    pub tunnel: String,
    pub route: Route,
}

impl RouteCommand {
    /// Validate everything that can be checked without the control plane.
    pub fn parse(args: &[String], overwrite_dns: bool) -> Result<Self, CoreError> {
        if args.len() < 2 {
            return Err(CoreError::usage(
                "\"tunnelctl route\" requires the first argument to be the route type(dns or lb), \
                 followed by the ID or name of the tunnel",
            ));
        }

        let route = match RouteType::parse(&args[0])? {
            RouteType::Dns => dns_route_from_args(args, overwrite_dns)?,
            RouteType::Lb => lb_route_from_args(args)?,
        };

        Ok(Self {
            tunnel: args[1].clone(),
            route,
        })
    }
}
