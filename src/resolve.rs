use std::net::{IpAddr, Ipv4Addr, ToSocketAddrs};
use tracing::debug;

use crate::error::{TraceError, TraceResult};

/// Resolve a target name to the first IPv4 address it has.
///
/// Dotted-quad input is returned as-is without a lookup.
pub fn resolve_ipv4(target: &str) -> TraceResult<Ipv4Addr> {
    if let Ok(ip) = target.parse::<Ipv4Addr>() {
        return Ok(ip);
    }

    let addrs = (target, 0)
        .to_socket_addrs()
        .map_err(|source| TraceError::Resolve {
            host: target.to_string(),
            source,
        })?;

    let found = addrs
        .map(|s| s.ip())
        .find_map(|ip| match ip {
            IpAddr::V4(v4) => Some(v4),
            IpAddr::V6(_) => None,
        })
        .ok_or_else(|| TraceError::NoIpv4Address(target.to_string()))?;

    debug!(target, ip = %found, "resolved target");
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_target() {
        assert_eq!(resolve_ipv4("8.8.4.4").unwrap(), Ipv4Addr::new(8, 8, 4, 4));
    }

    #[test]
    fn test_localhost() {
        assert!(resolve_ipv4("localhost").unwrap().is_loopback());
    }

    #[test]
    fn test_ipv6_literal_has_no_ipv4() {
        let err = resolve_ipv4("::1").unwrap_err();
        assert!(matches!(err, TraceError::NoIpv4Address(_)));
        assert!(err.is_setup());
    }
}
