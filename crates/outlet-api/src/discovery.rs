// Local-network service browsing over multicast DNS (DNS-SD).
//
// A browse starts an mDNS daemon, asks for instances of
// `<service_type><domain>` (`_outlet._tcp.local.` by default) and takes the
// first instance that resolves to an address. The daemon is torn down
// before `browse` returns.

use std::collections::HashSet;
use std::net::IpAddr;

use mdns_sd::{ServiceDaemon, ServiceEvent, ServiceInfo};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::channel::Endpoint;
use crate::error::Error;

pub const DEFAULT_SERVICE_TYPE: &str = "_outlet._tcp.";
pub const DEFAULT_SERVICE_DOMAIN: &str = "local.";

/// Fully-qualified DNS-SD type to browse, e.g. `_outlet._tcp.local.`.
///
/// Tolerates missing or doubled dots between the two parts; an empty
/// domain means `local.`.
pub fn browse_name(service_type: &str, domain: &str) -> String {
    let service_type = service_type.trim_end_matches('.');
    let domain = domain.trim_matches('.');
    let domain = if domain.is_empty() { "local" } else { domain };
    format!("{service_type}.{domain}.")
}

/// Pick the address to connect to from an mDNS answer.
///
/// IPv4 wins, then routable IPv6, then link-local IPv6. Ties break on the
/// lowest address so the choice does not depend on set order.
pub fn pick_address(addresses: &HashSet<IpAddr>) -> Option<IpAddr> {
    let lowest = |keep: fn(&IpAddr) -> bool| addresses.iter().copied().filter(keep).min();
    lowest(IpAddr::is_ipv4)
        .or_else(|| lowest(|a| !is_link_local_v6(a)))
        .or_else(|| lowest(|_| true))
}

fn is_link_local_v6(addr: &IpAddr) -> bool {
    match addr {
        IpAddr::V6(v6) => matches!(v6.segments(), [0xfe80..=0xfebf, ..]),
        IpAddr::V4(_) => false,
    }
}

/// The endpoint a resolved instance advertises. Falls back to the
/// advertised host name when no address came with the answer.
pub fn endpoint_from_resolved(info: &ServiceInfo) -> Endpoint {
    let host = pick_address(info.get_addresses()).map_or_else(
        || info.get_hostname().trim_end_matches('.').to_string(),
        |addr| addr.to_string(),
    );
    Endpoint::new(host, info.get_port())
}

/// Browse until one instance of the service resolves or `cancel` fires.
///
/// Cancellation yields [`Error::Closed`]; daemon start-up or browse
/// failures yield [`Error::Discovery`].
pub async fn browse(
    service_type: &str,
    domain: &str,
    cancel: CancellationToken,
) -> Result<Endpoint, Error> {
    if cancel.is_cancelled() {
        return Err(Error::Closed);
    }

    let name = browse_name(service_type, domain);
    let daemon = ServiceDaemon::new().map_err(|e| Error::Discovery(e.to_string()))?;
    let receiver = match daemon.browse(&name) {
        Ok(receiver) => receiver,
        Err(e) => {
            shutdown(&daemon);
            return Err(Error::Discovery(e.to_string()));
        }
    };

    info!(service = %name, "Browsing for service");

    let outcome = loop {
        let event = tokio::select! {
            biased;
            () = cancel.cancelled() => break Err(Error::Closed),
            event = receiver.recv_async() => event,
        };
        match event {
            Ok(ServiceEvent::ServiceResolved(info)) => {
                let endpoint = endpoint_from_resolved(&info);
                info!(instance = info.get_fullname(), %endpoint, "Service resolved");
                break Ok(endpoint);
            }
            Ok(ServiceEvent::SearchStopped(_)) | Err(_) => {
                break Err(Error::Discovery(format!(
                    "browse for {name} stopped before any instance resolved"
                )));
            }
            Ok(other) => debug!(?other, "Discovery event"),
        }
    };

    if let Err(e) = daemon.stop_browse(&name) {
        debug!("Failed to stop browse: {e}");
    }
    shutdown(&daemon);
    outcome
}

fn shutdown(daemon: &ServiceDaemon) {
    if let Err(e) = daemon.shutdown() {
        warn!("Failed to shut down mDNS daemon: {e}");
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn addrs(list: &[&str]) -> HashSet<IpAddr> {
        list.iter().map(|a| a.parse().unwrap()).collect()
    }

    #[test]
    fn browse_name_joins_type_and_domain() {
        assert_eq!(
            browse_name(DEFAULT_SERVICE_TYPE, DEFAULT_SERVICE_DOMAIN),
            "_outlet._tcp.local."
        );
        assert_eq!(browse_name("_outlet._tcp", "local"), "_outlet._tcp.local.");
        assert_eq!(browse_name("_outlet._tcp.", ".local."), "_outlet._tcp.local.");
        assert_eq!(browse_name("_outlet._tcp.", ""), "_outlet._tcp.local.");
    }

    #[test]
    fn ipv4_is_preferred() {
        let picked = pick_address(&addrs(&["fe80::1", "2001:db8::7", "192.168.1.30", "192.168.1.20"]));
        assert_eq!(picked, Some("192.168.1.20".parse().unwrap()));
    }

    #[test]
    fn routable_ipv6_beats_link_local() {
        let picked = pick_address(&addrs(&["fe80::1", "2001:db8::7"]));
        assert_eq!(picked, Some("2001:db8::7".parse().unwrap()));
        assert_eq!(
            pick_address(&addrs(&["fe80::9"])),
            Some("fe80::9".parse().unwrap())
        );
        assert_eq!(pick_address(&HashSet::new()), None);
    }

    #[test]
    fn resolved_instance_becomes_endpoint() {
        let info = ServiceInfo::new(
            "_outlet._tcp.local.",
            "Outlet Backend",
            "backend-host.local.",
            "fe80::1,10.0.0.7",
            50051,
            None::<HashMap<String, String>>,
        )
        .unwrap();
        assert_eq!(endpoint_from_resolved(&info), Endpoint::new("10.0.0.7", 50051));
    }

    #[tokio::test]
    async fn cancelled_browse_returns_closed() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = browse(DEFAULT_SERVICE_TYPE, DEFAULT_SERVICE_DOMAIN, cancel).await;
        assert!(matches!(result, Err(Error::Closed)));
    }
}
