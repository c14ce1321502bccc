//! Local host address detection

use std::net::{IpAddr, Ipv4Addr, UdpSocket};

const FALLBACK_HOST: Ipv4Addr = Ipv4Addr::LOCALHOST;

/// IPv4 address of the interface used for outbound traffic.
///
/// Connecting a UDP socket sends nothing; it only selects a route. Falls back
/// to `127.0.0.1` when no route is available.
pub fn local_ip() -> String {
    outbound_ipv4().unwrap_or(FALLBACK_HOST).to_string()
}

fn outbound_ipv4() -> Option<Ipv4Addr> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).ok()?;
    socket.connect((Ipv4Addr::new(8, 8, 8, 8), 80)).ok()?;
    match socket.local_addr().ok()?.ip() {
        IpAddr::V4(ip) if !ip.is_unspecified() => Some(ip),
        _ => None,
    }
}
