//! Address classification.
//!
//! `looks_private` is the textual prefix check behind the "private IP" note in
//! the HTML result. It only knows `192.168.`, `10.` and `172.` and does not
//! bound the second octet of `172.16.0.0/12`. `classify` parses the address and
//! reports its real class so callers can spot where the two disagree.

use regex::Regex;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::LazyLock;

static PRIVATE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:192\.168\.|10\.|172\.)").expect("private prefix pattern is valid")
});

/// Prefix heuristic used for the private-address note.
pub fn looks_private(ip: &str) -> bool {
    PRIVATE_PREFIX.is_match(ip)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressClass {
    Public,
    /// RFC 1918
    Private,
    Loopback,
    LinkLocal,
    /// 100.64.0.0/10 carrier-grade NAT
    Shared,
    /// fc00::/7
    UniqueLocal,
    Unspecified,
    Multicast,
    NotAnAddress,
}

impl AddressClass {
    /// True for every class that is not routable on the public internet.
    pub fn is_non_public(&self) -> bool {
        !matches!(self, AddressClass::Public | AddressClass::NotAnAddress)
    }
}

impl fmt::Display for AddressClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            AddressClass::Public => "public",
            AddressClass::Private => "private",
            AddressClass::Loopback => "loopback",
            AddressClass::LinkLocal => "link-local",
            AddressClass::Shared => "shared (CGNAT)",
            AddressClass::UniqueLocal => "unique local",
            AddressClass::Unspecified => "unspecified",
            AddressClass::Multicast => "multicast",
            AddressClass::NotAnAddress => "not an IP address",
        };
        f.write_str(label)
    }
}

pub fn classify(ip: &str) -> AddressClass {
    match ip.trim().parse::<IpAddr>() {
        Ok(IpAddr::V4(v4)) => classify_v4(v4),
        Ok(IpAddr::V6(v6)) => classify_v6(v6),
        Err(_) => AddressClass::NotAnAddress,
    }
}

fn classify_v4(addr: Ipv4Addr) -> AddressClass {
    let [a, b, _, _] = addr.octets();
    if addr.is_unspecified() {
        AddressClass::Unspecified
    } else if addr.is_loopback() {
        AddressClass::Loopback
    } else if addr.is_private() {
        AddressClass::Private
    } else if addr.is_link_local() {
        AddressClass::LinkLocal
    } else if a == 100 && (b & 0xc0) == 64 {
        AddressClass::Shared
    } else if addr.is_multicast() {
        AddressClass::Multicast
    } else {
        AddressClass::Public
    }
}

fn classify_v6(addr: Ipv6Addr) -> AddressClass {
    if let Some(v4) = addr.to_ipv4_mapped() {
        return classify_v4(v4);
    }
    let first = addr.segments()[0];
    if addr.is_unspecified() {
        AddressClass::Unspecified
    } else if addr.is_loopback() {
        AddressClass::Loopback
    } else if (first & 0xffc0) == 0xfe80 {
        AddressClass::LinkLocal
    } else if (first & 0xfe00) == 0xfc00 {
        AddressClass::UniqueLocal
    } else if addr.is_multicast() {
        AddressClass::Multicast
    } else {
        AddressClass::Public
    }
}

/// Returns the precise class when it contradicts the prefix heuristic.
pub fn heuristic_mismatch(ip: &str) -> Option<AddressClass> {
    let class = classify(ip);
    if looks_private(ip) != class.is_non_public() {
        Some(class)
    } else {
        None
    }
}
