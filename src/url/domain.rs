use std::collections::HashSet;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use once_cell::sync::Lazy;
use tracing::trace;
use url::Host;

use crate::error::CheckmateError;

// Names that only ever refer to the local machine.
const LOCAL_HOSTS: [&str; 2] = ["localhost", "localhost.localdomain"];

// Final labels from the IANA special-use domain registry. A name under any
// of these never refers to a public location.
static RESERVED_SUFFIXES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["localhost", "local", "internal", "invalid", "test", "example", "onion"]
        .into_iter()
        .collect()
});

/// A host classified as publicly routable or not.
///
/// Wraps the host string it was built from together with the derived
/// verdict; a value type with no identity beyond its contents. The
/// classification is purely syntactic, against the reserved address ranges
/// and special-use suffixes. No DNS lookup happens, so a well-formed public
/// name that actually resolves somewhere internal is beyond what this check
/// can see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    raw: String,
    is_public: bool,
}

impl Domain {
    /// Decides whether a host denotes a publicly reachable location.
    ///
    /// IP literals are checked against the reserved ranges; domain names
    /// against the special-use suffixes, with bare single-label names
    /// treated as non-public since they cannot be fully qualified.
    ///
    /// # Arguments
    /// * `host` - The host component, normally as produced by the canonicalizer
    ///
    /// # Returns
    /// * `Result<Domain>` - The classified host, or `MalformedUrl` when the
    ///   string is not a domain name or IP literal at all
    pub fn classify(host: &str) -> Result<Self, CheckmateError> {
        if host.is_empty() {
            return Err(CheckmateError::MalformedUrl("empty host".to_string()));
        }
        if host.chars().any(char::is_whitespace) {
            return Err(CheckmateError::MalformedUrl(format!(
                "whitespace in host '{}'",
                host
            )));
        }

        // "[::1]" and "::1" are the same literal; a single trailing dot
        // names the same zone as the dotless spelling.
        let bare = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(host);
        let bare = bare.strip_suffix('.').unwrap_or(bare);

        if let Ok(ip) = bare.parse::<IpAddr>() {
            let is_public = match ip {
                IpAddr::V4(v4) => !is_reserved_ipv4(v4),
                IpAddr::V6(v6) => !is_reserved_ipv6(v6),
            };
            trace!("Host {} is an IP literal, public: {}", host, is_public);
            return Ok(Domain {
                raw: host.to_string(),
                is_public,
            });
        }

        // Not a plain IP literal. Host::parse still catches the alternate
        // IPv4 spellings (hex, octal, single integer) before treating the
        // string as a domain name.
        match Host::parse(bare) {
            Ok(Host::Ipv4(v4)) => Ok(Domain {
                raw: host.to_string(),
                is_public: !is_reserved_ipv4(v4),
            }),
            Ok(Host::Ipv6(v6)) => Ok(Domain {
                raw: host.to_string(),
                is_public: !is_reserved_ipv6(v6),
            }),
            Ok(Host::Domain(name)) => {
                validate_labels(&name)?;
                let is_public = !is_reserved_name(&name);
                trace!("Host {} is a domain name, public: {}", host, is_public);
                Ok(Domain {
                    raw: host.to_string(),
                    is_public,
                })
            }
            Err(err) => Err(CheckmateError::MalformedUrl(format!(
                "invalid host '{}': {}",
                host, err
            ))),
        }
    }

    /// Whether the host denotes a publicly routable location.
    pub fn is_public(&self) -> bool {
        self.is_public
    }

    /// The host string this verdict was derived from.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.raw.fmt(f)
    }
}

// Rejection rules for syntactically valid domain names.
fn is_reserved_name(name: &str) -> bool {
    if LOCAL_HOSTS.contains(&name) {
        return true;
    }
    // A name with no dot cannot be a public fully-qualified domain.
    if !name.contains('.') {
        return true;
    }
    if name == "home.arpa" || name.ends_with(".home.arpa") {
        return true;
    }
    let last_label = name.rsplit('.').next().unwrap_or(name);
    RESERVED_SUFFIXES.contains(last_label)
}

// DNS name syntax after normalization: dot-separated labels of up to 63
// octets, 253 octets overall. Underscores are tolerated since they occur in
// real hostnames even though RFC 1123 frowns on them.
fn validate_labels(name: &str) -> Result<(), CheckmateError> {
    if name.len() > 253 {
        return Err(CheckmateError::MalformedUrl(format!(
            "host name of {} bytes is too long",
            name.len()
        )));
    }
    for label in name.split('.') {
        if label.is_empty() || label.len() > 63 {
            return Err(CheckmateError::MalformedUrl(format!(
                "bad label in host '{}'",
                name
            )));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(CheckmateError::MalformedUrl(format!(
                "hyphen at label edge in host '{}'",
                name
            )));
        }
        if !label
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        {
            return Err(CheckmateError::MalformedUrl(format!(
                "illegal character in host '{}'",
                name
            )));
        }
    }
    Ok(())
}

// IANA special-use IPv4 ranges. An address in any of them never names a
// public host.
fn is_reserved_ipv4(v4: Ipv4Addr) -> bool {
    let [a, b, c, _] = v4.octets();
    v4.is_loopback()                             // 127.0.0.0/8
        || v4.is_private()                       // 10/8, 172.16/12, 192.168/16
        || v4.is_link_local()                    // 169.254.0.0/16
        || v4.is_multicast()                     // 224.0.0.0/4
        || v4.is_broadcast()                     // 255.255.255.255
        || a == 0                                // 0.0.0.0/8 "this network"
        || a >= 240                              // 240.0.0.0/4 reserved
        || (a == 100 && (64..=127).contains(&b)) // 100.64.0.0/10 shared space
        || (a == 192 && b == 0 && c == 0)        // 192.0.0.0/24 IETF assignments
        || (a == 192 && b == 0 && c == 2)        // 192.0.2.0/24 TEST-NET-1
        || (a == 192 && b == 88 && c == 99)      // 192.88.99.0/24 6to4 relay
        || (a == 198 && (18..=19).contains(&b))  // 198.18.0.0/15 benchmarking
        || (a == 198 && b == 51 && c == 100)     // 198.51.100.0/24 TEST-NET-2
        || (a == 203 && b == 0 && c == 113)      // 203.0.113.0/24 TEST-NET-3
}

// IANA special-use IPv6 ranges, including addresses that embed an IPv4 one.
fn is_reserved_ipv6(v6: Ipv6Addr) -> bool {
    let segments = v6.segments();
    v6.is_loopback()                                   // ::1
        || v6.is_unspecified()                         // ::
        || v6.is_multicast()                           // ff00::/8
        || (segments[0] & 0xfe00) == 0xfc00            // fc00::/7 unique local
        || (segments[0] & 0xffc0) == 0xfe80            // fe80::/10 link-local
        || (segments[0] & 0xffc0) == 0xfec0            // fec0::/10 site-local (deprecated)
        || (segments[0] == 0x2001 && segments[1] == 0xdb8) // 2001:db8::/32 documentation
        || (segments[0] == 0x2001 && segments[1] == 0x2 && segments[2] == 0) // 2001:2::/48 benchmarking
        || v6.to_ipv4_mapped().is_some_and(is_reserved_ipv4)
}
