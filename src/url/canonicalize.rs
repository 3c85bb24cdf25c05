use tracing::trace;
use url::Host;

use crate::error::CheckmateError;

/// Longest URL (in characters) accepted for checking. Anything beyond this
/// is cut off before parsing, so an oversized URL cannot force a fail-open
/// outcome downstream.
pub const MAX_URL_LENGTH: usize = 2000;

// Schemes the checking service can act on.
const ALLOWED_SCHEMES: [&str; 2] = ["http", "https"];

/// Structural parts of a URL after normalization.
///
/// Produced only by [`canonical_split`]; the fields already carry the
/// canonical spelling (lower-cased scheme and host, default port removed,
/// empty path widened to `/`). Rejoining with [`canonical_join`] yields the
/// canonical string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlParts {
    pub scheme: String,           // Always one of the allowed schemes, lower-cased
    pub userinfo: Option<String>, // Credentials from the authority; never joined back
    pub host: String,             // Normalized host, brackets included for IPv6
    pub port: Option<u16>,        // Only non-default ports survive
    pub path: String,             // Verbatim bytes, `/` when the input had none
    pub query: Option<String>,    // Verbatim bytes, absent when empty
    pub fragment: Option<String>, // Never joined back
}

/// Splits a raw URL string into normalized parts.
///
/// The input is truncated to `max_length` characters before anything else
/// happens, so every accept/reject decision below is made on the truncated
/// string. The scheme and host are lower-cased, credentials are split off,
/// an explicit default port is dropped, and path/query bytes are kept
/// verbatim once their percent-escapes have been checked.
///
/// # Arguments
/// * `raw` - The URL exactly as supplied by the untrusted caller
/// * `max_length` - Truncation limit in characters, normally [`MAX_URL_LENGTH`]
///
/// # Returns
/// * `Result<UrlParts>` - The normalized parts, or `MalformedUrl` when the
///   string cannot be tokenized into scheme, host and path
pub fn canonical_split(raw: &str, max_length: usize) -> Result<UrlParts, CheckmateError> {
    // Truncation comes first; nothing below ever sees the excess.
    let raw = match raw.char_indices().nth(max_length) {
        Some((end, _)) => &raw[..end],
        None => raw,
    };

    if raw.is_empty() {
        return Err(CheckmateError::MalformedUrl("URL cannot be empty".to_string()));
    }

    let (scheme, rest) = raw
        .split_once("://")
        .ok_or_else(|| CheckmateError::MalformedUrl("missing scheme".to_string()))?;
    let scheme = scheme.to_ascii_lowercase();
    if !ALLOWED_SCHEMES.contains(&scheme.as_str()) {
        return Err(CheckmateError::MalformedUrl(format!(
            "scheme '{}' is not checkable",
            scheme
        )));
    }

    // Fragment before query: everything after the first '#' is fragment, so
    // a '?' inside it must not be taken for a query separator.
    let (rest, fragment) = match rest.split_once('#') {
        Some((rest, fragment)) => (rest, Some(fragment.to_string())),
        None => (rest, None),
    };
    let (rest, query) = match rest.split_once('?') {
        Some((rest, query)) => (rest, Some(query.to_string())),
        None => (rest, None),
    };
    let (authority, path) = match rest.find('/') {
        Some(slash) => (&rest[..slash], &rest[slash..]),
        None => (rest, ""),
    };

    // Credentials end at the last '@'; they are recorded but never rejoined.
    let (userinfo, host_port) = match authority.rfind('@') {
        Some(at) => (Some(authority[..at].to_string()), &authority[at + 1..]),
        None => (None, authority),
    };
    let (raw_host, port) = split_host_port(host_port)?;
    if raw_host.is_empty() {
        return Err(CheckmateError::MalformedUrl("missing host".to_string()));
    }

    // Host::parse lower-cases, applies IDNA, normalizes alternate IPv4
    // spellings to dotted-quad and rejects forbidden code points.
    let host = Host::parse(raw_host).map_err(|err| {
        CheckmateError::MalformedUrl(format!("invalid host '{}': {}", raw_host, err))
    })?;
    let host = match host {
        // A single trailing dot names the same zone; keeping it would let
        // `example.com.` slip past matchers keyed on `example.com`. More
        // than one is not a name at all.
        Host::Domain(name) => match name.strip_suffix('.') {
            Some(trimmed) if trimmed.is_empty() || trimmed.ends_with('.') => {
                return Err(CheckmateError::MalformedUrl(format!(
                    "invalid host '{}'",
                    name
                )));
            }
            Some(trimmed) => trimmed.to_string(),
            None => name,
        },
        ip => ip.to_string(),
    };

    let port = match port {
        Some(p) if default_port(&scheme) == Some(p) => None,
        other => other,
    };

    validate_escapes(path, "path")?;
    if let Some(query) = &query {
        validate_escapes(query, "query")?;
    }

    let path = if path.is_empty() { "/".to_string() } else { path.to_string() };
    let query = query.filter(|q| !q.is_empty());

    trace!("Split URL into scheme={} host={} port={:?}", scheme, host, port);

    Ok(UrlParts {
        scheme,
        userinfo,
        host,
        port,
        path,
        query,
        fragment,
    })
}

/// Rejoins normalized parts into the canonical URL string.
///
/// The output order is fixed: `scheme://host[:port]path[?query]`.
/// Credentials and the fragment are never reproduced; a fragment is
/// meaningless to a server-side check, and credentials must not leak into
/// anything we put on the wire.
pub fn canonical_join(parts: &UrlParts) -> String {
    let mut url = format!("{}://{}", parts.scheme, parts.host);
    if let Some(port) = parts.port {
        url.push(':');
        url.push_str(&port.to_string());
    }
    url.push_str(&parts.path);
    if let Some(query) = &parts.query {
        url.push('?');
        url.push_str(query);
    }
    url
}

// Splits `host[:port]` with bracketed IPv6 literals kept intact.
fn split_host_port(host_port: &str) -> Result<(&str, Option<u16>), CheckmateError> {
    if let Some(inner) = host_port.strip_prefix('[') {
        let close = inner.find(']').ok_or_else(|| {
            CheckmateError::MalformedUrl(format!("unclosed IPv6 literal '{}'", host_port))
        })?;
        let host = &host_port[..close + 2];
        let after = &inner[close + 1..];
        let port = match after.strip_prefix(':') {
            Some(port) => parse_port(port)?,
            None if after.is_empty() => None,
            None => {
                return Err(CheckmateError::MalformedUrl(format!(
                    "trailing characters after IPv6 literal '{}'",
                    host_port
                )))
            }
        };
        return Ok((host, port));
    }

    match host_port.rsplit_once(':') {
        Some((host, port)) => Ok((host, parse_port(port)?)),
        None => Ok((host_port, None)),
    }
}

fn parse_port(port: &str) -> Result<Option<u16>, CheckmateError> {
    // "host:" carries no port at all.
    if port.is_empty() {
        return Ok(None);
    }
    // u16::from_str would also take a leading '+', which no URL grammar does.
    if !port.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CheckmateError::MalformedUrl(format!(
            "invalid port '{}'",
            port
        )));
    }
    port.parse::<u16>()
        .map(Some)
        .map_err(|_| CheckmateError::MalformedUrl(format!("port '{}' out of range", port)))
}

fn default_port(scheme: &str) -> Option<u16> {
    match scheme {
        "http" => Some(80),
        "https" => Some(443),
        _ => None,
    }
}

// Percent-escapes are checked but never decoded: the bytes the caller sent
// are the bytes the checking service must see. Escapes missing their two hex
// digits and raw control bytes cannot be forwarded unambiguously, so they
// fail the whole URL.
fn validate_escapes(component: &str, what: &str) -> Result<(), CheckmateError> {
    let bytes = component.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                if i + 2 >= bytes.len()
                    || !bytes[i + 1].is_ascii_hexdigit()
                    || !bytes[i + 2].is_ascii_hexdigit()
                {
                    return Err(CheckmateError::MalformedUrl(format!(
                        "broken percent-escape in {}",
                        what
                    )));
                }
                i += 3;
            }
            byte if byte < 0x20 || byte == 0x7f => {
                return Err(CheckmateError::MalformedUrl(format!(
                    "control byte in {}",
                    what
                )));
            }
            _ => i += 1,
        }
    }
    Ok(())
}
