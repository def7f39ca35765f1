//! Bare hostname extraction from `host[:port]`.

/// Returns the part of `host_port` before the first `:`, lowercased.
///
/// Empty input yields an empty string. IPv6 literals are not special-cased.
pub fn host_only(host_port: &str) -> String {
    match host_port.split_once(':') {
        Some((host, _)) => host.to_ascii_lowercase(),
        None => host_port.to_ascii_lowercase(),
    }
}
