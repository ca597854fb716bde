//! Hostname and display-name helpers shared by the mapper and config store.

use crate::types::TargetType;

/// Listener names come off the wire as `LISTENER_<hostname>`.
pub const LISTENER_PREFIX: &str = "LISTENER_";

/// Shorten a hostname: drop the `-vip` marker and the domain suffix.
///
/// `host1-vip.example.com` -> `host1`. Returns `None` when nothing is left.
pub fn short_hostname(hostname: &str) -> Option<String> {
    if hostname.is_empty() {
        return None;
    }
    let host = hostname.replace("-vip", "");
    let host = host.split('.').next().unwrap_or("");
    if host.is_empty() {
        None
    } else {
        Some(host.to_string())
    }
}

/// Listener tag label for a hostname: `<short-hostname>_lstnr`.
pub fn listener_short_name(hostname: &str) -> Option<String> {
    short_hostname(hostname).map(|host| format!("{}_lstnr", host))
}

/// Display name used for the `target_name` tag.
///
/// Hosts are shortened, listeners become `<short-hostname>_lstnr` with the
/// `LISTENER_` prefix stripped first, everything else keeps its raw name.
pub fn tag_display_name(name: &str, type_name: &TargetType) -> String {
    match type_name {
        TargetType::Host => short_hostname(name).unwrap_or_else(|| name.to_string()),
        TargetType::OracleListener => {
            let base = name.strip_prefix(LISTENER_PREFIX).unwrap_or(name);
            let short = short_hostname(base).unwrap_or_else(|| base.to_string());
            format!("{}_lstnr", short)
        }
        _ => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_hostname_strips_vip_and_domain() {
        assert_eq!(short_hostname("host1-vip").as_deref(), Some("host1"));
        assert_eq!(
            short_hostname("host1-vip.example.com").as_deref(),
            Some("host1")
        );
        assert_eq!(short_hostname("host1").as_deref(), Some("host1"));
        assert_eq!(short_hostname(""), None);
        assert_eq!(short_hostname("-vip"), None);
    }

    #[test]
    fn listener_short_name_appends_suffix() {
        assert_eq!(
            listener_short_name("host1-vip.example.com").as_deref(),
            Some("host1_lstnr")
        );
        assert_eq!(listener_short_name(""), None);
    }

    #[test]
    fn display_name_by_type() {
        assert_eq!(
            tag_display_name("host1-vip.example.com", &TargetType::Host),
            "host1"
        );
        assert_eq!(
            tag_display_name("LISTENER_host1-vip", &TargetType::OracleListener),
            "host1_lstnr"
        );
        // Listener without the conventional prefix still shortens
        assert_eq!(
            tag_display_name("host2.example.com", &TargetType::OracleListener),
            "host2_lstnr"
        );
        assert_eq!(
            tag_display_name("ap1", &TargetType::RacDatabase),
            "ap1"
        );
    }
}
