//! Topology enrichment for database instances.
//!
//! A database instance's runtime properties reveal its Data-Guard role and
//! the machine it runs on; from the machine we derive the listener name and
//! locate the host and listener targets in the catalog. Enrichment degrades
//! silently: a failed or empty properties fetch leaves the target untagged
//! but never aborts the discovery call.

use async_trait::async_trait;
use emscope_protocol::naming::{short_hostname, LISTENER_PREFIX};
use emscope_protocol::{TaggedTarget, Target, TargetProperties, TargetType};

use crate::matcher::find_by_name;

/// Property key carrying the Data-Guard role.
pub const PROP_DATA_GUARD_STATUS: &str = "DataGuardStatus";
/// Property key carrying the machine (host) name.
pub const PROP_MACHINE_NAME: &str = "MachineName";

/// Capability to fetch runtime properties for a target.
///
/// Implemented by the OEM client; tests substitute canned fixtures. The
/// mapper issues at most one fetch per enriched target and treats every
/// failure as "no properties".
#[async_trait]
pub trait PropertySource: Send + Sync {
    async fn target_properties(&self, target_id: &str) -> anyhow::Result<TargetProperties>;
}

/// Enrich an `oracle_database` target in place and locate its host and
/// listener targets in the catalog.
///
/// Returns the located side targets (zero, one, or two) for accumulation;
/// they are related targets, not children. `machine_name`/`listener_name`
/// stay populated even when the lookups find nothing.
pub async fn enrich_database<'a>(
    target: &mut TaggedTarget,
    catalog: &'a [Target],
    source: &dyn PropertySource,
) -> Vec<&'a Target> {
    let mut extra = Vec::new();

    let properties = match source.target_properties(&target.id).await {
        Ok(properties) => properties,
        Err(err) => {
            tracing::debug!(target_id = %target.id, %err, "properties fetch failed, skipping enrichment");
            return extra;
        }
    };

    if let Some(dg_role) = properties.value_of(PROP_DATA_GUARD_STATUS) {
        target.dg_role = Some(dg_role);
    }

    let machine_name = match properties.value_of(PROP_MACHINE_NAME) {
        Some(raw) => raw.replace("-vip", ""),
        None => return extra,
    };
    if machine_name.is_empty() {
        return extra;
    }

    let listener_name = format!("{}{}", LISTENER_PREFIX, machine_name);
    target.machine_name = Some(machine_name.clone());
    target.listener_name = Some(listener_name.clone());

    if let Some(host) = find_by_name(catalog, &machine_name, &TargetType::Host) {
        extra.push(host);
    }

    let mut listener = find_by_name(catalog, &listener_name, &TargetType::OracleListener);
    if listener.is_none() {
        // Some fleets register the listener under the shortened hostname.
        if let Some(short) = short_hostname(&machine_name) {
            let short_listener = format!("{}{}", LISTENER_PREFIX, short);
            listener = find_by_name(catalog, &short_listener, &TargetType::OracleListener);
        }
    }
    if let Some(listener) = listener {
        extra.push(listener);
    }

    extra
}

#[cfg(test)]
mod tests {
    use super::*;
    use emscope_protocol::PropertyItem;

    struct FixedProperties(TargetProperties);

    #[async_trait]
    impl PropertySource for FixedProperties {
        async fn target_properties(&self, _target_id: &str) -> anyhow::Result<TargetProperties> {
            Ok(self.0.clone())
        }
    }

    struct FailingProperties;

    #[async_trait]
    impl PropertySource for FailingProperties {
        async fn target_properties(&self, _target_id: &str) -> anyhow::Result<TargetProperties> {
            anyhow::bail!("connection refused")
        }
    }

    fn props(pairs: &[(&str, &str)]) -> TargetProperties {
        TargetProperties {
            items: pairs
                .iter()
                .map(|(name, value)| PropertyItem {
                    id: None,
                    name: Some(name.to_string()),
                    value: Some(serde_json::json!(value)),
                })
                .collect(),
        }
    }

    fn target(id: &str, name: &str, type_name: TargetType) -> Target {
        Target {
            id: id.to_string(),
            name: name.to_string(),
            type_name,
            display_name: None,
        }
    }

    fn db_target() -> TaggedTarget {
        TaggedTarget::from_target(&target("db1", "ap1_1_ap11", TargetType::OracleDatabase))
    }

    #[tokio::test]
    async fn enrichment_populates_role_machine_and_listener() {
        let catalog = vec![
            target("h1", "host1", TargetType::Host),
            target("l1", "LISTENER_host1", TargetType::OracleListener),
        ];
        let source = FixedProperties(props(&[
            ("DataGuardStatus", "PRIMARY"),
            ("MachineName", "host1-vip"),
        ]));

        let mut db = db_target();
        let extra = enrich_database(&mut db, &catalog, &source).await;

        assert_eq!(db.dg_role.as_deref(), Some("PRIMARY"));
        assert_eq!(db.machine_name.as_deref(), Some("host1"));
        assert_eq!(db.listener_name.as_deref(), Some("LISTENER_host1"));
        let ids: Vec<&str> = extra.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["h1", "l1"]);
    }

    #[tokio::test]
    async fn listener_lookup_falls_back_to_short_hostname() {
        let catalog = vec![target("l1", "LISTENER_host1", TargetType::OracleListener)];
        let source = FixedProperties(props(&[("MachineName", "host1.example.com")]));

        let mut db = db_target();
        let extra = enrich_database(&mut db, &catalog, &source).await;

        // Full name LISTENER_host1.example.com missed, short form hit
        assert_eq!(db.listener_name.as_deref(), Some("LISTENER_host1.example.com"));
        assert_eq!(extra.len(), 1);
        assert_eq!(extra[0].id, "l1");
    }

    #[tokio::test]
    async fn fields_persist_when_lookups_miss() {
        let source = FixedProperties(props(&[("MachineName", "ghost-vip")]));

        let mut db = db_target();
        let extra = enrich_database(&mut db, &[], &source).await;

        assert!(extra.is_empty());
        assert_eq!(db.machine_name.as_deref(), Some("ghost"));
        assert_eq!(db.listener_name.as_deref(), Some("LISTENER_ghost"));
    }

    #[tokio::test]
    async fn fetch_failure_degrades_silently() {
        let mut db = db_target();
        let extra = enrich_database(&mut db, &[], &FailingProperties).await;

        assert!(extra.is_empty());
        assert!(db.dg_role.is_none());
        assert!(db.machine_name.is_none());
        assert!(db.listener_name.is_none());
    }

    #[tokio::test]
    async fn role_without_machine_still_applies() {
        let source = FixedProperties(props(&[("DataGuardStatus", "PHYSICAL STANDBY")]));

        let mut db = db_target();
        enrich_database(&mut db, &[], &source).await;

        assert_eq!(db.dg_role.as_deref(), Some("PHYSICAL STANDBY"));
        assert!(db.machine_name.is_none());
    }
}
