//! End-to-end discovery scenarios against an in-memory catalog and a mock
//! properties source.

use async_trait::async_trait;
use emscope_mapping::{auto_map_system, prepare_targets, PropertySource};
use emscope_protocol::{PropertyItem, TaggedTarget, Target, TargetProperties, TargetType};
use std::collections::HashMap;

struct MockProperties {
    by_id: HashMap<String, Vec<(String, String)>>,
    fail: bool,
}

impl MockProperties {
    fn new() -> Self {
        Self {
            by_id: HashMap::new(),
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            by_id: HashMap::new(),
            fail: true,
        }
    }

    fn with(mut self, target_id: &str, pairs: &[(&str, &str)]) -> Self {
        self.by_id.insert(
            target_id.to_string(),
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        );
        self
    }
}

#[async_trait]
impl PropertySource for MockProperties {
    async fn target_properties(&self, target_id: &str) -> anyhow::Result<TargetProperties> {
        if self.fail {
            anyhow::bail!("properties endpoint unavailable");
        }
        let items = self
            .by_id
            .get(target_id)
            .map(|pairs| {
                pairs
                    .iter()
                    .map(|(name, value)| PropertyItem {
                        id: None,
                        name: Some(name.clone()),
                        value: Some(serde_json::json!(value)),
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(TargetProperties { items })
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

fn cluster_catalog() -> Vec<Target> {
    vec![
        target("sys1", "ap1_sys", TargetType::OracleDbsys),
        target("rac1", "ap1", TargetType::RacDatabase),
        target("pdb1", "ap1_AP1PDB1", TargetType::OraclePdb),
        target("pdb2", "as1_AP1PDB1", TargetType::OraclePdb),
        target("db1", "ap1_1_ap11", TargetType::OracleDatabase),
        target("h1", "host1", TargetType::Host),
        target("l1", "LISTENER_host1", TargetType::OracleListener),
        // Unrelated noise the mapper must ignore
        target("x1", "bp7", TargetType::RacDatabase),
        target("x2", "agent13", TargetType::Other("oracle_emd".to_string())),
    ]
}

fn by_id<'a>(result: &'a [TaggedTarget], id: &str) -> &'a TaggedTarget {
    result
        .iter()
        .find(|t| t.id == id)
        .unwrap_or_else(|| panic!("target {} missing from result", id))
}

#[tokio::test]
async fn full_cluster_discovery_from_pdb_root() {
    let catalog = cluster_catalog();
    let source = MockProperties::new().with(
        "db1",
        &[("MachineName", "host1-vip"), ("DataGuardStatus", "PRIMARY")],
    );

    let result = auto_map_system(&catalog, "ap1_AP1PDB1", &TargetType::OraclePdb, &source).await;

    let ids: Vec<&str> = result.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["sys1", "rac1", "pdb1", "pdb2", "db1", "h1", "l1"]);

    // Every emitted target carries the mandatory tags.
    for t in &result {
        assert!(t.tags.contains_key("target_name"), "{}", t.name);
        assert_eq!(
            t.tags.get("target_type").map(String::as_str),
            Some(t.type_name.as_str())
        );
        assert!(t.tags.contains_key(t.type_name.as_str()));
    }

    let db = by_id(&result, "db1");
    assert_eq!(db.tags.get("dg_role").map(String::as_str), Some("PRIMARY"));
    assert_eq!(db.tags.get("machine_name").map(String::as_str), Some("host1"));
    assert_eq!(db.tags.get("listener_name").map(String::as_str), Some("host1_lstnr"));
    assert_eq!(db.tags.get("oracle_dbsys").map(String::as_str), Some("ap1_sys"));
    assert_eq!(db.tags.get("rac_database").map(String::as_str), Some("ap1"));

    let rac = by_id(&result, "rac1");
    assert_eq!(rac.tags.get("oracle_dbsys").map(String::as_str), Some("ap1_sys"));
    // The cluster's rac_database key is its self tag, not a context tag.
    assert_eq!(rac.tags.get("rac_database").map(String::as_str), Some("ap1"));

    for pdb_id in ["pdb1", "pdb2"] {
        let pdb = by_id(&result, pdb_id);
        assert_eq!(pdb.tags.get("oracle_dbsys").map(String::as_str), Some("ap1_sys"));
    }
    // Standby PDB's cluster context comes from its own name prefix.
    assert_eq!(
        by_id(&result, "pdb2").tags.get("rac_database").map(String::as_str),
        Some("as1")
    );

    // Host and listener carry no ownership tags.
    let host = by_id(&result, "h1");
    assert!(!host.tags.contains_key("oracle_dbsys"));
    assert_eq!(host.tags.get("target_name").map(String::as_str), Some("host1"));
}

#[tokio::test]
async fn standby_root_discovers_the_same_pair() {
    let catalog = vec![
        target("sysp", "ap1_sys", TargetType::OracleDbsys),
        target("syss", "as1_sys", TargetType::OracleDbsys),
        target("racp", "ap1", TargetType::RacDatabase),
        target("racs", "as1", TargetType::RacDatabase),
    ];
    let source = MockProperties::new();

    let result = auto_map_system(&catalog, "as1", &TargetType::RacDatabase, &source).await;

    let ids: Vec<&str> = result.iter().map(|t| t.id.as_str()).collect();
    // Primary side is listed first regardless of which side the root named.
    assert_eq!(ids, vec!["sysp", "syss", "racp", "racs"]);

    // Owning system prefers the primary side's name.
    assert_eq!(
        by_id(&result, "racs").tags.get("oracle_dbsys").map(String::as_str),
        Some("ap1_sys")
    );
}

#[tokio::test]
async fn dbsys_name_falls_back_to_standby_side() {
    let catalog = vec![
        target("syss", "as1_sys", TargetType::OracleDbsys),
        target("racp", "ap1", TargetType::RacDatabase),
    ];
    let source = MockProperties::new();

    let result = auto_map_system(&catalog, "ap1", &TargetType::RacDatabase, &source).await;

    assert_eq!(
        by_id(&result, "racp").tags.get("oracle_dbsys").map(String::as_str),
        Some("as1_sys")
    );
}

#[tokio::test]
async fn failed_enrichment_keeps_target_with_mandatory_tags_only() {
    let catalog = vec![target("db1", "ap1_1_ap11", TargetType::OracleDatabase)];
    let source = MockProperties::failing();

    let result = auto_map_system(&catalog, "ap1", &TargetType::RacDatabase, &source).await;

    assert_eq!(result.len(), 1);
    let db = &result[0];
    assert_eq!(db.tags.get("target_name").map(String::as_str), Some("ap1_1_ap11"));
    assert_eq!(db.tags.get("target_type").map(String::as_str), Some("oracle_database"));
    assert!(!db.tags.contains_key("dg_role"));
    assert!(!db.tags.contains_key("machine_name"));
    assert!(!db.tags.contains_key("listener_name"));
}

#[tokio::test]
async fn unknown_root_yields_empty_discovery() {
    let catalog = cluster_catalog();
    let source = MockProperties::new();

    let result = auto_map_system(&catalog, "zz9", &TargetType::RacDatabase, &source).await;
    assert!(result.is_empty());
}

#[tokio::test]
async fn prepare_preserves_selection_order_and_reenriches() {
    let catalog = cluster_catalog();
    let source = MockProperties::new().with(
        "db1",
        &[("MachineName", "host1-vip"), ("DataGuardStatus", "PRIMARY")],
    );

    let selection = vec![
        TaggedTarget::from_target(&target("h1", "host1", TargetType::Host)),
        TaggedTarget::from_target(&target("db1", "ap1_1_ap11", TargetType::OracleDatabase)),
        TaggedTarget::from_target(&target("h1", "host1", TargetType::Host)),
    ];

    let prepared = prepare_targets(&catalog, selection, &source).await;

    // Order preserved, duplicates untouched.
    let ids: Vec<&str> = prepared.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["h1", "db1", "h1"]);

    let db = &prepared[1];
    assert_eq!(db.dg_role.as_deref(), Some("PRIMARY"));
    assert_eq!(db.tags.get("machine_name").map(String::as_str), Some("host1"));
    // No topology context in preparation.
    assert!(!db.tags.contains_key("oracle_dbsys"));
    assert!(!db.tags.contains_key("rac_database"));

    // Host and listener side results are NOT appended to the selection.
    assert_eq!(prepared.len(), 3);
}

#[tokio::test]
async fn prepare_keeps_operator_tags_and_restores_mandatory_ones() {
    let mut selected = TaggedTarget::from_target(&target("rac1", "ap1", TargetType::RacDatabase));
    selected
        .tags
        .insert("env".to_string(), "prod".to_string());

    let prepared = prepare_targets(&[], vec![selected], &MockProperties::new()).await;

    let rac = &prepared[0];
    assert_eq!(rac.tags.get("env").map(String::as_str), Some("prod"));
    assert_eq!(rac.tags.get("target_name").map(String::as_str), Some("ap1"));
    assert_eq!(rac.tags.get("rac_database").map(String::as_str), Some("ap1"));
}
