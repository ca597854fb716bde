//! Topology discovery and tag derivation engine.
//!
//! Given a root target and the flat catalog, the mapper infers the
//! primary/standby pair of a database cluster, locates the related system,
//! PDB, instance, host, and listener targets by name-pattern matching,
//! enriches instances with runtime properties, and derives the canonical tag
//! set per target. All state is call-local; the only side effect is the
//! properties fetch behind the [`PropertySource`] seam, and no condition in
//! here is fatal: absence yields empty results, enrichment failures yield
//! unenriched targets. Fatal classification (root not found, upstream down)
//! belongs to the calling boundary.

pub mod accumulate;
pub mod enrich;
pub mod matcher;
pub mod naming;
pub mod tags;

pub use accumulate::Accumulator;
pub use enrich::PropertySource;

use emscope_protocol::{TaggedTarget, Target, TargetType};
use tracing::debug;

/// Discover and tag the full topology of the database cluster identified by
/// a root target name and type.
///
/// The result is ordered by first discovery (systems, clusters, PDBs,
/// instances, then hosts/listeners as enrichment finds them) with duplicate
/// ids collapsed. A root name with no matches anywhere simply produces an
/// empty list.
pub async fn auto_map_system(
    catalog: &[Target],
    root_name: &str,
    root_type: &TargetType,
    source: &dyn PropertySource,
) -> Vec<TaggedTarget> {
    let (primary, standby) = naming::primary_standby(root_name, root_type);
    let primary_upper = primary.to_uppercase();
    debug!(%root_name, %primary, %standby, "mapping system");

    let mut found = Accumulator::new();

    // Owning systems, primary and standby sides independently.
    let dbsys_primary = matcher::find_matching(
        catalog,
        &matcher::compile_patterns(&sys_patterns(&primary)),
        &TargetType::OracleDbsys,
        true,
    );
    let dbsys_standby = matcher::find_matching(
        catalog,
        &matcher::compile_patterns(&sys_patterns(&standby)),
        &TargetType::OracleDbsys,
        true,
    );
    found.add_all(dbsys_primary.iter().copied());
    found.add_all(dbsys_standby.iter().copied());

    // Cluster databases.
    for name in [&primary, &standby] {
        let racs = matcher::find_matching(
            catalog,
            &matcher::compile_patterns(&rac_patterns(name)),
            &TargetType::RacDatabase,
            true,
        );
        found.add_all(racs);
    }

    // Pluggable databases. The suffix pattern reuses the PRIMARY's uppercase
    // form on both sides: PDB suffixes are shared across the pair.
    for name in [&primary, &standby] {
        let pdbs = matcher::find_matching(
            catalog,
            &matcher::compile_patterns(&[pdb_pattern(name, &primary_upper)]),
            &TargetType::OraclePdb,
            false,
        );
        found.add_all(pdbs);
    }

    // Database instances, enriched with runtime properties; host and
    // listener targets ride along as side results.
    for name in [&primary, &standby] {
        let instances = matcher::find_matching(
            catalog,
            &matcher::compile_patterns(&[instance_pattern(name)]),
            &TargetType::OracleDatabase,
            false,
        );
        for instance in instances {
            let mut enriched = TaggedTarget::from_target(instance);
            let extra = enrich::enrich_database(&mut enriched, catalog, source).await;
            found.add_tagged(enriched);
            found.add_all(extra);
        }
    }

    // Owning system name: primary side preferred, standby as fallback.
    let dbsys_name: Option<String> = dbsys_primary
        .first()
        .or_else(|| dbsys_standby.first())
        .map(|t| t.name.clone());

    for target in found.iter_mut() {
        let rac_name = owning_cluster_name(target);
        tags::apply_tags(target, dbsys_name.as_deref(), rac_name.as_deref());
    }

    found.into_vec()
}

/// Re-derive tags (and re-enrich database instances) for an
/// operator-selected list of targets.
///
/// Selection order is preserved exactly and no deduplication is applied;
/// each call is independent. No owning-system/cluster context is available
/// here, so only the mandatory and enrichment tags are derived.
pub async fn prepare_targets(
    catalog: &[Target],
    selection: Vec<TaggedTarget>,
    source: &dyn PropertySource,
) -> Vec<TaggedTarget> {
    let mut prepared = Vec::with_capacity(selection.len());
    for item in selection {
        let mut target = TaggedTarget {
            id: item.id,
            name: item.name,
            type_name: item.type_name,
            dg_role: None,
            machine_name: None,
            listener_name: None,
            tags: item.tags,
        };
        if target.type_name == TargetType::OracleDatabase {
            // Side results are discarded: preparation never expands the
            // selection.
            let _ = enrich::enrich_database(&mut target, catalog, source).await;
        }
        tags::apply_tags(&mut target, None, None);
        prepared.push(target);
    }
    prepared
}

/// Owning-cluster context for the tag pass: instances and PDBs point at the
/// prefix before their first underscore, cluster databases at themselves.
fn owning_cluster_name(target: &TaggedTarget) -> Option<String> {
    match target.type_name {
        TargetType::OraclePdb | TargetType::OracleDatabase => target
            .name
            .split('_')
            .next()
            .map(|prefix| prefix.to_string()),
        TargetType::RacDatabase => Some(target.name.clone()),
        _ => None,
    }
}

fn sys_patterns(name: &str) -> Vec<String> {
    let escaped = regex::escape(name);
    vec![format!("{}_sys", escaped), format!("{}_1_sys", escaped)]
}

fn rac_patterns(name: &str) -> Vec<String> {
    let escaped = regex::escape(name);
    vec![escaped.clone(), format!("{}_1", escaped)]
}

fn pdb_pattern(name: &str, primary_upper: &str) -> String {
    format!("{}_{}.*", regex::escape(name), regex::escape(primary_upper))
}

fn instance_pattern(name: &str) -> String {
    let escaped = regex::escape(name);
    format!("{0}(?:_\\d+)?_{0}\\d*", escaped)
}
