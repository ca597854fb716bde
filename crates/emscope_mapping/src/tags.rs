//! Canonical tag derivation.
//!
//! Every target the engine emits carries `target_name`, `target_type`, and a
//! self-referential tag keyed by its own type name. Database-shaped targets
//! additionally pick up their owning system/cluster and, for instances, the
//! enrichment fields. Derivation is idempotent: re-applying it to an
//! already-tagged target produces an equal tag set.

use emscope_protocol::naming::{listener_short_name, short_hostname, tag_display_name, LISTENER_PREFIX};
use emscope_protocol::{TaggedTarget, TargetType};

/// Tag key for the owning database system.
pub const TAG_ORACLE_DBSYS: &str = "oracle_dbsys";
/// Tag key for the owning cluster database.
pub const TAG_RAC_DATABASE: &str = "rac_database";

/// Apply the canonical tag set for a target given its topology context.
///
/// Later rules overwrite earlier ones for the same key, so the call is safe
/// on targets that already carry tags (operator edits included).
pub fn apply_tags(target: &mut TaggedTarget, dbsys_name: Option<&str>, rac_name: Option<&str>) {
    let type_name = target.type_name.clone();
    let display_name = tag_display_name(&target.name, &type_name);

    target
        .tags
        .insert("target_name".to_string(), display_name.clone());
    target
        .tags
        .insert("target_type".to_string(), type_name.as_str().to_string());
    target
        .tags
        .insert(type_name.as_str().to_string(), display_name);

    let owned_by_dbsys = matches!(
        type_name,
        TargetType::RacDatabase | TargetType::OraclePdb | TargetType::OracleDatabase
    );
    if owned_by_dbsys {
        if let Some(dbsys_name) = dbsys_name {
            target
                .tags
                .insert(TAG_ORACLE_DBSYS.to_string(), dbsys_name.to_string());
        }
    }

    let owned_by_rac = matches!(type_name, TargetType::OraclePdb | TargetType::OracleDatabase);
    if owned_by_rac {
        if let Some(rac_name) = rac_name {
            target
                .tags
                .insert(TAG_RAC_DATABASE.to_string(), rac_name.to_string());
        }
    }

    if type_name == TargetType::OracleDatabase {
        if let Some(dg_role) = &target.dg_role {
            target.tags.insert("dg_role".to_string(), dg_role.clone());
        }
        if let Some(machine_name) = &target.machine_name {
            if let Some(short) = short_hostname(machine_name) {
                target.tags.insert("machine_name".to_string(), short);
            }
        }
        if let Some(listener_name) = &target.listener_name {
            let base = listener_name
                .strip_prefix(LISTENER_PREFIX)
                .unwrap_or(listener_name);
            if let Some(short) = listener_short_name(base) {
                target.tags.insert("listener_name".to_string(), short);
            }
        }
    }
}

/// Re-establish the mandatory-tag invariant on a target.
///
/// Equivalent to tag derivation with no topology context; used on stored
/// site config so hand-edited entries never lose the mandatory tags.
pub fn ensure_required_tags(target: &mut TaggedTarget) {
    apply_tags(target, None, None);
}
