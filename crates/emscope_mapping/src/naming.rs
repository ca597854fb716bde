//! Primary/standby name resolution.
//!
//! Cluster prefixes encode the Data-Guard role with a single character:
//! `p` = primary, `s` = standby (`ap1` / `as1`). The resolver derives the
//! counterpart name by swapping the role character.

use emscope_protocol::TargetType;

/// Swap role markers in a name: every `p` becomes `s`, or every `s` becomes
/// `p` when no `p` is present. Names with neither marker pass through.
fn swap_role_markers(name: &str) -> String {
    if name.contains('p') {
        name.replace('p', "s")
    } else if name.contains('s') {
        name.replace('s', "p")
    } else {
        name.to_string()
    }
}

/// Cluster-identifying prefix of a root target name.
///
/// PDB names carry the cluster prefix before their first underscore
/// (`ap1_pdb1` -> `ap1`); every other root type is used verbatim.
pub fn cluster_prefix<'a>(root_name: &'a str, root_type: &TargetType) -> &'a str {
    if *root_type == TargetType::OraclePdb {
        root_name.split('_').next().unwrap_or(root_name)
    } else {
        root_name
    }
}

/// Derive the `(primary, standby)` name pair for a cluster prefix.
///
/// A prefix containing exactly one of the role markers is placed on that
/// side and its counterpart derived by swapping. Prefixes with both or
/// neither marker are treated as the primary, best effort; ambiguous input
/// is never rejected.
pub fn primary_standby(root_name: &str, root_type: &TargetType) -> (String, String) {
    let prefix = cluster_prefix(root_name, root_type);
    if prefix.contains('s') && !prefix.contains('p') {
        (swap_role_markers(prefix), prefix.to_string())
    } else {
        (prefix.to_string(), swap_role_markers(prefix))
    }
}
