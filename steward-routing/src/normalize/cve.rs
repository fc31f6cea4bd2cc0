//! CVE trust-hierarchy resolution.
//!
//! `plugin.cve[]` is the primary source and CVE-typed `xrefs` the
//! secondary; anything else CVE-shaped is recorded as an anomaly and kept
//! out of the list.

use serde_json::Value;
use smallvec::SmallVec;
use steward_core::types::collections::FxHashSet;

use crate::model::finding::Anomaly;

/// Resolve the deduplicated CVE list for one plugin block.
///
/// Order-stable: first-seen spelling wins, later case-insensitive
/// duplicates are dropped.
pub(crate) fn resolve(
    plugin: Option<&Value>,
    anomalies: &mut Vec<Anomaly>,
) -> SmallVec<[String; 4]> {
    let mut cves: SmallVec<[String; 4]> = SmallVec::new();
    let mut seen: FxHashSet<String> = FxHashSet::default();

    let Some(plugin) = plugin else {
        return cves;
    };

    if let Some(list) = plugin.get("cve").and_then(Value::as_array) {
        for entry in list {
            if let Some(id) = entry.as_str() {
                push_unique(id, &mut cves, &mut seen);
            }
        }
    }

    if let Some(xrefs) = plugin.get("xrefs").and_then(Value::as_array) {
        for xref in xrefs {
            let xref_type = xref.get("type").and_then(Value::as_str).unwrap_or("");
            let id = xref.get("id").and_then(Value::as_str).unwrap_or("");
            if id.is_empty() {
                continue;
            }
            if xref_type.eq_ignore_ascii_case("cve") {
                push_unique(id, &mut cves, &mut seen);
            } else if looks_like_cve(id) {
                anomalies.push(Anomaly::new(
                    "cve-ref-foreign-source",
                    format!("xref {xref_type}:{id} is CVE-shaped but not typed CVE"),
                ));
            }
        }
    }

    cves
}

fn push_unique(id: &str, cves: &mut SmallVec<[String; 4]>, seen: &mut FxHashSet<String>) {
    if seen.insert(id.to_ascii_uppercase()) {
        cves.push(id.to_string());
    }
}

/// `CVE-<4-digit year>-<4+ digit number>`, case-insensitive.
pub(crate) fn looks_like_cve(id: &str) -> bool {
    let Some(prefix) = id.get(..4) else {
        return false;
    };
    if !prefix.eq_ignore_ascii_case("cve-") {
        return false;
    }
    let mut parts = id[4..].splitn(2, '-');
    let year = parts.next().unwrap_or("");
    let number = parts.next().unwrap_or("");
    year.len() == 4
        && year.bytes().all(|b| b.is_ascii_digit())
        && number.len() >= 4
        && number.bytes().all(|b| b.is_ascii_digit())
}
