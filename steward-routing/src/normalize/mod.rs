//! Canonical normalization of raw export records.
//!
//! Pure function of (raw record, evaluation timestamp): no clock reads, no
//! mutation of the input. Only `plugin_id` and `finding_id` are mandatory;
//! every other absence degrades to empty, and nothing is inferred from
//! adjacent fields.
//!
//! Documented raw paths (exporter format):
//! - `plugin.id` (fallbacks: `plugin_id`, `pluginId`) — mandatory
//! - `finding_id` (fallback: `id`) — mandatory
//! - `asset.{uuid,hostname,fqdn,ipv4,ipv6,operating_system,device_type}`
//! - `plugin.{name,family,cve[],xrefs[],description,solution,type,see_also[]}`
//! - `state`, `first_found`, `last_found`, `resurfaced_date`
//! - `output`, `port.{port,protocol,service}`
//! - `source`, `scan.uuid`, `network_id`

mod cve;
mod paths;

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use steward_core::errors::SchemaError;

use crate::model::finding::{
    Anomaly, AssetIdentity, Evidence, Lifecycle, NormalizedFinding, OpsContext, VulnDetail,
};
use paths::{first_string, string_at, u64_at, value_at};

/// Normalize one raw finding into the canonical schema.
pub fn normalize(raw: &Value, evaluated_at: DateTime<Utc>) -> Result<NormalizedFinding, SchemaError> {
    if !raw.is_object() {
        return Err(SchemaError::NotAnObject);
    }

    let plugin_id = resolve_plugin_id(raw)?;
    let finding_id =
        first_string(raw, &[&["finding_id"], &["id"]]).ok_or_else(|| SchemaError::MissingField {
            path: "finding_id".to_string(),
        })?;

    let mut anomalies = Vec::new();

    let asset = AssetIdentity {
        uuid: string_at(raw, &["asset", "uuid"]),
        hostname: string_at(raw, &["asset", "hostname"]),
        fqdn: string_at(raw, &["asset", "fqdn"]),
        ipv4: string_at(raw, &["asset", "ipv4"]),
        ipv6: string_at(raw, &["asset", "ipv6"]),
        os: string_at(raw, &["asset", "operating_system"]),
        // Taken from the record as-is, never derived from os text.
        device_type: string_at(raw, &["asset", "device_type"]),
    };

    let plugin = value_at(raw, &["plugin"]);
    let cves = cve::resolve(plugin, &mut anomalies);

    let vuln = VulnDetail {
        plugin_id,
        plugin_name: first_string(raw, &[&["plugin", "name"], &["plugin", "plugin"]]),
        family: first_string(
            raw,
            &[
                &["plugin", "family"],
                &["plugin", "plugin_family"],
                &["plugin_family"],
            ],
        ),
        cves,
        vendor_refs: vendor_refs(plugin),
        description: string_at(raw, &["plugin", "description"]),
        solution: string_at(raw, &["plugin", "solution"]),
    };

    let lifecycle = build_lifecycle(raw, evaluated_at, &mut anomalies);
    let evidence = build_evidence(raw);
    check_local_plugin_evidence(raw, &evidence, &mut anomalies);

    let ops = OpsContext {
        source: string_at(raw, &["source"]),
        scan_uuid: string_at(raw, &["scan", "uuid"]),
        network_id: string_at(raw, &["network_id"]),
    };

    Ok(NormalizedFinding {
        finding_id,
        asset,
        vuln,
        lifecycle,
        evidence,
        ops,
        anomalies,
    })
}

/// The mandatory primary key, at `plugin.id` with legacy top-level
/// fallbacks. Present-but-malformed is an error, not a degrade.
fn resolve_plugin_id(raw: &Value) -> Result<u64, SchemaError> {
    for path in [&["plugin", "id"][..], &["plugin_id"][..], &["pluginId"][..]] {
        let Some(value) = value_at(raw, path) else {
            continue;
        };
        return u64_at(raw, path).ok_or_else(|| SchemaError::MalformedField {
            path: path.join("."),
            message: format!("expected an integer plugin id, got {value}"),
        });
    }
    Err(SchemaError::MissingField {
        path: "plugin.id".to_string(),
    })
}

fn build_lifecycle(
    raw: &Value,
    evaluated_at: DateTime<Utc>,
    anomalies: &mut Vec<Anomaly>,
) -> Lifecycle {
    let first_found = date_at(raw, "first_found", anomalies);
    let last_found = date_at(raw, "last_found", anomalies);
    let resurfaced_date = date_at(raw, "resurfaced_date", anomalies);

    let mut age_days = None;
    if let Some(first) = first_found {
        let days = (evaluated_at.date_naive() - first).num_days();
        if days < 0 {
            anomalies.push(Anomaly::new(
                "first-found-in-future",
                format!("first_found {first} is after the evaluation timestamp"),
            ));
        } else {
            age_days = Some(days);
        }
    }

    Lifecycle {
        state: string_at(raw, &["state"]),
        first_found,
        last_found,
        resurfaced_date,
        age_days,
    }
}

/// Date field: RFC 3339 timestamp or plain `YYYY-MM-DD`. Unparseable
/// values degrade to `None` with an anomaly.
fn date_at(raw: &Value, field: &str, anomalies: &mut Vec<Anomaly>) -> Option<NaiveDate> {
    let text = string_at(raw, &[field])?;
    let parsed = parse_date(&text);
    if parsed.is_none() {
        anomalies.push(Anomaly::new(
            "unparseable-date",
            format!("{field} {text:?} is not a recognized date"),
        ));
    }
    parsed
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

fn build_evidence(raw: &Value) -> Evidence {
    Evidence {
        output: string_at(raw, &["output"]),
        port: u64_at(raw, &["port", "port"]).and_then(|p| u16::try_from(p).ok()),
        protocol: string_at(raw, &["port", "protocol"]),
        service: string_at(raw, &["port", "service"]),
    }
}

/// A local (non-network) plugin type alongside port/protocol evidence is
/// inconsistent: record it, keep the data.
fn check_local_plugin_evidence(raw: &Value, evidence: &Evidence, anomalies: &mut Vec<Anomaly>) {
    let plugin_type = string_at(raw, &["plugin", "type"]).unwrap_or_default();
    if plugin_type.eq_ignore_ascii_case("local")
        && (evidence.port.is_some() || evidence.protocol.is_some())
    {
        anomalies.push(Anomaly::new(
            "local-plugin-with-port",
            format!("plugin type {plugin_type:?} alongside port/protocol evidence"),
        ));
    }
}

/// Non-CVE references: xrefs under their source type, then advisory links.
fn vendor_refs(plugin: Option<&Value>) -> Vec<String> {
    let mut refs = Vec::new();
    let Some(plugin) = plugin else {
        return refs;
    };
    if let Some(xrefs) = plugin.get("xrefs").and_then(Value::as_array) {
        for xref in xrefs {
            let xref_type = xref.get("type").and_then(Value::as_str).unwrap_or("");
            let id = xref.get("id").and_then(Value::as_str).unwrap_or("");
            if xref_type.is_empty() || id.is_empty() || xref_type.eq_ignore_ascii_case("cve") {
                continue;
            }
            refs.push(format!("{xref_type}:{id}"));
        }
    }
    if let Some(links) = plugin.get("see_also").and_then(Value::as_array) {
        refs.extend(links.iter().filter_map(Value::as_str).map(String::from));
    }
    refs
}
