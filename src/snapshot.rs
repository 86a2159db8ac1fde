//! Snapshot data model: tiers of strategies as loose JSON records.
//!
//! Strategies carry arbitrary passthrough fields, so a [`StrategyRecord`] is a
//! JSON object map rather than a fixed struct. The engine reads a typed
//! [`StrategyMetrics`] view out of it (missing or non-numeric fields become
//! 0.0) and overlays its three computed fields on a copy of the original map.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;
use crate::rationale::Reason;
use crate::stats;

/// Field holding a strategy's current APY.
pub const CURRENT_APY: &str = "currentAPY";
/// Field holding a strategy's current allocation, in percent.
pub const CURRENT_ALLOCATION: &str = "currentAllocation";
/// Object holding a strategy's historical metrics.
pub const HISTORICAL: &str = "historical";
/// Field inside [`HISTORICAL`] holding the average APY.
pub const AVG_APY: &str = "avgAPY";
/// Computed: the proposed allocation, in percent.
pub const NEW_ALLOCATION: &str = "newAllocation";
/// Computed: `newAllocation - currentAllocation`.
pub const ALLOCATION_CHANGE: &str = "allocationChange";
/// Computed: the rationale message.
pub const REASON: &str = "reason";

// ============================================================================
// Snapshot / Tier
// ============================================================================

/// A tiered strategy performance snapshot.
///
/// Header fields are kept as raw JSON. An absent field stays absent on output
/// and an explicit `null` stays `null`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(
        rename = "requestType",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub request_type: Option<Value>,
    /// Opaque; passed through untouched.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Value>,
    #[serde(default)]
    pub tiers: Vec<Tier>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Snapshot {
    pub fn new(request_type: impl Into<String>, timestamp: impl Into<Value>) -> Self {
        Self {
            request_type: Some(Value::String(request_type.into())),
            timestamp: Some(timestamp.into()),
            tiers: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn with_tier(mut self, tier: Tier) -> Self {
        self.tiers.push(tier);
        self
    }

    /// The request type as text, or `""` when absent or not a string.
    pub fn request_type(&self) -> &str {
        text_or_empty(self.request_type.as_ref())
    }

    /// Parse a snapshot from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// One risk tier and its strategies, in input order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Tier {
    /// Opaque tier identifier (usually a small integer).
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub tier: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    #[serde(default)]
    pub strategies: Vec<StrategyRecord>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Tier {
    pub fn new(tier: impl Into<Value>, name: impl Into<String>) -> Self {
        Self {
            tier: Some(tier.into()),
            name: Some(Value::String(name.into())),
            strategies: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn with_strategy(mut self, strategy: StrategyRecord) -> Self {
        self.strategies.push(strategy);
        self
    }

    /// The tier name as text, or `""` when absent or not a string.
    pub fn name(&self) -> &str {
        text_or_empty(self.name.as_ref())
    }

    /// Sum of `currentAllocation` across strategies (coerced).
    pub fn current_total(&self) -> f64 {
        self.strategies
            .iter()
            .map(|s| s.metrics().current_allocation)
            .sum()
    }
}

/// Deserialize a field that is present in the input, keeping `null` as a value.
fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

fn text_or_empty(value: Option<&Value>) -> &str {
    value.and_then(Value::as_str).unwrap_or_default()
}

// ============================================================================
// StrategyRecord
// ============================================================================

/// The numeric inputs the engine reads from a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StrategyMetrics {
    pub current_apy: f64,
    pub current_allocation: f64,
    pub avg_apy: f64,
}

/// A strategy as a JSON object. Unknown keys are preserved in input order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrategyRecord(Map<String, Value>);

impl StrategyRecord {
    /// A minimal record with the two numeric inputs set.
    pub fn new(current_apy: f64, current_allocation: f64) -> Self {
        let mut fields = Map::new();
        fields.insert(CURRENT_APY.into(), Value::from(current_apy));
        fields.insert(CURRENT_ALLOCATION.into(), Value::from(current_allocation));
        Self(fields)
    }

    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Set (or replace) a passthrough field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Set `historical.avgAPY` directly, leaving other historical keys alone.
    pub fn with_avg_apy(mut self, avg_apy: f64) -> Self {
        let historical = self
            .0
            .entry(HISTORICAL)
            .or_insert_with(|| Value::Object(Map::new()));
        if !historical.is_object() {
            *historical = Value::Object(Map::new());
        }
        if let Value::Object(h) = historical {
            h.insert(AVG_APY.into(), Value::from(avg_apy));
        }
        self
    }

    /// Populate `historical` from a series of observed APY samples.
    pub fn with_history(mut self, samples: &[f64]) -> Self {
        let mut historical = Map::new();
        historical.insert(AVG_APY.into(), Value::from(stats::mean(samples)));
        historical.insert("volatility".into(), Value::from(stats::volatility(samples)));
        historical.insert("sharpe".into(), Value::from(stats::sharpe(samples)));
        self.0.insert(HISTORICAL.into(), Value::Object(historical));
        self
    }

    /// Typed view of the engine inputs. Missing fields read as 0.0.
    pub fn metrics(&self) -> StrategyMetrics {
        let avg_apy = self
            .0
            .get(HISTORICAL)
            .and_then(Value::as_object)
            .map(|h| average_or_zero(h.get(AVG_APY)))
            .unwrap_or(0.0);

        StrategyMetrics {
            current_apy: number_or_zero(self.0.get(CURRENT_APY)),
            current_allocation: number_or_zero(self.0.get(CURRENT_ALLOCATION)),
            avg_apy,
        }
    }

    /// Copy of this record with the computed fields overlaid.
    pub fn annotate(&self, new_allocation: f64, allocation_change: f64, reason: Reason) -> Self {
        let mut fields = self.0.clone();
        fields.insert(NEW_ALLOCATION.into(), Value::from(new_allocation));
        fields.insert(ALLOCATION_CHANGE.into(), Value::from(allocation_change));
        fields.insert(REASON.into(), Value::from(reason.message()));
        Self(fields)
    }

    pub fn new_allocation(&self) -> Option<f64> {
        self.0.get(NEW_ALLOCATION).and_then(Value::as_f64)
    }

    pub fn allocation_change(&self) -> Option<f64> {
        self.0.get(ALLOCATION_CHANGE).and_then(Value::as_f64)
    }

    pub fn reason(&self) -> Option<Reason> {
        self.0
            .get(REASON)
            .and_then(Value::as_str)
            .and_then(Reason::from_message)
    }

    /// A display identifier: `address`, else `name`, else `index`.
    pub fn identifier(&self) -> Option<String> {
        for key in ["address", "name"] {
            if let Some(s) = self.0.get(key).and_then(Value::as_str) {
                if !s.is_empty() {
                    return Some(s.to_string());
                }
            }
        }
        self.0.get("index").map(|v| v.to_string())
    }
}

// ============================================================================
// Coercion
// ============================================================================

/// Read a number, defaulting to 0.0.
///
/// JSON numbers and numeric strings (`"4.5"`) are accepted; anything else,
/// including absent keys and non-finite parses, reads as 0.0.
pub fn number_or_zero(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Like [`number_or_zero`], but an array of samples reads as its mean.
fn average_or_zero(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Array(samples)) => {
            let values: Vec<f64> = samples.iter().map(|s| number_or_zero(Some(s))).collect();
            stats::mean(&values)
        }
        other => number_or_zero(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn metrics_default_to_zero() {
        let record: StrategyRecord = serde_json::from_value(json!({ "name": "Aave" })).unwrap();
        assert_eq!(record.metrics(), StrategyMetrics::default());
    }

    #[test]
    fn metrics_read_nested_avg() {
        let record: StrategyRecord = serde_json::from_value(json!({
            "currentAPY": 6.5,
            "currentAllocation": 40,
            "historical": { "avgAPY": 5.0, "volatility": 0.3 }
        }))
        .unwrap();
        let m = record.metrics();
        assert_eq!(m.current_apy, 6.5);
        assert_eq!(m.current_allocation, 40.0);
        assert_eq!(m.avg_apy, 5.0);
    }

    #[test]
    fn numeric_strings_parse() {
        assert_eq!(number_or_zero(Some(&json!(" 4.5 "))), 4.5);
        assert_eq!(number_or_zero(Some(&json!("n/a"))), 0.0);
        assert_eq!(number_or_zero(Some(&json!("NaN"))), 0.0);
        assert_eq!(number_or_zero(Some(&json!(true))), 0.0);
        assert_eq!(number_or_zero(Some(&Value::Null)), 0.0);
        assert_eq!(number_or_zero(None), 0.0);
    }

    #[test]
    fn avg_apy_array_is_averaged() {
        let record: StrategyRecord = serde_json::from_value(json!({
            "historical": { "avgAPY": [4.0, 6.0, 8.0] }
        }))
        .unwrap();
        assert_eq!(record.metrics().avg_apy, 6.0);

        let empty: StrategyRecord =
            serde_json::from_value(json!({ "historical": { "avgAPY": [] } })).unwrap();
        assert_eq!(empty.metrics().avg_apy, 0.0);
    }

    #[test]
    fn non_object_historical_reads_zero() {
        let record: StrategyRecord =
            serde_json::from_value(json!({ "historical": 7.0 })).unwrap();
        assert_eq!(record.metrics().avg_apy, 0.0);
    }

    #[test]
    fn annotate_preserves_fields_and_order() {
        let record: StrategyRecord = serde_json::from_value(json!({
            "index": 2,
            "address": "0xabc",
            "currentAPY": 10.0,
            "currentAllocation": 40.0,
            "totalAssets": "1000000"
        }))
        .unwrap();

        let annotated = record.annotate(55.17, 15.17, Reason::Strong);
        let keys: Vec<&str> = annotated.fields().keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "index",
                "address",
                "currentAPY",
                "currentAllocation",
                "totalAssets",
                "newAllocation",
                "allocationChange",
                "reason"
            ]
        );
        assert_eq!(annotated.new_allocation(), Some(55.17));
        assert_eq!(annotated.allocation_change(), Some(15.17));
        assert_eq!(annotated.reason(), Some(Reason::Strong));
        assert_eq!(annotated.get("totalAssets"), Some(&json!("1000000")));
        // the source record is untouched
        assert!(record.new_allocation().is_none());
    }

    #[test]
    fn history_builder() {
        let record = StrategyRecord::new(5.0, 50.0).with_history(&[3.0, 7.0, 3.0, 7.0]);
        let historical = record.get(HISTORICAL).and_then(Value::as_object).unwrap();
        assert_eq!(historical.get(AVG_APY), Some(&json!(5.0)));
        assert_eq!(historical.get("volatility"), Some(&json!(2.0)));
        assert_eq!(record.metrics().avg_apy, 5.0);
    }

    #[test]
    fn avg_apy_builder_keeps_other_history() {
        let record = StrategyRecord::new(5.0, 50.0)
            .with_history(&[1.0, 3.0])
            .with_avg_apy(9.0);
        let historical = record.get(HISTORICAL).and_then(Value::as_object).unwrap();
        assert_eq!(historical.get(AVG_APY), Some(&json!(9.0)));
        assert!(historical.contains_key("sharpe"));
    }

    #[test]
    fn identifier_prefers_address() {
        let record = StrategyRecord::new(1.0, 1.0)
            .with_field("name", "Compound")
            .with_field("address", "0xdef");
        assert_eq!(record.identifier().as_deref(), Some("0xdef"));

        let named = StrategyRecord::new(1.0, 1.0).with_field("name", "Compound");
        assert_eq!(named.identifier().as_deref(), Some("Compound"));

        let indexed = StrategyRecord::new(1.0, 1.0).with_field("index", 3);
        assert_eq!(indexed.identifier().as_deref(), Some("3"));
    }

    #[test]
    fn snapshot_passes_unknown_keys_through() {
        let json = r#"{
            "requestType": "rebalance",
            "timestamp": 1735689600000,
            "vault": "aura",
            "tiers": [
                { "tier": 0, "name": "Conservative", "strategies": [], "chain": "base" }
            ]
        }"#;
        let snapshot = Snapshot::from_json(json).unwrap();
        assert_eq!(snapshot.request_type(), "rebalance");
        assert_eq!(snapshot.timestamp, Some(json!(1735689600000_u64)));
        assert_eq!(snapshot.extra.get("vault"), Some(&json!("aura")));
        assert_eq!(snapshot.tiers[0].extra.get("chain"), Some(&json!("base")));

        let out: Value = serde_json::from_str(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(out["vault"], json!("aura"));
        assert_eq!(out["tiers"][0]["chain"], json!("base"));
        assert_eq!(out["tiers"][0]["strategies"], json!([]));
    }

    #[test]
    fn null_and_missing_headers_are_kept_as_given() {
        let json = r#"{
            "requestType": null,
            "tiers": [
                { "name": null, "strategies": [] },
                { "strategies": [] }
            ]
        }"#;
        let snapshot = Snapshot::from_json(json).unwrap();
        assert_eq!(snapshot.request_type, Some(Value::Null));
        assert_eq!(snapshot.request_type(), "");
        assert!(snapshot.timestamp.is_none());
        assert_eq!(snapshot.tiers[0].name, Some(Value::Null));
        assert_eq!(snapshot.tiers[0].name(), "");
        assert!(snapshot.tiers[1].tier.is_none());

        let out: Value = serde_json::from_str(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(
            out,
            json!({
                "requestType": null,
                "tiers": [
                    { "name": null, "strategies": [] },
                    { "strategies": [] }
                ]
            })
        );
    }

    #[test]
    fn non_string_name_passes_through() {
        let json = r#"{"requestType":"rebalance","tiers":[{"tier":"t0","name":7,"strategies":[]}]}"#;
        let snapshot = Snapshot::from_json(json).unwrap();
        assert_eq!(snapshot.tiers[0].name, Some(json!(7)));
        let out: Value = serde_json::from_str(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(out["tiers"][0]["name"], json!(7));
    }

    #[test]
    fn rejects_non_object_strategy() {
        let json = r#"{"requestType":"rebalance","timestamp":0,"tiers":[{"tier":0,"name":"x","strategies":[5]}]}"#;
        assert!(Snapshot::from_json(json).is_err());
    }

    #[test]
    fn current_total() {
        let tier = Tier::new(1, "Balanced")
            .with_strategy(StrategyRecord::new(5.0, 40.0))
            .with_strategy(StrategyRecord::new(3.0, 60.0));
        assert_eq!(tier.current_total(), 100.0);
    }
}
