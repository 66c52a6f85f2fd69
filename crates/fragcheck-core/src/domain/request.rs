//! Request documents as returned by the request-tracking service.

use serde::{Deserialize, Deserializer, Serialize};

/// Campaign markers for heavy-ion mixing campaigns that use the extended
/// memory/core table.
const HIN_MIX_CAMPAIGNS: &[&str] = &["HIN-HINPbPbAutumn18GSHIMix", "HINPbPbAutumn18wmLHEGSHIMix"];

/// Status a request must be in to be checked (unless the gate is bypassed).
pub const DEFINED_STATUS: &str = "defined";

/// Generator parameter set attached to a request.
///
/// Requests carry one entry per revision; only the last one is current.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorParameters {
    #[serde(default = "unit_efficiency")]
    pub filter_efficiency: f64,
    #[serde(default = "unit_efficiency")]
    pub match_efficiency: f64,
    #[serde(default)]
    pub cross_section: f64,
}

const fn unit_efficiency() -> f64 {
    1.0
}

impl Default for GeneratorParameters {
    fn default() -> Self {
        Self {
            filter_efficiency: 1.0,
            match_efficiency: 1.0,
            cross_section: 0.0,
        }
    }
}

/// A single production request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McmRequest {
    pub prepid: String,
    #[serde(default)]
    pub dataset_name: String,
    #[serde(default)]
    pub status: String,
    /// Seconds per event, one entry per sequence. Older documents store a bare number.
    #[serde(default, deserialize_with = "number_or_list")]
    pub time_event: Vec<f64>,
    #[serde(default)]
    pub total_events: u64,
    #[serde(default)]
    pub cmssw_release: String,
    /// Requested memory in MB.
    #[serde(default)]
    pub memory: u64,
    #[serde(default)]
    pub generator_parameters: Vec<GeneratorParameters>,
}

impl McmRequest {
    /// Time per event of the last sequence, or 0 when unknown.
    pub fn time_per_event(&self) -> f64 {
        self.time_event.last().copied().unwrap_or(0.0)
    }

    fn current_parameters(&self) -> GeneratorParameters {
        self.generator_parameters.last().cloned().unwrap_or_default()
    }

    pub fn filter_efficiency(&self) -> f64 {
        self.current_parameters().filter_efficiency
    }

    pub fn match_efficiency(&self) -> f64 {
        self.current_parameters().match_efficiency
    }

    pub fn is_defined(&self) -> bool {
        self.status == DEFINED_STATUS
    }

    /// Whether the request belongs to a heavy-ion mixing campaign.
    pub fn is_hin_mix_campaign(&self) -> bool {
        HIN_MIX_CAMPAIGNS.iter().any(|c| self.prepid.contains(c))
    }

    /// Whether the campaign name (embedded in the prepid) contains `tag`.
    pub fn in_campaign(&self, tag: &str) -> bool {
        self.prepid.contains(tag)
    }

    /// Lower-cased dataset name, used by all name-based heuristics.
    pub fn dataset_lower(&self) -> String {
        self.dataset_name.to_lowercase()
    }
}

fn number_or_list<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let numbers = match value {
        serde_json::Value::Array(items) => items.iter().filter_map(as_f64).collect(),
        serde_json::Value::Null => Vec::new(),
        other => as_f64(&other).into_iter().collect(),
    };
    Ok(numbers)
}

fn as_f64(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> serde_json::Value {
        json!({
            "prepid": "HIG-RunIIFall18wmLHEGS-00042",
            "dataset_name": "GluGluHToZZTo4L_M125_TuneCP5_13TeV_powheg2_JHUGenV7011_pythia8",
            "status": "defined",
            "time_event": [12.5, 48.0],
            "total_events": 500_000,
            "cmssw_release": "CMSSW_10_2_3",
            "memory": 2300,
            "generator_parameters": [
                {"filter_efficiency": 0.5, "match_efficiency": 1.0, "cross_section": 1.0},
                {"filter_efficiency": 0.25, "match_efficiency": 0.4, "cross_section": 2.0}
            ]
        })
    }

    #[test]
    fn test_deserialize_request() {
        let req: McmRequest = serde_json::from_value(sample()).unwrap();
        assert_eq!(req.prepid, "HIG-RunIIFall18wmLHEGS-00042");
        assert_eq!(req.memory, 2300);
        assert!(req.is_defined());
        assert!((req.time_per_event() - 48.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_last_generator_parameters_win() {
        let req: McmRequest = serde_json::from_value(sample()).unwrap();
        assert!((req.filter_efficiency() - 0.25).abs() < f64::EPSILON);
        assert!((req.match_efficiency() - 0.4).abs() < f64::EPSILON);
    }

    #[test]
    fn test_scalar_time_event() {
        let mut doc = sample();
        doc["time_event"] = json!(160.0);
        let req: McmRequest = serde_json::from_value(doc).unwrap();
        assert_eq!(req.time_event, vec![160.0]);
    }

    #[test]
    fn test_missing_generator_parameters_default_to_unity() {
        let req: McmRequest = serde_json::from_value(json!({"prepid": "X"})).unwrap();
        assert!((req.filter_efficiency() - 1.0).abs() < f64::EPSILON);
        assert!((req.time_per_event()).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hin_mix_campaign_detection() {
        let mut req: McmRequest = serde_json::from_value(sample()).unwrap();
        assert!(!req.is_hin_mix_campaign());
        req.prepid = "HIN-HINPbPbAutumn18GSHIMix-00010".to_string();
        assert!(req.is_hin_mix_campaign());
        req.prepid = "HIN-HINPbPbAutumn18wmLHEGSHIMix-00003".to_string();
        assert!(req.is_hin_mix_campaign());
    }
}
