use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Discrete severity bucket derived from a continuous risk score.
///
/// Serialized lowercase (`"low"`, `"medium"`, `"high"`) to match the wire
/// format of the text-analysis path; `Display` capitalizes for human output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low"),
            RiskLevel::Medium => write!(f, "Medium"),
            RiskLevel::High => write!(f, "High"),
        }
    }
}

/// Category of a surfaced risk factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactorKind {
    Geopolitical,
    Operational,
    Supplier,
}

impl std::fmt::Display for FactorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FactorKind::Geopolitical => write!(f, "geopolitical"),
            FactorKind::Operational => write!(f, "operational"),
            FactorKind::Supplier => write!(f, "supplier"),
        }
    }
}

/// Result of scoring a single free-text item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextAssessment {
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    /// Entity-type label → distinct surface strings, first-seen order.
    pub entities: BTreeMap<String, Vec<String>>,
    /// Never empty; `["general"]` when no category keyword matched.
    pub categories: Vec<String>,
}

/// One record of a batch analysis. A failed item carries `error` instead of
/// the flattened assessment, so one malformed text never aborts the batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchRecord {
    pub text: String,
    // None flattens to nothing
    #[serde(flatten)]
    pub assessment: Option<TextAssessment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    pub results: Vec<BatchRecord>,
    /// Count of successfully analyzed items.
    pub total_analyzed: usize,
}

/// A shipping route supplied by the caller. Extra signal fields (congestion
/// readings, forecasts, …) are preserved for the estimators but unused by the
/// baseline ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    pub origin: String,
    pub destination: String,
    #[serde(flatten, default)]
    pub signals: BTreeMap<String, serde_json::Value>,
}

impl Route {
    pub fn route_id(&self) -> String {
        format!("{}-{}", self.origin, self.destination)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supplier {
    pub id: String,
    pub location: String,
    #[serde(flatten, default)]
    pub signals: BTreeMap<String, serde_json::Value>,
}

/// Observation window of the input data; consumed by the confidence estimator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimeWindow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
}

/// Full assessment input payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupplyChainData {
    #[serde(default)]
    pub routes: Vec<Route>,
    #[serde(default)]
    pub suppliers: Vec<Supplier>,
    #[serde(default)]
    pub time_window: TimeWindow,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlternativeRoute {
    pub path: String,
    pub risk_level: RiskLevel,
    pub additional_time: String,
    pub additional_cost: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteRiskResult {
    pub route_id: String,
    pub risk_level: RiskLevel,
    pub bottlenecks: Vec<String>,
    /// Populated only when the composite route risk exceeds 0.7.
    pub alternative_routes: Vec<AlternativeRoute>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierRiskResult {
    pub supplier_id: String,
    pub risk_level: RiskLevel,
    pub factors: Vec<String>,
    pub mitigation_strategies: Vec<String>,
}

/// Human-readable explanation emitted when a sub-score crosses its threshold
/// (0.6 for geopolitical, 0.7 for operational and supplier factors).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskFactor {
    #[serde(rename = "type")]
    pub kind: FactorKind,
    pub score: f64,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impacted_segments: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OverallAssessment {
    pub overall_risk_score: f64,
    /// Ordered geopolitical ++ route ++ supplier.
    pub risk_factors: Vec<RiskFactor>,
    pub route_analysis: Vec<RouteRiskResult>,
    pub supplier_risks: Vec<SupplierRiskResult>,
    pub confidence_score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssessmentMeta {
    pub analysis_timestamp: DateTime<Utc>,
    pub data_freshness: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssessmentData {
    pub risk_assessment: OverallAssessment,
    pub meta: AssessmentMeta,
}

/// Top-level assessment envelope. A failure in any analysis stage yields the
/// `Error` variant; a partially populated assessment is never returned.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum AssessmentReport {
    Success { data: Box<AssessmentData> },
    Error { message: String },
}

/// Error taxonomy of the analysis core.
#[derive(Debug)]
pub enum AnalysisError {
    /// Missing or malformed required fields; reported immediately, never retried.
    InvalidInput(String),
    /// The entity-annotation collaborator was unavailable or errored.
    AnnotatorFailure(String),
    /// Unexpected failure inside an analyzer.
    ComputationFailure(String),
}

impl std::fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisError::InvalidInput(msg) => write!(f, "invalid input: {}", msg),
            AnalysisError::AnnotatorFailure(msg) => write!(f, "annotator failure: {}", msg),
            AnalysisError::ComputationFailure(msg) => write!(f, "computation failure: {}", msg),
        }
    }
}

impl std::error::Error for AnalysisError {}
