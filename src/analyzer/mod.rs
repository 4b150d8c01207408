//! Supply-chain risk analyzers and the overall assessment engine.
//!
//! Every per-dimension sub-score comes from an injectable estimator trait so
//! a real signal feed can replace the baseline constants without touching the
//! aggregation logic — this is the primary extension point of the engine.

pub mod engine;
pub mod geo;
pub mod route;
pub mod supplier;

use crate::models::{Route, Supplier, TimeWindow};

/// Per-route risk signals. The composite route risk is the unweighted mean of
/// the three dimensions.
pub trait RouteEstimator {
    fn congestion(&self, route: &Route) -> f64;
    fn weather(&self, route: &Route) -> f64;
    fn delay(&self, route: &Route) -> f64;
}

/// Per-supplier risk signals.
pub trait SupplierEstimator {
    fn financial(&self, supplier: &Supplier) -> f64;
    fn operational(&self, supplier: &Supplier) -> f64;
    fn location(&self, supplier: &Supplier) -> f64;
}

/// Per-region geopolitical risk signal.
pub trait RegionEstimator {
    fn region_risk(&self, region: &str) -> f64;
}

/// Reliability estimate for an assessment given the data it was fed.
pub trait ConfidenceEstimator {
    fn confidence(&self, routes: &[Route], suppliers: &[Supplier], window: &TimeWindow) -> f64;
}

/// Fixed-constant estimators standing in until real signal feeds land.
///
/// TODO: replace the congestion constant with the port congestion index once
/// the ingest for it exists; the other dimensions have no feed planned yet.
pub struct Baseline;

impl RouteEstimator for Baseline {
    fn congestion(&self, _route: &Route) -> f64 {
        0.5
    }
    fn weather(&self, _route: &Route) -> f64 {
        0.3
    }
    fn delay(&self, _route: &Route) -> f64 {
        0.4
    }
}

impl SupplierEstimator for Baseline {
    fn financial(&self, _supplier: &Supplier) -> f64 {
        0.5
    }
    fn operational(&self, _supplier: &Supplier) -> f64 {
        0.4
    }
    fn location(&self, _supplier: &Supplier) -> f64 {
        0.3
    }
}

impl RegionEstimator for Baseline {
    fn region_risk(&self, _region: &str) -> f64 {
        0.6
    }
}

impl ConfidenceEstimator for Baseline {
    fn confidence(&self, _routes: &[Route], _suppliers: &[Supplier], _window: &TimeWindow) -> f64 {
        0.85
    }
}
