use serde::{Deserialize, Serialize};

use crate::error::RangeError;

/// Liquidity shape preset. Wire names follow the dashboard's strategy keys.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    #[serde(rename = "spot")]
    Uniform,
    #[serde(rename = "curve")]
    BellCurve,
    #[serde(rename = "bidAsk")]
    Bimodal,
}

/// Which token(s) the deposit uses.
/// Token A sits in bins above the active bin, token B in bins below it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Sidedness {
    SingleTokenA,
    SingleTokenB,
    Dual,
}

impl Sidedness {
    pub fn is_single_sided(self) -> bool {
        !matches!(self, Sidedness::Dual)
    }
}

/// Candidate price bounds. `min_price < max_price` is checked by the validator,
/// not by construction, so an in-progress edit can hold an inverted pair.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRange {
    pub min_price: f64,
    pub max_price: f64,
}

impl PriceRange {
    pub fn new(min_price: f64, max_price: f64) -> Self {
        Self { min_price, max_price }
    }

    pub fn is_ordered(&self) -> bool {
        self.min_price < self.max_price
    }

    pub fn is_finite_positive(&self) -> bool {
        self.min_price.is_finite()
            && self.max_price.is_finite()
            && self.min_price > 0.0
            && self.max_price > 0.0
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SafetyLevel {
    Safe,
    Warning,
    Error,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViolationKind {
    InvalidBounds,
    RangeTooWide,
    RangeTooWideWarning,
    ActivePriceExcluded,
    NonFiniteInput,
}

impl ViolationKind {
    pub fn severity(self) -> Severity {
        match self {
            ViolationKind::RangeTooWideWarning => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub kind: ViolationKind,
    pub severity: Severity,
    pub message: String,
}

impl Violation {
    pub fn new(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self { kind, severity: kind.severity(), message: message.into() }
    }

    pub fn is_blocking(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl From<&RangeError> for Violation {
    fn from(err: &RangeError) -> Self {
        Violation::new(ViolationKind::NonFiniteInput, err.to_string())
    }
}

/// Result of running every validation rule over one candidate range.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub bin_count: u32,
    pub safety_level: SafetyLevel,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn can_submit(&self) -> bool {
        !self.violations.iter().any(Violation::is_blocking)
    }

    pub fn has(&self, kind: ViolationKind) -> bool {
        self.violations.iter().any(|v| v.kind == kind)
    }

    pub fn blocking_kinds(&self) -> Vec<ViolationKind> {
        self.violations
            .iter()
            .filter(|v| v.is_blocking())
            .map(|v| v.kind)
            .collect()
    }
}

/// Raw liquidity observed in one bin, from the pool-state collaborator.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinLiquidity {
    pub bin_id: i32,
    pub weight: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenDecimals {
    pub base: u8,
    pub quote: u8,
}

/// Pool-state input. `live_bin_liquidity` ids are relative to the active bin.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolSnapshot {
    pub active_price: f64,
    pub bin_step_bps: f64,
    #[serde(default)]
    pub active_bin_id: Option<i32>,
    #[serde(default)]
    pub decimals: Option<TokenDecimals>,
    #[serde(default)]
    pub live_bin_liquidity: Option<Vec<BinLiquidity>>,
}

impl PoolSnapshot {
    pub fn new(active_price: f64, bin_step_bps: f64) -> Self {
        Self {
            active_price,
            bin_step_bps,
            active_bin_id: None,
            decimals: None,
            live_bin_liquidity: None,
        }
    }
}

/// What the controller publishes to the UI and hands to the transaction builder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeOutput {
    pub min_price: f64,
    pub max_price: f64,
    pub bin_count: u32,
    pub safety_level: SafetyLevel,
    pub violations: Vec<String>,
}

impl RangeOutput {
    pub fn from_report(range: PriceRange, report: &ValidationReport) -> Self {
        Self {
            min_price: range.min_price,
            max_price: range.max_price,
            bin_count: report.bin_count,
            safety_level: report.safety_level,
            violations: report.violations.iter().map(|v| v.message.clone()).collect(),
        }
    }
}
