//! Filter step identities, verdicts and per-entity bookkeeping

use crate::gene::Gene;
use crate::variant::VariantRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FilterType {
    FailedVariant,
    Quality,
    Interval,
    GeneSymbol,
    RegulatoryFeature,
    Frequency,
    KnownVariant,
    Pathogenicity,
    PriorityScore,
    Inheritance,
}

impl FilterType {
    /// Gene-level results of this type are copied onto the gene's variants. Inheritance
    /// compatibility only describes the gene and is never copied.
    pub fn propagates_to_variants(&self) -> bool {
        !matches!(self, FilterType::Inheritance)
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            FilterType::FailedVariant => "filter",
            FilterType::Quality => "quality",
            FilterType::Interval => "interval",
            FilterType::GeneSymbol => "gene-id",
            FilterType::RegulatoryFeature => "reg-feat",
            FilterType::Frequency => "freq",
            FilterType::KnownVariant => "known-var",
            FilterType::Pathogenicity => "path",
            FilterType::PriorityScore => "gene-priority",
            FilterType::Inheritance => "inheritance",
        }
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    Pass,
    Fail,
}

/// Outcome of running one filter step on one variant or gene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterResult {
    pub filter_type: FilterType,
    pub verdict: Verdict,
}

impl FilterResult {
    pub fn pass(filter_type: FilterType) -> Self {
        Self {
            filter_type,
            verdict: Verdict::Pass,
        }
    }

    pub fn fail(filter_type: FilterType) -> Self {
        Self {
            filter_type,
            verdict: Verdict::Fail,
        }
    }

    pub fn from_bool(filter_type: FilterType, passed: bool) -> Self {
        if passed {
            Self::pass(filter_type)
        } else {
            Self::fail(filter_type)
        }
    }

    pub fn passed(&self) -> bool {
        self.verdict == Verdict::Pass
    }

    pub fn failed(&self) -> bool {
        self.verdict == Verdict::Fail
    }
}

/// Overall state of an entity's filter record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterState {
    Unfiltered,
    Passed,
    Failed,
}

/// Accumulated results for one variant or gene, in the order they were recorded. Results are
/// only ever added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterStatus {
    results: Vec<FilterResult>,
}

impl FilterStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a result, returning whether it was a pass
    pub fn add(&mut self, result: FilterResult) -> bool {
        self.results.push(result);
        result.passed()
    }

    pub fn state(&self) -> FilterState {
        if self.results.is_empty() {
            FilterState::Unfiltered
        } else if self.results.iter().any(FilterResult::failed) {
            FilterState::Failed
        } else {
            FilterState::Passed
        }
    }

    pub fn is_unfiltered(&self) -> bool {
        self.results.is_empty()
    }

    /// No recorded failure. An unfiltered entity has not failed anything.
    pub fn passed_all(&self) -> bool {
        self.state() != FilterState::Failed
    }

    pub fn has_result_for(&self, filter_type: FilterType) -> bool {
        self.results.iter().any(|r| r.filter_type == filter_type)
    }

    /// A step never evaluated is reported as not passed.
    pub fn passed(&self, filter_type: FilterType) -> bool {
        self.has_result_for(filter_type) && !self.failed(filter_type)
    }

    pub fn failed(&self, filter_type: FilterType) -> bool {
        self.results
            .iter()
            .any(|r| r.filter_type == filter_type && r.failed())
    }

    pub fn passed_filter_types(&self) -> Vec<FilterType> {
        let mut types = Vec::new();
        for result in &self.results {
            if self.passed(result.filter_type) && !types.contains(&result.filter_type) {
                types.push(result.filter_type);
            }
        }
        types
    }

    pub fn failed_filter_types(&self) -> Vec<FilterType> {
        let mut types = Vec::new();
        for result in self.results.iter().filter(|r| r.failed()) {
            if !types.contains(&result.filter_type) {
                types.push(result.filter_type);
            }
        }
        types
    }

    pub fn results(&self) -> &[FilterResult] {
        &self.results
    }
}

/// Data a step needs wired in before it can run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataRequirement {
    FrequencySources,
    PathogenicitySources,
    Regions,
}

/// A step producing a verdict for a single variant. Implementations must fail closed when the
/// annotation they need is missing.
pub trait VariantFilter: Send + Sync + fmt::Debug {
    fn filter_type(&self) -> FilterType;

    fn run_filter(&self, variant: &VariantRecord) -> FilterResult;

    fn data_requirement(&self) -> Option<DataRequirement> {
        None
    }
}

/// A step producing a verdict for a whole gene
pub trait GeneFilter: Send + Sync + fmt::Debug {
    fn filter_type(&self) -> FilterType;

    fn run_filter(&self, gene: &Gene) -> FilterResult;

    /// Called by the runner before `run_filter` so a step can record what it derives about the
    /// gene. The default does nothing.
    fn annotate(&self, _gene: &mut Gene) {}

    fn data_requirement(&self) -> Option<DataRequirement> {
        None
    }
}
