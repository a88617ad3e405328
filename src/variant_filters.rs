//! Variant-level filter steps

use crate::filter::{DataRequirement, FilterResult, FilterType, VariantFilter};
use crate::region::{Region, RegionIndex, RegulatoryFeatureType};
use crate::variant::VariantRecord;
use std::sync::Arc;

/// Removes variants the caller did not mark PASS
#[derive(Debug, Default)]
pub struct FailedVariantFilter;

impl VariantFilter for FailedVariantFilter {
    fn filter_type(&self) -> FilterType {
        FilterType::FailedVariant
    }

    fn run_filter(&self, variant: &VariantRecord) -> FilterResult {
        FilterResult::from_bool(self.filter_type(), variant.passed_vcf_filter())
    }
}

#[derive(Debug)]
pub struct QualityFilter {
    min_quality: f64,
}

impl QualityFilter {
    pub fn new(min_quality: f64) -> Self {
        Self { min_quality }
    }
}

impl VariantFilter for QualityFilter {
    fn filter_type(&self) -> FilterType {
        FilterType::Quality
    }

    fn run_filter(&self, variant: &VariantRecord) -> FilterResult {
        FilterResult::from_bool(self.filter_type(), variant.quality() >= self.min_quality)
    }
}

/// Keeps variants starting inside any of a fixed set of intervals
#[derive(Debug)]
pub struct IntervalFilter {
    intervals: RegionIndex<()>,
}

impl IntervalFilter {
    pub fn new(intervals: Vec<Region<()>>) -> Self {
        Self {
            intervals: RegionIndex::build(intervals),
        }
    }
}

impl VariantFilter for IntervalFilter {
    fn filter_type(&self) -> FilterType {
        FilterType::Interval
    }

    fn run_filter(&self, variant: &VariantRecord) -> FilterResult {
        FilterResult::from_bool(
            self.filter_type(),
            self.intervals.has_region_containing_variant(variant),
        )
    }
}

/// Keeps variants lying in a known regulatory region
#[derive(Debug)]
pub struct RegulatoryFeatureFilter {
    regions: Arc<RegionIndex<RegulatoryFeatureType>>,
}

impl RegulatoryFeatureFilter {
    pub fn new(regions: Arc<RegionIndex<RegulatoryFeatureType>>) -> Self {
        Self { regions }
    }
}

impl VariantFilter for RegulatoryFeatureFilter {
    fn filter_type(&self) -> FilterType {
        FilterType::RegulatoryFeature
    }

    fn run_filter(&self, variant: &VariantRecord) -> FilterResult {
        FilterResult::from_bool(
            self.filter_type(),
            self.regions.has_region_containing_variant(variant),
        )
    }

    fn data_requirement(&self) -> Option<DataRequirement> {
        Some(DataRequirement::Regions)
    }
}

/// Removes variants more common than `max_frequency` percent in any population
#[derive(Debug)]
pub struct FrequencyFilter {
    max_frequency: f32,
}

impl FrequencyFilter {
    pub fn new(max_frequency: f32) -> Self {
        Self { max_frequency }
    }

    pub fn max_frequency(&self) -> f32 {
        self.max_frequency
    }
}

impl VariantFilter for FrequencyFilter {
    fn filter_type(&self) -> FilterType {
        FilterType::Frequency
    }

    fn run_filter(&self, variant: &VariantRecord) -> FilterResult {
        let passed = match variant.frequency_data() {
            Some(data) => data.max_freq() <= self.max_frequency,
            None => false,
        };
        FilterResult::from_bool(self.filter_type(), passed)
    }

    fn data_requirement(&self) -> Option<DataRequirement> {
        Some(DataRequirement::FrequencySources)
    }
}

/// Removes variants already seen in a population database or carrying an rsID
#[derive(Debug, Default)]
pub struct KnownVariantFilter;

impl VariantFilter for KnownVariantFilter {
    fn filter_type(&self) -> FilterType {
        FilterType::KnownVariant
    }

    fn run_filter(&self, variant: &VariantRecord) -> FilterResult {
        let passed = match variant.frequency_data() {
            Some(data) => !data.is_represented_in_database(),
            None => false,
        };
        FilterResult::from_bool(self.filter_type(), passed)
    }

    fn data_requirement(&self) -> Option<DataRequirement> {
        Some(DataRequirement::FrequencySources)
    }
}

pub const DEFAULT_MIN_PATHOGENICITY_SCORE: f32 = 0.5;

/// Keeps variants asserted pathogenic in ClinVar or predicted deleterious by any source.
/// With `keep_non_pathogenic` every variant passes and the step only marks them.
#[derive(Debug)]
pub struct PathogenicityFilter {
    keep_non_pathogenic: bool,
    min_score: f32,
}

impl PathogenicityFilter {
    pub fn new(keep_non_pathogenic: bool) -> Self {
        Self::with_min_score(keep_non_pathogenic, DEFAULT_MIN_PATHOGENICITY_SCORE)
    }

    pub fn with_min_score(keep_non_pathogenic: bool, min_score: f32) -> Self {
        Self {
            keep_non_pathogenic,
            min_score,
        }
    }

    fn is_pathogenic(&self, variant: &VariantRecord) -> bool {
        let Some(data) = variant.pathogenicity_data() else {
            return false;
        };
        if data
            .clinvar
            .map(|c| c.is_pathogenic_or_likely_pathogenic())
            .unwrap_or(false)
        {
            return true;
        }
        data.most_pathogenic_score()
            .map(|s| s.score() >= self.min_score)
            .unwrap_or(false)
    }
}

impl VariantFilter for PathogenicityFilter {
    fn filter_type(&self) -> FilterType {
        FilterType::Pathogenicity
    }

    fn run_filter(&self, variant: &VariantRecord) -> FilterResult {
        let passed = self.keep_non_pathogenic || self.is_pathogenic(variant);
        FilterResult::from_bool(self.filter_type(), passed)
    }

    fn data_requirement(&self) -> Option<DataRequirement> {
        Some(DataRequirement::PathogenicitySources)
    }
}
