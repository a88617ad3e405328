//! Ordered execution of variant- and gene-level filter steps.
//!
//! Each variant runs its steps strictly in list order and stops at the first failure, so
//! expensive lookups behind later steps are never made for variants already removed.
//! Variants may be processed in parallel; steps for one variant never are. Gene-level results
//! are recorded on the gene and copied onto its variants, except inheritance compatibility.

use crate::filter::{DataRequirement, FilterResult, GeneFilter, VariantFilter};
use crate::gene::{Gene, PriorityType};
use crate::gene_filters::{GeneSymbolFilter, InheritanceFilter, PriorityScoreFilter};
use crate::region::{Region, RegionIndex, RegulatoryFeatureType};
use crate::variant::VariantRecord;
use crate::variant_filters::{
    FailedVariantFilter, FrequencyFilter, IntervalFilter, KnownVariantFilter,
    PathogenicityFilter, QualityFilter, RegulatoryFeatureFilter,
};
use crate::{validate_analysis_config, AnalysisConfig, GenorankError, GenorankResult};
use rayon::prelude::*;
use serde::Serialize;
use std::sync::Arc;

/// Runs steps against `variant` in order, stopping at the first failure
fn run_fail_fast(filters: &[Box<dyn VariantFilter>], variant: &mut VariantRecord) -> bool {
    for filter in filters {
        let result = filter.run_filter(variant);
        if !variant.add_filter_result(result) {
            log::debug!("{} failed {}", variant, result.filter_type);
            return false;
        }
    }
    true
}

pub struct VariantFilterRunner;

impl VariantFilterRunner {
    /// Returns the number of variants passing every step
    pub fn run(filters: &[Box<dyn VariantFilter>], variants: &mut [VariantRecord]) -> usize {
        variants
            .par_iter_mut()
            .map(|variant| run_fail_fast(filters, variant))
            .filter(|passed| *passed)
            .count()
    }

    /// Applies a single step to every variant, returning the number passing it
    pub fn run_filter(filter: &dyn VariantFilter, variants: &mut [VariantRecord]) -> usize {
        variants
            .par_iter_mut()
            .map(|variant| {
                let result = filter.run_filter(variant);
                variant.add_filter_result(result)
            })
            .filter(|passed| *passed)
            .count()
    }
}

pub struct GeneFilterRunner;

impl GeneFilterRunner {
    /// Applies each step to every gene in turn. Returns the number of genes passing all of them.
    pub fn run(filters: &[Box<dyn GeneFilter>], genes: &mut [Gene]) -> usize {
        for filter in filters {
            Self::run_filter(filter.as_ref(), genes);
        }
        genes.iter().filter(|gene| gene.passed_filters()).count()
    }

    pub fn run_filter(filter: &dyn GeneFilter, genes: &mut [Gene]) -> usize {
        let mut passed = 0;
        for gene in genes.iter_mut() {
            filter.annotate(gene);
            let result = filter.run_filter(gene);
            if record_gene_result(gene, result) {
                passed += 1;
            }
        }
        passed
    }
}

fn record_gene_result(gene: &mut Gene, result: FilterResult) -> bool {
    if result.failed() {
        log::debug!("{} failed {}", gene.identifier(), result.filter_type);
    }
    if result.filter_type.propagates_to_variants() {
        for variant in gene.variants_mut() {
            variant.add_filter_result(result);
        }
    }
    gene.add_filter_result(result)
}

/// One entry in an analysis
#[derive(Debug)]
pub enum AnalysisStep {
    Variant(Box<dyn VariantFilter>),
    Gene(Box<dyn GeneFilter>),
}

impl AnalysisStep {
    pub fn data_requirement(&self) -> Option<DataRequirement> {
        match self {
            AnalysisStep::Variant(filter) => filter.data_requirement(),
            AnalysisStep::Gene(filter) => filter.data_requirement(),
        }
    }
}

/// Counts after an analysis has run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisSummary {
    pub variants_total: usize,
    pub variants_passed: usize,
    pub genes_total: usize,
    pub genes_passed: usize,
}

/// A validated, ordered list of steps
#[derive(Debug)]
pub struct Analysis {
    config: AnalysisConfig,
    steps: Vec<AnalysisStep>,
}

impl Analysis {
    pub fn builder(config: AnalysisConfig) -> AnalysisBuilder {
        AnalysisBuilder::new(config)
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn steps(&self) -> &[AnalysisStep] {
        &self.steps
    }

    /// Runs every step in order. A variant step is only evaluated on variants that have not
    /// already failed an earlier step.
    pub fn run(&self, genes: &mut [Gene]) -> AnalysisSummary {
        for step in &self.steps {
            match step {
                AnalysisStep::Variant(filter) => {
                    genes.par_iter_mut().for_each(|gene| {
                        for variant in gene.variants_mut() {
                            if variant.passed_filters() {
                                let result = filter.run_filter(variant);
                                variant.add_filter_result(result);
                            }
                        }
                    });
                }
                AnalysisStep::Gene(filter) => {
                    GeneFilterRunner::run_filter(filter.as_ref(), genes);
                }
            }
        }

        let summary = AnalysisSummary {
            variants_total: genes.iter().map(Gene::number_of_variants).sum(),
            variants_passed: genes.iter().map(|g| g.passed_variants().len()).sum(),
            genes_total: genes.len(),
            genes_passed: genes.iter().filter(|g| g.passed_filters()).count(),
        };
        log::info!(
            "{} of {} variants and {} of {} genes passed {} steps",
            summary.variants_passed,
            summary.variants_total,
            summary.genes_passed,
            summary.genes_total,
            self.steps.len()
        );
        summary
    }
}

/// A step as added to the builder. Steps backed by builder-held data are resolved in `build`.
#[derive(Debug)]
enum PendingStep {
    Ready(AnalysisStep),
    RegulatoryFeature,
}

/// Assembles an [`Analysis`], checking at `build` that every step has the data it needs
pub struct AnalysisBuilder {
    config: AnalysisConfig,
    regulatory_regions: Option<Arc<RegionIndex<RegulatoryFeatureType>>>,
    steps: Vec<PendingStep>,
}

impl AnalysisBuilder {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            regulatory_regions: None,
            steps: Vec::new(),
        }
    }

    pub fn regulatory_regions(mut self, regions: RegionIndex<RegulatoryFeatureType>) -> Self {
        self.regulatory_regions = Some(Arc::new(regions));
        self
    }

    pub fn add_variant_filter(mut self, filter: Box<dyn VariantFilter>) -> Self {
        self.steps.push(PendingStep::Ready(AnalysisStep::Variant(filter)));
        self
    }

    pub fn add_gene_filter(mut self, filter: Box<dyn GeneFilter>) -> Self {
        self.steps.push(PendingStep::Ready(AnalysisStep::Gene(filter)));
        self
    }

    pub fn add_failed_variant_filter(self) -> Self {
        self.add_variant_filter(Box::new(FailedVariantFilter))
    }

    pub fn add_quality_filter(self, min_quality: f64) -> Self {
        self.add_variant_filter(Box::new(QualityFilter::new(min_quality)))
    }

    pub fn add_interval_filter(self, intervals: Vec<Region<()>>) -> Self {
        self.add_variant_filter(Box::new(IntervalFilter::new(intervals)))
    }

    /// Uses the regions given to [`AnalysisBuilder::regulatory_regions`], in either call order.
    pub fn add_regulatory_feature_filter(mut self) -> Self {
        self.steps.push(PendingStep::RegulatoryFeature);
        self
    }

    pub fn add_frequency_filter(self, max_frequency: f32) -> Self {
        self.add_variant_filter(Box::new(FrequencyFilter::new(max_frequency)))
    }

    pub fn add_known_variant_filter(self) -> Self {
        self.add_variant_filter(Box::new(KnownVariantFilter))
    }

    pub fn add_pathogenicity_filter(self, keep_non_pathogenic: bool, min_score: f32) -> Self {
        self.add_variant_filter(Box::new(PathogenicityFilter::with_min_score(
            keep_non_pathogenic,
            min_score,
        )))
    }

    pub fn add_gene_symbol_filter<I: IntoIterator<Item = String>>(self, gene_symbols: I) -> Self {
        self.add_gene_filter(Box::new(GeneSymbolFilter::new(gene_symbols)))
    }

    pub fn add_priority_score_filter(self, priority_type: PriorityType, min_score: f32) -> Self {
        self.add_gene_filter(Box::new(PriorityScoreFilter::new(priority_type, min_score)))
    }

    pub fn add_inheritance_filter(self) -> Self {
        let modes = self.config.inheritance_modes.clone();
        self.add_gene_filter(Box::new(InheritanceFilter::new(modes)))
    }

    fn check_requirement(&self, requirement: DataRequirement) -> GenorankResult<()> {
        let satisfied = match requirement {
            DataRequirement::FrequencySources => !self.config.frequency_sources.is_empty(),
            DataRequirement::PathogenicitySources => !self.config.pathogenicity_sources.is_empty(),
            DataRequirement::Regions => self
                .regulatory_regions
                .as_ref()
                .map(|r| !r.is_empty())
                .unwrap_or(false),
        };
        if satisfied {
            Ok(())
        } else {
            Err(GenorankError::InvalidConfig(format!(
                "a step requires {:?} but none were supplied",
                requirement
            )))
        }
    }

    fn resolve(&self, pending: PendingStep) -> GenorankResult<AnalysisStep> {
        let step = match pending {
            PendingStep::Ready(step) => step,
            PendingStep::RegulatoryFeature => {
                self.check_requirement(DataRequirement::Regions)?;
                let regions = self.regulatory_regions.clone().unwrap_or_default();
                AnalysisStep::Variant(Box::new(RegulatoryFeatureFilter::new(regions)))
            }
        };
        if let Some(requirement) = step.data_requirement() {
            self.check_requirement(requirement)?;
        }
        Ok(step)
    }

    pub fn build(mut self) -> GenorankResult<Analysis> {
        validate_analysis_config(&self.config)?;
        let pending = std::mem::take(&mut self.steps);
        let steps = pending
            .into_iter()
            .map(|step| self.resolve(step))
            .collect::<GenorankResult<Vec<_>>>()?;
        log::debug!("Built analysis with {} steps", steps.len());
        Ok(Analysis {
            config: self.config,
            steps,
        })
    }
}
