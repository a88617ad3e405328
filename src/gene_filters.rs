//! Gene-level filter steps

use crate::filter::{FilterResult, FilterType, GeneFilter};
use crate::gene::{Gene, PriorityType};
use crate::inheritance::{InheritanceModeOptions, ModeOfInheritance};
use std::collections::HashSet;

/// Keeps only genes whose symbol was asked for
#[derive(Debug)]
pub struct GeneSymbolFilter {
    gene_symbols: HashSet<String>,
}

impl GeneSymbolFilter {
    pub fn new<I, S>(gene_symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            gene_symbols: gene_symbols.into_iter().map(Into::into).collect(),
        }
    }
}

impl GeneFilter for GeneSymbolFilter {
    fn filter_type(&self) -> FilterType {
        FilterType::GeneSymbol
    }

    fn run_filter(&self, gene: &Gene) -> FilterResult {
        FilterResult::from_bool(
            self.filter_type(),
            self.gene_symbols.contains(gene.gene_symbol()),
        )
    }
}

/// Keeps genes whose phenotype match from one prioritiser reaches `min_score`
#[derive(Debug)]
pub struct PriorityScoreFilter {
    priority_type: PriorityType,
    min_score: f32,
}

impl PriorityScoreFilter {
    pub fn new(priority_type: PriorityType, min_score: f32) -> Self {
        Self {
            priority_type,
            min_score,
        }
    }
}

impl GeneFilter for PriorityScoreFilter {
    fn filter_type(&self) -> FilterType {
        FilterType::PriorityScore
    }

    fn run_filter(&self, gene: &Gene) -> FilterResult {
        let passed = gene
            .priority_result(self.priority_type)
            .map(|r| r.score >= self.min_score)
            .unwrap_or(false);
        FilterResult::from_bool(self.filter_type(), passed)
    }
}

/// Keeps genes with at least one passed variant compatible with a requested mode of
/// inheritance, recording those modes on the gene.
#[derive(Debug)]
pub struct InheritanceFilter {
    modes: InheritanceModeOptions,
}

impl InheritanceFilter {
    pub fn new(modes: InheritanceModeOptions) -> Self {
        Self { modes }
    }

    fn compatible_modes(&self, gene: &Gene) -> Vec<ModeOfInheritance> {
        self.modes
            .modes()
            .iter()
            .copied()
            .filter(|mode| {
                gene.variants()
                    .iter()
                    .any(|v| v.passed_filters() && v.is_compatible_with(*mode))
            })
            .collect()
    }
}

impl GeneFilter for InheritanceFilter {
    fn filter_type(&self) -> FilterType {
        FilterType::Inheritance
    }

    fn annotate(&self, gene: &mut Gene) {
        let modes = self.compatible_modes(gene);
        gene.set_compatible_inheritance_modes(modes);
    }

    /// No requested modes means anything goes.
    fn run_filter(&self, gene: &Gene) -> FilterResult {
        let passed = self.modes.is_empty()
            || self
                .modes
                .modes()
                .iter()
                .any(|mode| gene.is_compatible_with(*mode));
        FilterResult::from_bool(self.filter_type(), passed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gene::PriorityResult;
    use crate::inheritance::SubModeOfInheritance;
    use crate::variant::VariantRecord;

    #[test]
    fn test_gene_symbol_filter() {
        let filter = GeneSymbolFilter::new(["FGFR2", "CFTR"]);
        assert!(filter.run_filter(&Gene::new("FGFR2", "2263")).passed());
        assert!(filter.run_filter(&Gene::new("BRCA2", "675")).failed());
    }

    #[test]
    fn test_priority_score_filter() {
        let filter = PriorityScoreFilter::new(PriorityType::HiPhive, 0.5);
        let mut gene = Gene::new("FGFR2", "2263");
        assert!(filter.run_filter(&gene).failed());

        gene.add_priority_result(PriorityResult::new(PriorityType::Omim, 1.0));
        assert!(filter.run_filter(&gene).failed());

        gene.add_priority_result(PriorityResult::new(PriorityType::HiPhive, 0.5));
        assert!(filter.run_filter(&gene).passed());
    }

    #[test]
    fn test_inheritance_filter_records_compatible_modes() {
        let filter = InheritanceFilter::new(InheritanceModeOptions::defaults());
        let mut gene = Gene::new("CFTR", "1080");
        gene.add_variant(
            VariantRecord::builder(7, 117199644, "ATCT", "A")
                .compatible_sub_modes([SubModeOfInheritance::AutosomalRecessiveHomAlt])
                .build(),
        );

        filter.annotate(&mut gene);
        assert!(gene.is_compatible_with_recessive());
        assert!(!gene.is_compatible_with_dominant());
        assert!(filter.run_filter(&gene).passed());
    }

    #[test]
    fn test_inheritance_filter_ignores_failed_variants() {
        let filter = InheritanceFilter::new(InheritanceModeOptions::of([ModeOfInheritance::AutosomalDominant]));
        let mut gene = Gene::new("FGFR2", "2263");
        gene.add_variant(
            VariantRecord::builder(10, 123256215, "T", "G")
                .compatible_sub_modes([SubModeOfInheritance::AutosomalDominant])
                .filter_results([FilterResult::fail(FilterType::Frequency)])
                .build(),
        );

        filter.annotate(&mut gene);
        assert!(gene.compatible_inheritance_modes().is_empty());
        assert!(filter.run_filter(&gene).failed());
    }

    #[test]
    fn test_inheritance_filter_without_modes_passes() {
        let filter = InheritanceFilter::new(InheritanceModeOptions::empty());
        let mut gene = Gene::new("FGFR2", "2263");
        filter.annotate(&mut gene);
        assert!(filter.run_filter(&gene).passed());
    }
}
