//! Called variants and their evaluation state

use crate::allele::{AllelePosition, AlleleShape};
use crate::annotation::{FrequencyData, PathogenicityData};
use crate::filter::{FilterResult, FilterStatus, FilterType};
use crate::inheritance::{ModeOfInheritance, SubModeOfInheritance};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Position and alleles of a variant on a numbered chromosome
pub trait VariantCoordinates {
    fn chromosome(&self) -> u8;
    fn start(&self) -> u32;
    fn end(&self) -> u32;
    fn ref_allele(&self) -> &str;
    fn alt_allele(&self) -> &str;
}

/// A single called allele with its annotations, filter record and scoring state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantRecord {
    chromosome: u8,
    allele: AllelePosition,
    quality: f64,
    passed_vcf_filter: bool,
    variant_score: f32,
    gene_symbol: Option<String>,
    frequency_data: Option<FrequencyData>,
    pathogenicity_data: Option<PathogenicityData>,
    filter_status: FilterStatus,
    compatible_sub_modes: BTreeSet<SubModeOfInheritance>,
    contributing_modes: BTreeSet<ModeOfInheritance>,
}

impl VariantRecord {
    pub fn builder(chromosome: u8, start: u32, ref_allele: &str, alt_allele: &str) -> VariantRecordBuilder {
        VariantRecordBuilder::new(chromosome, start, ref_allele, alt_allele)
    }

    pub fn allele_position(&self) -> &AllelePosition {
        &self.allele
    }

    pub fn length(&self) -> i32 {
        self.allele.length()
    }

    pub fn shape(&self) -> AlleleShape {
        self.allele.shape()
    }

    pub fn quality(&self) -> f64 {
        self.quality
    }

    pub fn passed_vcf_filter(&self) -> bool {
        self.passed_vcf_filter
    }

    /// Deleteriousness in the range 0-1 as supplied by the annotation stage
    pub fn variant_score(&self) -> f32 {
        self.variant_score
    }

    pub fn gene_symbol(&self) -> Option<&str> {
        self.gene_symbol.as_deref()
    }

    pub fn frequency_data(&self) -> Option<&FrequencyData> {
        self.frequency_data.as_ref()
    }

    pub fn pathogenicity_data(&self) -> Option<&PathogenicityData> {
        self.pathogenicity_data.as_ref()
    }

    // filter bookkeeping

    pub fn add_filter_result(&mut self, result: FilterResult) -> bool {
        log::trace!("{} {:?} {}", self, result.verdict, result.filter_type);
        self.filter_status.add(result)
    }

    pub fn passed_filter(&self, filter_type: FilterType) -> bool {
        self.filter_status.passed(filter_type)
    }

    pub fn failed_filter(&self, filter_type: FilterType) -> bool {
        self.filter_status.failed(filter_type)
    }

    /// True unless a recorded step failed
    pub fn passed_filters(&self) -> bool {
        self.filter_status.passed_all()
    }

    pub fn is_unfiltered(&self) -> bool {
        self.filter_status.is_unfiltered()
    }

    pub fn passed_filter_types(&self) -> Vec<FilterType> {
        self.filter_status.passed_filter_types()
    }

    pub fn failed_filter_types(&self) -> Vec<FilterType> {
        self.filter_status.failed_filter_types()
    }

    pub fn filter_results(&self) -> &[FilterResult] {
        self.filter_status.results()
    }

    // inheritance

    pub fn compatible_sub_modes(&self) -> &BTreeSet<SubModeOfInheritance> {
        &self.compatible_sub_modes
    }

    pub fn set_compatible_sub_modes<I: IntoIterator<Item = SubModeOfInheritance>>(&mut self, sub_modes: I) {
        self.compatible_sub_modes = sub_modes.into_iter().collect();
    }

    pub fn is_compatible_with_sub_mode(&self, sub_mode: SubModeOfInheritance) -> bool {
        sub_mode == SubModeOfInheritance::Any || self.compatible_sub_modes.contains(&sub_mode)
    }

    /// Every variant is compatible with `Any`.
    pub fn is_compatible_with(&self, mode: ModeOfInheritance) -> bool {
        mode == ModeOfInheritance::Any
            || self.compatible_sub_modes.iter().any(|s| s.mode() == mode)
    }

    pub fn contributes_to_gene_score(&self) -> bool {
        !self.contributing_modes.is_empty()
    }

    pub fn contributes_to_gene_score_under_mode(&self, mode: ModeOfInheritance) -> bool {
        self.contributing_modes.contains(&mode)
    }

    pub fn set_contributes_to_gene_score_under_mode(&mut self, mode: ModeOfInheritance) {
        self.contributing_modes.insert(mode);
    }

    pub fn contributing_modes(&self) -> &BTreeSet<ModeOfInheritance> {
        &self.contributing_modes
    }
}

impl VariantCoordinates for VariantRecord {
    fn chromosome(&self) -> u8 {
        self.chromosome
    }

    fn start(&self) -> u32 {
        self.allele.start()
    }

    fn end(&self) -> u32 {
        self.allele.end()
    }

    fn ref_allele(&self) -> &str {
        self.allele.ref_allele()
    }

    fn alt_allele(&self) -> &str {
        self.allele.alt_allele()
    }
}

impl fmt::Display for VariantRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", crate::contig::chromosome_name(self.chromosome), self.allele)
    }
}

pub struct VariantRecordBuilder {
    chromosome: u8,
    start: u32,
    ref_allele: String,
    alt_allele: String,
    quality: f64,
    passed_vcf_filter: bool,
    variant_score: f32,
    gene_symbol: Option<String>,
    frequency_data: Option<FrequencyData>,
    pathogenicity_data: Option<PathogenicityData>,
    filter_results: Vec<FilterResult>,
    compatible_sub_modes: BTreeSet<SubModeOfInheritance>,
}

impl VariantRecordBuilder {
    fn new(chromosome: u8, start: u32, ref_allele: &str, alt_allele: &str) -> Self {
        Self {
            chromosome,
            start,
            ref_allele: ref_allele.to_string(),
            alt_allele: alt_allele.to_string(),
            quality: 0.0,
            passed_vcf_filter: true,
            variant_score: 0.0,
            gene_symbol: None,
            frequency_data: None,
            pathogenicity_data: None,
            filter_results: Vec::new(),
            compatible_sub_modes: BTreeSet::new(),
        }
    }

    pub fn quality(mut self, quality: f64) -> Self {
        self.quality = quality;
        self
    }

    pub fn passed_vcf_filter(mut self, passed: bool) -> Self {
        self.passed_vcf_filter = passed;
        self
    }

    pub fn variant_score(mut self, score: f32) -> Self {
        self.variant_score = score;
        self
    }

    pub fn gene_symbol(mut self, gene_symbol: &str) -> Self {
        self.gene_symbol = Some(gene_symbol.to_string());
        self
    }

    pub fn frequency_data(mut self, frequency_data: FrequencyData) -> Self {
        self.frequency_data = Some(frequency_data);
        self
    }

    pub fn pathogenicity_data(mut self, pathogenicity_data: PathogenicityData) -> Self {
        self.pathogenicity_data = Some(pathogenicity_data);
        self
    }

    pub fn filter_results<I: IntoIterator<Item = FilterResult>>(mut self, results: I) -> Self {
        self.filter_results.extend(results);
        self
    }

    pub fn compatible_sub_modes<I: IntoIterator<Item = SubModeOfInheritance>>(mut self, sub_modes: I) -> Self {
        self.compatible_sub_modes.extend(sub_modes);
        self
    }

    /// Coordinates are minimised here, so every record holds the trimmed form.
    pub fn build(self) -> VariantRecord {
        let mut filter_status = FilterStatus::new();
        for result in self.filter_results {
            filter_status.add(result);
        }
        VariantRecord {
            chromosome: self.chromosome,
            allele: AllelePosition::trim(self.start, &self.ref_allele, &self.alt_allele),
            quality: self.quality,
            passed_vcf_filter: self.passed_vcf_filter,
            variant_score: self.variant_score,
            gene_symbol: self.gene_symbol,
            frequency_data: self.frequency_data,
            pathogenicity_data: self.pathogenicity_data,
            filter_status,
            compatible_sub_modes: self.compatible_sub_modes,
            contributing_modes: BTreeSet::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_minimises_coordinates() {
        let variant = VariantRecord::builder(23, 118887583, "TCAAAA", "TCAAAACAAAA").build();
        assert_eq!(variant.chromosome(), 23);
        assert_eq!(variant.start(), 118887583);
        assert_eq!(variant.ref_allele(), "T");
        assert_eq!(variant.alt_allele(), "TCAAAA");
        assert_eq!(variant.end(), 118887583);
        assert_eq!(variant.length(), 5);
        assert_eq!(variant.shape(), AlleleShape::Insertion);
    }

    #[test]
    fn test_deletion_end_and_length() {
        let variant = VariantRecord::builder(1, 2827694, "CGTGGATGCGGGGAC", "C").build();
        assert_eq!(variant.end(), 2827708);
        assert_eq!(variant.length(), -14);
        assert_eq!(variant.shape(), AlleleShape::Deletion);
    }

    #[test]
    fn test_unfiltered_variant_passes_but_has_passed_nothing() {
        let variant = VariantRecord::builder(1, 1, "A", "T").build();
        assert!(variant.is_unfiltered());
        assert!(variant.passed_filters());
        assert!(!variant.passed_filter(FilterType::Quality));
    }

    #[test]
    fn test_filter_results_from_builder() {
        let variant = VariantRecord::builder(1, 1, "A", "T")
            .filter_results([
                FilterResult::pass(FilterType::Frequency),
                FilterResult::fail(FilterType::Pathogenicity),
            ])
            .build();
        assert!(variant.passed_filter(FilterType::Frequency));
        assert!(variant.failed_filter(FilterType::Pathogenicity));
        assert!(!variant.passed_filters());
        assert_eq!(variant.failed_filter_types(), vec![FilterType::Pathogenicity]);
    }

    #[test]
    fn test_compatibility() {
        let variant = VariantRecord::builder(1, 1, "A", "T")
            .compatible_sub_modes([SubModeOfInheritance::AutosomalRecessiveCompHet])
            .build();
        assert!(variant.is_compatible_with(ModeOfInheritance::Any));
        assert!(variant.is_compatible_with(ModeOfInheritance::AutosomalRecessive));
        assert!(!variant.is_compatible_with(ModeOfInheritance::AutosomalDominant));
        assert!(variant.is_compatible_with_sub_mode(SubModeOfInheritance::AutosomalRecessiveCompHet));
        assert!(!variant.is_compatible_with_sub_mode(SubModeOfInheritance::AutosomalRecessiveHomAlt));
    }

    #[test]
    fn test_contribution_flags() {
        let mut variant = VariantRecord::builder(1, 1, "A", "T").build();
        assert!(!variant.contributes_to_gene_score());
        variant.set_contributes_to_gene_score_under_mode(ModeOfInheritance::AutosomalDominant);
        assert!(variant.contributes_to_gene_score());
        assert!(variant.contributes_to_gene_score_under_mode(ModeOfInheritance::AutosomalDominant));
        assert!(!variant.contributes_to_gene_score_under_mode(ModeOfInheritance::AutosomalRecessive));
    }

    #[test]
    fn test_display() {
        let variant = VariantRecord::builder(23, 100, "A", "G").build();
        assert_eq!(variant.to_string(), "X-100-A-G");
    }
}
