//! Genes, their phenotype evidence and per-mode scores

use crate::contig::{X_CHROMOSOME, Y_CHROMOSOME};
use crate::filter::{FilterResult, FilterStatus, FilterType};
use crate::inheritance::ModeOfInheritance;
use crate::variant::{VariantCoordinates, VariantRecord};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GeneIdentifier {
    pub gene_symbol: String,
    pub gene_id: String,
}

impl GeneIdentifier {
    pub fn new(gene_symbol: &str, gene_id: &str) -> Self {
        Self {
            gene_symbol: gene_symbol.to_string(),
            gene_id: gene_id.to_string(),
        }
    }
}

impl fmt::Display for GeneIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.gene_symbol, self.gene_id)
    }
}

/// Source of a gene's phenotype-match score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PriorityType {
    HiPhive,
    Phive,
    Phenix,
    Omim,
    ExomeWalker,
}

impl FromStr for PriorityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "HIPHIVE" | "HIPHIVE_PRIORITY" => Ok(PriorityType::HiPhive),
            "PHIVE" | "PHIVE_PRIORITY" => Ok(PriorityType::Phive),
            "PHENIX" | "PHENIX_PRIORITY" => Ok(PriorityType::Phenix),
            "OMIM" | "OMIM_PRIORITY" => Ok(PriorityType::Omim),
            "EXOMEWALKER" | "EXOMEWALKER_PRIORITY" => Ok(PriorityType::ExomeWalker),
            _ => Err(format!("Unknown priority type: {}", s)),
        }
    }
}

/// Phenotype-match score for a gene from one prioritiser, 0-1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriorityResult {
    pub priority_type: PriorityType,
    pub score: f32,
}

impl PriorityResult {
    pub fn new(priority_type: PriorityType, score: f32) -> Self {
        Self {
            priority_type,
            score,
        }
    }
}

/// Score of one gene under one mode of inheritance. Contributing variants are indices into the
/// owning gene's variant list, in gene order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneScore {
    pub gene_identifier: GeneIdentifier,
    pub mode: ModeOfInheritance,
    pub variant_score: f32,
    pub phenotype_score: f32,
    pub combined_score: f32,
    pub contributing_variants: Vec<usize>,
}

impl GeneScore {
    pub fn new(
        gene_identifier: GeneIdentifier,
        mode: ModeOfInheritance,
        variant_score: f32,
        phenotype_score: f32,
        contributing_variants: Vec<usize>,
    ) -> Self {
        Self {
            gene_identifier,
            mode,
            variant_score,
            phenotype_score,
            combined_score: (variant_score + phenotype_score) / 2.0,
            contributing_variants,
        }
    }

    pub fn empty(gene_identifier: GeneIdentifier, mode: ModeOfInheritance) -> Self {
        Self::new(gene_identifier, mode, 0.0, 0.0, Vec::new())
    }

    pub fn has_contributing_variants(&self) -> bool {
        !self.contributing_variants.is_empty()
    }
}

/// A gene owning its variants. Gene-level filter results live on the gene; they reach the
/// variants through [`Gene::add_variant`] or the gene filter runner.
#[derive(Debug, Clone)]
pub struct Gene {
    identifier: GeneIdentifier,
    variants: Vec<VariantRecord>,
    priority_results: Vec<PriorityResult>,
    filter_status: FilterStatus,
    compatible_modes: BTreeSet<ModeOfInheritance>,
    gene_scores: Vec<GeneScore>,
}

impl Gene {
    pub fn new(gene_symbol: &str, gene_id: &str) -> Self {
        Self::from_identifier(GeneIdentifier::new(gene_symbol, gene_id))
    }

    pub fn from_identifier(identifier: GeneIdentifier) -> Self {
        Self {
            identifier,
            variants: Vec::new(),
            priority_results: Vec::new(),
            filter_status: FilterStatus::new(),
            compatible_modes: BTreeSet::new(),
            gene_scores: Vec::new(),
        }
    }

    pub fn identifier(&self) -> &GeneIdentifier {
        &self.identifier
    }

    pub fn gene_symbol(&self) -> &str {
        &self.identifier.gene_symbol
    }

    pub fn gene_id(&self) -> &str {
        &self.identifier.gene_id
    }

    // variants

    /// Adds a variant, first copying every gene-level result already recorded onto it, except
    /// inheritance compatibility.
    pub fn add_variant(&mut self, mut variant: VariantRecord) {
        for result in self.filter_status.results() {
            if result.filter_type.propagates_to_variants() {
                variant.add_filter_result(*result);
            }
        }
        self.variants.push(variant);
    }

    pub fn variants(&self) -> &[VariantRecord] {
        &self.variants
    }

    pub fn variants_mut(&mut self) -> &mut [VariantRecord] {
        &mut self.variants
    }

    pub fn has_variants(&self) -> bool {
        !self.variants.is_empty()
    }

    pub fn number_of_variants(&self) -> usize {
        self.variants.len()
    }

    pub fn passed_variants(&self) -> Vec<&VariantRecord> {
        self.variants.iter().filter(|v| v.passed_filters()).collect()
    }

    pub fn is_x_chromosomal(&self) -> bool {
        self.variants
            .first()
            .map(|v| v.chromosome() == X_CHROMOSOME)
            .unwrap_or(false)
    }

    pub fn is_y_chromosomal(&self) -> bool {
        self.variants
            .first()
            .map(|v| v.chromosome() == Y_CHROMOSOME)
            .unwrap_or(false)
    }

    // filtering

    /// Records a result on the gene only. Existing variants are untouched.
    pub fn add_filter_result(&mut self, result: FilterResult) -> bool {
        self.filter_status.add(result)
    }

    /// No gene-level failure, and either no variants or at least one variant that passed.
    pub fn passed_filters(&self) -> bool {
        self.filter_status.passed_all()
            && (self.variants.is_empty() || self.variants.iter().any(|v| v.passed_filters()))
    }

    /// A variant-level step counts for the gene when any of its variants passed it.
    pub fn passed_filter(&self, filter_type: FilterType) -> bool {
        if self.filter_status.has_result_for(filter_type) {
            return self.filter_status.passed(filter_type);
        }
        self.variants.iter().any(|v| v.passed_filter(filter_type))
    }

    pub fn failed_filter(&self, filter_type: FilterType) -> bool {
        self.filter_status.failed(filter_type)
    }

    pub fn is_unfiltered(&self) -> bool {
        self.filter_status.is_unfiltered()
    }

    pub fn filter_results(&self) -> &[FilterResult] {
        self.filter_status.results()
    }

    // phenotype

    /// A second result of the same type replaces the first.
    pub fn add_priority_result(&mut self, result: PriorityResult) {
        match self
            .priority_results
            .iter_mut()
            .find(|r| r.priority_type == result.priority_type)
        {
            Some(existing) => *existing = result,
            None => self.priority_results.push(result),
        }
    }

    pub fn priority_result(&self, priority_type: PriorityType) -> Option<&PriorityResult> {
        self.priority_results
            .iter()
            .find(|r| r.priority_type == priority_type)
    }

    pub fn priority_results(&self) -> &[PriorityResult] {
        &self.priority_results
    }

    /// Best phenotype match across prioritisers, 0 when there is none
    pub fn phenotype_score(&self) -> f32 {
        self.priority_results
            .iter()
            .map(|r| r.score)
            .fold(0.0, f32::max)
    }

    // inheritance

    pub fn set_compatible_inheritance_modes<I: IntoIterator<Item = ModeOfInheritance>>(&mut self, modes: I) {
        self.compatible_modes = modes.into_iter().collect();
    }

    pub fn compatible_inheritance_modes(&self) -> &BTreeSet<ModeOfInheritance> {
        &self.compatible_modes
    }

    pub fn is_compatible_with(&self, mode: ModeOfInheritance) -> bool {
        mode == ModeOfInheritance::Any || self.compatible_modes.contains(&mode)
    }

    pub fn is_compatible_with_dominant(&self) -> bool {
        self.compatible_modes
            .contains(&ModeOfInheritance::AutosomalDominant)
    }

    pub fn is_compatible_with_recessive(&self) -> bool {
        self.compatible_modes
            .contains(&ModeOfInheritance::AutosomalRecessive)
    }

    // scores

    pub fn add_gene_score(&mut self, score: GeneScore) {
        self.gene_scores.push(score);
    }

    /// Scores in evaluation order
    pub fn gene_scores(&self) -> &[GeneScore] {
        &self.gene_scores
    }

    pub fn gene_score_for_mode(&self, mode: ModeOfInheritance) -> Option<&GeneScore> {
        self.gene_scores.iter().find(|s| s.mode == mode)
    }

    /// Highest combined score, the earliest evaluated winning ties
    pub fn best_gene_score(&self) -> Option<&GeneScore> {
        let mut top: Option<&GeneScore> = None;
        for score in &self.gene_scores {
            match top {
                Some(best) if score.combined_score <= best.combined_score => {}
                _ => top = Some(score),
            }
        }
        top
    }

    /// As [`Gene::best_gene_score`], but a gene never scored reports an all-zero score
    /// under `Any`.
    pub fn top_gene_score(&self) -> GeneScore {
        match self.best_gene_score() {
            Some(score) => score.clone(),
            None => GeneScore::empty(self.identifier.clone(), ModeOfInheritance::Any),
        }
    }

    pub fn combined_score(&self) -> f32 {
        self.best_gene_score().map(|s| s.combined_score).unwrap_or(0.0)
    }

    pub fn variant_score(&self) -> f32 {
        self.best_gene_score().map(|s| s.variant_score).unwrap_or(0.0)
    }

    pub fn priority_score(&self) -> f32 {
        self.best_gene_score().map(|s| s.phenotype_score).unwrap_or(0.0)
    }

    pub fn combined_score_for_mode(&self, mode: ModeOfInheritance) -> f32 {
        self.gene_score_for_mode(mode)
            .map(|s| s.combined_score)
            .unwrap_or(0.0)
    }

    pub fn variant_score_for_mode(&self, mode: ModeOfInheritance) -> f32 {
        self.gene_score_for_mode(mode)
            .map(|s| s.variant_score)
            .unwrap_or(0.0)
    }

    pub fn priority_score_for_mode(&self, mode: ModeOfInheritance) -> f32 {
        self.gene_score_for_mode(mode)
            .map(|s| s.phenotype_score)
            .unwrap_or(0.0)
    }

    /// Resolves a score's contributing indices against this gene's variants
    pub fn contributing_variants(&self, score: &GeneScore) -> Vec<&VariantRecord> {
        score
            .contributing_variants
            .iter()
            .filter_map(|&i| self.variants.get(i))
            .collect()
    }
}

/// Descending best combined score, then ascending gene symbol
pub fn compare_by_top_score(a: &Gene, b: &Gene) -> Ordering {
    b.combined_score()
        .total_cmp(&a.combined_score())
        .then_with(|| a.gene_symbol().cmp(b.gene_symbol()))
}

/// Descending combined score under `mode`, then ascending gene symbol. A gene with no score
/// for the mode ranks as zero.
pub fn compare_by_score_for_mode(mode: ModeOfInheritance) -> impl Fn(&Gene, &Gene) -> Ordering {
    move |a, b| {
        b.combined_score_for_mode(mode)
            .total_cmp(&a.combined_score_for_mode(mode))
            .then_with(|| a.gene_symbol().cmp(b.gene_symbol()))
    }
}
