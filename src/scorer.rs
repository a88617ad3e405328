//! Per-mode gene scoring and ranking.
//!
//! For each mode the scorer picks the fewest variants the inheritance pattern needs, takes the
//! mean of their deleteriousness as the variant score and averages that with the gene's best
//! phenotype match.

use crate::gene::{compare_by_score_for_mode, compare_by_top_score, Gene, GeneScore};
use crate::inheritance::{AllelePattern, InheritanceModeOptions, ModeOfInheritance};
use crate::variant::VariantRecord;
use rayon::prelude::*;

#[derive(Debug, Clone, Default)]
pub struct RawScoreGeneScorer {
    modes: InheritanceModeOptions,
}

impl RawScoreGeneScorer {
    pub fn new(modes: InheritanceModeOptions) -> Self {
        Self { modes }
    }

    /// Scores `gene` under every mode, appending the scores to the gene in evaluation order
    /// and flagging the selected variants as contributing.
    pub fn score_gene(&self, gene: &mut Gene) -> Vec<GeneScore> {
        let mut scores = Vec::new();
        for mode in self.modes.modes_to_score() {
            let selected = select_contributing_variants(gene.variants(), mode);
            let variant_score = mean_variant_score(gene.variants(), &selected);
            for &index in &selected {
                gene.variants_mut()[index].set_contributes_to_gene_score_under_mode(mode);
            }
            let score = GeneScore::new(
                gene.identifier().clone(),
                mode,
                variant_score,
                gene.phenotype_score(),
                selected,
            );
            gene.add_gene_score(score.clone());
            scores.push(score);
        }
        scores
    }

    /// Scores genes in parallel, then sorts them by their best score
    pub fn score_genes(&self, genes: &mut [Gene]) {
        genes.par_iter_mut().for_each(|gene| {
            self.score_gene(gene);
        });
        rank_genes(genes, None);
        log::info!(
            "Scored {} genes under {} modes",
            genes.len(),
            self.modes.modes_to_score().len()
        );
    }
}

/// Stable sort by descending combined score then ascending symbol, using each gene's best
/// score or its score for `mode`.
pub fn rank_genes(genes: &mut [Gene], mode: Option<ModeOfInheritance>) {
    match mode {
        Some(mode) => genes.sort_by(compare_by_score_for_mode(mode)),
        None => genes.sort_by(compare_by_top_score),
    }
}

fn select_contributing_variants(variants: &[VariantRecord], mode: ModeOfInheritance) -> Vec<usize> {
    if mode == ModeOfInheritance::Any {
        return top_scoring(variants, 1, |_| true);
    }
    if mode.is_recessive() {
        return select_recessive(variants, mode);
    }
    top_scoring(variants, 1, |v| v.is_compatible_with(mode))
}

/// Recessive modes are explained either by one hom-alt variant or by two comp-het variants,
/// whichever scores higher. A tie goes to hom-alt.
fn select_recessive(variants: &[VariantRecord], mode: ModeOfInheritance) -> Vec<usize> {
    let pattern_selection = |pattern: AllelePattern| {
        top_scoring(variants, pattern.required_alleles(), |v| {
            mode.sub_modes()
                .iter()
                .any(|s| s.allele_pattern() == pattern && v.is_compatible_with_sub_mode(*s))
        })
    };
    let hom_alt = pattern_selection(AllelePattern::HomozygousAlt);
    let comp_het = pattern_selection(AllelePattern::CompoundHet);

    if mean_variant_score(variants, &comp_het) > mean_variant_score(variants, &hom_alt) {
        comp_het
    } else {
        hom_alt
    }
}

/// Indices of the `n` highest scoring passed variants matching `eligible`, capped at the number
/// eligible and returned in gene order. Equal scores keep their original order.
fn top_scoring<F>(variants: &[VariantRecord], n: usize, eligible: F) -> Vec<usize>
where
    F: Fn(&VariantRecord) -> bool,
{
    let mut candidates: Vec<usize> = variants
        .iter()
        .enumerate()
        .filter(|(_, v)| v.passed_filters() && eligible(v))
        .map(|(i, _)| i)
        .collect();
    candidates.sort_by(|&a, &b| {
        variants[b]
            .variant_score()
            .total_cmp(&variants[a].variant_score())
    });
    candidates.truncate(n);
    candidates.sort_unstable();
    candidates
}

fn mean_variant_score(variants: &[VariantRecord], selected: &[usize]) -> f32 {
    if selected.is_empty() {
        return 0.0;
    }
    let total: f32 = selected.iter().map(|&i| variants[i].variant_score()).sum();
    total / selected.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FilterResult, FilterType};
    use crate::gene::{PriorityResult, PriorityType};
    use crate::inheritance::SubModeOfInheritance;

    fn variant(score: f32, sub_modes: &[SubModeOfInheritance]) -> VariantRecord {
        VariantRecord::builder(1, 1000, "A", "T")
            .variant_score(score)
            .compatible_sub_modes(sub_modes.iter().copied())
            .build()
    }

    fn failed_variant(score: f32, sub_modes: &[SubModeOfInheritance]) -> VariantRecord {
        VariantRecord::builder(1, 1000, "A", "T")
            .variant_score(score)
            .compatible_sub_modes(sub_modes.iter().copied())
            .filter_results([FilterResult::fail(FilterType::Frequency)])
            .build()
    }

    fn scorer(modes: &[ModeOfInheritance]) -> RawScoreGeneScorer {
        RawScoreGeneScorer::new(InheritanceModeOptions::of(modes.iter().copied()))
    }

    #[test]
    fn test_no_variants_scores_zero() {
        let mut gene = Gene::new("FGFR2", "2263");
        let scores = scorer(&[ModeOfInheritance::AutosomalDominant]).score_gene(&mut gene);
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].variant_score, 0.0);
        assert_eq!(scores[0].phenotype_score, 0.0);
        assert_eq!(scores[0].combined_score, 0.0);
        assert!(!scores[0].has_contributing_variants());
    }

    #[test]
    fn test_no_modes_scores_any_with_top_variant() {
        let mut gene = Gene::new("FGFR2", "2263");
        gene.add_variant(variant(0.5, &[]));
        gene.add_variant(variant(0.9, &[]));
        gene.add_variant(failed_variant(1.0, &[]));

        let scores = RawScoreGeneScorer::default().score_gene(&mut gene);
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].mode, ModeOfInheritance::Any);
        assert_eq!(scores[0].variant_score, 0.9);
        assert_eq!(scores[0].contributing_variants, vec![1]);
        assert!(gene.variants()[1].contributes_to_gene_score_under_mode(ModeOfInheritance::Any));
        assert!(!gene.variants()[2].contributes_to_gene_score());
    }

    #[test]
    fn test_dominant_takes_single_best_compatible_variant() {
        let mut gene = Gene::new("FGFR2", "2263");
        gene.add_variant(variant(0.6, &[SubModeOfInheritance::AutosomalDominant]));
        gene.add_variant(variant(0.95, &[SubModeOfInheritance::AutosomalRecessiveCompHet]));
        gene.add_variant(variant(0.8, &[SubModeOfInheritance::AutosomalDominant]));
        gene.add_priority_result(PriorityResult::new(PriorityType::HiPhive, 0.4));

        let scores = scorer(&[ModeOfInheritance::AutosomalDominant]).score_gene(&mut gene);
        assert_eq!(scores[0].contributing_variants, vec![2]);
        assert_eq!(scores[0].variant_score, 0.8);
        assert_eq!(scores[0].phenotype_score, 0.4);
        assert_eq!(scores[0].combined_score, (0.8 + 0.4) / 2.0);
    }

    #[test]
    fn test_homozygous_recessive_single_variant() {
        let mut gene = Gene::new("CFTR", "1080");
        gene.add_variant(variant(0.7, &[SubModeOfInheritance::AutosomalRecessiveHomAlt]));

        let scores = scorer(&[ModeOfInheritance::AutosomalRecessive]).score_gene(&mut gene);
        assert_eq!(scores[0].variant_score, 0.7);
        assert_eq!(scores[0].contributing_variants, vec![0]);
    }

    #[test]
    fn test_compound_het_takes_top_two() {
        let comp_het = [SubModeOfInheritance::AutosomalRecessiveCompHet];
        let mut gene = Gene::new("CFTR", "1080");
        gene.add_variant(variant(0.6, &comp_het));
        gene.add_variant(variant(0.2, &comp_het));
        gene.add_variant(variant(1.0, &comp_het));

        let scores = scorer(&[ModeOfInheritance::AutosomalRecessive]).score_gene(&mut gene);
        assert_eq!(scores[0].contributing_variants, vec![0, 2]);
        assert_eq!(scores[0].variant_score, (0.6 + 1.0) / 2.0);
        assert!(!gene.variants()[1].contributes_to_gene_score());
        assert!(gene.variants()[0].contributes_to_gene_score_under_mode(ModeOfInheritance::AutosomalRecessive));
    }

    #[test]
    fn test_compound_het_excludes_incompatible_variant() {
        let comp_het = [SubModeOfInheritance::AutosomalRecessiveCompHet];
        let mut gene = Gene::new("CFTR", "1080");
        gene.add_variant(variant(0.9, &comp_het));
        gene.add_variant(variant(0.8, &comp_het));
        gene.add_variant(variant(0.7, &[SubModeOfInheritance::AutosomalDominant]));

        let scores = scorer(&[ModeOfInheritance::AutosomalRecessive]).score_gene(&mut gene);
        assert_eq!(scores[0].contributing_variants, vec![0, 1]);
        assert_eq!(scores[0].variant_score, (0.9 + 0.8) / 2.0);
        assert!(!gene.variants()[2].contributes_to_gene_score());
    }

    #[test]
    fn test_recessive_prefers_higher_pattern() {
        let mut gene = Gene::new("CFTR", "1080");
        gene.add_variant(variant(0.9, &[SubModeOfInheritance::AutosomalRecessiveHomAlt]));
        gene.add_variant(variant(0.8, &[SubModeOfInheritance::AutosomalRecessiveCompHet]));
        gene.add_variant(variant(0.4, &[SubModeOfInheritance::AutosomalRecessiveCompHet]));

        let scores = scorer(&[ModeOfInheritance::AutosomalRecessive]).score_gene(&mut gene);
        assert_eq!(scores[0].contributing_variants, vec![0]);
        assert_eq!(scores[0].variant_score, 0.9);
    }

    #[test]
    fn test_single_comp_het_variant_is_capped() {
        let mut gene = Gene::new("CFTR", "1080");
        gene.add_variant(variant(0.6, &[SubModeOfInheritance::AutosomalRecessiveCompHet]));

        let scores = scorer(&[ModeOfInheritance::AutosomalRecessive]).score_gene(&mut gene);
        assert_eq!(scores[0].contributing_variants, vec![0]);
        assert_eq!(scores[0].variant_score, 0.6);
    }

    #[test]
    fn test_equal_scores_keep_original_order() {
        let dominant = [SubModeOfInheritance::AutosomalDominant];
        let mut gene = Gene::new("FGFR2", "2263");
        gene.add_variant(variant(0.5, &dominant));
        gene.add_variant(variant(0.5, &dominant));

        let scores = scorer(&[ModeOfInheritance::AutosomalDominant]).score_gene(&mut gene);
        assert_eq!(scores[0].contributing_variants, vec![0]);
    }

    #[test]
    fn test_failed_variants_never_contribute() {
        let mut gene = Gene::new("FGFR2", "2263");
        gene.add_variant(failed_variant(1.0, &[SubModeOfInheritance::AutosomalDominant]));

        let scores = scorer(&[ModeOfInheritance::AutosomalDominant]).score_gene(&mut gene);
        assert_eq!(scores[0].variant_score, 0.0);
        assert!(scores[0].contributing_variants.is_empty());
    }

    #[test]
    fn test_scores_appended_in_mode_order() {
        let mut gene = Gene::new("FGFR2", "2263");
        gene.add_variant(variant(0.5, &[SubModeOfInheritance::AutosomalDominant]));
        scorer(&[ModeOfInheritance::AutosomalRecessive, ModeOfInheritance::AutosomalDominant])
            .score_gene(&mut gene);

        let modes: Vec<ModeOfInheritance> = gene.gene_scores().iter().map(|s| s.mode).collect();
        assert_eq!(
            modes,
            vec![ModeOfInheritance::AutosomalRecessive, ModeOfInheritance::AutosomalDominant]
        );
        assert_eq!(gene.top_gene_score().mode, ModeOfInheritance::AutosomalDominant);
    }

    #[test]
    fn test_score_genes_ranks_descending_then_by_symbol() {
        let dominant = [SubModeOfInheritance::AutosomalDominant];
        let mut low = Gene::new("LOW1", "1");
        low.add_variant(variant(0.1, &dominant));
        let mut tied_b = Gene::new("BBB", "2");
        tied_b.add_variant(variant(0.5, &dominant));
        let mut tied_a = Gene::new("AAA", "3");
        tied_a.add_variant(variant(0.5, &dominant));
        let mut high = Gene::new("ZZZ", "4");
        high.add_variant(variant(0.9, &dominant));

        let mut genes = vec![low, tied_b, tied_a, high];
        scorer(&[ModeOfInheritance::AutosomalDominant]).score_genes(&mut genes);

        let symbols: Vec<&str> = genes.iter().map(|g| g.gene_symbol()).collect();
        assert_eq!(symbols, vec!["ZZZ", "AAA", "BBB", "LOW1"]);

        let before: Vec<String> = genes.iter().map(|g| g.gene_symbol().to_string()).collect();
        rank_genes(&mut genes, None);
        let after: Vec<String> = genes.iter().map(|g| g.gene_symbol().to_string()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_rank_genes_for_mode() {
        let mut dominant_gene = Gene::new("AAA", "1");
        dominant_gene.add_variant(variant(0.9, &[SubModeOfInheritance::AutosomalDominant]));
        let mut recessive_gene = Gene::new("BBB", "2");
        recessive_gene.add_variant(variant(0.6, &[SubModeOfInheritance::AutosomalRecessiveHomAlt]));

        let mut genes = vec![dominant_gene, recessive_gene];
        scorer(&[ModeOfInheritance::AutosomalDominant, ModeOfInheritance::AutosomalRecessive])
            .score_genes(&mut genes);
        assert_eq!(genes[0].gene_symbol(), "AAA");

        rank_genes(&mut genes, Some(ModeOfInheritance::AutosomalRecessive));
        assert_eq!(genes[0].gene_symbol(), "BBB");
    }
}
