//! Gene ranking output

use crate::gene::{Gene, GeneScore};
use crate::inheritance::ModeOfInheritance;
use crate::GenorankResult;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub const RANKING_HEADER: &str =
    "rank\tgene_symbol\tgene_id\tmode\tcombined_score\tvariant_score\tphenotype_score\tcontributing_variants";

/// The score a gene is ranked by: its score for `mode`, or its best score
fn reported_score(gene: &Gene, mode: Option<ModeOfInheritance>) -> GeneScore {
    match mode {
        Some(mode) => gene
            .gene_score_for_mode(mode)
            .cloned()
            .unwrap_or_else(|| GeneScore::empty(gene.identifier().clone(), mode)),
        None => gene.top_gene_score(),
    }
}

fn ranking_line(rank: usize, gene: &Gene, score: &GeneScore) -> String {
    let contributing: Vec<String> = gene
        .contributing_variants(score)
        .iter()
        .map(|v| v.to_string())
        .collect();
    format!(
        "{}\t{}\t{}\t{}\t{:.4}\t{:.4}\t{:.4}\t{}",
        rank,
        gene.gene_symbol(),
        gene.gene_id(),
        score.mode,
        score.combined_score,
        score.variant_score,
        score.phenotype_score,
        if contributing.is_empty() {
            ".".to_string()
        } else {
            contributing.join(",")
        },
    )
}

fn write_ranking_lines<W: Write>(
    writer: &mut W,
    genes: &[Gene],
    mode: Option<ModeOfInheritance>,
    top: Option<usize>,
    passed_only: bool,
) -> GenorankResult<usize> {
    writeln!(writer, "{}", RANKING_HEADER)?;

    let limit = top.unwrap_or(genes.len());
    let mut written = 0;
    for gene in genes
        .iter()
        .filter(|gene| !passed_only || gene.passed_filters())
        .take(limit)
    {
        written += 1;
        let score = reported_score(gene, mode);
        writeln!(writer, "{}", ranking_line(written, gene, &score))?;
    }
    writer.flush()?;
    Ok(written)
}

/// Write already-ranked genes to a TSV file, gzip-compressed when the path ends in `.gz`.
/// With `passed_only`, genes that failed a filter are skipped and ranks count written genes.
/// Only the first `top` written genes are kept when a limit is given.
pub fn write_gene_ranking(
    genes: &[Gene],
    output_path: &Path,
    mode: Option<ModeOfInheritance>,
    top: Option<usize>,
    passed_only: bool,
) -> GenorankResult<usize> {
    let file = File::create(output_path)?;
    let written = if output_path.extension().and_then(|s| s.to_str()) == Some("gz") {
        let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
        let written = write_ranking_lines(&mut encoder, genes, mode, top, passed_only)?;
        encoder.finish()?.flush()?;
        written
    } else {
        let mut writer = BufWriter::new(file);
        write_ranking_lines(&mut writer, genes, mode, top, passed_only)?
    };

    log::info!("Wrote {} ranked genes to {}", written, output_path.display());
    Ok(written)
}
