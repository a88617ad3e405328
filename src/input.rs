//! Readers for the tab-separated tables consumed by the `genorank` binary.
//!
//! All tables may be gzip-compressed. The variant and phenotype tables carry a header row; the
//! region table is BED-like with `#` comment lines.

use crate::annotation::{
    ClinVarSignificance, Frequency, FrequencyData, FrequencySource, PathogenicityData,
    PathogenicityScore, PathogenicitySource,
};
use crate::contig::to_chromosome_number;
use crate::gene::{Gene, GeneIdentifier, PriorityResult, PriorityType};
use crate::inheritance::SubModeOfInheritance;
use crate::region::{Region, RegulatoryFeatureType};
use crate::utils::is_gzipped;
use crate::variant::VariantRecord;
use crate::{GenorankError, GenorankResult};
use flate2::read::MultiGzDecoder;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

fn open_table<P: AsRef<Path>>(path: P, has_headers: bool) -> GenorankResult<csv::Reader<Box<dyn BufRead>>> {
    let file = File::open(&path)
        .map_err(|_| GenorankError::FileNotFound(path.as_ref().to_string_lossy().to_string()))?;

    let reader: Box<dyn BufRead> = if is_gzipped(&path)? {
        Box::new(BufReader::new(MultiGzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };

    Ok(csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(has_headers)
        .flexible(true)
        .comment(Some(b'#'))
        .from_reader(reader))
}

/// Empty and `.` mean "not supplied"
fn parse_optional<T: FromStr>(field: Option<&str>, column: &str) -> GenorankResult<Option<T>> {
    match field.map(str::trim) {
        None | Some("") | Some(".") => Ok(None),
        Some(value) => value.parse::<T>().map(Some).map_err(|_| {
            GenorankError::InvalidVariant(format!("Invalid {}: {}", column, value))
        }),
    }
}

fn required<'a>(field: Option<&'a str>, column: &str) -> GenorankResult<&'a str> {
    match field.map(str::trim) {
        None | Some("") => Err(GenorankError::InvalidVariant(format!("Missing {}", column))),
        Some(value) => Ok(value),
    }
}

#[derive(Debug, Deserialize)]
struct VariantRow {
    gene_symbol: String,
    gene_id: String,
    chrom: String,
    pos: Option<String>,
    #[serde(rename = "ref")]
    ref_allele: Option<String>,
    #[serde(rename = "alt")]
    alt_allele: Option<String>,
    quality: Option<String>,
    filter: Option<String>,
    variant_score: Option<String>,
    max_freq: Option<String>,
    rs_id: Option<String>,
    path_score: Option<String>,
    clinvar: Option<String>,
    compatible_modes: Option<String>,
}

/// Tags applied to the single frequency and pathogenicity values in each variant row
#[derive(Debug, Clone, Copy)]
pub struct AnnotationSources {
    pub frequency: FrequencySource,
    pub pathogenicity: PathogenicitySource,
}

impl Default for AnnotationSources {
    fn default() -> Self {
        Self {
            frequency: FrequencySource::GnomadGenomes,
            pathogenicity: PathogenicitySource::Revel,
        }
    }
}

impl VariantRow {
    fn frequency_data(&self, source: FrequencySource) -> GenorankResult<Option<FrequencyData>> {
        let rs_id = parse_optional::<String>(self.rs_id.as_deref(), "rs_id")?;
        let max_freq = parse_optional::<f32>(self.max_freq.as_deref(), "max_freq")?;
        Ok(match max_freq {
            None if rs_id.is_none() => None,
            None => Some(FrequencyData::new(rs_id, Vec::new())),
            Some(freq) if freq <= 0.0 => Some(FrequencyData::new(rs_id, Vec::new())),
            Some(freq) => Some(FrequencyData::new(rs_id, vec![Frequency::new(source, freq)])),
        })
    }

    fn pathogenicity_data(&self, source: PathogenicitySource) -> GenorankResult<Option<PathogenicityData>> {
        let score = parse_optional::<f32>(self.path_score.as_deref(), "path_score")?;
        let clinvar = match parse_optional::<String>(self.clinvar.as_deref(), "clinvar")? {
            Some(value) => Some(
                value
                    .parse::<ClinVarSignificance>()
                    .map_err(GenorankError::InvalidVariant)?,
            ),
            None => None,
        };
        if score.is_none() && clinvar.is_none() {
            return Ok(None);
        }
        let scores = score
            .map(|s| vec![PathogenicityScore::of(source, s)])
            .unwrap_or_default();
        Ok(Some(PathogenicityData::new(clinvar, scores)))
    }

    fn compatible_sub_modes(&self) -> GenorankResult<Vec<SubModeOfInheritance>> {
        match parse_optional::<String>(self.compatible_modes.as_deref(), "compatible_modes")? {
            Some(modes) => modes
                .split(',')
                .filter(|m| !m.trim().is_empty())
                .map(str::parse::<SubModeOfInheritance>)
                .collect(),
            None => Ok(Vec::new()),
        }
    }

    /// `None` for variants on contigs outside 1-22, X, Y and MT
    fn into_record(self, sources: AnnotationSources) -> GenorankResult<Option<(GeneIdentifier, VariantRecord)>> {
        let Some(chromosome) = to_chromosome_number(&self.chrom) else {
            return Ok(None);
        };
        let pos = required(self.pos.as_deref(), "pos")?;
        let start = pos
            .parse::<u32>()
            .map_err(|_| GenorankError::InvalidVariant(format!("Invalid position: {}", pos)))?;
        let ref_allele = required(self.ref_allele.as_deref(), "ref")?;
        let alt_allele = required(self.alt_allele.as_deref(), "alt")?;

        let quality = parse_optional::<f64>(self.quality.as_deref(), "quality")?.unwrap_or(0.0);
        let passed_vcf_filter = match self.filter.as_deref().map(str::trim) {
            None | Some("") | Some(".") => true,
            Some(filter) => filter.eq_ignore_ascii_case("PASS"),
        };
        let variant_score = parse_optional::<f32>(self.variant_score.as_deref(), "variant_score")?.unwrap_or(0.0);

        let mut builder = VariantRecord::builder(chromosome, start, ref_allele, alt_allele)
            .quality(quality)
            .passed_vcf_filter(passed_vcf_filter)
            .variant_score(variant_score)
            .gene_symbol(&self.gene_symbol)
            .compatible_sub_modes(self.compatible_sub_modes()?);
        if let Some(data) = self.frequency_data(sources.frequency)? {
            builder = builder.frequency_data(data);
        }
        if let Some(data) = self.pathogenicity_data(sources.pathogenicity)? {
            builder = builder.pathogenicity_data(data);
        }

        let identifier = GeneIdentifier::new(&self.gene_symbol, &self.gene_id);
        Ok(Some((identifier, builder.build())))
    }
}

/// Read annotated variants and group them into genes, keeping the order genes and variants
/// first appear in the file.
pub fn read_variant_table<P: AsRef<Path>>(path: P, sources: AnnotationSources) -> GenorankResult<Vec<Gene>> {
    let mut csv_reader = open_table(&path, true)?;

    let mut genes: Vec<Gene> = Vec::new();
    let mut gene_index: HashMap<GeneIdentifier, usize> = HashMap::new();
    let mut skipped = 0;

    for result in csv_reader.deserialize() {
        let row: VariantRow = result?;
        let contig = row.chrom.clone();
        let Some((identifier, variant)) = row.into_record(sources)? else {
            log::warn!("Skipping variant on unsupported contig {}", contig);
            skipped += 1;
            continue;
        };
        let index = *gene_index.entry(identifier.clone()).or_insert_with(|| {
            genes.push(Gene::from_identifier(identifier));
            genes.len() - 1
        });
        genes[index].add_variant(variant);
    }

    log::info!(
        "Read {} variants in {} genes from {} ({} skipped)",
        genes.iter().map(Gene::number_of_variants).sum::<usize>(),
        genes.len(),
        path.as_ref().display(),
        skipped
    );
    Ok(genes)
}

#[derive(Debug, Deserialize)]
struct PhenotypeRow {
    gene_symbol: String,
    priority_type: String,
    score: f32,
}

/// Read per-gene phenotype scores keyed by gene symbol
pub fn read_phenotype_scores<P: AsRef<Path>>(path: P) -> GenorankResult<HashMap<String, Vec<PriorityResult>>> {
    let mut csv_reader = open_table(&path, true)?;
    let mut scores: HashMap<String, Vec<PriorityResult>> = HashMap::new();

    for result in csv_reader.deserialize() {
        let row: PhenotypeRow = result?;
        let priority_type = match row.priority_type.parse::<PriorityType>() {
            Ok(priority_type) => priority_type,
            Err(e) => {
                log::warn!("Skipping phenotype score for {}: {}", row.gene_symbol, e);
                continue;
            }
        };
        scores
            .entry(row.gene_symbol)
            .or_default()
            .push(PriorityResult::new(priority_type, row.score));
    }

    log::info!("Read phenotype scores for {} genes", scores.len());
    Ok(scores)
}

/// Attach phenotype scores to the genes they name. Returns the number of genes matched.
pub fn add_phenotype_scores(genes: &mut [Gene], scores: &HashMap<String, Vec<PriorityResult>>) -> usize {
    let mut matched = 0;
    for gene in genes.iter_mut() {
        if let Some(results) = scores.get(gene.gene_symbol()) {
            for result in results {
                gene.add_priority_result(*result);
            }
            matched += 1;
        }
    }
    matched
}

/// Read `chrom start end feature_type` regions
pub fn read_regulatory_regions<P: AsRef<Path>>(path: P) -> GenorankResult<Vec<Region<RegulatoryFeatureType>>> {
    let mut csv_reader = open_table(&path, false)?;
    let mut regions = Vec::new();

    for result in csv_reader.records() {
        let record = result?;
        if record.len() < 3 {
            continue;
        }

        let Some(chromosome) = to_chromosome_number(&record[0]) else {
            log::warn!("Skipping region on unsupported contig {}", &record[0]);
            continue;
        };
        let start = record[1]
            .trim()
            .parse::<u32>()
            .map_err(|_| GenorankError::InvalidRegion(format!("Invalid start: {}", &record[1])))?;
        let end = record[2]
            .trim()
            .parse::<u32>()
            .map_err(|_| GenorankError::InvalidRegion(format!("Invalid end: {}", &record[2])))?;
        let feature_type = match record.get(3) {
            Some(value) => value.parse::<RegulatoryFeatureType>()?,
            None => RegulatoryFeatureType::Unknown,
        };

        regions.push(Region::new(chromosome, start, end, feature_type)?);
    }

    log::info!("Read {} regions from {}", regions.len(), path.as_ref().display());
    Ok(regions)
}
