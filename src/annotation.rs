//! Per-source annotation values supplied by the frequency and pathogenicity stores.
//!
//! Lookups happen outside this crate; a variant carries `None` when the lookup was never
//! made, which filters treat as "no verdict possible".

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FrequencySource {
    GnomadExomes,
    GnomadGenomes,
    Exac,
    Topmed,
    ThousandGenomes,
    Esp,
    Uk10k,
    Local,
}

impl FromStr for FrequencySource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GNOMAD_E" | "GNOMAD_EXOMES" => Ok(FrequencySource::GnomadExomes),
            "GNOMAD_G" | "GNOMAD_GENOMES" => Ok(FrequencySource::GnomadGenomes),
            "EXAC" => Ok(FrequencySource::Exac),
            "TOPMED" => Ok(FrequencySource::Topmed),
            "1KG" | "THOUSAND_GENOMES" => Ok(FrequencySource::ThousandGenomes),
            "ESP" => Ok(FrequencySource::Esp),
            "UK10K" => Ok(FrequencySource::Uk10k),
            "LOCAL" => Ok(FrequencySource::Local),
            _ => Err(format!("Unknown frequency source: {}", s)),
        }
    }
}

/// Allele frequency as a percentage, 0-100
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frequency {
    pub source: FrequencySource,
    pub frequency: f32,
}

impl Frequency {
    pub fn new(source: FrequencySource, frequency: f32) -> Self {
        Self { source, frequency }
    }
}

/// Population frequencies for a variant. An empty instance means the variant was looked up
/// and not seen in any population.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrequencyData {
    pub rs_id: Option<String>,
    pub frequencies: Vec<Frequency>,
}

impl FrequencyData {
    pub fn new(rs_id: Option<String>, frequencies: Vec<Frequency>) -> Self {
        Self { rs_id, frequencies }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Highest frequency across sources, 0 when none were observed
    pub fn max_freq(&self) -> f32 {
        self.frequencies
            .iter()
            .map(|f| f.frequency)
            .fold(0.0, f32::max)
    }

    pub fn has_known_frequency(&self) -> bool {
        !self.frequencies.is_empty()
    }

    pub fn is_represented_in_database(&self) -> bool {
        self.rs_id.is_some() || self.has_known_frequency()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PathogenicitySource {
    Polyphen,
    MutationTaster,
    Sift,
    Cadd,
    Remm,
    Revel,
    Mvp,
    SpliceAi,
}

impl FromStr for PathogenicitySource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "POLYPHEN" => Ok(PathogenicitySource::Polyphen),
            "MUTATION_TASTER" => Ok(PathogenicitySource::MutationTaster),
            "SIFT" => Ok(PathogenicitySource::Sift),
            "CADD" => Ok(PathogenicitySource::Cadd),
            "REMM" => Ok(PathogenicitySource::Remm),
            "REVEL" => Ok(PathogenicitySource::Revel),
            "MVP" => Ok(PathogenicitySource::Mvp),
            "SPLICE_AI" | "SPLICEAI" => Ok(PathogenicitySource::SpliceAi),
            _ => Err(format!("Unknown pathogenicity source: {}", s)),
        }
    }
}

/// Pathogenicity prediction where higher is always more deleterious
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathogenicityScore {
    source: PathogenicitySource,
    score: f32,
}

impl PathogenicityScore {
    /// SIFT reports 0 as most damaging, so its raw score is inverted.
    pub fn of(source: PathogenicitySource, raw_score: f32) -> Self {
        let score = match source {
            PathogenicitySource::Sift => 1.0 - raw_score,
            _ => raw_score,
        };
        Self { source, score }
    }

    pub fn source(&self) -> PathogenicitySource {
        self.source
    }

    pub fn score(&self) -> f32 {
        self.score
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClinVarSignificance {
    Pathogenic,
    LikelyPathogenic,
    UncertainSignificance,
    LikelyBenign,
    Benign,
    ConflictingInterpretations,
    NotProvided,
}

impl ClinVarSignificance {
    pub fn is_pathogenic_or_likely_pathogenic(&self) -> bool {
        matches!(
            self,
            ClinVarSignificance::Pathogenic | ClinVarSignificance::LikelyPathogenic
        )
    }
}

impl FromStr for ClinVarSignificance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(' ', "_").as_str() {
            "pathogenic" => Ok(ClinVarSignificance::Pathogenic),
            "likely_pathogenic" => Ok(ClinVarSignificance::LikelyPathogenic),
            "uncertain_significance" | "vus" => Ok(ClinVarSignificance::UncertainSignificance),
            "likely_benign" => Ok(ClinVarSignificance::LikelyBenign),
            "benign" => Ok(ClinVarSignificance::Benign),
            "conflicting_interpretations_of_pathogenicity" | "conflicting" => {
                Ok(ClinVarSignificance::ConflictingInterpretations)
            }
            "not_provided" => Ok(ClinVarSignificance::NotProvided),
            _ => Err(format!("Unknown ClinVar significance: {}", s)),
        }
    }
}

impl fmt::Display for ClinVarSignificance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ClinVarSignificance::Pathogenic => "pathogenic",
            ClinVarSignificance::LikelyPathogenic => "likely_pathogenic",
            ClinVarSignificance::UncertainSignificance => "uncertain_significance",
            ClinVarSignificance::LikelyBenign => "likely_benign",
            ClinVarSignificance::Benign => "benign",
            ClinVarSignificance::ConflictingInterpretations => "conflicting",
            ClinVarSignificance::NotProvided => "not_provided",
        };
        write!(f, "{}", s)
    }
}

/// Pathogenicity predictions and clinical assertions for a variant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathogenicityData {
    pub clinvar: Option<ClinVarSignificance>,
    pub scores: Vec<PathogenicityScore>,
}

impl PathogenicityData {
    pub fn new(clinvar: Option<ClinVarSignificance>, scores: Vec<PathogenicityScore>) -> Self {
        Self { clinvar, scores }
    }

    pub fn has_predicted_score(&self) -> bool {
        !self.scores.is_empty()
    }

    pub fn most_pathogenic_score(&self) -> Option<PathogenicityScore> {
        self.scores
            .iter()
            .copied()
            .reduce(|best, s| if s.score() > best.score() { s } else { best })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_freq() {
        let data = FrequencyData::new(
            Some("rs123".to_string()),
            vec![
                Frequency::new(FrequencySource::GnomadExomes, 0.02),
                Frequency::new(FrequencySource::Topmed, 0.5),
            ],
        );
        assert_eq!(data.max_freq(), 0.5);
        assert!(data.is_represented_in_database());
    }

    #[test]
    fn test_empty_frequency_data() {
        let data = FrequencyData::empty();
        assert_eq!(data.max_freq(), 0.0);
        assert!(!data.has_known_frequency());
        assert!(!data.is_represented_in_database());
    }

    #[test]
    fn test_rs_id_only_is_represented() {
        let data = FrequencyData::new(Some("rs1".to_string()), Vec::new());
        assert!(data.is_represented_in_database());
        assert!(!data.has_known_frequency());
    }

    #[test]
    fn test_sift_is_inverted() {
        let sift = PathogenicityScore::of(PathogenicitySource::Sift, 0.0);
        assert_eq!(sift.score(), 1.0);
        let cadd = PathogenicityScore::of(PathogenicitySource::Cadd, 0.7);
        assert_eq!(cadd.score(), 0.7);
    }

    #[test]
    fn test_most_pathogenic_score() {
        let data = PathogenicityData::new(
            None,
            vec![
                PathogenicityScore::of(PathogenicitySource::Polyphen, 0.3),
                PathogenicityScore::of(PathogenicitySource::Sift, 0.1),
                PathogenicityScore::of(PathogenicitySource::Revel, 0.6),
            ],
        );
        let best = data.most_pathogenic_score().unwrap();
        assert_eq!(best.source(), PathogenicitySource::Sift);
        assert!(PathogenicityData::default().most_pathogenic_score().is_none());
    }

    #[test]
    fn test_source_parsing() {
        assert_eq!("gnomad_e".parse::<FrequencySource>(), Ok(FrequencySource::GnomadExomes));
        assert_eq!("REVEL".parse::<PathogenicitySource>(), Ok(PathogenicitySource::Revel));
        assert!("nope".parse::<FrequencySource>().is_err());
    }

    #[test]
    fn test_clinvar_parsing() {
        assert_eq!(
            "Likely pathogenic".parse::<ClinVarSignificance>(),
            Ok(ClinVarSignificance::LikelyPathogenic)
        );
        assert!(ClinVarSignificance::Pathogenic.is_pathogenic_or_likely_pathogenic());
        assert!(!ClinVarSignificance::Benign.is_pathogenic_or_likely_pathogenic());
    }
}
