//! # genorank - variant filtering and gene prioritisation core
//!
//! Normalises called variants to their minimal representation, runs them through an
//! ordered fail-fast filter pipeline and ranks genes under one or more modes of
//! inheritance. Clinical evidence for individual variants is aggregated separately
//! in [`acmg`].

pub mod acmg;
pub mod allele;
pub mod annotation;
pub mod contig;
pub mod filter;
pub mod gene;
pub mod gene_filters;
pub mod inheritance;
pub mod input;
pub mod pipeline;
pub mod region;
pub mod report;
pub mod scorer;
pub mod utils;
pub mod variant;
pub mod variant_filters;

pub use allele::{AllelePosition, AlleleShape};
pub use annotation::{FrequencySource, PathogenicitySource};
pub use gene::{Gene, GeneIdentifier, GeneScore};
pub use inheritance::{InheritanceModeOptions, ModeOfInheritance, SubModeOfInheritance};
pub use variant::VariantRecord;

/// Settings shared by every step of an analysis
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub frequency_sources: Vec<FrequencySource>,
    pub pathogenicity_sources: Vec<PathogenicitySource>,
    pub inheritance_modes: InheritanceModeOptions,
    pub num_threads: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            frequency_sources: Vec::new(),
            pathogenicity_sources: Vec::new(),
            inheritance_modes: InheritanceModeOptions::empty(),
            num_threads: 1,
        }
    }
}

/// Validate analysis configuration parameters
pub fn validate_analysis_config(config: &AnalysisConfig) -> GenorankResult<()> {
    if config.num_threads == 0 {
        return Err(GenorankError::InvalidConfig(
            "num_threads must be at least 1".to_string(),
        ));
    }

    if config
        .inheritance_modes
        .modes()
        .contains(&ModeOfInheritance::Any)
    {
        return Err(GenorankError::InvalidConfig(
            "ANY is implied when no inheritance modes are requested and cannot be requested explicitly"
                .to_string(),
        ));
    }

    Ok(())
}

/// Error types for the genorank library
#[derive(Debug, thiserror::Error)]
pub enum GenorankError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid variant format: {0}")]
    InvalidVariant(String),

    #[error("Invalid region: {0}")]
    InvalidRegion(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown inheritance mode: {0}")]
    UnknownInheritanceMode(String),
}

pub type GenorankResult<T> = Result<T, GenorankError>;
