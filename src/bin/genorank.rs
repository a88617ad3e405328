//! Command-line gene prioritisation over an annotated variant table

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use genorank_rs::{
    annotation::{FrequencySource, PathogenicitySource},
    gene::PriorityType,
    input::{add_phenotype_scores, read_phenotype_scores, read_regulatory_regions, read_variant_table, AnnotationSources},
    pipeline::Analysis,
    region::RegionIndex,
    report::write_gene_ranking,
    scorer::RawScoreGeneScorer,
    utils::{ensure_parent_dirs, get_num_cpus, validate_file_readable, Timer},
    variant_filters::DEFAULT_MIN_PATHOGENICITY_SCORE,
    AnalysisConfig, GenorankError, InheritanceModeOptions, ModeOfInheritance,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "genorank")]
#[command(about = "genorank - filter annotated variants and rank candidate genes")]
#[command(long_about = "
genorank filters the annotated variants of one sample and ranks the genes they fall in.

1. Reads annotated variants (one row per allele) and groups them by gene
2. Runs the requested filter steps in order; a variant stops at the first step it fails
3. Scores every gene under each requested mode of inheritance, combining the best
   contributing variants with the gene's phenotype match
4. Writes the genes ranked by combined score

Variant table columns (tab-separated, with header, optionally gzipped):
  gene_symbol gene_id chrom pos ref alt quality filter variant_score max_freq rs_id
  path_score clinvar compatible_modes

Missing values may be left empty or written as '.'. A variant without frequency or
pathogenicity values fails the corresponding filters.
")]
struct Args {
    /// Annotated variant table
    #[arg(long, value_name = "FILE")]
    variants: PathBuf,

    /// Phenotype scores table (gene_symbol, priority_type, score)
    #[arg(long, value_name = "FILE")]
    phenotypes: Option<PathBuf>,

    /// Regulatory regions (chrom, start, end, feature_type)
    #[arg(long, value_name = "FILE")]
    regions: Option<PathBuf>,

    /// Path to the output gene ranking TSV (.gz to compress)
    #[arg(long, value_name = "FILE")]
    output: PathBuf,

    /// Keep only genes with these symbols
    #[arg(long, value_delimiter = ',')]
    genes: Vec<String>,

    /// Remove variants not marked PASS by the caller
    #[arg(long)]
    pass_only: bool,

    /// Minimum variant call quality
    #[arg(long)]
    min_quality: Option<f64>,

    /// Keep only variants in a regulatory region (requires --regions)
    #[arg(long)]
    regulatory_only: bool,

    /// Maximum population frequency, in percent
    #[arg(long)]
    max_freq: Option<f32>,

    /// Remove variants already present in a population database
    #[arg(long)]
    remove_known: bool,

    /// Minimum pathogenicity score for a variant to be kept
    #[arg(long)]
    min_pathogenicity: Option<f32>,

    /// Run the pathogenicity step without removing non-pathogenic variants
    #[arg(long)]
    keep_non_pathogenic: bool,

    /// Minimum phenotype score from --priority-type for a gene to be kept
    #[arg(long)]
    min_priority_score: Option<f32>,

    /// Prioritiser whose score --min-priority-score applies to
    #[arg(long, default_value = "HIPHIVE")]
    priority_type: String,

    /// Modes of inheritance to score (AD, AR, XD, XR, MT); none scores any variant
    #[arg(long, value_delimiter = ',')]
    mode: Vec<String>,

    /// Source the max_freq column was taken from
    #[arg(long, default_value = "GNOMAD_G")]
    frequency_source: String,

    /// Source the path_score column was taken from
    #[arg(long, default_value = "REVEL")]
    pathogenicity_source: String,

    /// Only write the top N genes
    #[arg(long)]
    top: Option<usize>,

    /// Also write genes that failed a filter
    #[arg(long)]
    output_failed: bool,

    /// Number of threads to use
    #[arg(long, default_value_t = get_num_cpus())]
    num_threads: usize,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Force overwrite of output file if it exists
    #[arg(short, long)]
    force: bool,
}

fn inheritance_modes(codes: &[String]) -> Result<InheritanceModeOptions, GenorankError> {
    let modes = codes
        .iter()
        .map(|code| code.parse::<ModeOfInheritance>())
        .collect::<Result<Vec<_>, _>>()?;
    Ok(InheritanceModeOptions::of(modes))
}

fn build_analysis(args: &Args, config: AnalysisConfig) -> anyhow::Result<Analysis> {
    let mut builder = Analysis::builder(config);

    if let Some(path) = &args.regions {
        let regions = read_regulatory_regions(path)
            .with_context(|| format!("Failed to read regions from {:?}", path))?;
        builder = builder.regulatory_regions(RegionIndex::build(regions));
    }

    if !args.genes.is_empty() {
        builder = builder.add_gene_symbol_filter(args.genes.iter().cloned());
    }
    if args.pass_only {
        builder = builder.add_failed_variant_filter();
    }
    if let Some(min_quality) = args.min_quality {
        builder = builder.add_quality_filter(min_quality);
    }
    if args.regulatory_only {
        builder = builder.add_regulatory_feature_filter();
    }
    if let Some(max_freq) = args.max_freq {
        builder = builder.add_frequency_filter(max_freq);
    }
    if args.remove_known {
        builder = builder.add_known_variant_filter();
    }
    if args.min_pathogenicity.is_some() || args.keep_non_pathogenic {
        let min_score = args
            .min_pathogenicity
            .unwrap_or(DEFAULT_MIN_PATHOGENICITY_SCORE);
        builder = builder.add_pathogenicity_filter(args.keep_non_pathogenic, min_score);
    }
    if let Some(min_score) = args.min_priority_score {
        let priority_type = args
            .priority_type
            .parse::<PriorityType>()
            .map_err(GenorankError::InvalidConfig)?;
        builder = builder.add_priority_score_filter(priority_type, min_score);
    }
    if !args.mode.is_empty() {
        builder = builder.add_inheritance_filter();
    }

    Ok(builder.build()?)
}

fn run() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = if args.debug {
        "debug"
    } else if args.verbose {
        "info"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(log_level))
        .format_timestamp_secs()
        .init();

    log::info!("Starting genorank");
    log::info!("Variants: {:?}", args.variants);
    log::info!("Output: {:?}", args.output);
    log::info!("Number of threads: {}", args.num_threads);

    validate_file_readable(&args.variants)?;
    if let Some(path) = &args.phenotypes {
        validate_file_readable(path)?;
    }
    if let Some(path) = &args.regions {
        validate_file_readable(path)?;
    }

    if args.output.exists() && !args.force {
        return Err(GenorankError::Io(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("Output file {:?} already exists. Use --force to overwrite.", args.output),
        ))
        .into());
    }
    ensure_parent_dirs(&args.output)?;

    let sources = AnnotationSources {
        frequency: args
            .frequency_source
            .parse::<FrequencySource>()
            .map_err(GenorankError::InvalidConfig)?,
        pathogenicity: args
            .pathogenicity_source
            .parse::<PathogenicitySource>()
            .map_err(GenorankError::InvalidConfig)?,
    };
    let config = AnalysisConfig {
        frequency_sources: vec![sources.frequency],
        pathogenicity_sources: vec![sources.pathogenicity],
        inheritance_modes: inheritance_modes(&args.mode)?,
        num_threads: args.num_threads,
    };

    let analysis = build_analysis(&args, config)?;

    rayon::ThreadPoolBuilder::new()
        .num_threads(analysis.config().num_threads)
        .build_global()
        .context("Failed to configure thread pool")?;

    let mut genes = {
        let _timer = Timer::new("Reading variants");
        read_variant_table(&args.variants, sources)
            .with_context(|| format!("Failed to read variants from {:?}", args.variants))?
    };

    if genes.is_empty() {
        log::warn!("No variants found in {:?}", args.variants);
    }

    if let Some(path) = &args.phenotypes {
        let scores = read_phenotype_scores(path)
            .with_context(|| format!("Failed to read phenotype scores from {:?}", path))?;
        let matched = add_phenotype_scores(&mut genes, &scores);
        log::info!("Matched phenotype scores to {} of {} genes", matched, genes.len());
    }

    let summary = {
        let _timer = Timer::new("Filtering");
        analysis.run(&mut genes)
    };
    log::info!("Filter summary:");
    log::info!("  Variants passed: {} / {}", summary.variants_passed, summary.variants_total);
    log::info!("  Genes passed: {} / {}", summary.genes_passed, summary.genes_total);

    {
        let _timer = Timer::new("Scoring genes");
        RawScoreGeneScorer::new(analysis.config().inheritance_modes.clone()).score_genes(&mut genes);
    }

    write_gene_ranking(&genes, &args.output, None, args.top, !args.output_failed)?;

    log::info!("Gene ranking written to: {:?}", args.output);
    Ok(())
}

/// Handle application errors and provide user-friendly messages
fn handle_error(error: anyhow::Error) -> ! {
    match error.downcast_ref::<GenorankError>() {
        Some(GenorankError::FileNotFound(path)) => {
            eprintln!("Error: File not found: {}", path);
            eprintln!("Please check that the file exists and is readable.");
        }
        Some(GenorankError::InvalidVariant(msg)) => {
            eprintln!("Error: Invalid variant data: {}", msg);
            eprintln!("Please check the columns of your variant table.");
        }
        Some(GenorankError::InvalidRegion(msg)) => {
            eprintln!("Error: Invalid region: {}", msg);
            eprintln!("Please check that your region file is chrom, start, end, feature_type.");
        }
        Some(GenorankError::InvalidConfig(msg)) => {
            eprintln!("Error: Invalid configuration: {}", msg);
            eprintln!("Please check your filter options.");
        }
        Some(GenorankError::UnknownInheritanceMode(mode)) => {
            eprintln!("Error: Unknown inheritance mode: {}", mode);
            eprintln!("Supported modes are AD, AR, XD, XR and MT.");
        }
        Some(GenorankError::Io(e)) => {
            eprintln!("Error: I/O error: {}", e);
            eprintln!("Please check file permissions and disk space.");
        }
        Some(GenorankError::Csv(e)) => {
            eprintln!("Error: Table parsing error: {}", e);
            eprintln!("Please check that your input tables are tab-separated with the expected header.");
        }
        None => {
            eprintln!("Error: {:#}", error);
        }
    }
    std::process::exit(1);
}

fn main() {
    if let Err(e) = run() {
        handle_error(e);
    }
}
