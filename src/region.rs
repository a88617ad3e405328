//! Labelled genomic intervals and a per-chromosome lookup over them

use crate::variant::VariantCoordinates;
use crate::{GenorankError, GenorankResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// A 1-based, fully closed interval on one chromosome carrying an arbitrary payload
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region<T> {
    pub chromosome: u8,
    pub start: u32,
    pub end: u32,
    pub payload: T,
}

impl<T> Region<T> {
    pub fn new(chromosome: u8, start: u32, end: u32, payload: T) -> GenorankResult<Self> {
        if start > end {
            return Err(GenorankError::InvalidRegion(format!(
                "start {} > end {} on chromosome {}",
                start, end, chromosome
            )));
        }
        Ok(Self {
            chromosome,
            start,
            end,
            payload,
        })
    }

    pub fn contains_position(&self, position: u32) -> bool {
        self.start <= position && position <= self.end
    }
}

/// Regulatory annotation attached to a region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegulatoryFeatureType {
    Enhancer,
    Promoter,
    PromoterFlankingRegion,
    TfBindingSite,
    CtcfBindingSite,
    OpenChromatin,
    FantomPermissive,
    Unknown,
}

impl FromStr for RegulatoryFeatureType {
    type Err = GenorankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "enhancer" => Ok(RegulatoryFeatureType::Enhancer),
            "promoter" => Ok(RegulatoryFeatureType::Promoter),
            "promoter_flanking_region" => Ok(RegulatoryFeatureType::PromoterFlankingRegion),
            "tf_binding_site" => Ok(RegulatoryFeatureType::TfBindingSite),
            "ctcf_binding_site" => Ok(RegulatoryFeatureType::CtcfBindingSite),
            "open_chromatin_region" | "open_chromatin" => Ok(RegulatoryFeatureType::OpenChromatin),
            "fantom_permissive" => Ok(RegulatoryFeatureType::FantomPermissive),
            "unknown" | "." => Ok(RegulatoryFeatureType::Unknown),
            other => Err(GenorankError::InvalidRegion(format!(
                "unknown regulatory feature type '{}'",
                other
            ))),
        }
    }
}

/// Regions bucketed by chromosome. Buckets keep input order and are scanned linearly.
#[derive(Debug, Clone)]
pub struct RegionIndex<T> {
    index: HashMap<u8, Vec<Region<T>>>,
}

impl<T> Default for RegionIndex<T> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
        }
    }
}

impl<T> RegionIndex<T> {
    pub fn build(regions: Vec<Region<T>>) -> Self {
        let mut index: HashMap<u8, Vec<Region<T>>> = HashMap::new();
        for region in regions {
            index.entry(region.chromosome).or_default().push(region);
        }
        log::debug!(
            "Indexed {} regions over {} chromosomes",
            index.values().map(Vec::len).sum::<usize>(),
            index.len()
        );
        Self { index }
    }

    pub fn regions_overlapping_position(&self, chromosome: u8, position: u32) -> Vec<&Region<T>> {
        match self.index.get(&chromosome) {
            Some(regions) => regions
                .iter()
                .filter(|r| r.contains_position(position))
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn regions_containing_variant<V: VariantCoordinates + ?Sized>(&self, variant: &V) -> Vec<&Region<T>> {
        self.regions_overlapping_position(variant.chromosome(), variant.start())
    }

    pub fn has_region_containing_variant<V: VariantCoordinates + ?Sized>(&self, variant: &V) -> bool {
        self.index
            .get(&variant.chromosome())
            .map(|regions| regions.iter().any(|r| r.contains_position(variant.start())))
            .unwrap_or(false)
    }

    pub fn size(&self) -> usize {
        self.index.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.index.values().all(Vec::is_empty)
    }
}
