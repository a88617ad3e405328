//! Modes of inheritance and the allele patterns they require

use crate::GenorankError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ModeOfInheritance {
    AutosomalDominant,
    AutosomalRecessive,
    XDominant,
    XRecessive,
    Mitochondrial,
    Any,
}

impl ModeOfInheritance {
    pub fn is_dominant(&self) -> bool {
        matches!(
            self,
            ModeOfInheritance::AutosomalDominant | ModeOfInheritance::XDominant
        )
    }

    pub fn is_recessive(&self) -> bool {
        matches!(
            self,
            ModeOfInheritance::AutosomalRecessive | ModeOfInheritance::XRecessive
        )
    }

    pub fn code(&self) -> &'static str {
        match self {
            ModeOfInheritance::AutosomalDominant => "AD",
            ModeOfInheritance::AutosomalRecessive => "AR",
            ModeOfInheritance::XDominant => "XD",
            ModeOfInheritance::XRecessive => "XR",
            ModeOfInheritance::Mitochondrial => "MT",
            ModeOfInheritance::Any => "ANY",
        }
    }

    /// Sub-modes whose compatible variants may explain this mode
    pub fn sub_modes(&self) -> &'static [SubModeOfInheritance] {
        use SubModeOfInheritance::*;
        match self {
            ModeOfInheritance::AutosomalDominant => &[AutosomalDominant],
            ModeOfInheritance::AutosomalRecessive => {
                &[AutosomalRecessiveHomAlt, AutosomalRecessiveCompHet]
            }
            ModeOfInheritance::XDominant => &[XDominant],
            ModeOfInheritance::XRecessive => &[XRecessiveHomAlt, XRecessiveCompHet],
            ModeOfInheritance::Mitochondrial => &[Mitochondrial],
            ModeOfInheritance::Any => &[Any],
        }
    }
}

impl fmt::Display for ModeOfInheritance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for ModeOfInheritance {
    type Err = GenorankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AD" | "AUTOSOMAL_DOMINANT" => Ok(ModeOfInheritance::AutosomalDominant),
            "AR" | "AUTOSOMAL_RECESSIVE" => Ok(ModeOfInheritance::AutosomalRecessive),
            "XD" | "X_DOMINANT" => Ok(ModeOfInheritance::XDominant),
            "XR" | "X_RECESSIVE" => Ok(ModeOfInheritance::XRecessive),
            "MT" | "MITOCHONDRIAL" => Ok(ModeOfInheritance::Mitochondrial),
            "ANY" => Ok(ModeOfInheritance::Any),
            _ => Err(GenorankError::UnknownInheritanceMode(s.to_string())),
        }
    }
}

/// Number and arrangement of alternate alleles a pattern needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AllelePattern {
    SingleAllele,
    HomozygousAlt,
    CompoundHet,
}

impl AllelePattern {
    pub fn required_alleles(&self) -> usize {
        match self {
            AllelePattern::SingleAllele | AllelePattern::HomozygousAlt => 1,
            AllelePattern::CompoundHet => 2,
        }
    }
}

/// Inheritance mode refined by the genotype pattern that satisfied it. Compatibility of a
/// variant is always expressed at this level so recessive hom-alt and comp-het are never
/// confused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SubModeOfInheritance {
    AutosomalDominant,
    AutosomalRecessiveHomAlt,
    AutosomalRecessiveCompHet,
    XDominant,
    XRecessiveHomAlt,
    XRecessiveCompHet,
    Mitochondrial,
    Any,
}

impl SubModeOfInheritance {
    pub fn mode(&self) -> ModeOfInheritance {
        match self {
            SubModeOfInheritance::AutosomalDominant => ModeOfInheritance::AutosomalDominant,
            SubModeOfInheritance::AutosomalRecessiveHomAlt
            | SubModeOfInheritance::AutosomalRecessiveCompHet => {
                ModeOfInheritance::AutosomalRecessive
            }
            SubModeOfInheritance::XDominant => ModeOfInheritance::XDominant,
            SubModeOfInheritance::XRecessiveHomAlt | SubModeOfInheritance::XRecessiveCompHet => {
                ModeOfInheritance::XRecessive
            }
            SubModeOfInheritance::Mitochondrial => ModeOfInheritance::Mitochondrial,
            SubModeOfInheritance::Any => ModeOfInheritance::Any,
        }
    }

    pub fn allele_pattern(&self) -> AllelePattern {
        match self {
            SubModeOfInheritance::AutosomalRecessiveHomAlt
            | SubModeOfInheritance::XRecessiveHomAlt => AllelePattern::HomozygousAlt,
            SubModeOfInheritance::AutosomalRecessiveCompHet
            | SubModeOfInheritance::XRecessiveCompHet => AllelePattern::CompoundHet,
            _ => AllelePattern::SingleAllele,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            SubModeOfInheritance::AutosomalDominant => "AD",
            SubModeOfInheritance::AutosomalRecessiveHomAlt => "AR_HOM_ALT",
            SubModeOfInheritance::AutosomalRecessiveCompHet => "AR_COMP_HET",
            SubModeOfInheritance::XDominant => "XD",
            SubModeOfInheritance::XRecessiveHomAlt => "XR_HOM_ALT",
            SubModeOfInheritance::XRecessiveCompHet => "XR_COMP_HET",
            SubModeOfInheritance::Mitochondrial => "MT",
            SubModeOfInheritance::Any => "ANY",
        }
    }
}

impl fmt::Display for SubModeOfInheritance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for SubModeOfInheritance {
    type Err = GenorankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AD" => Ok(SubModeOfInheritance::AutosomalDominant),
            "AR_HOM_ALT" => Ok(SubModeOfInheritance::AutosomalRecessiveHomAlt),
            "AR_COMP_HET" => Ok(SubModeOfInheritance::AutosomalRecessiveCompHet),
            "XD" => Ok(SubModeOfInheritance::XDominant),
            "XR_HOM_ALT" => Ok(SubModeOfInheritance::XRecessiveHomAlt),
            "XR_COMP_HET" => Ok(SubModeOfInheritance::XRecessiveCompHet),
            "MT" => Ok(SubModeOfInheritance::Mitochondrial),
            "ANY" => Ok(SubModeOfInheritance::Any),
            _ => Err(GenorankError::UnknownInheritanceMode(s.to_string())),
        }
    }
}

/// Requested modes of inheritance, in evaluation order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InheritanceModeOptions {
    modes: Vec<ModeOfInheritance>,
}

impl InheritanceModeOptions {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn defaults() -> Self {
        Self::of([
            ModeOfInheritance::AutosomalDominant,
            ModeOfInheritance::AutosomalRecessive,
            ModeOfInheritance::XDominant,
            ModeOfInheritance::XRecessive,
            ModeOfInheritance::Mitochondrial,
        ])
    }

    /// Duplicates are dropped, first occurrence wins.
    pub fn of<I: IntoIterator<Item = ModeOfInheritance>>(modes: I) -> Self {
        let mut unique = Vec::new();
        for mode in modes {
            if !unique.contains(&mode) {
                unique.push(mode);
            }
        }
        Self { modes: unique }
    }

    pub fn modes(&self) -> &[ModeOfInheritance] {
        &self.modes
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    /// The requested modes, or a lone `Any` when nothing was requested
    pub fn modes_to_score(&self) -> Vec<ModeOfInheritance> {
        if self.modes.is_empty() {
            vec![ModeOfInheritance::Any]
        } else {
            self.modes.clone()
        }
    }
}
