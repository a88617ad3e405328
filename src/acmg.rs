//! ACMG/AMP variant classification criteria and the evidence accumulated for one variant.
//!
//! Every criterion has a default strength which may be overridden when it is added. Tier counts
//! use the strength actually recorded, so PM1 upgraded to very strong counts as very strong.

use serde::{Serialize, Serializer};
use std::fmt;

/// Strength of a single piece of evidence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Evidence {
    StandAlone,
    VeryStrong,
    Strong,
    Moderate,
    Supporting,
}

impl Evidence {
    pub fn display_name(&self) -> &'static str {
        match self {
            Evidence::StandAlone => "StandAlone",
            Evidence::VeryStrong => "VeryStrong",
            Evidence::Strong => "Strong",
            Evidence::Moderate => "Moderate",
            Evidence::Supporting => "Supporting",
        }
    }
}

impl fmt::Display for Evidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Polarity {
    Pathogenic,
    Benign,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AcmgCriterion {
    Pvs1,
    Ps1,
    Ps2,
    Ps3,
    Ps4,
    Pm1,
    Pm2,
    Pm3,
    Pm4,
    Pm5,
    Pm6,
    Pp1,
    Pp2,
    Pp3,
    Pp4,
    Pp5,
    Ba1,
    Bs1,
    Bs2,
    Bs3,
    Bs4,
    Bp1,
    Bp2,
    Bp3,
    Bp4,
    Bp5,
    Bp6,
    Bp7,
}

impl AcmgCriterion {
    pub const ALL: [AcmgCriterion; 28] = [
        AcmgCriterion::Pvs1,
        AcmgCriterion::Ps1,
        AcmgCriterion::Ps2,
        AcmgCriterion::Ps3,
        AcmgCriterion::Ps4,
        AcmgCriterion::Pm1,
        AcmgCriterion::Pm2,
        AcmgCriterion::Pm3,
        AcmgCriterion::Pm4,
        AcmgCriterion::Pm5,
        AcmgCriterion::Pm6,
        AcmgCriterion::Pp1,
        AcmgCriterion::Pp2,
        AcmgCriterion::Pp3,
        AcmgCriterion::Pp4,
        AcmgCriterion::Pp5,
        AcmgCriterion::Ba1,
        AcmgCriterion::Bs1,
        AcmgCriterion::Bs2,
        AcmgCriterion::Bs3,
        AcmgCriterion::Bs4,
        AcmgCriterion::Bp1,
        AcmgCriterion::Bp2,
        AcmgCriterion::Bp3,
        AcmgCriterion::Bp4,
        AcmgCriterion::Bp5,
        AcmgCriterion::Bp6,
        AcmgCriterion::Bp7,
    ];

    /// The criterion's code and default strength, e.g. `PM1` / moderate
    fn definition(&self) -> (&'static str, Evidence) {
        use AcmgCriterion::*;
        match self {
            Pvs1 => ("PVS1", Evidence::VeryStrong),
            Ps1 => ("PS1", Evidence::Strong),
            Ps2 => ("PS2", Evidence::Strong),
            Ps3 => ("PS3", Evidence::Strong),
            Ps4 => ("PS4", Evidence::Strong),
            Pm1 => ("PM1", Evidence::Moderate),
            Pm2 => ("PM2", Evidence::Moderate),
            Pm3 => ("PM3", Evidence::Moderate),
            Pm4 => ("PM4", Evidence::Moderate),
            Pm5 => ("PM5", Evidence::Moderate),
            Pm6 => ("PM6", Evidence::Moderate),
            Pp1 => ("PP1", Evidence::Supporting),
            Pp2 => ("PP2", Evidence::Supporting),
            Pp3 => ("PP3", Evidence::Supporting),
            Pp4 => ("PP4", Evidence::Supporting),
            Pp5 => ("PP5", Evidence::Supporting),
            Ba1 => ("BA1", Evidence::StandAlone),
            Bs1 => ("BS1", Evidence::Strong),
            Bs2 => ("BS2", Evidence::Strong),
            Bs3 => ("BS3", Evidence::Strong),
            Bs4 => ("BS4", Evidence::Strong),
            Bp1 => ("BP1", Evidence::Supporting),
            Bp2 => ("BP2", Evidence::Supporting),
            Bp3 => ("BP3", Evidence::Supporting),
            Bp4 => ("BP4", Evidence::Supporting),
            Bp5 => ("BP5", Evidence::Supporting),
            Bp6 => ("BP6", Evidence::Supporting),
            Bp7 => ("BP7", Evidence::Supporting),
        }
    }

    pub fn code(&self) -> &'static str {
        self.definition().0
    }

    pub fn evidence(&self) -> Evidence {
        self.definition().1
    }

    pub fn polarity(&self) -> Polarity {
        if self.code().starts_with('P') {
            Polarity::Pathogenic
        } else {
            Polarity::Benign
        }
    }

    pub fn from_code(code: &str) -> Option<AcmgCriterion> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.code().eq_ignore_ascii_case(code))
    }
}

impl fmt::Display for AcmgCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl Serialize for AcmgCriterion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

/// Criteria met by a variant with their recorded strengths, in first-added order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AcmgEvidence {
    evidence: Vec<(AcmgCriterion, Evidence)>,
}

impl AcmgEvidence {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builder() -> AcmgEvidenceBuilder {
        AcmgEvidenceBuilder::default()
    }

    /// Later entries for the same criterion replace earlier ones.
    pub fn of<I: IntoIterator<Item = (AcmgCriterion, Evidence)>>(evidence: I) -> Self {
        let mut builder = Self::builder();
        for (criterion, strength) in evidence {
            builder = builder.add_with_evidence(criterion, strength);
        }
        builder.build()
    }

    pub fn size(&self) -> usize {
        self.evidence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.evidence.is_empty()
    }

    pub fn contains(&self, criterion: AcmgCriterion) -> bool {
        self.get(criterion).is_some()
    }

    /// `None` when the criterion was never added
    pub fn get(&self, criterion: AcmgCriterion) -> Option<Evidence> {
        self.evidence
            .iter()
            .find(|(c, _)| *c == criterion)
            .map(|(_, e)| *e)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(AcmgCriterion, Evidence)> {
        self.evidence.iter()
    }

    fn count(&self, polarity: Polarity, strength: Evidence) -> usize {
        self.evidence
            .iter()
            .filter(|(c, e)| c.polarity() == polarity && *e == strength)
            .count()
    }

    pub fn very_strong_pathogenic_count(&self) -> usize {
        self.count(Polarity::Pathogenic, Evidence::VeryStrong)
    }

    pub fn strong_pathogenic_count(&self) -> usize {
        self.count(Polarity::Pathogenic, Evidence::Strong)
    }

    pub fn moderate_pathogenic_count(&self) -> usize {
        self.count(Polarity::Pathogenic, Evidence::Moderate)
    }

    pub fn supporting_pathogenic_count(&self) -> usize {
        self.count(Polarity::Pathogenic, Evidence::Supporting)
    }

    pub fn standalone_benign_count(&self) -> usize {
        self.count(Polarity::Benign, Evidence::StandAlone)
    }

    pub fn strong_benign_count(&self) -> usize {
        self.count(Polarity::Benign, Evidence::Strong)
    }

    pub fn supporting_benign_count(&self) -> usize {
        self.count(Polarity::Benign, Evidence::Supporting)
    }
}

impl fmt::Display for AcmgEvidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, (criterion, strength)) in self.evidence.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            if *strength == criterion.evidence() {
                write!(f, "{}", criterion)?;
            } else {
                write!(f, "{}_{}", criterion, strength)?;
            }
        }
        write!(f, "]")
    }
}

#[derive(Debug, Clone, Default)]
pub struct AcmgEvidenceBuilder {
    evidence: Vec<(AcmgCriterion, Evidence)>,
}

impl AcmgEvidenceBuilder {
    /// Adds the criterion at its default strength
    pub fn add(self, criterion: AcmgCriterion) -> Self {
        self.add_with_evidence(criterion, criterion.evidence())
    }

    /// Re-adding a criterion replaces its strength but keeps its position.
    pub fn add_with_evidence(mut self, criterion: AcmgCriterion, evidence: Evidence) -> Self {
        match self.evidence.iter_mut().find(|(c, _)| *c == criterion) {
            Some(entry) => entry.1 = evidence,
            None => self.evidence.push((criterion, evidence)),
        }
        self
    }

    pub fn contains(&self, criterion: AcmgCriterion) -> bool {
        self.evidence.iter().any(|(c, _)| *c == criterion)
    }

    pub fn build(self) -> AcmgEvidence {
        AcmgEvidence {
            evidence: self.evidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use AcmgCriterion::*;

    #[test]
    fn test_empty_builder() {
        assert_eq!(AcmgEvidence::builder().build(), AcmgEvidence::empty());
        assert_eq!(AcmgEvidence::of([]), AcmgEvidence::empty());
        assert_eq!(AcmgEvidence::empty().to_string(), "[]");
    }

    #[test]
    fn test_default_strengths_render_bare_codes() {
        let evidence = AcmgEvidence::builder().add(Pvs1).add(Ps1).build();
        assert_eq!(evidence.to_string(), "[PVS1, PS1]");
        assert_eq!(AcmgEvidence::builder().add(Pvs1).build().to_string(), "[PVS1]");
    }

    #[test]
    fn test_modified_strengths_render_suffix() {
        let evidence = AcmgEvidence::builder()
            .add_with_evidence(Pvs1, Evidence::Strong)
            .add_with_evidence(Ps1, Evidence::Moderate)
            .add_with_evidence(Pp3, Evidence::VeryStrong)
            .build();
        assert_eq!(evidence.to_string(), "[PVS1_Strong, PS1_Moderate, PP3_VeryStrong]");
    }

    #[test]
    fn test_readding_resets_to_default() {
        let evidence = AcmgEvidence::builder()
            .add_with_evidence(Pvs1, Evidence::Strong)
            .add(Pvs1)
            .build();
        assert_eq!(evidence.get(Pvs1), Some(Evidence::VeryStrong));
        assert_eq!(evidence.to_string(), "[PVS1]");
        assert_eq!(evidence.size(), 1);
    }

    #[test]
    fn test_readding_keeps_first_position() {
        let evidence = AcmgEvidence::builder()
            .add(Ps1)
            .add(Pm2)
            .add_with_evidence(Ps1, Evidence::Supporting)
            .build();
        assert_eq!(evidence.to_string(), "[PS1_Supporting, PM2]");
    }

    #[test]
    fn test_get_absent_criterion() {
        let evidence = AcmgEvidence::builder().add(Pvs1).build();
        assert_eq!(evidence.get(Pm3), None);
        assert!(evidence.contains(Pvs1));
        assert!(!evidence.contains(Pm3));
    }

    #[test]
    fn test_builder_contains() {
        let builder = AcmgEvidence::builder().add(Pvs1);
        assert!(builder.contains(Pvs1));
        assert!(!builder.contains(Pm3));
    }

    #[test]
    fn test_size_and_empty() {
        assert_eq!(AcmgEvidence::empty().size(), 0);
        assert!(AcmgEvidence::empty().is_empty());
        let evidence = AcmgEvidence::builder().add(Pvs1).build();
        assert_eq!(evidence.size(), 1);
        assert!(!evidence.is_empty());
    }

    #[test]
    fn test_upgraded_criterion_counts_at_effective_strength() {
        let evidence = AcmgEvidence::builder()
            .add(Pvs1)
            .add_with_evidence(Pm1, Evidence::VeryStrong)
            .build();
        assert_eq!(evidence.very_strong_pathogenic_count(), 2);
        assert_eq!(evidence.moderate_pathogenic_count(), 0);
    }

    #[test]
    fn test_category_counts() {
        let evidence = AcmgEvidence::of([
            (Ps1, Evidence::Strong),
            (Pm1, Evidence::Moderate),
            (Pp1, Evidence::Supporting),
            (Ba1, Evidence::StandAlone),
            (Bs1, Evidence::Strong),
            (Bp1, Evidence::Supporting),
        ]);
        assert_eq!(evidence.very_strong_pathogenic_count(), 0);
        assert_eq!(evidence.strong_pathogenic_count(), 1);
        assert_eq!(evidence.moderate_pathogenic_count(), 1);
        assert_eq!(evidence.supporting_pathogenic_count(), 1);
        assert_eq!(evidence.standalone_benign_count(), 1);
        assert_eq!(evidence.strong_benign_count(), 1);
        assert_eq!(evidence.supporting_benign_count(), 1);
    }

    #[test]
    fn test_downgraded_benign_criterion() {
        let evidence = AcmgEvidence::builder()
            .add_with_evidence(Bs4, Evidence::Supporting)
            .build();
        assert_eq!(evidence.strong_benign_count(), 0);
        assert_eq!(evidence.supporting_benign_count(), 1);
    }

    #[test]
    fn test_criterion_table() {
        assert_eq!(AcmgCriterion::ALL.len(), 28);
        assert_eq!(Pvs1.evidence(), Evidence::VeryStrong);
        assert_eq!(Ba1.evidence(), Evidence::StandAlone);
        assert_eq!(Bp7.polarity(), Polarity::Benign);
        assert_eq!(Pp5.polarity(), Polarity::Pathogenic);
        assert_eq!(AcmgCriterion::from_code("pm2"), Some(Pm2));
        assert_eq!(AcmgCriterion::from_code("XX1"), None);
    }
}
