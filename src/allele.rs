//! Minimal allele coordinates
//!
//! Trimming follows Tan et al. 2015 (doi:10.1093/bioinformatics/btv112): alleles are right
//! trimmed, then left trimmed, and the start position is advanced by the number of bases
//! removed from the left. There is no reference sequence here, so the variant is never left
//! aligned. Coordinates are VCF style, 1-based and inclusive.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Shape of a single ref/alt allele pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlleleShape {
    Snv,
    /// Equal length multi-base substitution
    Mnv,
    Insertion,
    Deletion,
    Symbolic,
    Breakend,
}

impl AlleleShape {
    pub fn of(ref_allele: &str, alt_allele: &str) -> Self {
        if is_breakend(alt_allele) {
            AlleleShape::Breakend
        } else if is_symbolic(ref_allele, alt_allele) {
            AlleleShape::Symbolic
        } else if is_snv(ref_allele, alt_allele) {
            AlleleShape::Snv
        } else if is_insertion(ref_allele, alt_allele) {
            AlleleShape::Insertion
        } else if is_deletion(ref_allele, alt_allele) {
            AlleleShape::Deletion
        } else {
            AlleleShape::Mnv
        }
    }
}

/// Start position and alleles of a single alternate allele
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AllelePosition {
    start: u32,
    ref_allele: String,
    alt_allele: String,
}

impl AllelePosition {
    /// Exact representation of the input coordinates, no trimming applied.
    pub fn of(start: u32, ref_allele: &str, alt_allele: &str) -> Self {
        Self {
            start,
            ref_allele: ref_allele.to_string(),
            alt_allele: alt_allele.to_string(),
        }
    }

    /// Minimised representation of the input coordinates.
    ///
    /// ```
    /// use genorank_rs::AllelePosition;
    ///
    /// let trimmed = AllelePosition::trim(118887583, "TCAAAA", "TCAAAACAAAA");
    /// assert_eq!(trimmed, AllelePosition::of(118887583, "T", "TCAAAA"));
    /// ```
    pub fn trim(start: u32, ref_allele: &str, alt_allele: &str) -> Self {
        if cant_trim(ref_allele, alt_allele) {
            return Self::of(start, ref_allele, alt_allele);
        }

        let mut trim_start = start;
        let mut trim_ref = ref_allele.as_bytes();
        let mut trim_alt = alt_allele.as_bytes();

        if can_right_trim(trim_ref, trim_alt) {
            let diff = trim_ref.len() as isize - trim_alt.len() as isize;
            let mut right_idx = trim_ref.len() as isize;
            // right index stays above 1 so the scan never falls off the left end
            while right_idx > 1
                && right_idx - diff > 0
                && trim_ref[(right_idx - 1) as usize] == trim_alt[(right_idx - 1 - diff) as usize]
            {
                right_idx -= 1;
            }
            trim_ref = &trim_ref[..right_idx as usize];
            trim_alt = &trim_alt[..(right_idx - diff) as usize];
        }

        if can_left_trim(trim_ref, trim_alt) {
            let mut left_idx = 0;
            while left_idx < trim_ref.len()
                && left_idx < trim_alt.len()
                && trim_ref[left_idx] == trim_alt[left_idx]
            {
                left_idx += 1;
            }
            // keep one anchor base when a whole allele was consumed
            if (left_idx > 0 && left_idx == trim_ref.len()) || left_idx == trim_alt.len() {
                left_idx -= 1;
            }
            trim_start = trim_start.saturating_add(left_idx as u32);
            trim_ref = &trim_ref[left_idx..];
            trim_alt = &trim_alt[left_idx..];
        }

        Self {
            start: trim_start,
            ref_allele: String::from_utf8_lossy(trim_ref).into_owned(),
            alt_allele: String::from_utf8_lossy(trim_alt).into_owned(),
        }
    }

    /// 1-based inclusive start position of the allele
    pub fn start(&self) -> u32 {
        self.start
    }

    /// 1-based closed end, `start + len(ref) - 1` as defined by VCF 4.3 for precise variants.
    /// Saturates at `u32::MAX`.
    pub fn end(&self) -> u32 {
        self.start
            .saturating_add((self.ref_allele.len() as u32).saturating_sub(1))
    }

    pub fn length(&self) -> i32 {
        length(&self.ref_allele, &self.alt_allele)
    }

    pub fn ref_allele(&self) -> &str {
        &self.ref_allele
    }

    pub fn alt_allele(&self) -> &str {
        &self.alt_allele
    }

    pub fn shape(&self) -> AlleleShape {
        AlleleShape::of(&self.ref_allele, &self.alt_allele)
    }

    pub fn is_symbolic(&self) -> bool {
        is_symbolic(&self.ref_allele, &self.alt_allele)
    }

    pub fn is_breakend(&self) -> bool {
        is_breakend(&self.alt_allele)
    }
}

impl fmt::Display for AllelePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.start, self.ref_allele, self.alt_allele)
    }
}

fn cant_trim(ref_allele: &str, alt_allele: &str) -> bool {
    ref_allele.len() == 1 || alt_allele.len() == 1
}

fn can_right_trim(ref_allele: &[u8], alt_allele: &[u8]) -> bool {
    ref_allele.len() > 1 && alt_allele.len() > 1 && ref_allele.last() == alt_allele.last()
}

fn can_left_trim(ref_allele: &[u8], alt_allele: &[u8]) -> bool {
    ref_allele.len() > 1 && alt_allele.len() > 1 && ref_allele[0] == alt_allele[0]
}

pub fn is_snv(ref_allele: &str, alt_allele: &str) -> bool {
    ref_allele.len() == 1 && alt_allele.len() == 1
}

pub fn is_insertion(ref_allele: &str, alt_allele: &str) -> bool {
    ref_allele.len() < alt_allele.len()
}

pub fn is_deletion(ref_allele: &str, alt_allele: &str) -> bool {
    ref_allele.len() > alt_allele.len()
}

/// True if either allele is symbolic. VCF only puts symbolic notation in the ALT column, so
/// that is checked first.
pub fn is_symbolic(ref_allele: &str, alt_allele: &str) -> bool {
    is_symbolic_allele(alt_allele) || is_symbolic_allele(ref_allele)
}

pub fn is_symbolic_allele(allele: &str) -> bool {
    if allele.is_empty() {
        return false;
    }
    is_large_symbolic(allele) || is_single_breakend(allele) || is_mated_breakend(allele)
}

pub fn is_breakend(allele: &str) -> bool {
    is_single_breakend(allele) || is_mated_breakend(allele)
}

/// `<DEL>`, `<INS:ME:ALU>` etc.
pub fn is_large_symbolic(allele: &str) -> bool {
    (allele.len() > 1 && allele.starts_with('<')) || allele.ends_with('>')
}

/// `.A` or `G.`
pub fn is_single_breakend(allele: &str) -> bool {
    (allele.len() > 1 && allele.starts_with('.')) || allele.ends_with('.')
}

/// `G]17:198982]`, `[13:123456[T` etc.
pub fn is_mated_breakend(allele: &str) -> bool {
    allele.len() > 1 && (allele.contains('[') || allele.contains(']'))
}

/// Variant length following the VCF 4.3 LEN/SVLEN conventions: the ref length for symbolic
/// alleles and substitutions, otherwise the signed difference `len(alt) - len(ref)`.
pub fn length(ref_allele: &str, alt_allele: &str) -> i32 {
    if is_symbolic(ref_allele, alt_allele) {
        return ref_allele.len() as i32;
    }
    if alt_allele.len() == ref_allele.len() {
        return ref_allele.len() as i32;
    }
    alt_allele.len() as i32 - ref_allele.len() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_trimmed(input: (u32, &str, &str), expected: (u32, &str, &str)) {
        let trimmed = AllelePosition::trim(input.0, input.1, input.2);
        assert_eq!(
            trimmed,
            AllelePosition::of(expected.0, expected.1, expected.2),
            "trimming {:?}",
            input
        );
    }

    #[test]
    fn test_snv_is_untouched() {
        assert_trimmed((1, "A", "T"), (1, "A", "T"));
    }

    #[test]
    fn test_single_base_allele_is_untouched() {
        assert_trimmed((1, "AT", "A"), (1, "AT", "A"));
        assert_trimmed((1, "A", "AT"), (1, "A", "AT"));
        assert_trimmed((1, "", "A"), (1, "", "A"));
    }

    #[test]
    fn test_repeat_insertion_right_trimmed() {
        assert_trimmed(
            (118887583, "TCAAAA", "TCAAAACAAAA"),
            (118887583, "T", "TCAAAA"),
        );
    }

    #[test]
    fn test_deletion_right_trimmed() {
        assert_trimmed((1, "GTTT", "GTT"), (1, "GT", "G"));
        assert_trimmed((1, "ACTCT", "ACT"), (1, "ACT", "A"));
    }

    #[test]
    fn test_mnv_left_trimmed() {
        assert_trimmed((100, "ATC", "AGC"), (101, "T", "G"));
        assert_trimmed((100, "AAGT", "AACC"), (102, "GT", "CC"));
    }

    #[test]
    fn test_left_trim_keeps_anchor_base() {
        assert_trimmed((5, "AAC", "AACTT"), (7, "C", "CTT"));
        assert_trimmed((5, "CCAT", "CC"), (6, "CAT", "C"));
    }

    #[test]
    fn test_untrimmable_mnv() {
        assert_trimmed((10, "AC", "GT"), (10, "AC", "GT"));
    }

    #[test]
    fn test_trim_is_idempotent() {
        let inputs = [
            (118887583, "TCAAAA", "TCAAAACAAAA"),
            (1, "GTTT", "GTT"),
            (100, "ATC", "AGC"),
            (5, "AAC", "AACTT"),
            (10, "AC", "GT"),
            (3, "CTCT", "CT"),
            (7, "<DEL>", "A"),
            (9, "ACGTACGT", "ACGT"),
        ];
        for (start, r, a) in inputs {
            let once = AllelePosition::trim(start, r, a);
            let twice = AllelePosition::trim(once.start(), once.ref_allele(), once.alt_allele());
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_length() {
        assert_eq!(length("CGTGGATGCGGGGAC", "C"), -14);
        assert_eq!(length("C", "CTT"), 2);
        assert_eq!(length("A", "T"), 1);
        assert_eq!(length("ATGC", "CGAT"), 4);
        assert_eq!(length("T", "<DEL>"), 1);
        assert_eq!(length("C", "<INS:ME:L1>"), 1);
    }

    #[test]
    fn test_end() {
        assert_eq!(AllelePosition::of(2827694, "CGTGGATGCGGGGAC", "C").end(), 2827708);
        assert_eq!(AllelePosition::of(10, "A", "T").end(), 10);
        assert_eq!(AllelePosition::of(10, "", "T").end(), 10);
    }

    #[test]
    fn test_coordinates_saturate_at_max_position() {
        let trimmed = AllelePosition::trim(u32::MAX, "ATC", "AGC");
        assert_eq!(trimmed.start(), u32::MAX);
        assert_eq!(trimmed.ref_allele(), "T");
        assert_eq!(AllelePosition::of(u32::MAX - 1, "ACGT", "A").end(), u32::MAX);
    }

    #[test]
    fn test_symbolic_alleles() {
        assert!(is_symbolic("T", "<DEL>"));
        assert!(is_symbolic("C", "<INS:ME:L1>"));
        assert!(is_symbolic("G", "G]17:198982]"));
        assert!(is_symbolic("A", ".A"));
        assert!(is_symbolic("A", "G."));
        assert!(!is_symbolic("A", "T"));
        assert!(!is_symbolic_allele(""));
    }

    #[test]
    fn test_breakends() {
        assert!(is_breakend("]13:123456]T"));
        assert!(is_breakend("T[13:123456["));
        assert!(is_breakend(".A"));
        assert!(!is_breakend("<DEL>"));
        assert!(is_mated_breakend("[13:123456[T"));
        assert!(!is_mated_breakend("["));
    }

    #[test]
    fn test_shape() {
        assert_eq!(AlleleShape::of("A", "T"), AlleleShape::Snv);
        assert_eq!(AlleleShape::of("AC", "GT"), AlleleShape::Mnv);
        assert_eq!(AlleleShape::of("A", "AT"), AlleleShape::Insertion);
        assert_eq!(AlleleShape::of("AT", "A"), AlleleShape::Deletion);
        assert_eq!(AlleleShape::of("A", "<DUP>"), AlleleShape::Symbolic);
        assert_eq!(AlleleShape::of("G", "G]17:198982]"), AlleleShape::Breakend);
    }
}
