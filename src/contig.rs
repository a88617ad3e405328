//! Chromosome name handling. Chromosomes are numbered 1-22, X=23, Y=24, MT=25.

pub const X_CHROMOSOME: u8 = 23;
pub const Y_CHROMOSOME: u8 = 24;
pub const MT_CHROMOSOME: u8 = 25;

/// Map a contig name such as `chr7`, `X` or `MT` to its chromosome number
pub fn to_chromosome_number(name: &str) -> Option<u8> {
    let name = name.trim();
    let stripped = match name.get(..3) {
        Some(prefix) if name.len() > 3 && prefix.eq_ignore_ascii_case("chr") => &name[3..],
        _ => name,
    };

    match stripped.to_ascii_uppercase().as_str() {
        "X" => Some(X_CHROMOSOME),
        "Y" => Some(Y_CHROMOSOME),
        "M" | "MT" => Some(MT_CHROMOSOME),
        other => other
            .parse::<u8>()
            .ok()
            .filter(|n| (1..=22).contains(n)),
    }
}

pub fn chromosome_name(chromosome: u8) -> String {
    match chromosome {
        X_CHROMOSOME => "X".to_string(),
        Y_CHROMOSOME => "Y".to_string(),
        MT_CHROMOSOME => "MT".to_string(),
        n => n.to_string(),
    }
}
