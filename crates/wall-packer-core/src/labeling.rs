//! Category letters and progressive numbers.
//!
//! Standards take their letter straight from the catalog's width map.
//! Customs are clustered by dimensions (5 mm tolerance on both axes) and the
//! clusters are lettered from the first letter after the standard range:
//! largest population first, ties broken by larger width, then larger
//! height, then first appearance. After 'Z' the sequence continues with
//! 'AA', 'AB', …. Within every category the pieces are numbered 1..N in
//! placement order; the caller passes both lists already row-major sorted.

use std::collections::HashMap;

use tracing::warn;

use crate::config::{BlockCatalog, EngineConfig};
use crate::model::{CustomPiece, StandardBlock};

/// Categories addressable before the extended letter space runs out
/// (A..Z then AA..ZZ).
const LETTER_SPACE: usize = 26 + 26 * 26;

fn letter_at(index: usize) -> String {
    if index < 26 {
        return char::from(b'A' + index as u8).to_string();
    }
    let ext = index - 26;
    if ext < 26 * 26 {
        let first = char::from(b'A' + (ext / 26) as u8);
        let second = char::from(b'A' + (ext % 26) as u8);
        return format!("{first}{second}");
    }
    // Letter space exhausted; not expected outside pathological inputs.
    warn!(index, "category letter space exhausted, truncating to 'Z'");
    "Z".to_string()
}

fn letter_index(c: char) -> usize {
    (c as u8).saturating_sub(b'A') as usize
}

struct Cluster {
    width_mm: f64,
    height_mm: f64,
    members: Vec<usize>,
}

/// Assign category letters and 1-based progressive numbers to every block.
/// Never fails: widths missing from the catalog map fall back to the nearest
/// catalog letter.
pub fn assign_labels(
    standards: &mut [StandardBlock],
    customs: &mut [CustomPiece],
    catalog: &BlockCatalog,
    cfg: &EngineConfig,
) {
    let mut counters: HashMap<String, u32> = HashMap::new();
    let mut next_number = |category: &str| -> u32 {
        let n = counters.entry(category.to_string()).or_insert(0);
        *n += 1;
        *n
    };

    for block in standards.iter_mut() {
        let letter = match catalog.letter_for(block.width_mm) {
            Some(c) => c,
            None => catalog.nearest_letter(f64::from(block.width_mm)),
        };
        block.category = letter.to_string();
        block.number = next_number(&block.category);
    }

    // Cluster customs by dimensions, first member fixing the class.
    let mut clusters: Vec<Cluster> = Vec::new();
    for (i, custom) in customs.iter().enumerate() {
        let found = clusters.iter_mut().find(|cl| {
            (custom.width_mm - cl.width_mm).abs() <= cfg.dim_tol_mm
                && (custom.height_mm - cl.height_mm).abs() <= cfg.dim_tol_mm
        });
        match found {
            Some(cl) => cl.members.push(i),
            None => clusters.push(Cluster {
                width_mm: custom.width_mm.round(),
                height_mm: custom.height_mm.round(),
                members: vec![i],
            }),
        }
    }

    // Largest population first; ties by larger width, larger height, then
    // first appearance (clusters are already in first-appearance order).
    let mut order: Vec<usize> = (0..clusters.len()).collect();
    order.sort_by(|&a, &b| {
        let (ca, cb) = (&clusters[a], &clusters[b]);
        cb.members
            .len()
            .cmp(&ca.members.len())
            .then_with(|| cb.width_mm.total_cmp(&ca.width_mm))
            .then_with(|| cb.height_mm.total_cmp(&ca.height_mm))
            .then_with(|| a.cmp(&b))
    });

    let first_custom_index = catalog
        .size_to_letter
        .values()
        .map(|c| letter_index(*c))
        .max()
        .map(|i| i + 1)
        .unwrap_or(0);

    for (rank, cluster_idx) in order.into_iter().enumerate() {
        let index = first_custom_index + rank;
        let letter = if index < LETTER_SPACE {
            letter_at(index)
        } else {
            letter_at(LETTER_SPACE) // logs and yields the truncated 'Z'
        };
        for &member in &clusters[cluster_idx].members {
            customs[member].category = letter.clone();
            customs[member].number = next_number(&letter);
        }
    }
}
