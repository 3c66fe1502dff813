//! Comparative realignment of a read window against the REF-allele and
//! ALT-allele hypotheses, using a banded edit-distance computation.
//!
//! A single base lookup at the variant position is unreliable near indels
//! and local misalignment, so a window of the read around the mapped query
//! coordinate is aligned against both allele hypotheses and the cheaper
//! alignment wins. Everything here is deterministic and side-effect-free.

use crate::variants_and_reads::Allele;

// bases taken on each side of the variant when building alignment windows
pub static WINDOW_PAD: usize = 10;

// minimum band width for the banded edit-distance DP; the band is widened
// by the length difference of the two sequences so the end cell stays
// reachable
pub static MIN_BAND_WIDTH: usize = 20;

const BIG_COST: u32 = u32::MAX / 2;

/// Banded Levenshtein distance between `v` and `w`. Cells outside the band
/// are treated as unreachable; the band follows the main diagonal with
/// width `min_band_width + |len(v) - len(w)|`.
pub fn banded_edit_distance(v: &[char], w: &[char], min_band_width: usize) -> u32 {
    if v.is_empty() {
        return w.len() as u32;
    }
    if w.is_empty() {
        return v.len() as u32;
    }

    let len_diff = ((v.len() as i64) - (w.len() as i64)).abs() as usize;
    let band_width = min_band_width + len_diff;

    let mut prev: Vec<u32> = (0..w.len() + 1).map(|j| j as u32).collect();

    for i in 1..v.len() + 1 {
        let band_middle = (w.len() * i) / v.len();
        let band_start = if band_middle >= band_width / 2 {
            band_middle - band_width / 2
        } else {
            0
        };
        let band_end = if band_middle + band_width / 2 <= w.len() {
            band_middle + band_width / 2
        } else {
            w.len()
        };

        let mut curr: Vec<u32> = vec![BIG_COST; w.len() + 1];
        if band_start == 0 {
            curr[0] = i as u32;
        }
        let first_j = if band_start > 0 { band_start } else { 1 };
        for j in first_j..band_end + 1 {
            let sub_cost = if v[i - 1] == w[j - 1] { 0 } else { 1 };
            let sub = prev[j - 1].saturating_add(sub_cost);
            let del = prev[j].saturating_add(1);
            let ins = curr[j - 1].saturating_add(1);
            curr[j] = sub.min(del).min(ins);
        }
        prev = curr;
    }

    prev[w.len()]
}

/// Score a read against the two allele hypotheses at one variant.
///
/// `qpos` is the query coordinate aligned to the variant's reference
/// position `pos0` (from the interval walker). Windows of up to
/// `WINDOW_PAD` bases on each side are clamped symmetrically on the read
/// and the reference so the variant stays centered in both; the REF
/// hypothesis carries `ref_allele` at the center and the ALT hypothesis
/// `alt_allele`. Returns `(ref_cost, alt_cost)`; lower cost = better fit.
pub fn score_alleles(
    read_seq: &[char],
    qpos: usize,
    ref_seq: &[char],
    pos0: usize,
    ref_allele: char,
    alt_allele: char,
) -> (u32, u32) {
    debug_assert!(qpos < read_seq.len());
    debug_assert!(pos0 < ref_seq.len());

    let left = WINDOW_PAD.min(qpos).min(pos0);
    let right = WINDOW_PAD
        .min(read_seq.len() - 1 - qpos)
        .min(ref_seq.len() - 1 - pos0);

    let read_window = &read_seq[qpos - left..qpos + right + 1];

    let mut ref_window: Vec<char> = ref_seq[pos0 - left..pos0 + right + 1].to_vec();
    let mut alt_window = ref_window.clone();
    ref_window[left] = ref_allele;
    alt_window[left] = alt_allele;

    let ref_cost = banded_edit_distance(read_window, &ref_window, MIN_BAND_WIDTH);
    let alt_cost = banded_edit_distance(read_window, &alt_window, MIN_BAND_WIDTH);
    (ref_cost, alt_cost)
}

/// Verdict rule: lower cost wins, a tie is ambiguous.
pub fn classify(ref_cost: u32, alt_cost: u32) -> Allele {
    if ref_cost < alt_cost {
        Allele::Ref
    } else if ref_cost > alt_cost {
        Allele::Alt
    } else {
        Allele::Ambiguous
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::dna_vec;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_edit_distance_identical() {
        let a = chars("ACGTACGT");
        assert_eq!(banded_edit_distance(&a, &a, MIN_BAND_WIDTH), 0);
    }

    #[test]
    fn test_edit_distance_empty() {
        let a = chars("ACGT");
        assert_eq!(banded_edit_distance(&a, &[], MIN_BAND_WIDTH), 4);
        assert_eq!(banded_edit_distance(&[], &a, MIN_BAND_WIDTH), 4);
    }

    #[test]
    fn test_edit_distance_substitution() {
        let a = chars("ACGTACGT");
        let b = chars("ACGAACGT");
        assert_eq!(banded_edit_distance(&a, &b, MIN_BAND_WIDTH), 1);
    }

    #[test]
    fn test_edit_distance_indel() {
        let a = chars("ACGTACGT");
        let b = chars("ACGACGT"); // one base deleted
        assert_eq!(banded_edit_distance(&a, &b, MIN_BAND_WIDTH), 1);
        assert_eq!(banded_edit_distance(&b, &a, MIN_BAND_WIDTH), 1);
    }

    #[test]
    fn test_edit_distance_symmetric_args() {
        let a = chars("AACGTTAGCA");
        let b = chars("ACGTAGCAAA");
        assert_eq!(
            banded_edit_distance(&a, &b, MIN_BAND_WIDTH),
            banded_edit_distance(&b, &a, MIN_BAND_WIDTH)
        );
    }

    // reference with a non-repetitive local context around position 50
    fn test_ref() -> Vec<char> {
        let mut r = dna_vec(b"ACGT").repeat(30);
        let ctx = chars("GATTACAGGCATTCGAGCTTA");
        r[40..40 + ctx.len()].copy_from_slice(&ctx);
        r
    }

    #[test]
    fn test_read_matching_ref_scores_ref() {
        let ref_seq = test_ref();
        let read: Vec<char> = ref_seq[30..70].to_vec();
        let (ref_cost, alt_cost) = score_alleles(&read, 20, &ref_seq, 50, ref_seq[50], 'T');
        assert!(ref_cost < alt_cost);
        assert_eq!(classify(ref_cost, alt_cost), Allele::Ref);
    }

    #[test]
    fn test_read_matching_alt_scores_alt() {
        let ref_seq = test_ref();
        let mut read: Vec<char> = ref_seq[30..70].to_vec();
        read[20] = 'T';
        assert_ne!(ref_seq[50], 'T');
        let (ref_cost, alt_cost) = score_alleles(&read, 20, &ref_seq, 50, ref_seq[50], 'T');
        assert!(alt_cost < ref_cost);
        assert_eq!(classify(ref_cost, alt_cost), Allele::Alt);
    }

    #[test]
    fn test_unreadable_base_is_ambiguous() {
        let ref_seq = test_ref();
        let mut read: Vec<char> = ref_seq[30..70].to_vec();
        read[20] = 'N'; // matches neither hypothesis
        let (ref_cost, alt_cost) = score_alleles(&read, 20, &ref_seq, 50, ref_seq[50], 'T');
        assert_eq!(ref_cost, alt_cost);
        assert_eq!(classify(ref_cost, alt_cost), Allele::Ambiguous);
    }

    #[test]
    fn test_window_clamped_at_sequence_ends() {
        let ref_seq = test_ref();
        let read: Vec<char> = ref_seq[0..30].to_vec();
        // variant at the very first read base; windows must clamp, not panic
        let (ref_cost, alt_cost) = score_alleles(&read, 0, &ref_seq, 0, ref_seq[0], 'T');
        assert_eq!(classify(ref_cost, alt_cost), Allele::Ref);
    }

    #[test]
    fn test_verdict_symmetry() {
        // swapping which hypothesis is "ref" must mirror the verdict
        let ref_seq = test_ref();
        let read: Vec<char> = ref_seq[30..70].to_vec();
        let alt = 'T';
        let (rc, ac) = score_alleles(&read, 20, &ref_seq, 50, ref_seq[50], alt);
        let (rc2, ac2) = score_alleles(&read, 20, &ref_seq, 50, alt, ref_seq[50]);
        assert_eq!(rc, ac2);
        assert_eq!(ac, rc2);
        let mirrored = match classify(rc2, ac2) {
            Allele::Ref => Allele::Alt,
            Allele::Alt => Allele::Ref,
            Allele::Ambiguous => Allele::Ambiguous,
        };
        assert_eq!(classify(rc, ac), mirrored);
    }
}
