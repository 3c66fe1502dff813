//! Data structures tying variants and reads together: the per-chromosome
//! variant list, per-read allele calls, the call filter, and the reverse
//! index from variants to their supporting reads.

use crate::group_variants::Group;

/// Which allele a read supports at one variant site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Allele {
    Ref,
    Alt,
    /// the realignment could not distinguish the two hypotheses
    Ambiguous,
}

/// Phased genotype orientation, filled in by the downstream phasing stage.
/// `RefAlt` corresponds to 0|1 and `AltRef` to 1|0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    RefAlt,
    AltRef,
}

/// A single-nucleotide variant on one chromosome.
#[derive(Debug, Clone)]
pub struct Var {
    pub ix: usize, // index of this variant in its chromosome's VarList
    pub pos0: usize, // 0-based reference position
    pub ref_allele: char,
    pub alt_allele: char,
    /// reads supporting this site: (index into the chromosome's read list, verdict).
    /// Appended to only by `VarList::add_read_calls`.
    pub reads: Vec<(usize, Allele)>,
    /// phase set identifier, assigned by the phasing stage
    pub phase_set: Option<usize>,
    /// genotype orientation, assigned by the phasing stage
    pub orientation: Option<Orientation>,
}

/// One allele call made for one read at one variant. Ephemeral: lives only
/// until the read's call vector is filtered and either kept or discarded.
#[derive(Debug, Clone, Copy)]
pub struct AlleleCall {
    pub qpos: usize, // query (read) coordinate the call was anchored at
    pub var_ix: usize, // index into the chromosome's VarList
    pub allele: Allele,
}

/// The filtered allele-call vector of one informative read,
/// in increasing variant order.
#[derive(Debug, Clone)]
pub struct ReadAlleles {
    pub id: String,
    pub calls: Vec<AlleleCall>,
}

/// All variants of one chromosome, sorted by position.
#[derive(Debug, Clone)]
pub struct VarList {
    pub lst: Vec<Var>,
}

impl VarList {
    /// Sort the variants by position, drop duplicate positions (keeping the
    /// first occurrence) and assign indices. The list is never re-sorted
    /// afterwards: positions stay strictly increasing for the lifetime of
    /// the chromosome pass.
    pub fn new(mut lst: Vec<Var>) -> VarList {
        lst.sort_by_key(|v| v.pos0);
        lst.dedup_by_key(|v| v.pos0);
        for i in 0..lst.len() {
            lst[i].ix = i;
        }
        let v = VarList { lst };
        v.assert_sorted();
        v
    }

    pub fn assert_sorted(&self) {
        for i in 1..self.lst.len() {
            assert!(self.lst[i - 1].pos0 < self.lst[i].pos0);
            assert_eq!(self.lst[i].ix, i);
        }
    }

    /// Index of the first variant with `pos0 >= pos`
    /// (`lst.len()` if there is none).
    pub fn first_var_at(&self, pos: usize) -> usize {
        self.lst.partition_point(|v| v.pos0 < pos)
    }

    /// Reverse indexer: record one kept read's calls into the supporting-read
    /// lists of every variant it was called at. The caller must have run the
    /// call filter first; interior ambiguous calls are recorded as gaps.
    pub fn add_read_calls(&mut self, read_ix: usize, read: &ReadAlleles) {
        for call in &read.calls {
            self.lst[call.var_ix].reads.push((read_ix, call.allele));
        }
    }

    pub fn groups(&self) -> Vec<Group> {
        crate::group_variants::group_variants(self)
    }
}

/// The variant sets of all chromosomes, in VCF first-appearance order.
pub struct VariantTable {
    pub chromosomes: Vec<String>,
    pub variants: Vec<VarList>,
}

/// Call filter: drop ambiguous calls from both ends of the vector, keeping
/// the minimal inner slice whose first and last entries are informative.
/// Ambiguous calls strictly between two informative calls are retained.
pub fn trim_ambiguous_ends(calls: Vec<AlleleCall>) -> Vec<AlleleCall> {
    let first = calls.iter().position(|c| c.allele != Allele::Ambiguous);
    let last = calls.iter().rposition(|c| c.allele != Allele::Ambiguous);
    match (first, last) {
        (Some(f), Some(l)) => calls[f..l + 1].to_vec(),
        _ => vec![],
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    pub fn test_var(pos0: usize, ref_allele: char, alt_allele: char) -> Var {
        Var {
            ix: 0,
            pos0,
            ref_allele,
            alt_allele,
            reads: vec![],
            phase_set: None,
            orientation: None,
        }
    }

    fn call(var_ix: usize, allele: Allele) -> AlleleCall {
        AlleleCall {
            qpos: 0,
            var_ix,
            allele,
        }
    }

    #[test]
    fn test_varlist_sorts_and_indexes() {
        let vlst = VarList::new(vec![
            test_var(300, 'C', 'T'),
            test_var(100, 'A', 'G'),
            test_var(200, 'G', 'A'),
        ]);
        let positions: Vec<usize> = vlst.lst.iter().map(|v| v.pos0).collect();
        assert_eq!(positions, vec![100, 200, 300]);
        vlst.assert_sorted();
    }

    #[test]
    fn test_varlist_drops_duplicate_positions() {
        let vlst = VarList::new(vec![
            test_var(100, 'A', 'G'),
            test_var(100, 'A', 'T'),
            test_var(200, 'G', 'A'),
        ]);
        assert_eq!(vlst.lst.len(), 2);
        assert_eq!(vlst.lst[0].alt_allele, 'G'); // first occurrence wins
    }

    #[test]
    fn test_first_var_at() {
        let vlst = VarList::new(vec![
            test_var(100, 'A', 'G'),
            test_var(200, 'G', 'A'),
            test_var(300, 'C', 'T'),
        ]);
        assert_eq!(vlst.first_var_at(0), 0);
        assert_eq!(vlst.first_var_at(100), 0);
        assert_eq!(vlst.first_var_at(101), 1);
        assert_eq!(vlst.first_var_at(300), 2);
        assert_eq!(vlst.first_var_at(301), 3);
    }

    #[test]
    fn test_add_read_calls_preserves_order() {
        let mut vlst = VarList::new(vec![test_var(100, 'A', 'G'), test_var(200, 'G', 'A')]);
        let read = ReadAlleles {
            id: "read1".to_string(),
            calls: vec![call(0, Allele::Ref), call(1, Allele::Alt)],
        };
        vlst.add_read_calls(7, &read);
        assert_eq!(vlst.lst[0].reads, vec![(7, Allele::Ref)]);
        assert_eq!(vlst.lst[1].reads, vec![(7, Allele::Alt)]);
        vlst.assert_sorted(); // mutation never reorders
    }

    #[test]
    fn test_trim_ambiguous_ends_trims_both_sides() {
        let calls = vec![
            call(0, Allele::Ambiguous),
            call(1, Allele::Ref),
            call(2, Allele::Ambiguous),
            call(3, Allele::Alt),
            call(4, Allele::Ambiguous),
        ];
        let trimmed = trim_ambiguous_ends(calls);
        let alleles: Vec<Allele> = trimmed.iter().map(|c| c.allele).collect();
        // the interior ambiguous call is real gap information and stays
        assert_eq!(alleles, vec![Allele::Ref, Allele::Ambiguous, Allele::Alt]);
    }

    #[test]
    fn test_trim_ambiguous_ends_idempotent() {
        let calls = vec![
            call(0, Allele::Ambiguous),
            call(1, Allele::Ref),
            call(2, Allele::Alt),
        ];
        let once = trim_ambiguous_ends(calls);
        let twice = trim_ambiguous_ends(once.clone());
        assert_eq!(once.len(), twice.len());
        for (a, b) in once.iter().zip(twice.iter()) {
            assert_eq!(a.var_ix, b.var_ix);
            assert_eq!(a.allele, b.allele);
        }
    }

    #[test]
    fn test_trim_ambiguous_ends_all_ambiguous() {
        let calls = vec![call(0, Allele::Ambiguous), call(1, Allele::Ambiguous)];
        assert!(trim_ambiguous_ends(calls).is_empty());
    }
}
