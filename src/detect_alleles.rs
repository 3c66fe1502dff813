//! Per-read allele detection: walk each aligned read's CIGAR in lockstep
//! with the chromosome's variant list, realign the local window at every
//! spanned variant, filter the resulting call vector and record the
//! surviving calls into the variants' supporting-read lists.

use rust_htslib::bam;
use rust_htslib::bam::record::{Cigar, CigarStringView, Record};
use rust_htslib::bam::Read;

use crate::errors::*;
use crate::realignment::{classify, score_alleles};
use crate::util::{dna_vec, u8_to_string, SPACER};
use crate::variants_and_reads::{trim_ambiguous_ends, AlleleCall, ReadAlleles, VarList};

// reads below this mapping quality carry too little placement confidence
// to contribute linkage information
pub static MIN_MAPQ: u8 = 20;

// a read must link at least this many variants to be informative
pub static MIN_INFORMATIVE_CALLS: usize = 2;

/// One CIGAR operation together with the reference position and the read
/// (query) position at which it starts.
///
/// The indexing logic is adapted from the rust-htslib function
/// `bam::record::CigarStringView::read_pos` (MIT license,
/// copyright (c) 2016 Johannes Koester, the Rust-Htslib team).
pub struct CigarPos {
    pub cig: Cigar,
    pub ref_pos: usize,
    pub read_pos: usize,
}

fn cigar_ref_len(cig: &Cigar) -> usize {
    match *cig {
        Cigar::Match(l) | Cigar::Equal(l) | Cigar::Diff(l) | Cigar::Del(l) | Cigar::RefSkip(l) => {
            l as usize
        }
        Cigar::Ins(_) | Cigar::SoftClip(_) | Cigar::HardClip(_) | Cigar::Pad(_) => 0,
    }
}

/// Build the list of CigarPos for a read, containing every operation that
/// consumes reference or read sequence along with its start coordinates.
pub fn create_cigar_index(refpos: usize, cigar: &CigarStringView) -> Result<Vec<CigarPos>> {
    let mut rpos = refpos;
    let mut qpos = 0usize;
    let mut j = 0;

    let mut cigar_list: Vec<CigarPos> = Vec::with_capacity(cigar.len());

    // find the first operation describing read sequence; leading hard clips
    // and pads consume neither coordinate and are skipped
    for (i, c) in cigar.iter().enumerate() {
        match *c {
            Cigar::Match(_) | Cigar::Diff(_) | Cigar::Equal(_) | Cigar::Ins(_)
            | Cigar::SoftClip(_) => {
                j = i;
                break;
            }
            Cigar::Del(_) | Cigar::RefSkip(_) => {
                return Err(ErrorKind::UnexpectedCigarOperation(
                    "deletion or reference skip found before any operation describing read sequence"
                        .to_owned(),
                )
                .into());
            }
            Cigar::Pad(_) | Cigar::HardClip(_) if i == cigar.len() - 1 => {
                return Ok(cigar_list);
            }
            Cigar::Pad(_) | Cigar::HardClip(_) => {}
        }
    }

    while j < cigar.len() {
        let c = cigar[j];
        match c {
            Cigar::Match(_) | Cigar::Diff(_) | Cigar::Equal(_) | Cigar::Ins(_) | Cigar::Del(_)
            | Cigar::RefSkip(_) => {
                cigar_list.push(CigarPos {
                    cig: c,
                    ref_pos: rpos,
                    read_pos: qpos,
                });
            }
            Cigar::SoftClip(_) | Cigar::Pad(_) | Cigar::HardClip(_) => {}
        }

        match c {
            Cigar::Match(l) | Cigar::Diff(l) | Cigar::Equal(l) => {
                rpos += l as usize;
                qpos += l as usize;
            }
            Cigar::SoftClip(l) | Cigar::Ins(l) => {
                qpos += l as usize;
            }
            Cigar::Del(l) | Cigar::RefSkip(l) => {
                rpos += l as usize;
            }
            Cigar::Pad(_) => {}
            Cigar::HardClip(_) if j < cigar.len() - 1 => {
                return Err(ErrorKind::UnexpectedCigarOperation(
                    "hard clip found in between operations".to_owned(),
                )
                .into());
            }
            Cigar::HardClip(_) => {}
        }
        j += 1;
    }

    Ok(cigar_list)
}

/// Interval walker: a cursor over a read's CigarPos list that translates
/// target reference positions into query coordinates.
///
/// The cursor index only ever advances, so mapping a read's variants in
/// increasing position order costs O(operations + variants) for the whole
/// read rather than their product. One cursor is built per read; the state
/// is never shared across reads.
pub struct CigarCursor {
    ops: Vec<CigarPos>,
    i: usize,
}

impl CigarCursor {
    pub fn new(record: &Record) -> Result<CigarCursor> {
        let ops = create_cigar_index(record.pos() as usize, &record.cigar())?;
        Ok(CigarCursor { ops, i: 0 })
    }

    /// Map a target reference position (0-based) to the query coordinate
    /// aligned to it, under the half-open `[start, start+len)` convention
    /// per operation. A position inside a deletion or reference skip maps
    /// to the query coordinate immediately preceding the gap. Targets must
    /// be visited in non-decreasing order; a target outside the read's
    /// reference span is an error, never a panic.
    pub fn query_pos(&mut self, pos0: usize) -> Result<usize> {
        while self.i < self.ops.len() {
            let op = &self.ops[self.i];
            let ref_len = cigar_ref_len(&op.cig);
            if ref_len == 0 {
                // insertions consume no reference and never contain the target
                self.i += 1;
                continue;
            }
            if pos0 < op.ref_pos {
                // before the read start, or the caller walked backwards
                return Err(ErrorKind::TargetOutsideReadSpan(pos0).into());
            }
            if pos0 < op.ref_pos + ref_len {
                return match op.cig {
                    Cigar::Del(_) | Cigar::RefSkip(_) => Ok(op.read_pos.saturating_sub(1)),
                    _ => Ok(op.read_pos + (pos0 - op.ref_pos)),
                };
            }
            self.i += 1;
        }
        Err(ErrorKind::TargetOutsideReadSpan(pos0).into())
    }
}

/// Detect the alleles supported by one aligned read at every variant it
/// spans. Returns `Ok(None)` for the frequent, normal cases where the read
/// spans no variant or carries fewer than two informative calls after
/// filtering; errors indicate an unusable alignment and the caller decides
/// whether to skip.
pub fn detect_read(record: &Record, varlist: &VarList, ref_seq: &[char]) -> Result<Option<ReadAlleles>> {
    let start = record.pos() as usize;
    let end = record.cigar().end_pos() as usize;

    let first = varlist.first_var_at(start);
    if first >= varlist.lst.len() || varlist.lst[first].pos0 >= end {
        return Ok(None);
    }

    let read_seq: Vec<char> = dna_vec(&record.seq().as_bytes());
    if read_seq.is_empty() {
        return Ok(None);
    }
    let mut cursor = CigarCursor::new(record)?;

    let mut calls: Vec<AlleleCall> = vec![];
    let mut i = first;
    while i < varlist.lst.len() && varlist.lst[i].pos0 < end {
        let var = &varlist.lst[i];
        // the alignment may claim reference positions the loaded contig does
        // not have, e.g. a VCF/BAM pair from a longer reference build
        if var.pos0 >= ref_seq.len() {
            return Err(ErrorKind::VariantOutsideContig(var.pos0).into());
        }
        let qpos = cursor.query_pos(var.pos0)?;
        let (ref_cost, alt_cost) = score_alleles(
            &read_seq,
            qpos,
            ref_seq,
            var.pos0,
            var.ref_allele,
            var.alt_allele,
        );
        calls.push(AlleleCall {
            qpos,
            var_ix: i,
            allele: classify(ref_cost, alt_cost),
        });
        i += 1;
    }

    let calls = trim_ambiguous_ends(calls);
    if calls.len() < MIN_INFORMATIVE_CALLS {
        return Ok(None);
    }

    Ok(Some(ReadAlleles {
        id: u8_to_string(record.qname()),
        calls,
    }))
}

fn keep_record(record: &Record) -> bool {
    !(record.is_unmapped()
        || record.is_secondary()
        || record.is_supplementary()
        || record.is_duplicate()
        || record.is_quality_check_failed()
        || record.mapq() < MIN_MAPQ)
}

/// Stream the chromosome's aligned reads and collect every informative
/// read's allele vector, recording its calls into the variants'
/// supporting-read lists as we go. A read is recorded fully or not at all:
/// the call filter runs to completion before any VarList mutation.
pub fn detect_alleles(
    bam: &mut bam::IndexedReader,
    chrom: &str,
    varlist: &mut VarList,
    ref_seq: &[char],
) -> Result<Vec<ReadAlleles>> {
    let mut reads: Vec<ReadAlleles> = vec![];

    let (tid, tlen) = {
        let header = bam.header();
        let tid = match header.tid(chrom.as_bytes()) {
            Some(t) => t,
            None => {
                eprintln!(
                    "{} WARNING: chromosome {} is not present in the BAM header, skipping",
                    SPACER, chrom
                );
                return Ok(reads);
            }
        };
        let tlen = header.target_len(tid).unwrap_or(ref_seq.len() as u64);
        (tid, tlen)
    };

    bam.fetch((tid, 0i64, tlen as i64))
        .map_err(|e| ErrorKind::IndexedBamFetchError(chrom.to_owned(), e.to_string()))?;

    for r in bam.records() {
        let record = r.map_err(|e| ErrorKind::IndexedBamRecordReadError(e.to_string()))?;
        if !keep_record(&record) {
            continue;
        }

        match detect_read(&record, varlist, ref_seq) {
            Ok(Some(read_alleles)) => {
                let read_ix = reads.len();
                varlist.add_read_calls(read_ix, &read_alleles);
                reads.push(read_alleles);
            }
            Ok(None) => {}
            Err(e) => {
                // unusable alignment; one bad record must not end the scan
                eprintln!(
                    "{} WARNING: skipping read {} on {}: {}",
                    SPACER,
                    u8_to_string(record.qname()),
                    chrom,
                    e
                );
            }
        }
    }

    Ok(reads)
}
