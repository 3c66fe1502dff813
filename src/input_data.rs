//! External input adapters: VCF variant ingestion, indexed FASTA access and
//! indexed BAM opening. Opening failures are configuration errors and fatal;
//! unusable records (multi-base or multi-allelic variants) are skipped, and
//! a chromosome missing from the FASTA surfaces as an error kind the caller
//! may downgrade to a skip.

use bio::io::fasta;
use hashbrown::HashMap;
use rust_htslib::bam;
use rust_htslib::bcf;
use rust_htslib::bcf::Read;

use crate::errors::*;
use crate::util::{dna_vec, u8_to_string};
use crate::variants_and_reads::{Var, VarList, VariantTable};

/// Read the single-nucleotide variants from a VCF/BCF file, optionally
/// restricted to one chromosome. Multi-allelic and multi-base records are
/// filtered out here; the remaining variants are grouped per chromosome in
/// first-appearance order and each chromosome's list is sorted once.
pub fn read_vcf(vcf_file: &str, chrom_filter: Option<&str>) -> Result<VariantTable> {
    let mut vcf =
        bcf::Reader::from_path(vcf_file).map_err(|e| ErrorKind::VcfOpenError(e.to_string()))?;

    // chromosome names are per-record rids into the header dictionary
    let mut rid_names: Vec<String> = vec![];
    {
        let header = vcf.header();
        for rid in 0..header.contig_count() {
            let name = header
                .rid2name(rid)
                .map_err(|e| ErrorKind::VcfReadError(e.to_string()))?;
            rid_names.push(u8_to_string(name));
        }
    }

    let mut chromosomes: Vec<String> = vec![];
    let mut variants: Vec<Vec<Var>> = vec![];
    let mut chrom_slots: HashMap<String, usize> = HashMap::new();

    for r in vcf.records() {
        let record = r.map_err(|e| ErrorKind::VcfReadError(e.to_string()))?;
        let rid = match record.rid() {
            Some(rid) => rid as usize,
            None => continue,
        };
        if rid >= rid_names.len() {
            continue;
        }
        let chrom = &rid_names[rid];
        if let Some(c) = chrom_filter {
            if chrom != c {
                continue;
            }
        }

        let alleles = record.alleles();
        if alleles.len() != 2 || alleles[0].len() != 1 || alleles[1].len() != 1 {
            continue; // only biallelic single-base variants are phaseable here
        }
        let ref_allele = (alleles[0][0] as char).to_ascii_uppercase();
        let alt_allele = (alleles[1][0] as char).to_ascii_uppercase();
        let pos0 = record.pos() as usize;

        let slot = match chrom_slots.get(chrom) {
            Some(&s) => s,
            None => {
                chromosomes.push(chrom.clone());
                variants.push(vec![]);
                chrom_slots.insert(chrom.clone(), chromosomes.len() - 1);
                chromosomes.len() - 1
            }
        };
        variants[slot].push(Var {
            ix: 0,
            pos0,
            ref_allele,
            alt_allele,
            reads: vec![],
            phase_set: None,
            orientation: None,
        });
    }

    if chromosomes.is_empty() {
        bail!(ErrorKind::NoVariantsError);
    }

    Ok(VariantTable {
        chromosomes,
        variants: variants.into_iter().map(VarList::new).collect(),
    })
}

/// Open an indexed FASTA file. A missing .fai index is a configuration
/// error, reported once.
pub fn open_fasta(fasta_file: &str) -> Result<fasta::IndexedReader<std::fs::File>> {
    fasta::IndexedReader::from_file(&fasta_file)
        .map_err(|e| ErrorKind::IndexedFastaOpenError(e.to_string()).into())
}

/// Fetch one chromosome's full sequence as an uppercase DNA vector.
/// A chromosome absent from the index comes back as an error kind; the
/// orchestration layer decides whether that skips the chromosome.
pub fn read_contig(
    fasta: &mut fasta::IndexedReader<std::fs::File>,
    chrom: &str,
) -> Result<Vec<char>> {
    fasta
        .fetch_all(chrom)
        .map_err(|e| ErrorKind::IndexedFastaReadError(chrom.to_owned(), e.to_string()))?;
    let mut seq: Vec<u8> = vec![];
    fasta
        .read(&mut seq)
        .map_err(|e| ErrorKind::IndexedFastaReadError(chrom.to_owned(), e.to_string()))?;
    Ok(dna_vec(&seq))
}

/// Open an indexed BAM file. A missing .bai index is a configuration error,
/// reported once.
pub fn open_bam(bam_file: &str) -> Result<bam::IndexedReader> {
    bam::IndexedReader::from_path(bam_file)
        .map_err(|e| ErrorKind::IndexedBamOpenError(e.to_string()).into())
}
