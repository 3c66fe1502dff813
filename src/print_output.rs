//! Tab-separated per-variant allele support table. One row per SNV with the
//! counts of reads typed as reference, alternate, or ambiguous at that site.

use std::fs::File;
use std::io::prelude::*;
use std::io::BufWriter;

use crate::errors::*;
use crate::variants_and_reads::{Allele, Orientation, VariantTable};

/// Write the allele support table for every chromosome in the table.
/// Positions are 1-based in the output.
pub fn print_allele_support(table: &VariantTable, output_file: &str) -> Result<()> {
    let file = File::create(output_file)
        .chain_err(|| ErrorKind::FileWriteError(output_file.to_owned()))?;
    let mut writer = BufWriter::new(file);

    writeln!(
        writer,
        "chrom\tpos\tref\talt\tref_count\talt_count\tamb_count\tphase_set\torientation"
    )
    .chain_err(|| ErrorKind::FileWriteError(output_file.to_owned()))?;

    for (chrom, varlist) in table.chromosomes.iter().zip(table.variants.iter()) {
        for var in &varlist.lst {
            let mut ref_count = 0usize;
            let mut alt_count = 0usize;
            let mut amb_count = 0usize;
            for &(_, allele) in &var.reads {
                match allele {
                    Allele::Ref => ref_count += 1,
                    Allele::Alt => alt_count += 1,
                    Allele::Ambiguous => amb_count += 1,
                }
            }
            let phase_set = match var.phase_set {
                Some(ps) => format!("{}", ps + 1),
                None => ".".to_owned(),
            };
            let orientation = match var.orientation {
                Some(Orientation::RefAlt) => "0|1",
                Some(Orientation::AltRef) => "1|0",
                None => ".",
            };
            writeln!(
                writer,
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
                chrom,
                var.pos0 + 1,
                var.ref_allele,
                var.alt_allele,
                ref_count,
                alt_count,
                amb_count,
                phase_set,
                orientation
            )
            .chain_err(|| ErrorKind::FileWriteError(output_file.to_owned()))?;
        }
    }

    Ok(())
}
