#![allow(dead_code)]

#[macro_use]
extern crate error_chain;

mod detect_alleles;
mod errors;
mod group_variants;
mod input_data;
mod print_output;
mod realignment;
mod util;
mod variants_and_reads;

use clap::{App, Arg};

use crate::errors::*;
use crate::util::{print_time, SPACER};

fn main() {
    if let Err(ref e) = run() {
        eprintln!("{} ERROR: {}", print_time(), e);
        for e in e.iter().skip(1) {
            eprintln!("{} caused by: {}", SPACER, e);
        }
        if let Some(backtrace) = e.backtrace() {
            eprintln!("{} backtrace: {:?}", SPACER, backtrace);
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let input_args = App::new("snphase")
        .version("0.1.0")
        .about("Per-read allele typing at heterozygous SNVs by local realignment")
        .arg(
            Arg::with_name("Input BAM")
                .short("b")
                .long("bam")
                .value_name("BAM")
                .help("Sorted, indexed BAM file with aligned reads")
                .display_order(10)
                .required(true)
                .takes_value(true),
        )
        .arg(
            Arg::with_name("Input FASTA")
                .short("r")
                .long("ref")
                .value_name("FASTA")
                .help("Indexed FASTA reference the reads were aligned to")
                .display_order(20)
                .required(true)
                .takes_value(true),
        )
        .arg(
            Arg::with_name("Input VCF")
                .short("v")
                .long("vcf")
                .value_name("VCF")
                .help("VCF file with heterozygous SNVs to type")
                .display_order(30)
                .required(true)
                .takes_value(true),
        )
        .arg(
            Arg::with_name("Output file")
                .short("o")
                .long("out")
                .value_name("FILE")
                .help("Write a per-variant allele support table to this file")
                .display_order(40)
                .takes_value(true),
        )
        .arg(
            Arg::with_name("Chromosome")
                .short("c")
                .long("chrom")
                .value_name("CHROM")
                .help("Only process variants on this chromosome")
                .display_order(50)
                .takes_value(true),
        )
        .get_matches();

    // clap guarantees the required arguments are present
    let bam_file = input_args.value_of("Input BAM").unwrap().to_owned();
    let fasta_file = input_args.value_of("Input FASTA").unwrap().to_owned();
    let vcf_file = input_args.value_of("Input VCF").unwrap().to_owned();
    let output_file = input_args.value_of("Output file").map(|s| s.to_owned());
    let chrom_filter = input_args.value_of("Chromosome");

    eprintln!("{} Reading variants from VCF...", print_time());
    let mut table = input_data::read_vcf(&vcf_file, chrom_filter)?;
    let total: usize = table.variants.iter().map(|v| v.lst.len()).sum();
    eprintln!(
        "{} {} SNVs on {} chromosome(s).",
        SPACER,
        total,
        table.chromosomes.len()
    );

    let mut fasta = input_data::open_fasta(&fasta_file)?;
    let mut bam = input_data::open_bam(&bam_file)?;

    for i in 0..table.chromosomes.len() {
        let chrom = table.chromosomes[i].clone();
        let varlist = &mut table.variants[i];
        eprintln!(
            "{} Typing alleles at {} SNVs on chromosome {}...",
            print_time(),
            varlist.lst.len(),
            chrom
        );

        let contig = match input_data::read_contig(&mut fasta, &chrom) {
            Ok(seq) => seq,
            Err(e) => {
                eprintln!(
                    "{} WARNING: skipping chromosome {}: {}",
                    SPACER, chrom, e
                );
                continue;
            }
        };

        let reads = detect_alleles::detect_alleles(&mut bam, &chrom, varlist, &contig)?;
        varlist.assert_sorted();

        let n_calls: usize = reads
            .iter()
            .map(|r| {
                r.calls
                    .iter()
                    .filter(|c| c.allele != variants_and_reads::Allele::Ambiguous)
                    .count()
            })
            .sum();
        let groups = varlist.groups();
        eprintln!(
            "{} {} informative reads, {} allele calls, {} variant group(s).",
            SPACER,
            reads.len(),
            n_calls,
            groups.len()
        );
    }

    if let Some(out) = output_file {
        eprintln!("{} Writing allele support table to {}...", print_time(), out);
        print_output::print_allele_support(&table, &out)?;
    }

    eprintln!("{} Done.", print_time());
    Ok(())
}
