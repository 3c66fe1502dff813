//! errors
//!
//! defines the custom errors used throughout the crate with error-chain.
//! Configuration errors (unopenable or unindexed input files, empty variant
//! set) are fatal; CIGAR and walker errors are downgraded to per-read skips
//! by the orchestration layer.

error_chain! {
    errors {
        // Indexed BAM errors
        IndexedBamOpenError(msg: String) {
            description("error opening indexed BAM file")
            display("error opening indexed BAM file: {}", msg)
        }
        IndexedBamFetchError(chrom: String, msg: String) {
            description("error fetching region from indexed BAM file")
            display("error fetching chromosome {} from indexed BAM file: {}", chrom, msg)
        }
        IndexedBamRecordReadError(msg: String) {
            description("error reading BAM record")
            display("error reading BAM record: {}", msg)
        }
        // Indexed FASTA errors
        IndexedFastaOpenError(msg: String) {
            description("error opening indexed FASTA file")
            display("error opening indexed FASTA file: {}", msg)
        }
        IndexedFastaReadError(chrom: String, msg: String) {
            description("error reading indexed FASTA file")
            display("error reading chromosome {} from indexed FASTA file: {}", chrom, msg)
        }
        // VCF errors
        VcfOpenError(msg: String) {
            description("error opening VCF file")
            display("error opening VCF file: {}", msg)
        }
        VcfReadError(msg: String) {
            description("error reading VCF file")
            display("error reading VCF file: {}", msg)
        }
        NoVariantsError {
            description("input contains no single-nucleotide variants to phase")
        }
        // CIGAR / interval walker errors
        UnexpectedCigarOperation(msg: String) {
            description("CIGAR operation not allowed at this point")
            display("CIGAR operation not allowed at this point: {}", msg)
        }
        TargetOutsideReadSpan(pos: usize) {
            description("target reference position is outside the read span")
            display("target reference position {} is outside the read span", pos + 1)
        }
        VariantOutsideContig(pos: usize) {
            description("variant position is beyond the end of the loaded contig")
            display("variant position {} is beyond the end of the loaded contig", pos + 1)
        }
        // File IO errors
        FileWriteError(filename: String) {
            description("could not write to file")
            display("could not write to file: {}", filename)
        }
    }
}
