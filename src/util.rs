//! small helpers shared across the crate: timestamped logging and
//! DNA sequence conversion

use chrono::prelude::*;

pub fn print_time() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

// use this spacer instead of calling print_time() to have the spaces match up with
// lines that document the time
pub static SPACER: &str = "                   ";

pub fn u8_to_string(u: &[u8]) -> String {
    String::from_utf8_lossy(u).into_owned()
}

/// Convert a byte sequence into an uppercase DNA `Vec<char>`.
/// Bases other than A,C,G,T,N are replaced with 'N'.
pub fn dna_vec(u: &[u8]) -> Vec<char> {
    let mut v: Vec<char> = Vec::with_capacity(u.len());
    for cu in u {
        let c = cu.to_ascii_uppercase() as char;
        if c == 'A' || c == 'C' || c == 'G' || c == 'T' || c == 'N' {
            v.push(c);
        } else {
            v.push('N');
        }
    }
    v
}
