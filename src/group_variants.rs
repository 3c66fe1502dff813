//! Partitioning of a chromosome's variant list into bounded windows for the
//! downstream phasing stage. Groups are consecutive and non-overlapping;
//! both the variant-count cap and the positional-span cap bound each group.

use crate::variants_and_reads::VarList;

// maximum reference span of one group, in bases
pub static MAX_GROUP_SPAN: usize = 100_000;
// maximum number of variants in one group
pub static MAX_GROUP_VARIANTS: usize = 100;

/// A bounded window of consecutive variants in a chromosome's VarList.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Group {
    pub first_var: usize, // VarList index of the first variant in the group
    pub n_vars: usize,
    pub span_start: usize, // pos0 of the first variant
    pub span_end: usize,   // pos0 of the last variant
}

/// Partition the variant list into groups. A group is closed when adding the
/// next variant would exceed either the count cap or the span cap; every
/// variant lands in exactly one group and groups come out in position order.
/// An empty list yields no groups.
pub fn group_variants(varlist: &VarList) -> Vec<Group> {
    let lst = &varlist.lst;
    let mut groups: Vec<Group> = vec![];
    if lst.is_empty() {
        return groups;
    }

    let make_group = |first: usize, end: usize| Group {
        first_var: first,
        n_vars: end - first,
        span_start: lst[first].pos0,
        span_end: lst[end - 1].pos0,
    };

    let mut first = 0;
    for i in 1..lst.len() {
        if i - first >= MAX_GROUP_VARIANTS || lst[i].pos0 - lst[first].pos0 > MAX_GROUP_SPAN {
            groups.push(make_group(first, i));
            first = i;
        }
    }
    groups.push(make_group(first, lst.len()));

    groups
}
