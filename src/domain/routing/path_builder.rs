//! Candidate path generation through routing base tokens

use std::collections::HashSet;

use crate::shared::types::{Path, Token};

/// At most two intermediary tokens
pub const DEFAULT_MAX_HOPS: usize = 3;

/// Tokens whose symbol is one of `symbols` (case-insensitive), unique by address,
/// in token-list order.
pub fn find_bases_by_symbol(tokens: &[Token], symbols: &[String]) -> Vec<Token> {
    let wanted: HashSet<String> = symbols.iter().map(|s| s.to_lowercase()).collect();
    let mut seen = HashSet::new();
    tokens
        .iter()
        .filter(|t| wanted.contains(&t.symbol.to_lowercase()))
        .filter(|t| seen.insert(t.address))
        .cloned()
        .collect()
}

/// Candidate paths from `from` to `to`, in evaluation order: direct, then
/// single-base, then ordered base pairs when `max_hops >= 3`.
///
/// Returns nothing when both ends are the same token.
pub fn build_candidate_paths(from: &Token, to: &Token, bases: &[Token], max_hops: usize) -> Vec<Path> {
    let (a, b) = (from.address, to.address);
    if a == b {
        return Vec::new();
    }

    let mut paths: Vec<Path> = vec![vec![a, b]];

    for x in bases {
        if x.address == a || x.address == b {
            continue;
        }
        paths.push(vec![a, x.address, b]);
    }

    if max_hops >= 3 {
        for (i, x) in bases.iter().enumerate() {
            for (j, y) in bases.iter().enumerate() {
                if i == j {
                    continue;
                }
                if [x.address, y.address].iter().any(|addr| *addr == a || *addr == b) {
                    continue;
                }
                paths.push(vec![a, x.address, y.address, b]);
            }
        }
    }

    let mut seen = HashSet::new();
    paths.retain(|p| seen.insert(p.clone()));
    // Duplicate entries in `bases` can still produce X -> X; never emit a self-hop
    paths.retain(|p| p.windows(2).all(|hop| hop[0] != hop[1]));
    paths
}
