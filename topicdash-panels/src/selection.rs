//! Per-panel selection state and its paging arithmetic.

use serde::Serialize;

use topicdash_core::{ScoreKey, Sign};

/// What a gene table is currently showing.
///
/// `page_start` always satisfies `page_start <= max_page_start(N, page_size)`
/// for the list the key and sign select.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneTableSelection {
    pub key: ScoreKey,
    pub sign: Sign,
    pub page_start: usize,
}

impl GeneTableSelection {
    pub fn new(key: ScoreKey) -> Self {
        Self {
            key,
            sign: Sign::Positive,
            page_start: 0,
        }
    }
}

/// Largest valid page start for a list of `len` rows.
pub fn max_page_start(len: usize, page_size: usize) -> usize {
    len.saturating_sub(page_size)
}

pub fn page_forward(start: usize, len: usize, page_size: usize) -> usize {
    start
        .saturating_add(page_size)
        .min(max_page_start(len, page_size))
}

pub fn page_back(start: usize, len: usize, page_size: usize) -> usize {
    start
        .saturating_sub(page_size)
        .min(max_page_start(len, page_size))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_clamps_to_last_full_page() {
        assert_eq!(page_forward(0, 7, 5), 2);
        assert_eq!(page_forward(2, 7, 5), 2);
        assert_eq!(page_forward(0, 20, 5), 5);
    }

    #[test]
    fn back_floors_at_zero() {
        assert_eq!(page_back(2, 7, 5), 0);
        assert_eq!(page_back(0, 7, 5), 0);
        assert_eq!(page_back(10, 20, 5), 5);
    }

    #[test]
    fn short_lists_never_move() {
        assert_eq!(page_forward(0, 3, 5), 0);
        assert_eq!(page_forward(0, 0, 5), 0);
        assert_eq!(page_back(0, 0, 5), 0);
    }

    #[test]
    fn new_selection_starts_positive_at_zero() {
        let sel = GeneTableSelection::new(ScoreKey::global("k1"));
        assert_eq!(sel.sign, Sign::Positive);
        assert_eq!(sel.page_start, 0);
    }
}
