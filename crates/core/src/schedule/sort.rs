//! Ordering of pairing options
//!
//! Every ordering is descending and stable: pairings that compare equal keep
//! the order in which the backend paginated them.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crewconnect_domain::{impl_code_conversions, Pairing};

/// Named statistic to rank pairings by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SortKey {
    /// Mean rest-period duration
    Rest,
    /// Mean duty-period block time
    Block,
    TotalOnDays,
}

impl_code_conversions!(SortKey {
    Rest => "rest",
    Block => "block",
    TotalOnDays => "total_on_days",
});

impl SortKey {
    fn compare(self, a: &Pairing, b: &Pairing) -> Ordering {
        match self {
            Self::Rest => a.mean_rest_secs().total_cmp(&b.mean_rest_secs()),
            Self::Block => a.mean_block_secs().total_cmp(&b.mean_block_secs()),
            Self::TotalOnDays => a.total_on_days.cmp(&b.total_on_days),
        }
    }
}

/// Ascending comparison used by [`SortBy::Custom`]
pub type Ranking = Arc<dyn Fn(&Pairing, &Pairing) -> Ordering + Send + Sync>;

/// How to order the pairing options
#[derive(Clone)]
pub enum SortBy {
    Key(SortKey),
    /// Reserved for multi-key ranking; currently leaves pagination order
    Keys(BTreeSet<SortKey>),
    Custom(Ranking),
}

impl SortBy {
    /// Rank by any totally ordered value derived from a pairing.
    ///
    /// ```
    /// use crewconnect_core::SortBy;
    ///
    /// // Longest trips first.
    /// let sort = SortBy::by_key(|pairing| pairing.span_days());
    /// # let _ = sort;
    /// ```
    pub fn by_key<K, F>(key: F) -> Self
    where
        K: Ord,
        F: Fn(&Pairing) -> K + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(move |a: &Pairing, b: &Pairing| key(a).cmp(&key(b))))
    }

    /// Rank with an explicit ascending comparator.
    pub fn by_comparator<F>(compare: F) -> Self
    where
        F: Fn(&Pairing, &Pairing) -> Ordering + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(compare))
    }

    /// Sort `pairings` in place, highest rank first.
    pub fn sort(&self, pairings: &mut [Pairing]) {
        match self {
            Self::Key(key) => pairings.sort_by(|a, b| key.compare(b, a)),
            Self::Keys(_) => {}
            Self::Custom(compare) => pairings.sort_by(|a, b| compare(b, a)),
        }
    }
}

impl Default for SortBy {
    fn default() -> Self {
        Self::Key(SortKey::Rest)
    }
}

impl From<SortKey> for SortBy {
    fn from(key: SortKey) -> Self {
        Self::Key(key)
    }
}

impl fmt::Debug for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.debug_tuple("Key").field(key).finish(),
            Self::Keys(keys) => f.debug_tuple("Keys").field(keys).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
