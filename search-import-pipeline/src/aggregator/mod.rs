//! Aggregator module for the search import pipeline.
//!
//! Reduces per-page write acknowledgements into per-index record counts.

use search_import_shared::IndexCounts;

/// Stateless reduction of write acknowledgements.
///
/// Summation is associative and commutative, so counts from separate or
/// resumed runs can be merged in any order with the same result.
pub struct ResponseAggregator;

impl ResponseAggregator {
    /// Sum the record counts of every acknowledgement, per destination index.
    ///
    /// Returns an empty mapping when nothing was written.
    pub fn reduce<'a, I>(acknowledgements: I) -> IndexCounts
    where
        I: IntoIterator<Item = &'a IndexCounts>,
    {
        acknowledgements
            .into_iter()
            .fold(IndexCounts::new(), |mut total, page| {
                total.merge(page);
                total
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages() -> Vec<IndexCounts> {
        vec![
            IndexCounts::single("products", 3),
            vec![("products", 2), ("catalog", 1)].into_iter().collect(),
            IndexCounts::new(),
            IndexCounts::single("catalog", 4),
        ]
    }

    #[test]
    fn test_reduce_sums_per_index() {
        let total = ResponseAggregator::reduce(&pages());

        assert_eq!(total.get("products"), Some(5));
        assert_eq!(total.get("catalog"), Some(5));
        assert_eq!(total.total(), 10);
    }

    #[test]
    fn test_reduce_is_order_independent() {
        let forward = pages();
        let mut backward = pages();
        backward.reverse();
        let mut rotated = pages();
        rotated.rotate_left(1);

        let expected = ResponseAggregator::reduce(&forward);
        assert_eq!(ResponseAggregator::reduce(&backward), expected);
        assert_eq!(ResponseAggregator::reduce(&rotated), expected);
    }

    #[test]
    fn test_reduce_merges_partial_runs() {
        let all = pages();
        let (first, second) = all.split_at(2);

        let partial = [
            ResponseAggregator::reduce(first),
            ResponseAggregator::reduce(second),
        ];

        assert_eq!(
            ResponseAggregator::reduce(&partial),
            ResponseAggregator::reduce(&all)
        );
    }

    #[test]
    fn test_reduce_nothing_written() {
        assert!(ResponseAggregator::reduce(&Vec::new()).is_empty());
        assert!(ResponseAggregator::reduce(&[IndexCounts::new()]).is_empty());
    }
}
