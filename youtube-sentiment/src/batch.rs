//! Splitting id lists into request-sized batches.

use std::borrow::Borrow;
use std::num::NonZeroUsize;

/// Splits `ids` into consecutive chunks of at most `batch_size` ids each.
///
/// Order is preserved and only the last chunk may be short. An empty slice yields no chunks.
pub fn batches<T>(ids: &[T], batch_size: NonZeroUsize) -> std::slice::Chunks<'_, T> {
    ids.chunks(batch_size.get())
}

/// Renders one batch as the comma-separated value of an `id` filter.
pub fn join_ids<S: Borrow<str>>(batch: &[S]) -> String {
    batch.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn empty_input_has_no_batches() {
        let ids: Vec<String> = Vec::new();
        assert_eq!(batches(&ids, size(50)).count(), 0);
    }

    #[test]
    fn partition_laws() {
        for n in 0..=120usize {
            let ids: Vec<usize> = (0..n).collect();
            for batch_size in [1, 2, 3, 7, 49, 50, 51, 100] {
                let chunks: Vec<&[usize]> = batches(&ids, size(batch_size)).collect();
                assert_eq!(chunks.len(), n.div_ceil(batch_size), "n={n} size={batch_size}");
                assert!(chunks.iter().all(|c| !c.is_empty() && c.len() <= batch_size));
                let rejoined: Vec<usize> = chunks.concat();
                assert_eq!(rejoined, ids);
            }
        }
    }

    #[test]
    fn last_batch_is_the_remainder() {
        let ids: Vec<String> = (0..120).map(|i| format!("id{i}")).collect();
        let lens: Vec<usize> = batches(&ids, size(50)).map(<[String]>::len).collect();
        assert_eq!(lens, vec![50, 50, 20]);
    }

    #[test]
    fn joins_with_commas() {
        assert_eq!(join_ids(&["a", "b", "c"]), "a,b,c");
        assert_eq!(join_ids(&["only"]), "only");
        assert_eq!(join_ids::<&str>(&[]), "");
    }
}
