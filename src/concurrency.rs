//! Concurrency helper: bounded worker pool for independent per-file work.

use anyhow::{Context, Result};
use rayon::prelude::*;

/// Map `f` over `items` with at most `limit` workers in flight.
/// Results come back in input order; `limit <= 1` runs inline.
pub fn map_bounded<T, R, F>(items: &[T], limit: usize, f: F) -> Result<Vec<R>>
where
    T: Sync,
    R: Send,
    F: Sync + Fn(&T) -> Result<R>,
{
    if limit <= 1 {
        return items.iter().map(&f).collect();
    }
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(limit)
        .thread_name(|i| format!("tetl-worker-{i}"))
        .build()
        .context("building worker pool")?;
    pool.install(|| items.par_iter().map(|it| f(it)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_input_order() {
        let items: Vec<u64> = (0..100).collect();
        let out = map_bounded(&items, 4, |x| Ok(x * 2)).unwrap();
        assert_eq!(out, items.iter().map(|x| x * 2).collect::<Vec<_>>());
    }

    #[test]
    fn first_error_surfaces() {
        let items = vec![1, 2, 3];
        let err = map_bounded(&items, 2, |x| if *x == 2 { anyhow::bail!("boom {x}") } else { Ok(*x) });
        assert!(err.is_err());
        let inline = map_bounded(&items, 1, |x| Ok(*x)).unwrap();
        assert_eq!(inline, items);
    }
}
