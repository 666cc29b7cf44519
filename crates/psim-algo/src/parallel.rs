//! Map helper shared by the sweeps; rayon when the `rayon` feature is on.

#[cfg(feature = "rayon")]
use rayon::prelude::*;

#[cfg(feature = "rayon")]
pub(crate) fn par_map<I, T, F>(parallel: bool, items: &[I], f: F) -> Vec<T>
where
    I: Copy + Send + Sync,
    T: Send,
    F: Fn(I) -> T + Send + Sync,
{
    if parallel {
        items.par_iter().map(|&item| f(item)).collect()
    } else {
        items.iter().map(|&item| f(item)).collect()
    }
}

#[cfg(not(feature = "rayon"))]
pub(crate) fn par_map<I, T, F>(_parallel: bool, items: &[I], f: F) -> Vec<T>
where
    I: Copy,
    F: Fn(I) -> T,
{
    items.iter().map(|&item| f(item)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_is_preserved() {
        let items: Vec<u32> = (0..100).collect();
        let doubled = par_map(true, &items, |x| x * 2);
        assert_eq!(doubled, (0..100).map(|x| x * 2).collect::<Vec<_>>());
        assert_eq!(par_map(false, &items, |x| x + 1)[99], 100);
    }
}
