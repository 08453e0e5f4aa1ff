//! Search primitives behind every "find the boundary" computation of the
//! engine.

/// Largest `k` in `1..=n` for which `pred(k)` holds, `0` if there is none.
///
/// `pred` must be true for a prefix of the domain and false after it. The
/// predicate is called `O(log n)` times and never outside `1..=n`.
pub fn bisect_find<F>(n: usize, mut pred: F) -> usize
where
    F: FnMut(usize) -> bool,
{
    let mut lo = 1;
    let mut hi = n + 1;
    while lo < hi {
        let k = lo + (hi - lo) / 2;
        if pred(k) {
            lo = k + 1;
        } else {
            hi = k;
        }
    }
    lo - 1
}

/// Apply `step` while `pred` holds and return the last value `pred` held
/// for, or `start` if it never did.
///
/// Termination is up to the caller, `pred` has to turn false eventually.
pub fn recurse_while<T, P, S>(mut pred: P, mut step: S, start: T) -> T
where
    P: FnMut(&T) -> bool,
    S: FnMut(&T) -> T,
{
    let mut current = start;
    if !pred(&current) {
        return current;
    }
    loop {
        let next = step(&current);
        if !pred(&next) {
            return current;
        }
        current = next;
    }
}
