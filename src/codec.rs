//! Mixed-radix observation codec
//!
//! Flattens a tuple of bounded integers into one index and back. `obs[0]` is
//! the least-significant digit; the place value of `obs[i]` is the product of
//! `dims[0..i]`.

/// Encode `obs` (with `0 <= obs[i] < dims[i]`) into a single index in `[0, prod(dims))`
///
/// Panics if `obs` and `dims` have different lengths or are empty.
pub fn encode(obs: &[usize], dims: &[usize]) -> usize {
    assert_eq!(
        obs.len(),
        dims.len(),
        "observation and dimensions must have the same length"
    );
    assert!(!obs.is_empty(), "cannot encode an empty observation");
    debug_assert!(obs.iter().zip(dims).all(|(o, d)| o < d));

    let mut result = obs[0];
    let mut shift = dims[0];
    for (&value, &size) in obs.iter().zip(dims).skip(1) {
        result += value * shift;
        shift *= size;
    }
    result
}

/// Inverse of [`encode`]
///
/// Panics if `dims` is empty.
pub fn decode(index: usize, dims: &[usize]) -> Vec<usize> {
    assert!(!dims.is_empty(), "cannot decode with empty dimensions");

    // place[i] = dims[0] * ... * dims[i-1]
    let mut place = Vec::with_capacity(dims.len());
    let mut acc = 1usize;
    for &size in dims {
        place.push(acc);
        acc *= size;
    }

    // Peel digits from the most-significant end
    let mut rest = index;
    let mut digits = Vec::with_capacity(dims.len());
    for &shift in place.iter().skip(1).rev() {
        digits.push(rest / shift);
        rest %= shift;
    }
    digits.push(rest);
    digits.reverse();
    digits
}
