use super::weight::Weight;

/// Zero vector of length `dim`
#[inline]
pub fn zeros<N: Weight>(dim: usize) -> Vec<N> {
    vec![N::zero(); dim]
}

/// `acc += scale * v`, elementwise
///
/// # Arguments
/// * `acc` - accumulator, same length as `v`
/// * `v` - vector to add
/// * `scale` - scalar applied to every element of `v`
#[inline]
pub fn add_scaled<N: Weight>(acc: &mut [N], v: &[N], scale: N) {
    debug_assert_eq!(acc.len(), v.len(), "vectors must be of the same length");
    for (a, &x) in acc.iter_mut().zip(v) {
        *a += scale * x;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeros_has_requested_dimension() {
        let z: Vec<f32> = zeros(50);
        assert_eq!(z.len(), 50);
        assert!(z.iter().all(|&x| x == 0.0));
        assert!(zeros::<f64>(0).is_empty());
    }

    #[test]
    fn add_scaled_accumulates() {
        let mut acc = vec![1.0f64, 1.0, 1.0];
        add_scaled(&mut acc, &[1.0, 2.0, 3.0], 2.0);
        add_scaled(&mut acc, &[1.0, 0.0, -1.0], -1.0);
        assert_eq!(acc, vec![2.0, 5.0, 8.0]);
    }
}
