use std::{fmt::Debug, ops::AddAssign};

use num::Float;

/// Element type of word vectors and caption embeddings.
/// IDF weights are always computed in `f64` and narrowed through `from_weight`.
pub trait Weight: Float + AddAssign + Debug + Send + Sync + 'static {
    fn from_weight(weight: f64) -> Self;
    fn parse_component(s: &str) -> Option<Self>;
}

impl Weight for f32 {
    #[inline]
    fn from_weight(weight: f64) -> Self {
        weight as f32
    }

    #[inline]
    fn parse_component(s: &str) -> Option<Self> {
        s.parse().ok()
    }
}

impl Weight for f64 {
    #[inline]
    fn from_weight(weight: f64) -> Self {
        weight
    }

    #[inline]
    fn parse_component(s: &str) -> Option<Self> {
        s.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrowing_keeps_sign() {
        assert_eq!(f32::from_weight(-0.5), -0.5f32);
        assert_eq!(f64::from_weight(2.0f64.ln()), 2.0f64.ln());
    }

    #[test]
    fn parse_component_accepts_exponents_and_rejects_garbage() {
        assert_eq!(f32::parse_component("1e-3"), Some(0.001));
        assert_eq!(f64::parse_component("-0.25"), Some(-0.25));
        assert_eq!(f32::parse_component("abc"), None);
    }
}
