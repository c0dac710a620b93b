use super::Error;

/// The closed search interval `[low, high]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct Domain {
    pub(super) low: f64,
    pub(super) high: f64,
}

impl Domain {
    /// Orders and validates the bounds.
    pub(super) fn new([a, b]: [f64; 2]) -> Result<Self, Error> {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        if !low.is_finite() || !high.is_finite() || low == high {
            return Err(Error::InvalidBounds { low, high });
        }
        Ok(Self { low, high })
    }

    pub(super) fn clamp(&self, x: f64) -> f64 {
        x.clamp(self.low, self.high)
    }

    pub(super) fn is_edge(&self, x: f64) -> bool {
        x == self.low || x == self.high
    }

    pub(super) fn width(&self) -> f64 {
        self.high - self.low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_ordered() {
        let domain = Domain::new([5.0, -1.0]).unwrap();
        assert_eq!((domain.low, domain.high), (-1.0, 5.0));
    }

    #[test]
    fn rejects_degenerate_bounds() {
        assert!(matches!(
            Domain::new([2.0, 2.0]),
            Err(Error::InvalidBounds { .. })
        ));
        assert!(matches!(
            Domain::new([0.0, f64::INFINITY]),
            Err(Error::InvalidBounds { .. })
        ));
    }

    #[test]
    fn clamps_to_edges() {
        let domain = Domain::new([0.0, 10.0]).unwrap();
        assert_eq!(domain.clamp(12.5), 10.0);
        assert_eq!(domain.clamp(-0.1), 0.0);
        assert!(domain.is_edge(domain.clamp(-3.0)));
        assert!(!domain.is_edge(4.0));
    }
}
