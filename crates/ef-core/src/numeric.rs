use crate::EfError;

/// Floating point type used throughout the system
pub type Real = f64;

/// One tolerance pair for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, EfError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(EfError::NonFinite { what, value: v })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances::default();
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn ensure_finite_passes_through() {
        assert_eq!(ensure_finite(2.5, "test").unwrap(), 2.5);
    }

    proptest::proptest! {
        #[test]
        fn nearly_equal_is_reflexive(v in -1e12_f64..1e12) {
            proptest::prop_assert!(nearly_equal(v, v, Tolerances::default()));
        }

        #[test]
        fn ensure_finite_accepts_all_finite(v in proptest::num::f64::NORMAL) {
            proptest::prop_assert!(ensure_finite(v, "prop").is_ok());
        }
    }
}
