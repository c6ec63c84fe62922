//! Physical constants and fixed numeric policy shared across the compute
//! modules, kept in one place to avoid ad hoc per-module literals.

pub const PI: f64 = 3.141_592_653_589_793_238_462_643_383_279_5_f64;
pub const HBAR: f64 = 1.054_571_817e-34_f64;

/// Angstrom -> Bohr conversion factor.
pub const TO_BOHR: f64 = 1.889_726_125_457_828_1_f64;
/// Bohr -> Angstrom conversion factor.
pub const TO_ANG: f64 = 1.0 / TO_BOHR;

/// Screening length of the erf-regularized Coulomb kernel (a.u.).
pub const QM_SCREEN_LENGTH: f64 = 1.0;

/// Pair distances at or below this threshold are treated as coincident and
/// contribute nothing to the Coulomb sums.
pub const COINCIDENT_DISTANCE: f64 = 1.0e-14;

/// Hard ceiling on the number of retained points in a reduced density.
/// Exceeding it means the cutoff is too small for the grid.
pub const MAX_REDUCED_POINTS: usize = 10_000_000;

#[cfg(test)]
mod tests {
    use super::{COINCIDENT_DISTANCE, HBAR, PI, QM_SCREEN_LENGTH, TO_ANG, TO_BOHR};

    #[test]
    fn conversion_factors_are_inverses() {
        assert!((TO_BOHR * TO_ANG - 1.0).abs() <= f64::EPSILON);
        assert!((PI - std::f64::consts::PI).abs() <= f64::EPSILON);
    }

    #[test]
    fn numeric_policy_values_remain_positive() {
        for value in [HBAR, QM_SCREEN_LENGTH, COINCIDENT_DISTANCE] {
            assert!(value.is_finite());
            assert!(value > 0.0);
        }
    }
}
