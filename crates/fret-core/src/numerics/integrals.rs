//! Pairwise screened-Coulomb interaction integrals.
//!
//! The kernel between two points at distance `d` is
//! `(1/d) * erf(d / screening_length)`: the error function screens the bare
//! Coulomb term at short range, so the kernel stays finite as `d -> 0` and
//! tends to the bare `1/d` at long range. Pairs closer than the coincidence
//! threshold contribute nothing.
//!
//! The double sums are commutative reductions over independent pair terms;
//! they are parallelized with rayon by summing per-thread partials, never
//! through shared mutable accumulators.

use libm::erf;
use num_complex::Complex64;
use rayon::prelude::*;
use serde::Serialize;

use crate::common::constants::COINCIDENT_DISTANCE;
use crate::domain::{CalculationConfig, ComputeResult, FretError};
use crate::modules::density::ReducedDensity;
use crate::modules::nanoparticle::{Nanoparticle, NanoparticleModel};

/// Result of one acceptor-donor coupling computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AcceptorDonorIntegrals {
    /// Screened Coulomb interaction (a.u.).
    pub coulomb: f64,
    /// `-omega_0 * sum_i w_acc[i] * w_don[i]`, present in overlap mode.
    pub overlap: Option<f64>,
}

impl AcceptorDonorIntegrals {
    /// Total potential `V = coulomb + overlap`.
    pub fn total_potential(&self) -> f64 {
        self.coulomb + self.overlap.unwrap_or(0.0)
    }
}

#[inline]
fn distance(a: [f64; 3], b: [f64; 3]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    (dx * dx + dy * dy + dz * dz).sqrt()
}

#[inline]
fn screened_coulomb(dist: f64, inv_screening: f64) -> f64 {
    erf(dist * inv_screening) / dist
}

/// Runs `op` inside a dedicated rayon pool of `n_threads` workers (capped
/// at the available hardware parallelism); `n_threads == 0` uses the
/// global pool with its default sizing.
fn run_in_pool<T: Send>(n_threads: usize, op: impl FnOnce() -> T + Send) -> ComputeResult<T> {
    if n_threads == 0 {
        return Ok(op());
    }

    let available = std::thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(1);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(n_threads.min(available))
        .build()
        .map_err(|source| {
            FretError::io_system(
                "RUN.THREAD_POOL",
                format!("failed to build worker pool: {source}"),
            )
        })?;
    Ok(pool.install(op))
}

/// Computes the screened Coulomb interaction (and, in overlap mode, the
/// diagonal overlap integral) between two reduced densities.
pub fn acceptor_donor(
    config: &CalculationConfig,
    acceptor: &ReducedDensity,
    donor: &ReducedDensity,
) -> ComputeResult<AcceptorDonorIntegrals> {
    let acc_weights = acceptor.weights();
    let acc_positions = acceptor.positions();
    let don_weights = donor.weights();
    let don_positions = donor.positions();

    let overlap_enabled = config.overlap_enabled();
    let inv_screening = 1.0 / config.screening_length;

    let (coulomb, overlap_raw) = run_in_pool(config.n_threads, || {
        (0..acc_weights.len())
            .into_par_iter()
            .map(|i| {
                let weight_i = acc_weights[i];
                let position_i = acc_positions[i];
                let mut coulomb = 0.0_f64;
                let mut overlap = 0.0_f64;

                for j in 0..don_weights.len() {
                    if overlap_enabled && i == j {
                        overlap += weight_i * don_weights[j];
                    }

                    let dist = distance(position_i, don_positions[j]);
                    if dist <= COINCIDENT_DISTANCE {
                        // Self-interaction singularity: the pair simply
                        // contributes nothing.
                        continue;
                    }
                    coulomb += weight_i * don_weights[j] * screened_coulomb(dist, inv_screening);
                }

                (coulomb, overlap)
            })
            .reduce(|| (0.0, 0.0), |a, b| (a.0 + b.0, a.1 + b.1))
    })?;

    let overlap = config.omega_0.map(|omega_0| -omega_0 * overlap_raw);
    tracing::debug!(coulomb, ?overlap, "acceptor-donor integrals evaluated");

    Ok(AcceptorDonorIntegrals { coulomb, overlap })
}

/// Computes the complex Coulomb coupling between a reduced density and a
/// nanoparticle charge model. The leading sign is flipped relative to the
/// acceptor-donor case, matching the sign convention of the external
/// point-charge source.
///
/// The charges+dipoles coupling formula is not implemented upstream and is
/// preserved here as an explicit failure rather than an invented
/// expression.
pub fn acceptor_nanoparticle(
    config: &CalculationConfig,
    acceptor: &ReducedDensity,
    nanoparticle: &Nanoparticle,
) -> ComputeResult<Complex64> {
    let points = match &nanoparticle.model {
        NanoparticleModel::Charges(points) => points,
        NanoparticleModel::ChargesAndDipoles(_) => {
            return Err(FretError::not_implemented(
                "RUN.NP_DIPOLE_COUPLING",
                format!(
                    "the dipole-coupling formula for nanoparticle model '{}' ('{}') is not implemented",
                    nanoparticle.model.kind_label(),
                    nanoparticle.source.display()
                ),
            ));
        }
    };

    let acc_weights = acceptor.weights();
    let acc_positions = acceptor.positions();
    let inv_screening = 1.0 / config.screening_length;

    let coupling = run_in_pool(config.n_threads, || {
        (0..acc_weights.len())
            .into_par_iter()
            .map(|i| {
                let weight_i = acc_weights[i];
                let position_i = acc_positions[i];
                let mut partial = Complex64::new(0.0, 0.0);

                for point in points {
                    let dist = distance(position_i, point.position);
                    if dist <= COINCIDENT_DISTANCE {
                        continue;
                    }
                    partial -= point.charge * weight_i * screened_coulomb(dist, inv_screening);
                }

                partial
            })
            .reduce(|| Complex64::new(0.0, 0.0), |a, b| a + b)
    })?;

    tracing::debug!(re = coupling.re, im = coupling.im, "acceptor-nanoparticle coupling evaluated");
    Ok(coupling)
}

#[cfg(test)]
mod tests {
    use super::{AcceptorDonorIntegrals, acceptor_donor, acceptor_nanoparticle};
    use crate::common::constants::PI;
    use crate::domain::{CalculationConfig, CalculationMode};
    use crate::modules::density::ReducedDensity;
    use crate::modules::nanoparticle::{
        ChargeDipolePoint, ChargePoint, Nanoparticle, NanoparticleModel,
    };
    use num_complex::Complex64;
    use std::path::PathBuf;

    fn test_config() -> CalculationConfig {
        let mut config = CalculationConfig::new(CalculationMode::AcceptorDonor);
        config.screening_length = 1.0;
        config
    }

    fn single_point(weight: f64, position: [f64; 3]) -> ReducedDensity {
        ReducedDensity::from_points([(weight, position)])
    }

    #[test]
    fn kernel_reduces_to_bare_coulomb_at_long_range() {
        let config = test_config();
        let acceptor = single_point(2.0, [0.0, 0.0, 0.0]);
        let donor = single_point(3.0, [100.0, 0.0, 0.0]);
        let result = acceptor_donor(&config, &acceptor, &donor).expect("integral should succeed");

        // erf(100) == 1 to machine precision, so the kernel is 1/d.
        assert!((result.coulomb - 2.0 * 3.0 / 100.0).abs() <= 1.0e-12);
        assert!(result.overlap.is_none());
    }

    #[test]
    fn kernel_stays_finite_near_contact() {
        let config = test_config();
        let acceptor = single_point(1.0, [0.0, 0.0, 0.0]);
        let donor = single_point(1.0, [1.0e-8, 0.0, 0.0]);
        let result = acceptor_donor(&config, &acceptor, &donor).expect("integral should succeed");

        // lim_{d->0} erf(d/L)/d = (2/sqrt(pi))/L.
        let contact_limit = 2.0 / PI.sqrt() / config.screening_length;
        assert!(result.coulomb.is_finite());
        assert!((result.coulomb - contact_limit).abs() <= 1.0e-6);
    }

    #[test]
    fn coincident_pairs_contribute_zero_not_nan() {
        let config = test_config();
        let shared = [1.0, 2.0, 3.0];
        let acceptor = ReducedDensity::from_points([(1.0, shared), (1.0, [5.0, 0.0, 0.0])]);
        let donor = single_point(1.0, shared);
        let result = acceptor_donor(&config, &acceptor, &donor).expect("integral should succeed");

        // Only the non-coincident pair contributes.
        let dist = ((5.0_f64 - 1.0).powi(2) + 4.0 + 9.0).sqrt();
        let expected = libm::erf(dist / config.screening_length) / dist;
        assert!(result.coulomb.is_finite());
        assert!((result.coulomb - expected).abs() <= 1.0e-12);
    }

    #[test]
    fn coulomb_is_symmetric_under_acceptor_donor_swap() {
        let config = test_config();
        let first = ReducedDensity::from_points([
            (0.4, [0.0, 0.0, 0.0]),
            (-0.2, [1.0, 0.5, 0.0]),
            (0.7, [2.0, -1.0, 0.5]),
        ]);
        let second = ReducedDensity::from_points([
            (0.9, [0.3, 0.1, -0.4]),
            (-0.5, [1.5, 1.5, 1.5]),
        ]);

        let forward = acceptor_donor(&config, &first, &second).expect("forward should succeed");
        let backward = acceptor_donor(&config, &second, &first).expect("backward should succeed");
        assert!((forward.coulomb - backward.coulomb).abs() <= 1.0e-12);
    }

    #[test]
    fn overlap_pairs_same_index_voxels_with_sign_convention() {
        let mut config = test_config();
        config.omega_0 = Some(0.25);

        let acceptor = ReducedDensity::from_points([
            (0.5, [0.0, 0.0, 0.0]),
            (0.5, [1.0, 0.0, 0.0]),
        ]);
        let donor = ReducedDensity::from_points([
            (2.0, [10.0, 0.0, 0.0]),
            (4.0, [11.0, 0.0, 0.0]),
        ]);

        let result = acceptor_donor(&config, &acceptor, &donor).expect("integral should succeed");
        let overlap = result.overlap.expect("overlap mode is enabled");
        // raw = 0.5*2.0 + 0.5*4.0 = 3.0, emitted with -omega_0 factor.
        assert!((overlap + 0.25 * 3.0).abs() <= 1.0e-12);
    }

    #[test]
    fn total_potential_combines_coulomb_and_overlap() {
        let with_overlap = AcceptorDonorIntegrals {
            coulomb: 0.5,
            overlap: Some(-0.2),
        };
        let without_overlap = AcceptorDonorIntegrals {
            coulomb: 0.5,
            overlap: None,
        };
        assert!((with_overlap.total_potential() - 0.3).abs() <= 1.0e-15);
        assert!((without_overlap.total_potential() - 0.5).abs() <= 1.0e-15);
    }

    #[test]
    fn explicit_thread_count_matches_default_pool_result() {
        let mut serial = test_config();
        serial.n_threads = 1;
        let mut threaded = test_config();
        threaded.n_threads = 4;

        let acceptor = ReducedDensity::from_points(
            (0..50).map(|i| (0.01 * i as f64, [i as f64 * 0.1, 0.0, 0.0])),
        );
        let donor = ReducedDensity::from_points(
            (0..50).map(|i| (0.02 * i as f64, [0.0, 1.0 + i as f64 * 0.1, 0.0])),
        );

        let one = acceptor_donor(&serial, &acceptor, &donor).expect("serial run should succeed");
        let many =
            acceptor_donor(&threaded, &acceptor, &donor).expect("threaded run should succeed");
        assert!((one.coulomb - many.coulomb).abs() <= 1.0e-10);
    }

    #[test]
    fn nanoparticle_charge_coupling_flips_sign() {
        let config = test_config();
        let acceptor = single_point(2.0, [0.0, 0.0, 0.0]);
        let nanoparticle = Nanoparticle {
            source: PathBuf::from("np.dat"),
            model: NanoparticleModel::Charges(vec![ChargePoint {
                charge: Complex64::new(1.0, -0.5),
                position: [50.0, 0.0, 0.0],
            }]),
            geometric_center: [50.0, 0.0, 0.0],
        };

        let coupling = acceptor_nanoparticle(&config, &acceptor, &nanoparticle)
            .expect("charge coupling should succeed");
        // erf(50) == 1, kernel = 1/50, leading sign negative.
        assert!((coupling.re + 2.0 * 1.0 / 50.0).abs() <= 1.0e-12);
        assert!((coupling.im - 2.0 * 0.5 / 50.0).abs() <= 1.0e-12);
    }

    #[test]
    fn nanoparticle_dipole_coupling_is_not_implemented() {
        let config = test_config();
        let acceptor = single_point(1.0, [0.0, 0.0, 0.0]);
        let nanoparticle = Nanoparticle {
            source: PathBuf::from("np.dat"),
            model: NanoparticleModel::ChargesAndDipoles(vec![ChargeDipolePoint {
                charge: Complex64::new(1.0, 0.0),
                dipole_re: [0.1, 0.0, 0.0],
                dipole_im: [0.0, 0.0, 0.0],
                position: [10.0, 0.0, 0.0],
            }]),
            geometric_center: [10.0, 0.0, 0.0],
        };

        let error = acceptor_nanoparticle(&config, &acceptor, &nanoparticle)
            .expect_err("dipole path must fail fast");
        assert_eq!(
            error.category(),
            crate::domain::FretErrorCategory::NotImplemented
        );
        assert!(error.message().contains("dipole"));
    }
}
