pub mod errors;

pub use errors::{ComputeResult, FretError, FretErrorCategory};

use serde::Serialize;
use std::fmt::{Display, Formatter};

use crate::common::constants::{MAX_REDUCED_POINTS, QM_SCREEN_LENGTH};

/// Calculation selected by the input deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CalculationMode {
    /// Integrate the full density grid of a single cube file.
    IntegrateGrid,
    /// Screened Coulomb (and optional overlap) between two densities.
    AcceptorDonor,
    /// Coulomb coupling between a density and a nanoparticle model.
    AcceptorNanoparticle,
    /// Acceptor-donor coupling in the presence of a nanoparticle.
    AcceptorNanoparticleDonor,
}

impl CalculationMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IntegrateGrid => "Integrate Cube Density",
            Self::AcceptorDonor => "Acceptor - Donor",
            Self::AcceptorNanoparticle => "Acceptor - NP",
            Self::AcceptorNanoparticleDonor => "Acceptor - NP - Donor",
        }
    }
}

impl Display for CalculationMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

/// Role a density grid plays in the calculation, used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DensityRole {
    Integration,
    Acceptor,
    Donor,
}

impl DensityRole {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Integration => "integration",
            Self::Acceptor => "acceptor",
            Self::Donor => "donor",
        }
    }
}

impl Display for DensityRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

/// Validated numeric parameters consumed by the compute pipeline. The input
/// deck reader in the CLI crate produces this; the core treats it as
/// trusted.
#[derive(Debug, Clone)]
pub struct CalculationConfig {
    pub mode: CalculationMode,
    /// Retention threshold as a fraction of the grid's maximum |rho|.
    pub cutoff: f64,
    /// Transition frequency; presence enables the overlap integral.
    pub omega_0: Option<f64>,
    /// Spectral overlap J used by the report layer for the EET rate.
    pub spectral_overlap: f64,
    /// Screening length of the erf-regularized Coulomb kernel (a.u.).
    pub screening_length: f64,
    /// Hard ceiling on retained reduced-density points.
    pub max_reduced_points: usize,
    /// Worker threads for the pairwise loops; 0 means all available.
    pub n_threads: usize,
    pub debug: u32,
}

impl CalculationConfig {
    pub fn new(mode: CalculationMode) -> Self {
        Self {
            mode,
            cutoff: 0.0,
            omega_0: None,
            spectral_overlap: 0.0,
            screening_length: QM_SCREEN_LENGTH,
            max_reduced_points: MAX_REDUCED_POINTS,
            n_threads: 0,
            debug: 0,
        }
    }

    /// The overlap integral pairs same-index voxels, so it forces full
    /// retention during density reduction.
    pub fn overlap_enabled(&self) -> bool {
        self.omega_0.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::{CalculationConfig, CalculationMode, DensityRole};

    #[test]
    fn config_defaults_disable_overlap() {
        let config = CalculationConfig::new(CalculationMode::AcceptorDonor);
        assert!(!config.overlap_enabled());
        assert_eq!(config.n_threads, 0);
        assert!(config.max_reduced_points > 0);
    }

    #[test]
    fn omega_0_presence_enables_overlap() {
        let mut config = CalculationConfig::new(CalculationMode::AcceptorDonor);
        config.omega_0 = Some(0.1);
        assert!(config.overlap_enabled());
    }

    #[test]
    fn display_labels_are_stable() {
        assert_eq!(CalculationMode::AcceptorDonor.to_string(), "Acceptor - Donor");
        assert_eq!(DensityRole::Donor.to_string(), "donor");
    }
}
