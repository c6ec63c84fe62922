//! Mode-driven orchestration of the compute pipeline: parse the requested
//! density grids and nanoparticle model, reduce, and evaluate the
//! interaction integrals. Parsing and reduction are strictly sequential;
//! only the pairwise integral phase runs in parallel, on fully populated
//! immutable point sets.

use num_complex::Complex64;
use std::path::PathBuf;

use crate::domain::{CalculationConfig, CalculationMode, ComputeResult, DensityRole, FretError};
use crate::modules::density::{DensityGrid, parse_cube_file};
use crate::modules::nanoparticle::{Nanoparticle, parse_nanoparticle_file};
use crate::numerics::{AcceptorDonorIntegrals, acceptor_donor, acceptor_nanoparticle};

/// File paths selected by the input deck. Which entries must be present is
/// determined by the calculation mode.
#[derive(Debug, Clone, Default)]
pub struct CalculationInputs {
    pub integration_density: Option<PathBuf>,
    pub acceptor_density: Option<PathBuf>,
    pub donor_density: Option<PathBuf>,
    pub nanoparticle: Option<PathBuf>,
}

/// Everything the report layer needs about a finished calculation.
#[derive(Debug, Clone)]
pub enum CalculationOutcome {
    IntegrateGrid {
        grid: DensityGrid,
    },
    AcceptorDonor {
        acceptor: DensityGrid,
        donor: DensityGrid,
        acceptor_points: usize,
        donor_points: usize,
        integrals: AcceptorDonorIntegrals,
    },
    AcceptorNanoparticle {
        acceptor: DensityGrid,
        acceptor_points: usize,
        nanoparticle: Nanoparticle,
        coupling: Complex64,
    },
    AcceptorNanoparticleDonor {
        acceptor: DensityGrid,
        donor: DensityGrid,
        acceptor_points: usize,
        donor_points: usize,
        nanoparticle: Nanoparticle,
        integrals: AcceptorDonorIntegrals,
        coupling: Complex64,
    },
}

fn required_path<'a>(
    path: &'a Option<PathBuf>,
    role: &str,
    mode: CalculationMode,
) -> ComputeResult<&'a PathBuf> {
    path.as_ref().ok_or_else(|| {
        FretError::input_validation(
            "INPUT.RUN_PLAN",
            format!("calculation '{mode}' requires a {role} file"),
        )
    })
}

fn load_reduced(
    config: &CalculationConfig,
    path: &PathBuf,
    role: DensityRole,
) -> ComputeResult<(DensityGrid, usize, crate::modules::density::ReducedDensity)> {
    let grid = parse_cube_file(path)?;
    let reduced = grid.reduce(
        config.cutoff,
        config.overlap_enabled(),
        config.max_reduced_points,
        role,
    )?;
    let count = reduced.len();
    Ok((grid, count, reduced))
}

/// Runs the calculation selected by `config.mode` over `inputs`.
pub fn run_calculation(
    config: &CalculationConfig,
    inputs: &CalculationInputs,
) -> ComputeResult<CalculationOutcome> {
    tracing::info!(mode = %config.mode, "starting calculation");

    match config.mode {
        CalculationMode::IntegrateGrid => {
            let path = required_path(&inputs.integration_density, "density", config.mode)?;
            let mut grid = parse_cube_file(path)?;
            grid.integrate();
            Ok(CalculationOutcome::IntegrateGrid { grid })
        }

        CalculationMode::AcceptorDonor => {
            let acceptor_path = required_path(&inputs.acceptor_density, "acceptor", config.mode)?;
            let donor_path = required_path(&inputs.donor_density, "donor", config.mode)?;

            let (acceptor, acceptor_points, acceptor_reduced) =
                load_reduced(config, acceptor_path, DensityRole::Acceptor)?;
            let (donor, donor_points, donor_reduced) =
                load_reduced(config, donor_path, DensityRole::Donor)?;

            let integrals = acceptor_donor(config, &acceptor_reduced, &donor_reduced)?;
            Ok(CalculationOutcome::AcceptorDonor {
                acceptor,
                donor,
                acceptor_points,
                donor_points,
                integrals,
            })
        }

        CalculationMode::AcceptorNanoparticle => {
            let acceptor_path = required_path(&inputs.acceptor_density, "acceptor", config.mode)?;
            let nanoparticle_path =
                required_path(&inputs.nanoparticle, "nanoparticle", config.mode)?;

            let (acceptor, acceptor_points, acceptor_reduced) =
                load_reduced(config, acceptor_path, DensityRole::Acceptor)?;
            let nanoparticle = parse_nanoparticle_file(nanoparticle_path)?;

            let coupling = acceptor_nanoparticle(config, &acceptor_reduced, &nanoparticle)?;
            Ok(CalculationOutcome::AcceptorNanoparticle {
                acceptor,
                acceptor_points,
                nanoparticle,
                coupling,
            })
        }

        CalculationMode::AcceptorNanoparticleDonor => {
            let acceptor_path = required_path(&inputs.acceptor_density, "acceptor", config.mode)?;
            let donor_path = required_path(&inputs.donor_density, "donor", config.mode)?;
            let nanoparticle_path =
                required_path(&inputs.nanoparticle, "nanoparticle", config.mode)?;

            let (acceptor, acceptor_points, acceptor_reduced) =
                load_reduced(config, acceptor_path, DensityRole::Acceptor)?;
            let (donor, donor_points, donor_reduced) =
                load_reduced(config, donor_path, DensityRole::Donor)?;
            let nanoparticle = parse_nanoparticle_file(nanoparticle_path)?;

            let integrals = acceptor_donor(config, &acceptor_reduced, &donor_reduced)?;
            let coupling = acceptor_nanoparticle(config, &acceptor_reduced, &nanoparticle)?;
            Ok(CalculationOutcome::AcceptorNanoparticleDonor {
                acceptor,
                donor,
                acceptor_points,
                donor_points,
                nanoparticle,
                integrals,
                coupling,
            })
        }
    }
}
