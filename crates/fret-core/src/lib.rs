//! Core engine for electronic-energy-transfer (EET/FRET) couplings from
//! volumetric electron-density data.
//!
//! The crate ingests Gaussian cube files into dense density grids, reduces
//! them to sparse significant-point sets, parses nanoparticle charge/dipole
//! models, and evaluates the screened pairwise Coulomb integrals between
//! the resulting point sets. Formatted reporting and input-file handling
//! live in the companion CLI crate.

pub mod common;
pub mod domain;
pub mod modules;
pub mod numerics;

pub use domain::{
    CalculationConfig, CalculationMode, ComputeResult, DensityRole, FretError, FretErrorCategory,
};
pub use modules::dispatch::{CalculationInputs, CalculationOutcome, run_calculation};
