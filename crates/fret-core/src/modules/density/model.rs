//! Dense density grid and its sparse reduced representation.

use std::path::PathBuf;

use crate::domain::{ComputeResult, DensityRole, FretError};

/// One parsed cube file: atom metadata plus the dense, volume-weighted
/// density grid. The grid is a single contiguous buffer indexed
/// `(i*ny + j)*nz + k` rather than nested containers.
#[derive(Debug, Clone)]
pub struct DensityGrid {
    pub source: PathBuf,
    pub title: String,
    pub subtitle: String,

    pub natoms: usize,
    pub atomic_numbers: Vec<i64>,
    pub atomic_labels: Vec<&'static str>,
    pub atomic_charges: Vec<f64>,
    pub atom_positions: Vec<[f64; 3]>,

    pub origin: [f64; 3],
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
    pub step_x: [f64; 3],
    pub step_y: [f64; 3],
    pub step_z: [f64; 3],

    pub(super) rho: Vec<f64>,
    pub voxel_volume: f64,
    pub maxdens: f64,
    pub nelectrons: i64,

    /// Sum of the grid, set once by [`DensityGrid::integrate`].
    pub integral: f64,
}

impl DensityGrid {
    pub fn grid_points(&self) -> usize {
        self.nx * self.ny * self.nz
    }

    #[inline]
    fn index(&self, i: usize, j: usize, k: usize) -> usize {
        (i * self.ny + j) * self.nz + k
    }

    #[inline]
    pub fn rho_at(&self, i: usize, j: usize, k: usize) -> f64 {
        self.rho[self.index(i, j, k)]
    }

    pub fn rho(&self) -> &[f64] {
        &self.rho
    }

    /// Integrates the full grid, storing and returning the sum. The grid
    /// already holds volume-weighted values, so this is a plain sum.
    pub fn integrate(&mut self) -> f64 {
        self.integral = self.rho.iter().sum();
        tracing::debug!(
            path = %self.source.display(),
            integral = self.integral,
            "integrated density grid"
        );
        self.integral
    }

    /// Filters the grid down to the voxels whose |rho| exceeds
    /// `maxdens * cutoff`, or every voxel when `force_full_retention` is
    /// set (the overlap integral pairs same-index voxels and therefore
    /// needs the complete grid). Voxels are visited in the same row-major
    /// order as parsing.
    pub fn reduce(
        &self,
        cutoff: f64,
        force_full_retention: bool,
        capacity: usize,
        role: DensityRole,
    ) -> ComputeResult<ReducedDensity> {
        let threshold = self.maxdens * cutoff;
        let mut reduced = ReducedDensity::default();

        for i in 0..self.nx {
            let x = self.origin[0] + i as f64 * self.step_x[0];
            for j in 0..self.ny {
                let y = self.origin[1] + j as f64 * self.step_y[1];
                for k in 0..self.nz {
                    let weight = self.rho[self.index(i, j, k)];
                    if !force_full_retention && weight.abs() <= threshold {
                        continue;
                    }
                    if reduced.len() >= capacity {
                        return Err(FretError::capacity_exceeded(role, &self.source, capacity));
                    }
                    let z = self.origin[2] + k as f64 * self.step_z[2];
                    reduced.push(weight, [x, y, z]);
                }
            }
        }

        tracing::debug!(
            path = %self.source.display(),
            role = %role,
            retained = reduced.len(),
            total = self.grid_points(),
            "reduced density grid"
        );
        Ok(reduced)
    }
}

/// Sparse significant-point representation of a density grid, stored as
/// parallel weight/position arrays for the benefit of the pairwise kernel.
#[derive(Debug, Clone, Default)]
pub struct ReducedDensity {
    weights: Vec<f64>,
    positions: Vec<[f64; 3]>,
}

impl ReducedDensity {
    /// Builds a reduced set directly from points; used by synthetic tests
    /// and benchmarks rather than the cube pipeline.
    pub fn from_points(points: impl IntoIterator<Item = (f64, [f64; 3])>) -> Self {
        let mut reduced = Self::default();
        for (weight, position) in points {
            reduced.push(weight, position);
        }
        reduced
    }

    fn push(&mut self, weight: f64, position: [f64; 3]) {
        self.weights.push(weight);
        self.positions.push(position);
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn positions(&self) -> &[[f64; 3]] {
        &self.positions
    }

    pub fn weight_sum(&self) -> f64 {
        self.weights.iter().sum()
    }
}

/// Builds a synthetic uniform grid for the tests below.
#[cfg(test)]
fn uniform_test_grid(nx: usize, ny: usize, nz: usize, density: f64) -> DensityGrid {
    let voxel_volume = 1.0;
    let rho = vec![density * voxel_volume; nx * ny * nz];
    let maxdens = density.abs() * voxel_volume;
    DensityGrid {
        source: PathBuf::from("uniform-test.cube"),
        title: String::from("uniform"),
        subtitle: String::new(),
        natoms: 0,
        atomic_numbers: Vec::new(),
        atomic_labels: Vec::new(),
        atomic_charges: Vec::new(),
        atom_positions: Vec::new(),
        origin: [0.0, 0.0, 0.0],
        nx,
        ny,
        nz,
        step_x: [1.0, 0.0, 0.0],
        step_y: [0.0, 1.0, 0.0],
        step_z: [0.0, 0.0, 1.0],
        rho,
        voxel_volume,
        maxdens,
        nelectrons: 0,
        integral: 0.0,
    }
}
