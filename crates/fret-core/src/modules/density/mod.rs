//! Density-grid ingestion and reduction: cube-file parsing into a dense
//! grid, grid integration, and significance filtering into a sparse point
//! set for the integral engine.

mod model;
mod parser;

pub use model::{DensityGrid, ReducedDensity};
pub use parser::parse_cube_file;

#[cfg(test)]
mod tests {
    use super::parse_cube_file;
    use crate::domain::DensityRole;
    use std::fs;
    use tempfile::TempDir;

    const UNIT_CUBE: &str = "\
uniform unit density
end-to-end fixture
    1    0.0    0.0    0.0
    2    1.0    0.0    0.0
    2    0.0    1.0    0.0
    2    0.0    0.0    1.0
    1    0.0    0.0    0.0    0.0
1.0 1.0 1.0 1.0
1.0 1.0 1.0 1.0
";

    #[test]
    fn uniform_two_cube_grid_end_to_end() {
        let temp = TempDir::new().expect("tempdir should be created");
        let cube_path = temp.path().join("unit.cube");
        fs::write(&cube_path, UNIT_CUBE).expect("fixture should be staged");

        let mut grid = parse_cube_file(&cube_path).expect("fixture should parse");
        assert!((grid.voxel_volume - 1.0).abs() <= f64::EPSILON);

        let integral = grid.integrate();
        assert!((integral - 8.0 * grid.voxel_volume).abs() <= 1.0e-12);

        let reduced = grid
            .reduce(0.0, false, usize::MAX, DensityRole::Acceptor)
            .expect("reduction should succeed");
        assert_eq!(reduced.len(), 8);
        for weight in reduced.weights() {
            assert!((weight - 1.0 * grid.voxel_volume).abs() <= 1.0e-12);
        }
    }
}
