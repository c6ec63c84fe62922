//! Cube-format grid file parsing.
//!
//! The cube layout is two free-text header lines, an atom-count/origin
//! record, three axis records (point count plus a 3-vector step), the atom
//! block, and finally `nx*ny*nz` density samples in row-major x,y,z order.
//! Density samples are weighted by the voxel volume as they are read, so
//! the stored grid holds per-voxel charge rather than raw density.

use std::fs;
use std::path::Path;
use std::str::SplitWhitespace;

use super::model::DensityGrid;
use crate::common::elements::symbol_for_atomic_number;
use crate::domain::{ComputeResult, FretError};

/// Sequential numeric reader over the body of a cube file. Fortran-style
/// `D` exponents are normalized before parsing.
struct TokenCursor<'a> {
    tokens: SplitWhitespace<'a>,
    path: &'a Path,
}

impl<'a> TokenCursor<'a> {
    fn new(body: &'a str, path: &'a Path) -> Self {
        Self {
            tokens: body.split_whitespace(),
            path,
        }
    }

    fn next_f64(&mut self, field: &str) -> ComputeResult<f64> {
        let token = self.tokens.next().ok_or_else(|| {
            FretError::input_validation(
                "INPUT.CUBE_FORMAT",
                format!(
                    "cube file '{}' ended while reading {}",
                    self.path.display(),
                    field
                ),
            )
        })?;

        let normalized = token.replace(['D', 'd'], "E");
        normalized.parse::<f64>().map_err(|_| {
            FretError::input_validation(
                "INPUT.CUBE_FORMAT",
                format!(
                    "cube file '{}' has a non-numeric {} value '{}'",
                    self.path.display(),
                    field,
                    token
                ),
            )
        })
    }

    fn next_i64(&mut self, field: &str) -> ComputeResult<i64> {
        let value = self.next_f64(field)?;
        let rounded = value.round();
        if !value.is_finite() || (value - rounded).abs() > 1.0e-6 {
            return Err(FretError::input_validation(
                "INPUT.CUBE_FORMAT",
                format!(
                    "cube file '{}' expects an integer {} but found {}",
                    self.path.display(),
                    field,
                    value
                ),
            ));
        }
        Ok(rounded as i64)
    }

    fn next_count(&mut self, field: &str) -> ComputeResult<usize> {
        let value = self.next_i64(field)?;
        if value <= 0 {
            return Err(FretError::input_validation(
                "INPUT.CUBE_FORMAT",
                format!(
                    "cube file '{}' requires a positive {} but found {}",
                    self.path.display(),
                    field,
                    value
                ),
            ));
        }
        Ok(value as usize)
    }
}

/// Parses a cube file from disk into a dense [`DensityGrid`].
pub fn parse_cube_file(path: &Path) -> ComputeResult<DensityGrid> {
    let source =
        fs::read_to_string(path).map_err(|_| FretError::file_not_found("IO.CUBE_READ", path))?;
    parse_cube_source(path, &source)
}

pub(super) fn parse_cube_source(path: &Path, source: &str) -> ComputeResult<DensityGrid> {
    let mut sections = source.splitn(3, '\n');
    let title = sections.next().unwrap_or_default().trim_end().to_string();
    let subtitle = sections.next().unwrap_or_default().trim_end().to_string();
    let body = sections.next().unwrap_or_default();

    let mut cursor = TokenCursor::new(body, path);

    let natoms = cursor.next_count("atom count")?;
    let origin = [
        cursor.next_f64("grid origin x")?,
        cursor.next_f64("grid origin y")?,
        cursor.next_f64("grid origin z")?,
    ];

    let (nx, step_x) = read_axis_record(&mut cursor, "x")?;
    let (ny, step_y) = read_axis_record(&mut cursor, "y")?;
    let (nz, step_z) = read_axis_record(&mut cursor, "z")?;

    // The voxel basis must be diagonal; a sheared grid is rejected rather
    // than corrected.
    if step_x[1] != 0.0
        || step_x[2] != 0.0
        || step_y[0] != 0.0
        || step_y[2] != 0.0
        || step_z[0] != 0.0
        || step_z[1] != 0.0
    {
        return Err(FretError::malformed_geometry(
            path,
            "voxel step matrix is not diagonal",
        ));
    }
    let voxel_volume = step_x[0] * step_y[1] * step_z[2];

    let mut atomic_numbers = Vec::with_capacity(natoms);
    let mut atomic_labels = Vec::with_capacity(natoms);
    let mut atomic_charges = Vec::with_capacity(natoms);
    let mut atom_positions = Vec::with_capacity(natoms);
    let mut nelectrons = 0_i64;

    for _ in 0..natoms {
        let atomic_number = cursor.next_i64("atomic number")?;
        let charge = cursor.next_f64("atomic charge")?;
        let x = cursor.next_f64("atom x")?;
        let y = cursor.next_f64("atom y")?;
        let z = cursor.next_f64("atom z")?;

        nelectrons += atomic_number;
        atomic_labels.push(symbol_for_atomic_number(atomic_number));
        atomic_numbers.push(atomic_number);
        atomic_charges.push(charge);
        atom_positions.push([x, y, z]);
    }

    let grid_points = nx * ny * nz;
    let mut rho = Vec::with_capacity(grid_points);
    let mut maxdens = 0.0_f64;
    for _ in 0..grid_points {
        let sample = cursor.next_f64("density sample")? * voxel_volume;
        maxdens = maxdens.max(sample.abs());
        rho.push(sample);
    }

    tracing::debug!(
        path = %path.display(),
        nx,
        ny,
        nz,
        natoms,
        maxdens,
        "parsed cube density grid"
    );

    Ok(DensityGrid {
        source: path.to_path_buf(),
        title,
        subtitle,
        natoms,
        atomic_numbers,
        atomic_labels,
        atomic_charges,
        atom_positions,
        origin,
        nx,
        ny,
        nz,
        step_x,
        step_y,
        step_z,
        rho,
        voxel_volume,
        maxdens,
        nelectrons,
        integral: 0.0,
    })
}

fn read_axis_record(cursor: &mut TokenCursor<'_>, axis: &str) -> ComputeResult<(usize, [f64; 3])> {
    let count = cursor.next_count(&format!("{axis}-axis point count"))?;
    let step = [
        cursor.next_f64(&format!("{axis}-axis step component 0"))?,
        cursor.next_f64(&format!("{axis}-axis step component 1"))?,
        cursor.next_f64(&format!("{axis}-axis step component 2"))?,
    ];
    Ok((count, step))
}

#[cfg(test)]
mod tests {
    use super::parse_cube_source;
    use crate::domain::FretErrorCategory;
    use std::path::Path;

    const WATER_FRAGMENT_CUBE: &str = "\
water fragment density
generated for parser checks
    3    0.0000000    0.0000000    0.0000000
    2    0.5000000    0.0000000    0.0000000
    2    0.0000000    0.5000000    0.0000000
    2    0.0000000    0.0000000    0.5000000
    8    0.0000000   -0.1000000    0.0000000    0.2000000
    1    0.0000000    1.4000000    0.0000000   -0.9000000
    1    0.0000000   -1.4000000    0.0000000   -0.9000000
  1.0D-01  2.0D-01
  3.0E-01  4.0E-01
  5.0E-01  6.0E-01
  7.0E-01  -8.0E-01
";

    #[test]
    fn parses_header_atoms_and_samples() {
        let grid = parse_cube_source(Path::new("water.cube"), WATER_FRAGMENT_CUBE)
            .expect("fixture should parse");

        assert_eq!(grid.title, "water fragment density");
        assert_eq!((grid.nx, grid.ny, grid.nz), (2, 2, 2));
        assert_eq!(grid.natoms, 3);
        assert_eq!(grid.atomic_labels, vec!["O", "H", "H"]);
        assert_eq!(grid.nelectrons, 10);
        assert!((grid.voxel_volume - 0.125).abs() <= 1.0e-15);

        // Samples are volume-weighted on read; maxdens follows |rho|.
        assert!((grid.rho_at(0, 0, 0) - 0.1 * 0.125).abs() <= 1.0e-15);
        assert!((grid.rho_at(1, 1, 1) + 0.8 * 0.125).abs() <= 1.0e-15);
        assert!((grid.maxdens - 0.8 * 0.125).abs() <= 1.0e-15);
    }

    #[test]
    fn rejects_non_diagonal_voxel_basis() {
        let sheared = WATER_FRAGMENT_CUBE.replace(
            "    2    0.5000000    0.0000000    0.0000000\n",
            "    2    0.5000000    0.0100000    0.0000000\n",
        );
        let error = parse_cube_source(Path::new("sheared.cube"), &sheared)
            .expect_err("sheared basis must be rejected");
        assert_eq!(error.category(), FretErrorCategory::MalformedGeometry);
        assert_eq!(error.placeholder(), "INPUT.CUBE_GEOMETRY");
    }

    #[test]
    fn rejects_truncated_sample_block() {
        let mut truncated = WATER_FRAGMENT_CUBE.trim_end().to_string();
        truncated.truncate(truncated.len() - 10);
        let error = parse_cube_source(Path::new("short.cube"), &truncated)
            .expect_err("missing samples must be rejected");
        assert_eq!(error.category(), FretErrorCategory::InputValidation);
        assert!(error.message().contains("density sample"));
    }

    #[test]
    fn rejects_non_numeric_density_value() {
        let broken = WATER_FRAGMENT_CUBE.replace("5.0E-01", "abc");
        let error = parse_cube_source(Path::new("broken.cube"), &broken)
            .expect_err("non-numeric sample must be rejected");
        assert_eq!(error.category(), FretErrorCategory::InputValidation);
    }

    #[test]
    fn missing_file_maps_to_file_not_found() {
        let error = super::parse_cube_file(Path::new("definitely-absent.cube"))
            .expect_err("missing file must fail");
        assert_eq!(error.category(), FretErrorCategory::FileNotFound);
        assert_eq!(error.placeholder(), "IO.CUBE_READ");
    }
}
