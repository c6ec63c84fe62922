//! Marker-delimited nanoparticle file parsing.
//!
//! The data block starts at a fixed marker line, followed by a header line
//! selecting the model kind, then one data row per point until the end
//! marker. Rows carry either 5 numeric fields (complex charge + position)
//! or 11 (complex charge, 6 dipole components, position).

use num_complex::Complex64;
use std::fs;
use std::path::Path;

use super::model::{ChargeDipolePoint, ChargePoint, Nanoparticle, NanoparticleModel};
use crate::domain::{ComputeResult, FretError};

pub const FRET_BLOCK_START: &str = "# fret quantities ------------------------#";
pub const FRET_BLOCK_END: &str = "# end fret quantities ------------------------";

pub const CHARGES_HEADER: &str = "#        q_re                     q_im                coords_x                 coords_y                 coords_z";
pub const DIPOLES_HEADER: &str = "# q_re,   q_im,   mu_re_x,   mu_re_y,   mu_re_z,  mu_im_x,   mu_im_y,   mu_im_z, coords_x, coords_y, coords_z";

/// Parses a nanoparticle charge/dipole file from disk.
pub fn parse_nanoparticle_file(path: &Path) -> ComputeResult<Nanoparticle> {
    let source =
        fs::read_to_string(path).map_err(|_| FretError::file_not_found("IO.NP_READ", path))?;
    parse_nanoparticle_source(path, &source)
}

pub(super) fn parse_nanoparticle_source(path: &Path, source: &str) -> ComputeResult<Nanoparticle> {
    let mut lines = source.lines();

    if !lines.any(|line| line.trim() == FRET_BLOCK_START) {
        return Err(FretError::missing_marker(path, FRET_BLOCK_START));
    }

    let header = lines
        .next()
        .ok_or_else(|| FretError::unrecognized_header(path, ""))?
        .trim();

    let model = match header {
        CHARGES_HEADER => NanoparticleModel::Charges(read_charge_rows(path, &mut lines)?),
        DIPOLES_HEADER => {
            NanoparticleModel::ChargesAndDipoles(read_charge_dipole_rows(path, &mut lines)?)
        }
        other => return Err(FretError::unrecognized_header(path, other)),
    };

    if model.is_empty() {
        return Err(FretError::invalid_model(
            path,
            "data block contains no points",
        ));
    }

    let positions = model.positions();
    let mut geometric_center = [0.0_f64; 3];
    for position in &positions {
        for axis in 0..3 {
            geometric_center[axis] += position[axis];
        }
    }
    for component in &mut geometric_center {
        *component /= positions.len() as f64;
    }

    tracing::debug!(
        path = %path.display(),
        kind = model.kind_label(),
        count = model.len(),
        "parsed nanoparticle model"
    );

    Ok(Nanoparticle {
        source: path.to_path_buf(),
        model,
        geometric_center,
    })
}

fn read_charge_rows<'a>(
    path: &Path,
    lines: &mut impl Iterator<Item = &'a str>,
) -> ComputeResult<Vec<ChargePoint>> {
    let mut points = Vec::new();
    for_each_data_row(path, lines, |fields| {
        if fields.len() != 5 {
            return Err(FretError::invalid_model(
                path,
                format!("charge row must have 5 fields, found {}", fields.len()),
            ));
        }
        points.push(ChargePoint {
            charge: Complex64::new(fields[0], fields[1]),
            position: [fields[2], fields[3], fields[4]],
        });
        Ok(())
    })?;
    Ok(points)
}

fn read_charge_dipole_rows<'a>(
    path: &Path,
    lines: &mut impl Iterator<Item = &'a str>,
) -> ComputeResult<Vec<ChargeDipolePoint>> {
    let mut points = Vec::new();
    for_each_data_row(path, lines, |fields| {
        if fields.len() != 11 {
            return Err(FretError::invalid_model(
                path,
                format!("charge+dipole row must have 11 fields, found {}", fields.len()),
            ));
        }
        points.push(ChargeDipolePoint {
            charge: Complex64::new(fields[0], fields[1]),
            dipole_re: [fields[2], fields[3], fields[4]],
            dipole_im: [fields[5], fields[6], fields[7]],
            position: [fields[8], fields[9], fields[10]],
        });
        Ok(())
    })?;
    Ok(points)
}

/// Walks data rows until the end marker, handing the parsed numeric fields
/// of each non-empty row to `handle`. A missing end marker is an error.
fn for_each_data_row<'a>(
    path: &Path,
    lines: &mut impl Iterator<Item = &'a str>,
    mut handle: impl FnMut(&[f64]) -> ComputeResult<()>,
) -> ComputeResult<()> {
    for line in lines {
        let trimmed = line.trim();
        if trimmed == FRET_BLOCK_END {
            return Ok(());
        }
        if trimmed.is_empty() {
            continue;
        }

        let mut fields = Vec::new();
        for token in trimmed.split_whitespace() {
            let value = token.replace(['D', 'd'], "E").parse::<f64>().map_err(|_| {
                FretError::invalid_model(
                    path,
                    format!("non-numeric field '{}' in data row '{}'", token, trimmed),
                )
            })?;
            fields.push(value);
        }
        handle(&fields)?;
    }

    Err(FretError::missing_marker(path, FRET_BLOCK_END))
}
