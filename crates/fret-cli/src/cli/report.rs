//! Formatted run report, written next to the input deck with a `.log`
//! extension.

use fret_core::common::constants::{PI, TO_ANG};
use fret_core::modules::density::DensityGrid;
use fret_core::modules::nanoparticle::Nanoparticle;
use fret_core::numerics::AcceptorDonorIntegrals;
use fret_core::{CalculationConfig, CalculationOutcome, ComputeResult, FretError};
use num_complex::Complex64;
use std::fs;
use std::path::Path;
use std::time::Duration;

const RULE: &str =
    "--------------------------------------------------------------------------";
const INDENT: &str = "                       ";

pub(super) fn write_report(
    deck_path: &Path,
    config: &CalculationConfig,
    outcome: &CalculationOutcome,
    elapsed: Duration,
) -> ComputeResult<()> {
    let report_path = deck_path.with_extension("log");
    let mut out = String::new();

    banner(&mut out);
    run_summary(&mut out, deck_path, &report_path, config);

    match outcome {
        CalculationOutcome::IntegrateGrid { grid } => {
            density_section(&mut out, grid, None, "Density Information");
        }
        CalculationOutcome::AcceptorDonor {
            acceptor,
            donor,
            acceptor_points,
            donor_points,
            integrals,
        } => {
            density_section(
                &mut out,
                acceptor,
                Some(*acceptor_points),
                "Acceptor Density Information",
            );
            density_section(&mut out, donor, Some(*donor_points), "Donor Density Information");
            acceptor_donor_results(&mut out, config, integrals);
        }
        CalculationOutcome::AcceptorNanoparticle {
            acceptor,
            acceptor_points,
            nanoparticle,
            coupling,
        } => {
            density_section(
                &mut out,
                acceptor,
                Some(*acceptor_points),
                "Acceptor Density Information",
            );
            nanoparticle_section(&mut out, nanoparticle);
            nanoparticle_results(&mut out, *coupling);
        }
        CalculationOutcome::AcceptorNanoparticleDonor {
            acceptor,
            donor,
            acceptor_points,
            donor_points,
            nanoparticle,
            integrals,
            coupling,
        } => {
            density_section(
                &mut out,
                acceptor,
                Some(*acceptor_points),
                "Acceptor Density Information",
            );
            density_section(&mut out, donor, Some(*donor_points), "Donor Density Information");
            nanoparticle_section(&mut out, nanoparticle);
            acceptor_donor_results(&mut out, config, integrals);
            nanoparticle_results(&mut out, *coupling);
        }
    }

    timing_summary(&mut out, elapsed);

    fs::write(&report_path, out).map_err(|source| {
        FretError::io_system(
            "IO.REPORT_WRITE",
            format!(
                "failed to write report '{}': {}",
                report_path.display(),
                source
            ),
        )
    })?;

    tracing::info!(report = %report_path.display(), "run report written");
    Ok(())
}

fn banner(out: &mut String) {
    out.push_str(&format!(" {RULE}\n\n"));
    out.push_str(&format!("{INDENT}fretlab - EET coupling engine\n\n"));
    out.push_str(&format!(" {RULE}\n\n"));
}

fn run_summary(out: &mut String, deck_path: &Path, report_path: &Path, config: &CalculationConfig) {
    out.push_str(&format!("{INDENT}Input  File: {}\n", deck_path.display()));
    out.push_str(&format!("{INDENT}Output File: {}\n\n", report_path.display()));
    let threads = if config.n_threads == 0 {
        String::from("all available")
    } else {
        config.n_threads.to_string()
    };
    out.push_str(&format!("{INDENT}Worker Threads: {threads}\n\n"));
    out.push_str(&format!("{INDENT}Calculation --> {}\n\n", config.mode));

    if config.overlap_enabled() {
        out.push_str(&format!("{INDENT}Overlap Integral     : Yes\n"));
        if let Some(omega_0) = config.omega_0 {
            out.push_str(&format!("{INDENT}Omega_0              : {omega_0}   a.u.\n"));
        }
    } else {
        out.push_str(&format!("{INDENT}Overlap Integral     : No\n"));
        out.push_str(&format!("{INDENT}Cutoff               : {}   a.u.\n", config.cutoff));
    }
    out.push_str(&format!(
        "{INDENT}Spectral Overlap     : {}   a.u.\n\n",
        config.spectral_overlap
    ));
    out.push_str(&format!(" {RULE}\n\n"));
}

fn density_section(out: &mut String, grid: &DensityGrid, reduced_points: Option<usize>, header: &str) {
    out.push_str(&format!("{:>width$}\n\n", header, width = 25 + header.len()));
    out.push_str(&format!(" {RULE}\n\n"));
    out.push_str(&format!(
        "   Density File: {}\n\n",
        grid.source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| grid.source.display().to_string())
    ));
    out.push_str("   Density Grid (CUBE format):\n\n");
    grid_line(out, grid.natoms, grid.origin[0], grid.origin[1], grid.origin[2]);
    grid_line(out, grid.nx, grid.step_x[0], grid.step_x[1], grid.step_x[2]);
    grid_line(out, grid.ny, grid.step_y[0], grid.step_y[1], grid.step_y[2]);
    grid_line(out, grid.nz, grid.step_z[0], grid.step_z[1], grid.step_z[2]);
    out.push('\n');
    out.push_str(&format!(
        "     Total number of grid points: {}\n",
        grid.grid_points()
    ));
    if let Some(reduced) = reduced_points {
        out.push_str(&format!("     ---> Reduced density points: {reduced}\n"));
    }
    out.push('\n');

    out.push_str("   Associated molecular coordinates (Angstrom):\n\n");
    for atom in 0..grid.natoms {
        let position = grid.atom_positions[atom];
        out.push_str(&format!(
            "       {:<2}  {:12.6}  {:12.6}  {:12.6}\n",
            grid.atomic_labels[atom],
            position[0] * TO_ANG,
            position[1] * TO_ANG,
            position[2] * TO_ANG,
        ));
    }

    if grid.integral != 0.0 {
        out.push('\n');
        out.push_str("    ============================================================\n");
        out.push_str(&format!(
            "     Integrated electron density -->    {:.14}\n",
            grid.integral
        ));
        out.push_str("    ============================================================\n");
    }

    out.push_str(&format!("\n {RULE}\n\n"));
}

fn nanoparticle_section(out: &mut String, nanoparticle: &Nanoparticle) {
    out.push_str(&format!(
        "{INDENT}Nanoparticle Model   : {}\n\n",
        nanoparticle.model.kind_label()
    ));
    out.push_str(&format!(
        "{INDENT}Nanoparticle Points  : {}\n",
        nanoparticle.count()
    ));
    out.push_str(&format!(
        "{INDENT}Geometric Center (Angstrom): {:12.6}  {:12.6}  {:12.6}\n\n",
        nanoparticle.geometric_center[0] * TO_ANG,
        nanoparticle.geometric_center[1] * TO_ANG,
        nanoparticle.geometric_center[2] * TO_ANG,
    ));
    out.push_str(&format!(" {RULE}\n\n"));
}

fn acceptor_donor_results(
    out: &mut String,
    config: &CalculationConfig,
    integrals: &AcceptorDonorIntegrals,
) {
    out.push_str(&format!("{:>43}\n\n", "RESULTS"));
    out.push_str(&format!(" {RULE}\n\n"));

    out.push_str(&format!(
        "     Acceptor-Donor Coulomb  : {:25.16}  a.u.\n",
        integrals.coulomb
    ));
    if let Some(overlap) = integrals.overlap {
        out.push_str(&format!(
            "     Acceptor-Donor Overlap  : {overlap:25.16}  a.u.\n"
        ));
    }

    let total_potential = integrals.total_potential();
    let modulus = total_potential.abs();
    let rate = 2.0 * PI * modulus * modulus * config.spectral_overlap;

    out.push_str(&format!("{:>37}{}\n", "", "-".repeat(26)));
    out.push_str(&format!(
        "     Total Potential         : {total_potential:25.16}  a.u.\n\n"
    ));
    out.push_str(&format!(
        "     Total Potential Modulus : {modulus:25.16}  a.u.\n\n"
    ));
    out.push_str(&format!("     Keet : {rate:25.16}  a.u.\n\n"));
    out.push_str(&format!(" {RULE}\n\n"));
}

fn nanoparticle_results(out: &mut String, coupling: Complex64) {
    out.push_str(&format!(
        "     Acceptor-NP Interaction : {:25.16} + {:.16} i  a.u.\n\n",
        coupling.re, coupling.im
    ));
    out.push_str(&format!(" {RULE}\n\n"));
}

fn timing_summary(out: &mut String, elapsed: Duration) {
    let total_seconds = elapsed.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    out.push_str(&format!(
        "{INDENT}Wall Time: {hours:3} h {minutes:2} min {seconds:2} sec\n\n"
    ));
    out.push_str(&format!(" {RULE}\n"));
}

fn grid_line(out: &mut String, count: usize, a: f64, b: f64, c: f64) {
    out.push_str(&format!("   {count:5} {a:15.7E} {b:15.7E} {c:15.7E}\n"));
}
