//! Line-oriented `key: value` input-deck reader.
//!
//! The deck selects the calculation mode implicitly: which density and
//! nanoparticle files are present determines the target, mirroring the
//! keyword table of the reference program. Keys are case-insensitive;
//! empty lines and `#`/`!` comments are skipped; file values are resolved
//! relative to the deck's own directory and must exist.

use fret_core::{CalculationConfig, CalculationInputs, CalculationMode, ComputeResult, FretError};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub(super) struct InputDeck {
    pub config: CalculationConfig,
    pub inputs: CalculationInputs,
}

#[derive(Default)]
struct DeckBuilder {
    integration: Option<PathBuf>,
    acceptor: Option<PathBuf>,
    donor: Option<PathBuf>,
    nanoparticle: Option<PathBuf>,
    cutoff: Option<f64>,
    spectral_overlap: Option<f64>,
    omega_0: Option<f64>,
    debug: Option<u32>,
}

pub(super) fn read_input_deck(path: &Path) -> ComputeResult<InputDeck> {
    let source =
        fs::read_to_string(path).map_err(|_| FretError::file_not_found("IO.DECK_READ", path))?;

    let extension_ok = path
        .extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| extension.eq_ignore_ascii_case("inp"));
    if !extension_ok {
        return Err(FretError::input_validation(
            "INPUT.DECK_EXTENSION",
            format!(
                "input deck '{}' does not have the supported extension (.inp)",
                path.display()
            ),
        ));
    }

    let deck_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut builder = DeckBuilder::default();

    for line in source.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            continue;
        }
        let Some((raw_key, raw_value)) = trimmed.split_once(':') else {
            continue;
        };
        let key = raw_key.trim().to_ascii_lowercase();
        let value = raw_value.trim();

        match key.as_str() {
            "integrate cube file" => {
                builder.integration = Some(resolve_existing_file(deck_dir, value)?);
            }
            "acceptor density" => {
                builder.acceptor = Some(resolve_existing_file(deck_dir, value)?);
            }
            "donor density" => {
                builder.donor = Some(resolve_existing_file(deck_dir, value)?);
            }
            "nanoparticle" => {
                builder.nanoparticle = Some(resolve_existing_file(deck_dir, value)?);
            }
            "cutoff" => {
                builder.cutoff = Some(parse_non_negative(value, "cutoff")?);
            }
            "spectral overlap" => {
                builder.spectral_overlap = Some(parse_non_negative(value, "spectral overlap")?);
            }
            "omega_0" => {
                builder.omega_0 = Some(parse_non_negative(value, "omega_0")?);
            }
            "debug" => {
                builder.debug = Some(value.parse::<u32>().map_err(|_| {
                    FretError::input_validation(
                        "INPUT.DECK_VALUE",
                        format!("debug must be a non-negative integer, found '{value}'"),
                    )
                })?);
            }
            unknown => {
                return Err(FretError::input_validation(
                    "INPUT.DECK_KEYWORD",
                    format!("unknown input keyword '{unknown}'"),
                ));
            }
        }
    }

    builder.into_deck()
}

fn resolve_existing_file(deck_dir: &Path, value: &str) -> ComputeResult<PathBuf> {
    let resolved = deck_dir.join(value);
    if !resolved.is_file() {
        return Err(FretError::file_not_found("IO.DECK_FILE", &resolved));
    }
    Ok(resolved)
}

fn parse_non_negative(value: &str, field: &str) -> ComputeResult<f64> {
    let parsed = value.parse::<f64>().map_err(|_| {
        FretError::input_validation(
            "INPUT.DECK_VALUE",
            format!("{field} must be numeric, found '{value}'"),
        )
    })?;
    if parsed < 0.0 {
        return Err(FretError::input_validation(
            "INPUT.DECK_VALUE",
            format!("{field} cannot be negative"),
        ));
    }
    Ok(parsed)
}

impl DeckBuilder {
    /// Derives the calculation target from which inputs are present and
    /// validates the parameter combinations the target requires.
    fn into_deck(self) -> ComputeResult<InputDeck> {
        let integrating = self.integration.is_some();
        let has_acceptor = self.acceptor.is_some();
        let has_donor = self.donor.is_some();
        let has_nanoparticle = self.nanoparticle.is_some();

        if integrating && (has_acceptor || has_donor || has_nanoparticle) {
            return Err(FretError::input_validation(
                "INPUT.DECK_TARGET",
                "cube integration cannot be combined with another calculation type",
            ));
        }

        let mode = if integrating {
            CalculationMode::IntegrateGrid
        } else {
            if self.cutoff.is_none() && self.omega_0.is_none() {
                return Err(FretError::input_validation(
                    "INPUT.DECK_TARGET",
                    "cutoff needed in input",
                ));
            }
            match (has_acceptor, has_donor, has_nanoparticle) {
                (true, true, false) => CalculationMode::AcceptorDonor,
                (true, false, true) => CalculationMode::AcceptorNanoparticle,
                (true, true, true) => CalculationMode::AcceptorNanoparticleDonor,
                _ => {
                    return Err(FretError::input_validation(
                        "INPUT.DECK_TARGET",
                        "no valid calculation target specified in input",
                    ));
                }
            }
        };

        match mode {
            CalculationMode::AcceptorDonor | CalculationMode::AcceptorNanoparticleDonor => {
                if self.spectral_overlap.is_none() {
                    return Err(FretError::input_validation(
                        "INPUT.DECK_TARGET",
                        format!("calculation '{mode}' requested but no spectral overlap in input"),
                    ));
                }
            }
            CalculationMode::AcceptorNanoparticle => {
                if self.omega_0.is_some() {
                    return Err(FretError::input_validation(
                        "INPUT.DECK_TARGET",
                        "the overlap integral cannot be computed for the Acceptor - NP target",
                    ));
                }
            }
            CalculationMode::IntegrateGrid => {}
        }

        let mut config = CalculationConfig::new(mode);
        config.cutoff = self.cutoff.unwrap_or(0.0);
        config.omega_0 = self.omega_0;
        config.spectral_overlap = self.spectral_overlap.unwrap_or(0.0);
        config.debug = self.debug.unwrap_or(0);

        Ok(InputDeck {
            config,
            inputs: CalculationInputs {
                integration_density: self.integration,
                acceptor_density: self.acceptor,
                donor_density: self.donor,
                nanoparticle: self.nanoparticle,
            },
        })
    }
}
