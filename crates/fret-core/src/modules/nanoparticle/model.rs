//! Parsed nanoparticle external-field model.

use num_complex::Complex64;
use std::path::PathBuf;

/// Point charge with a complex amplitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChargePoint {
    pub charge: Complex64,
    pub position: [f64; 3],
}

/// Point charge plus a complex point dipole.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChargeDipolePoint {
    pub charge: Complex64,
    pub dipole_re: [f64; 3],
    pub dipole_im: [f64; 3],
    pub position: [f64; 3],
}

/// Model kind as a sum type: each variant carries only the fields that
/// exist for it, which also keeps the unimplemented dipole-coupling path
/// visible as an unhandled variant at the call sites.
#[derive(Debug, Clone, PartialEq)]
pub enum NanoparticleModel {
    Charges(Vec<ChargePoint>),
    ChargesAndDipoles(Vec<ChargeDipolePoint>),
}

impl NanoparticleModel {
    pub fn len(&self) -> usize {
        match self {
            Self::Charges(points) => points.len(),
            Self::ChargesAndDipoles(points) => points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub const fn kind_label(&self) -> &'static str {
        match self {
            Self::Charges(_) => "charges",
            Self::ChargesAndDipoles(_) => "charges and dipoles",
        }
    }

    pub fn positions(&self) -> Vec<[f64; 3]> {
        match self {
            Self::Charges(points) => points.iter().map(|point| point.position).collect(),
            Self::ChargesAndDipoles(points) => {
                points.iter().map(|point| point.position).collect()
            }
        }
    }
}

/// One parsed nanoparticle file: the model points plus their geometric
/// center (arithmetic mean of all positions).
#[derive(Debug, Clone, PartialEq)]
pub struct Nanoparticle {
    pub source: PathBuf,
    pub model: NanoparticleModel,
    pub geometric_center: [f64; 3],
}

impl Nanoparticle {
    pub fn count(&self) -> usize {
        self.model.len()
    }
}
