//! Nanoparticle point-charge/point-dipole model ingestion.

mod model;
mod parser;

pub use model::{ChargeDipolePoint, ChargePoint, Nanoparticle, NanoparticleModel};
pub use parser::{
    CHARGES_HEADER, DIPOLES_HEADER, FRET_BLOCK_END, FRET_BLOCK_START, parse_nanoparticle_file,
};
