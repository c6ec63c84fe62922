pub mod density;
pub mod dispatch;
pub mod nanoparticle;

pub use dispatch::{CalculationInputs, CalculationOutcome, run_calculation};
