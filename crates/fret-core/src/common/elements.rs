//! Element-symbol lookup for the atom records of cube files.

/// Symbols indexed by atomic number. Index 0 is unused; entries cover
/// hydrogen through mercury, which is the range emitted by the supported
/// quantum-chemistry packages.
const ELEMENT_SYMBOLS: [&str; 81] = [
    "", "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S",
    "Cl", "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge",
    "As", "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd",
    "In", "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd",
    "Tb", "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg",
];

/// Sentinel symbol for atomic numbers outside the supported table.
pub const UNKNOWN_ELEMENT: &str = "X";

/// Returns the element symbol for an atomic number, or [`UNKNOWN_ELEMENT`]
/// when the number falls outside the table.
pub fn symbol_for_atomic_number(atomic_number: i64) -> &'static str {
    if atomic_number > 0 && (atomic_number as usize) < ELEMENT_SYMBOLS.len() {
        ELEMENT_SYMBOLS[atomic_number as usize]
    } else {
        UNKNOWN_ELEMENT
    }
}
