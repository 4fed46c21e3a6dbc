/// Covalent radius in Angstroms for an element symbol.
/// Used to decide which atom pairs count as bonded.
pub fn covalent_radius(element: &str) -> f64 {
    match element {
        // --- Period 1 ---
        "H"  => 0.31,
        "He" => 0.28,

        // --- Period 2 ---
        "Li" => 1.28, "Be" => 0.96, "B" => 0.84, "C" => 0.76,
        "N"  => 0.71, "O"  => 0.66, "F" => 0.57, "Ne" => 0.58,

        // --- Period 3 ---
        "Na" => 1.66, "Mg" => 1.41, "Al" => 1.21, "Si" => 1.11,
        "P"  => 1.07, "S"  => 1.05, "Cl" => 1.02, "Ar" => 1.06,

        // --- Period 4 ---
        "K"  => 2.03, "Ca" => 1.76, "Sc" => 1.70, "Ti" => 1.60, "V"  => 1.53,
        "Cr" => 1.39, "Mn" => 1.39, "Fe" => 1.32, "Co" => 1.26, "Ni" => 1.24,
        "Cu" => 1.32, "Zn" => 1.22, "Ga" => 1.22, "Ge" => 1.20, "As" => 1.19,
        "Se" => 1.20, "Br" => 1.20, "Kr" => 1.16,

        // --- Period 5 (Selected) ---
        "Rb" => 2.20, "Sr" => 1.95, "Y" => 1.90, "Zr" => 1.75,
        "Ag" => 1.45, "Cd" => 1.44, "Sn" => 1.39, "I" => 1.39,

        // --- Catch-All (Unknown) ---
        _    => 1.50,
    }
}
