use super::elements::covalent_radius;
use crate::error::Result;
use crate::selection::{AtomId, AtomQuery, AtomSet};
use crate::tensor::{Tensor, TensorKind};
use crate::utils::{geometry, linalg};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Pairs closer than this are overlapping images, not bonds.
const MIN_BOND_LENGTH: f64 = 0.1;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Atom {
    pub element: String,
    // Filled in on load when missing (e.g. "C1", "C2", "H1")
    #[serde(default)]
    pub label: String,
    pub position: [f64; 3],
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tensors: BTreeMap<TensorKind, Tensor>,
}

impl Atom {
    pub fn new(element: &str, position: [f64; 3]) -> Self {
        Self {
            element: element.to_string(),
            label: String::new(),
            position,
            tensors: BTreeMap::new(),
        }
    }

    pub fn with_tensor(mut self, kind: TensorKind, tensor: Tensor) -> Self {
        self.tensors.insert(kind, tensor);
        self
    }

    pub fn tensor(&self, kind: TensorKind) -> Option<&Tensor> {
        self.tensors.get(&kind)
    }
}

/// Atoms (every periodic image the viewer shows) plus the bond graph.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Structure {
    // Lattice vectors: [a_vec, b_vec, c_vec]; None for molecules
    #[serde(default)]
    pub lattice: Option<[[f64; 3]; 3]>,
    pub atoms: Vec<Atom>,
    #[serde(skip)]
    bonds: Vec<Vec<AtomId>>,
}

impl Structure {
    pub fn new(lattice: Option<[[f64; 3]; 3]>, atoms: Vec<Atom>, bond_tolerance: f64) -> Self {
        let mut s = Self {
            lattice,
            atoms,
            bonds: Vec::new(),
        };
        s.fill_labels();
        s.rebuild_bonds(bond_tolerance);
        s
    }

    pub fn from_json_str(json: &str, bond_tolerance: f64) -> Result<Self> {
        let raw: Structure = serde_json::from_str(json)?;
        Ok(Self::new(raw.lattice, raw.atoms, bond_tolerance))
    }

    pub fn load(path: &Path, bond_tolerance: f64) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let raw: Structure = serde_json::from_reader(reader)?;
        log::info!("Loaded {} atoms from {:?}", raw.atoms.len(), path);
        Ok(Self::new(raw.lattice, raw.atoms, bond_tolerance))
    }

    /// Recomputes bonds: pairs closer than the sum of covalent radii
    /// stretched by `tolerance` (0.1 = 10% longer).
    pub fn rebuild_bonds(&mut self, tolerance: f64) {
        let n = self.atoms.len();
        let mut bonds = vec![Vec::new(); n];

        for i in 0..n {
            let ri = covalent_radius(&self.atoms[i].element);
            for j in (i + 1)..n {
                let rj = covalent_radius(&self.atoms[j].element);
                let d = geometry::calculate_distance(self.atoms[i].position, self.atoms[j].position);
                if d > MIN_BOND_LENGTH && d <= (ri + rj) * (1.0 + tolerance) {
                    bonds[i].push(j);
                    bonds[j].push(i);
                }
            }
        }

        log::debug!(
            "Bond graph rebuilt: {} bonds",
            bonds.iter().map(Vec::len).sum::<usize>() / 2
        );
        self.bonds = bonds;
    }

    fn fill_labels(&mut self) {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for atom in &mut self.atoms {
            let n = counts.entry(atom.element.clone()).or_insert(0);
            *n += 1;
            if atom.label.is_empty() {
                atom.label = format!("{}{}", atom.element, n);
            }
        }
    }

    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id)
    }

    pub fn tensor(&self, id: AtomId, kind: TensorKind) -> Option<&Tensor> {
        self.atoms.get(id).and_then(|a| a.tensor(kind))
    }

    /// True when every atom carries a tensor of this kind
    pub fn has_array(&self, kind: TensorKind) -> bool {
        !self.atoms.is_empty() && self.atoms.iter().all(|a| a.tensors.contains_key(&kind))
    }

    pub fn bonded_to(&self, id: AtomId) -> &[AtomId] {
        self.bonds.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Periodic image cell of an atom; molecules live in cell [0, 0, 0]
    pub fn cell_of(&self, id: AtomId) -> Option<[i32; 3]> {
        let atom = self.atoms.get(id)?;
        match &self.lattice {
            Some(lat) => linalg::image_cell(atom.position, lat),
            None => Some([0, 0, 0]),
        }
    }

    /// Breadth-first walk over bonds, returning each reached atom with its distance in hops
    fn walk_bonds(&self, start: AtomId, max_hops: Option<usize>) -> BTreeMap<AtomId, usize> {
        let mut seen = BTreeMap::new();
        if start >= self.atoms.len() {
            return seen;
        }

        seen.insert(start, 0);
        let mut queue = VecDeque::from([start]);
        while let Some(a) = queue.pop_front() {
            let depth = seen[&a];
            if max_hops.is_some_and(|m| depth >= m) {
                continue;
            }
            for &b in self.bonded_to(a) {
                if !seen.contains_key(&b) {
                    seen.insert(b, depth + 1);
                    queue.push_back(b);
                }
            }
        }
        seen
    }
}

impl AtomQuery for Structure {
    fn element_of(&self, atom: AtomId) -> Option<&str> {
        self.atoms.get(atom).map(|a| a.element.as_str())
    }

    fn query_element(&self, element: &str) -> AtomSet {
        self.atoms
            .iter()
            .enumerate()
            .filter(|(_, a)| a.element == element)
            .map(|(i, _)| i)
            .collect()
    }

    fn query_sphere(&self, atom: AtomId, radius: f64) -> AtomSet {
        let Some(center) = self.atoms.get(atom).map(|a| a.position) else {
            return AtomSet::new();
        };
        self.atoms
            .iter()
            .enumerate()
            .filter(|(_, a)| geometry::within_sphere(center, a.position, radius))
            .map(|(i, _)| i)
            .collect()
    }

    fn query_molecule(&self, atom: AtomId) -> AtomSet {
        self.walk_bonds(atom, None).into_keys().collect()
    }

    fn query_bonded(&self, atom: AtomId, hops: usize) -> AtomSet {
        self.walk_bonds(atom, Some(hops))
            .into_keys()
            .filter(|&i| i != atom)
            .collect()
    }

    fn query_cell(&self, cell: [i32; 3]) -> AtomSet {
        (0..self.atoms.len())
            .filter(|&i| self.cell_of(i) == Some(cell))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WATER_PAIR: &str = r#"{
        "atoms": [
            {"element": "O", "position": [0.0, 0.0, 0.0]},
            {"element": "H", "position": [0.96, 0.0, 0.0]},
            {"element": "H", "position": [-0.24, 0.93, 0.0]},
            {"element": "O", "position": [5.0, 0.0, 0.0]},
            {"element": "H", "position": [5.96, 0.0, 0.0], "label": "Hx"},
            {"element": "H", "position": [4.76, 0.93, 0.0]}
        ]
    }"#;

    #[test]
    fn loads_and_labels() {
        let s = Structure::from_json_str(WATER_PAIR, 0.2).unwrap();
        let labels: Vec<&str> = s.atoms.iter().map(|a| a.label.as_str()).collect();
        assert_eq!(labels, vec!["O1", "H1", "H2", "O2", "Hx", "H4"]);
    }

    #[test]
    fn bond_queries() {
        let s = Structure::from_json_str(WATER_PAIR, 0.2).unwrap();
        assert_eq!(s.bonded_to(0), &[1, 2]);
        assert_eq!(s.query_molecule(1), AtomSet::from([0, 1, 2]));
        assert_eq!(s.query_bonded(1, 1), AtomSet::from([0]));
        assert_eq!(s.query_bonded(1, 2), AtomSet::from([0, 2]));
        assert_eq!(s.query_element("O"), AtomSet::from([0, 3]));
        assert_eq!(s.query_sphere(0, 1.0), AtomSet::from([0, 1, 2]));
        assert!(s.query_bonded(99, 1).is_empty());
    }

    #[test]
    fn cells_from_lattice() {
        let atoms = vec![
            Atom::new("Si", [0.5, 0.5, 0.5]),
            Atom::new("Si", [4.5, 0.5, 0.5]),
            Atom::new("Si", [-1.0, 0.5, 0.5]),
        ];
        let lattice = [[4.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 4.0]];
        let s = Structure::new(Some(lattice), atoms, 0.2);
        assert_eq!(s.query_cell([0, 0, 0]), AtomSet::from([0]));
        assert_eq!(s.query_cell([1, 0, 0]), AtomSet::from([1]));
        assert_eq!(s.cell_of(2), Some([-1, 0, 0]));
    }

    #[test]
    fn tensor_arrays() {
        let json = r#"{
            "atoms": [
                {"element": "C", "position": [0.0, 0.0, 0.0],
                 "tensors": {"ms": [[1.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 3.0]]}},
                {"element": "C", "position": [1.5, 0.0, 0.0],
                 "tensors": {"ms": [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
                             "efg": [[0.1, 0.0, 0.0], [0.0, 0.2, 0.0], [0.0, 0.0, -0.3]]}}
            ]
        }"#;
        let s = Structure::from_json_str(json, 0.2).unwrap();
        assert!(s.has_array(TensorKind::Ms));
        assert!(!s.has_array(TensorKind::Efg));
        assert!(s.tensor(1, TensorKind::Efg).is_some());
        assert!(s.tensor(0, TensorKind::Efg).is_none());
    }

    #[test]
    fn asymmetric_tensor_rejected_on_load() {
        let json = r#"{"atoms": [{"element": "C", "position": [0.0, 0.0, 0.0],
            "tensors": {"ms": [[1.0, 9.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 3.0]]}}]}"#;
        assert!(Structure::from_json_str(json, 0.2).is_err());
    }
}
