// src/selection/mod.rs
//
// Click-driven atom selection. The candidate set for a click comes from the
// model through `AtomQuery`; the modifier decides how it combines with the
// previous selection, and the result never leaves the default-displayed set.

pub mod click;

pub use click::{ClickCallback, ClickCode, ClickHandler};

use crate::error::{Error, Result};
use std::collections::BTreeSet;
use std::str::FromStr;

pub type AtomId = usize;
pub type AtomSet = BTreeSet<AtomId>;

/// Queries the selection engine needs from the atom model.
pub trait AtomQuery {
    fn element_of(&self, atom: AtomId) -> Option<&str>;

    fn query_element(&self, element: &str) -> AtomSet;

    /// All atoms within `radius` of `atom`, `atom` included.
    fn query_sphere(&self, atom: AtomId, radius: f64) -> AtomSet;

    /// The connected fragment containing `atom`.
    fn query_molecule(&self, atom: AtomId) -> AtomSet;

    /// Atoms within `hops` bonds of `atom`, `atom` itself excluded.
    fn query_bonded(&self, atom: AtomId, hops: usize) -> AtomSet;

    fn query_cell(&self, cell: [i32; 3]) -> AtomSet;
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SelectionMode {
    /// Clicking does not select
    #[default]
    None,
    Atom,
    Element,
    Sphere { radius: f64 },
    Molecule,
    Bonds { hops: usize },
}

impl SelectionMode {
    pub const DEFAULT_SPHERE_RADIUS: f64 = 2.0;
    pub const DEFAULT_BOND_HOPS: usize = 1;

    pub fn name(&self) -> &'static str {
        match self {
            SelectionMode::None => "none",
            SelectionMode::Atom => "atom",
            SelectionMode::Element => "element",
            SelectionMode::Sphere { .. } => "sphere",
            SelectionMode::Molecule => "molecule",
            SelectionMode::Bonds { .. } => "bonds",
        }
    }

    /// Replaces the radius of a `Sphere` mode; other modes are returned as is.
    pub fn with_radius(self, radius: f64) -> Self {
        match self {
            SelectionMode::Sphere { .. } => SelectionMode::Sphere { radius },
            other => other,
        }
    }

    /// Replaces the hop count of a `Bonds` mode; other modes are returned as is.
    pub fn with_hops(self, hops: usize) -> Self {
        match self {
            SelectionMode::Bonds { .. } => SelectionMode::Bonds { hops },
            other => other,
        }
    }

    /// Atoms picked by a click on `atom`, or `None` when the mode does not select.
    pub fn candidates<Q: AtomQuery + ?Sized>(&self, query: &Q, atom: AtomId) -> Option<AtomSet> {
        let found = match *self {
            SelectionMode::None => return None,
            SelectionMode::Atom => AtomSet::from([atom]),
            SelectionMode::Element => match query.element_of(atom) {
                Some(el) => query.query_element(el),
                None => AtomSet::new(),
            },
            SelectionMode::Sphere { radius } => query.query_sphere(atom, radius),
            SelectionMode::Molecule => query.query_molecule(atom),
            SelectionMode::Bonds { hops } => {
                // The bond query leaves out the origin
                let mut found = query.query_bonded(atom, hops);
                found.insert(atom);
                found
            }
        };
        Some(found)
    }
}

impl FromStr for SelectionMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(SelectionMode::None),
            "atom" => Ok(SelectionMode::Atom),
            "element" => Ok(SelectionMode::Element),
            "sphere" => Ok(SelectionMode::Sphere {
                radius: Self::DEFAULT_SPHERE_RADIUS,
            }),
            "molecule" => Ok(SelectionMode::Molecule),
            "bonds" => Ok(SelectionMode::Bonds {
                hops: Self::DEFAULT_BOND_HOPS,
            }),
            _ => Err(Error::UnsupportedSelectionMode(s.to_string())),
        }
    }
}

/// Modifier keys held during the click
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    /// Replace the selection
    Plain,
    /// Add to the selection
    Shift,
    /// Toggle against the selection
    Control,
}

impl Modifier {
    pub const ALL: [Modifier; 3] = [Modifier::Plain, Modifier::Shift, Modifier::Control];

    pub fn combine(&self, previous: &AtomSet, candidates: &AtomSet) -> AtomSet {
        match self {
            Modifier::Plain => candidates.clone(),
            Modifier::Shift => previous.union(candidates).copied().collect(),
            Modifier::Control => previous.symmetric_difference(candidates).copied().collect(),
        }
    }

    /// Left click with this modifier
    pub fn click_code(&self) -> ClickCode {
        match self {
            Modifier::Plain => ClickCode::LeftClick,
            Modifier::Shift => ClickCode::ShiftLeftClick,
            Modifier::Control => ClickCode::CtrlLeftClick,
        }
    }
}

impl FromStr for Modifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" | "click" => Ok(Modifier::Plain),
            "shift" => Ok(Modifier::Shift),
            "control" | "ctrl" => Ok(Modifier::Control),
            _ => Err(Error::UnsupportedSelectionMode(format!("modifier '{}'", s))),
        }
    }
}

/// New selection after clicking `clicked`.
///
/// The result is always a subset of `default_displayed`. With
/// `SelectionMode::None` the previous selection is kept (clipped).
pub fn compute_selection<Q: AtomQuery + ?Sized>(
    previous: &AtomSet,
    mode: &SelectionMode,
    clicked: AtomId,
    modifier: Modifier,
    default_displayed: &AtomSet,
    query: &Q,
) -> AtomSet {
    let combined = match mode.candidates(query, clicked) {
        Some(candidates) => modifier.combine(previous, &candidates),
        None => previous.clone(),
    };
    combined.intersection(default_displayed).copied().collect()
}
