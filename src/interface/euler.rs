// src/interface/euler.rs

use crate::error::{missing_data, Error, Result};
use crate::model::Structure;
use crate::selection::{AtomId, AtomSet, ClickCode, ClickHandler};
use crate::state::{Action, Event, Slot, Store, Update};
use crate::tensor::{euler_between_tensors, Convention, EulerAngles, TensorKind};
use crate::utils::report::{table_row, Cell};
use std::cell::RefCell;
use std::rc::Rc;

const HANDLER_NAME: &str = "euler";
const NOT_SELECTED: &str = "Not selected";
const NOT_AVAILABLE: &str = "N/A";

/// Euler angles between the tensors of two clicked atoms.
///
/// Clicks only record pending atoms; `refresh` is the listener for
/// `Event::EulAngles` and does the actual work.
pub struct EulerInterface {
    store: Rc<RefCell<Store>>,
}

impl EulerInterface {
    pub fn new(store: Rc<RefCell<Store>>) -> Self {
        Self { store }
    }

    pub fn convention(&self) -> Convention {
        self.store.borrow().state().euler.convention
    }

    pub fn set_convention(&self, tag: &str) -> Result<()> {
        let c: Convention = tag.parse()?;
        self.store
            .borrow_mut()
            .dispatch(Action::update(Update::EulConvention(c)).listen(Event::EulAngles));
        Ok(())
    }

    pub fn tensor_a(&self) -> TensorKind {
        self.store.borrow().state().euler.tensor_a
    }

    pub fn tensor_b(&self) -> TensorKind {
        self.store.borrow().state().euler.tensor_b
    }

    pub fn set_tensor_a(&self, tag: &str) -> Result<()> {
        self.set_tensor(Slot::A, tag)
    }

    pub fn set_tensor_b(&self, tag: &str) -> Result<()> {
        self.set_tensor(Slot::B, tag)
    }

    fn set_tensor(&self, slot: Slot, tag: &str) -> Result<()> {
        let kind: TensorKind = tag.parse()?;
        self.store
            .borrow_mut()
            .dispatch(Action::update(Update::EulTensor(slot, kind)).listen(Event::EulAngles));
        Ok(())
    }

    pub fn atom_a(&self) -> Option<AtomId> {
        self.store.borrow().state().euler.atom_a
    }

    pub fn atom_b(&self) -> Option<AtomId> {
        self.store.borrow().state().euler.atom_b
    }

    pub fn atom_label_a(&self, structure: &Structure) -> String {
        label_of(structure, self.atom_a())
    }

    pub fn atom_label_b(&self, structure: &Structure) -> String {
        label_of(structure, self.atom_b())
    }

    pub fn results(&self) -> Option<EulerAngles> {
        self.store.borrow().state().euler.results
    }

    pub fn alpha(&self) -> Option<f64> {
        self.results().map(|e| e.alpha.to_degrees())
    }

    pub fn beta(&self) -> Option<f64> {
        self.results().map(|e| e.beta.to_degrees())
    }

    pub fn gamma(&self) -> Option<f64> {
        self.results().map(|e| e.gamma.to_degrees())
    }

    pub fn alpha_rad(&self) -> Option<f64> {
        self.results().map(|e| e.alpha)
    }

    pub fn beta_rad(&self) -> Option<f64> {
        self.results().map(|e| e.beta)
    }

    pub fn gamma_rad(&self) -> Option<f64> {
        self.results().map(|e| e.gamma)
    }

    /// Left click picks atom A, right click atom B.
    pub fn bind(&self, clicks: &mut ClickHandler) {
        for (code, slot) in [(ClickCode::LeftClick, Slot::A), (ClickCode::RightClick, Slot::B)] {
            let store = Rc::clone(&self.store);
            clicks.set_callback(
                HANDLER_NAME,
                code,
                Some(Box::new(move |atom| {
                    store.borrow_mut().dispatch(
                        Action::update(Update::EulNewAtom(slot, Some(atom))).listen(Event::EulAngles),
                    );
                })),
            );
        }
    }

    pub fn unbind(&self, clicks: &mut ClickHandler) {
        clicks.set_callback(HANDLER_NAME, ClickCode::LeftClick, None);
        clicks.set_callback(HANDLER_NAME, ClickCode::RightClick, None);
        self.store.borrow_mut().dispatch(
            Action::update(Update::EulNewAtom(Slot::A, None))
                .and(Update::EulNewAtom(Slot::B, None))
                .listen(Event::EulAngles),
        );
    }

    /// Promotes pending atoms and recomputes the angles.
    ///
    /// Results are cleared when either atom is unset or lacks the chosen
    /// tensor; the latter is also reported as `Error::MissingData`.
    pub fn refresh(&self, structure: &Structure) -> Result<()> {
        let eul = self.store.borrow().state().euler.clone();

        let mut action = Action::default();
        let mut atoms = [eul.atom_a, eul.atom_b];
        for (i, slot) in [Slot::A, Slot::B].into_iter().enumerate() {
            if let Some(a) = eul.new_atom(slot) {
                atoms[i] = Some(a);
                action = action
                    .and(Update::EulAtom(slot, Some(a)))
                    .and(Update::EulNewAtom(slot, None));
            }
        }

        let computed = match atoms {
            [Some(a), Some(b)] => {
                match (structure.tensor(a, eul.tensor_a), structure.tensor(b, eul.tensor_b)) {
                    (Some(ta), Some(tb)) => Ok(Some(euler_between_tensors(ta, tb, eul.convention))),
                    (None, _) => Err(missing_tensor(structure, a, eul.tensor_a)),
                    (_, None) => Err(missing_tensor(structure, b, eul.tensor_b)),
                }
            }
            _ => Ok(None),
        };

        let results = computed.as_ref().ok().copied().flatten();
        self.store
            .borrow_mut()
            .dispatch(action.and(Update::EulResults(results)));
        computed.map(|_| ())
    }

    pub fn txt_report(&self, structure: &Structure) -> String {
        let eul = self.store.borrow().state().euler.clone();
        let fmt = |v: Option<f64>| v.map_or_else(|| NOT_AVAILABLE.to_string(), |x| x.to_string());

        let mut out = String::from("Euler angles between tensors:\n");
        out.push_str(&format!("{} on {}\n", eul.tensor_a.tag(), label_of(structure, eul.atom_a)));
        out.push_str("and\n");
        out.push_str(&format!("{} on {}\n\n", eul.tensor_b.tag(), label_of(structure, eul.atom_b)));
        out.push_str(&format!("Convention: {}\n\n", eul.convention.tag().to_uppercase()));
        out.push_str(&format!(
            "Degrees:\n{}\t{}\t{}\n\n",
            fmt(self.alpha()),
            fmt(self.beta()),
            fmt(self.gamma())
        ));
        out.push_str(&format!(
            "Radians:\n{}\t{}\t{}\n",
            fmt(self.alpha_rad()),
            fmt(self.beta_rad()),
            fmt(self.gamma_rad())
        ));
        out
    }

    /// Table of the MS to EFG angles of each atom, in radians.
    ///
    /// Covers `selected`, or `displayed` when nothing is selected.
    pub fn txt_self_angle_table(
        &self,
        structure: &Structure,
        selected: &AtomSet,
        displayed: &AtomSet,
        width: usize,
        precision: usize,
    ) -> Result<String> {
        if !(structure.has_array(TensorKind::Ms) && structure.has_array(TensorKind::Efg)) {
            return Err(missing_data("both MS and EFG tensors are needed for this table"));
        }

        let convention = self.convention();
        let targets = if selected.is_empty() { displayed } else { selected };

        let mut out = format!(
            "Euler angles between MS and EFG tensors in radians, convention: {}\n",
            convention.tag().to_uppercase()
        );
        for &id in targets {
            let (Some(ms), Some(efg)) = (structure.tensor(id, TensorKind::Ms), structure.tensor(id, TensorKind::Efg)) else {
                continue;
            };
            let e = euler_between_tensors(ms, efg, convention);
            let label = label_of(structure, Some(id));
            out.push_str(&table_row(
                &[Cell::from(label), e.alpha.into(), e.beta.into(), e.gamma.into()],
                width,
                precision,
            ));
        }
        Ok(out)
    }
}

fn label_of(structure: &Structure, atom: Option<AtomId>) -> String {
    atom.and_then(|a| structure.atom(a))
        .map_or_else(|| NOT_SELECTED.to_string(), |a| a.label.clone())
}

fn missing_tensor(structure: &Structure, atom: AtomId, kind: TensorKind) -> Error {
    missing_data(&format!(
        "atom {} has no {} tensor",
        label_of(structure, Some(atom)),
        kind.tag()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const PAIR: &str = r#"{
        "atoms": [
            {"element": "C", "position": [0.0, 0.0, 0.0],
             "tensors": {"ms": [[1.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 3.0]],
                         "efg": [[1.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 3.0]]}},
            {"element": "C", "position": [3.0, 0.0, 0.0],
             "tensors": {"ms": [[2.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 3.0]],
                         "efg": [[2.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 3.0]]}},
            {"element": "H", "position": [6.0, 0.0, 0.0],
             "tensors": {"ms": [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 5.0]]}}
        ]
    }"#;

    fn setup() -> (EulerInterface, Rc<RefCell<Store>>, Structure) {
        let store = Rc::new(RefCell::new(Store::default()));
        let s = Structure::from_json_str(PAIR, 0.2).unwrap();
        (EulerInterface::new(store.clone()), store, s)
    }

    #[test]
    fn clicks_then_refresh_compute_angles() {
        let (intf, store, s) = setup();
        let mut clicks = ClickHandler::new();
        intf.bind(&mut clicks);

        clicks.fire(ClickCode::LeftClick, 0);
        assert_eq!(store.borrow_mut().take_events(), vec![Event::EulAngles]);
        intf.refresh(&s).unwrap();
        assert_eq!(intf.atom_label_a(&s), "C1");
        assert_eq!(intf.atom_label_b(&s), NOT_SELECTED);
        assert!(intf.alpha().is_none());

        clicks.fire(ClickCode::RightClick, 1);
        intf.refresh(&s).unwrap();
        assert_eq!(intf.atom_label_b(&s), "C2");
        assert_abs_diff_eq!(intf.alpha().unwrap(), 90.0, epsilon = 1e-6);
        assert_abs_diff_eq!(intf.beta().unwrap(), 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(intf.gamma().unwrap(), 0.0, epsilon = 1e-6);
        assert!(store.borrow().state().euler.new_atom_a.is_none());
    }

    #[test]
    fn missing_tensor_clears_results() {
        let (intf, store, s) = setup();
        store.borrow_mut().dispatch(
            Action::update(Update::EulNewAtom(Slot::A, Some(0))).and(Update::EulNewAtom(Slot::B, Some(1))),
        );
        intf.refresh(&s).unwrap();
        assert!(intf.results().is_some());

        intf.set_tensor_b("efg").unwrap();
        store.borrow_mut().dispatch(Action::update(Update::EulNewAtom(Slot::B, Some(2))));
        assert!(matches!(intf.refresh(&s), Err(Error::MissingData(_))));
        assert!(intf.results().is_none());
        assert_eq!(intf.atom_b(), Some(2));
    }

    #[test]
    fn bad_tags_rejected() {
        let (intf, _, _) = setup();
        assert!(matches!(intf.set_tensor_a("isc"), Err(Error::UnsupportedTensorKind(_))));
        assert!(matches!(intf.set_convention("xyz"), Err(Error::UnsupportedConvention(_))));
        intf.set_convention("zxz").unwrap();
        assert_eq!(intf.convention(), Convention::Zxz);
    }

    #[test]
    fn unbind_drops_callbacks_and_pending_atoms() {
        let (intf, store, _) = setup();
        let mut clicks = ClickHandler::new();
        intf.bind(&mut clicks);
        clicks.fire(ClickCode::RightClick, 2);
        intf.unbind(&mut clicks);

        assert!(!clicks.is_bound(HANDLER_NAME, ClickCode::LeftClick));
        assert!(store.borrow().state().euler.new_atom_b.is_none());
        clicks.fire(ClickCode::LeftClick, 1);
        assert!(store.borrow().state().euler.new_atom_a.is_none());
    }

    #[test]
    fn report_without_results() {
        let (intf, _, s) = setup();
        let txt = intf.txt_report(&s);
        assert!(txt.contains("ms on Not selected"));
        assert!(txt.contains("Convention: ZYZ"));
        assert!(txt.contains("N/A\tN/A\tN/A"));
    }

    #[test]
    fn self_angle_table() {
        let (intf, _, s) = setup();
        let sel = AtomSet::new();
        let disp = AtomSet::from([0, 1, 2]);
        assert!(matches!(
            intf.txt_self_angle_table(&s, &sel, &disp, 20, 5),
            Err(Error::MissingData(_))
        ));

        let two = Structure::new(None, s.atoms[..2].to_vec(), 0.2);
        let txt = intf.txt_self_angle_table(&two, &sel, &AtomSet::from([0, 1]), 10, 3).unwrap();
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines[0], "Euler angles between MS and EFG tensors in radians, convention: ZYZ");
        assert_eq!(lines.len(), 3);
        assert!(lines[1].trim_start().starts_with("C1"));

        let only = intf.txt_self_angle_table(&two, &AtomSet::from([1]), &AtomSet::from([0, 1]), 10, 3).unwrap();
        assert_eq!(only.lines().count(), 2);
    }
}
