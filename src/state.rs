// src/state.rs
//
// Viewer state held in a single store. Components read it through
// `Store::state()` and change it only by dispatching an `Action`, which lists
// typed updates and the events that listeners should react to.

use crate::selection::{AtomId, AtomSet, SelectionMode};
use crate::tensor::{Convention, EulerAngles, TensorKind};

/// Notifications queued by a dispatch for the listeners to process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    Selection,
    Display,
    EulAngles,
}

/// Which of the two atoms of an Euler angle measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    A,
    B,
}

#[derive(Debug, Clone, Default)]
pub struct SelectState {
    pub mode: SelectionMode,
    pub highlighted: bool,
    pub selected: AtomSet,
    pub displayed: AtomSet,
    pub default_displayed: AtomSet,
}

#[derive(Debug, Clone)]
pub struct EulerState {
    pub atom_a: Option<AtomId>,
    pub new_atom_a: Option<AtomId>,
    pub tensor_a: TensorKind,
    pub atom_b: Option<AtomId>,
    pub new_atom_b: Option<AtomId>,
    pub tensor_b: TensorKind,
    pub convention: Convention,
    pub results: Option<EulerAngles>,
}

impl Default for EulerState {
    fn default() -> Self {
        Self {
            atom_a: None,
            new_atom_a: None,
            tensor_a: TensorKind::Ms,
            atom_b: None,
            new_atom_b: None,
            tensor_b: TensorKind::Ms,
            convention: Convention::Zyz,
            results: None,
        }
    }
}

impl EulerState {
    pub fn atom(&self, slot: Slot) -> Option<AtomId> {
        match slot {
            Slot::A => self.atom_a,
            Slot::B => self.atom_b,
        }
    }

    pub fn new_atom(&self, slot: Slot) -> Option<AtomId> {
        match slot {
            Slot::A => self.new_atom_a,
            Slot::B => self.new_atom_b,
        }
    }

    pub fn tensor(&self, slot: Slot) -> TensorKind {
        match slot {
            Slot::A => self.tensor_a,
            Slot::B => self.tensor_b,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub select: SelectState,
    pub euler: EulerState,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    SelMode(SelectionMode),
    SelHighlight(bool),
    Selected(AtomSet),
    Displayed(AtomSet),
    DefaultDisplayed(AtomSet),
    EulNewAtom(Slot, Option<AtomId>),
    EulAtom(Slot, Option<AtomId>),
    EulTensor(Slot, TensorKind),
    EulConvention(Convention),
    EulResults(Option<EulerAngles>),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Action {
    pub updates: Vec<Update>,
    pub listen: Vec<Event>,
}

impl Action {
    pub fn update(update: Update) -> Self {
        Self {
            updates: vec![update],
            listen: Vec::new(),
        }
    }

    pub fn and(mut self, update: Update) -> Self {
        self.updates.push(update);
        self
    }

    pub fn listen(mut self, event: Event) -> Self {
        self.listen.push(event);
        self
    }
}

#[derive(Debug, Default)]
pub struct Store {
    state: AppState,
    pending: Vec<Event>,
}

impl Store {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            pending: Vec::new(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn dispatch(&mut self, action: Action) {
        log::debug!(
            "dispatch: {} updates, events {:?}",
            action.updates.len(),
            action.listen
        );

        for update in action.updates {
            self.apply(update);
        }
        for event in action.listen {
            if !self.pending.contains(&event) {
                self.pending.push(event);
            }
        }
    }

    /// Events queued since the last call, in first-dispatch order
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.pending)
    }

    fn apply(&mut self, update: Update) {
        let sel = &mut self.state.select;
        let eul = &mut self.state.euler;
        match update {
            Update::SelMode(m) => sel.mode = m,
            Update::SelHighlight(h) => sel.highlighted = h,
            Update::Selected(s) => sel.selected = s,
            Update::Displayed(s) => sel.displayed = s,
            Update::DefaultDisplayed(s) => sel.default_displayed = s,
            Update::EulNewAtom(Slot::A, a) => eul.new_atom_a = a,
            Update::EulNewAtom(Slot::B, a) => eul.new_atom_b = a,
            Update::EulAtom(Slot::A, a) => eul.atom_a = a,
            Update::EulAtom(Slot::B, a) => eul.atom_b = a,
            Update::EulTensor(Slot::A, t) => eul.tensor_a = t,
            Update::EulTensor(Slot::B, t) => eul.tensor_b = t,
            Update::EulConvention(c) => eul.convention = c,
            Update::EulResults(r) => eul.results = r,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_viewer() {
        let s = AppState::default();
        assert_eq!(s.euler.tensor_a, TensorKind::Ms);
        assert_eq!(s.euler.tensor_b, TensorKind::Ms);
        assert_eq!(s.euler.convention, Convention::Zyz);
        assert_eq!(s.select.mode, SelectionMode::None);
        assert!(s.euler.results.is_none());
    }

    #[test]
    fn dispatch_applies_updates_and_queues_events_once() {
        let mut store = Store::default();
        store.dispatch(
            Action::update(Update::EulNewAtom(Slot::B, Some(4)))
                .and(Update::EulTensor(Slot::B, TensorKind::Efg))
                .listen(Event::EulAngles),
        );
        store.dispatch(Action::update(Update::Selected(AtomSet::from([1, 2]))).listen(Event::Selection));
        store.dispatch(Action::update(Update::EulConvention(Convention::Zxz)).listen(Event::EulAngles));

        let st = store.state();
        assert_eq!(st.euler.new_atom(Slot::B), Some(4));
        assert_eq!(st.euler.tensor(Slot::B), TensorKind::Efg);
        assert_eq!(st.euler.convention, Convention::Zxz);
        assert_eq!(st.select.selected, AtomSet::from([1, 2]));

        assert_eq!(store.take_events(), vec![Event::EulAngles, Event::Selection]);
        assert!(store.take_events().is_empty());
    }
}
