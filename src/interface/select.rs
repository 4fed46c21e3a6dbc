// src/interface/select.rs

use crate::selection::{compute_selection, AtomQuery, AtomSet, ClickHandler, Modifier, SelectionMode};
use crate::state::{Action, Event, Store, Update};
use std::cell::RefCell;
use std::rc::Rc;

const HANDLER_NAME: &str = "select";

/// What the viewer shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// Only the current selection
    Selected,
    /// The primary unit cell
    Default,
}

/// Binds click selection to the store and the click registry.
pub struct SelectInterface {
    store: Rc<RefCell<Store>>,
    clicks: Rc<RefCell<ClickHandler>>,
    model: Rc<dyn AtomQuery>,
}

impl SelectInterface {
    pub fn new(
        store: Rc<RefCell<Store>>,
        clicks: Rc<RefCell<ClickHandler>>,
        model: Rc<dyn AtomQuery>,
    ) -> Self {
        Self {
            store,
            clicks,
            model,
        }
    }

    pub fn highlighted(&self) -> bool {
        self.store.borrow().state().select.highlighted
    }

    pub fn set_highlighted(&self, v: bool) {
        self.store
            .borrow_mut()
            .dispatch(Action::update(Update::SelHighlight(v)));
    }

    pub fn selected(&self) -> AtomSet {
        self.store.borrow().state().select.selected.clone()
    }

    pub fn set_selected(&self, v: AtomSet) {
        self.store
            .borrow_mut()
            .dispatch(Action::update(Update::Selected(v)).listen(Event::Selection));
    }

    pub fn displayed(&self) -> AtomSet {
        self.store.borrow().state().select.displayed.clone()
    }

    pub fn set_displayed(&self, v: AtomSet) {
        self.store
            .borrow_mut()
            .dispatch(Action::update(Update::Displayed(v)).listen(Event::Display));
    }

    pub fn selection_mode(&self) -> SelectionMode {
        self.store.borrow().state().select.mode
    }

    /// Switches what a click on an atom selects.
    ///
    /// Returns `false` without touching anything when `mode` (parameters
    /// included) is already active. `SelectionMode::None` unbinds the
    /// selection callbacks.
    pub fn set_select(&self, mode: SelectionMode) -> bool {
        if self.selection_mode() == mode {
            return false;
        }

        {
            let mut clicks = self.clicks.borrow_mut();
            for modifier in Modifier::ALL {
                let cb = match mode {
                    SelectionMode::None => None,
                    _ => Some(self.make_callback(mode, modifier)),
                };
                clicks.set_callback(HANDLER_NAME, modifier.click_code(), cb);
            }
        }

        log::debug!("Selection mode set to {:?}", mode);
        self.store
            .borrow_mut()
            .dispatch(Action::update(Update::SelMode(mode)));
        true
    }

    pub fn set_display(&self, mode: DisplayMode) {
        match mode {
            DisplayMode::Selected => self.set_displayed(self.selected()),
            DisplayMode::Default => self.set_displayed(self.model.query_cell([0, 0, 0])),
        }
    }

    /// Makes the primary cell the selectable set and shows it, dropping any
    /// selection outside it.
    pub fn reset_default_display(&self) {
        let cell = self.model.query_cell([0, 0, 0]);
        let selected: AtomSet = self.selected().intersection(&cell).copied().collect();
        self.store.borrow_mut().dispatch(
            Action::update(Update::DefaultDisplayed(cell.clone()))
                .and(Update::Displayed(cell))
                .and(Update::Selected(selected))
                .listen(Event::Display)
                .listen(Event::Selection),
        );
    }

    fn make_callback(&self, mode: SelectionMode, modifier: Modifier) -> Box<dyn FnMut(usize)> {
        let store = Rc::clone(&self.store);
        let model = Rc::clone(&self.model);

        Box::new(move |atom| {
            let next = {
                let st = store.borrow();
                let sel = &st.state().select;
                compute_selection(
                    &sel.selected,
                    &mode,
                    atom,
                    modifier,
                    &sel.default_displayed,
                    model.as_ref(),
                )
            };
            store
                .borrow_mut()
                .dispatch(Action::update(Update::Selected(next)).listen(Event::Selection));
        })
    }
}
