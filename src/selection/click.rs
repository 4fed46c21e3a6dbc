// src/selection/click.rs

use super::AtomId;
use std::collections::{BTreeMap, HashMap};

/// Mouse button plus modifier combination of an atom click
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClickCode {
    LeftClick,
    ShiftLeftClick,
    CtrlLeftClick,
    RightClick,
}

impl ClickCode {
    pub const ALL: [ClickCode; 4] = [
        ClickCode::LeftClick,
        ClickCode::ShiftLeftClick,
        ClickCode::CtrlLeftClick,
        ClickCode::RightClick,
    ];
}

pub type ClickCallback = Box<dyn FnMut(AtomId)>;

/// Routes atom clicks to named callbacks.
///
/// Several components can listen to the same click code without stepping on
/// each other: each one registers under its own name. A name holds at most
/// one callback per code, so registering again replaces the old closure and
/// it can never fire afterwards.
pub struct ClickHandler {
    callbacks: HashMap<ClickCode, BTreeMap<String, ClickCallback>>,
}

impl Default for ClickHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl ClickHandler {
    pub fn new() -> Self {
        Self {
            callbacks: ClickCode::ALL.into_iter().map(|c| (c, BTreeMap::new())).collect(),
        }
    }

    /// Registers `callback` as `name` for `code`, or removes it when `None`.
    pub fn set_callback(&mut self, name: &str, code: ClickCode, callback: Option<ClickCallback>) {
        let slot = self.callbacks.entry(code).or_default();
        match callback {
            Some(cb) => {
                slot.insert(name.to_string(), cb);
            }
            None => {
                slot.remove(name);
            }
        }
        log::debug!("Click handler '{}' {:?}: {} registered", name, code, slot.len());
    }

    pub fn is_bound(&self, name: &str, code: ClickCode) -> bool {
        self.callbacks
            .get(&code)
            .is_some_and(|slot| slot.contains_key(name))
    }

    /// Calls every callback registered for `code`, in name order.
    pub fn fire(&mut self, code: ClickCode, atom: AtomId) {
        if let Some(slot) = self.callbacks.get_mut(&code) {
            for cb in slot.values_mut() {
                cb(atom);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder(log: &Rc<RefCell<Vec<String>>>, tag: &str) -> ClickCallback {
        let log = log.clone();
        let tag = tag.to_string();
        Box::new(move |a| log.borrow_mut().push(format!("{}:{}", tag, a)))
    }

    #[test]
    fn multiplexes_by_name() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut h = ClickHandler::new();
        h.set_callback("select", ClickCode::LeftClick, Some(recorder(&log, "select")));
        h.set_callback("euler", ClickCode::LeftClick, Some(recorder(&log, "euler")));
        h.set_callback("euler", ClickCode::RightClick, Some(recorder(&log, "euler-b")));

        h.fire(ClickCode::LeftClick, 3);
        h.fire(ClickCode::RightClick, 4);
        h.fire(ClickCode::CtrlLeftClick, 5);

        assert_eq!(*log.borrow(), vec!["euler:3", "select:3", "euler-b:4"]);
    }

    #[test]
    fn last_registration_wins() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut h = ClickHandler::new();
        h.set_callback("select", ClickCode::LeftClick, Some(recorder(&log, "old")));
        h.set_callback("select", ClickCode::LeftClick, Some(recorder(&log, "new")));
        h.fire(ClickCode::LeftClick, 1);
        assert_eq!(*log.borrow(), vec!["new:1"]);

        h.set_callback("select", ClickCode::LeftClick, None);
        assert!(!h.is_bound("select", ClickCode::LeftClick));
        h.fire(ClickCode::LeftClick, 2);
        assert_eq!(log.borrow().len(), 1);
    }
}
