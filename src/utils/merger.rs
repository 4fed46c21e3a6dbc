// src/utils/merger.rs

use super::merge::deep_merge;
use crate::error::{Error, Result};
use serde_json::Value;

/// Joins the outputs of several asynchronous loaders into a single object
/// handed to one callback.
///
/// Each of the `n` expected results is deep-merged into an accumulator; the
/// callback runs once, when the last one arrives. Calls must be serialized
/// by the caller (single-threaded event loop), and a new merger is needed for
/// every round.
pub struct CallbackMerger {
    remaining: usize,
    acc: Value,
    callback: Option<Box<dyn FnOnce(Value)>>,
}

impl CallbackMerger {
    pub fn new(n: usize, callback: impl FnOnce(Value) + 'static) -> Self {
        Self {
            remaining: n,
            acc: Value::Object(Default::default()),
            callback: Some(Box::new(callback)),
        }
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }

    pub fn call(&mut self, partial: Value) -> Result<()> {
        if self.remaining == 0 {
            return Err(Error::OverCompletion);
        }

        deep_merge(&mut self.acc, partial);
        self.remaining -= 1;
        log::debug!("CallbackMerger: {} results pending", self.remaining);

        if self.remaining == 0 {
            if let Some(cb) = self.callback.take() {
                cb(std::mem::take(&mut self.acc));
            }
        }
        Ok(())
    }
}
