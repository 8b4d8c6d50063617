//! Handle table for operations submitted to the transport but not yet completed.

use super::Operation;
use crate::error::{Error, ErrorType};
use std::fmt;

/// Opaque token for one in-flight operation.
///
/// The generation makes a handle unique for the lifetime of the registry
/// even when its slot is reused, so a stale or duplicated completion can
/// never be paired with a newer operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperationHandle {
    index: u32,
    generation: u32,
}

impl fmt::Display for OperationHandle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}.{}", self.index, self.generation)
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    operation: Option<Operation>,
}

#[derive(Debug, Default)]
pub struct PendingOperationRegistry {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl PendingOperationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, operation: Operation) -> OperationHandle {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.operation = Some(operation);
            return OperationHandle {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            operation: Some(operation),
        });
        OperationHandle {
            index,
            generation: 0,
        }
    }

    /// Removes and returns the operation behind `handle`.
    ///
    /// Unknown, stale and already-resolved handles leave the registry untouched.
    pub fn resolve(&mut self, handle: OperationHandle) -> Result<Operation, Error> {
        let operation = self
            .slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.operation.take());
        match operation {
            Some(operation) => {
                self.release(handle.index);
                Ok(operation)
            }
            None => Err(Error::new(
                "Unknown operation handle".to_string(),
                format!("{handle} is not pending"),
                ErrorType::OperationNotFound,
            )),
        }
    }

    pub fn contains(&self, handle: OperationHandle) -> bool {
        self.slots
            .get(handle.index as usize)
            .map_or(false, |slot| {
                slot.generation == handle.generation && slot.operation.is_some()
            })
    }

    /// Invalidates every outstanding handle.
    pub fn discard_all(&mut self) -> usize {
        let mut discarded = 0;
        for index in 0..self.slots.len() {
            if self.slots[index].operation.take().is_some() {
                self.release(index as u32);
                discarded += 1;
            }
        }
        discarded
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn release(&mut self, index: u32) {
        let slot = &mut self.slots[index as usize];
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(index);
        self.len -= 1;
    }
}
