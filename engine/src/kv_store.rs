//! Per-battle key/value store. A flat `(key) -> Value192` map scoped to a
//! single `Battle`; reads of an absent key return zero rather than an
//! error, treating a missing entry as its default value rather than a
//! fault.

use crate::primitives::Value192;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Opaque 32-byte slot identifier. Effects key their scratch storage off of
/// their own `EffectId` plus a local discriminator; the store itself does
/// not interpret the key.
pub type KvKey = [u8; 32];

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct KvStore {
    slots: HashMap<KvKey, Value192>,
}

impl KvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Absent keys read back as zero.
    pub fn get(&self, key: &KvKey) -> Value192 {
        self.slots.get(key).copied().unwrap_or(Value192::ZERO)
    }

    pub fn set(&mut self, key: KvKey, value: Value192) {
        if value.is_zero() {
            self.slots.remove(&key);
        } else {
            self.slots.insert(key, value);
        }
    }

    pub fn clear(&mut self, key: &KvKey) {
        self.slots.remove(key);
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
