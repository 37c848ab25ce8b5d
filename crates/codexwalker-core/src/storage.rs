//! Key/value persistence port.
//!
//! Hosts back this with whatever durable storage the device offers. The
//! engine only ever reads and writes whole string values.

/// Minimal get/set contract over host storage.
pub trait PersistentStore: Send {
    /// Returns the value stored under `key`, if any.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a description of the failure if the host could not write.
    fn set_item(&mut self, key: &str, value: String) -> Result<(), String>;
}
