//! Save/restore handlers over a [`PersistentStore`].

use codexwalker_core::clock::Clock;
use codexwalker_core::error::NarrativeError;
use codexwalker_core::storage::PersistentStore;
use tracing::{info, warn};

use crate::domain::progression::ProgressionState;
use crate::domain::save::{SaveInfo, SaveRecord, SaveSlot};

/// Writes the full progression state into `slot`.
///
/// # Errors
///
/// Returns [`NarrativeError::InvalidSaveSlot`] for a bad slot and
/// [`NarrativeError::Persistence`] if serialization or the store write fails.
pub fn save_game(
    progression: &ProgressionState,
    slot: u8,
    clock: &dyn Clock,
    store: &mut dyn PersistentStore,
) -> Result<(), NarrativeError> {
    let slot = SaveSlot::new(slot)?;
    let record = SaveRecord {
        state: progression.state(),
        progression: progression.data().clone(),
        timestamp: clock.iso_timestamp(),
    };
    let json =
        serde_json::to_string(&record).map_err(|e| NarrativeError::Persistence(e.to_string()))?;
    store
        .set_item(&slot.key(), json)
        .map_err(NarrativeError::Persistence)?;
    info!(slot = slot.number(), state = %record.state, "game saved");
    Ok(())
}

/// Restores `slot` into `progression`. Returns `false` if the slot is empty.
///
/// The autoplay flag is left as it was.
///
/// # Errors
///
/// Returns [`NarrativeError::InvalidSaveSlot`] for a bad slot and
/// [`NarrativeError::Persistence`] if the stored record cannot be parsed.
pub fn load_game(
    progression: &mut ProgressionState,
    slot: u8,
    store: &dyn PersistentStore,
) -> Result<bool, NarrativeError> {
    let slot = SaveSlot::new(slot)?;
    let Some(raw) = store.get_item(&slot.key()) else {
        info!(slot = slot.number(), "save slot is empty");
        return Ok(false);
    };
    let record: SaveRecord = serde_json::from_str(&raw).map_err(|e| {
        warn!(slot = slot.number(), error = %e, "save record is corrupt");
        NarrativeError::Persistence(format!("slot {}: {e}", slot.number()))
    })?;

    let auto_play = progression.is_auto_play();
    *progression = ProgressionState::from_parts(record.state, record.progression);
    progression.set_auto_play(auto_play);
    info!(slot = slot.number(), state = %record.state, "game loaded");
    Ok(true)
}

/// Summarizes `slot` without restoring it. An unreadable record reports as
/// not existing.
///
/// # Errors
///
/// Returns [`NarrativeError::InvalidSaveSlot`] for a bad slot.
pub fn save_info(slot: u8, store: &dyn PersistentStore) -> Result<SaveInfo, NarrativeError> {
    let slot = SaveSlot::new(slot)?;
    let record = store
        .get_item(&slot.key())
        .and_then(|raw| serde_json::from_str::<SaveRecord>(&raw).ok());
    Ok(match record {
        Some(record) => SaveInfo {
            exists: true,
            route: record.progression.current_route(),
            state: Some(record.state),
            timestamp: Some(record.timestamp),
        },
        None => SaveInfo::default(),
    })
}
