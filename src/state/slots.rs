/// Fixed-capacity photo slots
///
/// Eight ordered positions, each holding zero or one processed photo.
/// The position of a photo is the position it takes in the generated report,
/// so nothing here ever compacts or reorders implicitly.

use thiserror::Error;

use super::data::ProcessedPhoto;

/// Number of photos a report needs
pub const SLOT_COUNT: usize = 8;

/// Errors raised by slot operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotError {
    #[error("slot index {0} is out of range (0..{})", SLOT_COUNT)]
    IndexOutOfRange(usize),
    #[error("{filled}/{} photos uploaded", SLOT_COUNT)]
    MissingPhotos { filled: usize },
}

/// The ordered slot collection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlotManager {
    slots: [Option<ProcessedPhoto>; SLOT_COUNT],
}

impl SlotManager {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    fn check(index: usize) -> Result<(), SlotError> {
        if index < SLOT_COUNT {
            Ok(())
        } else {
            Err(SlotError::IndexOutOfRange(index))
        }
    }

    /// Put a photo into a slot, replacing whatever was there
    pub fn assign(&mut self, index: usize, photo: ProcessedPhoto) -> Result<(), SlotError> {
        Self::check(index)?;
        self.slots[index] = Some(photo);
        Ok(())
    }

    /// Empty a slot, returning its previous occupant
    pub fn clear(&mut self, index: usize) -> Result<Option<ProcessedPhoto>, SlotError> {
        Self::check(index)?;
        Ok(self.slots[index].take())
    }

    /// Exchange the occupants of two slots
    pub fn swap(&mut self, a: usize, b: usize) -> Result<(), SlotError> {
        Self::check(a)?;
        Self::check(b)?;
        if a != b {
            self.slots.swap(a, b);
        }
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&ProcessedPhoto> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut ProcessedPhoto> {
        self.slots.get_mut(index).and_then(Option::as_mut)
    }

    pub fn is_empty_at(&self, index: usize) -> bool {
        index < SLOT_COUNT && self.slots[index].is_none()
    }

    /// Number of occupied slots
    pub fn count_filled(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_full(&self) -> bool {
        self.count_filled() == SLOT_COUNT
    }

    /// Lowest empty index at or after `start`
    pub fn first_empty_from(&self, start: usize) -> Option<usize> {
        (start..SLOT_COUNT).find(|&i| self.slots[i].is_none())
    }

    /// Index of the slot currently holding the given processed payload
    pub fn position_of(&self, processed: &str) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|p| p.processed == processed))
    }

    /// Processed payloads in slot order, as sent to report generation
    pub fn to_ordered_payload(&self) -> Result<Vec<String>, SlotError> {
        self.slots
            .iter()
            .map(|slot| slot.as_ref().map(|photo| photo.processed.clone()))
            .collect::<Option<Vec<_>>>()
            .ok_or(SlotError::MissingPhotos {
                filled: self.count_filled(),
            })
    }

    /// Iterate over all slots in order
    pub fn iter(&self) -> impl Iterator<Item = Option<&ProcessedPhoto>> {
        self.slots.iter().map(Option::as_ref)
    }
}
