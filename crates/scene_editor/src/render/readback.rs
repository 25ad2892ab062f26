//! Picking read-back handoff
//!
//! The renderer completes a read-back whenever it likes, possibly on another
//! thread. Completion only writes into a [`PickingReadback`]; the picking
//! system consumes the result on its next update.
//!
//! Every request is tagged with a session id. A completion carrying an id
//! other than the current one is stale and dropped.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Entity index written into the picking buffer for "no entity"
pub const NO_ENTITY: u32 = u32::MAX;

#[derive(Debug, Default)]
struct Slot {
    session: u64,
    result: Option<u32>,
}

/// Single-producer single-consumer slot for one picking result.
///
/// Session check and publish happen under one lock.
#[derive(Debug, Default)]
pub struct PickingReadback {
    slot: Mutex<Slot>,
}

impl PickingReadback {
    /// Empty handoff
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        // Plain values, still consistent after a poisoning panic
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a new session, invalidating any in-flight completion.
    ///
    /// Returns the id the completion must present.
    pub fn begin(&self) -> u64 {
        let mut slot = self.lock();
        slot.session += 1;
        slot.result = None;
        slot.session
    }

    /// Publish a result for `session`. Ignored if the session is stale.
    pub fn complete(&self, session: u64, index: u32) -> bool {
        let mut slot = self.lock();
        if slot.session != session {
            log::debug!("Dropping stale picking result for session {}", session);
            return false;
        }

        slot.result = Some(index);
        true
    }

    /// Whether a result is waiting
    pub fn is_ready(&self) -> bool {
        self.lock().result.is_some()
    }

    /// Consume the waiting result, if any
    pub fn take(&self) -> Option<u32> {
        self.lock().result.take()
    }
}

/// Decode the little-endian entity index stored at pixel (`x`, `y`).
///
/// Returns `None` if the pixel lies outside `data`.
pub fn decode_entity_index(data: &[u8], x: u32, y: u32, row_pitch: u32, block_size: u32) -> Option<u32> {
    let offset = (y as usize)
        .checked_mul(row_pitch as usize)?
        .checked_add((x as usize).checked_mul(block_size as usize)?)?;
    let bytes = data.get(offset..offset.checked_add(4)?)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_decode_pixel_ten_ten() {
        let row_pitch = 256;
        let mut data = vec![0xffu8; row_pitch * 32];
        let offset = 10 * row_pitch + 10 * 4;
        data[offset..offset + 4].copy_from_slice(&42u32.to_le_bytes());

        assert_eq!(decode_entity_index(&data, 10, 10, 256, 4), Some(42));
        assert_eq!(decode_entity_index(&data, 11, 10, 256, 4), Some(NO_ENTITY));
    }

    #[test]
    fn test_decode_out_of_bounds() {
        let data = vec![0u8; 64];
        assert_eq!(decode_entity_index(&data, 15, 0, 64, 4), Some(0));
        assert_eq!(decode_entity_index(&data, 16, 0, 64, 4), None);
        assert_eq!(decode_entity_index(&data, 0, 1, 64, 4), None);
    }

    #[test]
    fn test_stale_session_ignored() {
        let readback = PickingReadback::new();
        let first = readback.begin();
        let second = readback.begin();

        assert!(!readback.complete(first, 3));
        assert!(readback.take().is_none());

        assert!(readback.complete(second, 5));
        assert_eq!(readback.take(), Some(5));
        assert!(readback.take().is_none());
    }

    #[test]
    fn test_begin_discards_unconsumed_result() {
        let readback = PickingReadback::new();
        let first = readback.begin();
        assert!(readback.complete(first, 7));

        let second = readback.begin();
        assert!(!readback.is_ready());
        assert!(!readback.complete(first, 8));
        assert!(readback.take().is_none());

        assert!(readback.complete(second, 9));
        assert_eq!(readback.take(), Some(9));
    }

    #[test]
    fn test_completion_from_other_thread() {
        let readback = Arc::new(PickingReadback::new());
        let session = readback.begin();

        let producer = Arc::clone(&readback);
        std::thread::spawn(move || {
            producer.complete(session, 99);
        })
        .join()
        .unwrap();

        assert!(readback.is_ready());
        assert_eq!(readback.take(), Some(99));
    }
}
