//! Last-value cache for TX3 sensors

use arrayvec::ArrayVec;

// TX3 sensors retransmit continuously; this many distinct sensors can
// be tracked at once
const CACHE_SLOTS: usize = 30;

/// Result of offering a value to the [`SensorCache`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CacheOutcome {
    /// First transmission seen from this (address, type); now tracked
    New,

    /// Known sensor, value changed; cache updated in place
    Updated,

    /// Known sensor, value identical to the last one seen
    Unchanged,

    /// Unknown sensor and every slot is taken; not tracked
    Full,
}

#[derive(Clone, Copy, Debug)]
struct SensorSlot {
    address: u8,
    sensor_type: u8,
    value: f32,
}

/// Bounded table of last-seen TX3 sensor values
///
/// TX3 sensors repeat their transmission every few seconds whether or
/// not anything changed. The cache maps each distinct
/// (address, type) pair to the last value it reported, so the decoder
/// can suppress readings that carry no new information.
///
/// The table holds [`CAPACITY`](SensorCache::CAPACITY) sensors. There
/// is no eviction: a slot, once claimed, belongs to its sensor for the
/// life of the cache. When the table is full, further distinct sensors
/// are rejected with [`CacheOutcome::Full`] rather than tracked.
///
/// Values are compared with exact floating-point equality. The values
/// come from BCD digits and are bit-identical between retransmissions;
/// an epsilon would only mask genuine tenth-of-a-degree changes.
#[derive(Clone, Debug, Default)]
pub struct SensorCache {
    slots: ArrayVec<SensorSlot, CACHE_SLOTS>,
}

impl SensorCache {
    /// Maximum number of distinct sensors tracked
    pub const CAPACITY: usize = CACHE_SLOTS;

    /// Empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a decoded value, reporting what it changed
    ///
    /// Looks up (address, type) and inserts or updates as needed.
    /// Only [`CacheOutcome::New`] and [`CacheOutcome::Updated`] mean
    /// the value is news worth reporting.
    pub fn observe(&mut self, address: u8, sensor_type: u8, value: f32) -> CacheOutcome {
        match self
            .slots
            .iter_mut()
            .find(|slot| slot.address == address && slot.sensor_type == sensor_type)
        {
            Some(slot) if slot.value == value => CacheOutcome::Unchanged,
            Some(slot) => {
                slot.value = value;
                CacheOutcome::Updated
            }
            None => {
                match self.slots.try_push(SensorSlot {
                    address,
                    sensor_type,
                    value,
                }) {
                    Ok(()) => CacheOutcome::New,
                    Err(_) => CacheOutcome::Full,
                }
            }
        }
    }

    /// Last value seen from a sensor, if it is tracked
    pub fn last_value(&self, address: u8, sensor_type: u8) -> Option<f32> {
        self.slots
            .iter()
            .find(|slot| slot.address == address && slot.sensor_type == sensor_type)
            .map(|slot| slot.value)
    }

    /// Number of sensors currently tracked
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True if no sensors are tracked
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// True if no further distinct sensors can be tracked
    pub fn is_full(&self) -> bool {
        self.slots.is_full()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_update_unchanged() {
        let mut cache = SensorCache::new();

        assert_eq!(cache.observe(0x05, 0x0, -24.7), CacheOutcome::New);
        assert_eq!(cache.observe(0x05, 0x0, -24.7), CacheOutcome::Unchanged);
        assert_eq!(cache.observe(0x05, 0x0, -24.6), CacheOutcome::Updated);
        assert_eq!(cache.last_value(0x05, 0x0), Some(-24.6));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_address_and_type_form_the_key() {
        let mut cache = SensorCache::new();

        assert_eq!(cache.observe(0x05, 0x0, 20.0), CacheOutcome::New);
        assert_eq!(cache.observe(0x05, 0xE, 20.0), CacheOutcome::New);
        assert_eq!(cache.observe(0x06, 0x0, 20.0), CacheOutcome::New);
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_full_rejects_without_eviction() {
        let mut cache = SensorCache::new();
        for address in 0..SensorCache::CAPACITY as u8 {
            assert_eq!(cache.observe(address, 0x0, 1.0), CacheOutcome::New);
        }
        assert!(cache.is_full());

        assert_eq!(cache.observe(0x7F, 0x0, 1.0), CacheOutcome::Full);
        assert_eq!(cache.last_value(0x7F, 0x0), None);

        // known sensors still update normally at capacity
        assert_eq!(cache.observe(3, 0x0, 2.0), CacheOutcome::Updated);
        assert_eq!(cache.len(), SensorCache::CAPACITY);
    }
}
