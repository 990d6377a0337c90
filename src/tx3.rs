//! La Crosse TX3/TX4 packet decoding

#[cfg(not(test))]
use log::{debug, trace, warn};

#[cfg(test)]
use std::println as debug;
#[cfg(test)]
use std::println as trace;
#[cfg(test)]
use std::println as warn;

use crate::cache::{CacheOutcome, SensorCache};
use crate::framing::{read_tx3_nibble, TX3_START_BYTE};
use crate::pulse::PulseCursor;
use crate::reading::Reading;
use crate::receiver::{DecodeError, DecodeOutcome};

// Sensor type nibbles this family transmits
const TYPE_TEMPERATURE: u8 = 0x0;
const TYPE_HUMIDITY: u8 = 0xE;

// Five BCD digits: two copies of the two integer digits, with the
// fractional digit between them
const NUM_DIGITS: usize = 5;

// Decode a TX3 packet and consult the sensor cache
//
// The cursor must already be past the 0x0A start byte. Packet layout:
// type nibble, address MSB, address LSB, five BCD digits, checksum
// nibble. The checksum nibble is read in relaxed mode since it ends
// the transmission.
pub(crate) fn decode(cur: &mut PulseCursor<'_>, cache: &mut SensorCache) -> DecodeOutcome {
    match decode_packet(cur, cache) {
        Ok(out) => out,
        Err(err) => DecodeOutcome::Invalid(err),
    }
}

fn decode_packet(
    cur: &mut PulseCursor<'_>,
    cache: &mut SensorCache,
) -> Result<DecodeOutcome, DecodeError> {
    let sensor_type = read_tx3_nibble(cur, false).ok_or(DecodeError::NotABit)?;
    if sensor_type != TYPE_TEMPERATURE && sensor_type != TYPE_HUMIDITY {
        debug!("tx3: unsupported sensor type {:X}", sensor_type);
        return Err(DecodeError::UnsupportedType(sensor_type));
    }

    let address_msb = read_tx3_nibble(cur, false).ok_or(DecodeError::NotABit)?;
    let address_lsb = read_tx3_nibble(cur, false).ok_or(DecodeError::NotABit)?;

    // bit 0 of the LSB nibble is a framing/parity bit, not address
    let address = (address_msb << 3) | ((address_lsb & 0xE) >> 1);

    let mut checksum = (TX3_START_BYTE + sensor_type + address_msb + address_lsb) & 0xF;
    let mut digits = [0u8; NUM_DIGITS];
    for digit in digits.iter_mut() {
        let value = read_tx3_nibble(cur, false).ok_or(DecodeError::NotABit)?;
        checksum = (checksum + value) & 0xF;
        *digit = value;
    }

    let received = read_tx3_nibble(cur, true).ok_or(DecodeError::NotABit)?;
    if checksum != received {
        warn!(
            "tx3: checksum mismatch: computed {:X}, received {:X}",
            checksum, received
        );
        return Err(DecodeError::Checksum {
            computed: checksum,
            received,
        });
    }

    // the two integer digits are transmitted twice
    if digits[0] != digits[3] || digits[1] != digits[4] {
        warn!("tx3: repeated digits disagree: {:?}", digits);
        return Err(DecodeError::DigitRepeat);
    }

    let mut value = 10.0 * digits[0] as f32 + digits[1] as f32 + digits[2] as f32 / 10.0;
    if sensor_type == TYPE_TEMPERATURE {
        // transmitted with a +50 offset so negatives stay unsigned BCD
        value -= 50.0;
    }

    match cache.observe(address, sensor_type, value) {
        CacheOutcome::New => {
            let reading = Reading::tx3(address, sensor_type, value);
            debug!("tx3: new sensor: {}", reading);
            Ok(DecodeOutcome::Reading(reading))
        }
        CacheOutcome::Updated => {
            let reading = Reading::tx3(address, sensor_type, value);
            debug!("tx3: updated: {}", reading);
            Ok(DecodeOutcome::Reading(reading))
        }
        CacheOutcome::Unchanged => {
            trace!("tx3: sensor {:02X} unchanged", address);
            Ok(DecodeOutcome::Unchanged)
        }
        CacheOutcome::Full => {
            warn!(
                "tx3: sensor table full ({} slots); dropping sensor {:02X}",
                SensorCache::CAPACITY,
                address
            );
            Ok(DecodeOutcome::CacheFull)
        }
    }
}
