//! Bit framing and protocol family classification

#[cfg(not(test))]
use log::trace;

#[cfg(test)]
use std::println as trace;

use crate::pulse::PulseCursor;

// TX3 bit timings: a one is a short mark, a zero is a long mark.
// https://www.f6fbb.org/domo/sensors/tx_signals.php
pub(crate) const TX3_BIT_ONE_MARK_US: u32 = 500;
pub(crate) const TX3_BIT_ONE_SPACE_US: u32 = 1100;
pub(crate) const TX3_BIT_ZERO_MARK_US: u32 = 1300;
pub(crate) const TX3_BIT_ZERO_SPACE_US: u32 = 1000;

// WS7000 bits are built from one short and one long duration,
// in either order
pub(crate) const WS7K_SHORT_US: u32 = 400;
pub(crate) const WS7K_LONG_US: u32 = 800;

// Every TX3 transmission begins with this byte
pub(crate) const TX3_START_BYTE: u8 = 0x0A;

// Preamble lengths, in pulses
pub(crate) const TX3_PREAMBLE_PULSES: usize = 8;
pub(crate) const WS7K_PREAMBLE_PULSES: usize = 10;

/// Protocol family of a received transmission
///
/// The two families share a frequency but nothing else: bit timings,
/// nibble bit order, and integrity checks all differ. Classification
/// looks only at the preamble.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProtocolFamily {
    /// La Crosse TX3/TX4 temperature and humidity sensors
    Tx3,

    /// ELV/Conrad WS7000 and WS2500 weather sensors
    Ws7000,
}

impl ProtocolFamily {
    /// Identify the protocol family of a capture
    ///
    /// Checks the capture against the TX3 start byte first, then the
    /// WS7000 ten-zero preamble. The cursor is taken by value:
    /// classification consumes its own copy and the caller's cursor
    /// still points at the start of the preamble.
    pub fn classify(cursor: PulseCursor<'_>) -> Option<ProtocolFamily> {
        if is_tx3_preamble(cursor) {
            Some(ProtocolFamily::Tx3)
        } else if is_ws7k_preamble(cursor) {
            Some(ProtocolFamily::Ws7000)
        } else {
            None
        }
    }
}

impl AsRef<str> for ProtocolFamily {
    fn as_ref(&self) -> &str {
        match self {
            ProtocolFamily::Tx3 => "TX3",
            ProtocolFamily::Ws7000 => "WS7000",
        }
    }
}

impl std::fmt::Display for ProtocolFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}

// Read one TX3-encoded bit
//
// Returns `None` if the next pulse is neither bit pattern; the
// cursor does not move in that case.
pub(crate) fn read_tx3_bit(cur: &mut PulseCursor<'_>) -> Option<u8> {
    if cur.expect(TX3_BIT_ONE_MARK_US, TX3_BIT_ONE_SPACE_US) {
        Some(1)
    } else if cur.expect(TX3_BIT_ZERO_MARK_US, TX3_BIT_ZERO_SPACE_US) {
        Some(0)
    } else {
        None
    }
}

// Read one TX3 nibble, most-significant bit first
//
// With `ultimate` set, a failed read of the fourth bit falls back to
// classifying the upcoming mark duration alone. The last pulse of a
// TX3 transmission often arrives with its trailing space cut off;
// this salvages the final bit of the checksum nibble.
pub(crate) fn read_tx3_nibble(cur: &mut PulseCursor<'_>, ultimate: bool) -> Option<u8> {
    let mut nibble = 0u8;
    for bit_counter in 0..4 {
        if let Some(bit) = read_tx3_bit(cur) {
            nibble = (nibble << 1) | bit;
        } else if ultimate && bit_counter == 3 {
            if cur.peek_mark(TX3_BIT_ONE_MARK_US) {
                trace!("tx3: truncated final bit salvaged as 1");
                nibble = (nibble << 1) | 1;
            } else if cur.peek_mark(TX3_BIT_ZERO_MARK_US) {
                trace!("tx3: truncated final bit salvaged as 0");
                nibble <<= 1;
            } else {
                return None;
            }
        } else {
            trace!("tx3: not a bit ({})", bit_counter);
            return None;
        }
    }
    Some(nibble)
}

// Read one WS7000 nibble
//
// Each nibble is prefixed by a mandatory short-long marker pulse.
// The four data bits follow least-significant first: short-long is a
// one, long-short is a zero.
pub(crate) fn read_ws7k_nibble(cur: &mut PulseCursor<'_>) -> Option<u8> {
    if !cur.expect(WS7K_SHORT_US, WS7K_LONG_US) {
        trace!("ws7000: nibble does not start with a one");
        return None;
    }

    let mut nibble = 0u8;
    for bit_counter in 0..4 {
        if cur.expect(WS7K_SHORT_US, WS7K_LONG_US) {
            nibble = (nibble >> 1) | 8;
        } else if cur.expect(WS7K_LONG_US, WS7K_SHORT_US) {
            nibble >>= 1;
        } else {
            trace!("ws7000: not a bit ({})", bit_counter);
            return None;
        }
    }
    Some(nibble)
}

// Does the capture begin with the TX3 start byte?
//
// Eight TX3 bits assembling to 0x0A. Works on a copy of the cursor.
fn is_tx3_preamble(mut cur: PulseCursor<'_>) -> bool {
    let mut byte = 0u8;
    for _ in 0..TX3_PREAMBLE_PULSES {
        match read_tx3_bit(&mut cur) {
            Some(bit) => byte = (byte << 1) | bit,
            None => return false,
        }
    }
    byte == TX3_START_BYTE
}

// Does the capture begin with the WS7000 preamble?
//
// Ten pulses, every one of which must be the long-short "zero"
// encoding. The short-long "one" belongs to the same pulse family and
// is tolerated by the scan, but any one bit fails the count.
fn is_ws7k_preamble(mut cur: PulseCursor<'_>) -> bool {
    let mut zeros = 0u8;
    for _ in 0..WS7K_PREAMBLE_PULSES {
        if cur.expect(WS7K_LONG_US, WS7K_SHORT_US) {
            zeros += 1;
        } else if cur.expect(WS7K_SHORT_US, WS7K_LONG_US) {
            // a one: counts toward the preamble length but not the zeros
        } else {
            return false;
        }
    }
    zeros == 10
}
