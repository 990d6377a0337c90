//! Decode entry point and outcome reporting

#[cfg(not(test))]
use log::trace;

#[cfg(test)]
use std::println as trace;

use thiserror::Error;

use crate::cache::SensorCache;
use crate::framing::{ProtocolFamily, TX3_PREAMBLE_PULSES, WS7K_PREAMBLE_PULSES};
use crate::pulse::PulseCursor;
use crate::reading::Reading;
use crate::tx3;
use crate::ws7000;

/// Why a decode attempt was discarded
///
/// None of these are fatal: a failed attempt has no side effects, and
/// the next transmission gets a fresh try. Integrity failures
/// ([`Checksum`](DecodeError::Checksum), [`Xor`](DecodeError::Xor),
/// [`Sum`](DecodeError::Sum), [`DigitRepeat`](DecodeError::DigitRepeat))
/// indicate a structurally plausible but corrupted packet and are
/// logged at `warn`; framing failures are routine noise and stay at
/// `trace`.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DecodeError {
    /// A pulse matched neither bit pattern of the protocol being read
    #[error("pulse stream does not continue as a valid bit")]
    NotABit,

    /// The frame was readable but its type code is not one this
    /// decoder handles
    #[error("unsupported sensor type {0:#X}")]
    UnsupportedType(u8),

    /// TX3 mod-16 checksum mismatch
    #[error("checksum mismatch: computed {computed:X}, received {received:X}")]
    Checksum { computed: u8, received: u8 },

    /// WS7000 XOR-check mismatch
    #[error("xor check mismatch: computed {computed:X}, received {received:X}")]
    Xor { computed: u8, received: u8 },

    /// WS7000 sum-check mismatch
    #[error("sum check mismatch: computed {computed:X}, received {received:X}")]
    Sum { computed: u8, received: u8 },

    /// The twice-transmitted TX3 integer digits disagree
    #[error("repeated digits disagree")]
    DigitRepeat,
}

/// Result of one decode attempt
///
/// Only [`Reading`](DecodeOutcome::Reading) carries new information
/// for the publishing layer; every other variant says *why* there is
/// nothing to publish. Callers that only care about readings can use
/// [`into_reading()`](DecodeOutcome::into_reading) or
/// [`LacrosseReceiver::decode_reading`].
#[derive(Clone, Debug, PartialEq)]
pub enum DecodeOutcome {
    /// A decoded reading with new information
    Reading(Reading),

    /// Valid TX3 frame, but the value matches the sensor's last one
    Unchanged,

    /// Valid TX3 frame from a new sensor, but the sensor table is at
    /// capacity and the sensor cannot be tracked
    CacheFull,

    /// Valid WS7000 frame of a sub-type with no value reconstruction
    Parsed,

    /// The capture matches neither family's preamble; other protocol
    /// decoders should get a try
    NoMatch,

    /// The capture matched a preamble but the frame was unreadable or
    /// corrupt
    Invalid(DecodeError),
}

impl DecodeOutcome {
    /// Decoded reading, if this attempt produced one
    pub fn reading(&self) -> Option<&Reading> {
        match self {
            DecodeOutcome::Reading(reading) => Some(reading),
            _ => None,
        }
    }

    /// Consume the outcome, returning its reading, if any
    pub fn into_reading(self) -> Option<Reading> {
        match self {
            DecodeOutcome::Reading(reading) => Some(reading),
            _ => None,
        }
    }

    /// True if this attempt produced a reading
    pub fn is_reading(&self) -> bool {
        matches!(self, DecodeOutcome::Reading(_))
    }
}

impl From<DecodeOutcome> for Option<Reading> {
    fn from(outcome: DecodeOutcome) -> Self {
        outcome.into_reading()
    }
}

impl AsRef<str> for DecodeOutcome {
    fn as_ref(&self) -> &str {
        match self {
            DecodeOutcome::Reading(_) => "reading",
            DecodeOutcome::Unchanged => "unchanged",
            DecodeOutcome::CacheFull => "cache full",
            DecodeOutcome::Parsed => "parsed",
            DecodeOutcome::NoMatch => "no match",
            DecodeOutcome::Invalid(_) => "invalid",
        }
    }
}

impl std::fmt::Display for DecodeOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeOutcome::Reading(reading) => {
                write!(f, "{}: \"{}\"", self.as_ref(), reading)
            }
            DecodeOutcome::Invalid(err) => write!(f, "{}: {}", self.as_ref(), err),
            _ => write!(f, "{}", self.as_ref()),
        }
    }
}

/// Weather sensor receiver for the 433 MHz La Crosse families
///
/// Decodes one captured transmission per [`decode()`](Self::decode)
/// call: the preamble selects the TX3 or WS7000 path, the matched
/// decoder reads the remaining nibbles, validates the integrity
/// checks, and reconstructs the physical values.
///
/// The receiver owns the TX3 [`SensorCache`], the only state that
/// outlives a call. TX3 sensors retransmit constantly whether or not
/// anything changed; the cache suppresses readings that carry no new
/// information. WS7000 decoding is stateless and every valid frame is
/// reported.
///
/// Decoding is synchronous and single-threaded; wrap the receiver in
/// a mutex if decode calls can race.
#[derive(Clone, Debug, Default)]
pub struct LacrosseReceiver {
    cache: SensorCache,
}

impl LacrosseReceiver {
    /// New receiver with an empty sensor cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one captured transmission
    ///
    /// The `cursor` should be positioned at the start of a suspected
    /// transmission. Returns a [`DecodeOutcome`] describing what the
    /// capture contained; see [`DecodeError`] for the failure
    /// taxonomy. Never panics, whatever the pulse data.
    pub fn decode(&mut self, mut cursor: PulseCursor<'_>) -> DecodeOutcome {
        match ProtocolFamily::classify(cursor) {
            Some(ProtocolFamily::Tx3) => {
                trace!("tx3: preamble matched");
                cursor.advance(TX3_PREAMBLE_PULSES);
                tx3::decode(&mut cursor, &mut self.cache)
            }
            Some(ProtocolFamily::Ws7000) => {
                trace!("ws7000: preamble matched");
                cursor.advance(WS7K_PREAMBLE_PULSES);
                ws7000::decode(&mut cursor)
            }
            None => DecodeOutcome::NoMatch,
        }
    }

    /// Decode one captured transmission, keeping only a reading
    ///
    /// Convenience wrapper over [`decode()`](Self::decode) for
    /// callers that treat everything short of a reading as "no new
    /// information this attempt."
    pub fn decode_reading(&mut self, cursor: PulseCursor<'_>) -> Option<Reading> {
        self.decode(cursor).into_reading()
    }

    /// The TX3 sensor table
    pub fn cache(&self) -> &SensorCache {
        &self.cache
    }

    /// Forget all tracked TX3 sensors
    pub fn reset(&mut self) {
        self.cache = SensorCache::new();
    }
}
