//! # lacrosse433: 433 MHz weather sensor decoding
//!
//! This crate decodes two families of 433 MHz OOK weather-sensor
//! radio protocols from timed pulse captures:
//!
//! * **La Crosse TX3/TX4**: outdoor temperature and humidity sensors
//! * **ELV/Conrad WS7000 and WS2500**: rain, brightness, and combined
//!   temperature/pressure/humidity stations
//!
//! The input is a sequence of [`Pulse`] timings: the mark (carrier-on)
//! and space (carrier-off) durations, in microseconds, that a 433 MHz
//! OOK receiver front-end reports for each pulse. Capturing those
//! timings is beyond the scope of this crate; any receiver that can
//! timestamp its data line transitions will do.
//!
//! The output of a decode attempt is a [`DecodeOutcome`]. When a
//! transmission decodes to new information, the outcome carries a
//! [`Reading`] with the sensor's address, its type code, the decoded
//! physical value(s), and a rendered `KEY=value` text for a downstream
//! publishing layer.
//!
//! ## Example
//!
//! ```
//! use lacrosse433::{DecodeOutcome, LacrosseReceiver, Pulse, PulseCursor};
//!
//! // One bit of the TX3 encoding: a one is 500µs/1100µs,
//! // a zero is 1300µs/1000µs
//! fn tx3_bit(bit: u8) -> Pulse {
//!     if bit == 1 {
//!         Pulse::new(500, 1100)
//!     } else {
//!         Pulse::new(1300, 1000)
//!     }
//! }
//!
//! // A TX3 temperature frame for sensor address 0x05: the 0x0A start
//! // byte, the type nibble, two address nibbles, BCD digits 2 5 3 2 5
//! // (25.3, sent with a +50 offset: -24.7 °C), and the checksum
//! let mut pulses: Vec<Pulse> = (0..8).rev().map(|i| tx3_bit((0x0Au8 >> i) & 1)).collect();
//! for nibble in [0x0u8, 0x0, 0xA, 2, 5, 3, 2, 5, 0x5] {
//!     pulses.extend((0..4).rev().map(|i| tx3_bit((nibble >> i) & 1)));
//! }
//!
//! let mut rx = LacrosseReceiver::new();
//! match rx.decode(PulseCursor::new(&pulses)) {
//!     DecodeOutcome::Reading(reading) => {
//!         assert_eq!(reading.address(), 0x05);
//!         assert_eq!(reading.text(), "TX050=-24.7");
//!     }
//!     other => panic!("expected a reading, got {:?}", other),
//! }
//!
//! // TX3 sensors retransmit continuously; an identical frame is
//! // suppressed until the value changes
//! assert_eq!(rx.decode(PulseCursor::new(&pulses)), DecodeOutcome::Unchanged);
//! ```
//!
//! ## Protocols
//!
//! Both families are receive-only in practice; this crate does not
//! synthesize transmissions.
//!
//! **TX3** frames carry one value as five BCD digits: the two integer
//! digits twice over, with the fractional digit between the copies,
//! protected by a mod-16 checksum. Because the sensors repeat
//! themselves every few seconds, the receiver keeps a bounded
//! [`SensorCache`] of last-seen values and reports a reading only when
//! it is news.
//!
//! **WS7000/WS2500** frames identify a hardware model
//! ([`SensorModel`]) by their type nibble and carry three to ten BCD
//! digits protected by an XOR check and a sum check. Every valid frame
//! is reported; the WS7000-20 station packs pressure, temperature, and
//! humidity into a single [`Reading`].

mod cache;
mod framing;
mod pulse;
mod reading;
mod receiver;
mod tx3;
mod ws7000;

pub use cache::{CacheOutcome, SensorCache};
pub use framing::ProtocolFamily;
pub use pulse::{Pulse, PulseCursor};
pub use reading::{Measure, Reading};
pub use receiver::{DecodeError, DecodeOutcome, LacrosseReceiver};
pub use ws7000::SensorModel;
