//! Timed-pulse capture cursor

/// One received OOK radio pulse
///
/// A pulse is a carrier-on period (the *mark*) followed by a
/// carrier-off period (the *space*), both measured in microseconds.
/// Receiver front-ends commonly deliver captures as a flat list of
/// alternating high/low durations; pair them up to build `Pulse`s.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pulse {
    /// Carrier-on duration, in microseconds
    pub mark_us: u32,

    /// Carrier-off duration, in microseconds
    pub space_us: u32,
}

impl Pulse {
    /// Pulse from mark and space durations, in microseconds
    pub const fn new(mark_us: u32, space_us: u32) -> Self {
        Self { mark_us, space_us }
    }
}

/// Cursor over a captured pulse train
///
/// `PulseCursor` provides the three primitives the protocol decoders
/// are built from:
///
/// 1. [`expect()`](PulseCursor::expect): match the next pulse against
///    nominal mark/space durations, consuming it on a match and
///    leaving the cursor untouched on a mismatch;
/// 2. [`peek_mark()`](PulseCursor::peek_mark): non-consuming check of
///    the next mark duration alone, for transmissions whose final
///    space is cut off;
/// 3. [`advance()`](PulseCursor::advance): unconditionally skip pulses
///    that have already been verified, such as a preamble.
///
/// Duration matching accepts a ±25% deviation from nominal, the usual
/// tolerance for inexpensive 433 MHz OOK receivers.
///
/// The cursor is a cheap copy; protocol classification routinely works
/// on a copy so that a failed attempt leaves the caller's cursor at
/// the start of the capture.
#[derive(Clone, Copy, Debug)]
pub struct PulseCursor<'a> {
    pulses: &'a [Pulse],
    index: usize,
}

impl<'a> PulseCursor<'a> {
    /// Cursor positioned at the start of `pulses`
    pub fn new(pulses: &'a [Pulse]) -> Self {
        Self { pulses, index: 0 }
    }

    /// Match and consume the next pulse
    ///
    /// If the next pulse's mark and space durations both fall within
    /// tolerance of `mark_us` and `space_us`, consumes it and returns
    /// true. Otherwise the cursor does not move. An exhausted cursor
    /// never matches.
    pub fn expect(&mut self, mark_us: u32, space_us: u32) -> bool {
        match self.pulses.get(self.index) {
            Some(pulse)
                if matches_within(pulse.mark_us, mark_us)
                    && matches_within(pulse.space_us, space_us) =>
            {
                self.index += 1;
                true
            }
            _ => false,
        }
    }

    /// Non-consuming check of the next mark duration
    ///
    /// Returns true if the next pulse's mark falls within tolerance of
    /// `mark_us`, regardless of its space. Never moves the cursor.
    pub fn peek_mark(&self, mark_us: u32) -> bool {
        match self.pulses.get(self.index) {
            Some(pulse) => matches_within(pulse.mark_us, mark_us),
            None => false,
        }
    }

    /// Skip `count` pulses unconditionally
    ///
    /// Used to step over a preamble that a classifier has already
    /// verified. Saturates at the end of the capture.
    pub fn advance(&mut self, count: usize) {
        self.index = usize::min(self.index + count, self.pulses.len());
    }

    /// Number of pulses not yet consumed
    pub fn remaining(&self) -> usize {
        self.pulses.len() - self.index
    }
}

// True if `measured` is within ±25% of `nominal`
#[inline]
fn matches_within(measured: u32, nominal: u32) -> bool {
    measured.abs_diff(nominal) <= nominal / 4
}
