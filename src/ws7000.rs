//! WS7000/WS2500 packet decoding

#[cfg(not(test))]
use log::{debug, warn};

#[cfg(test)]
use std::println as debug;
#[cfg(test)]
use std::println as warn;

use arrayvec::ArrayVec;
use strum::EnumMessage;

use crate::framing::read_ws7k_nibble;
use crate::pulse::PulseCursor;
use crate::reading::{Measure, Reading};
use crate::receiver::{DecodeError, DecodeOutcome};

// Largest digit group of any sub-type (the WS7000-20)
const MAX_DIGITS: usize = 10;

/// WS7000/WS2500 sensor hardware model
///
/// Determined by the type nibble of the transmission. The model
/// selects the digit-group length and the value reconstruction.
/// Models marked *recognized only* are parsed and integrity-checked
/// but carry no value reconstruction; their frames yield
/// [`DecodeOutcome::Parsed`](crate::DecodeOutcome::Parsed).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum_macros::EnumMessage)]
pub enum SensorModel {
    /// WS7000-27/28 thermo sensor (recognized only)
    #[strum(detailed_message = "WS7000-27/28")]
    Thermo,

    /// WS7000-22/25 thermo/hygro sensor (recognized only)
    #[strum(detailed_message = "WS7000-22/25")]
    ThermoHygro,

    /// WS7000-16 rain sensor
    #[strum(detailed_message = "WS7000-16")]
    Rain,

    /// WS7000-15 wind sensor (recognized only)
    #[strum(detailed_message = "WS7000-15")]
    Wind,

    /// WS7000-20 combined thermo/hygro/baro station
    #[strum(detailed_message = "WS7000-20")]
    ThermoHygroBaro,

    /// WS2500-19 brightness sensor
    #[strum(detailed_message = "WS2500-19")]
    Brightness,
}

impl SensorModel {
    /// Model for a transmitted type nibble, if supported
    pub fn from_type(nibble: u8) -> Option<SensorModel> {
        match nibble {
            0 => Some(SensorModel::Thermo),
            1 => Some(SensorModel::ThermoHygro),
            2 => Some(SensorModel::Rain),
            3 => Some(SensorModel::Wind),
            4 => Some(SensorModel::ThermoHygroBaro),
            5 => Some(SensorModel::Brightness),
            _ => None,
        }
    }

    /// Number of BCD digit nibbles this model transmits
    pub fn digit_count(&self) -> usize {
        match self {
            SensorModel::Thermo => 3,
            SensorModel::ThermoHygro => 6,
            SensorModel::Rain => 3,
            SensorModel::Wind => 6,
            SensorModel::ThermoHygroBaro => 10,
            SensorModel::Brightness => 7,
        }
    }

    /// Hardware model designation, like "`WS7000-16`"
    pub fn as_display_str(&self) -> &'static str {
        self.get_detailed_message().expect("missing definition")
    }
}

impl std::fmt::Display for SensorModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.as_display_str().fmt(f)
    }
}

// Decode a WS7000/WS2500 packet
//
// The cursor must already be past the ten-zero preamble. Packet
// layout: type nibble, address nibble, N digit nibbles (N per model),
// XOR-check nibble, sum-check nibble. WS7000 readings carry no
// deduplication; every valid packet is reported.
pub(crate) fn decode(cur: &mut PulseCursor<'_>) -> DecodeOutcome {
    match decode_packet(cur) {
        Ok(out) => out,
        Err(err) => DecodeOutcome::Invalid(err),
    }
}

fn decode_packet(cur: &mut PulseCursor<'_>) -> Result<DecodeOutcome, DecodeError> {
    let sensor_type = read_ws7k_nibble(cur).ok_or(DecodeError::NotABit)?;
    let address = read_ws7k_nibble(cur).ok_or(DecodeError::NotABit)?;

    let model = match SensorModel::from_type(sensor_type) {
        Some(model) => model,
        None => {
            debug!("ws7000: unsupported sensor type {:X}", sensor_type);
            return Err(DecodeError::UnsupportedType(sensor_type));
        }
    };
    debug!("ws7000: {} (address {:X})", model, address);

    let mut xor_acc = sensor_type ^ address;
    let mut sum_acc = (5 + sensor_type + address) & 0xF;
    let mut digits: ArrayVec<u8, MAX_DIGITS> = ArrayVec::new();
    for _ in 0..model.digit_count() {
        let digit = read_ws7k_nibble(cur).ok_or(DecodeError::NotABit)?;
        xor_acc ^= digit;
        sum_acc = (sum_acc + digit) & 0xF;
        digits.push(digit);
    }

    let xor_check = read_ws7k_nibble(cur).ok_or(DecodeError::NotABit)?;
    if xor_acc != xor_check {
        warn!(
            "ws7000: xor check mismatch: computed {:X}, received {:X}",
            xor_acc, xor_check
        );
        return Err(DecodeError::Xor {
            computed: xor_acc,
            received: xor_check,
        });
    }

    // the xor-check nibble itself feeds the running sum
    let sum_check = read_ws7k_nibble(cur).ok_or(DecodeError::NotABit)?;
    sum_acc = (sum_acc + xor_check) & 0xF;
    if sum_acc != sum_check {
        warn!(
            "ws7000: sum check mismatch: computed {:X}, received {:X}",
            sum_acc, sum_check
        );
        return Err(DecodeError::Sum {
            computed: sum_acc,
            received: sum_check,
        });
    }

    match model {
        SensorModel::Rain => {
            let volume =
                (((digits[2] as u32) << 8) | ((digits[1] as u32) << 4) | digits[0] as u32) as f32;
            let reading = Reading::ws7000(address, sensor_type, &[(Measure::Rain, volume)]);
            debug!("ws7000: {}: {}", model, reading);
            Ok(DecodeOutcome::Reading(reading))
        }

        SensorModel::ThermoHygroBaro => {
            let mut temperature =
                10.0 * digits[2] as f32 + digits[1] as f32 + digits[0] as f32 / 10.0;
            let pressure = 200.0
                + 100.0 * digits[8] as f32
                + 10.0 * digits[7] as f32
                + digits[6] as f32
                + digits[9] as f32 / 10.0;
            let humidity = 10.0 * digits[5] as f32 + digits[4] as f32 + digits[3] as f32 / 10.0;

            // address bit 3 doubles as the temperature sign
            let mut address = address;
            if address & 0x8 != 0 {
                temperature = -temperature;
                address &= 0x7;
            }

            let reading = Reading::ws7000(
                address,
                sensor_type,
                &[
                    (Measure::Pressure, pressure),
                    (Measure::Temperature, temperature),
                    (Measure::Humidity, humidity),
                ],
            );
            debug!("ws7000: {}: {}", model, reading);
            Ok(DecodeOutcome::Reading(reading))
        }

        SensorModel::Brightness => {
            let brightness = (100.0 * digits[2] as f32
                + 10.0 * digits[1] as f32
                + digits[0] as f32)
                * 10f32.powi(digits[3] as i32);
            // decoded per the protocol but not part of the emitted
            // reading; the station under test never populated it
            let exposition =
                (((digits[6] as u32) << 8) | ((digits[5] as u32) << 4) | digits[4] as u32) as f32;
            debug!("ws7000: {}: exposition {:.1} (not emitted)", model, exposition);

            let reading =
                Reading::ws7000(address, sensor_type, &[(Measure::Brightness, brightness)]);
            debug!("ws7000: {}: {}", model, reading);
            Ok(DecodeOutcome::Reading(reading))
        }

        SensorModel::Thermo | SensorModel::ThermoHygro | SensorModel::Wind => {
            debug!("ws7000: {}: frame parsed, no value reconstruction", model);
            Ok(DecodeOutcome::Parsed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framing::{WS7K_LONG_US, WS7K_SHORT_US};
    use crate::pulse::Pulse;

    use assert_approx_eq::assert_approx_eq;

    fn ws_bit(bit: u8) -> Pulse {
        if bit == 1 {
            Pulse::new(WS7K_SHORT_US, WS7K_LONG_US)
        } else {
            Pulse::new(WS7K_LONG_US, WS7K_SHORT_US)
        }
    }

    // marker pulse, then four data bits LSB first
    fn nibble_pulses(nibble: u8) -> Vec<Pulse> {
        let mut out = vec![ws_bit(1)];
        out.extend((0..4).map(|i| ws_bit((nibble >> i) & 1)));
        out
    }

    fn checks(sensor_type: u8, address: u8, digits: &[u8]) -> (u8, u8) {
        let mut xor = sensor_type ^ address;
        let mut sum = (5 + sensor_type + address) & 0xF;
        for &digit in digits {
            xor ^= digit;
            sum = (sum + digit) & 0xF;
        }
        (xor, (sum + xor) & 0xF)
    }

    // packet body (no preamble) with correct check nibbles
    fn packet(sensor_type: u8, address: u8, digits: &[u8]) -> Vec<Pulse> {
        let (xor, sum) = checks(sensor_type, address, digits);
        packet_with_checks(sensor_type, address, digits, xor, sum)
    }

    fn packet_with_checks(
        sensor_type: u8,
        address: u8,
        digits: &[u8],
        xor: u8,
        sum: u8,
    ) -> Vec<Pulse> {
        let mut pulses = Vec::new();
        for nibble in [sensor_type, address]
            .iter()
            .chain(digits.iter())
            .chain([xor, sum].iter())
        {
            pulses.extend(nibble_pulses(*nibble));
        }
        pulses
    }

    #[test]
    fn test_rain_reading() {
        // volume = (0 << 8) + (0 << 4) + 4
        let pulses = packet(2, 0x3, &[4, 0, 0]);
        let reading = decode(&mut PulseCursor::new(&pulses))
            .into_reading()
            .expect("expected reading");
        assert_eq!(reading.address(), 0x3);
        assert_eq!(reading.sensor_type(), 2);
        assert_approx_eq!(reading.value(), 4.0, 1e-4);
        assert_eq!(reading.text(), "WS32R=4.0");
    }

    #[test]
    fn test_rain_digit_weights() {
        // volume = (2 << 8) + (1 << 4) + 4 = 532
        let pulses = packet(2, 0x3, &[4, 1, 2]);
        let reading = decode(&mut PulseCursor::new(&pulses))
            .into_reading()
            .expect("expected reading");
        assert_approx_eq!(reading.value(), 532.0, 1e-4);
        assert_eq!(reading.text(), "WS32R=532.0");
    }

    #[test]
    fn test_station_reading() {
        // temperature 23.5, humidity 45.0, pressure 1003.0
        let digits = [5, 3, 2, 0, 5, 4, 3, 0, 8, 0];
        let pulses = packet(4, 0x3, &digits);
        let reading = decode(&mut PulseCursor::new(&pulses))
            .into_reading()
            .expect("expected reading");
        assert_eq!(reading.measure_count(), 3);
        assert_approx_eq!(reading.value(), 1003.0, 1e-4);
        assert_eq!(reading.text(), "WS34P=1003.0;WS340=23.5;WS34E=45.0");
    }

    #[test]
    fn test_station_sign_flag_negates_and_clears() {
        let digits = [5, 3, 2, 0, 5, 4, 3, 0, 8, 0];

        // address nibble 0xB: sign flag set over address 0x3
        let pulses = packet(4, 0xB, &digits);
        let reading = decode(&mut PulseCursor::new(&pulses))
            .into_reading()
            .expect("expected reading");
        assert_eq!(reading.address(), 0x3);
        assert_eq!(reading.text(), "WS34P=1003.0;WS340=-23.5;WS34E=45.0");

        // flag clear: both untouched
        let pulses = packet(4, 0x3, &digits);
        let reading = decode(&mut PulseCursor::new(&pulses))
            .into_reading()
            .expect("expected reading");
        assert_eq!(reading.address(), 0x3);
        assert_eq!(reading.text(), "WS34P=1003.0;WS340=23.5;WS34E=45.0");
    }

    #[test]
    fn test_brightness_reading() {
        // brightness = (1*100 + 2*10 + 4) * 10^2 = 12400
        let pulses = packet(5, 0x1, &[4, 2, 1, 2, 0, 0, 0]);
        let reading = decode(&mut PulseCursor::new(&pulses))
            .into_reading()
            .expect("expected reading");
        assert_approx_eq!(reading.value(), 12400.0, 1e-2);
        assert_eq!(reading.text(), "WS15L=12400.0");
        // exposition digits are decoded but not emitted
        assert_eq!(reading.measure_count(), 1);
    }

    #[test]
    fn test_xor_mismatch_rejected() {
        let (xor, sum) = checks(2, 0x3, &[4, 0, 0]);
        let pulses = packet_with_checks(2, 0x3, &[4, 0, 0], xor ^ 1, sum);

        match decode(&mut PulseCursor::new(&pulses)) {
            DecodeOutcome::Invalid(DecodeError::Xor { computed, received }) => {
                assert_eq!(computed, xor);
                assert_eq!(received, xor ^ 1);
            }
            other => panic!("expected xor error, got {:?}", other),
        }
    }

    #[test]
    fn test_sum_mismatch_rejected() {
        let (xor, sum) = checks(2, 0x3, &[4, 0, 0]);
        let pulses = packet_with_checks(2, 0x3, &[4, 0, 0], xor, (sum + 1) & 0xF);

        match decode(&mut PulseCursor::new(&pulses)) {
            DecodeOutcome::Invalid(DecodeError::Sum { .. }) => {}
            other => panic!("expected sum error, got {:?}", other),
        }
    }

    #[test]
    fn test_recognized_only_models_parse() {
        for (sensor_type, digit_count) in [(0u8, 3), (1, 6), (3, 6)] {
            let digits = vec![1u8; digit_count];
            let pulses = packet(sensor_type, 0x2, &digits);
            assert_eq!(
                decode(&mut PulseCursor::new(&pulses)),
                DecodeOutcome::Parsed,
                "type {}",
                sensor_type
            );
        }
    }

    #[test]
    fn test_unsupported_types_rejected() {
        for sensor_type in 6..16u8 {
            // three digits would follow if the type were known
            let pulses = packet(sensor_type, 0x2, &[1, 2, 3]);
            assert_eq!(
                decode(&mut PulseCursor::new(&pulses)),
                DecodeOutcome::Invalid(DecodeError::UnsupportedType(sensor_type))
            );
        }
    }

    #[test]
    fn test_decoding_is_stateless() {
        let pulses = packet(2, 0x3, &[4, 1, 2]);
        let first = decode(&mut PulseCursor::new(&pulses));
        let second = decode(&mut PulseCursor::new(&pulses));
        assert_eq!(first, second);
        assert!(first.is_reading());
    }

    #[test]
    fn test_truncated_packet_aborts() {
        let mut pulses = packet(4, 0x3, &[5, 3, 2, 0, 5, 4, 3, 0, 8, 0]);
        pulses.truncate(pulses.len() / 2);
        assert_eq!(
            decode(&mut PulseCursor::new(&pulses)),
            DecodeOutcome::Invalid(DecodeError::NotABit)
        );
    }

    #[test]
    fn test_model_names() {
        assert_eq!(SensorModel::Rain.as_display_str(), "WS7000-16");
        assert_eq!(format!("{}", SensorModel::ThermoHygroBaro), "WS7000-20");
        assert_eq!(SensorModel::from_type(5), Some(SensorModel::Brightness));
        assert_eq!(SensorModel::from_type(6), None);
    }
}
