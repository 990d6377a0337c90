//! Decoded sensor readings and their wire-text rendering

/// Physical quantity carried by one measure of a reading
///
/// Each measure has a single-character code used in the rendered
/// key text, e.g. the `R` in `WS32R=4.0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Measure {
    /// Air temperature, °C
    Temperature,

    /// Relative humidity, %
    Humidity,

    /// Barometric pressure, hPa
    Pressure,

    /// Brightness, lux
    Brightness,

    /// Sun exposition time (defined by the protocol, not yet emitted)
    Exposition,

    /// Rain volume, tips of the seesaw counter
    Rain,

    /// Wind speed (defined by the protocol, not yet emitted)
    WindSpeed,

    /// Wind direction (defined by the protocol, not yet emitted)
    WindDirection,
}

impl Measure {
    /// Single-character code used in rendered key text
    pub fn code(&self) -> char {
        match self {
            Measure::Temperature => '0',
            Measure::Humidity => 'E',
            Measure::Pressure => 'P',
            Measure::Brightness => 'L',
            Measure::Exposition => 'X',
            Measure::Rain => 'R',
            Measure::WindSpeed => 'S',
            Measure::WindDirection => 'D',
        }
    }
}

/// A decoded weather sensor reading
///
/// One `Reading` is produced per successfully decoded transmission.
/// It carries the sensor's address and type code, the primary decoded
/// value, and the rendered key text handed to the publishing layer.
///
/// The key text is the designated transport format: one or more
/// `;`-separated fragments of the form
/// `<FAMILY><address-hex><type-hex><measure-code>=<value>`, with the
/// value always rendered to one decimal place. A WS7000-20 station
/// packs three fragments (pressure, temperature, humidity) into a
/// single reading; everything else carries one.
///
/// `Reading` implements `Display`, which renders the key text.
#[derive(Clone, Debug, PartialEq)]
pub struct Reading {
    address: u8,
    sensor_type: u8,
    value: f32,
    measures: u8,
    text: String,
}

impl Reading {
    /// TX3 reading: one measure, `TX%02X%01X=%.1f` key
    pub(crate) fn tx3(address: u8, sensor_type: u8, value: f32) -> Self {
        Self {
            address,
            sensor_type,
            value,
            measures: 1,
            text: format!("TX{:02X}{:01X}={:.1}", address, sensor_type, value),
        }
    }

    /// WS7000 reading: `WS%01X%01X<code>=%.1f` fragments joined by `;`
    ///
    /// The first measure listed becomes the primary
    /// [`value()`](Reading::value).
    pub(crate) fn ws7000(address: u8, sensor_type: u8, measures: &[(Measure, f32)]) -> Self {
        debug_assert!(!measures.is_empty());
        let text = measures
            .iter()
            .map(|(measure, value)| {
                format!(
                    "WS{:01X}{:01X}{}={:.1}",
                    address,
                    sensor_type,
                    measure.code(),
                    value
                )
            })
            .collect::<Vec<String>>()
            .join(";");
        Self {
            address,
            sensor_type,
            value: measures[0].1,
            measures: measures.len() as u8,
            text,
        }
    }

    /// Sensor address within its protocol family
    ///
    /// TX3 addresses are 7 bits; WS7000 addresses are a single nibble
    /// (3 bits for the WS7000-20, whose address bit 3 is a temperature
    /// sign flag and is reported cleared).
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Protocol-family type code of the originating sensor
    pub fn sensor_type(&self) -> u8 {
        self.sensor_type
    }

    /// Primary decoded value
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Number of physical values this transmission encodes (1–3)
    pub fn measure_count(&self) -> u8 {
        self.measures
    }

    /// Rendered key text for the publishing layer
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Consume the reading, returning the rendered key text
    pub fn into_text(self) -> String {
        self.text
    }
}

impl AsRef<str> for Reading {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl std::fmt::Display for Reading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tx3_key_format() {
        let reading = Reading::tx3(0x05, 0x0, -24.7);
        assert_eq!(reading.text(), "TX050=-24.7");
        assert_eq!(reading.measure_count(), 1);

        // field widths are a formatting contract
        let reading = Reading::tx3(0x7F, 0xE, 99.9);
        assert_eq!(reading.text(), "TX7FE=99.9");
    }

    #[test]
    fn test_ws7000_single_fragment() {
        let reading = Reading::ws7000(0x3, 0x2, &[(Measure::Rain, 4.0)]);
        assert_eq!(reading.text(), "WS32R=4.0");
        assert_eq!(reading.value(), 4.0);
    }

    #[test]
    fn test_ws7000_joined_fragments() {
        let reading = Reading::ws7000(
            0x1,
            0x4,
            &[
                (Measure::Temperature, -10.5),
                (Measure::Humidity, 55.0),
            ],
        );
        assert_eq!(reading.text(), "WS140=-10.5;WS14E=55.0");
        assert_eq!(reading.measure_count(), 2);
        assert_eq!(reading.value(), -10.5);
    }

    #[test]
    fn test_one_decimal_place() {
        assert_eq!(Reading::tx3(0, 0, 25.25).text(), "TX000=25.2");
        assert_eq!(Reading::tx3(0, 0, 0.0).text(), "TX000=0.0");
    }
}
