//! MQTT topic table for published telemetry.
//!
//! One value topic per decoded field, plus a retained status topic and the
//! inbound frame-timeout command topic. Values are published as plain-text
//! integers.

use crate::telemetry::TelemetryReading;

/// Retained liveness topic, set to [`STATUS_ONLINE`] on broker connect
pub const TOPIC_STATUS: &str = "poolheater/status";

/// Inbound command topic carrying a plain-text read timeout in milliseconds
pub const TOPIC_FRAME_TIMEOUT: &str = "poolheater/command/frame/timeout";

/// Payload published to [`TOPIC_STATUS`] when the bus session comes up
pub const STATUS_ONLINE: &str = "ON";

/// One outbound telemetry channel per decoded field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    WaterInTemp,
    WaterOutTemp,
    CoilTemp,
    GasExhaustTemp,
    AirAmbientTemp,
    ActiveStatus,
}

impl Channel {
    /// All channels, in the order the pump firmware has always published them
    pub const ALL: [Channel; 6] = [
        Channel::WaterInTemp,
        Channel::WaterOutTemp,
        Channel::CoilTemp,
        Channel::GasExhaustTemp,
        Channel::AirAmbientTemp,
        Channel::ActiveStatus,
    ];

    /// MQTT topic this channel publishes to
    pub fn topic(self) -> &'static str {
        match self {
            Channel::WaterInTemp => "poolheater/values/water_in_temp",
            Channel::WaterOutTemp => "poolheater/values/water_out_temp",
            Channel::CoilTemp => "poolheater/values/coil_temp",
            Channel::GasExhaustTemp => "poolheater/values/gas_exhaust_temp",
            Channel::AirAmbientTemp => "poolheater/values/air_ambient_temp",
            Channel::ActiveStatus => "poolheater/values/active_status",
        }
    }
}

impl TelemetryReading {
    /// Value carried by a channel for this reading
    ///
    /// The active flag publishes as 0/1; everything else is the raw 6-bit
    /// sensor value.
    pub fn value(&self, channel: Channel) -> u8 {
        match channel {
            Channel::WaterInTemp => self.water_in_temp,
            Channel::WaterOutTemp => self.water_out_temp,
            Channel::CoilTemp => self.coil_temp,
            Channel::GasExhaustTemp => self.gas_exhaust_temp,
            Channel::AirAmbientTemp => self.air_ambient_temp,
            Channel::ActiveStatus => self.active as u8,
        }
    }

    /// Iterate the six (channel, value) pairs in publish order
    pub fn values(&self) -> impl Iterator<Item = (Channel, u8)> + '_ {
        Channel::ALL.iter().map(move |&ch| (ch, self.value(ch)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topics_are_distinct() {
        for (i, a) in Channel::ALL.iter().enumerate() {
            for b in &Channel::ALL[i + 1..] {
                assert_ne!(a.topic(), b.topic());
            }
        }
    }

    #[test]
    fn test_publish_order_matches_pump_firmware() {
        let topics: [&str; 6] = [
            "poolheater/values/water_in_temp",
            "poolheater/values/water_out_temp",
            "poolheater/values/coil_temp",
            "poolheater/values/gas_exhaust_temp",
            "poolheater/values/air_ambient_temp",
            "poolheater/values/active_status",
        ];
        for (ch, expected) in Channel::ALL.iter().zip(topics) {
            assert_eq!(ch.topic(), expected);
        }
    }

    #[test]
    fn test_values_map_to_fields() {
        let reading = TelemetryReading {
            water_in_temp: 10,
            air_ambient_temp: 20,
            coil_temp: 30,
            gas_exhaust_temp: 40,
            water_out_temp: 50,
            active: true,
        };

        assert_eq!(reading.value(Channel::WaterInTemp), 10);
        assert_eq!(reading.value(Channel::AirAmbientTemp), 20);
        assert_eq!(reading.value(Channel::CoilTemp), 30);
        assert_eq!(reading.value(Channel::GasExhaustTemp), 40);
        assert_eq!(reading.value(Channel::WaterOutTemp), 50);
        assert_eq!(reading.value(Channel::ActiveStatus), 1);

        let idle = TelemetryReading { active: false, ..reading };
        assert_eq!(idle.value(Channel::ActiveStatus), 0);
    }

    #[test]
    fn test_values_iterator_covers_all_channels() {
        let reading = TelemetryReading {
            water_in_temp: 1,
            air_ambient_temp: 2,
            coil_temp: 3,
            gas_exhaust_temp: 4,
            water_out_temp: 5,
            active: false,
        };
        let pairs: heapless::Vec<(Channel, u8), 6> = reading.values().collect();
        assert_eq!(pairs.len(), 6);
        assert_eq!(pairs[0], (Channel::WaterInTemp, 1));
        assert_eq!(pairs[5], (Channel::ActiveStatus, 0));
    }
}
