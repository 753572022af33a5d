use crate::frame::Field;
use crate::protocols::wlan::subtype::ManagementSubtype;
use nom::number::{le_u16, le_u64};
use nom::{IResult, Parser};
use serde::{Deserialize, Serialize};

// Timestamp (8), Beacon Interval (2), Capability Information (2)
pub const BEACON_FIXED_LENGTH: usize = 12;

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ManagementDetail {
    pub subtype: ManagementSubtype,
    pub beacon: Field<Beacon>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Beacon {
    pub timestamp: u64,

    // In time units (1024 microseconds).
    pub interval: u16,
    pub capabilities: CapabilityInfo,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct CapabilityInfo {
    pub ess: bool,
    pub ibss: bool,
    pub cf_pollable: bool,
    pub cf_poll_request: bool,
    pub privacy: bool,
    pub short_preamble: bool,
    pub pbcc: bool,
    pub channel_agility: bool,
    pub spectrum_management: bool,
    pub qos: bool,
    pub short_slot_time: bool,
    pub apsd: bool,
    pub radio_measurement: bool,
    pub dsss_ofdm: bool,
    pub delayed_block_ack: bool,
    pub immediate_block_ack: bool,
}

impl CapabilityInfo {
    /// Every flag with its conventional name, in bit order.
    pub fn flags(&self) -> [(&'static str, bool); 16] {
        [
            ("ESS", self.ess),
            ("IBSS", self.ibss),
            ("CF-Pollable", self.cf_pollable),
            ("CF-Poll-Request", self.cf_poll_request),
            ("Privacy", self.privacy),
            ("ShortPreamble", self.short_preamble),
            ("PBCC", self.pbcc),
            ("ChannelAgility", self.channel_agility),
            ("SpectrumMgmt", self.spectrum_management),
            ("QoS", self.qos),
            ("ShortSlotTime", self.short_slot_time),
            ("APSD", self.apsd),
            ("RadioMeasurement", self.radio_measurement),
            ("DSSS-OFDM", self.dsss_ofdm),
            ("DelayedBlockAck", self.delayed_block_ack),
            ("ImmediateBlockAck", self.immediate_block_ack),
        ]
    }

    pub fn enabled(&self) -> Vec<&'static str> {
        self.flags()
            .into_iter()
            .filter_map(|(name, is_set)| is_set.then_some(name))
            .collect()
    }
}

impl From<u16> for CapabilityInfo {
    fn from(value: u16) -> Self {
        let bit = |index: u16| value & (1 << index) != 0;

        Self {
            ess: bit(0),
            ibss: bit(1),
            cf_pollable: bit(2),
            cf_poll_request: bit(3),
            privacy: bit(4),
            short_preamble: bit(5),
            pbcc: bit(6),
            channel_agility: bit(7),
            spectrum_management: bit(8),
            qos: bit(9),
            short_slot_time: bit(10),
            apsd: bit(11),
            radio_measurement: bit(12),
            dsss_ofdm: bit(13),
            delayed_block_ack: bit(14),
            immediate_block_ack: bit(15),
        }
    }
}

/// Body of a management frame, starting right after the MAC header.
pub fn decode(subtype: u8, body: &[u8]) -> ManagementDetail {
    let subtype = ManagementSubtype::from(subtype);

    let beacon = match subtype {
        ManagementSubtype::Beacon => match parse_beacon(body) {
            Ok((_, beacon)) => Field::Present(beacon),
            Err(_) => Field::Truncated,
        },
        _ => Field::Absent,
    };

    ManagementDetail { subtype, beacon }
}

pub fn parse_beacon(input: &[u8]) -> IResult<&[u8], Beacon> {
    let (rest, timestamp) = le_u64().parse(input)?;
    let (rest, interval) = le_u16().parse(rest)?;
    let (rest, capabilities) = le_u16().parse(rest)?;

    let beacon = Beacon {
        timestamp,
        interval,
        capabilities: CapabilityInfo::from(capabilities),
    };

    Ok((rest, beacon))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_capability_bit_sets_one_flag() {
        for index in 0..16u16 {
            let capabilities = CapabilityInfo::from(1 << index);
            let flags = capabilities.flags();

            assert_eq!(capabilities.enabled().len(), 1, "bit {index}");
            assert!(flags[index as usize].1, "bit {index}");
        }

        assert!(CapabilityInfo::from(0).enabled().is_empty());
    }

    #[test]
    fn test_beacon_body() {
        let mut body = Vec::new();
        body.extend_from_slice(&0x0102_0304_0506_0708u64.to_le_bytes());
        body.extend_from_slice(&100u16.to_le_bytes());
        body.extend_from_slice(&0x0411u16.to_le_bytes());
        // SSID element follows
        body.extend_from_slice(&[0x00, 0x04, b't', b'e', b's', b't']);

        let actual = decode(8, &body);
        let beacon = actual.beacon.value().unwrap();

        assert_eq!(actual.subtype, ManagementSubtype::Beacon);
        assert_eq!(beacon.timestamp, 0x0102_0304_0506_0708);
        assert_eq!(beacon.interval, 100);
        assert_eq!(
            beacon.capabilities.enabled(),
            vec!["ESS", "Privacy", "ShortSlotTime"]
        );
    }

    #[test]
    fn test_short_beacon_is_truncated() {
        let actual = decode(8, &[0; BEACON_FIXED_LENGTH - 1]);
        assert!(actual.beacon.is_truncated());
    }

    #[test]
    fn test_non_beacon_has_no_body() {
        let actual = decode(4, &[0; 32]);

        assert_eq!(actual.subtype, ManagementSubtype::ProbeRequest);
        assert!(actual.beacon.is_absent());
    }
}
