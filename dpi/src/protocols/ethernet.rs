use crate::frame::Field;
use crate::protocols::ethernet::ether_type::EtherType;
use crate::protocols::ethernet::mac::MacAddress;
use crate::protocols::ethernet::vlan::VlanTag;
use nom::IResult;
use nom::Parser;
use nom::number::be_u16;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Ethernet II
// IEEE 802.3, IEEE 802.1Q (VLAN tagging)
pub const HEADER_LENGTH: usize = 14;

pub fn decode(bytes: &[u8]) -> Field<EthernetLayer> {
    match parse(bytes) {
        Ok((_, layer)) => Field::Present(layer),
        Err(_) => {
            log::trace!("Ethernet: {} bytes, header truncated.", bytes.len());
            Field::Truncated
        },
    }
}

pub fn parse(bytes: &[u8]) -> IResult<&[u8], EthernetLayer> {
    // Destination MAC, 6 bytes
    let (rest, destination_mac) = mac::parse(bytes)?;
    // Source MAC, 6 bytes
    let (rest, source_mac) = mac::parse(rest)?;
    // EtherType, 2 bytes
    let (rest, ether_type) = be_u16().parse(rest)?;

    let mut layer = EthernetLayer {
        destination_mac,
        source_mac,
        ether_type,
        vlan: Field::Absent,
    };

    if ether_type != u16::from(EtherType::Vlan) {
        return Ok((rest, layer));
    }

    // 802.1Q tag: TCI, then the encapsulated EtherType
    match vlan::parse(rest) {
        Ok((rest, (tag, inner_ether_type))) => {
            layer.vlan = Field::Present(tag);
            layer.ether_type = inner_ether_type;
            Ok((rest, layer))
        },
        Err(_) => {
            layer.vlan = Field::Truncated;
            Ok((rest, layer))
        },
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EthernetLayer {
    pub destination_mac: MacAddress,
    pub source_mac: MacAddress,

    // Encapsulated type for tagged frames, 0x8100 if the tag is truncated.
    pub ether_type: u16,

    pub vlan: Field<VlanTag>,
}

impl EthernetLayer {
    pub fn ether_type_description(&self) -> String {
        ether_type::describe(self.ether_type)
    }
}

#[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq)]
pub enum EthernetError {
    #[error("MAC Address: Invalid bytes length")]
    MacInvalidBytesLength,

    #[error("MAC Address: Failed to decode hex string")]
    MacFailedHexDecode,

    #[error("MAC Address: Invalid string length")]
    MacInvalidStringLength,
}

pub mod ether_type;
pub mod mac;
pub mod vlan;

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes(hex_frame: &str) -> Vec<u8> {
        hex::decode(hex_frame.replace(" ", "")).unwrap()
    }

    #[test]
    fn test_untagged_frame() {
        let frame = bytes(
            "00 1A 8C 10 AD 30 00 1E 68 51 4F A9 08 06 00 01 08 00 06 04 00 02 00 1E 68 51 4F A9 AC 10 FF 01 00 1A 8C 10 AD 30 AC 10 00 01",
        );

        let actual = decode(&frame);
        let expected = EthernetLayer {
            destination_mac: MacAddress::try_from("00:1A:8C:10:AD:30").unwrap(),
            source_mac: MacAddress::try_from("00:1E:68:51:4F:A9").unwrap(),
            ether_type: 0x0806,
            vlan: Field::Absent,
        };

        assert_eq!(actual, Field::Present(expected));
    }

    #[test]
    fn test_vlan_tagged_frame() {
        // PCP 5, DEI 0, VID 100, IPv4 inside
        let frame = bytes(
            "FF FF FF FF FF FF 00 11 22 33 44 55 81 00 A0 64 08 00 45 00 00 14",
        );

        let actual = match decode(&frame) {
            Field::Present(value) => value,
            _ => panic!(),
        };

        assert_eq!(actual.ether_type, 0x0800);
        assert_eq!(actual.ether_type_description(), "IPv4");
        assert_eq!(
            actual.vlan,
            Field::Present(VlanTag {
                priority: 5,
                drop_eligible: false,
                vlan_id: 100,
            })
        );
        assert!(actual.destination_mac.is_broadcast());
    }

    #[test]
    fn test_vlan_tag_truncated() {
        let frame = bytes("FF FF FF FF FF FF 00 11 22 33 44 55 81 00 A0");

        let actual = match decode(&frame) {
            Field::Present(value) => value,
            _ => panic!(),
        };

        assert_eq!(actual.ether_type, 0x8100);
        assert_eq!(actual.vlan, Field::Truncated);
    }

    #[test]
    fn test_header_truncated() {
        let frame = bytes("FF FF FF FF FF FF 00 11 22 33 44 55 08");
        assert_eq!(decode(&frame), Field::Truncated);
        assert_eq!(decode(&[]), Field::Truncated);
    }
}
