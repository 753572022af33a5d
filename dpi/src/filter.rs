use crate::frame::{Frame, FrameFamily};
use crate::protocols::ethernet::mac::MacAddress;
use crate::protocols::wlan::security::EncryptionType;
use serde::{Deserialize, Serialize};

/// Selection criteria for dissected frames. Every set criterion must hold;
/// an empty filter accepts everything.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct FrameFilter {
    pub families: Vec<FrameFamily>,
    pub source_mac: Option<MacAddress>,
    pub destination_mac: Option<MacAddress>,
    pub bssid: Option<MacAddress>,

    // Unprotected frames never match a non-empty list.
    pub encryption_types: Vec<EncryptionType>,

    pub contains_bytes: Vec<u8>,
}

impl FrameFilter {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn matches(&self, frame: &Frame) -> bool {
        self.matches_family(frame)
            && matches_address(self.source_mac.as_ref(), frame.source_mac())
            && matches_address(self.destination_mac.as_ref(), frame.destination_mac())
            && matches_address(self.bssid.as_ref(), bssid(frame))
            && self.matches_encryption(frame)
            && self.matches_bytes(frame)
    }

    fn matches_family(&self, frame: &Frame) -> bool {
        if self.families.is_empty() {
            return true;
        }

        frame
            .family()
            .is_some_and(|family| self.families.contains(&family))
    }

    fn matches_encryption(&self, frame: &Frame) -> bool {
        if self.encryption_types.is_empty() {
            return true;
        }

        frame
            .wlan()
            .and_then(|wlan| wlan.security.value())
            .is_some_and(|trailer| self.encryption_types.contains(&trailer.encryption))
    }

    fn matches_bytes(&self, frame: &Frame) -> bool {
        if self.contains_bytes.is_empty() {
            return true;
        }

        frame
            .data()
            .windows(self.contains_bytes.len())
            .any(|window| window == self.contains_bytes.as_slice())
    }
}

fn matches_address(expected: Option<&MacAddress>, actual: Option<&MacAddress>) -> bool {
    match expected {
        None => true,
        Some(expected) => actual == Some(expected),
    }
}

fn bssid(frame: &Frame) -> Option<&MacAddress> {
    frame.wlan().and_then(|wlan| wlan.addressing.bssid.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{FrameHeader, RawFrame};
    use crate::parser::FrameParser;

    fn process(hex_frame: &str, ethernet_hint: bool) -> Frame {
        let data = hex::decode(hex_frame.replace(" ", "")).unwrap();
        let raw = RawFrame::new(FrameHeader::default(), data, ethernet_hint);
        FrameParser::default().process(raw).unwrap()
    }

    fn beacon() -> Frame {
        process(
            "8000 0000 ffffffffffff 02aabbccdd01 02aabbccdd01 0000 \
             0000000000000000 6400 1104",
            false,
        )
    }

    fn protected_data() -> Frame {
        process(
            "0841 0000 02aabbccdd01 02aabbccdd02 02aabbccdd03 0000 \
             0100000000000000 00000000000000000000",
            false,
        )
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = FrameFilter::default();

        assert!(filter.is_empty());
        assert!(filter.matches(&beacon()));
        assert!(filter.matches(&process("0f", false)));
    }

    #[test]
    fn test_family() {
        let filter = FrameFilter {
            families: vec![FrameFamily::WlanManagement, FrameFamily::WlanControl],
            ..Default::default()
        };

        assert!(filter.matches(&beacon()));
        assert!(!filter.matches(&protected_data()));
    }

    #[test]
    fn test_addresses() {
        let station = MacAddress::try_from("02:aa:bb:cc:dd:02").unwrap();
        let access_point = MacAddress::try_from("02:aa:bb:cc:dd:01").unwrap();

        let by_source = FrameFilter {
            source_mac: Some(station.clone()),
            ..Default::default()
        };
        assert!(by_source.matches(&protected_data()));
        assert!(!by_source.matches(&beacon()));

        let by_bssid = FrameFilter {
            bssid: Some(access_point),
            ..Default::default()
        };
        assert!(by_bssid.matches(&beacon()));
        assert!(!by_bssid.matches(&process("ffffffffffff02aabbccdd010800", true)));

        let by_destination = FrameFilter {
            destination_mac: Some(station),
            ..Default::default()
        };
        assert!(!by_destination.matches(&protected_data()));
    }

    #[test]
    fn test_encryption() {
        let filter = FrameFilter {
            encryption_types: vec![EncryptionType::Ccmp],
            ..Default::default()
        };

        assert!(filter.matches(&protected_data()));
        assert!(!filter.matches(&beacon()));

        let wep_only = FrameFilter {
            encryption_types: vec![EncryptionType::Wep],
            ..Default::default()
        };
        assert!(!wep_only.matches(&protected_data()));
    }

    #[test]
    fn test_contained_bytes() {
        let filter = FrameFilter {
            contains_bytes: vec![0x64, 0x00, 0x11],
            ..Default::default()
        };

        assert!(filter.matches(&beacon()));
        assert!(!filter.matches(&protected_data()));

        let longer_than_frame = FrameFilter {
            contains_bytes: vec![0x0F, 0x00],
            ..Default::default()
        };
        assert!(!longer_than_frame.matches(&process("0f", false)));
    }
}
