use dpi::frame::{FrameHeader, RawFrame};
use thiserror::Error;

// DLT_* numbers from pcap-linktype.
const LINKTYPE_ETHERNET: i32 = 1;
const LINKTYPE_IEEE802_11: i32 = 105;
const LINKTYPE_IEEE802_11_RADIOTAP: i32 = 127;

const RADIOTAP_VERSION: u8 = 0;
const RADIOTAP_MIN_LENGTH: usize = 8;

/// Link layer announced by the capture handle.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LinkLayer {
    Ethernet,
    Ieee80211,

    // 802.11 behind a radiotap header.
    Radiotap,

    // Passed through, the classifier decides.
    Other(i32),
}

impl From<pcap::Linktype> for LinkLayer {
    fn from(linktype: pcap::Linktype) -> Self {
        Self::from(linktype.0)
    }
}

impl From<i32> for LinkLayer {
    fn from(linktype: i32) -> Self {
        match linktype {
            LINKTYPE_ETHERNET => Self::Ethernet,
            LINKTYPE_IEEE802_11 => Self::Ieee80211,
            LINKTYPE_IEEE802_11_RADIOTAP => Self::Radiotap,
            other => Self::Other(other),
        }
    }
}

impl std::fmt::Display for LinkLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ethernet => write!(f, "Ethernet"),
            Self::Ieee80211 => write!(f, "IEEE 802.11"),
            Self::Radiotap => write!(f, "IEEE 802.11 + radiotap"),
            Self::Other(linktype) => write!(f, "Link type {linktype}"),
        }
    }
}

impl LinkLayer {
    pub fn ethernet_hint(&self) -> bool {
        matches!(self, Self::Ethernet)
    }

    /// Bytes of the link-layer frame itself.
    pub fn payload<'a>(&self, data: &'a [u8]) -> Result<&'a [u8], LinkError> {
        match self {
            Self::Radiotap => strip_radiotap(data),
            Self::Ethernet | Self::Ieee80211 | Self::Other(_) => Ok(data),
        }
    }

    /// Copies the captured buffer into a frame for the dissector.
    pub fn raw_frame(&self, header: FrameHeader, data: &[u8]) -> Result<RawFrame, LinkError> {
        let payload = self.payload(data)?;

        Ok(RawFrame::new(header, payload.to_vec(), self.ethernet_hint()))
    }
}

/// Skips the radiotap header, whose little-endian length sits at bytes 2..4.
pub fn strip_radiotap(data: &[u8]) -> Result<&[u8], LinkError> {
    let (Some(&version), Some(length)) = (data.first(), data.get(2..4)) else {
        return Err(LinkError::RadiotapTooShort(data.len()));
    };
    if version != RADIOTAP_VERSION {
        return Err(LinkError::RadiotapVersion(version));
    }

    let length = usize::from(u16::from_le_bytes([length[0], length[1]]));
    if length < RADIOTAP_MIN_LENGTH {
        return Err(LinkError::RadiotapLength(length));
    }

    data.get(length..)
        .ok_or(LinkError::RadiotapTooShort(data.len()))
}

#[derive(Debug, Error, PartialEq)]
pub enum LinkError {
    #[error("Radiotap header is longer than the captured data.")]
    RadiotapTooShort(usize),

    #[error("Unsupported radiotap version.")]
    RadiotapVersion(u8),

    #[error("Radiotap header length is invalid.")]
    RadiotapLength(usize),
}

impl LinkError {
    pub fn additional_info(&self) -> Option<String> {
        match self {
            LinkError::RadiotapTooShort(length) => Some(format!("{length} bytes captured")),
            LinkError::RadiotapVersion(version) => Some(version.to_string()),
            LinkError::RadiotapLength(length) => Some(length.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_types() {
        assert_eq!(LinkLayer::from(pcap::Linktype(1)), LinkLayer::Ethernet);
        assert_eq!(LinkLayer::from(105), LinkLayer::Ieee80211);
        assert_eq!(LinkLayer::from(127), LinkLayer::Radiotap);
        assert_eq!(LinkLayer::from(113), LinkLayer::Other(113));

        assert!(LinkLayer::Ethernet.ethernet_hint());
        assert!(!LinkLayer::Radiotap.ethernet_hint());
        assert!(!LinkLayer::Other(113).ethernet_hint());
    }

    #[test]
    fn test_strip_radiotap() {
        let data = hex::decode("00000c00 00000000 aabbccdd d400".replace(" ", "")).unwrap();

        assert_eq!(strip_radiotap(&data), Ok(&[0xD4, 0x00][..]));
    }

    #[test]
    fn test_strip_radiotap_errors() {
        assert_eq!(strip_radiotap(&[0x00, 0x00]), Err(LinkError::RadiotapTooShort(2)));
        assert_eq!(
            strip_radiotap(&[0x01, 0x00, 0x08, 0x00, 0, 0, 0, 0]),
            Err(LinkError::RadiotapVersion(1))
        );
        assert_eq!(
            strip_radiotap(&[0x00, 0x00, 0x04, 0x00]),
            Err(LinkError::RadiotapLength(4))
        );
        assert_eq!(
            strip_radiotap(&[0x00, 0x00, 0x20, 0x00, 0, 0, 0, 0]),
            Err(LinkError::RadiotapTooShort(8))
        );
    }

    #[test]
    fn test_header_only_radiotap_leaves_empty_frame() {
        let data = [0x00, 0x00, 0x08, 0x00, 0, 0, 0, 0];
        assert_eq!(strip_radiotap(&data), Ok(&[][..]));
    }

    #[test]
    fn test_raw_frame() {
        let header = FrameHeader {
            tv_sec: 7,
            caplen: 14,
            len: 14,
            ..Default::default()
        };
        let data = hex::decode("00000c0000000000aabbccddd400").unwrap();

        let raw = LinkLayer::Radiotap.raw_frame(header.clone(), &data).unwrap();
        assert_eq!(raw.data, vec![0xD4, 0x00]);
        assert_eq!(raw.header, header);
        assert!(!raw.ethernet_hint);

        let raw = LinkLayer::Ethernet.raw_frame(header, &data).unwrap();
        assert_eq!(raw.data, data);
        assert!(raw.ethernet_hint);
    }
}
