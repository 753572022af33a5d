use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

// Trailer sizes after the MAC header (and QoS control, if any).
pub const WEP_MIN_EXTRA: usize = 4;
pub const WEP_MAX_EXTRA: usize = 12;
pub const WEP_IV_LENGTH: usize = 3;
pub const TKIP_IV_LENGTH: usize = 4;
pub const TKIP_EXTENDED_IV_LENGTH: usize = 4;
pub const CCMP_PACKET_NUMBER_LENGTH: usize = 6;

const KEY_ID_BYTE: usize = 3;
const KEY_ID_SHIFT: u8 = 6;
const EXT_IV_BIT: u8 = 0x20;

#[derive(Clone, Copy, Debug, Display, EnumIter, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum EncryptionType {
    #[strum(to_string = "WEP")]
    Wep,
    #[strum(to_string = "TKIP (WPA)")]
    Tkip,
    #[strum(to_string = "CCMP (WPA2)")]
    Ccmp,
    #[strum(to_string = "GCMP (WPA3)")]
    Gcmp,
    #[strum(to_string = "Unknown")]
    Unknown,
}

impl EncryptionType {
    /// Accepts the display label, the bare cipher name or the WPA generation,
    /// in any case. Anything else is `Unknown`.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim().to_ascii_uppercase();

        match label.as_str() {
            "WEP" => Self::Wep,
            "TKIP" | "WPA" | "TKIP (WPA)" => Self::Tkip,
            "CCMP" | "WPA2" | "CCMP (WPA2)" => Self::Ccmp,
            "GCMP" | "WPA3" | "GCMP (WPA3)" => Self::Gcmp,
            _ => Self::Unknown,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum TrailerDetail {
    Wep {
        iv: [u8; WEP_IV_LENGTH],
        key_id: u8,
    },
    Tkip {
        iv: [u8; TKIP_IV_LENGTH],
        extended_iv: [u8; TKIP_EXTENDED_IV_LENGTH],
    },
    Ccmp {
        packet_number: [u8; CCMP_PACKET_NUMBER_LENGTH],
    },
    None,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SecurityTrailer {
    pub encryption: EncryptionType,
    pub detail: TrailerDetail,
}

impl SecurityTrailer {
    fn unknown() -> Self {
        Self {
            encryption: EncryptionType::Unknown,
            detail: TrailerDetail::None,
        }
    }
}

/// Guesses the cipher from the bytes left after the MAC header.
///
/// 4..=12 bytes is WEP. Longer trailers are CCMP unless the ExtIV bit of the
/// fourth byte is set, in which case TKIP. Anything shorter is Unknown.
pub fn classify(rest: &[u8]) -> SecurityTrailer {
    let extra = rest.len();

    if (WEP_MIN_EXTRA..=WEP_MAX_EXTRA).contains(&extra) {
        return wep(rest).unwrap_or_else(SecurityTrailer::unknown);
    }

    if extra > WEP_MAX_EXTRA {
        let extended = rest
            .get(KEY_ID_BYTE)
            .is_some_and(|byte| byte & EXT_IV_BIT != 0);

        let trailer = if extended { tkip(rest) } else { ccmp(rest) };
        return trailer.unwrap_or_else(SecurityTrailer::unknown);
    }

    SecurityTrailer::unknown()
}

fn wep(rest: &[u8]) -> Option<SecurityTrailer> {
    let iv = <[u8; WEP_IV_LENGTH]>::try_from(rest.get(..WEP_IV_LENGTH)?).ok()?;
    let key_id = rest.get(KEY_ID_BYTE)? >> KEY_ID_SHIFT;

    Some(SecurityTrailer {
        encryption: EncryptionType::Wep,
        detail: TrailerDetail::Wep { iv, key_id },
    })
}

fn tkip(rest: &[u8]) -> Option<SecurityTrailer> {
    let iv = <[u8; TKIP_IV_LENGTH]>::try_from(rest.get(..TKIP_IV_LENGTH)?).ok()?;
    let extended_iv = <[u8; TKIP_EXTENDED_IV_LENGTH]>::try_from(
        rest.get(TKIP_IV_LENGTH..TKIP_IV_LENGTH + TKIP_EXTENDED_IV_LENGTH)?,
    )
    .ok()?;

    Some(SecurityTrailer {
        encryption: EncryptionType::Tkip,
        detail: TrailerDetail::Tkip { iv, extended_iv },
    })
}

fn ccmp(rest: &[u8]) -> Option<SecurityTrailer> {
    let packet_number =
        <[u8; CCMP_PACKET_NUMBER_LENGTH]>::try_from(rest.get(..CCMP_PACKET_NUMBER_LENGTH)?)
            .ok()?;

    Some(SecurityTrailer {
        encryption: EncryptionType::Ccmp,
        detail: TrailerDetail::Ccmp { packet_number },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_wep_window() {
        let rest = [0x11, 0x22, 0x33, 0b1100_0000, 0xAA, 0xBB, 0xCC, 0xDD];
        let actual = classify(&rest);

        assert_eq!(actual.encryption, EncryptionType::Wep);
        assert_eq!(
            actual.detail,
            TrailerDetail::Wep {
                iv: [0x11, 0x22, 0x33],
                key_id: 3,
            }
        );

        assert_eq!(classify(&[0; 4]).encryption, EncryptionType::Wep);
        assert_eq!(classify(&[0; 12]).encryption, EncryptionType::Wep);
    }

    #[test]
    fn test_ccmp() {
        // CCMP header: PN0 PN1 rsvd (ExtIV|KeyID) PN2..PN5, then payload
        let mut rest = vec![0x01, 0x00, 0x00, 0x00, 0x02, 0x03, 0x04, 0x05];
        rest.extend_from_slice(&[0xEE; 16]);

        let actual = classify(&rest);

        assert_eq!(actual.encryption, EncryptionType::Ccmp);
        assert_eq!(
            actual.detail,
            TrailerDetail::Ccmp {
                packet_number: [0x01, 0x00, 0x00, 0x00, 0x02, 0x03],
            }
        );

        // The CCMP header alone sits inside the WEP window.
        assert_eq!(classify(&rest[..8]).encryption, EncryptionType::Wep);
    }

    #[test]
    fn test_tkip() {
        let mut rest = vec![0x01, 0x02, 0x03, 0x20, 0x04, 0x05, 0x06, 0x07];
        rest.extend_from_slice(&[0xEE; 8]);

        let actual = classify(&rest);

        assert_eq!(actual.encryption, EncryptionType::Tkip);
        assert_eq!(
            actual.detail,
            TrailerDetail::Tkip {
                iv: [0x01, 0x02, 0x03, 0x20],
                extended_iv: [0x04, 0x05, 0x06, 0x07],
            }
        );
    }

    #[test]
    fn test_short_trailer_is_unknown() {
        for length in 0..WEP_MIN_EXTRA {
            let actual = classify(&vec![0; length]);
            assert_eq!(actual.encryption, EncryptionType::Unknown);
            assert_eq!(actual.detail, TrailerDetail::None);
        }
    }

    #[test]
    fn test_label_parsing_is_lenient() {
        for encryption in EncryptionType::iter() {
            assert_eq!(EncryptionType::from_label(&encryption.to_string()), encryption);
        }

        assert_eq!(EncryptionType::from_label(" wpa2 "), EncryptionType::Ccmp);
        assert_eq!(EncryptionType::from_label("tkip"), EncryptionType::Tkip);
        assert_eq!(EncryptionType::from_label("gcmp"), EncryptionType::Gcmp);
        assert_eq!(EncryptionType::from_label("ROT13"), EncryptionType::Unknown);
        assert_eq!(EncryptionType::from_label(""), EncryptionType::Unknown);
    }
}
