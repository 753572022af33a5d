use nom::number::le_u16;
use nom::{IResult, Parser};
use serde::{Deserialize, Serialize};

// Frame Control field, 2 bytes, little-endian.
// IEEE Std 802.11-2020, 9.2.4.1
pub const LENGTH_BYTES: usize = 2;

const PROTOCOL_VERSION_MASK: u16 = 0b0000_0000_0000_0011;
const TYPE_SHIFT: u16 = 2;
const TYPE_MASK: u16 = 0b11;
const SUBTYPE_SHIFT: u16 = 4;
const SUBTYPE_MASK: u16 = 0b1111;

const TO_DS: u16 = 1 << 8;
const FROM_DS: u16 = 1 << 9;
const MORE_FRAGMENTS: u16 = 1 << 10;
const RETRY: u16 = 1 << 11;
const POWER_MANAGEMENT: u16 = 1 << 12;
const MORE_DATA: u16 = 1 << 13;
const PROTECTED: u16 = 1 << 14;
const ORDER: u16 = 1 << 15;

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct FrameControl {
    pub protocol_version: u8,
    pub frame_type: u8,
    pub subtype: u8,

    pub to_ds: bool,
    pub from_ds: bool,
    pub more_fragments: bool,
    pub retry: bool,
    pub power_management: bool,
    pub more_data: bool,
    pub protected: bool,
    pub order: bool,
}

impl From<u16> for FrameControl {
    fn from(value: u16) -> Self {
        let flag = |mask: u16| value & mask != 0;

        Self {
            protocol_version: (value & PROTOCOL_VERSION_MASK) as u8,
            frame_type: ((value >> TYPE_SHIFT) & TYPE_MASK) as u8,
            subtype: ((value >> SUBTYPE_SHIFT) & SUBTYPE_MASK) as u8,
            to_ds: flag(TO_DS),
            from_ds: flag(FROM_DS),
            more_fragments: flag(MORE_FRAGMENTS),
            retry: flag(RETRY),
            power_management: flag(POWER_MANAGEMENT),
            more_data: flag(MORE_DATA),
            protected: flag(PROTECTED),
            order: flag(ORDER),
        }
    }
}

impl From<&FrameControl> for u16 {
    fn from(value: &FrameControl) -> Self {
        let flags = [
            (value.to_ds, TO_DS),
            (value.from_ds, FROM_DS),
            (value.more_fragments, MORE_FRAGMENTS),
            (value.retry, RETRY),
            (value.power_management, POWER_MANAGEMENT),
            (value.more_data, MORE_DATA),
            (value.protected, PROTECTED),
            (value.order, ORDER),
        ];

        let mut word = (u16::from(value.protocol_version) & PROTOCOL_VERSION_MASK)
            | ((u16::from(value.frame_type) & TYPE_MASK) << TYPE_SHIFT)
            | ((u16::from(value.subtype) & SUBTYPE_MASK) << SUBTYPE_SHIFT);
        for (is_set, mask) in flags {
            if is_set {
                word |= mask;
            }
        }

        word
    }
}

pub fn parse(input: &[u8]) -> IResult<&[u8], FrameControl> {
    let (rest, value) = le_u16().parse(input)?;

    Ok((rest, FrameControl::from(value)))
}

/// Type bits of the leading frame control word, if there are 2 bytes to read.
pub fn peek_type(bytes: &[u8]) -> Option<u8> {
    let word = bytes.get(..LENGTH_BYTES)?;
    let value = u16::from_le_bytes([word[0], word[1]]);

    Some(((value >> TYPE_SHIFT) & TYPE_MASK) as u8)
}
