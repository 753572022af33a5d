use nom::number::le_u16;
use nom::{IResult, Parser};
use serde::{Deserialize, Serialize};
use strum_macros::Display;

// QoS Control field, 2 bytes, little-endian.
// IEEE Std 802.11-2020, 9.2.4.5
pub const LENGTH_BYTES: usize = 2;

const TID_MASK: u16 = 0x000F;
const EOSP: u16 = 1 << 4;
const ACK_POLICY_SHIFT: u16 = 5;
const ACK_POLICY_MASK: u16 = 0b11;
const AMSDU: u16 = 1 << 7;
const TXOP_SHIFT: u16 = 8;

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct QosControl {
    pub tid: u8,
    pub eosp: bool,
    pub ack_policy: AckPolicy,
    pub amsdu: bool,

    // In 32 microsecond units.
    pub txop: u8,
}

impl QosControl {
    pub fn priority(&self) -> u8 {
        self.tid
    }
}

impl From<u16> for QosControl {
    fn from(value: u16) -> Self {
        Self {
            tid: (value & TID_MASK) as u8,
            eosp: value & EOSP != 0,
            ack_policy: AckPolicy::from_bits(((value >> ACK_POLICY_SHIFT) & ACK_POLICY_MASK) as u8),
            amsdu: value & AMSDU != 0,
            txop: (value >> TXOP_SHIFT) as u8,
        }
    }
}

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum AckPolicy {
    #[strum(to_string = "Normal ACK")]
    Normal,
    #[strum(to_string = "No ACK")]
    NoAck,
    #[strum(to_string = "No Explicit ACK")]
    NoExplicitAck,
    #[strum(to_string = "Block ACK")]
    BlockAck,
}

impl AckPolicy {
    /// Only the two low bits are looked at.
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0 => Self::Normal,
            1 => Self::NoAck,
            2 => Self::NoExplicitAck,
            _ => Self::BlockAck,
        }
    }
}

pub fn parse(input: &[u8]) -> IResult<&[u8], QosControl> {
    let (rest, value) = le_u16().parse(input)?;

    Ok((rest, QosControl::from(value)))
}
