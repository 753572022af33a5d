use crate::frame::{Field, FrameFamily};
use crate::parser::conditional;
use crate::protocols::ethernet::mac;
use crate::protocols::ethernet::mac::MacAddress;
use crate::protocols::wlan::addressing::{Addressing, DsDirection};
use crate::protocols::wlan::frame_control::FrameControl;
use crate::protocols::wlan::management::ManagementDetail;
use crate::protocols::wlan::qos::QosControl;
use crate::protocols::wlan::security::SecurityTrailer;
use nom::number::le_u16;
use nom::{IResult, Parser};
use serde::{Deserialize, Serialize};

pub mod addressing;
pub mod frame_control;
pub mod management;
pub mod qos;
pub mod security;
pub mod subtype;

// Frame Control, Duration, Address 1..3, Sequence Control
pub const HEADER_LENGTH: usize = 24;
pub const HEADER_WITH_ADDRESS_4_LENGTH: usize = HEADER_LENGTH + mac::LENGTH_BYTES;

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct WlanLayer {
    pub frame_control: FrameControl,

    // Raw Duration/ID field.
    pub duration: u16,

    pub address_1: MacAddress,
    pub address_2: MacAddress,
    pub address_3: MacAddress,
    pub address_4: Field<MacAddress>,

    pub sequence_control: SequenceControl,
    pub addressing: Addressing,

    pub qos: Field<QosControl>,
    pub security: Field<SecurityTrailer>,
    pub management: Field<ManagementDetail>,

    // Bytes consumed by the MAC header, Address 4 and QoS control included.
    pub header_length: usize,
}

impl WlanLayer {
    pub fn direction(&self) -> DsDirection {
        self.addressing.direction
    }

    pub fn is_protected(&self) -> bool {
        self.frame_control.protected
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct SequenceControl(pub u16);

impl SequenceControl {
    const FRAGMENT_MASK: u16 = 0x000F;
    const SEQUENCE_SHIFT: u16 = 4;

    pub fn fragment_number(&self) -> u8 {
        (self.0 & Self::FRAGMENT_MASK) as u8
    }

    pub fn sequence_number(&self) -> u16 {
        self.0 >> Self::SEQUENCE_SHIFT
    }
}

/// Decodes the 802.11 MAC header of a WLAN-family buffer.
///
/// Shorter than [`HEADER_LENGTH`] yields `Truncated`, never an error.
pub fn decode(bytes: &[u8], family: FrameFamily) -> Field<WlanLayer> {
    match parse(bytes, family) {
        Ok((_, layer)) => Field::Present(layer),
        Err(_) => {
            log::trace!("WLAN header truncated at {} bytes.", bytes.len());
            Field::Truncated
        },
    }
}

pub fn parse(bytes: &[u8], family: FrameFamily) -> IResult<&[u8], WlanLayer> {
    let (rest, frame_control) = frame_control::parse(bytes)?;
    let (rest, duration) = le_u16().parse(rest)?;
    let (rest, address_1) = mac::parse(rest)?;
    let (rest, address_2) = mac::parse(rest)?;
    let (rest, address_3) = mac::parse(rest)?;
    let (rest, sequence_control) = le_u16().parse(rest)?;

    let mut cursor = rest;

    let direction = DsDirection::from_flags(frame_control.to_ds, frame_control.from_ds);
    let address_4 = conditional(&mut cursor, direction == DsDirection::Wds, mac::parse);

    let has_qos =
        family == FrameFamily::WlanData && subtype::is_qos_data(frame_control.subtype);
    let qos = conditional(&mut cursor, has_qos, qos::parse);

    // The cipher header is only inspected, the cursor stays put.
    let security = match frame_control.protected {
        true => Field::Present(security::classify(cursor)),
        false => Field::Absent,
    };

    let management = match family {
        FrameFamily::WlanManagement => {
            Field::Present(management::decode(frame_control.subtype, cursor))
        },
        _ => Field::Absent,
    };

    let addressing = addressing::resolve(
        direction,
        &address_1,
        &address_2,
        &address_3,
        address_4.value(),
    );

    let layer = WlanLayer {
        frame_control,
        duration,
        address_1,
        address_2,
        address_3,
        address_4,
        sequence_control: SequenceControl(sequence_control),
        addressing,
        qos,
        security,
        management,
        header_length: bytes.len() - cursor.len(),
    };

    Ok((cursor, layer))
}
