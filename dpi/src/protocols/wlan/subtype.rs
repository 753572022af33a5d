use num_enum::{FromPrimitive, IntoPrimitive};
use serde::{Deserialize, Serialize};
use std::fmt::Formatter;

// QoS Data, QoS Data + CF-Ack, QoS Data + CF-Poll, QoS Data + CF-Ack + CF-Poll
pub const QOS_DATA_SUBTYPES: std::ops::RangeInclusive<u8> = 8..=11;

pub fn is_qos_data(subtype: u8) -> bool {
    QOS_DATA_SUBTYPES.contains(&subtype)
}

#[derive(
    Clone, Copy, Debug, Eq, FromPrimitive, Hash, IntoPrimitive, PartialEq, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum ManagementSubtype {
    AssociationRequest = 0,
    AssociationResponse = 1,
    ReassociationRequest = 2,
    ReassociationResponse = 3,
    ProbeRequest = 4,
    ProbeResponse = 5,
    Beacon = 8,
    Atim = 9,
    Disassociation = 10,
    Authentication = 11,
    Deauthentication = 12,
    Action = 13,
    #[num_enum(catch_all)]
    Unknown(u8),
}

impl std::fmt::Display for ManagementSubtype {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::AssociationRequest => "Association Request",
            Self::AssociationResponse => "Association Response",
            Self::ReassociationRequest => "Reassociation Request",
            Self::ReassociationResponse => "Reassociation Response",
            Self::ProbeRequest => "Probe Request",
            Self::ProbeResponse => "Probe Response",
            Self::Beacon => "Beacon",
            Self::Atim => "ATIM",
            Self::Disassociation => "Disassociation",
            Self::Authentication => "Authentication",
            Self::Deauthentication => "Deauthentication",
            Self::Action => "Action",
            Self::Unknown(_) => "Unknown",
        };

        write!(f, "{name}")
    }
}

#[derive(
    Clone, Copy, Debug, Eq, FromPrimitive, Hash, IntoPrimitive, PartialEq, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum ControlSubtype {
    BlockAckRequest = 8,
    BlockAck = 9,
    PsPoll = 10,
    Rts = 11,
    Cts = 12,
    Ack = 13,
    CfEnd = 14,
    CfEndCfAck = 15,
    #[num_enum(catch_all)]
    Unknown(u8),
}

impl std::fmt::Display for ControlSubtype {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlockAckRequest => write!(f, "Block ACK Request"),
            Self::BlockAck => write!(f, "Block ACK"),
            Self::PsPoll => write!(f, "PS-Poll"),
            Self::Rts => write!(f, "RTS (Request to Send)"),
            Self::Cts => write!(f, "CTS (Clear to Send)"),
            Self::Ack => write!(f, "ACK"),
            Self::CfEnd => write!(f, "CF-End"),
            Self::CfEndCfAck => write!(f, "CF-End + CF-ACK"),
            Self::Unknown(subtype) => write!(f, "Unknown control frame ({subtype})"),
        }
    }
}

#[derive(
    Clone, Copy, Debug, Eq, FromPrimitive, Hash, IntoPrimitive, PartialEq, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum DataSubtype {
    Data = 0,
    Null = 4,
    QosData = 8,
    QosNull = 12,
    #[num_enum(catch_all)]
    Unknown(u8),
}

impl std::fmt::Display for DataSubtype {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Data => write!(f, "Data"),
            Self::Null => write!(f, "Null function (no data)"),
            Self::QosData => write!(f, "QoS Data"),
            Self::QosNull => write!(f, "QoS Null function (no data)"),
            Self::Unknown(subtype) => write!(f, "Unknown data frame ({subtype})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_management_names() {
        assert_eq!(ManagementSubtype::from(8).to_string(), "Beacon");
        assert_eq!(ManagementSubtype::from(9).to_string(), "ATIM");
        assert_eq!(ManagementSubtype::from(6), ManagementSubtype::Unknown(6));
        assert_eq!(ManagementSubtype::from(6).to_string(), "Unknown");
        assert_eq!(u8::from(ManagementSubtype::Deauthentication), 12);
    }

    #[test]
    fn test_control_names() {
        assert_eq!(ControlSubtype::from(11).to_string(), "RTS (Request to Send)");
        assert_eq!(ControlSubtype::from(15).to_string(), "CF-End + CF-ACK");
        assert_eq!(ControlSubtype::from(3).to_string(), "Unknown control frame (3)");
    }

    #[test]
    fn test_data_names() {
        assert_eq!(DataSubtype::from(0).to_string(), "Data");
        assert_eq!(DataSubtype::from(12).to_string(), "QoS Null function (no data)");
        assert_eq!(DataSubtype::from(9).to_string(), "Unknown data frame (9)");
    }

    #[test]
    fn test_qos_data_subtypes() {
        let qos: Vec<u8> = (0..16).filter(|subtype| is_qos_data(*subtype)).collect();
        assert_eq!(qos, vec![8, 9, 10, 11]);
    }
}
