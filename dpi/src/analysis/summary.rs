use crate::annotations::{ManagementInfo, VlanInfo};
use crate::frame::{Field, Frame, FrameFamily, Layer};
use crate::protocols::ethernet::EthernetLayer;
use crate::protocols::wlan::WlanLayer;
use crate::protocols::wlan::subtype::{ControlSubtype, DataSubtype, ManagementSubtype};

/// Writes the base summary and the family-specific annotations.
pub fn annotate(frame: &mut Frame) {
    let length = frame.len();
    let family = frame.family();

    let base = match (family, frame.layer()) {
        (Some(FrameFamily::Ethernet), Layer::Ethernet(field)) => ethernet(field, length),
        (Some(family), Layer::Wlan(field)) if family.is_wlan() => wlan(family, field, length),
        _ => BaseSummary::text(format!("Unrecognized frame ({length} bytes)")),
    };

    let annotations = &mut frame.annotations;
    annotations.summary = Some(base.summary);
    if base.context.is_some() {
        annotations.context = base.context;
    }
    if base.direction.is_some() {
        annotations.direction = base.direction;
    }
    if base.management_info.is_some() {
        annotations.management_info = base.management_info;
    }
    if base.vlan_info.is_some() {
        annotations.vlan_info = base.vlan_info;
    }
}

#[derive(Debug, Default)]
struct BaseSummary {
    summary: String,
    context: Option<String>,
    direction: Option<String>,
    management_info: Option<ManagementInfo>,
    vlan_info: Option<VlanInfo>,
}

impl BaseSummary {
    fn text(summary: String) -> Self {
        Self {
            summary,
            ..Default::default()
        }
    }
}

fn ethernet(field: &Field<EthernetLayer>, length: usize) -> BaseSummary {
    match field {
        Field::Present(layer) => BaseSummary {
            summary: format!("Ethernet frame: {}", layer.ether_type_description()),
            vlan_info: layer.vlan.value().map(VlanInfo::from),
            ..Default::default()
        },
        Field::Absent => BaseSummary::text(format!("Ethernet frame: not decoded ({length} bytes)")),
        Field::Truncated => {
            BaseSummary::text(format!("Ethernet frame: truncated header ({length} bytes)"))
        },
    }
}

fn wlan(family: FrameFamily, field: &Field<WlanLayer>, length: usize) -> BaseSummary {
    let layer = match field {
        Field::Present(layer) => layer,
        Field::Absent | Field::Truncated => {
            return BaseSummary::text(format!(
                "WLAN {} Frame: truncated header ({length} bytes)",
                kind(family)
            ));
        },
    };

    let subtype = layer.frame_control.subtype;
    match family {
        FrameFamily::WlanManagement => {
            let subtype = ManagementSubtype::from(subtype);
            BaseSummary {
                summary: format!("WLAN Management Frame: {subtype}"),
                context: management_context(subtype).map(String::from),
                management_info: layer.management.value().map(ManagementInfo::from),
                ..Default::default()
            }
        },
        FrameFamily::WlanControl => {
            let subtype = ControlSubtype::from(subtype);
            BaseSummary {
                summary: format!("WLAN Control Frame: {subtype}"),
                context: control_context(subtype).map(String::from),
                ..Default::default()
            }
        },
        _ => {
            let subtype = DataSubtype::from(subtype);
            let direction = layer.direction().to_string();
            BaseSummary {
                summary: format!("WLAN Data Frame: {subtype}, Direction: {direction}"),
                context: data_context(subtype).map(String::from),
                direction: Some(direction),
                ..Default::default()
            }
        },
    }
}

fn kind(family: FrameFamily) -> &'static str {
    match family {
        FrameFamily::WlanManagement => "Management",
        FrameFamily::WlanControl => "Control",
        _ => "Data",
    }
}

pub fn management_context(subtype: ManagementSubtype) -> Option<&'static str> {
    let context = match subtype {
        ManagementSubtype::AssociationRequest => {
            "A station is requesting association with an access point"
        },
        ManagementSubtype::AssociationResponse => {
            "An access point is responding to an association request"
        },
        ManagementSubtype::ProbeRequest => "A station is actively scanning for access points",
        ManagementSubtype::ProbeResponse => "An access point is responding to a probe request",
        ManagementSubtype::Beacon => {
            "An access point is broadcasting its presence and capabilities"
        },
        ManagementSubtype::Disassociation => "A station or AP is terminating an association",
        ManagementSubtype::Authentication => {
            "A station is attempting to authenticate with an access point"
        },
        ManagementSubtype::Deauthentication => "A station or AP is terminating authentication",
        _ => return None,
    };

    Some(context)
}

pub fn control_context(subtype: ControlSubtype) -> Option<&'static str> {
    let context = match subtype {
        ControlSubtype::BlockAckRequest => {
            "Station is requesting block acknowledgment for multiple frames"
        },
        ControlSubtype::BlockAck => "Station is acknowledging receipt of multiple frames",
        ControlSubtype::PsPoll => {
            "Power-save station is requesting buffered frames from access point"
        },
        ControlSubtype::Rts => "Station is initiating RTS/CTS mechanism to reserve medium",
        ControlSubtype::Cts => "Station is responding to RTS, clearing sender to transmit",
        ControlSubtype::Ack => "Station is acknowledging receipt of a frame",
        ControlSubtype::CfEnd => "Access point is indicating end of contention-free period",
        ControlSubtype::CfEndCfAck => {
            "Access point is indicating end of contention-free period with ACK"
        },
        ControlSubtype::Unknown(_) => return None,
    };

    Some(context)
}

pub fn data_context(subtype: DataSubtype) -> Option<&'static str> {
    match subtype {
        DataSubtype::Null => {
            Some("Station is informing AP of its power state without sending data")
        },
        DataSubtype::QosData => Some("Data frame with QoS prioritization"),
        DataSubtype::QosNull => {
            Some("QoS station is informing AP of its power state without sending data")
        },
        DataSubtype::Data | DataSubtype::Unknown(_) => None,
    }
}
