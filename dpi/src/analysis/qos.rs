use crate::frame::Frame;
use crate::protocols::wlan::qos::{AckPolicy, QosControl};
use serde::{Deserialize, Serialize};
use std::fmt::Formatter;

// One TXOP unit.
pub const TXOP_UNIT_MICROS: u32 = 32;

const TXOP_CONTEXT: &str = "Station is allowed to transmit multiple frames within this time \
                            window without contending for the medium again.";

/// 802.1D user priority grouped into WMM access categories.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum TrafficClass {
    Background,
    BestEffort,
    Video,
    Voice,
    Unknown(u8),
}

impl TrafficClass {
    pub fn from_tid(tid: u8) -> Self {
        match tid {
            0 | 3 => Self::Background,
            1 | 2 => Self::BestEffort,
            4 | 5 => Self::Video,
            6 | 7 => Self::Voice,
            _ => Self::Unknown(tid),
        }
    }
}

impl std::fmt::Display for TrafficClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Background => write!(f, "Background"),
            Self::BestEffort => write!(f, "BestEffort"),
            Self::Video => write!(f, "Video"),
            Self::Voice => write!(f, "Voice"),
            Self::Unknown(tid) => write!(f, "Unknown({tid})"),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QosAdvisory {
    pub priority: u8,

    #[serde(rename = "TID")]
    pub tid: u8,

    #[serde(rename = "ACKPolicy")]
    pub ack_policy: AckPolicy,

    #[serde(rename = "TrafficType")]
    pub traffic_class: TrafficClass,

    #[serde(rename = "ACKContext")]
    pub ack_context: String,

    pub explanation: String,
    pub recommended_applications: Vec<String>,

    #[serde(rename = "TXOPDuration")]
    pub txop_duration_micros: u32,

    #[serde(rename = "TXOPContext", default, skip_serializing_if = "Option::is_none")]
    pub txop_context: Option<String>,

    #[serde(rename = "EOSP")]
    pub eosp: bool,

    #[serde(rename = "AMSDU")]
    pub amsdu: bool,
}

/// QoS stage. Frames with a decoded QoS control get its class appended to the summary.
pub fn annotate(frame: &mut Frame) {
    let Some(advisory) = frame
        .wlan()
        .and_then(|wlan| wlan.qos.value())
        .map(assess)
    else {
        return;
    };

    let text = format!(
        "QoS: {}, Priority: {}",
        advisory.traffic_class, advisory.priority
    );
    frame.annotations.qos = Some(advisory);
    frame.annotations.append_summary(&text);
}

pub fn assess(qos: &QosControl) -> QosAdvisory {
    let txop_context = match qos.txop > 0 {
        true => Some(TXOP_CONTEXT.to_string()),
        false => None,
    };

    QosAdvisory {
        priority: qos.priority(),
        tid: qos.tid,
        ack_policy: qos.ack_policy,
        traffic_class: TrafficClass::from_tid(qos.tid),
        ack_context: ack_context(qos.ack_policy).to_string(),
        explanation: explanation(qos.priority()).to_string(),
        recommended_applications: recommended_applications(qos.priority())
            .iter()
            .map(|application| application.to_string())
            .collect(),
        txop_duration_micros: txop_duration_micros(qos.txop),
        txop_context,
        eosp: qos.eosp,
        amsdu: qos.amsdu,
    }
}

pub fn txop_duration_micros(txop: u8) -> u32 {
    u32::from(txop) * TXOP_UNIT_MICROS
}

pub fn ack_context(policy: AckPolicy) -> &'static str {
    match policy {
        AckPolicy::Normal => {
            "Each frame requires acknowledgment, providing reliable delivery but with overhead."
        },
        AckPolicy::NoAck => {
            "Frames are not acknowledged. Used for time-sensitive traffic where retransmissions \
             are not useful."
        },
        AckPolicy::NoExplicitAck => {
            "Used in power-save mode. Acknowledgment is not immediate but delayed."
        },
        AckPolicy::BlockAck => {
            "Multiple frames are acknowledged with a single Block ACK, improving efficiency."
        },
    }
}

pub fn explanation(priority: u8) -> &'static str {
    match priority {
        0 => {
            "Lowest priority. Used for bulk transfers and background tasks that do not have \
             strict latency requirements."
        },
        1 => "Low priority. Used for best effort traffic like email and web browsing.",
        2 => "Low-medium priority. Best effort traffic with slightly higher priority.",
        3 => {
            "Medium priority. Used for applications that require better than best effort but \
             are not sensitive to latency."
        },
        4 => "Medium-high priority. Used for streaming video that can tolerate some delay.",
        5 => "High priority. Used for video applications with lower tolerance for delay.",
        6 => {
            "Very high priority. Used for voice applications that require low latency and \
             jitter."
        },
        7 => "Highest priority. Reserved for network control traffic.",
        _ => "Unknown priority level.",
    }
}

pub fn recommended_applications(priority: u8) -> &'static [&'static str] {
    match priority {
        0 => &["File downloads", "Print jobs", "Backup operations"],
        1 | 2 => &["Web browsing", "Email", "Social media", "Chat applications"],
        3 => &["ERP applications", "Database access", "Interactive applications"],
        4 | 5 => &["Video streaming", "Video conferencing", "IPTV"],
        6 => &["VoIP", "Video conferencing audio", "Online gaming"],
        7 => &["Network control protocols", "WLAN management"],
        _ => &["Unknown"],
    }
}
