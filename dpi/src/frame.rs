use crate::annotations::Annotations;
use crate::parser::DissectError;
use crate::protocols::ethernet::EthernetLayer;
use crate::protocols::ethernet::mac::MacAddress;
use crate::protocols::wlan::WlanLayer;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[derive(Clone, Copy, Debug, Display, EnumString, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[strum(ascii_case_insensitive)]
pub enum FrameFamily {
    #[strum(serialize = "ethernet", to_string = "Ethernet")]
    Ethernet,

    #[strum(serialize = "wlan_management", to_string = "WLAN Management")]
    WlanManagement,
    #[strum(serialize = "wlan_control", to_string = "WLAN Control")]
    WlanControl,
    #[strum(serialize = "wlan_data", to_string = "WLAN Data")]
    WlanData,

    #[strum(serialize = "unrecognized", to_string = "Unrecognized")]
    Unrecognized,
}

impl FrameFamily {
    /// Maps the 2-bit type field of an 802.11 frame control word.
    /// The reserved value 3 has no family.
    pub fn from_wlan_type(frame_type: u8) -> Option<Self> {
        match frame_type {
            0 => Some(Self::WlanManagement),
            1 => Some(Self::WlanControl),
            2 => Some(Self::WlanData),
            _ => None,
        }
    }

    pub fn is_wlan(&self) -> bool {
        matches!(
            self,
            Self::WlanManagement | Self::WlanControl | Self::WlanData
        )
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct FrameHeader {
    pub tv_sec: i64,
    pub tv_usec: i64,
    pub caplen: u32,
    pub len: u32,
}

/// One buffer as delivered by the capture layer.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RawFrame {
    pub header: FrameHeader,
    pub data: Vec<u8>,

    // Capture layer already decoded an Ethernet link layer.
    pub ethernet_hint: bool,
}

impl RawFrame {
    pub fn new(header: FrameHeader, data: Vec<u8>, ethernet_hint: bool) -> Self {
        Self {
            header,
            data,
            ethernet_hint,
        }
    }
}

/// Decoding outcome of a field whose presence depends on other fields
/// or on the captured length.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum Field<T> {
    Present(T),

    // The field does not apply to this frame.
    #[default]
    Absent,

    // The field applies, but the capture ended before it.
    Truncated,
}

impl<T> Field<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Present(value) => Some(value),
            Self::Absent | Self::Truncated => None,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::Truncated)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Field<U> {
        match self {
            Self::Present(value) => Field::Present(f(value)),
            Self::Absent => Field::Absent,
            Self::Truncated => Field::Truncated,
        }
    }
}

/// Decoded link layer, one variant per frame family.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum Layer {
    // Not dissected yet.
    #[default]
    Pending,

    Ethernet(Field<EthernetLayer>),
    Wlan(Field<WlanLayer>),

    Unrecognized,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    sequence: u64,
    header: FrameHeader,
    data: Vec<u8>,
    ethernet_hint: bool,

    family: Option<FrameFamily>,
    layer: Layer,

    pub annotations: Annotations,
}

impl Frame {
    /// Creates an unclassified frame. The family is set later by the classifier.
    pub fn new(sequence: u64, raw: RawFrame) -> Self {
        Self {
            sequence,
            header: raw.header,
            data: raw.data,
            ethernet_hint: raw.ethernet_hint,
            family: None,
            layer: Layer::Pending,
            annotations: Annotations::default(),
        }
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn header(&self) -> &FrameHeader {
        &self.header
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn ethernet_hint(&self) -> bool {
        self.ethernet_hint
    }

    pub fn family(&self) -> Option<FrameFamily> {
        self.family
    }

    pub fn set_family(&mut self, family: FrameFamily) -> Result<(), DissectError> {
        if self.family.is_some() {
            return Err(DissectError::FamilyAlreadySet);
        }
        self.family = Some(family);

        Ok(())
    }

    pub fn layer(&self) -> &Layer {
        &self.layer
    }

    pub(crate) fn set_layer(&mut self, layer: Layer) -> Result<(), DissectError> {
        if self.layer != Layer::Pending {
            return Err(DissectError::AlreadyDissected);
        }
        self.layer = layer;

        Ok(())
    }

    pub fn ethernet(&self) -> Option<&EthernetLayer> {
        match &self.layer {
            Layer::Ethernet(field) => field.value(),
            _ => None,
        }
    }

    pub fn wlan(&self) -> Option<&WlanLayer> {
        match &self.layer {
            Layer::Wlan(field) => field.value(),
            _ => None,
        }
    }

    pub fn source_mac(&self) -> Option<&MacAddress> {
        if let Some(ethernet) = self.ethernet() {
            return Some(&ethernet.source_mac);
        }

        self.wlan()
            .and_then(|wlan| wlan.addressing.source.as_ref())
    }

    pub fn destination_mac(&self) -> Option<&MacAddress> {
        if let Some(ethernet) = self.ethernet() {
            return Some(&ethernet.destination_mac);
        }

        self.wlan()
            .and_then(|wlan| wlan.addressing.destination.as_ref())
    }
}
