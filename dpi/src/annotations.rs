use crate::analysis::qos::QosAdvisory;
use crate::analysis::security::SecurityAdvisory;
use crate::protocols::ethernet::vlan::VlanTag;
use crate::protocols::wlan::management::{CapabilityInfo, ManagementDetail};
use serde::{Deserialize, Serialize};

/// Bumped whenever a key of [`Annotations`] is renamed, removed or changes type.
pub const ANNOTATION_SCHEMA_VERSION: u32 = 1;

/// Facts derived by the analysis stages.
///
/// Keys are fixed. Later stages only fill or overwrite fields, in stage order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Annotations {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<SecurityAdvisory>,

    #[serde(rename = "QoS", default, skip_serializing_if = "Option::is_none")]
    pub qos: Option<QosAdvisory>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub management_info: Option<ManagementInfo>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,

    #[serde(rename = "VLANInfo", default, skip_serializing_if = "Option::is_none")]
    pub vlan_info: Option<VlanInfo>,
}

impl Annotations {
    /// Appends `" [text]"`, or starts the summary with `"[text]"`.
    pub fn append_summary(&mut self, text: &str) {
        match &mut self.summary {
            Some(summary) => {
                summary.push_str(" [");
                summary.push_str(text);
                summary.push(']');
            },
            None => self.summary = Some(format!("[{text}]")),
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ManagementInfo {
    #[serde(rename = "Type")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beacon_interval: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capability_info: Option<CapabilityInfo>,
}

impl From<&ManagementDetail> for ManagementInfo {
    fn from(detail: &ManagementDetail) -> Self {
        let beacon = detail.beacon.value();

        Self {
            kind: detail.subtype.to_string(),
            timestamp: beacon.map(|beacon| beacon.timestamp),
            beacon_interval: beacon.map(|beacon| beacon.interval),
            capability_info: beacon.map(|beacon| beacon.capabilities.clone()),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VlanInfo {
    pub priority: u8,
    pub drop_eligible: bool,

    #[serde(rename = "VLANID")]
    pub vlan_id: u16,
}

impl From<&VlanTag> for VlanInfo {
    fn from(tag: &VlanTag) -> Self {
        Self {
            priority: tag.priority,
            drop_eligible: tag.drop_eligible,
            vlan_id: tag.vlan_id,
        }
    }
}
