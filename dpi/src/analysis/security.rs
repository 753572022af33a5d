use crate::frame::{Frame, FrameFamily};
use crate::protocols::wlan::security::{EncryptionType, SecurityTrailer, TrailerDetail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum_macros::Display;

#[derive(
    Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize,
)]
pub enum SecurityLevel {
    None,
    Low,
    Medium,
    High,
    #[strum(to_string = "Very High")]
    #[serde(rename = "Very High")]
    VeryHigh,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SecurityAdvisory {
    pub encryption_type: String,

    // Absent when nothing specific is known about the cipher.
    #[serde(rename = "SecurityLevel", default, skip_serializing_if = "Option::is_none")]
    pub level: Option<SecurityLevel>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vulnerabilities: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,

    // Cipher header fields, hex encoded.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub details: BTreeMap<String, String>,
}

/// Security stage. Protected frames get the cipher label appended to the summary.
pub fn annotate(frame: &mut Frame) {
    let (Some(family), Some(wlan)) = (frame.family(), frame.wlan()) else {
        return;
    };

    let (advisory, label) = match wlan.security.value() {
        Some(trailer) => (Some(assess(trailer)), Some(trailer.encryption.to_string())),
        None => (assess_unprotected(family), None),
    };

    if advisory.is_some() {
        frame.annotations.security = advisory;
    }
    if let Some(label) = label {
        frame.annotations.append_summary(&label);
    }
}

/// Advisory for a protected frame, from the guessed cipher.
pub fn assess(trailer: &SecurityTrailer) -> SecurityAdvisory {
    let mut advisory = assess_encryption(trailer.encryption);
    advisory.details = details(&trailer.detail);

    advisory
}

/// Same as [`assess_encryption`], for a free-form cipher label.
pub fn assess_label(label: &str) -> SecurityAdvisory {
    let mut advisory = assess_encryption(EncryptionType::from_label(label));
    if advisory.level.is_none() {
        advisory.encryption_type = label.to_string();
    }

    advisory
}

pub fn assess_encryption(encryption: EncryptionType) -> SecurityAdvisory {
    let (level, vulnerabilities, recommendation, context) = match encryption {
        EncryptionType::Wep => (
            SecurityLevel::Low,
            vec![
                "RC4 encryption easily broken",
                "IV reuse vulnerability",
                "Susceptible to packet forgery",
            ],
            "WEP is deprecated and insecure. Upgrade to WPA2 or WPA3.",
            "WEP uses a 24-bit initialization vector (IV) with RC4 stream cipher, which is \
             vulnerable to statistical attacks.",
        ),
        EncryptionType::Tkip => (
            SecurityLevel::Medium,
            vec!["Michael MIC attack", "TKIP uses RC4 which has weaknesses"],
            "TKIP/WPA is outdated. Upgrade to WPA2 or WPA3.",
            "TKIP was designed as a stopgap replacement for WEP, improving security while \
             maintaining hardware compatibility.",
        ),
        EncryptionType::Ccmp => (
            SecurityLevel::High,
            vec!["KRACK attack (fixed in most modern devices)"],
            "Ensure device firmware is updated to patch against KRACK vulnerabilities.",
            "CCMP uses AES and provides strong encryption considered secure for most \
             applications.",
        ),
        EncryptionType::Gcmp => (
            SecurityLevel::VeryHigh,
            vec!["Potential side-channel attacks (theoretical)"],
            "Currently the most secure option for WiFi.",
            "WPA3 provides stronger encryption, protection against brute force attacks, and \
             forward secrecy.",
        ),
        EncryptionType::Unknown => {
            return SecurityAdvisory {
                encryption_type: encryption.to_string(),
                ..Default::default()
            };
        },
    };

    SecurityAdvisory {
        encryption_type: encryption.to_string(),
        level: Some(level),
        vulnerabilities: vulnerabilities.into_iter().map(String::from).collect(),
        recommendation: Some(recommendation.to_string()),
        context: Some(context.to_string()),
        warning: None,
        details: BTreeMap::new(),
    }
}

/// Advisory for a WLAN frame sent without the Protected flag.
/// Returns `None` for non-WLAN families.
pub fn assess_unprotected(family: FrameFamily) -> Option<SecurityAdvisory> {
    if !family.is_wlan() {
        return None;
    }

    let (context, recommendation) = match family {
        FrameFamily::WlanManagement => (
            Some(
                "Management frames are typically unencrypted in older standards, but newer \
                 standards support Protected Management Frames (PMF).",
            ),
            None,
        ),
        FrameFamily::WlanData => (
            Some(
                "Unencrypted data frames expose payload contents to anyone monitoring the \
                 channel.",
            ),
            Some("Configure wireless network to use encryption."),
        ),
        _ => (None, None),
    };

    Some(SecurityAdvisory {
        encryption_type: String::from("None"),
        level: Some(SecurityLevel::None),
        vulnerabilities: Vec::new(),
        recommendation: recommendation.map(String::from),
        context: context.map(String::from),
        warning: Some(String::from("Unencrypted wireless frame")),
        details: BTreeMap::new(),
    })
}

fn details(detail: &TrailerDetail) -> BTreeMap<String, String> {
    let entries = match detail {
        TrailerDetail::Wep { iv, key_id } => {
            vec![("IV", hex::encode_upper(iv)), ("KeyID", key_id.to_string())]
        },
        TrailerDetail::Tkip { iv, extended_iv } => vec![
            ("IV", hex::encode_upper(iv)),
            ("ExtIV", hex::encode_upper(extended_iv)),
        ],
        TrailerDetail::Ccmp { packet_number } => vec![("PN", hex::encode_upper(packet_number))],
        TrailerDetail::None => Vec::new(),
    };

    entries
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}
