use crate::analysis::{qos, security, summary};
use crate::frame::Frame;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

/// Analysis stages, declared in the order they run.
#[derive(
    Clone, Copy, Debug, Display, EnumIter, EnumString, Eq, Hash, Ord, PartialEq, PartialOrd,
    Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Summary,
    Security,
    Qos,
}

impl Stage {
    pub fn run(&self, frame: &mut Frame) {
        match self {
            Self::Summary => summary::annotate(frame),
            Self::Security => security::annotate(frame),
            Self::Qos => qos::annotate(frame),
        }
    }
}

/// Ordered set of stages applied to every dissected frame.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(Stage::iter())
    }
}

impl Pipeline {
    /// Any subset, in any order, with duplicates. Stages still run in declared order, once.
    pub fn new(stages: impl IntoIterator<Item = Stage>) -> Self {
        let mut stages: Vec<Stage> = stages.into_iter().collect();
        stages.sort_unstable();
        stages.dedup();

        Self { stages }
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn run(&self, frame: &mut Frame) {
        for stage in &self.stages {
            stage.run(frame);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::security::SecurityLevel;
    use crate::frame::{FrameFamily, FrameHeader, RawFrame};
    use crate::parser;

    // QoS Data, ToDS, Protected, TID 6, TXOP 10, TKIP IV (ExtIV set) then payload
    const PROTECTED_QOS_DATA: &str = "8841 3a01 020000000001 020000000002 020000000003 1000 \
                                      060a 0100002000000000 00000000000000000000000000000000";

    fn frame(hex_frame: &str, family: FrameFamily) -> Frame {
        let data = hex::decode(hex_frame.replace(" ", "")).unwrap();
        let mut frame = Frame::new(1, RawFrame::new(FrameHeader::default(), data, false));
        frame.set_family(family).unwrap();
        parser::dissect(&mut frame).unwrap();
        frame
    }

    fn ccmp_frame() -> Frame {
        // ExtIV bit of the fourth trailer byte cleared
        frame(
            &PROTECTED_QOS_DATA.replace("0100002000000000", "0100000000000000"),
            FrameFamily::WlanData,
        )
    }

    #[test]
    fn test_stages_run_in_declared_order() {
        let pipeline = Pipeline::new([Stage::Qos, Stage::Security, Stage::Summary, Stage::Qos]);
        assert_eq!(
            pipeline.stages(),
            &[Stage::Summary, Stage::Security, Stage::Qos]
        );

        let mut frame = ccmp_frame();
        pipeline.run(&mut frame);

        assert_eq!(
            frame.annotations.summary.as_deref(),
            Some(
                "WLAN Data Frame: QoS Data, Direction: Station to Distribution System \
                 [CCMP (WPA2)] [QoS: Voice, Priority: 6]"
            )
        );
    }

    #[test]
    fn test_protected_qos_data_scenario() {
        let mut frame = ccmp_frame();
        Pipeline::default().run(&mut frame);

        let annotations = &frame.annotations;
        let security = annotations.security.as_ref().unwrap();
        let qos = annotations.qos.as_ref().unwrap();

        assert_eq!(frame.family(), Some(FrameFamily::WlanData));
        assert_eq!(
            annotations.direction.as_deref(),
            Some("Station to Distribution System")
        );
        assert_eq!(security.encryption_type, "CCMP (WPA2)");
        assert_eq!(security.level, Some(SecurityLevel::High));
        assert_eq!(qos.txop_duration_micros, 320);
        assert_eq!(annotations.context.as_deref(), Some("Data frame with QoS prioritization"));
    }

    #[test]
    fn test_tkip_when_ext_iv_is_set() {
        let mut frame = frame(PROTECTED_QOS_DATA, FrameFamily::WlanData);
        Pipeline::default().run(&mut frame);

        let security = frame.annotations.security.unwrap();
        assert_eq!(security.encryption_type, "TKIP (WPA)");
        assert_eq!(security.level, Some(SecurityLevel::Medium));
    }

    #[test]
    fn test_stage_subsets() {
        let mut only_qos = ccmp_frame();
        Pipeline::new([Stage::Qos]).run(&mut only_qos);
        assert_eq!(
            only_qos.annotations.summary.as_deref(),
            Some("[QoS: Voice, Priority: 6]")
        );
        assert!(only_qos.annotations.security.is_none());

        let mut security_and_qos = ccmp_frame();
        Pipeline::new([Stage::Security, Stage::Qos]).run(&mut security_and_qos);
        assert_eq!(
            security_and_qos.annotations.summary.as_deref(),
            Some("[CCMP (WPA2)] [QoS: Voice, Priority: 6]")
        );

        let mut nothing = ccmp_frame();
        Pipeline::new([]).run(&mut nothing);
        assert!(nothing.annotations.is_empty());
    }

    #[test]
    fn test_unprotected_data_gets_warning_without_label() {
        let mut frame = frame(
            "0800 0000 020000000001 020000000002 020000000003 0000",
            FrameFamily::WlanData,
        );
        Pipeline::default().run(&mut frame);

        let security = frame.annotations.security.as_ref().unwrap();
        assert_eq!(security.level, Some(SecurityLevel::None));
        assert_eq!(
            frame.annotations.summary.as_deref(),
            Some("WLAN Data Frame: Data, Direction: Station to Station (Ad-Hoc)")
        );
        assert!(frame.annotations.qos.is_none());
    }

    #[test]
    fn test_ethernet_frames_skip_wlan_stages() {
        let data = hex::decode("ffffffffffff001122334455 0806 0001".replace(" ", "")).unwrap();
        let mut frame = Frame::new(1, RawFrame::new(FrameHeader::default(), data, true));
        frame.set_family(FrameFamily::Ethernet).unwrap();
        parser::dissect(&mut frame).unwrap();
        Pipeline::default().run(&mut frame);

        assert_eq!(frame.annotations.summary.as_deref(), Some("Ethernet frame: ARP"));
        assert!(frame.annotations.security.is_none());
        assert!(frame.annotations.qos.is_none());
    }

    #[test]
    fn test_stage_names() {
        assert_eq!("qos".parse::<Stage>().unwrap(), Stage::Qos);
        assert_eq!("Security".parse::<Stage>().unwrap(), Stage::Security);
        assert_eq!(Stage::Summary.to_string(), "summary");
        assert!("metrics".parse::<Stage>().is_err());
    }
}
