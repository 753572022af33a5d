use crate::frame::{Frame, FrameFamily, RawFrame};
use crate::protocols::wlan::frame_control;

/// Decides the family of incoming buffers and numbers them.
///
/// Owns the frame sequence counter. Every admitted frame receives the next
/// number by value.
#[derive(Clone, Debug)]
pub struct FrameClassifier {
    next_sequence: u64,
    ambiguous_as_ethernet: bool,
}

impl Default for FrameClassifier {
    fn default() -> Self {
        Self::new(true)
    }
}

impl FrameClassifier {
    pub const FIRST_SEQUENCE: u64 = 1;

    /// `ambiguous_as_ethernet` decides where buffers without a usable
    /// 802.11 type end up: Ethernet (the historical policy) or Unrecognized.
    pub fn new(ambiguous_as_ethernet: bool) -> Self {
        Self {
            next_sequence: Self::FIRST_SEQUENCE,
            ambiguous_as_ethernet,
        }
    }

    pub fn classify(&self, bytes: &[u8], ethernet_hint: bool) -> FrameFamily {
        classify(bytes, ethernet_hint, self.ambiguous_as_ethernet)
    }

    pub fn admit(&mut self, raw: RawFrame) -> Frame {
        let sequence = self.next_sequence;
        self.next_sequence = self.next_sequence.saturating_add(1);

        let family = self.classify(&raw.data, raw.ethernet_hint);
        log::trace!("Frame #{sequence}: {} bytes, classified as {family}.", raw.data.len());

        let mut frame = Frame::new(sequence, raw);
        if let Err(err) = frame.set_family(family) {
            log::error!("Frame #{sequence}: {err}");
        }

        frame
    }

    pub fn next_sequence(&self) -> u64 {
        self.next_sequence
    }
}

pub fn classify(bytes: &[u8], ethernet_hint: bool, ambiguous_as_ethernet: bool) -> FrameFamily {
    if ethernet_hint {
        return FrameFamily::Ethernet;
    }

    let wlan_family = frame_control::peek_type(bytes).and_then(FrameFamily::from_wlan_type);
    match wlan_family {
        Some(family) => family,
        None => match ambiguous_as_ethernet {
            true => FrameFamily::Ethernet,
            false => FrameFamily::Unrecognized,
        },
    }
}
