use crate::classifier::FrameClassifier;
use crate::frame::{Field, Frame, FrameFamily, Layer, RawFrame};
use crate::pipeline::Pipeline;
use crate::protocols::{ethernet, wlan};
use nom::IResult;
use thiserror::Error;

/// Classification, dissection and analysis of single frames.
pub struct FrameParser {
    classifier: FrameClassifier,
    pipeline: Pipeline,
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new(FrameClassifier::default(), Pipeline::default())
    }
}

impl FrameParser {
    pub fn new(classifier: FrameClassifier, pipeline: Pipeline) -> Self {
        Self {
            classifier,
            pipeline,
        }
    }

    pub fn process(&mut self, raw: RawFrame) -> Result<Frame, DissectError> {
        let mut frame = self.classifier.admit(raw);
        dissect(&mut frame)?;
        self.pipeline.run(&mut frame);

        Ok(frame)
    }
}

/// Runs the dissector matching the frame family.
pub fn dissect(frame: &mut Frame) -> Result<(), DissectError> {
    match frame.family() {
        None => Err(DissectError::Unclassified),
        Some(FrameFamily::Ethernet) => dissect_ethernet(frame),
        Some(family) if family.is_wlan() => dissect_wlan(frame),
        Some(_) => frame.set_layer(Layer::Unrecognized),
    }
}

pub fn dissect_ethernet(frame: &mut Frame) -> Result<(), DissectError> {
    let family = frame.family().ok_or(DissectError::Unclassified)?;
    if family != FrameFamily::Ethernet {
        return Err(DissectError::FamilyMismatch(family));
    }

    // Only the capture layer vouches for an Ethernet link layer.
    // Fallback-classified buffers keep their Ethernet fields absent.
    let layer = match frame.ethernet_hint() {
        true => ethernet::decode(frame.data()),
        false => Field::Absent,
    };
    frame.set_layer(Layer::Ethernet(layer))
}

pub fn dissect_wlan(frame: &mut Frame) -> Result<(), DissectError> {
    let family = frame.family().ok_or(DissectError::Unclassified)?;
    if !family.is_wlan() {
        return Err(DissectError::FamilyMismatch(family));
    }

    let layer = wlan::decode(frame.data(), family);
    frame.set_layer(Layer::Wlan(layer))
}

/// Decodes a field that only exists under `applies`.
/// On success the cursor moves past the field, otherwise it stays put.
pub fn conditional<'a, T>(
    cursor: &mut &'a [u8], applies: bool,
    parser: impl FnOnce(&'a [u8]) -> IResult<&'a [u8], T>,
) -> Field<T> {
    if !applies {
        return Field::Absent;
    }

    match parser(cursor) {
        Ok((rest, value)) => {
            *cursor = rest;
            Field::Present(value)
        },
        Err(_) => Field::Truncated,
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum DissectError {
    #[error("Frame family was never set.")]
    Unclassified,

    #[error("Frame family is already set.")]
    FamilyAlreadySet,

    #[error("Frame is already dissected.")]
    AlreadyDissected,

    #[error("Dissector does not accept {0} frames.")]
    FamilyMismatch(FrameFamily),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameHeader;
    use nom::Parser;
    use nom::number::le_u16;

    fn raw(hex_frame: &str, ethernet_hint: bool) -> RawFrame {
        let data = hex::decode(hex_frame.replace(" ", "")).unwrap();
        RawFrame::new(FrameHeader::default(), data, ethernet_hint)
    }

    #[test]
    fn test_dissect_unclassified_frame_fails() {
        let mut frame = Frame::new(1, raw("08 00", false));
        assert_eq!(dissect(&mut frame), Err(DissectError::Unclassified));
        assert_eq!(dissect_wlan(&mut frame), Err(DissectError::Unclassified));
        assert_eq!(frame.layer(), &Layer::Pending);
    }

    #[test]
    fn test_dissect_family_mismatch() {
        let mut frame = Frame::new(1, raw("08 00", false));
        frame.set_family(FrameFamily::Ethernet).unwrap();
        assert_eq!(
            dissect_wlan(&mut frame),
            Err(DissectError::FamilyMismatch(FrameFamily::Ethernet))
        );

        let mut frame = Frame::new(2, raw("08 00", false));
        frame.set_family(FrameFamily::WlanData).unwrap();
        assert_eq!(
            dissect_ethernet(&mut frame),
            Err(DissectError::FamilyMismatch(FrameFamily::WlanData))
        );
    }

    #[test]
    fn test_dissect_twice_fails() {
        let mut frame = Frame::new(1, raw("08 00", false));
        frame.set_family(FrameFamily::WlanData).unwrap();
        dissect(&mut frame).unwrap();
        assert_eq!(dissect(&mut frame), Err(DissectError::AlreadyDissected));
    }

    #[test]
    fn test_fallback_ethernet_keeps_fields_absent() {
        let mut parser = FrameParser::default();
        let frame = parser.process(raw("0F", false)).unwrap();

        assert_eq!(frame.family(), Some(FrameFamily::Ethernet));
        assert_eq!(frame.layer(), &Layer::Ethernet(Field::Absent));
        assert_eq!(frame.source_mac(), None);
    }

    #[test]
    fn test_unrecognized_frame_layer() {
        let classifier = FrameClassifier::new(false);
        let mut parser = FrameParser::new(classifier, Pipeline::default());
        let frame = parser.process(raw("0F", false)).unwrap();

        assert_eq!(frame.family(), Some(FrameFamily::Unrecognized));
        assert_eq!(frame.layer(), &Layer::Unrecognized);
        assert_eq!(
            frame.annotations.summary.as_deref(),
            Some("Unrecognized frame (1 bytes)")
        );
    }

    #[test]
    fn test_conditional_field() {
        let bytes = [0x34, 0x12, 0xFF];
        let mut cursor: &[u8] = &bytes;

        let skipped = conditional(&mut cursor, false, |input| le_u16().parse(input));
        assert_eq!(skipped, Field::Absent);
        assert_eq!(cursor.len(), 3);

        let value = conditional(&mut cursor, true, |input| le_u16().parse(input));
        assert_eq!(value, Field::Present(0x1234));
        assert_eq!(cursor, &[0xFF]);

        let truncated = conditional(&mut cursor, true, |input| le_u16().parse(input));
        assert_eq!(truncated, Field::Truncated);
        assert_eq!(cursor, &[0xFF]);
    }
}
