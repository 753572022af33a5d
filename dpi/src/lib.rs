// Library lints
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(unsafe_code)]

pub use crate::frame::{Frame, FrameFamily, FrameHeader, RawFrame};
pub use crate::parser::{DissectError, FrameParser};

pub mod analysis;
pub mod annotations;
pub mod classifier;
pub mod filter;
pub mod frame;
pub mod parser;
pub mod pipeline;
pub mod protocols;
