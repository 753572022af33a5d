use crate::net::link::LinkLayer;
use crossbeam::channel::{SendTimeoutError, Sender, TrySendError};
use dpi::frame::{FrameHeader, RawFrame};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use strum_macros::{Display, EnumString};
use thiserror::Error;

// Blocked sends wake up this often to notice shutdown.
const SEND_RETRY_INTERVAL: Duration = Duration::from_millis(100);

/// What the producer does when the frame queue is full.
#[derive(Clone, Copy, Debug, Display, EnumString, Eq, PartialEq)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Backpressure {
    // Wait for the consumer, nothing is lost.
    Block,

    // Discard the frame and count it.
    Drop,
}

#[derive(Debug, Default)]
pub struct CaptureStats {
    received: AtomicU64,
    dropped: AtomicU64,
    malformed: AtomicU64,
    processed: AtomicU64,
    failed: AtomicU64,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct StatsSnapshot {
    pub received: u64,
    pub dropped: u64,
    pub malformed: u64,
    pub processed: u64,
    pub failed: u64,
}

impl CaptureStats {
    pub fn record_received(&self) {
        self.received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dropped(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_malformed(&self) {
        self.malformed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_processed(&self) {
        self.processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            received: self.received.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            malformed: self.malformed.load(Ordering::Relaxed),
            processed: self.processed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

impl std::fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "received {}, dropped {}, malformed {}, processed {}, failed {}",
            self.received, self.dropped, self.malformed, self.processed, self.failed
        )
    }
}

/// Producer side: reads the capture handle and feeds the frame queue.
pub struct CaptureHandler {
    capture: pcap::Capture<pcap::Active>,
    link: LinkLayer,
    sender: Sender<RawFrame>,
    backpressure: Backpressure,

    stats: Arc<CaptureStats>,
    shutdown_flag: Arc<AtomicBool>,
}

impl CaptureHandler {
    pub fn new(
        capture: pcap::Capture<pcap::Active>, sender: Sender<RawFrame>,
        backpressure: Backpressure, stats: Arc<CaptureStats>, shutdown_flag: Arc<AtomicBool>,
    ) -> Self {
        let link = LinkLayer::from(capture.get_datalink());

        Self {
            capture,
            link,
            sender,
            backpressure,
            stats,
            shutdown_flag,
        }
    }

    /// Runs until shutdown, a capture error, or the consumer going away.
    pub fn start(mut self) -> Result<(), CaptureError> {
        log::info!("Capturing on a {} link.", self.link);

        loop {
            if self.shutdown_flag.load(Ordering::Acquire) {
                log::info!("Shutting down capture thread.");
                break;
            }

            let raw = match self.capture.next_packet() {
                Ok(packet) => {
                    self.stats.record_received();
                    self.link.raw_frame(frame_header(packet.header), packet.data)
                },
                Err(pcap::Error::TimeoutExpired) => continue,
                Err(err) => return Err(CaptureError::PcapError(err)),
            };

            match raw {
                Ok(raw) => {
                    let outcome = enqueue(
                        &self.sender,
                        raw,
                        self.backpressure,
                        &self.stats,
                        &self.shutdown_flag,
                    )?;
                    if outcome == Enqueued::Stopped {
                        break;
                    }
                },
                Err(err) => {
                    self.stats.record_malformed();
                    log::debug!(
                        "Skipped captured buffer. {err} {}",
                        err.additional_info().unwrap_or_default()
                    );
                },
            }
        }

        Ok(())
    }
}

pub fn frame_header(header: &pcap::PacketHeader) -> FrameHeader {
    FrameHeader {
        tv_sec: i64::from(header.ts.tv_sec),
        tv_usec: i64::from(header.ts.tv_usec),
        caplen: header.caplen,
        len: header.len,
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Enqueued {
    Sent,
    Dropped,

    // Shutdown was requested while waiting for room.
    Stopped,
}

/// Pushes one frame into the queue according to `backpressure`.
pub fn enqueue(
    sender: &Sender<RawFrame>, raw: RawFrame, backpressure: Backpressure, stats: &CaptureStats,
    shutdown_flag: &AtomicBool,
) -> Result<Enqueued, CaptureError> {
    match backpressure {
        Backpressure::Drop => match sender.try_send(raw) {
            Ok(()) => Ok(Enqueued::Sent),
            Err(TrySendError::Full(_)) => {
                stats.record_dropped();
                Ok(Enqueued::Dropped)
            },
            Err(TrySendError::Disconnected(_)) => Err(CaptureError::QueueClosed),
        },
        Backpressure::Block => {
            let mut pending = raw;
            loop {
                match sender.send_timeout(pending, SEND_RETRY_INTERVAL) {
                    Ok(()) => return Ok(Enqueued::Sent),
                    Err(SendTimeoutError::Timeout(raw)) => {
                        if shutdown_flag.load(Ordering::Acquire) {
                            return Ok(Enqueued::Stopped);
                        }
                        pending = raw;
                    },
                    Err(SendTimeoutError::Disconnected(_)) => {
                        return Err(CaptureError::QueueClosed);
                    },
                }
            }
        },
    }
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Pcap Library error.")]
    PcapError(pcap::Error),

    #[error("Frame queue was closed by the consumer.")]
    QueueClosed,
}

impl CaptureError {
    pub fn additional_info(&self) -> Option<String> {
        match self {
            CaptureError::PcapError(err) => Some(err.to_string()),
            CaptureError::QueueClosed => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam::channel::bounded;
    use std::str::FromStr;

    fn raw(byte: u8) -> RawFrame {
        RawFrame::new(FrameHeader::default(), vec![byte], false)
    }

    #[test]
    fn test_backpressure_names() {
        assert_eq!(Backpressure::from_str("block").unwrap(), Backpressure::Block);
        assert_eq!(Backpressure::from_str("DROP").unwrap(), Backpressure::Drop);
        assert!(Backpressure::from_str("spill").is_err());
        assert_eq!(Backpressure::Drop.to_string(), "drop");
    }

    #[test]
    fn test_drop_when_full() {
        let (sender, receiver) = bounded(2);
        let stats = CaptureStats::default();
        let shutdown_flag = AtomicBool::new(false);

        let outcomes: Vec<Enqueued> = (0..4)
            .map(|byte| {
                enqueue(&sender, raw(byte), Backpressure::Drop, &stats, &shutdown_flag).unwrap()
            })
            .collect();

        assert_eq!(
            outcomes,
            vec![Enqueued::Sent, Enqueued::Sent, Enqueued::Dropped, Enqueued::Dropped]
        );
        assert_eq!(stats.snapshot().dropped, 2);

        let kept: Vec<u8> = receiver.try_iter().map(|raw| raw.data[0]).collect();
        assert_eq!(kept, vec![0, 1]);
    }

    #[test]
    fn test_block_waits_for_room() {
        let (sender, receiver) = bounded(1);
        let stats = CaptureStats::default();
        let shutdown_flag = AtomicBool::new(false);

        enqueue(&sender, raw(0), Backpressure::Block, &stats, &shutdown_flag).unwrap();

        let consumer = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(150));
            receiver.iter().take(2).map(|raw| raw.data[0]).collect::<Vec<u8>>()
        });

        let outcome = enqueue(&sender, raw(1), Backpressure::Block, &stats, &shutdown_flag);
        assert_eq!(outcome.unwrap(), Enqueued::Sent);
        assert_eq!(consumer.join().unwrap(), vec![0, 1]);
        assert_eq!(stats.snapshot().dropped, 0);
    }

    #[test]
    fn test_block_stops_on_shutdown() {
        let (sender, _receiver) = bounded(1);
        let stats = CaptureStats::default();
        let shutdown_flag = AtomicBool::new(false);

        enqueue(&sender, raw(0), Backpressure::Block, &stats, &shutdown_flag).unwrap();
        shutdown_flag.store(true, Ordering::Release);

        let outcome = enqueue(&sender, raw(1), Backpressure::Block, &stats, &shutdown_flag);
        assert_eq!(outcome.unwrap(), Enqueued::Stopped);
    }

    #[test]
    fn test_closed_queue() {
        let (sender, receiver) = bounded(1);
        drop(receiver);
        let stats = CaptureStats::default();
        let shutdown_flag = AtomicBool::new(false);

        for backpressure in [Backpressure::Block, Backpressure::Drop] {
            let outcome = enqueue(&sender, raw(0), backpressure, &stats, &shutdown_flag);
            assert!(matches!(outcome, Err(CaptureError::QueueClosed)));
        }
    }

    #[test]
    fn test_stats_snapshot() {
        let stats = CaptureStats::default();
        stats.record_received();
        stats.record_received();
        stats.record_processed();
        stats.record_failed();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.received, 2);
        assert_eq!(snapshot.processed, 1);
        assert_eq!(
            snapshot.to_string(),
            "received 2, dropped 0, malformed 0, processed 1, failed 1"
        );
    }
}
