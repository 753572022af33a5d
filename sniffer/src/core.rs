use crate::capture::{CaptureHandler, CaptureStats};
use crate::config::Config;
use crate::net::interface::{self, InterfaceError};
use chrono::Utc;
use common::storage::{CaptureMetadata, StorageError, StorageManager};
use crossbeam::channel::{Receiver, RecvTimeoutError, bounded};
use dpi::classifier::FrameClassifier;
use dpi::filter::FrameFilter;
use dpi::frame::{Frame, RawFrame};
use dpi::parser::FrameParser;
use dpi::pipeline::Pipeline;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;
use thiserror::Error;

const RECV_TIMEOUT: Duration = Duration::from_millis(100);

/// Lists interfaces when none is configured, otherwise captures until shutdown.
pub fn start(config: Config, shutdown_flag: Arc<AtomicBool>) -> Result<(), CoreError> {
    let Some(interface_name) = config.interface.clone() else {
        return list_interfaces();
    };

    let device = interface::get_network_interface(&interface_name)?;
    let capture = interface::get_capture(device, &config)?;
    log::info!("Opened {interface_name}.");

    let (sender, receiver) = bounded::<RawFrame>(config.queue_capacity);
    let stats = Arc::new(CaptureStats::default());

    let handler = CaptureHandler::new(
        capture,
        sender,
        config.backpressure,
        Arc::clone(&stats),
        Arc::clone(&shutdown_flag),
    );
    let producer_shutdown_flag = Arc::clone(&shutdown_flag);
    let producer = thread::spawn(move || {
        if let Err(err) = handler.start() {
            log::error!(
                "Capture stopped. {err} {}",
                err.additional_info().unwrap_or_default()
            );
            producer_shutdown_flag.store(true, Ordering::Release);
        }
    });

    let mut consumer = Consumer::new(&config);
    let start_time = Utc::now();
    consumer.run(&receiver, &shutdown_flag, &stats);
    let end_time = Utc::now();
    drop(receiver);

    if let Err(err) = producer.join() {
        log::error!("Failed to join capture thread handle: {:?}", err);
    }
    log::info!("Capture finished: {}.", stats.snapshot());

    if config.save_capture {
        let metadata = CaptureMetadata {
            interface: interface_name,
            start_time: Some(start_time),
            end_time: Some(end_time),
            description: config.capture_description.clone(),
            ..Default::default()
        };
        save(consumer.frames(), metadata)?;
    }

    Ok(())
}

fn list_interfaces() -> Result<(), CoreError> {
    let interfaces = interface::sorted()?;
    if interfaces.is_empty() {
        log::warn!("No capture interfaces found.");
    }

    log::info!("No interface configured. Available interfaces:");
    for device in &interfaces {
        let addresses: Vec<String> = device
            .addresses
            .iter()
            .map(|address| address.addr.to_string())
            .collect();
        log::info!(
            "    {} ({}) [{}]",
            interface::get_network_interface_name(device),
            device.desc.as_deref().unwrap_or("no description"),
            addresses.join(", ")
        );
    }

    Ok(())
}

fn save(frames: &[Frame], metadata: CaptureMetadata) -> Result<(), CoreError> {
    if frames.is_empty() {
        log::warn!("No frames matched, nothing to save.");
        return Ok(());
    }

    let storage = StorageManager::from_project_dirs()?;
    let metadata = storage.save(frames, metadata)?;
    log::info!(
        "Saved {} frames to {}.",
        metadata.frame_count,
        storage.directory().join(&metadata.file_name).display()
    );

    Ok(())
}

/// Consumer side: dissects queued frames, filters and reports them.
pub struct Consumer {
    parser: FrameParser,
    filter: FrameFilter,

    // Zero when the session is not saved.
    frame_limit: usize,
    frames: Vec<Frame>,
}

impl Consumer {
    pub fn new(config: &Config) -> Self {
        let classifier = FrameClassifier::new(config.ambiguous_as_ethernet);
        let pipeline = Pipeline::new(config.stages.iter().copied());

        Self {
            parser: FrameParser::new(classifier, pipeline),
            filter: config.filter.clone(),
            frame_limit: if config.save_capture { config.max_saved_frames } else { 0 },
            frames: Vec::new(),
        }
    }

    /// Runs until the producer hangs up, or until shutdown once the queue is drained.
    pub fn run(
        &mut self, receiver: &Receiver<RawFrame>, shutdown_flag: &AtomicBool, stats: &CaptureStats,
    ) {
        loop {
            match receiver.recv_timeout(RECV_TIMEOUT) {
                Ok(raw) => self.handle(raw, stats),
                Err(RecvTimeoutError::Timeout) => {},
                Err(RecvTimeoutError::Disconnected) => break,
            }

            if shutdown_flag.load(Ordering::Acquire) {
                for raw in receiver.try_iter() {
                    self.handle(raw, stats);
                }
                log::info!("Shutting down analysis loop.");
                break;
            }
        }
    }

    pub fn handle(&mut self, raw: RawFrame, stats: &CaptureStats) {
        let frame = match self.parser.process(raw) {
            Ok(frame) => frame,
            Err(err) => {
                stats.record_failed();
                log::error!("Frame dissection failed. {err}");
                return;
            },
        };
        stats.record_processed();

        if !self.filter.matches(&frame) {
            return;
        }

        report(&frame);
        if self.frames.len() < self.frame_limit {
            self.frames.push(frame);
            if self.frames.len() == self.frame_limit {
                log::warn!(
                    "Holding {} frames for saving, later matches are not kept.",
                    self.frame_limit
                );
            }
        }
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }
}

fn report(frame: &Frame) {
    let annotations = &frame.annotations;
    let summary = annotations.summary.as_deref().unwrap_or("(no summary)");
    log::info!("#{} {summary}", frame.sequence());

    if let Some(context) = &annotations.context {
        log::debug!("#{} {context}", frame.sequence());
    }
    if let Some(warning) = annotations
        .security
        .as_ref()
        .and_then(|advisory| advisory.warning.as_ref())
    {
        log::debug!("#{} {warning}", frame.sequence());
    }
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Interface error.")]
    InterfaceError(#[from] InterfaceError),

    #[error("Storage error.")]
    StorageError(#[from] StorageError),
}

impl CoreError {
    pub fn additional_info(&self) -> Option<String> {
        match self {
            CoreError::InterfaceError(err) => err.additional_info(),
            CoreError::StorageError(err) => err.additional_info(),
        }
    }
}
