// ABOUTME: Media capture controller with an explicit recorder state machine
// ABOUTME: Collects binary fragments in arrival order and finalizes a webm blob
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Overload Progress

//! Capture controller for workout video recording.
//!
//! The platform camera sits behind the [`CaptureDevice`] / [`CaptureStream`]
//! seam, so the recorder state machine is fully testable with a synthetic
//! device. Fragment order is significant: the finished blob is the exact
//! concatenation of fragments in arrival order.
//!
//! Hardware release is mandatory on every exit path. [`Recorder::stop`]
//! releases the stream's tracks, and [`Recorder`]'s `Drop` impl covers
//! abnormal teardown so the camera never stays open past the controller's
//! lifetime.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use tracing::{debug, warn};

use crate::errors::{AppResult, ClientError};

/// Declared media type of a finished recording.
pub const WEBM_MIME: &str = "video/webm";

/// Live capture stream handle.
///
/// Implementations must make `stop_tracks` idempotent; the recorder calls it
/// on explicit stop and again from `Drop` as a safety net.
pub trait CaptureStream: Send {
    /// Stop every underlying hardware track, releasing the device.
    fn stop_tracks(&mut self);

    /// Whether the stream still holds live tracks.
    fn is_live(&self) -> bool;
}

/// Platform seam that grants access to a camera/microphone stream.
pub trait CaptureDevice: Send + Sync {
    /// Request a live audio/video stream.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::CaptureUnavailable`] if the platform denies or
    /// lacks the capability.
    fn open(&self) -> AppResult<Box<dyn CaptureStream>>;
}

/// Recorder lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    /// No session has been started
    Idle,
    /// A session is active and fragments are being collected
    Recording,
    /// The last session was finalized into a blob
    Stopped,
}

/// Finished media object assembled from recorded fragments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaBlob {
    /// Raw media bytes
    pub data: Bytes,
    /// Declared container MIME type
    pub mime: String,
}

impl MediaBlob {
    /// Byte length of the media payload.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the recording produced no data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Capture controller driving one record-to-stop session at a time.
pub struct Recorder {
    device: Arc<dyn CaptureDevice>,
    state: RecorderState,
    chunks: Vec<Bytes>,
    stream: Option<Box<dyn CaptureStream>>,
    last_blob: Option<MediaBlob>,
}

impl Recorder {
    /// Create a recorder bound to a capture device.
    #[must_use]
    pub fn new(device: Arc<dyn CaptureDevice>) -> Self {
        Self {
            device,
            state: RecorderState::Idle,
            chunks: Vec::new(),
            stream: None,
            last_blob: None,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> RecorderState {
        self.state
    }

    /// Begin a new capture session.
    ///
    /// Starting discards the previous session's blob and fragments. Exactly
    /// one hardware session is open per recorder; starting while already
    /// recording is an error rather than a silent restart.
    ///
    /// # Errors
    ///
    /// [`ClientError::AlreadyRecording`] if a session is active, or
    /// [`ClientError::CaptureUnavailable`] if the device cannot be opened.
    pub fn start(&mut self) -> AppResult<()> {
        if self.state == RecorderState::Recording {
            return Err(ClientError::AlreadyRecording);
        }

        // Previous session's hardware must be gone before a new stream opens.
        self.release_stream();
        self.chunks.clear();
        self.last_blob = None;

        let stream = self.device.open()?;
        self.stream = Some(stream);
        self.state = RecorderState::Recording;
        debug!("capture session started");
        Ok(())
    }

    /// Append a fragment emitted by the underlying recorder.
    ///
    /// Fragments arriving outside a recording session are dropped; the
    /// platform can emit a trailing data event after stop.
    pub fn push_fragment(&mut self, fragment: Bytes) {
        if self.state != RecorderState::Recording {
            warn!(
                len = fragment.len(),
                state = ?self.state,
                "dropping fragment outside recording session"
            );
            return;
        }
        self.chunks.push(fragment);
    }

    /// Finalize the session into a single blob and release the hardware.
    ///
    /// Idempotent: calling `stop` when already stopped returns the existing
    /// blob without touching the (already released) tracks. Returns `None` if
    /// no session was ever started.
    pub fn stop(&mut self) -> Option<MediaBlob> {
        match self.state {
            RecorderState::Recording => {
                let blob = assemble_blob(&self.chunks);
                self.release_stream();
                self.state = RecorderState::Stopped;
                debug!(bytes = blob.len(), "capture session finalized");
                self.last_blob = Some(blob.clone());
                Some(blob)
            }
            RecorderState::Stopped => self.last_blob.clone(),
            RecorderState::Idle => None,
        }
    }

    /// Blob produced by the last finalized session, if any.
    #[must_use]
    pub fn last_blob(&self) -> Option<&MediaBlob> {
        self.last_blob.as_ref()
    }

    fn release_stream(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop_tracks();
        }
    }
}

impl Drop for Recorder {
    fn drop(&mut self) {
        // Teardown path: never leave the camera running.
        self.release_stream();
    }
}

fn assemble_blob(chunks: &[Bytes]) -> MediaBlob {
    let mut data = BytesMut::with_capacity(chunks.iter().map(Bytes::len).sum());
    for chunk in chunks {
        data.extend_from_slice(chunk);
    }
    MediaBlob {
        data: data.freeze(),
        mime: WEBM_MIME.to_owned(),
    }
}

/// Synthetic capture device for tests and the CLI.
///
/// Tracks how many streams are currently live so callers can assert the
/// recorder released the hardware.
#[derive(Debug)]
pub struct SyntheticCamera {
    available: bool,
    live_streams: Arc<AtomicUsize>,
}

impl SyntheticCamera {
    /// A camera the platform grants access to.
    #[must_use]
    pub fn new() -> Self {
        Self {
            available: true,
            live_streams: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A camera the platform denies access to.
    #[must_use]
    pub fn denied() -> Self {
        Self {
            available: false,
            live_streams: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of streams opened from this device that were never stopped.
    #[must_use]
    pub fn live_stream_count(&self) -> usize {
        self.live_streams.load(Ordering::SeqCst)
    }
}

impl Default for SyntheticCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureDevice for SyntheticCamera {
    fn open(&self) -> AppResult<Box<dyn CaptureStream>> {
        if !self.available {
            return Err(ClientError::CaptureUnavailable {
                reason: "permission denied".into(),
            });
        }
        self.live_streams.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(SyntheticStream {
            live: true,
            live_streams: Arc::clone(&self.live_streams),
        }))
    }
}

struct SyntheticStream {
    live: bool,
    live_streams: Arc<AtomicUsize>,
}

impl CaptureStream for SyntheticStream {
    fn stop_tracks(&mut self) {
        if self.live {
            self.live = false;
            self.live_streams.fetch_sub(1, Ordering::SeqCst);
        }
    }

    fn is_live(&self) -> bool {
        self.live
    }
}
