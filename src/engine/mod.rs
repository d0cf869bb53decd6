//! Sample-engine abstraction (pluggable implementations).
//!
//! The engine owns decoding, mixing, and audible output; this crate only
//! talks to it through opaque handles. [`SampleEngine`] is the seam: the
//! production backend is `RodioEngine` (feature `rodio-engine`), headless
//! runs use [`NullEngine`], and tests substitute call-recording doubles.
//!
//! Handle contract: `0` is the null handle. A failed [`load_sample`] returns
//! [`SampleHandle::NULL`] and leaves the failure code readable through
//! [`last_error`]; operations on null or stale handles are silent no-ops.
//!
//! [`load_sample`]: SampleEngine::load_sample
//! [`last_error`]: SampleEngine::last_error

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

#[cfg(feature = "rodio-engine")]
pub mod rodio;
#[cfg(feature = "rodio-engine")]
pub use self::rodio::RodioEngine;

/// Opaque identifier of a loaded sample resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SampleHandle(pub u32);

impl SampleHandle {
    /// The null handle, returned by failed loads.
    pub const NULL: SampleHandle = SampleHandle(0);

    /// Whether this is the null handle.
    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

/// Opaque identifier of a live playback channel instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChannelHandle(pub u32);

impl ChannelHandle {
    /// The null handle, returned when no channel instance could be opened.
    pub const NULL: ChannelHandle = ChannelHandle(0);

    /// Whether this is the null handle.
    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

/// Engine-side error code. `0` means ok; any other value is a failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EngineErrorCode(pub i32);

impl EngineErrorCode {
    /// No error.
    pub const OK: EngineErrorCode = EngineErrorCode(0);
    /// The engine is not (or no longer) initialized.
    pub const INIT: EngineErrorCode = EngineErrorCode(1);
    /// The sample file could not be opened.
    pub const FILE_OPEN: EngineErrorCode = EngineErrorCode(2);
    /// The sample file could not be decoded.
    pub const DECODE: EngineErrorCode = EngineErrorCode(3);
    /// No audio output device is available.
    pub const DEVICE: EngineErrorCode = EngineErrorCode(4);

    /// Whether this code signals success.
    pub fn is_ok(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for EngineErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            EngineErrorCode::OK => "ok",
            EngineErrorCode::INIT => "engine not initialized",
            EngineErrorCode::FILE_OPEN => "file open failed",
            EngineErrorCode::DECODE => "decode failed",
            EngineErrorCode::DEVICE => "output device unavailable",
            EngineErrorCode(code) => return write!(f, "engine error {code}"),
        };
        write!(f, "{} ({})", name, self.0)
    }
}

/// External sample engine consumed by [`SampleChannel`](crate::SampleChannel).
///
/// All calls are synchronous and bounded; none of them block on audio
/// progress. Implementations must tolerate null and stale handles.
pub trait SampleEngine: Send + Sync {
    /// Load the sample at `path`, allowing up to `polyphony` overlapping
    /// playbacks. Returns [`SampleHandle::NULL`] on failure, in which case
    /// [`last_error`](Self::last_error) reports the cause.
    fn load_sample(&self, path: &str, polyphony: u32) -> SampleHandle;

    /// Open a fresh playback channel instance for a loaded sample.
    /// Returns [`ChannelHandle::NULL`] if the sample is unknown or no
    /// instance could be opened.
    fn sample_channel(&self, sample: SampleHandle) -> ChannelHandle;

    /// Set the volume of a channel instance (linear, 0.0 = silent).
    fn set_channel_volume(&self, channel: ChannelHandle, volume: f32);

    /// Start a channel instance. Fire-and-forget.
    fn play_channel(&self, channel: ChannelHandle);

    /// Release a loaded sample and stop any channels spawned from it.
    fn free_sample(&self, sample: SampleHandle);

    /// Code of the most recent failure, [`EngineErrorCode::OK`] otherwise.
    fn last_error(&self) -> EngineErrorCode;
}

/// Engine that accepts every request and produces no audio.
///
/// Useful for headless runs, CI, and dedicated servers: sample channels go
/// through their full lifecycle without an output device being present.
#[derive(Debug, Default)]
pub struct NullEngine {
    next_handle: AtomicU32,
}

impl NullEngine {
    /// Create a silent engine.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SampleEngine for NullEngine {
    fn load_sample(&self, _path: &str, _polyphony: u32) -> SampleHandle {
        SampleHandle(self.next_handle.fetch_add(1, Ordering::Relaxed) + 1)
    }

    fn sample_channel(&self, sample: SampleHandle) -> ChannelHandle {
        if sample.is_null() {
            return ChannelHandle::NULL;
        }
        ChannelHandle(self.next_handle.fetch_add(1, Ordering::Relaxed) + 1)
    }

    fn set_channel_volume(&self, _channel: ChannelHandle, _volume: f32) {}

    fn play_channel(&self, _channel: ChannelHandle) {}

    fn free_sample(&self, _sample: SampleHandle) {}

    fn last_error(&self) -> EngineErrorCode {
        EngineErrorCode::OK
    }
}
