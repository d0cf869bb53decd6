//! rodio-backed sample engine.
//!
//! Decoding, mixing, and device output are delegated to rodio. The output
//! stream is not `Send`, so the engine owns a dedicated worker thread that
//! holds the stream plus the sample/channel tables; trait calls cross to it
//! over an mpsc channel. `load_sample` and `sample_channel` are synchronous
//! request/reply round-trips, the remaining calls are fire-and-forget.
//! Dropping the engine signals the worker and joins it.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::sync::mpsc::{self, Receiver, Sender, SyncSender};
use std::thread::JoinHandle;

use bevy::prelude::warn;
use parking_lot::Mutex;
use rodio::source::Buffered;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

use super::{ChannelHandle, EngineErrorCode, SampleEngine, SampleHandle};
use crate::error::{BandStageError, Result};

/// Decoded source kept per sample. `Buffered` defers decoding to the first
/// playback and lets every channel instance share the cached frames.
type SampleSource = Buffered<Decoder<BufReader<File>>>;

type LoadReply = SyncSender<std::result::Result<SampleHandle, EngineErrorCode>>;

enum Command {
    Load {
        path: String,
        polyphony: u32,
        reply: LoadReply,
    },
    Channel {
        sample: SampleHandle,
        reply: SyncSender<ChannelHandle>,
    },
    SetVolume {
        channel: ChannelHandle,
        volume: f32,
    },
    Play {
        channel: ChannelHandle,
    },
    Free {
        sample: SampleHandle,
    },
    Shutdown,
}

/// Sample engine delegating to rodio on a dedicated audio thread.
///
/// ```no_run
/// use std::sync::Arc;
/// use bevy_bandstage::{RodioEngine, SfxBank, SfxKind};
///
/// let engine = Arc::new(RodioEngine::new().expect("audio output"));
/// let mut bank = SfxBank::new(engine);
/// bank.register(SfxKind::NoteMiss, "assets/sfx/miss.ogg", 4);
/// ```
pub struct RodioEngine {
    commands: Sender<Command>,
    last_error: Mutex<EngineErrorCode>,
    worker: Option<JoinHandle<()>>,
}

impl RodioEngine {
    /// Create the engine and start its worker thread.
    ///
    /// Fails if the thread cannot be spawned or no audio output device is
    /// available.
    pub fn new() -> Result<Self> {
        let (commands, receiver) = mpsc::channel();
        let (ready, readiness) = mpsc::sync_channel(1);

        let worker = std::thread::Builder::new()
            .name("bandstage-audio".into())
            .spawn(move || run_worker(receiver, ready))
            .map_err(|e| BandStageError::engine(format!("failed to spawn audio thread: {e}")))?;

        match readiness.recv() {
            Ok(Ok(())) => Ok(Self {
                commands,
                last_error: Mutex::new(EngineErrorCode::OK),
                worker: Some(worker),
            }),
            Ok(Err(reason)) => {
                let _ = worker.join();
                Err(BandStageError::engine(reason))
            }
            Err(_) => {
                let _ = worker.join();
                Err(BandStageError::engine(
                    "audio thread exited before reporting readiness",
                ))
            }
        }
    }

    fn fail(&self, code: EngineErrorCode) {
        *self.last_error.lock() = code;
    }
}

impl SampleEngine for RodioEngine {
    fn load_sample(&self, path: &str, polyphony: u32) -> SampleHandle {
        let (reply, response) = mpsc::sync_channel(1);
        let command = Command::Load {
            path: path.to_owned(),
            polyphony,
            reply,
        };
        if self.commands.send(command).is_err() {
            self.fail(EngineErrorCode::INIT);
            return SampleHandle::NULL;
        }
        match response.recv() {
            Ok(Ok(handle)) => handle,
            Ok(Err(code)) => {
                self.fail(code);
                SampleHandle::NULL
            }
            Err(_) => {
                self.fail(EngineErrorCode::DEVICE);
                SampleHandle::NULL
            }
        }
    }

    fn sample_channel(&self, sample: SampleHandle) -> ChannelHandle {
        if sample.is_null() {
            return ChannelHandle::NULL;
        }
        let (reply, response) = mpsc::sync_channel(1);
        if self
            .commands
            .send(Command::Channel { sample, reply })
            .is_err()
        {
            return ChannelHandle::NULL;
        }
        response.recv().unwrap_or(ChannelHandle::NULL)
    }

    fn set_channel_volume(&self, channel: ChannelHandle, volume: f32) {
        if channel.is_null() {
            return;
        }
        let _ = self.commands.send(Command::SetVolume { channel, volume });
    }

    fn play_channel(&self, channel: ChannelHandle) {
        if channel.is_null() {
            return;
        }
        let _ = self.commands.send(Command::Play { channel });
    }

    fn free_sample(&self, sample: SampleHandle) {
        if sample.is_null() {
            return;
        }
        let _ = self.commands.send(Command::Free { sample });
    }

    fn last_error(&self) -> EngineErrorCode {
        *self.last_error.lock()
    }
}

impl Drop for RodioEngine {
    fn drop(&mut self) {
        let _ = self.commands.send(Command::Shutdown);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

struct LoadedSample {
    source: SampleSource,
    polyphony: usize,
    /// Channel ids spawned from this sample, oldest first.
    live: Vec<u32>,
}

fn run_worker(commands: Receiver<Command>, ready: SyncSender<std::result::Result<(), String>>) {
    let (stream, handle) = match OutputStream::try_default() {
        Ok(pair) => pair,
        Err(err) => {
            let _ = ready.send(Err(format!("no audio output device: {err}")));
            return;
        }
    };
    // Keep the stream alive for as long as the worker runs.
    let _stream = stream;
    let _ = ready.send(Ok(()));

    let mut samples: HashMap<u32, LoadedSample> = HashMap::new();
    let mut sinks: HashMap<u32, Sink> = HashMap::new();
    let mut next_sample: u32 = 0;
    let mut next_channel: u32 = 0;

    while let Ok(command) = commands.recv() {
        prune_finished(&mut samples, &mut sinks);

        match command {
            Command::Load {
                path,
                polyphony,
                reply,
            } => {
                let result = decode_sample(&path).map(|source| {
                    next_sample += 1;
                    samples.insert(
                        next_sample,
                        LoadedSample {
                            source,
                            polyphony: polyphony.max(1) as usize,
                            live: Vec::new(),
                        },
                    );
                    SampleHandle(next_sample)
                });
                let _ = reply.send(result);
            }
            Command::Channel { sample, reply } => {
                let channel =
                    open_channel(&handle, &mut samples, &mut sinks, &mut next_channel, sample);
                let _ = reply.send(channel);
            }
            Command::SetVolume { channel, volume } => {
                if let Some(sink) = sinks.get(&channel.0) {
                    sink.set_volume(volume.max(0.0));
                }
            }
            Command::Play { channel } => {
                if let Some(sink) = sinks.get(&channel.0) {
                    sink.play();
                }
            }
            Command::Free { sample } => {
                if let Some(loaded) = samples.remove(&sample.0) {
                    for id in loaded.live {
                        sinks.remove(&id);
                    }
                }
            }
            Command::Shutdown => break,
        }
    }
}

fn decode_sample(path: &str) -> std::result::Result<SampleSource, EngineErrorCode> {
    let file = File::open(path).map_err(|_| EngineErrorCode::FILE_OPEN)?;
    let decoder = Decoder::new(BufReader::new(file)).map_err(|_| EngineErrorCode::DECODE)?;
    Ok(decoder.buffered())
}

/// Drop sinks that finished playing and forget their channel ids.
fn prune_finished(samples: &mut HashMap<u32, LoadedSample>, sinks: &mut HashMap<u32, Sink>) {
    sinks.retain(|_, sink| !sink.empty());
    for loaded in samples.values_mut() {
        loaded.live.retain(|id| sinks.contains_key(id));
    }
}

fn open_channel(
    handle: &OutputStreamHandle,
    samples: &mut HashMap<u32, LoadedSample>,
    sinks: &mut HashMap<u32, Sink>,
    next_channel: &mut u32,
    sample: SampleHandle,
) -> ChannelHandle {
    let Some(loaded) = samples.get_mut(&sample.0) else {
        return ChannelHandle::NULL;
    };

    // Steal the oldest instance once the polyphony cap is reached.
    while loaded.live.len() >= loaded.polyphony {
        let oldest = loaded.live.remove(0);
        sinks.remove(&oldest);
    }

    let sink = match Sink::try_new(handle) {
        Ok(sink) => sink,
        Err(err) => {
            warn!("failed to open playback channel: {err}");
            return ChannelHandle::NULL;
        }
    };
    // Queue the source paused; Play starts it.
    sink.pause();
    sink.append(loaded.source.clone());

    *next_channel += 1;
    loaded.live.push(*next_channel);
    sinks.insert(*next_channel, sink);
    ChannelHandle(*next_channel)
}
