use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, error};

use crate::catalog::TrackId;
use crate::config::AudioSettings;
use crate::playback::{PlaybackError, ignore_playback_rejection};

use super::fetch::{Fetched, clamp_volume, seek_target, spawn_fetch};
use super::sink::create_sink_at;
use super::types::{AudioCmd, PlaybackHandle};

/// The source the thread is currently bound to.
///
/// Bytes are downloaded in the background on the first `Play` and kept for
/// seeking; a new `Load` always starts from scratch, even for the same key.
struct BoundSource {
    key: TrackId,
    url: String,
    generation: u64,
    bytes: Option<Arc<[u8]>>,
    fetching: bool,
    play_when_ready: bool,
}

/// Sink plus the bookkeeping needed to report elapsed time.
struct Transport {
    sink: Option<Sink>,
    paused: bool,
    started_at: Option<Instant>,
    accumulated: Duration,
    volume: f32,
}

impl Transport {
    fn elapsed(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed())
    }

    /// Drop the current sink and rewind.
    fn reset(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.paused = true;
        self.started_at = None;
        self.accumulated = Duration::ZERO;
    }

    /// Take over `sink`, positioned at `at`, playing unless `paused`.
    fn install(&mut self, sink: Sink, at: Duration, paused: bool, info: &PlaybackHandle) {
        sink.set_volume(self.volume);
        if paused {
            self.started_at = None;
        } else {
            sink.play();
            self.started_at = Some(Instant::now());
        }
        self.sink = Some(sink);
        self.paused = paused;
        self.accumulated = at;
        if let Ok(mut i) = info.lock() {
            i.elapsed = at;
            i.playing = !paused;
        }
    }

    fn reject(&mut self, err: &PlaybackError, info: &PlaybackHandle) {
        self.paused = true;
        self.started_at = None;
        if let Ok(mut i) = info.lock() {
            i.playing = false;
        }
        ignore_playback_rejection(err);
    }
}

fn start_sink(
    stream: &Result<OutputStream, String>,
    url: &str,
    bytes: Arc<[u8]>,
    start_at: Duration,
) -> Result<Sink, PlaybackError> {
    let stream = stream
        .as_ref()
        .map_err(|e| PlaybackError::NoOutputDevice(e.clone()))?;
    create_sink_at(stream, url, bytes, start_at)
}

fn fade_out_sink(sink: &Sink, from: f32, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(from * (1.0 - t));
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}

pub(super) fn spawn_audio_thread(
    base_url: String,
    rx: Receiver<AudioCmd>,
    playback_info: PlaybackHandle,
    audio_settings: AudioSettings,
) -> JoinHandle<()> {
    thread::spawn(move || {
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        let stream: Result<OutputStream, String> = match OutputStreamBuilder::open_default_stream()
        {
            Ok(mut s) => {
                s.log_on_drop(false);
                Ok(s)
            }
            Err(e) => {
                error!(error = %e, "no audio output device, playback disabled");
                Err(e.to_string())
            }
        };
        // Downloads run on worker threads, so a slow server never blocks this
        // loop; no request timeout is set.
        let client = match reqwest::blocking::Client::builder()
            .timeout(None::<Duration>)
            .build()
        {
            Ok(c) => Some(c),
            Err(e) => {
                error!(error = %e, "failed to build http client for audio fetches");
                None
            }
        };
        let (fetch_tx, fetch_rx) = mpsc::channel::<Fetched>();

        let mut bound: Option<BoundSource> = None;
        let mut generation: u64 = 0;
        let mut transport = Transport {
            sink: None,
            paused: true,
            started_at: None,
            accumulated: Duration::ZERO,
            volume: clamp_volume(audio_settings.volume),
        };

        if let Ok(mut info) = playback_info.lock() {
            info.volume = transport.volume;
        }

        loop {
            while let Ok(fetched) = fetch_rx.try_recv() {
                let Some(b) = bound
                    .as_mut()
                    .filter(|b| b.generation == fetched.generation)
                else {
                    debug!(generation = fetched.generation, "dropping download for a replaced source");
                    continue;
                };
                b.fetching = false;
                match fetched.result {
                    Ok(bytes) => {
                        debug!(key = %b.key, bytes = bytes.len(), "fetched source");
                        b.bytes = Some(bytes.clone());
                        if std::mem::take(&mut b.play_when_ready) {
                            match start_sink(&stream, &b.url, bytes, Duration::ZERO) {
                                Ok(s) => transport.install(s, Duration::ZERO, false, &playback_info),
                                Err(e) => transport.reject(&e, &playback_info),
                            }
                        }
                    }
                    Err(e) => {
                        b.play_when_ready = false;
                        transport.reject(&e, &playback_info);
                    }
                }
            }

            match rx.recv_timeout(Duration::from_millis(50)) {
                Ok(cmd) => match cmd {
                    AudioCmd::Load { key, url } => {
                        transport.reset();
                        generation += 1;

                        if let Ok(mut info) = playback_info.lock() {
                            info.key = Some(key.clone());
                            info.elapsed = Duration::ZERO;
                            info.playing = false;
                        }
                        debug!(%key, %url, generation, "bound source");
                        bound = Some(BoundSource {
                            key,
                            url,
                            generation,
                            bytes: None,
                            fetching: false,
                            play_when_ready: false,
                        });
                    }

                    AudioCmd::Play => {
                        transport.reset();
                        let Some(b) = bound.as_mut() else {
                            transport.reject(&PlaybackError::NoSource, &playback_info);
                            continue;
                        };
                        match b.bytes.clone() {
                            Some(bytes) => match start_sink(&stream, &b.url, bytes, Duration::ZERO) {
                                Ok(s) => transport.install(s, Duration::ZERO, false, &playback_info),
                                Err(e) => transport.reject(&e, &playback_info),
                            },
                            None => {
                                b.play_when_ready = true;
                                if !b.fetching {
                                    b.fetching = true;
                                    spawn_fetch(
                                        client.clone(),
                                        base_url.clone(),
                                        b.url.clone(),
                                        b.generation,
                                        fetch_tx.clone(),
                                    );
                                }
                            }
                        }
                    }

                    AudioCmd::TogglePause => {
                        if let Some(ref s) = transport.sink {
                            if transport.paused {
                                s.play();
                                transport.started_at = Some(Instant::now());
                            } else {
                                s.pause();
                                if let Some(st) = transport.started_at.take() {
                                    transport.accumulated += st.elapsed();
                                }
                            }
                            transport.paused = !transport.paused;
                            if let Ok(mut info) = playback_info.lock() {
                                info.playing = !transport.paused;
                            }
                        }
                    }

                    AudioCmd::SeekBy(secs) => {
                        // Scrubbing: rebuild the current sink and skip into the source.
                        if transport.sink.is_none() {
                            continue;
                        }
                        let Some((url, bytes)) = bound
                            .as_ref()
                            .and_then(|b| b.bytes.clone().map(|bytes| (b.url.clone(), bytes)))
                        else {
                            continue;
                        };

                        let target = seek_target(transport.elapsed(), secs);
                        let paused = transport.paused;
                        if let Some(s) = transport.sink.take() {
                            s.stop();
                        }
                        match start_sink(&stream, &url, bytes, target) {
                            Ok(s) => transport.install(s, target, paused, &playback_info),
                            Err(e) => transport.reject(&e, &playback_info),
                        }
                    }

                    AudioCmd::SetVolume(v) => {
                        transport.volume = clamp_volume(v);
                        if let Some(ref s) = transport.sink {
                            s.set_volume(transport.volume);
                        }
                        if let Ok(mut info) = playback_info.lock() {
                            info.volume = transport.volume;
                        }
                    }

                    AudioCmd::Quit { fade_out_ms } => {
                        if let Some(ref s) = transport.sink {
                            if !transport.paused {
                                // Fade out gently before stopping.
                                fade_out_sink(s, transport.volume, fade_out_ms);
                            }
                            s.stop();
                        }
                        if let Ok(mut info) = playback_info.lock() {
                            info.playing = false;
                        }
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => {
                    let Some(ref s) = transport.sink else {
                        continue;
                    };
                    if transport.paused {
                        continue;
                    }
                    if s.empty() {
                        // Source ran out; stay bound so a seek can still rewind.
                        transport.paused = true;
                        if let Some(st) = transport.started_at.take() {
                            transport.accumulated += st.elapsed();
                        }
                        if let Ok(mut info) = playback_info.lock() {
                            info.playing = false;
                            info.elapsed = transport.accumulated;
                        }
                    } else if let Ok(mut info) = playback_info.lock() {
                        info.elapsed = transport.elapsed();
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}
