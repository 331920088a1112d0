// Audio output - CPAL stream that renders scheduled sample triggers
// Triggers arrive over a lock-free channel with absolute frame deadlines;
// the callback starts each voice on its exact frame and mixes overlapping
// instances independently.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, FromSample, SampleFormat, SizedSample, Stream, StreamConfig};
use std::sync::Arc;

use crate::audio::clock::StreamClock;
use crate::messaging::channels::TriggerConsumer;
use crate::sampler::loader::SampleBuffer;

/// Audio backend error types
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("no audio output device found")]
    NoDevice,

    #[error("stream configuration error: {0}")]
    Config(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start output stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("unsupported sample format: {0:?}")]
    UnsupportedFormat(SampleFormat),
}

/// One scheduled sample start, produced by the dispatcher and consumed by
/// the audio callback.
///
/// `start_frame` is an absolute frame index on the stream clock; the
/// callback begins playback on exactly that frame.
#[derive(Clone)]
pub struct TriggerCommand {
    pub buffer: Arc<SampleBuffer>,
    pub start_frame: u64,
}

/// A playing (or armed, not-yet-started) sample instance.
struct Voice {
    buffer: Arc<SampleBuffer>,
    start_frame: u64,
    // Fractional read position; buffers keep their source rate and are
    // stepped at source_rate / device_rate.
    position: f64,
    rate_ratio: f64,
}

impl Voice {
    fn new(command: TriggerCommand, device_rate: f64) -> Self {
        let rate_ratio = command.buffer.sample_rate as f64 / device_rate;
        Self {
            buffer: command.buffer,
            start_frame: command.start_frame,
            position: 0.0,
            rate_ratio,
        }
    }

    fn finished(&self) -> bool {
        self.position as usize >= self.buffer.data.len()
    }

    /// Linear-interpolated sample at the current position, then advance.
    fn next_sample(&mut self) -> f32 {
        let index = self.position as usize;
        let data = &self.buffer.data;
        if index >= data.len() {
            return 0.0;
        }
        let frac = (self.position - index as f64) as f32;
        let a = data[index];
        let b = if index + 1 < data.len() { data[index + 1] } else { 0.0 };
        self.position += self.rate_ratio;
        a + (b - a) * frac
    }
}

/// CPAL output engine.
///
/// Owns the stream and the shared [`StreamClock`] the scheduler reads.
/// Dropping the engine stops playback; creation failure is fatal to
/// playback but leaves pattern editing usable.
pub struct AudioOutput {
    _device: Device,
    _stream: Stream,
    clock: StreamClock,
}

impl AudioOutput {
    // Pre-allocated voice slots; a 64-step pattern of triple-stacked chords
    // stays well under this.
    const MAX_VOICES: usize = 64;

    pub fn new(trigger_rx: TriggerConsumer) -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(AudioError::NoDevice)?;

        let supported_config = device.default_output_config()?;
        let sample_format = supported_config.sample_format();
        let sample_rate = supported_config.sample_rate().0 as f64;
        let channels = supported_config.channels() as usize;
        let config: StreamConfig = supported_config.into();

        let clock = StreamClock::new(sample_rate);

        let stream = match sample_format {
            SampleFormat::F32 => {
                Self::build_stream::<f32>(&device, &config, channels, trigger_rx, clock.clone())
            }
            SampleFormat::I16 => {
                Self::build_stream::<i16>(&device, &config, channels, trigger_rx, clock.clone())
            }
            SampleFormat::U16 => {
                Self::build_stream::<u16>(&device, &config, channels, trigger_rx, clock.clone())
            }
            format => return Err(AudioError::UnsupportedFormat(format)),
        }?;

        stream.play()?;

        Ok(Self {
            _device: device,
            _stream: stream,
            clock,
        })
    }

    /// Shared clock handle for the scheduler and dispatcher.
    pub fn clock(&self) -> StreamClock {
        self.clock.clone()
    }

    pub fn sample_rate(&self) -> f64 {
        self.clock.sample_rate()
    }

    fn build_stream<T>(
        device: &Device,
        config: &StreamConfig,
        channels: usize,
        mut trigger_rx: TriggerConsumer,
        clock: StreamClock,
    ) -> Result<Stream, AudioError>
    where
        T: SizedSample + FromSample<f32>,
    {
        use ringbuf::traits::Consumer;

        let device_rate = clock.sample_rate();
        let mut voices: Vec<Voice> = Vec::with_capacity(Self::MAX_VOICES);

        let stream = device.build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                // No allocations or blocking locks in here beyond the
                // pre-reserved voice vec.
                let frames = data.len() / channels;
                let block_start = clock.current_frame();
                let block_end = block_start + frames as u64;

                // Accept newly scheduled triggers. Deadlines beyond this
                // block stay armed in the voice list until their frame.
                while let Some(command) = trigger_rx.try_pop() {
                    if voices.len() < Self::MAX_VOICES {
                        voices.push(Voice::new(command, device_rate));
                    }
                }

                for (i, frame) in data.chunks_mut(channels).enumerate() {
                    let frame_index = block_start + i as u64;
                    let mut mix = 0.0f32;

                    for voice in voices.iter_mut() {
                        if voice.start_frame <= frame_index {
                            mix += voice.next_sample();
                        }
                    }

                    let value = T::from_sample(mix.clamp(-1.0, 1.0));
                    for sample in frame.iter_mut() {
                        *sample = value;
                    }
                }

                voices.retain(|v| v.start_frame >= block_end || !v.finished());

                clock.advance(frames);
            },
            move |err| {
                eprintln!("audio stream error: {err}");
            },
            None,
        )?;

        Ok(stream)
    }
}
