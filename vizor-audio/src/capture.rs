//! Audio capture - cpal input stream driving a capability interface

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat, SizedSample, StreamConfig};
use parking_lot::Mutex;
use thiserror::Error;
use tracing::{error, info};

/// Capability interface to the audio collaborator.
pub trait CaptureSink: Send + 'static {
    /// Runs before the stream starts. Returning false cancels the capture.
    fn on_start(&mut self) -> bool;
    /// Runs once per delivered PCM chunk. Returning false stops the
    /// capture.
    fn on_samples(&mut self, samples: &[i16]) -> bool;
    /// Runs after the stream is torn down.
    fn on_stop(&mut self);
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no audio input device available")]
    NoDevice,
    #[error("failed to query input config: {0}")]
    Config(#[from] cpal::DefaultStreamConfigError),
    #[error("unsupported sample format {0:?}")]
    Format(SampleFormat),
    #[error("failed to build input stream: {0}")]
    Build(#[from] cpal::BuildStreamError),
    #[error("failed to start input stream: {0}")]
    Play(#[from] cpal::PlayStreamError),
    #[error("capture cancelled by sink")]
    Cancelled,
}

/// Capture from the default input device until `shutdown` is set or the
/// sink stops the stream. Blocks the calling thread; spawn it.
///
/// A missing input device is fatal - the pipeline cannot run without an
/// audio source.
pub fn run<S: CaptureSink>(mut sink: S, shutdown: Arc<AtomicBool>) -> Result<(), CaptureError> {
    let host = cpal::default_host();
    let device = host.default_input_device().ok_or(CaptureError::NoDevice)?;
    let supported = device.default_input_config()?;
    let config: StreamConfig = supported.config();

    info!(
        device = %device.name().unwrap_or_else(|_| "unknown".into()),
        rate = config.sample_rate.0,
        channels = config.channels,
        "opening capture stream"
    );

    if !sink.on_start() {
        return Err(CaptureError::Cancelled);
    }

    let stopped = Arc::new(AtomicBool::new(false));
    let sink = Arc::new(Mutex::new(sink));

    let stream = match supported.sample_format() {
        SampleFormat::I16 => build_stream::<i16, S>(&device, &config, &sink, &stopped),
        SampleFormat::U16 => build_stream::<u16, S>(&device, &config, &sink, &stopped),
        SampleFormat::F32 => build_stream::<f32, S>(&device, &config, &sink, &stopped),
        other => Err(CaptureError::Format(other)),
    }?;
    stream.play()?;

    while !shutdown.load(Ordering::Relaxed) && !stopped.load(Ordering::Relaxed) {
        thread::sleep(Duration::from_millis(10));
    }

    drop(stream);
    sink.lock().on_stop();
    Ok(())
}

fn build_stream<T, S>(
    device: &cpal::Device,
    config: &StreamConfig,
    sink: &Arc<Mutex<S>>,
    stopped: &Arc<AtomicBool>,
) -> Result<cpal::Stream, CaptureError>
where
    T: SizedSample,
    i16: FromSample<T>,
    S: CaptureSink,
{
    // Scratch for sample-format conversion, sized for typical device
    // buffers; grows only on the rare larger chunk.
    let mut scratch: Vec<i16> = Vec::with_capacity(8192);
    let sink = sink.clone();
    let stop_flag = stopped.clone();

    let stream = device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            if stop_flag.load(Ordering::Relaxed) {
                return;
            }
            scratch.clear();
            scratch.extend(data.iter().map(|&s| i16::from_sample(s)));
            // Never block the audio thread: a chunk arriving while the
            // sink is held elsewhere (teardown) is dropped.
            if let Some(mut sink) = sink.try_lock() {
                if !sink.on_samples(&scratch) {
                    stop_flag.store(true, Ordering::Relaxed);
                }
            }
        },
        |err| {
            error!(%err, "input stream error");
        },
        None,
    )?;
    Ok(stream)
}
