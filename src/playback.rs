//! Blocking playback of a mixed buffer on the default output device.

use std::sync::mpsc;
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use log::{debug, error, warn};

use crate::error::PlaybackError;

/// Extra time allowed for the device to drain before giving up on it.
const DRAIN_GRACE: Duration = Duration::from_secs(2);

/// Play a mono buffer through the default audio output and return once it
/// has been written out. Every device channel receives the same signal.
pub fn play(samples: &[f32], sample_rate: u32) -> Result<(), PlaybackError> {
    let host = cpal::default_host();
    let device = host.default_output_device().ok_or(PlaybackError::NoDevice)?;

    let supported = device.default_output_config()?;
    if supported.sample_rate() != sample_rate {
        warn!(
            "device prefers {} Hz; requesting {} Hz",
            supported.sample_rate(),
            sample_rate
        );
    }
    let mut config: cpal::StreamConfig = supported.into();
    config.sample_rate = sample_rate;
    let channels = (config.channels as usize).max(1);
    debug!("output stream: {} channel(s) at {} Hz", channels, sample_rate);

    let (done_tx, done_rx) = mpsc::channel::<()>();
    let buffer = samples.to_vec();
    let mut pos = 0usize;
    let mut finished = false;

    let stream = device.build_output_stream(
        &config,
        move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
            for frame in data.chunks_mut(channels) {
                let value = buffer.get(pos).copied().unwrap_or(0.0).clamp(-1.0, 1.0);
                frame.fill(value);
                pos += 1;
            }
            if pos >= buffer.len() && !finished {
                finished = true;
                let _ = done_tx.send(());
            }
        },
        move |err| {
            error!("audio stream error: {}", err);
        },
        None,
    )?;

    stream.play()?;

    let expected = Duration::from_secs_f64(samples.len() as f64 / sample_rate.max(1) as f64);
    match done_rx.recv_timeout(expected + DRAIN_GRACE) {
        Ok(()) => {}
        Err(mpsc::RecvTimeoutError::Timeout) => {
            warn!("playback did not finish within {:?}; stopping", expected + DRAIN_GRACE);
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => return Err(PlaybackError::Disconnected),
    }

    // Brief pause so the last buffer reaches the speakers
    std::thread::sleep(Duration::from_millis(100));
    drop(stream);
    Ok(())
}
