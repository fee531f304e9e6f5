use crate::types::AudioData;
use anyhow::{ensure, Context, Result};
use std::path::Path;
use symphonia::core::audio::{AudioBufferRef, Signal};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Decode the `[start, end)` window of an audio file to mono f32 samples.
///
/// The stream is decoded sequentially from the beginning with samples
/// outside the window discarded; decoding stops as soon as the window end is
/// reached. Each call is self-contained, so per-window reads for different
/// slides never share decoder state.
pub fn decode_window<P: AsRef<Path>>(path: P, start: f64, end: f64) -> Result<AudioData> {
    let path = path.as_ref();
    ensure!(end > start, "window end must be greater than start");
    ensure!(start >= 0.0, "window start must be non-negative");

    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open audio file: {}", path.display()))?;

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(extension) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(extension);
    }

    let probe_result = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .context("failed to probe audio format")?;

    let mut format = probe_result.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .context("no audio tracks found in file")?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .context("sample rate not specified in audio file")?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .context("failed to create decoder")?;

    let start_sample = (start * sample_rate as f64).floor().max(0.0) as u64;
    let end_sample = (end * sample_rate as f64).ceil() as u64;

    let mut window_samples = Vec::new();
    // Absolute mono-sample position of the next decoded frame.
    let mut position: u64 = 0;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(err))
                if err.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(err) => return Err(err).context("failed to read packet"),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = decoder
            .decode(&packet)
            .context("failed to decode audio packet")?;

        let mono = convert_to_mono_f32(&decoded);
        let packet_len = mono.len() as u64;
        let packet_end = position + packet_len;

        if packet_end > start_sample && position < end_sample {
            let from = start_sample.saturating_sub(position) as usize;
            let to = (end_sample.min(packet_end) - position) as usize;
            window_samples.extend_from_slice(&mono[from..to]);
        }

        position = packet_end;
        if position >= end_sample {
            break;
        }
    }

    Ok(AudioData {
        samples: window_samples,
        sample_rate,
    })
}

/// Convert any audio buffer format to mono f32 samples in [-1.0, 1.0].
///
/// Multi-channel audio is mixed down by averaging across channels.
fn convert_to_mono_f32(buffer: &AudioBufferRef) -> Vec<f32> {
    let spec = buffer.spec();
    let num_channels = spec.channels.count();
    let frames = buffer.frames();

    let mut mono_samples = Vec::with_capacity(frames);

    // Per-format conversion: scale integer formats into [-1, 1], shift the
    // unsigned ones to be zero-centred.
    macro_rules! mixdown {
        ($buf:expr, $convert:expr) => {{
            let buf = $buf;
            let convert = $convert;
            if num_channels == 1 {
                mono_samples.extend(buf.chan(0).iter().map(|&s| convert(s)));
            } else {
                for i in 0..frames {
                    let mut sum = 0.0f32;
                    for ch in 0..num_channels {
                        sum += convert(buf.chan(ch)[i]);
                    }
                    mono_samples.push(sum / num_channels as f32);
                }
            }
        }};
    }

    match buffer {
        AudioBufferRef::U8(buf) => mixdown!(buf, |s: u8| s as f32 / 128.0 - 1.0),
        AudioBufferRef::U16(buf) => mixdown!(buf, |s: u16| s as f32 / 32768.0 - 1.0),
        AudioBufferRef::U24(buf) => mixdown!(buf, |s: symphonia::core::sample::u24| {
            s.inner() as f32 / 8388608.0 - 1.0
        }),
        AudioBufferRef::U32(buf) => mixdown!(buf, |s: u32| s as f32 / 2147483648.0 - 1.0),
        AudioBufferRef::S8(buf) => mixdown!(buf, |s: i8| s as f32 / 128.0),
        AudioBufferRef::S16(buf) => mixdown!(buf, |s: i16| s as f32 / 32768.0),
        AudioBufferRef::S24(buf) => mixdown!(buf, |s: symphonia::core::sample::i24| {
            s.inner() as f32 / 8388608.0
        }),
        AudioBufferRef::S32(buf) => mixdown!(buf, |s: i32| s as f32 / 2147483648.0),
        AudioBufferRef::F32(buf) => mixdown!(buf, |s: f32| s),
        AudioBufferRef::F64(buf) => mixdown!(buf, |s: f64| s as f32),
    }

    mono_samples
}
