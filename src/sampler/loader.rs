// Sample loading - decodes audio files into mono f32 buffers
// WAV via hound, FLAC via claxon, MP3/OGG via symphonia

use std::path::Path;

use claxon::FlacReader;
use hound::WavReader;
use symphonia::core::audio::{SampleBuffer as InterleavedBuffer, SignalSpec};
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Sample decoding error types
#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("no decodable audio track in {0}")]
    NoTrack(String),

    #[error("WAV decode error: {0}")]
    Wav(#[from] hound::Error),

    #[error("FLAC decode error: {0}")]
    Flac(#[from] claxon::Error),

    #[error("decode error: {0}")]
    Codec(#[from] symphonia::core::errors::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One decoded audio sample, ready for the output mixer.
///
/// Data is mono f32 in [-1, 1]; multi-channel sources are averaged down at
/// load time so the trigger path never has to care about channel layout.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    pub name: String,
    pub data: Vec<f32>,
    pub sample_rate: u32,
}

impl SampleBuffer {
    /// Duration of the buffer in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.data.len() as f64 / self.sample_rate as f64
    }
}

/// Decode a sample file, dispatching on its extension.
pub fn load_sample(path: &Path) -> Result<SampleBuffer, SampleError> {
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "wav" => load_wav(path),
        "flac" => load_flac(path),
        "mp3" | "ogg" => load_compressed(path),
        other => Err(SampleError::UnsupportedFormat(other.to_string())),
    }
}

fn file_stem_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

fn load_wav(path: &Path) -> Result<SampleBuffer, SampleError> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let channels = spec.channels as usize;

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<Vec<_>, _>>()?,
        hound::SampleFormat::Int => {
            let full_scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / full_scale))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    Ok(SampleBuffer {
        name: file_stem_name(path),
        data: downmix_to_mono(&interleaved, channels),
        sample_rate: spec.sample_rate,
    })
}

fn load_flac(path: &Path) -> Result<SampleBuffer, SampleError> {
    let mut reader = FlacReader::open(path)?;
    let info = reader.streaminfo();
    let full_scale = (1i64 << (info.bits_per_sample - 1)) as f32;
    let channels = info.channels as usize;

    let interleaved: Vec<f32> = reader
        .samples()
        .map(|s| s.map(|v| v as f32 / full_scale))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SampleBuffer {
        name: file_stem_name(path),
        data: downmix_to_mono(&interleaved, channels),
        sample_rate: info.sample_rate,
    })
}

fn load_compressed(path: &Path) -> Result<SampleBuffer, SampleError> {
    let file = std::fs::File::open(path)?;
    let stream = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|s| s.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe().format(
        &hint,
        stream,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;
    let mut format = probed.format;

    let track = format
        .default_track()
        .ok_or_else(|| SampleError::NoTrack(file_stem_name(path)))?;
    let track_id = track.id;
    let sample_rate = track.codec_params.sample_rate.unwrap_or(44100);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())?;

    let mut data = Vec::new();
    let mut interleaved: Option<InterleavedBuffer<f32>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(e.into()),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = decoder.decode(&packet)?;
        let spec: SignalSpec = *decoded.spec();
        let channels = spec.channels.count();

        let buf = interleaved
            .get_or_insert_with(|| InterleavedBuffer::new(decoded.capacity() as u64, spec));
        buf.copy_interleaved_ref(decoded);

        for frame in buf.samples().chunks(channels) {
            data.push(frame.iter().sum::<f32>() / channels as f32);
        }
    }

    Ok(SampleBuffer {
        name: file_stem_name(path),
        data,
        sample_rate,
    })
}

/// Average interleaved frames down to a single channel.
fn downmix_to_mono(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_wav(path: &Path, channels: u16, samples: &[i16]) {
        let spec = hound::WavSpec {
            channels,
            sample_rate: 48000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for s in samples {
            writer.write_sample(*s).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_load_mono_wav() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("kick.wav");
        write_wav(&path, 1, &[0, i16::MAX, i16::MIN, 0]);

        let buffer = load_sample(&path).unwrap();
        assert_eq!(buffer.name, "kick.wav");
        assert_eq!(buffer.sample_rate, 48000);
        assert_eq!(buffer.data.len(), 4);
        assert!((buffer.data[1] - (i16::MAX as f32 / 32768.0)).abs() < 1e-6);
    }

    #[test]
    fn test_stereo_wav_is_downmixed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("snare.wav");
        // Two frames: (1.0, 0.0) and (0.5, 0.5) roughly, in i16
        write_wav(&path, 2, &[i16::MAX, 0, 16384, 16384]);

        let buffer = load_sample(&path).unwrap();
        assert_eq!(buffer.data.len(), 2);
        assert!((buffer.data[0] - 0.5).abs() < 0.01);
        assert!((buffer.data[1] - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_unsupported_extension() {
        let err = load_sample(Path::new("clap.aiff")).unwrap_err();
        assert!(matches!(err, SampleError::UnsupportedFormat(ext) if ext == "aiff"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_sample(Path::new("/nonexistent/kick.wav")).unwrap_err();
        assert!(matches!(err, SampleError::Wav(_) | SampleError::Io(_)));
    }

    #[test]
    fn test_duration() {
        let buffer = SampleBuffer {
            name: "hat.wav".to_string(),
            data: vec![0.0; 24000],
            sample_rate: 48000,
        };
        assert_eq!(buffer.duration_seconds(), 0.5);
    }
}
