//! WAV output
//!
//! Mono 16-bit PCM. Samples are clamped to [-1.0, 1.0] and scaled by
//! `i16::MAX`, so full scale is symmetric (-32767..=32767).

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{Error, Result};
use crate::render::render;
use crate::signal::Source;

const HEADER_LEN: usize = 44;

/// Convert one sample to 16-bit PCM
pub fn to_pcm16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
}

/// Size of the data chunk for `len` samples
///
/// The RIFF size field holds `36 + data size`, so that sum must fit in a u32.
fn data_chunk_size(len: usize) -> Result<u32> {
    len.checked_mul(2)
        .and_then(|bytes| u32::try_from(bytes).ok())
        .filter(|bytes| bytes.checked_add(36).is_some())
        .ok_or(Error::WavTooLong(len))
}

/// Encode samples as a complete 16-bit mono WAV file in memory
///
/// # Example
/// ```
/// use plectrum::wav::encode_wav_16bit;
///
/// let bytes = encode_wav_16bit(&[0.0, 0.5, -0.5], 44100).unwrap();
/// assert_eq!(&bytes[0..4], b"RIFF");
/// assert_eq!(bytes.len(), 44 + 3 * 2);
/// ```
pub fn encode_wav_16bit(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let num_channels: u16 = 1;
    let bits_per_sample: u16 = 16;
    let byte_rate = sample_rate * num_channels as u32 * (bits_per_sample / 8) as u32;
    let block_align = num_channels * (bits_per_sample / 8);
    let data_size = data_chunk_size(samples.len())?;

    let mut buf = Vec::with_capacity(HEADER_LEN + samples.len() * 2);

    // RIFF chunk
    buf.extend_from_slice(b"RIFF");
    buf.extend_from_slice(&(36 + data_size).to_le_bytes());
    buf.extend_from_slice(b"WAVE");

    // fmt subchunk
    buf.extend_from_slice(b"fmt ");
    buf.extend_from_slice(&16u32.to_le_bytes());
    buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
    buf.extend_from_slice(&num_channels.to_le_bytes());
    buf.extend_from_slice(&sample_rate.to_le_bytes());
    buf.extend_from_slice(&byte_rate.to_le_bytes());
    buf.extend_from_slice(&block_align.to_le_bytes());
    buf.extend_from_slice(&bits_per_sample.to_le_bytes());

    // data subchunk
    buf.extend_from_slice(b"data");
    buf.extend_from_slice(&data_size.to_le_bytes());
    for &sample in samples {
        buf.extend_from_slice(&to_pcm16(sample).to_le_bytes());
    }

    Ok(buf)
}

/// Write samples to a 16-bit mono WAV file
pub fn write_wav_16bit<P: AsRef<Path>>(path: P, samples: &[f32], sample_rate: u32) -> Result<()> {
    fs::write(path.as_ref(), encode_wav_16bit(samples, sample_rate)?)?;
    info!(
        path = %path.as_ref().display(),
        samples = samples.len(),
        sample_rate,
        "wrote wav"
    );
    Ok(())
}

/// Render `source` over its own duration and write it as a WAV file
///
/// Fails with [`Error::InfiniteDuration`] before touching the filesystem if
/// the source never ends. Returns the number of frames written.
pub fn write_source<S, P>(source: &mut S, path: P, sample_rate: u32) -> Result<usize>
where
    S: Source + ?Sized,
    P: AsRef<Path>,
{
    if source.duration().is_infinite() {
        return Err(Error::InfiniteDuration);
    }
    let samples = render(source, None)?;
    write_wav_16bit(path, &samples, sample_rate)?;
    Ok(samples.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::AsyncPlayer;
    use crate::signal::{Duration, Ramp, SharedNote, Tone};
    use std::path::PathBuf;
    use std::sync::Arc;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("plectrum_{}_{}.wav", name, std::process::id()))
    }

    fn sample_at(data: &[u8], index: usize) -> i16 {
        let offset = HEADER_LEN + index * 2;
        i16::from_le_bytes([data[offset], data[offset + 1]])
    }

    #[test]
    fn test_encode_header() {
        let data = encode_wav_16bit(&[0.0; 5], 44100).unwrap();

        assert_eq!(&data[0..4], b"RIFF");
        assert_eq!(&data[8..12], b"WAVE");
        assert_eq!(&data[12..16], b"fmt ");
        assert_eq!(u16::from_le_bytes([data[20], data[21]]), 1); // PCM
        assert_eq!(u16::from_le_bytes([data[22], data[23]]), 1); // mono
        assert_eq!(
            u32::from_le_bytes([data[24], data[25], data[26], data[27]]),
            44100
        );
        assert_eq!(u16::from_le_bytes([data[34], data[35]]), 16);
        assert_eq!(&data[36..40], b"data");
    }

    #[test]
    fn test_encode_sizes() {
        let num_samples = 1000;
        let data = encode_wav_16bit(&vec![0.0; num_samples], 16000).unwrap();
        assert_eq!(data.len(), HEADER_LEN + num_samples * 2);

        let data_size = u32::from_le_bytes([data[40], data[41], data[42], data[43]]);
        assert_eq!(data_size, (num_samples * 2) as u32);
        let riff_size = u32::from_le_bytes([data[4], data[5], data[6], data[7]]);
        assert_eq!(riff_size, 36 + data_size);
    }

    #[test]
    fn test_data_chunk_size_limits() {
        assert_eq!(data_chunk_size(0).unwrap(), 0);
        assert_eq!(data_chunk_size(1000).unwrap(), 2000);

        // Largest count whose RIFF size still fits
        let max = ((u32::MAX - 36) / 2) as usize;
        assert_eq!(data_chunk_size(max).unwrap(), (max * 2) as u32);

        for len in [max + 1, 1usize << 31, usize::MAX] {
            assert!(matches!(data_chunk_size(len), Err(Error::WavTooLong(n)) if n == len));
        }
    }

    #[test]
    fn test_scaling_and_clamping() {
        let data = encode_wav_16bit(&[2.0, -2.0, 1.0, -1.0, 0.5, -0.5, 0.0], 44100).unwrap();

        assert_eq!(sample_at(&data, 0), 32767);
        assert_eq!(sample_at(&data, 1), -32767);
        assert_eq!(sample_at(&data, 2), 32767);
        assert_eq!(sample_at(&data, 3), -32767);
        // 16383.5 truncates toward zero
        assert_eq!(sample_at(&data, 4), 16383);
        assert_eq!(sample_at(&data, 5), -16383);
        assert_eq!(sample_at(&data, 6), 0);
    }

    #[test]
    fn test_write_file() {
        let path = temp_path("write");
        write_wav_16bit(&path, &[0.25; 100], 16000).unwrap();

        let data = fs::read(&path).unwrap();
        assert_eq!(data, encode_wav_16bit(&[0.25; 100], 16000).unwrap());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_source() {
        let path = temp_path("source");
        let mut ramp: SharedNote = Arc::new(Ramp::new(3));

        let written = write_source(&mut ramp, &path, 44100).unwrap();
        assert_eq!(written, 3);

        let data = fs::read(&path).unwrap();
        assert_eq!(sample_at(&data, 0), 0);
        assert_eq!(sample_at(&data, 1), 16383);
        assert_eq!(sample_at(&data, 2), 32767);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_source_infinite_writes_nothing() {
        let path = temp_path("infinite");
        let _ = fs::remove_file(&path);

        let mut tone: SharedNote = Arc::new(Tone::new(440.0, 44100, Duration::Infinite));
        assert!(matches!(
            write_source(&mut tone, &path, 44100),
            Err(Error::InfiniteDuration)
        ));

        let mut player = AsyncPlayer::new();
        assert!(matches!(
            write_source(&mut player, &path, 44100),
            Err(Error::InfiniteDuration)
        ));

        assert!(!path.exists());
    }

    #[test]
    fn test_write_to_missing_dir_is_io_error() {
        let path = std::env::temp_dir()
            .join("plectrum_no_such_dir")
            .join("out.wav");
        assert!(matches!(
            write_wav_16bit(&path, &[0.0], 44100),
            Err(Error::Io(_))
        ));
    }
}
