//! 音频解码 - 基于 symphonia 将 WAV/MP3 解码为 f32 PCM

use std::io::Cursor;
use std::time::Duration;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::application::ports::AudioOutputError;
use crate::domain::playback::AudioPayload;

/// 解码后的交织 PCM 样本
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u16,
}

impl DecodedAudio {
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.samples.len() / self.channels as usize
        }
    }

    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(self.frames() as u64 * 1000 / self.sample_rate as u64)
    }
}

fn decoding(msg: impl std::fmt::Display) -> AudioOutputError {
    AudioOutputError::DecodingError(msg.to_string())
}

/// 解码整段音频
///
/// CPU 密集，异步上下文中应放到 `spawn_blocking` 里调用
pub fn decode_payload(payload: &AudioPayload) -> Result<DecodedAudio, AudioOutputError> {
    if payload.is_empty() {
        return Err(decoding("empty audio payload"));
    }

    let cursor = Cursor::new(payload.data().to_vec());
    let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

    let mut hint = Hint::new();
    hint.with_extension(payload.container().extension());
    hint.mime_type(payload.container().mime_type());

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| decoding(format!("Probe failed: {}", e)))?;

    let mut format = probed.format;

    let track = format
        .default_track()
        .ok_or_else(|| decoding("No audio track found"))?;
    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate.or(payload.sample_rate());
    let mut channels = track.codec_params.channels.map(|c| c.count() as u16);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| AudioOutputError::Unsupported(format!("No decoder for track: {}", e)))?;

    let mut samples: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(e) => return Err(decoding(format!("Packet read error: {}", e))),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(SymphoniaError::DecodeError(e)) => {
                tracing::warn!(error = %e, "Decode error (skipping packet)");
                continue;
            }
            Err(e) => return Err(decoding(format!("Decode failed: {}", e))),
        };

        let spec = *decoded.spec();
        if sample_rate.is_none() {
            sample_rate = Some(spec.rate);
        }
        if channels.is_none() {
            channels = Some(spec.channels.count() as u16);
        }

        let num_frames = decoded.frames();
        let mut sample_buf = SampleBuffer::<f32>::new(num_frames as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);
        let actual_samples = num_frames * spec.channels.count();
        samples.extend(&sample_buf.samples()[..actual_samples]);
    }

    let sample_rate = sample_rate.ok_or_else(|| decoding("Unknown sample rate"))?;
    let channels = channels.ok_or_else(|| decoding("Unknown channel count"))?;
    if samples.is_empty() {
        return Err(decoding("no audio samples decoded"));
    }

    Ok(DecodedAudio {
        samples,
        sample_rate,
        channels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::playback::AudioContainer;
    use crate::infrastructure::adapters::audio::wav::{encode_pcm16_wav, silent_wav};

    #[test]
    fn test_decode_wav() {
        let payload = AudioPayload::new(silent_wav(16000, 500), AudioContainer::Wav);

        let decoded = decode_payload(&payload).unwrap();

        assert_eq!(decoded.sample_rate, 16000);
        assert_eq!(decoded.channels, 1);
        assert_eq!(decoded.frames(), 8000);
        assert_eq!(decoded.duration(), Duration::from_millis(500));
    }

    #[test]
    fn test_decode_preserves_signal() {
        let tone: Vec<f32> = (0..2400).map(|i| if i % 2 == 0 { 0.5 } else { -0.5 }).collect();
        let payload = AudioPayload::new(encode_pcm16_wav(&tone, 24000, 2), AudioContainer::Wav);

        let decoded = decode_payload(&payload).unwrap();

        assert_eq!(decoded.channels, 2);
        assert_eq!(decoded.frames(), 1200);
        assert!((decoded.samples[0] - 0.5).abs() < 0.01);
        assert!((decoded.samples[1] + 0.5).abs() < 0.01);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let payload = AudioPayload::new(b"not audio at all".to_vec(), AudioContainer::Wav);
        assert!(matches!(
            decode_payload(&payload),
            Err(AudioOutputError::DecodingError(_))
        ));

        let empty = AudioPayload::new(Vec::new(), AudioContainer::Mp3);
        assert!(decode_payload(&empty).is_err());
    }
}
