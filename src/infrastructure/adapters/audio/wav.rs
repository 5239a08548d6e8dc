//! WAV 工具 - 头部解析与 PCM16 编码

use crate::application::ports::AudioOutputError;

/// WAV 基本信息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavInfo {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    pub data_size: usize,
    pub duration_ms: u64,
}

fn invalid(msg: &str) -> AudioOutputError {
    AudioOutputError::DecodingError(format!("Invalid WAV: {}", msg))
}

fn read_u16(data: &[u8], pos: usize) -> Option<u16> {
    data.get(pos..pos + 2).map(|b| u16::from_le_bytes([b[0], b[1]]))
}

fn read_u32(data: &[u8], pos: usize) -> Option<u32> {
    data.get(pos..pos + 4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

/// 解析 RIFF/WAVE 头
///
/// 流式合成返回的 data chunk 长度可能是占位值，超出实际长度时按剩余字节计算
pub fn parse_wav_info(data: &[u8]) -> Result<WavInfo, AudioOutputError> {
    if data.len() < 12 {
        return Err(invalid("data too short"));
    }
    if &data[0..4] != b"RIFF" {
        return Err(invalid("missing RIFF header"));
    }
    if &data[8..12] != b"WAVE" {
        return Err(invalid("missing WAVE identifier"));
    }

    let mut pos = 12;
    let mut fmt: Option<(u16, u32, u16)> = None;
    let mut data_size: Option<usize> = None;

    while pos + 8 <= data.len() {
        let chunk_id = &data[pos..pos + 4];
        let chunk_size = read_u32(data, pos + 4).unwrap_or(0) as usize;
        let body = pos + 8;

        match chunk_id {
            b"fmt " => {
                if chunk_size < 16 {
                    return Err(invalid("fmt chunk too small"));
                }
                let channels = read_u16(data, body + 2).ok_or_else(|| invalid("truncated fmt"))?;
                let sample_rate =
                    read_u32(data, body + 4).ok_or_else(|| invalid("truncated fmt"))?;
                let bits = read_u16(data, body + 14).ok_or_else(|| invalid("truncated fmt"))?;
                fmt = Some((channels, sample_rate, bits));
            }
            b"data" => {
                data_size = Some(chunk_size.min(data.len() - body));
                break;
            }
            _ => {}
        }

        pos = body.saturating_add(chunk_size);
        // 对齐到偶数字节
        if chunk_size % 2 != 0 {
            pos = pos.saturating_add(1);
        }
    }

    let (channels, sample_rate, bits_per_sample) = fmt.ok_or_else(|| invalid("missing fmt chunk"))?;
    let data_size = data_size.ok_or_else(|| invalid("missing data chunk"))?;

    let bytes_per_frame = (bits_per_sample as usize / 8) * channels as usize;
    let duration_ms = if bytes_per_frame > 0 && sample_rate > 0 {
        let frames = (data_size / bytes_per_frame) as u64;
        let rate = sample_rate as u64;
        // 四舍五入到毫秒
        (frames * 1000 + rate / 2) / rate
    } else {
        0
    };

    Ok(WavInfo {
        sample_rate,
        channels,
        bits_per_sample,
        data_size,
        duration_ms,
    })
}

/// 将交织的 f32 样本编码为 16 位 PCM WAV
pub fn encode_pcm16_wav(samples: &[f32], sample_rate: u32, channels: u16) -> Vec<u8> {
    let bits_per_sample: u16 = 16;
    let byte_rate = sample_rate * channels as u32 * (bits_per_sample / 8) as u32;
    let block_align = channels * (bits_per_sample / 8);

    let data_size = samples.len() * 2;
    let file_size = 36 + data_size;

    let mut wav = Vec::with_capacity(44 + data_size);

    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(file_size as u32).to_le_bytes());
    wav.extend_from_slice(b"WAVE");

    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&channels.to_le_bytes());
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&block_align.to_le_bytes());
    wav.extend_from_slice(&bits_per_sample.to_le_bytes());

    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&(data_size as u32).to_le_bytes());

    for &s in samples {
        let sample = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
        wav.extend_from_slice(&sample.to_le_bytes());
    }

    wav
}

/// 指定时长的单声道静音 WAV，帧数向上取整，不短于 `duration_ms`
pub fn silent_wav(sample_rate: u32, duration_ms: u64) -> Vec<u8> {
    let frames = (sample_rate as u64 * duration_ms).div_ceil(1000) as usize;
    encode_pcm16_wav(&vec![0.0; frames], sample_rate, 1)
}
