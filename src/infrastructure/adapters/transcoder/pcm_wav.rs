//! PCM → WAV 封装
//!
//! TTS 后端返回裸 16-bit little-endian PCM（`audio/L16;codec=pcm;rate=24000`），
//! 浏览器无法直接播放，需要加上 WAV 头。

/// 后端未声明采样率时使用的默认值
pub const DEFAULT_PCM_SAMPLE_RATE: u32 = 24_000;

/// 判断 MIME 是否为裸 PCM
pub fn is_raw_pcm(mime_type: &str) -> bool {
    let base = mime_type.split(';').next().unwrap_or_default().trim();
    base.eq_ignore_ascii_case("audio/L16") || base.eq_ignore_ascii_case("audio/pcm")
}

/// 从 MIME 参数中解析采样率，例如 `audio/L16;codec=pcm;rate=24000`
pub fn parse_sample_rate(mime_type: &str) -> u32 {
    mime_type
        .split(';')
        .skip(1)
        .filter_map(|param| param.split_once('='))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("rate"))
        .and_then(|(_, value)| value.trim().parse().ok())
        .unwrap_or(DEFAULT_PCM_SAMPLE_RATE)
}

/// 将 16-bit PCM 字节封装为 WAV
pub fn encode_pcm16_wav(pcm: &[u8], sample_rate: u32, channels: u16) -> Vec<u8> {
    let bits_per_sample: u16 = 16;
    let byte_rate = sample_rate * channels as u32 * (bits_per_sample / 8) as u32;
    let block_align = channels * (bits_per_sample / 8);

    // 奇数字节无法构成完整样本，丢弃最后一个字节
    let data = &pcm[..pcm.len() - pcm.len() % 2];
    let data_size = data.len();
    let file_size = 36 + data_size;

    let mut wav = Vec::with_capacity(44 + data_size);

    // RIFF header
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(file_size as u32).to_le_bytes());
    wav.extend_from_slice(b"WAVE");

    // fmt chunk
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes()); // chunk size
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM format
    wav.extend_from_slice(&channels.to_le_bytes());
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&block_align.to_le_bytes());
    wav.extend_from_slice(&bits_per_sample.to_le_bytes());

    // data chunk
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&(data_size as u32).to_le_bytes());
    wav.extend_from_slice(data);

    wav
}

/// 生成指定时长的静音 WAV
pub fn silent_wav(duration_ms: u32, sample_rate: u32) -> Vec<u8> {
    let samples = (sample_rate as u64 * duration_ms as u64 / 1000) as usize;
    encode_pcm16_wav(&vec![0u8; samples * 2], sample_rate, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sample_rate() {
        assert_eq!(parse_sample_rate("audio/L16;codec=pcm;rate=24000"), 24000);
        assert_eq!(parse_sample_rate("audio/L16; rate=16000"), 16000);
        assert_eq!(parse_sample_rate("audio/L16"), DEFAULT_PCM_SAMPLE_RATE);
    }

    #[test]
    fn test_is_raw_pcm() {
        assert!(is_raw_pcm("audio/L16;codec=pcm;rate=24000"));
        assert!(!is_raw_pcm("audio/wav"));
    }

    #[test]
    fn test_wav_header() {
        let wav = encode_pcm16_wav(&[1, 0, 2, 0, 3], 24000, 1);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(&wav[36..40], b"data");
        // 奇数尾字节被丢弃
        assert_eq!(u32::from_le_bytes([wav[40], wav[41], wav[42], wav[43]]), 4);
        assert_eq!(wav.len(), 48);
        assert_eq!(
            u32::from_le_bytes([wav[24], wav[25], wav[26], wav[27]]),
            24000
        );
    }

    #[test]
    fn test_silent_wav_length() {
        let wav = silent_wav(500, 24000);
        assert_eq!(wav.len(), 44 + 12000 * 2);
    }
}
