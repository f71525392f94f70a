//! Audio Transcoding - PCM 封装

mod pcm_wav;

pub use pcm_wav::{
    encode_pcm16_wav, is_raw_pcm, parse_sample_rate, silent_wav, DEFAULT_PCM_SAMPLE_RATE,
};
