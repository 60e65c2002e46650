//! Static voice, model, and format tables

use crate::types::{AudioFormat, ProviderKind};

pub const OPENAI_VOICES: [&str; 6] = ["alloy", "echo", "fable", "onyx", "nova", "shimmer"];
pub const OPENAI_MODELS: [&str; 2] = ["tts-1", "tts-1-hd"];
pub const OPENAI_FORMATS: [AudioFormat; 4] = [AudioFormat::Mp3, AudioFormat::Opus, AudioFormat::Aac, AudioFormat::Flac];

pub const ELEVENLABS_MODELS: [&str; 2] = ["eleven_monolingual_v1", "eleven_multilingual_v2"];
pub const ELEVENLABS_FORMATS: [AudioFormat; 1] = [AudioFormat::Mp3];
/// `output_format` query value requested for mp3
pub const ELEVENLABS_MP3_OUTPUT: &str = "mp3_44100_128";
/// "Rachel", one of the premade voices every account has
pub const ELEVENLABS_DEFAULT_VOICE: &str = "21m00Tcm4TlvDq8ikWAM";
pub const ELEVENLABS_DEFAULT_MODEL: &str = "eleven_monolingual_v1";

pub const DEFAULT_PROVIDER: ProviderKind = ProviderKind::Openai;
pub const DEFAULT_VOICE: &str = "alloy";
pub const DEFAULT_MODEL: &str = "tts-1";
pub const DEFAULT_FORMAT: AudioFormat = AudioFormat::Mp3;
pub const DEFAULT_SPEED: f64 = 1.0;

pub const MIN_SPEED: f64 = 0.25;
pub const MAX_SPEED: f64 = 4.0;

/// Baseline speaking rate at speed 1.0
pub const WORDS_PER_MINUTE: f64 = 150.0;
/// Assumed encoder bitrate for size-based estimates, bits per second
pub const ASSUMED_BITRATE: f64 = 128.0 * 1024.0;
