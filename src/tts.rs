use serde::Serialize;

use crate::consts;
use crate::errors::PixelleError;
use crate::i18n::{self, Language};

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy)]
pub struct Voice {
    pub id: &'static str,
    pub locale: &'static str,
    pub gender: Gender,
    pub name_zh: &'static str,
    pub name_en: &'static str,
}

pub static EDGE_TTS_VOICES: &[Voice] = &[
    Voice { id: "zh-CN-YunjianNeural", locale: "zh-CN", gender: Gender::Male, name_zh: "云健", name_en: "Yunjian" },
    Voice { id: "zh-CN-YunxiNeural", locale: "zh-CN", gender: Gender::Male, name_zh: "云希", name_en: "Yunxi" },
    Voice { id: "zh-CN-YunyangNeural", locale: "zh-CN", gender: Gender::Male, name_zh: "云扬", name_en: "Yunyang" },
    Voice { id: "zh-CN-XiaoxiaoNeural", locale: "zh-CN", gender: Gender::Female, name_zh: "晓晓", name_en: "Xiaoxiao" },
    Voice { id: "zh-CN-XiaoyiNeural", locale: "zh-CN", gender: Gender::Female, name_zh: "晓伊", name_en: "Xiaoyi" },
    Voice { id: "zh-CN-liaoning-XiaobeiNeural", locale: "zh-CN", gender: Gender::Female, name_zh: "晓北（东北话）", name_en: "Xiaobei (Northeastern)" },
    Voice { id: "zh-TW-HsiaoChenNeural", locale: "zh-TW", gender: Gender::Female, name_zh: "曉臻（台湾）", name_en: "HsiaoChen (Taiwan)" },
    Voice { id: "en-US-AriaNeural", locale: "en-US", gender: Gender::Female, name_zh: "Aria（美式英语）", name_en: "Aria" },
    Voice { id: "en-US-GuyNeural", locale: "en-US", gender: Gender::Male, name_zh: "Guy（美式英语）", name_en: "Guy" },
    Voice { id: "en-GB-SoniaNeural", locale: "en-GB", gender: Gender::Female, name_zh: "Sonia（英式英语）", name_en: "Sonia (British)" },
];

pub fn find_voice(id: &str) -> Option<&'static Voice> {
    EDGE_TTS_VOICES.iter().find(|voice| voice.id == id)
}

/// Display name such as `云健 - 男声` / `Yunjian - Male`; unknown ids are returned as-is.
pub fn display_name(id: &str, language: Language) -> String {
    match find_voice(id) {
        Some(voice) => {
            let (name, gender_key) = match (language, voice.gender) {
                (Language::ZhCn, Gender::Male) => (voice.name_zh, "gender.male"),
                (Language::ZhCn, Gender::Female) => (voice.name_zh, "gender.female"),
                (Language::En, Gender::Male) => (voice.name_en, "gender.male"),
                (Language::En, Gender::Female) => (voice.name_en, "gender.female"),
            };
            format!("{} - {}", name, i18n::tr(language, gender_key))
        }
        None => id.to_string(),
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct VoiceEntry {
    pub id: String,
    pub locale: String,
    pub gender: Gender,
    pub display_name: String,
}

pub fn list_voices(language: Language) -> Vec<VoiceEntry> {
    EDGE_TTS_VOICES
        .iter()
        .map(|voice| VoiceEntry {
            id: voice.id.to_string(),
            locale: voice.locale.to_string(),
            gender: voice.gender,
            display_name: display_name(voice.id, language),
        })
        .collect()
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct TtsSettings {
    pub voice: String,
    pub speed: f32,
}

impl TtsSettings {
    /// Speed is snapped to the 0.1 slider step before the range check.
    pub fn new(voice: &str, speed: f32) -> Result<Self, PixelleError> {
        if find_voice(voice).is_none() {
            return Err(PixelleError::ValidationError(format!(
                "unknown TTS voice: {voice}"
            )));
        }
        let speed = (speed * 10.0).round() / 10.0;
        if !speed.is_finite() || !(consts::MIN_TTS_SPEED..=consts::MAX_TTS_SPEED).contains(&speed)
        {
            return Err(PixelleError::ValidationError(format!(
                "TTS speed {speed} outside {}..={}",
                consts::MIN_TTS_SPEED,
                consts::MAX_TTS_SPEED
            )));
        }
        Ok(Self {
            voice: voice.to_string(),
            speed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_voice_in_catalog() {
        assert!(find_voice(consts::DEFAULT_TTS_VOICE).is_some());
    }

    #[test]
    fn test_display_name_localized() {
        assert_eq!(
            display_name("zh-CN-YunjianNeural", Language::ZhCn),
            "云健 - 男声"
        );
        assert_eq!(
            display_name("zh-CN-YunjianNeural", Language::En),
            "Yunjian - Male"
        );
        assert_eq!(display_name("custom-voice", Language::En), "custom-voice");
    }

    #[rstest]
    #[case(0.5, 0.5)]
    #[case(1.23, 1.2)]
    #[case(2.0, 2.0)]
    #[case(2.04, 2.0)]
    fn test_speed_accepted(#[case] input: f32, #[case] expected: f32) {
        let settings = TtsSettings::new("en-US-AriaNeural", input).unwrap();
        assert!((settings.speed - expected).abs() < 1e-6);
    }

    #[rstest]
    #[case(0.4)]
    #[case(2.1)]
    #[case(f32::NAN)]
    fn test_speed_rejected(#[case] input: f32) {
        assert!(TtsSettings::new("en-US-AriaNeural", input).is_err());
    }

    #[test]
    fn test_list_voices_covers_catalog() {
        let voices = list_voices(Language::En);
        assert_eq!(voices.len(), EDGE_TTS_VOICES.len());
        assert!(voices.iter().all(|v| !v.display_name.is_empty()));
    }
}
