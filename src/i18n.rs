use phf::phf_map;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    En,
    #[serde(rename = "zh_CN")]
    ZhCn,
}

impl Language {
    /// Accepts `zh_CN`, `zh-CN` and `zh`; anything else is English.
    pub fn parse(code: &str) -> Language {
        match code.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "zh_cn" | "zh" => Language::ZhCn,
            _ => Language::En,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::ZhCn => "zh_CN",
        }
    }
}

static EN: phf::Map<&'static str, &'static str> = phf_map! {
    "pipeline.standard.name" => "Standard Video",
    "pipeline.standard.description" => "Topic to narrated video with generated images",
    "pipeline.digital_human.name" => "Digital Human",
    "pipeline.digital_human.description" => "Two-step RunningHub workflow producing a presenter video",
    "pipeline.demo.name" => "Demo",
    "pipeline.demo.description" => "Custom two-column layout used to verify the pipeline plugin system",
    "settings.title" => "Pixelle-Video Settings",
    "settings.llm" => "LLM",
    "settings.comfyui" => "ComfyUI",
    "settings.tts" => "Text to Speech",
    "settings.save" => "Save Config",
    "settings.saved" => "Configuration saved",
    "settings.api_key_keep" => "Leave blank to keep the current key",
    "status.llm_missing" => "LLM is not configured",
    "status.comfyui_local" => "Local ComfyUI",
    "status.comfyui_runninghub" => "RunningHub cloud",
    "digital_human.workflow.first_step" => "Step 1: collage and copy",
    "digital_human.workflow.second_step" => "Step 2: final video",
    "digital_human.workflow.not_found" => "workflow file not found",
    "gender.male" => "Male",
    "gender.female" => "Female",
};

static ZH_CN: phf::Map<&'static str, &'static str> = phf_map! {
    "pipeline.standard.name" => "标准视频",
    "pipeline.standard.description" => "根据主题生成带配音和配图的视频",
    "pipeline.digital_human.name" => "数字人",
    "pipeline.digital_human.description" => "通过两步 RunningHub 工作流生成数字人口播视频",
    "pipeline.demo.name" => "演示",
    "pipeline.demo.description" => "用于验证管线插件系统的双栏自定义布局",
    "settings.title" => "Pixelle-Video 设置",
    "settings.llm" => "大模型",
    "settings.comfyui" => "ComfyUI",
    "settings.tts" => "语音合成",
    "settings.save" => "保存配置",
    "settings.saved" => "配置已保存",
    "settings.api_key_keep" => "留空则保留当前密钥",
    "status.llm_missing" => "尚未配置大模型",
    "status.comfyui_local" => "本地 ComfyUI",
    "status.comfyui_runninghub" => "RunningHub 云端",
    "digital_human.workflow.first_step" => "第一步：生成拼图和文案",
    "digital_human.workflow.second_step" => "第二步：合成最终视频",
    "digital_human.workflow.not_found" => "未找到工作流文件",
    "gender.male" => "男声",
    "gender.female" => "女声",
};

/// Looks up `key` for `language`, falling back to English and then to the key itself.
pub fn tr(language: Language, key: &str) -> String {
    let table = match language {
        Language::En => &EN,
        Language::ZhCn => &ZH_CN,
    };
    table
        .get(key)
        .or_else(|| EN.get(key))
        .map(|s| s.to_string())
        .unwrap_or_else(|| key.to_string())
}
