use serde::Serialize;

use crate::errors::PixelleError;
use crate::i18n::{self, Language};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineDescriptor {
    pub name: &'static str,
    pub icon: &'static str,
    pub display_key: &'static str,
    pub description_key: &'static str,
}

#[derive(Debug, Serialize, Clone)]
pub struct PipelineEntry {
    pub name: String,
    pub icon: String,
    pub display_name: String,
    pub description: String,
}

const STANDARD: PipelineDescriptor = PipelineDescriptor {
    name: "standard",
    icon: "🎬",
    display_key: "pipeline.standard.name",
    description_key: "pipeline.standard.description",
};

const DIGITAL_HUMAN: PipelineDescriptor = PipelineDescriptor {
    name: "digital_human",
    icon: "🧑",
    display_key: "pipeline.digital_human.name",
    description_key: "pipeline.digital_human.description",
};

const DEMO: PipelineDescriptor = PipelineDescriptor {
    name: "demo",
    icon: "✨",
    display_key: "pipeline.demo.name",
    description_key: "pipeline.demo.description",
};

/// Pipelines in registration order.
#[derive(Debug, Clone, Default)]
pub struct PipelineRegistry {
    pipelines: Vec<PipelineDescriptor>,
}

impl PipelineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtins() -> Self {
        Self {
            pipelines: vec![STANDARD, DIGITAL_HUMAN, DEMO],
        }
    }

    pub fn register(&mut self, pipeline: PipelineDescriptor) -> Result<(), PixelleError> {
        if self.get(pipeline.name).is_some() {
            return Err(PixelleError::ValidationError(format!(
                "pipeline {} is already registered",
                pipeline.name
            )));
        }
        log::debug!("registered pipeline {}", pipeline.name);
        self.pipelines.push(pipeline);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&PipelineDescriptor> {
        self.pipelines.iter().find(|p| p.name == name)
    }

    pub fn list(&self, language: Language) -> Vec<PipelineEntry> {
        self.pipelines
            .iter()
            .map(|p| PipelineEntry {
                name: p.name.to_string(),
                icon: p.icon.to_string(),
                display_name: i18n::tr(language, p.display_key),
                description: i18n::tr(language, p.description_key),
            })
            .collect()
    }
}
