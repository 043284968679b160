pub mod app;
pub mod comfyui;
pub mod config;
pub mod consts;
pub mod errors;
pub mod frame;
pub mod handlers;
pub mod i18n;
pub mod launcher;
pub mod layout;
pub mod llm_client;
pub mod llm_request;
pub mod models;
pub mod pipelines;
pub mod service;
pub mod templates;
pub mod tools;
pub mod tts;
pub mod web;

#[cfg(test)]
mod test_utils;
