//! Error types for page setup and the audio backend.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures while wiring the game into the hosting page.
#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("no global window")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("document has no body")]
    NoBody,
    #[error("element #{id} is not a {expected}")]
    WrongElement { id: &'static str, expected: &'static str },
    #[error("2d canvas context unavailable")]
    NoContext,
    #[error("invalid game config: {0}")]
    Config(String),
    #[error("javascript error: {0}")]
    Js(String),
}

impl From<JsValue> for GalleryError {
    fn from(value: JsValue) -> Self {
        GalleryError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

impl From<GalleryError> for JsValue {
    fn from(err: GalleryError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Failures from the sound backend. Never surfaced to the player.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio backend unavailable: {0}")]
    Unavailable(String),
    #[error("could not schedule sound: {0}")]
    Schedule(String),
}

impl AudioError {
    pub(crate) fn unavailable(value: JsValue) -> Self {
        AudioError::Unavailable(format!("{:?}", value))
    }

    pub(crate) fn schedule(value: JsValue) -> Self {
        AudioError::Schedule(format!("{:?}", value))
    }
}
