//! Mixlate - Mixed-Language Translation
//!
//! Tags every word of a mixed-language passage with its most likely language,
//! then translates the passage under several declared source languages and
//! keeps the best scoring result.

pub mod cli;
pub mod config;
pub mod detect;
pub mod error;
pub mod language;
pub mod quality;
pub mod select;
pub mod text;
pub mod translate;
pub mod workflow;
