//! Pizza Intake - Conversational Order Form
//!
//! This crate implements a pizza-order intake form filled over free-form chat:
//! an LLM judges exit/confirm intent and extracts structured fields, a small
//! state machine drives the conversation to a confirmed order or cancellation.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
