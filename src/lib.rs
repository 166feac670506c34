//! Suspicious activity alerts for uploaded videos
//!
//! Starts AWS Rekognition Video label detection for every stored video and,
//! once Rekognition reports completion, classifies the detected labels
//! against a suspicion taxonomy and sends a summary through Messenger.

pub mod app_state;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
