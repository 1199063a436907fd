//! Video CDN backend
//!
//! Stores uploaded videos in an S3 bucket and redirects lookups to the
//! object's public URL, served through a CDN hostname when one is configured.

/// HTTP routes
pub mod routes;

/// Router assembly and serving
pub mod server;

/// Configuration and shared types
pub mod types;

/// Identifiers and storage keys
pub mod video_keys;

/// Storage gateway and blob store backends
pub mod video_storage;
