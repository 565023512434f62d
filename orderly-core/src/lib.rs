// orderly-core/src/lib.rs

// 1. Documentation is optional for now
#![allow(missing_docs)]
// 2. Memory safety
#![deny(unsafe_code)]
// 3. Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
// 4. Performance
#![warn(clippy::perf)]

// --- HEXAGONAL MODULES ---

// 1. Ports (Interfaces / Traits)
// Contracts for the external collaborators (dataset source, artifact sink).
pub mod ports;

// 2. Domain (business core)
// Row schema, quality rules, dimensional mart builder.
// Depends on NOTHING else (neither infra nor app).
pub mod domain;

// 3. Infrastructure (Adapters)
// CSV ingestion, source discovery, YAML config, artifact writer.
// Depends on Domain and Ports.
pub mod infrastructure;

// 4. Application (Use Cases)
// Orchestration (Quality analysis, Mart build, Pipeline, Clean)
// Depends on Domain, Infra and Ports.
pub mod application;

// --- GLOBAL ERROR HANDLING ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
// use orderly_core::OrderlyError;
pub use error::OrderlyError;
