//! Service layer
//!
//! Coordinates domain models and ports into the fan-out workflow.

pub mod fan_out_service;

pub use fan_out_service::{
    build_instruction, build_request, extract_queries, BatchObserver, BatchReport,
    FanOutService, SilentObserver, CRITICAL_ERROR_PREFIX, DEFAULT_REQUEST_DELAY,
};
