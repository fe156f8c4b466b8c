//! Error types for the test framework

use thiserror::Error;

/// Errors that can occur while building regression fixtures
#[derive(Debug, Error)]
pub enum TestError {
    /// Grid construction failed
    #[error("failed to build grid: {0}")]
    Grid(#[from] voxseg_core::Error),

    /// Fixture parameters are unusable
    #[error("invalid fixture: {0}")]
    InvalidFixture(String),
}

/// Result type for test operations
pub type TestResult<T> = Result<T, TestError>;
