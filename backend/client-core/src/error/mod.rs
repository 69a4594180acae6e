pub mod analysis_client;
pub mod config;
pub mod normalizer;
pub mod orchestrator;
pub mod session;

pub use analysis_client::AnalysisClientError;
pub use config::ConfigError;
pub use normalizer::NormalizeError;
pub use orchestrator::OrchestratorError;
pub use session::SessionError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    AnalysisClient(#[from] AnalysisClientError),

    #[error(transparent)]
    Orchestrator(#[from] OrchestratorError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
