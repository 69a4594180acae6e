mod analysis_client;
mod error;
mod helpers;
mod orchestrator;
