mod config;
mod report;
mod retry;
mod session;
