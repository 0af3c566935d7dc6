pub mod app;
pub mod cli;
pub mod display;
pub mod prompt;
pub mod server;

// Re-export commonly used items
pub use cli::Cli;
pub use server::DevServer;
