pub mod benchmark;
pub mod bridge;
pub mod chat;
pub mod client;
pub mod console;
pub mod error;
pub mod poller;

pub use benchmark::BenchmarkRunner;
pub use bridge::ConfigFormBridge;
pub use chat::ChatInvoker;
pub use client::ManagementClient;
pub use console::Console;
pub use error::ClientError;
pub use poller::ServiceStatusPoller;
