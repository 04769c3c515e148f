//! Execution backend implementations

pub mod sandbox;
pub mod shell;

pub use sandbox::SandboxBackend;
pub use shell::ShellBackend;

/// Tool name for running a shell command; parameter `command`
pub const SHELL_COMMAND_TOOL: &str = "shell-command";
