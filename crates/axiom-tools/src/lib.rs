//! Tool Registry and Tool Runtime for the Axiom agent runtime.
//!
//! The [`manifest::ToolRegistry`] loads [`manifest::ToolManifest`]s (§4.B)
//! and exposes a compact catalog for the planner. The [`runtime::ToolRuntime`]
//! (§4.D) binds manifests to real-mode [`handler::ToolHandler`]s and
//! dispatches plan steps through a fixed seven-step contract: resolve the
//! manifest, validate input, gate every required permission scope through
//! [`axiom_approval::PermissionEngine`], check the dispatch mode is
//! supported, dispatch (mock / dry_run / real), validate output, and emit
//! `tool.started` / `tool.succeeded` / `tool.failed` journal events.
//!
//! Five built-in handlers cover the hot-path coding operations directly as
//! Rust function calls: `read_file`, `write_file`, `edit_file`, `glob`, and
//! `bash`.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

mod bash;
mod edit_file;
mod glob;
mod read_file;
mod truncate;
mod write_file;

pub mod error;
pub mod handler;
pub mod manifest;
pub mod prelude;
pub mod runtime;
pub mod validate;

pub use bash::BashHandler;
pub use edit_file::EditFileHandler;
pub use error::{ToolRuntimeError, ToolRuntimeResult};
pub use glob::GlobHandler;
pub use handler::{HandlerContext, ToolHandler};
pub use manifest::{default_manifests, ToolManifest, ToolRegistry, ToolSupports};
pub use read_file::ReadFileHandler;
pub use runtime::{RunContext, ToolRuntime};
pub use truncate::{truncate_at_char_boundary, truncate_output};
pub use write_file::WriteFileHandler;

/// Register the built-in file and shell handlers (`read_file`, `write_file`,
/// `edit_file`, `glob`, `bash`) on `runtime`. Their manifests must still be
/// registered separately via [`manifest::ToolRegistry::register`] or
/// [`manifest::ToolRegistry::load_from_directory`].
pub fn register_builtin_handlers(runtime: &mut ToolRuntime) {
    runtime.register_handler("read_file", std::sync::Arc::new(ReadFileHandler));
    runtime.register_handler("write_file", std::sync::Arc::new(WriteFileHandler));
    runtime.register_handler("edit_file", std::sync::Arc::new(EditFileHandler));
    runtime.register_handler("glob", std::sync::Arc::new(GlobHandler));
    runtime.register_handler("bash", std::sync::Arc::new(BashHandler));
}
