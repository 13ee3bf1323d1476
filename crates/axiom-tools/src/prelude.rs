//! Prelude module - commonly used types for convenient import.
//!
//! Use `use axiom_tools::prelude::*;` to import all essential types.

pub use crate::{
    default_manifests, register_builtin_handlers, BashHandler, EditFileHandler, GlobHandler,
    HandlerContext, ReadFileHandler, RunContext, ToolHandler, ToolManifest, ToolRegistry,
    ToolRuntime, ToolRuntimeError, ToolRuntimeResult, ToolSupports, WriteFileHandler,
};
