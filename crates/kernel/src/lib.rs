//! SHELF kernel: the module contract, lifecycle registry, layered settings,
//! and the field validation primitives shared by every feature module.

pub mod module;
pub mod registry;
pub mod settings;
pub mod validation;

pub use module::{InitCtx, Migration, Module};
pub use registry::ModuleRegistry;
pub use settings::Settings;
