pub mod ast;
pub mod builder;
pub mod endpoints;
pub mod hooks;
pub mod smart_import;

pub use builder::CreateApiEntryPoint;
pub use smart_import::{build_import, ImportTarget, ResolvedImport};
