pub mod document;
pub mod naming;
pub mod operations;
pub mod schema_types;

pub use document::OpenApiDocument;
pub use operations::{extract, EndpointKind, OperationDefinition, Verb};
