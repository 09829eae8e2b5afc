pub use api::{Api, Server, Service};
pub use attribute::{AttributeExpr, DataType, NamedAttribute, Object, Primitive};
pub use endpoint::{Endpoint, Method};
pub use file_server::FileServer;
pub use hierarchy::Hierarchy;
pub use mapped::{name_map, MappedAttribute};
pub use metadata::Metadata;
pub use path::{extract_wildcards, has_wildcard, join_paths};
pub use root::{HttpApi, HttpError};
pub use service::HttpService;

mod api;
mod attribute;
mod endpoint;
mod file_server;
mod hierarchy;
pub mod mapped;
mod metadata;
mod path;
mod root;
mod service;
