//! In-memory representation of an HTTP API design: services, endpoints, and
//! static file servers, assembled in arbitrary declaration order by a
//! front-end and evaluated in dependency order before code generators read
//! the finalized graph.

pub use eval::{check, execute, Config, EvalSet, Expression, ValidationError};
pub use expr::{
    extract_wildcards, join_paths, name_map, Api, AttributeExpr, Endpoint, FileServer, HttpApi,
    HttpService, MappedAttribute, Method, Server, Service,
};

pub mod eval;
pub mod expr;
