use crate::eval::Expression;
use crate::expr::{
    join_paths, mapped, AttributeExpr, Endpoint, FileServer, MappedAttribute, Metadata,
};

/// One HTTP service: augments a transport-agnostic [crate::expr::Service]
/// (referenced by name) with a request path prefix, header and parameter
/// declarations, endpoints, and file servers.
///
/// A service may name another service as its parent. The reference is a name
/// resolved by lookup on the root at evaluation time, never an owning
/// pointer, so the registry stays an ownership forest. The service's
/// effective path, headers, and params are the merge of its own declarations
/// with the parent's finalized values, which is why services evaluate
/// parent-before-child.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct HttpService {
    /// Name of the underlying service definition.
    pub name: String,
    pub description: Option<String>,
    /// Request path prefix, relative to the parent service prefix (or to the
    /// API prefix for root-level services). Absolute after finalize when a
    /// parent is involved.
    pub path: String,
    /// Parent service name. `None` for root-level services.
    pub parent: Option<String>,
    /// Endpoints exposed by this service, in declaration order.
    pub endpoints: Vec<Endpoint>,
    /// Static asset endpoints owned by this service, in declaration order.
    pub file_servers: Vec<FileServer>,
    pub metadata: Metadata,
    params: AttributeExpr,
    headers: AttributeExpr,
}

impl HttpService {
    pub fn new(name: impl ToString) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Header declarations common to all endpoints of this service. Always
    /// present; empty until the first header is declared. Field names may use
    /// the `attribute:element` encoding.
    pub fn headers(&self) -> &AttributeExpr {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut AttributeExpr {
        &mut self.headers
    }

    /// Parameter declarations common to all endpoints of this service.
    pub fn params(&self) -> &AttributeExpr {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut AttributeExpr {
        &mut self.params
    }

    pub fn mapped_headers(&self) -> MappedAttribute {
        MappedAttribute::new(&self.headers)
    }

    pub fn mapped_params(&self) -> MappedAttribute {
        MappedAttribute::new(&self.params)
    }

    pub fn add_endpoint(&mut self, endpoint: Endpoint) {
        self.endpoints.push(endpoint);
    }

    pub fn add_file_server(&mut self, file_server: FileServer) {
        self.file_servers.push(file_server);
    }

    /// Get an endpoint by name.
    pub fn endpoint(&self, name: &str) -> Option<&Endpoint> {
        self.endpoints
            .iter()
            .find(|endpoint| endpoint.name == name)
    }

    /// Fold the parent's finalized values into this service: the parent path
    /// becomes this service's prefix, and parent headers/params not declared
    /// here are appended. Must run after the parent itself finalized.
    pub(crate) fn inherit(
        &mut self,
        parent_path: &str,
        parent_headers: &AttributeExpr,
        parent_params: &AttributeExpr,
    ) {
        self.path = join_paths([parent_path, self.path.as_str()]);
        mapped::inherit(&mut self.headers, parent_headers);
        mapped::inherit(&mut self.params, parent_params);
    }
}

impl Expression for HttpService {
    fn eval_name(&self) -> String {
        format!("service {}", self.name)
    }
}
