use std::fmt::{Display, Formatter};

use crate::eval::Expression;
use crate::expr::{
    extract_wildcards, join_paths, mapped, AttributeExpr, MappedAttribute, Metadata,
};

/// HTTP method of an [Endpoint].
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
        }
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One HTTP endpoint of a service.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Endpoint {
    pub name: String,
    pub method: Method,
    /// Request path, relative to the owning service prefix until finalize and
    /// absolute afterwards. May contain wildcard markers.
    pub path: String,
    pub description: Option<String>,
    pub metadata: Metadata,
    params: AttributeExpr,
    headers: AttributeExpr,
}

impl Endpoint {
    pub fn new(name: impl ToString, method: Method, path: impl ToString) -> Self {
        Self {
            name: name.to_string(),
            method,
            path: path.to_string(),
            ..Default::default()
        }
    }

    pub fn headers(&self) -> &AttributeExpr {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut AttributeExpr {
        &mut self.headers
    }

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

    /// Wildcard parameter names of the request path, in order of appearance.
    pub fn wildcards(&self) -> Vec<&str> {
        extract_wildcards(&self.path)
    }

    /// Compute the absolute request path and layer the inherited header and
    /// parameter declarations underneath this endpoint's own. `prefix` is the
    /// already-finalized API + service prefix; `base_headers`/`base_params`
    /// are the service containers merged over the API-wide ones.
    pub(crate) fn finalize(
        &mut self,
        prefix: &str,
        base_headers: &AttributeExpr,
        base_params: &AttributeExpr,
    ) {
        self.path = join_paths([prefix, self.path.as_str()]);
        mapped::inherit(&mut self.headers, base_headers);
        mapped::inherit(&mut self.params, base_params);
    }
}

impl Expression for Endpoint {
    fn eval_name(&self) -> String {
        format!("endpoint {} {}", self.method, self.name)
    }
}
