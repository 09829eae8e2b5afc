use crate::eval::Expression;
use crate::expr::{has_wildcard, join_paths, Metadata};

/// An endpoint serving static assets straight from the filesystem.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct FileServer {
    /// Filesystem path of the served asset(s).
    pub file_path: String,
    /// Request path serving the assets. Declared relative to the owning
    /// service prefix; absolute with a single leading slash after finalize.
    pub request_path: String,
    pub description: Option<String>,
    pub metadata: Metadata,
}

impl FileServer {
    pub fn new(file_path: impl ToString, request_path: impl ToString) -> Self {
        Self {
            file_path: file_path.to_string(),
            request_path: request_path.to_string(),
            ..Default::default()
        }
    }

    /// Normalize the request path against the already-finalized API + service
    /// prefix. Runs after the owning service's own prefix has stabilized.
    /// Malformed declared paths simply normalize to whatever joining and
    /// leading-slash enforcement produce.
    pub(crate) fn finalize(&mut self, prefix: &str) {
        self.request_path = join_paths([prefix, self.request_path.as_str()]);
    }

    /// True when this file server serves a directory tree: by convention a
    /// wildcard segment in the request path stands for the remaining
    /// sub-path. Without a wildcard exactly one file is served.
    pub fn is_dir(&self) -> bool {
        has_wildcard(&self.request_path)
    }
}

impl Expression for FileServer {
    fn eval_name(&self) -> String {
        format!("file server {}", self.file_path)
    }
}
