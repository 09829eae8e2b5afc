/// The transport-agnostic API design that the HTTP layer augments: the
/// services being exposed and the servers hosting them.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Api {
    pub name: String,
    pub description: Option<String>,
    pub servers: Vec<Server>,
    pub services: Vec<Service>,
}

/// A server hosting the API, declared by URL.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Server {
    pub url: String,
    pub description: Option<String>,
}

/// A transport-agnostic service definition. The HTTP layer references
/// services by name, never by pointer.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Service {
    pub name: String,
    pub description: Option<String>,
}

impl Api {
    pub fn new(name: impl ToString) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn add_server(&mut self, server: Server) {
        self.servers.push(server);
    }

    pub fn add_service(&mut self, service: Service) {
        self.services.push(service);
    }

    /// Get a service by name. Absence is a normal outcome during incremental
    /// construction.
    pub fn service(&self, name: &str) -> Option<&Service> {
        self.services.iter().find(|service| service.name == name)
    }
}

impl Server {
    pub fn new(url: impl ToString) -> Self {
        Self {
            url: url.to_string(),
            description: None,
        }
    }
}

impl Service {
    pub fn new(name: impl ToString) -> Self {
        Self {
            name: name.to_string(),
            description: None,
        }
    }
}
