use itertools::Itertools;
use log::debug;
use url::Url;

use crate::eval::{EndpointRef, EvalSet, Expression, FileServerRef};
use crate::expr::{Api, AttributeExpr, Hierarchy, HttpService, MappedAttribute, Metadata, Service};

/// Aggregate root of the HTTP API design.
///
/// Explicitly constructed and passed to the front-end and the evaluation
/// driver. Mutated freely during the declaration phase; read-only once
/// evaluation has completed and generators take over.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct HttpApi {
    /// The transport-agnostic design this HTTP layer augments.
    pub api: Api,
    /// Request path prefix common to every endpoint of the API.
    pub path: String,
    /// Mime types accepted by the API endpoints.
    pub consumes: Vec<String>,
    /// Mime types produced by the API endpoints.
    pub produces: Vec<String>,
    /// HTTP services, in declaration order until [HttpApi::walk_sets]
    /// reorders them for evaluation.
    pub services: Vec<HttpService>,
    /// Declared error responses.
    pub errors: Vec<HttpError>,
    pub metadata: Metadata,
    params: AttributeExpr,
    headers: AttributeExpr,
}

/// An error response declared API-wide and exposed to generators.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct HttpError {
    pub name: String,
    pub status: Option<u16>,
    pub description: Option<String>,
    pub attribute: AttributeExpr,
}

impl HttpApi {
    pub fn new(api: Api) -> Self {
        Self {
            api,
            ..Default::default()
        }
    }

    /// The existing node for `service` if present, else a new empty node
    /// created and registered for it. Repeated calls with the same service
    /// name return the same node; the registry never holds two nodes for one
    /// name through this path.
    pub fn service_for(&mut self, service: &Service) -> &mut HttpService {
        match self.services.iter().position(|s| s.name == service.name) {
            Some(index) => &mut self.services[index],
            None => {
                self.services.push(HttpService::new(&service.name));
                self.services
                    .last_mut()
                    .expect("the push above guarantees a last element")
            }
        }
    }

    /// Get a service node by name. Absence is a normal outcome during
    /// incremental construction.
    pub fn service(&self, name: &str) -> Option<&HttpService> {
        self.services.iter().find(|service| service.name == name)
    }

    pub fn service_mut(&mut self, name: &str) -> Option<&mut HttpService> {
        self.services
            .iter_mut()
            .find(|service| service.name == name)
    }

    /// Header declarations common to every endpoint of the API. Always
    /// present; empty until the first header is declared. Field names may use
    /// the `attribute:element` encoding.
    pub fn headers(&self) -> &AttributeExpr {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut AttributeExpr {
        &mut self.headers
    }

    /// Parameter declarations common to every endpoint of the API.
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

    /// Distinct URL schemes across the declared servers, lexicographically
    /// sorted. A server contributes its scheme only when its URL parses;
    /// malformed URLs contribute nothing. Empty when no server declares a
    /// usable scheme.
    pub fn schemes(&self) -> Vec<String> {
        self.api
            .servers
            .iter()
            .filter_map(|server| Url::parse(&server.url).ok())
            .map(|url| url.scheme().to_string())
            .unique()
            .sorted()
            .collect_vec()
    }

    /// Restructure the graph into evaluation order and deliver it to the
    /// driver in three dependency-respecting batches: services (each preceded
    /// by its transitive parents), then every endpoint, then every file
    /// server, both flattened in service order then declaration order.
    ///
    /// The driver is expected to validate and finalize each batch before the
    /// next one; by the time the endpoint and file-server batches arrive all
    /// services are finalized. The service re-sort happens in place and
    /// persists after this call. There is no failure outcome: structural
    /// problems such as parent cycles are left for the driver's validate
    /// pass, and cycle members are delivered in declaration order.
    pub fn walk_sets(&mut self, mut walk: impl FnMut(&EvalSet)) {
        let order = Hierarchy::build(&self.services).sorted_names();
        debug!("service evaluation order: {order:?}");
        self.services.sort_by_key(|service| {
            order
                .iter()
                .position(|name| *name == service.name)
                .unwrap_or(usize::MAX)
        });

        let services = self
            .services
            .iter()
            .map(|service| service.name.clone())
            .collect_vec();
        let endpoints = self
            .services
            .iter()
            .flat_map(|service| {
                (0..service.endpoints.len()).map(|index| EndpointRef {
                    service: service.name.clone(),
                    index,
                })
            })
            .collect_vec();
        let file_servers = self
            .services
            .iter()
            .flat_map(|service| {
                (0..service.file_servers.len()).map(|index| FileServerRef {
                    service: service.name.clone(),
                    index,
                })
            })
            .collect_vec();

        walk(&EvalSet::Services(services));
        walk(&EvalSet::Endpoints(endpoints));
        walk(&EvalSet::FileServers(file_servers));
    }
}

impl Expression for HttpApi {
    fn eval_name(&self) -> String {
        "api".to_string()
    }
}

impl HttpError {
    pub fn new(name: impl ToString, status: u16) -> Self {
        Self {
            name: name.to_string(),
            status: Some(status),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::expr::{Api, HttpApi, Server, Service};

    pub fn api_with_services(names: &[&str]) -> HttpApi {
        let mut root = HttpApi::default();
        for name in names {
            root.api.add_service(Service::new(name));
            root.service_for(&Service::new(name));
        }
        root
    }

    mod service_for {
        use crate::expr::root::tests::api_with_services;
        use crate::expr::{AttributeExpr, HttpApi, Primitive, Service};

        #[test]
        fn creates_once_and_returns_existing() {
            let mut root = HttpApi::default();
            let service = Service::new("files");
            root.service_for(&service).path = "files".to_string();
            root.service_for(&service)
                .headers_mut()
                .set("token", AttributeExpr::primitive(Primitive::Str));

            assert_eq!(root.services.len(), 1);
            let node = root.service("files").unwrap();
            assert_eq!(node.path, "files");
            assert_eq!(
                node.headers().field_names().collect::<Vec<_>>(),
                vec!["token"]
            );
        }

        #[test]
        fn distinct_services_get_distinct_nodes() {
            let root = api_with_services(&["a", "b"]);
            assert_eq!(root.services.len(), 2);
            assert!(root.service("a").is_some());
            assert!(root.service("b").is_some());
            assert!(root.service("c").is_none());
        }
    }

    mod containers {
        use crate::expr::{AttributeExpr, HttpApi, Primitive};

        #[test]
        fn additions_visible_through_later_accesses() {
            let mut root = HttpApi::default();
            assert!(root.headers().is_empty());
            root.headers_mut()
                .set("token:X-Auth", AttributeExpr::primitive(Primitive::Str));
            root.params_mut()
                .set("version", AttributeExpr::primitive(Primitive::Int));

            assert_eq!(
                root.headers().field_names().collect::<Vec<_>>(),
                vec!["token:X-Auth"]
            );
            assert_eq!(root.mapped_headers().element_name("token"), "X-Auth");
            assert_eq!(
                root.params().field_names().collect::<Vec<_>>(),
                vec!["version"]
            );
        }
    }

    mod schemes {
        use crate::expr::{Api, HttpApi, Server};

        fn root_with_urls(urls: &[&str]) -> HttpApi {
            let mut api = Api::new("test");
            for url in urls {
                api.add_server(Server::new(url));
            }
            HttpApi::new(api)
        }

        #[test]
        fn deduplicated_and_sorted() {
            let root = root_with_urls(&[
                "https://example.com",
                "http://example.com",
                "https://other.example.com",
            ]);
            assert_eq!(root.schemes(), vec!["http", "https"]);
        }

        #[test]
        fn malformed_urls_contribute_nothing() {
            let root = root_with_urls(&["https://example.com", "://nope", "not a url"]);
            assert_eq!(root.schemes(), vec!["https"]);
        }

        #[test]
        fn empty_without_servers() {
            let root = HttpApi::default();
            assert!(root.schemes().is_empty());
        }
    }

    mod walk_sets {
        use crate::eval::EvalSet;
        use crate::expr::root::tests::api_with_services;
        use crate::expr::{Endpoint, FileServer, Method};

        #[test]
        fn batches_arrive_in_fixed_order() {
            let mut root = api_with_services(&["a"]);
            let mut kinds = Vec::new();
            root.walk_sets(|set| {
                kinds.push(match set {
                    EvalSet::Services(_) => "services",
                    EvalSet::Endpoints(_) => "endpoints",
                    EvalSet::FileServers(_) => "file servers",
                })
            });
            assert_eq!(kinds, vec!["services", "endpoints", "file servers"]);
        }

        #[test]
        fn parent_precedes_child_and_sort_persists() {
            let mut root = api_with_services(&["child", "other", "parent"]);
            root.service_mut("child").unwrap().parent = Some("parent".to_string());

            let mut service_batch = Vec::new();
            root.walk_sets(|set| {
                if let EvalSet::Services(names) = set {
                    service_batch = names.clone();
                }
            });

            let parent = service_batch.iter().position(|n| n == "parent").unwrap();
            let child = service_batch.iter().position(|n| n == "child").unwrap();
            assert!(parent < child, "actual order: {service_batch:?}");

            // The in-place re-sort persists on the stored list.
            let stored = root.services.iter().map(|s| s.name.clone()).collect::<Vec<_>>();
            assert_eq!(stored, service_batch);
        }

        #[test]
        fn grandchild_follows_the_whole_chain() {
            let mut root = api_with_services(&["gc", "child", "parent"]);
            root.service_mut("gc").unwrap().parent = Some("child".to_string());
            root.service_mut("child").unwrap().parent = Some("parent".to_string());

            let mut service_batch = Vec::new();
            root.walk_sets(|set| {
                if let EvalSet::Services(names) = set {
                    service_batch = names.clone();
                }
            });
            assert_eq!(service_batch, vec!["parent", "child", "gc"]);
        }

        #[test]
        fn endpoints_and_file_servers_flatten_in_service_order() {
            let mut root = api_with_services(&["child", "parent"]);
            root.service_mut("child").unwrap().parent = Some("parent".to_string());
            root.service_mut("child")
                .unwrap()
                .add_endpoint(Endpoint::new("list", Method::Get, ""));
            root.service_mut("parent")
                .unwrap()
                .add_endpoint(Endpoint::new("show", Method::Get, "{id}"));
            root.service_mut("parent")
                .unwrap()
                .add_file_server(FileServer::new("./public", "assets/{*path}"));

            let mut endpoint_services = Vec::new();
            let mut file_server_services = Vec::new();
            root.walk_sets(|set| match set {
                EvalSet::Services(_) => {}
                EvalSet::Endpoints(refs) => {
                    endpoint_services = refs.iter().map(|r| r.service.clone()).collect();
                }
                EvalSet::FileServers(refs) => {
                    file_server_services = refs.iter().map(|r| r.service.clone()).collect();
                }
            });

            assert_eq!(endpoint_services, vec!["parent", "child"]);
            assert_eq!(file_server_services, vec!["parent"]);
        }
    }

    #[test]
    fn new_wraps_the_design() {
        let mut api = Api::new("store");
        api.add_server(Server::new("https://store.example.com"));
        api.add_service(Service::new("inventory"));
        let root = HttpApi::new(api);
        assert_eq!(root.api.name, "store");
        assert!(root.api.service("inventory").is_some());
    }
}
