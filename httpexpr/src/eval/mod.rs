//! The two-phase evaluation driver: enumerates the expression graph in
//! dependency order via [HttpApi::walk_sets], validates every batch, and
//! finalizes it before the next batch is processed.

use anyhow::{anyhow, Result};
use itertools::Itertools;
use log::{debug, error, info};
use serde::{Deserialize, Serialize};

pub use validate::ValidationError;

use crate::expr::{join_paths, mapped, HttpApi};

mod validate;

/// Human-readable identity of an expression, used to attribute diagnostics
/// to a location in the design.
pub trait Expression {
    fn eval_name(&self) -> String;
}

/// Addresses one endpoint in the graph by owning service name and
/// declaration index.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct EndpointRef {
    pub service: String,
    pub index: usize,
}

/// Addresses one file server in the graph by owning service name and
/// declaration index.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FileServerRef {
    pub service: String,
    pub index: usize,
}

/// One dependency-respecting batch of expressions delivered by
/// [HttpApi::walk_sets]. Each batch is independently validate-then-finalizable
/// by the driver.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum EvalSet {
    Services(Vec<String>),
    Endpoints(Vec<EndpointRef>),
    FileServers(Vec<FileServerRef>),
}

impl EvalSet {
    pub fn label(&self) -> &'static str {
        match self {
            EvalSet::Services(_) => "services",
            EvalSet::Endpoints(_) => "endpoints",
            EvalSet::FileServers(_) => "file servers",
        }
    }
}

/// Driver configuration.
#[derive(Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Prints the design before validation runs. Useful for debugging
    /// validation failures.
    pub debug_pre_validate_print: PreValidatePrint,
}

#[derive(Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum PreValidatePrint {
    #[default]
    None,

    /// Print the design using [std::fmt::Debug]. Verbose, but complete.
    Debug,
}

/// Run the two-phase evaluation over `root`.
///
/// Batches arrive parent-before-child (services), then endpoints, then file
/// servers; each batch is fully validated and, when clean, finalized before
/// the next one is processed. Service finalize may therefore read the
/// parent's effective values, and endpoint/file-server finalize may assume
/// every service is done. Returns the failing batch's errors without touching
/// later batches.
pub fn execute(root: &mut HttpApi, config: &Config) -> Result<(), Vec<ValidationError>> {
    if let PreValidatePrint::Debug = config.debug_pre_validate_print {
        println!("pre-validation design: {root:#?}");
    }

    let mut sets = Vec::new();
    root.walk_sets(|set| sets.push(set.clone()));

    for set in &sets {
        info!("validating {}...", set.label());
        let errors = validate::set(root, set);
        if !errors.is_empty() {
            error!("validation of {} failed: {} error(s)", set.label(), errors.len());
            return Err(errors);
        }
        info!("finalizing {}...", set.label());
        finalize(root, set);
    }
    Ok(())
}

/// [execute], with validation failures folded into a single error listing
/// every offending expression.
pub fn check(root: &mut HttpApi, config: &Config) -> Result<()> {
    execute(root, config)
        .map_err(|errors| anyhow!("API validation failed.\n{}", errors_to_string(&errors)))
}

fn errors_to_string(errors: &[ValidationError]) -> String {
    errors.iter().map(|error| format!("{error}")).join("\n")
}

fn finalize(root: &mut HttpApi, set: &EvalSet) {
    match set {
        EvalSet::Services(names) => {
            for name in names {
                finalize_service(root, name);
            }
        }
        EvalSet::Endpoints(refs) => {
            for endpoint_ref in refs {
                finalize_endpoint(root, endpoint_ref);
            }
        }
        EvalSet::FileServers(refs) => {
            for file_server_ref in refs {
                finalize_file_server(root, file_server_ref);
            }
        }
    }
}

/// Folds the parent's finalized path and attribute containers into the child.
/// Root-level services keep their declared prefix untouched.
fn finalize_service(root: &mut HttpApi, name: &str) {
    let Some(service) = root.service(name) else {
        return;
    };
    let Some(parent_name) = service.parent.clone() else {
        return;
    };
    let Some(parent) = root.service(&parent_name) else {
        return;
    };
    let parent_path = parent.path.clone();
    let parent_headers = parent.headers().clone();
    let parent_params = parent.params().clone();
    if let Some(service) = root.service_mut(name) {
        service.inherit(&parent_path, &parent_headers, &parent_params);
        debug!("finalized {}: path {}", service.eval_name(), service.path);
    }
}

fn finalize_endpoint(root: &mut HttpApi, endpoint_ref: &EndpointRef) {
    let Some(service) = root.service(&endpoint_ref.service) else {
        return;
    };
    let prefix = join_paths([root.path.as_str(), service.path.as_str()]);
    let mut base_headers = service.headers().clone();
    mapped::inherit(&mut base_headers, root.headers());
    let mut base_params = service.params().clone();
    mapped::inherit(&mut base_params, root.params());

    let Some(service) = root.service_mut(&endpoint_ref.service) else {
        return;
    };
    if let Some(endpoint) = service.endpoints.get_mut(endpoint_ref.index) {
        endpoint.finalize(&prefix, &base_headers, &base_params);
        debug!("finalized {}: path {}", endpoint.eval_name(), endpoint.path);
    }
}

fn finalize_file_server(root: &mut HttpApi, file_server_ref: &FileServerRef) {
    let Some(service) = root.service(&file_server_ref.service) else {
        return;
    };
    let prefix = join_paths([root.path.as_str(), service.path.as_str()]);

    let Some(service) = root.service_mut(&file_server_ref.service) else {
        return;
    };
    if let Some(file_server) = service.file_servers.get_mut(file_server_ref.index) {
        file_server.finalize(&prefix);
        debug!(
            "finalized {}: path {}",
            file_server.eval_name(),
            file_server.request_path
        );
    }
}
