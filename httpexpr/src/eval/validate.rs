use itertools::Itertools;
use thiserror::Error;

use crate::eval::{EndpointRef, EvalSet, Expression, FileServerRef};
use crate::expr::{Hierarchy, HttpApi};

/// A structural problem in the declared design, attributed to the offending
/// expression's human-readable identity.
#[derive(Error, Debug, Eq, PartialEq)]
pub enum ValidationError {
    #[error("Invalid service name, index #{0}. Service names cannot be empty.")]
    InvalidServiceName(usize),

    #[error("Duplicate service definition: '{0}'")]
    DuplicateService(String),

    #[error("Unknown parent of {0}. Service '{1}' is not defined in the API.")]
    UnknownParent(String, String),

    #[error("Cyclic parent chain through {0}. Parent references must form a forest.")]
    ParentCycle(String),

    #[error("Invalid endpoint name in {0}, index #{1}. Endpoint names cannot be empty.")]
    InvalidEndpointName(String, usize),

    #[error("Duplicate endpoint definition in {0}: '{1}'")]
    DuplicateEndpoint(String, String),

    #[error("Invalid file server in {0}, index #{1}. File paths cannot be empty.")]
    InvalidFilePath(String, usize),
}

/// Structural checks for one evaluation batch.
pub(crate) fn set(root: &HttpApi, set: &EvalSet) -> Vec<ValidationError> {
    match set {
        EvalSet::Services(_) => services(root),
        EvalSet::Endpoints(refs) => endpoints(root, refs),
        EvalSet::FileServers(refs) => file_servers(root, refs),
    }
}

fn services(root: &HttpApi) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for (index, service) in root.services.iter().enumerate() {
        if service.name.is_empty() {
            errors.push(ValidationError::InvalidServiceName(index));
        }
        if let Some(parent) = &service.parent {
            if root.service(parent).is_none() {
                errors.push(ValidationError::UnknownParent(
                    service.eval_name(),
                    parent.clone(),
                ));
            }
        }
    }
    for service in root.services.iter().duplicates_by(|s| s.name.clone()) {
        errors.push(ValidationError::DuplicateService(service.name.clone()));
    }
    for name in Hierarchy::build(&root.services).cycle_members() {
        if let Some(service) = root.service(&name) {
            errors.push(ValidationError::ParentCycle(service.eval_name()));
        }
    }
    errors
}

fn endpoints(root: &HttpApi, refs: &[EndpointRef]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for endpoint_ref in refs {
        let Some(service) = root.service(&endpoint_ref.service) else {
            continue;
        };
        let Some(endpoint) = service.endpoints.get(endpoint_ref.index) else {
            continue;
        };
        if endpoint.name.is_empty() {
            errors.push(ValidationError::InvalidEndpointName(
                service.eval_name(),
                endpoint_ref.index,
            ));
        }
    }
    for service in &root.services {
        for endpoint in service
            .endpoints
            .iter()
            .duplicates_by(|endpoint| endpoint.name.clone())
        {
            errors.push(ValidationError::DuplicateEndpoint(
                service.eval_name(),
                endpoint.name.clone(),
            ));
        }
    }
    errors
}

fn file_servers(root: &HttpApi, refs: &[FileServerRef]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for file_server_ref in refs {
        let Some(service) = root.service(&file_server_ref.service) else {
            continue;
        };
        let Some(file_server) = service.file_servers.get(file_server_ref.index) else {
            continue;
        };
        if file_server.file_path.is_empty() {
            errors.push(ValidationError::InvalidFilePath(
                service.eval_name(),
                file_server_ref.index,
            ));
        }
    }
    errors
}
