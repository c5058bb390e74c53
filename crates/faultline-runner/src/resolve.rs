//! Target resolution: from a target descriptor to a bare container id.
//!
//! The orchestration query (namespace/pod/container to a qualified
//! `<scheme>://<id>`) is an external collaborator. In the deployed agent the
//! orchestrator injects the qualified id through configuration, so the
//! production resolver only strips the scheme.

use faultline_common::error::Result;
use faultline_common::types::{ContainerId, TargetDescriptor};

/// Maps a target descriptor to the bare id of the container to inspect.
pub trait TargetResolver: Send + Sync {
    /// Returns the bare container id for the target.
    ///
    /// # Errors
    ///
    /// Returns an error if the target cannot be mapped to a container id.
    fn container_id(&self, target: &TargetDescriptor) -> Result<ContainerId>;
}

/// Resolver over a configuration-supplied qualified container id.
#[derive(Debug, Clone)]
pub struct StaticResolver {
    qualified: String,
}

impl StaticResolver {
    /// Creates a resolver for a `<scheme>://<id>` identifier.
    #[must_use]
    pub fn new(qualified: impl Into<String>) -> Self {
        Self {
            qualified: qualified.into(),
        }
    }
}

impl TargetResolver for StaticResolver {
    fn container_id(&self, target: &TargetDescriptor) -> Result<ContainerId> {
        let id = ContainerId::from_qualified(&self.qualified)?;
        tracing::debug!(
            pod = %target.pod,
            container = %target.container,
            container_id = %id,
            "using configured container id"
        );
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use faultline_common::types::ContainerRuntime;

    use super::*;

    fn target() -> TargetDescriptor {
        TargetDescriptor {
            namespace: "default".into(),
            pod: "web-0".into(),
            container: "app".into(),
            runtime: ContainerRuntime::Containerd,
            interface: "eth0".into(),
        }
    }

    #[test]
    fn static_resolver_strips_scheme() {
        let resolver = StaticResolver::new("containerd://3f9a0c");
        let id = resolver.container_id(&target()).unwrap();
        assert_eq!(id.as_str(), "3f9a0c");
    }

    #[test]
    fn static_resolver_rejects_bare_id() {
        let resolver = StaticResolver::new("3f9a0c");
        assert!(resolver.container_id(&target()).is_err());
    }
}
