//! Import action determination logic

use crate::resource::{LocalResourceFile, RemoteResource, ResourceDescriptor, ResourceKind};

/// Remote call chosen for a local resource file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportAction {
    /// No deployed resource matches; create one
    Create,
    /// Replace the deployed resource with this id
    Update {
        /// Server-assigned id of the match
        id: String,
    },
}

impl From<&ResourceDescriptor> for ImportAction {
    fn from(descriptor: &ResourceDescriptor) -> Self {
        descriptor
            .remote_id
            .as_ref()
            .map_or(Self::Create, |id| Self::Update { id: id.clone() })
    }
}

/// Matches file-derived names against deployed resources
pub struct ImportActionResolver;

impl ImportActionResolver {
    /// Describe a local file, attaching the id of its deployed match
    ///
    /// Deployed entries are matched by name. Synthetic entries also match
    /// by id, so a resident entry exported as `LOCAL.yml` updates in place.
    #[must_use]
    pub fn resolve(
        kind: ResourceKind,
        file: &LocalResourceFile,
        deployed: &[RemoteResource],
        synthetic: &[RemoteResource],
    ) -> ResourceDescriptor {
        let remote_id = deployed
            .iter()
            .find(|r| r.name == file.name)
            .or_else(|| {
                synthetic
                    .iter()
                    .find(|r| r.name == file.name || r.id == file.name)
            })
            .map(|r| r.id.clone());

        ResourceDescriptor {
            kind,
            remote_id,
            name: file.name.clone(),
            format: file.format,
        }
    }
}
