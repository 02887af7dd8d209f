//! Recording handler double for engine tests

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};

use crate::error::{Result, SyncError};
use crate::handler::{ExportedFile, ResourceHandler, ResourceUpload};
use crate::resource::{Format, RemoteResource, ResourceKind};

/// Handler operation, used to script failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    List,
    Export,
    Create,
    Update,
    Delete,
}

/// Scripted failure kinds
#[derive(Debug, Clone, Copy)]
pub enum Failure {
    Conflict,
    Auth,
    Server,
    Transport,
}

impl Failure {
    fn error(self, resource: &str) -> SyncError {
        let resource = resource.to_string();
        match self {
            Self::Conflict => SyncError::Conflict { resource },
            Self::Auth => SyncError::Auth {
                resource,
                status: 401,
            },
            Self::Server => SyncError::Server { resource },
            Self::Transport => SyncError::Transport {
                resource,
                message: "connection refused".to_string(),
            },
        }
    }
}

/// One recorded handler call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List,
    Export { id: String },
    Create { name: String, content: String },
    Update { id: String, name: String, content: String },
    Delete { id: String },
}

/// In-memory server for one resource type
///
/// Creates and deletes mutate the deployed set, so consecutive passes see
/// the effect of earlier ones.
pub struct MockHandler {
    kind: ResourceKind,
    deployed: RefCell<Vec<RemoteResource>>,
    list_script: RefCell<VecDeque<Vec<RemoteResource>>>,
    exports: HashMap<String, ExportedFile>,
    failures: HashMap<(Op, String), Failure>,
    calls: RefCell<Vec<Call>>,
    next_id: Cell<usize>,
}

impl MockHandler {
    pub fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            deployed: RefCell::new(Vec::new()),
            list_script: RefCell::new(VecDeque::new()),
            exports: HashMap::new(),
            failures: HashMap::new(),
            calls: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
        }
    }

    /// Seed deployed resources as `(id, name)` pairs
    pub fn with_deployed(self, items: &[(&str, &str)]) -> Self {
        self.deployed
            .borrow_mut()
            .extend(items.iter().map(|(id, name)| RemoteResource::new(*id, *name)));
        self
    }

    /// Serve `content` as the export of resource `id`
    pub fn with_export(mut self, id: &str, file_name: &str, content: &str) -> Self {
        self.exports.insert(
            id.to_string(),
            ExportedFile {
                file_name: file_name.to_string(),
                content: content.to_string(),
            },
        );
        self
    }

    /// Answer the next `list()` calls with these snapshots, in order
    pub fn with_list_responses(self, responses: Vec<Vec<RemoteResource>>) -> Self {
        self.list_script.borrow_mut().extend(responses);
        self
    }

    /// Fail `op` for the named resource (the type's dir name for `List`)
    pub fn failing(mut self, op: Op, name: &str, failure: Failure) -> Self {
        self.failures.insert((op, name.to_string()), failure);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, op: Op) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| {
                matches!(
                    (op, call),
                    (Op::List, Call::List)
                        | (Op::Export, Call::Export { .. })
                        | (Op::Create, Call::Create { .. })
                        | (Op::Update, Call::Update { .. })
                        | (Op::Delete, Call::Delete { .. })
                )
            })
            .count()
    }

    pub fn deployed_names(&self) -> Vec<String> {
        self.deployed.borrow().iter().map(|r| r.name.clone()).collect()
    }

    fn check(&self, op: Op, name: &str) -> Result<()> {
        match self.failures.get(&(op, name.to_string())) {
            Some(failure) => Err(failure.error(name)),
            None => Ok(()),
        }
    }
}

impl ResourceHandler for MockHandler {
    fn kind(&self) -> ResourceKind {
        self.kind
    }

    fn list(&self) -> Result<Vec<RemoteResource>> {
        self.calls.borrow_mut().push(Call::List);
        self.check(Op::List, self.kind.dir_name())?;
        if let Some(scripted) = self.list_script.borrow_mut().pop_front() {
            return Ok(scripted);
        }
        Ok(self.deployed.borrow().clone())
    }

    fn export(
        &self,
        resource: &RemoteResource,
        format: Format,
        _exclude_secrets: bool,
    ) -> Result<ExportedFile> {
        self.calls.borrow_mut().push(Call::Export {
            id: resource.id.clone(),
        });
        self.check(Op::Export, &resource.name)?;
        Ok(self.exports.get(&resource.id).cloned().unwrap_or_else(|| ExportedFile {
            file_name: format!("{}.{}", resource.name, format.extension()),
            content: format!("{}: {}\n", self.kind.identifying_field(), resource.name),
        }))
    }

    fn create(&self, upload: &ResourceUpload<'_>) -> Result<()> {
        self.calls.borrow_mut().push(Call::Create {
            name: upload.name.to_string(),
            content: upload.content.to_string(),
        });
        self.check(Op::Create, upload.name)?;
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.deployed
            .borrow_mut()
            .push(RemoteResource::new(format!("gen-{id}"), upload.name));
        Ok(())
    }

    fn update(&self, id: &str, upload: &ResourceUpload<'_>) -> Result<()> {
        self.calls.borrow_mut().push(Call::Update {
            id: id.to_string(),
            name: upload.name.to_string(),
            content: upload.content.to_string(),
        });
        self.check(Op::Update, upload.name)
    }

    fn delete(&self, resource: &RemoteResource) -> Result<()> {
        self.calls.borrow_mut().push(Call::Delete {
            id: resource.id.clone(),
        });
        self.check(Op::Delete, &resource.name)?;
        self.deployed.borrow_mut().retain(|r| r.id != resource.id);
        Ok(())
    }
}
