//! Operation registry.
//!
//! Built once at startup through [`RegistryBuilder`] and read-only afterwards.
//! Keeps registration order so prompt text built from [`OperationRegistry::describe`]
//! is reproducible.

use std::collections::{HashMap, HashSet};

use serde_json::{Map, Value};

use crate::catalog;
use crate::error::{RegistryError, ValidationError};
use crate::types::{Instruction, OperationSpec};
use crate::validation;

/// Immutable table of supported operations.
#[derive(Debug, Clone, Default)]
pub struct OperationRegistry {
    specs: Vec<OperationSpec>,
    index: HashMap<String, usize>,
}

impl OperationRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Registry holding every built-in catalog.
    pub fn standard() -> Result<Self, RegistryError> {
        Self::from_catalogs(catalog::CATALOG_NAMES)
    }

    /// Registry holding the named catalogs, in the given order.
    pub fn from_catalogs<S: AsRef<str>>(names: &[S]) -> Result<Self, RegistryError> {
        let mut builder = Self::builder();
        for name in names {
            builder = builder.operations(catalog::by_name(name.as_ref())?);
        }
        builder.build()
    }

    /// Look up an operation by exact name.
    pub fn lookup(&self, name: &str) -> Option<&OperationSpec> {
        self.index.get(name).map(|&i| &self.specs[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// All operations in registration order.
    pub fn describe(&self) -> &[OperationSpec] {
        &self.specs
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.specs.iter().map(|s| s.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Validate a candidate operation and its raw parameters.
    ///
    /// Pure: no I/O, no logging side effects beyond `tracing` warnings for
    /// dropped optional values.
    pub fn validate(
        &self,
        operation: &str,
        raw: &Map<String, Value>,
    ) -> Result<Instruction, ValidationError> {
        let spec = self
            .lookup(operation)
            .ok_or_else(|| ValidationError::UnknownOperation(operation.to_string()))?;
        let parameters = validation::validate_parameters(spec, raw)?;
        Ok(Instruction::new(spec.name.clone(), parameters))
    }
}

/// Collects operation specs and checks them before freezing the registry.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    specs: Vec<OperationSpec>,
}

impl RegistryBuilder {
    pub fn operation(mut self, spec: OperationSpec) -> Self {
        self.specs.push(spec);
        self
    }

    pub fn operations(mut self, specs: impl IntoIterator<Item = OperationSpec>) -> Self {
        self.specs.extend(specs);
        self
    }

    /// Freeze the registry.
    ///
    /// Fails on duplicate operation names, duplicate parameter keys within an
    /// operation, or a default whose type differs from its parameter.
    pub fn build(self) -> Result<OperationRegistry, RegistryError> {
        let mut index = HashMap::with_capacity(self.specs.len());

        for (i, spec) in self.specs.iter().enumerate() {
            if index.insert(spec.name.clone(), i).is_some() {
                return Err(RegistryError::DuplicateOperation(spec.name.clone()));
            }

            let mut seen = HashSet::new();
            for param in spec.params() {
                if !seen.insert(param.key.as_str()) {
                    return Err(RegistryError::DuplicateParameter {
                        operation: spec.name.clone(),
                        key: param.key.clone(),
                    });
                }
                if let Some(default) = &param.default {
                    if default.param_type() != param.kind {
                        return Err(RegistryError::DefaultTypeMismatch {
                            operation: spec.name.clone(),
                            key: param.key.clone(),
                            expected: param.kind,
                        });
                    }
                }
            }
        }

        Ok(OperationRegistry {
            specs: self.specs,
            index,
        })
    }
}
