//! The type-resolution seam.
//!
//! The parser does not understand types beyond recognizing a reference to
//! one. Each recognized name is handed to a [`TypeStore`], which interns
//! it and returns an opaque handle that the semantic phase resolves
//! later. [`TypeTable`] is a basic in-memory store so a file can be
//! parsed standalone.

use indexmap::IndexSet;

/// An opaque handle to an interned type reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(u32);

impl TypeId {
    /// The store-assigned index of this handle.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Interface to the semantic layer's type store.
pub trait TypeStore {
    /// Intern a reference to a named type, returning its handle.
    /// The same (package, name) pair always yields the same handle.
    fn intern(&mut self, package: Option<&str>, name: &str) -> TypeId;
}

/// A basic interning [`TypeStore`].
#[derive(Debug, Default)]
pub struct TypeTable {
    names: IndexSet<(Option<String>, String)>,
}

impl TypeTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the (package, name) pair behind a handle.
    pub fn name(&self, id: TypeId) -> Option<(Option<&str>, &str)> {
        self.names
            .get_index(id.index())
            .map(|(pkg, name)| (pkg.as_deref(), name.as_str()))
    }

    /// The number of distinct type references interned so far.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if no references have been interned.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl TypeStore for TypeTable {
    fn intern(&mut self, package: Option<&str>, name: &str) -> TypeId {
        let key = (package.map(str::to_owned), name.to_owned());
        let (index, _) = self.names.insert_full(key);
        TypeId(index as u32)
    }
}
