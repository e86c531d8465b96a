use thiserror::Error;

/// Fatal problems found while assembling a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    /// A name was registered as two different kinds of scope.
    #[error("identifier `{name}` already exists as a {existing}{}", defined_in(.location))]
    ScopeConflict {
        name: String,
        existing: &'static str,
        /// Source file of the scope that was there first.
        location: Option<String>,
    },

    /// A scope was referenced on a path but never defined by its own record.
    #[error("scope `{0}` is referenced but never defined")]
    UndefinedScope(String),

    /// A class, struct, union or enum was created without a name.
    #[error("cannot create an unnamed {0}")]
    UnnamedScope(&'static str),
}

fn defined_in(location: &Option<String>) -> String {
    match location {
        Some(file) => format!(" (defined in {})", file),
        None => String::new(),
    }
}
