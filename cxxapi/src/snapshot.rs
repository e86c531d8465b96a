//! Snapshot assembly: scope creation, finalisation and rendering.
//!
//! A [`Snapshot`] is filled in any order. [`Snapshot::finish`] checks that
//! every scope mentioned along the way was defined, qualifies every member
//! and hands back an [`ApiSnapshot`], which only renders.

use crate::config::SnapshotConfig;
use crate::error::SnapshotError;
use crate::member::{Member, MemberKind, RenderOptions};
use crate::natural::natural_sort;
use crate::scope::{ScopeId, ScopeKind, ScopeTree, StructKeyword};
use cxxapi_syntax::parse_qualified_path;
use std::collections::BTreeMap;
use tracing::{debug, info};

#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    tree: ScopeTree,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tree(&self) -> &ScopeTree {
        &self.tree
    }

    pub fn root(&self) -> ScopeId {
        self.tree.root()
    }

    pub fn ensure_scope<S: AsRef<str>>(&mut self, path: &[S]) -> ScopeId {
        self.tree.ensure_scope(path)
    }

    pub fn set_location(&mut self, scope: ScopeId, location: Option<&str>) {
        if let Some(location) = location.filter(|l| !l.is_empty()) {
            self.tree.get_mut(scope).location = Some(location.to_string());
        }
    }

    pub fn scope_kind_mut(&mut self, scope: ScopeId) -> &mut ScopeKind {
        &mut self.tree.get_mut(scope).kind
    }

    pub fn add_member(&mut self, scope: ScopeId, member: Member) {
        self.tree.get_mut(scope).add_member(member);
    }

    /// Register a class, struct or union. A placeholder left by an earlier
    /// path is promoted; any other existing scope of that name is a conflict.
    pub fn create_struct_like(
        &mut self,
        qualified_name: &str,
        keyword: StructKeyword,
    ) -> Result<ScopeId, SnapshotError> {
        self.create(qualified_name, ScopeKind::struct_like(keyword))
    }

    pub fn create_enum(&mut self, qualified_name: &str) -> Result<ScopeId, SnapshotError> {
        self.create(qualified_name, ScopeKind::Enum { underlying: None })
    }

    /// Namespaces are reopened freely: asking again returns the same scope.
    /// The empty name is the root.
    pub fn create_or_get_namespace(&mut self, qualified_name: &str) -> Result<ScopeId, SnapshotError> {
        let path = parse_qualified_path(qualified_name);
        let Some((name, prefix)) = path.split_last() else {
            return Ok(self.root());
        };
        let parent = self.tree.ensure_scope(prefix);

        match self.tree.child(parent, name) {
            None => Ok(self.tree.insert_child(parent, name, ScopeKind::Namespace)),
            Some(id) if self.tree.get(id).kind == ScopeKind::Namespace => Ok(id),
            Some(id) if self.tree.get(id).kind.is_temporary() => {
                debug!(scope = %qualified_name, "promoted placeholder to namespace");
                self.tree.get_mut(id).kind = ScopeKind::Namespace;
                Ok(id)
            }
            Some(id) => Err(self.conflict(id)),
        }
    }

    fn create(&mut self, qualified_name: &str, kind: ScopeKind) -> Result<ScopeId, SnapshotError> {
        let path = parse_qualified_path(qualified_name);
        let Some((name, prefix)) = path.split_last() else {
            return Err(SnapshotError::UnnamedScope(kind.describe()));
        };
        let parent = self.tree.ensure_scope(prefix);

        match self.tree.child(parent, name) {
            None => Ok(self.tree.insert_child(parent, name, kind)),
            Some(id) if self.tree.get(id).kind.is_temporary() => {
                debug!(scope = %qualified_name, kind = kind.describe(), "promoted placeholder");
                self.tree.get_mut(id).kind = kind;
                Ok(id)
            }
            Some(id) => Err(self.conflict(id)),
        }
    }

    fn conflict(&self, existing: ScopeId) -> SnapshotError {
        let scope = self.tree.get(existing);
        SnapshotError::ScopeConflict {
            name: self.tree.qualified_name(existing),
            existing: scope.kind.describe(),
            location: scope.location.clone(),
        }
    }

    /// Validate, prune and qualify.
    ///
    /// Fails on the first scope (parents before children) that is still a
    /// placeholder. Static free functions and operators are dropped from
    /// namespaces: they have internal linkage and are not part of the API.
    pub fn finish(mut self) -> Result<ApiSnapshot, SnapshotError> {
        let order = self.tree.walk();
        if let Some(undefined) = order.iter().find(|id| self.tree.get(**id).kind.is_temporary()) {
            return Err(SnapshotError::UndefinedScope(self.tree.qualified_name(*undefined)));
        }

        for id in &order {
            let scope = self.tree.get_mut(*id);
            if scope.kind == ScopeKind::Namespace {
                scope.retain_members(|m| {
                    !(matches!(m.kind(), MemberKind::Function | MemberKind::Operator) && m.is_static())
                });
            }
        }

        let root = self.tree.root();
        self.tree.close(root);

        let mut counts: BTreeMap<MemberKind, usize> = BTreeMap::new();
        for id in &order {
            for member in self.tree.get(*id).members() {
                *counts.entry(member.kind()).or_default() += 1;
            }
        }
        let summary: Vec<String> = counts
            .iter()
            .map(|(kind, count)| format!("{} {}", count, kind.as_str()))
            .collect();
        info!(scopes = order.len(), members = %summary.join(", "), "snapshot finished");

        Ok(ApiSnapshot { tree: self.tree })
    }
}

/// A finished, fully qualified snapshot.
#[derive(Debug, Clone)]
pub struct ApiSnapshot {
    tree: ScopeTree,
}

impl ApiSnapshot {
    pub fn tree(&self) -> &ScopeTree {
        &self.tree
    }

    /// The whole document, ending in exactly one newline.
    pub fn render(&self, config: &SnapshotConfig) -> String {
        let text = self.render_scope(self.tree.root(), config);
        format!("{}\n", text.trim_end())
    }

    /// The scope's own block and its children's, naturally sorted together.
    fn render_scope(&self, id: ScopeId, config: &SnapshotConfig) -> String {
        let mut blocks = vec![self.render_block(id, config)];
        for child in self.tree.get(id).children() {
            blocks.push(self.render_scope(child, config));
        }
        natural_sort(&mut blocks);
        blocks.join("\n\n").trim().to_string()
    }

    fn render_block(&self, id: ScopeId, config: &SnapshotConfig) -> String {
        let scope = self.tree.get(id);
        let qualified = self.tree.qualified_name(id);

        match &scope.kind {
            ScopeKind::Namespace => {
                let options = RenderOptions {
                    indent: 0,
                    qualification: Some(qualified.as_str()),
                    hide_visibility: true,
                    store_initializers: config.store_initializers,
                };
                let mut lines: Vec<String> = scope.members().iter().map(|m| m.render(&options)).collect();
                natural_sort(&mut lines);
                lines.join("\n")
            }
            ScopeKind::StructLike {
                keyword,
                bases,
                template,
            } => {
                let mut out = String::new();
                if let Some(template) = template {
                    out.push_str(&format!("\n{}\n", template));
                }
                out.push_str(&format!("{} {}", keyword, qualified));
                if !bases.is_empty() {
                    let bases: Vec<String> = bases.iter().map(ToString::to_string).collect();
                    out.push_str(&format!(" : {}", bases.join(", ")));
                }
                out.push_str(" {");
                out.push_str(&self.render_members(id, config, ""));
                out.push_str("\n}");
                out
            }
            ScopeKind::Enum { underlying } => {
                let mut out = format!("\nenum {}", qualified);
                if let Some(ty) = underlying.as_deref().filter(|t| !t.is_empty()) {
                    out.push_str(&format!(" : {}", ty));
                }
                out.push_str(" {");
                out.push_str(&self.render_members(id, config, ","));
                out.push_str("\n}");
                out
            }
            // Never present once `finish` has succeeded.
            ScopeKind::Temporary => String::new(),
        }
    }

    /// Members indented by two, one per line, with a leading newline when
    /// there are any.
    fn render_members(&self, id: ScopeId, config: &SnapshotConfig, terminator: &str) -> String {
        let options = RenderOptions {
            indent: 2,
            qualification: None,
            hide_visibility: false,
            store_initializers: config.store_initializers,
        };
        let mut lines: Vec<String> = self
            .tree
            .get(id)
            .members()
            .iter()
            .map(|m| format!("{}{}", m.render(&options), terminator))
            .collect();
        if lines.is_empty() {
            return String::new();
        }
        natural_sort(&mut lines);
        format!("\n{}", lines.join("\n"))
    }
}
