//! Scope tree: namespaces, classes and enums, held in an index arena.
//!
//! Scopes are addressed by [`ScopeId`]; the root is an unnamed namespace.
//! Children are keyed by their unqualified name, so a name maps to exactly
//! one scope at each level.

use crate::member::{Member, Visibility};
use crate::template::TemplateList;
use cxxapi_syntax::{base_name, parse_qualified_path, NameResolver};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructKeyword {
    Class,
    Struct,
    Union,
}

impl StructKeyword {
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "class" => Some(Self::Class),
            "struct" => Some(Self::Struct),
            "union" => Some(Self::Union),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Struct => "struct",
            Self::Union => "union",
        }
    }
}

impl fmt::Display for StructKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseClass {
    pub name: String,
    pub protection: Visibility,
    pub is_virtual: bool,
}

impl fmt::Display for BaseClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.protection.as_str())?;
        if self.is_virtual {
            f.write_str(" virtual")?;
        }
        write!(f, " {}", self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeKind {
    Namespace,
    StructLike {
        keyword: StructKeyword,
        bases: Vec<BaseClass>,
        template: Option<TemplateList>,
    },
    Enum {
        underlying: Option<String>,
    },
    /// Stand-in for a scope seen on someone else's path but not yet defined.
    Temporary,
}

impl ScopeKind {
    pub fn struct_like(keyword: StructKeyword) -> Self {
        Self::StructLike {
            keyword,
            bases: Vec::new(),
            template: None,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Self::Namespace => "namespace",
            Self::StructLike { keyword, .. } => keyword.as_str(),
            Self::Enum { .. } => "enum",
            Self::Temporary => "temporary",
        }
    }

    pub fn is_temporary(&self) -> bool {
        matches!(self, Self::Temporary)
    }
}

#[derive(Debug, Clone)]
pub struct Scope {
    name: Option<String>,
    pub kind: ScopeKind,
    parent: Option<ScopeId>,
    children: BTreeMap<String, ScopeId>,
    members: Vec<Member>,
    member_names: HashSet<String>,
    pub location: Option<String>,
}

impl Scope {
    fn new(name: Option<String>, kind: ScopeKind, parent: Option<ScopeId>) -> Self {
        Self {
            name,
            kind,
            parent,
            children: BTreeMap::new(),
            members: Vec::new(),
            member_names: HashSet::new(),
            location: None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    /// Children in name order.
    pub fn children(&self) -> impl Iterator<Item = ScopeId> + '_ {
        self.children.values().copied()
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn add_member(&mut self, member: Member) {
        self.member_names.insert(member.name.clone());
        self.members.push(member);
    }

    /// Keep only the members for which `keep` returns true.
    pub fn retain_members(&mut self, keep: impl FnMut(&Member) -> bool) {
        self.members.retain(keep);
        self.member_names = self.members.iter().map(|m| m.name.clone()).collect();
    }
}

// -- Tree ---------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTree {
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::new(None, ScopeKind::Namespace, None)],
        }
    }

    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn get(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    pub fn get_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.0]
    }

    pub fn child(&self, parent: ScopeId, name: &str) -> Option<ScopeId> {
        self.get(parent).children.get(name).copied()
    }

    /// Add a child scope. The caller has checked that the name is free.
    pub fn insert_child(&mut self, parent: ScopeId, name: &str, kind: ScopeKind) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope::new(Some(name.to_string()), kind, Some(parent)));
        self.get_mut(parent).children.insert(name.to_string(), id);
        id
    }

    /// Walk `path` from the root, creating [`ScopeKind::Temporary`] scopes for
    /// segments that do not exist yet.
    pub fn ensure_scope<S: AsRef<str>>(&mut self, path: &[S]) -> ScopeId {
        let mut current = self.root();
        for segment in path {
            let segment = segment.as_ref();
            current = match self.child(current, segment) {
                Some(child) => child,
                None => self.insert_child(current, segment, ScopeKind::Temporary),
            };
        }
        current
    }

    /// `"ns::Outer::Inner"`; empty for the root.
    pub fn qualified_name(&self, id: ScopeId) -> String {
        let mut path = Vec::new();
        let mut current = Some(id);
        while let Some(scope_id) = current {
            let scope = self.get(scope_id);
            if let Some(name) = scope.name() {
                path.push(name);
            }
            current = scope.parent;
        }
        path.reverse();
        path.join("::")
    }

    /// Every scope, parents before children, siblings in name order.
    pub fn walk(&self) -> Vec<ScopeId> {
        let mut order = Vec::with_capacity(self.scopes.len());
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            order.push(id);
            let children: Vec<ScopeId> = self.get(id).children().collect();
            stack.extend(children.into_iter().rev());
        }
        order
    }

    /// Resolve `name` as seen from inside scope `from`.
    ///
    /// The first path segment (template arguments stripped) is looked up in
    /// `from` and then in each enclosing scope; the first scope that has it
    /// anchors the result. The remaining segments are followed downwards. A
    /// segment naming a member of the current scope ends the walk: whatever
    /// follows is taken as is.
    ///
    /// Template arguments in the input are kept verbatim.
    pub fn qualify_name(&self, from: ScopeId, name: &str) -> Option<String> {
        if name.is_empty() {
            return None;
        }
        let path = parse_qualified_path(name);
        let first = base_name(path.first()?);

        let mut anchor = Some(from);
        while let Some(id) = anchor {
            if self.get(id).children.contains_key(first) {
                break;
            }
            anchor = self.get(id).parent;
        }
        let anchor = anchor?;

        let mut current = anchor;
        let mut matched: Vec<&str> = Vec::with_capacity(path.len());
        for (i, segment) in path.iter().enumerate() {
            let base = base_name(segment);
            let scope = self.get(current);
            if let Some(child) = scope.children.get(base) {
                matched.push(segment);
                current = *child;
            } else if scope.member_names.contains(base) {
                matched.extend(path[i..].iter().map(String::as_str));
                break;
            } else {
                return None;
            }
        }

        let prefix = self.qualified_name(anchor);
        let joined = matched.join("::");
        Some(if prefix.is_empty() {
            joined
        } else {
            format!("{}::{}", prefix, joined)
        })
    }

    /// A [`NameResolver`] anchored at `scope`.
    pub fn resolver(&self, scope: ScopeId) -> ScopeResolver<'_> {
        ScopeResolver { tree: self, scope }
    }

    /// Qualify the members of `id` and of every scope below it.
    pub fn close(&mut self, id: ScopeId) {
        for scope_id in self.walk_from(id) {
            // Lookups only need member names, which stay in place.
            let mut members = std::mem::take(&mut self.get_mut(scope_id).members);
            let resolver = self.resolver(scope_id);
            for member in &mut members {
                member.close(&resolver);
            }
            self.get_mut(scope_id).members = members;
        }
    }

    fn walk_from(&self, id: ScopeId) -> Vec<ScopeId> {
        let mut order = Vec::new();
        let mut stack = vec![id];
        while let Some(scope_id) = stack.pop() {
            order.push(scope_id);
            stack.extend(self.get(scope_id).children());
        }
        order
    }
}

/// Name lookup from one scope of a [`ScopeTree`].
#[derive(Debug, Clone, Copy)]
pub struct ScopeResolver<'a> {
    tree: &'a ScopeTree,
    scope: ScopeId,
}

impl NameResolver for ScopeResolver<'_> {
    fn qualify_name(&self, name: &str) -> Option<String> {
        self.tree.qualify_name(self.scope, name)
    }
}
