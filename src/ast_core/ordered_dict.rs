//! Insertion-ordered symbol table owned by scope-bearing nodes.
//!
//! Maps identifier ids to node handles for lookup and keeps every member
//! (named or anonymous) in insertion order. Member order is semantically
//! meaningful downstream: struct field layout and declaration order both
//! read it back verbatim.
use std::collections::HashMap;

use crate::ast_core::interner::SymbolId;
use crate::ast_core::NodeId;

/// Scope symbol table. Binding is first-write-wins: once a name resolves to
/// a handle, later `append` calls under the same name are ignored.
/// Redeclaration detection, if wanted, happens in the caller before `append`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct OrderedDict {
    map: HashMap<SymbolId, NodeId>,
    nodes: Vec<NodeId>,
}

impl OrderedDict {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `node` and record the member, unless the name is
    /// already bound (no-op in that case).
    pub fn append(&mut self, name: SymbolId, node: NodeId) {
        if self.map.contains_key(&name) {
            tracing::trace!("ignoring duplicate binding for symbol {}", name.0);
            return;
        }
        self.map.insert(name, node);
        self.nodes.push(node);
    }

    /// Record a member that does not participate in name lookup.
    pub fn append_anon(&mut self, node: NodeId) {
        self.nodes.push(node);
    }

    /// Handle bound to `name`, if any. Never fails.
    pub fn find(&self, name: SymbolId) -> Option<NodeId> {
        self.map.get(&name).copied()
    }

    /// All members, named and anonymous, in insertion order.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
