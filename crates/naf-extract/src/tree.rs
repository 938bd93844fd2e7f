//! Classification tree
//!
//! A tree is a `Vec<ClassificationNode>` of roots. Children are only created
//! through [`ClassificationNode::add_child`], which derives the child's kind
//! from its parent, so a sector can only hold divisions, a division groups, a
//! group classes, and a class nothing.

use naf_common::{Nomenclature, NodeKind};
use std::collections::BTreeMap;

/// Attributes carried by class nodes only
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassExtras {
    /// Activity requires a registration or qualification
    pub regulated: bool,
    /// Registration identifier, if any
    pub registration: Option<String>,
    /// Alternate registration identifier, if any
    pub registration_alt: Option<String>,
}

/// A node of a classification tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationNode {
    pub title: String,
    pub code: String,
    pub source: Nomenclature,
    pub kind: NodeKind,
    extras: Option<ClassExtras>,
    children: Vec<ClassificationNode>,
}

impl ClassificationNode {
    fn new(
        kind: NodeKind,
        code: impl Into<String>,
        title: impl Into<String>,
        source: Nomenclature,
    ) -> Self {
        Self {
            title: title.into(),
            code: code.into(),
            source,
            kind,
            extras: kind.is_class().then(ClassExtras::default),
            children: Vec::new(),
        }
    }

    /// Root of the primary hierarchy
    pub fn sector(code: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(NodeKind::Sector, code, title, Nomenclature::All)
    }

    /// Root of the liberal-profession taxonomy
    pub fn liberal_sector(code: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(NodeKind::LiberalSector, code, title, Nomenclature::Liberal)
    }

    /// Append a child of the kind this node holds
    ///
    /// Returns `None` for class nodes, which have no children.
    pub fn add_child(
        &mut self,
        code: impl Into<String>,
        title: impl Into<String>,
        source: Nomenclature,
    ) -> Option<&mut ClassificationNode> {
        let kind = self.kind.child_kind()?;
        self.children.push(Self::new(kind, code, title, source));
        self.children.last_mut()
    }

    pub fn children(&self) -> &[ClassificationNode] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [ClassificationNode] {
        &mut self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn extras(&self) -> Option<&ClassExtras> {
        self.extras.as_ref()
    }

    /// Replace class attributes; ignored on non-class nodes
    pub fn set_extras(&mut self, extras: ClassExtras) {
        if self.kind.is_class() {
            self.extras = Some(extras);
        }
    }

    /// Direct child with exactly this code
    pub fn find_child(&self, code: &str) -> Option<&ClassificationNode> {
        self.children.iter().find(|child| child.code == code)
    }

    pub fn find_child_mut(&mut self, code: &str) -> Option<&mut ClassificationNode> {
        self.children.iter_mut().find(|child| child.code == code)
    }

    /// This node or any descendant with exactly this code, depth first
    pub fn find_by_code(&self, code: &str) -> Option<&ClassificationNode> {
        if self.code == code {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find_by_code(code))
    }

    /// Whether every child has the kind its parent holds, recursively
    pub fn is_well_formed(&self) -> bool {
        match self.kind.child_kind() {
            None => self.children.is_empty(),
            Some(expected) => self
                .children
                .iter()
                .all(|child| child.kind == expected && child.is_well_formed()),
        }
    }

    fn visit<'a>(&'a self, f: &mut impl FnMut(&'a ClassificationNode)) {
        f(self);
        for child in &self.children {
            child.visit(f);
        }
    }
}

/// Root with exactly this code
pub fn find_root<'a>(roots: &'a [ClassificationNode], code: &str) -> Option<&'a ClassificationNode> {
    roots.iter().find(|root| root.code == code)
}

pub fn find_root_mut<'a>(
    roots: &'a mut [ClassificationNode],
    code: &str,
) -> Option<&'a mut ClassificationNode> {
    roots.iter_mut().find(|root| root.code == code)
}

/// Any node with exactly this code, searching roots in order, depth first
pub fn find_in_tree<'a>(
    roots: &'a [ClassificationNode],
    code: &str,
) -> Option<&'a ClassificationNode> {
    roots.iter().find_map(|root| root.find_by_code(code))
}

/// Number of nodes of each kind
pub fn count_by_kind(roots: &[ClassificationNode]) -> BTreeMap<NodeKind, usize> {
    let mut counts = BTreeMap::new();
    for root in roots {
        root.visit(&mut |node| *counts.entry(node.kind).or_insert(0) += 1);
    }
    counts
}

/// Number of nodes with at least one child
pub fn internal_count(roots: &[ClassificationNode]) -> usize {
    let mut count = 0;
    for root in roots {
        root.visit(&mut |node| {
            if !node.is_leaf() {
                count += 1;
            }
        });
    }
    count
}
