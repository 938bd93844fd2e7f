//! Common types used across the NAF workspace

use serde::{Deserialize, Serialize};

/// Level of a node in a classification tree
///
/// The primary hierarchy nests `Sector > Division > Group > Class`; the
/// liberal-profession taxonomy nests `LiberalSector > Class`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    Sector,
    Division,
    Group,
    Class,
    LiberalSector,
}

impl NodeKind {
    /// Value of the `data-type` attribute in rendered fragments
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Sector => "secteur",
            NodeKind::Division => "division",
            NodeKind::Group => "groupe",
            NodeKind::Class => "classe",
            NodeKind::LiberalSector => "secteur-liberal",
        }
    }

    /// Directory (or root fragment stem) holding fragments of this kind
    pub fn dir_name(self) -> &'static str {
        match self {
            NodeKind::Sector => "secteurs",
            NodeKind::Division => "divisions",
            NodeKind::Group => "groupes",
            NodeKind::Class => "classes",
            NodeKind::LiberalSector => "secteurs-liberaux",
        }
    }

    /// Label shown in the disabled placeholder entry of a fragment
    pub fn label(self) -> &'static str {
        match self {
            NodeKind::Sector | NodeKind::LiberalSector => "Secteur",
            NodeKind::Division => "Division",
            NodeKind::Group => "Groupe",
            NodeKind::Class => "Classe",
        }
    }

    /// Kind every child of a node of this kind must have
    pub fn child_kind(self) -> Option<NodeKind> {
        match self {
            NodeKind::Sector => Some(NodeKind::Division),
            NodeKind::Division => Some(NodeKind::Group),
            NodeKind::Group => Some(NodeKind::Class),
            NodeKind::LiberalSector => Some(NodeKind::Class),
            NodeKind::Class => None,
        }
    }

    pub fn is_class(self) -> bool {
        self == NodeKind::Class
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source that contributed a node, rendered as `data-nomenclature`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Nomenclature {
    /// Structural nodes shared by every nomenclature (sectors, divisions, groups)
    All,
    /// Classes from the INSEE NAF spreadsheet
    Naf,
    /// Classes contributed by the NAFA table
    Nafa,
    /// Liberal-profession taxonomy
    Liberal,
}

impl Nomenclature {
    pub fn as_str(self) -> &'static str {
        match self {
            Nomenclature::All => "all",
            Nomenclature::Naf => "naf",
            Nomenclature::Nafa => "nafa",
            Nomenclature::Liberal => "liberal",
        }
    }
}

impl std::fmt::Display for Nomenclature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
