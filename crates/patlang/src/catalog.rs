//! The catalog: a registry of wire types, box types, diagrams, and
//! equations, organized by section.
//!
//! Each section is an independent namespace: an id is only unique within
//! its own section. Lookups are pure; the catalog is read-mostly input for
//! the validators, mutated only by the out-of-scope catalog-editing
//! collaborators (and by snapshot import).
//!
//! Section order and titles are preserved from import so that a later
//! export reproduces the document byte-for-byte.

use std::{fmt, str::FromStr};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use patlang_core::{
    identifier::{BoxTypeId, DiagramId, EquationId, WireTypeId},
    item::{BoxType, Diagram, Equation, WireType},
};

/// Key of a catalog section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKey {
    Diagrams,
    Wires,
    Boxes,
    Equations,
}

impl SectionKey {
    /// All section keys in default document order.
    pub const ALL: [SectionKey; 4] = [
        SectionKey::Diagrams,
        SectionKey::Wires,
        SectionKey::Boxes,
        SectionKey::Equations,
    ];

    /// Returns the string key used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            SectionKey::Diagrams => "diagrams",
            SectionKey::Wires => "wires",
            SectionKey::Boxes => "boxes",
            SectionKey::Equations => "equations",
        }
    }

    /// Returns the default human-readable section title.
    pub fn default_title(self) -> &'static str {
        match self {
            SectionKey::Diagrams => "Diagrams",
            SectionKey::Wires => "Wires",
            SectionKey::Boxes => "Boxes",
            SectionKey::Equations => "Equations",
        }
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "diagrams" => Ok(SectionKey::Diagrams),
            "wires" => Ok(SectionKey::Wires),
            "boxes" => Ok(SectionKey::Boxes),
            "equations" => Ok(SectionKey::Equations),
            _ => Err(()),
        }
    }
}

/// Order and title of one catalog section, as captured at import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionMeta {
    pub key: SectionKey,
    pub title: String,
}

impl SectionMeta {
    fn with_default_title(key: SectionKey) -> Self {
        Self {
            key,
            title: key.default_title().to_owned(),
        }
    }
}

/// A borrowed catalog entry, whichever section it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Entry<'a> {
    Wire(&'a WireType),
    Box(&'a BoxType),
    Diagram(&'a Diagram),
    Equation(&'a Equation),
}

/// Registry of all wire types, box types, diagrams, and equations.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    sections: Vec<SectionMeta>,
    wires: IndexMap<WireTypeId, WireType>,
    boxes: IndexMap<BoxTypeId, BoxType>,
    diagrams: IndexMap<DiagramId, Diagram>,
    equations: IndexMap<EquationId, Equation>,
}

impl Default for Catalog {
    /// The catalog a fresh session starts from: all four sections in
    /// default order, with a single opened `init-diag` diagram and nothing
    /// else.
    fn default() -> Self {
        let mut catalog = Self::empty();
        for key in SectionKey::ALL {
            catalog.push_section(SectionMeta::with_default_title(key));
        }
        catalog.insert_diagram(Diagram {
            id: DiagramId::new("init-diag"),
            label: "New Diagram".to_owned(),
            nodes: Vec::new(),
            edges: Vec::new(),
            opened: true,
        });
        catalog
    }
}

impl Catalog {
    /// Creates a catalog with no sections and no entries. Used by snapshot
    /// import, which replays the imported document into it.
    pub fn empty() -> Self {
        Self {
            sections: Vec::new(),
            wires: IndexMap::new(),
            boxes: IndexMap::new(),
            diagrams: IndexMap::new(),
            equations: IndexMap::new(),
        }
    }

    /// Generic lookup by section and string id.
    ///
    /// Returns `None` both for an id that is not present and for a section
    /// the catalog never saw; unresolvable references are "no match", not
    /// faults.
    pub fn lookup(&self, section: SectionKey, id: &str) -> Option<Entry<'_>> {
        match section {
            SectionKey::Wires => self.wires.get(id).map(Entry::Wire),
            SectionKey::Boxes => self.boxes.get(id).map(Entry::Box),
            SectionKey::Diagrams => self.diagrams.get(id).map(Entry::Diagram),
            SectionKey::Equations => self.equations.get(id).map(Entry::Equation),
        }
    }

    pub fn wire_type(&self, id: &WireTypeId) -> Option<&WireType> {
        self.wires.get(id)
    }

    pub fn box_type(&self, id: &BoxTypeId) -> Option<&BoxType> {
        self.boxes.get(id)
    }

    pub fn diagram(&self, id: &DiagramId) -> Option<&Diagram> {
        self.diagrams.get(id)
    }

    pub fn equation(&self, id: &EquationId) -> Option<&Equation> {
        self.equations.get(id)
    }

    /// Returns the diagram currently holding `opened = true`, if any.
    pub fn opened_diagram(&self) -> Option<&Diagram> {
        self.diagrams.values().find(|d| d.opened)
    }

    pub fn wire_types(&self) -> impl Iterator<Item = &WireType> {
        self.wires.values()
    }

    pub fn box_types(&self) -> impl Iterator<Item = &BoxType> {
        self.boxes.values()
    }

    pub fn diagrams(&self) -> impl Iterator<Item = &Diagram> {
        self.diagrams.values()
    }

    pub fn equations(&self) -> impl Iterator<Item = &Equation> {
        self.equations.values()
    }

    /// Section order and titles, as imported (or defaults).
    pub fn sections(&self) -> &[SectionMeta] {
        &self.sections
    }

    /// Registers a section at the end of the document order. A key that is
    /// already registered keeps its position; the newer title wins.
    pub fn push_section(&mut self, meta: SectionMeta) {
        if let Some(existing) = self.sections.iter_mut().find(|s| s.key == meta.key) {
            existing.title = meta.title;
        } else {
            self.sections.push(meta);
        }
    }

    /// Inserts a wire type, returning any previous entry with the same id.
    pub fn insert_wire_type(&mut self, wire: WireType) -> Option<WireType> {
        self.wires.insert(wire.id.clone(), wire)
    }

    /// Inserts a box type, returning any previous entry with the same id.
    pub fn insert_box_type(&mut self, box_type: BoxType) -> Option<BoxType> {
        self.boxes.insert(box_type.id.clone(), box_type)
    }

    /// Inserts a diagram, returning any previous entry with the same id.
    pub fn insert_diagram(&mut self, diagram: Diagram) -> Option<Diagram> {
        self.diagrams.insert(diagram.id.clone(), diagram)
    }

    /// Inserts an equation, returning any previous entry with the same id.
    pub fn insert_equation(&mut self, equation: Equation) -> Option<Equation> {
        self.equations.insert(equation.id.clone(), equation)
    }

    pub(crate) fn diagrams_mut(&mut self) -> impl Iterator<Item = &mut Diagram> {
        self.diagrams.values_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_scoped_per_section() {
        let mut catalog = Catalog::default();
        catalog.insert_wire_type(WireType {
            id: WireTypeId::new("shared-id"),
            label: "Wire".into(),
            color: "#ff0000".into(),
        });

        assert!(matches!(
            catalog.lookup(SectionKey::Wires, "shared-id"),
            Some(Entry::Wire(_))
        ));
        // Same id does not leak into another namespace.
        assert!(catalog.lookup(SectionKey::Boxes, "shared-id").is_none());
        assert!(catalog.lookup(SectionKey::Wires, "absent").is_none());
    }

    #[test]
    fn default_catalog_has_one_opened_diagram() {
        let catalog = Catalog::default();
        let opened = catalog.opened_diagram().expect("default diagram opened");
        assert_eq!(opened.id, DiagramId::new("init-diag"));
        assert_eq!(catalog.diagrams().count(), 1);
        assert_eq!(catalog.sections().len(), 4);
    }

    #[test]
    fn push_section_keeps_existing_position() {
        let mut catalog = Catalog::empty();
        catalog.push_section(SectionMeta {
            key: SectionKey::Wires,
            title: "Wires".into(),
        });
        catalog.push_section(SectionMeta {
            key: SectionKey::Boxes,
            title: "Boxes".into(),
        });
        catalog.push_section(SectionMeta {
            key: SectionKey::Wires,
            title: "Signals".into(),
        });

        assert_eq!(catalog.sections().len(), 2);
        assert_eq!(catalog.sections()[0].key, SectionKey::Wires);
        assert_eq!(catalog.sections()[0].title, "Signals");
    }
}
