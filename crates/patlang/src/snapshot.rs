//! Snapshot import and export.
//!
//! A snapshot is the JSON document the session persists to and restores
//! from: the catalog sections (in document order, with their titles) plus
//! the live graph's nodes and edges at top level.
//!
//! Import is all-or-nothing. The whole payload is parsed and validated
//! before any session state is constructed, so a malformed document never
//! leaves a half-imported session behind. Export preserves section order,
//! section titles, and entry order, and keeps color strings verbatim, so
//! that importing an exported snapshot reproduces the session exactly.

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use patlang_core::{
    element::{EdgeInstance, NodeInstance},
    item::{BoxType, Diagram, Equation, WireType},
};

use crate::{
    catalog::{Catalog, SectionKey, SectionMeta},
    error::PatlangError,
    graph::DiagramGraph,
    session::Session,
};

/// The serialized form of a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub sections: Vec<SectionDoc>,
    #[serde(default)]
    pub nodes: Vec<NodeInstance>,
    #[serde(default)]
    pub edges: Vec<EdgeInstance>,
}

/// One catalog section as it appears in the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionDoc {
    pub title: String,
    pub key: String,
    #[serde(default)]
    pub items: Vec<Value>,
}

impl Snapshot {
    pub fn to_json_pretty(&self) -> Result<String, PatlangError> {
        serde_json::to_string_pretty(self).map_err(|e| PatlangError::Persist(e.to_string()))
    }
}

/// Parses and validates a snapshot document, returning a fresh session.
///
/// Rejected documents: JSON that does not match the snapshot shape, a
/// section with an unrecognized key, the same section key twice, a
/// duplicate id within a section, or more than one diagram marked opened.
/// A document with no opened diagram is accepted; the live graph is then
/// just the top-level nodes and edges.
pub fn import(payload: &str) -> Result<Session, PatlangError> {
    let snapshot: Snapshot =
        serde_json::from_str(payload).map_err(|e| PatlangError::InvalidData(e.to_string()))?;

    let mut catalog = Catalog::empty();
    let mut seen = Vec::new();
    for section in &snapshot.sections {
        let key: SectionKey = section
            .key
            .parse()
            .map_err(|()| PatlangError::InvalidData(format!("unknown section key `{}`", section.key)))?;
        if seen.contains(&key) {
            return Err(PatlangError::InvalidData(format!(
                "duplicate section `{key}`"
            )));
        }
        seen.push(key);
        catalog.push_section(SectionMeta {
            key,
            title: section.title.clone(),
        });
        import_items(&mut catalog, key, &section.items)?;
    }

    let opened = catalog.diagrams().filter(|d| d.opened).count();
    if opened > 1 {
        return Err(PatlangError::InvalidData(format!(
            "{opened} diagrams marked opened, expected at most one"
        )));
    }

    let graph = DiagramGraph::new(snapshot.nodes, snapshot.edges);
    debug!(
        sections = catalog.sections().len(),
        nodes = graph.nodes().len(),
        edges = graph.edges().len();
        "Imported snapshot"
    );
    Ok(Session::from_parts(catalog, graph))
}

fn import_items(catalog: &mut Catalog, key: SectionKey, items: &[Value]) -> Result<(), PatlangError> {
    let invalid = |e: serde_json::Error| {
        PatlangError::InvalidData(format!("malformed item in section `{key}`: {e}"))
    };
    let duplicate = |id: &dyn std::fmt::Display| {
        PatlangError::InvalidData(format!("duplicate id `{id}` in section `{key}`"))
    };
    for item in items {
        match key {
            SectionKey::Wires => {
                let wire: WireType = serde_json::from_value(item.clone()).map_err(invalid)?;
                let id = wire.id.clone();
                if catalog.insert_wire_type(wire).is_some() {
                    return Err(duplicate(&id));
                }
            }
            SectionKey::Boxes => {
                let box_type: BoxType = serde_json::from_value(item.clone()).map_err(invalid)?;
                let id = box_type.id.clone();
                if catalog.insert_box_type(box_type).is_some() {
                    return Err(duplicate(&id));
                }
            }
            SectionKey::Diagrams => {
                let diagram: Diagram = serde_json::from_value(item.clone()).map_err(invalid)?;
                let id = diagram.id.clone();
                if catalog.insert_diagram(diagram).is_some() {
                    return Err(duplicate(&id));
                }
            }
            SectionKey::Equations => {
                let equation: Equation = serde_json::from_value(item.clone()).map_err(invalid)?;
                let id = equation.id.clone();
                if catalog.insert_equation(equation).is_some() {
                    return Err(duplicate(&id));
                }
            }
        }
    }
    Ok(())
}

/// Serializes the session into a snapshot document.
///
/// The catalog's section order and titles are reproduced as stored, and
/// the live graph becomes the top-level node and edge lists. Callers that
/// want the live graph reflected in its diagram's stored state fold it in
/// first (the autosave path does).
pub fn export(session: &Session) -> Result<Snapshot, PatlangError> {
    let catalog = session.catalog();
    let serialize = |e: serde_json::Error| PatlangError::Persist(e.to_string());

    let mut sections = Vec::with_capacity(catalog.sections().len());
    for meta in catalog.sections() {
        let items: Result<Vec<Value>, _> = match meta.key {
            SectionKey::Wires => catalog.wire_types().map(serde_json::to_value).collect(),
            SectionKey::Boxes => catalog.box_types().map(serde_json::to_value).collect(),
            SectionKey::Diagrams => catalog.diagrams().map(serde_json::to_value).collect(),
            SectionKey::Equations => catalog.equations().map(serde_json::to_value).collect(),
        };
        sections.push(SectionDoc {
            title: meta.title.clone(),
            key: meta.key.as_str().to_owned(),
            items: items.map_err(serialize)?,
        });
    }

    Ok(Snapshot {
        sections,
        nodes: session.graph().nodes().to_vec(),
        edges: session.graph().edges().to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use patlang_core::element::Position;

    use super::*;

    const DOC: &str = r##"{
        "sections": [
            {"title": "Diagrams", "key": "diagrams", "items": [
                {"type": "d-main", "label": "Main", "opened": true,
                 "nodes": [], "edges": []},
                {"type": "d-aux", "label": "Aux"}
            ]},
            {"title": "Wires", "key": "wires", "items": [
                {"type": "t-f32", "label": "f32", "color": "#00ff00"}
            ]},
            {"title": "Boxes", "key": "boxes", "items": [
                {"type": "b-src", "label": "Source", "color": "#333333",
                 "outputs": ["t-f32"]},
                {"type": "b-loss", "label": "Loss", "color": "#000000",
                 "kind": "output", "inputs": ["t-f32"]}
            ]},
            {"title": "Equations", "key": "equations", "items": [
                {"type": "eq-1", "label": "Step", "lhs-type": "d-main",
                 "rhs-type": "d-aux"}
            ]}
        ],
        "nodes": [
            {"id": "n1", "position": {"x": 10.0, "y": 20.0},
             "data": {"type": "b-src"}}
        ],
        "edges": []
    }"##;

    #[test]
    fn import_restores_catalog_and_live_graph() {
        let session = import(DOC).unwrap();
        let catalog = session.catalog();

        assert_eq!(catalog.sections().len(), 4);
        assert_eq!(catalog.sections()[0].key, SectionKey::Diagrams);
        assert_eq!(catalog.opened_diagram().unwrap().id, "d-main".into());
        assert!(catalog.wire_type(&"t-f32".into()).is_some());
        assert!(catalog.box_type(&"b-loss".into()).is_some());
        assert_eq!(
            catalog.equation(&"eq-1".into()).unwrap().lhs,
            Some("d-main".into())
        );
        assert_eq!(session.graph().nodes().len(), 1);
    }

    #[test]
    fn export_import_reproduces_the_session() {
        let session = import(DOC).unwrap();
        let json = export(&session).unwrap().to_json_pretty().unwrap();
        let restored = import(&json).unwrap();

        assert_eq!(restored.catalog(), session.catalog());
        assert_eq!(restored.graph(), session.graph());
    }

    #[test]
    fn export_preserves_section_order_and_titles() {
        let mut session = Session::default();
        let now = std::time::Instant::now();
        // Retitle a section out of its default.
        session.catalog_mut(now).push_section(SectionMeta {
            key: SectionKey::Wires,
            title: "Signals".into(),
        });

        let snapshot = export(&session).unwrap();
        let keys: Vec<_> = snapshot.sections.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, ["diagrams", "wires", "boxes", "equations"]);
        assert_eq!(snapshot.sections[1].title, "Signals");
    }

    #[test]
    fn garbage_payload_is_rejected() {
        assert!(matches!(
            import("not json at all"),
            Err(PatlangError::InvalidData(_))
        ));
        assert!(matches!(
            import(r#"{"sections": 5}"#),
            Err(PatlangError::InvalidData(_))
        ));
    }

    #[test]
    fn unknown_section_key_is_rejected() {
        let doc = r#"{"sections": [{"title": "X", "key": "widgets", "items": []}]}"#;
        let err = import(doc).unwrap_err();
        assert!(err.to_string().contains("widgets"), "{err}");
    }

    #[test]
    fn duplicate_section_is_rejected() {
        let doc = r#"{"sections": [
            {"title": "Wires", "key": "wires", "items": []},
            {"title": "Wires again", "key": "wires", "items": []}
        ]}"#;
        assert!(matches!(import(doc), Err(PatlangError::InvalidData(_))));
    }

    #[test]
    fn duplicate_id_within_a_section_is_rejected() {
        let doc = r##"{"sections": [{"title": "Wires", "key": "wires", "items": [
            {"type": "t-f32", "label": "f32", "color": "#00ff00"},
            {"type": "t-f32", "label": "also f32", "color": "#0000ff"}
        ]}]}"##;
        let err = import(doc).unwrap_err();
        assert!(err.to_string().contains("t-f32"), "{err}");
    }

    #[test]
    fn more_than_one_opened_diagram_is_rejected() {
        let doc = r#"{"sections": [{"title": "Diagrams", "key": "diagrams", "items": [
            {"type": "d-1", "label": "One", "opened": true},
            {"type": "d-2", "label": "Two", "opened": true}
        ]}]}"#;
        assert!(matches!(import(doc), Err(PatlangError::InvalidData(_))));
    }

    #[test]
    fn no_opened_diagram_is_accepted() {
        let doc = r#"{"sections": [{"title": "Diagrams", "key": "diagrams", "items": [
            {"type": "d-1", "label": "One"}
        ]}]}"#;
        let session = import(doc).unwrap();
        assert!(session.catalog().opened_diagram().is_none());
    }

    #[test]
    fn unparseable_color_string_survives_round_trip() {
        let mut session = Session::default();
        session
            .catalog_mut(std::time::Instant::now())
            .insert_wire_type(WireType {
                id: "t-odd".into(),
                label: "Odd".into(),
                color: "definitely-not-a-color".into(),
            });

        let json = export(&session).unwrap().to_json_pretty().unwrap();
        let restored = import(&json).unwrap();
        let wire = restored.catalog().wire_type(&"t-odd".into()).unwrap();
        assert_eq!(wire.color, "definitely-not-a-color");
        assert!(wire.display_color().is_none());
    }

    #[test]
    fn exported_fields_use_document_names() {
        let mut session = Session::default();
        let now = std::time::Instant::now();
        session.catalog_mut(now).insert_box_type(BoxType {
            id: "b-src".into(),
            label: "Source".into(),
            color: "#333333".into(),
            kind: Default::default(),
            inputs: Vec::new(),
            outputs: Vec::new(),
        });
        session
            .add_node(NodeInstance::new("n1", "b-src", Position { x: 1.0, y: 2.0 }), now)
            .unwrap();

        let value = serde_json::to_value(export(&session).unwrap()).unwrap();
        let node = &value["nodes"][0];
        assert_eq!(node["data"]["type"], "b-src");
        assert_eq!(node["position"]["x"], 1.0);
        let eq_items = &value["sections"][3];
        assert_eq!(eq_items["key"], "equations");
    }
}
