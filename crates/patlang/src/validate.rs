//! Completeness checking and equation validation.
//!
//! An equation pairs two diagrams for the code generator. Before generation
//! the pair must be structurally consistent:
//!
//! - **R1**: within each diagram, no output-kind box type is instantiated
//!   more than once;
//! - **R2**: both diagrams instantiate the same set of output-kind box
//!   types;
//! - **R3**: the relevant node instances of each diagram are fully wired,
//!   meaning every input port has an incoming edge.
//!
//! Rules are evaluated independently and every violation is reported in one
//! pass: a pair can fail R1, R2, and R3 at once and gets one message per
//! failed rule.
//!
//! ## R3 scope
//!
//! The two flows that call equation validation have historically disagreed
//! about which instances R3 covers: the equation-authoring flow checks only
//! the output-kind instances, while the pre-export flow checks every node
//! instance. [`is_fully_wired`] therefore takes the instance set as an
//! explicit parameter and [`CompletenessScope`] names the two choices; each
//! call site states its scope instead of the engine picking one.

use std::{fmt, str::FromStr};

use indexmap::{IndexMap, IndexSet};
use log::debug;
use serde::Deserialize;
use thiserror::Error;

use patlang_core::{
    element::{EdgeInstance, NodeInstance},
    handle::Handle,
    identifier::{BoxTypeId, DiagramId, EquationId},
    item::{BoxKind, Diagram, Equation},
};

use crate::catalog::Catalog;

/// Which node instances rule R3 requires to be fully wired.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompletenessScope {
    /// Every node instance in the diagram. The pre-export flow's scope,
    /// and the stricter default.
    #[default]
    AllNodes,
    /// Only instances of output-kind box types. The equation-authoring
    /// flow's scope.
    SinksOnly,
}

impl fmt::Display for CompletenessScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CompletenessScope::AllNodes => "all-nodes",
            CompletenessScope::SinksOnly => "sinks-only",
        })
    }
}

impl FromStr for CompletenessScope {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all-nodes" => Ok(CompletenessScope::AllNodes),
            "sinks-only" => Ok(CompletenessScope::SinksOnly),
            _ => Err(()),
        }
    }
}

/// Returns true when every input port of every given instance has an
/// incoming edge in `edges`.
///
/// The instance set is an explicit parameter so callers can pass all
/// instances of a diagram or only its output-kind ones. An instance whose
/// box type cannot be resolved contributes no required inputs: unresolved
/// references degrade the check, they never abort it.
pub fn is_fully_wired<'a>(
    instances: impl IntoIterator<Item = &'a NodeInstance>,
    edges: &[EdgeInstance],
    catalog: &Catalog,
) -> bool {
    for instance in instances {
        let Some(box_type) = catalog.box_type(instance.box_type()) else {
            continue;
        };
        for index in 0..box_type.inputs.len() {
            let handle = Handle::input(index);
            let wired = edges
                .iter()
                .any(|e| e.target == instance.id && e.target_handle == handle);
            if !wired {
                return false;
            }
        }
    }
    true
}

/// Which operand of an equation a violation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Lhs,
    Rhs,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::Lhs => "LHS",
            Side::Rhs => "RHS",
        })
    }
}

/// One violated consistency rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViolationKind {
    #[error("missing {0} diagram")]
    MissingOperand(Side),

    #[error("{side} diagram `{diagram}` not found or has no saved state")]
    UnknownDiagram { side: Side, diagram: DiagramId },

    #[error("diagram `{diagram}` contains more than one of the same output box")]
    DuplicateSinks { diagram: DiagramId },

    #[error("diagrams don't contain the same outputs")]
    MismatchedSinks,

    #[error("a node is missing a connection to one of its inputs")]
    MissingInputs,

    #[error("an output node is missing a connection to one of its inputs")]
    SinkMissingInputs,
}

/// A violation tagged with the equation it was found in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub equation: EquationId,
    pub label: String,
    pub kind: ViolationKind,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "equation \"{}\": {}", self.label, self.kind)
    }
}

/// Per-diagram analysis of output-kind instances: how often each sink box
/// type is instantiated, and which instances are sinks.
struct SinkAnalysis<'a> {
    counts: IndexMap<&'a BoxTypeId, usize>,
    instances: Vec<&'a NodeInstance>,
}

impl<'a> SinkAnalysis<'a> {
    fn of(diagram: &'a Diagram, catalog: &Catalog) -> Self {
        let mut counts: IndexMap<&'a BoxTypeId, usize> = IndexMap::new();
        let mut instances = Vec::new();
        for node in &diagram.nodes {
            let kind = catalog.box_type(node.box_type()).map(|b| b.kind);
            if kind == Some(BoxKind::Output) {
                *counts.entry(node.box_type()).or_insert(0) += 1;
                instances.push(node);
            }
        }
        Self { counts, instances }
    }

    fn has_duplicates(&self) -> bool {
        self.counts.values().any(|&count| count > 1)
    }

    fn types(&self) -> IndexSet<&BoxTypeId> {
        self.counts.keys().copied().collect()
    }
}

/// Runs rules R1–R3 over a resolved diagram pair. All applicable rules are
/// evaluated; nothing short-circuits.
pub fn validate_pair(
    equation: &Equation,
    lhs: &Diagram,
    rhs: &Diagram,
    catalog: &Catalog,
    scope: CompletenessScope,
) -> Vec<Violation> {
    let violation = |kind| Violation {
        equation: equation.id.clone(),
        label: equation.label.clone(),
        kind,
    };
    let mut violations = Vec::new();

    let lhs_sinks = SinkAnalysis::of(lhs, catalog);
    let rhs_sinks = SinkAnalysis::of(rhs, catalog);

    // R1: at most one instance per output box type, per diagram.
    for (diagram, sinks) in [(lhs, &lhs_sinks), (rhs, &rhs_sinks)] {
        if sinks.has_duplicates() {
            violations.push(violation(ViolationKind::DuplicateSinks {
                diagram: diagram.id.clone(),
            }));
        }
    }

    // R2: identical sets of output box types on both sides.
    if lhs_sinks.types() != rhs_sinks.types() {
        violations.push(violation(ViolationKind::MismatchedSinks));
    }

    // R3: the scoped instance set of each diagram is fully wired.
    let wired = match scope {
        CompletenessScope::AllNodes => {
            is_fully_wired(&lhs.nodes, &lhs.edges, catalog)
                && is_fully_wired(&rhs.nodes, &rhs.edges, catalog)
        }
        CompletenessScope::SinksOnly => {
            is_fully_wired(lhs_sinks.instances.iter().copied(), &lhs.edges, catalog)
                && is_fully_wired(rhs_sinks.instances.iter().copied(), &rhs.edges, catalog)
        }
    };
    if !wired {
        violations.push(violation(match scope {
            CompletenessScope::AllNodes => ViolationKind::MissingInputs,
            CompletenessScope::SinksOnly => ViolationKind::SinkMissingInputs,
        }));
    }

    violations
}

/// Validates one equation: resolves its operands against the catalog, then
/// runs the pair rules.
///
/// A missing or unresolvable operand is itself reported as a violation and
/// skips the pair rules, since there is no pair to check yet.
pub fn validate_equation(
    equation: &Equation,
    catalog: &Catalog,
    scope: CompletenessScope,
) -> Vec<Violation> {
    let violation = |kind| Violation {
        equation: equation.id.clone(),
        label: equation.label.clone(),
        kind,
    };

    let mut unresolved = Vec::new();
    let mut resolve = |side, operand: &Option<DiagramId>| match operand {
        None => {
            unresolved.push(violation(ViolationKind::MissingOperand(side)));
            None
        }
        Some(id) => match catalog.diagram(id) {
            Some(diagram) => Some(diagram),
            None => {
                unresolved.push(violation(ViolationKind::UnknownDiagram {
                    side,
                    diagram: id.clone(),
                }));
                None
            }
        },
    };

    let lhs = resolve(Side::Lhs, &equation.lhs);
    let rhs = resolve(Side::Rhs, &equation.rhs);
    match (lhs, rhs) {
        (Some(lhs), Some(rhs)) => validate_pair(equation, lhs, rhs, catalog, scope),
        _ => unresolved,
    }
}

/// Validates every equation in the catalog (the pre-export check).
pub fn validate_all(catalog: &Catalog, scope: CompletenessScope) -> Vec<Violation> {
    let mut violations = Vec::new();
    for equation in catalog.equations() {
        violations.extend(validate_equation(equation, catalog, scope));
    }
    debug!(
        violations = violations.len(),
        scope = scope.to_string().as_str();
        "Validated all equations"
    );
    violations
}
