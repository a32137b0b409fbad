//! Nodal result extraction and text reports.
//!
//! Results are addressed by name:
//!
//! | name   | dofs       | models     |
//! |--------|------------|------------|
//! | `U`    | every dof  | all        |
//! | `UX`   | dof 0      | structural |
//! | `UY`   | dof 1      | structural |
//! | `TEMP` | dof 0      | thermal    |

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::solver::StaticSolution;

/// Named result quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResultKind {
    All,
    DisplacementX,
    DisplacementY,
    Temperature,
}

impl FromStr for ResultKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "U" => Ok(ResultKind::All),
            "UX" => Ok(ResultKind::DisplacementX),
            "UY" => Ok(ResultKind::DisplacementY),
            "TEMP" => Ok(ResultKind::Temperature),
            other => Err(Error::configuration(format!(
                "unknown result name '{other}' (expected U, UX, UY or TEMP)"
            ))),
        }
    }
}

impl ResultKind {
    /// Dofs selected by this quantity, or an error when it does not apply
    fn dofs(&self, dofs_per_node: usize) -> Result<Vec<usize>> {
        let structural = dofs_per_node == 2;
        match self {
            ResultKind::All => Ok((0..dofs_per_node).collect()),
            ResultKind::DisplacementX | ResultKind::DisplacementY if !structural => Err(
                Error::configuration("displacement results require a structural model"),
            ),
            ResultKind::DisplacementX => Ok(vec![0]),
            ResultKind::DisplacementY => Ok(vec![1]),
            ResultKind::Temperature if structural => Err(Error::configuration(
                "temperature results require a thermal model",
            )),
            ResultKind::Temperature => Ok(vec![0]),
        }
    }
}

/// Value of one nodal dof
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum DofValue {
    Solved(f64),
    Constrained,
}

/// One (node, dof) entry of a result query
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NodalResult {
    pub node: usize,
    pub dof: usize,
    pub value: DofValue,
}

/// Extract a named quantity for every node, node-major then dof order
pub fn nodal_results(solution: &StaticSolution, kind: ResultKind) -> Result<Vec<NodalResult>> {
    let dofs = kind.dofs(solution.dofs_per_node())?;
    let num_nodes = solution.equations.num_nodes();
    let mut results = Vec::with_capacity(num_nodes * dofs.len());
    for node in 0..num_nodes {
        for &dof in &dofs {
            let value = match solution.value(node, dof) {
                Some(v) => DofValue::Solved(v),
                None => DofValue::Constrained,
            };
            results.push(NodalResult { node, dof, value });
        }
    }
    Ok(results)
}

fn component_letter(dof: usize) -> char {
    if dof == 0 { 'x' } else { 'y' }
}

impl fmt::Display for NodalResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = component_letter(self.dof);
        match self.value {
            DofValue::Solved(v) => write!(f, "Node {}: {c} deflection: {v}", self.node),
            DofValue::Constrained => write!(f, "Node {}: {c} dof was constrained", self.node),
        }
    }
}

/// Nodal solution listing, one line per entry
pub fn format_nodal_results(results: &[NodalResult]) -> String {
    results.iter().map(|r| format!("{r}\n")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::EquationMap;
    use crate::boundary_conditions::{BoundaryConditions, Component};
    use crate::linalg::Vector;

    fn solution() -> StaticSolution {
        let mut bcs = BoundaryConditions::new();
        bcs.add_essential(0, Component::All, 0.0);
        StaticSolution {
            equations: EquationMap::build(2, 2, &bcs),
            displacements: Vector::from_vec(vec![0.5, -0.25]),
        }
    }

    #[test]
    fn parses_result_names() {
        assert_eq!("U".parse::<ResultKind>().unwrap(), ResultKind::All);
        assert_eq!("TEMP".parse::<ResultKind>().unwrap(), ResultKind::Temperature);
        assert!(matches!(
            "STRESS".parse::<ResultKind>(),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn all_dofs_in_node_order() {
        let results = nodal_results(&solution(), ResultKind::All).unwrap();
        assert_eq!(results.len(), 4);
        assert_eq!(results[0].value, DofValue::Constrained);
        assert_eq!(results[2], NodalResult { node: 1, dof: 0, value: DofValue::Solved(0.5) });
        assert_eq!(results[3].value, DofValue::Solved(-0.25));
    }

    #[test]
    fn single_component_selection() {
        let results = nodal_results(&solution(), ResultKind::DisplacementY).unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.dof == 1));
        assert!(nodal_results(&solution(), ResultKind::Temperature).is_err());
    }

    #[test]
    fn listing_format() {
        let results = nodal_results(&solution(), ResultKind::All).unwrap();
        let text = format_nodal_results(&results);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Node 0: x dof was constrained");
        assert_eq!(lines[1], "Node 0: y dof was constrained");
        assert_eq!(lines[2], "Node 1: x deflection: 0.5");
        assert_eq!(lines[3], "Node 1: y deflection: -0.25");
        assert!(text.ends_with('\n'));
        assert!(format_nodal_results(&[]).is_empty());
    }

    #[test]
    fn single_entry_display() {
        let r = NodalResult { node: 7, dof: 1, value: DofValue::Solved(2.5) };
        assert_eq!(r.to_string(), "Node 7: y deflection: 2.5");
    }
}
