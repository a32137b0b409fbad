//! Mesh data structures: nodes and element connectivity.
//!
//! Node ids are positions in the node sequence (0-based, assigned in creation
//! order). The ordering of nodes and elements determines the equation
//! numbering and the assembly order, so both are kept in plain vectors.

use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::linalg::Matrix;

/// A node in the 2-D mesh
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Node {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Node {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Node:")?;
        writeln!(f, "\tX Coor.: {:.4}", self.x)?;
        write!(f, "\tY Coor.: {:.4}", self.y)
    }
}

/// An element: the user id of its type plus validated connectivity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    /// Element type user id
    pub type_id: usize,
    /// Global node ids in local node order
    connectivity: Vec<usize>,
}

impl Element {
    pub fn type_id(&self) -> usize {
        self.type_id
    }

    pub fn connectivity(&self) -> &[usize] {
        &self.connectivity
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Element , Type #{}", self.type_id)?;
        for (local, global) in self.connectivity.iter().enumerate() {
            write!(f, "\nLocal Node #{}: Global Node #{}", local + 1, global + 1)?;
        }
        Ok(())
    }
}

/// Complete 2-D mesh
#[derive(Debug, Clone, Default, Serialize)]
pub struct Mesh {
    nodes: Vec<Node>,
    elements: Vec<Element>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node and return its id
    pub fn add_node(&mut self, x: f64, y: f64) -> usize {
        self.nodes.push(Node::new(x, y));
        self.nodes.len() - 1
    }

    /// Append an element after checking its connectivity.
    ///
    /// `expected_nodes` is the node count of the element's type; every node
    /// id must already exist.
    pub fn add_element(
        &mut self,
        type_id: usize,
        connectivity: Vec<usize>,
        expected_nodes: usize,
    ) -> Result<usize> {
        if connectivity.len() != expected_nodes {
            return Err(Error::configuration(format!(
                "element of type {type_id} needs {expected_nodes} nodes, got {}",
                connectivity.len()
            )));
        }
        if let Some(&bad) = connectivity.iter().find(|&&n| n >= self.nodes.len()) {
            return Err(Error::lookup(format!(
                "element of type {type_id} references node {bad}, but the mesh has {} nodes",
                self.nodes.len()
            )));
        }
        self.elements.push(Element {
            type_id,
            connectivity,
        });
        Ok(self.elements.len() - 1)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_elements(&self) -> usize {
        self.elements.len()
    }

    /// Element coordinates as a `2 × nodes` matrix (row 0 = x, row 1 = y)
    pub fn coordinates(&self, element: &Element) -> Matrix {
        let n = element.connectivity.len();
        let mut coords = Matrix::zeros(2, n);
        for (col, &node) in element.connectivity.iter().enumerate() {
            let p = self.nodes[node];
            coords[(0, col)] = p.x;
            coords[(1, col)] = p.y;
        }
        coords
    }
}

impl fmt::Display for Mesh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Mesh: {} nodes, {} elements",
            self.nodes.len(),
            self.elements.len()
        )?;
        writeln!(f, "Nodes:")?;
        for node in &self.nodes {
            writeln!(f, "{node}")?;
        }
        write!(f, "Elements:")?;
        for element in &self.elements {
            write!(f, "\n{element}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_mesh() -> Mesh {
        let mut mesh = Mesh::new();
        mesh.add_node(0.0, 0.0);
        mesh.add_node(2.0, 0.0);
        mesh.add_node(0.0, 1.5);
        mesh
    }

    #[test]
    fn node_ids_are_sequential() {
        let mut mesh = Mesh::new();
        assert_eq!(mesh.add_node(1.0, 2.0), 0);
        assert_eq!(mesh.add_node(3.0, 4.0), 1);
        assert_eq!(mesh.nodes()[1], Node::new(3.0, 4.0));
    }

    #[test]
    fn coordinates_follow_connectivity_order() {
        let mut mesh = triangle_mesh();
        let id = mesh.add_element(1, vec![2, 0, 1], 3).unwrap();
        let coords = mesh.coordinates(&mesh.elements()[id]);
        assert_eq!(
            coords,
            Matrix::from_row_slice(2, 3, &[0.0, 0.0, 2.0, 1.5, 0.0, 0.0])
        );
    }

    #[test]
    fn connectivity_length_is_checked() {
        let mut mesh = triangle_mesh();
        let err = mesh.add_element(1, vec![0, 1], 3).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        assert_eq!(mesh.num_elements(), 0);
    }

    #[test]
    fn connectivity_must_reference_existing_nodes() {
        let mut mesh = triangle_mesh();
        let err = mesh.add_element(1, vec![0, 1, 3], 3).unwrap_err();
        assert!(matches!(err, Error::Lookup(ref msg) if msg.contains("node 3")));
    }

    #[test]
    fn display_lists_one_based_connectivity() {
        let mut mesh = triangle_mesh();
        mesh.add_element(7, vec![0, 1, 2], 3).unwrap();
        let text = mesh.to_string();
        assert!(text.starts_with("Mesh: 3 nodes, 1 elements"));
        assert!(text.contains("\tX Coor.: 2.0000"));
        assert!(text.contains("Element , Type #7"));
        assert!(text.contains("Local Node #3: Global Node #3"));
    }
}
