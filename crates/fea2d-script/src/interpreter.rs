//! Executes script instructions against a [`Model`].
//!
//! | command  | arguments                 | model call                  |
//! |----------|---------------------------|-----------------------------|
//! | `N`      | x y                       | `create_node`               |
//! | `E`      | type n1 n2 ...            | `create_element`            |
//! | `ET`     | id NAME                   | `create_element_type`       |
//! | `KEYOPT` | id key option             | `set_key_option`            |
//! | `R`      | id slot value             | `set_real_constant`         |
//! | `MP`     | id NAME value             | `set_material_property`     |
//! | `D`      | node X/Y/ALL value        | `add_essential_bc`          |
//! | `F`      | node X/Y value            | `add_nodal_force`           |
//! | `SOLVE`  | physics solver            | `solve`                     |
//! | `PRNSOL` | NAME                      | `result`                    |
//! | `PRMESH` |                           | mesh report                 |
//! | `FINISH` |                           | `finish`                    |
//!
//! Symbolic arguments (family, property, component and result names) are
//! case-insensitive.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use log::info;
use serde::Serialize;

use fea2d_solver::{Component, Model, NodalResult, format_nodal_results};

use crate::error::{Result, ScriptError};
use crate::parser::{self, Instruction};

/// Output produced by a reporting command
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Report {
    /// `PRMESH` listing
    Mesh { text: String },
    /// `PRNSOL` values
    NodalSolution {
        name: String,
        results: Vec<NodalResult>,
    },
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Mesh { text } => writeln!(f, "{text}"),
            Report::NodalSolution { results, .. } => {
                f.write_str(&format_nodal_results(results))
            }
        }
    }
}

/// Script interpreter owning the model it builds
#[derive(Debug, Default)]
pub struct Interpreter {
    model: Model,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Parse and execute `source` line by line, passing reports to `emit`.
    ///
    /// Lines before a failing one have already taken effect.
    pub fn run<F: FnMut(Report)>(&mut self, source: &str, mut emit: F) -> Result<()> {
        for instruction in parser::instructions(source) {
            let instruction = instruction?;
            info!(
                "{}: {} {}",
                instruction.line,
                instruction.command,
                instruction.args.join(" ")
            );
            if let Some(report) = self.execute(&instruction)? {
                emit(report);
            }
        }
        Ok(())
    }

    /// Run a script file
    pub fn run_file<F: FnMut(Report)>(&mut self, path: impl AsRef<Path>, emit: F) -> Result<()> {
        let source = std::fs::read_to_string(path)?;
        self.run(&source, emit)
    }

    /// Run `source` and collect every report
    pub fn run_collect(&mut self, source: &str) -> Result<Vec<Report>> {
        let mut reports = Vec::new();
        self.run(source, |r| reports.push(r))?;
        Ok(reports)
    }

    /// Execute a single instruction
    pub fn execute(&mut self, ins: &Instruction) -> Result<Option<Report>> {
        let line = ins.line;
        let model = |source| ScriptError::Model { line, source };
        match ins.command.as_str() {
            "N" => {
                expect_args(ins, 2)?;
                let x = number(ins, 0, "a number")?;
                let y = number(ins, 1, "a number")?;
                self.model.create_node(x, y).map_err(model)?;
            }
            "E" => {
                if ins.args.len() < 2 {
                    return Err(argument_count(ins, "at least 2"));
                }
                let type_id = number(ins, 0, "an element type id")?;
                let connectivity = (1..ins.args.len())
                    .map(|i| number(ins, i, "a node id"))
                    .collect::<Result<Vec<usize>>>()?;
                self.model
                    .create_element(type_id, connectivity)
                    .map_err(model)?;
            }
            "ET" => {
                expect_args(ins, 2)?;
                let id = number(ins, 0, "an element type id")?;
                let name = symbol(ins, 1);
                self.model.create_element_type(id, &name).map_err(model)?;
            }
            "KEYOPT" => {
                expect_args(ins, 3)?;
                let id = number(ins, 0, "an element type id")?;
                let key = number(ins, 1, "a key index")?;
                let option = number(ins, 2, "an integer option")?;
                self.model.set_key_option(id, key, option).map_err(model)?;
            }
            "R" => {
                expect_args(ins, 3)?;
                let id = number(ins, 0, "an element type id")?;
                let slot = number(ins, 1, "a constant slot")?;
                let value = number(ins, 2, "a number")?;
                self.model
                    .set_real_constant(id, slot, value)
                    .map_err(model)?;
            }
            "MP" => {
                expect_args(ins, 3)?;
                let id = number(ins, 0, "an element type id")?;
                let name = symbol(ins, 1);
                let value = number(ins, 2, "a number")?;
                self.model
                    .set_material_property(id, &name, value)
                    .map_err(model)?;
            }
            "D" | "F" => {
                expect_args(ins, 3)?;
                let node = number(ins, 0, "a node id")?;
                let component: Component = symbol(ins, 1).parse().map_err(model)?;
                let value = number(ins, 2, "a number")?;
                let applied = if ins.command == "D" {
                    self.model.add_essential_bc(node, component, value)
                } else {
                    self.model.add_nodal_force(node, component, value)
                };
                applied.map_err(model)?;
            }
            "SOLVE" => {
                expect_args(ins, 2)?;
                let physics = number(ins, 0, "an integer physics type")?;
                let solver = number(ins, 1, "an integer solver type")?;
                self.model.solve(physics, solver).map_err(model)?;
            }
            "PRNSOL" => {
                expect_args(ins, 1)?;
                let name = symbol(ins, 0);
                let results = self.model.result(&name).map_err(model)?;
                return Ok(Some(Report::NodalSolution { name, results }));
            }
            "PRMESH" => {
                expect_args(ins, 0)?;
                return Ok(Some(Report::Mesh {
                    text: self.model.mesh().to_string(),
                }));
            }
            "FINISH" => {
                expect_args(ins, 0)?;
                self.model.finish().map_err(model)?;
            }
            _ => {
                return Err(ScriptError::UnknownCommand {
                    line,
                    command: ins.command.clone(),
                });
            }
        }
        Ok(None)
    }
}

fn argument_count(ins: &Instruction, expected: &str) -> ScriptError {
    ScriptError::ArgumentCount {
        line: ins.line,
        command: ins.command.clone(),
        expected: expected.to_string(),
        got: ins.args.len(),
    }
}

fn expect_args(ins: &Instruction, expected: usize) -> Result<()> {
    if ins.args.len() != expected {
        return Err(argument_count(ins, &expected.to_string()));
    }
    Ok(())
}

fn number<T: FromStr>(ins: &Instruction, index: usize, expected: &'static str) -> Result<T> {
    let value = &ins.args[index];
    value.parse().map_err(|_| ScriptError::InvalidArgument {
        line: ins.line,
        command: ins.command.clone(),
        value: value.clone(),
        expected,
    })
}

fn symbol(ins: &Instruction, index: usize) -> String {
    ins.args[index].to_uppercase()
}
