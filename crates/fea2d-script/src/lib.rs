//! Line-oriented command scripts for the fea2d solver.
//!
//! A script builds a model one command per line (`N`, `ET`, `E`, `D`, `F`,
//! ...), solves it with `SOLVE` and prints results with `PRNSOL`.

pub mod error;
pub mod interpreter;
pub mod parser;

pub use error::{ParseError, Result, ScriptError};
pub use interpreter::{Interpreter, Report};
pub use parser::{Instruction, MAX_FIELDS, instructions, parse_line};
