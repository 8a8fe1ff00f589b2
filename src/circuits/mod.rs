// src/circuits/mod.rs

//! Defines structures for representing and building ordered sequences of
//! rotations (`handopt::operations::Operation`) on a single qubit.
//!
//! A `Circuit` is the opaque transformation of a session: the loop only sees
//! how many free symbols it exposes, never its gates.

use crate::operations::Operation;
use std::collections::BTreeSet;
use std::fmt;

/// Represents an ordered sequence of rotations applied to one qubit starting in `|0>`.
///
/// Analogy: Similar to a one-qubit `cirq.Circuit` built from `Rx`/`Ry`/`Rz`
/// gates whose angles may be `sympy.Symbol`s.
#[derive(Clone, PartialEq)]
pub struct Circuit {
    /// The free symbol indices referenced by any operation.
    symbols: BTreeSet<usize>,

    /// The ordered sequence of operations. Applied first to last.
    operations: Vec<Operation>,
}

impl Circuit {
    /// Creates a new, empty circuit.
    pub fn new() -> Self {
        Self {
            symbols: BTreeSet::new(),
            operations: Vec::new(),
        }
    }

    /// Adds a single operation to the end of the circuit's sequence,
    /// registering its symbol if it has one.
    pub fn add_operation(&mut self, op: Operation) {
        if let Some(symbol) = op.symbol() {
            self.symbols.insert(symbol);
        }
        self.operations.push(op);
    }

    /// Adds multiple operations from an iterator to the end of the circuit's sequence.
    pub fn add_operations<I>(&mut self, ops: I)
    where
        I: IntoIterator<Item = Operation>,
    {
        for op in ops {
            self.add_operation(op);
        }
    }

    /// Returns the set of symbol indices referenced by the circuit.
    pub fn symbols(&self) -> &BTreeSet<usize> {
        &self.symbols
    }

    /// Number of parameter values needed to resolve every symbol.
    ///
    /// Symbols are positional, so this is one past the highest index used.
    pub fn parameter_count(&self) -> usize {
        self.symbols.iter().next_back().map_or(0, |max| max + 1)
    }

    /// Returns a slice containing the ordered sequence of operations in this circuit.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Returns the total number of operations defined in the circuit.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Returns `true` if the circuit contains no operations.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

impl Default for Circuit {
    fn default() -> Self {
        Self::new()
    }
}

//-------------------------------------------------------------------------
// Circuit Builder
//-------------------------------------------------------------------------

/// A helper struct for programmatically constructing `Circuit` instances using method chaining.
pub struct CircuitBuilder {
    circuit: Circuit,
}

impl CircuitBuilder {
    /// Creates a new, empty CircuitBuilder.
    pub fn new() -> Self {
        Self { circuit: Circuit::new() }
    }

    /// Adds a single operation to the circuit being built.
    ///
    /// Returns `self` to allow for continued method chaining.
    pub fn add_op(mut self, op: Operation) -> Self {
        self.circuit.add_operation(op);
        self
    }

    /// Adds multiple operations from an iterator to the circuit being built.
    ///
    /// Returns `self` to allow for continued method chaining.
    pub fn add_ops<I>(mut self, ops: I) -> Self
    where
        I: IntoIterator<Item = Operation>,
    {
        self.circuit.add_operations(ops);
        self
    }

    /// Finalizes the construction process and returns the built `Circuit`.
    pub fn build(self) -> Circuit {
        self.circuit
    }
}

impl Default for CircuitBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const H_WIRE: &str = "──";

        writeln!(
            f,
            "handopt::Circuit[{} operations, {} parameters]",
            self.operations.len(),
            self.parameter_count()
        )?;
        write!(f, "q0: {}", H_WIRE)?;
        for op in &self.operations {
            write!(f, "{}{}", op, H_WIRE)?;
        }
        writeln!(f)
    }
}

// Keep the Debug impl delegating to Display
impl fmt::Debug for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
