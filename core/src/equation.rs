use alloc::vec::Vec;
use core::fmt;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sign {
    /// Cells were added to the selection.
    Plus,
    /// Selected cells were crossed out.
    Minus,
}

impl Sign {
    pub const fn symbol(self) -> char {
        match self {
            Self::Plus => '+',
            Self::Minus => '-',
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TermShape {
    /// A single cell or a straight run of cells.
    Count(Coord),
    /// A block spanning several rows and several columns.
    Product(Coord, Coord),
}

impl TermShape {
    pub const fn from_rect(rect: Rect) -> Self {
        match (rect.rows(), rect.cols()) {
            (1, cols) => Self::Count(cols),
            (rows, 1) => Self::Count(rows),
            (rows, cols) => Self::Product(rows, cols),
        }
    }
}

impl fmt::Display for TermShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(n) => write!(f, "{}", n),
            Self::Product(rows, cols) => write!(f, "{} × {}", rows, cols),
        }
    }
}

/// One committed drag, as it appears in the equation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub sign: Sign,
    pub shape: TermShape,
}

impl Term {
    pub const fn new(sign: Sign, shape: TermShape) -> Self {
        Self { sign, shape }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equation {
    terms: Vec<Term>,
}

impl Equation {
    pub const fn new() -> Self {
        Self { terms: Vec::new() }
    }

    pub fn push(&mut self, term: Term) {
        self.terms.push(term);
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn clear(&mut self) {
        self.terms.clear();
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut terms = self.terms.iter();
        let Some(first) = terms.next() else {
            return Ok(());
        };

        // the leading term never shows its sign
        write!(f, "{}", first.shape)?;
        for term in terms {
            write!(f, " {} {}", term.sign.symbol(), term.shape)?;
        }
        f.write_str(" =")
    }
}
