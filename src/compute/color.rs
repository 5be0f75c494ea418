//! Colors and the per-cell symbols a sampled frame is made of.

use super::StreamValue;

/// Normalized RGB color, each channel in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub fn to_array(self) -> [f64; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[f64; 3]> for Color {
    fn from([r, g, b]: [f64; 3]) -> Self {
        Self { r, g, b }
    }
}

/// Which variant a stream of symbols is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Index,
    Color,
}

impl SymbolKind {
    /// Number of flat values one symbol occupies in an encoded stream.
    #[inline]
    pub fn value_fields(self) -> usize {
        match self {
            SymbolKind::Index => 1,
            SymbolKind::Color => 3,
        }
    }
}

/// The value of one grid cell: a palette index or a raw color.
///
/// Equality is exact. Two colors that differ only by floating point noise
/// are different symbols.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Symbol {
    Index(usize),
    Color(Color),
}

impl Symbol {
    pub fn kind(&self) -> SymbolKind {
        match self {
            Symbol::Index(_) => SymbolKind::Index,
            Symbol::Color(_) => SymbolKind::Color,
        }
    }

    /// Append this symbol's value fields to a flat stream.
    pub fn push_values(&self, out: &mut Vec<StreamValue>) {
        match *self {
            Symbol::Index(i) => out.push(StreamValue::Int(i as u64)),
            Symbol::Color(c) => {
                out.extend(c.to_array().into_iter().map(StreamValue::Float));
            }
        }
    }
}
