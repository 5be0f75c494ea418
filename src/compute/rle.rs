//! Run-length coding of per-frame symbol sequences.
//!
//! A frame's symbols become a flat list alternating value fields and run
//! counts:
//!
//! ```text
//! index symbols:  idx, count, idx, count, ...
//! color symbols:  r, g, b, count, r, g, b, count, ...
//! ```

use super::{Color, StreamValue, Symbol, SymbolKind};

/// A maximal run of identical symbols.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Run {
    pub symbol: Symbol,
    pub count: usize,
}

/// Collapse `symbols` into runs. Equality is exact, including for colors.
pub fn encode_runs(symbols: &[Symbol]) -> Vec<Run> {
    let mut runs: Vec<Run> = Vec::new();
    for &symbol in symbols {
        match runs.last_mut() {
            Some(run) if run.symbol == symbol => run.count += 1,
            _ => runs.push(Run { symbol, count: 1 }),
        }
    }
    runs
}

/// Append the flat encoding of `symbols` to `out`.
pub fn encode_into(symbols: &[Symbol], out: &mut Vec<StreamValue>) {
    for run in encode_runs(symbols) {
        run.symbol.push_values(out);
        out.push(StreamValue::Int(run.count as u64));
    }
}

/// Flat encoding of one frame's symbols. Empty input gives empty output.
pub fn encode(symbols: &[Symbol]) -> Vec<StreamValue> {
    let mut out = Vec::new();
    encode_into(symbols, &mut out);
    out
}

/// Expand runs back into the symbol sequence they came from.
pub fn expand(runs: &[Run]) -> Vec<Symbol> {
    runs.iter()
        .flat_map(|run| std::iter::repeat_n(run.symbol, run.count))
        .collect()
}

/// Errors while reading a flat encoded stream back into runs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    #[error("stream ends inside a run at value {0}")]
    Truncated(usize),
    #[error("expected an integer at value {0}")]
    ExpectedInt(usize),
    #[error("expected a color channel at value {0}")]
    ExpectedFloat(usize),
    #[error("zero-length run at value {0}")]
    ZeroCount(usize),
    #[error("run at value {position} overflows a {cells}-cell frame")]
    FrameOverrun { position: usize, cells: usize },
}

/// Parse a flat stream of `kind` symbols into runs.
pub fn decode(values: &[StreamValue], kind: SymbolKind) -> Result<Vec<Run>, DecodeError> {
    let stride = kind.value_fields() + 1;
    let mut runs = Vec::with_capacity(values.len() / stride);

    let mut pos = 0;
    while pos < values.len() {
        if pos + stride > values.len() {
            return Err(DecodeError::Truncated(pos));
        }

        let symbol = match kind {
            SymbolKind::Index => {
                Symbol::Index(values[pos].as_int().ok_or(DecodeError::ExpectedInt(pos))? as usize)
            }
            SymbolKind::Color => {
                let channel = |i: usize| {
                    values[pos + i]
                        .as_float()
                        .ok_or(DecodeError::ExpectedFloat(pos + i))
                };
                Symbol::Color(Color::new(channel(0)?, channel(1)?, channel(2)?))
            }
        };

        let count_pos = pos + stride - 1;
        let count = values[count_pos]
            .as_int()
            .ok_or(DecodeError::ExpectedInt(count_pos))? as usize;
        if count == 0 {
            return Err(DecodeError::ZeroCount(count_pos));
        }

        runs.push(Run { symbol, count });
        pos += stride;
    }
    Ok(runs)
}

/// Split a concatenation of encoded frames back into per-frame symbols.
///
/// Frame boundaries fall where the run counts of a frame sum to `cells`.
pub fn split_frames(
    values: &[StreamValue],
    kind: SymbolKind,
    cells: usize,
) -> Result<Vec<Vec<Symbol>>, DecodeError> {
    let stride = kind.value_fields() + 1;
    let mut frames = Vec::new();
    let mut current = Vec::with_capacity(cells);

    for (i, run) in decode(values, kind)?.into_iter().enumerate() {
        if current.len() + run.count > cells {
            return Err(DecodeError::FrameOverrun {
                position: i * stride,
                cells,
            });
        }
        current.extend(std::iter::repeat_n(run.symbol, run.count));
        if current.len() == cells {
            frames.push(std::mem::replace(&mut current, Vec::with_capacity(cells)));
        }
    }

    if !current.is_empty() {
        return Err(DecodeError::Truncated(values.len()));
    }
    Ok(frames)
}
