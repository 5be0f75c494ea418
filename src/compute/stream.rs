//! Flat encoded values and the global stream they accumulate into.

use std::fmt;

/// One element of an encoded stream: a palette index or run count, or a
/// single color channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StreamValue {
    Int(u64),
    Float(f64),
}

impl StreamValue {
    pub fn as_int(self) -> Option<u64> {
        match self {
            StreamValue::Int(v) => Some(v),
            StreamValue::Float(_) => None,
        }
    }

    pub fn as_float(self) -> Option<f64> {
        match self {
            StreamValue::Float(v) => Some(v),
            StreamValue::Int(_) => None,
        }
    }
}

impl fmt::Display for StreamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            StreamValue::Int(v) => write!(f, "{}", v),
            StreamValue::Float(v) => f.write_str(&shortest_repr(v)),
        }
    }
}

/// Shortest round-trip decimal text for `v`.
///
/// Always carries a fractional part (`1.0`, not `1`). Magnitudes below 1e-4
/// or at/above 1e16 switch to exponent form with a signed, at least two
/// digit exponent (`1e-05`, `2.5e+16`).
pub fn shortest_repr(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if v == 0.0 {
        return if v.is_sign_negative() { "-0.0" } else { "0.0" }.to_string();
    }

    // `{:e}` yields the shortest round-trip digits, e.g. "1.2345e-5".
    let sci = format!("{:e}", v);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    let decimal_point = exp + 1;
    if decimal_point > -4 && decimal_point <= 16 {
        let fixed = format!("{}", v);
        if fixed.contains('.') {
            fixed
        } else {
            fixed + ".0"
        }
    } else {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exp.unsigned_abs())
    }
}

/// Ordered concatenation of every encoded frame, in processing order.
///
/// Append-only: frames are added whole and never reordered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlobalStream {
    values: Vec<StreamValue>,
    frames: usize,
}

impl GlobalStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one frame's encoded values.
    pub fn append_frame(&mut self, encoded: &[StreamValue]) {
        self.values.extend_from_slice(encoded);
        self.frames += 1;
    }

    pub fn values(&self) -> &[StreamValue] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of frames appended so far.
    pub fn frame_count(&self) -> usize {
        self.frames
    }

    pub fn into_values(self) -> Vec<StreamValue> {
        self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_notation() {
        assert_eq!(shortest_repr(0.5), "0.5");
        assert_eq!(shortest_repr(1.0), "1.0");
        assert_eq!(shortest_repr(0.0), "0.0");
        assert_eq!(shortest_repr(0.0001), "0.0001");
        assert_eq!(shortest_repr(128.0 / 255.0), "0.5019607843137255");
        assert_eq!(shortest_repr(0.1 + 0.2), "0.30000000000000004");
    }

    #[test]
    fn test_exponent_notation() {
        assert_eq!(shortest_repr(0.00001), "1e-05");
        assert_eq!(shortest_repr(1.5e-7), "1.5e-07");
        assert_eq!(shortest_repr(1e16), "1e+16");
    }

    #[test]
    fn test_large_fixed() {
        assert_eq!(shortest_repr(1e15), "1000000000000000.0");
    }

    #[test]
    fn test_display() {
        assert_eq!(StreamValue::Int(42).to_string(), "42");
        assert_eq!(StreamValue::Float(0.25).to_string(), "0.25");
    }

    #[test]
    fn test_global_stream_appends_in_order() {
        let mut stream = GlobalStream::new();
        stream.append_frame(&[StreamValue::Int(1), StreamValue::Int(4)]);
        stream.append_frame(&[StreamValue::Int(0), StreamValue::Int(4)]);

        assert_eq!(stream.frame_count(), 2);
        assert_eq!(stream.len(), 4);
        assert_eq!(stream.values()[2], StreamValue::Int(0));
    }
}
