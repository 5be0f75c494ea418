//! Bucket packing - split the global stream into named text buckets.
//!
//! With `L = floor(len / B)`, bucket `i < B - 1` closes at the first index
//! after it opened that is a positive multiple of `L`, inclusive of that
//! index. The last bucket takes everything left. So for 10 values in 3
//! buckets (`L = 3`) the buckets hold `[0..=3]`, `[4..=6]` and `[7..=9]`.

use std::ops::Range;

use log::warn;
use serde::ser::{Serialize, SerializeMap, Serializer};

use super::StreamValue;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BucketError {
    #[error("bucket count must be at least 1")]
    ZeroBuckets,
}

/// One named bucket: a contiguous slice of the stream and its text form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub range: Range<usize>,
    pub text: String,
}

/// Every bucket, in index order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buckets {
    buckets: Vec<Bucket>,
    bucket_length: usize,
}

impl Buckets {
    /// Name of bucket `index`.
    pub fn name(index: usize) -> String {
        format!("f{index}")
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// `floor(stream_len / bucket_count)`.
    pub fn bucket_length(&self) -> usize {
        self.bucket_length
    }

    pub fn get(&self, index: usize) -> Option<&Bucket> {
        self.buckets.get(index)
    }

    /// `(name, bucket)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (String, &Bucket)> {
        self.buckets
            .iter()
            .enumerate()
            .map(|(i, b)| (Self::name(i), b))
    }

    pub fn ranges(&self) -> Vec<Range<usize>> {
        self.buckets.iter().map(|b| b.range.clone()).collect()
    }
}

impl Serialize for Buckets {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.buckets.len()))?;
        for (name, bucket) in self.iter() {
            map.serialize_entry(&name, &bucket.text)?;
        }
        map.end()
    }
}

/// Comma-joined text of `values`.
pub fn join_values(values: &[StreamValue]) -> String {
    let mut out = String::new();
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&v.to_string());
    }
    out
}

/// Slice boundaries for `len` values in `bucket_count` buckets.
pub fn bucket_ranges(len: usize, bucket_count: usize) -> Result<Vec<Range<usize>>, BucketError> {
    if bucket_count == 0 {
        return Err(BucketError::ZeroBuckets);
    }

    let bucket_length = len / bucket_count;
    if bucket_length == 0 {
        // Fewer values than buckets: one value each, the rest stay empty.
        return Ok((0..bucket_count)
            .map(|i| if i < len { i..i + 1 } else { len..len })
            .collect());
    }

    let mut ranges = Vec::with_capacity(bucket_count);
    let mut start = 0;
    for idx in 1..len {
        if ranges.len() + 1 == bucket_count {
            break;
        }
        if idx % bucket_length == 0 {
            ranges.push(start..idx + 1);
            start = idx + 1;
        }
    }
    ranges.push(start..len);
    Ok(ranges)
}

/// Pack `values` into `bucket_count` buckets named `f0..f{B-1}`.
pub fn pack(values: &[StreamValue], bucket_count: usize) -> Result<Buckets, BucketError> {
    let ranges = bucket_ranges(values.len(), bucket_count)?;
    let bucket_length = values.len() / bucket_count;
    if bucket_length == 0 && !values.is_empty() {
        warn!(
            "Stream of {} values is shorter than {} buckets; trailing buckets are empty",
            values.len(),
            bucket_count
        );
    }

    let buckets = ranges
        .into_iter()
        .map(|range| Bucket {
            text: join_values(&values[range.clone()]),
            range,
        })
        .collect();

    Ok(Buckets {
        buckets,
        bucket_length,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn stream(len: usize) -> Vec<StreamValue> {
        (0..len as u64).map(StreamValue::Int).collect()
    }

    #[test]
    fn test_ten_into_three() {
        let buckets = pack(&stream(10), 3).unwrap();
        assert_eq!(buckets.bucket_length(), 3);
        assert_eq!(buckets.ranges(), vec![0..4, 4..7, 7..10]);
        assert_eq!(buckets.get(0).unwrap().text, "0,1,2,3");
        assert_eq!(buckets.get(1).unwrap().text, "4,5,6");
        assert_eq!(buckets.get(2).unwrap().text, "7,8,9");
    }

    #[test]
    fn test_remainder_rolls_into_last() {
        assert_eq!(bucket_ranges(11, 3).unwrap(), vec![0..4, 4..7, 7..11]);
        assert_eq!(bucket_ranges(14, 3).unwrap(), vec![0..5, 5..9, 9..14]);
        assert_eq!(bucket_ranges(20, 3).unwrap(), vec![0..7, 7..13, 13..20]);
    }

    #[test]
    fn test_single_bucket_holds_everything() {
        let buckets = pack(&stream(5), 1).unwrap();
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets.get(0).unwrap().text, "0,1,2,3,4");
    }

    #[test]
    fn test_len_equal_to_count() {
        // L = 1: the first bucket absorbs the boundary element, the last is empty.
        assert_eq!(bucket_ranges(3, 3).unwrap(), vec![0..2, 2..3, 3..3]);
    }

    #[test]
    fn test_shorter_than_bucket_count() {
        let buckets = pack(&stream(2), 4).unwrap();
        assert_eq!(buckets.bucket_length(), 0);
        assert_eq!(buckets.ranges(), vec![0..1, 1..2, 2..2, 2..2]);
        assert_eq!(buckets.get(3).unwrap().text, "");
    }

    #[test]
    fn test_empty_stream() {
        let buckets = pack(&[], 2).unwrap();
        assert_eq!(buckets.len(), 2);
        assert!(buckets.iter().all(|(_, b)| b.text.is_empty()));
    }

    #[test]
    fn test_zero_buckets_rejected() {
        assert_eq!(pack(&stream(3), 0), Err(BucketError::ZeroBuckets));
    }

    #[test]
    fn test_serialize_in_index_order() {
        let buckets = pack(&stream(24), 12).unwrap();
        let json = serde_json::to_string(&buckets).unwrap();
        assert!(json.starts_with(r#"{"f0":"0,1,2","f1":"3,4","#));
        assert!(json.find(r#""f9""#).unwrap() < json.find(r#""f10""#).unwrap());
        assert!(json.ends_with(r#""f10":"21,22","f11":"23"}"#));
    }

    #[test]
    fn test_float_text() {
        let values = vec![
            StreamValue::Float(0.5),
            StreamValue::Float(1.0),
            StreamValue::Float(0.00001),
            StreamValue::Int(4),
        ];
        assert_eq!(join_values(&values), "0.5,1.0,1e-05,4");
    }

    proptest! {
        #[test]
        fn prop_buckets_partition_stream(len in 1usize..300, count in 1usize..40) {
            prop_assume!(count <= len);
            let values = stream(len);
            let buckets = pack(&values, count).unwrap();

            prop_assert_eq!(buckets.len(), count);
            let mut next = 0;
            for (_, bucket) in buckets.iter() {
                prop_assert_eq!(bucket.range.start, next);
                next = bucket.range.end;
            }
            prop_assert_eq!(next, len);

            let joined: Vec<&str> = buckets
                .iter()
                .map(|(_, b)| b.text.as_str())
                .filter(|t| !t.is_empty())
                .collect();
            prop_assert_eq!(joined.join(","), join_values(&values));
        }
    }
}
