//! Input padding and greedy decoding of score matrices.
#![allow(clippy::cast_possible_truncation)]

use ndarray::{ArrayView1, Axis};

use crate::engine::ScoreMatrix;
use crate::errors::{PhonemizeError, Result};
use crate::tokenizer::{PAD_ID, TokenId};

/// Right-pad `ids` with [`PAD_ID`] up to `min_len`. Longer input is left as is.
pub fn pad_ids(mut ids: Vec<TokenId>, min_len: usize) -> Vec<TokenId> {
    if ids.len() < min_len {
        ids.resize(min_len, PAD_ID);
    }
    ids
}

/// Greedy decode: the highest-scoring vocabulary index at every position of
/// the first batch row.
///
/// Positions are independent. On an exact tie the lowest index wins; `NaN`
/// never wins, and a row with no comparable score decodes to `0`.
pub fn greedy_decode(scores: &ScoreMatrix) -> Result<Vec<TokenId>> {
    if scores.shape()[0] == 0 {
        return Err(PhonemizeError::InvalidOutput(format!(
            "empty batch in score matrix {:?}",
            scores.shape()
        )));
    }
    let batch = scores.index_axis(Axis(0), 0);
    batch
        .outer_iter()
        .map(|row| {
            let idx = argmax(row);
            TokenId::try_from(idx).map_err(|_| {
                PhonemizeError::InvalidOutput(format!("vocabulary index {idx} out of range"))
            })
        })
        .collect()
}

/// Index of the first maximum. Strict `>` keeps the earliest index on ties.
fn argmax(row: ArrayView1<'_, f32>) -> usize {
    let mut best_idx = 0;
    let mut best = f32::NEG_INFINITY;
    for (i, &v) in row.iter().enumerate() {
        if v > best {
            best = v;
            best_idx = i;
        }
    }
    best_idx
}

#[cfg(test)]
mod tests {
    use ndarray::{Array3, arr1};

    use super::*;

    fn matrix(rows: &[&[f32]]) -> ScoreMatrix {
        let vocab = rows[0].len();
        let flat: Vec<f32> = rows.iter().flat_map(|r| r.iter().copied()).collect();
        Array3::from_shape_vec((1, rows.len(), vocab), flat).unwrap()
    }

    #[test]
    fn pad_short_sequence_to_min_len() {
        let padded = pad_ids(vec![5, 6, 7], 64);
        assert_eq!(padded.len(), 64);
        assert_eq!(&padded[..3], &[5, 6, 7]);
        assert!(padded[3..].iter().all(|&id| id == PAD_ID));
    }

    #[test]
    fn pad_exact_and_long_sequences_untouched() {
        let exact: Vec<TokenId> = (1..=64).collect();
        assert_eq!(pad_ids(exact.clone(), 64), exact);

        let long: Vec<TokenId> = (1..=100).collect();
        let out = pad_ids(long.clone(), 64);
        assert_eq!(out.len(), 100);
        assert_eq!(out, long);
    }

    #[test]
    fn pad_empty_sequence() {
        assert_eq!(pad_ids(Vec::new(), 4), vec![0, 0, 0, 0]);
    }

    #[test]
    fn argmax_basic() {
        assert_eq!(argmax(arr1(&[1.0, 3.0, 2.0]).view()), 1);
        assert_eq!(argmax(arr1(&[5.0, 1.0, 2.0]).view()), 0);
        assert_eq!(argmax(arr1(&[-3.0, -1.0, -2.0]).view()), 1);
    }

    #[test]
    fn argmax_tie_prefers_lowest_index() {
        assert_eq!(argmax(arr1(&[0.5, 2.0, 2.0, 1.0]).view()), 1);
        assert_eq!(argmax(arr1(&[7.0, 7.0, 7.0]).view()), 0);
    }

    #[test]
    fn argmax_nan_and_empty() {
        assert_eq!(argmax(arr1(&[f32::NAN, 1.0, f32::NAN]).view()), 1);
        assert_eq!(argmax(arr1(&[f32::NAN, f32::NAN]).view()), 0);
        assert_eq!(argmax(arr1::<f32>(&[]).view()), 0);
    }

    #[test]
    fn greedy_decode_one_id_per_position() {
        let scores = matrix(&[
            &[0.1, 0.9, 0.0],
            &[2.0, 1.0, 0.5],
            &[0.0, 0.0, 3.0],
            &[1.0, 1.0, 0.0],
        ]);
        assert_eq!(greedy_decode(&scores).unwrap(), vec![1, 0, 2, 0]);
    }

    #[test]
    fn greedy_decode_is_deterministic() {
        let scores = matrix(&[&[0.2, 0.3, 0.1], &[0.9, 0.3, 0.4], &[0.1, 0.2, 0.8]]);
        let first = greedy_decode(&scores).unwrap();
        for _ in 0..10 {
            assert_eq!(greedy_decode(&scores).unwrap(), first);
        }
    }

    #[test]
    fn greedy_decode_reads_first_batch_row_only() {
        let flat = vec![
            0.0, 1.0, // batch 0, pos 0
            1.0, 0.0, // batch 0, pos 1
            9.0, 0.0, // batch 1, pos 0
            0.0, 9.0, // batch 1, pos 1
        ];
        let scores = Array3::from_shape_vec((2, 2, 2), flat).unwrap();
        assert_eq!(greedy_decode(&scores).unwrap(), vec![1, 0]);
    }

    #[test]
    fn greedy_decode_empty_sequence() {
        let scores = Array3::<f32>::zeros((1, 0, 5));
        assert!(greedy_decode(&scores).unwrap().is_empty());
    }

    #[test]
    fn greedy_decode_empty_batch_is_error() {
        let scores = Array3::<f32>::zeros((0, 4, 5));
        assert!(matches!(
            greedy_decode(&scores),
            Err(PhonemizeError::InvalidOutput(_))
        ));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn pad_length_is_max_of_input_and_min(len in 0usize..200, min in 0usize..128) {
                let ids: Vec<TokenId> = (0..len).map(|i| (i % 7) as TokenId + 1).collect();
                let out = pad_ids(ids.clone(), min);
                prop_assert_eq!(out.len(), len.max(min));
                prop_assert_eq!(&out[..len], &ids[..]);
            }

            #[test]
            fn decoded_id_scores_are_row_maxima(
                flat in proptest::collection::vec(-10.0f32..10.0, 24)
            ) {
                let scores = Array3::from_shape_vec((1, 4, 6), flat).unwrap();
                let ids = greedy_decode(&scores).unwrap();
                prop_assert_eq!(ids.len(), 4);
                for (t, &id) in ids.iter().enumerate() {
                    let row = scores.index_axis(Axis(0), 0);
                    let row = row.index_axis(Axis(0), t);
                    let best = row[id as usize];
                    prop_assert!(row.iter().all(|&v| v <= best));
                    prop_assert!(row.iter().take(id as usize).all(|&v| v < best));
                }
            }
        }
    }
}
