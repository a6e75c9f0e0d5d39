//! Move-within-sequence primitives shared by every reorder operation.
//!
//! Indices are validated before the sequence is touched; an out-of-range
//! index leaves the sequence unchanged.

use crate::model::ModelError;

/// Move the element at `from` so it ends up at `to`, shifting the elements
/// in between by one. `from == to` is a no-op.
pub fn move_element<T>(seq: &mut [T], from: usize, to: usize) -> Result<(), ModelError> {
    let len = seq.len();
    check_index(from, len)?;
    check_index(to, len)?;

    if from < to {
        seq[from..=to].rotate_left(1);
    } else if from > to {
        seq[to..=from].rotate_right(1);
    }
    Ok(())
}

/// Insert `value` at `index` (which may equal the length, meaning append).
pub fn insert_at<T>(seq: &mut Vec<T>, index: usize, value: T) -> Result<(), ModelError> {
    if index > seq.len() {
        return Err(ModelError::InvalidIndex {
            index,
            len: seq.len(),
        });
    }
    seq.insert(index, value);
    Ok(())
}

fn check_index(index: usize, len: usize) -> Result<(), ModelError> {
    if index >= len {
        return Err(ModelError::InvalidIndex { index, len });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_forward_shifts_intervening() {
        let mut seq = vec!['a', 'b', 'c'];
        move_element(&mut seq, 0, 2).unwrap();
        assert_eq!(seq, vec!['b', 'c', 'a']);
    }

    #[test]
    fn move_backward_shifts_intervening() {
        let mut seq = vec!['a', 'b', 'c', 'd'];
        move_element(&mut seq, 3, 1).unwrap();
        assert_eq!(seq, vec!['a', 'd', 'b', 'c']);
    }

    #[test]
    fn move_to_same_index_is_noop() {
        let mut seq = vec![1, 2, 3];
        move_element(&mut seq, 1, 1).unwrap();
        assert_eq!(seq, vec![1, 2, 3]);
    }

    #[test]
    fn move_preserves_elements_for_all_index_pairs() {
        let original: Vec<u32> = (0..6).collect();
        for from in 0..original.len() {
            for to in 0..original.len() {
                let mut seq = original.clone();
                move_element(&mut seq, from, to).unwrap();
                assert_eq!(seq.len(), original.len());
                assert_eq!(seq[to], original[from]);
                let mut sorted = seq.clone();
                sorted.sort();
                assert_eq!(sorted, original);
            }
        }
    }

    #[test]
    fn out_of_range_leaves_sequence_untouched() {
        let mut seq = vec![1, 2, 3];
        assert!(matches!(
            move_element(&mut seq, 0, 3),
            Err(ModelError::InvalidIndex { index: 3, len: 3 })
        ));
        assert!(move_element(&mut seq, 5, 0).is_err());
        assert_eq!(seq, vec![1, 2, 3]);
    }

    #[test]
    fn insert_allows_append_but_not_past_end() {
        let mut seq = vec![1, 2];
        insert_at(&mut seq, 2, 3).unwrap();
        assert_eq!(seq, vec![1, 2, 3]);
        assert!(insert_at(&mut seq, 5, 9).is_err());
        assert_eq!(seq, vec![1, 2, 3]);
    }
}
