//! Sequence diff between two ordered lists of identifiable items
//!
//! The edit script comes from a longest-common-subsequence walk: items on
//! the LCS stay in place, everything else is deleted from the old list or
//! inserted into the new one. An identity that is both deleted and inserted
//! is reported once, as a move.

use std::collections::{HashMap, HashSet, VecDeque};
use std::hash::Hash;

/// Items with a stable identity, independent of their value
pub trait Identifiable {
    /// Identity type
    type Id: Eq + Hash + Clone;

    /// Identity of this item
    fn identity(&self) -> Self::Id;
}

impl<T: Identifiable> Identifiable for &T {
    type Id = T::Id;

    fn identity(&self) -> T::Id {
        (**self).identity()
    }
}

/// Positional edit script
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Delta {
    /// Indices into the new sequence
    pub inserted: Vec<usize>,
    /// Indices into the old sequence
    pub deleted: Vec<usize>,
    /// `(old index, new index)` pairs
    pub moved: Vec<(usize, usize)>,
}

impl Delta {
    /// Whether nothing changed
    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty() && self.deleted.is_empty() && self.moved.is_empty()
    }
}

/// Compute the edit script turning `old` into `new`
pub fn diff<T: Identifiable>(old: &[T], new: &[T]) -> Delta {
    let old_ids: Vec<T::Id> = old.iter().map(Identifiable::identity).collect();
    let new_ids: Vec<T::Id> = new.iter().map(Identifiable::identity).collect();

    // Common prefix and suffix never move.
    let prefix = old_ids
        .iter()
        .zip(&new_ids)
        .take_while(|(a, b)| a == b)
        .count();
    let suffix = old_ids[prefix..]
        .iter()
        .rev()
        .zip(new_ids[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();

    let old_mid = &old_ids[prefix..old_ids.len() - suffix];
    let new_mid = &new_ids[prefix..new_ids.len() - suffix];

    let (deleted, inserted) = lcs_edits(old_mid, new_mid);
    let deleted: Vec<usize> = deleted.into_iter().map(|i| i + prefix).collect();
    let inserted: Vec<usize> = inserted.into_iter().map(|j| j + prefix).collect();

    pair_moves(&old_ids, &new_ids, deleted, inserted)
}

/// Deleted and inserted indices (relative to the slices) off the LCS.
///
/// Hirschberg's split: memory stays linear in the shorter side while time is
/// `n * m`.
fn lcs_edits<I: Eq>(old: &[I], new: &[I]) -> (Vec<usize>, Vec<usize>) {
    let mut deleted = Vec::new();
    let mut inserted = Vec::new();
    split_edits(old, new, 0, 0, &mut deleted, &mut inserted);
    (deleted, inserted)
}

fn split_edits<I: Eq>(
    old: &[I],
    new: &[I],
    old_offset: usize,
    new_offset: usize,
    deleted: &mut Vec<usize>,
    inserted: &mut Vec<usize>,
) {
    if old.is_empty() {
        inserted.extend(new_offset..new_offset + new.len());
        return;
    }
    if new.is_empty() {
        deleted.extend(old_offset..old_offset + old.len());
        return;
    }
    if old.len() == 1 {
        match new.iter().position(|item| *item == old[0]) {
            Some(hit) => inserted.extend(
                (0..new.len())
                    .filter(|&j| j != hit)
                    .map(|j| j + new_offset),
            ),
            None => {
                deleted.push(old_offset);
                inserted.extend(new_offset..new_offset + new.len());
            }
        }
        return;
    }

    let mid = old.len() / 2;
    let forward = lcs_row(old[..mid].iter(), new.iter(), new.len());
    let backward = lcs_row(old[mid..].iter().rev(), new.iter().rev(), new.len());

    // best place to cut `new` so both halves keep the most matches
    let mut split = 0;
    let mut best = 0;
    for j in 0..=new.len() {
        let total = forward[j] + backward[new.len() - j];
        if total > best {
            best = total;
            split = j;
        }
    }

    split_edits(&old[..mid], &new[..split], old_offset, new_offset, deleted, inserted);
    split_edits(
        &old[mid..],
        &new[split..],
        old_offset + mid,
        new_offset + split,
        deleted,
        inserted,
    );
}

/// `row[j]` = LCS length of all of `a` and the first `j` items of `b`
fn lcs_row<'a, I: Eq + 'a>(
    a: impl Iterator<Item = &'a I>,
    b: impl Iterator<Item = &'a I> + Clone,
    b_len: usize,
) -> Vec<u32> {
    let mut row = vec![0_u32; b_len + 1];
    for x in a {
        let mut diagonal = 0;
        for (j, y) in b.clone().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if x == y {
                diagonal + 1
            } else {
                above.max(row[j])
            };
            diagonal = above;
        }
    }
    row
}

fn pair_moves<I: Eq + Hash + Clone>(
    old_ids: &[I],
    new_ids: &[I],
    deleted: Vec<usize>,
    inserted: Vec<usize>,
) -> Delta {
    let mut pending: HashMap<&I, VecDeque<usize>> = HashMap::new();
    for &j in &inserted {
        pending.entry(&new_ids[j]).or_default().push_back(j);
    }

    let mut delta = Delta::default();
    let mut moved_to = HashSet::new();
    for i in deleted {
        match pending.get_mut(&old_ids[i]).and_then(VecDeque::pop_front) {
            Some(j) => {
                delta.moved.push((i, j));
                moved_to.insert(j);
            }
            None => delta.deleted.push(i),
        }
    }
    delta.inserted = inserted
        .into_iter()
        .filter(|j| !moved_to.contains(j))
        .collect();
    delta
}
