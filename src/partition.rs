//! Train/test split over a shuffled snapshot of the catalog.

use catalog::EntityRecord;
use rand::Rng;
use rand::seq::SliceRandom;

/// A shuffled snapshot of record references, split at a fixed index.
///
/// The snapshot owns only references; the catalog it was taken from is
/// never reordered.
#[derive(Debug, Clone)]
pub struct Partition<'a> {
    shuffled: Vec<&'a EntityRecord>,
    split: usize,
}

impl<'a> Partition<'a> {
    /// The first `floor(n * train_ratio)` records of the shuffled snapshot.
    pub fn train(&self) -> &[&'a EntityRecord] {
        &self.shuffled[..self.split]
    }

    pub fn test(&self) -> &[&'a EntityRecord] {
        &self.shuffled[self.split..]
    }

    /// The whole snapshot in shuffled order.
    pub fn shuffled(&self) -> &[&'a EntityRecord] {
        &self.shuffled
    }

    pub fn split_index(&self) -> usize {
        self.split
    }
}

/// Shuffle a snapshot of `records` with `rng` and split it.
///
/// `train_ratio` is clamped to `[0, 1]`.
pub fn partition<'a, I, R>(records: I, train_ratio: f64, rng: &mut R) -> Partition<'a>
where
    I: IntoIterator<Item = &'a EntityRecord>,
    R: Rng + ?Sized,
{
    let mut shuffled: Vec<&'a EntityRecord> = records.into_iter().collect();
    shuffled.shuffle(rng);

    let n = shuffled.len();
    let split = ((n as f64) * train_ratio.clamp(0.0, 1.0)).floor() as usize;
    Partition {
        shuffled,
        split: split.min(n),
    }
}
