use std::collections::VecDeque;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::error::Result;

/// A supplier of test vectors, one bit per primary input in declaration order
pub trait VectorSource {
    /// Obtain the next vector
    ///
    /// Returns None when there are no more vectors, which ends the session.
    fn next_vector(&mut self, nb_inputs: usize) -> Option<Result<Vec<bool>>>;
}

/// Uniformly random vectors, reproducible from a seed
#[derive(Clone, Debug)]
pub struct RandomVectors {
    rng: SmallRng,
}

impl RandomVectors {
    /// Create a random source from a seed
    pub fn from_seed(seed: u64) -> RandomVectors {
        RandomVectors {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl VectorSource for RandomVectors {
    fn next_vector(&mut self, nb_inputs: usize) -> Option<Result<Vec<bool>>> {
        Some(Ok((0..nb_inputs).map(|_| self.rng.gen()).collect()))
    }
}

/// A fixed list of vectors, consumed in order
#[derive(Clone, Debug, Default)]
pub struct VectorList {
    vectors: VecDeque<Vec<bool>>,
}

impl VectorList {
    /// Create a source from a list of vectors
    pub fn new(vectors: Vec<Vec<bool>>) -> VectorList {
        VectorList {
            vectors: vectors.into(),
        }
    }

    /// Number of vectors not consumed yet
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Returns whether all vectors were consumed
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

impl VectorSource for VectorList {
    fn next_vector(&mut self, _nb_inputs: usize) -> Option<Result<Vec<bool>>> {
        self.vectors.pop_front().map(Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::{RandomVectors, VectorList, VectorSource};

    #[test]
    fn test_random() {
        let mut a = RandomVectors::from_seed(3);
        let mut b = RandomVectors::from_seed(3);
        for _ in 0..10 {
            let va = a.next_vector(13).unwrap().unwrap();
            let vb = b.next_vector(13).unwrap().unwrap();
            assert_eq!(va.len(), 13);
            assert_eq!(va, vb);
        }
    }

    #[test]
    fn test_list() {
        let mut l = VectorList::new(vec![vec![true], vec![false, true]]);
        assert_eq!(l.len(), 2);
        assert_eq!(l.next_vector(1).unwrap().unwrap(), vec![true]);
        // Lengths are checked by the session, not the source
        assert_eq!(l.next_vector(1).unwrap().unwrap(), vec![false, true]);
        assert!(l.next_vector(1).is_none());
        assert!(l.is_empty());
    }
}
