//! Reordering a raw capture into one reconstructed source period

/// Capture order to reconstructed order. `indices()[k]` is the raw index of the
/// sample that belongs at position `k` of the reconstructed period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderPermutation(Vec<usize>);

impl ReorderPermutation {
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Gather `raw` into reconstructed order
    pub fn apply<T: Copy>(&self, raw: &[T]) -> Vec<T> {
        assert_eq!(raw.len(), self.0.len(), "Permutation and buffer lengths differ");
        self.0.iter().map(|&i| raw[i]).collect()
    }
}

/// Stable ascending sort of sample indices by their phase within the period
pub fn compute_order(relative: &[f64]) -> ReorderPermutation {
    let mut indices: Vec<usize> = (0..relative.len()).collect();
    // sort_by is stable, so equal phases keep capture order
    indices.sort_by(|&a, &b| relative[a].total_cmp(&relative[b]));
    ReorderPermutation(indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;

    #[test]
    fn test_order() {
        let perm = compute_order(&[0.0, 0.3, 0.1, 0.2]);
        assert_eq!(perm.indices(), &[0, 2, 3, 1]);
        assert_eq!(perm.apply(&[10i16, 13, 11, 12]), vec![10, 11, 12, 13]);
    }

    #[test]
    fn test_stable_ties() {
        let perm = compute_order(&[0.0, 0.5, 0.2, 0.5, 0.2, 0.5]);
        assert_eq!(perm.indices(), &[0, 2, 4, 1, 3, 5]);
    }

    #[test]
    fn test_bijection() {
        let mut rng = rand::thread_rng();
        for len in 1..200 {
            let relative: Vec<f64> = (0..len).map(|_| rng.gen_range(0..16) as f64 * 0.125).collect();
            let perm = compute_order(&relative);
            assert_eq!(perm.len(), len);
            let mut seen = vec![false; len];
            for &i in perm.indices() {
                assert!(!seen[i], "index {} appears twice", i);
                seen[i] = true;
            }
            assert!(seen.iter().all(|&s| s));
            // Sorted, and ties in capture order
            for w in perm.indices().windows(2) {
                let (a, b) = (relative[w[0]], relative[w[1]]);
                assert!(a < b || (a == b && w[0] < w[1]));
            }
        }
    }

    #[test]
    fn test_empty() {
        let perm = compute_order(&[]);
        assert!(perm.is_empty());
        assert!(perm.apply::<i16>(&[]).is_empty());
    }

    #[test]
    #[should_panic]
    fn test_apply_length_mismatch() {
        compute_order(&[0.0, 0.1]).apply(&[1i16]);
    }
}
