//! Masked arrays for decoded fgmax fields.
//!
//! A [`MaskedArray`] pairs an `ndarray` data array with a boolean mask of the
//! same shape. `true` in the mask means the value carries no information and
//! must not be used.

use ndarray::{ArrayD, Zip};
use num_traits::{Float, NumCast};

use crate::types::SENTINEL_THRESHOLD;

/// A data array with a same-shaped mask; masked entries are invalid.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskedArray<T> {
    data: ArrayD<T>,
    mask: ArrayD<bool>,
}

impl<T: Copy> MaskedArray<T> {
    /// Wrap an array with nothing masked.
    pub fn new(data: ArrayD<T>) -> Self {
        let mask = ArrayD::from_elem(data.raw_dim(), false);
        Self { data, mask }
    }

    /// Wrap an array masking every entry where `predicate` holds.
    pub fn masked_where(data: ArrayD<T>, predicate: impl Fn(T) -> bool) -> Self {
        let mask = data.mapv(predicate);
        Self { data, mask }
    }

    /// Raw values, including masked ones.
    pub fn data(&self) -> &ArrayD<T> {
        &self.data
    }

    /// The mask; `true` marks invalid entries.
    pub fn mask(&self) -> &ArrayD<bool> {
        &self.mask
    }

    /// Shape of the array.
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// Add `extra` to the mask (logical or).
    ///
    /// # Panics
    /// Panics if `extra` does not have the array's shape.
    pub fn mask_with(mut self, extra: &ArrayD<bool>) -> Self {
        Zip::from(&mut self.mask).and(extra).for_each(|m, &e| *m |= e);
        self
    }

    /// Value at `index` if it exists and is not masked.
    pub fn get(&self, index: &[usize]) -> Option<T> {
        match self.mask.get(index) {
            Some(false) => self.data.get(index).copied(),
            _ => None,
        }
    }

    /// Check whether `index` is masked. Out-of-range indices count as masked.
    pub fn is_masked(&self, index: &[usize]) -> bool {
        self.mask.get(index).copied().unwrap_or(true)
    }

    /// Number of unmasked entries.
    pub fn count(&self) -> usize {
        self.mask.iter().filter(|m| !**m).count()
    }

    /// Unmasked values in logical (row-major) iteration order.
    pub fn compressed(&self) -> Vec<T> {
        self.data
            .iter()
            .zip(self.mask.iter())
            .filter(|(_, m)| !**m)
            .map(|(v, _)| *v)
            .collect()
    }

    /// Choose, per entry, `other` where `select` holds and `self` elsewhere.
    /// Masks follow the chosen value.
    pub fn select_from(mut self, select: &ArrayD<bool>, other: &MaskedArray<T>) -> Self {
        Zip::from(&mut self.data)
            .and(&mut self.mask)
            .and(select)
            .and(&other.data)
            .and(&other.mask)
            .for_each(|d, m, &s, &od, &om| {
                if s {
                    *d = od;
                    *m = om;
                }
            });
        self
    }
}

impl<T: Copy + PartialOrd> MaskedArray<T> {
    /// Largest unmasked value.
    pub fn max(&self) -> Option<T> {
        self.compressed()
            .into_iter()
            .fold(None, |acc, v| match acc {
                Some(a) if a >= v => Some(a),
                _ => Some(v),
            })
    }

    /// Smallest unmasked value.
    pub fn min(&self) -> Option<T> {
        self.compressed()
            .into_iter()
            .fold(None, |acc, v| match acc {
                Some(a) if a <= v => Some(a),
                _ => Some(v),
            })
    }
}

impl<T: Float> MaskedArray<T> {
    /// Wrap an array masking the "no data" sentinel values.
    pub fn masked_sentinel(data: ArrayD<T>) -> Self {
        let threshold = <T as NumCast>::from(SENTINEL_THRESHOLD).unwrap_or_else(T::neg_infinity);
        Self::masked_where(data, |v| v < threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::IxDyn;

    fn arr(values: &[f64], dims: &[usize]) -> ArrayD<f64> {
        ArrayD::from_shape_vec(IxDyn(dims), values.to_vec()).unwrap()
    }

    #[test]
    fn test_masked_where_and_get() {
        let m = MaskedArray::masked_where(arr(&[1.0, -2.0, 3.0, -4.0], &[2, 2]), |v| v < 0.0);
        assert_eq!(m.get(&[0, 0]), Some(1.0));
        assert_eq!(m.get(&[0, 1]), None);
        assert!(m.is_masked(&[1, 1]));
        assert!(m.is_masked(&[5, 5]));
        assert_eq!(m.count(), 2);
        assert_eq!(m.compressed(), vec![1.0, 3.0]);
    }

    #[test]
    fn test_sentinel_mask() {
        let m = MaskedArray::masked_sentinel(arr(&[-9.9e99, 0.0, -1e49], &[3]));
        assert!(m.is_masked(&[0]));
        assert!(!m.is_masked(&[1]));
        assert!(!m.is_masked(&[2]));
    }

    #[test]
    fn test_mask_with_is_union() {
        let m = MaskedArray::masked_where(arr(&[1.0, -1.0, 2.0], &[3]), |v| v < 0.0);
        let extra = ArrayD::from_shape_vec(IxDyn(&[3]), vec![true, false, false]).unwrap();
        let m = m.mask_with(&extra);
        assert_eq!(m.compressed(), vec![2.0]);
    }

    #[test]
    fn test_select_from_takes_mask_of_source() {
        let base = MaskedArray::new(arr(&[1.0, 2.0, 3.0], &[3]));
        let other = MaskedArray::masked_where(arr(&[10.0, -20.0, 30.0], &[3]), |v| v < 0.0);
        let select = ArrayD::from_shape_vec(IxDyn(&[3]), vec![false, true, true]).unwrap();
        let out = base.select_from(&select, &other);
        assert_eq!(out.get(&[0]), Some(1.0));
        assert_eq!(out.get(&[1]), None);
        assert_eq!(out.get(&[2]), Some(30.0));
    }

    #[test]
    fn test_min_max_ignore_masked() {
        let m = MaskedArray::masked_where(arr(&[5.0, 100.0, -3.0], &[3]), |v| v > 50.0);
        assert_eq!(m.max(), Some(5.0));
        assert_eq!(m.min(), Some(-3.0));

        let all = MaskedArray::masked_where(arr(&[1.0], &[1]), |_| true);
        assert_eq!(all.max(), None);
    }
}
