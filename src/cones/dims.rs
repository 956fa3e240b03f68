use crate::algebra::{triangular_number, DimensionError};
use std::ops::Range;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single constituent block of a product cone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConeBlock {
    /// The nonnegative orthant of the given dimension
    Nonnegative(usize),
    /// A second order cone of the given dimension
    SecondOrder(usize),
    /// The cone of positive semidefinite matrices of the given order
    PSDTriangle(usize),
}

impl ConeBlock {
    /// number of entries in the unpacked layout
    pub fn numel_unpacked(&self) -> usize {
        match *self {
            ConeBlock::Nonnegative(l) => l,
            ConeBlock::SecondOrder(q) => q,
            ConeBlock::PSDTriangle(k) => k * k,
        }
    }

    /// number of entries in the packed layout
    pub fn numel_packed(&self) -> usize {
        match *self {
            ConeBlock::Nonnegative(l) => l,
            ConeBlock::SecondOrder(q) => q,
            ConeBlock::PSDTriangle(k) => triangular_number(k),
        }
    }

    pub fn degree(&self) -> usize {
        match *self {
            ConeBlock::Nonnegative(l) => l,
            // degree = 1 for SOC, since e'*e = 1
            ConeBlock::SecondOrder(_) => 1,
            ConeBlock::PSDTriangle(k) => k,
        }
    }
}

/// Layout of the product cone `R₊ˡ × Q(q[0]) × … × S(s[0]) × …`
///
/// The descriptor is validated on construction and is immutable
/// afterwards.
///
/// ```
/// use conekkt::cones::ConeDims;
///
/// let dims = ConeDims::new(2, vec![3], vec![2]).unwrap();
/// assert_eq!(dims.numel_unpacked(), 2 + 3 + 4);
/// assert_eq!(dims.numel_packed(), 2 + 3 + 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawConeDims"))]
pub struct ConeDims {
    l: usize,
    q: Vec<usize>,
    s: Vec<usize>,
}

impl ConeDims {
    /// Second order cones must have dimension at least 1.
    pub fn new(l: usize, q: Vec<usize>, s: Vec<usize>) -> Result<Self, DimensionError> {
        if q.iter().any(|&qi| qi == 0) {
            return Err(DimensionError::BadCone(
                "second order cones must have dimension at least 1",
            ));
        }
        Ok(Self { l, q, s })
    }

    /// dimension of the nonnegative orthant
    pub fn l(&self) -> usize {
        self.l
    }

    /// dimensions of the second order cones
    pub fn q(&self) -> &[usize] {
        &self.q
    }

    /// orders of the semidefinite cones
    pub fn s(&self) -> &[usize] {
        &self.s
    }

    /// constituent blocks in storage order.  The orthant is always
    /// reported first, even when `l == 0`.
    pub fn blocks(&self) -> impl Iterator<Item = ConeBlock> + '_ {
        std::iter::once(ConeBlock::Nonnegative(self.l))
            .chain(self.q.iter().map(|&q| ConeBlock::SecondOrder(q)))
            .chain(self.s.iter().map(|&k| ConeBlock::PSDTriangle(k)))
    }

    /// `l + Σq + Σk²`
    pub fn numel_unpacked(&self) -> usize {
        self.blocks().map(|b| b.numel_unpacked()).sum()
    }

    /// `l + Σq + Σk(k+1)/2`
    pub fn numel_packed(&self) -> usize {
        self.blocks().map(|b| b.numel_packed()).sum()
    }

    /// `l + |q| + Σk`
    pub fn degree(&self) -> usize {
        self.blocks().map(|b| b.degree()).sum()
    }

    /// number of entries stored verbatim in both layouts
    pub fn numel_linear(&self) -> usize {
        self.l + self.q.iter().sum::<usize>()
    }

    /// largest semidefinite order, or zero if there are none
    pub fn max_psd_order(&self) -> usize {
        self.s.iter().copied().max().unwrap_or(0)
    }

    /// index ranges of each block in the unpacked layout
    pub fn rng_unpacked(&self) -> Vec<Range<usize>> {
        make_ranges(self.blocks().map(|b| b.numel_unpacked()))
    }

    /// index ranges of each block in the packed layout
    pub fn rng_packed(&self) -> Vec<Range<usize>> {
        make_ranges(self.blocks().map(|b| b.numel_packed()))
    }
}

fn make_ranges(sizes: impl Iterator<Item = usize>) -> Vec<Range<usize>> {
    let mut start = 0;
    sizes
        .map(|n| {
            let stop = start + n;
            let rng = start..stop;
            start = stop;
            rng
        })
        .collect()
}

// serde goes through an unchecked mirror of the descriptor so that
// deserialized values are validated like any other
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawConeDims {
    l: usize,
    q: Vec<usize>,
    s: Vec<usize>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawConeDims> for ConeDims {
    type Error = DimensionError;
    fn try_from(raw: RawConeDims) -> Result<Self, Self::Error> {
        ConeDims::new(raw.l, raw.q, raw.s)
    }
}

#[test]
fn test_cone_dims() {
    let dims = ConeDims::new(3, vec![2, 3], vec![1, 2, 4]).unwrap();
    assert_eq!(dims.numel_unpacked(), 3 + 5 + 1 + 4 + 16);
    assert_eq!(dims.numel_packed(), 3 + 5 + 1 + 3 + 10);
    assert_eq!(dims.degree(), 3 + 2 + 7);
    assert_eq!(dims.numel_linear(), 8);
    assert_eq!(dims.max_psd_order(), 4);

    let rng = dims.rng_packed();
    assert_eq!(rng.len(), 6);
    assert_eq!(rng[0], 0..3);
    assert_eq!(rng[2], 5..8);
    assert_eq!(rng[5], 12..22);

    let rng = dims.rng_unpacked();
    assert_eq!(rng[4], 9..13);
    assert_eq!(rng[5], 13..29);
}

#[test]
fn test_cone_dims_empty() {
    let dims = ConeDims::default();
    assert_eq!(dims.numel_unpacked(), 0);
    assert_eq!(dims.numel_packed(), 0);
    assert_eq!(dims.max_psd_order(), 0);

    // zero order semidefinite blocks are allowed
    let dims = ConeDims::new(0, vec![], vec![0]).unwrap();
    assert_eq!(dims.numel_packed(), 0);
}

#[test]
fn test_cone_dims_bad_soc() {
    assert!(matches!(
        ConeDims::new(1, vec![2, 0], vec![]),
        Err(DimensionError::BadCone(_))
    ));
}
