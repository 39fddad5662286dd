//! Permutations, cyclic orientation vectors, and the wreath product law that
//! combines them.
//!
//! Permutations are 1-indexed: a permutation of length `k` is a sequence
//! containing every value of `1..=k` exactly once, and `p[i]` names the piece
//! that moves into position `i + 1`. Orientation vectors hold one value of
//! `Z_n` per position.
//!
//! The free functions validate their arguments and are meant for untrusted
//! data. [`WreathElement`] validates once on construction and then uses the
//! unchecked kernels, since every element in circulation already satisfies
//! the orbit invariants.

use itertools::Itertools;
use std::num::NonZeroU8;
use thiserror::Error;

/// The shape of one orbit of pieces: `k` pieces, each with an orientation in
/// `Z_n`.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct OrbitDef {
    pub piece_count: NonZeroU8,
    pub orientation_count: NonZeroU8,
}

#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum InvalidStateError {
    #[error("Invalid piece count, expected {expected} pieces but got {actual}")]
    PieceCountMismatch { expected: usize, actual: usize },
    #[error("Invalid orbit count, expected {expected} orbits but got {actual}")]
    OrbitCountMismatch { expected: usize, actual: usize },
    #[error("Invalid orientation, expected a value between 0 and {max} but got {actual}")]
    OrientationOutOfRange { max: u8, actual: u8 },
    #[error("Permutation out of range, expected a value between 1 and {expected} but got {actual}")]
    PermutationOutOfRange { expected: usize, actual: u8 },
    #[error("Permutation is not a bijection: {0:?}")]
    NotABijection(Vec<u8>),
}

/// The ways an orientation modulus can be inconsistent with the data it is
/// applied to.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum ModulusError {
    #[error("The orientation modulus must be positive")]
    Zero,
    #[error("Expected orientation modulus {expected} but got {actual}")]
    Mismatch { expected: u8, actual: u8 },
    #[error("Orientation {value} is not an element of Z_{modulus}")]
    ValueOutOfRange { modulus: u8, value: u8 },
}

#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum GroupError {
    #[error("Invalid state: {0}")]
    InvalidState(#[from] InvalidStateError),
    #[error("Invalid modulus: {0}")]
    InvalidModulus(#[from] ModulusError),
}

/// One orbit state, or equivalently one element of the wreath product
/// `Z_n ≀ S_k`.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct WreathElement {
    orbit_def: OrbitDef,
    orientation: Box<[u8]>,
    permutation: Box<[u8]>,
}

impl OrbitDef {
    /// Returns `None` if either count is zero.
    #[must_use]
    pub const fn new(piece_count: u8, orientation_count: u8) -> Option<Self> {
        match (
            NonZeroU8::new(piece_count),
            NonZeroU8::new(orientation_count),
        ) {
            (Some(piece_count), Some(orientation_count)) => Some(OrbitDef {
                piece_count,
                orientation_count,
            }),
            _ => None,
        }
    }

    #[must_use]
    pub fn piece_count(self) -> usize {
        usize::from(self.piece_count.get())
    }

    #[must_use]
    pub fn orientation_count(self) -> u8 {
        self.orientation_count.get()
    }
}

fn check_same_length(expected: usize, actual: usize) -> Result<(), InvalidStateError> {
    if expected == actual {
        Ok(())
    } else {
        Err(InvalidStateError::PieceCountMismatch { expected, actual })
    }
}

/// Check that `permutation` is a bijection on `1..=len`.
///
/// # Errors
///
/// If a value is out of range or repeated.
pub fn validate_permutation(permutation: &[u8]) -> Result<(), InvalidStateError> {
    let mut covered = vec![false; permutation.len()];
    for &value in permutation {
        match usize::from(value)
            .checked_sub(1)
            .and_then(|i| covered.get_mut(i))
        {
            Some(seen) if !*seen => *seen = true,
            Some(_) => return Err(InvalidStateError::NotABijection(permutation.to_vec())),
            None => {
                return Err(InvalidStateError::PermutationOutOfRange {
                    expected: permutation.len(),
                    actual: value,
                });
            }
        }
    }
    Ok(())
}

/// Check that every value of `orientation` lies in `Z_modulus`.
///
/// # Errors
///
/// If the modulus is zero or a value is not below it.
pub fn validate_orientation(orientation: &[u8], modulus: u8) -> Result<(), ModulusError> {
    if modulus == 0 {
        return Err(ModulusError::Zero);
    }
    match orientation.iter().find(|&&value| value >= modulus) {
        Some(&value) => Err(ModulusError::ValueOutOfRange { modulus, value }),
        None => Ok(()),
    }
}

fn compose_unchecked(p1: &[u8], p2: &[u8]) -> Box<[u8]> {
    p2.iter().map(|&j| p1[usize::from(j) - 1]).collect()
}

fn invert_unchecked(p: &[u8]) -> Box<[u8]> {
    let mut inverse = vec![0; p.len()].into_boxed_slice();
    for (i, &j) in p.iter().enumerate() {
        // Orbits have at most 255 pieces
        #[allow(clippy::cast_possible_truncation)]
        let piece = i as u8 + 1;
        inverse[usize::from(j) - 1] = piece;
    }
    inverse
}

fn act_unchecked(p: &[u8], v: &[u8]) -> Box<[u8]> {
    // v'[i] = v[p_inv[i]], which is v'[p[j]] = v[j]
    let mut acted = vec![0; v.len()].into_boxed_slice();
    for (&target, &value) in p.iter().zip(v) {
        acted[usize::from(target) - 1] = value;
    }
    acted
}

fn cyc_add_unchecked(v1: &[u8], v2: &[u8], modulus: u8) -> Box<[u8]> {
    v1.iter()
        .zip(v2)
        .map(|(&a, &b)| {
            // Both operands are below the modulus so the sum is too after the
            // reduction
            #[allow(clippy::cast_possible_truncation)]
            let sum = ((u16::from(a) + u16::from(b)) % u16::from(modulus)) as u8;
            sum
        })
        .collect()
}

fn cyc_neg_unchecked(v: &[u8], modulus: u8) -> Box<[u8]> {
    v.iter().map(|&a| (modulus - a) % modulus).collect()
}

/// Permutation composition: `p[i] = p1[p2[i]]`, so `p2` is applied first.
///
/// # Errors
///
/// If either argument is not a permutation or their lengths differ.
pub fn compose(p1: &[u8], p2: &[u8]) -> Result<Box<[u8]>, InvalidStateError> {
    check_same_length(p1.len(), p2.len())?;
    validate_permutation(p1)?;
    validate_permutation(p2)?;
    Ok(compose_unchecked(p1, p2))
}

/// The unique permutation `p_inv` with `compose(p, p_inv)` equal to the
/// identity.
///
/// # Errors
///
/// If `p` is not a permutation.
pub fn invert(p: &[u8]) -> Result<Box<[u8]>, InvalidStateError> {
    validate_permutation(p)?;
    Ok(invert_unchecked(p))
}

/// The action of a permutation on an orientation vector,
/// `v'[i] = v[p_inv[i]]`. Position `i` receives the orientation of the piece
/// that `p` moves into it.
///
/// # Errors
///
/// If `p` is not a permutation or the lengths differ.
pub fn act(p: &[u8], v: &[u8]) -> Result<Box<[u8]>, InvalidStateError> {
    check_same_length(p.len(), v.len())?;
    validate_permutation(p)?;
    Ok(act_unchecked(p, v))
}

/// Pointwise addition in `Z_modulus`.
///
/// # Errors
///
/// If the lengths differ or either vector holds a value outside
/// `Z_modulus`, which means it was computed under a different modulus.
pub fn cyc_add(v1: &[u8], v2: &[u8], modulus: u8) -> Result<Box<[u8]>, GroupError> {
    check_same_length(v1.len(), v2.len())?;
    validate_orientation(v1, modulus)?;
    validate_orientation(v2, modulus)?;
    Ok(cyc_add_unchecked(v1, v2, modulus))
}

/// The semidirect product law:
///
/// `(c1, p1) · (c2, p2) = (c1 + p1·c2, p1 ∘ p2)`
///
/// # Errors
///
/// If either operand is malformed or not over `Z_modulus`.
pub fn wreath_mul(
    (c1, p1): (&[u8], &[u8]),
    (c2, p2): (&[u8], &[u8]),
    modulus: u8,
) -> Result<(Box<[u8]>, Box<[u8]>), GroupError> {
    validate_element(c1, p1, modulus)?;
    validate_element(c2, p2, modulus)?;
    check_same_length(p1.len(), p2.len())?;
    Ok(wreath_mul_unchecked((c1, p1), (c2, p2), modulus))
}

/// The inverse of a wreath product element: `(-(p_inv·c), p_inv)`.
///
/// # Errors
///
/// If the operand is malformed or not over `Z_modulus`.
pub fn wreath_inv(
    (c, p): (&[u8], &[u8]),
    modulus: u8,
) -> Result<(Box<[u8]>, Box<[u8]>), GroupError> {
    validate_element(c, p, modulus)?;
    Ok(wreath_inv_unchecked((c, p), modulus))
}

fn validate_element(c: &[u8], p: &[u8], modulus: u8) -> Result<(), GroupError> {
    check_same_length(p.len(), c.len())?;
    validate_permutation(p)?;
    validate_orientation(c, modulus)?;
    Ok(())
}

fn wreath_mul_unchecked(
    (c1, p1): (&[u8], &[u8]),
    (c2, p2): (&[u8], &[u8]),
    modulus: u8,
) -> (Box<[u8]>, Box<[u8]>) {
    let p1_dot_c2 = act_unchecked(p1, c2);
    (
        cyc_add_unchecked(c1, &p1_dot_c2, modulus),
        compose_unchecked(p1, p2),
    )
}

fn wreath_inv_unchecked((c, p): (&[u8], &[u8]), modulus: u8) -> (Box<[u8]>, Box<[u8]>) {
    let p_inv = invert_unchecked(p);
    let c_inv = act_unchecked(&p_inv, &cyc_neg_unchecked(c, modulus));
    (c_inv, p_inv)
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let rem = a % b;
        a = b;
        b = rem;
    }
    a
}

fn lcm(a: u64, b: u64) -> u64 {
    b / gcd(a, b) * a
}

impl WreathElement {
    /// Create an element from an orientation vector and a 1-indexed
    /// permutation.
    ///
    /// # Errors
    ///
    /// If the vectors do not describe a state of `orbit_def`.
    pub fn new(
        orbit_def: OrbitDef,
        orientation: &[u8],
        permutation: &[u8],
    ) -> Result<Self, InvalidStateError> {
        let piece_count = orbit_def.piece_count();
        check_same_length(piece_count, permutation.len())?;
        check_same_length(piece_count, orientation.len())?;
        validate_permutation(permutation)?;
        let max = orbit_def.orientation_count() - 1;
        if let Some(&actual) = orientation.iter().find(|&&value| value > max) {
            return Err(InvalidStateError::OrientationOutOfRange { max, actual });
        }
        Ok(WreathElement {
            orbit_def,
            orientation: orientation.into(),
            permutation: permutation.into(),
        })
    }

    #[must_use]
    pub fn identity(orbit_def: OrbitDef) -> Self {
        let piece_count = orbit_def.piece_count.get();
        WreathElement {
            orbit_def,
            orientation: vec![0; usize::from(piece_count)].into_boxed_slice(),
            permutation: (1..=piece_count).collect(),
        }
    }

    #[must_use]
    pub fn orbit_def(&self) -> OrbitDef {
        self.orbit_def
    }

    #[must_use]
    pub fn orientation(&self) -> &[u8] {
        &self.orientation
    }

    #[must_use]
    pub fn permutation(&self) -> &[u8] {
        &self.permutation
    }

    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.orientation.iter().all(|&o| o == 0)
            && self
                .permutation
                .iter()
                .enumerate()
                .all(|(i, &p)| usize::from(p) == i + 1)
    }

    /// Check that `other` lives in the same group as `self`.
    ///
    /// # Errors
    ///
    /// `InvalidModulus` when the orientation counts differ, `InvalidState`
    /// when the piece counts differ.
    pub fn check_compatible(&self, other: &Self) -> Result<(), GroupError> {
        if self.orbit_def.orientation_count != other.orbit_def.orientation_count {
            return Err(ModulusError::Mismatch {
                expected: self.orbit_def.orientation_count(),
                actual: other.orbit_def.orientation_count(),
            }
            .into());
        }
        check_same_length(self.orbit_def.piece_count(), other.orbit_def.piece_count())?;
        Ok(())
    }

    /// The group product `self · rhs`: `rhs` is applied first, then `self`.
    ///
    /// # Errors
    ///
    /// If the operands belong to different orbit definitions.
    pub fn mul(&self, rhs: &Self) -> Result<Self, GroupError> {
        self.check_compatible(rhs)?;
        Ok(self.mul_unchecked(rhs))
    }

    /// `self · rhs` without the orbit definition check. The caller
    /// guarantees that both operands share `self.orbit_def`.
    pub(crate) fn mul_unchecked(&self, rhs: &Self) -> Self {
        debug_assert_eq!(self.orbit_def, rhs.orbit_def);
        let (orientation, permutation) = wreath_mul_unchecked(
            (&self.orientation, &self.permutation),
            (&rhs.orientation, &rhs.permutation),
            self.orbit_def.orientation_count(),
        );
        WreathElement {
            orbit_def: self.orbit_def,
            orientation,
            permutation,
        }
    }

    #[must_use]
    pub fn inverse(&self) -> Self {
        let (orientation, permutation) = wreath_inv_unchecked(
            (&self.orientation, &self.permutation),
            self.orbit_def.orientation_count(),
        );
        WreathElement {
            orbit_def: self.orbit_def,
            orientation,
            permutation,
        }
    }

    /// Multiply `self` with itself `exponent` times, by squaring.
    #[must_use]
    pub fn pow(&self, mut exponent: u64) -> Self {
        let mut result = WreathElement::identity(self.orbit_def);
        let mut base = self.clone();
        while exponent > 0 {
            if exponent & 1 == 1 {
                result = result.mul_unchecked(&base);
            }
            base = base.mul_unchecked(&base);
            exponent >>= 1;
        }
        result
    }

    /// The order of the element. A cycle of length `l` whose orientations
    /// sum to `s` returns after `l * n / gcd(s, n)` applications.
    #[must_use]
    pub fn order(&self) -> u64 {
        let modulus = u64::from(self.orbit_def.orientation_count());
        let mut covered = vec![false; self.permutation.len()];
        let mut order = 1;
        for start in 0..self.permutation.len() {
            if covered[start] {
                continue;
            }
            let mut length = 0;
            let mut orientation_sum = 0;
            let mut piece = start;
            while !covered[piece] {
                covered[piece] = true;
                length += 1;
                orientation_sum += u64::from(self.orientation[piece]);
                piece = usize::from(self.permutation[piece]) - 1;
            }
            let twist_order = modulus / gcd(orientation_sum % modulus, modulus);
            order = lcm(order, length * twist_order);
        }
        order
    }

    /// Positions whose piece or orientation differ between `self` and
    /// `other`.
    #[must_use]
    pub fn differing_positions(&self, other: &Self) -> Vec<usize> {
        (0..self.permutation.len())
            .filter(|&i| {
                self.permutation.get(i) != other.permutation.get(i)
                    || self.orientation.get(i) != other.orientation.get(i)
            })
            .collect_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn random_element(orbit_def: OrbitDef, rng: &mut fastrand::Rng) -> WreathElement {
        let piece_count = orbit_def.piece_count.get();
        let mut permutation = (1..=piece_count).collect_vec();
        rng.shuffle(&mut permutation);
        let orientation = (0..piece_count)
            .map(|_| rng.u8(..orbit_def.orientation_count()))
            .collect_vec();
        WreathElement::new(orbit_def, &orientation, &permutation).unwrap()
    }

    #[test]
    fn compose_applies_right_operand_first() {
        let p1 = [1, 3, 2];
        let p2 = [2, 1, 3];
        assert_eq!(&*compose(&p1, &p2).unwrap(), &[3, 1, 2]);
        assert_eq!(&*compose(&p2, &p1).unwrap(), &[2, 3, 1]);
    }

    #[test]
    fn invert_is_two_sided() {
        let p = [3, 1, 4, 2, 5];
        let p_inv = invert(&p).unwrap();
        assert_eq!(&*compose(&p, &p_inv).unwrap(), &[1, 2, 3, 4, 5]);
        assert_eq!(&*compose(&p_inv, &p).unwrap(), &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn act_moves_orientation_with_the_piece() {
        // Position 3 receives the orientation held at position 1
        let p = [3, 1, 2];
        assert_eq!(&*act(&p, &[5, 6, 7]).unwrap(), &[6, 7, 5]);
    }

    #[test]
    fn cyc_add_wraps() {
        assert_eq!(&*cyc_add(&[2, 1, 0], &[2, 2, 0], 3).unwrap(), &[1, 0, 0]);
    }

    #[test]
    fn rejects_mixed_moduli() {
        assert_eq!(
            cyc_add(&[2, 0], &[1, 1], 2),
            Err(GroupError::InvalidModulus(ModulusError::ValueOutOfRange {
                modulus: 2,
                value: 2
            }))
        );
        assert_eq!(
            cyc_add(&[0], &[0], 0),
            Err(GroupError::InvalidModulus(ModulusError::Zero))
        );

        let corners = WreathElement::identity(OrbitDef::new(8, 3).unwrap());
        let twisted_edges = WreathElement::identity(OrbitDef::new(8, 2).unwrap());
        assert_eq!(
            corners.mul(&twisted_edges),
            Err(GroupError::InvalidModulus(ModulusError::Mismatch {
                expected: 3,
                actual: 2
            }))
        );
        let small = WreathElement::identity(OrbitDef::new(6, 3).unwrap());
        assert!(matches!(
            corners.mul(&small),
            Err(GroupError::InvalidState(
                InvalidStateError::PieceCountMismatch { .. }
            ))
        ));
    }

    #[test]
    fn rejects_malformed_elements() {
        let orbit_def = OrbitDef::new(3, 2).unwrap();
        assert_eq!(
            WreathElement::new(orbit_def, &[0, 0], &[1, 2, 3]),
            Err(InvalidStateError::PieceCountMismatch {
                expected: 3,
                actual: 2
            })
        );
        assert_eq!(
            WreathElement::new(orbit_def, &[0, 2, 0], &[1, 2, 3]),
            Err(InvalidStateError::OrientationOutOfRange { max: 1, actual: 2 })
        );
        assert_eq!(
            WreathElement::new(orbit_def, &[0, 0, 0], &[1, 2, 4]),
            Err(InvalidStateError::PermutationOutOfRange {
                expected: 3,
                actual: 4
            })
        );
        assert_eq!(
            WreathElement::new(orbit_def, &[0, 0, 0], &[1, 2, 2]),
            Err(InvalidStateError::NotABijection(vec![1, 2, 2]))
        );
        assert!(matches!(
            invert(&[0, 1]),
            Err(InvalidStateError::PermutationOutOfRange { actual: 0, .. })
        ));
    }

    #[test]
    fn free_functions_agree_with_elements() {
        let orbit_def = OrbitDef::new(8, 3).unwrap();
        let mut rng = fastrand::Rng::with_seed(7);
        let a = random_element(orbit_def, &mut rng);
        let b = random_element(orbit_def, &mut rng);
        let ab = a.mul(&b).unwrap();
        let (c, p) = wreath_mul(
            (a.orientation(), a.permutation()),
            (b.orientation(), b.permutation()),
            3,
        )
        .unwrap();
        assert_eq!((&*c, &*p), (ab.orientation(), ab.permutation()));

        let a_inv = a.inverse();
        let (c, p) = wreath_inv((a.orientation(), a.permutation()), 3).unwrap();
        assert_eq!((&*c, &*p), (a_inv.orientation(), a_inv.permutation()));
    }

    #[test]
    fn group_axioms() {
        let mut rng = fastrand::Rng::with_seed(0x5eed);
        for (piece_count, orientation_count) in [(8, 3), (12, 2), (6, 2), (5, 1), (4, 5)] {
            let orbit_def = OrbitDef::new(piece_count, orientation_count).unwrap();
            let identity = WreathElement::identity(orbit_def);
            assert!(identity.is_identity());
            for _ in 0..200 {
                let a = random_element(orbit_def, &mut rng);
                let b = random_element(orbit_def, &mut rng);
                let c = random_element(orbit_def, &mut rng);

                assert_eq!(a.mul(&identity).unwrap(), a);
                assert_eq!(identity.mul(&a).unwrap(), a);
                assert_eq!(
                    a.mul(&b).unwrap().mul(&c).unwrap(),
                    a.mul(&b.mul(&c).unwrap()).unwrap()
                );
                assert!(a.mul(&a.inverse()).unwrap().is_identity());
                assert!(a.inverse().mul(&a).unwrap().is_identity());
            }
        }
    }

    #[test]
    fn order_returns_to_identity() {
        let mut rng = fastrand::Rng::with_seed(42);
        for (piece_count, orientation_count) in [(8, 3), (12, 2), (6, 2)] {
            let orbit_def = OrbitDef::new(piece_count, orientation_count).unwrap();
            for _ in 0..50 {
                let a = random_element(orbit_def, &mut rng);
                let order = a.order();
                assert!(a.pow(order).is_identity());
                for divisor in 1..order {
                    if order % divisor == 0 {
                        assert!(!a.pow(divisor).is_identity());
                    }
                }
            }
        }
    }
}
