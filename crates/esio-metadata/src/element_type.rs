//! On-disk numeric element kinds and type-convertibility rules.

use esio_core::{sanity, EsioResult};

/// Substrate-native scalar numeric kind. Every dataset's element type is one
/// of these, optionally repeated `ncomponents` times per element (see
/// [`ElementType`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    I32,
    I64,
    F32,
    F64,
}

impl ScalarKind {
    /// Stable on-disk tag. Used only when a metadata block needs to round
    /// trip a scalar kind through the 8-integer attribute; dataset element
    /// types themselves are tracked out-of-band by the substrate.
    pub const fn tag(self) -> i32 {
        match self {
            ScalarKind::I32 => 0,
            ScalarKind::I64 => 1,
            ScalarKind::F32 => 2,
            ScalarKind::F64 => 3,
        }
    }

    pub fn from_tag(tag: i32) -> EsioResult<Self> {
        match tag {
            0 => Ok(ScalarKind::I32),
            1 => Ok(ScalarKind::I64),
            2 => Ok(ScalarKind::F32),
            3 => Ok(ScalarKind::F64),
            other => Err(sanity(format!("unknown on-disk scalar kind tag {other}"))),
        }
    }

    pub const fn size_bytes(self) -> usize {
        match self {
            ScalarKind::I32 | ScalarKind::F32 => 4,
            ScalarKind::I64 | ScalarKind::F64 => 8,
        }
    }

    /// Whether a value of `self` can be losslessly transferred through a
    /// dataset whose stored scalar kind is `target`, mirroring HDF5's
    /// `H5Tfind` "is there a converter" check: same-kind is always
    /// convertible; cross-kind numeric conversions (e.g. i32 -> f64) are
    /// convertible; conversions that can silently truncate or lose the sign
    /// (the only one of these four kinds is narrowing float/int, e.g. f64 ->
    /// f32 or i64 -> i32) are rejected so restart data never degrades
    /// silently across mismatched call sites.
    pub const fn convertible_to(self, target: ScalarKind) -> bool {
        use ScalarKind::*;
        if self as u8 == target as u8 {
            return true;
        }
        matches!(
            (self, target),
            (I32, I64) | (I32, F32) | (I32, F64) | (F32, F64) | (I64, F64)
        )
    }
}

/// A dataset's (or caller's requested) element type: a scalar kind repeated
/// `ncomponents` times per array element. `ncomponents == 1` is the scalar
/// case; `ncomponents > 1` is a fixed-length vector component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementType {
    pub scalar: ScalarKind,
    pub ncomponents: u32,
}

impl ElementType {
    pub fn scalar(scalar: ScalarKind) -> Self {
        Self {
            scalar,
            ncomponents: 1,
        }
    }

    pub fn vector(scalar: ScalarKind, ncomponents: u32) -> EsioResult<Self> {
        if ncomponents == 0 {
            return Err(sanity("vector element type must have ncomponents >= 1"));
        }
        Ok(Self { scalar, ncomponents })
    }

    pub fn is_convertible_to(self, target: ElementType) -> bool {
        self.ncomponents == target.ncomponents && self.scalar.convertible_to(target.scalar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widening_numeric_conversions_are_allowed() {
        assert!(ScalarKind::I32.convertible_to(ScalarKind::F64));
        assert!(ScalarKind::F32.convertible_to(ScalarKind::F64));
        assert!(ScalarKind::I32.convertible_to(ScalarKind::I32));
    }

    #[test]
    fn narrowing_numeric_conversions_are_rejected() {
        assert!(!ScalarKind::F64.convertible_to(ScalarKind::F32));
        assert!(!ScalarKind::I64.convertible_to(ScalarKind::I32));
        assert!(!ScalarKind::F64.convertible_to(ScalarKind::I32));
    }

    #[test]
    fn element_type_requires_matching_ncomponents() {
        let vec3_f32 = ElementType::vector(ScalarKind::F32, 3).unwrap();
        let vec4_f64 = ElementType::vector(ScalarKind::F64, 4).unwrap();
        assert!(!vec3_f32.is_convertible_to(vec4_f64));

        let vec3_f64 = ElementType::vector(ScalarKind::F64, 3).unwrap();
        assert!(vec3_f32.is_convertible_to(vec3_f64));
    }

    #[test]
    fn unknown_tag_is_sanity_error() {
        let err = ScalarKind::from_tag(99).unwrap_err();
        assert_eq!(err.kind(), esio_core::ErrorKind::Sanity);
    }
}
