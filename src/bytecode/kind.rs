//! Representation kinds and the coercion table.

use crate::bytecode::instruction::Op;

/// The concrete on-stack representation of a value. `Unknown` is an
/// inference-only sentinel and never reaches the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Kind {
    Undefined = 0,
    Null,
    Bool,
    Int32,
    Float64,
    String,
    Unknown,
}

impl Kind {
    pub fn from_u8(byte: u8) -> Option<Kind> {
        if byte <= Kind::Unknown as u8 {
            Some(unsafe { std::mem::transmute::<u8, Kind>(byte) })
        } else {
            None
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Kind::Undefined => write!(f, "undefined"),
            Kind::Null => write!(f, "null"),
            Kind::Bool => write!(f, "boolean"),
            Kind::Int32 => write!(f, "int32"),
            Kind::Float64 => write!(f, "float64"),
            Kind::String => write!(f, "string"),
            Kind::Unknown => write!(f, "unknown"),
        }
    }
}

/// The opcode sequence converting the top of stack from one kind to
/// another. Identity conversions are empty; pairs outside the table have
/// no cast path and return None.
pub fn cast_sequence(from: Kind, to: Kind) -> Option<&'static [Op]> {
    use Kind::*;

    if from == to {
        return Some(&[]);
    }
    match (from, to) {
        (Undefined, Float64) => Some(&[Op::UndefToF64]),
        (Undefined, String) => Some(&[Op::UndefToStr]),
        (Null, Int32) => Some(&[Op::NullToI32]),
        (Null, Float64) => Some(&[Op::NullToI32, Op::I32ToF64]),
        (Null, String) => Some(&[Op::NullToStr]),
        (Bool, Int32) => Some(&[Op::BoolToI32]),
        (Bool, Float64) => Some(&[Op::BoolToI32, Op::I32ToF64]),
        (Bool, String) => Some(&[Op::BoolToStr]),
        (Int32, Bool) => Some(&[Op::I32ToBool]),
        (Int32, Float64) => Some(&[Op::I32ToF64]),
        (Int32, String) => Some(&[Op::I32ToStr]),
        (Float64, Int32) => Some(&[Op::F64ToI32]),
        (Float64, String) => Some(&[Op::F64ToStr]),
        (String, Int32) => Some(&[Op::StrToI32]),
        (String, Float64) => Some(&[Op::StrToF64]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_empty() {
        for byte in 0..=Kind::Unknown as u8 {
            let kind = Kind::from_u8(byte).unwrap();
            assert_eq!(cast_sequence(kind, kind), Some(&[][..]));
        }
    }

    #[test]
    fn test_widening_paths() {
        assert_eq!(
            cast_sequence(Kind::Null, Kind::Float64),
            Some(&[Op::NullToI32, Op::I32ToF64][..])
        );
        assert_eq!(
            cast_sequence(Kind::Bool, Kind::Float64),
            Some(&[Op::BoolToI32, Op::I32ToF64][..])
        );
        assert_eq!(
            cast_sequence(Kind::Int32, Kind::String),
            Some(&[Op::I32ToStr][..])
        );
    }

    #[test]
    fn test_missing_paths() {
        assert_eq!(cast_sequence(Kind::Null, Kind::Bool), None);
        assert_eq!(cast_sequence(Kind::Float64, Kind::Bool), None);
        assert_eq!(cast_sequence(Kind::String, Kind::Bool), None);
        assert_eq!(cast_sequence(Kind::Undefined, Kind::Int32), None);
        assert_eq!(cast_sequence(Kind::Int32, Kind::Unknown), None);
    }

    #[test]
    fn test_kind_from_u8() {
        assert_eq!(Kind::from_u8(0), Some(Kind::Undefined));
        assert_eq!(Kind::from_u8(Kind::Unknown as u8), Some(Kind::Unknown));
        assert_eq!(Kind::from_u8(7), None);
    }
}
