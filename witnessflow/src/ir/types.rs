//! Declared value types, as resolved by the upstream front-end.
//!
//! The engine only consults types for one thing: deciding whether a hashed
//! value's domain is large enough that hashing plausibly hides it. The
//! front-end's full type system is deliberately not reproduced here.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Declared type of a value, reduced to what the analysis needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeInfo {
    /// Boolean, two inhabitants.
    Boolean,
    /// Unsigned integer with a declared bit width.
    Uint {
        /// Declared width in bits.
        bits: u16,
    },
    /// Native field element of the proof system.
    Field,
    /// Fixed-length byte string.
    Bytes {
        /// Declared length in bytes.
        len: u16,
    },
    /// Enumeration with a known variant count.
    Enumeration {
        /// Number of declared variants.
        variants: u16,
    },
    /// Aggregate or otherwise opaque type; entropy unknown to the engine.
    Opaque {
        /// Front-end type name, carried for diagnostics.
        name: CompactString,
    },
}

/// Bit width of the native field element. The exact prime is a front-end
/// concern; any practical proving field clears the entropy threshold.
const FIELD_BITS: u32 = 254;

impl TypeInfo {
    /// Upper bound on the entropy (in bits) a value of this type can carry,
    /// or `None` when the engine cannot tell.
    ///
    /// This is an advisory heuristic, not a proof: it measures the declared
    /// domain, not the distribution the witness is drawn from.
    #[must_use]
    pub fn entropy_bits(&self) -> Option<u32> {
        match self {
            Self::Boolean => Some(1),
            Self::Uint { bits } => Some(u32::from(*bits)),
            Self::Field => Some(FIELD_BITS),
            Self::Bytes { len } => Some(u32::from(*len) * 8),
            Self::Enumeration { variants } => {
                // ceil(log2(variants)); a 1-variant enum carries 0 bits.
                let v = u32::from(*variants).max(1);
                Some(32 - (v - 1).leading_zeros())
            }
            Self::Opaque { .. } => None,
        }
    }

    /// Short human name used in diagnostics.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Boolean => "Boolean".to_owned(),
            Self::Uint { bits } => format!("Uint<{bits}>"),
            Self::Field => "Field".to_owned(),
            Self::Bytes { len } => format!("Bytes<{len}>"),
            Self::Enumeration { variants } => format!("enum with {variants} variants"),
            Self::Opaque { name } => name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TypeInfo;

    #[test]
    fn entropy_of_scalar_types() {
        assert_eq!(TypeInfo::Boolean.entropy_bits(), Some(1));
        assert_eq!(TypeInfo::Uint { bits: 8 }.entropy_bits(), Some(8));
        assert_eq!(TypeInfo::Uint { bits: 256 }.entropy_bits(), Some(256));
        assert_eq!(TypeInfo::Bytes { len: 32 }.entropy_bits(), Some(256));
        assert_eq!(TypeInfo::Field.entropy_bits(), Some(254));
    }

    #[test]
    fn entropy_of_enumerations_rounds_up() {
        assert_eq!(TypeInfo::Enumeration { variants: 2 }.entropy_bits(), Some(1));
        assert_eq!(TypeInfo::Enumeration { variants: 5 }.entropy_bits(), Some(3));
        assert_eq!(TypeInfo::Enumeration { variants: 1 }.entropy_bits(), Some(0));
    }

    #[test]
    fn opaque_entropy_is_unknown() {
        let ty = TypeInfo::Opaque {
            name: "CoinInfo".into(),
        };
        assert_eq!(ty.entropy_bits(), None);
    }
}
