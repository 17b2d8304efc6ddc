use num_traits::{NumCast, ToPrimitive};

/// the numeric type an array was stored as on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Char,
    UnsignedChar,
    Short,
    UnsignedShort,
    Int,
    UnsignedInt,
    Long,
    UnsignedLong,
    Float,
    Double,
    IdType,
}

impl ScalarType {
    /// parse the data type keyword of a legacy VTK file
    ///
    /// both the classic names (`float`, `unsigned_char`, `vtkIdType`) and the fixed width
    /// names written by newer VTK versions (`vtktypeint64`, `vtktypefloat32`) are accepted
    pub fn from_legacy_name(name: &str) -> Option<Self> {
        let out = match name {
            "char" | "signed_char" | "vtktypeint8" => Self::Char,
            "unsigned_char" | "vtktypeuint8" => Self::UnsignedChar,
            "short" | "vtktypeint16" => Self::Short,
            "unsigned_short" | "vtktypeuint16" => Self::UnsignedShort,
            "int" | "vtktypeint32" => Self::Int,
            "unsigned_int" | "vtktypeuint32" => Self::UnsignedInt,
            "long" | "vtktypeint64" => Self::Long,
            "unsigned_long" | "vtktypeuint64" => Self::UnsignedLong,
            "float" | "vtktypefloat32" => Self::Float,
            "double" | "vtktypefloat64" => Self::Double,
            "vtkIdType" => Self::IdType,
            _ => return None,
        };

        Some(out)
    }

    /// the name written after `SCALARS <name>` in a legacy file
    pub fn legacy_name(&self) -> &'static str {
        match self {
            Self::Char => "char",
            Self::UnsignedChar => "unsigned_char",
            Self::Short => "short",
            Self::UnsignedShort => "unsigned_short",
            Self::Int => "int",
            Self::UnsignedInt => "unsigned_int",
            Self::Long => "long",
            Self::UnsignedLong => "unsigned_long",
            Self::Float => "float",
            Self::Double => "double",
            Self::IdType => "vtkIdType",
        }
    }

    /// the `type` attribute of an XML `DataArray`
    pub fn xml_name(&self) -> &'static str {
        match self {
            Self::Char => "Int8",
            Self::UnsignedChar => "UInt8",
            Self::Short => "Int16",
            Self::UnsignedShort => "UInt16",
            Self::Int => "Int32",
            Self::UnsignedInt => "UInt32",
            Self::Long | Self::IdType => "Int64",
            Self::UnsignedLong => "UInt64",
            Self::Float => "Float32",
            Self::Double => "Float64",
        }
    }

    /// number of bytes a single value takes in binary form
    pub fn size(&self) -> usize {
        match self {
            Self::Char | Self::UnsignedChar => 1,
            Self::Short | Self::UnsignedShort => 2,
            Self::Int | Self::UnsignedInt | Self::Float => 4,
            Self::Long | Self::UnsignedLong | Self::Double | Self::IdType => 8,
        }
    }

    pub fn is_floating_point(&self) -> bool {
        matches!(self, Self::Float | Self::Double)
    }

    /// decode one big endian value. `bytes` must hold exactly [`ScalarType::size`] bytes
    pub(crate) fn decode_be(&self, bytes: &[u8]) -> Option<f64> {
        match self {
            Self::Char => decode::<i8, 1>(bytes, i8::from_be_bytes),
            Self::UnsignedChar => decode::<u8, 1>(bytes, u8::from_be_bytes),
            Self::Short => decode::<i16, 2>(bytes, i16::from_be_bytes),
            Self::UnsignedShort => decode::<u16, 2>(bytes, u16::from_be_bytes),
            Self::Int => decode::<i32, 4>(bytes, i32::from_be_bytes),
            Self::UnsignedInt => decode::<u32, 4>(bytes, u32::from_be_bytes),
            Self::Long | Self::IdType => decode::<i64, 8>(bytes, i64::from_be_bytes),
            Self::UnsignedLong => decode::<u64, 8>(bytes, u64::from_be_bytes),
            Self::Float => decode::<f32, 4>(bytes, f32::from_be_bytes),
            Self::Double => decode::<f64, 8>(bytes, f64::from_be_bytes),
        }
    }

    /// append the big endian representation of `value` in this type to `out`
    ///
    /// integer types round to the nearest value and saturate at their bounds
    pub(crate) fn encode_be(&self, value: f64, out: &mut Vec<u8>) {
        match self {
            Self::Char => out.extend(cast::<i8>(value).to_be_bytes()),
            Self::UnsignedChar => out.extend(cast::<u8>(value).to_be_bytes()),
            Self::Short => out.extend(cast::<i16>(value).to_be_bytes()),
            Self::UnsignedShort => out.extend(cast::<u16>(value).to_be_bytes()),
            Self::Int => out.extend(cast::<i32>(value).to_be_bytes()),
            Self::UnsignedInt => out.extend(cast::<u32>(value).to_be_bytes()),
            Self::Long | Self::IdType => out.extend(cast::<i64>(value).to_be_bytes()),
            Self::UnsignedLong => out.extend(cast::<u64>(value).to_be_bytes()),
            Self::Float => out.extend((value as f32).to_be_bytes()),
            Self::Double => out.extend(value.to_be_bytes()),
        }
    }

    /// same as [`ScalarType::encode_be`], little endian
    pub(crate) fn encode_le(&self, value: f64, out: &mut Vec<u8>) {
        match self {
            Self::Char => out.extend(cast::<i8>(value).to_le_bytes()),
            Self::UnsignedChar => out.extend(cast::<u8>(value).to_le_bytes()),
            Self::Short => out.extend(cast::<i16>(value).to_le_bytes()),
            Self::UnsignedShort => out.extend(cast::<u16>(value).to_le_bytes()),
            Self::Int => out.extend(cast::<i32>(value).to_le_bytes()),
            Self::UnsignedInt => out.extend(cast::<u32>(value).to_le_bytes()),
            Self::Long | Self::IdType => out.extend(cast::<i64>(value).to_le_bytes()),
            Self::UnsignedLong => out.extend(cast::<u64>(value).to_le_bytes()),
            Self::Float => out.extend((value as f32).to_le_bytes()),
            Self::Double => out.extend(value.to_le_bytes()),
        }
    }

    /// the value as it would be stored in this type, as an `f64`
    pub(crate) fn round_trip(&self, value: f64) -> f64 {
        match self {
            Self::Char => cast::<i8>(value) as f64,
            Self::UnsignedChar => cast::<u8>(value) as f64,
            Self::Short => cast::<i16>(value) as f64,
            Self::UnsignedShort => cast::<u16>(value) as f64,
            Self::Int => cast::<i32>(value) as f64,
            Self::UnsignedInt => cast::<u32>(value) as f64,
            Self::Long | Self::IdType => cast::<i64>(value) as f64,
            Self::UnsignedLong => cast::<u64>(value) as f64,
            Self::Float => value as f32 as f64,
            Self::Double => value,
        }
    }
}

impl std::fmt::Display for ScalarType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.legacy_name())
    }
}

fn decode<T: ToPrimitive, const N: usize>(bytes: &[u8], f: fn([u8; N]) -> T) -> Option<f64> {
    let arr: [u8; N] = bytes.try_into().ok()?;
    f(arr).to_f64()
}

/// round and saturate a float into an integer type
fn cast<T: NumCast + num_traits::Bounded + ToPrimitive>(value: f64) -> T {
    let rounded = value.round();
    match <T as NumCast>::from(rounded) {
        Some(v) => v,
        None if rounded.is_nan() => T::from(0).unwrap_or_else(T::min_value),
        None if rounded > 0.0 => T::max_value(),
        None => T::min_value(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_names_round_trip() {
        for ty in [
            ScalarType::Char,
            ScalarType::UnsignedChar,
            ScalarType::Short,
            ScalarType::UnsignedShort,
            ScalarType::Int,
            ScalarType::UnsignedInt,
            ScalarType::Long,
            ScalarType::UnsignedLong,
            ScalarType::Float,
            ScalarType::Double,
            ScalarType::IdType,
        ] {
            assert_eq!(ScalarType::from_legacy_name(ty.legacy_name()), Some(ty));
        }
    }

    #[test]
    fn fixed_width_aliases() {
        assert_eq!(
            ScalarType::from_legacy_name("vtktypeint64"),
            Some(ScalarType::Long)
        );
        assert_eq!(
            ScalarType::from_legacy_name("vtktypefloat32"),
            Some(ScalarType::Float)
        );
        assert_eq!(ScalarType::from_legacy_name("bit"), None);
    }

    #[test]
    fn encode_decode_be() {
        let mut bytes = Vec::new();
        ScalarType::Short.encode_be(-300.0, &mut bytes);
        assert_eq!(bytes.len(), 2);
        assert_eq!(ScalarType::Short.decode_be(&bytes), Some(-300.0));
    }

    #[test]
    fn integer_saturation() {
        let mut bytes = Vec::new();
        ScalarType::UnsignedChar.encode_be(1000.0, &mut bytes);
        ScalarType::UnsignedChar.encode_be(-5.0, &mut bytes);
        assert_eq!(bytes, vec![255, 0]);
        assert_eq!(ScalarType::Char.round_trip(0.6), 1.0);
    }

    #[test]
    fn decode_wrong_width() {
        assert_eq!(ScalarType::Double.decode_be(&[0, 0, 0]), None);
    }
}
