use scheme_error::{Result, SchemeError};

use crate::datatype::TypeTag;

/// Reduce a set of tags to the narrowest tag able to represent every value
/// behind them.
///
/// - `String` anywhere wins.
/// - Numeric mixed with `Boolean`, `Character` or `DateTime` is `String`.
/// - Two different non-numeric tags are `String`.
/// - Numeric tags widen to the widest present.
/// - `Empty` only survives when nothing else is present.
///
/// Errors if `tags` yields nothing.
pub fn narrowest_common_type<I>(tags: I) -> Result<TypeTag>
where
    I: IntoIterator<Item = TypeTag>,
{
    let mut seen_any = false;
    let mut widest_numeric: Option<TypeTag> = None;
    let mut boolean = false;
    let mut character = false;
    let mut datetime = false;

    for tag in tags {
        seen_any = true;
        match tag {
            TypeTag::String => return Ok(TypeTag::String),
            TypeTag::Boolean => boolean = true,
            TypeTag::Character => character = true,
            TypeTag::DateTime => datetime = true,
            TypeTag::Empty => (),
            TypeTag::Byte
            | TypeTag::Short
            | TypeTag::Int32
            | TypeTag::Int64
            | TypeTag::Float32
            | TypeTag::Float64 => {
                widest_numeric = match widest_numeric {
                    Some(curr) if curr.numeric_rank() >= tag.numeric_rank() => Some(curr),
                    _ => Some(tag),
                }
            }
        }
    }

    if !seen_any {
        return Err(SchemeError::new(
            "Cannot determine the narrowest common type of an empty set of types",
        ));
    }

    let non_numeric_count = [boolean, character, datetime]
        .iter()
        .filter(|present| **present)
        .count();

    if widest_numeric.is_some() && non_numeric_count > 0 {
        return Ok(TypeTag::String);
    }
    if non_numeric_count > 1 {
        return Ok(TypeTag::String);
    }

    if let Some(numeric) = widest_numeric {
        return Ok(numeric);
    }

    Ok(if boolean {
        TypeTag::Boolean
    } else if character {
        TypeTag::Character
    } else if datetime {
        TypeTag::DateTime
    } else {
        TypeTag::Empty
    })
}
