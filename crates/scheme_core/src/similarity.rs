/// Fraction of index-aligned positions where `a` and `b` hold equal values.
///
/// Sequences of different lengths have a similarity of 0.0, as do two empty
/// sequences. An absent element in `a` never counts as equal, not even to an
/// absent element in `b`.
pub fn similarity<A, B, T>(a: A, b: B) -> f64
where
    A: IntoIterator<Item = Option<T>>,
    B: IntoIterator<Item = Option<T>>,
    T: PartialEq,
{
    let mut a = a.into_iter();
    let mut b = b.into_iter();

    let mut size: usize = 0;
    let mut equal: usize = 0;

    loop {
        match (a.next(), b.next()) {
            (Some(next_a), Some(next_b)) => {
                size += 1;
                if next_a.is_some() && next_a == next_b {
                    equal += 1;
                }
            }
            (None, None) => break,
            // Lengths differ.
            _ => return 0.0,
        }
    }

    if size == 0 {
        return 0.0;
    }

    equal as f64 / size as f64
}

/// Similarity between two slices with every element present.
pub fn slice_similarity<T: PartialEq>(a: &[T], b: &[T]) -> f64 {
    similarity(a.iter().map(Some), b.iter().map(Some))
}
