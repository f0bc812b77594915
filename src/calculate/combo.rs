//! Order-independent identity keys for sets of IDs.

use std::fmt::Display;

/// Separator between sorted IDs.
pub const ID_SEPARATOR: &str = "-";

/// Key used when the ID set is empty.
pub const EMPTY_COMBINATION: &str = "none";

/// Build a canonical key for a set of IDs.
///
/// IDs are sorted ascending by their natural ordering (numeric for integer
/// IDs) and joined with [`ID_SEPARATOR`]; an auxiliary discriminator is
/// appended after a `:`. Any permutation of `ids` yields the same key.
pub fn combination_key<T, A>(ids: &[T], auxiliary: Option<A>) -> String
where
    T: Ord + Display,
    A: Display,
{
    let mut sorted: Vec<&T> = ids.iter().collect();
    sorted.sort();

    let mut key = if sorted.is_empty() {
        EMPTY_COMBINATION.to_string()
    } else {
        sorted
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(ID_SEPARATOR)
    };

    if let Some(aux) = auxiliary {
        key.push(':');
        key.push_str(&aux.to_string());
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_independence() {
        let a = combination_key(&[5u64, 3, 3], None::<u32>);
        let b = combination_key(&[3u64, 5, 3], None::<u32>);
        let c = combination_key(&[3u64, 3, 5], None::<u32>);
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a, "3-3-5");
    }

    #[test]
    fn test_all_permutations_with_auxiliary() {
        let expected = combination_key(&[1u64, 2, 3], Some(3));
        for perm in [[1u64, 3, 2], [2, 1, 3], [2, 3, 1], [3, 1, 2], [3, 2, 1]] {
            assert_eq!(combination_key(&perm, Some(3)), expected);
        }
        assert_eq!(expected, "1-2-3:3");
    }

    #[test]
    fn test_numeric_not_lexicographic() {
        assert_eq!(combination_key(&[10u64, 9, 100], None::<u32>), "9-10-100");
    }

    #[test]
    fn test_auxiliary_disambiguates() {
        assert_ne!(
            combination_key(&[213746u64], Some(1)),
            combination_key(&[213746u64], Some(2))
        );
    }

    #[test]
    fn test_empty_ids() {
        assert_eq!(combination_key::<u64, u32>(&[], None), "none");
        assert_eq!(combination_key::<u64, u32>(&[], Some(2)), "none:2");
    }

    #[test]
    fn test_string_ids() {
        let a = combination_key(&["Frost", "Arcane", "Fire"], None::<&str>);
        let b = combination_key(&["Fire", "Frost", "Arcane"], None::<&str>);
        assert_eq!(a, b);
        assert_eq!(a, "Arcane-Fire-Frost");
    }
}
