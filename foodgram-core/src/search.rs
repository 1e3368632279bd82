//! Ingredient name search.

/// Keep items whose name contains `query` (case-insensitive), prefix matches
/// first, each group sorted by name.
///
/// An empty or blank query keeps every item, sorted by name.
pub fn rank_by_name<T, F>(items: Vec<T>, query: &str, name_of: F) -> Vec<T>
where
    F: Fn(&T) -> &str,
{
    let needle = query.trim().to_lowercase();

    let mut ranked: Vec<(bool, String, T)> = items
        .into_iter()
        .filter_map(|item| {
            let name = name_of(&item).to_lowercase();
            if !name.contains(&needle) {
                return None;
            }
            let is_prefix = name.starts_with(&needle);
            Some((!is_prefix, name, item))
        })
        .collect();

    ranked.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
    ranked.into_iter().map(|(_, _, item)| item).collect()
}

/// Escape `%` and `_` for use inside an SQL `LIKE` pattern.
pub fn like_pattern(query: &str) -> String {
    format!(
        "%{}%",
        query
            .trim()
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&'static str], query: &str) -> Vec<&'static str> {
        rank_by_name(items.to_vec(), query, |s| *s)
    }

    #[test]
    fn test_prefix_matches_first() {
        let items = ["apple sauce", "green apple", "apricot", "pineapple", "milk"];
        assert_eq!(
            names(&items, "app"),
            vec!["apple sauce", "green apple", "pineapple"]
        );
    }

    #[test]
    fn test_case_insensitive() {
        let items = ["Сахар", "сахарная пудра", "Ванильный сахар"];
        assert_eq!(
            names(&items, "САХ"),
            vec!["Сахар", "сахарная пудра", "Ванильный сахар"]
        );
    }

    #[test]
    fn test_blank_query_sorts_all() {
        let items = ["milk", "butter", "egg"];
        assert_eq!(names(&items, "  "), vec!["butter", "egg", "milk"]);
    }

    #[test]
    fn test_like_pattern_escapes() {
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }
}
