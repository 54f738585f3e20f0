use std::collections::HashMap;

/// Deduplicates by case-insensitive name.
///
/// Behaves like inserting into an ordered map keyed by the lowercased name:
/// the first occurrence fixes the position, the last occurrence supplies the value.
pub fn dedup_by_name<T, F>(items: Vec<T>, name: F) -> Vec<T>
where
    F: Fn(&T) -> &str,
{
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut deduped: Vec<T> = Vec::with_capacity(items.len());

    for item in items {
        let key = name(&item).to_lowercase();
        match positions.get(&key) {
            Some(&index) => deduped[index] = item,
            None => {
                positions.insert(key, deduped.len());
                deduped.push(item);
            }
        }
    }

    deduped
}
