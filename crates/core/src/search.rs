//! Free-text search helpers for the to-do list.
//!
//! The list view filters by a case-insensitive substring match on title or
//! description. The query text is matched literally: `ILIKE` wildcards in
//! user input are escaped before the pattern is handed to the database.

/// Treat an absent or empty `?q=` as "no filter".
pub fn normalize_query(q: Option<&str>) -> Option<&str> {
    q.filter(|s| !s.is_empty())
}

/// Build an `ILIKE` pattern matching `q` anywhere in the column.
///
/// Backslash is PostgreSQL's default `LIKE` escape character.
pub fn like_pattern(q: &str) -> String {
    let mut pattern = String::with_capacity(q.len() + 2);
    pattern.push('%');
    for ch in q.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
