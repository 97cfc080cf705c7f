// src/ingest/split.rs

/// Split one CSV line into trimmed fields.
///
/// A `"` toggles quoting and is dropped; a `,` ends a field only outside quotes.
/// This is a deliberately small dialect: doubled quotes (`""`) are not an escape,
/// and a field cannot span lines. An empty line yields a single empty field.
pub fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    fields.push(current.trim().to_string());
    fields
}
