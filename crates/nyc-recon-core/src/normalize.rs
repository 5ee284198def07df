/// Canonical agency key for joining payroll and spending records.
///
/// Trims the edges, lower-cases every character and collapses each internal run of
/// whitespace (spaces, tabs, newlines) to a single ASCII space. Token order is kept and
/// all-whitespace input yields an empty string. Applying it twice is a no-op.
pub fn normalize_agency_name(name: &str) -> String {
    let mut key = String::with_capacity(name.len());
    for token in name.split_whitespace() {
        if !key.is_empty() {
            key.push(' ');
        }
        key.extend(token.chars().flat_map(char::to_lowercase));
    }
    key
}
