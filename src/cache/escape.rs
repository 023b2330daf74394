//! Backslash escaping for tab-separated cache records.

/// Escape backslash, tab and newline so a value fits in one field.
pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\t' => escaped.push_str("\\t"),
            '\n' => escaped.push_str("\\n"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Reverse [`escape`]. Any other escaped character stands for itself, and
/// a lone trailing backslash is kept.
pub fn unescape(value: &str) -> String {
    let mut unescaped = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            unescaped.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => unescaped.push('\t'),
            Some('n') => unescaped.push('\n'),
            Some(other) => unescaped.push(other),
            None => unescaped.push('\\'),
        }
    }
    unescaped
}

/// Split a record on raw tabs and unescape each field.
///
/// Escaped values never contain a raw tab, so every tab is a separator.
pub fn split_escaped(line: &str) -> Vec<String> {
    line.split('\t').map(unescape).collect()
}

/// Join fields into one escaped record.
pub fn join_escaped<'a, I>(fields: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    fields.into_iter().map(escape).collect::<Vec<_>>().join("\t")
}
