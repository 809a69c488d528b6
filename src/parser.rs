// Naive response parser: every non-blank line of the model's reply is
// expected to be exactly `name: value`.

use crate::error::ParseError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub value: String,
}

/// Split a single line into a field. Returns `Ok(None)` for blank lines.
pub fn parse_line(line: &str) -> Result<Option<Field>, ParseError> {
    if line.trim().is_empty() {
        return Ok(None);
    }
    let colons = line.matches(':').count();
    let malformed = || ParseError::Malformed {
        line: line.to_string(),
        colons,
    };
    if colons != 1 {
        return Err(malformed());
    }
    let (name, value) = line.split_once(':').ok_or_else(malformed)?;
    let name = name.trim();
    if name.is_empty() {
        return Err(malformed());
    }
    Ok(Some(Field {
        name: name.to_string(),
        value: value.trim().to_string(),
    }))
}

/// Lazily yield the fields of `text`, one line at a time. The first
/// malformed line produces an error; callers are expected to stop there.
pub fn fields(text: &str) -> impl Iterator<Item = Result<Field, ParseError>> + '_ {
    text.split('\n').filter_map(|line| parse_line(line).transpose())
}
