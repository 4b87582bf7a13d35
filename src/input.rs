//! Normalization of textual grid-size input

use crate::error::{Error, Result};
use crate::grid::MAX_DIMENSION;

/// Turn a size field into a row/column count.
///
/// Empty input is 0, leading zeros are dropped ("030" is 30), anything above
/// `MAX_DIMENSION` is clamped to it. Signs and non-digits are rejected.
pub fn parse_size_field(input: &str) -> Result<usize> {
    let text = input.trim();
    if text.is_empty() {
        return Ok(0);
    }
    if !text.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::InvalidDimension(format!(
            "{text:?} is not a whole number"
        )));
    }

    let digits = text.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(0);
    }
    // More than three significant digits is past the cap and may not fit a usize
    if digits.len() > 3 {
        return Ok(MAX_DIMENSION);
    }
    let value: usize = digits
        .parse()
        .map_err(|_| Error::InvalidDimension(format!("{text:?} is not a whole number")))?;
    Ok(value.min(MAX_DIMENSION))
}

/// An editable size field that always holds a normalized value
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SizeField {
    value: usize,
}

impl SizeField {
    pub fn new(value: usize) -> Self {
        Self {
            value: value.min(MAX_DIMENSION),
        }
    }

    pub fn value(&self) -> usize {
        self.value
    }

    pub fn text(&self) -> String {
        self.value.to_string()
    }

    /// Append a typed character. Rejected input leaves the field unchanged.
    pub fn push(&mut self, ch: char) -> Result<()> {
        let mut text = self.text();
        text.push(ch);
        self.value = parse_size_field(&text)?;
        Ok(())
    }

    pub fn backspace(&mut self) {
        let mut text = self.text();
        text.pop();
        // digits only, so parsing cannot fail
        self.value = parse_size_field(&text).unwrap_or(0);
    }
}
