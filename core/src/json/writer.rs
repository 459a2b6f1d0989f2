use serde_json::Value;

use crate::Error;
use crate::traits::TokenWriter;

/// A [`TokenWriter`] that renders compact JSON text.
///
/// # Example
///
/// ```ignore
/// let mut writer = JsonWriter::new();
/// converter.write(&mut writer, Some(&list))?;
/// assert_eq!(writer.buf(), r#"["a","b"]"#);
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonWriter {
    out: String,
    /// One entry per open array: whether it already holds an element.
    stack: Vec<bool>,
}

impl JsonWriter {
    /// Create an empty writer.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current buffer contents.
    #[inline]
    pub fn buf(&self) -> &str {
        &self.out
    }

    /// Consume the writer and return the final string.
    #[inline]
    pub fn into_string(self) -> String {
        self.out
    }

    /// Emits the separator owed before a new element.
    fn separate(&mut self) {
        if let Some(has_elements) = self.stack.last_mut() {
            if *has_elements {
                self.out.push(',');
            }
            *has_elements = true;
        }
    }
}

impl TokenWriter for JsonWriter {
    fn write_start_array(&mut self) -> Result<(), Error> {
        self.separate();
        self.out.push('[');
        self.stack.push(false);
        Ok(())
    }

    fn write_end_array(&mut self) -> Result<(), Error> {
        if self.stack.pop().is_none() {
            return Err(Error::Internal("`]` written outside of an array".into()));
        }
        self.out.push(']');
        Ok(())
    }

    fn write_null(&mut self) -> Result<(), Error> {
        self.separate();
        self.out.push_str("null");
        Ok(())
    }

    fn write_value(&mut self, value: &Value) -> Result<(), Error> {
        self.separate();
        self.out.push_str(&serde_json::to_string(value)?);
        Ok(())
    }
}
