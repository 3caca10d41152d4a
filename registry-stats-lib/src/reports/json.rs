use crate::Result;
use core::fmt::Write;
use serde::Serialize;

/// Pretty-print `value` as JSON with a 2-space indent.
pub fn generate<T: Serialize + ?Sized, W: Write>(value: &T, writer: &mut W) -> Result<()> {
    write!(writer, "{}", serde_json::to_string_pretty(value)?)?;
    Ok(())
}
