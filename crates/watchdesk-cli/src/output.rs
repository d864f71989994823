use std::io::Write;

use serde_json::Value;

use crate::error::CliError;

/// Writes `payload` as one JSON document followed by a newline.
pub fn write_json<W: Write>(writer: &mut W, payload: &Value, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(&mut *writer, payload)?;
    } else {
        serde_json::to_writer(&mut *writer, payload)?;
    }
    writeln!(writer)?;
    Ok(())
}

pub fn render(payload: &Value, pretty: bool) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    write_json(&mut handle, payload, pretty)
}
