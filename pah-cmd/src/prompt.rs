//! Interactive date prompts.

use anyhow::{bail, Context};
use std::io::{BufRead, Write};

/// Print `label` and read one line from `input`, without the line ending.
pub fn prompt_line<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    label: &str,
) -> anyhow::Result<String> {
    write!(output, "{label}")?;
    output.flush()?;
    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .with_context(|| format!("reading '{}'", label.trim()))?;
    if read == 0 {
        bail!("no input for '{}'", label.trim());
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Ask for the start and end dates, in that order.
pub fn prompt_dates<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> anyhow::Result<(String, String)> {
    let start = prompt_line(input, output, "Enter the start date (YYYY-MM-DD): ")?;
    let end = prompt_line(input, output, "Enter the end date (YYYY-MM-DD): ")?;
    Ok((start, end))
}
