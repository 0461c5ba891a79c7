use crate::error::{DatasourceError, Result};
use crate::macros::{MacroTable, TimeRange};

const MACRO_PREFIX: &str = "$__";

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Splits `(a, b, ...)` at the start of `input` into trimmed arguments.
/// Returns the arguments and the byte length of the parenthesized text.
fn parse_args<'a>(name: &str, input: &'a str) -> Result<(Vec<&'a str>, usize)> {
    let mut depth = 0usize;
    let mut args = Vec::new();
    let mut arg_start = 1;

    for (idx, c) in input.char_indices() {
        match c {
            '(' => depth += 1,
            ',' if depth == 1 => {
                args.push(input[arg_start..idx].trim());
                arg_start = idx + 1;
            }
            ')' => {
                depth -= 1;
                if depth == 0 {
                    let last = input[arg_start..idx].trim();
                    // `$__name()` passes no arguments at all
                    if !(args.is_empty() && last.is_empty()) {
                        args.push(last);
                    }
                    return Ok((args, idx + 1));
                }
            }
            _ => {}
        }
    }

    Err(DatasourceError::UnterminatedMacro(name.to_string()))
}

pub(super) fn interpolate(table: &MacroTable, raw_sql: &str, range: &TimeRange) -> Result<String> {
    let mut out = String::with_capacity(raw_sql.len());
    let mut rest = raw_sql;

    while let Some(pos) = rest.find(MACRO_PREFIX) {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + MACRO_PREFIX.len()..];
        let name_len = after.find(|c: char| !is_name_char(c)).unwrap_or(after.len());
        if name_len == 0 {
            out.push_str(MACRO_PREFIX);
            rest = after;
            continue;
        }

        let name = &after[..name_len];
        let tail = &after[name_len..];
        // Names outside the table belong to the query text
        if table.get(name).is_none() {
            out.push_str(&rest[pos..pos + MACRO_PREFIX.len() + name_len]);
            rest = tail;
            continue;
        }

        let (args, consumed) = if tail.starts_with('(') {
            parse_args(name, tail)?
        } else {
            (Vec::new(), 0)
        };

        out.push_str(&table.expand(name, range, &args)?);
        rest = &tail[consumed..];
    }

    out.push_str(rest);
    Ok(out)
}
