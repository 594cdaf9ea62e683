use std::fmt::Write;

pub mod ast_dump;
pub mod pretty;
pub mod symbol_table;

pub const INDENT_STEP: usize = 4;

/// Writes `depth` columns of indentation, with a `|` at every column that
/// sits on a step boundary counted from the right.
pub fn indent(out: &mut impl Write, depth: usize) -> std::fmt::Result {
    for column in (1..=depth).rev() {
        if column % INDENT_STEP == 0 {
            out.write_char('|')?;
        } else {
            out.write_char(' ')?;
        }
    }

    Ok(())
}
