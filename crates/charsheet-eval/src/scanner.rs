//! Operand scanner
//!
//! Locates the next operator occurrence in raw expression text. Stateless:
//! the parser re-runs it at arbitrary offsets, including from inside
//! function-call argument scans.

use crate::operator::Operator;

/// An operator occurrence in the expression text.
#[derive(Debug)]
pub(crate) struct ScanHit<'a> {
    pub operator: &'a Operator,
    pub index: usize,
}

/// Find the next operator occurrence at or after `from`.
///
/// At each position every registered operator is tested in registry order,
/// so the first operator whose symbol matches at the lowest index wins and
/// ties break first-registered-wins.
pub(crate) fn next_operator<'a>(
    operators: &'a [Operator],
    expression: &str,
    from: usize,
) -> Option<ScanHit<'a>> {
    let length = expression.len();
    for i in from..length {
        for operator in operators {
            if matches_at(expression, i, operator) {
                return Some(ScanHit { operator, index: i });
            }
        }
    }
    None
}

/// Test a single operator symbol at one position.
///
/// Multi-byte symbols use a bounded comparison: only the prefix that fits
/// before end-of-string participates, so a trailing `<` still matches a
/// registered `<=`. Formula data in the wild depends on this.
fn matches_at(expression: &str, start: usize, operator: &Operator) -> bool {
    let bytes = expression.as_bytes();
    let symbol = operator.symbol().as_bytes();
    if symbol.len() == 1 {
        if bytes[start] != symbol[0] {
            return false;
        }
        // A '-' directly after a digit-then-'e' is a negative exponent in
        // scientific notation (1.2e-2), not the subtraction operator.
        if symbol[0] == b'-'
            && start > 1
            && bytes[start - 1] == b'e'
            && bytes[start - 2].is_ascii_digit()
        {
            return false;
        }
        true
    } else {
        let available = (expression.len() - start).min(symbol.len());
        bytes[start..start + available] == symbol[..available]
    }
}
