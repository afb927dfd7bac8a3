//! Continuation-line repair for calendar source text.
//!
//! The calendar exports this system ingests mark continuation lines with a
//! leading `=` instead of the RFC 5545 leading-whitespace fold marker (an
//! artifact of the quoted-printable soft breaks the export tool emits).
//! The grammar parser expects one property per logical line, so these
//! continuations must be joined back together before tokenizing.
//!
//! This is deliberately not general iCalendar unfolding; standard
//! whitespace-folded input is already handled by the grammar crate.

/// Iterator adapter joining `=`-prefixed continuation lines onto the line
/// that precedes them.
pub struct Unfold<I> {
    lines: I,
    pending: Option<String>,
    done: bool,
}

impl<I> Iterator for Unfold<I>
where
    I: Iterator<Item = String>,
{
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            match self.lines.next() {
                Some(line) => {
                    if line.starts_with('=') {
                        // Continuation: keep accumulating, `=` included.
                        match self.pending.as_mut() {
                            Some(current) => current.push_str(&line),
                            None => self.pending = Some(line),
                        }
                        continue;
                    }
                    let previous = self.pending.replace(line);
                    match previous {
                        Some(logical) if !logical.is_empty() => return Some(logical),
                        _ => continue,
                    }
                }
                None => {
                    self.done = true;
                    return self.pending.take().filter(|l| !l.is_empty());
                }
            }
        }
    }
}

/// Undoes `=`-prefix line continuation over a sequence of calendar lines.
pub fn unfold<I>(lines: I) -> Unfold<I::IntoIter>
where
    I: IntoIterator<Item = String>,
{
    Unfold {
        lines: lines.into_iter(),
        pending: None,
        done: false,
    }
}
