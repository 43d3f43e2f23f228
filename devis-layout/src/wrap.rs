//! Greedy word wrapping against an injected width function.

use std::convert::Infallible;
use std::mem;

/// Word-wrap `text` into lines no wider than `max_width`.
///
/// `\n` is a hard break and each paragraph is wrapped on its own; a blank
/// paragraph produces an empty line. A word wider than `max_width` is
/// kept whole on a line of its own. The result is never empty.
pub fn wrap<F>(text: &str, max_width: f64, measure: F) -> Vec<String>
where
    F: Fn(&str) -> f64,
{
    match try_wrap(text, max_width, |s| Ok::<_, Infallible>(measure(s))) {
        Ok(lines) => lines,
        Err(never) => match never {},
    }
}

/// [`wrap`] with a measurement function that can fail. The first
/// measurement error aborts wrapping.
pub fn try_wrap<F, E>(text: &str, max_width: f64, mut measure: F) -> Result<Vec<String>, E>
where
    F: FnMut(&str) -> Result<f64, E>,
{
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let paragraph = paragraph.strip_suffix('\r').unwrap_or(paragraph);
        wrap_paragraph(paragraph, max_width, &mut measure, &mut lines)?;
    }
    Ok(lines)
}

fn wrap_paragraph<F, E>(
    paragraph: &str,
    max_width: f64,
    measure: &mut F,
    out: &mut Vec<String>,
) -> Result<(), E>
where
    F: FnMut(&str) -> Result<f64, E>,
{
    let mut current = String::new();
    for word in paragraph.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{} {}", current, word);
        if measure(&candidate)? <= max_width {
            current = candidate;
        } else {
            out.push(mem::take(&mut current));
            current.push_str(word);
        }
    }
    // Blank paragraphs still occupy a line.
    out.push(current);
    Ok(())
}
