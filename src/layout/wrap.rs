/// Greedy word packing.
///
/// Words are split on Unicode whitespace and joined with single spaces. A word is appended to the
/// current line unless the measured candidate is strictly wider than `max_width` and the line
/// already holds something; a word that alone exceeds `max_width` keeps its own line unsplit.
///
/// Always returns at least one line: empty or all-whitespace input yields `[""]`.
pub fn wrap<F>(text: &str, mut measure: F, max_width: f64) -> Vec<String>
where
    F: FnMut(&str) -> f64,
{
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_owned()
        } else {
            format!("{current} {word}")
        };

        if measure(&candidate) > max_width && !current.is_empty() {
            lines.push(std::mem::replace(&mut current, word.to_owned()));
        } else {
            current = candidate;
        }
    }
    lines.push(current);
    lines
}

#[cfg(test)]
#[path = "../../tests/unit/layout/wrap.rs"]
mod tests;
