pub fn format_score(score: f64, decimals: usize) -> String {
    format!("{score:.decimals$}")
}

/// `12480` -> `12,480`
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut ret = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            ret.push(',');
        }
        ret.push(ch);
    }
    ret
}

/// Greedy word wrap. Paragraph breaks and blank lines are kept; words
/// longer than `max_chars` get a line of their own.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = vec![];
    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let needed = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if needed > max_chars && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        lines.push(current);
    }
    lines
}
