//! Author field splitting.

/// Splits an `X and Y and Z` author field into display names.
///
/// The `and` delimiter is matched case-insensitively as a whole word and only
/// outside brace-protected groups. `Last, First` and `von Last, Jr, First`
/// forms are reordered to `First von Last Jr`, brace characters are removed
/// and whitespace is collapsed. Blank segments are kept as empty strings so
/// the caller can report them.
pub fn split_author_field(raw: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut segment = String::new();
    let mut token = String::new();
    let mut depth = 0usize;

    for c in raw.chars() {
        match c {
            '{' => {
                depth += 1;
                token.push(c);
            }
            '}' => {
                depth = depth.saturating_sub(1);
                token.push(c);
            }
            c if c.is_whitespace() && depth == 0 => {
                flush_token(&mut token, &mut segment, &mut segments);
            }
            _ => token.push(c),
        }
    }
    flush_token(&mut token, &mut segment, &mut segments);
    segments.push(segment);

    segments.iter().map(|name| display_name(name)).collect()
}

fn flush_token(token: &mut String, segment: &mut String, segments: &mut Vec<String>) {
    if token.is_empty() {
        return;
    }
    if token.eq_ignore_ascii_case("and") {
        segments.push(std::mem::take(segment));
    } else {
        if !segment.is_empty() {
            segment.push(' ');
        }
        segment.push_str(token);
    }
    token.clear();
}

fn display_name(segment: &str) -> String {
    let parts = split_top_level_commas(segment);
    let ordered = match parts.as_slice() {
        [last, first] => format!("{first} {last}"),
        [last, jr, first] => format!("{first} {last} {jr}"),
        _ => segment.to_string(),
    };
    ordered
        .replace(['{', '}'], "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn split_top_level_commas(segment: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (idx, c) in segment.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(segment[start..idx].trim());
                start = idx + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(segment[start..].trim());
    parts
}

#[cfg(test)]
mod tests {
    use super::split_author_field;

    #[test]
    fn splits_on_and_case_insensitively() {
        assert_eq!(
            split_author_field("A. Smith and B. Jones AND C. Lee"),
            vec!["A. Smith", "B. Jones", "C. Lee"]
        );
    }

    #[test]
    fn and_inside_words_or_braces_is_not_a_delimiter() {
        assert_eq!(
            split_author_field("{Smith and Sons} and Sandra Anderson"),
            vec!["Smith and Sons", "Sandra Anderson"]
        );
    }

    #[test]
    fn comma_forms_are_reordered() {
        assert_eq!(
            split_author_field("Smith, John and van Beethoven, Jr, Ludwig"),
            vec!["John Smith", "Ludwig van Beethoven Jr"]
        );
    }

    #[test]
    fn braced_comma_is_kept() {
        assert_eq!(split_author_field("{Acme, Inc.}"), vec!["Acme, Inc."]);
    }

    #[test]
    fn blank_segments_are_reported_as_empty() {
        assert_eq!(
            split_author_field("A. Smith and and B. Jones"),
            vec!["A. Smith", "", "B. Jones"]
        );
        assert_eq!(split_author_field("   "), vec![""]);
    }

    #[test]
    fn whitespace_is_collapsed() {
        assert_eq!(
            split_author_field("  A.\n  Smith   and\tB.  Jones "),
            vec!["A. Smith", "B. Jones"]
        );
    }
}
