use super::types::{ParsedLine, Statement};

pub const STATEMENT_SEPARATOR: char = ';';

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Error at line {line_number}: {message}\n  | {line_content}")]
pub struct LineError {
    pub line_number: usize,
    pub line_content: String,
    pub message: String,
}

/// Tokenize one segment. Blank segments yield `None`.
pub fn parse_statement(segment: &str) -> Option<Statement> {
    let mut tokens = segment.split_whitespace();
    let verb = tokens.next()?.to_lowercase();
    let args = tokens.map(str::to_string).collect();
    Some(Statement { verb, args })
}

/// Split a raw input line on `;` and tokenize every non-blank segment, in order.
pub fn split_statements(input: &str) -> Vec<Statement> {
    input
        .split(STATEMENT_SEPARATOR)
        .filter_map(parse_statement)
        .collect()
}

/// Parse one line of a command file. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str, line_number: usize) -> Option<ParsedLine> {
    let trimmed = line.trim();

    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }

    let statements = split_statements(trimmed);
    if statements.is_empty() {
        return None;
    }

    Some(ParsedLine {
        line_number,
        content: trimmed.to_string(),
        statements,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stmt(verb: &str, args: &[&str]) -> Statement {
        Statement {
            verb: verb.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    #[test]
    fn test_parse_empty_segment() {
        assert!(parse_statement("").is_none());
        assert!(parse_statement("   \t ").is_none());
    }

    #[test]
    fn test_parse_verb_only() {
        assert_eq!(parse_statement("penup"), Some(stmt("penup", &[])));
    }

    #[test]
    fn test_parse_verb_with_args() {
        assert_eq!(
            parse_statement("  pen 255   0 0 "),
            Some(stmt("pen", &["255", "0", "0"]))
        );
    }

    #[test]
    fn test_parse_verb_case_insensitive() {
        assert_eq!(parse_statement("MoVe 50"), Some(stmt("move", &["50"])));
    }

    #[test]
    fn test_parse_args_keep_case() {
        assert_eq!(parse_statement("move ABC"), Some(stmt("move", &["ABC"])));
    }

    #[test]
    fn test_split_multiple_statements() {
        let statements = split_statements("move 50; right 90 ;; penup;");
        assert_eq!(
            statements,
            vec![
                stmt("move", &["50"]),
                stmt("right", &["90"]),
                stmt("penup", &[])
            ]
        );
    }

    #[test]
    fn test_split_blank_input() {
        assert!(split_statements("").is_empty());
        assert!(split_statements(" ; ; ").is_empty());
    }

    #[test]
    fn test_parse_line_comment() {
        assert!(parse_line("# saved session", 1).is_none());
        assert!(parse_line("   ", 2).is_none());
    }

    #[test]
    fn test_parse_line_keeps_number_and_content() {
        let parsed = parse_line("  square 40; circle 10 ", 7).unwrap();
        assert_eq!(parsed.line_number, 7);
        assert_eq!(parsed.content, "square 40; circle 10");
        assert_eq!(parsed.statements.len(), 2);
    }

    #[test]
    fn test_line_error_mentions_line() {
        let err = LineError {
            line_number: 5,
            line_content: "bogus".into(),
            message: "Invalid command: bogus".into(),
        };
        let text = err.to_string();
        assert!(text.contains("5"));
        assert!(text.contains("bogus"));
    }
}
