pub mod lexer;
pub mod types;

use types::ParsedLine;

/// Parse a command file into its non-blank, non-comment lines.
pub fn parse_script(input: &str) -> Vec<ParsedLine> {
    input
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| lexer::parse_line(line, idx + 1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_script() {
        assert!(parse_script("").is_empty());
    }

    #[test]
    fn test_parse_comments_only() {
        let input = "# comment 1\n# comment 2\n";
        assert!(parse_script(input).is_empty());
    }

    #[test]
    fn test_parse_multi_line_script() {
        let input = "move 50\nright 90\n\npenup; move 10\n";
        let script = parse_script(input);
        assert_eq!(script.len(), 3);
        assert_eq!(script[2].line_number, 4);
        assert_eq!(script[2].statements.len(), 2);
    }

    #[test]
    fn test_parse_keeps_malformed_lines_for_validation() {
        let input = "move 50\nbogus 1 2 3\n";
        let script = parse_script(input);
        assert_eq!(script.len(), 2);
        assert_eq!(script[1].statements[0].verb, "bogus");
    }
}
