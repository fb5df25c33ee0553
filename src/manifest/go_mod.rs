use std::path::Path;

use crate::error::InventoryError;
use crate::models::DependencyRef;

/// Parser for Go `go.mod` manifests.
///
/// Both `require (...)` blocks and single-line `require name version`
/// statements are read, in textual order. Malformed lines inside a block are
/// skipped without error.
pub struct GoModParser;

impl GoModParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_str(&self, content: &str) -> Vec<DependencyRef> {
        tokenize(content)
            .into_iter()
            .filter_map(|token| match token {
                Token::Dependency { name, version } => Some(DependencyRef::new(name, version)),
                Token::Malformed(line) => {
                    tracing::debug!(line, "skipping malformed require line");
                    None
                }
                _ => None,
            })
            .collect()
    }
}

impl super::ManifestParser for GoModParser {
    fn parse(&self, path: &Path) -> Result<Vec<DependencyRef>, InventoryError> {
        let content = super::read_manifest(path)?;
        Ok(self.parse_str(&content))
    }
}

/// Line classes produced by [`tokenize`]. Lines outside any `require`
/// statement produce no token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    BlockOpen,
    BlockClose,
    Comment,
    Dependency { name: &'a str, version: &'a str },
    Malformed(&'a str),
}

/// Classify `go.mod` lines into a flat token stream.
pub fn tokenize(content: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut in_block = false;

    for line in content.lines() {
        let line = line.trim();

        if in_block {
            in_block = classify_block_line(line, &mut tokens);
            continue;
        }

        let Some(rest) = strip_require(line) else {
            continue;
        };

        if let Some(body) = rest.strip_prefix('(') {
            tokens.push(Token::BlockOpen);
            in_block = classify_block_line(body.trim(), &mut tokens);
        } else if let Some((name, version)) = split_entry(rest) {
            tokens.push(Token::Dependency { name, version });
        }
    }

    tokens
}

/// Classify one line inside a block. Returns whether the block is still open.
fn classify_block_line<'a>(line: &'a str, tokens: &mut Vec<Token<'a>>) -> bool {
    if line.starts_with("//") {
        tokens.push(Token::Comment);
        return true;
    }

    // A `)` inside a trailing comment does not close the block.
    let code = match line.find("//") {
        Some(idx) => line[..idx].trim_end(),
        None => line,
    };

    let (body, closes) = match code.find(')') {
        Some(idx) => (code[..idx].trim(), true),
        None => (code, false),
    };

    if !body.is_empty() {
        match split_entry(body) {
            Some((name, version)) => tokens.push(Token::Dependency { name, version }),
            None => tokens.push(Token::Malformed(body)),
        }
    }

    if closes {
        tokens.push(Token::BlockClose);
    }
    !closes
}

/// Strip a leading `require` keyword. The keyword must be followed by
/// whitespace or `(`; the remainder is returned with leading space trimmed.
fn strip_require(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("require")?;
    match rest.chars().next() {
        Some(c) if c.is_whitespace() || c == '(' => Some(rest.trim_start()),
        _ => None,
    }
}

/// `<name> <version>` with any trailing tokens (such as `// indirect`) ignored.
fn split_entry(line: &str) -> Option<(&str, &str)> {
    let mut parts = line.split_whitespace();
    let name = parts.next()?;
    let version = parts.next()?;
    if name.starts_with("//") || version.starts_with("//") {
        return None;
    }
    Some((name, version))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::ManifestParser;

    fn parse(content: &str) -> Vec<DependencyRef> {
        GoModParser::new().parse_str(content)
    }

    #[test]
    fn test_block_with_comment() {
        let deps = parse("require (\n\tfoo/bar v1.0.0\n\t// comment\n\tbaz/qux v2.1.0\n)");
        assert_eq!(
            deps,
            vec![
                DependencyRef::new("foo/bar", "v1.0.0"),
                DependencyRef::new("baz/qux", "v2.1.0"),
            ]
        );
    }

    #[test]
    fn test_single_line() {
        let deps = parse("require example.com/mod v0.0.1");
        assert_eq!(deps, vec![DependencyRef::new("example.com/mod", "v0.0.1")]);
    }

    #[test]
    fn test_malformed_lines_skipped() {
        let content = "require (\n\tgood/one v1.0.0\n\tlonely\n\tgood/two v0.0.0-20230101000000-abcdef123456\n\tbad // nope\n)\n";
        let deps = parse(content);
        assert_eq!(deps.len(), 2);
        assert_eq!(deps[1].version, "v0.0.0-20230101000000-abcdef123456");

        let malformed = tokenize(content)
            .into_iter()
            .filter(|t| matches!(t, Token::Malformed(_)))
            .count();
        assert_eq!(malformed, 2);
    }

    #[test]
    fn test_mixed_forms_in_textual_order() {
        let content = r#"module example.com/app

go 1.21

require github.com/first/one v1.2.3

require (
	github.com/second/two v0.4.0
	github.com/third/three v1.0.0 // indirect
)

require github.com/fourth/four v2.0.0+incompatible
"#;
        let names: Vec<String> = parse(content).into_iter().map(|d| d.name).collect();
        assert_eq!(
            names,
            vec![
                "github.com/first/one",
                "github.com/second/two",
                "github.com/third/three",
                "github.com/fourth/four",
            ]
        );
    }

    #[test]
    fn test_token_stream() {
        let tokens = tokenize("module x\n\nrequire (\n  // deps\n  a/b v1\n  junk\n)\nrequire c/d v2 // indirect\n");
        assert_eq!(
            tokens,
            vec![
                Token::BlockOpen,
                Token::Comment,
                Token::Dependency { name: "a/b", version: "v1" },
                Token::Malformed("junk"),
                Token::BlockClose,
                Token::Dependency { name: "c/d", version: "v2" },
            ]
        );
    }

    #[test]
    fn test_block_entries_on_delimiter_lines() {
        let deps = parse("require ( a/b v1.0.0\n  c/d v2.0.0 )\n");
        assert_eq!(
            deps,
            vec![DependencyRef::new("a/b", "v1.0.0"), DependencyRef::new("c/d", "v2.0.0")]
        );
        assert_eq!(parse("require(x/y v0.1.0)"), vec![DependencyRef::new("x/y", "v0.1.0")]);
    }

    #[test]
    fn test_keyword_must_stand_alone() {
        assert!(parse("requirements foo v1\n// require bar v2\n").is_empty());
        assert!(parse("require\n").is_empty());
    }

    #[test]
    fn test_replace_and_exclude_blocks_ignored() {
        let content = "require a/b v1.0.0\nreplace (\n\ta/b => ../b\n)\nexclude c/d v0.1.0\n";
        assert_eq!(parse(content), vec![DependencyRef::new("a/b", "v1.0.0")]);
    }

    #[test]
    fn test_parenthesis_in_trailing_comment_keeps_block_open() {
        let deps = parse("require (\n\ta/b v1.0.0 // fork of c (see issue)\n\td/e v2.0.0\n\tf/g v3.0.0 // )\n)\n");
        assert_eq!(
            deps,
            vec![
                DependencyRef::new("a/b", "v1.0.0"),
                DependencyRef::new("d/e", "v2.0.0"),
                DependencyRef::new("f/g", "v3.0.0"),
            ]
        );
        assert_eq!(parse("require (\n\tx/y v0.1.0\n) // end (of deps)\nrequire z/w v1.0.0\n").len(), 2);
    }

    #[test]
    fn test_unterminated_block_keeps_entries() {
        assert_eq!(parse("require (\n\ta/b v1.0.0\n"), vec![DependencyRef::new("a/b", "v1.0.0")]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let deps = parse("require (\r\n\ta/b v1.0.0\r\n)\r\nrequire c/d v2.0.0\r\n");
        assert_eq!(deps.len(), 2);
        assert_eq!(deps[0].version, "v1.0.0");
    }

    #[test]
    fn test_unreadable_file_is_parse_error() {
        let err = GoModParser::new()
            .parse(Path::new("/nonexistent/dir/go.mod"))
            .unwrap_err();
        assert!(matches!(err, InventoryError::ManifestParse { .. }));
    }
}
