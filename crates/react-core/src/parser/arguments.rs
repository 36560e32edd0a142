use crate::tools::ToolArguments;

/// Cursor over an action string. Only the handful of tokens the action
/// grammar needs: identifiers, single characters and double-quoted strings.
pub(crate) struct Scanner<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    pub(crate) fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    pub(crate) fn is_done(&self) -> bool {
        self.pos >= self.src.len()
    }

    pub(crate) fn offset(&self) -> usize {
        self.pos
    }

    pub(crate) fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    pub(crate) fn eat(&mut self, expected: char) -> bool {
        if self.rest().starts_with(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    pub(crate) fn identifier(&mut self) -> Option<&'a str> {
        let rest = self.rest();
        if rest.starts_with(|c: char| c.is_ascii_digit()) {
            return None;
        }
        let len = rest
            .find(|c: char| !is_identifier_char(c))
            .unwrap_or(rest.len());
        if len == 0 {
            return None;
        }
        self.pos += len;
        Some(&rest[..len])
    }

    /// `"..."` with no escape sequences; the value ends at the next quote.
    pub(crate) fn quoted(&mut self) -> Option<&'a str> {
        let body = self.rest().strip_prefix('"')?;
        let end = body.find('"')?;
        self.pos += end + 2;
        Some(&body[..end])
    }
}

pub(crate) fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

pub(crate) fn is_identifier(text: &str) -> bool {
    let mut scanner = Scanner::new(text);
    scanner.identifier().is_some() && scanner.is_done()
}

/// Parses `key="value", key2="value2"` (trailing comma allowed).
///
/// Anything that is not a double-quoted string value is rejected: numbers,
/// booleans, bare words, embedded quotes and repeated keys all produce an
/// error describing the first offending position.
pub fn parse_arguments(src: &str) -> Result<ToolArguments, String> {
    let mut arguments = ToolArguments::new();
    let mut scanner = Scanner::new(src);

    loop {
        scanner.skip_whitespace();
        if scanner.is_done() {
            break;
        }

        let offset = scanner.offset();
        let key = scanner
            .identifier()
            .ok_or_else(|| format!("expected argument name at offset {offset}"))?;

        scanner.skip_whitespace();
        if !scanner.eat('=') {
            return Err(format!("expected '=' after '{key}'"));
        }

        scanner.skip_whitespace();
        let value = scanner
            .quoted()
            .ok_or_else(|| format!("value for '{key}' must be a double-quoted string"))?;

        if arguments.contains_key(key) {
            return Err(format!("duplicate argument '{key}'"));
        }
        arguments.insert(key.to_string(), value.to_string());

        scanner.skip_whitespace();
        if scanner.is_done() {
            break;
        }
        if !scanner.eat(',') {
            return Err(format!("unexpected text after value for '{key}'"));
        }
    }

    Ok(arguments)
}
