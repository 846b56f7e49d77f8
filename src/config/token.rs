pub use logos::Logos;
use logos::Span;

#[derive(Debug, Default)]
pub struct Tokens<'i> {
    pub inp: &'i str,
    pub path: String,
    pub span: Vec<Span>,
    pub token: Vec<Variant<'i>>,
    pub cursor: usize,
}

impl<'i> Tokens<'i> {
    /// Lexes `inp` completely.
    ///
    /// # Errors
    ///
    /// Returns an [`Err`] pointing at the first input the lexer rejects.
    pub fn lex(inp: &'i str, path: impl Into<String>) -> anyhow::Result<Self> {
        let mut res = Tokens {
            inp,
            path: path.into(),
            ..Tokens::default()
        };
        let mut lexer = Variant::lexer(inp);

        while let Some(token) = lexer.next() {
            let Ok(token) = token else {
                anyhow::bail!(res.error_at(lexer.span(), "Unrecognized input"));
            };

            res.span.push(lexer.span());
            res.token.push(token);
        }

        Ok(res)
    }

    pub fn tokens(&self) -> &[Variant<'i>] {
        &self.token[self.cursor.min(self.token.len())..]
    }
}

impl Tokens<'_> {
    /// Formats `msg` followed by the location of `span` and its source line,
    /// all on one line.
    pub fn error_at(&self, span: Span, msg: impl Into<String>) -> String {
        let (line, col) = line_col(self.inp, span.start);

        format!(
            "{msg} ({path}:{line}:{col} `{contents}`)",
            msg = msg.into(),
            path = self.path,
            contents = get_line(self.inp, line).trim()
        )
    }

    pub fn error_current_span(&self, msg: impl Into<String>) -> String {
        match self.try_span() {
            Some(span) => self.error_at(span, msg),
            None => self.error_at(self.inp.len()..self.inp.len(), msg),
        }
    }

    pub fn steps(&mut self, steps: usize) {
        self.cursor += steps;
    }

    pub fn step(&mut self) {
        self.steps(1);
    }

    pub fn skiping(&mut self, steps: usize) -> &mut Self {
        self.steps(steps);
        self
    }

    pub fn try_span(&self) -> Option<Span> {
        (!self.is_empty()).then(|| self.span[self.cursor].clone())
    }

    pub fn is_empty(&self) -> bool {
        self.cursor >= self.span.len()
    }
}

/// 1-based line and column of the byte offset `at`.
pub fn line_col(inp: &str, at: usize) -> (usize, usize) {
    let before = &inp[..at.min(inp.len())];
    let line = before.matches('\n').count() + 1;
    let col = before.rfind('\n').map_or(before.len(), |nl| before.len() - nl - 1) + 1;

    (line, col)
}

pub fn get_line(inp: &str, line: usize) -> &str {
    inp.lines().nth(line.saturating_sub(1)).unwrap_or_default()
}

#[derive(Logos, Debug, PartialEq, Clone, Copy)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"#[^\n]*")]
pub enum Variant<'i> {
    #[regex(r#""[^"\n]*""#, |lex| lex.slice().trim_matches('"'))]
    #[regex(r#"'[^'\n]*'"#, |lex| lex.slice().trim_matches('\''))]
    String(&'i str),

    #[token("false", |_| false)]
    #[token("true", |_| true)]
    Bool(bool),

    #[token(",")]
    Comma,

    #[token(";")]
    Semicolon,

    #[token("=")]
    Eq,

    #[regex("[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident(&'i str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize() {
        use Variant::*;

        let inp = "# where to clone from\ntemplate = \"https://example.com/t.git\"\nskip_install=true; start_script = 'dev',";

        let tokens = Variant::lexer(inp)
            .map(std::result::Result::unwrap)
            .collect::<Vec<_>>();

        assert_eq!(
            tokens.as_slice(),
            &[
                Ident("template"),
                Eq,
                String("https://example.com/t.git"),
                Ident("skip_install"),
                Eq,
                Bool(true),
                Semicolon,
                Ident("start_script"),
                Eq,
                String("dev"),
                Comma,
            ]
        );
    }

    #[test]
    fn errors_point_at_the_line_without_breaking_it() {
        let inp = "template = 'x'\nstart_script 'dev'";
        let tokens = Tokens::lex(inp, "site.conf").unwrap();

        let msg = tokens.error_at(28..28, "Expected '='");

        assert_eq!(msg, "Expected '=' (site.conf:2:14 `start_script 'dev'`)");
        assert!(!msg.contains('\n'));
    }

    #[test]
    fn keywords_are_not_idents() {
        let tokens = Variant::lexer("false falsey")
            .map(std::result::Result::unwrap)
            .collect::<Vec<_>>();

        assert_eq!(tokens, vec![Variant::Bool(false), Variant::Ident("falsey")]);
    }

    #[test]
    fn locations_are_one_based() {
        let inp = "a = 'x'\n  b = ?";

        assert_eq!(line_col(inp, 0), (1, 1));
        assert_eq!(line_col(inp, 10), (2, 3));
        assert_eq!(get_line(inp, 2), "  b = ?");
    }

    #[test]
    fn lex_errors_point_at_the_input() {
        let err = Tokens::lex("a = 'x'\nb = ?", "sprout.conf").unwrap_err();

        assert!(err.to_string().contains("sprout.conf:2:5"), "{err}");
    }
}
