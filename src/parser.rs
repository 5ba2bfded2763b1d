use ast_grep_language::{LanguageExt, SupportLang};
use thiserror::Error;
use tree_sitter::{Parser, Tree};

#[derive(Error, Debug)]
pub enum GrammarError {
    #[error("failed to bind grammar to parser")]
    LanguageSet,

    #[error("parser produced no tree for the input")]
    ParseFailed,
}

/// Tree-sitter parser bound to a single grammar.
///
/// A store owns exactly one of these; all sessions in the store share the
/// grammar it was constructed with. Every parse is a full parse of the
/// given source — no incremental reuse of a previous tree.
pub struct GrammarParser {
    parser: Parser,
    lang: SupportLang,
}

impl GrammarParser {
    /// Create a parser for the given grammar.
    pub fn new(lang: SupportLang) -> Result<Self, GrammarError> {
        let mut parser = Parser::new();
        let ts_lang = lang.get_ts_language();
        parser
            .set_language(&ts_lang)
            .map_err(|_| GrammarError::LanguageSet)?;

        Ok(Self { parser, lang })
    }

    /// The grammar this parser was constructed with.
    pub fn lang(&self) -> SupportLang {
        self.lang
    }

    /// Parse source code into a tree.
    pub fn parse(&mut self, source: &str) -> Result<Tree, GrammarError> {
        self.parser
            .parse(source, None)
            .ok_or(GrammarError::ParseFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_rust() {
        let mut parser = GrammarParser::new(SupportLang::Rust).unwrap();
        let tree = parser.parse("fn main() { println!(\"hello\"); }").unwrap();

        assert_eq!(tree.root_node().kind(), "source_file");
        assert!(!tree.root_node().has_error());
    }

    #[test]
    fn parse_invalid_rust_still_yields_tree() {
        let mut parser = GrammarParser::new(SupportLang::Rust).unwrap();
        let tree = parser.parse("fn main( { }").unwrap();

        assert!(tree.root_node().has_error());
    }

    #[test]
    fn parser_reports_its_grammar() {
        let parser = GrammarParser::new(SupportLang::Python).unwrap();
        assert_eq!(parser.lang(), SupportLang::Python);
    }
}
