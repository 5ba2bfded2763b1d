//! Grammar selection via ast-grep-language.
//!
//! Grammars come from the `SupportLang` registry in ast-grep-language
//! instead of hand-maintained `Language` implementations. A session store
//! binds exactly one grammar for its whole lifetime; the helpers here map
//! user-facing names and file extensions onto that registry for the CLI.

use std::path::Path;

pub use ast_grep_language::SupportLang;

/// Resolve a grammar from a user-facing name or extension string.
pub fn lang_from_name(name: &str) -> Option<SupportLang> {
    match name.to_ascii_lowercase().as_str() {
        "rust" | "rs" => Some(SupportLang::Rust),
        "python" | "py" => Some(SupportLang::Python),
        "javascript" | "js" | "mjs" => Some(SupportLang::JavaScript),
        "typescript" | "ts" => Some(SupportLang::TypeScript),
        "tsx" => Some(SupportLang::Tsx),
        "go" => Some(SupportLang::Go),
        "c" | "h" => Some(SupportLang::C),
        "cpp" | "cc" | "cxx" | "hpp" => Some(SupportLang::Cpp),
        "java" => Some(SupportLang::Java),
        "json" => Some(SupportLang::Json),
        "css" => Some(SupportLang::Css),
        "html" => Some(SupportLang::Html),
        _ => None,
    }
}

/// Resolve a grammar from a file path's extension.
pub fn lang_from_path(path: &Path) -> Option<SupportLang> {
    let ext = path.extension()?.to_str()?;
    lang_from_name(ext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn resolves_names_and_aliases() {
        assert_eq!(lang_from_name("rust"), Some(SupportLang::Rust));
        assert_eq!(lang_from_name("rs"), Some(SupportLang::Rust));
        assert_eq!(lang_from_name("Python"), Some(SupportLang::Python));
        assert_eq!(lang_from_name("klingon"), None);
    }

    #[test]
    fn resolves_extensions() {
        assert_eq!(
            lang_from_path(&PathBuf::from("src/main.rs")),
            Some(SupportLang::Rust)
        );
        assert_eq!(
            lang_from_path(&PathBuf::from("app.py")),
            Some(SupportLang::Python)
        );
        assert_eq!(lang_from_path(&PathBuf::from("notes.txt")), None);
        assert_eq!(lang_from_path(&PathBuf::from("Makefile")), None);
    }
}
