//! Editor language identifiers → highlighting grammar keys

/// Grammar used for identifiers the table does not know.
pub const DEFAULT_GRAMMAR: &str = "javascript";

const LANGUAGE_MAP: &[(&str, &str)] = &[
    ("javascript", "javascript"),
    ("typescript", "typescript"),
    ("python", "python"),
    ("java", "java"),
    ("cpp", "cpp"),
    ("c", "c"),
    ("csharp", "csharp"),
    ("php", "php"),
    ("ruby", "ruby"),
    ("go", "go"),
    ("rust", "rust"),
    ("swift", "swift"),
    ("kotlin", "kotlin"),
    ("scala", "scala"),
    ("html", "markup"),
    ("css", "css"),
    ("scss", "scss"),
    ("less", "less"),
    ("json", "json"),
    ("xml", "markup"),
    ("yaml", "yaml"),
    ("markdown", "markdown"),
    ("sql", "sql"),
    ("bash", "bash"),
    ("shell", "bash"),
    ("shellscript", "bash"),
    ("powershell", "powershell"),
];

/// Map an editor language id to a grammar key.
///
/// Never fails: unknown ids get [`DEFAULT_GRAMMAR`] so highlighting is always
/// attempted.
pub fn map_language(editor_language_id: &str) -> &'static str {
    LANGUAGE_MAP
        .iter()
        .find(|(id, _)| *id == editor_language_id)
        .map(|(_, grammar)| *grammar)
        .unwrap_or(DEFAULT_GRAMMAR)
}

/// Editor-style language id for a file name, by extension.
///
/// Stands in for the editor's own document language when the CLI reads a file.
pub fn language_id_for_path(path: &str) -> &'static str {
    let ext = file_name(path)
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "js" | "mjs" | "cjs" | "jsx" => "javascript",
        "ts" | "tsx" | "mts" => "typescript",
        "py" => "python",
        "java" => "java",
        "cc" | "cpp" | "cxx" | "hpp" | "hh" => "cpp",
        "c" | "h" => "c",
        "cs" => "csharp",
        "php" => "php",
        "rb" => "ruby",
        "go" => "go",
        "rs" => "rust",
        "swift" => "swift",
        "kt" | "kts" => "kotlin",
        "scala" => "scala",
        "html" | "htm" => "html",
        "css" => "css",
        "scss" => "scss",
        "less" => "less",
        "json" => "json",
        "xml" | "svg" => "xml",
        "yml" | "yaml" => "yaml",
        "md" | "markdown" => "markdown",
        "sql" => "sql",
        "sh" | "bash" | "zsh" => "shellscript",
        "ps1" => "powershell",
        _ => "plaintext",
    }
}

/// Final path segment, independent of separator convention.
pub fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_ids_map_to_grammar_keys() {
        assert_eq!(map_language("javascript"), "javascript");
        assert_eq!(map_language("html"), "markup");
        assert_eq!(map_language("xml"), "markup");
        assert_eq!(map_language("shell"), "bash");
        assert_eq!(map_language("csharp"), "csharp");
        assert_eq!(map_language("yaml"), "yaml");
    }

    #[test]
    fn unknown_ids_map_to_default() {
        for id in ["plaintext", "", "COBOL", "JavaScript"] {
            assert_eq!(map_language(id), DEFAULT_GRAMMAR);
        }
    }

    #[test]
    fn file_name_handles_both_separators() {
        assert_eq!(file_name("/home/me/src/main.rs"), "main.rs");
        assert_eq!(file_name("C:\\work\\app\\index.ts"), "index.ts");
        assert_eq!(file_name("mixed/dir\\file.py"), "file.py");
        assert_eq!(file_name("bare.go"), "bare.go");
    }

    #[test]
    fn extensions_infer_editor_ids() {
        assert_eq!(language_id_for_path("src/lib.rs"), "rust");
        assert_eq!(language_id_for_path("deploy.YAML"), "yaml");
        assert_eq!(language_id_for_path("Makefile"), "plaintext");
        assert_eq!(language_id_for_path("v1.2/notes"), "plaintext");
    }
}
