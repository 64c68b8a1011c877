//! Language definitions for keyword-based syntax highlighting.

/// Language definition for keyword-based syntax highlighting.
pub struct LanguageDef {
    /// Reserved words colored as keywords.
    pub keywords: &'static [&'static str],
    /// Line-comment prefix; empty when the language has none.
    pub line_comment: &'static str,
    /// Well-known identifiers colored as builtins.
    pub builtins: &'static [&'static str],
}

/// Languages whose rendered lines get shell-prompt decoration.
const SHELL_LANGUAGES: &[&str] = &["bash", "shell", "shellscript", "zsh", "powershell"];

/// Whether the declared language identifier is on the shell-like allow-list.
pub fn is_shell_like(language: &str) -> bool {
    SHELL_LANGUAGES.contains(&language.to_lowercase().as_str())
}

/// Return the [`LanguageDef`] for a given language tag, or `None` if the
/// language is not recognised.
pub fn get_language_def(language: &str) -> Option<LanguageDef> {
    match language.to_lowercase().as_str() {
        "rust" | "rs" => Some(LanguageDef {
            keywords: &[
                "fn", "let", "mut", "const", "static", "if", "else", "match", "for", "while",
                "loop", "return", "break", "continue", "struct", "enum", "impl", "trait", "pub",
                "use", "mod", "crate", "self", "super", "where", "async", "await", "move",
                "unsafe", "type", "as", "in", "ref", "dyn", "true", "false",
            ],
            line_comment: "//",
            builtins: &[
                "Self", "Option", "Result", "Vec", "String", "Box", "Rc", "Arc", "Some", "None",
                "Ok", "Err",
            ],
        }),
        "python" | "py" => Some(LanguageDef {
            keywords: &[
                "def", "class", "if", "elif", "else", "for", "while", "return", "import", "from",
                "as", "try", "except", "finally", "with", "yield", "lambda", "pass", "break",
                "continue", "raise", "and", "or", "not", "in", "is", "global", "del", "assert",
                "True", "False", "None", "async", "await",
            ],
            line_comment: "#",
            builtins: &[
                "print", "len", "range", "int", "str", "float", "list", "dict", "set", "tuple",
                "bool", "type", "isinstance", "super", "self",
            ],
        }),
        "javascript" | "js" | "typescript" | "ts" => Some(LanguageDef {
            keywords: &[
                "function", "const", "let", "var", "if", "else", "for", "while", "return",
                "class", "new", "this", "import", "export", "from", "default", "try", "catch",
                "finally", "throw", "async", "await", "yield", "switch", "case", "break",
                "continue", "typeof", "instanceof", "extends", "true", "false", "null",
                "undefined", "interface", "enum",
            ],
            line_comment: "//",
            builtins: &[
                "console", "Promise", "Array", "Object", "Map", "Set", "JSON", "Math", "String",
                "Number", "Boolean", "Error", "document", "window",
            ],
        }),
        "php" => Some(LanguageDef {
            keywords: &[
                "function", "class", "public", "private", "protected", "static", "if", "else",
                "elseif", "foreach", "for", "while", "return", "echo", "new", "use", "namespace",
                "try", "catch", "finally", "throw", "extends", "implements", "true", "false",
                "null",
            ],
            line_comment: "//",
            builtins: &[
                "array", "count", "strlen", "implode", "explode", "isset", "empty", "printf",
            ],
        }),
        "json" => Some(LanguageDef {
            keywords: &["true", "false", "null"],
            line_comment: "",
            builtins: &[],
        }),
        "yaml" | "yml" => Some(LanguageDef {
            keywords: &["true", "false", "null", "yes", "no"],
            line_comment: "#",
            builtins: &[],
        }),
        "bash" | "shell" | "shellscript" | "sh" | "zsh" => Some(LanguageDef {
            keywords: &[
                "if", "then", "else", "elif", "fi", "for", "while", "do", "done", "case", "esac",
                "function", "return", "exit", "export", "local", "readonly", "in", "select",
                "until", "true", "false",
            ],
            line_comment: "#",
            builtins: &[
                "echo", "cd", "ls", "cat", "grep", "sed", "awk", "find", "sort", "uniq", "wc",
                "head", "tail", "mkdir", "rm", "cp", "mv", "chmod", "chown", "curl", "wget",
                "git", "cargo",
            ],
        }),
        "powershell" | "ps1" => Some(LanguageDef {
            keywords: &[
                "function", "param", "if", "else", "elseif", "foreach", "for", "while", "do",
                "switch", "return", "try", "catch", "finally", "throw", "begin", "process",
                "end", "in",
            ],
            line_comment: "#",
            builtins: &[
                "Write-Host", "Write-Output", "Get-Item", "Get-ChildItem", "Set-Location",
                "New-Item", "Remove-Item", "Copy-Item", "Move-Item",
            ],
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_languages_resolve() {
        assert!(get_language_def("rust").is_some());
        assert!(get_language_def("RS").is_some());
        assert!(get_language_def("typescript").is_some());
        assert!(get_language_def("brainfuck").is_none());
    }

    #[test]
    fn test_shell_allow_list() {
        assert!(is_shell_like("bash"));
        assert!(is_shell_like("Shell"));
        assert!(is_shell_like("powershell"));
        // `sh` highlights like a shell but is not on the prompt allow-list.
        assert!(!is_shell_like("sh"));
        assert!(!is_shell_like("rust"));
    }
}
