//! Name hygiene and text utilities shared by the emitter modules.

use once_cell::sync::Lazy;
use rustc_hash::FxHashSet;

/// Python reserved words; identifiers colliding with one get a trailing
/// underscore.
static PYTHON_KEYWORDS: Lazy<FxHashSet<&'static str>> = Lazy::new(|| {
    [
        "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
        "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
        "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
        "try", "while", "with", "yield",
    ]
    .into_iter()
    .collect()
});

/// TypeScript basic types and well-known names mapped to their Python
/// carriers.
pub(super) const TYPE_NAME_SUBSTITUTION: &[(&str, &str)] = &[
    ("object", "Dict"),
    ("array", "List"),
    ("string", "str"),
    ("number", "float"),
    ("decimal", "float"),
    ("integer", "int"),
    ("uinteger", "int"),
    ("boolean", "bool"),
    ("null", "None"),
    ("undefined", "None"),
    ("unknown", "Any"),
    ("any", "Any"),
    ("void", "None"),
    ("Thenable", "Coroutine"),
    ("Array", "List"),
    ("ReadonlyArray", "List"),
    ("Uint32Array", "List[int]"),
    ("Error", "Exception"),
    ("RegExp", "str"),
];

/// `typing` names scanned for in the emitted code; `TypedDict` is always
/// imported.
pub(super) const TYPING_TYPES: &[&str] = &[
    "NotRequired",
    "Literal",
    "Union",
    "Optional",
    "Any",
    "Generic",
    "TypeVar",
    "Callable",
    "Coroutine",
    "List",
    "Tuple",
    "Dict",
];

/// Substitute a TypeScript type name with its Python carrier, if mapped.
#[must_use]
pub fn substitute_type_name(name: &str) -> &str {
    TYPE_NAME_SUBSTITUTION
        .iter()
        .find(|(from, _)| *from == name)
        .map_or(name, |(_, to)| *to)
}

/// Append `_` to identifiers that collide with a Python reserved word.
#[must_use]
pub fn escape_keyword(identifier: &str) -> String {
    if PYTHON_KEYWORDS.contains(identifier) {
        format!("{identifier}_")
    } else {
        identifier.to_string()
    }
}

/// Synthesize a class name from a field name: uppercase the first
/// letter, append `_`.
#[must_use]
pub fn to_typename(varname: &str) -> String {
    let mut chars = varname.chars();
    match chars.next() {
        Some(first) => format!("{}{}_", first.to_uppercase(), chars.as_str()),
        None => "_".to_string(),
    }
}

/// Inverse of [`to_typename`]: recover a field name from a synthesized
/// class name.
#[must_use]
pub fn to_varname(typename: &str) -> String {
    let stripped = typename.strip_suffix('_').unwrap_or(typename);
    let mut chars = stripped.chars();
    match chars.next() {
        Some(first) => format!("{}{}", first.to_lowercase(), chars.as_str()),
        None => String::new(),
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Uppercase the first character, leaving the rest unchanged.
#[must_use]
pub(super) fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => format!("{}{}", first.to_uppercase(), chars.as_str()),
        None => String::new(),
    }
}

/// Strip a trailing `_` or `_<digits>` suffix from a synthesized name.
#[must_use]
pub(super) fn strip_name_index(name: &str) -> String {
    match name.rfind('_') {
        Some(i) => {
            let ending = &name[i + 1..];
            if ending.is_empty() || ending.chars().all(|ch| ch.is_ascii_digit()) {
                name[..i].to_string()
            } else {
                name.to_string()
            }
        }
        None => name.to_string(),
    }
}

/// Extract the class name from an emitted `class <Name>...:` header.
#[must_use]
pub(super) fn extract_class_name(definition: &str) -> String {
    let rest = definition.strip_prefix("class").unwrap_or(definition);
    let rest = rest.trim_start();
    rest.chars().take_while(|ch| is_word_char(*ch)).collect()
}

/// True if `word` occurs in `text` at word boundaries.
#[must_use]
pub(super) fn contains_word(text: &str, word: &str) -> bool {
    if word.is_empty() {
        return false;
    }
    let mut start = 0;
    while let Some(i) = text[start..].find(word) {
        let abs = start + i;
        let before_ok = !text[..abs].chars().next_back().is_some_and(is_word_char);
        let after_ok = !text[abs + word.len()..]
            .chars()
            .next()
            .is_some_and(is_word_char);
        if before_ok && after_ok {
            return true;
        }
        start = abs + text[abs..].chars().next().map_or(1, char::len_utf8);
    }
    false
}

/// Replace standalone occurrences of `word` in `text` with
/// `replacement`. A standalone occurrence is delimited by characters
/// that are neither word characters nor single quotes (or the text
/// boundaries), mirroring the forward-reference quoting rule.
#[must_use]
pub(super) fn replace_word_outside_quotes(text: &str, word: &str, replacement: &str) -> String {
    let segments: Vec<&str> = text.split('\'').collect();
    let rewritten: Vec<String> = segments
        .iter()
        .enumerate()
        .map(|(i, segment)| {
            if i % 2 == 0 {
                replace_standalone(segment, word, replacement)
            } else {
                (*segment).to_string()
            }
        })
        .collect();
    rewritten.join("'")
}

fn is_boundary_char(ch: char) -> bool {
    !is_word_char(ch) && ch != '\''
}

fn replace_standalone(text: &str, word: &str, replacement: &str) -> String {
    if word.is_empty() {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut start = 0;
    while let Some(i) = text[start..].find(word) {
        let abs = start + i;
        let before_ok = text[..abs].chars().next_back().is_none_or(is_boundary_char);
        let after_ok = text[abs + word.len()..]
            .chars()
            .next()
            .is_none_or(is_boundary_char);
        if before_ok && after_ok {
            out.push_str(&text[start..abs]);
            out.push_str(replacement);
            start = abs + word.len();
        } else {
            let advance = abs + text[abs..].chars().next().map_or(1, char::len_utf8);
            out.push_str(&text[start..advance]);
            start = advance;
        }
    }
    out.push_str(&text[start..]);
    out
}

/// Strip a leading `name:` prefix from an argument rendering, keeping
/// only the type (used when lowering `func_type` argument lists).
#[must_use]
pub(super) fn strip_argument_name(argument: &str) -> String {
    let Some(colon) = argument.find(':') else {
        return argument.to_string();
    };
    let name = argument[..colon].trim_end();
    if !name.is_empty() && name.chars().all(is_word_char) {
        argument[colon + 1..].trim_start().to_string()
    } else {
        argument.to_string()
    }
}

/// Remove spaces that directly precede a line break.
#[must_use]
pub(super) fn strip_trailing_spaces(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let last = lines.len().saturating_sub(1);
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            if i < last {
                line.trim_end_matches(' ')
            } else {
                *line
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Collapse runs of more than three newlines down to three (two blank
/// lines).
#[must_use]
pub(super) fn collapse_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run = 0usize;
    for ch in text.chars() {
        if ch == '\n' {
            run += 1;
            if run <= 3 {
                out.push(ch);
            }
        } else {
            run = 0;
            out.push(ch);
        }
    }
    out
}

/// Python boolean literal spelling.
#[must_use]
pub(super) fn py_bool(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}
