use crate::openapi::operations::Verb;

/// Words that cannot be used as a bare binding name in generated code.
const RESERVED_WORDS: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete",
    "do", "else", "enum", "export", "extends", "false", "finally", "for", "function", "if",
    "import", "in", "instanceof", "new", "null", "return", "super", "switch", "this", "throw",
    "true", "try", "typeof", "var", "void", "while", "with", "let", "static", "yield", "await",
];

/// Derive the generated name of an operation.
///
/// A usable `operationId` wins. Otherwise the name is built from the verb and
/// path, with the first path parameter read as `by <param>` and the second as
/// `and <param>` (`GET /pet/{petId}` becomes `getPetByPetId`).
pub fn operation_name(verb: Verb, path: &str, operation_id: Option<&str>) -> String {
    if let Some(id) = operation_id {
        let normalized: String = id
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '_' || c.is_whitespace() {
                    c
                } else {
                    ' '
                }
            })
            .collect();
        let camel = camel_case(&normalized);
        let trimmed = camel.trim_start_matches(|c: char| !(c.is_ascii_alphabetic() || c == '_' || c == '$'));
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let with_first = replace_param(path, "by");
    let described = replace_param(&with_first, "and");
    to_identifier(&format!("{} {}", verb.as_str(), described))
}

/// Replace the first `{param}` occurrence with `<word> param`.
fn replace_param(path: &str, word: &str) -> String {
    let Some(open) = path.find('{') else {
        return path.to_string();
    };
    let Some(close) = path[open..].find('}').map(|i| open + i) else {
        return path.to_string();
    };
    format!(
        "{}{} {}{}",
        &path[..open],
        word,
        &path[open + 1..close],
        &path[close + 1..]
    )
}

/// lowerCamelCase a phrase, prefixing `$` when the result is not a legal identifier.
pub fn to_identifier(s: &str) -> String {
    let camel = camel_case(s);
    if is_identifier(&camel) {
        camel
    } else {
        format!("${camel}")
    }
}

/// Whether `s` can be emitted as a bare identifier.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_alphabetic() || first == '_' || first == '$') {
        return false;
    }
    if !chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$') {
        return false;
    }
    !RESERVED_WORDS.contains(&s)
}

/// Split text into words on separators, case changes and letter/digit boundaries.
///
/// `getHTTPResponse2xx` splits into `get`, `HTTP`, `Response`, `2`, `xx`.
pub fn words(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if let Some(prev) = current.chars().last() {
            let next = chars.get(i + 1).copied();
            let boundary = (prev.is_lowercase() && c.is_uppercase())
                || (prev.is_ascii_digit() != c.is_ascii_digit())
                || (prev.is_uppercase()
                    && c.is_uppercase()
                    && next.is_some_and(|n| n.is_lowercase()));
            if boundary {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// `find pets-by_status` -> `findPetsByStatus`
pub fn camel_case(s: &str) -> String {
    words(s)
        .iter()
        .enumerate()
        .map(|(i, w)| {
            let lower = w.to_lowercase();
            if i == 0 {
                lower
            } else {
                upper_first(&lower)
            }
        })
        .collect()
}

/// `findPetsByStatus` -> `FindPetsByStatus`
pub fn pascal_case(s: &str) -> String {
    upper_first(&camel_case(s))
}

pub fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
