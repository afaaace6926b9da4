//! Textual normalization of typeset math markup.
//!
//! Students write the same answer in many different ways: `\left(x\right)` and `(x)`,
//! `\log_2 8` and `\log_{2}(8)`, `\leq` and `\le`. Before anything is parsed, [`normalize`]
//! rewrites the raw input into one canonical spelling, so that the parser only needs to
//! understand a single, unambiguous grammar.
//!
//! The rewrites are applied in a fixed order, each operating on the output of the previous one:
//!
//! 1. [`strip_sizing`]: drop `\left`, `\right`, `\big`, ... which carry no meaning.
//! 2. [`transliterate`]: spell symbols typed as text (`<=`, `≤`, `∞`, `\mathbb{R}`) as commands.
//! 3. [`log_base`]: `\log_2x` becomes `\log_{2}(x)`.
//! 4. [`subscripts`]: `x_12` becomes `x_{1}2`, braced subscripts are untouched.
//! 5. [`synonyms`]: `\leq`, `\leqslant` become `\le`, `\frac12` becomes `\frac{1}{2}`, and so on.
//!
//! Replacements never glue a command name to a following letter (`\in\mathbb{R}` becomes
//! `\in R`, not `\inR`).
//!
//! Normalization never fails and is idempotent: normalizing twice gives the same result as
//! normalizing once.

use tracing::trace;

/// Sizing decorators that are dropped entirely.
const SIZING: &[&str] = &[
    "left", "right", "middle",
    "big", "Big", "bigg", "Bigg",
    "bigl", "Bigl", "biggl", "Biggl",
    "bigr", "Bigr", "biggr", "Biggr",
    "bigm", "Bigm", "biggm", "Biggm",
];

/// Normalizes the given markup into canonical markup.
///
/// ```
/// use mathgrade_parser::normalize::normalize;
///
/// assert_eq!(normalize(r"\left(x_12\right) \leq \log_28"), r"(x_{1}2) \le \log_{2}(8)");
/// ```
pub fn normalize(input: &str) -> String {
    let output = synonyms(&subscripts(&log_base(&transliterate(&strip_sizing(input)))))
        .trim()
        .to_string();
    trace!(target: "mathgrade::normalize", input, output = %output, "normalized markup");
    output
}

/// Returns the first character at the given byte index, if any.
fn char_at(input: &str, idx: usize) -> Option<char> {
    input.get(idx..)?.chars().next()
}

/// If a command (`\` followed by letters) starts at the given byte index, returns its name and
/// the byte index just past it.
fn command_at(input: &str, idx: usize) -> Option<(&str, usize)> {
    let rest = input.get(idx..)?.strip_prefix('\\')?;
    let len = rest.bytes().take_while(u8::is_ascii_alphabetic).count();
    if len == 0 {
        return None;
    }
    Some((&rest[..len], idx + 1 + len))
}

/// If a balanced `{...}` group starts at the given byte index, returns the byte index just past
/// its closing brace. Escaped braces (`\{` and `\}`) do not count towards the balance.
fn group_end(input: &str, idx: usize) -> Option<usize> {
    let bytes = input.as_bytes();
    if bytes.get(idx) != Some(&b'{') {
        return None;
    }

    let mut depth = 0usize;
    let mut i = idx;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 1,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            },
            _ => (),
        }
        i += 1;
    }

    None
}

/// Drops sizing decorators around brackets, such as `\left(` and `\bigr]`.
///
/// The null delimiters `\left.` and `\right.` are dropped entirely.
pub fn strip_sizing(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut idx = 0;
    while let Some(c) = char_at(input, idx) {
        if c == '\\' {
            if let Some((name, end)) = command_at(input, idx) {
                if SIZING.contains(&name) {
                    idx = end;
                    if char_at(input, idx) == Some('.') {
                        idx += 1;
                    }
                    separate_command(&mut output, char_at(input, idx));
                } else {
                    output.push_str(&input[idx..end]);
                    idx = end;
                }
                continue;
            }

            // escaped character such as `\{` or `\\`, copied as a unit
            output.push('\\');
            idx += 1;
            if let Some(next) = char_at(input, idx) {
                output.push(next);
                idx += next.len_utf8();
            }
            continue;
        }

        output.push(c);
        idx += c.len_utf8();
    }
    output
}

/// Returns the byte index just past the log operand starting at `idx`.
///
/// The operand is a run of letters and digits, which may carry subscripts (`x_1` or `x_{12}`).
fn operand_end(input: &str, mut idx: usize) -> usize {
    let bytes = input.as_bytes();
    loop {
        let start = idx;
        while bytes.get(idx).map_or(false, u8::is_ascii_alphanumeric) {
            idx += 1;
        }

        if idx == start || bytes.get(idx) != Some(&b'_') {
            return idx;
        }

        // subscript attached to the operand
        match bytes.get(idx + 1) {
            Some(b) if b.is_ascii_alphanumeric() => idx += 2,
            Some(b'{') => match group_end(input, idx + 1) {
                Some(end) => idx = end,
                None => return idx,
            },
            _ => return idx,
        }
    }
}

/// Rewrites the logarithm base shorthand into an explicit braced base.
///
/// - `\log_2(x)` becomes `\log_{2}(x)`, and `\log_2^2 x` becomes `\log_{2}^2 x`.
/// - `\log_2x` becomes `\log_{2}(x)`.
pub fn log_base(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut idx = 0;
    while let Some(c) = char_at(input, idx) {
        let Some((name, end)) = command_at(input, idx) else {
            output.push(c);
            idx += c.len_utf8();
            continue;
        };

        output.push_str(&input[idx..end]);
        idx = end;

        let bytes = input.as_bytes();
        let base = bytes.get(idx + 1).copied();
        if name != "log" || bytes.get(idx) != Some(&b'_') || !base.map_or(false, |b| b.is_ascii_alphanumeric()) {
            continue;
        }

        let base = char::from(base.unwrap_or_default());
        let after_base = idx + 2;
        match bytes.get(after_base) {
            Some(b'(') | Some(b'^') => {
                output.push_str(&format!("_{{{}}}", base));
                idx = after_base;
            },
            Some(b) if b.is_ascii_alphanumeric() => {
                let end = operand_end(input, after_base);
                output.push_str(&format!("_{{{}}}({})", base, &input[after_base..end]));
                idx = end;
            },
            _ => (),
        }
    }
    output
}

/// Groups a bare subscript so that only its first character is subscripted.
///
/// `x_ab` becomes `x_{a}b`, meaning `x` sub `a`, times `b`. A subscript that is already braced,
/// such as `x_{ab}`, is left untouched.
pub fn subscripts(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut output = String::with_capacity(input.len());
    let mut idx = 0;
    while let Some(c) = char_at(input, idx) {
        let is_match = c.is_ascii_alphanumeric()
            && bytes.get(idx + 1) == Some(&b'_')
            && bytes.get(idx + 2).map_or(false, u8::is_ascii_alphanumeric)
            && bytes.get(idx + 3).map_or(false, u8::is_ascii_alphanumeric);

        if is_match {
            output.push(c);
            output.push_str(&format!("_{{{}}}", char::from(bytes[idx + 2])));
            idx += 3;
        } else {
            output.push(c);
            idx += c.len_utf8();
        }
    }
    output
}

/// Returns the canonical spelling of a command, if it has a synonym.
fn command_synonym(name: &str) -> Option<&'static str> {
    Some(match name {
        "leq" | "leqslant" | "le" => "\\le",
        "geq" | "geqslant" | "ge" => "\\ge",
        "neq" | "ne" => "\\ne",
        "lbrack" => "[",
        "rbrack" => "]",
        "lbrace" => "\\{",
        "rbrace" => "\\}",
        "vert" | "lvert" | "rvert" | "mid" => "|",
        "land" | "wedge" => "\\&",
        "varnothing" => "\\emptyset",
        "infin" => "\\infty",
        _ => return None,
    })
}

/// Returns the canonical spelling of a single non-ASCII character, if it has one.
fn char_synonym(c: char) -> Option<&'static str> {
    Some(match c {
        '≤' => "\\le",
        '≥' => "\\ge",
        '≠' => "\\ne",
        '∞' => "\\infty",
        '∪' => "\\cup",
        '∩' => "\\cap",
        '∅' => "\\emptyset",
        'π' => "\\pi",
        '·' | '⋅' => "\\cdot",
        '×' => "\\times",
        '−' => "-",
        _ => return None,
    })
}

/// Returns true if the output currently ends in a command name, such as `\in`.
fn ends_in_command(output: &str) -> bool {
    let letters = output.bytes().rev().take_while(u8::is_ascii_alphabetic).count();
    letters > 0 && output[..output.len() - letters].ends_with('\\')
}

/// Inserts a space if the output ends in a command name and the next character is a letter, so
/// that the two are never read as one longer command.
fn separate_command(output: &mut String, next: Option<char>) {
    if ends_in_command(output) && next.map_or(false, |c| c.is_ascii_alphabetic()) {
        output.push(' ');
    }
}

/// Pushes a replacement to the output, keeping command names separated on both sides.
fn push_replacement(output: &mut String, replacement: &str, next: Option<char>) {
    separate_command(output, replacement.chars().next());
    output.push_str(replacement);
    separate_command(output, next);
}

/// Rewrites the arguments of `\frac` and `\sqrt`, wrapping single-character arguments in braces
/// (`\frac12` becomes `\frac{1}{2}`). Returns the byte index past the last rewritten argument.
fn braced_args(input: &str, mut idx: usize, count: usize, output: &mut String) -> usize {
    for _ in 0..count {
        let Some(c) = char_at(input, idx) else {
            break;
        };

        if c.is_ascii_alphanumeric() {
            output.push_str(&format!("{{{}}}", c));
            idx += 1;
        } else if let Some(end) = group_end(input, idx) {
            output.push('{');
            output.push_str(&synonyms(&input[idx + 1..end - 1]));
            output.push('}');
            idx = end;
        } else {
            break;
        }
    }
    idx
}

/// Spells symbols typed as plain text or unicode as their canonical commands.
///
/// `<=`, `≤`, `\lt=`, and `\not=` become `\le`-style commands, while `\lt` and `\gt` become `<`
/// and `>`. `∞` becomes `\infty`, and blackboard domain names such as `\mathbb{Z}` become the
/// bare letters `Z`.
pub fn transliterate(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut idx = 0;
    while let Some(c) = char_at(input, idx) {
        if let Some((name, end)) = command_at(input, idx) {
            idx = end;
            let group = group_end(input, idx)
                .filter(|&group| input[idx + 1..group - 1].trim().bytes().all(|b| b.is_ascii_alphabetic() || b == b'+' || b == b'-'));
            match (name, group) {
                ("not", _) if char_at(input, idx) == Some('=') => {
                    idx += 1;
                    push_replacement(&mut output, "\\ne", char_at(input, idx));
                },
                // `\lt=` would otherwise read as the text `<=`
                ("lt" | "gt", _) => {
                    let replacement = match (name, char_at(input, idx)) {
                        ("lt", Some('=')) => "\\le",
                        (_, Some('=')) => "\\ge",
                        ("lt", _) => "<",
                        _ => ">",
                    };
                    if replacement.starts_with('\\') {
                        idx += 1;
                    }
                    push_replacement(&mut output, replacement, char_at(input, idx));
                },
                ("mathbb" | "mathbf", Some(group)) => {
                    push_replacement(&mut output, input[idx + 1..group - 1].trim(), char_at(input, group));
                    idx = group;
                },
                _ => output.push_str(&format!("\\{}", name)),
            }
            continue;
        }

        if c == '\\' {
            // escaped character such as `\{` or `\\`, copied as a unit
            output.push('\\');
            idx += 1;
            if let Some(next) = char_at(input, idx) {
                output.push(next);
                idx += next.len_utf8();
            }
            continue;
        }

        let (replacement, len) = match (input.get(idx..idx + 2), char_synonym(c)) {
            (Some("<="), _) => (Some("\\le"), 2),
            (Some(">="), _) => (Some("\\ge"), 2),
            (Some("!="), _) => (Some("\\ne"), 2),
            (_, Some(replacement)) => (Some(replacement), c.len_utf8()),
            _ => (None, c.len_utf8()),
        };

        match replacement {
            Some(replacement) => push_replacement(&mut output, replacement, char_at(input, idx + len)),
            None => output.push(c),
        }
        idx += len;
    }
    output
}

/// Rewrites inequality, negation, and bracket command synonyms into one canonical spelling, and
/// braces the shorthand arguments of `\frac` and `\sqrt`.
pub fn synonyms(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut idx = 0;
    while let Some(c) = char_at(input, idx) {
        if let Some((name, end)) = command_at(input, idx) {
            idx = end;
            match name {
                "frac" | "dfrac" | "tfrac" | "cfrac" => {
                    output.push_str("\\frac");
                    idx = braced_args(input, idx, 2, &mut output);
                },
                "sqrt" => {
                    output.push_str("\\sqrt");
                    if char_at(input, idx) == Some('[') {
                        if let Some(close) = input[idx..].find(']') {
                            output.push('[');
                            output.push_str(&synonyms(&input[idx + 1..idx + close]));
                            output.push(']');
                            idx += close + 1;
                        }
                    }
                    idx = braced_args(input, idx, 1, &mut output);
                },
                _ => match command_synonym(name) {
                    Some(replacement) => push_replacement(&mut output, replacement, char_at(input, idx)),
                    None => output.push_str(&format!("\\{}", name)),
                },
            }
            continue;
        }

        if c == '\\' {
            output.push('\\');
            idx += 1;
            if let Some(next) = char_at(input, idx) {
                output.push(next);
                idx += next.len_utf8();
            }
            continue;
        }

        output.push(c);
        idx += c.len_utf8();
    }
    output
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn sizing_decorators() {
        assert_eq!(strip_sizing(r"\left(x+1\right)"), "(x+1)");
        assert_eq!(strip_sizing(r"\left\{1,2\right\}"), r"\{1,2\}");
        assert_eq!(strip_sizing(r"\bigl[ x \bigr]"), "[ x ]");
        assert_eq!(strip_sizing(r"\left.\frac{1}{2}\right|"), r"\frac{1}{2}|");
    }

    #[test]
    fn sizing_keeps_longer_commands() {
        assert_eq!(strip_sizing(r"x \leftarrow y \rightarrow z"), r"x \leftarrow y \rightarrow z");
    }

    #[test]
    fn log_base_parenthesized() {
        assert_eq!(log_base(r"\log_2(x)"), r"\log_{2}(x)");
        assert_eq!(log_base(r"\log_2^2 x"), r"\log_{2}^2 x");
    }

    #[test]
    fn log_base_bare_operand() {
        assert_eq!(log_base(r"\log_28"), r"\log_{2}(8)");
        assert_eq!(log_base(r"\log_ax+1"), r"\log_{a}(x)+1");
        assert_eq!(log_base(r"\log_2x_1"), r"\log_{2}(x_1)");
        assert_eq!(log_base(r"\log_2x_{12}y"), r"\log_{2}(x_{12}y)");
    }

    #[test]
    fn log_base_untouched() {
        assert_eq!(log_base(r"\log_{2}(8)"), r"\log_{2}(8)");
        assert_eq!(log_base(r"\log_2 x"), r"\log_2 x");
        assert_eq!(log_base(r"\log 100"), r"\log 100");
    }

    #[test]
    fn subscript_grouping() {
        assert_eq!(subscripts("x_12"), "x_{1}2");
        assert_eq!(subscripts("x_ab"), "x_{a}b");
        assert_eq!(subscripts("x_1y_2z"), "x_{1}y_{2}z");
        assert_eq!(subscripts("x_1"), "x_1");
        assert_eq!(subscripts("x_{12}"), "x_{12}");
    }

    #[test]
    fn text_symbols() {
        assert_eq!(transliterate(r"x \not= 2"), r"x \ne 2");
        assert_eq!(transliterate("x<=2"), r"x\le2");
        assert_eq!(transliterate("x≤y"), r"x\le y");
        assert_eq!(transliterate("a != b"), r"a \ne b");
        assert_eq!(transliterate("[0,∞)∪{π}"), r"[0,\infty)\cup{\pi}");
        assert_eq!(transliterate(r"\mathbb{R}"), "R");
        assert_eq!(transliterate(r"x\in\mathbb{Z}"), r"x\in Z");
        assert_eq!(transliterate(r"x\lt=2"), r"x\le2");
        assert_eq!(transliterate(r"x\gt 2"), "x> 2");
    }

    #[test]
    fn inequality_commands_take_subscripts() {
        assert_eq!(normalize(r"\gt=_ab"), r"\ge_{a}b");
    }

    #[test]
    fn inequality_synonyms() {
        assert_eq!(synonyms(r"x \leq 2"), r"x \le 2");
        assert_eq!(synonyms(r"x\geqslant2"), r"x\ge2");
        assert_eq!(synonyms(r"x\neq y"), r"x\ne y");
    }

    #[test]
    fn bracket_synonyms() {
        assert_eq!(synonyms(r"\lbrack 0,1 \rbrack"), "[ 0,1 ]");
        assert_eq!(synonyms(r"\lvert x \rvert"), "| x |");
        assert_eq!(synonyms(r"\lbrace 1 \rbrace"), r"\{ 1 \}");
    }

    #[test]
    fn fraction_shorthand() {
        assert_eq!(synonyms(r"\frac12"), r"\frac{1}{2}");
        assert_eq!(synonyms(r"\dfrac{x}{2}"), r"\frac{x}{2}");
        assert_eq!(synonyms(r"\frac1{x\leq 2}"), r"\frac{1}{x\le 2}");
        assert_eq!(synonyms(r"\sqrt2x"), r"\sqrt{2}x");
        assert_eq!(synonyms(r"\sqrt[3]8"), r"\sqrt[3]{8}");
    }

    #[test]
    fn full_pipeline() {
        assert_eq!(normalize(r" \left( x_12 \right) "), "( x_{1}2 )");
        assert_eq!(normalize(r"\log_2x \geq 3"), r"\log_{2}(x) \ge 3");
        assert_eq!(normalize(r"\left\{ x \mid x \geq 0 \mid \mathbb{R} \right\}"), r"\{ x | x \ge 0 | R \}");
    }

    #[test]
    fn idempotence() {
        let samples = [
            r"\left(x_12\right) \leq \log_28",
            r"\log_2x_12 + \log_{10}(y)",
            r"\frac12 + \sqrt[3]8 \cdot x_ab",
            r"[0,2]\cup[5,\infty)",
            r"\left\{ x \mid x\geqslant 0 \& x <= 5 \mid \mathbb{Z} \right\}",
            "x≤y≠z ∪ ∅",
            r"\dfrac{1}{\frac12}",
            r"\left.\frac{d}{dx}\right|_{x=0}",
            r"\not=\lt\gt\vert",
            r"\lt=\in\mathbb{R}_12",
            r"\gt=_ab",
            r"{\gt=_a\mathbb{R}!",
            r"\lt_a + \gt x_b",
            r"\lef\leftt",
            "π_12",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "input: {}", sample);
        }
    }
}
