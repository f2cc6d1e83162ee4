//! Linear rendering of LaTeX-like source
//!
//! Turns an expression into the characters a student would write on one
//! line: `\frac{a}{b}` becomes `a/b`, `x^2` becomes `x²`, and symbol commands
//! become their Unicode symbol.

use std::iter::Peekable;
use std::str::Chars;

/// Commands that only wrap or space their arguments
const TRANSPARENT: &[&str] = &[
    "left", "right", "text", "mathrm", "mathbf", "mathit", "operatorname", "displaystyle",
    "limits", "big", "Big",
];

const SYMBOLS: &[(&str, &str)] = &[
    ("alpha", "α"),
    ("beta", "β"),
    ("gamma", "γ"),
    ("delta", "δ"),
    ("Delta", "Δ"),
    ("epsilon", "ε"),
    ("theta", "θ"),
    ("lambda", "λ"),
    ("mu", "μ"),
    ("pi", "π"),
    ("sigma", "σ"),
    ("Sigma", "Σ"),
    ("omega", "ω"),
    ("Omega", "Ω"),
    ("phi", "φ"),
    ("times", "×"),
    ("cdot", "·"),
    ("div", "÷"),
    ("pm", "±"),
    ("leq", "≤"),
    ("le", "≤"),
    ("geq", "≥"),
    ("ge", "≥"),
    ("neq", "≠"),
    ("ne", "≠"),
    ("approx", "≈"),
    ("infty", "∞"),
    ("sum", "Σ"),
    ("int", "∫"),
    ("partial", "∂"),
    ("rightarrow", "→"),
    ("to", "→"),
    ("Rightarrow", "⇒"),
    ("degree", "°"),
    ("circ", "°"),
    ("quad", " "),
    ("qquad", "  "),
];

const SUPERSCRIPTS: &[(char, char)] = &[
    ('0', '⁰'),
    ('1', '¹'),
    ('2', '²'),
    ('3', '³'),
    ('4', '⁴'),
    ('5', '⁵'),
    ('6', '⁶'),
    ('7', '⁷'),
    ('8', '⁸'),
    ('9', '⁹'),
    ('+', '⁺'),
    ('-', '⁻'),
    ('n', 'ⁿ'),
];

const SUBSCRIPTS: &[(char, char)] = &[
    ('0', '₀'),
    ('1', '₁'),
    ('2', '₂'),
    ('3', '₃'),
    ('4', '₄'),
    ('5', '₅'),
    ('6', '₆'),
    ('7', '₇'),
    ('8', '₈'),
    ('9', '₉'),
];

/// The expression as one line of handwritten characters
pub fn linear_text(expr: &str) -> String {
    let mut chars = expr.chars().peekable();
    let mut out = String::new();
    read_until_close(&mut chars, &mut out);
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Read up to the `}` closing the current group, or the end of input
fn read_until_close(chars: &mut Peekable<Chars<'_>>, out: &mut String) {
    while let Some(ch) = chars.next() {
        match ch {
            '}' => return,
            '{' => read_until_close(chars, out),
            '\\' => read_command(chars, out),
            '^' => script(read_argument(chars), SUPERSCRIPTS, '^', out),
            '_' => script(read_argument(chars), SUBSCRIPTS, '_', out),
            c => out.push(c),
        }
    }
}

fn read_command(chars: &mut Peekable<Chars<'_>>, out: &mut String) {
    let mut name = String::new();
    while let Some(&next) = chars.peek() {
        if !next.is_ascii_alphabetic() {
            break;
        }
        name.push(next);
        chars.next();
    }

    if name.is_empty() {
        // Escaped symbol; spacing escapes become a space
        match chars.next() {
            Some(',' | ';' | ':' | ' ') => out.push(' '),
            Some('!') | None => {}
            Some(c) => out.push(c),
        }
        return;
    }

    if name.ends_with("frac") {
        let numerator = read_argument(chars);
        let denominator = read_argument(chars);
        out.push_str(&grouped(&numerator));
        out.push('/');
        out.push_str(&grouped(&denominator));
    } else if name == "sqrt" {
        out.push('√');
        out.push_str(&grouped(&read_argument(chars)));
    } else if let Some((_, symbol)) = SYMBOLS.iter().find(|(n, _)| *n == name) {
        out.push_str(symbol);
    } else if !TRANSPARENT.contains(&name.as_str()) {
        // Operator names such as \sin and \log are written out
        out.push_str(&name);
    }
}

/// One argument: a braced group or a single character
fn read_argument(chars: &mut Peekable<Chars<'_>>) -> String {
    while chars.next_if(|c| c.is_whitespace()).is_some() {}
    let mut arg = String::new();
    match chars.next() {
        Some('{') => read_until_close(chars, &mut arg),
        Some('\\') => read_command(chars, &mut arg),
        Some(c) => arg.push(c),
        None => {}
    }
    arg
}

/// Wrap multi-character arguments in parentheses
fn grouped(arg: &str) -> String {
    if arg.chars().count() > 1 {
        format!("({})", arg)
    } else {
        arg.to_string()
    }
}

/// Raised or lowered characters when every one has a Unicode form
fn script(arg: String, table: &[(char, char)], marker: char, out: &mut String) {
    let mapped: Option<String> = arg
        .chars()
        .map(|c| table.iter().find(|(from, _)| *from == c).map(|(_, to)| *to))
        .collect();
    match mapped {
        Some(text) if !text.is_empty() => out.push_str(&text),
        _ => {
            out.push(marker);
            out.push_str(&grouped(&arg));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_expression_is_unchanged() {
        assert_eq!(linear_text("x + y = 4"), "x + y = 4");
    }

    #[test]
    fn test_scripts() {
        assert_eq!(linear_text("x^2 + y^{10}"), "x² + y¹⁰");
        assert_eq!(linear_text("a_1"), "a₁");
        // No Unicode form for a letter subscript
        assert_eq!(linear_text("v_{max}"), "v_(max)");
    }

    #[test]
    fn test_fractions_and_roots() {
        assert_eq!(linear_text(r"\frac{a+b}{2}"), "(a+b)/2");
        assert_eq!(linear_text(r"\dfrac 1 x"), "1/x");
        assert_eq!(linear_text(r"\sqrt{x^2+1}"), "√(x²+1)");
    }

    #[test]
    fn test_symbols_and_operator_names() {
        assert_eq!(linear_text(r"2 \times \pi r"), "2 × π r");
        assert_eq!(linear_text(r"\sin\theta"), "sinθ");
        assert_eq!(linear_text(r"\left( x \right)"), "( x )");
    }

    #[test]
    fn test_unbalanced_input_does_not_panic() {
        assert_eq!(linear_text("}}x^"), "");
        assert_eq!(linear_text(r"\frac{a"), "a/");
    }
}
