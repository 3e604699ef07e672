//! Inclusion predicates over an answer set.
//!
//! Every template node and every conditional section carries a [`Condition`].
//! Conditions are Tera `if` expressions over answer and fact names:
//!
//! ```text
//! use_stripe
//! api_style in ["drf", "both"]
//! "kubernetes" in deployment_targets and not use_sops
//! frontend == "nextjs" or (cache != "none" and uses_celery)
//! ```
//!
//! Parsing checks the characters and collects the names, then compiles the
//! expression with Tera, which owns the grammar and the evaluation. One
//! rewrite happens on the way in: a bare name becomes `name is enabled`, a
//! tester that is true for `true`, a non-empty list, or text other than `""`
//! and `"none"`. Names missing from the answers are bound to `""`, so they
//! are falsy and unequal to every literal.
//!
//! Tera's `not` negates a single test; a negated group is written with
//! De Morgan (`not a and not b`).

use std::error::Error as _;
use std::fmt;
use std::sync::Arc;

use tera::{Context, Tera, Value};

use crate::domain::{entities::answers::AnswerLookup, error::DomainError};

/// Name of the compiled predicate inside its Tera instance.
const PREDICATE: &str = "when";

/// Tera wraps the expression as `{% if EXPR %}1{% endif %}`.
const WRAP_PREFIX: &str = "{% if ";

/// Parsed inclusion predicate.
#[derive(Debug, Clone, Default)]
pub enum Condition {
    /// Unconditional. The default for nodes without `when`.
    #[default]
    Always,
    When(Predicate),
}

/// A compiled, non-trivial condition.
#[derive(Debug, Clone)]
pub struct Predicate {
    source: String,
    expr: String,
    names: Vec<String>,
    tera: Arc<Tera>,
}

impl Condition {
    /// Parse a condition expression. Blank input means [`Condition::Always`].
    pub fn parse(source: &str) -> Result<Self, DomainError> {
        if source.trim().is_empty() {
            return Ok(Self::Always);
        }

        let tokens = tokenize(source)?;
        let (expr, spans) = rewrite(&tokens);
        let names = collect_names(&tokens);

        let mut tera = engine();
        let wrapped = format!("{WRAP_PREFIX}{expr} %}}1{{% endif %}}");
        tera.add_raw_template(PREDICATE, &wrapped)
            .map_err(|e| {
                let reason = tera_reason(&e);
                DomainError::InvalidCondition {
                    expression: source.to_string(),
                    offset: error_offset(&reason, &spans),
                    reason: short_reason(&reason),
                }
            })?;

        Ok(Self::When(Predicate {
            source: source.to_string(),
            expr,
            names,
            tera: Arc::new(tera),
        }))
    }

    /// Evaluate against answers (and derived facts, when the lookup has them).
    pub fn evaluate<L: AnswerLookup + ?Sized>(&self, answers: &L) -> Result<bool, DomainError> {
        let Self::When(predicate) = self else {
            return Ok(true);
        };
        let context = scope(&predicate.names, answers);
        let rendered = predicate
            .tera
            .render(PREDICATE, &context)
            .map_err(|e| DomainError::InvalidCondition {
                expression: predicate.source.clone(),
                offset: 0,
                reason: short_reason(&tera_reason(&e)),
            })?;
        Ok(!rendered.is_empty())
    }

    /// Every answer or fact name the condition reads, in first-use order.
    pub fn identifiers(&self) -> Vec<&str> {
        match self {
            Self::Always => Vec::new(),
            Self::When(predicate) => predicate.names.iter().map(String::as_str).collect(),
        }
    }

    pub fn is_always(&self) -> bool {
        matches!(self, Self::Always)
    }

    /// The Tera expression this condition compiles to, for embedding in a
    /// larger template.
    pub(crate) fn tera_expr(&self) -> &str {
        match self {
            Self::Always => "true",
            Self::When(predicate) => &predicate.expr,
        }
    }
}

impl PartialEq for Condition {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Always, Self::Always) => true,
            (Self::When(a), Self::When(b)) => a.source.trim() == b.source.trim(),
            _ => false,
        }
    }
}

impl Eq for Condition {}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always => f.write_str("always"),
            Self::When(predicate) => f.write_str(predicate.source.trim()),
        }
    }
}

// ============================================================================
// Tera plumbing shared with sections
// ============================================================================

/// A Tera instance with the `enabled` tester and no autoescaping.
pub(crate) fn engine() -> Tera {
    let mut tera = Tera::default();
    tera.autoescape_on(vec![]);
    tera.register_tester("enabled", is_enabled);
    tera
}

/// Bind `names` from the answers. Missing names become `""`.
pub(crate) fn scope<L: AnswerLookup + ?Sized>(names: &[String], answers: &L) -> Context {
    let mut context = Context::new();
    for name in names {
        match answers.lookup(name) {
            Some(value) => context.insert(name.as_str(), &value),
            None => context.insert(name.as_str(), ""),
        }
    }
    context
}

/// Full error text, including the causes Tera chains underneath.
pub(crate) fn tera_reason(err: &tera::Error) -> String {
    let mut reason = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        reason.push_str(": ");
        reason.push_str(&cause.to_string());
        source = cause.source();
    }
    reason
}

/// The `= expected ...` line of a parse error, or the first line otherwise.
fn short_reason(reason: &str) -> String {
    reason
        .lines()
        .map(str::trim)
        .find_map(|line| line.strip_prefix("= "))
        .or_else(|| reason.lines().next())
        .unwrap_or(reason)
        .to_string()
}

fn is_enabled(value: Option<&Value>, _args: &[Value]) -> tera::Result<bool> {
    Ok(match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => !s.is_empty() && s != "none",
        Some(Value::Array(items)) => !items.is_empty(),
        _ => false,
    })
}

// ============================================================================
// Lexer
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Token<'s> {
    Name(&'s str),
    /// Quoted string, quotes included.
    Str(&'s str),
    /// `and`, `or`, `not`, `in`, `true`, `false`.
    Word(&'s str),
    /// `==`, `!=`, parentheses, brackets, commas.
    Punct(&'s str),
}

impl Token<'_> {
    fn text(&self) -> &str {
        match self {
            Self::Name(s) | Self::Str(s) | Self::Word(s) | Self::Punct(s) => s,
        }
    }
}

const WORDS: &[&str] = &["and", "or", "not", "in", "true", "false"];

/// Names Tera treats specially; they cannot be answer names.
const RESERVED: &[&str] = &["is", "True", "False", "loop", "self", "super"];

fn tokenize(source: &str) -> Result<Vec<(Token<'_>, usize)>, DomainError> {
    let err = |offset: usize, reason: String| DomainError::InvalidCondition {
        expression: source.to_string(),
        offset,
        reason,
    };

    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some(&(offset, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' | ')' | '[' | ']' | ',' => {
                chars.next();
                tokens.push((Token::Punct(&source[offset..offset + 1]), offset));
            }
            '=' | '!' => {
                chars.next();
                match chars.next() {
                    Some((_, '=')) => {
                        tokens.push((Token::Punct(&source[offset..offset + 2]), offset));
                    }
                    _ => return Err(err(offset, format!("expected '{c}='"))),
                }
            }
            '"' | '\'' => {
                chars.next();
                let end = chars.by_ref().find(|&(_, ch)| ch == c).map(|(i, _)| i);
                match end {
                    Some(end) => tokens.push((Token::Str(&source[offset..=end]), offset)),
                    None => return Err(err(offset, "unterminated string".into())),
                }
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut end = offset;
                while let Some(&(i, ch)) = chars.peek() {
                    if ch.is_ascii_alphanumeric() || ch == '_' {
                        end = i + ch.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                let word = &source[offset..end];
                if RESERVED.contains(&word) {
                    return Err(err(offset, format!("'{word}' is reserved")));
                }
                let token = if WORDS.contains(&word) {
                    Token::Word(word)
                } else {
                    Token::Name(word)
                };
                tokens.push((token, offset));
            }
            other => return Err(err(offset, format!("unexpected character '{other}'"))),
        }
    }

    Ok(tokens)
}

/// Whether the name at `index` is tested on its own rather than compared.
fn is_bare(tokens: &[(Token<'_>, usize)], index: usize) -> bool {
    let comparison = |t: Option<&(Token<'_>, usize)>| {
        matches!(
            t.map(|(t, _)| t.text()),
            Some("==") | Some("!=") | Some("in")
        )
    };
    let negated_in = matches!(
        (tokens.get(index + 1), tokens.get(index + 2)),
        (Some((Token::Word("not"), _)), Some((Token::Word("in"), _)))
    );
    let before = index.checked_sub(1).and_then(|i| tokens.get(i));
    !comparison(tokens.get(index + 1)) && !negated_in && !comparison(before)
}

/// Tera source plus, per emitted token, its start in the output and in the source.
fn rewrite(tokens: &[(Token<'_>, usize)]) -> (String, Vec<(usize, usize)>) {
    let mut expr = String::new();
    let mut spans = Vec::with_capacity(tokens.len());
    for (index, (token, offset)) in tokens.iter().enumerate() {
        if !expr.is_empty() {
            expr.push(' ');
        }
        spans.push((expr.len(), *offset));
        expr.push_str(token.text());
        if matches!(token, Token::Name(_)) && is_bare(tokens, index) {
            expr.push_str(" is enabled");
        }
    }
    (expr, spans)
}

fn collect_names(tokens: &[(Token<'_>, usize)]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for (token, _) in tokens {
        if let Token::Name(name) = token {
            if !names.iter().any(|n| n == name) {
                names.push((*name).to_string());
            }
        }
    }
    names
}

/// Map the column of a Tera parse error (`--> 1:COL`) back to the source
/// offset of the token it falls in.
fn error_offset(reason: &str, spans: &[(usize, usize)]) -> usize {
    let column = reason
        .split_once("--> 1:")
        .map(|(_, rest)| rest.chars().take_while(char::is_ascii_digit).collect::<String>())
        .and_then(|digits| digits.parse::<usize>().ok());
    let Some(column) = column else {
        return 0;
    };
    let Some(position) = column.checked_sub(1 + WRAP_PREFIX.len()) else {
        return 0;
    };
    spans
        .iter()
        .rev()
        .find(|(out, _)| *out <= position)
        .map_or(0, |(_, src)| *src)
}
