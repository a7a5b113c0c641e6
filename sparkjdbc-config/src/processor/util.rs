use std::mem;

use serde_yaml::{Mapping, Value};
use sparkjdbc_core::err::{bail, Context, Result};

use super::ConfigStringExpr as X;

/// Recursively walks the configuration nodes and uses the supplied callback
/// to transform any strings found
///
/// Errors name the yaml path of the failing value rather than the value
/// itself, which may be a secret.
pub(crate) fn process_strings(
    node: Value,
    cb: &impl Fn(String) -> Result<Value>,
) -> Result<Value> {
    process_strings_at(node, "", cb)
}

fn process_strings_at(
    node: Value,
    path: &str,
    cb: &impl Fn(String) -> Result<Value>,
) -> Result<Value> {
    Ok(match node {
        Value::String(str) => cb(str).with_context(|| {
            format!(
                "Failed to process config value at {}",
                if path.is_empty() { "<root>" } else { path }
            )
        })?,
        Value::Sequence(seq) => Value::Sequence(
            seq.into_iter()
                .enumerate()
                .map(|(i, n)| process_strings_at(n, &format!("{}[{}]", path, i), cb))
                .collect::<Result<Vec<Value>>>()?,
        ),
        Value::Mapping(map) => Value::Mapping(
            map.into_iter()
                .map(|(k, v)| -> Result<(Value, Value)> {
                    let key_path = match path {
                        "" => yaml_key(&k),
                        _ => format!("{}.{}", path, yaml_key(&k)),
                    };
                    Ok((
                        process_strings_at(k, path, cb)?,
                        process_strings_at(v, &key_path, cb)?,
                    ))
                })
                .collect::<Result<Mapping>>()?,
        ),
        n => n,
    })
}

fn yaml_key(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => "?".into(),
    }
}

/// Parses a config string into an expression AST
pub(crate) fn parse_expression(str: &str) -> Result<X> {
    #[derive(Debug, Clone, Copy)]
    enum State {
        Consume,
        Escaped,
        /// Skips the '{' of a "${"
        Skip,
        /// Following a ':' or a closing '}'
        Break,
    }

    let mut stack = vec![];
    let mut exp = X::Concat(vec![]);

    let chars = str.chars().collect::<Vec<char>>();
    let mut state = State::Consume;

    for (i, c) in chars.iter().copied().enumerate() {
        let next = chars.get(i + 1).copied();

        match (state, c, next) {
            // a backslash only escapes the expression syntax, otherwise it is kept
            (State::Consume, '\\', Some('\\' | '$' | '{' | '}' | ':')) => {
                state = State::Escaped;
            }
            (State::Escaped, c, _) => {
                append_char(&mut exp, c);
                state = State::Consume;
            }
            (State::Consume | State::Break, '$', Some('{')) => {
                stack.push(mem::replace(&mut exp, X::Interpolation(vec![])));
                state = State::Skip;
            }
            (State::Skip, _, _) => {
                state = State::Consume;
            }
            (State::Consume | State::Break, '}', _) if matches!(exp, X::Interpolation(_)) => {
                let outer = stack
                    .pop()
                    .context("Unbalanced ${...} expression stack")?;
                exp = append_node(outer, exp);
                state = match next {
                    Some(':') => State::Consume,
                    _ => State::Break,
                };
            }
            // a lone '}' outside of ${...} is a literal, eg within json strings
            (State::Consume | State::Break, '}', _) => {
                append_char(&mut exp, c);
                state = State::Consume;
            }
            (State::Consume, ':', _) if matches!(exp, X::Interpolation(_)) => {
                state = State::Break;
            }
            (State::Consume, c, _) => {
                append_char(&mut exp, c);
            }
            (State::Break, c, _) => {
                match exp {
                    X::Interpolation(ref mut parts) if c == ':' => {
                        parts.push(X::Constant(String::new()));
                    }
                    X::Interpolation(ref mut parts) | X::Concat(ref mut parts) => {
                        parts.push(X::Constant(c.to_string()));
                    }
                    X::Constant(ref mut s) => s.push(c),
                }

                if c != ':' || !matches!(exp, X::Interpolation(_)) {
                    state = State::Consume;
                }
            }
        }
    }

    if !stack.is_empty() {
        bail!("Failed to parse expression, found unclosed ${{...}} (use \\${{ for a literal)")
    }

    Ok(simplify_node(exp).unwrap_or_else(|| X::Constant(String::new())))
}

/// Appends the supplied node to exp
fn append_node(exp: X, node: X) -> X {
    match exp {
        c @ X::Constant(_) => X::Concat(vec![c, node]),
        X::Concat(mut parts) => {
            parts.push(node);
            X::Concat(parts)
        }
        X::Interpolation(mut parts) => {
            parts.push(node);
            X::Interpolation(parts)
        }
    }
}

/// Appends the supplied char to the last constant in exp
fn append_char(exp: &mut X, c: char) {
    match exp {
        X::Constant(ref mut str) => str.push(c),
        X::Interpolation(ref mut parts) | X::Concat(ref mut parts) => match parts.last_mut() {
            Some(p @ X::Constant(_)) => append_char(p, c),
            _ => parts.push(X::Constant(c.to_string())),
        },
    }
}

/// Removes redundant concat nodes
fn simplify_node(exp: X) -> Option<X> {
    match exp {
        X::Concat(parts) if parts.is_empty() => None,
        X::Concat(mut parts) if parts.len() == 1 => parts.pop().and_then(simplify_node),
        X::Concat(parts) => Some(X::Concat(parts.into_iter().filter_map(simplify_node).collect())),
        X::Interpolation(parts) => Some(X::Interpolation(
            parts
                .into_iter()
                .map(|n| simplify_node(n).unwrap_or_else(|| X::Constant(String::new())))
                .collect(),
        )),
        _ => Some(exp),
    }
}

/// Walks the expression bottom-up, passing each interpolation node to the
/// callback once its inner parts have been processed
pub(crate) fn process_expression(exp: X, cb: &impl Fn(X) -> Result<X>) -> Result<X> {
    let process_all = |parts: Vec<X>| -> Result<Vec<X>> {
        parts
            .into_iter()
            .map(|p| process_expression(p, cb))
            .collect()
    };

    Ok(match exp {
        X::Constant(_) => exp,
        X::Concat(parts) => X::Concat(process_all(parts)?),
        X::Interpolation(parts) => cb(X::Interpolation(process_all(parts)?))?,
    })
}

/// Returns the parts of the interpolation if it is fully resolved to
/// constants and starts with the supplied prefix
pub(crate) fn match_interpolation(exp: &X, prefix: &[&str]) -> Option<Vec<String>> {
    let parts = match exp {
        X::Interpolation(parts) => parts,
        _ => return None,
    };

    let parts = parts
        .iter()
        .map(|p| match p {
            X::Constant(s) => Some(s.clone()),
            _ => None,
        })
        .collect::<Option<Vec<String>>>()?;

    if parts.len() < prefix.len() || parts.iter().zip(prefix.iter()).any(|(a, b)| a != b) {
        return None;
    }

    Some(parts)
}

/// Renders the expression back into its string form
pub(crate) fn expression_to_string(exp: &X) -> String {
    match exp {
        X::Constant(s) => s.clone(),
        X::Concat(parts) => parts.iter().map(expression_to_string).collect(),
        X::Interpolation(parts) => format!(
            "${{{}}}",
            parts
                .iter()
                .map(expression_to_string)
                .collect::<Vec<_>>()
                .join(":")
        ),
    }
}
