use std::fmt::{self, Debug, Display};

const MASK: &str = "******";

/// Formats a command line for logging with any secrets masked
///
/// The value following a `-password` flag is masked, as is the value
/// of any `key=value` token whose key mentions a password or secret.
#[derive(Clone, PartialEq, Eq)]
pub struct MaskedArgs<'a, T: AsRef<str>> {
    args: &'a [T],
}

impl<'a, T: AsRef<str>> MaskedArgs<'a, T> {
    pub fn new(args: &'a [T]) -> Self {
        Self { args }
    }

    /// Returns the args with secrets masked
    pub fn to_vec(&self) -> Vec<String> {
        let mut masked = Vec::with_capacity(self.args.len());
        let mut mask_next = false;

        for arg in self.args.iter().map(|a| a.as_ref()) {
            if mask_next {
                masked.push(MASK.to_string());
                mask_next = false;
                continue;
            }

            mask_next = is_secret_flag(arg);
            masked.push(mask_key_value(arg));
        }

        masked
    }
}

fn is_secret_flag(arg: &str) -> bool {
    matches!(arg, "-password" | "--password")
}

fn is_secret_key(key: &str) -> bool {
    let key = key.to_lowercase();
    key.contains("password") || key.contains("secret")
}

fn mask_key_value(arg: &str) -> String {
    match arg.split_once('=') {
        Some((key, _)) if is_secret_key(key) => format!("{}={}", key, MASK),
        _ => arg.to_string(),
    }
}

impl<'a, T: AsRef<str>> Debug for MaskedArgs<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_vec())
    }
}

impl<'a, T: AsRef<str>> Display for MaskedArgs<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_vec().join(" "))
    }
}
