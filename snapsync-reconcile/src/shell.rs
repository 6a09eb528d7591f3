//! POSIX shell quoting for emitted command lines.

/// Quote `arg` so a POSIX shell reads it back as a single word.
///
/// Words made only of `[A-Za-z0-9@%+=:,./_-]` are returned as-is. Everything
/// else is wrapped in single quotes, with embedded `'` spelled `'"'"'`.
pub fn quote(arg: &str) -> String {
    if arg.is_empty() {
        return "''".to_owned();
    }
    if arg.chars().all(is_safe) {
        return arg.to_owned();
    }
    format!("'{}'", arg.replace('\'', "'\"'\"'"))
}

/// Quote every word of `argv` and join them with single spaces.
pub fn join<I, S>(argv: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    argv.into_iter()
        .map(|arg| quote(arg.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || "@%+=:,./_-".contains(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_words_pass_through() {
        assert_eq!(quote("../snapshot/doc/index.html"), "../snapshot/doc/index.html");
        assert_eq!(quote("--depth=empty"), "--depth=empty");
    }

    #[test]
    fn spaces_and_metacharacters_are_single_quoted() {
        assert_eq!(quote("my file"), "'my file'");
        assert_eq!(quote("$HOME"), "'$HOME'");
        assert_eq!(quote("a;rm -rf /"), "'a;rm -rf /'");
    }

    #[test]
    fn embedded_single_quote_is_escaped() {
        assert_eq!(quote("it's"), "'it'\"'\"'s'");
    }

    #[test]
    fn empty_argument_stays_a_word() {
        assert_eq!(quote(""), "''");
        assert_eq!(join(["svn", "commit", "-m", ""]), "svn commit -m ''");
    }
}
