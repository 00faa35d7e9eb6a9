//! Parse LLM output into verdicts

use patrol_domain::Verdict;
use tracing::debug;

/// Parse a classification response
///
/// Accepts the three contract forms (`OK`, `pass=`, `user=...,pass=`),
/// `password=` in place of `pass=`, surrounding whitespace, markdown code
/// fences and explanatory lines before the answer. Anything else becomes
/// [`Verdict::Unparsed`].
///
/// ```
/// use patrol_classifier::parse_verdict;
/// use patrol_domain::Verdict;
///
/// assert_eq!(parse_verdict("OK"), Verdict::Clean);
/// assert_eq!(
///     parse_verdict("user=admin,pass=hunter2"),
///     Verdict::Credential { user: "admin".into(), password: "hunter2".into() }
/// );
/// ```
pub fn parse_verdict(response: &str) -> Verdict {
    let verdict = response
        .lines()
        .map(clean_line)
        .filter(|line| !line.is_empty() && !line.starts_with("```"))
        .find_map(parse_line);

    match verdict {
        Some(verdict) => verdict,
        None => {
            debug!("Unparseable classifier response: {:?}", response);
            Verdict::Unparsed {
                raw: response.trim().to_string(),
            }
        }
    }
}

fn clean_line(line: &str) -> &str {
    line.trim().trim_matches('`').trim()
}

fn parse_line(line: &str) -> Option<Verdict> {
    let ok = line.trim_end_matches('.');
    if ok.eq_ignore_ascii_case("ok") {
        return Some(Verdict::Clean);
    }

    if let Some(rest) = strip_key(line, &["user="]) {
        let (user, password) = split_password(rest)?;
        return Some(Verdict::Credential {
            user: user.trim().to_string(),
            password: password.to_string(),
        });
    }

    strip_key(line, &["pass=", "password="]).map(|password| Verdict::Password {
        password: password.to_string(),
    })
}

/// Strip the first matching key, compared case-insensitively
fn strip_key<'a>(line: &'a str, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|key| {
        let head = line.get(..key.len())?;
        head.eq_ignore_ascii_case(key).then(|| &line[key.len()..])
    })
}

/// Split `<user>,pass=<password>` at the first password key
fn split_password(rest: &str) -> Option<(&str, &str)> {
    let lower = rest.to_ascii_lowercase();
    [",password=", ",pass="]
        .iter()
        .filter_map(|key| lower.find(key).map(|at| (at, key.len())))
        .min_by_key(|(at, _)| *at)
        .map(|(at, len)| (&rest[..at], &rest[at + len..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean() {
        assert_eq!(parse_verdict("OK"), Verdict::Clean);
        assert_eq!(parse_verdict("  ok.\n"), Verdict::Clean);
    }

    #[test]
    fn test_password_only() {
        assert_eq!(
            parse_verdict("pass=Summer2024!"),
            Verdict::Password { password: "Summer2024!".into() }
        );
        assert_eq!(
            parse_verdict("password=p@ss,word"),
            Verdict::Password { password: "p@ss,word".into() }
        );
    }

    #[test]
    fn test_credential() {
        assert_eq!(
            parse_verdict("user=svc_backup,pass=Backup#1"),
            Verdict::Credential { user: "svc_backup".into(), password: "Backup#1".into() }
        );
        assert_eq!(
            parse_verdict("USER=sa,Password=x=y"),
            Verdict::Credential { user: "sa".into(), password: "x=y".into() }
        );
    }

    #[test]
    fn test_code_fence_and_explanation() {
        let response = "Here is my answer:\n```\nuser=admin,pass=hunter2\n```\n";
        assert_eq!(
            parse_verdict(response),
            Verdict::Credential { user: "admin".into(), password: "hunter2".into() }
        );
    }

    #[test]
    fn test_inline_backticks() {
        assert_eq!(parse_verdict("`pass=abc`"), Verdict::Password { password: "abc".into() });
    }

    #[test]
    fn test_user_without_password_is_unparsed() {
        assert!(matches!(parse_verdict("user=admin"), Verdict::Unparsed { .. }));
    }

    #[test]
    fn test_garbage_is_unparsed() {
        let verdict = parse_verdict("  I am not sure what you mean  ");
        assert_eq!(verdict, Verdict::Unparsed { raw: "I am not sure what you mean".into() });
    }

    #[test]
    fn test_empty_is_unparsed() {
        assert_eq!(parse_verdict(""), Verdict::Unparsed { raw: String::new() });
    }
}
