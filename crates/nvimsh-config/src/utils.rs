use std::{env, path::PathBuf};

/// Parses a duration string into a number of milliseconds.
///
/// The string is a sequence of `<digits><unit>` pairs where unit is one of
/// `s`, `m`, `h` or `d`, e.g. `1h` or `1d1h1m1s`.
///
/// Returns `None` for malformed input or on overflow.
///
/// # Examples
///
/// ```
/// use nvimsh_config::utils::parse_duration;
///
/// assert_eq!(parse_duration("1h"), Some(60 * 60 * 1000));
/// ```
pub fn parse_duration(input: &str) -> Option<u128> {
    let mut total: u128 = 0;
    let mut chars = input.chars().peekable();

    while chars.peek().is_some() {
        let mut number_str = String::new();
        while let Some(c) = chars.peek() {
            if c.is_ascii_digit() {
                number_str.push(chars.next()?);
            } else {
                break;
            }
        }

        if number_str.is_empty() {
            return None;
        }

        let number: u128 = number_str.parse().ok()?;
        let multiplier = match chars.next()? {
            's' => 1000,
            'm' => 60 * 1000,
            'h' => 60 * 60 * 1000,
            'd' => 24 * 60 * 60 * 1000,
            _ => return None,
        };

        total = total.checked_add(number.checked_mul(multiplier)?)?;
    }

    Some(total)
}

/// Returns `$XDG_CONFIG_HOME`, falling back to `$HOME/.config`.
pub fn xdg_config_home() -> PathBuf {
    env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            env::var("HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("/"))
                .join(".config")
        })
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;
    use crate::test_utils::with_env;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("1s"), Some(1000));
        assert_eq!(parse_duration("1m"), Some(60 * 1000));
        assert_eq!(parse_duration("1h"), Some(60 * 60 * 1000));
        assert_eq!(parse_duration("1d"), Some(24 * 60 * 60 * 1000));
        assert_eq!(
            parse_duration("1d1h1m1s"),
            Some(24 * 60 * 60 * 1000 + 60 * 60 * 1000 + 60 * 1000 + 1000)
        );
        assert_eq!(parse_duration("90m"), Some(90 * 60 * 1000));
        assert_eq!(parse_duration("1d1h1m1s1"), None);
        assert_eq!(parse_duration("1h1x"), None);
        assert_eq!(parse_duration("hourly"), None);
        assert_eq!(parse_duration(""), Some(0));
    }

    #[test]
    fn test_parse_duration_overflow() {
        assert_eq!(
            parse_duration("340282366920938463463374607431768211456s"),
            None
        );
        assert_eq!(parse_duration("340282366920938463463374607431768211455d"), None);
    }

    #[test]
    #[serial]
    fn test_xdg_config_home() {
        with_env(vec![("XDG_CONFIG_HOME", Some("/tmp/xdg"))], || {
            assert_eq!(xdg_config_home(), PathBuf::from("/tmp/xdg"));
        });

        with_env(
            vec![("XDG_CONFIG_HOME", None), ("HOME", Some("/home/nvim"))],
            || {
                assert_eq!(xdg_config_home(), PathBuf::from("/home/nvim/.config"));
            },
        );
    }
}
