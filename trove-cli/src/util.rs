use anyhow::{Result, bail};

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Parse a comma-separated list of keys; `all` expands to every value and
/// `none` clears the list.
pub fn parse_keys<T: Copy>(
    raw: &str,
    all: &[T],
    parse: impl Fn(&str) -> Option<T>,
    label: &str,
) -> Result<Vec<T>> {
    let mut keys = Vec::new();
    for token in split_csv(raw) {
        if token.eq_ignore_ascii_case("all") {
            keys.extend_from_slice(all);
            continue;
        }
        if token.eq_ignore_ascii_case("none") {
            keys.clear();
            continue;
        }
        match parse(&token) {
            Some(key) => keys.push(key),
            None => bail!("unknown {label} '{token}'"),
        }
    }
    Ok(keys)
}
