//! Path pattern rendering.
//!
//! Group paths are patterns over a closed token set: `{group}`, `{num}`,
//! `{date}`, `{expose}` and `{title}`. Listing paths and permalinks render
//! the same pattern differently, so both forms live here.
//!
//! | form | `{title}` | `{num}` | slashes |
//! |------|-----------|---------|---------|
//! | [`render`] | dropped | via `num_format`, empty on page one | runs collapsed, trailing `/` appended |
//! | [`render_permalink`] | substituted | `/{num}` segment stripped | kept verbatim |

/// Substitution values for one render. Unset tokens render as empty.
#[derive(Debug, Default, Clone)]
pub struct PathSubs<'a> {
    pub group: Option<&'a str>,
    pub num: Option<usize>,
    pub date: Option<&'a str>,
    pub expose: Option<&'a str>,
    pub title: Option<&'a str>,
}

impl PathSubs<'_> {
    fn lookup(&self, token: &str) -> Option<String> {
        match token {
            "group" => self.group.map(str::to_owned),
            "num" => self.num.map(|num| num.to_string()),
            "date" => self.date.map(str::to_owned),
            "expose" => self.expose.map(str::to_owned),
            "title" => self.title.map(str::to_owned),
            _ => None,
        }
    }
}

/// Render a listing-page path.
///
/// `{title}` is dropped, `{num}` routes through `num_format` when one is
/// configured (its own tokens substituted from the same values), unknown
/// or unset tokens render empty. Slash runs left by empty tokens collapse
/// and non-empty results gain a trailing slash.
pub fn render(pattern: &str, subs: &PathSubs<'_>, num_format: Option<&str>) -> String {
    let substituted = substitute(pattern, |token| match token {
        "title" => String::new(),
        "num" => match (subs.num, num_format) {
            (None, _) => String::new(),
            (Some(_), Some(format)) => {
                substitute(format, |inner| subs.lookup(inner).unwrap_or_default())
            }
            (Some(num), None) => num.to_string(),
        },
        other => subs.lookup(other).unwrap_or_default(),
    });
    with_trailing_slash(collapse_slashes(&substituted))
}

/// Render the canonical permalink form of a pattern.
///
/// The literal `/{num}` segment is dropped, every token (title included)
/// is substituted, and the result is rooted with `/`. Permalinks are
/// otherwise verbatim: no slash collapsing, no trailing slash.
pub fn render_permalink(pattern: &str, subs: &PathSubs<'_>) -> String {
    let stripped = pattern.replace("/{num}", "");
    let substituted = substitute(&stripped, |token| subs.lookup(token).unwrap_or_default());
    format!("/{substituted}")
}

/// Replace each `{token}` via `lookup`. A `{` without a closing brace
/// passes through untouched.
fn substitute(pattern: &str, mut lookup: impl FnMut(&str) -> String) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut rest = pattern;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) => {
                out.push_str(&lookup(&after[..end]));
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

fn collapse_slashes(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut last_was_slash = false;
    for c in path.chars() {
        if c == '/' {
            if last_was_slash {
                continue;
            }
            last_was_slash = true;
        } else {
            last_was_slash = false;
        }
        out.push(c);
    }
    out
}

fn with_trailing_slash(mut path: String) -> String {
    if !path.is_empty() && !path.ends_with('/') {
        path.push('/');
    }
    path
}
