// Low-level HTML string scanning helpers.
// Deliberately naive and tailored to the class-schedule page structure:
// the blocks we walk (course header divs, table rows, cells) do not nest.
// Tag and attribute names match ASCII case-insensitively.

/// A matched `<tag ...>INNER</tag>` region, as byte offsets into the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagBlock {
    /// Offset of the `<` of the opening tag.
    pub start: usize,
    /// Offset just past the `>` of the opening tag.
    pub inner_start: usize,
    /// Offset of the `<` of the closing tag.
    pub inner_end: usize,
    /// Offset just past the `>` of the closing tag.
    pub end: usize,
}

impl TagBlock {
    /// The opening tag including its attributes, e.g. `<th scope="col">`.
    pub fn open_tag<'a>(&self, s: &'a str) -> &'a str {
        &s[self.start..self.inner_start]
    }

    /// The content between the opening and closing tags.
    pub fn inner<'a>(&self, s: &'a str) -> &'a str {
        &s[self.inner_start..self.inner_end]
    }
}

/// Find the next complete `<tag ...> ... </tag>` block from `from` onwards.
pub fn next_tag_block(s: &str, tag: &str, from: usize) -> Option<TagBlock> {
    let lc = ascii_lower(s);
    let tag_lc = ascii_lower(tag);
    next_tag_block_lc(s, &lc, &tag_lc, from)
}

/// Find the earliest block among `tags` from `from` onwards.
/// Returns the index into `tags` of the tag that matched plus the block.
pub fn next_any_tag_block(s: &str, tags: &[&str], from: usize) -> Option<(usize, TagBlock)> {
    let lc = ascii_lower(s);
    let mut best: Option<(usize, TagBlock)> = None;
    for (i, tag) in tags.iter().enumerate() {
        let tag_lc = ascii_lower(tag);
        if let Some(block) = next_tag_block_lc(s, &lc, &tag_lc, from) {
            if best.map_or(true, |(_, b)| block.start < b.start) {
                best = Some((i, block));
            }
        }
    }
    best
}

fn next_tag_block_lc(s: &str, lc: &str, tag_lc: &str, from: usize) -> Option<TagBlock> {
    let (start, inner_start) = find_open_tag(lc, tag_lc, from)?;
    let close_pat = format!("</{tag_lc}");
    let close_rel = lc[inner_start..].find(&close_pat)?;
    let inner_end = inner_start + close_rel;
    let end_rel = s[inner_end..].find('>')?;
    Some(TagBlock {
        start,
        inner_start,
        inner_end,
        end: inner_end + end_rel + 1,
    })
}

/// Locate `<tag` followed by a name boundary (whitespace, `>`, `/`), so a
/// search for `tr` does not stop inside `<table>` markup and vice versa.
fn find_open_tag(lc: &str, tag_lc: &str, from: usize) -> Option<(usize, usize)> {
    let pat = format!("<{tag_lc}");
    let mut at = from;
    loop {
        let rel = lc.get(at..)?.find(&pat)?;
        let start = at + rel;
        let after_name = start + pat.len();
        let boundary = lc[after_name..].chars().next();
        match boundary {
            Some(c) if c == '>' || c == '/' || c.is_whitespace() => {
                let gt_rel = lc[after_name..].find('>')?;
                return Some((start, after_name + gt_rel + 1));
            }
            Some(_) => at = after_name,
            None => return None,
        }
    }
}

/// Extract the value of `name=...` from an opening tag. Handles double
/// quotes, single quotes, and bare values. The value keeps its case.
pub fn attr_value(open_tag: &str, name: &str) -> Option<String> {
    let lc = ascii_lower(open_tag);
    let name_lc = ascii_lower(name);
    let mut at = 0;
    loop {
        let rel = lc.get(at..)?.find(&name_lc)?;
        let idx = at + rel;
        // Attribute names are delimited by whitespace on the left.
        let left_ok = idx > 0
            && lc[..idx]
                .chars()
                .next_back()
                .map_or(false, |c| c.is_whitespace());
        let rest = &open_tag[idx + name_lc.len()..];
        let rest_trim = rest.trim_start();
        if left_ok && rest_trim.starts_with('=') {
            let val = rest_trim[1..].trim_start();
            return Some(match val.chars().next() {
                Some(q @ ('"' | '\'')) => {
                    let body = &val[1..];
                    body[..body.find(q).unwrap_or(body.len())].to_string()
                }
                _ => val
                    .split(|c: char| c.is_whitespace() || c == '>' || c == '/')
                    .next()
                    .unwrap_or("")
                    .to_string(),
            });
        }
        at = idx + name_lc.len();
    }
}

/// True if the opening tag carries `class="..."` with `class_name` as one
/// of its space-separated tokens. Class names match case-sensitively.
pub fn has_class(open_tag: &str, class_name: &str) -> bool {
    attr_value(open_tag, "class")
        .map(|v| v.split_whitespace().any(|t| t == class_name))
        .unwrap_or(false)
}

/// Remove all `<...>` tags, decode the common entities, and collapse
/// whitespace. Used to turn a cell or header block into plain text.
pub fn text_content(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    normalize_ws(&decode_entities(&out))
}

/// Minimal entity decoding: the schedule page only uses these.
pub fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&#160;", " ")
}

/// Collapse whitespace runs into single spaces and trim.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}

/// ASCII-only lowercasing; preserves byte offsets for non-ASCII content.
fn ascii_lower(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii() { c.to_ascii_lowercase() } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_tag_block_basic() {
        let s = "<p>x</p><table class=\"a\"><tr>row</tr></table>";
        let block = next_tag_block(s, "table", 0).unwrap();
        assert_eq!(block.open_tag(s), "<table class=\"a\">");
        assert_eq!(block.inner(s), "<tr>row</tr>");
    }

    #[test]
    fn test_next_tag_block_case_insensitive() {
        let s = "<TABLE><TR>x</TR></TABLE>";
        let block = next_tag_block(s, "table", 0).unwrap();
        assert_eq!(block.inner(s), "<TR>x</TR>");
    }

    #[test]
    fn test_tag_name_boundary() {
        // Searching for "tr" must not stop inside "<track>".
        let s = "<track src=\"x\"></track><tr>row</tr>";
        let block = next_tag_block(s, "tr", 0).unwrap();
        assert_eq!(block.inner(s), "row");
    }

    #[test]
    fn test_next_tag_block_missing() {
        assert!(next_tag_block("<div>no table here</div>", "table", 0).is_none());
        assert!(next_tag_block("<table>unclosed", "table", 0).is_none());
    }

    #[test]
    fn test_next_any_tag_block_order() {
        let s = "<td>a</td><th>b</th>";
        let (idx, block) = next_any_tag_block(s, &["th", "td"], 0).unwrap();
        assert_eq!(idx, 1);
        assert_eq!(block.inner(s), "a");

        let (idx, block) = next_any_tag_block(s, &["th", "td"], block.end).unwrap();
        assert_eq!(idx, 0);
        assert_eq!(block.inner(s), "b");
    }

    #[test]
    fn test_attr_value_quoting() {
        assert_eq!(
            attr_value("<th scope=\"col\">", "scope").as_deref(),
            Some("col")
        );
        assert_eq!(attr_value("<th scope='col'>", "scope").as_deref(), Some("col"));
        assert_eq!(attr_value("<th scope=col>", "scope").as_deref(), Some("col"));
        assert_eq!(attr_value("<th>", "scope"), None);
    }

    #[test]
    fn test_has_class() {
        assert!(has_class("<div class=\"courseHeader\">", "courseHeader"));
        assert!(has_class("<div class=\"x courseHeader y\">", "courseHeader"));
        // Class tokens are case-sensitive.
        assert!(!has_class("<div class=\"courseheader\">", "courseHeader"));
        assert!(!has_class("<div>", "courseHeader"));
    }

    #[test]
    fn test_text_content() {
        assert_eq!(text_content("<b> 3 </b>"), "3");
        assert_eq!(text_content("Smith,&nbsp;J."), "Smith, J.");
        assert_eq!(text_content("  CLASS\n#  "), "CLASS #");
        assert_eq!(text_content("<img src=\"dot.gif\">"), "");
    }
}
