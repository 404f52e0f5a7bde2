use regex::bytes::Regex;

/// Bytes of left context kept in front of a match.
pub const EXCERPT_BEFORE: usize = 5;
/// Bytes of right context kept after a match.
pub const EXCERPT_AFTER: usize = 60;

/// Outcome of one content search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Hit {
    pub found:    bool,
    /// Newline-terminated excerpts. Empty in first-match mode.
    pub excerpts: String,
    /// Buffer offset just past the last reported match.
    pub last_end: Option<usize>,
}

impl Hit {
    pub fn miss() -> Self {
        Self::default()
    }

    pub fn merge(&mut self, other: Hit) {
        self.found |= other.found;
        self.excerpts.push_str(&other.excerpts);
        self.last_end = other.last_end.or(self.last_end);
    }

    pub fn excerpt(self) -> Option<String> {
        (!self.excerpts.is_empty()).then_some(self.excerpts)
    }
}

/// Match `regex` against each line of `buf`.
///
/// First-match mode returns on the first matching line and builds nothing.
/// Find-all mode collects a clipped excerpt for every match.
pub(crate) fn scan(regex: &Regex, buf: &[u8], find_all: bool) -> Hit {
    scan_from(regex, buf, find_all, 0)
}

/// Like [`scan`], but matches starting before `reported_until` are skipped.
/// Used when a chunk starts with the trailer of the chunk before it: a match
/// already reported there, whole or cut short by the chunk end, is not
/// reported a second time.
pub(crate) fn scan_from(regex: &Regex, buf: &[u8], find_all: bool, reported_until: usize) -> Hit {
    let mut hit = Hit::miss();
    let mut line_start = 0;

    for raw in buf.split(|&b| b == b'\n') {
        let offset = line_start;
        line_start += raw.len() + 1;
        let line = raw.strip_suffix(b"\r").unwrap_or(raw);

        if !find_all {
            if regex.is_match(line) {
                hit.found = true;
                return hit;
            }
            continue;
        }

        for m in regex.find_iter(line) {
            if offset + m.start() < reported_until {
                continue;
            }
            hit.found = true;
            hit.last_end = Some(offset + m.end());
            let lo = m.start().saturating_sub(EXCERPT_BEFORE);
            let hi = (m.end() + EXCERPT_AFTER).min(line.len());
            push_printable(&mut hit.excerpts, &line[lo..hi]);
            hit.excerpts.push('\n');
        }
    }
    hit
}

fn push_printable(out: &mut String, bytes: &[u8]) {
    for c in String::from_utf8_lossy(bytes).chars() {
        out.push(if c.is_control() { ' ' } else { c });
    }
}
