//! Brace block layout
//!
//! A [`Block`] collects the already-rendered members of a composite literal
//! and lays them out either on one line or as a tab-indented block with the
//! `label:` column aligned across runs of single-line members.

#[derive(Debug)]
struct Entry {
    label: Option<String>,
    body: String,
}

impl Entry {
    fn is_single_line(&self) -> bool {
        !self.body.contains('\n') && !self.label.as_deref().unwrap_or("").contains('\n')
    }
}

/// Members of one `{...}` literal
#[derive(Debug)]
pub(crate) struct Block {
    expand: bool,
    entries: Vec<Entry>,
}

impl Block {
    pub(crate) fn new(expand: bool) -> Self {
        Self {
            expand,
            entries: Vec::new(),
        }
    }

    /// Add a `label: body` member
    pub(crate) fn labelled(&mut self, label: impl Into<String>, body: String) {
        self.entries.push(Entry {
            label: Some(label.into()),
            body,
        });
    }

    /// Add a bare member (slice element)
    pub(crate) fn item(&mut self, body: String) {
        self.entries.push(Entry { label: None, body });
    }

    /// Append the laid-out block, braces included, to `out`
    pub(crate) fn write_to(self, out: &mut String) {
        if self.entries.is_empty() {
            out.push_str("{}");
            return;
        }
        if self.expand {
            self.write_expanded(out);
        } else {
            self.write_inline(out);
        }
    }

    fn write_inline(self, out: &mut String) {
        out.push('{');
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            if let Some(label) = &entry.label {
                out.push_str(label);
                out.push_str(": ");
            }
            out.push_str(&entry.body);
        }
        out.push('}');
    }

    fn write_expanded(self, out: &mut String) {
        let widths = self.column_widths();
        out.push_str("{\n");
        for (entry, width) in self.entries.iter().zip(widths) {
            out.push('\t');
            if let Some(label) = &entry.label {
                push_indented(out, label);
                out.push(':');
                let used = label.chars().count() + 1;
                let pad = width.saturating_sub(used).max(1);
                out.extend(std::iter::repeat(' ').take(pad));
            }
            push_indented(out, &entry.body);
            out.push_str(",\n");
        }
        out.push('}');
    }

    /// Width of the `label:` column for each entry, including the gap
    ///
    /// Consecutive single-line labelled entries share one width; any other
    /// entry ends the run and keeps a single space.
    fn column_widths(&self) -> Vec<usize> {
        let mut widths = vec![0; self.entries.len()];
        let mut run_start = 0;
        let mut run_max = 0;
        for i in 0..=self.entries.len() {
            let aligned = self
                .entries
                .get(i)
                .filter(|entry| entry.is_single_line())
                .and_then(|entry| entry.label.as_ref());
            match aligned {
                Some(label) => {
                    run_max = run_max.max(label.chars().count() + 1);
                }
                None => {
                    for width in &mut widths[run_start..i] {
                        *width = run_max + 1;
                    }
                    run_start = i + 1;
                    run_max = 0;
                }
            }
        }
        widths
    }
}

/// Append `text`, shifting every continuation line one tab to the right
fn push_indented(out: &mut String, text: &str) {
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push_str("\n\t");
        }
        out.push_str(line);
    }
}
