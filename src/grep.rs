use ed_script::{Command, Script};
use rcs_file::Num;
use regex::bytes::Regex;

use crate::format::{self, Directive, Field};
use crate::model::RcsFile;
use crate::Error;

/// A single matching line in a single revision. Line numbers are 1-based
/// and the line text carries no terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub revision: Num,
    pub lineno: usize,
    pub line: Vec<u8>,
}

impl RcsFile {
    /// Finds every line in every trunk revision that matches `pattern`
    /// (anchored at the start of the line) and renders each hit according
    /// to the format string; see [`crate::Directive`] for the directives.
    ///
    /// With `wrap_continuations` set, a matching line ending in `\` drags
    /// the following line into the result as well, and continuations chain.
    pub fn grep(
        &self,
        pattern: &str,
        format: &str,
        wrap_continuations: bool,
    ) -> Result<Vec<Vec<Field>>, Error> {
        let directives = format::parse(format)?;
        self.grep_matches(pattern, wrap_continuations)?
            .into_iter()
            .map(|m| self.render(&m, &directives))
            .collect()
    }

    /// The raw form of [`RcsFile::grep`]: `(revision, lineno, line)`
    /// matches, equivalent to the default `rlL` format.
    ///
    /// The walk starts from the head revision, whose delta text is the full
    /// file content, and replays each older revision's edit script against
    /// the match set; only matching lines are ever tracked.
    pub fn grep_matches(&self, pattern: &str, wrap_continuations: bool) -> Result<Vec<Match>, Error> {
        let matcher = Regex::new(&format!("^(?:{})", pattern))?;
        let head = self.head()?;
        let ancestors = self.ancestors(&head)?;

        let mut matches: Vec<Match> = Vec::new();
        for (i, (curr, next)) in ancestors.iter().copied().enumerate() {
            let text = &self.delta_text(curr)?.text;

            if i == 0 {
                seed_from_head(&mut matches, curr, text, &matcher, wrap_continuations);
            } else {
                replay_script(&mut matches, curr, text, &matcher, wrap_continuations)?;
            }

            // A matching line still present in this revision also exists in
            // its ancestor. Queue a copy under the ancestor's label; it
            // will be culled or renumbered when that revision's script is
            // replayed. Collected first: extending the list mid-iteration
            // would walk the fresh entries too. An ancestor the walk cannot
            // reach (broken chain) gets no candidates.
            if let Some(next) = next {
                if i + 1 == ancestors.len() {
                    break;
                }
                let inherited: Vec<Match> = matches
                    .iter()
                    .filter(|m| m.revision == *curr)
                    .map(|m| Match {
                        revision: next.clone(),
                        lineno: m.lineno,
                        line: m.line.clone(),
                    })
                    .collect();
                matches.extend(inherited);
            }
        }

        Ok(matches)
    }

    fn render(&self, m: &Match, directives: &[Directive]) -> Result<Vec<Field>, Error> {
        directives
            .iter()
            .map(|directive| {
                Ok(match directive {
                    Directive::Revision => Field::Revision(m.revision.clone()),
                    Directive::LineNumber => Field::LineNumber(m.lineno),
                    Directive::Line => Field::Line(m.line.clone()),
                    Directive::Author => Field::Author(self.author(&m.revision)?.clone()),
                    Directive::Date => Field::Date(self.date(&m.revision)?.clone()),
                    Directive::IsoDate => {
                        Field::IsoDate(self.date(&m.revision)?.as_iso8601()?)
                    }
                    Directive::Tags => {
                        Field::Tags(self.tags(&m.revision).into_iter().cloned().collect())
                    }
                    Directive::Filename => Field::Filename(
                        self.filename()
                            .map(|path| path.to_string_lossy().into_owned())
                            .unwrap_or_else(|| String::from("?")),
                    ),
                    Directive::Message => Field::Message(self.message(&m.revision)?.clone()),
                })
            })
            .collect()
    }
}

/// Scans the head revision's literal content for matches.
fn seed_from_head(
    matches: &mut Vec<Match>,
    head: &Num,
    text: &[u8],
    matcher: &Regex,
    wrap_continuations: bool,
) {
    let lines: Vec<&[u8]> = text.split(|&b| b == b'\n').collect();
    // The content ends with a newline, so the split leaves an empty final
    // element that is not a line.
    let count = lines.len().saturating_sub(1);

    let mut take_next = false;
    for (i, line) in lines.into_iter().take(count).enumerate() {
        if matcher.is_match(line) || take_next {
            take_next = wrap_continuations && line.ends_with(b"\\");
            matches.push(Match {
                revision: head.clone(),
                lineno: i + 1,
                line: line.to_vec(),
            });
        }
    }
}

/// Replays one revision's edit script against the match set.
///
/// The script stored with a revision transforms its *child* (the next newer
/// revision) into it, and addresses lines in the child's numbering, as do
/// the candidate matches inherited from the child. Deletions name lines the
/// child had and this revision lacks; insertions carry the lines this
/// revision has and the child lacks, which is where newly introduced
/// matches are discovered.
fn replay_script(
    matches: &mut Vec<Match>,
    curr: &Num,
    script: &[u8],
    matcher: &Regex,
    wrap_continuations: bool,
) -> Result<(), Error> {
    // (start, count) pairs in the child revision's numbering.
    let mut deletions: Vec<(usize, usize)> = Vec::new();
    let mut insertions: Vec<(usize, usize)> = Vec::new();
    // Matching payload lines: (anchor, 1-based offset within the block,
    // text). Kept apart from the match list until the line numbers are
    // settled.
    let mut inserted: Vec<(usize, usize, Vec<u8>)> = Vec::new();

    for command in Script::parse(script) {
        match command? {
            Command::Delete { position, lines } => {
                deletions.push((position, lines));
                // The deleted lines never existed in this revision; drop the
                // candidates that pointed at them.
                matches.retain(|m| {
                    m.revision != *curr || m.lineno < position || m.lineno >= position + lines
                });
            }
            Command::Add { position, content } => {
                insertions.push((position, content.len()));

                let mut take_next = false;
                for (k, line) in content.into_iter().enumerate() {
                    if matcher.is_match(&line) || take_next {
                        take_next = wrap_continuations && line.ends_with(b"\\");
                        inserted.push((position, k + 1, line));
                    }
                }
            }
        }
    }

    deletions.sort_unstable();
    insertions.sort_unstable();

    // Renumber the surviving candidates from the child's numbering into
    // this revision's.
    for m in matches.iter_mut().filter(|m| m.revision == *curr) {
        let added = lines_before(&insertions, m.lineno);
        let removed = lines_before(&deletions, m.lineno);
        m.lineno = (m.lineno + added).saturating_sub(removed);
    }

    for (anchor, offset, line) in inserted {
        // A deletion sharing this insertion's anchor swallows the anchor
        // line itself, which pulls the insertion point up by one.
        let overlap = deletions.iter().any(|&(start, _)| start == anchor) as usize;
        let added = lines_before(&insertions, anchor);
        let removed = lines_before(&deletions, anchor);
        let lineno = (anchor + offset + added).saturating_sub(removed + overlap);
        matches.push(Match {
            revision: curr.clone(),
            lineno,
            line,
        });
    }

    // The current revision's matches form the tail of the list, and the
    // fresh insertions landed out of order; sort just that run.
    let mut start = matches.len();
    while start > 0 && matches[start - 1].revision == *curr {
        start -= 1;
    }
    matches[start..].sort_by(|a, b| (a.lineno, &a.line).cmp(&(b.lineno, &b.line)));

    Ok(())
}

/// Total lines touched by commands anchored strictly before `lineno`.
fn lines_before(commands: &[(usize, usize)], lineno: usize) -> usize {
    commands
        .iter()
        .take_while(|&&(start, _)| start < lineno)
        .map(|&(_, count)| count)
        .sum()
}
