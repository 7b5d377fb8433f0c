use std::{
    collections::HashMap,
    convert::TryFrom,
    fs,
    path::{Path, PathBuf},
};

use rcs_file::{Admin, Date, Delta, DeltaText, File, Id, Num, Rev, Sym, VString};

use crate::report::{LogReporter, ReportWarnings, Warning};
use crate::Error;

/// An RCS file indexed for historical queries.
///
/// The model is immutable once constructed and queries take `&self`, so a
/// single model can serve concurrent queries; each query owns whatever
/// transient state it needs.
pub struct RcsFile {
    filename: Option<PathBuf>,
    admin: Admin,
    desc: VString,
    deltas: Vec<(Num, Delta)>,
    delta_index: HashMap<Num, usize>,
    delta_texts: Vec<(Num, DeltaText)>,
    delta_text_index: HashMap<Num, usize>,
    reporter: Box<dyn ReportWarnings>,
}

impl RcsFile {
    /// Builds a model from the raw bytes of an RCS file.
    pub fn new(input: &[u8]) -> Result<Self, Error> {
        Self::new_with_reporter(input, Box::new(LogReporter))
    }

    pub fn new_with_reporter(
        input: &[u8],
        reporter: Box<dyn ReportWarnings>,
    ) -> Result<Self, Error> {
        Self::from_parts(rcs_file::parse(input)?, None, reporter)
    }

    /// Reads and parses the RCS file at `path`, recording the path for the
    /// `f` format directive.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        Self::open_with_reporter(path, Box::new(LogReporter))
    }

    pub fn open_with_reporter<P: AsRef<Path>>(
        path: P,
        reporter: Box<dyn ReportWarnings>,
    ) -> Result<Self, Error> {
        let path = path.as_ref();
        Self::from_parts(
            rcs_file::parse(&fs::read(path)?)?,
            Some(path.to_path_buf()),
            reporter,
        )
    }

    fn from_parts(
        file: File,
        filename: Option<PathBuf>,
        reporter: Box<dyn ReportWarnings>,
    ) -> Result<Self, Error> {
        let File {
            admin,
            deltas,
            desc,
            delta_texts,
        } = file;

        let delta_index = index(&deltas)?;
        let delta_text_index = index(&delta_texts)?;

        // Well-formed input pairs every delta with a deltatext; report the
        // strays but keep going.
        for (num, _) in &deltas {
            if !delta_text_index.contains_key(num) {
                reporter.report(&Warning::MissingDeltaText(num.clone()));
            }
        }
        for (num, _) in &delta_texts {
            if !delta_index.contains_key(num) {
                reporter.report(&Warning::MissingDelta(num.clone()));
            }
        }

        Ok(Self {
            filename,
            admin,
            desc,
            deltas,
            delta_index,
            delta_texts,
            delta_text_index,
            reporter,
        })
    }

    /// All revision numbers with a delta, in the order they appear in the
    /// file.
    pub fn deltanums(&self) -> impl Iterator<Item = &Num> {
        self.deltas.iter().map(|(num, _)| num)
    }

    pub fn delta(&self, revision: &Num) -> Result<&Delta, Error> {
        self.delta_index
            .get(revision)
            .map(|&i| &self.deltas[i].1)
            .ok_or_else(|| Error::UnknownRevision(revision.clone()))
    }

    pub fn delta_text(&self, revision: &Num) -> Result<&DeltaText, Error> {
        self.delta_text_index
            .get(revision)
            .map(|&i| &self.delta_texts[i].1)
            .ok_or_else(|| Error::UnknownRevision(revision.clone()))
    }

    /// The head revision: the admin block's `head` if set, otherwise the
    /// numerically greatest trunk revision.
    pub fn head(&self) -> Result<Num, Error> {
        if let Some(head) = &self.admin.head {
            return Ok(head.clone());
        }

        self.deltas
            .iter()
            .filter_map(|(num, _)| {
                Rev::try_from(num)
                    .ok()
                    .filter(Rev::is_trunk)
                    .map(|rev| (rev, num))
            })
            .max_by(|(a, _), (b, _)| a.cmp(b))
            .map(|(_, num)| num.clone())
            .ok_or(Error::MissingHead)
    }

    /// `(revision, next)` for every delta, in file order.
    pub fn next_chain(&self) -> Vec<(&Num, Option<&Num>)> {
        self.deltas
            .iter()
            .map(|(num, delta)| (num, delta.next.as_ref()))
            .collect()
    }

    /// The ancestor chain starting at `revision` (inclusive), following
    /// `next` pointers towards older revisions. A dangling or circular
    /// `next` is reported as a warning and the chain gathered so far is
    /// returned.
    pub fn ancestors(&self, revision: &Num) -> Result<Vec<(&Num, Option<&Num>)>, Error> {
        let mut index = *self
            .delta_index
            .get(revision)
            .ok_or_else(|| Error::UnknownRevision(revision.clone()))?;
        let mut seen = vec![false; self.deltas.len()];
        let mut chain = Vec::new();

        loop {
            seen[index] = true;
            let (num, delta) = &self.deltas[index];
            chain.push((num, delta.next.as_ref()));

            let next = match &delta.next {
                Some(next) => next,
                None => break,
            };

            match self.delta_index.get(next) {
                Some(&i) if seen[i] => {
                    self.reporter.report(&Warning::CircularChain(next.clone()));
                    break;
                }
                Some(&i) => index = i,
                None => {
                    self.reporter.report(&Warning::BrokenChain {
                        revision: num.clone(),
                        next: next.clone(),
                    });
                    break;
                }
            }
        }

        Ok(chain)
    }

    /// The symbolic names bound to `revision`, in file order.
    pub fn tags(&self, revision: &Num) -> Vec<&Sym> {
        self.admin
            .symbols
            .iter()
            .filter(|(_, num)| num == revision)
            .map(|(sym, _)| sym)
            .collect()
    }

    pub fn author(&self, revision: &Num) -> Result<&Id, Error> {
        Ok(&self.delta(revision)?.author)
    }

    pub fn date(&self, revision: &Num) -> Result<&Date, Error> {
        Ok(&self.delta(revision)?.date)
    }

    /// The commit message recorded with `revision`.
    pub fn message(&self, revision: &Num) -> Result<&VString, Error> {
        Ok(&self.delta_text(revision)?.log)
    }

    pub fn description(&self) -> &VString {
        &self.desc
    }

    pub fn admin(&self) -> &Admin {
        &self.admin
    }

    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }
}

fn index<T>(entries: &[(Num, T)]) -> Result<HashMap<Num, usize>, Error> {
    let mut index = HashMap::with_capacity(entries.len());
    for (i, (num, _)) in entries.iter().enumerate() {
        if index.insert(num.clone(), i).is_some() {
            return Err(Error::DuplicateRevision(num.clone()));
        }
    }
    Ok(index)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    const TRUNK: &[u8] = include_bytes!("fixtures/trunk/input");

    /// Captures warnings for inspection instead of logging them.
    #[derive(Clone, Default)]
    struct Collector(Arc<Mutex<Vec<Warning>>>);

    impl Collector {
        fn warnings(&self) -> Vec<Warning> {
            self.0.lock().unwrap().clone()
        }
    }

    impl ReportWarnings for Collector {
        fn report(&self, warning: &Warning) {
            self.0.lock().unwrap().push(warning.clone());
        }
    }

    fn num(s: &str) -> Num {
        Num(s.as_bytes().to_vec())
    }

    #[test]
    fn test_lookups() {
        let file = RcsFile::new(TRUNK).unwrap();

        assert_eq!(
            file.deltanums().cloned().collect::<Vec<_>>(),
            vec![num("1.3"), num("1.2"), num("1.1")]
        );

        assert_eq!(file.delta(&num("1.2")).unwrap().author.as_slice(), b"beth");
        assert_eq!(
            file.delta_text(&num("1.3")).unwrap().log.as_slice(),
            b"third"
        );
        assert_eq!(file.author(&num("1.1")).unwrap().as_slice(), b"adam");
        assert_eq!(
            file.date(&num("1.1")).unwrap().as_slice(),
            b"99.12.31.23.59.59"
        );
        assert_eq!(file.message(&num("1.2")).unwrap().as_slice(), b"second");
        assert_eq!(file.description().as_slice(), b"");

        assert!(matches!(
            file.delta(&num("2.1")),
            Err(Error::UnknownRevision(_))
        ));
        assert!(matches!(
            file.delta_text(&num("2.1")),
            Err(Error::UnknownRevision(_))
        ));
    }

    #[test]
    fn test_head() {
        let file = RcsFile::new(TRUNK).unwrap();
        assert_eq!(file.head().unwrap(), num("1.3"));
    }

    #[test]
    fn test_head_fallback_is_numeric() {
        // No head in the admin block; the greatest trunk revision wins, and
        // 1.10 beats 1.9 even though it sorts lower as a string.
        let input = b"head;\naccess;\nsymbols;\nlocks;\n\n1.9\ndate\t2021.01.01.00.00.00;\tauthor adam;\tstate Exp;\nbranches;\nnext;\n\n1.10\ndate\t2021.02.01.00.00.00;\tauthor adam;\tstate Exp;\nbranches;\nnext\t1.9;\n\n1.10.2.1\ndate\t2021.03.01.00.00.00;\tauthor adam;\tstate Exp;\nbranches;\nnext;\n\ndesc\n@@\n";
        let file = RcsFile::new(input).unwrap();
        assert_eq!(file.head().unwrap(), num("1.10"));
    }

    #[test]
    fn test_head_missing() {
        let input = b"head;\naccess;\nsymbols;\nlocks;\ndesc\n@@\n";
        let file = RcsFile::new(input).unwrap();
        assert!(matches!(file.head(), Err(Error::MissingHead)));
    }

    #[test]
    fn test_next_chain() {
        let file = RcsFile::new(TRUNK).unwrap();
        let chain = file.next_chain();
        assert_eq!(chain.len(), 3);
        assert_eq!(chain[0], (&num("1.3"), Some(&num("1.2"))));
        assert_eq!(chain[2], (&num("1.1"), None));
    }

    #[test]
    fn test_ancestors() {
        let file = RcsFile::new(TRUNK).unwrap();

        let chain = file.ancestors(&num("1.3")).unwrap();
        assert_eq!(chain.len(), 3);
        // The chain starts at the requested revision and ends where `next`
        // runs out.
        assert_eq!(chain[0].0, &num("1.3"));
        assert_eq!(chain[2], (&num("1.1"), None));

        let chain = file.ancestors(&num("1.2")).unwrap();
        assert_eq!(chain.len(), 2);
        assert_eq!(chain[0].0, &num("1.2"));

        assert!(matches!(
            file.ancestors(&num("8.1")),
            Err(Error::UnknownRevision(_))
        ));
    }

    #[test]
    fn test_ancestors_broken_chain() {
        // 1.2's next names a revision the file does not contain.
        let input = b"head\t1.2;\naccess;\nsymbols;\nlocks;\n\n1.2\ndate\t2021.01.01.00.00.00;\tauthor adam;\tstate Exp;\nbranches;\nnext\t1.1;\n\ndesc\n@@\n\n1.2\nlog\n@msg@\ntext\n@body\n@\n";
        let collector = Collector::default();
        let file = RcsFile::new_with_reporter(input, Box::new(collector.clone())).unwrap();

        let chain = file.ancestors(&num("1.2")).unwrap();
        assert_eq!(chain, vec![(&num("1.2"), Some(&num("1.1")))]);
        assert_eq!(
            collector.warnings(),
            vec![Warning::BrokenChain {
                revision: num("1.2"),
                next: num("1.1"),
            }]
        );
    }

    #[test]
    fn test_mismatched_sections_warn() {
        // A delta for 1.1 with no deltatext, and a deltatext for 1.0 with no
        // delta.
        let input = b"head\t1.1;\naccess;\nsymbols;\nlocks;\n\n1.1\ndate\t2021.01.01.00.00.00;\tauthor adam;\tstate Exp;\nbranches;\nnext;\n\ndesc\n@@\n\n1.0\nlog\n@msg@\ntext\n@body\n@\n";
        let collector = Collector::default();
        let _ = RcsFile::new_with_reporter(input, Box::new(collector.clone())).unwrap();

        assert_eq!(
            collector.warnings(),
            vec![
                Warning::MissingDeltaText(num("1.1")),
                Warning::MissingDelta(num("1.0")),
            ]
        );
    }

    #[test]
    fn test_duplicate_revision() {
        let input = b"head\t1.1;\naccess;\nsymbols;\nlocks;\n\n1.1\ndate\t2021.01.01.00.00.00;\tauthor adam;\tstate Exp;\nbranches;\nnext;\n\n1.1\ndate\t2021.01.02.00.00.00;\tauthor beth;\tstate Exp;\nbranches;\nnext;\n\ndesc\n@@\n\n1.1\nlog\n@msg@\ntext\n@body\n@\n";
        assert!(matches!(
            RcsFile::new(input),
            Err(Error::DuplicateRevision(_))
        ));
    }

    #[test]
    fn test_tags() {
        let file = RcsFile::new(TRUNK).unwrap();

        assert_eq!(
            file.tags(&num("1.2"))
                .into_iter()
                .map(|sym| sym.as_slice())
                .collect::<Vec<_>>(),
            vec![&b"release-1"[..]]
        );
        assert_eq!(
            file.tags(&num("1.1"))
                .into_iter()
                .map(|sym| sym.as_slice())
                .collect::<Vec<_>>(),
            vec![&b"start"[..]]
        );
        assert!(file.tags(&num("1.3")).is_empty());
    }

    #[test]
    fn test_model_is_sync() {
        fn assert_sync<T: Sync>() {}
        assert_sync::<RcsFile>();
    }
}
