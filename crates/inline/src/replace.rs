use memchr::memmem;

/// Reference to data URI substitutions, applied as literal byte replacement.
///
/// Kept references take part in matching but are written back unchanged, so
/// a replaced reference can never rewrite part of an unresolved one.
#[derive(Debug, Default)]
pub struct Replacements {
    pairs: Vec<(Vec<u8>, Option<Vec<u8>>)>,
}
impl Replacements {
    pub fn insert(&mut self, from: impl Into<Vec<u8>>, to: impl Into<Vec<u8>>) {
        self.pairs.push((from.into(), Some(to.into())));
    }

    /// Protects every occurrence of `reference` from other replacements.
    pub fn keep(&mut self, reference: impl Into<Vec<u8>>) {
        self.pairs.push((reference.into(), None));
    }

    /// Number of references that will be rewritten.
    pub fn replaced(&self) -> usize {
        self.pairs.iter().filter(|(_, to)| to.is_some()).count()
    }

    /// Rewrites `document` in a single pass.
    ///
    /// At each position the longest matching key wins, and matches never
    /// overlap: `index_files/a` does not touch `index_files/a.png`, whether the
    /// longer one is replaced or kept.
    pub fn apply(&self, document: &[u8]) -> Vec<u8> {
        let mut matches: Vec<(usize, usize, Option<&[u8]>)> = self
            .pairs
            .iter()
            .filter(|(from, _)| !from.is_empty())
            .flat_map(|(from, to)| {
                memmem::find_iter(document, from).map(move |start| (start, from.len(), to.as_deref()))
            })
            .collect();
        matches.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| b.1.cmp(&a.1)));

        let mut output = Vec::with_capacity(document.len());
        let mut last = 0;
        for (start, len, to) in matches {
            if start < last {
                continue;
            }
            output.extend_from_slice(&document[last..start]);
            output.extend_from_slice(to.unwrap_or(&document[start..start + len]));
            last = start + len;
        }
        output.extend_from_slice(&document[last..]);
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(b"aXbXc", b"X", b"--", b"a--b--c")]
    #[case(b"XX", b"X", b"", b"")]
    #[case(b"abc", b"X", b"Y", b"abc")]
    #[case(b"aaa", b"aa", b"b", b"ba")]
    fn test_single_key(#[case] document: &[u8], #[case] from: &[u8], #[case] to: &[u8], #[case] expected: &[u8]) {
        let mut replacements = Replacements::default();
        replacements.insert(from, to);
        assert_eq!(replacements.apply(document), expected);
    }

    #[test]
    fn longest_key_wins() {
        let mut replacements = Replacements::default();
        replacements.insert("index_files/a", "SHORT");
        replacements.insert("index_files/a.png", "LONG");
        let output = replacements.apply(br#""index_files/a.png" "index_files/a""#);
        assert_eq!(output, br#""LONG" "SHORT""#);
    }

    #[test]
    fn kept_references_are_not_rewritten() {
        let mut replacements = Replacements::default();
        replacements.insert("index_files/a", "URI");
        replacements.keep("index_files/a.png");
        replacements.keep("index_files/x/index_files/a");
        let output = replacements.apply(br#""index_files/a" "index_files/a.png" "index_files/x/index_files/a""#);
        assert_eq!(output, br#""URI" "index_files/a.png" "index_files/x/index_files/a""#);
        assert_eq!(replacements.replaced(), 1);
    }

    #[test]
    fn replacements_are_not_rescanned() {
        let mut replacements = Replacements::default();
        replacements.insert("index_files/a", "index_files/b");
        replacements.insert("index_files/b", "B");
        assert_eq!(replacements.apply(b"index_files/a"), b"index_files/b");
    }
}
