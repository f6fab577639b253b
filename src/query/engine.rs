//! Query Engine (C3) — runs a compiled `Query` against a `Tree` and yields
//! matches in capture order, generalizing the teacher's
//! `extract_chunks_from_tree`/`extract_refs_from_tree` loops (`base.rs`,
//! `ref_extractor.rs`) which each built a `QueryCursor`, iterated
//! `cursor.matches(...)`, and walked `m.captures` to pull out a name/kind
//! pair. Here that walk is factored out so C5 adapters consume a plain
//! `Vec<CapturedMatch>` instead of re-deriving capture-name lookups.

use tree_sitter::{Query, QueryCursor, StreamingIterator, Tree};

/// One capture within a match: the capture's name (from the query's
/// `capture_names()` table) plus its byte/line span and text.
#[derive(Debug, Clone)]
pub struct Capture {
    pub name: String,
    pub start_byte: u32,
    pub end_byte: u32,
    pub start_line: u32,
    pub end_line: u32,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct CapturedMatch {
    pub captures: Vec<Capture>,
}

impl CapturedMatch {
    #[must_use]
    pub fn capture(&self, name: &str) -> Option<&Capture> {
        self.captures.iter().find(|c| c.name == name)
    }

    /// The capture whose name ends in `_def`/`def`, or the first capture if
    /// none is tagged — every chunk query in the catalog (C2) tags its
    /// top-level definition node `@def` by convention.
    #[must_use]
    pub fn definition(&self) -> Option<&Capture> {
        self.capture("def").or_else(|| self.captures.first())
    }
}

/// Executes `query` over `tree`, returning one `CapturedMatch` per match in
/// the order tree-sitter produces them (document order for disjoint
/// subtrees). Capture order within a match mirrors query declaration order,
/// not byte order (§4.2, §4.3) — callers that need a specific capture look
/// it up by name via `CapturedMatch::capture` rather than by position.
#[must_use]
pub fn execute(query: &Query, tree: &Tree, source: &[u8]) -> Vec<CapturedMatch> {
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(query, tree.root_node(), source);
    let names = query.capture_names();
    let mut out = Vec::new();
    while let Some(m) = matches.next() {
        let captures = m
            .captures
            .iter()
            .map(|c| {
                let start = c.node.start_position();
                let end = c.node.end_position();
                Capture {
                    name: names[c.index as usize].to_string(),
                    start_byte: c.node.start_byte() as u32,
                    end_byte: c.node.end_byte() as u32,
                    start_line: start.row as u32 + 1,
                    end_line: end.row as u32 + 1,
                    text: c.node.utf8_text(source).unwrap_or("").to_string(),
                }
            })
            .collect();
        out.push(CapturedMatch { captures });
    }
    out
}
