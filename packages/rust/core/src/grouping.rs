//! Section grouping and in-section ordering.
//!
//! Canonical sections are seeded from the taxonomy before any document is
//! added, so an empty known section and an unknown one stay distinguishable.
//! Documents whose section key is not in the taxonomy land in an unlisted
//! bucket that is kept for reporting but never rendered.

use std::collections::HashMap;

use tracing::{debug, instrument, warn};

use llmsgen_shared::{Document, Section, Taxonomy};

/// Documents bucketed by section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grouping {
    /// One section per taxonomy entry, in taxonomy order (possibly empty).
    pub listed: Vec<Section>,
    /// Sections absent from the taxonomy, in first-seen order.
    pub unlisted: Vec<Section>,
}

impl Grouping {
    /// Every section, listed first.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.listed.iter().chain(self.unlisted.iter())
    }

    /// Total documents across listed and unlisted sections.
    pub fn document_count(&self) -> usize {
        self.sections().map(|s| s.documents.len()).sum()
    }

    /// Documents that will not be rendered.
    pub fn unlisted_document_count(&self) -> usize {
        self.unlisted.iter().map(|s| s.documents.len()).sum()
    }

    pub fn section(&self, key: &str) -> Option<&Section> {
        self.sections().find(|s| s.key == key)
    }
}

/// Assign each document to its section, keeping input order within a section.
#[instrument(skip_all, fields(documents = documents.len()))]
pub fn group_documents(taxonomy: &Taxonomy, documents: Vec<Document>) -> Grouping {
    let mut listed: Vec<Section> = taxonomy
        .entries()
        .iter()
        .map(|e| Section::new(e.key.as_str(), e.title.as_str()))
        .collect();
    let mut unlisted: Vec<Section> = Vec::new();
    let mut unlisted_index: HashMap<String, usize> = HashMap::new();

    for doc in documents {
        if let Some(section) = listed.iter_mut().find(|s| s.key == doc.section) {
            section.documents.push(doc);
            continue;
        }

        let idx = *unlisted_index.entry(doc.section.clone()).or_insert_with(|| {
            unlisted.push(Section::new(doc.section.as_str(), doc.section.as_str()));
            unlisted.len() - 1
        });
        unlisted[idx].documents.push(doc);
    }

    for section in &unlisted {
        let paths: Vec<&str> = section.documents.iter().map(|d| d.path.as_str()).collect();
        warn!(
            section = %section.key,
            documents = section.documents.len(),
            ?paths,
            "section is not in the taxonomy; its documents will be left out of the artifact"
        );
    }

    debug!(
        listed = listed.len(),
        unlisted = unlisted.len(),
        "documents grouped"
    );

    Grouping { listed, unlisted }
}

/// Stable sort by ascending `order`; ties keep their existing relative order.
pub fn order_documents(documents: &mut [Document]) {
    documents.sort_by_key(|d| d.order);
}

/// Order every section of a grouping in place.
pub fn order_sections(grouping: &mut Grouping) {
    for section in grouping.listed.iter_mut().chain(grouping.unlisted.iter_mut()) {
        order_documents(&mut section.documents);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use llmsgen_shared::{SENTINEL_POSITION, TaxonomyEntry};

    fn doc(path: &str, title: &str, order: i64) -> Document {
        let section = path.split_once('/').map(|(s, _)| s).unwrap_or("");
        Document {
            path: path.into(),
            section: section.into(),
            title: title.into(),
            order,
            body: format!("body of {path}"),
        }
    }

    fn titles(section: &Section) -> Vec<&str> {
        section.documents.iter().map(|d| d.title.as_str()).collect()
    }

    #[test]
    fn seeds_every_canonical_section() {
        let grouping = group_documents(&Taxonomy::default(), vec![]);
        assert_eq!(grouping.listed.len(), 9);
        assert_eq!(grouping.listed[0].key, "");
        assert_eq!(grouping.listed[0].display_title, "Overview");
        assert!(grouping.listed.iter().all(|s| s.documents.is_empty()));
        assert!(grouping.unlisted.is_empty());
    }

    #[test]
    fn groups_by_first_segment() {
        let grouping = group_documents(
            &Taxonomy::default(),
            vec![
                doc("introduction.md", "introduction", SENTINEL_POSITION),
                doc("economics/mhr-token.md", "MHR Token", 1),
                doc("economics/deep/nested.md", "Nested", 2),
            ],
        );

        assert_eq!(titles(grouping.section("").unwrap()), vec!["introduction"]);
        assert_eq!(
            titles(grouping.section("economics").unwrap()),
            vec!["MHR Token", "Nested"]
        );
        assert_eq!(grouping.document_count(), 3);
    }

    #[test]
    fn unknown_sections_are_kept_aside() {
        let grouping = group_documents(
            &Taxonomy::default(),
            vec![
                doc("random-extra/doc.md", "doc", SENTINEL_POSITION),
                doc("protocol/routing.md", "Routing", 1),
                doc("zzz/a.md", "a", 1),
                doc("random-extra/other.md", "other", 1),
            ],
        );

        let keys: Vec<&str> = grouping.unlisted.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["random-extra", "zzz"]);
        assert_eq!(titles(&grouping.unlisted[0]), vec!["doc", "other"]);
        assert_eq!(grouping.unlisted_document_count(), 3);
        assert_eq!(grouping.document_count(), 4);
    }

    #[test]
    fn alternate_taxonomy_changes_eligibility() {
        let taxonomy = Taxonomy::new(vec![TaxonomyEntry::new("random-extra", "Extras")]).unwrap();
        let grouping = group_documents(
            &taxonomy,
            vec![
                doc("random-extra/doc.md", "doc", 1),
                doc("introduction.md", "introduction", 1),
            ],
        );

        assert_eq!(grouping.listed.len(), 1);
        assert_eq!(grouping.listed[0].display_title, "Extras");
        assert_eq!(grouping.unlisted[0].key, "");
    }

    #[test]
    fn orders_by_position() {
        let mut docs = vec![doc("economics/a.md", "B-doc", 2), doc("economics/b.md", "A-doc", 1)];
        order_documents(&mut docs);
        let titles: Vec<_> = docs.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, vec!["A-doc", "B-doc"]);
    }

    #[test]
    fn ordering_is_stable_for_ties_and_sentinel() {
        let mut docs = vec![
            doc("s/1.md", "no-pos-first", SENTINEL_POSITION),
            doc("s/2.md", "three-a", 3),
            doc("s/3.md", "no-pos-second", SENTINEL_POSITION),
            doc("s/4.md", "one", 1),
            doc("s/5.md", "three-b", 3),
            doc("s/6.md", "negative", -1),
        ];
        order_documents(&mut docs);
        let titles: Vec<_> = docs.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["negative", "one", "three-a", "three-b", "no-pos-first", "no-pos-second"]
        );
    }

    #[test]
    fn order_sections_sorts_every_bucket() {
        let mut grouping = group_documents(
            &Taxonomy::default(),
            vec![
                doc("services/b.md", "b", 2),
                doc("services/a.md", "a", 1),
                doc("extra/y.md", "y", 5),
                doc("extra/x.md", "x", 4),
            ],
        );
        order_sections(&mut grouping);

        assert_eq!(titles(grouping.section("services").unwrap()), vec!["a", "b"]);
        assert_eq!(titles(grouping.section("extra").unwrap()), vec!["x", "y"]);
    }
}
