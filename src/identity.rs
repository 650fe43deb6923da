//! Symbol identity for API members.
//!
//! Every observed API member is keyed by a doc-id style string
//! (`M:System.Console.WriteLine(System.String)`), globally unique across the
//! whole database and stable across scans of the same member on different
//! platforms. The decomposed namespace/type/member names are display fields
//! derived from the doc-id; multiple overloads may share all three names but
//! never the doc-id.

use thiserror::Error;

/// Error types for doc-id decomposition.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// Doc-id has no `K:` kind prefix
    #[error("doc-id has no kind prefix: {0}")]
    MissingKindPrefix(String),

    /// Doc-id has a kind prefix but no dotted symbol path after it
    #[error("doc-id has an empty symbol path: {0}")]
    EmptyPath(String),
}

/// Canonical identity of an API member.
///
/// `doc_id` is the primary key used for equality and lookup. The name fields
/// are display decompositions and are not independently unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolIdentity {
    /// Doc-id string, unique per API member
    pub doc_id: String,
    /// Containing namespace (may be empty for global types)
    pub namespace_name: String,
    /// Declaring type name
    pub type_name: String,
    /// Member name (empty when the identity refers to a type itself)
    pub member_name: String,
}

impl SymbolIdentity {
    /// Create an identity from pre-decomposed fields.
    ///
    /// Callers that receive decomposed names from the symbol scanner use this
    /// directly; no validation is performed beyond storing the fields.
    pub fn new(
        doc_id: impl Into<String>,
        namespace_name: impl Into<String>,
        type_name: impl Into<String>,
        member_name: impl Into<String>,
    ) -> Self {
        SymbolIdentity {
            doc_id: doc_id.into(),
            namespace_name: namespace_name.into(),
            type_name: type_name.into(),
            member_name: member_name.into(),
        }
    }

    /// Sort key used for CSV export ordering.
    ///
    /// Ordering is ascending, case-sensitive, by raw string value:
    /// namespace, then type, then member, then doc-id. The doc-id tiebreaker
    /// keeps overloads (same three names) in a stable order.
    pub fn sort_key(&self) -> (&str, &str, &str, &str) {
        (
            &self.namespace_name,
            &self.type_name,
            &self.member_name,
            &self.doc_id,
        )
    }

    /// Decompose a doc-id string into an identity.
    ///
    /// Doc-ids have the shape `K:Namespace.Type.Member(params)` where `K` is
    /// a single kind character (`T` for types, `M`/`P`/`E`/`F` for members).
    /// The parameter list, if present, is part of the doc-id but not of the
    /// member name. For `T:` doc-ids the member name is empty and the last
    /// path segment is the type name.
    ///
    /// # Errors
    /// Returns [`IdentityError`] if the doc-id has no kind prefix or no
    /// symbol path.
    pub fn parse_doc_id(doc_id: &str) -> Result<Self, IdentityError> {
        let (kind, path) = doc_id
            .split_once(':')
            .filter(|(kind, _)| kind.len() == 1)
            .ok_or_else(|| IdentityError::MissingKindPrefix(doc_id.to_string()))?;

        // Strip the parameter list; parentheses never appear in the dotted path.
        let path = match path.split_once('(') {
            Some((head, _)) => head,
            None => path,
        };

        if path.is_empty() {
            return Err(IdentityError::EmptyPath(doc_id.to_string()));
        }

        if kind == "T" {
            let (namespace_name, type_name) = split_last_segment(path);
            return Ok(SymbolIdentity::new(doc_id, namespace_name, type_name, ""));
        }

        let (prefix, member_name) = split_last_segment(path);
        if prefix.is_empty() {
            return Err(IdentityError::EmptyPath(doc_id.to_string()));
        }
        let (namespace_name, type_name) = split_last_segment(prefix);

        Ok(SymbolIdentity::new(
            doc_id,
            namespace_name,
            type_name,
            member_name,
        ))
    }
}

/// Split a dotted path into (everything before the last dot, last segment).
///
/// `#ctor`-style member names contain no dots, so the last dot is always a
/// segment boundary. A path with no dot yields an empty prefix.
fn split_last_segment(path: &str) -> (&str, &str) {
    match path.rsplit_once('.') {
        Some((prefix, last)) => (prefix, last),
        None => ("", path),
    }
}
