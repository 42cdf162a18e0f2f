use crate::{
    tree::{Element, NodeId, Tree},
    MarkerError,
};
use cssparser::ToCss;
use precomputed_hash::PrecomputedHash;
use selectors::{
    attr::{AttrSelectorOperation, CaseSensitivity, NamespaceConstraint},
    bloom::BloomFilter,
    matching::{self, ElementSelectorFlags, MatchingContext},
    parser::{self, ParseRelative, SelectorList, SelectorParseErrorKind},
    OpaqueElement,
};
use std::{
    fmt,
    hash::{DefaultHasher, Hash, Hasher},
    str::FromStr,
};

/// The selector used when none is configured: code blocks inside `<pre>`
pub const DEFAULT_SELECTOR: &str = "pre > code";

/// A CSS selector list picking out the containers whose lines get markers.
///
/// Parsing and matching are done by the `selectors` crate, so type, class, id
/// and attribute selectors, every combinator and the tree-structural
/// pseudo-classes (`:not()`, `:is()`, `:has()`, `:first-child`, ...) all work.
/// Pseudo-elements and stateful pseudo-classes such as `:hover` are rejected,
/// since a tree being prepared for print has no state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    list: SelectorList<TreeSelectors>,
}

impl Default for Selector {
    fn default() -> Self {
        DEFAULT_SELECTOR
            .parse()
            .expect("the default selector is valid")
    }
}

impl FromStr for Selector {
    type Err = MarkerError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        let mut input = cssparser::ParserInput::new(source);
        let mut parser = cssparser::Parser::new(&mut input);
        let list = SelectorList::parse(&SelectorParser, &mut parser, ParseRelative::No).map_err(
            |error| MarkerError::InvalidSelector {
                selector: source.to_string(),
                reason: format!("{:?} at column {}", error.kind, error.location.column),
            },
        )?;

        Ok(Selector {
            source: source.to_string(),
            list,
        })
    }
}

impl Selector {
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Does `node` match any selector in the list?
    pub fn matches(&self, tree: &Tree, node: NodeId) -> bool {
        let mut caches = matching::SelectorCaches::default();
        ElementRef::new(tree, node).is_some_and(|element| self.matches_element(&element, &mut caches))
    }

    /// Every element in `tree` matching the selector, in document order. Nested
    /// matches are all returned; an element is never returned twice.
    pub fn select(&self, tree: &Tree) -> Vec<NodeId> {
        let mut caches = matching::SelectorCaches::default();
        tree.descendants(tree.root())
            .into_iter()
            .filter(|&node| {
                ElementRef::new(tree, node)
                    .is_some_and(|element| self.matches_element(&element, &mut caches))
            })
            .collect()
    }

    fn matches_element(&self, element: &ElementRef<'_>, caches: &mut matching::SelectorCaches) -> bool {
        let mut context = MatchingContext::new(
            matching::MatchingMode::Normal,
            None,
            caches,
            matching::QuirksMode::NoQuirks,
            matching::NeedsSelectorFlags::No,
            matching::MatchingForInvalidation::No,
        );
        self.list
            .slice()
            .iter()
            .any(|selector| matching::matches_selector(selector, 0, None, element, &mut context))
    }
}

/// Selector parsing and matching over [Tree]: HTML elements without
/// namespaces, pseudo-elements or stateful pseudo-classes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TreeSelectors;

impl parser::SelectorImpl for TreeSelectors {
    type ExtraMatchingData<'a> = ();
    type AttrValue = CssString;
    type Identifier = CssIdent;
    type LocalName = CssIdent;
    type NamespaceUrl = CssIdent;
    type NamespacePrefix = CssIdent;
    type BorrowedNamespaceUrl = CssIdent;
    type BorrowedLocalName = CssIdent;
    type NonTSPseudoClass = PseudoClass;
    type PseudoElement = PseudoElement;
}

struct SelectorParser;

impl<'i> parser::Parser<'i> for SelectorParser {
    type Impl = TreeSelectors;
    type Error = SelectorParseErrorKind<'i>;

    fn parse_is_and_where(&self) -> bool {
        true
    }

    fn parse_has(&self) -> bool {
        true
    }
}

/// Tag names, classes, ids and attribute names
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CssIdent(String);

impl From<&str> for CssIdent {
    fn from(value: &str) -> Self {
        CssIdent(value.to_string())
    }
}

impl ToCss for CssIdent {
    fn to_css<W>(&self, dest: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        cssparser::serialize_identifier(&self.0, dest)
    }
}

impl PrecomputedHash for CssIdent {
    fn precomputed_hash(&self) -> u32 {
        let mut hasher = DefaultHasher::new();
        self.0.hash(&mut hasher);
        hasher.finish() as u32
    }
}

/// Attribute values, e.g. `language-` in `[class*="language-"]`
#[derive(Debug, Clone, PartialEq, Eq)]
struct CssString(String);

impl From<&str> for CssString {
    fn from(value: &str) -> Self {
        CssString(value.to_string())
    }
}

impl AsRef<str> for CssString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl ToCss for CssString {
    fn to_css<W>(&self, dest: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        cssparser::serialize_string(&self.0, dest)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PseudoClass {}

impl parser::NonTSPseudoClass for PseudoClass {
    type Impl = TreeSelectors;

    fn is_active_or_hover(&self) -> bool {
        match *self {}
    }

    fn is_user_action_state(&self) -> bool {
        match *self {}
    }
}

impl ToCss for PseudoClass {
    fn to_css<W>(&self, _dest: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        match *self {}
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PseudoElement {}

impl parser::PseudoElement for PseudoElement {
    type Impl = TreeSelectors;
}

impl ToCss for PseudoElement {
    fn to_css<W>(&self, _dest: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        match *self {}
    }
}

/// An element node of a [Tree], as seen by the selector engine
#[derive(Clone, Copy)]
struct ElementRef<'a> {
    tree: &'a Tree,
    id: NodeId,
    element: &'a Element,
}

impl fmt::Debug for ElementRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementRef")
            .field("id", &self.id)
            .field("tag", &self.element.tag)
            .finish()
    }
}

impl<'a> ElementRef<'a> {
    fn new(tree: &'a Tree, id: NodeId) -> Option<ElementRef<'a>> {
        tree.element(id).map(|element| ElementRef { tree, id, element })
    }

    fn attribute(&self, name: &str) -> Option<&'a str> {
        self.element
            .attributes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// This element and its siblings, in order
    fn siblings(&self) -> &'a [NodeId] {
        self.tree
            .parent(self.id)
            .map(|parent| self.tree.children(parent))
            .unwrap_or_default()
    }

    fn position(&self) -> Option<usize> {
        self.siblings().iter().position(|&sibling| sibling == self.id)
    }
}

impl selectors::Element for ElementRef<'_> {
    type Impl = TreeSelectors;

    fn opaque(&self) -> OpaqueElement {
        OpaqueElement::new(self.tree.node(self.id))
    }

    fn parent_element(&self) -> Option<Self> {
        self.tree
            .parent(self.id)
            .and_then(|parent| ElementRef::new(self.tree, parent))
    }

    fn parent_node_is_shadow_root(&self) -> bool {
        false
    }

    fn containing_shadow_host(&self) -> Option<Self> {
        None
    }

    fn is_pseudo_element(&self) -> bool {
        false
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        let index = self.position()?;
        self.siblings()[..index]
            .iter()
            .rev()
            .find_map(|&sibling| ElementRef::new(self.tree, sibling))
    }

    fn next_sibling_element(&self) -> Option<Self> {
        let index = self.position()?;
        self.siblings()[index + 1..]
            .iter()
            .find_map(|&sibling| ElementRef::new(self.tree, sibling))
    }

    fn first_element_child(&self) -> Option<Self> {
        self.tree
            .children(self.id)
            .iter()
            .find_map(|&child| ElementRef::new(self.tree, child))
    }

    fn is_html_element_in_html_document(&self) -> bool {
        true
    }

    fn has_local_name(&self, local_name: &CssIdent) -> bool {
        self.element.tag.eq_ignore_ascii_case(&local_name.0)
    }

    fn has_namespace(&self, ns: &CssIdent) -> bool {
        ns.0.is_empty()
    }

    fn is_same_type(&self, other: &Self) -> bool {
        self.element.tag.eq_ignore_ascii_case(&other.element.tag)
    }

    fn attr_matches(
        &self,
        ns: &NamespaceConstraint<&CssIdent>,
        local_name: &CssIdent,
        operation: &AttrSelectorOperation<&CssString>,
    ) -> bool {
        if let NamespaceConstraint::Specific(url) = ns {
            if !url.0.is_empty() {
                return false;
            }
        }
        // classes are kept apart from the other attributes
        if local_name.0.eq_ignore_ascii_case("class") {
            return !self.element.classes.is_empty()
                && operation.eval_str(&self.element.classes.join(" "));
        }
        self.attribute(&local_name.0)
            .is_some_and(|value| operation.eval_str(value))
    }

    fn match_non_ts_pseudo_class(
        &self,
        pc: &PseudoClass,
        _context: &mut MatchingContext<'_, TreeSelectors>,
    ) -> bool {
        match *pc {}
    }

    fn match_pseudo_element(
        &self,
        pe: &PseudoElement,
        _context: &mut MatchingContext<'_, TreeSelectors>,
    ) -> bool {
        match *pe {}
    }

    fn apply_selector_flags(&self, _flags: ElementSelectorFlags) {}

    fn is_link(&self) -> bool {
        ["a", "area"]
            .iter()
            .any(|tag| self.element.tag.eq_ignore_ascii_case(tag))
            && self.attribute("href").is_some()
    }

    fn is_html_slot_element(&self) -> bool {
        false
    }

    fn has_id(&self, id: &CssIdent, case_sensitivity: CaseSensitivity) -> bool {
        self.attribute("id")
            .is_some_and(|value| case_sensitivity.eq(id.0.as_bytes(), value.as_bytes()))
    }

    fn has_class(&self, name: &CssIdent, case_sensitivity: CaseSensitivity) -> bool {
        self.element
            .classes
            .iter()
            .any(|class| case_sensitivity.eq(name.0.as_bytes(), class.as_bytes()))
    }

    fn has_custom_state(&self, _name: &CssIdent) -> bool {
        false
    }

    fn imported_part(&self, _name: &CssIdent) -> Option<CssIdent> {
        None
    }

    fn is_part(&self, _name: &CssIdent) -> bool {
        false
    }

    fn is_empty(&self) -> bool {
        self.tree
            .children(self.id)
            .iter()
            .all(|&child| self.tree.text(child).is_some_and(str::is_empty))
    }

    fn is_root(&self) -> bool {
        self.tree.parent(self.id) == Some(self.tree.root())
    }

    fn add_element_unique_hashes(&self, _filter: &mut BloomFilter) -> bool {
        false
    }
}
