//!
//! Declarative matching of namespaced XML element paths
//!
use std::fmt;

use log::trace;
use roxmltree::Node;

use crate::{error::InkError, namespace::Namespaces};

/// Element name with an optional namespace prefix, e.g. `dd:MarkerColor`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QName {
    prefix: Option<String>,
    local: String,
}

impl QName {
    /// Create a name from its parts
    pub fn new<S: AsRef<str>>(prefix: Option<S>, local: S) -> QName {
        QName {
            prefix: prefix.map(|p| p.as_ref().to_owned()),
            local: local.as_ref().to_owned(),
        }
    }

    /// Namespace prefix
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Local element name
    pub fn local(&self) -> &str {
        &self.local
    }

    fn matches(&self, node: &Node, uri: Option<&str>) -> bool {
        let tag = node.tag_name();
        tag.name() == self.local && tag.namespace() == uri
    }
}

impl From<&str> for QName {
    fn from(s: &str) -> Self {
        match s.split_once(':') {
            Some((prefix, local)) => QName::new(Some(prefix), local),
            None => QName::new(None, s),
        }
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.prefix {
            Some(ref prefix) => write!(f, "{}:{}", prefix, self.local),
            None => write!(f, "{}", self.local),
        }
    }
}

type Callback<T> = Box<dyn Fn(Node<'_, '_>, &Namespaces) -> Result<T, InkError>>;

enum Behaviour<T> {
    Leaf(Callback<T>),
    Branch(Vec<TagMatcher<T>>),
}

/// One step of a declarative element path.
///
/// A leaf matcher hands every matching element to its callback. A branch matcher applies each of its
/// child matchers to every matching element.
pub struct TagMatcher<T> {
    name: QName,
    behaviour: Behaviour<T>,
}

impl<T> TagMatcher<T> {
    /// Create a leaf matcher invoking `callback` for each matching element
    pub fn leaf<N, F>(name: N, callback: F) -> Self
    where
        N: Into<QName>,
        F: Fn(Node<'_, '_>, &Namespaces) -> Result<T, InkError> + 'static,
    {
        TagMatcher {
            name: name.into(),
            behaviour: Behaviour::Leaf(Box::new(callback)),
        }
    }

    /// Create a branch matcher descending into `children` for each matching element
    pub fn branch<N, I>(name: N, children: I) -> Self
    where
        N: Into<QName>,
        I: IntoIterator<Item = TagMatcher<T>>,
    {
        TagMatcher {
            name: name.into(),
            behaviour: Behaviour::Branch(children.into_iter().collect()),
        }
    }

    /// Match the direct element children of `node` and collect leaf results in document order
    pub fn search(&self, node: Node<'_, '_>, namespaces: &Namespaces) -> Result<Vec<T>, InkError> {
        let uri = match self.name.prefix() {
            Some(prefix) => Some(namespaces.resolve(prefix)?),
            None => None,
        };

        let mut results = Vec::new();

        for element in node.children().filter(|n| n.is_element() && self.name.matches(n, uri)) {
            trace!("Matched element: {}", self.name);
            match self.behaviour {
                Behaviour::Leaf(ref callback) => results.push(callback(element, namespaces)?),
                Behaviour::Branch(ref children) => {
                    for child in children {
                        results.extend(child.search(element, namespaces)?);
                    }
                }
            }
        }
        Ok(results)
    }

    /// Return the first result, failing if nothing matched
    pub fn first(&self, node: Node<'_, '_>, namespaces: &Namespaces) -> Result<T, InkError> {
        self.search(node, namespaces)?
            .into_iter()
            .next()
            .ok_or_else(|| InkError::MissingElement(self.name.to_string()))
    }
}

impl TagMatcher<String> {
    /// Leaf matcher yielding the trimmed text of each matching element
    pub fn text<N: Into<QName>>(name: N) -> Self {
        TagMatcher::leaf(name, |node, _| {
            Ok(node.text().map(str::trim).unwrap_or_default().to_owned())
        })
    }
}
