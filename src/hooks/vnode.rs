use std::collections::BTreeMap;

use crate::hooks::compose::{Completion, HookSlot, Hooks};

/// Bindable property bag of an element: attributes and lifecycle hooks.
#[derive(Clone, Debug)]
pub struct Props<N> {
    /// Attributes copied onto the node (`id`, ...).
    pub attrs: BTreeMap<String, String>,
    /// Lifecycle handlers.
    pub hooks: Hooks<N>,
}

impl<N> Default for Props<N> {
    fn default() -> Self {
        Self {
            attrs: BTreeMap::new(),
            hooks: Hooks::default(),
        }
    }
}

/// Virtual node handed to the rendering framework.
///
/// `N` is the host's node handle, the argument lifecycle handlers receive. Text nodes carry no
/// [`Props`] and therefore cannot be bound.
#[derive(Clone, Debug)]
pub struct VNode<N> {
    /// Element tag, `#text` for text nodes.
    pub tag: String,
    /// Reconciliation key.
    pub key: Option<String>,
    /// Text content of a text node.
    pub text: Option<String>,
    /// Property bag; `None` for text nodes.
    pub props: Option<Props<N>>,
    /// Child nodes in document order.
    pub children: Vec<VNode<N>>,
}

/// Tag used for text nodes.
pub const TEXT_TAG: &str = "#text";

impl<N: 'static> VNode<N> {
    /// Element with an empty property bag.
    pub fn element(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            key: None,
            text: None,
            props: Some(Props::default()),
            children: Vec::new(),
        }
    }

    /// Text node.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            tag: TEXT_TAG.to_owned(),
            key: None,
            text: Some(text.into()),
            props: None,
            children: Vec::new(),
        }
    }

    /// Set the reconciliation key.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Set an attribute. Ignored on text nodes.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if let Some(props) = self.props.as_mut() {
            props.attrs.insert(name.into(), value.into());
        }
        self
    }

    /// Shorthand for `attr("id", ..)`.
    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    /// Append a child.
    pub fn child(mut self, child: VNode<N>) -> Self {
        self.children.push(child);
        self
    }

    /// Append children.
    pub fn children(mut self, children: impl IntoIterator<Item = VNode<N>>) -> Self {
        self.children.extend(children);
        self
    }

    /// Register an application hook. Ignored on text nodes.
    pub fn on(mut self, slot: HookSlot, f: impl Fn(&N, &Completion) + 'static) -> Self {
        if let Some(props) = self.props.take() {
            self.props = Some(Props {
                attrs: props.attrs,
                hooks: props.hooks.on(slot, f),
            });
        }
        self
    }

    /// `true` when the node has a property bag hooks can be installed into.
    pub fn is_bindable(&self) -> bool {
        self.props.is_some()
    }

    /// Hook table, if any.
    pub fn hooks(&self) -> Option<&Hooks<N>> {
        self.props.as_ref().map(|p| &p.hooks)
    }

    /// Mutable hook table, if any.
    pub fn hooks_mut(&mut self) -> Option<&mut Hooks<N>> {
        self.props.as_mut().map(|p| &mut p.hooks)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/hooks/vnode.rs"]
mod tests;
