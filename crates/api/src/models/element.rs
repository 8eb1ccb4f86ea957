/// One node of a document's structural tree.
///
/// Widgets may carry children of their own; consumers that walk the tree
/// must descend into them as well.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementNode {
    Widget {
        widget_type: String,
        children: Vec<ElementNode>,
    },
    Container {
        children: Vec<ElementNode>,
    },
}

/// A document's root sequence of nodes.
pub type ElementTree = Vec<ElementNode>;

impl ElementNode {
    pub fn widget(widget_type: impl Into<String>, children: Vec<ElementNode>) -> Self {
        ElementNode::Widget {
            widget_type: widget_type.into(),
            children,
        }
    }

    pub fn container(children: Vec<ElementNode>) -> Self {
        ElementNode::Container { children }
    }

    pub fn widget_type(&self) -> Option<&str> {
        match self {
            ElementNode::Widget { widget_type, .. } => Some(widget_type),
            ElementNode::Container { .. } => None,
        }
    }

    pub fn children(&self) -> &[ElementNode] {
        match self {
            ElementNode::Widget { children, .. } | ElementNode::Container { children } => children,
        }
    }

    pub fn is_widget(&self) -> bool {
        matches!(self, ElementNode::Widget { .. })
    }
}
