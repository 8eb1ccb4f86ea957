use widgetscope_api::{DocumentRecord, ElementNode, WidgetCounts};

/// Counts widget occurrences within a single document's tree.
pub struct TreeCounter;

impl TreeCounter {
    /// Walks `nodes` depth-first in pre-order and returns, for every widget
    /// type found at any depth, the number of nodes of that type.
    ///
    /// Widgets are descended into like any other node.
    pub fn count(nodes: &[ElementNode]) -> WidgetCounts {
        let mut counts = WidgetCounts::new();
        let mut stack: Vec<&ElementNode> = nodes.iter().rev().collect();

        while let Some(node) = stack.pop() {
            if let Some(widget_type) = node.widget_type() {
                *counts.entry(widget_type.to_string()).or_insert(0) += 1;
            }
            stack.extend(node.children().iter().rev());
        }

        counts
    }

    /// Counts the widgets stored on a record. Undecodable trees count as empty.
    pub fn count_record(record: &DocumentRecord) -> WidgetCounts {
        Self::count(&crate::tree::parse_record_or_empty(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use widgetscope_api::RawTree;

    fn w(widget_type: &str, children: Vec<ElementNode>) -> ElementNode {
        ElementNode::widget(widget_type, children)
    }

    fn c(children: Vec<ElementNode>) -> ElementNode {
        ElementNode::container(children)
    }

    fn counts(pairs: &[(&str, usize)]) -> WidgetCounts {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_empty_tree_has_no_counts() {
        assert!(TreeCounter::count(&[]).is_empty());
    }

    #[test]
    fn test_widget_children_are_counted() {
        let tree = vec![w("A", vec![]), w("A", vec![]), w("B", vec![w("A", vec![])])];
        assert_eq!(TreeCounter::count(&tree), counts(&[("A", 3), ("B", 1)]));
    }

    #[test]
    fn test_containers_contribute_nothing_themselves() {
        let tree = vec![c(vec![c(vec![]), c(vec![w("heading", vec![])])])];
        assert_eq!(TreeCounter::count(&tree), counts(&[("heading", 1)]));
    }

    #[test]
    fn test_counts_are_invariant_under_renesting() {
        let flat = vec![w("A", vec![]), w("B", vec![w("A", vec![])]), c(vec![w("C", vec![])])];
        let nested = vec![c(vec![
            w("A", vec![]),
            c(vec![w("B", vec![c(vec![w("A", vec![])])])]),
            c(vec![c(vec![w("C", vec![])])]),
        ])];

        assert_eq!(TreeCounter::count(&flat), TreeCounter::count(&nested));
    }

    #[test]
    fn test_deep_tree_is_walked_without_recursion() {
        let mut node = w("leaf", vec![]);
        for depth in 0..2_000 {
            node = if depth % 2 == 0 {
                c(vec![node])
            } else {
                w("wrapper", vec![node])
            };
        }

        assert_eq!(
            TreeCounter::count(&[node]),
            counts(&[("leaf", 1), ("wrapper", 1_000)])
        );
    }

    #[test]
    fn test_count_record_tolerates_garbage() {
        let record = DocumentRecord::new(9, Some(RawTree::Serialized("not json".to_string())));
        assert!(TreeCounter::count_record(&record).is_empty());

        let record = DocumentRecord::new(
            10,
            Some(RawTree::Serialized(
                r#"[{"elType":"widget","widgetType":"A","elements":[{"elType":"widget","widgetType":"A"}]}]"#
                    .to_string(),
            )),
        );
        assert_eq!(TreeCounter::count_record(&record), counts(&[("A", 2)]));
    }

    #[test]
    fn test_count_record_with_deeply_nested_sections() {
        let depth = 150;
        let mut text = String::new();
        for _ in 0..depth {
            text.push_str(r#"[{"elType":"section","elements":"#);
        }
        text.push_str(r#"[{"elType":"widget","widgetType":"A"}]"#);
        for _ in 0..depth {
            text.push_str("}]");
        }

        let record = DocumentRecord::new(11, Some(RawTree::Serialized(text)));
        assert_eq!(TreeCounter::count_record(&record), counts(&[("A", 1)]));
    }
}
