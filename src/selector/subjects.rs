use crate::selector::ast::{Selector, SelectorKind};

/// Resolve the subject-marked parts of `selector`.
///
/// Each entry is the selector fragment a reported node must match: a marked
/// node reports its enclosing scope, and a scope is re-opened only at the
/// `left` side of a combinator (which names a different structural position
/// than the node the whole selector is tested on). Order is depth-first,
/// a node before its children, `left` before `right`.
///
/// An empty result means "report the node the whole selector matched".
pub fn subjects(selector: &Selector) -> Vec<&Selector> {
    collect(selector, selector, Vec::new())
}

fn collect<'s>(selector: &'s Selector, scope: &'s Selector, mut acc: Vec<&'s Selector>) -> Vec<&'s Selector> {
    if selector.subject {
        acc.push(scope);
    }

    match &selector.kind {
        SelectorKind::Child { left, right }
        | SelectorKind::Descendant { left, right }
        | SelectorKind::Sibling { left, right }
        | SelectorKind::Adjacent { left, right } => {
            let acc = collect(left, left, acc);
            collect(right, scope, acc)
        }
        SelectorKind::Matches { selectors }
        | SelectorKind::Compound { selectors }
        | SelectorKind::Not { selectors } => selectors
            .iter()
            .fold(acc, |acc, inner| collect(inner, scope, acc)),
        SelectorKind::NthChild {
            right: Some(right), ..
        }
        | SelectorKind::NthLastChild {
            right: Some(right), ..
        } => collect(right, scope, acc),
        SelectorKind::NthChild { right: None, .. }
        | SelectorKind::NthLastChild { right: None, .. }
        | SelectorKind::Wildcard
        | SelectorKind::Identifier { .. }
        | SelectorKind::Field { .. }
        | SelectorKind::Attribute { .. } => acc,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_markers_means_no_subjects() {
        let sel = Selector::child(Selector::identifier("A"), Selector::identifier("B"));
        assert!(subjects(&sel).is_empty());
    }

    #[test]
    fn marked_left_reports_itself() {
        let sel = Selector::child(Selector::identifier("A").subject(), Selector::identifier("B"));
        let found = subjects(&sel);
        assert_eq!(found, vec![&Selector::identifier("A").subject()]);
    }

    #[test]
    fn marked_right_reports_enclosing_scope() {
        let sel = Selector::child(Selector::identifier("A"), Selector::identifier("B").subject());
        let found = subjects(&sel);
        assert_eq!(found.len(), 1);
        assert!(std::ptr::eq(found[0], &sel));
    }

    #[test]
    fn compound_members_inherit_scope() {
        let inner = Selector::compound(vec![
            Selector::identifier("X").subject(),
            Selector::has_attribute("name"),
        ]);
        let sel = Selector::descendant(inner, Selector::identifier("Y"));
        let found = subjects(&sel);

        let SelectorKind::Descendant { left, .. } = &sel.kind else {
            unreachable!()
        };
        assert_eq!(found.len(), 1);
        assert!(std::ptr::eq(found[0], left.as_ref()));
    }

    #[test]
    fn nested_left_branches_rebind_scope() {
        // (X! > Y!) Z
        let left = Selector::child(
            Selector::identifier("X").subject(),
            Selector::identifier("Y").subject(),
        );
        let sel = Selector::descendant(left, Selector::identifier("Z"));
        let found = subjects(&sel);

        let SelectorKind::Descendant { left, .. } = &sel.kind else {
            unreachable!()
        };
        let SelectorKind::Child { left: x, .. } = &left.kind else {
            unreachable!()
        };
        assert_eq!(found.len(), 2);
        assert!(std::ptr::eq(found[0], x.as_ref()));
        assert!(std::ptr::eq(found[1], left.as_ref()));
    }

    #[test]
    fn self_marker_precedes_children() {
        let sel = Selector::child(Selector::identifier("A").subject(), Selector::wildcard()).subject();
        let found = subjects(&sel);
        assert_eq!(found.len(), 2);
        assert!(std::ptr::eq(found[0], &sel));
    }
}
