use std::collections::{BTreeSet, HashMap, VecDeque};

/// Every uuid reachable from `target` by following parent → child links
///
/// `links` yields `(uuid, parent_uuid)` pairs in any order. The result always
/// contains `target` itself. Traversal uses an explicit worklist and a visited
/// set, so deep chains cannot overflow the stack and cycles terminate.
///
/// # Examples
///
/// ```
/// use claude_conversations::rewind::descendant_closure;
///
/// let links = [("b", Some("a")), ("a", None), ("c", Some("b")), ("x", Some("a")), ("y", None)];
/// let closure = descendant_closure(links, "b");
/// assert_eq!(closure.into_iter().collect::<Vec<_>>(), vec!["b", "c"]);
/// ```
pub fn descendant_closure<'a, I>(links: I, target: &str) -> BTreeSet<String>
where
    I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
{
    let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
    for (uuid, parent) in links {
        if let Some(parent) = parent {
            children.entry(parent).or_default().push(uuid);
        }
    }

    let mut closure = BTreeSet::new();
    closure.insert(target.to_string());
    let mut queue = VecDeque::from([target]);

    while let Some(current) = queue.pop_front() {
        for &child in children.get(current).into_iter().flatten() {
            if closure.insert(child.to_string()) {
                queue.push_back(child);
            }
        }
    }

    closure
}
