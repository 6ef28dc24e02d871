use std::collections::HashMap;

/// Subscription patterns over `/`-separated view paths.
///
/// `+` stands for exactly one segment, `#` for the rest of the path
/// including nothing at all. `#` is only meaningful as the last segment;
/// anything after it is ignored.
pub struct PatternTrie<T> {
    root: Node<T>,
}

struct Node<T> {
    literal: HashMap<String, Node<T>>,
    one: Option<Box<Node<T>>>,
    rest: Vec<T>,
    here: Vec<T>,
}

impl<T> Default for Node<T> {
    fn default() -> Self {
        Self {
            literal: HashMap::new(),
            one: None,
            rest: Vec::new(),
            here: Vec::new(),
        }
    }
}

impl<T> PatternTrie<T> {
    pub fn new() -> Self {
        Self {
            root: Node::default(),
        }
    }

    pub fn insert(&mut self, pattern: &str, value: T) {
        let mut node = &mut self.root;
        for segment in pattern.split('/') {
            match segment {
                "#" => {
                    node.rest.push(value);
                    return;
                }
                "+" => node = &mut **node.one.get_or_insert_with(Box::default),
                lit => node = node.literal.entry(lit.to_string()).or_default(),
            }
        }
        node.here.push(value);
    }

    /// Every value whose pattern matches the concrete `path`.
    pub fn matches(&self, path: &str) -> Vec<&T> {
        let segments: Vec<&str> = path.split('/').collect();
        let mut out = Vec::new();
        self.root.collect(&segments, &mut out);
        out
    }

    /// Drop values stored under exactly `pattern` for which `pred` holds.
    /// Returns how many were dropped.
    pub fn remove(&mut self, pattern: &str, pred: impl Fn(&T) -> bool) -> usize {
        let mut node = &mut self.root;
        for segment in pattern.split('/') {
            let next = match segment {
                "#" => return drain(&mut node.rest, &pred),
                "+" => node.one.as_deref_mut(),
                lit => node.literal.get_mut(lit),
            };
            match next {
                Some(n) => node = n,
                None => return 0,
            }
        }
        drain(&mut node.here, &pred)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}

impl<T> Default for PatternTrie<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Node<T> {
    fn collect<'a>(&'a self, segments: &[&str], out: &mut Vec<&'a T>) {
        out.extend(self.rest.iter());
        let Some((first, tail)) = segments.split_first() else {
            out.extend(self.here.iter());
            return;
        };
        if let Some(child) = self.literal.get(*first) {
            child.collect(tail, out);
        }
        if let Some(child) = &self.one {
            child.collect(tail, out);
        }
    }

    fn is_empty(&self) -> bool {
        self.here.is_empty()
            && self.rest.is_empty()
            && self.one.as_ref().is_none_or(|n| n.is_empty())
            && self.literal.values().all(Node::is_empty)
    }
}

fn drain<T>(values: &mut Vec<T>, pred: &impl Fn(&T) -> bool) -> usize {
    let before = values.len();
    values.retain(|v| !pred(v));
    before - values.len()
}
