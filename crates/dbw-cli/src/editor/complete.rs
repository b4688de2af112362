//! Prefix completion over the console's verb tree.

/// A completion node: a word and the words that may follow it.
#[derive(Debug, Clone)]
pub struct Item {
    pub word: &'static str,
    pub children: Vec<Item>,
}

fn item(word: &'static str) -> Item {
    Item {
        word,
        children: Vec::new(),
    }
}

/// Verb tree offered on Tab.
pub fn console_tree() -> Vec<Item> {
    vec![
        Item {
            word: "mode",
            children: vec![item("vi"), item("emacs")],
        },
        item("balance"),
        item("address"),
        item("bye"),
        item("exit"),
        item("quit"),
        item("help"),
        item("transfer"),
        item("bridge"),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    None,
    /// Text to insert at the cursor.
    Insert(String),
    /// Several words match and share no longer prefix.
    Ambiguous(Vec<&'static str>),
}

fn common_prefix(words: &[&str]) -> String {
    let Some(first) = words.first() else {
        return String::new();
    };
    let mut len = first.len();
    for w in &words[1..] {
        len = first
            .bytes()
            .zip(w.bytes())
            .take(len)
            .take_while(|(a, b)| a == b)
            .count();
    }
    first[..len].to_string()
}

/// Complete `head` (the text before the cursor) against `tree`.
pub fn complete(tree: &[Item], head: &str) -> Completion {
    let ends_with_space = head.ends_with(char::is_whitespace);
    let mut words: Vec<&str> = head.split_whitespace().collect();
    let partial = if ends_with_space {
        ""
    } else {
        words.pop().unwrap_or("")
    };

    // Walk the tree along the already completed words.
    let mut level = tree;
    for w in &words {
        match level.iter().find(|i| i.word == *w) {
            Some(node) => level = &node.children,
            None => return Completion::None,
        }
    }

    let matches: Vec<&'static str> = level
        .iter()
        .map(|i| i.word)
        .filter(|w| w.starts_with(partial))
        .collect();

    match matches.as_slice() {
        [] => Completion::None,
        [only] => Completion::Insert(format!("{} ", &only[partial.len()..])),
        many => {
            let prefix = common_prefix(many);
            if prefix.len() > partial.len() {
                Completion::Insert(prefix[partial.len()..].to_string())
            } else {
                Completion::Ambiguous(many.to_vec())
            }
        }
    }
}
