//! Tokenizer and tree builder for the parenthesized library-table syntax.
//!
//! A line such as
//!
//! ```text
//! (lib (name Audio_Module)(type Github)(uri ${KIGITHUB}/Audio_Module.pretty)(options "")(descr "Audio Module footprints"))
//! ```
//!
//! is split into [`Token`]s and then folded into nested [`Node`]s. Table
//! entries share lines with the table's own open and close parens, so
//! [`build`] balances each line on its own. Only an unterminated string
//! makes a line unreadable.

/// A lexical token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `(`
    Open,
    /// `)`
    Close,
    /// A bare word, e.g. `lib` or `${KIGITHUB}/Foo.pretty`.
    Atom(String),
    /// A double-quoted string with escapes resolved.
    Quoted(String),
}

/// A parsed form: either a leaf value or a parenthesized list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Bare word or quoted string.
    Value(String),
    /// Parenthesized children.
    List(Vec<Node>),
}

impl Node {
    /// The leaf text, if this is a value.
    #[must_use]
    pub fn as_value(&self) -> Option<&str> {
        match self {
            Self::Value(v) => Some(v),
            Self::List(_) => None,
        }
    }

    /// The child nodes, if this is a list.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items),
            Self::Value(_) => None,
        }
    }

    /// The leading value of a list form, e.g. `lib` for `(lib ...)`.
    #[must_use]
    pub fn head(&self) -> Option<&str> {
        self.as_list()?.first()?.as_value()
    }
}

/// Split `line` into tokens.
///
/// Returns `None` on an unterminated quoted string.
#[must_use]
pub fn tokenize(line: &str) -> Option<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            '(' => {
                chars.next();
                tokens.push(Token::Open);
            }
            ')' => {
                chars.next();
                tokens.push(Token::Close);
            }
            '"' => {
                chars.next();
                let mut text = String::new();
                let mut closed = false;
                while let Some(ch) = chars.next() {
                    match ch {
                        '"' => {
                            closed = true;
                            break;
                        }
                        '\\' => text.push(chars.next()?),
                        other => text.push(other),
                    }
                }
                if !closed {
                    return None;
                }
                tokens.push(Token::Quoted(text));
            }
            c if c.is_whitespace() => {
                chars.next();
            }
            _ => {
                let mut text = String::new();
                while let Some(&ch) = chars.peek() {
                    if ch.is_whitespace() || ch == '(' || ch == ')' || ch == '"' {
                        break;
                    }
                    text.push(ch);
                    chars.next();
                }
                tokens.push(Token::Atom(text));
            }
        }
    }

    Some(tokens)
}

/// Fold a token stream into top-level nodes.
///
/// A `)` with no open list is dropped and lists still open at the end of
/// the stream are closed there.
#[must_use]
pub fn build(tokens: Vec<Token>) -> Vec<Node> {
    let mut open: Vec<Vec<Node>> = Vec::new();
    let mut top = Vec::new();

    for token in tokens {
        match token {
            Token::Open => open.push(Vec::new()),
            Token::Close => {
                if let Some(children) = open.pop() {
                    push(&mut open, &mut top, Node::List(children));
                }
            }
            Token::Atom(text) | Token::Quoted(text) => {
                push(&mut open, &mut top, Node::Value(text));
            }
        }
    }

    while let Some(children) = open.pop() {
        push(&mut open, &mut top, Node::List(children));
    }
    top
}

fn push(open: &mut [Vec<Node>], top: &mut Vec<Node>, node: Node) {
    match open.last_mut() {
        Some(list) => list.push(node),
        None => top.push(node),
    }
}
