use crate::types::TypeInfo;

/// Identifier naming "a kind of value to produce".
///
/// A token is either a plain Rust type or a parameterized container
/// pseudo-type. Distinct parameterizations are distinct tokens:
/// `List[A]`, `Tuple[A]` and `List[B]` never collide in the registry or the
/// plan cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    Type(TypeInfo),
    List(Box<Token>),
    Tuple(Box<Token>),
    Set(Box<Token>),
}

/// Container shape a sequence injection builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceKind {
    List,
    Tuple,
    Set,
}

impl Token {
    /// Token for a plain type, including unsized trait objects.
    pub fn of<T: 'static + ?Sized>() -> Token {
        Token::Type(TypeInfo::of::<T>())
    }

    pub fn list_of(element: Token) -> Token {
        Token::List(Box::new(element))
    }

    pub fn tuple_of(element: Token) -> Token {
        Token::Tuple(Box::new(element))
    }

    pub fn set_of(element: Token) -> Token {
        Token::Set(Box::new(element))
    }

    /// Container shape this token describes, if it is a sequence token.
    pub(crate) fn sequence_kind(&self) -> Option<SequenceKind> {
        match self {
            Token::Type(_) => None,
            Token::List(_) => Some(SequenceKind::List),
            Token::Tuple(_) => Some(SequenceKind::Tuple),
            Token::Set(_) => Some(SequenceKind::Set),
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Type(info) => write!(f, "{info}"),
            Token::List(element) => write!(f, "List[{element}]"),
            Token::Tuple(element) => write!(f, "Tuple[{element}]"),
            Token::Set(element) => write!(f, "Set[{element}]"),
        }
    }
}
