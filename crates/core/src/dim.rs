use std::fmt;

/// A dimension of a statically declared tensor shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Dimension {
    Fixed(usize),
    Dynamic(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Dimensions(pub Vec<Dimension>);

impl Dimensions {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Dimension] {
        self.0.as_slice()
    }
}

impl From<Vec<Dimension>> for Dimensions {
    fn from(v: Vec<Dimension>) -> Dimensions {
        Dimensions(v)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Fixed(n) => write!(f, "{n}"),
            Dimension::Dynamic(s) if s.is_empty() => write!(f, "?"),
            Dimension::Dynamic(s) => write!(f, "{s}"),
        }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, d) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{d}")?;
        }
        write!(f, "]")
    }
}

#[test]
fn display_mixed_dims() {
    let dims = Dimensions(vec![
        Dimension::Dynamic("batch".into()),
        Dimension::Fixed(3),
        Dimension::Fixed(224),
    ]);
    assert_eq!(dims.to_string(), "[batch, 3, 224]");
    assert_eq!(
        Dimensions(vec![Dimension::Dynamic(String::new()), Dimension::Fixed(1)]).to_string(),
        "[?, 1]"
    );
}
