use canon_model::ClassId;
use thiserror::Error;

/// A fatal inconsistency in the class graph. Aborts the affected class only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    #[error("inheritance cycle while analysing {class}: {}", render_path(.path))]
    InheritanceCycle { class: ClassId, path: Vec<ClassId> },
    #[error("enclosing-type cycle while analysing {class}: {}", render_path(.path))]
    EnclosingCycle { class: ClassId, path: Vec<ClassId> },
    #[error("unknown class {0}")]
    UnknownClass(ClassId),
}

impl StructuralError {
    /// The class whose analysis was aborted.
    pub fn class(&self) -> ClassId {
        match self {
            StructuralError::InheritanceCycle { class, .. }
            | StructuralError::EnclosingCycle { class, .. }
            | StructuralError::UnknownClass(class) => *class,
        }
    }
}

fn render_path(path: &[ClassId]) -> String {
    path.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_message_lists_the_path() {
        let err = StructuralError::InheritanceCycle {
            class: ClassId::new(1),
            path: vec![ClassId::new(1), ClassId::new(2), ClassId::new(1)],
        };
        assert_eq!(
            err.to_string(),
            "inheritance cycle while analysing class#1: class#1 -> class#2 -> class#1"
        );
        assert_eq!(err.class(), ClassId::new(1));
    }
}
