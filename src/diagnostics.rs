//! Symbolic optic descriptions and failure-trace rendering.
//!
//! Every optic can describe itself as a [`Description`]. Descriptions are
//! only built when something goes wrong (or when a `trace`-level event is
//! enabled), so they cost nothing on the success path.
//!
//! When an error crosses a composition boundary the engine records the
//! description of the sub-optic it came from. [`render_trace`] turns those
//! frames into a readable path, innermost first.
//!
//! # Examples
//!
//! ```
//! use lambars_optics::diagnostics::Description;
//!
//! let path = Description::compose(
//!     Description::leaf("Field(items)"),
//!     Description::compose(Description::leaf("Traverse"), Description::leaf("Index(0)")),
//! );
//! assert_eq!(path.to_string(), "Compose(Field(items), Traverse, Index(0))");
//! assert_eq!(path.leaves().len(), 3);
//! ```

use std::borrow::Cow;
use std::fmt::{self, Write as _};

use smallvec::SmallVec;

use crate::error::OpticError;

/// Symbolic description of an optic, used only for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Description {
    /// The identity optic. Never appears in a trace.
    Identity,
    /// A leaf optic such as `Traverse` or `Index(0)`.
    Leaf(Cow<'static, str>),
    /// A flattened chain of composed optics, outermost first.
    Compose(Vec<Description>),
    /// A combinator wrapping other optics, e.g. `Catch(Traverse)`.
    ///
    /// Combinators are transparent in traces: only their operands' leaves
    /// are reported.
    Combinator {
        /// Name of the combinator.
        name: Cow<'static, str>,
        /// Descriptions of the wrapped optics.
        operands: Vec<Description>,
    },
}

impl Description {
    /// Creates a leaf description.
    #[must_use]
    pub fn leaf(name: impl Into<Cow<'static, str>>) -> Self {
        Self::Leaf(name.into())
    }

    /// Creates a combinator description.
    #[must_use]
    pub fn combinator(name: impl Into<Cow<'static, str>>, operands: Vec<Self>) -> Self {
        Self::Combinator {
            name: name.into(),
            operands,
        }
    }

    /// Describes `left ∘ right`, flattening nested chains and dropping
    /// identities.
    #[must_use]
    pub fn compose(left: Self, right: Self) -> Self {
        let mut parts = Vec::new();
        for part in [left, right] {
            match part {
                Self::Identity => {}
                Self::Compose(inner) => parts.extend(inner),
                other => parts.push(other),
            }
        }
        match parts.len() {
            0 => Self::Identity,
            1 => parts.pop().unwrap_or(Self::Identity),
            _ => Self::Compose(parts),
        }
    }

    /// Returns `true` for [`Description::Leaf`].
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    /// Returns the leaf descriptions in outermost-first order.
    #[must_use]
    pub fn leaves(&self) -> SmallVec<[&Self; 4]> {
        let mut leaves = SmallVec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, leaves: &mut SmallVec<[&'a Self; 4]>) {
        match self {
            Self::Identity => {}
            Self::Leaf(_) => leaves.push(self),
            Self::Compose(parts) => parts.iter().for_each(|part| part.collect_leaves(leaves)),
            Self::Combinator { operands, .. } => operands
                .iter()
                .for_each(|operand| operand.collect_leaves(leaves)),
        }
    }
}

fn write_list(formatter: &mut fmt::Formatter<'_>, parts: &[Description]) -> fmt::Result {
    for (position, part) in parts.iter().enumerate() {
        if position > 0 {
            formatter.write_str(", ")?;
        }
        write!(formatter, "{part}")?;
    }
    Ok(())
}

impl fmt::Display for Description {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identity => formatter.write_str("Identity"),
            Self::Leaf(name) => formatter.write_str(name),
            Self::Compose(parts) => {
                formatter.write_str("Compose(")?;
                write_list(formatter, parts)?;
                formatter.write_char(')')
            }
            Self::Combinator { name, operands } => {
                write!(formatter, "{name}(")?;
                write_list(formatter, operands)?;
                formatter.write_char(')')
            }
        }
    }
}

/// Renders an error and its optic path, innermost frame first.
///
/// # Examples
///
/// ```
/// use lambars_optics::diagnostics::{render_trace, Description};
/// use lambars_optics::OpticError;
///
/// let error = OpticError::empty_get()
///     .with_frame(Description::leaf("Index(3)"))
///     .with_frame(Description::leaf("Field(items)"));
///
/// assert_eq!(
///     render_trace(&error),
///     "no focus found for single-focus get\n  at Index(3)\n  at Field(items)"
/// );
/// ```
#[must_use]
pub fn render_trace(error: &OpticError) -> String {
    let mut rendered = error.summary();
    for frame in error.trace() {
        // Writing into a String cannot fail.
        let _ = write!(rendered, "\n  at {frame}");
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_drops_identity() {
        let description = Description::compose(Description::Identity, Description::leaf("Traverse"));
        assert_eq!(description, Description::leaf("Traverse"));
    }

    #[test]
    fn test_compose_of_identities_is_identity() {
        let description = Description::compose(Description::Identity, Description::Identity);
        assert_eq!(description, Description::Identity);
    }

    #[test]
    fn test_compose_flattens_both_sides() {
        let left = Description::compose(Description::leaf("A"), Description::leaf("B"));
        let right = Description::compose(Description::leaf("C"), Description::leaf("D"));
        let description = Description::compose(left, right);
        assert_eq!(description.to_string(), "Compose(A, B, C, D)");
    }

    #[test]
    fn test_combinator_is_transparent_for_leaves() {
        let description = Description::combinator(
            "Catch",
            vec![Description::compose(
                Description::leaf("Traverse"),
                Description::leaf("Parse"),
            )],
        );
        let names: Vec<String> = description
            .leaves()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(names, vec!["Traverse", "Parse"]);
        assert!(!description.is_leaf());
        assert_eq!(description.to_string(), "Catch(Compose(Traverse, Parse))");
    }

    #[test]
    fn test_render_trace_without_frames() {
        assert_eq!(
            render_trace(&OpticError::empty_get()),
            "no focus found for single-focus get"
        );
    }
}
