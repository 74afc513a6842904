//! Positional pairing of two optics over one source.

use std::collections::VecDeque;

use crate::capability::{Many, Mutability, Purity, Uni};
use crate::compose::left_failure as operand_failure;
use crate::context::Context;
use crate::diagnostics::Description;
use crate::error::{OpticError, OpticResult};
use crate::optic::{FocusRecord, MapFn, Modifier, Optic, Record, kind};
use crate::sequence::{Flow, Pull, Sink};

/// Positional pairing of two optics over the same source.
///
/// The `k`-th focus of the left optic is paired with the `k`-th focus of
/// the right one; the sequence ends with the shorter side. The right
/// operand is pulled at most as many times as the left has foci, so
/// `iterate` and `length` only need the left operand to be finite.
///
/// `modify` hands each pair to the map function and writes the halves back
/// through each operand. Foci past the shorter side are left unchanged.
/// Writing back visits every focus of both operands; the context is checked
/// before each of them.
///
/// # Examples
///
/// ```
/// use lambars_optics::prelude::*;
/// use lambars_optics::combinators::zip;
///
/// let names = lens!(Table, names).compose(VecTraversal::<String>::new());
/// let scores = lens!(Table, scores).compose(VecTraversal::<u32>::new());
/// let pairs = zip(names, scores);
///
/// #[derive(Clone)]
/// struct Table { names: Vec<String>, scores: Vec<u32> }
///
/// let table = Table {
///     names: vec!["ada".into(), "bob".into(), "cy".into()],
///     scores: vec![3, 1, 4, 1],
/// };
/// let context = Context::background();
/// assert_eq!(pairs.length(&context, &table).unwrap(), 3);
/// assert_eq!(pairs.foci(&context, &table).unwrap()[1], ("bob".to_string(), 1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Zip<L, R> {
    left: L,
    right: R,
}

impl<L, R> Zip<L, R> {
    /// Pairs `left` and `right`.
    pub const fn new(left: L, right: R) -> Self {
        Self { left, right }
    }
}

impl<L, R> Zip<L, R>
where
    L: Optic,
    R: Optic<Source = L::Source>,
{
    /// The first `bound` records of the right operand.
    fn right_prefix(
        &self,
        context: &Context,
        source: &L::Source,
        bound: usize,
    ) -> Pull<Record<R::Index, R::Focus>> {
        Pull::bounded(|inner| self.right.iterate(context, source, inner), bound)
    }

    /// The first `bound` foci of the right operand, failing at its first
    /// error record or contract violation.
    fn right_foci(
        &self,
        context: &Context,
        source: &L::Source,
        bound: usize,
    ) -> OpticResult<Vec<FocusRecord<R::Index, R::Focus>>> {
        let pulled = self.right_prefix(context, source, bound);
        if let Some(violation) = pulled.violation() {
            return Err(OpticError::from(violation));
        }
        pulled
            .map(|record| record.map_err(|error| operand_failure(context, &self.right, error)))
            .collect()
    }
}

impl<L, R> Optic for Zip<L, R>
where
    L: Optic,
    R: Optic<Source = L::Source>,
{
    type Index = (L::Index, R::Index);
    type Source = L::Source;
    type Target = L::Target;
    type Focus = (L::Focus, R::Focus);
    type Replacement = (L::Replacement, R::Replacement);
    type Cardinality = Many;
    type Mutability = <L::Mutability as Mutability>::Join<R::Mutability>;
    type Direction = Uni;
    type Purity = <L::Purity as Purity>::Join<R::Purity>;
    type Kind = kind::Regular;

    fn describe(&self) -> Description {
        Description::combinator("Zip", vec![self.left.describe(), self.right.describe()])
    }

    fn iterate(
        &self,
        context: &Context,
        source: &L::Source,
        sink: &mut Sink<'_, Record<Self::Index, Self::Focus>>,
    ) -> Flow {
        let bound = match self.left.length(context, source) {
            Ok(bound) => bound,
            Err(error) => return sink.push(Err(operand_failure(context, &self.left, error))),
        };
        let mut pulled = self.right_prefix(context, source, bound);
        if let Some(violation) = pulled.violation() {
            sink.absorb(violation);
        }
        sink.nest(
            |inner| self.left.iterate(context, source, inner),
            |outer, left| {
                let Some(right) = pulled.next() else {
                    return Flow::Stop;
                };
                let paired = match (left, right) {
                    (Ok(left), Ok(right)) => Ok(FocusRecord::new(
                        (left.index, right.index),
                        (left.focus, right.focus),
                    )),
                    (Err(left_error), Err(right_error)) => Err(operand_failure(
                        context,
                        &self.left,
                        left_error,
                    )
                    .join(operand_failure(context, &self.right, right_error))),
                    (Err(error), Ok(_)) => Err(operand_failure(context, &self.left, error)),
                    (Ok(_), Err(error)) => Err(operand_failure(context, &self.right, error)),
                };
                outer.push(paired)
            },
        );
        if sink.is_stopped() {
            Flow::Stop
        } else {
            Flow::Continue
        }
    }

    fn length(&self, context: &Context, source: &L::Source) -> OpticResult<usize> {
        let left = self
            .left
            .length(context, source)
            .map_err(|error| operand_failure(context, &self.left, error))?;
        Ok(self.right_foci(context, source, left)?.len())
    }
}

impl<L, R, S, A, C> Modifier for Zip<L, R>
where
    L: Modifier<Source = S, Target = S, Focus = A, Replacement = A>,
    R: Modifier<Source = S, Target = S, Focus = C, Replacement = C>,
{
    fn modify(
        &self,
        context: &Context,
        source: S,
        function: &mut MapFn<'_, Self::Index, (A, C), (A, C)>,
    ) -> OpticResult<S> {
        let lefts = self
            .left
            .collect(context, &source)
            .map_err(|error| operand_failure(context, &self.left, error))?;
        let rights = self.right_foci(context, &source, lefts.len())?;

        let mut left_replacements = VecDeque::with_capacity(lefts.len().min(rights.len()));
        let mut right_replacements = VecDeque::with_capacity(left_replacements.capacity());
        for (left, right) in lefts.into_iter().zip(rights) {
            context.check()?;
            let (left_focus, right_focus) =
                function(&(left.index, right.index), (left.focus, right.focus))?;
            left_replacements.push_back(left_focus);
            right_replacements.push_back(right_focus);
        }

        let rebuilt = self
            .left
            .modify(context, source, &mut |_, focus| {
                context.check()?;
                Ok(left_replacements.pop_front().unwrap_or(focus))
            })
            .map_err(|error| operand_failure(context, &self.left, error))?;
        self.right
            .modify(context, rebuilt, &mut |_, focus| {
                context.check()?;
                Ok(right_replacements.pop_front().unwrap_or(focus))
            })
            .map_err(|error| operand_failure(context, &self.right, error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaf::{FunctionLens, VecTraversal};

    type Columns = (Vec<u8>, Vec<u8>);

    fn first(columns: &Columns) -> &Vec<u8> {
        &columns.0
    }

    fn second(columns: &Columns) -> &Vec<u8> {
        &columns.1
    }

    fn zipped() -> impl Modifier<
        Source = Columns,
        Target = Columns,
        Index = (usize, usize),
        Focus = (u8, u8),
        Replacement = (u8, u8),
    > {
        let left = FunctionLens::new(first as fn(&Columns) -> &Vec<u8>, |columns: Columns, value| {
            (value, columns.1)
        })
        .named("First")
        .compose(VecTraversal::new());
        let right = FunctionLens::new(second as fn(&Columns) -> &Vec<u8>, |columns: Columns, value| {
            (columns.0, value)
        })
        .named("Second")
        .compose(VecTraversal::new());
        Zip::new(left, right)
    }

    #[test]
    fn test_zip_accepts_combinator_operands() {
        let context = Context::background();
        let left = VecTraversal::<u8>::new();
        let right = crate::combinators::filtered(VecTraversal::<u8>::new(), |_, _| true);
        let records = Zip::new(left, right).collect(&context, &vec![1, 2]).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].index, (1, 1));
    }

    #[test]
    fn test_zip_pairs_by_position() {
        let columns = (vec![1, 2, 3], vec![10, 20, 30, 40]);
        let pairs = zipped().foci(&Context::background(), &columns).unwrap();
        assert_eq!(pairs, vec![(1, 10), (2, 20), (3, 30)]);
    }

    #[test]
    fn test_zip_length_is_shorter_side() {
        let columns = (vec![1, 2, 3], vec![10, 20, 30, 40]);
        assert_eq!(zipped().length(&Context::background(), &columns).unwrap(), 3);
    }

    #[test]
    fn test_zip_modify_leaves_excess_unchanged() {
        let columns = (vec![1, 2, 3], vec![10, 20, 30, 40]);
        let updated = zipped()
            .modify(&Context::background(), columns, &mut |_, (left, right)| Ok((right, left)))
            .unwrap();
        assert_eq!(updated, (vec![10, 20, 30], vec![1, 2, 3, 40]));
    }

    #[test]
    fn test_zip_describe_is_combinator() {
        let description = zipped().describe();
        assert!(!description.is_leaf());
        assert_eq!(description.to_string(), "Zip(Compose(First, Traverse), Compose(Second, Traverse))");
        assert_eq!(description.leaves().len(), 4);
    }
}
