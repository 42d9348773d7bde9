use sparterm::{Term, Variable};
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;

/// A row of variable bindings, the equivalent of a row in SQL.
///
/// Each variable is bound at most once. Two rows are equal if they bind the same variables to
/// the same terms, whatever the insertion order.
///
/// ```
/// use sparexpr::BindingRow;
/// use sparterm::{Literal, Variable};
///
/// let mut row = BindingRow::new();
/// row.insert(Variable::new("lat")?, Literal::from(38.898).into());
/// assert_eq!(
///     row.to_string(),
///     "{ ?lat=\"38.898\"^^<http://www.w3.org/2001/XMLSchema#double> }"
/// );
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BindingRow {
    bindings: BTreeMap<Variable, Term>,
}

impl BindingRow {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `variable` to `term`, returning the term it was previously bound to.
    #[inline]
    pub fn insert(&mut self, variable: Variable, term: Term) -> Option<Term> {
        self.bindings.insert(variable, term)
    }

    #[inline]
    pub fn get(&self, variable: &Variable) -> Option<&Term> {
        self.bindings.get(variable)
    }

    #[inline]
    pub fn contains(&self, variable: &Variable) -> bool {
        self.bindings.contains_key(variable)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Iterates the bindings by variable name order.
    #[inline]
    pub fn iter(&self) -> btree_map::Iter<'_, Variable, Term> {
        self.bindings.iter()
    }

    /// Checks that every variable bound in both rows is bound to the same term.
    pub fn is_compatible(&self, other: &Self) -> bool {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small
            .iter()
            .all(|(variable, term)| large.get(variable).is_none_or(|t| t == term))
    }

    /// Joins two rows: the result binds the variables of both.
    ///
    /// Returns `None` if the rows are not [compatible](Self::is_compatible).
    ///
    /// ```
    /// use sparexpr::BindingRow;
    /// use sparterm::{Literal, Variable};
    ///
    /// let place = Variable::new("place")?;
    /// let left = BindingRow::from_iter([(place.clone(), Literal::from("DC").into())]);
    /// let right = BindingRow::from_iter([
    ///     (place.clone(), Literal::from("DC").into()),
    ///     (Variable::new("lat")?, Literal::from(38.898).into()),
    /// ]);
    /// assert_eq!(left.merge(&right).map(|row| row.len()), Some(2));
    ///
    /// let other = BindingRow::from_iter([(place, Literal::from("Paris").into())]);
    /// assert_eq!(left.merge(&other), None);
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// ```
    pub fn merge(&self, other: &Self) -> Option<Self> {
        if !self.is_compatible(other) {
            return None;
        }
        let mut merged = self.clone();
        for (variable, term) in other {
            merged
                .bindings
                .entry(variable.clone())
                .or_insert_with(|| term.clone());
        }
        Some(merged)
    }
}

impl fmt::Display for BindingRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (variable, term)) in self.bindings.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, " {variable}={term}")?;
        }
        f.write_str(" }")
    }
}

impl FromIterator<(Variable, Term)> for BindingRow {
    fn from_iter<I: IntoIterator<Item = (Variable, Term)>>(iter: I) -> Self {
        Self {
            bindings: iter.into_iter().collect(),
        }
    }
}

impl Extend<(Variable, Term)> for BindingRow {
    fn extend<I: IntoIterator<Item = (Variable, Term)>>(&mut self, iter: I) {
        self.bindings.extend(iter);
    }
}

impl<'a> IntoIterator for &'a BindingRow {
    type Item = (&'a Variable, &'a Term);
    type IntoIter = btree_map::Iter<'a, Variable, Term>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.bindings.iter()
    }
}

impl IntoIterator for BindingRow {
    type Item = (Variable, Term);
    type IntoIter = btree_map::IntoIter<Variable, Term>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.bindings.into_iter()
    }
}
