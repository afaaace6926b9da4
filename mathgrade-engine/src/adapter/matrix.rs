//! Matrices and vectors, written as `[a,b:c,d]` or `[a,b,c]`.

use crate::error::ParseFailure;
use mathgrade_compute::symbolic::Statement;
use mathgrade_parser::parser::fmt::Latex;
use std::fmt::{self, Formatter};
use super::{parse_statement, split_top_level, strip_delimiters};

/// Matrix environments that may wrap the whole matrix.
const ENVIRONMENTS: &[&str] = &["pmatrix", "bmatrix", "matrix"];

/// A matrix of parsed expressions. Every row has the same number of columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    rows: Vec<Vec<Statement>>,
}

impl Matrix {
    /// Parses a matrix.
    ///
    /// Rows are separated by `:` and columns by `,`. A matrix environment such as
    /// `\begin{pmatrix}` uses `\\` and `&` instead. Brackets around the whole matrix are
    /// optional.
    pub fn parse(source: &str) -> Result<Self, ParseFailure> {
        let source = source.trim();
        let (body, row_delimiter, column_delimiter) = match environment_body(source) {
            Some(body) => (body, "\\\\", "&"),
            None => {
                let body = strip_delimiters(source, &["\\left[", "["], &["\\right]", "]"]);
                (body, ":", ",")
            },
        };

        let rows = split_top_level(body, row_delimiter)
            .into_iter()
            .filter(|row| !row.trim().is_empty() || row_delimiter == ":")
            .map(|row| {
                split_top_level(row, column_delimiter)
                    .into_iter()
                    .map(parse_statement)
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        let columns = rows.first().map_or(0, Vec::len);
        if let Some(ragged) = rows.iter().position(|row| row.len() != columns) {
            return Err(ParseFailure::new(format!(
                "row {} has {} element(s), but the first row has {}",
                ragged + 1,
                rows[ragged].len(),
                columns,
            )));
        }

        Ok(Self { rows })
    }

    /// The number of rows and columns.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.rows.first().map_or(0, Vec::len))
    }

    /// The elements, row by row.
    pub fn rows(&self) -> &[Vec<Statement>] {
        &self.rows
    }

    /// Returns pairs of elements at the same position in both matrices, or [`None`] if the
    /// shapes differ.
    pub fn zip<'a>(&'a self, other: &'a Self) -> Option<impl Iterator<Item = (&'a Statement, &'a Statement)>> {
        if self.shape() != other.shape() {
            return None;
        }
        Some(self.rows.iter().flatten().zip(other.rows.iter().flatten()))
    }
}

/// If the source is wrapped in a matrix environment, returns the content of the environment.
fn environment_body(source: &str) -> Option<&str> {
    ENVIRONMENTS.iter().find_map(|name| {
        source
            .strip_prefix(&format!("\\begin{{{}}}", name))?
            .strip_suffix(&format!("\\end{{{}}}", name))
    })
}

impl Latex for Matrix {
    fn fmt_latex(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "\\begin{{bmatrix}}")?;
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                write!(f, "\\\\")?;
            }
            for (j, element) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, "&")?;
                }
                element.fmt_latex(f)?;
            }
        }
        write!(f, "\\end{{bmatrix}}")
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "[")?;
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "[")?;
            for (j, element) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", element)?;
            }
            write!(f, "]")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn matrix_shape() {
        assert_eq!(Matrix::parse("[1,2:3,4]").unwrap().shape(), (2, 2));
        assert_eq!(Matrix::parse("1,2,3").unwrap().shape(), (1, 3));
        assert_eq!(Matrix::parse(r"\left[x:y\right]").unwrap().shape(), (2, 1));
    }

    #[test]
    fn environment() {
        let matrix = Matrix::parse(r"\begin{pmatrix}1&2\\3&4\end{pmatrix}").unwrap();
        assert_eq!(matrix, Matrix::parse("[1,2:3,4]").unwrap());
    }

    #[test]
    fn ragged_rows() {
        let err = Matrix::parse("[1,2:3]").unwrap_err();
        assert_eq!(err.message, "row 2 has 1 element(s), but the first row has 2");
    }

    #[test]
    fn empty_element() {
        assert!(Matrix::parse("[1,:3,4]").is_err());
    }

    #[test]
    fn latex() {
        let matrix = Matrix::parse("[1,x:3,4]").unwrap();
        assert_eq!(matrix.as_display().to_string(), r"\begin{bmatrix}1&x\\3&4\end{bmatrix}");
    }
}
